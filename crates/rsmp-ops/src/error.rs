//! Error types for resampling.

use thiserror::Error;

/// Error type for resampling requests.
///
/// The first four variants are validation failures. They are returned
/// synchronously, before any filter table is built or any background work
/// starts. The remaining variants describe failures of a running request and
/// reach the caller as a terminal [`Step::Failed`](crate::Step::Failed) or as
/// the error of a blocking call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResampleError {
    /// The source can't be resampled (for example it holds no pixels).
    #[error("source image is invalid: {0}")]
    SourceInvalid(String),

    /// The requested target size is negative or too large to allocate.
    #[error("target size is invalid: {0}")]
    TargetSizeInvalid(String),

    /// The filter kernel is unusable (bad support or shape parameters).
    #[error("filter is invalid: {0}")]
    FilterInvalid(String),

    /// A boundary policy doesn't behave like one.
    #[error("boundary policy is invalid: {0}")]
    BoundaryInvalid(String),

    /// A working buffer couldn't be allocated.
    #[error("failed to allocate {requested} bytes")]
    AllocationFailed {
        /// Bytes requested
        requested: usize,
    },

    /// A pixel buffer operation failed.
    #[error(transparent)]
    Buffer(rsmp_core::Error),

    /// The background worker died unexpectedly.
    #[error("resize worker failed: {0}")]
    Worker(String),

    /// The request ended before producing a result.
    #[error("resize was cancelled")]
    Cancelled,
}

impl From<rsmp_core::Error> for ResampleError {
    fn from(err: rsmp_core::Error) -> Self {
        match err {
            rsmp_core::Error::AllocationFailed { requested, .. } => {
                Self::AllocationFailed { requested }
            }
            region @ rsmp_core::Error::InvalidRegion { .. } => Self::SourceInvalid(region.to_string()),
            other => Self::Buffer(other),
        }
    }
}

/// Result type for resampling.
pub type ResampleResult<T> = Result<T, ResampleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        use rsmp_core::{Error, Rect};

        let err: ResampleError = Error::AllocationFailed {
            requested: 64,
            reason: "no memory".into(),
        }
        .into();
        assert_eq!(err, ResampleError::AllocationFailed { requested: 64 });

        let err: ResampleError = Error::InvalidRegion {
            region: Rect::new(0, 0, 0, 1),
            width: 4,
            height: 4,
        }
        .into();
        assert!(matches!(err, ResampleError::SourceInvalid(_)));

        let err: ResampleError = Error::OutOfBounds {
            x: 9,
            y: 9,
            width: 4,
            height: 4,
        }
        .into();
        assert!(matches!(err, ResampleError::Buffer(_)));
    }
}

//! Pixel buffer and region errors.
//!
//! Everything in this crate that can fail returns [`Result`]. Failures are
//! either about geometry (a pixel or region outside its image, dimensions
//! whose sample count doesn't fit in memory) or about storage that couldn't
//! be reserved.
//!
//! ```rust
//! use rsmp_core::{Error, PixelBuffer, Rect, SubImage};
//!
//! let img = PixelBuffer::new(4, 4);
//! let err = SubImage::new(&img, Rect::new(2, 2, 4, 4)).unwrap_err();
//! assert_eq!(err.to_string(), "region 4x4+2+2 does not fit a 4x4 source");
//! assert!(matches!(err, Error::InvalidRegion { .. }));
//! ```

use crate::Rect;
use thiserror::Error;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors of buffer construction and addressing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A pixel write landed outside the buffer.
    #[error("pixel ({x}, {y}) lies outside the {width}x{height} buffer")]
    OutOfBounds {
        /// Column written
        x: usize,
        /// Row written
        y: usize,
        /// Buffer width
        width: usize,
        /// Buffer height
        height: usize,
    },

    /// A view region is empty or reaches past its source.
    #[error("region {region} does not fit a {width}x{height} source")]
    InvalidRegion {
        /// Requested region
        region: Rect,
        /// Source width
        width: usize,
        /// Source height
        height: usize,
    },

    /// Pixel storage couldn't be reserved.
    #[error("could not reserve {requested} bytes of pixel storage: {reason}")]
    AllocationFailed {
        /// Bytes asked for
        requested: usize,
        /// Allocator message
        reason: String,
    },

    /// Dimensions that no buffer can have, or data of the wrong length.
    #[error("{width}x{height} buffer rejected: {reason}")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// What is wrong with them
        reason: String,
    },
}

impl Error {
    pub(crate) fn out_of_bounds(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn invalid_region(region: Rect, width: usize, height: usize) -> Self {
        Self::InvalidRegion {
            region,
            width,
            height,
        }
    }

    pub(crate) fn allocation_failed(requested: usize, reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            requested,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_dimensions(width: usize, height: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::out_of_bounds(9, 1, 8, 8).to_string(),
            "pixel (9, 1) lies outside the 8x8 buffer"
        );
        assert_eq!(
            Error::allocation_failed(64, "no memory").to_string(),
            "could not reserve 64 bytes of pixel storage: no memory"
        );
        assert_eq!(
            Error::invalid_dimensions(3, 0, "sample count overflows").to_string(),
            "3x0 buffer rejected: sample count overflows"
        );
    }
}

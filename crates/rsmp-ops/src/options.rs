//! Resize configuration.
//!
//! [`ResizeOptions`] bundles everything a request needs besides the source
//! and target size. It is serde-compatible, so it can live in a config file:
//!
//! ```yaml
//! kernel: mitchell
//! x_boundary: clamp
//! y_boundary: reflect
//! quantum: 500000
//! parallel: true
//! ```
//!
//! Missing fields take their defaults.
//!
//! ```rust
//! use rsmp_ops::{Boundary, Kernel, ResizeOptions};
//!
//! let opts = ResizeOptions::default()
//!     .with_kernel(Kernel::CATMULL_ROM)
//!     .with_boundary(Boundary::Clamp)
//!     .with_quantum(10_000);
//! assert_eq!(opts.kernel.name(), "catmullrom");
//! assert!(opts.validate().is_ok());
//! ```

use crate::{Boundary, Kernel, ResampleResult};
use serde::{Deserialize, Serialize};

/// Default number of multiply-accumulates between progress steps.
pub const DEFAULT_QUANTUM: u64 = 200_000;

/// Options of a resize request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeOptions {
    /// Filter kernel, applied along both axes.
    pub kernel: Kernel,
    /// Boundary policy of the horizontal pass.
    pub x_boundary: Boundary,
    /// Boundary policy of the vertical pass.
    pub y_boundary: Boundary,
    /// Multiply-accumulates between two progress steps.
    pub quantum: u64,
    /// Compute lines of each pass on the rayon pool.
    pub parallel: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            kernel: Kernel::LANCZOS3,
            x_boundary: Boundary::Reject,
            y_boundary: Boundary::Reject,
            quantum: DEFAULT_QUANTUM,
            parallel: false,
        }
    }
}

impl ResizeOptions {
    /// Sets the kernel.
    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the same boundary policy on both axes.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.x_boundary = boundary;
        self.y_boundary = boundary;
        self
    }

    /// Sets the boundary policies per axis.
    pub fn with_boundaries(mut self, x: Boundary, y: Boundary) -> Self {
        self.x_boundary = x;
        self.y_boundary = y;
        self
    }

    /// Sets the progress quantum.
    pub fn with_quantum(mut self, quantum: u64) -> Self {
        self.quantum = quantum;
        self
    }

    /// Enables or disables parallel line processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the kernel and both boundary policies.
    ///
    /// # Errors
    ///
    /// [`FilterInvalid`](crate::ResampleError::FilterInvalid) or
    /// [`BoundaryInvalid`](crate::ResampleError::BoundaryInvalid).
    pub fn validate(&self) -> ResampleResult<()> {
        self.kernel.validate()?;
        self.x_boundary.validate()?;
        self.y_boundary.validate()
    }
}

//! # rsmp-ops
//!
//! Separable image resampling for RGBA16 buffers.
//!
//! A resize is two one-dimensional convolutions, one per axis, through an
//! intermediate buffer. Each pass uses a precomputed [`FilterTable`] built
//! from a [`Kernel`] and a [`Boundary`] policy, and the order of the passes
//! is chosen to minimize the multiply-accumulate count.
//!
//! # Modules
//!
//! - [`kernel`] - Continuous filter kernels (box, triangle, Lanczos, BC cubics)
//! - [`boundary`] - Out-of-range index policies
//! - [`table`] - Discrete per-axis filter tables
//! - [`convolve`] - One-dimensional convolution along an axis
//! - [`plan`] - Pass order selection and execution
//! - [`progress`] - Progress steps and cancellable jobs
//! - [`options`] - Serializable request options
//!
//! # Example
//!
//! ```rust
//! use rsmp_core::PixelBuffer;
//! use rsmp_ops::{resize_with, Boundary, Kernel, ResizeOptions, Size};
//!
//! let src = PixelBuffer::from_fn(64, 64, |x, y| {
//!     [(x * 1000) as u16, (y * 1000) as u16, 0, 65535]
//! });
//! let opts = ResizeOptions::default()
//!     .with_kernel(Kernel::MITCHELL)
//!     .with_boundary(Boundary::Clamp);
//! let small = resize_with(Size::new(16, 16), &src, &opts).unwrap();
//! assert_eq!(small.dimensions(), (16, 16));
//! ```
//!
//! # Progressive resize
//!
//! ```rust
//! use rsmp_core::PixelBuffer;
//! use rsmp_ops::{resize_progressive, Boundary, Kernel, Size};
//!
//! let src = PixelBuffer::filled(200, 100, [1, 2, 3, 4]);
//! let job = resize_progressive(
//!     Size::new(50, 25),
//!     src,
//!     Kernel::LANCZOS3,
//!     Boundary::Reject,
//!     Boundary::Reject,
//! )
//! .unwrap();
//! let img = job.wait().unwrap();
//! assert_eq!(img.pixel(0, 0), [1, 2, 3, 4]);
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - compute lines of each pass on the rayon pool
//!   when [`ResizeOptions::parallel`] is set

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod engine;
mod error;
pub mod boundary;
pub mod convolve;
pub mod kernel;
pub mod options;
pub mod plan;
pub mod progress;
pub mod table;

pub use boundary::Boundary;
pub use convolve::Axis;
pub use engine::{
    resample_into, resize, resize_progressive, resize_progressive_with, resize_with,
    validate_request,
};
pub use error::{ResampleError, ResampleResult};
pub use kernel::{Kernel, Shape};
pub use options::{DEFAULT_QUANTUM, ResizeOptions};
pub use plan::{PassOrder, ResizePlan, Size};
pub use progress::{JobOutcome, ResizeJob, Step};
pub use table::{FilterTable, Tap};

//! # rsmp-core
//!
//! Core types for the rsmp resampling crates.
//!
//! - [`PixelBuffer`] - Owned RGBA16 non-premultiplied pixel grid
//! - [`PixelSource`] - Read-only access to any pixel store as normalized RGBA
//! - [`Rgba`] - Floating point sample used for accumulation
//! - [`Rect`], [`SubImage`] - Regions and views into sources
//!
//! ## Crate Structure
//!
//! ```text
//! rsmp-core (this crate)
//!    ^
//!    |
//!    +-- rsmp-ops (filter kernels, resampling engine)
//!    +-- rsmp-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;

pub use error::{Error, Result};
pub use image::{PixelBuffer, PixelSource};
pub use pixel::Rgba;
pub use rect::{Rect, SubImage};

/// Prelude module for convenient imports.
///
/// ```
/// use rsmp_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{PixelBuffer, PixelSource};
    pub use crate::pixel::Rgba;
    pub use crate::rect::{Rect, SubImage};
}

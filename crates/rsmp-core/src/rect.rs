//! Rectangles and sub-region views.
//!
//! - [`Rect`] - Origin plus dimensions, in pixels
//! - [`SubImage`] - A [`PixelSource`] restricted to a rectangle of another source
//!
//! X grows to the right and Y downwards, both starting at the top-left
//! pixel. A view re-bases coordinates so its own top-left pixel is `(0, 0)`.
//!
//! # Usage
//!
//! ```rust
//! use rsmp_core::{PixelBuffer, PixelSource, Rect, SubImage};
//!
//! let img = PixelBuffer::from_fn(8, 8, |x, y| [x as u16, y as u16, 0, 65535]);
//! let view = SubImage::new(&img, Rect::new(2, 3, 4, 4)).unwrap();
//!
//! assert_eq!(view.dimensions(), (4, 4));
//! assert_eq!(view.sample(0, 0), img.sample(2, 3));
//! ```

use crate::pixel::Rgba;
use crate::{Error, PixelBuffer, PixelSource, Result};
use std::fmt;

/// Pixel rectangle: top-left corner plus size.
///
/// The corner is included, `x + width` and `y + height` are not. Displayed in
/// X11 geometry form, `WxH+X+Y`.
///
/// ```rust
/// use rsmp_core::Rect;
///
/// let r = Rect::new(4, 2, 16, 8);
/// assert_eq!(r.to_string(), "16x8+4+2");
/// assert!(r.fits(20, 10));
/// assert!(!r.fits(19, 10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left column
    pub x: usize,
    /// Top row
    pub y: usize,
    /// Columns covered
    pub width: usize,
    /// Rows covered
    pub height: usize,
}

impl Rect {
    /// Rectangle with its corner at `(x, y)`.
    #[inline]
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width x height` image.
    #[inline]
    pub const fn from_size(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    /// `true` when nothing is covered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `true` when the rectangle lies inside a `width x height` image.
    /// Coordinates that overflow `usize` never fit.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// A read-only view of a rectangle inside another [`PixelSource`].
///
/// Coordinates of the view start at `(0, 0)` in the region's top-left
/// corner. Views of a [`PixelBuffer`] keep the packed-line fast path only
/// when the region spans the whole buffer.
#[derive(Debug, Clone)]
pub struct SubImage<S> {
    source: S,
    region: Rect,
}

impl<S: PixelSource> SubImage<S> {
    /// Creates a view of `region` inside `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the region is empty or extends
    /// beyond the source.
    pub fn new(source: S, region: Rect) -> Result<Self> {
        let (width, height) = source.dimensions();
        if region.is_empty() || !region.fits(width, height) {
            return Err(Error::invalid_region(region, width, height));
        }
        Ok(Self { source, region })
    }

    /// The region this view covers, in source coordinates.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// The wrapped source.
    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: PixelSource> PixelSource for SubImage<S> {
    #[inline]
    fn width(&self) -> usize {
        self.region.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.region.height
    }

    #[inline]
    fn sample(&self, x: usize, y: usize) -> Rgba {
        self.source.sample(self.region.x + x, self.region.y + y)
    }

    fn as_buffer(&self) -> Option<&PixelBuffer> {
        self.source.as_buffer().filter(|buf| {
            self.region == Rect::from_size(buf.width(), buf.height())
        })
    }
}

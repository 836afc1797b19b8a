//! Pixel buffers and the pixel source abstraction.
//!
//! - [`PixelBuffer`] - Owned RGBA16 non-premultiplied buffer
//! - [`PixelSource`] - Anything that can be read as normalized RGBA
//!
//! # Memory Layout
//!
//! Buffers store pixels in **row-major** order, top-to-bottom, with
//! interleaved channels:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  ← Row 0
//!         [R G B A R G B A ...]  ← Row 1
//!         ...
//! ```
//!
//! A buffer with a zero dimension holds no pixels. It is a valid value,
//! produced for instance by resizing to a zero-sized target.
//!
//! # Usage
//!
//! ```rust
//! use rsmp_core::{PixelBuffer, PixelSource};
//!
//! let mut img = PixelBuffer::new(64, 32);
//! img.set_pixel(10, 5, [65535, 0, 0, 65535]);
//!
//! assert_eq!(img.pixel(10, 5), [65535, 0, 0, 65535]);
//! assert_eq!(img.sample(10, 5).r, 1.0);
//! ```

use crate::pixel::{CHANNELS, Rgba};
use crate::{Error, Result};
use std::sync::Arc;

/// A readable grid of RGBA samples.
///
/// Resampling reads its input through this trait, so any pixel store can be
/// resized without first copying it into a [`PixelBuffer`].
///
/// Implementors only need the dimensions and a per-pixel read. Sources that
/// are backed by a [`PixelBuffer`] should also return it from
/// [`as_buffer`](PixelSource::as_buffer); readers then copy whole lines from
/// the packed storage instead of going through [`sample`](PixelSource::sample)
/// pixel by pixel.
pub trait PixelSource {
    /// Width in pixels.
    fn width(&self) -> usize;

    /// Height in pixels.
    fn height(&self) -> usize;

    /// Reads the pixel at `(x, y)` normalized to `0.0..=1.0` per channel.
    ///
    /// Callers guarantee `x < width()` and `y < height()`.
    fn sample(&self, x: usize, y: usize) -> Rgba;

    /// Returns the packed RGBA16 buffer behind this source, if there is one.
    fn as_buffer(&self) -> Option<&PixelBuffer> {
        None
    }

    /// Returns `(width, height)`.
    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn width(&self) -> usize {
        (**self).width()
    }
    fn height(&self) -> usize {
        (**self).height()
    }
    fn sample(&self, x: usize, y: usize) -> Rgba {
        (**self).sample(x, y)
    }
    fn as_buffer(&self) -> Option<&PixelBuffer> {
        (**self).as_buffer()
    }
}

impl<T: PixelSource + ?Sized> PixelSource for Arc<T> {
    fn width(&self) -> usize {
        (**self).width()
    }
    fn height(&self) -> usize {
        (**self).height()
    }
    fn sample(&self, x: usize, y: usize) -> Rgba {
        (**self).sample(x, y)
    }
    fn as_buffer(&self) -> Option<&PixelBuffer> {
        (**self).as_buffer()
    }
}

impl<T: PixelSource + ?Sized> PixelSource for Box<T> {
    fn width(&self) -> usize {
        (**self).width()
    }
    fn height(&self) -> usize {
        (**self).height()
    }
    fn sample(&self, x: usize, y: usize) -> Rgba {
        (**self).sample(x, y)
    }
    fn as_buffer(&self) -> Option<&PixelBuffer> {
        (**self).as_buffer()
    }
}

/// Owned RGBA16 pixel buffer, non-premultiplied.
///
/// # Example
///
/// ```rust
/// use rsmp_core::PixelBuffer;
///
/// let img = PixelBuffer::filled(4, 4, [1000, 2000, 3000, 65535]);
/// assert_eq!(img.pixel(3, 3), [1000, 2000, 3000, 65535]);
/// assert_eq!(img.as_raw().len(), 4 * 4 * 4);
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    data: Vec<u16>,
    width: usize,
    height: usize,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Number of `u16` samples for a `width x height` buffer.
fn sample_count(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "sample count overflows"))
}

impl PixelBuffer {
    /// Creates a buffer filled with transparent black.
    ///
    /// # Panics
    ///
    /// Panics if the sample count overflows or allocation fails. Use
    /// [`try_new`](Self::try_new) to handle those cases.
    pub fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Ok(buf) => buf,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a buffer filled with transparent black, reporting allocation
    /// failure instead of aborting.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if `width * height * 4` overflows
    /// - [`Error::AllocationFailed`] if the storage can't be reserved
    pub fn try_new(width: usize, height: usize) -> Result<Self> {
        let len = sample_count(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            Error::allocation_failed(len.saturating_mul(std::mem::size_of::<u16>()), e.to_string())
        })?;
        data.resize(len, 0);
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a buffer with no pixels.
    #[inline]
    pub fn empty(width: usize, height: usize) -> Self {
        debug_assert!(width == 0 || height == 0);
        Self {
            data: Vec::new(),
            width,
            height,
        }
    }

    /// Creates a buffer where every pixel has the given value.
    pub fn filled(width: usize, height: usize, pixel: [u16; 4]) -> Self {
        let mut buf = Self::new(width, height);
        for px in buf.data.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&pixel);
        }
        buf
    }

    /// Creates a buffer by evaluating `f(x, y)` for every pixel.
    ///
    /// ```rust
    /// use rsmp_core::PixelBuffer;
    ///
    /// let ramp = PixelBuffer::from_fn(256, 1, |x, _| [x as u16 * 257, 0, 0, 65535]);
    /// assert_eq!(ramp.pixel(255, 0)[0], 65535);
    /// ```
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> [u16; 4],
    {
        let mut buf = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buf.set_pixel(x, y, f(x, y));
            }
        }
        buf
    }

    /// Wraps existing interleaved RGBA16 samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len()` isn't
    /// `width * height * 4`.
    pub fn from_rgba16(width: usize, height: usize, data: Vec<u16>) -> Result<Self> {
        let expected = sample_count(width, height)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns `true` if the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn as_raw(&self) -> &[u16] {
        &self.data
    }

    /// Mutable raw interleaved samples.
    #[inline]
    pub fn as_raw_mut(&mut self) -> &mut [u16] {
        &mut self.data
    }

    /// Index of the first sample of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u16; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Returns the pixel at `(x, y)`, or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u16; 4]> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Sets the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: [u16; 4]) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&pixel);
    }

    /// Sets the pixel at `(x, y)`, failing instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinates are outside the buffer.
    pub fn try_set_pixel(&mut self, x: usize, y: usize, pixel: [u16; 4]) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::out_of_bounds(x, y, self.width, self.height));
        }
        self.set_pixel(x, y, pixel);
        Ok(())
    }

    /// Samples of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u16] {
        let start = y * self.width * CHANNELS;
        &self.data[start..start + self.width * CHANNELS]
    }
}

impl PixelSource for PixelBuffer {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn sample(&self, x: usize, y: usize) -> Rgba {
        Rgba::from_u16(self.pixel(x, y))
    }

    #[inline]
    fn as_buffer(&self) -> Option<&PixelBuffer> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let img = PixelBuffer::new(3, 2);
        assert_eq!(img.dimensions(), (3, 2));
        assert!(img.as_raw().iter().all(|&v| v == 0));
        assert!(!img.is_empty());
    }

    #[test]
    fn test_zero_sized_buffers() {
        let img = PixelBuffer::new(0, 10);
        assert!(img.is_empty());
        assert!(img.as_raw().is_empty());
        assert_eq!(PixelBuffer::empty(5, 0).dimensions(), (5, 0));
    }

    #[test]
    fn test_overflowing_dimensions() {
        let err = PixelBuffer::try_new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_from_rgba16_length_check() {
        assert!(PixelBuffer::from_rgba16(2, 2, vec![0; 16]).is_ok());
        assert!(PixelBuffer::from_rgba16(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_set_get_pixel() {
        let mut img = PixelBuffer::new(4, 4);
        img.set_pixel(1, 2, [1, 2, 3, 4]);
        assert_eq!(img.pixel(1, 2), [1, 2, 3, 4]);
        assert_eq!(img.get_pixel(4, 0), None);
        assert!(matches!(
            img.try_set_pixel(0, 4, [0; 4]),
            Err(Error::OutOfBounds { .. })
        ));
        assert_eq!(&img.row(2)[4..8], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_source_through_arc() {
        let img = Arc::new(PixelBuffer::filled(2, 2, [65535, 0, 0, 65535]));
        let src: &dyn PixelSource = &img;
        assert_eq!(src.dimensions(), (2, 2));
        assert_eq!(src.sample(1, 1).r, 1.0);
        assert!(src.as_buffer().is_some());
    }
}

//! Pixel sample types.
//!
//! Buffers store non-premultiplied RGBA with 16 bits per channel. Filtering
//! happens on [`Rgba`], a normalized `f32` sample where `0.0..=1.0` maps onto
//! `0..=65535`.
//!
//! # Conversion
//!
//! ```rust
//! use rsmp_core::pixel::{Rgba, to_u16, U16_MAX};
//!
//! let px = Rgba::from_u16([65535, 0, 32768, 65535]);
//! assert_eq!(px.r, 1.0);
//! assert_eq!(px.to_u16(), [65535, 0, 32768, 65535]);
//!
//! // Out-of-range and non-finite values saturate
//! assert_eq!(to_u16(1.5), U16_MAX);
//! assert_eq!(to_u16(-0.25), 0);
//! assert_eq!(to_u16(f32::NAN), 0);
//! ```

/// Largest stored channel value.
pub const U16_MAX: u16 = u16::MAX;

/// Number of channels in every buffer.
pub const CHANNELS: usize = 4;

const U16_TO_F32: f32 = 1.0 / 65535.0;
const F32_TO_U16: f32 = 65535.0;

/// A normalized RGBA sample used as a floating point accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Rgba {
    /// Transparent black.
    pub const ZERO: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a sample from normalized channel values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Converts stored 16-bit channels into a normalized sample.
    #[inline]
    pub fn from_u16(px: [u16; 4]) -> Self {
        Self {
            r: px[0] as f32 * U16_TO_F32,
            g: px[1] as f32 * U16_TO_F32,
            b: px[2] as f32 * U16_TO_F32,
            a: px[3] as f32 * U16_TO_F32,
        }
    }

    /// Converts back to stored 16-bit channels, rounding and saturating.
    #[inline]
    pub fn to_u16(self) -> [u16; 4] {
        [to_u16(self.r), to_u16(self.g), to_u16(self.b), to_u16(self.a)]
    }

    /// Adds `weight * other` to this accumulator.
    #[inline]
    pub fn add_weighted(&mut self, other: Rgba, weight: f32) {
        self.r += weight * other.r;
        self.g += weight * other.g;
        self.b += weight * other.b;
        self.a += weight * other.a;
    }
}

/// Converts one normalized channel to its stored value.
///
/// Values below zero become `0`, values above one become [`U16_MAX`].
/// NaN becomes `0`, infinities saturate to the matching extreme.
#[inline]
pub fn to_u16(v: f32) -> u16 {
    let scaled = v * F32_TO_U16 + 0.5;
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else if scaled >= F32_TO_U16 {
        U16_MAX
    } else {
        scaled as u16
    }
}

/// Converts one stored channel to its normalized value.
#[inline]
pub fn to_f32(v: u16) -> f32 {
    v as f32 * U16_TO_F32
}

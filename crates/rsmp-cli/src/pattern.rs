//! Synthetic source images.

use clap::ValueEnum;
use rsmp_core::{PixelBuffer, Result};

/// Generated test pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Pattern {
    /// Red ramps left to right, green top to bottom
    Gradient,
    /// 16 pixel black and white squares, the worst case for ringing
    Checker,
    /// Deterministic hash noise
    Noise,
    /// Single mid-grey color
    Solid,
}

impl Pattern {
    /// Renders the pattern at `width x height`.
    ///
    /// # Errors
    ///
    /// Fails if the buffer can't be allocated.
    pub fn render(self, width: usize, height: usize) -> Result<PixelBuffer> {
        let mut img = PixelBuffer::try_new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, self.pixel(x, y, width, height));
            }
        }
        Ok(img)
    }

    fn pixel(self, x: usize, y: usize, width: usize, height: usize) -> [u16; 4] {
        match self {
            Pattern::Gradient => [ramp(x, width), ramp(y, height), 16384, 65535],
            Pattern::Checker => {
                let v = if (x / 16 + y / 16) % 2 == 0 { 65535 } else { 0 };
                [v, v, v, 65535]
            }
            Pattern::Noise => {
                let h = hash(x as u32, y as u32);
                [h as u16, (h >> 16) as u16, (h >> 8) as u16, 65535]
            }
            Pattern::Solid => [32768, 32768, 32768, 65535],
        }
    }
}

fn ramp(pos: usize, len: usize) -> u16 {
    if len < 2 {
        return 0;
    }
    (pos as u64 * 65535 / (len as u64 - 1)) as u16
}

fn hash(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE3D);
    h ^ (h >> 13)
}

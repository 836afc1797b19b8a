//! Continuous filter kernels.
//!
//! A [`Kernel`] is a weighting function with a bounded support radius `S`,
//! zero outside `[-S, S]`. Kernels are plain `Copy` values and the
//! presets are `const`s, so they are built once and never mutated.
//!
//! # Presets
//!
//! | Kernel | Support | Notes |
//! |---|---|---|
//! | [`Kernel::BOX`] | 0.5 | `1` on `(-0.5, 0.5]` |
//! | [`Kernel::TRIANGLE`] | 1 | Linear interpolation |
//! | [`Kernel::LANCZOS3`] | 3 | Default, sinc windowed by sinc |
//! | [`Kernel::LANCZOS5`] | 5 | |
//! | [`Kernel::LANCZOS12`] | 12 | |
//! | [`Kernel::MITCHELL`] | 2 | Cubic, B = C = 1/1.3 |
//! | [`Kernel::CATMULL_ROM`] | 2 | Cubic, B = 0, C = 1/2 |
//! | [`Kernel::BSPLINE`] | 2 | Cubic, B = 1, C = 0 |
//!
//! # Example
//!
//! ```rust
//! use rsmp_ops::Kernel;
//!
//! let k = Kernel::LANCZOS3;
//! assert_eq!(k.support(), 3.0);
//! assert_eq!(k.apply(0.0), 1.0);
//! assert_eq!(k.apply(3.0), 0.0);
//!
//! assert_eq!(Kernel::from_name("catmull-rom").unwrap().name(), "catmullrom");
//! ```

use crate::{ResampleError, ResampleResult};
use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Outputs with a magnitude below this snap to exactly zero.
const NOISE_FLOOR: f64 = 1.25e-5;

/// Signature of a user supplied kernel function.
pub type KernelFn = fn(f64) -> f64;

/// The function a [`Kernel`] evaluates.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// `1` on `(-0.5, 0.5]`, else `0`.
    Box,
    /// `max(0, 1 - |x|)`.
    Triangle,
    /// `sinc(x) * sinc(x / a)` inside `|x| < a`.
    Lanczos(f64),
    /// Mitchell-Netravali family of cubics.
    Cubic {
        /// Blur parameter
        b: f64,
        /// Ringing parameter
        c: f64,
    },
    /// Any function, truncated to the kernel support.
    Custom(KernelFn),
}

/// A continuous filter kernel with a bounded support radius.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    name: &'static str,
    shape: Shape,
    support: f64,
}

/// Names accepted by [`Kernel::from_name`].
pub const KERNEL_NAMES: &[&str] = &[
    "box",
    "triangle",
    "lanczos3",
    "lanczos5",
    "lanczos12",
    "mitchell",
    "catmullrom",
    "bspline",
];

impl Kernel {
    /// Box filter (nearest neighbour when upscaling).
    pub const BOX: Kernel = Kernel::new("box", Shape::Box, 0.5);
    /// Triangle filter (bilinear).
    pub const TRIANGLE: Kernel = Kernel::new("triangle", Shape::Triangle, 1.0);
    /// Lanczos with three lobes.
    pub const LANCZOS3: Kernel = Kernel::lanczos("lanczos3", 3.0);
    /// Lanczos with five lobes.
    pub const LANCZOS5: Kernel = Kernel::lanczos("lanczos5", 5.0);
    /// Lanczos with twelve lobes.
    pub const LANCZOS12: Kernel = Kernel::lanczos("lanczos12", 12.0);
    /// Mitchell cubic.
    pub const MITCHELL: Kernel = Kernel::cubic("mitchell", 1.0 / 1.3, 1.0 / 1.3);
    /// Catmull-Rom spline, interpolating.
    pub const CATMULL_ROM: Kernel = Kernel::cubic("catmullrom", 0.0, 0.5);
    /// Cubic B-spline, smoothing.
    pub const BSPLINE: Kernel = Kernel::cubic("bspline", 1.0, 0.0);

    /// Every preset, in the order of [`KERNEL_NAMES`].
    pub const PRESETS: [Kernel; 8] = [
        Kernel::BOX,
        Kernel::TRIANGLE,
        Kernel::LANCZOS3,
        Kernel::LANCZOS5,
        Kernel::LANCZOS12,
        Kernel::MITCHELL,
        Kernel::CATMULL_ROM,
        Kernel::BSPLINE,
    ];

    const fn new(name: &'static str, shape: Shape, support: f64) -> Self {
        Self {
            name,
            shape,
            support,
        }
    }

    /// Lanczos kernel with `a` lobes; the support is `a`.
    pub const fn lanczos(name: &'static str, a: f64) -> Self {
        Self::new(name, Shape::Lanczos(a), a)
    }

    /// Mitchell-Netravali cubic with parameters `b` and `c`; the support is 2.
    pub const fn cubic(name: &'static str, b: f64, c: f64) -> Self {
        Self::new(name, Shape::Cubic { b, c }, 2.0)
    }

    /// Wraps an arbitrary function. Values outside `support` are ignored.
    pub const fn custom(name: &'static str, f: KernelFn, support: f64) -> Self {
        Self::new(name, Shape::Custom(f), support)
    }

    /// Looks up a preset by name, ignoring case, `-` and `_`.
    pub fn from_name(name: &str) -> Option<Kernel> {
        let key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let key = match key.as_str() {
            "lanczos" => "lanczos3",
            "bilinear" | "linear" => "triangle",
            "nearest" => "box",
            "cubic" | "bicubic" => "catmullrom",
            other => other,
        };
        Self::PRESETS.iter().copied().find(|k| k.name == key)
    }

    /// Name of the kernel.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Shape of the kernel.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Support radius.
    #[inline]
    pub fn support(&self) -> f64 {
        self.support
    }

    /// Returns `true` for user supplied kernels.
    #[inline]
    pub fn is_custom(&self) -> bool {
        matches!(self.shape, Shape::Custom(_))
    }

    /// Evaluates the kernel at `x`. Zero outside the support.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match self.shape {
            Shape::Box => box_weight(x),
            Shape::Triangle => triangle_weight(x),
            Shape::Lanczos(a) => lanczos_weight(x, a),
            Shape::Cubic { b, c } => cubic_weight(x, b, c),
            // NaN fails the comparison.
            Shape::Custom(f) if x.abs() < self.support => f(x),
            Shape::Custom(_) => 0.0,
        }
    }

    /// Checks that the kernel can be used for resampling.
    ///
    /// # Errors
    ///
    /// [`ResampleError::FilterInvalid`] if the support isn't a positive finite
    /// number, or if a Lanczos kernel has a non-positive lobe count.
    pub fn validate(&self) -> ResampleResult<()> {
        if !(self.support.is_finite() && self.support > 0.0) {
            return Err(ResampleError::FilterInvalid(format!(
                "kernel '{}' has support {}, expected a positive finite value",
                self.name, self.support
            )));
        }
        match self.shape {
            Shape::Lanczos(a) if !(a.is_finite() && a > 0.0) => Err(ResampleError::FilterInvalid(
                format!("lanczos kernel '{}' has {} lobes", self.name, a),
            )),
            Shape::Cubic { b, c } if !(b.is_finite() && c.is_finite()) => {
                Err(ResampleError::FilterInvalid(format!(
                    "cubic kernel '{}' has non-finite parameters",
                    self.name
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::LANCZOS3
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for Kernel {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kernel::from_name(s).ok_or_else(|| {
            ResampleError::FilterInvalid(format!(
                "unknown kernel '{}', expected one of: {}",
                s,
                KERNEL_NAMES.join(", ")
            ))
        })
    }
}

impl Serialize for Kernel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_custom() {
            return Err(ser::Error::custom(format!(
                "custom kernel '{}' can't be serialized",
                self.name
            )));
        }
        serializer.serialize_str(self.name)
    }
}

impl<'de> Deserialize<'de> for Kernel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Kernel::from_name(&name).ok_or_else(|| de::Error::unknown_variant(&name, KERNEL_NAMES))
    }
}

/// `sin(pi x) / (pi x)` with a Taylor expansion around zero.
#[inline]
pub fn sinc(x: f64) -> f64 {
    let x = x * PI;
    if x.abs() < 0.01 {
        1.0 + x * x * (-1.0 / 6.0 + x * x / 120.0)
    } else {
        x.sin() / x
    }
}

/// Snaps tiny and non-finite values to zero.
#[inline]
fn cut_noise(v: f64) -> f64 {
    // NaN fails both comparisons.
    if v < -NOISE_FLOOR || v > NOISE_FLOOR {
        v
    } else {
        0.0
    }
}

#[inline]
fn box_weight(x: f64) -> f64 {
    if -0.5 < x && x <= 0.5 { 1.0 } else { 0.0 }
}

#[inline]
fn triangle_weight(x: f64) -> f64 {
    (1.0 - x.abs()).max(0.0)
}

#[inline]
fn lanczos_weight(x: f64, a: f64) -> f64 {
    let ax = x.abs();
    if ax < a { cut_noise(sinc(ax) * sinc(ax / a)) } else { 0.0 }
}

#[inline]
fn cubic_weight(x: f64, b: f64, c: f64) -> f64 {
    let ax = x.abs();
    let k = if ax < 1.0 {
        (12.0 - 9.0 * b - 6.0 * c) * ax * ax * ax
            + (-18.0 + 12.0 * b + 6.0 * c) * ax * ax
            + (6.0 - 2.0 * b)
    } else if ax < 2.0 {
        (-b - 6.0 * c) * ax * ax * ax
            + (6.0 * b + 30.0 * c) * ax * ax
            + (-12.0 * b - 48.0 * c) * ax
            + (8.0 * b + 24.0 * c)
    } else {
        0.0
    };
    k / 6.0
}

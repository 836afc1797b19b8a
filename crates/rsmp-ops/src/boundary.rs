//! Boundary handling for source samples outside the image.
//!
//! When a filter reaches past the edge of the source, a [`Boundary`] decides
//! which in-range sample stands in for the missing one, or whether the
//! contribution is dropped altogether.
//!
//! - [`Boundary::Clamp`] - repeat the edge sample
//! - [`Boundary::Reject`] - drop the sample; the filter table renormalizes the
//!   remaining weights
//! - [`Boundary::Reflect`] - mirror across the edge
//!
//! ```rust
//! use rsmp_ops::Boundary;
//!
//! assert_eq!(Boundary::Clamp.map(-2, 0, 9), Some(0));
//! assert_eq!(Boundary::Reject.map(-2, 0, 9), None);
//! assert_eq!(Boundary::Reflect.map(-2, 0, 9), Some(2));
//! assert_eq!(Boundary::Reflect.map(11, 0, 9), Some(7));
//! ```

use crate::{ResampleError, ResampleResult};
use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signature of a user supplied boundary policy: `(index, min, max)` to the
/// replacement index, or `None` to drop the sample.
pub type BoundaryFn = fn(i64, i64, i64) -> Option<i64>;

/// Names accepted by [`Boundary::from_name`].
pub const BOUNDARY_NAMES: &[&str] = &["clamp", "reject", "reflect"];

/// Maps out-of-range source indices back into `[min, max]`.
#[derive(Debug, Clone, Copy, Default)]
pub enum Boundary {
    /// Saturate to the nearest edge.
    Clamp,
    /// Drop samples outside the range.
    #[default]
    Reject,
    /// Mirror: `2*min - x` below the range, `2*max - x` above.
    Reflect,
    /// User supplied mapping.
    Custom(BoundaryFn),
}

impl Boundary {
    /// Maps `x` for the valid range `[min, max]`.
    ///
    /// The result may still fall outside the range (a reflection of an index
    /// far beyond the edge); callers drop such samples.
    #[inline]
    pub fn map(&self, x: i64, min: i64, max: i64) -> Option<i64> {
        match self {
            Boundary::Clamp => Some(x.clamp(min, max)),
            Boundary::Reject => (min..=max).contains(&x).then_some(x),
            Boundary::Reflect => Some(if x < min {
                2 * min - x
            } else if x > max {
                2 * max - x
            } else {
                x
            }),
            Boundary::Custom(f) => f(x, min, max),
        }
    }

    /// Looks up a preset policy by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Boundary> {
        match name.to_ascii_lowercase().as_str() {
            "clamp" | "edge" => Some(Boundary::Clamp),
            "reject" | "drop" => Some(Boundary::Reject),
            "reflect" | "mirror" => Some(Boundary::Reflect),
            _ => None,
        }
    }

    /// Name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            Boundary::Clamp => "clamp",
            Boundary::Reject => "reject",
            Boundary::Reflect => "reflect",
            Boundary::Custom(_) => "custom",
        }
    }

    /// Checks that the policy leaves in-range indices alone.
    ///
    /// Presets always pass. A custom policy must map both ends of a range
    /// onto themselves, for a single-sample range as well as a wider one.
    ///
    /// # Errors
    ///
    /// [`ResampleError::BoundaryInvalid`] if a custom policy moves or rejects
    /// an in-range index.
    pub fn validate(&self) -> ResampleResult<()> {
        let Boundary::Custom(f) = self else {
            return Ok(());
        };
        for (min, max) in [(0, 0), (0, 7)] {
            for x in [min, max] {
                let got = f(x, min, max);
                if got != Some(x) {
                    return Err(ResampleError::BoundaryInvalid(format!(
                        "custom policy maps in-range index {} of [{}, {}] to {:?}",
                        x, min, max, got
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Boundary {
    type Err = ResampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Boundary::from_name(s).ok_or_else(|| {
            ResampleError::BoundaryInvalid(format!(
                "unknown boundary policy '{}', expected one of: {}",
                s,
                BOUNDARY_NAMES.join(", ")
            ))
        })
    }
}

impl Serialize for Boundary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Boundary::Custom(_) = self {
            return Err(ser::Error::custom("custom boundary policies can't be serialized"));
        }
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Boundary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Boundary::from_name(&name).ok_or_else(|| de::Error::unknown_variant(&name, BOUNDARY_NAMES))
    }
}

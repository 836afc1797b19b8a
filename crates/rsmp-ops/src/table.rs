//! Discrete filter tables.
//!
//! A [`FilterTable`] replaces kernel evaluation during convolution: for every
//! destination coordinate along one axis it lists the source indices that
//! contribute and their weights. It is built once per axis per request.
//!
//! # Coordinate mapping
//!
//! Destination and source endpoints are anchored to each other: destination
//! `0` maps to source `0` and destination `ndst - 1` to source `nsrc - 1`, so
//! `center(i) = i * (nsrc - 1) / (ndst - 1)`. A single destination sample maps
//! to the middle of the source, and a single source sample feeds every
//! destination sample.
//!
//! When downsampling the kernel is stretched by the reduction factor so it
//! acts as a low-pass filter over every source sample it covers.
//!
//! # Normalization
//!
//! Weights of each entry are divided by their sum, so every entry sums to 1
//! whatever the boundary policy rejected. A uniform source stays uniform.
//!
//! ```rust
//! use rsmp_ops::{Boundary, FilterTable, Kernel};
//!
//! let table = FilterTable::build(&Kernel::TRIANGLE, Boundary::Reject, 5, 3);
//! assert_eq!(table.len(), 5);
//! // Destination 1 sits halfway between source 0 and 1.
//! let taps = table.taps(1);
//! assert_eq!(taps.len(), 2);
//! assert!((taps[0].weight - 0.5).abs() < 1e-6);
//! ```

use crate::{Boundary, Kernel};

/// Slack added around the support when enumerating candidate indices.
const SUPPORT_EPSILON: f64 = 1e-8;

/// Weight sums below this are treated as zero.
const MIN_WEIGHT_SUM: f64 = 1e-12;

/// One source contribution to a destination sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Source index along the filtered axis
    pub index: usize,
    /// Normalized weight
    pub weight: f32,
}

/// Per-destination lists of weighted source indices for one axis.
///
/// Entries are stored back to back in one vector; `starts[i]..starts[i + 1]`
/// is the range of entry `i`.
#[derive(Debug, Clone, Default)]
pub struct FilterTable {
    taps: Vec<Tap>,
    starts: Vec<usize>,
    src_len: usize,
}

impl FilterTable {
    /// Builds the table mapping `nsrc` source samples onto `ndst` destination
    /// samples.
    ///
    /// With `nsrc == 0` there is nothing to sample and every entry is empty.
    pub fn build(kernel: &Kernel, boundary: Boundary, ndst: usize, nsrc: usize) -> FilterTable {
        let mut starts = Vec::with_capacity(ndst + 1);
        starts.push(0);
        if nsrc == 0 {
            starts.resize(ndst + 1, 0);
            return FilterTable {
                taps: Vec::new(),
                starts,
                src_len: 0,
            };
        }

        let mapping = AxisMapping::new(ndst, nsrc);
        let (support, fscale) = if mapping.dst2src < 1.0 {
            (kernel.support() / mapping.dst2src, mapping.dst2src)
        } else {
            (kernel.support(), 1.0)
        };
        let max_index = (nsrc - 1) as i64;

        let mut taps = Vec::new();
        let mut raw: Vec<(usize, f64)> = Vec::new();
        for i in 0..ndst {
            let center = mapping.center(i);
            let lo = (center - support - SUPPORT_EPSILON).floor() as i64;
            let hi = (center + support + SUPPORT_EPSILON).ceil() as i64;

            raw.clear();
            for j in lo..=hi {
                let Some(k) = boundary.map(j, 0, max_index) else {
                    continue;
                };
                if !(0..=max_index).contains(&k) {
                    continue;
                }
                let w = kernel.apply(fscale * (j as f64 - center)) * fscale;
                if w != 0.0 && w.is_finite() {
                    raw.push((k as usize, w));
                }
            }

            let sum: f64 = raw.iter().map(|&(_, w)| w).sum();
            if sum.is_finite() && sum.abs() > MIN_WEIGHT_SUM {
                taps.extend(raw.iter().map(|&(index, w)| Tap {
                    index,
                    weight: (w / sum) as f32,
                }));
            } else {
                // Nothing usable survived: take the nearest sample.
                let nearest = center.round().clamp(0.0, max_index as f64) as usize;
                taps.push(Tap {
                    index: nearest,
                    weight: 1.0,
                });
            }
            starts.push(taps.len());
        }

        FilterTable {
            taps,
            starts,
            src_len: nsrc,
        }
    }

    /// Number of destination samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.starts.len().saturating_sub(1)
    }

    /// Returns `true` if the table has no destination samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of source samples the table reads from.
    #[inline]
    pub fn src_len(&self) -> usize {
        self.src_len
    }

    /// Contributions to destination sample `i`.
    #[inline]
    pub fn taps(&self, i: usize) -> &[Tap] {
        &self.taps[self.starts[i]..self.starts[i + 1]]
    }

    /// Iterates the entries in destination order.
    pub fn entries(&self) -> impl Iterator<Item = &[Tap]> + '_ {
        self.starts.windows(2).map(|w| &self.taps[w[0]..w[1]])
    }

    /// Total number of multiply-accumulates one line costs.
    #[inline]
    pub fn ops(&self) -> u64 {
        self.taps.len() as u64
    }
}

/// Destination-to-source coordinate mapping of one axis.
#[derive(Debug, Clone, Copy)]
struct AxisMapping {
    dst2src: f64,
    anchored: bool,
    single_center: f64,
}

impl AxisMapping {
    fn new(ndst: usize, nsrc: usize) -> Self {
        let anchored = ndst > 1 && nsrc > 1;
        let dst2src = if anchored {
            (ndst - 1) as f64 / (nsrc - 1) as f64
        } else {
            // One side is a single sample: no endpoints to anchor.
            ndst as f64 / nsrc as f64
        };
        let single_center = if ndst == 1 { (nsrc - 1) as f64 * 0.5 } else { 0.0 };
        Self {
            dst2src,
            anchored,
            single_center,
        }
    }

    #[inline]
    fn center(&self, i: usize) -> f64 {
        if self.anchored {
            i as f64 / self.dst2src
        } else {
            self.single_center
        }
    }
}

//! One-dimensional convolution along either axis.
//!
//! [`convolve_axis`] resamples a source along one [`Axis`] with a
//! [`FilterTable`], leaving the other dimension unchanged. Both axes share
//! the same routine: a line is either a row (filtering along X) or a column
//! (filtering along Y), and only the addressing of a line's pixels differs.
//!
//! For each line the source pixels are first gathered into a contiguous
//! scratch line of float samples, then every destination sample accumulates
//! its taps, and the finished line is converted back to 16 bits with
//! saturation.
//!
//! With the `parallel` feature, lines can be computed in batches on the rayon
//! pool. Lines are still written and reported in order, so the output and the
//! progress sequence match the sequential path exactly.

use crate::{FilterTable, ResampleError, ResampleResult};
use rsmp_core::pixel::{CHANNELS, Rgba};
use rsmp_core::{PixelBuffer, PixelSource};
use std::ops::ControlFlow;

/// Lines handed to each pool thread per batch.
#[cfg(feature = "parallel")]
const LINES_PER_THREAD: usize = 4;

/// Axis a pass filters along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal: lines are rows, the width changes.
    X,
    /// Vertical: lines are columns, the height changes.
    Y,
}

impl Axis {
    /// Pixel coordinates of position `pos` on line `line`.
    #[inline]
    pub fn coords(self, line: usize, pos: usize) -> (usize, usize) {
        match self {
            Axis::X => (pos, line),
            Axis::Y => (line, pos),
        }
    }

    /// `(line count, line length)` of a `width x height` grid.
    #[inline]
    pub fn lines(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Axis::X => (height, width),
            Axis::Y => (width, height),
        }
    }

    /// Dimensions after resampling a `width x height` grid to `len` samples
    /// along this axis.
    #[inline]
    pub fn resized(self, width: usize, height: usize, len: usize) -> (usize, usize) {
        match self {
            Axis::X => (len, height),
            Axis::Y => (width, len),
        }
    }

    /// First sample index and sample stride of line `line` in `buf`.
    #[inline]
    fn layout(self, buf: &PixelBuffer, line: usize) -> (usize, usize) {
        match self {
            Axis::X => (buf.offset(0, line), CHANNELS),
            Axis::Y => (buf.offset(line, 0), buf.width() * CHANNELS),
        }
    }
}

/// Reads line `line` of `src` into `out`.
pub fn fetch_line<S>(axis: Axis, src: &S, line: usize, out: &mut [Rgba])
where
    S: PixelSource + ?Sized,
{
    match src.as_buffer() {
        Some(buf) => {
            let (start, stride) = axis.layout(buf, line);
            let raw = buf.as_raw();
            for (pos, px) in out.iter_mut().enumerate() {
                let i = start + pos * stride;
                *px = Rgba::from_u16([raw[i], raw[i + 1], raw[i + 2], raw[i + 3]]);
            }
        }
        None => {
            for (pos, px) in out.iter_mut().enumerate() {
                let (x, y) = axis.coords(line, pos);
                *px = src.sample(x, y);
            }
        }
    }
}

/// Writes `values` to line `line` of `dst`, saturating each channel.
pub fn put_line(axis: Axis, dst: &mut PixelBuffer, line: usize, values: &[Rgba]) {
    let (start, stride) = axis.layout(dst, line);
    let raw = dst.as_raw_mut();
    for (pos, px) in values.iter().enumerate() {
        let i = start + pos * stride;
        raw[i..i + CHANNELS].copy_from_slice(&px.to_u16());
    }
}

/// Filters one gathered source line into `out` (one sample per table entry).
#[inline]
pub fn convolve_line(table: &FilterTable, src: &[Rgba], out: &mut [Rgba]) {
    for (i, px) in out.iter_mut().enumerate() {
        let mut acc = Rgba::ZERO;
        for tap in table.taps(i) {
            acc.add_weighted(src[tap.index], tap.weight);
        }
        *px = acc;
    }
}

/// Resamples `src` along `axis` into `dst`.
///
/// `dst` must already have the resampled dimensions: `table.len()` samples
/// along `axis`, the source size along the other axis. `on_line` is called
/// with the number of multiply-accumulates of every finished line, in line
/// order; returning [`ControlFlow::Break`] stops the pass.
///
/// # Errors
///
/// [`ResampleError::SourceInvalid`] if the table was built for another
/// source length, [`ResampleError::TargetSizeInvalid`] if `dst` doesn't have
/// the resampled dimensions.
pub fn convolve_axis<S, F>(
    axis: Axis,
    src: &S,
    dst: &mut PixelBuffer,
    table: &FilterTable,
    parallel: bool,
    mut on_line: F,
) -> ResampleResult<ControlFlow<()>>
where
    S: PixelSource + Sync + ?Sized,
    F: FnMut(u64) -> ControlFlow<()>,
{
    let (lines, src_len) = axis.lines(src.width(), src.height());
    let dst_len = table.len();
    if table.src_len() != src_len {
        return Err(ResampleError::SourceInvalid(format!(
            "{:?} table expects {} samples per line, source has {}",
            axis,
            table.src_len(),
            src_len
        )));
    }
    let expected = axis.resized(src.width(), src.height(), dst_len);
    if dst.dimensions() != expected {
        return Err(ResampleError::TargetSizeInvalid(format!(
            "{:?} pass writes {}x{}, destination is {}x{}",
            axis,
            expected.0,
            expected.1,
            dst.width(),
            dst.height()
        )));
    }
    if lines == 0 || dst_len == 0 {
        return Ok(ControlFlow::Continue(()));
    }

    let ops_per_line = table.ops();
    let batch = batch_size(parallel).min(lines);
    let mut scratch = vec![Rgba::ZERO; src_len];
    let mut out = vec![Rgba::ZERO; batch * dst_len];

    let mut first = 0;
    while first < lines {
        let n = batch.min(lines - first);
        let out = &mut out[..n * dst_len];
        compute_lines(axis, src, table, first, out, &mut scratch, parallel);
        for (k, values) in out.chunks_exact(dst_len).enumerate() {
            put_line(axis, dst, first + k, values);
            if on_line(ops_per_line).is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        first += n;
    }
    Ok(ControlFlow::Continue(()))
}

fn compute_lines_seq<S>(
    axis: Axis,
    src: &S,
    table: &FilterTable,
    first: usize,
    out: &mut [Rgba],
    scratch: &mut [Rgba],
) where
    S: PixelSource + ?Sized,
{
    for (k, values) in out.chunks_exact_mut(table.len()).enumerate() {
        fetch_line(axis, src, first + k, scratch);
        convolve_line(table, scratch, values);
    }
}

#[cfg(feature = "parallel")]
fn compute_lines<S>(
    axis: Axis,
    src: &S,
    table: &FilterTable,
    first: usize,
    out: &mut [Rgba],
    scratch: &mut [Rgba],
    parallel: bool,
) where
    S: PixelSource + Sync + ?Sized,
{
    use rayon::prelude::*;

    if !parallel || out.len() == table.len() {
        compute_lines_seq(axis, src, table, first, out, scratch);
        return;
    }
    let src_len = scratch.len();
    out.par_chunks_mut(table.len())
        .enumerate()
        .for_each_init(
            || vec![Rgba::ZERO; src_len],
            |line_buf, (k, values)| {
                fetch_line(axis, src, first + k, line_buf);
                convolve_line(table, line_buf, values);
            },
        );
}

#[cfg(not(feature = "parallel"))]
fn compute_lines<S>(
    axis: Axis,
    src: &S,
    table: &FilterTable,
    first: usize,
    out: &mut [Rgba],
    scratch: &mut [Rgba],
    _parallel: bool,
) where
    S: PixelSource + Sync + ?Sized,
{
    compute_lines_seq(axis, src, table, first, out, scratch);
}

#[cfg(feature = "parallel")]
fn batch_size(parallel: bool) -> usize {
    if parallel {
        rayon::current_num_threads().max(1) * LINES_PER_THREAD
    } else {
        1
    }
}

#[cfg(not(feature = "parallel"))]
fn batch_size(_parallel: bool) -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Boundary, Kernel};

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |x, y| {
            [(x * 1000) as u16, (y * 1000) as u16, ((x + y) * 500) as u16, 65535]
        })
    }

    /// A source without the packed fast path.
    struct Slow(PixelBuffer);

    impl PixelSource for Slow {
        fn width(&self) -> usize {
            self.0.width()
        }
        fn height(&self) -> usize {
            self.0.height()
        }
        fn sample(&self, x: usize, y: usize) -> Rgba {
            self.0.sample(x, y)
        }
    }

    #[test]
    fn test_fetch_put_roundtrip_both_axes() {
        let img = gradient(5, 3);
        for axis in [Axis::X, Axis::Y] {
            let (lines, len) = axis.lines(5, 3);
            let mut copy = PixelBuffer::new(5, 3);
            let mut line = vec![Rgba::ZERO; len];
            for l in 0..lines {
                fetch_line(axis, &img, l, &mut line);
                put_line(axis, &mut copy, l, &line);
            }
            assert_eq!(copy, img, "{:?}", axis);
        }
    }

    #[test]
    fn test_fast_path_matches_sample_path() {
        let img = gradient(7, 4);
        let slow = Slow(img.clone());
        for axis in [Axis::X, Axis::Y] {
            let (_, len) = axis.lines(7, 4);
            let mut a = vec![Rgba::ZERO; len];
            let mut b = vec![Rgba::ZERO; len];
            fetch_line(axis, &img, 2, &mut a);
            fetch_line(axis, &slow, 2, &mut b);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_identity_pass() {
        let img = gradient(6, 4);
        let table = FilterTable::build(&Kernel::LANCZOS3, Boundary::Reject, 6, 6);
        let mut dst = PixelBuffer::new(6, 4);
        let flow = convolve_axis(Axis::X, &img, &mut dst, &table, false, |_| {
            ControlFlow::Continue(())
        }).unwrap();
        assert!(flow.is_continue());
        assert_eq!(dst, img);
    }

    #[test]
    fn test_axes_are_symmetric() {
        // Filtering columns of an image equals filtering rows of its transpose.
        let img = gradient(9, 5);
        let transposed = PixelBuffer::from_fn(5, 9, |x, y| img.pixel(y, x));
        let table = FilterTable::build(&Kernel::CATMULL_ROM, Boundary::Reflect, 13, 5);

        let mut by_y = PixelBuffer::new(9, 13);
        convolve_axis(Axis::Y, &img, &mut by_y, &table, false, |_| {
            ControlFlow::Continue(())
        }).unwrap();
        let mut by_x = PixelBuffer::new(13, 9);
        convolve_axis(Axis::X, &transposed, &mut by_x, &table, false, |_| {
            ControlFlow::Continue(())
        }).unwrap();

        for y in 0..13 {
            for x in 0..9 {
                assert_eq!(by_y.pixel(x, y), by_x.pixel(y, x));
            }
        }
    }

    #[test]
    fn test_progress_per_line_and_break() {
        let img = gradient(8, 6);
        let table = FilterTable::build(&Kernel::TRIANGLE, Boundary::Clamp, 4, 8);
        let mut dst = PixelBuffer::new(4, 6);

        let mut seen = Vec::new();
        convolve_axis(Axis::X, &img, &mut dst, &table, false, |ops| {
            seen.push(ops);
            ControlFlow::Continue(())
        }).unwrap();
        assert_eq!(seen, vec![table.ops(); 6]);

        let mut calls = 0;
        let flow = convolve_axis(Axis::X, &img, &mut dst, &table, false, |_| {
            calls += 1;
            if calls == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        }).unwrap();
        assert!(flow.is_break());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_mismatched_sizes_are_errors() {
        let img = gradient(8, 6);
        let table = FilterTable::build(&Kernel::TRIANGLE, Boundary::Clamp, 4, 8);
        let keep_going = |_: u64| -> ControlFlow<()> { ControlFlow::Continue(()) };

        let mut dst = PixelBuffer::new(4, 6);
        let err = convolve_axis(Axis::Y, &img, &mut dst, &table, false, keep_going).unwrap_err();
        assert!(matches!(err, ResampleError::SourceInvalid(_)));

        let mut wrong = PixelBuffer::new(5, 6);
        let err = convolve_axis(Axis::X, &img, &mut wrong, &table, false, keep_going).unwrap_err();
        assert!(matches!(err, ResampleError::TargetSizeInvalid(_)));
        assert_eq!(wrong, PixelBuffer::new(5, 6));
    }

    #[test]
    fn test_overshoot_saturates() {
        // A hard edge through Lanczos rings above 1 and below 0.
        let img = PixelBuffer::from_fn(8, 1, |x, _| {
            if x < 4 { [0, 0, 0, 0] } else { [65535; 4] }
        });
        let table = FilterTable::build(&Kernel::LANCZOS3, Boundary::Clamp, 29, 8);
        let mut dst = PixelBuffer::new(29, 1);
        convolve_axis(Axis::X, &img, &mut dst, &table, false, |_| {
            ControlFlow::Continue(())
        }).unwrap();
        assert_eq!(dst.pixel(0, 0), [0; 4]);
        assert_eq!(dst.pixel(28, 0), [65535; 4]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let img = gradient(37, 23);
        let table = FilterTable::build(&Kernel::LANCZOS3, Boundary::Reflect, 11, 23);

        let mut seq = PixelBuffer::new(37, 11);
        let mut seq_ops = Vec::new();
        convolve_axis(Axis::Y, &img, &mut seq, &table, false, |ops| {
            seq_ops.push(ops);
            ControlFlow::Continue(())
        }).unwrap();

        let mut par = PixelBuffer::new(37, 11);
        let mut par_ops = Vec::new();
        convolve_axis(Axis::Y, &img, &mut par, &table, true, |ops| {
            par_ops.push(ops);
            ControlFlow::Continue(())
        }).unwrap();

        assert_eq!(seq, par);
        assert_eq!(seq_ops, par_ops);
    }
}

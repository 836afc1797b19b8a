//! Resize planning: filter tables and pass order.
//!
//! A separable resize runs two one-dimensional passes through one
//! intermediate buffer. Either axis can go first, and the cost differs:
//!
//! ```text
//! cost(Y then X) = y_ops * src_width  + x_ops * dst_height
//! cost(X then Y) = x_ops * src_height + y_ops * dst_width
//! ```
//!
//! where `x_ops` and `y_ops` are the multiply-accumulates of one line of each
//! table. [`ResizePlan`] builds both tables, evaluates both costs and keeps the
//! cheaper order (Y first on a tie).
//!
//! ```rust
//! use rsmp_ops::{Boundary, Kernel, PassOrder, ResizePlan, Size};
//!
//! // Wide and short: shrinking the rows first leaves little for the columns.
//! let plan = ResizePlan::new(
//!     Size::new(4000, 10),
//!     Size::new(100, 10),
//!     &Kernel::LANCZOS3,
//!     Boundary::Reject,
//!     Boundary::Reject,
//! );
//! assert_eq!(plan.order(), PassOrder::XThenY);
//! assert!(plan.cost(PassOrder::XThenY) < plan.cost(PassOrder::YThenX));
//! ```

use crate::convolve::{Axis, convolve_axis};
use crate::{Boundary, FilterTable, Kernel, ResampleError, ResampleResult};
use rsmp_core::pixel::CHANNELS;
use rsmp_core::{PixelBuffer, PixelSource};
use std::fmt;
use std::ops::ControlFlow;
use tracing::debug;

/// Width and height of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl Size {
    /// Creates a size.
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Size of a source.
    #[inline]
    pub fn of<S: PixelSource + ?Sized>(src: &S) -> Self {
        Self::new(src.width(), src.height())
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of `u16` samples an RGBA16 buffer of this size holds, if it
    /// fits in `usize`.
    #[inline]
    pub fn sample_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)?.checked_mul(CHANNELS)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(usize, usize)> for Size {
    fn from((width, height): (usize, usize)) -> Self {
        Self::new(width, height)
    }
}

impl TryFrom<(i64, i64)> for Size {
    type Error = ResampleError;

    /// Converts signed dimensions, rejecting negative ones.
    fn try_from((width, height): (i64, i64)) -> ResampleResult<Self> {
        let convert = |v: i64| usize::try_from(v).ok();
        match (convert(width), convert(height)) {
            (Some(w), Some(h)) => Ok(Self::new(w, h)),
            _ => Err(ResampleError::TargetSizeInvalid(format!(
                "{}x{} has a negative dimension",
                width, height
            ))),
        }
    }
}

/// Order of the two convolution passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassOrder {
    /// Columns first, intermediate is `src_width x dst_height`.
    YThenX,
    /// Rows first, intermediate is `dst_width x src_height`.
    XThenY,
}

impl PassOrder {
    /// Axes in execution order.
    #[inline]
    pub fn axes(self) -> [Axis; 2] {
        match self {
            PassOrder::YThenX => [Axis::Y, Axis::X],
            PassOrder::XThenY => [Axis::X, Axis::Y],
        }
    }
}

/// Filter tables and pass order for one resize request.
#[derive(Debug, Clone)]
pub struct ResizePlan {
    src: Size,
    dst: Size,
    x_table: FilterTable,
    y_table: FilterTable,
    order: PassOrder,
}

impl ResizePlan {
    /// Builds both filter tables and picks the cheaper pass order.
    pub fn new(src: Size, dst: Size, kernel: &Kernel, x_boundary: Boundary, y_boundary: Boundary) -> Self {
        let x_table = FilterTable::build(kernel, x_boundary, dst.width, src.width);
        let y_table = FilterTable::build(kernel, y_boundary, dst.height, src.height);
        let mut plan = Self {
            src,
            dst,
            x_table,
            y_table,
            order: PassOrder::YThenX,
        };
        let y_first = plan.cost(PassOrder::YThenX);
        let x_first = plan.cost(PassOrder::XThenY);
        if x_first < y_first {
            plan.order = PassOrder::XThenY;
        }
        debug!(
            src = %src,
            dst = %dst,
            x_ops = plan.x_ops(),
            y_ops = plan.y_ops(),
            cost_y_then_x = y_first,
            cost_x_then_y = x_first,
            order = ?plan.order,
            "Planned resize"
        );
        plan
    }

    /// Source size.
    #[inline]
    pub fn src(&self) -> Size {
        self.src
    }

    /// Destination size.
    #[inline]
    pub fn dst(&self) -> Size {
        self.dst
    }

    /// Table of the horizontal pass.
    #[inline]
    pub fn x_table(&self) -> &FilterTable {
        &self.x_table
    }

    /// Table of the vertical pass.
    #[inline]
    pub fn y_table(&self) -> &FilterTable {
        &self.y_table
    }

    /// Multiply-accumulates per row of the horizontal pass.
    #[inline]
    pub fn x_ops(&self) -> u64 {
        self.x_table.ops()
    }

    /// Multiply-accumulates per column of the vertical pass.
    #[inline]
    pub fn y_ops(&self) -> u64 {
        self.y_table.ops()
    }

    /// The chosen pass order.
    #[inline]
    pub fn order(&self) -> PassOrder {
        self.order
    }

    /// Estimated multiply-accumulates of running the passes in `order`.
    pub fn cost(&self, order: PassOrder) -> u64 {
        let (x_ops, y_ops) = (self.x_ops(), self.y_ops());
        match order {
            PassOrder::YThenX => y_ops
                .saturating_mul(self.src.width as u64)
                .saturating_add(x_ops.saturating_mul(self.dst.height as u64)),
            PassOrder::XThenY => x_ops
                .saturating_mul(self.src.height as u64)
                .saturating_add(y_ops.saturating_mul(self.dst.width as u64)),
        }
    }

    /// Estimated multiply-accumulates of the chosen order.
    #[inline]
    pub fn estimated_total(&self) -> u64 {
        self.cost(self.order)
    }

    /// Size of the buffer between the two passes.
    pub fn intermediate(&self) -> Size {
        match self.order {
            PassOrder::YThenX => Size::new(self.src.width, self.dst.height),
            PassOrder::XThenY => Size::new(self.dst.width, self.src.height),
        }
    }

    /// Runs both passes over `src`.
    ///
    /// Each table is dropped as soon as its pass completes. `on_line`
    /// receives the cost of every finished line; a
    /// [`ControlFlow::Break`] abandons the request and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// [`ResampleError::SourceInvalid`] if `src` isn't the size the plan was
    /// made for, [`ResampleError::AllocationFailed`] if the intermediate or
    /// destination buffer can't be allocated.
    pub fn execute<S, F>(self, src: &S, parallel: bool, mut on_line: F) -> ResampleResult<Option<PixelBuffer>>
    where
        S: PixelSource + Sync + ?Sized,
        F: FnMut(u64) -> ControlFlow<()>,
    {
        let actual = Size::of(src);
        if actual != self.src {
            return Err(ResampleError::SourceInvalid(format!(
                "plan is for a {} source, got {}",
                self.src, actual
            )));
        }
        let mid = self.intermediate();
        let [first_axis, second_axis] = self.order.axes();
        let ResizePlan {
            dst,
            x_table,
            y_table,
            order,
            ..
        } = self;
        let (first, second) = match order {
            PassOrder::YThenX => (y_table, x_table),
            PassOrder::XThenY => (x_table, y_table),
        };

        let mut tmp = PixelBuffer::try_new(mid.width, mid.height)?;
        if convolve_axis(first_axis, src, &mut tmp, &first, parallel, &mut on_line)?.is_break() {
            return Ok(None);
        }
        drop(first);

        let mut out = PixelBuffer::try_new(dst.width, dst.height)?;
        if convolve_axis(second_axis, &tmp, &mut out, &second, parallel, &mut on_line)?.is_break() {
            return Ok(None);
        }
        Ok(Some(out))
    }
}

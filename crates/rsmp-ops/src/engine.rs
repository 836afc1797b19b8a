//! Resize entry points.
//!
//! - [`resize`] / [`resize_with`] - blocking, on the calling thread
//! - [`resize_progressive`] / [`resize_progressive_with`] - on a worker
//!   thread, delivering [`Step`]s through a [`ResizeJob`]
//! - [`resample_into`] - blocking, into a caller-provided buffer
//!
//! Every entry point validates its inputs before any table is built. A
//! target with a zero dimension is not an error: it yields an empty buffer
//! immediately, without a worker.

use crate::plan::{ResizePlan, Size};
use crate::progress::{JobOutcome, Reporter, ResizeJob, Step};
use crate::{Boundary, Kernel, ResampleError, ResampleResult, ResizeOptions};
use crossbeam_channel::{Sender, bounded};
use rsmp_core::{PixelBuffer, PixelSource};
use std::any::Any;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tracing::{debug, warn};

/// Resizes `source` to `target` with Lanczos3 and rejected boundaries.
///
/// # Errors
///
/// See [`resize_with`].
///
/// # Example
///
/// ```rust
/// use rsmp_core::PixelBuffer;
/// use rsmp_ops::{resize, Size};
///
/// let src = PixelBuffer::filled(32, 32, [65535, 0, 0, 65535]);
/// let out = resize(Size::new(64, 48), &src).unwrap();
/// assert_eq!(out.dimensions(), (64, 48));
/// assert_eq!(out.pixel(10, 10), [65535, 0, 0, 65535]);
/// ```
pub fn resize<S>(target: Size, source: S) -> ResampleResult<PixelBuffer>
where
    S: PixelSource + Sync,
{
    resize_with(target, source, &ResizeOptions::default())
}

/// Resizes `source` to `target` on the calling thread.
///
/// # Errors
///
/// - Validation errors, see [`validate_request`]
/// - [`ResampleError::AllocationFailed`] if a working buffer can't be allocated
pub fn resize_with<S>(target: Size, source: S, options: &ResizeOptions) -> ResampleResult<PixelBuffer>
where
    S: PixelSource + Sync,
{
    if let Some(empty) = validate_request(target, &source, options)? {
        return Ok(empty);
    }
    let plan = ResizePlan::new(
        Size::of(&source),
        target,
        &options.kernel,
        options.x_boundary,
        options.y_boundary,
    );
    plan.execute(&source, options.parallel, |_| ControlFlow::Continue(()))?
        .ok_or(ResampleError::Cancelled)
}

/// Resamples `source` into `dst`, keeping the dimensions of `dst`.
///
/// # Errors
///
/// See [`resize_with`].
///
/// ```rust
/// use rsmp_core::PixelBuffer;
/// use rsmp_ops::{resample_into, Boundary, Kernel};
///
/// let src = PixelBuffer::filled(10, 10, [1, 2, 3, 4]);
/// let mut dst = PixelBuffer::new(3, 5);
/// resample_into(&mut dst, &src, Kernel::TRIANGLE, Boundary::Clamp, Boundary::Clamp).unwrap();
/// assert_eq!(dst.pixel(2, 4), [1, 2, 3, 4]);
/// ```
pub fn resample_into<S>(
    dst: &mut PixelBuffer,
    source: S,
    kernel: Kernel,
    x_boundary: Boundary,
    y_boundary: Boundary,
) -> ResampleResult<()>
where
    S: PixelSource + Sync,
{
    let options = ResizeOptions::default()
        .with_kernel(kernel)
        .with_boundaries(x_boundary, y_boundary);
    let (width, height) = dst.dimensions();
    *dst = resize_with(Size::new(width, height), source, &options)?;
    Ok(())
}

/// Starts a progressive resize with the default quantum.
///
/// # Errors
///
/// See [`resize_progressive_with`].
pub fn resize_progressive<S>(
    target: Size,
    source: S,
    kernel: Kernel,
    x_boundary: Boundary,
    y_boundary: Boundary,
) -> ResampleResult<ResizeJob>
where
    S: PixelSource + Send + Sync + 'static,
{
    let options = ResizeOptions::default()
        .with_kernel(kernel)
        .with_boundaries(x_boundary, y_boundary);
    resize_progressive_with(target, source, options)
}

/// Starts a progressive resize on a worker thread.
///
/// The worker first reports a progress step with nothing completed, then one
/// whenever another `options.quantum` multiply-accumulates have finished, and
/// finally [`Step::Done`]. Any failure while computing becomes a
/// [`Step::Failed`]. A zero-sized target returns a job that yields an empty
/// [`Step::Done`] right away, without spawning a worker.
///
/// # Errors
///
/// - Validation errors, see [`validate_request`]
/// - [`ResampleError::Worker`] if the thread can't be spawned
pub fn resize_progressive_with<S>(target: Size, source: S, options: ResizeOptions) -> ResampleResult<ResizeJob>
where
    S: PixelSource + Send + Sync + 'static,
{
    if let Some(empty) = validate_request(target, &source, &options)? {
        return Ok(ResizeJob::ready(Step::Done(empty)));
    }

    let (tx, rx) = bounded(0);
    let worker = thread::Builder::new()
        .name("rsmp-resize".into())
        .spawn(move || run_worker(target, source, options, tx))
        .map_err(|e| ResampleError::Worker(format!("failed to spawn worker: {e}")))?;
    Ok(ResizeJob::spawned(rx, worker))
}

/// Checks a request before any work starts.
///
/// Returns `Some(empty buffer)` when the target has a zero dimension and
/// there is nothing to compute.
///
/// # Errors
///
/// - [`ResampleError::FilterInvalid`] for an unusable kernel
/// - [`ResampleError::BoundaryInvalid`] for a misbehaving custom policy
/// - [`ResampleError::TargetSizeInvalid`] if the target can't be allocated
/// - [`ResampleError::SourceInvalid`] for an empty source and a non-empty target
pub fn validate_request<S>(target: Size, source: &S, options: &ResizeOptions) -> ResampleResult<Option<PixelBuffer>>
where
    S: PixelSource + ?Sized,
{
    options.validate()?;
    if target.sample_count().is_none() {
        return Err(ResampleError::TargetSizeInvalid(format!(
            "{} overflows the addressable sample count",
            target
        )));
    }
    if target.is_empty() {
        debug!(dst = %target, "Empty resize target, nothing to compute");
        return Ok(Some(PixelBuffer::empty(target.width, target.height)));
    }
    let src = Size::of(source);
    if src.is_empty() {
        return Err(ResampleError::SourceInvalid(format!(
            "source {} has no pixels",
            src
        )));
    }
    if src.sample_count().is_none() {
        return Err(ResampleError::SourceInvalid(format!(
            "source {} overflows the addressable sample count",
            src
        )));
    }
    Ok(None)
}

fn run_worker<S>(target: Size, source: S, options: ResizeOptions, tx: Sender<Step>) -> JobOutcome
where
    S: PixelSource + Sync,
{
    let src = Size::of(&source);
    debug!(
        src = %src,
        dst = %target,
        kernel = %options.kernel,
        x_boundary = %options.x_boundary,
        y_boundary = %options.y_boundary,
        "Resize started"
    );

    let result = panic::catch_unwind(AssertUnwindSafe(|| -> ResampleResult<Option<PixelBuffer>> {
        let plan = ResizePlan::new(
            src,
            target,
            &options.kernel,
            options.x_boundary,
            options.y_boundary,
        );
        let mut reporter = Reporter::new(&tx, plan.estimated_total(), options.quantum);
        if reporter.start().is_break() {
            return Ok(None);
        }
        let out = plan.execute(&source, options.parallel, |ops| reporter.advance(ops))?;
        debug!(kops = reporter.completed() / 1000, "Resize computed");
        Ok(out)
    }));

    match result {
        Ok(Ok(Some(img))) => match tx.send(Step::Done(img)) {
            Ok(()) => JobOutcome::Delivered,
            Err(_) => {
                debug!(dst = %target, "Resize finished after the caller left");
                JobOutcome::Cancelled
            }
        },
        Ok(Ok(None)) => {
            debug!(dst = %target, "Resize abandoned, caller stopped listening");
            JobOutcome::Cancelled
        }
        Ok(Err(err)) => fail(&tx, err),
        Err(payload) => fail(&tx, ResampleError::Worker(panic_message(payload.as_ref()))),
    }
}

fn fail(tx: &Sender<Step>, err: ResampleError) -> JobOutcome {
    warn!(error = %err, "Resize failed");
    // The caller may already be gone; nothing else to tell.
    let _ = tx.send(Step::Failed(err));
    JobOutcome::Failed
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

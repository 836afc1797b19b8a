//! Progressive delivery of a running resize.
//!
//! A progressive resize runs on its own worker thread and hands [`Step`]s to
//! the caller over a rendezvous channel: the worker blocks on every step until
//! the caller takes it. The caller sees zero or more [`Step::Progress`] steps
//! with non-decreasing counts, then exactly one terminal step
//! ([`Step::Done`] or [`Step::Failed`]), then the stream ends.
//!
//! Dropping or [cancelling](ResizeJob::cancel) the [`ResizeJob`] closes the
//! receiving end. The worker notices the next time it tries to report,
//! abandons its buffers and exits without delivering a result.
//!
//! ```rust
//! use rsmp_core::PixelBuffer;
//! use rsmp_ops::{resize_progressive, Boundary, Kernel, Size, Step};
//!
//! let src = PixelBuffer::filled(64, 64, [0, 32768, 65535, 65535]);
//! let job = resize_progressive(
//!     Size::new(16, 16),
//!     src,
//!     Kernel::LANCZOS3,
//!     Boundary::Reject,
//!     Boundary::Reject,
//! )
//! .unwrap();
//!
//! for step in job {
//!     match step {
//!         Step::Progress { .. } => println!("{}%", step.percent()),
//!         Step::Done(img) => assert_eq!(img.dimensions(), (16, 16)),
//!         Step::Failed(e) => panic!("{e}"),
//!     }
//! }
//! ```

use crate::{ResampleError, ResampleResult};
use crossbeam_channel::{Receiver, Sender};
use rsmp_core::PixelBuffer;
use std::ops::ControlFlow;
use std::thread::JoinHandle;
use tracing::{debug, trace};

/// One element of a progressive resize stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Work is ongoing.
    Progress {
        /// Multiply-accumulates finished so far
        completed: u64,
        /// Estimated multiply-accumulates of the whole request
        total: u64,
    },
    /// The request finished; carries the resized buffer.
    Done(PixelBuffer),
    /// The request failed in the background.
    Failed(ResampleError),
}

impl Step {
    /// Returns `true` for [`Step::Done`] and [`Step::Failed`].
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Step::Progress { .. })
    }

    /// Returns `true` for [`Step::Done`].
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }

    /// Completion in percent, `0..=100`. Terminal steps report 100.
    pub fn percent(&self) -> u8 {
        match *self {
            Step::Progress { completed, total } if total > 0 => {
                (completed.min(total) * 100 / total) as u8
            }
            Step::Progress { .. } => 0,
            _ => 100,
        }
    }
}

/// How a worker thread ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The result was handed to the caller.
    Delivered,
    /// The caller went away; no result was delivered.
    Cancelled,
    /// A failure step was produced.
    Failed,
}

/// Handle to a running progressive resize.
///
/// Iterate it to receive [`Step`]s. The iterator ends after the terminal
/// step.
///
/// Dropping the handle detaches the worker without waiting for it. The
/// worker notices at its next step, stops computing and exits without
/// delivering anything. Use [`ResizeJob::cancel`] to wait for that exit.
#[derive(Debug)]
pub struct ResizeJob {
    pending: Option<Step>,
    rx: Option<Receiver<Step>>,
    worker: Option<JoinHandle<JobOutcome>>,
    total: u64,
    finished: bool,
}

impl ResizeJob {
    /// A job whose only step is already known; no worker is involved.
    pub(crate) fn ready(step: Step) -> Self {
        Self {
            pending: Some(step),
            rx: None,
            worker: None,
            total: 0,
            finished: false,
        }
    }

    pub(crate) fn spawned(rx: Receiver<Step>, worker: JoinHandle<JobOutcome>) -> Self {
        Self {
            pending: None,
            rx: Some(rx),
            worker: Some(worker),
            total: 0,
            finished: false,
        }
    }

    /// Returns `true` if the request runs on a worker thread.
    #[inline]
    pub fn has_worker(&self) -> bool {
        self.worker.is_some()
    }

    /// Estimated total of the most recent progress step, `0` before the
    /// first one.
    #[inline]
    pub fn estimated_total(&self) -> u64 {
        self.total
    }

    /// Blocks until the terminal step and returns its result.
    ///
    /// # Errors
    ///
    /// The error of a [`Step::Failed`], or [`ResampleError::Cancelled`] if
    /// the stream ended without a terminal step.
    pub fn wait(mut self) -> ResampleResult<PixelBuffer> {
        for step in self.by_ref() {
            match step {
                Step::Progress { .. } => {}
                Step::Done(img) => return Ok(img),
                Step::Failed(err) => return Err(err),
            }
        }
        Err(ResampleError::Cancelled)
    }

    /// Stops consuming and waits for the worker to exit.
    ///
    /// Returns how the worker ended. A worker that was still computing
    /// reports [`JobOutcome::Cancelled`] and never delivers a result.
    ///
    /// The worker only notices at its next step, so this blocks for up to
    /// one quantum of work (or a whole pass with a very large quantum).
    /// Drop the job instead to return immediately.
    pub fn cancel(mut self) -> JobOutcome {
        self.rx = None;
        self.pending = None;
        let outcome = match self.worker.take() {
            Some(worker) => worker.join().unwrap_or(JobOutcome::Failed),
            None if self.finished => JobOutcome::Delivered,
            None => JobOutcome::Cancelled,
        };
        debug!(?outcome, "Resize job cancelled by caller");
        outcome
    }
}

impl Iterator for ResizeJob {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.finished {
            return None;
        }
        let step = match self.pending.take() {
            Some(step) => step,
            None => match self.rx.as_ref()?.recv() {
                Ok(step) => step,
                Err(_) => {
                    self.finished = true;
                    return None;
                }
            },
        };
        match step {
            Step::Progress { total, .. } => self.total = total,
            _ => {
                self.finished = true;
                self.rx = None;
            }
        }
        Some(step)
    }
}

/// Worker side of the step channel.
///
/// Counts finished multiply-accumulates and emits a progress step once the
/// count has moved at least one quantum past the last emitted step.
pub(crate) struct Reporter<'a> {
    tx: &'a Sender<Step>,
    completed: u64,
    last_emitted: u64,
    total: u64,
    quantum: u64,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(tx: &'a Sender<Step>, total: u64, quantum: u64) -> Self {
        Self {
            tx,
            completed: 0,
            last_emitted: 0,
            total,
            quantum,
        }
    }

    /// Emits the initial step before any convolution work.
    pub(crate) fn start(&mut self) -> ControlFlow<()> {
        self.emit()
    }

    /// Records `ops` finished multiply-accumulates.
    pub(crate) fn advance(&mut self, ops: u64) -> ControlFlow<()> {
        self.completed += ops;
        if self.completed - self.last_emitted >= self.quantum {
            self.emit()
        } else {
            ControlFlow::Continue(())
        }
    }

    pub(crate) fn completed(&self) -> u64 {
        self.completed
    }

    fn emit(&mut self) -> ControlFlow<()> {
        trace!(completed = self.completed, total = self.total, "Resize progress");
        let step = Step::Progress {
            completed: self.completed,
            total: self.total,
        };
        match self.tx.send(step) {
            Ok(()) => {
                self.last_emitted = self.completed;
                ControlFlow::Continue(())
            }
            Err(_) => ControlFlow::Break(()),
        }
    }
}

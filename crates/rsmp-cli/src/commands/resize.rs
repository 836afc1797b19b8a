//! Resize command
//!
//! Renders a synthetic pattern, resizes it and reports progress and timing.
//! `--region` resizes a part of the pattern, `--cancel-at` abandons the
//! request midway.

use super::{parse_region, resolve_options, summarize, target_size};
use crate::ResizeArgs;
use anyhow::{Result, bail};
use rsmp_core::{PixelBuffer, Rect, SubImage};
use rsmp_ops::{JobOutcome, ResizeOptions, Size, Step, resize_progressive_with, resize_with};
use std::io::{self, Write};
use std::time::Instant;
use tracing::{debug, info};

pub fn run(args: ResizeArgs, verbose: u8) -> Result<()> {
    let opts = resolve_options(&args.filter)?;
    let (w, h) = (args.source.src_width, args.source.src_height);
    let pattern = args.source.pattern.render(w, h)?;
    let region = match &args.source.region {
        Some(text) => parse_region(text)?,
        None => Rect::from_size(w, h),
    };
    let source = SubImage::new(pattern, region)?;
    let src = Size::new(region.width, region.height);
    let dst = target_size(src, &args.target)?;

    info!(
        src = %src,
        dst = %dst,
        kernel = %opts.kernel,
        region = %source.region(),
        x_boundary = %opts.x_boundary,
        y_boundary = %opts.y_boundary,
        "Resizing {:?} pattern",
        args.source.pattern
    );

    let t0 = Instant::now();
    let result = if args.blocking {
        resize_with(dst, &source, &opts)?
    } else {
        match progressive(dst, source, opts, args.cancel_at)? {
            Some(img) => img,
            None => return Ok(()),
        }
    };
    let elapsed = t0.elapsed();

    println!("resampled {} -> {} in {:.2?}", src, dst, elapsed);
    if verbose > 0 {
        println!("{}", summarize(&result));
    }
    Ok(())
}

/// Runs the request on a worker thread, printing the percentage as it goes.
///
/// Returns `None` if the request was cancelled at `cancel_at` percent.
fn progressive(
    dst: Size,
    source: SubImage<PixelBuffer>,
    opts: ResizeOptions,
    cancel_at: Option<u8>,
) -> Result<Option<PixelBuffer>> {
    let mut job = resize_progressive_with(dst, source, opts)?;
    let mut stderr = io::stderr();

    while let Some(step) = job.next() {
        match step {
            Step::Progress { completed, total } => {
                let percent = step.percent();
                write!(stderr, "\rresampling... {}%", percent)?;
                stderr.flush()?;
                if cancel_at.is_some_and(|limit| percent >= limit) {
                    debug!(completed, total, "Cancel threshold reached");
                    let outcome = job.cancel();
                    writeln!(stderr, "\rresampling cancelled at {}% ({:?})", percent, outcome)?;
                    if outcome == JobOutcome::Delivered {
                        bail!("worker delivered after cancellation");
                    }
                    return Ok(None);
                }
            }
            Step::Done(img) => {
                writeln!(stderr, "\rresampling... 100%")?;
                return Ok(Some(img));
            }
            Step::Failed(err) => {
                writeln!(stderr, "\rresampling failed: {}", err)?;
                return Err(err.into());
            }
        }
    }
    bail!("resize ended without a result")
}

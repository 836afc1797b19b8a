//! rsmp - separable resampling driver
//!
//! Resizes synthetic test patterns, shows progress and timing, and reports
//! the filter tables and pass order a request would use.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod pattern;

use pattern::Pattern;

#[derive(Parser)]
#[command(name = "rsmp")]
#[command(author, version, about = "Separable image resampling driver")]
#[command(long_about = "
Resizes synthetic RGBA16 patterns with separable convolution filters.

Examples:
  rsmp resize -w 640 -H 480                      # 1024x768 checker, Lanczos3
  rsmp resize -s 0.25 -k mitchell -b clamp --parallel
  rsmp resize -w 300 --pattern noise --cancel-at 40
  rsmp resize -w 64 -H 64 --region 100,100,256,256
  rsmp resize -w 800 -H 600 --config opts.yaml
  rsmp plan --src-width 4000 --src-height 10 -w 100 -H 10
  rsmp kernels --samples 8
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads for --parallel (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize a synthetic pattern
    #[command(visible_alias = "r")]
    Resize(ResizeArgs),

    /// Show filter tables and pass order costs of a request
    #[command(visible_alias = "p")]
    Plan(PlanArgs),

    /// List kernels and boundary policies
    #[command(visible_alias = "k")]
    Kernels(KernelsArgs),
}

/// Synthetic source image.
#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Source pattern
    #[arg(long, value_enum, default_value_t = Pattern::Checker)]
    pattern: Pattern,

    /// Source width
    #[arg(long = "src-width", default_value = "1024")]
    src_width: usize,

    /// Source height
    #[arg(long = "src-height", default_value = "768")]
    src_height: usize,

    /// Resize only this region of the source: x,y,w,h
    #[arg(long)]
    region: Option<String>,
}

/// Requested output size.
#[derive(Args, Debug, Clone)]
struct TargetArgs {
    /// Target width
    #[arg(short, long, allow_negative_numbers = true)]
    width: Option<i64>,

    /// Target height
    #[arg(short = 'H', long, allow_negative_numbers = true)]
    height: Option<i64>,

    /// Scale factor (e.g., 0.5, 2.0)
    #[arg(short, long)]
    scale: Option<f64>,
}

/// Kernel and boundary selection, on top of an optional config file.
#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// YAML file with resize options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Filter kernel (see `rsmp kernels`)
    #[arg(short, long)]
    kernel: Option<String>,

    /// Boundary policy for both axes
    #[arg(short, long)]
    boundary: Option<String>,

    /// Boundary policy for the horizontal pass
    #[arg(long)]
    x_boundary: Option<String>,

    /// Boundary policy for the vertical pass
    #[arg(long)]
    y_boundary: Option<String>,

    /// Multiply-accumulates between progress updates
    #[arg(short, long)]
    quantum: Option<u64>,

    /// Compute lines on all threads
    #[arg(long)]
    parallel: bool,
}

#[derive(Args)]
struct ResizeArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    filter: FilterArgs,

    /// Run on the calling thread without progress
    #[arg(long)]
    blocking: bool,

    /// Cancel once progress reaches this percentage
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    cancel_at: Option<u8>,
}

#[derive(Args)]
struct PlanArgs {
    /// Source width
    #[arg(long = "src-width", default_value = "1024")]
    src_width: usize,

    /// Source height
    #[arg(long = "src-height", default_value = "768")]
    src_height: usize,

    #[command(flatten)]
    target: TargetArgs,

    #[command(flatten)]
    filter: FilterArgs,

    /// Print every table entry
    #[arg(long)]
    taps: bool,
}

#[derive(Args)]
struct KernelsArgs {
    /// Print this many kernel values per unit of support
    #[arg(long, default_value = "0")]
    samples: usize,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Resize(args) => commands::resize::run(args, cli.verbose),
        Commands::Plan(args) => commands::plan::run(args, cli.verbose),
        Commands::Kernels(args) => commands::kernels::run(args),
    }
}

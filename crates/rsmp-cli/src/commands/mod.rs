//! CLI command implementations

pub mod kernels;
pub mod plan;
pub mod resize;

use crate::{FilterArgs, TargetArgs};
use anyhow::{Context, Result, bail};
use rsmp_core::{PixelBuffer, Rect};
use rsmp_ops::{Boundary, Kernel, ResizeOptions, Size};
use std::fs;
use std::path::Path;

/// Load resize options from a YAML file
pub fn load_config(path: &Path) -> Result<ResizeOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Build options from the config file (if any) and flag overrides
pub fn resolve_options(args: &FilterArgs) -> Result<ResizeOptions> {
    let mut opts = match &args.config {
        Some(path) => load_config(path)?,
        None => ResizeOptions::default(),
    };
    if let Some(name) = &args.kernel {
        opts.kernel = name.parse::<Kernel>()?;
    }
    if let Some(name) = &args.boundary {
        opts = opts.with_boundary(name.parse::<Boundary>()?);
    }
    if let Some(name) = &args.x_boundary {
        opts.x_boundary = name.parse()?;
    }
    if let Some(name) = &args.y_boundary {
        opts.y_boundary = name.parse()?;
    }
    if let Some(quantum) = args.quantum {
        opts.quantum = quantum;
    }
    if args.parallel {
        opts.parallel = true;
    }
    Ok(opts)
}

/// Determine target dimensions, keeping the aspect ratio when only one
/// side or a scale is given
pub fn target_size(src: Size, args: &TargetArgs) -> Result<Size> {
    let (sw, sh) = (src.width as f64, src.height as f64);
    let (w, h) = match (args.width, args.height, args.scale) {
        (Some(w), Some(h), _) => (w, h),
        (Some(w), None, _) => (w, (sh * w as f64 / sw).round() as i64),
        (None, Some(h), _) => ((sw * h as f64 / sh).round() as i64, h),
        (None, None, Some(s)) => ((sw * s).round() as i64, (sh * s).round() as i64),
        _ => bail!("Specify --width, --height, or --scale"),
    };
    Ok(Size::try_from((w, h))?)
}

/// Parse an `x,y,w,h` region
pub fn parse_region(text: &str) -> Result<Rect> {
    let parts = text
        .split(',')
        .map(|p| p.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid region '{}', expected x,y,w,h", text))?;
    match parts[..] {
        [x, y, w, h] => Ok(Rect::new(x, y, w, h)),
        _ => bail!("Invalid region '{}', expected x,y,w,h", text),
    }
}

/// Per-channel mean and range of a buffer, for quick result inspection
pub fn summarize(img: &PixelBuffer) -> String {
    if img.is_empty() {
        return "empty".to_string();
    }
    let mut sum = [0u64; 4];
    let mut min = [u16::MAX; 4];
    let mut max = [0u16; 4];
    for px in img.as_raw().chunks_exact(4) {
        for c in 0..4 {
            sum[c] += px[c] as u64;
            min[c] = min[c].min(px[c]);
            max[c] = max[c].max(px[c]);
        }
    }
    let n = (img.width() * img.height()) as u64;
    let names = ["R", "G", "B", "A"];
    (0..4)
        .map(|c| format!("{}: mean {} [{}..{}]", names[c], sum[c] / n, min[c], max[c]))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn target(width: Option<i64>, height: Option<i64>, scale: Option<f64>) -> TargetArgs {
        TargetArgs {
            width,
            height,
            scale,
        }
    }

    #[test]
    fn test_target_size() {
        let src = Size::new(1000, 500);
        assert_eq!(target_size(src, &target(Some(10), Some(20), None)).unwrap(), Size::new(10, 20));
        assert_eq!(target_size(src, &target(Some(100), None, None)).unwrap(), Size::new(100, 50));
        assert_eq!(target_size(src, &target(None, Some(100), None)).unwrap(), Size::new(200, 100));
        assert_eq!(target_size(src, &target(None, None, Some(0.5))).unwrap(), Size::new(500, 250));
        assert!(target_size(src, &target(None, None, None)).is_err());
        assert!(target_size(src, &target(Some(-5), Some(5), None)).is_err());
    }

    #[test]
    fn test_parse_region() {
        assert_eq!(parse_region("1, 2,3,4").unwrap(), Rect::new(1, 2, 3, 4));
        assert!(parse_region("1,2,3").is_err());
        assert!(parse_region("a,b,c,d").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "kernel: bspline\nx_boundary: reflect\nquantum: 42").unwrap();

        let args = FilterArgs {
            config: Some(file.path().to_path_buf()),
            y_boundary: Some("clamp".into()),
            ..Default::default()
        };
        let opts = resolve_options(&args).unwrap();
        assert_eq!(opts.kernel.name(), "bspline");
        assert!(matches!(opts.x_boundary, Boundary::Reflect));
        assert!(matches!(opts.y_boundary, Boundary::Clamp));
        assert_eq!(opts.quantum, 42);

        let args = FilterArgs {
            kernel: Some("gaussian".into()),
            ..Default::default()
        };
        assert!(resolve_options(&args).is_err());
    }

    #[test]
    fn test_bad_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "kernel: [1, 2]").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_summarize() {
        let img = PixelBuffer::filled(2, 2, [10, 20, 30, 40]);
        assert!(summarize(&img).starts_with("R: mean 10 [10..10]"));
        assert_eq!(summarize(&PixelBuffer::empty(0, 3)), "empty");
    }
}

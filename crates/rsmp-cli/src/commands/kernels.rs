//! Kernels command
//!
//! Lists the preset kernels and boundary policies, optionally with sampled
//! kernel values.

use crate::KernelsArgs;
use anyhow::Result;
use rsmp_ops::{Kernel, Shape};
use rsmp_ops::boundary::BOUNDARY_NAMES;

pub fn run(args: KernelsArgs) -> Result<()> {
    println!("Kernels:");
    for kernel in Kernel::PRESETS {
        println!(
            "  {:<12} support {:<4} {}",
            kernel.name(),
            kernel.support(),
            describe(kernel.shape())
        );
        if args.samples > 0 {
            println!("    {}", sample_line(&kernel, args.samples));
        }
    }
    println!("Aliases: lanczos, linear, bilinear, nearest, cubic, bicubic, catmull-rom");
    println!("Boundaries: {}", BOUNDARY_NAMES.join(", "));
    Ok(())
}

fn describe(shape: Shape) -> String {
    match shape {
        Shape::Box => "box".into(),
        Shape::Triangle => "tent".into(),
        Shape::Lanczos(a) => format!("lanczos a={}", a),
        Shape::Cubic { b, c } => format!("cubic B={:.3} C={:.3}", b, c),
        Shape::Custom(_) => "custom".into(),
    }
}

/// Kernel values from 0 to the support, `per_unit` samples per unit.
fn sample_line(kernel: &Kernel, per_unit: usize) -> String {
    let steps = (kernel.support() * per_unit as f64).ceil() as usize;
    (0..=steps)
        .map(|i| {
            let x = i as f64 / per_unit as f64;
            format!("{:.3}", kernel.apply(x))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_line() {
        let line = sample_line(&Kernel::TRIANGLE, 2);
        assert_eq!(line, "1.000 0.500 0.000");
        assert_eq!(sample_line(&Kernel::LANCZOS3, 1).split(' ').count(), 4);
    }

    #[test]
    fn test_describe_shapes() {
        assert_eq!(describe(Kernel::LANCZOS5.shape()), "lanczos a=5");
        assert_eq!(describe(Kernel::CATMULL_ROM.shape()), "cubic B=0.000 C=0.500");
        assert_eq!(describe(Kernel::BOX.shape()), "box");
    }
}

//! Request validation and pass order selection.

use rsmp_core::PixelBuffer;
use rsmp_ops::{
    Boundary, Kernel, PassOrder, ResampleError, ResizeOptions, ResizePlan, Size, resize_progressive,
    resize_progressive_with, resize_with,
};

fn flat(_: f64) -> f64 {
    1.0
}

fn shifted(x: i64, min: i64, max: i64) -> Option<i64> {
    Some((x + 1).clamp(min, max))
}

fn wrap(x: i64, min: i64, max: i64) -> Option<i64> {
    Some(min + (x - min).rem_euclid(max - min + 1))
}

#[test]
fn test_negative_target_rejected() {
    let cases: [(i64, i64); 3] = [(-1, 10), (10, -1), (i64::MIN, 0)];
    for dims in cases {
        assert!(matches!(
            Size::try_from(dims),
            Err(ResampleError::TargetSizeInvalid(_))
        ));
    }
}

#[test]
fn test_oversized_target_rejected() {
    let src = PixelBuffer::new(4, 4);
    let err = resize_with(
        Size::new(usize::MAX / 2, 3),
        &src,
        &ResizeOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ResampleError::TargetSizeInvalid(_)));
}

#[test]
fn test_empty_source_rejected() {
    let err = resize_progressive(
        Size::new(4, 4),
        PixelBuffer::new(0, 7),
        Kernel::LANCZOS3,
        Boundary::Reject,
        Boundary::Reject,
    )
    .unwrap_err();
    assert!(matches!(err, ResampleError::SourceInvalid(_)));
}

#[test]
fn test_bad_kernels_rejected() {
    let src = PixelBuffer::new(4, 4);
    for kernel in [
        Kernel::custom("zero", flat, 0.0),
        Kernel::custom("nan", flat, f64::NAN),
        Kernel::custom("endless", flat, f64::INFINITY),
        Kernel::lanczos("lanczos0", 0.0),
        Kernel::lanczos("negative", -2.0),
    ] {
        let opts = ResizeOptions::default().with_kernel(kernel);
        assert!(
            matches!(
                resize_progressive_with(Size::new(2, 2), src.clone(), opts),
                Err(ResampleError::FilterInvalid(_))
            ),
            "{} accepted",
            kernel
        );
    }
}

#[test]
fn test_bad_boundaries_rejected() {
    let src = PixelBuffer::new(4, 4);
    let opts = ResizeOptions::default().with_boundaries(Boundary::Clamp, Boundary::Custom(shifted));
    assert!(matches!(
        resize_with(Size::new(2, 2), &src, &opts),
        Err(ResampleError::BoundaryInvalid(_))
    ));
}

#[test]
fn test_custom_policies_accepted() {
    let src = PixelBuffer::filled(6, 6, [9, 9, 9, 9]);
    let opts = ResizeOptions::default()
        .with_kernel(Kernel::custom("flat", flat, 1.5))
        .with_boundary(Boundary::Custom(wrap));
    let out = resize_with(Size::new(5, 8), &src, &opts).unwrap();
    assert!(out.as_raw().iter().all(|&v| v == 9));
}

#[test]
fn test_validation_precedes_zero_target() {
    let opts = ResizeOptions::default().with_kernel(Kernel::lanczos("broken", 0.0));
    assert!(matches!(
        resize_with(Size::new(0, 0), &PixelBuffer::new(4, 4), &opts),
        Err(ResampleError::FilterInvalid(_))
    ));
    // An empty source is fine when nothing is requested from it.
    assert!(resize_with(Size::new(0, 3), &PixelBuffer::new(0, 0), &ResizeOptions::default()).is_ok());
}

#[test]
fn test_pass_order_selection() {
    let cases = [
        ((4000, 10), (100, 10), PassOrder::XThenY),
        ((10, 4000), (10, 100), PassOrder::YThenX),
        ((100, 10), (4000, 10), PassOrder::YThenX),
        ((10, 100), (10, 4000), PassOrder::XThenY),
    ];
    for (src, dst, want) in cases {
        let plan = ResizePlan::new(
            src.into(),
            dst.into(),
            &Kernel::LANCZOS3,
            Boundary::Reject,
            Boundary::Reject,
        );
        assert_eq!(plan.order(), want, "{:?} -> {:?}", src, dst);
        let other = match want {
            PassOrder::YThenX => PassOrder::XThenY,
            PassOrder::XThenY => PassOrder::YThenX,
        };
        assert!(plan.cost(want) <= plan.cost(other));
        assert_eq!(plan.estimated_total(), plan.cost(want));
    }
}

#[test]
fn test_pass_order_does_not_change_uniform_output() {
    let color = [1234, 40000, 65535, 500];
    for (src, dst) in [((400, 10), (37, 10)), ((10, 400), (10, 37))] {
        let img = PixelBuffer::filled(src.0, src.1, color);
        let out = resize_with(dst.into(), &img, &ResizeOptions::default()).unwrap();
        for y in 0..dst.1 {
            for x in 0..dst.0 {
                let px = out.pixel(x, y);
                for c in 0..4 {
                    assert!(px[c].abs_diff(color[c]) <= 1);
                }
            }
        }
    }
}

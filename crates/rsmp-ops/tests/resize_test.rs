//! Output tests for blocking resizes.

use rsmp_core::{PixelBuffer, Rect, SubImage};
use rsmp_ops::{
    Boundary, Kernel, ResampleError, ResizeOptions, Size, resample_into, resize, resize_with,
};

const BOUNDARIES: [Boundary; 3] = [Boundary::Clamp, Boundary::Reject, Boundary::Reflect];

fn gradient(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        [
            (x * 65535 / (width - 1).max(1)) as u16,
            (y * 1000 % 65536) as u16,
            ((x * 7 + y * 13) * 311 % 65536) as u16,
            65535,
        ]
    })
}

fn assert_close(got: [u16; 4], want: [u16; 4], tolerance: u16, ctx: &str) {
    for c in 0..4 {
        let diff = got[c].abs_diff(want[c]);
        assert!(
            diff <= tolerance,
            "{}: channel {} is {}, expected {} (+/-{})",
            ctx,
            c,
            got[c],
            want[c],
            tolerance
        );
    }
}

#[test]
fn test_uniform_color_is_preserved() {
    let color = [65535, 0, 32768, 12345];
    let src = PixelBuffer::filled(13, 9, color);
    let targets = [(1, 1), (3, 7), (13, 9), (40, 25), (97, 1), (1, 30)];

    for kernel in Kernel::PRESETS {
        for boundary in BOUNDARIES {
            let opts = ResizeOptions::default()
                .with_kernel(kernel)
                .with_boundary(boundary);
            for (w, h) in targets {
                let out = resize_with(Size::new(w, h), &src, &opts).unwrap();
                assert_eq!(out.dimensions(), (w, h));
                let ctx = format!("{} {} {}x{}", kernel, boundary, w, h);
                for y in 0..h {
                    for x in 0..w {
                        assert_close(out.pixel(x, y), color, 1, &ctx);
                    }
                }
            }
        }
    }
}

#[test]
fn test_identity_resize_is_lossless() {
    let src = gradient(31, 17);
    for kernel in [Kernel::BOX, Kernel::TRIANGLE, Kernel::LANCZOS3, Kernel::CATMULL_ROM] {
        for boundary in BOUNDARIES {
            let opts = ResizeOptions::default()
                .with_kernel(kernel)
                .with_boundary(boundary);
            let out = resize_with(Size::new(31, 17), &src, &opts).unwrap();
            assert_eq!(out, src, "{} {}", kernel, boundary);
        }
    }
}

#[test]
fn test_single_pixel_is_weighted_average() {
    // Triangle over 3 samples stretched to the whole axis: weights 2/7, 3/7, 2/7.
    let weights = [2.0 / 7.0, 3.0 / 7.0, 2.0 / 7.0];
    let src = PixelBuffer::from_fn(3, 3, |x, y| {
        let v = (x * 3 + y) as u16 * 7000;
        [v, 65535 - v, 1000, 65535]
    });

    let mut expected = [0.0f64; 4];
    for y in 0..3 {
        for x in 0..3 {
            let px = src.pixel(x, y);
            for c in 0..4 {
                expected[c] += weights[x] * weights[y] * px[c] as f64;
            }
        }
    }
    let expected = expected.map(|v| v.round() as u16);

    let opts = ResizeOptions::default()
        .with_kernel(Kernel::TRIANGLE)
        .with_boundary(Boundary::Reject);
    let out = resize_with(Size::new(1, 1), &src, &opts).unwrap();
    assert_close(out.pixel(0, 0), expected, 1, "1x1 average");
}

#[test]
fn test_single_source_pixel_fills_target() {
    let src = PixelBuffer::filled(1, 1, [100, 200, 300, 400]);
    for kernel in Kernel::PRESETS {
        let opts = ResizeOptions::default().with_kernel(kernel);
        let out = resize_with(Size::new(5, 3), &src, &opts).unwrap();
        for y in 0..3 {
            for x in 0..5 {
                assert_close(out.pixel(x, y), [100, 200, 300, 400], 1, kernel.name());
            }
        }
    }
}

#[test]
fn test_zero_target_is_empty() {
    let src = gradient(8, 8);
    for size in [Size::new(0, 0), Size::new(0, 5), Size::new(5, 0)] {
        let out = resize(size, &src).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.dimensions(), (size.width, size.height));
        assert!(out.as_raw().is_empty());
    }
}

#[test]
fn test_endpoints_survive_upscale() {
    let src = gradient(9, 6);
    let opts = ResizeOptions::default()
        .with_kernel(Kernel::TRIANGLE)
        .with_boundary(Boundary::Clamp);
    let out = resize_with(Size::new(33, 21), &src, &opts).unwrap();
    assert_eq!(out.pixel(0, 0), src.pixel(0, 0));
    assert_eq!(out.pixel(32, 0), src.pixel(8, 0));
    assert_eq!(out.pixel(0, 20), src.pixel(0, 5));
    assert_eq!(out.pixel(32, 20), src.pixel(8, 5));
}

#[test]
fn test_sharp_edge_keeps_extremes() {
    // Lanczos rings above white and below black next to the edge.
    let src = PixelBuffer::from_fn(8, 1, |x, _| {
        if x < 4 { [0, 0, 0, 0] } else { [65535, 65535, 65535, 65535] }
    });
    let out = resize(Size::new(40, 1), &src).unwrap();
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(out.pixel(39, 0), [65535, 65535, 65535, 65535]);
    let reds: Vec<u16> = (0..40).map(|x| out.pixel(x, 0)[0]).collect();
    assert!(reds.contains(&0));
    assert!(reds.contains(&65535));
}

#[test]
fn test_sub_image_resizes_region_only() {
    let inside = [40000, 20000, 10000, 65535];
    let src = PixelBuffer::from_fn(20, 20, |x, y| {
        if (5..15).contains(&x) && (5..15).contains(&y) {
            inside
        } else {
            [0, 65535, 0, 0]
        }
    });
    let view = SubImage::new(&src, Rect::new(5, 5, 10, 10)).unwrap();
    let opts = ResizeOptions::default().with_boundary(Boundary::Clamp);
    let out = resize_with(Size::new(4, 4), &view, &opts).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            assert_close(out.pixel(x, y), inside, 1, "region");
        }
    }
}

#[test]
fn test_bad_sub_image_is_source_error() {
    let src = gradient(4, 4);
    let err: ResampleError = SubImage::new(&src, Rect::new(2, 2, 4, 4)).unwrap_err().into();
    assert!(matches!(err, ResampleError::SourceInvalid(_)));
}

#[test]
fn test_resample_into_matches_resize() {
    let src = gradient(25, 40);
    let mut dst = PixelBuffer::new(11, 9);
    resample_into(&mut dst, &src, Kernel::MITCHELL, Boundary::Reflect, Boundary::Clamp).unwrap();

    let opts = ResizeOptions::default()
        .with_kernel(Kernel::MITCHELL)
        .with_boundaries(Boundary::Reflect, Boundary::Clamp);
    assert_eq!(dst, resize_with(Size::new(11, 9), &src, &opts).unwrap());
}

#[test]
fn test_parallel_matches_sequential() {
    let src = gradient(57, 33);
    for (w, h) in [(20, 71), (120, 5), (57, 33)] {
        let seq = ResizeOptions::default().with_boundary(Boundary::Reflect);
        let par = seq.with_parallel(true);
        let a = resize_with(Size::new(w, h), &src, &seq).unwrap();
        let b = resize_with(Size::new(w, h), &src, &par).unwrap();
        assert_eq!(a, b, "{}x{}", w, h);
    }
}

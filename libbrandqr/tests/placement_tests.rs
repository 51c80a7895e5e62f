use brandqr::placement::*;
use brandqr::{BrandQrError, CompositeSpec};
use image::{Rgba, RgbaImage};
use proptest::prelude::*;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn checkerboard(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            WHITE
        }
    })
}

fn close_to(actual: Rgba<u8>, expected: Rgba<u8>) -> bool {
    actual
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(a, e)| a.abs_diff(*e) <= 2)
}

fn no_pad(logo_frac: f64) -> CompositeSpec {
    CompositeSpec {
        logo_frac,
        pad: false,
        ..CompositeSpec::default()
    }
}

#[test]
fn test_scaled_logo_size() {
    assert_eq!(scaled_logo_size(320, (128, 64), 0.25), (80, 40));
    assert_eq!(scaled_logo_size(370, (40, 40), 0.22), (81, 81));
    assert_eq!(scaled_logo_size(100, (10, 30), 1.0), (100, 300));
}

#[test]
fn test_scaled_logo_size_never_zero() {
    assert_eq!(scaled_logo_size(10, (1000, 1), 0.05), (1, 1));
    assert_eq!(scaled_logo_size(1, (5, 5), 0.01), (1, 1));
}

#[test]
fn test_padded_size() {
    assert_eq!(padded_size((58, 29), 10).unwrap(), (78, 49));
    assert_eq!(padded_size((3, 4), 0).unwrap(), (3, 4));
}

#[test]
fn test_padded_size_overflow_is_an_error() {
    let err = padded_size((10, 10), u32::MAX / 2).unwrap_err();
    assert!(matches!(err, BrandQrError::InvalidParameter(_)));
    assert!(padded_size((u32::MAX, 1), 1).is_err());
}

#[test]
fn test_huge_pad_margin_is_rejected() {
    let qr = checkerboard(100);
    let logo = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));

    for margin in [u32::MAX / 2, brandqr::MAX_PAD_MARGIN + 1] {
        let spec = CompositeSpec {
            pad_margin_px: margin,
            ..CompositeSpec::default()
        };
        let err = composite_logo(&qr, &logo, &spec).unwrap_err();
        assert!(matches!(err, BrandQrError::InvalidParameter(_)), "margin {margin}");
    }

    let spec = CompositeSpec {
        pad_margin_px: brandqr::MAX_PAD_MARGIN,
        ..CompositeSpec::default()
    };
    assert!(spec.validate().is_ok());
}

#[test]
fn test_centered_origin() {
    assert_eq!(centered_origin((290, 290), (78, 49)), (106, 120));
    assert_eq!(centered_origin((11, 11), (4, 4)), (3, 3));
    assert_eq!(centered_origin((10, 10), (10, 10)), (0, 0));
}

#[test]
fn test_centered_origin_floors_negative_offsets() {
    assert_eq!(centered_origin((10, 10), (15, 15)), (-3, -3));
    assert_eq!(centered_origin((10, 20), (14, 20)), (-2, 0));
}

#[test]
fn test_rounded_plate_corners() {
    let plate = rounded_plate(60, 40, 10);
    assert_eq!(plate.dimensions(), (60, 40));

    for (x, y) in [(0, 0), (59, 0), (0, 39), (59, 39)] {
        assert_eq!(plate.get_pixel(x, y)[3], 0, "corner ({x}, {y}) should be clear");
    }
    for (x, y) in [(30, 20), (30, 0), (0, 20), (59, 20), (30, 39)] {
        assert_eq!(*plate.get_pixel(x, y), WHITE, "({x}, {y}) should be plate");
    }
}

#[test]
fn test_rounded_plate_without_radius_is_full() {
    let plate = rounded_plate(7, 5, 0);
    assert!(plate.pixels().all(|p| *p == WHITE));
}

#[test]
fn test_rounded_plate_clamps_radius() {
    let plate = rounded_plate(5, 3, 18);
    assert_eq!(plate.dimensions(), (5, 3));
    assert_eq!(*plate.get_pixel(2, 1), WHITE);

    let empty = rounded_plate(0, 4, 3);
    assert_eq!(empty.dimensions(), (0, 4));
}

#[test]
fn test_prepare_overlay_padding_adds_margins() {
    let logo = RgbaImage::from_pixel(50, 25, Rgba([0, 0, 255, 255]));
    let spec = CompositeSpec {
        logo_frac: 0.2,
        pad: true,
        pad_radius: 4,
        pad_margin_px: 7,
    };

    let overlay = prepare_overlay(200, &logo, &spec).unwrap();
    assert_eq!(overlay.dimensions(), (40 + 14, 20 + 14));
    assert!(close_to(*overlay.get_pixel(7, 17), Rgba([0, 0, 255, 255])));
    assert_eq!(*overlay.get_pixel(3, 17), WHITE);

    let bare = prepare_overlay(200, &logo, &no_pad(0.2)).unwrap();
    assert_eq!(bare.dimensions(), (40, 20));
}

#[test]
fn test_transparent_logo_leaves_qr_untouched() {
    let qr = checkerboard(64);
    let logo = RgbaImage::new(16, 16);

    let output = composite_logo(&qr, &logo, &no_pad(0.5)).unwrap();
    assert_eq!(output, qr);
}

#[test]
fn test_composite_keeps_dimensions_and_input() {
    let qr = checkerboard(101);
    let before = qr.clone();
    let logo = RgbaImage::from_pixel(10, 20, Rgba([255, 0, 0, 255]));

    let output = composite_logo(&qr, &logo, &no_pad(0.3)).unwrap();
    assert_eq!(output.dimensions(), qr.dimensions());
    assert_eq!(qr, before);

    // 30x60 logo centered on 101x101
    let (x, y) = centered_origin((101, 101), (30, 60));
    assert_eq!((x, y), (35, 20));
    assert!(close_to(*output.get_pixel(35, 20), Rgba([255, 0, 0, 255])));
    assert!(close_to(*output.get_pixel(64, 79), Rgba([255, 0, 0, 255])));
    assert_eq!(*output.get_pixel(34, 20), *qr.get_pixel(34, 20));
    assert_eq!(*output.get_pixel(65, 79), *qr.get_pixel(65, 79));
}

#[test]
fn test_oversized_plate_is_clipped() {
    let qr = checkerboard(20);
    let logo = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));
    let spec = CompositeSpec {
        logo_frac: 1.0,
        pad: true,
        pad_radius: 0,
        pad_margin_px: 5,
    };

    let output = composite_logo(&qr, &logo, &spec).unwrap();
    assert_eq!(output.dimensions(), (20, 20));
    assert!(close_to(*output.get_pixel(0, 0), Rgba([0, 255, 0, 255])));
}

proptest! {
    #[test]
    fn scaled_width_is_floor_of_fraction(
        qr_w in 1u32..4000,
        logo_w in 1u32..3000,
        logo_h in 1u32..3000,
        frac in 0.001f64..=1.0,
    ) {
        let (w, h) = scaled_logo_size(qr_w, (logo_w, logo_h), frac);
        let expected = ((f64::from(qr_w) * frac).floor() as u32).max(1);
        prop_assert_eq!(w, expected);
        prop_assert!(h >= 1);
    }

    #[test]
    fn overlay_is_centered(
        qr_w in 1u32..2000,
        qr_h in 1u32..2000,
        w in 1u32..2000,
        h in 1u32..2000,
    ) {
        let (x, y) = centered_origin((qr_w, qr_h), (w, h));
        prop_assert_eq!(x, (i64::from(qr_w) - i64::from(w)).div_euclid(2));
        prop_assert_eq!(y, (i64::from(qr_h) - i64::from(h)).div_euclid(2));

        // Left and right gaps differ by at most one pixel
        let left = x;
        let right = i64::from(qr_w) - i64::from(w) - x;
        prop_assert!(right - left == 0 || right - left == 1);
    }

    #[test]
    fn padding_adds_twice_the_margin(
        w in 1u32..5000,
        h in 1u32..5000,
        margin in 0u32..200,
    ) {
        prop_assert_eq!(padded_size((w, h), margin).unwrap(), (w + 2 * margin, h + 2 * margin));
    }
}

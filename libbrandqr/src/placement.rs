use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

use crate::error::{BrandQrError, Result};
use crate::logo::LogoAsset;
use crate::options::CompositeSpec;
use crate::rasterizer::VectorRasterizer;

const PLATE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Size of a logo scaled to `logo_frac` of the QR width, keeping its aspect ratio
///
/// Both dimensions are at least one pixel.
pub fn scaled_logo_size(qr_width: u32, logo: (u32, u32), logo_frac: f64) -> (u32, u32) {
    let target_w = ((f64::from(qr_width) * logo_frac).floor() as u32).max(1);
    let ratio = f64::from(target_w) / f64::from(logo.0.max(1));
    let target_h = ((f64::from(logo.1) * ratio).floor() as u32).max(1);
    (target_w, target_h)
}

/// Size of the plate drawn behind a logo of the given size
pub fn padded_size(logo: (u32, u32), margin: u32) -> Result<(u32, u32)> {
    let grow = |side: u32| margin.checked_mul(2).and_then(|m| side.checked_add(m));
    match (grow(logo.0), grow(logo.1)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(BrandQrError::InvalidParameter(format!(
            "pad margin of {margin} pixels is too large for a {}x{} logo",
            logo.0, logo.1
        ))),
    }
}

/// Top-left corner that centers an overlay on the QR image
///
/// Uses floor division so an overlay larger than the QR gets a negative
/// origin and is clipped evenly on both sides.
pub fn centered_origin(qr: (u32, u32), overlay: (u32, u32)) -> (i64, i64) {
    let x = (i64::from(qr.0) - i64::from(overlay.0)).div_euclid(2);
    let y = (i64::from(qr.1) - i64::from(overlay.1)).div_euclid(2);
    (x, y)
}

/// Draw an opaque white rounded rectangle filling a transparent canvas
///
/// The radius is clamped to half of the shorter side.
pub fn rounded_plate(width: u32, height: u32, radius: u32) -> RgbaImage {
    let mut plate = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return plate;
    }

    let r = radius.min(width / 2).min(height / 2);
    if r == 0 {
        draw_filled_rect_mut(&mut plate, Rect::at(0, 0).of_size(width, height), PLATE_COLOR);
        return plate;
    }

    if width > 2 * r {
        draw_filled_rect_mut(
            &mut plate,
            Rect::at(r as i32, 0).of_size(width - 2 * r, height),
            PLATE_COLOR,
        );
    }
    if height > 2 * r {
        draw_filled_rect_mut(
            &mut plate,
            Rect::at(0, r as i32).of_size(width, height - 2 * r),
            PLATE_COLOR,
        );
    }

    let (r, right, bottom) = (r as i32, (width - 1) as i32, (height - 1) as i32);
    for center in [(r, r), (right - r, r), (r, bottom - r), (right - r, bottom - r)] {
        draw_filled_circle_mut(&mut plate, center, r, PLATE_COLOR);
    }

    plate
}

/// Scale a logo raster and optionally back it with a plate
///
/// Returns the image that will be pasted onto the QR code.
pub fn prepare_overlay(qr_width: u32, logo: &RgbaImage, spec: &CompositeSpec) -> Result<RgbaImage> {
    spec.validate()?;

    let (target_w, target_h) = scaled_logo_size(qr_width, logo.dimensions(), spec.logo_frac);
    let resized = imageops::resize(logo, target_w, target_h, FilterType::Lanczos3);

    if !spec.pad {
        return Ok(resized);
    }

    let (plate_w, plate_h) = padded_size((target_w, target_h), spec.pad_margin_px)?;
    let mut plate = rounded_plate(plate_w, plate_h, spec.pad_radius);
    let (x, y) = centered_origin((plate_w, plate_h), (target_w, target_h));
    imageops::overlay(&mut plate, &resized, x, y);
    Ok(plate)
}

/// Composite an already loaded logo over a copy of the QR raster
pub fn composite_logo(qr: &RgbaImage, logo: &RgbaImage, spec: &CompositeSpec) -> Result<RgbaImage> {
    let overlay = prepare_overlay(qr.width(), logo, spec)?;
    let (x, y) = centered_origin(qr.dimensions(), overlay.dimensions());

    log::debug!(
        "Placing {}x{} overlay at ({}, {}) on {}x{} QR",
        overlay.width(),
        overlay.height(),
        x,
        y,
        qr.width(),
        qr.height()
    );

    let mut output = qr.clone();
    imageops::overlay(&mut output, &overlay, x, y);
    Ok(output)
}

/// Load a logo and composite it at the center of the QR raster
pub fn paste_logo_on_raster(
    qr: &RgbaImage,
    logo: &LogoAsset,
    spec: &CompositeSpec,
    rasterizer: Option<&dyn VectorRasterizer>,
) -> Result<RgbaImage> {
    let logo_image = logo.load_raster(rasterizer)?;
    composite_logo(qr, &logo_image, spec)
}

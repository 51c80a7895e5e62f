use std::fmt::Write as _;

use image::{Rgba, RgbaImage};
use qrcode::{Color, QrCode};

use crate::error::{BrandQrError, Result};
use crate::options::EccLevel;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// An encoded QR symbol
///
/// The symbol is produced once per request and rendered on demand; rendering
/// never changes it.
pub struct QrSymbol {
    code: QrCode,
    ecc: EccLevel,
}

impl QrSymbol {
    /// Encode a payload with the given error correction level
    pub fn encode(payload: &str, ecc: EccLevel) -> Result<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ecc.to_qrcode())?;
        log::debug!(
            "Encoded {} bytes as {}x{} modules (ecc {})",
            payload.len(),
            code.width(),
            code.width(),
            ecc
        );
        Ok(Self { code, ecc })
    }

    /// Number of modules along one side, excluding the quiet zone
    pub fn module_count(&self) -> u32 {
        self.code.width() as u32
    }

    /// Error correction level the symbol was encoded with
    pub const fn ecc(&self) -> EccLevel {
        self.ecc
    }

    /// Side length in modules including a quiet zone of `border` modules
    pub fn dimension(&self, border: u32) -> Result<u32> {
        border
            .checked_mul(2)
            .and_then(|b| b.checked_add(self.module_count()))
            .ok_or_else(|| {
                BrandQrError::InvalidParameter(format!("border of {border} modules is too large"))
            })
    }

    /// Whether the module at (x, y) is dark; coordinates exclude the quiet zone
    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        self.code[(x as usize, y as usize)] == Color::Dark
    }

    /// Render to an opaque RGBA raster of `dimension(border) * scale` pixels per side
///
/// Sides larger than [`MAX_RASTER_SIDE`](crate::MAX_RASTER_SIDE) are rejected.
    pub fn render_raster(&self, border: u32, scale: u32) -> Result<RgbaImage> {
        if scale == 0 {
            return Err(BrandQrError::InvalidParameter(
                "scale must be at least 1".to_string(),
            ));
        }

        let side = self
            .dimension(border)?
            .checked_mul(scale)
            .filter(|&side| side <= crate::MAX_RASTER_SIDE)
            .ok_or_else(|| {
                BrandQrError::InvalidParameter(format!(
                    "rendered size exceeds {} pixels at scale {scale} with border {border}",
                    crate::MAX_RASTER_SIDE
                ))
            })?;

        let count = self.module_count();
        let image = RgbaImage::from_fn(side, side, |px, py| {
            let mx = (px / scale).checked_sub(border);
            let my = (py / scale).checked_sub(border);
            match (mx, my) {
                (Some(x), Some(y)) if x < count && y < count && self.is_dark(x, y) => DARK,
                _ => LIGHT,
            }
        });

        Ok(image)
    }

    /// Render to SVG text with one user unit per module
    ///
    /// The root element declares `width`, `height` and `viewBox` so the logo
    /// placement can be computed in QR coordinates. Output always uses `\n`.
    pub fn render_svg(&self, border: u32) -> Result<String> {
        let dimension = self.dimension(border)?;
        let count = self.module_count();

        let mut path = String::new();
        for y in 0..count {
            for x in 0..count {
                if self.is_dark(x, y) {
                    if !path.is_empty() {
                        path.push(' ');
                    }
                    // Writing to a String cannot fail
                    let _ = write!(path, "M{},{}h1v1h-1z", x + border, y + border);
                }
            }
        }

        let mut svg = String::with_capacity(path.len() + 512);
        svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">",
            dimension
        );
        svg.push_str("\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n");
        let _ = writeln!(svg, "\t<path d=\"{path}\" fill=\"#000000\"/>");
        svg.push_str("</svg>\n");

        Ok(svg)
    }
}

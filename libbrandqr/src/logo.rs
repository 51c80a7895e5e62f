use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

use crate::error::{BrandQrError, Result};
use crate::rasterizer::VectorRasterizer;

/// Whether a logo is a bitmap or a vector document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoKind {
    Raster,
    Vector,
}

/// A logo file on disk
///
/// The file is only ever read; scaling and padding work on copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoAsset {
    path: PathBuf,
    kind: LogoKind,
}

impl LogoAsset {
    /// Classify a logo by its extension; `.svg` is vector, anything else is
    /// handed to the image decoder
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = if has_extension(&path, "svg") {
            LogoKind::Vector
        } else {
            LogoKind::Raster
        };
        Self { path, kind }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn kind(&self) -> LogoKind {
        self.kind
    }

    pub const fn is_vector(&self) -> bool {
        matches!(self.kind, LogoKind::Vector)
    }

    /// Load the logo as an RGBA raster
    ///
    /// Vector logos are rasterized at `VECTOR_RASTER_SIZE` so the later
    /// downscale does not start from a low-resolution bitmap.
    pub fn load_raster(&self, rasterizer: Option<&dyn VectorRasterizer>) -> Result<RgbaImage> {
        match self.kind {
            LogoKind::Raster => {
                let image = image::open(&self.path)?;
                Ok(image.to_rgba8())
            }
            LogoKind::Vector => {
                let rasterizer = rasterizer.ok_or_else(|| self.missing_rasterizer())?;
                let data = fs::read(&self.path)?;
                log::debug!(
                    "Rasterizing {} with {}",
                    self.path.display(),
                    rasterizer.name()
                );
                rasterizer.rasterize(&data, crate::VECTOR_RASTER_SIZE, crate::VECTOR_RASTER_SIZE)
            }
        }
    }

    /// Encode the logo as a base64 `data:` URI
    ///
    /// Vector logos are embedded as-is; raster logos are re-encoded as PNG.
    pub fn to_data_uri(&self) -> Result<String> {
        let (mime, bytes) = match self.kind {
            LogoKind::Vector => ("image/svg+xml", fs::read(&self.path)?),
            LogoKind::Raster => {
                let image = image::open(&self.path)?;
                ("image/png", encode_png(&image.to_rgba8())?)
            }
        };

        Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    pub(crate) fn missing_rasterizer(&self) -> BrandQrError {
        BrandQrError::MissingCapability {
            capability: "SVG rasterizer",
            reason: format!(
                "SVG logo {} cannot be rasterized for PNG output",
                self.path.display()
            ),
        }
    }
}

/// Encode an RGBA image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// List candidate logo files in a directory, sorted by file name
pub fn discover_logos(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut logos = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && crate::LOGO_EXTENSIONS
                .iter()
                .any(|ext| has_extension(&path, ext))
        {
            logos.push(path);
        }
    }

    logos.sort();
    Ok(logos)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

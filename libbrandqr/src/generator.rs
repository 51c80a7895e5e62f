use std::fs;
use std::path::{Path, PathBuf};

use crate::encoder::QrSymbol;
use crate::error::{BrandQrError, Result};
use crate::logo::{encode_png, LogoAsset};
use crate::options::GenerateOptions;
use crate::placement::paste_logo_on_raster;
use crate::rasterizer::{self, VectorRasterizer};
use crate::svg::embed_logo;

/// Output encoding, decided once from the output path's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// RGBA PNG
    Raster,
    /// UTF-8 SVG text
    Vector,
}

impl OutputFormat {
    /// Resolve the format from a file extension (case-insensitive)
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Raster),
            "svg" => Ok(Self::Vector),
            _ => Err(BrandQrError::UnsupportedOutputFormat {
                extension: extension.to_string(),
            }),
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Raster => "png",
            Self::Vector => "svg",
        }
    }
}

/// A fully rendered output file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Png(Vec<u8>),
    Svg(String),
}

impl Artifact {
    pub const fn format(&self) -> OutputFormat {
        match self {
            Self::Png(_) => OutputFormat::Raster,
            Self::Svg(_) => OutputFormat::Vector,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Png(bytes) => bytes,
            Self::Svg(text) => text.as_bytes(),
        }
    }

    /// Write the artifact, creating the parent directory if needed
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.as_bytes())?;
        Ok(())
    }
}

/// Branded QR code generator
///
/// Holds the optional vector rasterizer; each call is otherwise independent.
pub struct Generator {
    rasterizer: Option<Box<dyn VectorRasterizer>>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator using the rasterizer compiled into this build
    pub fn new() -> Self {
        Self {
            rasterizer: rasterizer::available(),
        }
    }

    /// Create a generator with an explicit rasterizer handle
    pub fn with_rasterizer(rasterizer: Box<dyn VectorRasterizer>) -> Self {
        Self {
            rasterizer: Some(rasterizer),
        }
    }

    /// Create a generator that cannot rasterize vector logos
    pub fn without_rasterizer() -> Self {
        Self { rasterizer: None }
    }

    pub fn has_vector_rasterizer(&self) -> bool {
        self.rasterizer.is_some()
    }

    /// Fail fast when the requested combination needs a missing capability
    pub fn check_capabilities(&self, format: OutputFormat, logo: Option<&LogoAsset>) -> Result<()> {
        match (format, logo) {
            (OutputFormat::Raster, Some(logo)) if logo.is_vector() && self.rasterizer.is_none() => {
                Err(logo.missing_rasterizer())
            }
            _ => Ok(()),
        }
    }

    /// Render a QR code into memory
    pub fn render(
        &self,
        payload: &str,
        format: OutputFormat,
        options: &GenerateOptions,
    ) -> Result<Artifact> {
        options.validate()?;
        let logo = options.logo_path.as_ref().map(LogoAsset::from_path);
        self.check_capabilities(format, logo.as_ref())?;

        let symbol = QrSymbol::encode(payload, options.ecc)?;

        match format {
            OutputFormat::Raster => {
                let mut image = symbol.render_raster(options.border, options.scale)?;
                if let Some(logo) = &logo {
                    image = paste_logo_on_raster(
                        &image,
                        logo,
                        &options.composite,
                        self.rasterizer.as_deref(),
                    )?;
                }
                Ok(Artifact::Png(encode_png(&image)?))
            }
            OutputFormat::Vector => {
                let mut svg = symbol.render_svg(options.border)?;
                if let Some(logo) = &logo {
                    svg = embed_logo(&svg, logo, options.composite.logo_frac)?;
                }
                Ok(Artifact::Svg(svg))
            }
        }
    }

    /// Generate a QR code and write it to `output_path`
    ///
    /// The format follows the extension; nothing is written unless the whole
    /// render succeeds. Returns the output path.
    pub fn generate(
        &self,
        payload: &str,
        output_path: impl AsRef<Path>,
        options: &GenerateOptions,
    ) -> Result<PathBuf> {
        let output_path = output_path.as_ref();
        let format = OutputFormat::from_path(output_path)?;

        let artifact = self.render(payload, format, options)?;
        artifact.write_to(output_path)?;

        log::info!(
            "Wrote {} ({} bytes)",
            output_path.display(),
            artifact.as_bytes().len()
        );
        Ok(output_path.to_path_buf())
    }
}

/// Generate a QR code with the default generator
pub fn generate(
    payload: &str,
    output_path: impl AsRef<Path>,
    options: &GenerateOptions,
) -> Result<PathBuf> {
    Generator::new().generate(payload, output_path, options)
}

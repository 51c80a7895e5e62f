use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BrandQrError, Result};

/// QR error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EccLevel {
    /// ~7% of codewords recoverable
    Low,
    /// ~15% of codewords recoverable
    Medium,
    /// ~25% of codewords recoverable
    Quartile,
    /// ~30% of codewords recoverable
    High,
}

impl EccLevel {
    /// Single-letter code used in configuration files and on the command line
    pub const fn code(self) -> char {
        match self {
            Self::Low => 'l',
            Self::Medium => 'm',
            Self::Quartile => 'q',
            Self::High => 'h',
        }
    }

    pub(crate) const fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            Self::Low => qrcode::EcLevel::L,
            Self::Medium => qrcode::EcLevel::M,
            Self::Quartile => qrcode::EcLevel::Q,
            Self::High => qrcode::EcLevel::H,
        }
    }
}

impl Default for EccLevel {
    fn default() -> Self {
        Self::High
    }
}

impl FromStr for EccLevel {
    type Err = BrandQrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Self::Low),
            "m" | "medium" => Ok(Self::Medium),
            "q" | "quartile" => Ok(Self::Quartile),
            "h" | "high" => Ok(Self::High),
            other => Err(BrandQrError::InvalidParameter(format!(
                "error correction level must be one of l, m, q, h (got {other:?})"
            ))),
        }
    }
}

impl TryFrom<String> for EccLevel {
    type Error = BrandQrError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EccLevel> for String {
    fn from(level: EccLevel) -> Self {
        level.code().to_string()
    }
}

impl fmt::Display for EccLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parameters governing how a logo is scaled and placed over the QR code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeSpec {
    /// Logo width as a fraction of the QR width, in (0, 1]
    pub logo_frac: f64,
    /// Draw a white rounded plate behind the logo
    pub pad: bool,
    /// Corner radius of the plate in pixels
    pub pad_radius: u32,
    /// Plate margin around the logo in pixels
    pub pad_margin_px: u32,
}

impl Default for CompositeSpec {
    fn default() -> Self {
        Self {
            logo_frac: 0.22,
            pad: true,
            pad_radius: 18,
            pad_margin_px: 10,
        }
    }
}

impl CompositeSpec {
    /// Validate the composite parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.logo_frac > 0.0 && self.logo_frac <= 1.0) {
            return Err(BrandQrError::InvalidParameter(format!(
                "logo fraction must be in (0, 1], got {}",
                self.logo_frac
            )));
        }
        if self.pad_margin_px > crate::MAX_PAD_MARGIN {
            return Err(BrandQrError::InvalidParameter(format!(
                "pad margin must be at most {} pixels, got {}",
                crate::MAX_PAD_MARGIN,
                self.pad_margin_px
            )));
        }
        Ok(())
    }
}

/// Full set of options for a single generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Error correction level
    pub ecc: EccLevel,
    /// Quiet zone width in modules
    pub border: u32,
    /// Pixels per module for PNG output (ignored for SVG)
    pub scale: u32,
    /// Optional logo overlaid at the center
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<PathBuf>,
    /// Logo placement parameters
    #[serde(flatten)]
    pub composite: CompositeSpec,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            ecc: EccLevel::High,
            border: 5,
            scale: 14,
            logo_path: None,
            composite: CompositeSpec::default(),
        }
    }
}

impl GenerateOptions {
    /// Set the logo path
    #[must_use]
    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }

    /// Set the error correction level
    #[must_use]
    pub const fn with_ecc(mut self, ecc: EccLevel) -> Self {
        self.ecc = ecc;
        self
    }

    /// Set the quiet zone width
    #[must_use]
    pub const fn with_border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    /// Set the PNG module scale
    #[must_use]
    pub const fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the composite parameters
    #[must_use]
    pub fn with_composite(mut self, composite: CompositeSpec) -> Self {
        self.composite = composite;
        self
    }

    /// Validate all options
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 || self.scale > crate::MAX_SCALE {
            return Err(BrandQrError::InvalidParameter(format!(
                "scale must be between 1 and {}, got {}",
                crate::MAX_SCALE,
                self.scale
            )));
        }
        if self.border > crate::MAX_BORDER {
            return Err(BrandQrError::InvalidParameter(format!(
                "border must be at most {} modules, got {}",
                crate::MAX_BORDER,
                self.border
            )));
        }

        self.composite.validate()
    }
}

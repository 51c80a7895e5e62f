use thiserror::Error;

/// Result type for brandqr operations
pub type Result<T> = std::result::Result<T, BrandQrError>;

/// Errors that can occur while generating a branded QR code
#[derive(Error, Debug)]
pub enum BrandQrError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported output format {extension:?}: output path must end with .png or .svg")]
    UnsupportedOutputFormat { extension: String },

    #[error("{capability} is not available: {reason}")]
    MissingCapability {
        capability: &'static str,
        reason: String,
    },

    #[error("Failed to load logo: {0}")]
    LogoLoad(String),

    #[error("Malformed SVG markup: {0}")]
    MalformedSvg(String),

    #[error("QR encoding failed: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),
}

impl BrandQrError {
    /// Returns true if the error was caused by the caller's input rather than by
    /// the environment or an asset
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_) | Self::UnsupportedOutputFormat { .. } | Self::Encoding(_)
        )
    }

    /// Returns true if retrying without a logo or with another output format may
    /// succeed
    pub const fn is_missing_capability(&self) -> bool {
        matches!(self, Self::MissingCapability { .. })
    }
}

impl From<qrcode::types::QrError> for BrandQrError {
    fn from(err: qrcode::types::QrError) -> Self {
        Self::Encoding(err.to_string())
    }
}

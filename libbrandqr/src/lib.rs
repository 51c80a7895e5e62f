#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

//! brandqr - Branded QR code generation
//!
//! This library renders QR codes as PNG or SVG and optionally overlays a logo at
//! the center of the symbol. Raster output composites a scaled (and optionally
//! padded) logo onto the QR pixels; vector output injects the logo as an inline
//! `<image>` element without touching the QR module paths.

pub mod encoder;
pub mod error;
pub mod generator;
pub mod logo;
pub mod options;
pub mod placement;
pub mod rasterizer;
pub mod svg;

pub use encoder::QrSymbol;
pub use error::{BrandQrError, Result};
pub use generator::{generate, Artifact, Generator, OutputFormat};
pub use logo::{LogoAsset, LogoKind};
pub use options::{CompositeSpec, EccLevel, GenerateOptions};
pub use rasterizer::VectorRasterizer;

/// Side length of the working canvas vector logos are rasterized onto
pub const VECTOR_RASTER_SIZE: u32 = 1024;

/// Logo file extensions recognised when discovering logos
pub const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg"];

/// Largest accepted pixel scale per QR module
pub const MAX_SCALE: u32 = 256;

/// Largest accepted quiet zone, in modules
pub const MAX_BORDER: u32 = 100;

/// Largest accepted plate margin around a logo, in pixels
pub const MAX_PAD_MARGIN: u32 = 1024;

/// Largest side length of a rendered PNG, in pixels
pub const MAX_RASTER_SIDE: u32 = 16_384;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use brandqr::{EccLevel, GenerateOptions};

/// Option overrides given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub ecc: Option<EccLevel>,
    pub border: Option<u32>,
    pub scale: Option<u32>,
    pub logo: Option<PathBuf>,
    pub logo_frac: Option<f64>,
    pub no_pad: bool,
    pub pad_radius: Option<u32>,
    pub pad_margin: Option<u32>,
}

/// Load options: defaults, then the config file, then command line overrides
pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<GenerateOptions> {
    let mut options = match config_path {
        Some(path) => from_file(path)?,
        None => GenerateOptions::default(),
    };

    if let Some(ecc) = overrides.ecc {
        options.ecc = ecc;
    }
    if let Some(border) = overrides.border {
        options.border = border;
    }
    if let Some(scale) = overrides.scale {
        options.scale = scale;
    }
    if overrides.logo.is_some() {
        options.logo_path = overrides.logo;
    }
    if let Some(frac) = overrides.logo_frac {
        options.composite.logo_frac = frac;
    }
    if overrides.no_pad {
        options.composite.pad = false;
    }
    if let Some(radius) = overrides.pad_radius {
        options.composite.pad_radius = radius;
    }
    if let Some(margin) = overrides.pad_margin {
        options.composite.pad_margin_px = margin;
    }

    Ok(options)
}

/// Parse a TOML config file; missing keys keep their defaults
pub fn from_file(path: &Path) -> Result<GenerateOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
}

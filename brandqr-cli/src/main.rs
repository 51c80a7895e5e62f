#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::match_same_arms,
    clippy::needless_pass_by_value
)]

mod config;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use brandqr::{BrandQrError, EccLevel, GenerateOptions, Generator, LogoAsset, OutputFormat};

use crate::config::Overrides;

/// Branded QR code generator
#[derive(Parser)]
#[command(name = "brandqr")]
#[command(about = "Generate QR codes as PNG or SVG with an optional centered logo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (only errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a QR code for a URL or text
    Generate {
        /// URL or text to encode
        data: String,
        /// Output file; the extension (.png or .svg) selects the format
        #[arg(short, long, default_value = "output/qr_code.png")]
        output: PathBuf,
        /// Logo to place at the center (PNG, JPEG or SVG)
        #[arg(short, long)]
        logo: Option<PathBuf>,
        /// TOML file with default options
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Error correction level (l, m, q, h)
        #[arg(long)]
        ecc: Option<EccLevel>,
        /// Quiet zone width in modules
        #[arg(long)]
        border: Option<u32>,
        /// Pixels per module for PNG output
        #[arg(long)]
        scale: Option<u32>,
        /// Logo width as a fraction of the QR width
        #[arg(long)]
        logo_frac: Option<f64>,
        /// Do not draw a white plate behind the logo
        #[arg(long)]
        no_pad: bool,
        /// Corner radius of the logo plate in pixels
        #[arg(long)]
        pad_radius: Option<u32>,
        /// Margin between the logo and the plate edge in pixels
        #[arg(long)]
        pad_margin: Option<u32>,
        /// Drop an SVG logo instead of failing when PNG output cannot rasterize it
        #[arg(long)]
        drop_unrasterizable_logo: bool,
    },
    /// List logo files in a directory
    Logos {
        /// Directory to search
        #[arg(default_value = "data")]
        dir: PathBuf,
    },
    /// Print the effective options
    Config {
        /// TOML file with default options
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(short, long, default_value = "toml")]
        format: ConfigFormat,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum ConfigFormat {
    Json,
    Toml,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.quiet {
        log::LevelFilter::Error
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Err(e) = run(args) {
        error!("Command failed: {}", e);

        let lib_error = e.downcast_ref::<BrandQrError>();
        if lib_error.is_some_and(BrandQrError::is_missing_capability) {
            print_capability_guidance();
        }

        // Map to appropriate exit codes
        let exit_code = match lib_error {
            Some(err) if err.is_caller_error() => 1,
            Some(BrandQrError::MissingCapability { .. }) => 1,
            Some(BrandQrError::LogoLoad(_) | BrandQrError::ImageError(_)) => 1,
            Some(BrandQrError::IoError(_)) => 1,
            _ => 2,
        };

        process::exit(exit_code);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Generate {
            data,
            output,
            logo,
            config,
            ecc,
            border,
            scale,
            logo_frac,
            no_pad,
            pad_radius,
            pad_margin,
            drop_unrasterizable_logo,
        } => {
            let overrides = Overrides {
                ecc,
                border,
                scale,
                logo,
                logo_frac,
                no_pad,
                pad_radius,
                pad_margin,
            };
            cmd_generate(
                data,
                output,
                config.as_deref(),
                overrides,
                drop_unrasterizable_logo,
            )
        }
        Commands::Logos { dir } => cmd_logos(&dir),
        Commands::Config { config, format } => cmd_config(config.as_deref(), format),
    }
}

fn cmd_generate(
    data: String,
    output: PathBuf,
    config_path: Option<&Path>,
    overrides: Overrides,
    drop_unrasterizable_logo: bool,
) -> Result<()> {
    let data = data.trim();
    if data.is_empty() {
        anyhow::bail!("No data to encode");
    }

    let mut options = config::load(config_path, overrides)?;
    let format = OutputFormat::from_path(&output)?;
    let generator = Generator::new();

    // Caller's choice: go on without the logo rather than fail
    if drop_unrasterizable_logo {
        drop_logo_if_unrasterizable(&generator, format, &mut options);
    }

    info!(
        "Generating {} QR code (ecc {}, border {})",
        format.extension(),
        options.ecc,
        options.border
    );

    let written = generator.generate(data, &output, &options)?;

    info!("Done: {}", written.display());
    info!("Tip: test with multiple scanner apps. If scanning is flaky, try a larger border (4),");
    info!("a smaller logo (--logo-frac 0.18), or keep PNG scale >= 12 for print.");
    Ok(())
}

/// Clear the logo when this build cannot draw it into `format`
///
/// Returns whether the logo was dropped.
fn drop_logo_if_unrasterizable(
    generator: &Generator,
    format: OutputFormat,
    options: &mut GenerateOptions,
) -> bool {
    let Some(logo) = options.logo_path.as_ref().map(LogoAsset::from_path) else {
        return false;
    };
    if generator.check_capabilities(format, Some(&logo)).is_ok() {
        return false;
    }

    warn!(
        "Dropping SVG logo {}: no rasterizer available for PNG output",
        logo.path().display()
    );
    options.logo_path = None;
    true
}

fn cmd_logos(dir: &Path) -> Result<()> {
    let logos = brandqr::logo::discover_logos(dir)?;
    if logos.is_empty() {
        info!("No logos found in {}", dir.display());
        return Ok(());
    }

    for (i, path) in logos.iter().enumerate() {
        println!("{:>3}. {}", i + 1, path.display());
    }
    Ok(())
}

fn cmd_config(config_path: Option<&Path>, format: ConfigFormat) -> Result<()> {
    let options = config::load(config_path, Overrides::default())?;
    options.validate()?;

    println!("{}", render_options(&options, format)?);
    Ok(())
}

fn render_options(options: &GenerateOptions, format: ConfigFormat) -> Result<String> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(options)?,
        ConfigFormat::Toml => toml::to_string_pretty(options)?,
    };
    Ok(output)
}

fn print_capability_guidance() {
    eprintln!("An SVG logo was selected for PNG output, but this build cannot rasterize SVG.");
    eprintln!("Options:");
    eprintln!("  1) Switch to SVG output (e.g. --output qr_code.svg)");
    eprintln!("  2) Use a PNG/JPG logo");
    eprintln!("  3) Rebuild brandqr with the `svg` feature enabled");
    eprintln!("  4) Re-run with --drop-unrasterizable-logo to proceed without the logo");
}

//! Eduplus CLI - Command-line interface for QR code and barcode generation
//!
//! This binary wraps the EduplusQR and EduplusBarcode generator binaries.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use eduplus_cli::commands::{self, OutputArgs};

/// Eduplus - QR code and barcode generation
#[derive(Parser)]
#[command(name = "eduplus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log generator commands and exit codes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a QR code image
    Qr {
        #[command(flatten)]
        args: OutputArgs,

        /// Image size in pixels
        #[arg(long, default_value_t = eduplus_core::qr::DEFAULT_SIZE, allow_hyphen_values = true)]
        size: i64,

        /// Error correction level (L, M, Q, H)
        #[arg(long = "ec", default_value = "M")]
        error_correction: String,

        /// Quiet-zone margin
        #[arg(long, default_value_t = eduplus_core::qr::DEFAULT_MARGIN, allow_hyphen_values = true)]
        margin: i64,
    },

    /// Generate a barcode image
    Barcode {
        #[command(flatten)]
        args: OutputArgs,

        /// Symbology (code128, code39, ean13)
        #[arg(long = "type", default_value = "code128")]
        symbology: String,

        /// Image width in pixels
        #[arg(long, default_value_t = eduplus_core::barcode::DEFAULT_WIDTH, allow_hyphen_values = true)]
        width: i64,

        /// Image height in pixels
        #[arg(long, default_value_t = eduplus_core::barcode::DEFAULT_HEIGHT, allow_hyphen_values = true)]
        height: i64,
    },

    /// Check that the generator binaries are installed
    Doctor {
        /// JSON file with `qr_binary_path` / `barcode_binary_path`
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Qr {
            args,
            size,
            error_correction,
            margin,
        } => commands::qr::run(&args, size, &error_correction, margin),
        Commands::Barcode {
            args,
            symbology,
            width,
            height,
        } => commands::barcode::run(&args, &symbology, width, height),
        Commands::Doctor { config } => commands::doctor::run(config.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

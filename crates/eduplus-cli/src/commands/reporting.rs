//! Shared output flags, binary path loading and result reporting

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use eduplus_core::{BinaryKey, BinaryPaths, CodeKind, Generator};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

/// Flags shared by every generator command.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Text to encode
    #[arg(short, long)]
    pub text: String,

    /// Output image path (parent directories are created)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Generator binary to use instead of the configured one
    #[arg(long)]
    pub binary: Option<PathBuf>,

    /// JSON file with `qr_binary_path` / `barcode_binary_path`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Kill the generator after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the generated image as base64 on stdout
    #[arg(long)]
    pub base64: bool,
}

impl OutputArgs {
    /// Binary paths for `key`, honoring `--binary` then `--config` then the environment.
    pub fn binary_paths(&self, key: BinaryKey) -> Result<BinaryPaths> {
        if let Some(ref binary) = self.binary {
            let paths = match key {
                BinaryKey::Qr => BinaryPaths::new().qr(binary),
                BinaryKey::Barcode => BinaryPaths::new().barcode(binary),
            };
            return Ok(paths);
        }

        load_binary_paths(self.config.as_deref())
    }
}

/// Loads paths from an optional config file, filling gaps from the environment.
pub(crate) fn load_binary_paths(config: Option<&std::path::Path>) -> Result<BinaryPaths> {
    let paths = match config {
        Some(path) => BinaryPaths::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
            .or_env(),
        None => BinaryPaths::from_env(),
    };
    debug!(?paths, "Resolved binary paths");
    Ok(paths)
}

/// Runs a configured generator and reports the outcome.
pub(crate) fn run_generator<K: CodeKind>(
    generator: &mut Generator<K>,
    args: &OutputArgs,
) -> Result<ExitCode> {
    if let Some(secs) = args.timeout {
        generator.timeout(Duration::from_secs(secs));
    }

    if args.base64 {
        if let Some(encoded) = generator.generate_base64() {
            println!("{}", encoded);
            return Ok(ExitCode::SUCCESS);
        }
    } else if generator.generate() {
        eprintln!(
            "{} {} written to {}",
            "ok".green(),
            K::LABEL,
            args.output.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    print_errors(K::LABEL, generator.errors());
    Ok(ExitCode::from(1))
}

fn print_errors(label: &str, errors: &[String]) {
    eprintln!("{} {} generation failed", "error:".red().bold(), label);
    for error in errors {
        eprintln!("  {} {}", "-".red(), error);
    }
}

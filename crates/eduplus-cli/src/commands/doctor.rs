//! Doctor command implementation
//!
//! Checks that the generator binaries resolve to existing files.

use anyhow::Result;
use colored::Colorize;
use eduplus_core::{BinaryKey, BinaryPathResolver};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::reporting::load_binary_paths;

/// Resolution status of one generator binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryStatus {
    /// Resolved to an existing file.
    Found(PathBuf),
    /// Resolved, but nothing is there.
    Missing(PathBuf),
    /// Nothing configured.
    Unconfigured,
}

/// Checks a resolver's answer for `key`.
pub fn check_binary<R: BinaryPathResolver + ?Sized>(resolver: &R, key: BinaryKey) -> BinaryStatus {
    match resolver.resolve(key) {
        Some(path) if path.is_file() => BinaryStatus::Found(path),
        Some(path) => BinaryStatus::Missing(path),
        None => BinaryStatus::Unconfigured,
    }
}

/// Run the doctor command
///
/// # Returns
/// Exit code: 0 if both binaries are found, 1 otherwise
pub fn run(config: Option<&Path>) -> Result<ExitCode> {
    println!("{}", "Eduplus Doctor".cyan().bold());
    println!("{}", "==============".cyan());
    println!();

    println!("{}", "Versions:".bold());
    println!(
        "  {} eduplus-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    let paths = load_binary_paths(config)?;
    let mut all_ok = true;

    println!("{}", "Binaries:".bold());
    for key in BinaryKey::ALL {
        match check_binary(&paths, key) {
            BinaryStatus::Found(path) => {
                println!("  {} {} -> {}", "ok".green(), key, path.display());
            }
            BinaryStatus::Missing(path) => {
                all_ok = false;
                println!("  {} {} -> {} (not found)", "!!".red(), key, path.display());
                println!(
                    "     {}",
                    format!("Set {} to the generator binary.", key.env_var()).dimmed()
                );
            }
            BinaryStatus::Unconfigured => {
                all_ok = false;
                println!("  {} {} is not configured", "!!".red(), key);
            }
        }
    }

    println!();
    if all_ok {
        println!("{}", "All checks passed.".green());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", "Some checks failed.".red());
        Ok(ExitCode::from(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduplus_core::BinaryPaths;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_binary_states() {
        let this_binary = std::env::current_exe().unwrap();
        let paths = BinaryPaths::new()
            .qr(&this_binary)
            .barcode("/nonexistent/EduplusBarcode");

        assert_eq!(
            check_binary(&paths, BinaryKey::Qr),
            BinaryStatus::Found(this_binary)
        );
        assert_eq!(
            check_binary(&paths, BinaryKey::Barcode),
            BinaryStatus::Missing(PathBuf::from("/nonexistent/EduplusBarcode"))
        );
        assert_eq!(
            check_binary(&BinaryPaths::new(), BinaryKey::Qr),
            BinaryStatus::Unconfigured
        );
    }
}

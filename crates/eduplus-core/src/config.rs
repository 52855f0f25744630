//! Generator binary path resolution.
//!
//! Generators never read global configuration. They are handed a
//! [`BinaryPathResolver`] at construction and ask it once for their binary.
//!
//! [`BinaryPaths::from_env`] is the usual resolver. For each kind it checks:
//!
//! 1. `EDUPLUS_QR_BINARY_PATH` / `EDUPLUS_BARCODE_BINARY_PATH`
//! 2. `/usr/local/bin/<platform binary name>`
//! 3. The platform binary name on `PATH`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CodegenError, CodegenResult};

/// Directory the generator binaries are installed to by default.
pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";

/// Logical name of a generator binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryKey {
    /// The QR code generator.
    Qr,
    /// The barcode generator.
    Barcode,
}

impl BinaryKey {
    /// All keys.
    pub const ALL: [BinaryKey; 2] = [BinaryKey::Qr, BinaryKey::Barcode];

    /// Configuration key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryKey::Qr => "qr_binary_path",
            BinaryKey::Barcode => "barcode_binary_path",
        }
    }

    /// Environment variable overriding this binary's path.
    pub fn env_var(&self) -> &'static str {
        match self {
            BinaryKey::Qr => "EDUPLUS_QR_BINARY_PATH",
            BinaryKey::Barcode => "EDUPLUS_BARCODE_BINARY_PATH",
        }
    }

    /// Release file name for the current platform, e.g. `EduplusQR-linux-amd64`.
    pub fn platform_binary_name(&self) -> String {
        let stem = match self {
            BinaryKey::Qr => "EduplusQR",
            BinaryKey::Barcode => "EduplusBarcode",
        };
        let name = format!("{}-{}-{}", stem, platform_os(), platform_arch());
        if cfg!(windows) {
            format!("{}.exe", name)
        } else {
            name
        }
    }

    /// Hardcoded default install location.
    pub fn default_path(&self) -> PathBuf {
        Path::new(DEFAULT_INSTALL_DIR).join(self.platform_binary_name())
    }
}

impl std::fmt::Display for BinaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn platform_os() -> &'static str {
    if cfg!(target_os = "macos") {
        "darwin"
    } else if cfg!(windows) {
        "windows"
    } else {
        "linux"
    }
}

fn platform_arch() -> &'static str {
    if cfg!(target_arch = "aarch64") {
        "arm64"
    } else {
        "amd64"
    }
}

/// Maps a logical binary name to a filesystem path.
pub trait BinaryPathResolver {
    /// Returns the configured path, or `None` if nothing is configured.
    fn resolve(&self, key: BinaryKey) -> Option<PathBuf>;
}

impl<F> BinaryPathResolver for F
where
    F: Fn(BinaryKey) -> Option<PathBuf>,
{
    fn resolve(&self, key: BinaryKey) -> Option<PathBuf> {
        self(key)
    }
}

/// Explicit paths for both generator binaries.
///
/// Deserializes from JSON using the configuration key names:
///
/// ```json
/// { "qr_binary_path": "/opt/eduplus/EduplusQR", "barcode_binary_path": null }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryPaths {
    #[serde(rename = "qr_binary_path", default)]
    pub qr: Option<PathBuf>,
    #[serde(rename = "barcode_binary_path", default)]
    pub barcode: Option<PathBuf>,
}

impl BinaryPaths {
    /// Creates an empty set of paths. Every lookup resolves to `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the QR binary path.
    pub fn qr(mut self, path: impl Into<PathBuf>) -> Self {
        self.qr = Some(path.into());
        self
    }

    /// Sets the barcode binary path.
    pub fn barcode(mut self, path: impl Into<PathBuf>) -> Self {
        self.barcode = Some(path.into());
        self
    }

    /// Resolves both paths from the environment, install directory, and `PATH`.
    pub fn from_env() -> Self {
        Self {
            qr: Some(resolve_from_env(BinaryKey::Qr)),
            barcode: Some(resolve_from_env(BinaryKey::Barcode)),
        }
    }

    /// Loads paths from a JSON config file.
    pub fn from_json_file(path: &Path) -> CodegenResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CodegenError::ConfigLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| CodegenError::ConfigLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Fills any missing path from [`BinaryPaths::from_env`] resolution.
    pub fn or_env(self) -> Self {
        Self {
            qr: self.qr.or_else(|| Some(resolve_from_env(BinaryKey::Qr))),
            barcode: self
                .barcode
                .or_else(|| Some(resolve_from_env(BinaryKey::Barcode))),
        }
    }
}

impl BinaryPathResolver for BinaryPaths {
    fn resolve(&self, key: BinaryKey) -> Option<PathBuf> {
        match key {
            BinaryKey::Qr => self.qr.clone(),
            BinaryKey::Barcode => self.barcode.clone(),
        }
    }
}

/// Resolves a single key. Falls back to the default path even when it does
/// not exist, so the generator reports a missing binary rather than an
/// unconfigured one.
fn resolve_from_env(key: BinaryKey) -> PathBuf {
    if let Some(path) = std::env::var_os(key.env_var()) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    let default_path = key.default_path();
    if default_path.is_file() {
        return default_path;
    }

    if let Ok(path) = which::which(key.platform_binary_name()) {
        return path;
    }

    default_path
}

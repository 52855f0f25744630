//! Error types for the Eduplus generators.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for generator operations.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that can occur while configuring or running a generator binary.
///
/// Builders never return these directly; their `Display` text is what lands
/// in a generator's error list.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Failed to spawn the generator process.
    #[error("Failed to start '{program}': {source}")]
    SpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed while waiting on or reading from the generator process.
    #[error("Failed to wait for generator process: {0}")]
    WaitFailed(#[source] std::io::Error),

    /// Generator process exceeded the caller's deadline.
    #[error("Generator process timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// Failed to create the output directory.
    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the generated artifact back.
    #[error("Failed to read generated file {path}: {source}")]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to resolve a path against the working directory.
    #[error("Failed to resolve path {path}: {source}")]
    ResolvePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load a binary path configuration file.
    #[error("Failed to load binary path config {path}: {message}")]
    ConfigLoad { path: PathBuf, message: String },

    /// QR error correction level outside L, M, Q, H.
    #[error("Invalid error correction level: {value}. Use L, M, Q, or H.")]
    InvalidErrorCorrection { value: String },

    /// Barcode symbology outside code128, code39, ean13.
    #[error("Invalid barcode type: {value}. Use code128, code39, or ean13.")]
    InvalidSymbology { value: String },
}

impl CodegenError {
    /// Creates a new spawn failed error.
    pub fn spawn_failed(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            program: program.into(),
            source,
        }
    }

    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CodegenError::SpawnFailed { .. } => "CODEGEN_001",
            CodegenError::WaitFailed(_) => "CODEGEN_002",
            CodegenError::Timeout { .. } => "CODEGEN_003",
            CodegenError::CreateOutputDir { .. } => "CODEGEN_004",
            CodegenError::ReadOutput { .. } => "CODEGEN_005",
            CodegenError::ConfigLoad { .. } => "CODEGEN_006",
            CodegenError::InvalidErrorCorrection { .. } => "CODEGEN_007",
            CodegenError::InvalidSymbology { .. } => "CODEGEN_008",
            CodegenError::ResolvePath { .. } => "CODEGEN_009",
        }
    }

    /// Broad category used when grouping diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            CodegenError::SpawnFailed { .. }
            | CodegenError::WaitFailed(_)
            | CodegenError::Timeout { .. } => "execution",
            CodegenError::CreateOutputDir { .. }
            | CodegenError::ReadOutput { .. }
            | CodegenError::ResolvePath { .. } => "filesystem",
            CodegenError::ConfigLoad { .. } => "configuration",
            CodegenError::InvalidErrorCorrection { .. } | CodegenError::InvalidSymbology { .. } => {
                "validation"
            }
        }
    }
}

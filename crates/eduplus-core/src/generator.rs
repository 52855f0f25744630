//! The generator engine shared by every code kind.
//!
//! A [`Generator`] is a mutable builder. Setters return `&mut Self` so calls
//! chain, and invalid input never aborts the chain: it is recorded in the
//! generator's error list and the previous value is kept.
//!
//! ```no_run
//! use eduplus_core::{BinaryPaths, QrCode};
//!
//! let paths = BinaryPaths::from_env();
//! let mut qr = QrCode::create(&paths);
//! qr.text("https://example.com").output("out/qr.png").size(512);
//!
//! if !qr.generate() {
//!     for error in qr.errors() {
//!         eprintln!("{}", error);
//!     }
//! }
//! ```

use std::ffi::OsString;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use tracing::{debug, warn};

use crate::args::build_arguments;
use crate::config::BinaryPathResolver;
use crate::error::{CodegenError, CodegenResult};
use crate::kind::CodeKind;
use crate::runner::{display_command, CommandRunner, ProcessRunner, RunOptions};

/// Recorded when `generate` is called without text.
pub const TEXT_REQUIRED: &str = "Text is required";
/// Recorded when `generate` is called without an output path.
pub const OUTPUT_REQUIRED: &str = "Output path is required";
/// Recorded when the binary is unresolved or gone at generate time.
pub const BINARY_NOT_AVAILABLE: &str = "Binary not available";

/// Builder and runner for one generator binary.
pub struct Generator<K: CodeKind> {
    binary_path: Option<PathBuf>,
    text: Option<String>,
    output: Option<PathBuf>,
    options: K::Options,
    run_options: RunOptions,
    runner: Arc<dyn CommandRunner>,
    errors: Vec<String>,
    _kind: PhantomData<K>,
}

impl<K: CodeKind> Generator<K> {
    /// Creates a generator, asking `resolver` for the binary path.
    ///
    /// A missing binary is recorded as an error but still yields a usable
    /// generator; `generate` will fail with [`BINARY_NOT_AVAILABLE`].
    pub fn create<R>(resolver: &R) -> Self
    where
        R: BinaryPathResolver + ?Sized,
    {
        Self::new(resolver.resolve(K::BINARY_KEY))
    }

    /// Creates a generator for an explicit binary path.
    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self::new(Some(path.into()))
    }

    fn new(binary_path: Option<PathBuf>) -> Self {
        let mut generator = Self {
            binary_path,
            text: None,
            output: None,
            options: K::Options::default(),
            run_options: RunOptions::default(),
            runner: Arc::new(ProcessRunner::new()),
            errors: Vec::new(),
            _kind: PhantomData,
        };

        match generator.binary_path {
            Some(ref path) if binary_available(path) => {
                debug!(kind = K::LABEL, binary = %path.display(), "Resolved generator binary");
            }
            _ => generator.record_error(K::binary_not_found()),
        }

        generator
    }

    /// Sets the text to encode.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the path the binary writes its image to.
    pub fn output(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.output = Some(path.into());
        self
    }

    /// Sets the working directory of the generator process.
    pub fn working_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.run_options.working_dir = Some(dir.into());
        self
    }

    /// Adds an environment variable for the generator process.
    pub fn env(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> &mut Self {
        self.run_options.env.push((key.into(), value.into()));
        self
    }

    /// Kills the generator process if it runs longer than `timeout`.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.run_options.timeout = Some(timeout);
        self
    }

    /// Replaces the command runner.
    pub fn with_runner(&mut self, runner: Arc<dyn CommandRunner>) -> &mut Self {
        self.runner = runner;
        self
    }

    /// Runs the binary. Returns true once the output file exists.
    ///
    /// Each call re-validates and re-runs the binary. On failure the reason
    /// is appended to [`errors`](Self::errors).
    ///
    /// With a [`working_dir`](Self::working_dir) set, relative output and
    /// binary paths are resolved against it, the way the child sees them.
    pub fn generate(&mut self) -> bool {
        self.generate_to_path().is_some()
    }

    fn generate_to_path(&mut self) -> Option<PathBuf> {
        match self.try_generate() {
            Ok(output) => Some(output),
            Err(message) => {
                self.record_error(message);
                None
            }
        }
    }

    fn try_generate(&self) -> Result<PathBuf, String> {
        let text = match self.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => return Err(TEXT_REQUIRED.to_string()),
        };

        let output = match self.output.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => self.anchor(path)?,
            _ => return Err(OUTPUT_REQUIRED.to_string()),
        };

        let binary = match self.binary_path.as_deref() {
            Some(path) => self.anchor(path)?,
            None => return Err(BINARY_NOT_AVAILABLE.to_string()),
        };
        if !binary_available(&binary) {
            return Err(BINARY_NOT_AVAILABLE.to_string());
        }

        ensure_parent_dir(&output).map_err(|e| e.to_string())?;

        let args = build_arguments::<K>(text, &output, &self.options);
        debug!(kind = K::LABEL, command = %display_command(&binary, &args), "Running generator");

        let result = self
            .runner
            .run(&binary, &args, &self.run_options)
            .map_err(|e| e.to_string())?;

        debug!(kind = K::LABEL, exit_code = result.exit_code, "Generator finished");

        if !result.success() {
            if result.lines.is_empty() {
                return Err(format!(
                    "{} binary exited with status {}",
                    K::LABEL,
                    result.exit_code
                ));
            }
            return Err(result.combined());
        }

        if !output.exists() {
            return Err(K::GENERATION_FAILED.to_string());
        }

        Ok(output)
    }

    fn anchor(&self, path: &Path) -> Result<PathBuf, String> {
        anchor_path(path, self.run_options.working_dir.as_deref()).map_err(|e| e.to_string())
    }

    /// Generates and returns the raw bytes of the output file.
    ///
    /// `None` means failure; the reason is in [`errors`](Self::errors).
    pub fn generate_and_return(&mut self) -> Option<Vec<u8>> {
        let path = self.generate_to_path()?;

        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(source) => {
                self.record_error(CodegenError::ReadOutput { path, source }.to_string());
                None
            }
        }
    }

    /// Generates and returns the output file as standard Base64.
    pub fn generate_base64(&mut self) -> Option<String> {
        self.generate_and_return()
            .map(|bytes| base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    /// Errors recorded so far, oldest first.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The most recent error.
    pub fn last_error(&self) -> Option<&str> {
        self.errors.last().map(String::as_str)
    }

    /// Returns true if any error has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Resolved binary path, if any.
    pub fn binary_path(&self) -> Option<&Path> {
        self.binary_path.as_deref()
    }

    /// Stored text, if set.
    pub fn text_value(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Stored output path, if set.
    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Current kind-specific options.
    pub fn options(&self) -> &K::Options {
        &self.options
    }

    pub(crate) fn options_mut(&mut self) -> &mut K::Options {
        &mut self.options
    }

    pub(crate) fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(kind = K::LABEL, "{}", message);
        self.errors.push(message);
    }
}

impl<K: CodeKind> fmt::Debug for Generator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("kind", &K::LABEL)
            .field("binary_path", &self.binary_path)
            .field("text", &self.text)
            .field("output", &self.output)
            .field("options", &self.options)
            .field("run_options", &self.run_options)
            .field("errors", &self.errors)
            .finish()
    }
}

fn binary_available(path: &Path) -> bool {
    path.is_file()
}

/// Resolves a relative `path` against `working_dir`, when one is set.
///
/// A relative `working_dir` is itself taken from the current directory, so
/// the result does not depend on which cwd later opens it.
fn anchor_path(path: &Path, working_dir: Option<&Path>) -> CodegenResult<PathBuf> {
    let dir = match working_dir {
        Some(dir) if path.is_relative() => dir,
        _ => return Ok(path.to_path_buf()),
    };

    if dir.is_absolute() {
        return Ok(dir.join(path));
    }

    let cwd = std::env::current_dir().map_err(|source| CodegenError::ResolvePath {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(dir).join(path))
}

/// Creates the output's parent directory chain with mode 0755.
fn ensure_parent_dir(output: &Path) -> CodegenResult<()> {
    let Some(parent) = output.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    // Recursive creation treats an existing directory as success, so a
    // concurrent creator is not an error.
    builder
        .create(parent)
        .map_err(|source| CodegenError::CreateOutputDir {
            path: parent.to_path_buf(),
            source,
        })
}

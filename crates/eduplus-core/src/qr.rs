//! QR code generator.
//!
//! Binary contract: `-t TEXT -o PATH -size N -ec {L|M|Q|H} -margin N`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::args::ArgumentBuilder;
use crate::config::{BinaryKey, BinaryPathResolver};
use crate::error::CodegenError;
use crate::generator::Generator;
use crate::kind::CodeKind;

/// Default image size in pixels.
pub const DEFAULT_SIZE: i64 = 256;
/// Default quiet-zone margin.
pub const DEFAULT_MARGIN: i64 = 0;

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    #[default]
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

impl ErrorCorrection {
    /// The flag value passed to the binary.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCorrection::L => "L",
            ErrorCorrection::M => "M",
            ErrorCorrection::Q => "Q",
            ErrorCorrection::H => "H",
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrection {
    type Err = CodegenError;

    /// Levels are single upper-case letters; `"m"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(ErrorCorrection::L),
            "M" => Ok(ErrorCorrection::M),
            "Q" => Ok(ErrorCorrection::Q),
            "H" => Ok(ErrorCorrection::H),
            _ => Err(CodegenError::InvalidErrorCorrection {
                value: s.to_string(),
            }),
        }
    }
}

/// QR-specific options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrOptions {
    pub size: i64,
    pub error_correction: ErrorCorrection,
    pub margin: i64,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            error_correction: ErrorCorrection::default(),
            margin: DEFAULT_MARGIN,
        }
    }
}

/// QR code kind descriptor.
#[derive(Debug)]
pub struct Qr;

impl CodeKind for Qr {
    type Options = QrOptions;

    const BINARY_KEY: BinaryKey = BinaryKey::Qr;
    const LABEL: &'static str = "QR";
    const GENERATION_FAILED: &'static str = "QR code generation failed";

    fn push_options(options: &QrOptions, args: &mut ArgumentBuilder) {
        args.int_flag("-size", options.size)
            .flag("-ec", options.error_correction.as_str())
            .int_flag("-margin", options.margin);
    }
}

/// QR code generator.
pub type QrCode = Generator<Qr>;

impl Generator<Qr> {
    /// Sets the image size. Not range checked.
    pub fn size(&mut self, size: i64) -> &mut Self {
        self.options_mut().size = size;
        self
    }

    /// Sets the error correction level from `L`, `M`, `Q` or `H`.
    ///
    /// Anything else is recorded as an error and the current level is kept.
    pub fn error_correction(&mut self, level: &str) -> &mut Self {
        match level.parse::<ErrorCorrection>() {
            Ok(level) => self.options_mut().error_correction = level,
            Err(e) => self.record_error(e.to_string()),
        }
        self
    }

    /// Sets the error correction level.
    pub fn error_correction_level(&mut self, level: ErrorCorrection) -> &mut Self {
        self.options_mut().error_correction = level;
        self
    }

    /// Sets the quiet-zone margin. Not range checked.
    pub fn margin(&mut self, margin: i64) -> &mut Self {
        self.options_mut().margin = margin;
        self
    }

    /// One-shot `create`, `text`, `output`, `size`, `generate`.
    pub fn quick<R>(resolver: &R, text: &str, output: impl Into<PathBuf>, size: i64) -> bool
    where
        R: BinaryPathResolver + ?Sized,
    {
        Self::create(resolver).text(text).output(output).size(size).generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::tests::{Fixture, RecordingRunner};
    use crate::config::BinaryPaths;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_error_correction_parse() {
        assert_eq!("L".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::L);
        assert_eq!("H".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::H);
        assert!("h".parse::<ErrorCorrection>().is_err());
        assert!("".parse::<ErrorCorrection>().is_err());
        assert!("MEDIUM".parse::<ErrorCorrection>().is_err());
    }

    #[test]
    fn test_defaults() {
        let options = QrOptions::default();
        assert_eq!(options.size, 256);
        assert_eq!(options.error_correction, ErrorCorrection::M);
        assert_eq!(options.margin, 0);
    }

    #[test]
    fn test_invalid_level_keeps_previous_value() {
        let fixture = Fixture::new();
        let mut qr = QrCode::with_binary(&fixture.binary);
        qr.error_correction("H").error_correction("X");

        assert_eq!(qr.options().error_correction, ErrorCorrection::H);
        assert_eq!(
            qr.errors(),
            &["Invalid error correction level: X. Use L, M, Q, or H."]
        );
    }

    #[test]
    fn test_each_invalid_level_adds_one_error() {
        let fixture = Fixture::new();
        let mut qr = QrCode::with_binary(&fixture.binary);
        for bad in ["X", "l", "LM", " M", ""] {
            let before = qr.errors().len();
            qr.error_correction(bad);
            assert_eq!(qr.errors().len(), before + 1);
            assert!(qr.last_error().unwrap().contains("Use L, M, Q, or H."));
            assert_eq!(qr.options().error_correction, ErrorCorrection::M);
        }
    }

    #[test]
    fn test_numeric_setters_are_not_range_checked() {
        let fixture = Fixture::new();
        let mut qr = QrCode::with_binary(&fixture.binary);
        qr.size(-10).margin(-3);

        assert_eq!(qr.options().size, -10);
        assert_eq!(qr.options().margin, -3);
        assert!(!qr.has_errors());
    }

    #[test]
    fn test_typed_level_setter() {
        let fixture = Fixture::new();
        let mut qr = QrCode::with_binary(&fixture.binary);
        qr.error_correction_level(ErrorCorrection::Q);
        assert_eq!(qr.options().error_correction, ErrorCorrection::Q);
    }

    #[test]
    fn test_quick_missing_binary() {
        let fixture = Fixture::new();
        let paths = BinaryPaths::new();
        assert!(!QrCode::quick(&paths, "hello", fixture.out("qr.png"), 256));
    }

    #[test]
    fn test_generation_failed_wording() {
        let fixture = Fixture::new();
        let mut qr = QrCode::with_binary(&fixture.binary);
        qr.with_runner(Arc::new(RecordingRunner::default()))
            .text("hello")
            .output(fixture.out("qr.png"));

        assert!(!qr.generate());
        assert_eq!(qr.last_error(), Some("QR code generation failed"));
    }
}

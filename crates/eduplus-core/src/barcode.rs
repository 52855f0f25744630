//! Barcode generator.
//!
//! Binary contract: `-t TEXT -o PATH -type {code128|code39|ean13} -w N -height N`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::args::ArgumentBuilder;
use crate::config::{BinaryKey, BinaryPathResolver};
use crate::error::CodegenError;
use crate::generator::Generator;
use crate::kind::CodeKind;

/// Default image width in pixels.
pub const DEFAULT_WIDTH: i64 = 300;
/// Default image height in pixels.
pub const DEFAULT_HEIGHT: i64 = 100;

/// Barcode symbology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symbology {
    #[default]
    Code128,
    Code39,
    Ean13,
}

impl Symbology {
    /// All supported symbologies.
    pub const ALL: [Symbology; 3] = [Symbology::Code128, Symbology::Code39, Symbology::Ean13];

    /// The flag value passed to the binary.
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbology::Code128 => "code128",
            Symbology::Code39 => "code39",
            Symbology::Ean13 => "ean13",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbology {
    type Err = CodegenError;

    /// Case-insensitive: `"CODE39"` parses as [`Symbology::Code39`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Symbology::ALL
            .into_iter()
            .find(|sym| sym.as_str() == lower)
            .ok_or_else(|| CodegenError::InvalidSymbology {
                value: s.to_string(),
            })
    }
}

/// Barcode-specific options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeOptions {
    pub symbology: Symbology,
    pub width: i64,
    pub height: i64,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            symbology: Symbology::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Barcode kind descriptor.
#[derive(Debug)]
pub struct Barcode;

impl CodeKind for Barcode {
    type Options = BarcodeOptions;

    const BINARY_KEY: BinaryKey = BinaryKey::Barcode;
    const LABEL: &'static str = "Barcode";
    const GENERATION_FAILED: &'static str = "Barcode generation failed";

    fn push_options(options: &BarcodeOptions, args: &mut ArgumentBuilder) {
        args.flag("-type", options.symbology.as_str())
            .int_flag("-w", options.width)
            .int_flag("-height", options.height);
    }
}

/// Barcode generator.
pub type BarCode = Generator<Barcode>;

impl Generator<Barcode> {
    /// Sets the symbology from `code128`, `code39` or `ean13`, ignoring case.
    ///
    /// Anything else is recorded as an error and the current symbology is kept.
    pub fn symbology(&mut self, symbology: &str) -> &mut Self {
        match symbology.parse::<Symbology>() {
            Ok(symbology) => self.options_mut().symbology = symbology,
            Err(e) => self.record_error(e.to_string()),
        }
        self
    }

    /// Sets the symbology.
    pub fn symbology_kind(&mut self, symbology: Symbology) -> &mut Self {
        self.options_mut().symbology = symbology;
        self
    }

    /// Sets the image width. Not range checked.
    pub fn width(&mut self, width: i64) -> &mut Self {
        self.options_mut().width = width;
        self
    }

    /// Sets the image height. Not range checked.
    pub fn height(&mut self, height: i64) -> &mut Self {
        self.options_mut().height = height;
        self
    }

    /// One-shot `create`, `text`, `output`, `symbology`, `width`, `height`,
    /// `generate`.
    pub fn quick<R>(
        resolver: &R,
        text: &str,
        output: impl Into<PathBuf>,
        symbology: &str,
        width: i64,
        height: i64,
    ) -> bool
    where
        R: BinaryPathResolver + ?Sized,
    {
        Self::create(resolver)
            .text(text)
            .output(output)
            .symbology(symbology)
            .width(width)
            .height(height)
            .generate()
    }
}

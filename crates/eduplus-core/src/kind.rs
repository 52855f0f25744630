//! Per-kind generator descriptors.

use std::fmt::Debug;

use crate::args::ArgumentBuilder;
use crate::config::BinaryKey;

/// Describes one generator binary: where it is configured, its default
/// options, how those options map to flags, and its failure wording.
///
/// The shared engine in [`crate::generator`] is parameterized by this trait;
/// kind-specific setters live in `impl Generator<K>` blocks next to each
/// descriptor.
pub trait CodeKind: Debug + Send + Sync + 'static {
    /// Kind-specific options. `Default` supplies the documented defaults.
    type Options: Debug + Clone + Default + PartialEq + Send + Sync;

    /// Configuration key for the binary.
    const BINARY_KEY: BinaryKey;

    /// Human-readable label, e.g. `QR` or `Barcode`.
    const LABEL: &'static str;

    /// Error recorded when the binary exits 0 without writing its output.
    const GENERATION_FAILED: &'static str;

    /// Appends the kind's flags after `-t` and `-o`.
    fn push_options(options: &Self::Options, args: &mut ArgumentBuilder);

    /// Error recorded at construction when the binary can't be found.
    fn binary_not_found() -> String {
        format!(
            "{} binary not found. Set {} or configure '{}'",
            Self::LABEL,
            Self::BINARY_KEY.env_var(),
            Self::BINARY_KEY.as_str()
        )
    }
}

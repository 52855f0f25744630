//! Argument vector construction for generator binaries.
//!
//! Every logical value becomes exactly one argv element. Quoting is never
//! needed because nothing is passed through a shell.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::kind::CodeKind;

/// Accumulates `flag value` pairs in order.
#[derive(Debug, Clone, Default)]
pub struct ArgumentBuilder {
    args: Vec<OsString>,
}

impl ArgumentBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a flag followed by its value.
    pub fn flag(&mut self, name: &str, value: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(OsString::from(name));
        self.args.push(value.as_ref().to_os_string());
        self
    }

    /// Appends a flag followed by an integer value.
    pub fn int_flag(&mut self, name: &str, value: i64) -> &mut Self {
        self.flag(name, value.to_string())
    }

    /// Returns the argument vector.
    pub fn finish(self) -> Vec<OsString> {
        self.args
    }
}

/// Builds the full argument vector for a kind: `-t <text> -o <output>` then
/// the kind's own flags.
pub fn build_arguments<K: CodeKind>(
    text: &str,
    output: &Path,
    options: &K::Options,
) -> Vec<OsString> {
    let mut args = ArgumentBuilder::new();
    args.flag("-t", text).flag("-o", output);
    K::push_options(options, &mut args);
    args.finish()
}

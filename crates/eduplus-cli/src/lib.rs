//! Eduplus CLI library.
//!
//! Command implementations for the `eduplus` binary. Each command builds a
//! generator from `eduplus-core`, runs it, and maps the outcome to an exit code.

pub mod commands;

//! Eduplus End-to-End Test Infrastructure
//!
//! Integration tests that run the real subprocess path against fake
//! generator binaries written as shell scripts.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p eduplus-tests
//! ```
//!
//! The fake binaries are `/bin/sh` scripts, so the tests only run on unix.

#[cfg(unix)]
pub mod harness;

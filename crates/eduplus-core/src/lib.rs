//! Eduplus code generators
//!
//! This crate drives the external EduplusQR and EduplusBarcode binaries. It
//! validates options, passes them to the binary as an argv array, and
//! reports the result.
//!
//! # Overview
//!
//! | Generator | Binary flags |
//! |-----------|--------------|
//! | [`QrCode`] | `-t TEXT -o PATH -size N -ec {L,M,Q,H} -margin N` |
//! | [`BarCode`] | `-t TEXT -o PATH -type {code128,code39,ean13} -w N -height N` |
//!
//! Both are [`Generator`] instances over a small [`CodeKind`] descriptor.
//! Expected failures never panic or return `Err`: `generate` returns
//! `false` and the reason is appended to the generator's ordered error list.
//!
//! # Example
//!
//! ```no_run
//! use eduplus_core::{BarCode, BinaryPaths};
//!
//! let paths = BinaryPaths::from_env();
//! let mut barcode = BarCode::create(&paths);
//! barcode
//!     .text("4006381333931")
//!     .output("labels/item.png")
//!     .symbology("ean13");
//!
//! match barcode.generate_base64() {
//!     Some(png) => println!("data:image/png;base64,{}", png),
//!     None => eprintln!("{}", barcode.errors().join("\n")),
//! }
//! ```
//!
//! # Crate Structure
//!
//! - [`config`] - Binary path resolution
//! - [`runner`] - Subprocess execution
//! - [`args`] - Argument vector construction
//! - [`generator`] - The shared builder engine
//! - [`qr`] - QR code kind and setters
//! - [`barcode`] - Barcode kind and setters
//! - [`error`] - Error types

pub mod args;
pub mod barcode;
pub mod config;
pub mod error;
pub mod generator;
pub mod kind;
pub mod qr;
pub mod runner;

// Re-export main types at crate root
pub use barcode::{BarCode, Barcode, BarcodeOptions, Symbology};
pub use config::{BinaryKey, BinaryPathResolver, BinaryPaths};
pub use error::{CodegenError, CodegenResult};
pub use generator::{Generator, BINARY_NOT_AVAILABLE, OUTPUT_REQUIRED, TEXT_REQUIRED};
pub use kind::CodeKind;
pub use qr::{ErrorCorrection, Qr, QrCode, QrOptions};
pub use runner::{CommandRunner, ProcessRunner, RunOptions, RunOutput};

//! QR command implementation

use anyhow::Result;
use eduplus_core::{BinaryKey, QrCode};
use std::process::ExitCode;

use super::reporting::run_generator;
use super::OutputArgs;

/// Run the qr command
///
/// # Arguments
/// * `args` - Text, output and binary selection
/// * `size` - Image size in pixels
/// * `error_correction` - One of L, M, Q, H
/// * `margin` - Quiet-zone margin
pub fn run(args: &OutputArgs, size: i64, error_correction: &str, margin: i64) -> Result<ExitCode> {
    let paths = args.binary_paths(BinaryKey::Qr)?;

    let mut qr = QrCode::create(&paths);
    qr.text(args.text.as_str())
        .output(&args.output)
        .size(size)
        .error_correction(error_correction)
        .margin(margin);

    run_generator(&mut qr, args)
}

//! Barcode command implementation

use anyhow::Result;
use eduplus_core::{BarCode, BinaryKey};
use std::process::ExitCode;

use super::reporting::run_generator;
use super::OutputArgs;

/// Run the barcode command
///
/// # Arguments
/// * `args` - Text, output and binary selection
/// * `symbology` - One of code128, code39, ean13
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn run(args: &OutputArgs, symbology: &str, width: i64, height: i64) -> Result<ExitCode> {
    let paths = args.binary_paths(BinaryKey::Barcode)?;

    let mut barcode = BarCode::create(&paths);
    barcode
        .text(args.text.as_str())
        .output(&args.output)
        .symbology(symbology)
        .width(width)
        .height(height);

    run_generator(&mut barcode, args)
}

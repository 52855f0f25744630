//! CLI command implementations

pub mod barcode;
pub mod doctor;
pub mod qr;

mod reporting;

pub use reporting::OutputArgs;

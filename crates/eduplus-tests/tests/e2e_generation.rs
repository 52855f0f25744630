//! End-to-end generation tests against fake generator binaries.
//!
//! Each test spawns a real `/bin/sh` script through the production runner.

#![cfg(unix)]

use std::fs;
use std::path::PathBuf;

use base64::Engine as _;
use eduplus_core::{BarCode, BinaryKey, BinaryPaths, ErrorCorrection, QrCode, Symbology};
use eduplus_tests::harness::{FakeBehavior, TestHarness};
use pretty_assertions::assert_eq;
use serial_test::serial;

const PNG_STUB: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-bytes\x00\xff";

#[test]
#[serial]
fn test_qr_round_trip() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let out = harness.out("qr.png");

    let mut qr = QrCode::create(&BinaryPaths::new().qr(&binary));
    qr.text("https://example.com").output(&out);

    assert!(qr.generate(), "errors: {:?}", qr.errors());
    assert!(!qr.has_errors());
    assert_eq!(fs::read(&out).unwrap(), PNG_STUB);

    assert_eq!(qr.generate_and_return(), Some(PNG_STUB.to_vec()));
    assert_eq!(
        qr.generate_base64(),
        Some(base64::engine::general_purpose::STANDARD.encode(PNG_STUB))
    );
}

#[test]
#[serial]
fn test_barcode_round_trip() {
    let harness = TestHarness::new();
    let bytes: Vec<u8> = (0..=255u8).collect();
    let binary = harness.fake_binary("EduplusBarcode", FakeBehavior::Writes(bytes.clone()));
    let out = harness.out("bar.png");

    let mut barcode = BarCode::with_binary(&binary);
    barcode.text("4006381333931").output(&out).symbology("ean13");

    assert_eq!(barcode.generate_and_return(), Some(bytes.clone()));
    assert_eq!(
        barcode.generate_base64(),
        Some(base64::engine::general_purpose::STANDARD.encode(&bytes))
    );
}

#[test]
#[serial]
fn test_qr_argument_vector() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let out = harness.out("qr.png");

    let mut qr = QrCode::with_binary(&binary);
    qr.text("hello")
        .output(&out)
        .size(512)
        .error_correction_level(ErrorCorrection::H)
        .margin(4);
    assert!(qr.generate());

    assert_eq!(
        harness.recorded_args(),
        vec![
            "-t".to_string(),
            "hello".to_string(),
            "-o".to_string(),
            out.display().to_string(),
            "-size".to_string(),
            "512".to_string(),
            "-ec".to_string(),
            "H".to_string(),
            "-margin".to_string(),
            "4".to_string(),
        ]
    );
}

#[test]
#[serial]
fn test_barcode_argument_vector() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusBarcode", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let out = harness.out("bar.png");

    let mut barcode = BarCode::with_binary(&binary);
    barcode
        .text("CODE-39")
        .output(&out)
        .symbology_kind(Symbology::Code39)
        .width(640)
        .height(80);
    assert!(barcode.generate());

    assert_eq!(
        harness.recorded_args()[4..].to_vec(),
        vec!["-type", "code39", "-w", "640", "-height", "80"]
    );
}

#[test]
#[serial]
fn test_shell_metacharacters_reach_binary_verbatim() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let out = harness.out("qr.png");
    let canary = harness.path().join("pwned");
    let hostile = format!("x'; touch {} #  $(touch {})", canary.display(), canary.display());

    let mut qr = QrCode::with_binary(&binary);
    qr.text(hostile.as_str()).output(&out);
    assert!(qr.generate());

    assert_eq!(harness.recorded_args()[1], hostile);
    assert!(!canary.exists());
}

#[test]
#[serial]
fn test_output_directories_are_created() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let out = harness.out("deeply/nested/chain/qr.png");
    assert!(!harness.out("deeply").exists());

    let mut qr = QrCode::with_binary(&binary);
    qr.text("hello").output(&out);

    assert!(qr.generate());
    assert!(harness.out("deeply/nested/chain").is_dir());
    assert_eq!(fs::read(&out).unwrap(), PNG_STUB);
}

#[test]
#[serial]
fn test_existing_output_directory_is_fine() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));
    fs::create_dir_all(harness.out("")).unwrap();

    let mut qr = QrCode::with_binary(&binary);
    qr.text("hello").output(harness.out("qr.png"));
    assert!(qr.generate());
}

#[test]
#[serial]
fn test_quick_matches_manual_chain() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusBarcode", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let paths = BinaryPaths::new().barcode(&binary);

    let manual_out = harness.out("manual.png");
    let mut manual = BarCode::create(&paths);
    manual
        .text("12345")
        .output(&manual_out)
        .symbology("code39")
        .width(200)
        .height(50);
    let manual_ok = manual.generate();
    let manual_args = harness.recorded_args();

    let quick_out = harness.out("quick.png");
    let quick_ok = BarCode::quick(&paths, "12345", &quick_out, "code39", 200, 50);
    let quick_args = harness.recorded_args();

    assert!(manual_ok);
    assert_eq!(quick_ok, manual_ok);
    assert_eq!(fs::read(&quick_out).unwrap(), fs::read(&manual_out).unwrap());
    assert_eq!(quick_args[4..].to_vec(), manual_args[4..].to_vec());
}

#[test]
#[serial]
fn test_qr_quick_with_closure_resolver() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let resolver = move |key: BinaryKey| match key {
        BinaryKey::Qr => Some(binary.clone()),
        BinaryKey::Barcode => None::<PathBuf>,
    };

    let out = harness.out("quick.png");
    assert!(QrCode::quick(&resolver, "hello", &out, 128));
    assert!(out.exists());
    assert_eq!(harness.recorded_args()[5], "128");
}

#[test]
#[serial]
fn test_working_dir_and_env_reach_binary() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let wd = harness.path().join("wd");
    fs::create_dir(&wd).unwrap();

    let mut qr = QrCode::with_binary(&binary);
    qr.text("hello")
        .output(harness.out("qr.png"))
        .working_dir(&wd)
        .env("EDUPLUS_TRACE", "generator-trace");

    assert!(qr.generate(), "errors: {:?}", qr.errors());
    assert_eq!(
        harness.recorded_cwd().unwrap(),
        fs::canonicalize(&wd).unwrap()
    );
    assert_eq!(harness.recorded_trace().as_deref(), Some("generator-trace"));
}

#[test]
#[serial]
fn test_env_is_not_set_unless_requested() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));

    let mut qr = QrCode::with_binary(&binary);
    qr.text("hello").output(harness.out("qr.png"));

    assert!(qr.generate());
    assert_eq!(harness.recorded_trace().as_deref(), Some(""));
}

#[test]
#[serial]
fn test_relative_output_resolves_against_working_dir() {
    let harness = TestHarness::new();
    let binary = harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let wd = harness.path().join("wd");
    fs::create_dir(&wd).unwrap();

    let mut qr = QrCode::with_binary(&binary);
    qr.text("hello").output("rel_dir/qr.png").working_dir(&wd);

    assert_eq!(qr.generate_and_return(), Some(PNG_STUB.to_vec()));
    assert!(wd.join("rel_dir/qr.png").is_file());
    assert_eq!(
        harness.recorded_args()[3],
        wd.join("rel_dir/qr.png").display().to_string()
    );
    assert!(!std::path::Path::new("rel_dir").exists());
}

#[test]
#[serial]
fn test_relative_binary_resolves_against_working_dir() {
    let harness = TestHarness::new();
    harness.fake_binary("EduplusQR", FakeBehavior::Writes(PNG_STUB.to_vec()));
    let out = harness.out("qr.png");

    let mut qr = QrCode::with_binary("EduplusQR");
    qr.text("hello").output(&out).working_dir(harness.path());

    assert!(qr.generate(), "errors: {:?}", qr.errors());
    assert_eq!(fs::read(&out).unwrap(), PNG_STUB);
}

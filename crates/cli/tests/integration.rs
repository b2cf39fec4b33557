//! Integration tests against a real Drive account
//!
//! These tests need a configured profile with live credentials and write
//! access to the subject's Drive, so they are feature-gated.
//!
//! Run with:
//!   DC_TEST_CONFIG_DIR=~/.config/drivectl DC_TEST_PROFILE=default \
//!     cargo test --features integration
//!
//! Every test works under a scratch folder it creates and removes.

#![cfg(feature = "integration")]

use std::process::Command;

/// Build the dc binary and return its path
fn dc_binary() -> String {
    let output = Command::new("cargo")
        .args(["build", "--release", "-p", "drivectl"])
        .output()
        .expect("Failed to build dc binary");

    if !output.status.success() {
        panic!(
            "Failed to build dc binary: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    env!("CARGO_MANIFEST_DIR").to_string() + "/../../target/release/dc"
}

fn test_env() -> (String, String) {
    let config_dir = std::env::var("DC_TEST_CONFIG_DIR")
        .expect("DC_TEST_CONFIG_DIR must point at a config dir with a test profile");
    let profile = std::env::var("DC_TEST_PROFILE").unwrap_or_else(|_| "default".to_string());
    (config_dir, profile)
}

fn dc(config_dir: &str, profile: &str, args: &[&str]) -> std::process::Output {
    Command::new(dc_binary())
        .env("DC_CONFIG_DIR", config_dir)
        .args(["--profile", profile])
        .args(args)
        .output()
        .expect("Failed to execute dc")
}

#[test]
fn test_round_trip_scenario() {
    let (config_dir, profile) = test_env();
    let scratch = format!("/dc-test-{}", std::process::id());
    let local = tempfile::tempdir().unwrap();

    let source = local.path().join("a.txt");
    std::fs::write(&source, "hello").unwrap();

    // mkdir
    let out = dc(&config_dir, &profile, &["mkdir", &scratch]);
    assert!(out.status.success(), "mkdir failed: {out:?}");

    // upload
    let remote = format!("{scratch}/a.txt");
    let out = dc(
        &config_dir,
        &profile,
        &["upload", source.to_str().unwrap(), &remote],
    );
    assert!(out.status.success(), "upload failed: {out:?}");

    // download and compare
    let dest = local.path().join("b.txt");
    let out = dc(
        &config_dir,
        &profile,
        &["download", &remote, dest.to_str().unwrap()],
    );
    assert!(out.status.success(), "download failed: {out:?}");
    assert_eq!(std::fs::read(&dest).unwrap(), b"hello");

    // ls shows exactly the uploaded file
    let out = dc(&config_dir, &profile, &["--json", "ls", &scratch]);
    assert!(out.status.success(), "ls failed: {out:?}");
    let listing: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("ls --json output should be valid JSON");
    assert_eq!(listing["names"], serde_json::json!(["a.txt"]));

    // rm file, then folder
    let out = dc(&config_dir, &profile, &["rm", &remote]);
    assert!(out.status.success(), "rm file failed: {out:?}");

    let out = dc(&config_dir, &profile, &["--json", "ls", &scratch]);
    let listing: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(listing["count"], serde_json::json!(0));

    let out = dc(&config_dir, &profile, &["rm", &scratch]);
    assert!(out.status.success(), "rm folder failed: {out:?}");
}

#[test]
fn test_missing_path_exit_code() {
    let (config_dir, profile) = test_env();

    let out = dc(&config_dir, &profile, &["ls", "/dc-test-does-not-exist"]);
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(5), "NotFound should exit 5");
}

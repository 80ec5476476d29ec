// crates/hypergate-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// Dependencies: hypergate-config, tempfile
// ============================================================================

//! ## Overview
//! Loads configuration files from disk and checks the guards applied before
//! and after parsing.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::io::Write;
use std::path::Path;

use hypergate_config::ConfigError;
use hypergate_config::HypergateConfig;
use hypergate_config::config_toml_example;
use tempfile::NamedTempFile;

/// Result type for fallible tests.
type TestResult = Result<(), String>;

/// Checks that `result` failed with a message containing `needle`.
fn assert_invalid(result: Result<HypergateConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

/// Writes `contents` to a fresh temporary file.
fn write_temp(contents: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents).map_err(|err| err.to_string())?;
    Ok(file)
}

/// Over-long paths are rejected before touching the filesystem.
#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    assert_invalid(HypergateConfig::load(Some(Path::new(&long_path))), "config path exceeds max length")
}

/// Over-long path components are rejected.
#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    assert_invalid(
        HypergateConfig::load(Some(Path::new(&long_component))),
        "config path component too long",
    )
}

/// Files above the size limit are rejected.
#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_temp(&vec![b'a'; 1_048_577])?;
    assert_invalid(HypergateConfig::load(Some(file.path())), "config file exceeds size limit")
}

/// Files that are not UTF-8 are rejected.
#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_temp(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(HypergateConfig::load(Some(file.path())), "config file must be utf-8")
}

/// Missing files surface as I/O errors.
#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");
    let result = HypergateConfig::load(Some(&missing));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

/// Malformed TOML surfaces as a parse error.
#[test]
fn load_reports_parse_errors() {
    let file = write_temp(b"[server\nbase_url = 1").expect("temp file");
    let result = HypergateConfig::load(Some(file.path()));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

/// The canonical example loads from disk and validates.
#[test]
fn load_accepts_canonical_example() {
    let file = write_temp(config_toml_example().as_bytes()).expect("temp file");
    let config = HypergateConfig::load(Some(file.path())).expect("example loads");
    assert_eq!(config.server.base_url, "https://api.example.com/v1");
    assert_eq!(config.formats.default_media_type, "application/hal+json");
    assert_eq!(config.docs.title, "Library API");
    assert_eq!(config.url_builder().documentation(), "https://api.example.com/v1/docs");
    assert_eq!(config.url_builder().form("publish"), "https://api.example.com/v1/forms/publish");
}

/// Missing sections fall back to defaults.
#[test]
fn empty_file_uses_defaults() {
    let config = HypergateConfig::from_toml_str("").expect("defaults");
    assert_eq!(config, {
        let mut defaults = HypergateConfig::default();
        defaults.validate().expect("defaults validate");
        defaults
    });
}

/// Validation errors from a file carry the offending field.
#[test]
fn load_rejects_invalid_values() -> TestResult {
    let file = write_temp(b"[pagination]\ndefault_page_size = 0\n")?;
    assert_invalid(HypergateConfig::load(Some(file.path())), "pagination.default_page_size")
}

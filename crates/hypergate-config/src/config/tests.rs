// crates/hypergate-config/src/config/tests.rs
// ============================================================================
// Module: Config Unit Tests
// Description: Path resolution, defaults, and section validation.
// Purpose: Exercise private validation helpers directly.
// Dependencies: hypergate-config
// ============================================================================

//! ## Overview
//! Unit tests for path resolution and per-section validation.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use super::CONFIG_ENV_VAR;
use super::ConfigError;
use super::DEFAULT_CONFIG_NAME;
use super::HypergateConfig;
use super::MAX_PAGE_SIZE_LIMIT;
use super::resolve_path;
use super::validate_path;
use super::validate_segment;

/// Asserts that `result` is an invalid-config error mentioning `needle`.
fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) {
    match result {
        Err(ConfigError::Invalid(message)) => {
            assert!(message.contains(needle), "`{message}` did not contain `{needle}`");
        }
        Err(other) => panic!("expected invalid config, got {other}"),
        Ok(_) => panic!("expected invalid config for `{needle}`"),
    }
}

/// An explicit path wins over the environment.
#[test]
fn resolve_path_prefers_explicit_path() {
    let resolved =
        resolve_path(Some(Path::new("explicit.toml")), Some("env.toml".to_string())).unwrap();
    assert_eq!(resolved, PathBuf::from("explicit.toml"));
}

/// Without an explicit path the environment, then the default name, applies.
#[test]
fn resolve_path_falls_back_to_environment_then_default() {
    let from_env = resolve_path(None, Some("env.toml".to_string())).unwrap();
    assert_eq!(from_env, PathBuf::from("env.toml"));
    let fallback = resolve_path(None, None).unwrap();
    assert_eq!(fallback, PathBuf::from(DEFAULT_CONFIG_NAME));
    assert_eq!(CONFIG_ENV_VAR, "HYPERGATE_CONFIG");
}

/// Environment paths are length-checked.
#[test]
fn resolve_path_rejects_oversized_environment_value() {
    assert_invalid(resolve_path(None, Some("a".repeat(5_000))), "config path exceeds max length");
}

/// Components longer than the limit are rejected.
#[test]
fn validate_path_rejects_long_component() {
    assert_invalid(validate_path(Path::new(&"b".repeat(300))), "config path component too long");
}

/// Default configuration is valid.
#[test]
fn defaults_validate() {
    let mut config = HypergateConfig::default();
    config.validate().unwrap();
    assert_eq!(config.pagination.default_page_size, 30);
    assert_eq!(config.pagination.max_page_size, 500);
    assert_eq!(config.formats.enabled.len(), 3);
    assert!(config.audit.enabled);
}

/// A trailing slash on the base URL is normalized away.
#[test]
fn base_url_trailing_slash_is_dropped() {
    let mut config = HypergateConfig::default();
    config.server.base_url = "https://api.example.com/v1/".to_string();
    config.validate().unwrap();
    assert_eq!(config.server.base_url, "https://api.example.com/v1");
    assert_eq!(config.url_builder().collection("books"), "https://api.example.com/v1/books");
}

/// Relative and non-http base URLs are rejected.
#[test]
fn base_url_rejects_relative_and_non_http() {
    let mut config = HypergateConfig::default();
    config.server.base_url = "/v1".to_string();
    assert_invalid(config.validate(), "server.base_url invalid");

    let mut config = HypergateConfig::default();
    config.server.base_url = "ftp://files.example.com".to_string();
    assert_invalid(config.validate(), "must use http or https");
}

/// Base URLs may not carry a query or fragment.
#[test]
fn base_url_rejects_query_and_fragment() {
    let mut config = HypergateConfig::default();
    config.server.base_url = "https://api.example.com/v1?debug=1".to_string();
    assert_invalid(config.validate(), "query or fragment");

    let mut config = HypergateConfig::default();
    config.server.base_url = "https://api.example.com/v1#top".to_string();
    assert_invalid(config.validate(), "query or fragment");
}

/// Segments lose surrounding slashes and must be a single unreserved segment.
#[test]
fn segments_are_trimmed_and_checked() {
    assert_eq!(validate_segment("server.form_prefix", "/forms/").unwrap(), "forms");
    assert_invalid(validate_segment("server.form_prefix", "a/b"), "single segment");
    assert_invalid(validate_segment("server.form_prefix", ".."), "dot segment");
    assert_invalid(validate_segment("server.docs_segment", "  "), "must be non-empty");
}

/// Forms and documentation cannot share a segment.
#[test]
fn form_prefix_and_docs_segment_must_differ() {
    let mut config = HypergateConfig::default();
    config.server.docs_segment = "forms".to_string();
    assert_invalid(config.validate(), "must differ");
}

/// Page sizes must satisfy `0 < default <= max <= limit`.
#[test]
fn pagination_bounds_are_enforced() {
    let mut config = HypergateConfig::default();
    config.pagination.default_page_size = 0;
    assert_invalid(config.validate(), "greater than zero");

    let mut config = HypergateConfig::default();
    config.pagination.default_page_size = 600;
    assert_invalid(config.validate(), "exceeds pagination.max_page_size");

    let mut config = HypergateConfig::default();
    config.pagination.max_page_size = MAX_PAGE_SIZE_LIMIT + 1;
    assert_invalid(config.validate(), "out of range");

    let mut config = HypergateConfig::default();
    config.pagination.default_page_size = MAX_PAGE_SIZE_LIMIT;
    config.pagination.max_page_size = MAX_PAGE_SIZE_LIMIT;
    config.validate().unwrap();
    let limits = config.pagination_limits();
    assert_eq!(limits.default_page_size, MAX_PAGE_SIZE_LIMIT);
    assert_eq!(limits.max_page_size, MAX_PAGE_SIZE_LIMIT);
}

/// Enabled formats are validated against the supported set.
#[test]
fn formats_must_be_supported_unique_and_include_default() {
    let mut config = HypergateConfig::default();
    config.formats.enabled = Vec::new();
    assert_invalid(config.validate(), "must be non-empty");

    let mut config = HypergateConfig::default();
    config.formats.enabled = vec!["text/html".to_string()];
    assert_invalid(config.validate(), "unsupported media type `text/html`");

    let mut config = HypergateConfig::default();
    config.formats.enabled =
        vec!["application/json".to_string(), "application/json".to_string()];
    assert_invalid(config.validate(), "repeats media type");

    let mut config = HypergateConfig::default();
    config.formats.enabled = vec!["application/hal+json".to_string()];
    config.formats.default_media_type = "application/json".to_string();
    assert_invalid(config.validate(), "must be one of formats.enabled");
}

/// Documentation text is required and bounded.
#[test]
fn docs_text_must_be_present_and_bounded() {
    let mut config = HypergateConfig::default();
    config.docs.title = " ".to_string();
    assert_invalid(config.validate(), "docs.title must be non-empty");

    let mut config = HypergateConfig::default();
    config.docs.description = "d".repeat(5_000);
    assert_invalid(config.validate(), "docs.description exceeds max length");
}

/// An audit path, when set, must be non-empty.
#[test]
fn audit_path_must_be_non_empty() {
    let mut config = HypergateConfig::default();
    config.audit.path = Some(String::new());
    assert_invalid(config.validate(), "audit.path must be non-empty");
}

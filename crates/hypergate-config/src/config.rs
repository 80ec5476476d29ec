// crates/hypergate-config/src/config.rs
// ============================================================================
// Module: Hypergate Configuration
// Description: Configuration loading and validation for Hypergate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: hypergate-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then `HYPERGATE_CONFIG`, then
//! `hypergate.toml` in the working directory. Every section has defaults;
//! any out-of-range or inconsistent value rejects the whole file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use hypergate_core::PaginationLimits;
use hypergate_core::UrlBuilder;
use hypergate_core::writer::DEFAULT_DOCS_SEGMENT;
use hypergate_core::writer::DEFAULT_FORM_PREFIX;
use hypergate_core::writer::MEDIA_TYPE_HAL;
use hypergate_core::writer::MEDIA_TYPE_JSON;
use hypergate_core::writer::MEDIA_TYPE_JSON_LD;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "hypergate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "HYPERGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum base URL length.
pub(crate) const MAX_BASE_URL_LENGTH: usize = 2048;
/// Maximum length of a URL path segment setting.
pub(crate) const MAX_SEGMENT_LENGTH: usize = 64;
/// Largest page size any configuration may allow.
pub const MAX_PAGE_SIZE_LIMIT: u32 = 10_000;
/// Maximum documentation title length.
pub(crate) const MAX_TITLE_LENGTH: usize = 256;
/// Maximum documentation description length.
pub(crate) const MAX_DESCRIPTION_LENGTH: usize = 4096;
/// Media types a deployment may enable.
pub const SUPPORTED_MEDIA_TYPES: [&str; 3] = [MEDIA_TYPE_JSON, MEDIA_TYPE_HAL, MEDIA_TYPE_JSON_LD];

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Hypergate deployment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HypergateConfig {
    /// URL layout.
    #[serde(default)]
    pub server: ServerConfig,
    /// Page size bounds.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Enabled response formats.
    #[serde(default)]
    pub formats: FormatsConfig,
    /// API documentation text.
    #[serde(default)]
    pub docs: DocsConfig,
    /// Audit output.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl HypergateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, normalizing the base URL and segments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.pagination.validate()?;
        self.formats.validate()?;
        self.docs.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns the URL layout described by `[server]`.
    #[must_use]
    pub fn url_builder(&self) -> UrlBuilder {
        UrlBuilder::new(&self.server.base_url)
            .with_form_prefix(&self.server.form_prefix)
            .with_docs_segment(&self.server.docs_segment)
    }

    /// Returns the page size bounds described by `[pagination]`.
    #[must_use]
    pub const fn pagination_limits(&self) -> PaginationLimits {
        PaginationLimits {
            default_page_size: self.pagination.default_page_size,
            max_page_size: self.pagination.max_page_size,
        }
    }
}

/// URL layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Absolute `http`/`https` base URL; a trailing slash is dropped.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path segment under which form documents are served.
    #[serde(default = "default_form_prefix")]
    pub form_prefix: String,
    /// Path segment of the documentation document.
    #[serde(default = "default_docs_segment")]
    pub docs_segment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            form_prefix: default_form_prefix(),
            docs_segment: default_docs_segment(),
        }
    }
}

impl ServerConfig {
    /// Validates and normalizes server configuration.
    fn validate(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid("server.base_url must be non-empty".to_string()));
        }
        if trimmed.len() > MAX_BASE_URL_LENGTH {
            return Err(ConfigError::Invalid("server.base_url exceeds max length".to_string()));
        }
        let parsed = Url::parse(trimmed)
            .map_err(|err| ConfigError::Invalid(format!("server.base_url invalid: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("server.base_url must use http or https".to_string()));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ConfigError::Invalid("server.base_url must include a host".to_string()));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "server.base_url must not carry a query or fragment".to_string(),
            ));
        }
        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(ConfigError::Invalid(
                "server.base_url must not embed credentials".to_string(),
            ));
        }
        self.base_url = trimmed.trim_end_matches('/').to_string();
        self.form_prefix = validate_segment("server.form_prefix", &self.form_prefix)?;
        self.docs_segment = validate_segment("server.docs_segment", &self.docs_segment)?;
        if self.form_prefix == self.docs_segment {
            return Err(ConfigError::Invalid(
                "server.form_prefix and server.docs_segment must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Page size configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when a request does not ask for one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Largest page size a request may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PaginationConfig {
    /// Validates pagination bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid(
                "pagination.default_page_size must be greater than zero".to_string(),
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid(
                "pagination.default_page_size exceeds pagination.max_page_size".to_string(),
            ));
        }
        if self.max_page_size > MAX_PAGE_SIZE_LIMIT {
            return Err(ConfigError::Invalid("pagination.max_page_size out of range".to_string()));
        }
        Ok(())
    }
}

/// Response format configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatsConfig {
    /// Media type used when the caller accepts anything.
    #[serde(default = "default_media_type")]
    pub default_media_type: String,
    /// Enabled media types in preference order.
    #[serde(default = "default_enabled_media_types")]
    pub enabled: Vec<String>,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            default_media_type: default_media_type(),
            enabled: default_enabled_media_types(),
        }
    }
}

impl FormatsConfig {
    /// Validates the enabled format set.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled.is_empty() {
            return Err(ConfigError::Invalid("formats.enabled must be non-empty".to_string()));
        }
        let mut seen = BTreeSet::new();
        for media_type in &self.enabled {
            if !SUPPORTED_MEDIA_TYPES.contains(&media_type.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "formats.enabled contains unsupported media type `{media_type}`"
                )));
            }
            if !seen.insert(media_type.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "formats.enabled repeats media type `{media_type}`"
                )));
            }
        }
        if !seen.contains(self.default_media_type.as_str()) {
            return Err(ConfigError::Invalid(
                "formats.default_media_type must be one of formats.enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// API documentation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsConfig {
    /// API title.
    #[serde(default = "default_docs_title")]
    pub title: String,
    /// API description.
    #[serde(default = "default_docs_description")]
    pub description: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: default_docs_title(),
            description: default_docs_description(),
        }
    }
}

impl DocsConfig {
    /// Validates documentation text.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_text("docs.title", &self.title, MAX_TITLE_LENGTH)?;
        validate_text("docs.description", &self.description, MAX_DESCRIPTION_LENGTH)
    }
}

/// Audit output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Emit audit events.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional JSON lines file; stderr when absent.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller, the environment, or the default.
pub(crate) fn resolve_path(
    path: Option<&Path>,
    env_path: Option<String>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
pub(crate) fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates one URL path segment, returning it without surrounding slashes.
fn validate_segment(field: &str, value: &str) -> Result<String, ConfigError> {
    let segment = value.trim().trim_matches('/');
    if segment.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if segment.len() > MAX_SEGMENT_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if segment == "." || segment == ".." {
        return Err(ConfigError::Invalid(format!("{field} must not be a dot segment")));
    }
    let allowed = |ch: char| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '~');
    if !segment.chars().all(allowed) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be a single segment of unreserved characters"
        )));
    }
    Ok(segment.to_string())
}

/// Validates non-empty bounded text.
fn validate_text(field: &str, value: &str, max_length: usize) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > max_length {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Default base URL.
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

/// Default form prefix.
fn default_form_prefix() -> String {
    DEFAULT_FORM_PREFIX.to_string()
}

/// Default documentation segment.
fn default_docs_segment() -> String {
    DEFAULT_DOCS_SEGMENT.to_string()
}

/// Default page size.
const fn default_page_size() -> u32 {
    30
}

/// Default maximum page size.
const fn default_max_page_size() -> u32 {
    500
}

/// Default media type.
fn default_media_type() -> String {
    MEDIA_TYPE_JSON.to_string()
}

/// Default enabled media types.
fn default_enabled_media_types() -> Vec<String> {
    SUPPORTED_MEDIA_TYPES.iter().map(ToString::to_string).collect()
}

/// Default documentation title.
fn default_docs_title() -> String {
    "Hypergate API".to_string()
}

/// Default documentation description.
fn default_docs_description() -> String {
    "Hypermedia API generated from resource declarations.".to_string()
}

/// Default audit toggle.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;

// crates/hypergate-core/src/writer/urls.rs
// ============================================================================
// Module: URL Builder
// Description: Absolute URLs for items, collections, pages, forms, and docs.
// Purpose: Keep URL layout in one place for every writer and mapper.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`UrlBuilder`] owns URL layout below the configured base URL. Path
//! segments taken from identifiers are percent-encoded here, so decoded
//! request segments map back to the same identifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Item;
use crate::core::Path;
use crate::core::Resource;
use crate::core::encode_segment;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default path segment under which form documents are served.
pub const DEFAULT_FORM_PREFIX: &str = "forms";
/// Default path segment of the API documentation document.
pub const DEFAULT_DOCS_SEGMENT: &str = "docs";

// ============================================================================
// SECTION: URL Builder
// ============================================================================

/// Builds absolute URLs below a base URL.
///
/// # Invariants
/// - `base_url` never ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    /// Base URL without trailing slash.
    base_url: String,
    /// Segment under which forms are served.
    form_prefix: String,
    /// Segment of the documentation document.
    docs_segment: String,
}

impl UrlBuilder {
    /// Creates a builder with default form and docs segments.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            form_prefix: DEFAULT_FORM_PREFIX.to_string(),
            docs_segment: DEFAULT_DOCS_SEGMENT.to_string(),
        }
    }

    /// Returns a copy serving forms under `prefix`.
    #[must_use]
    pub fn with_form_prefix(mut self, prefix: &str) -> Self {
        self.form_prefix = prefix.trim_matches('/').to_string();
        self
    }

    /// Returns a copy serving documentation at `segment`.
    #[must_use]
    pub fn with_docs_segment(mut self, segment: &str) -> Self {
        self.docs_segment = segment.trim_matches('/').to_string();
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `{base}/{name}/{id}` with percent-encoded segments.
    #[must_use]
    pub fn item(&self, path: &Path) -> String {
        format!("{}/{}", self.base_url, path.as_uri())
    }

    /// Returns `{base}/{name}`.
    #[must_use]
    pub fn collection(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, encode_segment(name))
    }

    /// Returns `{base}/{parent}/{id}/{name}`.
    #[must_use]
    pub fn nested_collection(&self, parent: &Path, name: &str) -> String {
        format!("{}/{}", self.item(parent), encode_segment(name))
    }

    /// Returns the collection URL of a paged or bound nested address.
    #[must_use]
    pub fn collection_of(&self, resource: &Resource) -> String {
        match resource {
            Resource::Nested {
                parent,
                name,
            } => self.nested_under(parent, name),
            Resource::GenericParent {
                parent_name,
                name,
            } => format!(
                "{}/{}/{}",
                self.base_url,
                encode_segment(parent_name),
                encode_segment(name)
            ),
            other => self.collection(other.name()),
        }
    }

    /// Returns `{collection}?page={page}&per_page={per_page}`.
    #[must_use]
    pub fn page(&self, collection_url: &str, page: u64, per_page: u32) -> String {
        format!("{collection_url}?page={page}&per_page={per_page}")
    }

    /// Returns `{base}/{form_prefix}/{form_id}`.
    #[must_use]
    pub fn form(&self, form_id: &str) -> String {
        format!("{}/{}/{form_id}", self.base_url, self.form_prefix)
    }

    /// Returns `{base}/{docs_segment}`.
    #[must_use]
    pub fn documentation(&self) -> String {
        format!("{}/{}", self.base_url, self.docs_segment)
    }

    /// Returns the nested collection URL under a parent item.
    fn nested_under(&self, parent: &Item, name: &str) -> String {
        match parent.id() {
            Some(id) => self.nested_collection(&Path::new(parent.name(), id), name),
            None => format!(
                "{}/{}/{}",
                self.base_url,
                encode_segment(parent.name()),
                encode_segment(name)
            ),
        }
    }
}

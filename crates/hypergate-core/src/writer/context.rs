// crates/hypergate-core/src/writer/context.rs
// ============================================================================
// Module: Writer Context
// Description: Collaborators and per-request options shared by writers.
// Purpose: Bundle lookups, URL layout, and selections for one write.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! A [`WriterContext`] borrows the generation's lookups and carries the
//! per-request options: sparse fields, embed selection, locale, and the
//! credentials used to filter the operations listed in documents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::AcceptLanguage;
use crate::core::AnyRepresentor;
use crate::core::Credentials;
use crate::core::FieldError;
use crate::core::FieldsSelection;
use crate::core::Identifier;
use crate::core::IdentifierType;
use crate::core::SnapshotScope;
use crate::interfaces::EmbeddedError;
use crate::interfaces::EmbeddedSource;
use crate::interfaces::NoEmbedding;
use crate::interfaces::PathMapper;
use crate::interfaces::RepresentorLookup;
use crate::runtime::ActionRegistry;
use crate::writer::json::JsonObjectBuilder;
use crate::writer::path::EmbeddedSelection;
use crate::writer::urls::UrlBuilder;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Document writing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// No representor is registered for the resource.
    #[error("no representor for resource `{resource}`")]
    MissingRepresentor {
        /// Resource name.
        resource: String,
    },
    /// A field extractor failed.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// Loading an embedded model failed.
    #[error(transparent)]
    Embedded(#[from] EmbeddedError),
    /// Two fields claimed the same document location with different shapes.
    #[error("document location `{location}` is written with conflicting shapes")]
    Collision {
        /// Dotted location of the refused write.
        location: String,
    },
    /// The finished document could not be serialized.
    #[error("document serialization failed: {0}")]
    Serialization(String),
}

/// Serializes a finished document, refusing documents with collisions.
///
/// # Errors
///
/// Returns [`WriteError::Collision`] for the first refused write, or
/// [`WriteError::Serialization`] when serialization fails.
pub(crate) fn finish(doc: &JsonObjectBuilder) -> Result<String, WriteError> {
    if let Some(location) = doc.collisions().first() {
        return Err(WriteError::Collision {
            location: location.clone(),
        });
    }
    doc.to_json_string().map_err(|err| WriteError::Serialization(err.to_string()))
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Inputs shared by all writers for one request.
pub struct WriterContext<'a> {
    /// Representor lookup.
    representors: &'a dyn RepresentorLookup,
    /// Identifier to path mapping.
    paths: &'a dyn PathMapper,
    /// URL layout.
    urls: &'a UrlBuilder,
    /// Loader for embedded models.
    source: &'a dyn EmbeddedSource,
    /// Sparse field selection.
    fields: FieldsSelection,
    /// Relations selected for embedding.
    embedded: EmbeddedSelection,
    /// Caller language preferences.
    locale: AcceptLanguage,
    /// Registry and caller used to list applicable operations.
    operations: Option<(&'a ActionRegistry, Credentials)>,
}

impl<'a> WriterContext<'a> {
    /// Creates a context with all fields, no embedding, and no operations.
    #[must_use]
    pub fn new(
        representors: &'a dyn RepresentorLookup,
        paths: &'a dyn PathMapper,
        urls: &'a UrlBuilder,
    ) -> Self {
        Self {
            representors,
            paths,
            urls,
            source: &NoEmbedding,
            fields: FieldsSelection::all(),
            embedded: EmbeddedSelection::none(),
            locale: AcceptLanguage::default(),
            operations: None,
        }
    }

    /// Returns a copy loading embedded models from `source`.
    #[must_use]
    pub fn with_source(mut self, source: &'a dyn EmbeddedSource) -> Self {
        self.source = source;
        self
    }

    /// Returns a copy restricted to `fields`.
    #[must_use]
    pub fn with_fields(mut self, fields: FieldsSelection) -> Self {
        self.fields = fields;
        self
    }

    /// Returns a copy embedding the `embedded` relations.
    #[must_use]
    pub fn with_embedded(mut self, embedded: EmbeddedSelection) -> Self {
        self.embedded = embedded;
        self
    }

    /// Returns a copy resolving localized fields against `locale`.
    #[must_use]
    pub fn with_locale(mut self, locale: AcceptLanguage) -> Self {
        self.locale = locale;
        self
    }

    /// Returns a copy listing operations of `registry` permitted to `credentials`.
    #[must_use]
    pub fn with_operations(mut self, registry: &'a ActionRegistry, credentials: Credentials) -> Self {
        self.operations = Some((registry, credentials));
        self
    }

    /// Returns the URL layout.
    #[must_use]
    pub const fn urls(&self) -> &UrlBuilder {
        self.urls
    }

    /// Returns the path mapper.
    #[must_use]
    pub fn paths(&self) -> &dyn PathMapper {
        self.paths
    }

    /// Returns the embed selection.
    #[must_use]
    pub const fn embedded(&self) -> &EmbeddedSelection {
        &self.embedded
    }

    /// Returns the embedded model source.
    #[must_use]
    pub fn source(&self) -> &dyn EmbeddedSource {
        self.source
    }

    /// Returns the registry and caller for operation listing, if enabled.
    #[must_use]
    pub fn operations(&self) -> Option<(&ActionRegistry, &Credentials)> {
        self.operations.as_ref().map(|(registry, credentials)| (*registry, credentials))
    }

    /// Returns the snapshot scope for this request.
    #[must_use]
    pub const fn scope(&self) -> SnapshotScope<'_> {
        SnapshotScope {
            locale: &self.locale,
            fields: &self.fields,
        }
    }

    /// Returns the representor of `resource_name`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::MissingRepresentor`] when none is registered.
    pub fn representor(&self, resource_name: &str) -> Result<Arc<dyn AnyRepresentor>, WriteError> {
        self.representors.representor(resource_name).ok_or_else(|| WriteError::MissingRepresentor {
            resource: resource_name.to_string(),
        })
    }

    /// Returns the representor lookup.
    #[must_use]
    pub fn representors(&self) -> &dyn RepresentorLookup {
        self.representors
    }

    /// Returns the absolute URL of model `identifier` of `resource_name`.
    #[must_use]
    pub fn item_url(&self, resource_name: &str, identifier: &Identifier) -> Option<String> {
        self.paths.identifier_to_path(resource_name, identifier).map(|path| self.urls.item(&path))
    }

    /// Returns the resource serving models of `identifier_type`.
    #[must_use]
    pub fn resource_for(&self, identifier_type: &IdentifierType) -> Option<String> {
        self.paths.resource_for_identifier_type(identifier_type)
    }
}

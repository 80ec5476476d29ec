// crates/hypergate-core/src/writer/form.rs
// ============================================================================
// Module: Form Writer
// Description: Form document over a form descriptor.
// Purpose: Describe the body an action accepts.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Writes a form document from a [`FormDescriptor`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::FormDescriptor;
use crate::writer::context::WriteError;
use crate::writer::context::finish;
use crate::writer::json::JsonObjectBuilder;
use crate::writer::mapper::FormMessageMapper;
use crate::writer::urls::UrlBuilder;

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Writes one form document.
pub struct FormWriter<'a> {
    /// URL layout.
    urls: &'a UrlBuilder,
    /// Format strategy.
    mapper: &'a dyn FormMessageMapper,
}

impl<'a> FormWriter<'a> {
    /// Creates a writer for `mapper`.
    #[must_use]
    pub const fn new(urls: &'a UrlBuilder, mapper: &'a dyn FormMessageMapper) -> Self {
        Self {
            urls,
            mapper,
        }
    }

    /// Writes `form` and serializes the document.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Collision`] or [`WriteError::Serialization`]
    /// when the document cannot be serialized.
    pub fn write(&self, form: &FormDescriptor) -> Result<String, WriteError> {
        finish(&self.write_document(form))
    }

    /// Writes `form` into a document builder.
    #[must_use]
    pub fn write_document(&self, form: &FormDescriptor) -> JsonObjectBuilder {
        let mut doc = JsonObjectBuilder::new();
        self.mapper.on_start(&mut doc, form, &self.urls.form(&form.id));
        for field in &form.fields {
            self.mapper.map_field(&mut doc, form, field);
        }
        self.mapper.on_finish(&mut doc, form);
        doc
    }
}

// crates/hypergate-core/src/writer/batch.rs
// ============================================================================
// Module: Batch Writer
// Description: Document listing models created by a batch action.
// Purpose: Report created identifiers and their URLs.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Writes the document returned by batch create actions: the resource name,
//! the number of created models, and one entry per created identifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::BatchResult;
use crate::writer::context::WriteError;
use crate::writer::context::WriterContext;
use crate::writer::context::finish;
use crate::writer::json::JsonObjectBuilder;
use crate::writer::mapper::BatchInfo;
use crate::writer::mapper::BatchMessageMapper;

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Writes one batch result document.
pub struct BatchWriter<'a> {
    /// Request context.
    context: &'a WriterContext<'a>,
    /// Format strategy.
    mapper: &'a dyn BatchMessageMapper,
}

impl<'a> BatchWriter<'a> {
    /// Creates a writer for `mapper`.
    #[must_use]
    pub const fn new(context: &'a WriterContext<'a>, mapper: &'a dyn BatchMessageMapper) -> Self {
        Self {
            context,
            mapper,
        }
    }

    /// Writes `batch` and serializes the document.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Collision`] or [`WriteError::Serialization`]
    /// when the document cannot be serialized.
    pub fn write(&self, batch: &BatchResult) -> Result<String, WriteError> {
        finish(&self.write_document(batch))
    }

    /// Writes `batch` into a document builder.
    #[must_use]
    pub fn write_document(&self, batch: &BatchResult) -> JsonObjectBuilder {
        let info = BatchInfo {
            resource_name: batch.resource_name.clone(),
            count: batch.identifiers.len(),
        };
        let mut doc = JsonObjectBuilder::new();
        self.mapper.on_start(&mut doc, &info);
        for identifier in &batch.identifiers {
            let url = self.context.item_url(&batch.resource_name, identifier);
            self.mapper.map_created(&mut doc, &info, identifier, url.as_deref());
        }
        self.mapper.on_finish(&mut doc, &info);
        doc
    }
}

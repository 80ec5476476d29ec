// crates/hypergate-core/src/writer/documentation.rs
// ============================================================================
// Module: Documentation Writer
// Description: API documentation document over representors and actions.
// Purpose: Describe every resource's fields and operations.
// Dependencies: crate::core, crate::runtime
// ============================================================================

//! ## Overview
//! Resources are listed in name order, taking the union of resources with a
//! representor and resources with registered actions. Within a resource,
//! properties come first in declaration order, then operations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::ActionSemantics;
use crate::runtime::ActionRegistry;
use crate::writer::context::WriteError;
use crate::writer::context::WriterContext;
use crate::writer::context::finish;
use crate::writer::json::JsonObjectBuilder;
use crate::writer::mapper::DocumentationInfo;
use crate::writer::mapper::DocumentationMessageMapper;
use crate::writer::mapper::OperationDoc;
use crate::writer::mapper::ResourceInfo;

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Writes the API documentation document.
pub struct DocumentationWriter<'a> {
    /// Request context.
    context: &'a WriterContext<'a>,
    /// Format strategy.
    mapper: &'a dyn DocumentationMessageMapper,
}

impl<'a> DocumentationWriter<'a> {
    /// Creates a writer for `mapper`.
    #[must_use]
    pub const fn new(
        context: &'a WriterContext<'a>,
        mapper: &'a dyn DocumentationMessageMapper,
    ) -> Self {
        Self {
            context,
            mapper,
        }
    }

    /// Writes documentation for `registry` and serializes it.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Collision`] or [`WriteError::Serialization`]
    /// when the document cannot be serialized.
    pub fn write(
        &self,
        title: &str,
        description: &str,
        registry: &ActionRegistry,
    ) -> Result<String, WriteError> {
        finish(&self.write_document(title, description, registry))
    }

    /// Writes documentation for `registry` into a document builder.
    #[must_use]
    pub fn write_document(
        &self,
        title: &str,
        description: &str,
        registry: &ActionRegistry,
    ) -> JsonObjectBuilder {
        let urls = self.context.urls();
        let api = DocumentationInfo {
            title: title.to_string(),
            description: description.to_string(),
            documentation_url: urls.documentation(),
        };
        let mut names: BTreeSet<String> =
            self.context.representors().resource_names().into_iter().collect();
        names.extend(registry.iter().map(|semantics| semantics.resource().name().to_string()));

        let mut doc = JsonObjectBuilder::new();
        self.mapper.on_start(&mut doc, &api);
        for name in names {
            let representor = self.context.representors().representor(&name);
            let resource = ResourceInfo {
                types: representor
                    .as_ref()
                    .map(|representor| representor.types().to_vec())
                    .unwrap_or_default(),
                collection_url: urls.collection(&name),
                name,
            };
            self.mapper.on_start_resource(&mut doc, &resource);
            if let Some(representor) = &representor {
                for field in representor.field_descriptors() {
                    self.mapper.map_property(&mut doc, &resource, &field);
                }
            }
            for semantics in
                registry.iter().filter(|semantics| semantics.resource().name() == resource.name)
            {
                let operation = self.operation_doc(semantics);
                self.mapper.map_operation(&mut doc, &resource, &operation);
            }
            self.mapper.on_finish_resource(&mut doc, &resource);
        }
        self.mapper.on_finish(&mut doc, &api);
        doc
    }

    /// Describes one action.
    fn operation_doc(&self, semantics: &ActionSemantics) -> OperationDoc {
        let shape = semantics.resource().shape();
        let route = if semantics.is_standard() {
            shape.to_string()
        } else {
            format!("{shape}/{}", semantics.name())
        };
        let form_id = semantics.form().map(|form| form.descriptor().id.clone());
        OperationDoc {
            name: semantics.name().to_string(),
            method: semantics.method().as_str().to_string(),
            kind: semantics.kind(),
            route,
            form_url: form_id.as_deref().map(|id| self.context.urls().form(id)),
            form_id,
        }
    }
}

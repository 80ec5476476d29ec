// crates/hypergate-core/src/writer/single.rs
// ============================================================================
// Module: Single Model Writer
// Description: Fixed traversal of one model driving a message mapper.
// Purpose: Produce item documents without per-resource serialization code.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The traversal order for one model is fixed:
//!
//! 1. `on_start`, self URL, types
//! 2. properties in declaration order (absent values produce no call)
//! 3. binaries as `{self_url}/{binary_id}`
//! 4. nested models, each a full traversal at `path.nested(name)`
//! 5. static links
//! 6. linked models: embedded when selected and loadable, else linked
//! 7. related collections as `{self_url}/{name}`
//! 8. operations (document root only)
//! 9. `on_finish`
//!
//! Any extractor or embedded-load failure aborts the whole document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::FieldValue;
use crate::core::LinkedModelRef;
use crate::core::ModelSnapshot;
use crate::core::ParamValue;
use crate::core::RouteShape;
use crate::core::SingleModel;
use crate::core::encode_segment;
use crate::core::format_date;
use crate::writer::context::WriteError;
use crate::writer::context::WriterContext;
use crate::writer::context::finish;
use crate::writer::json::JsonObjectBuilder;
use crate::writer::mapper::ModelInfo;
use crate::writer::mapper::SingleModelMessageMapper;
use crate::writer::operations::write_operations;
use crate::writer::path::FieldPath;

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Writes one model document.
pub struct SingleModelWriter<'a> {
    /// Request context.
    context: &'a WriterContext<'a>,
    /// Format strategy.
    mapper: &'a dyn SingleModelMessageMapper,
}

impl<'a> SingleModelWriter<'a> {
    /// Creates a writer for `mapper`.
    #[must_use]
    pub const fn new(context: &'a WriterContext<'a>, mapper: &'a dyn SingleModelMessageMapper) -> Self {
        Self {
            context,
            mapper,
        }
    }

    /// Writes `model` and serializes the document.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the representor is missing, a field
    /// extractor or embedded load fails, or serialization fails.
    pub fn write(&self, model: &SingleModel) -> Result<String, WriteError> {
        finish(&self.write_document(model)?)
    }

    /// Writes `model` into a document builder.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the representor is missing or a field
    /// extractor or embedded load fails.
    pub fn write_document(&self, model: &SingleModel) -> Result<JsonObjectBuilder, WriteError> {
        let representor = self.context.representor(model.resource_name())?;
        let snapshot = representor.snapshot_any(model.model(), &self.context.scope())?;
        let mut doc = JsonObjectBuilder::new();
        write_model(
            self.context,
            self.mapper,
            &mut doc,
            &FieldPath::root(),
            Some(model.resource_name()),
            &snapshot,
        )?;
        Ok(doc)
    }
}

// ============================================================================
// SECTION: Traversal
// ============================================================================

/// Writes one snapshot at `path`.
///
/// # Errors
///
/// Returns [`WriteError`] when a date cannot be formatted or an embedded
/// model cannot be loaded.
pub(crate) fn write_model(
    context: &WriterContext<'_>,
    mapper: &dyn SingleModelMessageMapper,
    doc: &mut JsonObjectBuilder,
    path: &FieldPath,
    resource_name: Option<&str>,
    snapshot: &ModelSnapshot,
) -> Result<(), WriteError> {
    let resource_name = resource_name.map(str::to_string).or_else(|| {
        snapshot.identifier_type.as_ref().and_then(|identifier_type| context.resource_for(identifier_type))
    });
    let self_url = match (&resource_name, &snapshot.identifier) {
        (Some(resource), Some(identifier)) => context.item_url(resource, identifier),
        _ => None,
    };
    let info = ModelInfo {
        resource_name,
        types: snapshot.types.clone(),
        identifier: snapshot.identifier.clone(),
        self_url,
    };

    mapper.on_start(doc, path, &info);
    if let Some(url) = &info.self_url {
        mapper.map_self_url(doc, path, url);
    }
    mapper.map_types(doc, path, &info.types);

    for (name, value) in &snapshot.properties {
        write_property(mapper, doc, path, name, value)?;
    }

    if let Some(self_url) = &info.self_url {
        for (name, binary_id) in &snapshot.binaries {
            mapper.map_binary(doc, path, name, &format!("{self_url}/{}", encode_segment(binary_id)));
        }
    }

    for (name, child) in &snapshot.nested {
        let child_path = path.nested(name);
        mapper.on_start_nested(doc, path, name);
        write_model(context, mapper, doc, &child_path, None, child)?;
        mapper.on_finish_nested(doc, path, name);
    }

    for (name, url) in &snapshot.links {
        mapper.map_link(doc, path, name, url);
    }

    for linked in &snapshot.linked_models {
        write_linked(context, mapper, doc, path, linked)?;
    }

    if let Some(self_url) = &info.self_url {
        for collection in &snapshot.related_collections {
            let url = format!("{self_url}/{}", encode_segment(&collection.name));
            mapper.map_related_collection_url(doc, path, &collection.name, &url);
        }
    }

    if path.is_root()
        && let (Some(resource), Some(identifier), Some(self_url)) =
            (&info.resource_name, &info.identifier, &info.self_url)
    {
        write_operations(
            context,
            mapper,
            doc,
            &RouteShape::Item(resource.clone()),
            self_url,
            &[ParamValue::Id(identifier.clone())],
        );
    }

    mapper.on_finish(doc, path, &info);
    Ok(())
}

/// Dispatches one present property to its kind callback.
fn write_property(
    mapper: &dyn SingleModelMessageMapper,
    doc: &mut JsonObjectBuilder,
    path: &FieldPath,
    name: &str,
    value: &FieldValue,
) -> Result<(), WriteError> {
    match value {
        FieldValue::String(value) => mapper.map_string(doc, path, name, value),
        FieldValue::StringList(values) => mapper.map_string_list(doc, path, name, values),
        FieldValue::Boolean(value) => mapper.map_boolean(doc, path, name, *value),
        FieldValue::BooleanList(values) => mapper.map_boolean_list(doc, path, name, values),
        FieldValue::Number(value) => mapper.map_number(doc, path, name, value),
        FieldValue::NumberList(values) => mapper.map_number_list(doc, path, name, values),
        FieldValue::Date(value) => mapper.map_date(doc, path, name, &format_date(name, *value)?),
        FieldValue::DateList(values) => {
            let rendered =
                values.iter().map(|value| format_date(name, *value)).collect::<Result<Vec<_>, _>>()?;
            mapper.map_date_list(doc, path, name, &rendered);
        }
    }
    Ok(())
}

/// Embeds a selected linked model, or maps its URL.
///
/// Relations whose target cannot be addressed produce no call.
fn write_linked(
    context: &WriterContext<'_>,
    mapper: &dyn SingleModelMessageMapper,
    doc: &mut JsonObjectBuilder,
    path: &FieldPath,
    linked: &LinkedModelRef,
) -> Result<(), WriteError> {
    let Some(resource) = context.resource_for(&linked.target) else {
        return Ok(());
    };
    if context.embedded().contains(&path.dotted(&linked.name))
        && let Some(representor) = context.representors().representor(&resource)
        && let Some(model) = context.source().fetch(&resource, &linked.identifier)?
    {
        let snapshot = representor.snapshot_any(model.as_ref(), &context.scope())?;
        let child_path = path.embedded(&linked.name);
        mapper.on_start_embedded(doc, path, &linked.name);
        write_model(context, mapper, doc, &child_path, Some(&resource), &snapshot)?;
        mapper.on_finish_embedded(doc, path, &linked.name);
        return Ok(());
    }
    if let Some(url) = context.item_url(&resource, &linked.identifier) {
        mapper.map_linked_resource_url(doc, path, &linked.name, &url);
    }
    Ok(())
}

// crates/hypergate-formats/src/plain_json.rs
// ============================================================================
// Module: Plain JSON Format
// Description: Message mappers for `application/json`.
// Purpose: Render models as plain data objects without hypermedia controls.
// Dependencies: hypergate-core, serde_json
// ============================================================================

//! ## Overview
//! Plain JSON carries data only. Properties become object members, nested
//! and embedded models become child objects keyed by field name, and every
//! URL (links, linked models, binaries, related collections) becomes a plain
//! string member. Self URLs, types, and operations are not represented.
//!
//! Pages are `{"items": [...], "page", "per_page", "total", "page_count"}`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use hypergate_core::FieldDescriptor;
use hypergate_core::FormDescriptor;
use hypergate_core::FormField;
use hypergate_core::Identifier;
use hypergate_core::writer::BatchInfo;
use hypergate_core::writer::BatchMessageMapper;
use hypergate_core::writer::DocumentationInfo;
use hypergate_core::writer::DocumentationMessageMapper;
use hypergate_core::writer::FieldPath;
use hypergate_core::writer::FormMessageMapper;
use hypergate_core::writer::JsonObjectBuilder;
use hypergate_core::writer::MEDIA_TYPE_JSON;
use hypergate_core::writer::MessageMapper;
use hypergate_core::writer::ModelInfo;
use hypergate_core::writer::OperationDoc;
use hypergate_core::writer::OperationMapper;
use hypergate_core::writer::PageInfo;
use hypergate_core::writer::PageMessageMapper;
use hypergate_core::writer::ResourceInfo;
use hypergate_core::writer::SingleModelMessageMapper;
use serde_json::Number;
use serde_json::Value;
use serde_json::json;

use crate::values::boolean_array;
use crate::values::extend;
use crate::values::form_field_value;
use crate::values::identifier_value;
use crate::values::number_array;
use crate::values::segment_location;
use crate::values::string_array;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key of the item array in page documents.
pub const ITEMS_KEY: &str = "items";
/// Key of the resource map in documentation documents.
const RESOURCES_KEY: &str = "resources";

// ============================================================================
// SECTION: Format
// ============================================================================

/// Plain JSON format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainJsonFormat;

impl MessageMapper for PlainJsonFormat {
    fn media_type(&self) -> &str {
        MEDIA_TYPE_JSON
    }
}

impl OperationMapper for PlainJsonFormat {}

// ============================================================================
// SECTION: Single Model
// ============================================================================

impl SingleModelMessageMapper for PlainJsonFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, _model: &ModelInfo) {
        doc.touch(&segment_location(path));
    }

    fn map_string(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: &str) {
        doc.set(&segment_location(path), name, Value::String(value.to_string()));
    }

    fn map_string_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[String],
    ) {
        doc.set(&segment_location(path), name, string_array(values));
    }

    fn map_boolean(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: bool) {
        doc.set(&segment_location(path), name, Value::Bool(value));
    }

    fn map_boolean_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[bool],
    ) {
        doc.set(&segment_location(path), name, boolean_array(values));
    }

    fn map_number(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: &Number) {
        doc.set(&segment_location(path), name, Value::Number(value.clone()));
    }

    fn map_number_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[Number],
    ) {
        doc.set(&segment_location(path), name, number_array(values));
    }

    fn map_link(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, url: &str) {
        doc.set(&segment_location(path), name, Value::String(url.to_string()));
    }

    fn map_linked_resource_url(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        url: &str,
    ) {
        doc.set(&segment_location(path), name, Value::String(url.to_string()));
    }
}

// ============================================================================
// SECTION: Page
// ============================================================================

impl PageMessageMapper for PlainJsonFormat {
    fn item_mapper(&self) -> &dyn SingleModelMessageMapper {
        self
    }

    fn on_start(&self, doc: &mut JsonObjectBuilder, page: &PageInfo) {
        doc.set(&[], ITEMS_KEY, Value::Array(Vec::new()));
        doc.set(&[], "page", Value::from(page.page));
        doc.set(&[], "per_page", Value::from(page.per_page));
    }

    fn on_finish_item(
        &self,
        doc: &mut JsonObjectBuilder,
        _page: &PageInfo,
        _index: usize,
        item: JsonObjectBuilder,
    ) {
        doc.push(&[], ITEMS_KEY, item.into_value());
    }

    fn map_item_total_count(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, total: u64) {
        doc.set(&[], "total", Value::from(total));
    }

    fn map_page_count(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, count: u64) {
        doc.set(&[], "page_count", Value::from(count));
    }
}

// ============================================================================
// SECTION: Documentation
// ============================================================================

/// Returns the location of one resource entry.
fn resource_location(resource: &ResourceInfo) -> Vec<String> {
    vec![RESOURCES_KEY.to_string(), resource.name.clone()]
}

/// Renders a declared field as `{kind, target?}`.
pub(crate) fn property_value(field: &FieldDescriptor) -> Value {
    let mut value = json!({ "kind": field.kind.as_str() });
    if let (Some(target), Some(object)) = (&field.target, value.as_object_mut()) {
        object.insert("target".to_string(), Value::String(target.clone()));
    }
    value
}

/// Renders a supported action as `{name, method, kind, route, form?}`.
pub(crate) fn operation_value(operation: &OperationDoc) -> Value {
    let mut value = json!({
        "name": operation.name,
        "method": operation.method,
        "kind": operation.kind.as_str(),
        "route": operation.route,
    });
    if let (Some(form_url), Some(object)) = (&operation.form_url, value.as_object_mut()) {
        object.insert("form".to_string(), Value::String(form_url.clone()));
    }
    value
}

impl DocumentationMessageMapper for PlainJsonFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, api: &DocumentationInfo) {
        doc.set(&[], "title", Value::String(api.title.clone()));
        doc.set(&[], "description", Value::String(api.description.clone()));
        doc.touch(&[RESOURCES_KEY.to_string()]);
    }

    fn on_start_resource(&self, doc: &mut JsonObjectBuilder, resource: &ResourceInfo) {
        let location = resource_location(resource);
        doc.set(&location, "types", string_array(&resource.types));
        doc.set(&location, "url", Value::String(resource.collection_url.clone()));
        doc.touch(&extend(&location, &["properties"]));
        doc.set(&location, "operations", Value::Array(Vec::new()));
    }

    fn map_property(
        &self,
        doc: &mut JsonObjectBuilder,
        resource: &ResourceInfo,
        field: &FieldDescriptor,
    ) {
        let location = extend(&resource_location(resource), &["properties"]);
        doc.set(&location, &field.name, property_value(field));
    }

    fn map_operation(
        &self,
        doc: &mut JsonObjectBuilder,
        resource: &ResourceInfo,
        operation: &OperationDoc,
    ) {
        doc.push(&resource_location(resource), "operations", operation_value(operation));
    }
}

// ============================================================================
// SECTION: Form
// ============================================================================

impl FormMessageMapper for PlainJsonFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, form: &FormDescriptor, _url: &str) {
        doc.set(&[], "id", Value::String(form.id.clone()));
        if let Some(title) = &form.title {
            doc.set(&[], "title", Value::String(title.clone()));
        }
        if let Some(description) = &form.description {
            doc.set(&[], "description", Value::String(description.clone()));
        }
        doc.set(&[], "fields", Value::Array(Vec::new()));
    }

    fn map_field(&self, doc: &mut JsonObjectBuilder, _form: &FormDescriptor, field: &FormField) {
        doc.push(&[], "fields", form_field_value(field));
    }
}

// ============================================================================
// SECTION: Batch
// ============================================================================

impl BatchMessageMapper for PlainJsonFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, batch: &BatchInfo) {
        doc.set(&[], "resource", Value::String(batch.resource_name.clone()));
        doc.set(&[], "count", Value::from(batch.count));
        doc.set(&[], "created", Value::Array(Vec::new()));
    }

    fn map_created(
        &self,
        doc: &mut JsonObjectBuilder,
        _batch: &BatchInfo,
        identifier: &Identifier,
        _url: Option<&str>,
    ) {
        doc.push(&[], "created", identifier_value(identifier));
    }
}

// crates/hypergate-formats/src/hal.rs
// ============================================================================
// Module: HAL Format
// Description: Message mappers for `application/hal+json`.
// Purpose: Render models with `_links`, `_embedded`, and HAL-FORMS templates.
// Dependencies: hypergate-core, serde_json
// ============================================================================

//! ## Overview
//! Every URL becomes a link object `{"href": url}` under `_links`; the self
//! URL is the `self` link. Embedded models live under `_embedded.{name}`,
//! nested models stay inline under their field name. Operations become
//! HAL-FORMS `_templates` keyed by action name.
//!
//! Pages embed their items under `_embedded.{resource}` and carry `self`,
//! `first`, `last`, `next`, and `prev` links.

// ============================================================================
// SECTION: Imports
// ============================================================================

use hypergate_core::FieldDescriptor;
use hypergate_core::FieldKind;
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
use hypergate_core::writer::MEDIA_TYPE_HAL;
use hypergate_core::writer::MessageMapper;
use hypergate_core::writer::ModelInfo;
use hypergate_core::writer::OperationDoc;
use hypergate_core::writer::OperationInfo;
use hypergate_core::writer::OperationMapper;
use hypergate_core::writer::PageInfo;
use hypergate_core::writer::PageMessageMapper;
use hypergate_core::writer::PathSegment;
use hypergate_core::writer::ResourceInfo;
use hypergate_core::writer::SingleModelMessageMapper;
use serde_json::Number;
use serde_json::Value;
use serde_json::json;

use crate::plain_json::PlainJsonFormat;
use crate::values::boolean_array;
use crate::values::extend;
use crate::values::identifier_value;
use crate::values::number_array;
use crate::values::string_array;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key of the link map.
pub const LINKS_KEY: &str = "_links";
/// Key of the embedded resource map.
pub const EMBEDDED_KEY: &str = "_embedded";
/// Key of the HAL-FORMS template map.
pub const TEMPLATES_KEY: &str = "_templates";

// ============================================================================
// SECTION: Format
// ============================================================================

/// HAL format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HalFormat;

/// Returns the object location of the model at `path`.
fn location(path: &FieldPath) -> Vec<String> {
    let mut keys = Vec::with_capacity(path.depth() * 2);
    for segment in path.segments() {
        match segment {
            PathSegment::Embedded(name) => {
                keys.push(EMBEDDED_KEY.to_string());
                keys.push(name.clone());
            }
            PathSegment::Nested(name) => keys.push(name.clone()),
        }
    }
    keys
}

/// Writes the link `rel` -> `url` into the object at `location`.
fn set_link(doc: &mut JsonObjectBuilder, location: &[String], rel: &str, url: &str) {
    doc.set(&extend(location, &[LINKS_KEY, rel]), "href", Value::String(url.to_string()));
}

impl MessageMapper for HalFormat {
    fn media_type(&self) -> &str {
        MEDIA_TYPE_HAL
    }
}

impl OperationMapper for HalFormat {
    fn on_start_operation(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, op: &OperationInfo) {
        let template = extend(&location(path), &[TEMPLATES_KEY, op.name.as_str()]);
        doc.set(&template, "title", Value::String(op.name.clone()));
    }

    fn map_operation_method(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, op: &OperationInfo) {
        let template = extend(&location(path), &[TEMPLATES_KEY, op.name.as_str()]);
        doc.set(&template, "method", Value::String(op.method.clone()));
        doc.set(&template, "target", Value::String(op.target_url.clone()));
    }

    fn map_operation_form_url(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        op: &OperationInfo,
        form_url: &str,
    ) {
        let template = extend(&location(path), &[TEMPLATES_KEY, op.name.as_str()]);
        set_link(doc, &template, "form", form_url);
    }
}

// ============================================================================
// SECTION: Single Model
// ============================================================================

impl SingleModelMessageMapper for HalFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, _model: &ModelInfo) {
        doc.touch(&location(path));
    }

    fn map_self_url(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, url: &str) {
        set_link(doc, &location(path), "self", url);
    }

    fn map_string(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: &str) {
        doc.set(&location(path), name, Value::String(value.to_string()));
    }

    fn map_string_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[String],
    ) {
        doc.set(&location(path), name, string_array(values));
    }

    fn map_boolean(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: bool) {
        doc.set(&location(path), name, Value::Bool(value));
    }

    fn map_boolean_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[bool],
    ) {
        doc.set(&location(path), name, boolean_array(values));
    }

    fn map_number(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: &Number) {
        doc.set(&location(path), name, Value::Number(value.clone()));
    }

    fn map_number_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[Number],
    ) {
        doc.set(&location(path), name, number_array(values));
    }

    fn map_link(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, url: &str) {
        set_link(doc, &location(path), name, url);
    }

    fn map_linked_resource_url(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        url: &str,
    ) {
        set_link(doc, &location(path), name, url);
    }
}

// ============================================================================
// SECTION: Page
// ============================================================================

impl PageMessageMapper for HalFormat {
    fn item_mapper(&self) -> &dyn SingleModelMessageMapper {
        self
    }

    fn on_start(&self, doc: &mut JsonObjectBuilder, page: &PageInfo) {
        doc.set(&[EMBEDDED_KEY.to_string()], &page.resource_name, Value::Array(Vec::new()));
        doc.set(&[], "page", Value::from(page.page));
        doc.set(&[], "per_page", Value::from(page.per_page));
    }

    fn on_finish_item(
        &self,
        doc: &mut JsonObjectBuilder,
        page: &PageInfo,
        _index: usize,
        item: JsonObjectBuilder,
    ) {
        doc.push(&[EMBEDDED_KEY.to_string()], &page.resource_name, item.into_value());
    }

    fn map_collection_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        set_link(doc, &[], "collection", url);
    }

    fn map_current_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        set_link(doc, &[], "self", url);
    }

    fn map_first_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        set_link(doc, &[], "first", url);
    }

    fn map_last_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        set_link(doc, &[], "last", url);
    }

    fn map_next_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        set_link(doc, &[], "next", url);
    }

    fn map_previous_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        set_link(doc, &[], "prev", url);
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

impl DocumentationMessageMapper for HalFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, api: &DocumentationInfo) {
        DocumentationMessageMapper::on_start(&PlainJsonFormat, doc, api);
        set_link(doc, &[], "self", &api.documentation_url);
    }

    fn on_start_resource(&self, doc: &mut JsonObjectBuilder, resource: &ResourceInfo) {
        DocumentationMessageMapper::on_start_resource(&PlainJsonFormat, doc, resource);
    }

    fn map_property(
        &self,
        doc: &mut JsonObjectBuilder,
        resource: &ResourceInfo,
        field: &FieldDescriptor,
    ) {
        PlainJsonFormat.map_property(doc, resource, field);
    }

    fn map_operation(
        &self,
        doc: &mut JsonObjectBuilder,
        resource: &ResourceInfo,
        operation: &OperationDoc,
    ) {
        PlainJsonFormat.map_operation(doc, resource, operation);
    }
}

// ============================================================================
// SECTION: Form
// ============================================================================

/// Maps a field kind to a HAL-FORMS input type.
const fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Boolean => "checkbox",
        FieldKind::Number => "number",
        FieldKind::Date => "datetime-local",
        _ => "text",
    }
}

impl FormMessageMapper for HalFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, form: &FormDescriptor, url: &str) {
        set_link(doc, &[], "self", url);
        let template = [TEMPLATES_KEY.to_string(), "default".to_string()];
        doc.set(&template, "title", Value::String(form.title.clone().unwrap_or_else(|| form.id.clone())));
        if let Some(description) = &form.description {
            doc.set(&template, "description", Value::String(description.clone()));
        }
        doc.set(&template, "properties", Value::Array(Vec::new()));
    }

    fn map_field(&self, doc: &mut JsonObjectBuilder, _form: &FormDescriptor, field: &FormField) {
        let template = [TEMPLATES_KEY.to_string(), "default".to_string()];
        doc.push(
            &template,
            "properties",
            json!({
                "name": field.name,
                "type": input_type(field.kind),
                "required": field.required,
            }),
        );
    }
}

// ============================================================================
// SECTION: Batch
// ============================================================================

impl BatchMessageMapper for HalFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, batch: &BatchInfo) {
        doc.set(&[], "count", Value::from(batch.count));
        doc.set(&[], "created", Value::Array(Vec::new()));
    }

    fn map_created(
        &self,
        doc: &mut JsonObjectBuilder,
        _batch: &BatchInfo,
        identifier: &Identifier,
        url: Option<&str>,
    ) {
        doc.push(&[], "created", identifier_value(identifier));
        if let Some(url) = url {
            doc.push(&[LINKS_KEY.to_string()], "created", json!({ "href": url }));
        }
    }
}

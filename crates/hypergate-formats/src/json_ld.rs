// crates/hypergate-formats/src/json_ld.rs
// ============================================================================
// Module: JSON-LD Format
// Description: Message mappers for `application/ld+json` with Hydra terms.
// Purpose: Render models as linked data nodes and APIs as Hydra documents.
// Dependencies: hypergate-core, serde_json
// ============================================================================

//! ## Overview
//! Documents reference the Hydra core context. A model is a node with `@id`
//! (its self URL) and `@type`; links, linked models, and related collections
//! are node references `{"@id": url}`. Embedded and nested models are
//! inline nodes under their field name. Operations are appended to the
//! model's `operation` array.
//!
//! Pages are `Collection` nodes with `member`, `totalItems`, and a
//! `PartialCollectionView` under `view`. Documentation is an
//! `ApiDocumentation` node listing one `supportedClass` per resource.

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
use hypergate_core::writer::MEDIA_TYPE_JSON_LD;
use hypergate_core::writer::MessageMapper;
use hypergate_core::writer::ModelInfo;
use hypergate_core::writer::OperationDoc;
use hypergate_core::writer::OperationInfo;
use hypergate_core::writer::OperationMapper;
use hypergate_core::writer::PageInfo;
use hypergate_core::writer::PageMessageMapper;
use hypergate_core::writer::ResourceInfo;
use hypergate_core::writer::SingleModelMessageMapper;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use serde_json::json;

use crate::values::boolean_array;
use crate::values::identifier_value;
use crate::values::number_array;
use crate::values::segment_location;
use crate::values::string_array;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Hydra core vocabulary context.
pub const HYDRA_CONTEXT: &str = "http://www.w3.org/ns/hydra/context.jsonld";
/// Scratch key holding the class under construction.
const PENDING_CLASS_KEY: &str = "_class";
/// Key of the page view node.
const VIEW_KEY: &str = "view";

/// Member mapper used for page items; members share the page context.
static MEMBER_FORMAT: JsonLdFormat = JsonLdFormat {
    emit_context: false,
};

// ============================================================================
// SECTION: Format
// ============================================================================

/// JSON-LD format using Hydra terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonLdFormat {
    /// Whether root documents carry `@context`.
    emit_context: bool,
}

impl JsonLdFormat {
    /// Creates a format whose root documents carry the Hydra context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            emit_context: true,
        }
    }

    /// Writes `@context` at the document root when enabled.
    fn write_context(&self, doc: &mut JsonObjectBuilder) {
        if self.emit_context {
            doc.set(&[], "@context", Value::String(HYDRA_CONTEXT.to_string()));
        }
    }
}

impl Default for JsonLdFormat {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns a node reference `{"@id": url}`.
fn node_ref(url: &str) -> Value {
    json!({ "@id": url })
}

/// Returns `@type` as a string for one type, else an array.
fn type_value(types: &[String]) -> Value {
    match types {
        [single] => Value::String(single.clone()),
        _ => string_array(types),
    }
}

impl MessageMapper for JsonLdFormat {
    fn media_type(&self) -> &str {
        MEDIA_TYPE_JSON_LD
    }
}

impl OperationMapper for JsonLdFormat {
    fn on_finish_operation(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, op: &OperationInfo) {
        let mut operation = Map::new();
        operation.insert("@type".to_string(), Value::String("Operation".to_string()));
        operation.insert("title".to_string(), Value::String(op.name.clone()));
        operation.insert("method".to_string(), Value::String(op.method.clone()));
        operation.insert("target".to_string(), node_ref(&op.target_url));
        if let Some(form_url) = &op.form_url {
            operation.insert("expects".to_string(), node_ref(form_url));
        }
        doc.push(&segment_location(path), "operation", Value::Object(operation));
    }
}

// ============================================================================
// SECTION: Single Model
// ============================================================================

impl SingleModelMessageMapper for JsonLdFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, _model: &ModelInfo) {
        if path.is_root() {
            self.write_context(doc);
        }
        doc.touch(&segment_location(path));
    }

    fn map_self_url(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, url: &str) {
        doc.set(&segment_location(path), "@id", Value::String(url.to_string()));
    }

    fn map_types(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, types: &[String]) {
        if !types.is_empty() {
            doc.set(&segment_location(path), "@type", type_value(types));
        }
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
        doc.set(&segment_location(path), name, node_ref(url));
    }

    fn map_linked_resource_url(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        url: &str,
    ) {
        doc.set(&segment_location(path), name, node_ref(url));
    }

    fn map_related_collection_url(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        url: &str,
    ) {
        doc.set(&segment_location(path), name, json!({ "@id": url, "@type": "Collection" }));
    }
}

// ============================================================================
// SECTION: Page
// ============================================================================

/// Returns the location of the page view node.
fn view_location() -> [String; 1] {
    [VIEW_KEY.to_string()]
}

impl PageMessageMapper for JsonLdFormat {
    fn item_mapper(&self) -> &dyn SingleModelMessageMapper {
        &MEMBER_FORMAT
    }

    fn on_start(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo) {
        self.write_context(doc);
        doc.set(&[], "@type", Value::String("Collection".to_string()));
        doc.set(&[], "member", Value::Array(Vec::new()));
    }

    fn on_finish_item(
        &self,
        doc: &mut JsonObjectBuilder,
        _page: &PageInfo,
        _index: usize,
        item: JsonObjectBuilder,
    ) {
        doc.push(&[], "member", item.into_value());
    }

    fn map_collection_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        doc.set(&[], "@id", Value::String(url.to_string()));
    }

    fn map_current_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        doc.set(&view_location(), "@id", Value::String(url.to_string()));
        doc.set(&view_location(), "@type", Value::String("PartialCollectionView".to_string()));
    }

    fn map_first_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        doc.set(&view_location(), "first", Value::String(url.to_string()));
    }

    fn map_last_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        doc.set(&view_location(), "last", Value::String(url.to_string()));
    }

    fn map_next_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        doc.set(&view_location(), "next", Value::String(url.to_string()));
    }

    fn map_previous_page_url(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, url: &str) {
        doc.set(&view_location(), "previous", Value::String(url.to_string()));
    }

    fn map_item_total_count(&self, doc: &mut JsonObjectBuilder, _page: &PageInfo, total: u64) {
        doc.set(&[], "totalItems", Value::from(total));
    }
}

// ============================================================================
// SECTION: Documentation
// ============================================================================

/// Returns the location of the class under construction.
fn pending_class() -> [String; 1] {
    [PENDING_CLASS_KEY.to_string()]
}

impl DocumentationMessageMapper for JsonLdFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, api: &DocumentationInfo) {
        self.write_context(doc);
        doc.set(&[], "@id", Value::String(api.documentation_url.clone()));
        doc.set(&[], "@type", Value::String("ApiDocumentation".to_string()));
        doc.set(&[], "title", Value::String(api.title.clone()));
        doc.set(&[], "description", Value::String(api.description.clone()));
        doc.set(&[], "supportedClass", Value::Array(Vec::new()));
    }

    fn on_start_resource(&self, doc: &mut JsonObjectBuilder, resource: &ResourceInfo) {
        let class = pending_class();
        doc.set(&class, "@id", Value::String(format!("#{}", resource.name)));
        doc.set(&class, "@type", Value::String("Class".to_string()));
        doc.set(&class, "title", Value::String(resource.name.clone()));
        doc.set(&class, "types", string_array(&resource.types));
        doc.set(&class, "collection", node_ref(&resource.collection_url));
        doc.set(&class, "supportedProperty", Value::Array(Vec::new()));
        doc.set(&class, "supportedOperation", Value::Array(Vec::new()));
    }

    fn map_property(
        &self,
        doc: &mut JsonObjectBuilder,
        _resource: &ResourceInfo,
        field: &FieldDescriptor,
    ) {
        let mut property = Map::new();
        property.insert("@type".to_string(), Value::String("SupportedProperty".to_string()));
        property.insert("property".to_string(), Value::String(field.name.clone()));
        property.insert("range".to_string(), Value::String(field.kind.as_str().to_string()));
        if let Some(target) = &field.target {
            property.insert("target".to_string(), Value::String(target.clone()));
        }
        doc.push(&pending_class(), "supportedProperty", Value::Object(property));
    }

    fn map_operation(
        &self,
        doc: &mut JsonObjectBuilder,
        _resource: &ResourceInfo,
        operation: &OperationDoc,
    ) {
        let mut entry = Map::new();
        entry.insert("@type".to_string(), Value::String("Operation".to_string()));
        entry.insert("title".to_string(), Value::String(operation.name.clone()));
        entry.insert("method".to_string(), Value::String(operation.method.clone()));
        entry.insert("template".to_string(), Value::String(operation.route.clone()));
        if let Some(form_url) = &operation.form_url {
            entry.insert("expects".to_string(), node_ref(form_url));
        }
        doc.push(&pending_class(), "supportedOperation", Value::Object(entry));
    }

    fn on_finish_resource(&self, doc: &mut JsonObjectBuilder, _resource: &ResourceInfo) {
        if let Some(class) = doc.take(&[], PENDING_CLASS_KEY) {
            doc.push(&[], "supportedClass", class);
        }
    }
}

// ============================================================================
// SECTION: Form
// ============================================================================

impl FormMessageMapper for JsonLdFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, form: &FormDescriptor, url: &str) {
        self.write_context(doc);
        doc.set(&[], "@id", Value::String(url.to_string()));
        doc.set(&[], "@type", Value::String("Class".to_string()));
        doc.set(&[], "title", Value::String(form.title.clone().unwrap_or_else(|| form.id.clone())));
        if let Some(description) = &form.description {
            doc.set(&[], "description", Value::String(description.clone()));
        }
        doc.set(&[], "supportedProperty", Value::Array(Vec::new()));
    }

    fn map_field(&self, doc: &mut JsonObjectBuilder, _form: &FormDescriptor, field: &FormField) {
        doc.push(
            &[],
            "supportedProperty",
            json!({
                "@type": "SupportedProperty",
                "property": field.name,
                "range": field.kind.as_str(),
                "required": field.required,
            }),
        );
    }
}

// ============================================================================
// SECTION: Batch
// ============================================================================

impl BatchMessageMapper for JsonLdFormat {
    fn on_start(&self, doc: &mut JsonObjectBuilder, batch: &BatchInfo) {
        self.write_context(doc);
        doc.set(&[], "@type", Value::String("Collection".to_string()));
        doc.set(&[], "totalItems", Value::from(batch.count));
        doc.set(&[], "member", Value::Array(Vec::new()));
    }

    fn map_created(
        &self,
        doc: &mut JsonObjectBuilder,
        _batch: &BatchInfo,
        identifier: &Identifier,
        url: Option<&str>,
    ) {
        let member = match url {
            Some(url) => json!({ "@id": url, "identifier": identifier_value(identifier) }),
            None => json!({ "identifier": identifier_value(identifier) }),
        };
        doc.push(&[], "member", member);
    }
}

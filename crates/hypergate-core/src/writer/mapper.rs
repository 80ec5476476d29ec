// crates/hypergate-core/src/writer/mapper.rs
// ============================================================================
// Module: Message Mappers
// Description: Per-format callback strategies driven by the writers.
// Purpose: Separate traversal order (writers) from document layout (formats).
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! Writers decide *when* a callback fires and with *what* data; a message
//! mapper decides what the callback contributes to the document. Every
//! callback except the media type has a no-op default, so a format that has
//! no notion of, say, links simply does not override the link callbacks.
//!
//! Callbacks receive the document under construction and the
//! [`FieldPath`] of the model being written, which lets a format address
//! embedded and nested models separately from top-level fields.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Number;

use crate::core::ActionKind;
use crate::core::FieldDescriptor;
use crate::core::FormDescriptor;
use crate::core::FormField;
use crate::core::Identifier;
use crate::writer::json::JsonObjectBuilder;
use crate::writer::path::FieldPath;

// ============================================================================
// SECTION: Callback Inputs
// ============================================================================

/// Model-level data passed to start/finish callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Resource the model belongs to, when known.
    pub resource_name: Option<String>,
    /// Hypermedia types, most specific first.
    pub types: Vec<String>,
    /// Model identifier, when declared.
    pub identifier: Option<Identifier>,
    /// Absolute URL of the model, when addressable.
    pub self_url: Option<String>,
}

/// Page-level data passed to page callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Resource of the listed models.
    pub resource_name: String,
    /// Absolute collection URL without query.
    pub collection_url: String,
    /// Current 1-based page.
    pub page: u64,
    /// Page size.
    pub per_page: u32,
    /// Total number of models across all pages.
    pub total_count: u64,
    /// Number of pages (at least 1).
    pub page_count: u64,
    /// Number of models on this page.
    pub item_count: usize,
}

/// One applicable action described inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationInfo {
    /// Action name.
    pub name: String,
    /// HTTP method.
    pub method: String,
    /// Action kind.
    pub kind: ActionKind,
    /// URL the request is sent to.
    pub target_url: String,
    /// Form document URL, when the action accepts a form.
    pub form_url: Option<String>,
}

/// API-level data passed to documentation callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationInfo {
    /// API title.
    pub title: String,
    /// API description.
    pub description: String,
    /// Absolute URL of the documentation document.
    pub documentation_url: String,
}

/// Resource-level data passed to documentation callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Resource name.
    pub name: String,
    /// Hypermedia types of the resource's models.
    pub types: Vec<String>,
    /// Absolute collection URL.
    pub collection_url: String,
}

/// One supported action in the documentation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDoc {
    /// Action name.
    pub name: String,
    /// HTTP method.
    pub method: String,
    /// Action kind.
    pub kind: ActionKind,
    /// Route template such as `/books/{id}`.
    pub route: String,
    /// Form id, when the action accepts a form.
    pub form_id: Option<String>,
    /// Form document URL, when the action accepts a form.
    pub form_url: Option<String>,
}

/// Batch-level data passed to batch callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInfo {
    /// Resource of the created models.
    pub resource_name: String,
    /// Number of created models.
    pub count: usize,
}

// ============================================================================
// SECTION: Base Traits
// ============================================================================

/// Shared by every mapper: the media type it produces.
pub trait MessageMapper: Send + Sync {
    /// Returns the media type of documents this mapper produces.
    fn media_type(&self) -> &str;
}

/// Callbacks describing applicable actions.
pub trait OperationMapper {
    /// Called before an operation's details.
    fn on_start_operation(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, op: &OperationInfo) {
        let _ = (doc, path, op);
    }

    /// Maps the operation's HTTP method and target.
    fn map_operation_method(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, op: &OperationInfo) {
        let _ = (doc, path, op);
    }

    /// Maps the operation's form URL; called only for form actions.
    fn map_operation_form_url(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        op: &OperationInfo,
        form_url: &str,
    ) {
        let _ = (doc, path, op, form_url);
    }

    /// Called after an operation's details.
    fn on_finish_operation(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, op: &OperationInfo) {
        let _ = (doc, path, op);
    }
}

// ============================================================================
// SECTION: Single Model Mapper
// ============================================================================

/// Callbacks for one model document.
pub trait SingleModelMessageMapper: MessageMapper + OperationMapper {
    /// Called first for every model, including nested and embedded ones.
    fn on_start(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, model: &ModelInfo) {
        let _ = (doc, path, model);
    }

    /// Maps the model's own URL.
    fn map_self_url(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, url: &str) {
        let _ = (doc, path, url);
    }

    /// Maps the model's hypermedia types.
    fn map_types(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, types: &[String]) {
        let _ = (doc, path, types);
    }

    /// Maps a string field.
    fn map_string(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: &str) {
        let _ = (doc, path, name, value);
    }

    /// Maps a string list field.
    fn map_string_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[String],
    ) {
        let _ = (doc, path, name, values);
    }

    /// Maps a boolean field.
    fn map_boolean(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: bool) {
        let _ = (doc, path, name, value);
    }

    /// Maps a boolean list field.
    fn map_boolean_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[bool],
    ) {
        let _ = (doc, path, name, values);
    }

    /// Maps a number field.
    fn map_number(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: &Number) {
        let _ = (doc, path, name, value);
    }

    /// Maps a number list field.
    fn map_number_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[Number],
    ) {
        let _ = (doc, path, name, values);
    }

    /// Maps a date field rendered as RFC 3339; defaults to a string field.
    fn map_date(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, value: &str) {
        self.map_string(doc, path, name, value);
    }

    /// Maps a date list field; defaults to a string list field.
    fn map_date_list(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        values: &[String],
    ) {
        self.map_string_list(doc, path, name, values);
    }

    /// Maps a binary field URL; defaults to a link.
    fn map_binary(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, url: &str) {
        self.map_link(doc, path, name, url);
    }

    /// Maps a static link.
    fn map_link(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str, url: &str) {
        let _ = (doc, path, name, url);
    }

    /// Maps the URL of a linked (not embedded) model.
    fn map_linked_resource_url(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        url: &str,
    ) {
        let _ = (doc, path, name, url);
    }

    /// Maps the URL of a related collection; defaults to a linked model URL.
    fn map_related_collection_url(
        &self,
        doc: &mut JsonObjectBuilder,
        path: &FieldPath,
        name: &str,
        url: &str,
    ) {
        self.map_linked_resource_url(doc, path, name, url);
    }

    /// Called before an embedded model is written at `path.embedded(name)`.
    fn on_start_embedded(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str) {
        let _ = (doc, path, name);
    }

    /// Called after an embedded model is written.
    fn on_finish_embedded(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str) {
        let _ = (doc, path, name);
    }

    /// Called before a nested model is written at `path.nested(name)`.
    fn on_start_nested(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str) {
        let _ = (doc, path, name);
    }

    /// Called after a nested model is written.
    fn on_finish_nested(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, name: &str) {
        let _ = (doc, path, name);
    }

    /// Called last for every model.
    fn on_finish(&self, doc: &mut JsonObjectBuilder, path: &FieldPath, model: &ModelInfo) {
        let _ = (doc, path, model);
    }
}

// ============================================================================
// SECTION: Page Mapper
// ============================================================================

/// Callbacks for a page document.
pub trait PageMessageMapper: MessageMapper + OperationMapper {
    /// Returns the mapper used for each item on the page.
    fn item_mapper(&self) -> &dyn SingleModelMessageMapper;

    /// Called first.
    fn on_start(&self, doc: &mut JsonObjectBuilder, page: &PageInfo) {
        let _ = (doc, page);
    }

    /// Called before item `index` is written.
    fn on_start_item(&self, doc: &mut JsonObjectBuilder, page: &PageInfo, index: usize) {
        let _ = (doc, page, index);
    }

    /// Receives the finished document of item `index`.
    fn on_finish_item(
        &self,
        doc: &mut JsonObjectBuilder,
        page: &PageInfo,
        index: usize,
        item: JsonObjectBuilder,
    ) {
        let _ = (doc, page, index, item);
    }

    /// Maps the collection URL.
    fn map_collection_url(&self, doc: &mut JsonObjectBuilder, page: &PageInfo, url: &str) {
        let _ = (doc, page, url);
    }

    /// Maps the URL of the current page.
    fn map_current_page_url(&self, doc: &mut JsonObjectBuilder, page: &PageInfo, url: &str) {
        let _ = (doc, page, url);
    }

    /// Maps the URL of the first page.
    fn map_first_page_url(&self, doc: &mut JsonObjectBuilder, page: &PageInfo, url: &str) {
        let _ = (doc, page, url);
    }

    /// Maps the URL of the last page.
    fn map_last_page_url(&self, doc: &mut JsonObjectBuilder, page: &PageInfo, url: &str) {
        let _ = (doc, page, url);
    }

    /// Maps the URL of the next page; not called on the last page.
    fn map_next_page_url(&self, doc: &mut JsonObjectBuilder, page: &PageInfo, url: &str) {
        let _ = (doc, page, url);
    }

    /// Maps the URL of the previous page; not called on the first page.
    fn map_previous_page_url(&self, doc: &mut JsonObjectBuilder, page: &PageInfo, url: &str) {
        let _ = (doc, page, url);
    }

    /// Maps the total number of models.
    fn map_item_total_count(&self, doc: &mut JsonObjectBuilder, page: &PageInfo, total: u64) {
        let _ = (doc, page, total);
    }

    /// Maps the number of pages.
    fn map_page_count(&self, doc: &mut JsonObjectBuilder, page: &PageInfo, count: u64) {
        let _ = (doc, page, count);
    }

    /// Called last.
    fn on_finish(&self, doc: &mut JsonObjectBuilder, page: &PageInfo) {
        let _ = (doc, page);
    }
}

// ============================================================================
// SECTION: Documentation Mapper
// ============================================================================

/// Callbacks for the API documentation document.
pub trait DocumentationMessageMapper: MessageMapper {
    /// Called first.
    fn on_start(&self, doc: &mut JsonObjectBuilder, api: &DocumentationInfo) {
        let _ = (doc, api);
    }

    /// Called before a resource's properties and operations.
    fn on_start_resource(&self, doc: &mut JsonObjectBuilder, resource: &ResourceInfo) {
        let _ = (doc, resource);
    }

    /// Maps one declared field of the resource's models.
    fn map_property(
        &self,
        doc: &mut JsonObjectBuilder,
        resource: &ResourceInfo,
        field: &FieldDescriptor,
    ) {
        let _ = (doc, resource, field);
    }

    /// Maps one supported action.
    fn map_operation(
        &self,
        doc: &mut JsonObjectBuilder,
        resource: &ResourceInfo,
        operation: &OperationDoc,
    ) {
        let _ = (doc, resource, operation);
    }

    /// Called after a resource.
    fn on_finish_resource(&self, doc: &mut JsonObjectBuilder, resource: &ResourceInfo) {
        let _ = (doc, resource);
    }

    /// Called last.
    fn on_finish(&self, doc: &mut JsonObjectBuilder, api: &DocumentationInfo) {
        let _ = (doc, api);
    }
}

// ============================================================================
// SECTION: Form Mapper
// ============================================================================

/// Callbacks for a form document.
pub trait FormMessageMapper: MessageMapper {
    /// Called first with the form's own URL.
    fn on_start(&self, doc: &mut JsonObjectBuilder, form: &FormDescriptor, url: &str) {
        let _ = (doc, form, url);
    }

    /// Maps one form field.
    fn map_field(&self, doc: &mut JsonObjectBuilder, form: &FormDescriptor, field: &FormField) {
        let _ = (doc, form, field);
    }

    /// Called last.
    fn on_finish(&self, doc: &mut JsonObjectBuilder, form: &FormDescriptor) {
        let _ = (doc, form);
    }
}

// ============================================================================
// SECTION: Batch Mapper
// ============================================================================

/// Callbacks for a batch-create result document.
pub trait BatchMessageMapper: MessageMapper {
    /// Called first.
    fn on_start(&self, doc: &mut JsonObjectBuilder, batch: &BatchInfo) {
        let _ = (doc, batch);
    }

    /// Maps one created model; `url` is absent when it cannot be addressed.
    fn map_created(
        &self,
        doc: &mut JsonObjectBuilder,
        batch: &BatchInfo,
        identifier: &Identifier,
        url: Option<&str>,
    ) {
        let _ = (doc, batch, identifier, url);
    }

    /// Called last.
    fn on_finish(&self, doc: &mut JsonObjectBuilder, batch: &BatchInfo) {
        let _ = (doc, batch);
    }
}


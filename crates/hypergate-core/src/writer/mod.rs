// crates/hypergate-core/src/writer/mod.rs
// ============================================================================
// Module: Writer Pipeline
// Description: Format-agnostic document writers and mapper protocol.
// Purpose: Drive message mappers through a fixed callback order.
// Dependencies: crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! Writers walk a model, page, form, batch result, or the whole API and emit
//! callbacks into a format's message mapper. The writer fixes the order; the
//! mapper fixes the layout. The public result of every writer is one
//! serialized JSON string.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod batch;
pub mod context;
pub mod documentation;
pub mod form;
pub mod json;
pub mod mapper;
mod operations;
pub mod page;
pub mod path;
pub mod single;
pub mod urls;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Plain JSON media type.
pub const MEDIA_TYPE_JSON: &str = "application/json";
/// HAL media type.
pub const MEDIA_TYPE_HAL: &str = "application/hal+json";
/// JSON-LD media type.
pub const MEDIA_TYPE_JSON_LD: &str = "application/ld+json";

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use batch::BatchWriter;
pub use context::WriteError;
pub use context::WriterContext;
pub use documentation::DocumentationWriter;
pub use form::FormWriter;
pub use json::JsonObjectBuilder;
pub use mapper::BatchInfo;
pub use mapper::BatchMessageMapper;
pub use mapper::DocumentationInfo;
pub use mapper::DocumentationMessageMapper;
pub use mapper::FormMessageMapper;
pub use mapper::MessageMapper;
pub use mapper::ModelInfo;
pub use mapper::OperationDoc;
pub use mapper::OperationInfo;
pub use mapper::OperationMapper;
pub use mapper::PageInfo;
pub use mapper::PageMessageMapper;
pub use mapper::ResourceInfo;
pub use mapper::SingleModelMessageMapper;
pub use page::PageWriter;
pub use path::EmbeddedSelection;
pub use path::FieldPath;
pub use path::PathSegment;
pub use single::SingleModelWriter;
pub use urls::DEFAULT_DOCS_SEGMENT;
pub use urls::DEFAULT_FORM_PREFIX;
pub use urls::UrlBuilder;

// crates/hypergate-core/src/core/mod.rs
// ============================================================================
// Module: Hypergate Core Types
// Description: Resource addresses, action semantics, forms, and representors.
// Purpose: Provide the immutable descriptions that resolution and writing read.
// Dependencies: percent-encoding, serde, serde_json, smallvec, thiserror, time
// ============================================================================

//! ## Overview
//! Core types describe *what* a hypermedia API exposes: resource addresses,
//! the operations bound to them, the parameters those operations receive,
//! and the per-type field descriptions used to serialize results. Everything
//! here is built once and immutable afterwards.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod action;
pub mod errors;
pub mod field;
pub mod form;
pub mod identifiers;
pub mod params;
pub mod representor;
pub mod resource;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use action::ActionKind;
pub use action::ActionOutput;
pub use action::ActionSemantics;
pub use action::AnnotationsStep;
pub use action::BatchResult;
pub use action::BuildStep;
pub use action::CREATE;
pub use action::ExecuteError;
pub use action::ExecuteFn;
pub use action::ExecuteStep;
pub use action::HttpMethod;
pub use action::Method;
pub use action::MethodStep;
pub use action::NameStep;
pub use action::PageModel;
pub use action::ParamsStep;
pub use action::PermissionFn;
pub use action::REMOVE;
pub use action::REPLACE;
pub use action::RETRIEVE;
pub use action::ReturnStep;
pub use action::ReturnType;
pub use action::SingleModel;
pub use action::UPDATE;
pub use action::is_standard_name;
pub use errors::BuilderError;
pub use field::FieldDescriptor;
pub use field::FieldError;
pub use field::FieldKind;
pub use field::FieldValue;
pub use field::format_date;
pub use field::parse_date;
pub use form::Form;
pub use form::FormBuilder;
pub use form::FormDescriptor;
pub use form::FormError;
pub use form::FormField;
pub use form::FormParser;
pub use form::FormValue;
pub use identifiers::Identifier;
pub use identifiers::IdentifierKind;
pub use identifiers::IdentifierType;
pub use identifiers::Path;
pub use identifiers::PathError;
pub use identifiers::decode_segment;
pub use identifiers::encode_segment;
pub use params::AcceptLanguage;
pub use params::Body;
pub use params::BodyValues;
pub use params::Credentials;
pub use params::DEFAULT_LANGUAGE;
pub use params::Pagination;
pub use params::PaginationLimits;
pub use params::ParamError;
pub use params::ParamType;
pub use params::ParamValue;
pub use params::parse_quality;
pub use representor::AnyRepresentor;
pub use representor::FieldOutput;
pub use representor::FieldsSelection;
pub use representor::LinkedModelRef;
pub use representor::ModelSnapshot;
pub use representor::RelatedCollection;
pub use representor::RelationIndex;
pub use representor::Representor;
pub use representor::RepresentorBuilder;
pub use representor::SnapshotScope;
pub use resource::Item;
pub use resource::Resource;
pub use resource::RouteShape;

// crates/hypergate-core/src/lib.rs
// ============================================================================
// Module: Hypergate Core Library
// Description: Public API surface for the Hypergate core.
// Purpose: Expose resource, action, representor, and writer building blocks.
// Dependencies: crate::{audit, core, interfaces, runtime, writer}
// ============================================================================

//! ## Overview
//! Hypergate core resolves requests to declared actions and writes their
//! results as hypermedia documents. Resource authors describe addresses,
//! actions, and representors; format crates supply message mappers; no
//! per-resource serialization code is written.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod writer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::ActionAuditEvent;
pub use audit::ActionOutcome;
pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ResolutionAuditEvent;
pub use audit::ResolutionOutcome;
pub use audit::StderrAuditSink;
pub use interfaces::EmbeddedError;
pub use interfaces::EmbeddedSource;
pub use interfaces::NoEmbedding;
pub use interfaces::ParamProvider;
pub use interfaces::PathMapper;
pub use interfaces::RepresentorLookup;
pub use interfaces::ResourceRouter;
pub use runtime::Action;
pub use runtime::ActionError;
pub use runtime::ActionRegistry;
pub use runtime::Generation;
pub use runtime::GenerationHandle;
pub use runtime::InMemoryRelationIndex;
pub use runtime::MAX_SEGMENTS;
pub use runtime::RegistryError;
pub use runtime::RepresentorCache;
pub use runtime::RepresentorSet;
pub use runtime::ResolveError;
pub use runtime::StaticPathMapper;
pub use writer::EmbeddedSelection;
pub use writer::FieldPath;
pub use writer::JsonObjectBuilder;
pub use writer::UrlBuilder;
pub use writer::WriteError;
pub use writer::WriterContext;

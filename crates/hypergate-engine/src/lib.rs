// crates/hypergate-engine/src/lib.rs
// ============================================================================
// Module: Hypergate Engine Library
// Description: Request orchestration for Hypergate deployments.
// Purpose: Turn transport-neutral requests into negotiated documents.
// Dependencies: hypergate-config, hypergate-core, hypergate-formats
// ============================================================================

//! ## Overview
//! The engine owns one published deployment generation, the enabled formats,
//! and the audit sink. Each request is resolved to an action, its parameters
//! are provided from the request, the permission check runs, the action
//! executes, and the output is written in the negotiated format. Mapping
//! outcomes and errors to status codes is left to the transport.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod engine;
pub mod request;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::Engine;
pub use engine::EngineError;
pub use request::Outcome;
pub use request::Request;
pub use request::RequestParams;
pub use request::Response;

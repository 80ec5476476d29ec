// crates/hypergate-core/src/runtime/mod.rs
// ============================================================================
// Module: Hypergate Runtime
// Description: Action resolution, relation indexing, and generation swaps.
// Purpose: Turn immutable descriptions into request-time lookups.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime owns everything that is built once per deployment generation
//! and then shared read-only across requests: the action registry and its
//! resolver, the representor set and cache, the relation index, and the
//! static path mapper.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod action;
pub mod generation;
pub mod paths;
pub mod registry;
pub mod relations;
pub mod representors;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use action::Action;
pub use action::ActionError;
pub use generation::Generation;
pub use generation::GenerationHandle;
pub use paths::StaticPathMapper;
pub use registry::ActionRegistry;
pub use registry::MAX_SEGMENTS;
pub use registry::RegistryError;
pub use registry::ResolveError;
pub use relations::InMemoryRelationIndex;
pub use representors::RepresentorCache;
pub use representors::RepresentorSet;

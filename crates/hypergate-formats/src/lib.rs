// crates/hypergate-formats/src/lib.rs
// ============================================================================
// Module: Hypergate Formats Library
// Description: Message mapper implementations for supported media types.
// Purpose: Render writer callbacks as plain JSON, HAL, or JSON-LD/Hydra.
// Dependencies: hypergate-core, serde_json
// ============================================================================

//! ## Overview
//! Each format is a stateless strategy implementing every message mapper
//! trait of `hypergate_core::writer`. [`FormatSet`] holds the enabled
//! formats and picks one per request from the `Accept` header.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod format;
pub mod hal;
pub mod json_ld;
pub mod negotiation;
pub mod plain_json;
mod values;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use format::Format;
pub use hal::HalFormat;
pub use json_ld::HYDRA_CONTEXT;
pub use json_ld::JsonLdFormat;
pub use negotiation::FormatError;
pub use negotiation::FormatSet;
pub use plain_json::PlainJsonFormat;

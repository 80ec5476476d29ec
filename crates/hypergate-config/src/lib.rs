// crates/hypergate-config/src/lib.rs
// ============================================================================
// Module: Hypergate Config Library
// Description: Configuration model, validation, and canonical example.
// Purpose: Single source of truth for hypergate.toml semantics.
// Dependencies: hypergate-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `hypergate-config` defines the configuration model for a Hypergate
//! deployment: URL layout, pagination bounds, enabled formats, API
//! documentation text, and audit output. Loading is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;

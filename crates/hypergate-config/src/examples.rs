// crates/hypergate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for Hypergate configuration. The example validates
//! under the same rules as a loaded file.

/// Returns a canonical example `hypergate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
base_url = "https://api.example.com/v1"
form_prefix = "forms"
docs_segment = "docs"

[pagination]
default_page_size = 30
max_page_size = 500

[formats]
default_media_type = "application/hal+json"
enabled = ["application/hal+json", "application/ld+json", "application/json"]

[docs]
title = "Library API"
description = "Books, authors, and reviews."

[audit]
enabled = true
# path = "hypergate-audit.jsonl"
"#,
    )
}

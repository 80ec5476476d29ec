// crates/hypergate-formats/src/negotiation/tests.rs
// ============================================================================
// Module: Media Type Negotiation Tests
// Description: Unit tests for `Accept` parsing and format set construction.
// Purpose: Validate weight ordering, wildcard handling, and set invariants.
// Dependencies: hypergate-formats
// ============================================================================

//! ## Overview
//! Checks media range ordering by weight, wildcard fallback to the default
//! format, and rejection of malformed format sets.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use hypergate_core::writer::MEDIA_TYPE_HAL;
use hypergate_core::writer::MEDIA_TYPE_JSON;
use hypergate_core::writer::MEDIA_TYPE_JSON_LD;

use super::FormatError;
use super::FormatSet;
use super::SUPPORTED_MEDIA_TYPES;
use super::media_ranges;
use crate::format::Format;
use crate::hal::HalFormat;
use crate::plain_json::PlainJsonFormat;

// ============================================================================
// SECTION: Media Ranges
// ============================================================================

/// Ranges sort by weight, keep header order on ties, and drop `q=0`.
#[test]
fn media_ranges_sort_by_weight() {
    let ranges = media_ranges("text/html;q=0.2, Application/HAL+JSON, application/json;q=0.9, image/png;q=0");
    assert_eq!(ranges, vec!["application/hal+json", "application/json", "text/html"]);
}

/// Parameters other than `q` are ignored.
#[test]
fn media_ranges_ignore_other_parameters() {
    let ranges = media_ranges("application/json; charset=utf-8, ,application/ld+json;level=1;q=0.5");
    assert_eq!(ranges, vec!["application/json", "application/ld+json"]);
}

// ============================================================================
// SECTION: Negotiation
// ============================================================================

/// Missing headers and wildcards select the default format.
#[test]
fn wildcards_select_default() {
    let formats = FormatSet::from_media_types(&SUPPORTED_MEDIA_TYPES, MEDIA_TYPE_HAL).unwrap();
    assert_eq!(formats.negotiate(None).unwrap().media_type(), MEDIA_TYPE_HAL);
    assert_eq!(formats.negotiate(Some("  ")).unwrap().media_type(), MEDIA_TYPE_HAL);
    assert_eq!(formats.negotiate(Some("*/*")).unwrap().media_type(), MEDIA_TYPE_HAL);
    assert_eq!(formats.negotiate(Some("application/*")).unwrap().media_type(), MEDIA_TYPE_HAL);
}

/// Exact ranges beat a lower-weighted wildcard.
#[test]
fn exact_range_beats_weighted_wildcard() {
    let formats = FormatSet::standard();
    let chosen = formats.negotiate(Some("*/*;q=0.1, application/ld+json")).unwrap();
    assert_eq!(chosen.media_type(), MEDIA_TYPE_JSON_LD);
}

/// Disabled formats are not acceptable even when named.
#[test]
fn disabled_formats_are_not_acceptable() {
    let formats = FormatSet::from_media_types(&[MEDIA_TYPE_JSON], MEDIA_TYPE_JSON).unwrap();
    let err = formats.negotiate(Some("application/hal+json, text/html")).err().unwrap();
    assert_eq!(
        err,
        FormatError::NotAcceptable {
            accept: "application/hal+json, text/html".to_string(),
        }
    );
    assert_eq!(formats.media_types().collect::<Vec<_>>(), vec![MEDIA_TYPE_JSON]);
}

// ============================================================================
// SECTION: Construction
// ============================================================================

/// Invalid format sets are rejected.
#[test]
fn construction_rejects_invalid_sets() {
    assert_eq!(FormatSet::new(Vec::new(), MEDIA_TYPE_JSON).err(), Some(FormatError::Empty));

    let repeated: Vec<Arc<dyn Format>> = vec![Arc::new(HalFormat), Arc::new(HalFormat)];
    assert_eq!(
        FormatSet::new(repeated, MEDIA_TYPE_HAL).err(),
        Some(FormatError::Duplicate(MEDIA_TYPE_HAL.to_string()))
    );

    let single: Vec<Arc<dyn Format>> = vec![Arc::new(PlainJsonFormat)];
    assert_eq!(
        FormatSet::new(single, MEDIA_TYPE_HAL).err(),
        Some(FormatError::DefaultNotEnabled(MEDIA_TYPE_HAL.to_string()))
    );

    assert_eq!(
        FormatSet::from_media_types(&["text/html"], MEDIA_TYPE_JSON).err(),
        Some(FormatError::UnsupportedMediaType("text/html".to_string()))
    );
}

// crates/hypergate-formats/src/negotiation.rs
// ============================================================================
// Module: Media Type Negotiation
// Description: Enabled format set and `Accept` header matching.
// Purpose: Pick exactly one format per request or refuse the request.
// Dependencies: hypergate-core, thiserror
// ============================================================================

//! ## Overview
//! [`FormatSet`] holds the enabled formats and a default. Negotiation walks
//! the `Accept` media ranges by descending `q` weight (ties keep header
//! order). Exact media types match their format; `*/*` and `application/*`
//! match the default. Ranges with `q=0` never match. A missing or blank
//! header selects the default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use hypergate_core::parse_quality;
use hypergate_core::writer::MEDIA_TYPE_HAL;
use hypergate_core::writer::MEDIA_TYPE_JSON;
use hypergate_core::writer::MEDIA_TYPE_JSON_LD;
use thiserror::Error;

use crate::format::Format;
use crate::hal::HalFormat;
use crate::json_ld::JsonLdFormat;
use crate::plain_json::PlainJsonFormat;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Media types with a built-in format, in preference order.
pub const SUPPORTED_MEDIA_TYPES: [&str; 3] = [MEDIA_TYPE_JSON, MEDIA_TYPE_HAL, MEDIA_TYPE_JSON_LD];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Format set construction and negotiation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// No built-in format produces the media type.
    #[error("unsupported media type `{0}`")]
    UnsupportedMediaType(String),
    /// The set would contain no formats.
    #[error("at least one format must be enabled")]
    Empty,
    /// Two formats produce the same media type.
    #[error("media type `{0}` is enabled twice")]
    Duplicate(String),
    /// The default media type is not among the enabled formats.
    #[error("default media type `{0}` is not enabled")]
    DefaultNotEnabled(String),
    /// No enabled format satisfies the `Accept` header.
    #[error("no enabled format satisfies `{accept}`")]
    NotAcceptable {
        /// Raw `Accept` header.
        accept: String,
    },
}

// ============================================================================
// SECTION: Format Set
// ============================================================================

/// Enabled formats with a default.
///
/// # Invariants
/// - At least one format; media types are unique.
/// - `default` is one of `formats`.
#[derive(Clone)]
pub struct FormatSet {
    /// Enabled formats in preference order.
    formats: Vec<Arc<dyn Format>>,
    /// Format used when the caller accepts anything.
    default: Arc<dyn Format>,
}

impl FormatSet {
    /// Returns all built-in formats with plain JSON as the default.
    #[must_use]
    pub fn standard() -> Self {
        let default: Arc<dyn Format> = Arc::new(PlainJsonFormat);
        Self {
            formats: vec![Arc::clone(&default), Arc::new(HalFormat), Arc::new(JsonLdFormat::new())],
            default,
        }
    }

    /// Returns the built-in format producing `media_type`.
    #[must_use]
    pub fn builtin(media_type: &str) -> Option<Arc<dyn Format>> {
        let media_type = media_type.trim();
        if media_type.eq_ignore_ascii_case(MEDIA_TYPE_JSON) {
            Some(Arc::new(PlainJsonFormat))
        } else if media_type.eq_ignore_ascii_case(MEDIA_TYPE_HAL) {
            Some(Arc::new(HalFormat))
        } else if media_type.eq_ignore_ascii_case(MEDIA_TYPE_JSON_LD) {
            Some(Arc::new(JsonLdFormat::new()))
        } else {
            None
        }
    }

    /// Builds a set from formats and the default media type.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when `formats` is empty, repeats a media type,
    /// or does not contain the default.
    pub fn new(formats: Vec<Arc<dyn Format>>, default_media_type: &str) -> Result<Self, FormatError> {
        if formats.is_empty() {
            return Err(FormatError::Empty);
        }
        let mut seen = BTreeSet::new();
        for format in &formats {
            if !seen.insert(format.media_type().to_ascii_lowercase()) {
                return Err(FormatError::Duplicate(format.media_type().to_string()));
            }
        }
        let default = formats
            .iter()
            .find(|format| format.media_type().eq_ignore_ascii_case(default_media_type.trim()))
            .map(Arc::clone)
            .ok_or_else(|| FormatError::DefaultNotEnabled(default_media_type.to_string()))?;
        Ok(Self {
            formats,
            default,
        })
    }

    /// Builds a set of built-in formats from media type names.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnsupportedMediaType`] for unknown names and
    /// the errors of [`FormatSet::new`].
    pub fn from_media_types(
        enabled: &[impl AsRef<str>],
        default_media_type: &str,
    ) -> Result<Self, FormatError> {
        let formats = enabled
            .iter()
            .map(|media_type| {
                let media_type = media_type.as_ref();
                Self::builtin(media_type)
                    .ok_or_else(|| FormatError::UnsupportedMediaType(media_type.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(formats, default_media_type)
    }

    /// Returns the default format.
    #[must_use]
    pub fn default_format(&self) -> Arc<dyn Format> {
        Arc::clone(&self.default)
    }

    /// Returns the enabled format producing `media_type`.
    #[must_use]
    pub fn get(&self, media_type: &str) -> Option<Arc<dyn Format>> {
        self.formats
            .iter()
            .find(|format| format.media_type().eq_ignore_ascii_case(media_type))
            .map(Arc::clone)
    }

    /// Returns the enabled media types in preference order.
    pub fn media_types(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(|format| format.media_type())
    }

    /// Selects the format for an `Accept` header.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::NotAcceptable`] when no enabled format matches
    /// any acceptable media range.
    pub fn negotiate(&self, accept: Option<&str>) -> Result<Arc<dyn Format>, FormatError> {
        let Some(header) = accept.map(str::trim).filter(|header| !header.is_empty()) else {
            return Ok(self.default_format());
        };
        for range in media_ranges(header) {
            if range == "*/*" || range == "application/*" {
                return Ok(self.default_format());
            }
            if let Some(format) = self.get(&range) {
                return Ok(format);
            }
        }
        Err(FormatError::NotAcceptable {
            accept: header.to_string(),
        })
    }
}

/// Parses media ranges by descending weight, dropping `q=0` entries.
fn media_ranges(header: &str) -> Vec<String> {
    let mut weighted: Vec<(u16, usize, String)> = header
        .split(',')
        .enumerate()
        .filter_map(|(position, part)| {
            let mut pieces = part.split(';');
            let range = pieces.next()?.trim().to_ascii_lowercase();
            if range.is_empty() {
                return None;
            }
            let weight =
                pieces.find_map(|piece| piece.trim().strip_prefix("q=")).map_or(1000, parse_quality);
            (weight > 0).then_some((weight, position, range))
        })
        .collect();
    weighted.sort_by(|left, right| right.0.cmp(&left.0).then(left.1.cmp(&right.1)));
    weighted.into_iter().map(|(_, _, range)| range).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;

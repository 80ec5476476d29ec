// crates/hypergate-core/src/core/field.rs
// ============================================================================
// Module: Field Kinds and Values
// Description: Closed set of field kinds and extracted field values.
// Purpose: Share field vocabulary between representors, forms, and writers.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Every field a representor or form declares has a [`FieldKind`]. Values
//! pulled out of a model by an extractor are carried as [`FieldValue`] until a
//! writer hands them to a message mapper. Dates stay typed here and are only
//! rendered to RFC 3339 at the writer boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Field Kind
// ============================================================================

/// Kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain string.
    String,
    /// List of strings.
    StringList,
    /// Boolean.
    Boolean,
    /// List of booleans.
    BooleanList,
    /// JSON number.
    Number,
    /// List of JSON numbers.
    NumberList,
    /// Timestamp rendered as RFC 3339.
    Date,
    /// List of timestamps.
    DateList,
    /// Binary content addressed by a sub-URL.
    Binary,
    /// String resolved against the caller's language preferences.
    LocalizedString,
    /// Static link.
    Link,
    /// Link to (or embedding of) another model.
    LinkedModel,
    /// Link to a related collection.
    RelatedCollection,
    /// Inline child model described by its own representor.
    Nested,
}

impl FieldKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::StringList => "string_list",
            Self::Boolean => "boolean",
            Self::BooleanList => "boolean_list",
            Self::Number => "number",
            Self::NumberList => "number_list",
            Self::Date => "date",
            Self::DateList => "date_list",
            Self::Binary => "binary",
            Self::LocalizedString => "localized_string",
            Self::Link => "link",
            Self::LinkedModel => "linked_model",
            Self::RelatedCollection => "related_collection",
            Self::Nested => "nested",
        }
    }

    /// Returns true for kinds that render as a plain property value.
    #[must_use]
    pub const fn is_property(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::StringList
                | Self::Boolean
                | Self::BooleanList
                | Self::Number
                | Self::NumberList
                | Self::Date
                | Self::DateList
                | Self::LocalizedString
        )
    }
}

// ============================================================================
// SECTION: Field Value
// ============================================================================

/// Value extracted from a model for one property field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// String value (plain or already localized).
    String(String),
    /// List of strings.
    StringList(Vec<String>),
    /// Boolean value.
    Boolean(bool),
    /// List of booleans.
    BooleanList(Vec<bool>),
    /// Number value.
    Number(Number),
    /// List of numbers.
    NumberList(Vec<Number>),
    /// Timestamp value.
    Date(OffsetDateTime),
    /// List of timestamps.
    DateList(Vec<OffsetDateTime>),
}

impl FieldValue {
    /// Returns the field kind carried by this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::StringList(_) => FieldKind::StringList,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::BooleanList(_) => FieldKind::BooleanList,
            Self::Number(_) => FieldKind::Number,
            Self::NumberList(_) => FieldKind::NumberList,
            Self::Date(_) => FieldKind::Date,
            Self::DateList(_) => FieldKind::DateList,
        }
    }
}

/// Formats a timestamp as RFC 3339.
///
/// # Errors
///
/// Returns [`FieldError::Extraction`] when the timestamp cannot be formatted
/// (for example a year outside the RFC 3339 range).
pub fn format_date(field: &str, value: OffsetDateTime) -> Result<String, FieldError> {
    value.format(&Rfc3339).map_err(|err| FieldError::Extraction {
        field: field.to_string(),
        message: err.to_string(),
    })
}

/// Parses an RFC 3339 timestamp.
#[must_use]
pub fn parse_date(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

// ============================================================================
// SECTION: Field Descriptor
// ============================================================================

/// Descriptor for one declared field, used by documentation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
    /// Target resource type for relation kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Field extraction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The model passed to a representor is not of its declared type.
    #[error("model is not a `{expected}`")]
    TypeMismatch {
        /// Expected model type name.
        expected: String,
    },
    /// An extractor failed for one field.
    #[error("field `{field}` extraction failed: {message}")]
    Extraction {
        /// Field name.
        field: String,
        /// Failure description.
        message: String,
    },
}

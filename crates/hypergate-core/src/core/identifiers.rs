// crates/hypergate-core/src/core/identifiers.rs
// ============================================================================
// Module: Hypergate Identifiers
// Description: Model identifiers, identifier type tags, and resource paths.
// Purpose: Provide strongly typed identifiers with stable path forms.
// Dependencies: percent-encoding, serde, thiserror
// ============================================================================

//! ## Overview
//! An [`Identifier`] is the value a representor extracts from a model to
//! address it. Identifiers travel through URLs as [`Path`] values
//! (`{resource}/{id}`); the mapping between the two is owned by a
//! [`crate::interfaces::PathMapper`]. [`IdentifierType`] tags let relations
//! name their target without naming its resource. Path segments are
//! percent-encoded on their way into URLs and decoded on their way back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Segment Encoding
// ============================================================================

/// Bytes escaped inside a single URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encodes `raw` for use as one URL path segment.
#[must_use]
pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// Decodes a percent-encoded URL path segment.
///
/// Invalid UTF-8 after decoding is replaced with U+FFFD.
#[must_use]
pub fn decode_segment(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

// ============================================================================
// SECTION: Identifier
// ============================================================================

/// Identifier extracted from a domain model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Integer identifier.
    Integer(i64),
    /// Opaque text identifier.
    Text(String),
}

impl Identifier {
    /// Returns the kind of this identifier.
    #[must_use]
    pub const fn kind(&self) -> IdentifierKind {
        match self {
            Self::Integer(_) => IdentifierKind::Integer,
            Self::Text(_) => IdentifierKind::Text,
        }
    }

    /// Parses a raw path segment as an identifier of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidIdentifier`] when the segment does not
    /// parse as the requested kind or is empty.
    pub fn parse(kind: IdentifierKind, raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::InvalidIdentifier {
                raw: raw.to_string(),
                kind,
            });
        }
        match kind {
            IdentifierKind::Integer => raw.parse::<i64>().map(Self::Integer).map_err(|_| {
                PathError::InvalidIdentifier {
                    raw: raw.to_string(),
                    kind,
                }
            }),
            IdentifierKind::Text => Ok(Self::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => value.fmt(f),
            Self::Text(value) => value.fmt(f),
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Wire kind of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Signed 64-bit integer.
    Integer,
    /// Opaque UTF-8 text.
    Text,
}

impl IdentifierKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }
}

// ============================================================================
// SECTION: Identifier Type
// ============================================================================

/// Tag naming the identifier type a relation points at.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierType(String);

impl IdentifierType {
    /// Creates a new identifier type tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for IdentifierType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for IdentifierType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Path
// ============================================================================

/// URL path form of an addressed item: `{name}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Path {
    /// Resource name segment.
    name: String,
    /// Raw id segment.
    id: String,
}

impl Path {
    /// Creates a new path.
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// Returns the resource name segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw id segment.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns `name/id` with both segments percent-encoded.
    #[must_use]
    pub fn as_uri(&self) -> String {
        format!("{}/{}", encode_segment(&self.name), encode_segment(&self.id))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.id)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Path mapping errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// No mapping exists for the resource name.
    #[error("no path mapping for resource `{0}`")]
    UnknownResource(String),
    /// The id segment does not parse as the mapped identifier kind.
    #[error("invalid {} identifier `{raw}`", kind.as_str())]
    InvalidIdentifier {
        /// Raw id segment.
        raw: String,
        /// Expected identifier kind.
        kind: IdentifierKind,
    },
    /// The identifier kind does not match the mapping.
    #[error("identifier kind mismatch for resource `{resource}`")]
    KindMismatch {
        /// Resource name.
        resource: String,
    },
}

// crates/hypergate-core/src/writer/path.rs
// ============================================================================
// Module: Field Paths
// Description: Position of the model currently being written.
// Purpose: Let mappers address embedded and nested models distinctly.
// Dependencies: smallvec
// ============================================================================

//! ## Overview
//! A [`FieldPath`] records how the writer reached the current model from the
//! document root: through embedded relations or inline nested models. Its
//! dotted form (`author.publisher`) is also the syntax of embed selections.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use smallvec::SmallVec;

// ============================================================================
// SECTION: Field Path
// ============================================================================

/// One step from a parent model to a child model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Linked model embedded under relation `name`.
    Embedded(String),
    /// Inline nested model under field `name`.
    Nested(String),
}

impl PathSegment {
    /// Returns the field or relation name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Embedded(name) | Self::Nested(name) => name,
        }
    }
}

/// Path from the document root to the current model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(SmallVec<[PathSegment; 4]>);

impl FieldPath {
    /// Returns the root path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true at the document root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the child path through embedded relation `name`.
    #[must_use]
    pub fn embedded(&self, name: &str) -> Self {
        self.child(PathSegment::Embedded(name.to_string()))
    }

    /// Returns the child path through nested field `name`.
    #[must_use]
    pub fn nested(&self, name: &str) -> Self {
        self.child(PathSegment::Nested(name.to_string()))
    }

    /// Returns the segments from the root.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns the dotted path of field `name` below this path.
    #[must_use]
    pub fn dotted(&self, name: &str) -> String {
        if self.is_root() { name.to_string() } else { format!("{self}.{name}") }
    }

    /// Appends one segment.
    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.name())?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Embed Selection
// ============================================================================

/// Dotted relation paths selected for embedding.
///
/// # Invariants
/// - Selecting `a.b` does not imply `a`; each level must be listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedSelection(BTreeSet<String>);

impl EmbeddedSelection {
    /// Returns an empty selection (nothing embedded).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a selection from dotted paths.
    #[must_use]
    pub fn of(paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(paths.into_iter().map(Into::into).filter(|path: &String| !path.is_empty()).collect())
    }

    /// Parses comma-separated dotted paths.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::of(raw.split(',').map(str::trim))
    }

    /// Returns true when the dotted path is selected.
    #[must_use]
    pub fn contains(&self, dotted: &str) -> bool {
        self.0.contains(dotted)
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

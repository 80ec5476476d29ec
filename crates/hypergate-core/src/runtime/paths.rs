// crates/hypergate-core/src/runtime/paths.rs
// ============================================================================
// Module: Static Path Mapper
// Description: In-memory identifier/path mapping per resource.
// Purpose: Build relation URLs and parse item ids from request paths.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`StaticPathMapper`] records, for each resource, the identifier type its
//! models carry and the identifier kind used in item paths. Integer
//! identifiers render in decimal and text identifiers verbatim, so
//! `path_to_identifier(identifier_to_path(r, id))` returns `id` for every
//! identifier whose kind matches the mapping.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::Identifier;
use crate::core::IdentifierKind;
use crate::core::IdentifierType;
use crate::core::Path;
use crate::core::PathError;
use crate::interfaces::PathMapper;

// ============================================================================
// SECTION: Mapper
// ============================================================================

/// Mapping entry for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResourceMapping {
    /// Identifier type carried by the resource's models.
    identifier_type: Option<IdentifierType>,
    /// Identifier kind used in item paths.
    kind: IdentifierKind,
}

/// In-memory path mapper.
#[derive(Debug, Clone, Default)]
pub struct StaticPathMapper {
    /// Mappings keyed by resource name.
    resources: BTreeMap<String, ResourceMapping>,
}

impl StaticPathMapper {
    /// Creates an empty mapper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy mapping `resource_name` to `kind` identifiers of
    /// `identifier_type`.
    #[must_use]
    pub fn with_resource(
        mut self,
        resource_name: impl Into<String>,
        identifier_type: Option<IdentifierType>,
        kind: IdentifierKind,
    ) -> Self {
        self.insert(resource_name, identifier_type, kind);
        self
    }

    /// Adds or replaces the mapping for `resource_name`.
    pub fn insert(
        &mut self,
        resource_name: impl Into<String>,
        identifier_type: Option<IdentifierType>,
        kind: IdentifierKind,
    ) {
        self.resources.insert(resource_name.into(), ResourceMapping {
            identifier_type,
            kind,
        });
    }
}

impl PathMapper for StaticPathMapper {
    fn identifier_to_path(&self, resource_name: &str, identifier: &Identifier) -> Option<Path> {
        let mapping = self.resources.get(resource_name)?;
        if identifier.kind() != mapping.kind {
            return None;
        }
        let raw = identifier.to_string();
        Identifier::parse(mapping.kind, &raw).ok()?;
        Some(Path::new(resource_name, raw))
    }

    fn path_to_identifier(&self, path: &Path) -> Result<Identifier, PathError> {
        let mapping = self
            .resources
            .get(path.name())
            .ok_or_else(|| PathError::UnknownResource(path.name().to_string()))?;
        Identifier::parse(mapping.kind, path.id())
    }

    fn resource_for_identifier_type(&self, identifier_type: &IdentifierType) -> Option<String> {
        self.resources
            .iter()
            .find(|(_, mapping)| mapping.identifier_type.as_ref() == Some(identifier_type))
            .map(|(name, _)| name.clone())
    }

    fn identifier_kind(&self, resource_name: &str) -> Option<IdentifierKind> {
        self.resources.get(resource_name).map(|mapping| mapping.kind)
    }
}

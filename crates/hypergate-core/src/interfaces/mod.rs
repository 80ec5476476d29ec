// crates/hypergate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Hypergate Interfaces
// Description: Collaborator contracts consumed by resolution and writing.
// Purpose: Keep transport, discovery, and storage concerns outside the core.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The core never decodes requests, discovers routers, or loads models on its
//! own. Those concerns are supplied through the traits in this module:
//! parameter providers, path mappers, representor lookups, relation indexes,
//! embedded-model sources, and resource routers. Implementations must be
//! safe to share across concurrent requests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

use crate::core::ActionSemantics;
use crate::core::AnyRepresentor;
use crate::core::BuilderError;
use crate::core::Identifier;
use crate::core::IdentifierKind;
use crate::core::IdentifierType;
use crate::core::ParamError;
use crate::core::ParamType;
use crate::core::ParamValue;
use crate::core::Path;
use crate::core::PathError;
use crate::core::Resource;

pub use crate::core::RelationIndex;

// ============================================================================
// SECTION: Parameter Provider
// ============================================================================

/// Supplies declared parameter values from an opaque request context.
pub trait ParamProvider {
    /// Resolves one declared parameter for an action bound to `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] when the value is missing or cannot be decoded.
    fn provide(&self, param: &ParamType, resource: &Resource) -> Result<ParamValue, ParamError>;
}

// ============================================================================
// SECTION: Path Mapping
// ============================================================================

/// Maps identifiers to URL paths and back.
///
/// # Invariants
/// - `path_to_identifier(identifier_to_path(r, id)?) == id` for every
///   identifier the mapping supports.
pub trait PathMapper: Send + Sync {
    /// Returns the path of `identifier` within `resource_name`.
    fn identifier_to_path(&self, resource_name: &str, identifier: &Identifier) -> Option<Path>;

    /// Parses a path back into an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when the resource is unknown or the id segment
    /// does not parse.
    fn path_to_identifier(&self, path: &Path) -> Result<Identifier, PathError>;

    /// Returns the resource name whose models carry `identifier_type`.
    fn resource_for_identifier_type(&self, identifier_type: &IdentifierType) -> Option<String>;

    /// Returns the identifier kind used by `resource_name`.
    fn identifier_kind(&self, resource_name: &str) -> Option<IdentifierKind>;
}

// ============================================================================
// SECTION: Representor Lookup
// ============================================================================

/// Looks up representors by resource name.
pub trait RepresentorLookup: Send + Sync {
    /// Returns the representor for `resource_name`.
    fn representor(&self, resource_name: &str) -> Option<Arc<dyn AnyRepresentor>>;

    /// Returns every resource name with a representor, sorted.
    fn resource_names(&self) -> Vec<String>;
}

// ============================================================================
// SECTION: Embedded Source
// ============================================================================

/// Embedded model fetch errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbeddedError {
    /// The source failed to load the model.
    #[error("embedded fetch for `{resource}/{identifier}` failed: {message}")]
    Fetch {
        /// Resource name.
        resource: String,
        /// Identifier of the requested model.
        identifier: String,
        /// Failure description.
        message: String,
    },
}

/// Loads linked models selected for embedding.
pub trait EmbeddedSource: Send + Sync {
    /// Fetches the model `identifier` of `resource_name`.
    ///
    /// Returns `Ok(None)` when the model does not exist; the writer then keeps
    /// the relation as a link.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddedError`] when loading fails.
    fn fetch(
        &self,
        resource_name: &str,
        identifier: &Identifier,
    ) -> Result<Option<Arc<dyn Any + Send + Sync>>, EmbeddedError>;
}

/// Embedded source that never embeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmbedding;

impl EmbeddedSource for NoEmbedding {
    fn fetch(
        &self,
        _resource_name: &str,
        _identifier: &Identifier,
    ) -> Result<Option<Arc<dyn Any + Send + Sync>>, EmbeddedError> {
        Ok(None)
    }
}

// ============================================================================
// SECTION: Resource Router
// ============================================================================

/// Declares the actions and representor of one resource.
///
/// Routers are registered explicitly; nothing is discovered reflectively.
pub trait ResourceRouter: Send + Sync {
    /// Returns the resource name the router serves.
    fn resource_name(&self) -> &str;

    /// Returns the identifier kind used in item paths.
    fn identifier_kind(&self) -> IdentifierKind {
        IdentifierKind::Integer
    }

    /// Builds the representor for the resource's models.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError`] when the representor declaration is invalid.
    fn representor(
        &self,
        relations: &Arc<dyn RelationIndex>,
    ) -> Result<Option<Arc<dyn AnyRepresentor>>, BuilderError> {
        let _ = relations;
        Ok(None)
    }

    /// Builds the resource's actions.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError`] when an action declaration is invalid.
    fn actions(&self) -> Result<Vec<ActionSemantics>, BuilderError>;
}

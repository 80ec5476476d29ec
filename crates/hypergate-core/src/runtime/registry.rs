// crates/hypergate-core/src/runtime/registry.rs
// ============================================================================
// Module: Action Registry
// Description: Registration and positional resolution of action semantics.
// Purpose: Map (method, path segments) to exactly one action or an error.
// Dependencies: crate::core, crate::interfaces, thiserror
// ============================================================================

//! ## Overview
//! The registry indexes action semantics by [`RouteShape`] and resolves a
//! request by segment position:
//!
//! | Segments | Candidates |
//! |----------|------------|
//! | `[name]` | standard actions on `Paged(name)` |
//! | `[name, x]` | custom action `x` on `Paged(name)` if declared, else standard actions on `Item(name)` with id `x` |
//! | `[name, id, x]` | standard actions on the nested collection `x` if declared, else custom action `x` on `Item(name)` |
//!
//! Candidates are then filtered by method. An empty result with non-empty
//! candidates is `NotAllowed`; empty candidates are `NotFound`.
//!
//! Route conflicts are rejected at registration so resolution never has to
//! pick between two matches. The registry is read-only once published.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use crate::core::ActionSemantics;
use crate::core::BuilderError;
use crate::core::Item;
use crate::core::Method;
use crate::core::Resource;
use crate::core::RouteShape;
use crate::interfaces::ResourceRouter;
use crate::runtime::action::Action;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest number of path segments the address algebra can produce.
pub const MAX_SEGMENTS: usize = 3;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An action with the same resource and name already exists.
    #[error("duplicate action `{name}` on `{resource}`")]
    DuplicateAction {
        /// Resource key.
        resource: String,
        /// Action name.
        name: String,
    },
    /// Two actions would answer the same request.
    #[error("ambiguous route {shape} {method} `{route}` between `{existing}` and `{incoming}`")]
    AmbiguousRoute {
        /// Route shape.
        shape: String,
        /// Method.
        method: String,
        /// Route name (`-` for method-dispatched actions).
        route: String,
        /// Key of the registered action.
        existing: String,
        /// Key of the rejected action.
        incoming: String,
    },
    /// A custom action was declared where no path segment can carry its name.
    #[error("custom action `{name}` on `{resource}` cannot be routed")]
    UnroutableAction {
        /// Resource key.
        resource: String,
        /// Action name.
        name: String,
    },
    /// A router failed to build its actions.
    #[error(transparent)]
    Builder(#[from] BuilderError),
}

/// Resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No resource or action matches the path.
    #[error("no action matches `/{path}`")]
    NotFound {
        /// Joined request path.
        path: String,
    },
    /// The path matches but not for this method.
    #[error("method not allowed; allowed: {}", join(allowed))]
    NotAllowed {
        /// Methods the matching actions support.
        allowed: BTreeSet<String>,
    },
    /// More than one action matches; registration should prevent this.
    #[error("ambiguous match between {}", actions.join(", "))]
    Ambiguous {
        /// Keys of the matching actions.
        actions: Vec<String>,
    },
}

/// Joins a method set for display.
fn join(methods: &BTreeSet<String>) -> String {
    methods.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Immutable-after-build index of action semantics.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    /// Actions grouped by route shape, in registration order.
    by_shape: BTreeMap<RouteShape, Vec<Arc<ActionSemantics>>>,
    /// Registered (resource key, name) pairs.
    keys: BTreeSet<(String, String)>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from the actions of every router.
    ///
    /// # Errors
    ///
    /// Returns the first builder or registration failure.
    pub fn from_routers(routers: &[Arc<dyn ResourceRouter>]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for router in routers {
            for semantics in router.actions()? {
                registry.register(semantics)?;
            }
        }
        Ok(registry)
    }

    /// Registers one action.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateAction`] for a repeated
    /// `(resource, name)` pair, [`RegistryError::UnroutableAction`] for
    /// custom actions on nested collections, and
    /// [`RegistryError::AmbiguousRoute`] when another action already answers
    /// the same request.
    pub fn register(&mut self, semantics: ActionSemantics) -> Result<(), RegistryError> {
        let resource_key = semantics.resource().key();
        if self.keys.contains(&(resource_key.clone(), semantics.name().to_string())) {
            return Err(RegistryError::DuplicateAction {
                resource: resource_key,
                name: semantics.name().to_string(),
            });
        }
        let shape = semantics.resource().shape();
        if !semantics.is_standard() && matches!(shape, RouteShape::NestedCollection { .. }) {
            return Err(RegistryError::UnroutableAction {
                resource: resource_key,
                name: semantics.name().to_string(),
            });
        }
        self.check_route(&shape, &semantics)?;
        self.keys.insert((resource_key, semantics.name().to_string()));
        self.by_shape.entry(shape).or_default().push(Arc::new(semantics));
        Ok(())
    }

    /// Resolves a method and path segments to a bound action.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] when no shape matches,
    /// [`ResolveError::NotAllowed`] when the shape matches but the method does
    /// not, and [`ResolveError::Ambiguous`] if more than one action matches.
    pub fn resolve<S: AsRef<str>>(&self, method: &str, segments: &[S]) -> Result<Action, ResolveError> {
        let segments: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
        let not_found = || ResolveError::NotFound {
            path: segments.join("/"),
        };
        if segments.is_empty()
            || segments.len() > MAX_SEGMENTS
            || segments.iter().any(|segment| segment.is_empty())
        {
            return Err(not_found());
        }
        let candidates = self.candidates(&segments);
        if candidates.is_empty() {
            return Err(not_found());
        }
        let method = Method::new(method);
        let matching: Vec<&Arc<ActionSemantics>> =
            candidates.iter().filter(|semantics| *semantics.method() == method).copied().collect();
        match matching.as_slice() {
            [semantics] => Ok(Action::new(Arc::clone(semantics), bind(semantics.resource(), &segments))),
            [] => Err(ResolveError::NotAllowed {
                allowed: candidates
                    .iter()
                    .map(|semantics| semantics.method().as_str().to_string())
                    .collect(),
            }),
            many => Err(ResolveError::Ambiguous {
                actions: many.iter().map(|semantics| semantics.key()).collect(),
            }),
        }
    }

    /// Returns the actions registered for `shape`.
    #[must_use]
    pub fn actions_for(&self, shape: &RouteShape) -> &[Arc<ActionSemantics>] {
        self.by_shape.get(shape).map_or(&[], Vec::as_slice)
    }

    /// Returns the methods registered on `shape` for method-dispatched
    /// actions.
    #[must_use]
    pub fn allowed_methods(&self, shape: &RouteShape) -> BTreeSet<String> {
        self.actions_for(shape)
            .iter()
            .filter(|semantics| semantics.is_standard())
            .map(|semantics| semantics.method().as_str().to_string())
            .collect()
    }

    /// Finds the action whose form has id `form_id`.
    #[must_use]
    pub fn find_form(&self, form_id: &str) -> Option<&Arc<ActionSemantics>> {
        self.iter()
            .find(|semantics| semantics.form().is_some_and(|form| form.descriptor().id == form_id))
    }

    /// Iterates all actions grouped by shape.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ActionSemantics>> {
        self.by_shape.values().flatten()
    }

    /// Returns the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when no action is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Rejects an action that would answer the same request as an existing
    /// one.
    fn check_route(&self, shape: &RouteShape, incoming: &ActionSemantics) -> Result<(), RegistryError> {
        if let Some(existing) = self.actions_for(shape).iter().find(|existing| {
            existing.method() == incoming.method() && route_name(existing) == route_name(incoming)
        }) {
            return Err(ambiguous(shape, incoming, existing));
        }
        match shape {
            RouteShape::Item(parent) if !incoming.is_standard() => {
                let nested = RouteShape::NestedCollection {
                    parent: parent.clone(),
                    name: incoming.name().to_string(),
                };
                if let Some(existing) = self.actions_for(&nested).first() {
                    return Err(ambiguous(shape, incoming, existing));
                }
            }
            RouteShape::NestedCollection {
                parent,
                name,
            } => {
                let item = RouteShape::Item(parent.clone());
                if let Some(existing) = self
                    .actions_for(&item)
                    .iter()
                    .find(|existing| !existing.is_standard() && existing.name() == name.as_str())
                {
                    return Err(ambiguous(shape, incoming, existing));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Collects the method-agnostic candidates for a segment list.
    fn candidates(&self, segments: &[&str]) -> Vec<&Arc<ActionSemantics>> {
        match *segments {
            [name] => self.standard(&RouteShape::Collection(name.to_string())),
            [name, second] => {
                let custom = self.custom(&RouteShape::Collection(name.to_string()), second);
                if custom.is_empty() {
                    self.standard(&RouteShape::Item(name.to_string()))
                } else {
                    custom
                }
            }
            [parent, _, third] => {
                let nested = RouteShape::NestedCollection {
                    parent: parent.to_string(),
                    name: third.to_string(),
                };
                if self.by_shape.contains_key(&nested) {
                    self.standard(&nested)
                } else {
                    self.custom(&RouteShape::Item(parent.to_string()), third)
                }
            }
            _ => Vec::new(),
        }
    }

    /// Returns the method-dispatched actions on `shape`.
    fn standard(&self, shape: &RouteShape) -> Vec<&Arc<ActionSemantics>> {
        self.actions_for(shape).iter().filter(|semantics| semantics.is_standard()).collect()
    }

    /// Returns the custom actions named `name` on `shape`.
    fn custom(&self, shape: &RouteShape, name: &str) -> Vec<&Arc<ActionSemantics>> {
        self.actions_for(shape)
            .iter()
            .filter(|semantics| !semantics.is_standard() && semantics.name() == name)
            .collect()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the path segment that selects an action, if any.
fn route_name(semantics: &ActionSemantics) -> Option<&str> {
    (!semantics.is_standard()).then(|| semantics.name())
}

/// Builds an ambiguous-route error.
fn ambiguous(shape: &RouteShape, incoming: &ActionSemantics, existing: &ActionSemantics) -> RegistryError {
    RegistryError::AmbiguousRoute {
        shape: shape.to_string(),
        method: incoming.method().to_string(),
        route: route_name(incoming).unwrap_or("-").to_string(),
        existing: existing.key(),
        incoming: incoming.key(),
    }
}

/// Binds the ids found in `segments` into the declared address.
fn bind(declared: &Resource, segments: &[&str]) -> Resource {
    match (declared, segments) {
        (Resource::Item(item), [_, id, ..]) => Resource::Item(item.bind(*id)),
        (
            Resource::Nested {
                parent,
                name,
            },
            [_, id, _],
        ) => Resource::nested(parent.bind(*id), name.clone()),
        (
            Resource::GenericParent {
                parent_name,
                name,
            },
            [_, id, _],
        ) => Resource::nested(Item::with_id(parent_name.clone(), *id), name.clone()),
        _ => declared.clone(),
    }
}

// crates/hypergate-core/src/core/resource.rs
// ============================================================================
// Module: Resource Addresses
// Description: Closed algebra of resource addresses (paged, item, nested).
// Purpose: Identify what an action acts on with structural equality.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Resource`] names the thing an action operates on: a paged collection,
//! a single item, a collection nested under a parent item, or a collection
//! declared against a parent *type* that is not yet bound to an id.
//!
//! Invariants:
//! - Equality and hashing are structural over the variant and every component.
//! - [`Resource::key`] is stable and unique per address; it is used for
//!   registry indexing and log output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

// ============================================================================
// SECTION: Item
// ============================================================================

/// A single resource instance, optionally bound to an id.
///
/// # Invariants
/// - `id` is `None` until a concrete instance is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Item {
    /// Resource type name.
    name: String,
    /// Raw path id when bound.
    id: Option<String>,
}

impl Item {
    /// Creates an unbound item address.
    #[must_use]
    pub fn of(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    /// Creates an item address bound to an id.
    #[must_use]
    pub fn with_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: Some(id.into()),
        }
    }

    /// Returns the resource type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bound id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns a copy of this item bound to `id`.
    #[must_use]
    pub fn bind(&self, id: impl Into<String>) -> Self {
        Self::with_id(self.name.clone(), id)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}/{id}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

// ============================================================================
// SECTION: Resource
// ============================================================================

/// Address of the resource an action operates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    /// A collection identified only by its type name.
    Paged {
        /// Collection type name.
        name: String,
    },
    /// A single resource instance.
    Item(Item),
    /// A collection scoped under a specific parent item.
    Nested {
        /// Parent item; callers check whether it carries an id.
        parent: Item,
        /// Nested collection type name.
        name: String,
    },
    /// A nested collection declared against a parent type.
    GenericParent {
        /// Parent type name.
        parent_name: String,
        /// Nested collection type name.
        name: String,
    },
}

impl Resource {
    /// Builds a paged collection address.
    #[must_use]
    pub fn paged(name: impl Into<String>) -> Self {
        Self::Paged {
            name: name.into(),
        }
    }

    /// Builds an unbound item address.
    #[must_use]
    pub fn item(name: impl Into<String>) -> Self {
        Self::Item(Item::of(name))
    }

    /// Builds an item address bound to `id`.
    #[must_use]
    pub fn item_with_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Item(Item::with_id(name, id))
    }

    /// Builds a nested collection address under `parent`.
    #[must_use]
    pub fn nested(parent: Item, name: impl Into<String>) -> Self {
        Self::Nested {
            parent,
            name: name.into(),
        }
    }

    /// Builds a nested collection address declared against a parent type.
    #[must_use]
    pub fn generic_parent(parent_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::GenericParent {
            parent_name: parent_name.into(),
            name: name.into(),
        }
    }

    /// Returns the type name of the addressed resource.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Paged {
                name,
            }
            | Self::Nested {
                name, ..
            }
            | Self::GenericParent {
                name, ..
            } => name,
            Self::Item(item) => item.name(),
        }
    }

    /// Returns the item id when this is a bound item address.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Item(item) => item.id(),
            _ => None,
        }
    }

    /// Returns the parent type name for nested addresses.
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        match self {
            Self::Nested {
                parent, ..
            } => Some(parent.name()),
            Self::GenericParent {
                parent_name, ..
            } => Some(parent_name),
            _ => None,
        }
    }

    /// Returns the parent id for nested addresses bound to a parent instance.
    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Self::Nested {
                parent, ..
            } => parent.id(),
            _ => None,
        }
    }

    /// Returns the routing shape this address occupies.
    #[must_use]
    pub fn shape(&self) -> RouteShape {
        match self {
            Self::Paged {
                name,
            } => RouteShape::Collection(name.clone()),
            Self::Item(item) => RouteShape::Item(item.name().to_string()),
            Self::Nested {
                parent,
                name,
            } => RouteShape::NestedCollection {
                parent: parent.name().to_string(),
                name: name.clone(),
            },
            Self::GenericParent {
                parent_name,
                name,
            } => RouteShape::NestedCollection {
                parent: parent_name.clone(),
                name: name.clone(),
            },
        }
    }

    /// Returns the stable string key for this address.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paged {
                name,
            } => write!(f, "paged:{name}"),
            Self::Item(item) => write!(f, "item:{item}"),
            Self::Nested {
                parent,
                name,
            } => write!(f, "nested:{parent}/{name}"),
            Self::GenericParent {
                parent_name,
                name,
            } => write!(f, "generic:{parent_name}/{name}"),
        }
    }
}

// ============================================================================
// SECTION: Route Shape
// ============================================================================

/// Positional routing shape shared by every address of the same form.
///
/// # Invariants
/// - [`Resource::Nested`] and [`Resource::GenericParent`] with the same parent
///   and name occupy the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RouteShape {
    /// `/{name}`
    Collection(String),
    /// `/{name}/{id}`
    Item(String),
    /// `/{parent}/{id}/{name}`
    NestedCollection {
        /// Parent type name.
        parent: String,
        /// Nested collection name.
        name: String,
    },
}

impl fmt::Display for RouteShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection(name) => write!(f, "/{name}"),
            Self::Item(name) => write!(f, "/{name}/{{id}}"),
            Self::NestedCollection {
                parent,
                name,
            } => write!(f, "/{parent}/{{id}}/{name}"),
        }
    }
}

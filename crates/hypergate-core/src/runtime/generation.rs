// crates/hypergate-core/src/runtime/generation.rs
// ============================================================================
// Module: Deployment Generations
// Description: Immutable registry/representor snapshots with atomic swap.
// Purpose: Serve concurrent requests from one published, read-only snapshot.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! A [`Generation`] bundles everything request handling reads: the action
//! registry, the representor set, the path mapper, and the relation index
//! they were built against. Generations are built off to the side and
//! published through a [`GenerationHandle`]; readers take an
//! `Arc<Generation>` snapshot and never observe a partially built one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::core::RelationIndex;
use crate::interfaces::RepresentorLookup;
use crate::interfaces::ResourceRouter;
use crate::runtime::paths::StaticPathMapper;
use crate::runtime::registry::ActionRegistry;
use crate::runtime::registry::RegistryError;
use crate::runtime::relations::InMemoryRelationIndex;
use crate::runtime::representors::RepresentorSet;

// ============================================================================
// SECTION: Generation
// ============================================================================

/// One immutable deployment snapshot.
pub struct Generation {
    /// Monotonic generation number.
    number: u64,
    /// Action registry.
    registry: ActionRegistry,
    /// Representors by resource name.
    representors: RepresentorSet,
    /// Identifier/path mapping.
    paths: StaticPathMapper,
    /// Relation index shared by the representors.
    relations: Arc<dyn RelationIndex>,
}

impl Generation {
    /// Assembles a generation from prebuilt parts.
    #[must_use]
    pub fn new(
        number: u64,
        registry: ActionRegistry,
        representors: RepresentorSet,
        paths: StaticPathMapper,
        relations: Arc<dyn RelationIndex>,
    ) -> Self {
        Self {
            number,
            registry,
            representors,
            paths,
            relations,
        }
    }

    /// Builds a generation from the union of all routers.
    ///
    /// Representors are built first so bidirectional relations are indexed
    /// before any document is written.
    ///
    /// # Errors
    ///
    /// Returns the first representor, builder, or registration failure.
    pub fn from_routers(
        number: u64,
        routers: &[Arc<dyn ResourceRouter>],
    ) -> Result<Self, RegistryError> {
        let relations: Arc<dyn RelationIndex> = Arc::new(InMemoryRelationIndex::new());
        let representors = RepresentorSet::from_routers(routers, &relations)?;
        let mut paths = StaticPathMapper::new();
        for router in routers {
            let identifier_type = representors
                .representor(router.resource_name())
                .and_then(|representor| representor.identifier_type().cloned());
            paths.insert(router.resource_name(), identifier_type, router.identifier_kind());
        }
        let registry = ActionRegistry::from_routers(routers)?;
        Ok(Self {
            number,
            registry,
            representors,
            paths,
            relations,
        })
    }

    /// Returns the generation number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Returns the action registry.
    #[must_use]
    pub const fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Returns the representor set.
    #[must_use]
    pub const fn representors(&self) -> &RepresentorSet {
        &self.representors
    }

    /// Returns the path mapper.
    #[must_use]
    pub const fn paths(&self) -> &StaticPathMapper {
        &self.paths
    }

    /// Returns the relation index.
    #[must_use]
    pub const fn relations(&self) -> &Arc<dyn RelationIndex> {
        &self.relations
    }
}

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Publication point for the current generation.
pub struct GenerationHandle {
    /// Current generation.
    current: RwLock<Arc<Generation>>,
}

impl GenerationHandle {
    /// Creates a handle publishing `initial`.
    #[must_use]
    pub fn new(initial: Generation) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Returns a snapshot of the current generation.
    #[must_use]
    pub fn current(&self) -> Arc<Generation> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Publishes `next` and returns the generation it replaced.
    ///
    /// In-flight readers keep their snapshot until they drop it.
    pub fn publish(&self, next: Generation) -> Arc<Generation> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(next))
    }

    /// Returns the number the next generation should carry.
    #[must_use]
    pub fn next_number(&self) -> u64 {
        self.current().number().saturating_add(1)
    }
}

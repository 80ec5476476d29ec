// crates/hypergate-core/src/runtime/representors.rs
// ============================================================================
// Module: Representor Set and Cache
// Description: Representor lookup by resource name and compute-once caching.
// Purpose: Supply writers with representors without rebuilding them.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`RepresentorSet`] is the immutable per-generation lookup writers use.
//! [`RepresentorCache`] serves registries that build representors lazily: for
//! a given `(model type, resource name)` key the build closure runs at most
//! once, and every concurrent caller observes the same completed result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::TypeId;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::PoisonError;

use crate::core::AnyRepresentor;
use crate::core::BuilderError;
use crate::core::RelationIndex;
use crate::interfaces::RepresentorLookup;
use crate::interfaces::ResourceRouter;

// ============================================================================
// SECTION: Representor Set
// ============================================================================

/// Immutable representor lookup keyed by resource name.
#[derive(Clone, Default)]
pub struct RepresentorSet {
    /// Representors by resource name.
    representors: BTreeMap<String, Arc<dyn AnyRepresentor>>,
}

impl RepresentorSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `representor` registered for `resource_name`.
    #[must_use]
    pub fn with(
        mut self,
        resource_name: impl Into<String>,
        representor: impl AnyRepresentor + 'static,
    ) -> Self {
        self.insert(resource_name, Arc::new(representor));
        self
    }

    /// Registers `representor` for `resource_name`, replacing any previous one.
    pub fn insert(&mut self, resource_name: impl Into<String>, representor: Arc<dyn AnyRepresentor>) {
        self.representors.insert(resource_name.into(), representor);
    }

    /// Builds the representors of every router against a shared relation
    /// index.
    ///
    /// # Errors
    ///
    /// Returns the first representor declaration error.
    pub fn from_routers(
        routers: &[Arc<dyn ResourceRouter>],
        relations: &Arc<dyn RelationIndex>,
    ) -> Result<Self, BuilderError> {
        let mut set = Self::new();
        for router in routers {
            if let Some(representor) = router.representor(relations)? {
                set.insert(router.resource_name(), representor);
            }
        }
        Ok(set)
    }

    /// Returns the number of representors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.representors.len()
    }

    /// Returns true when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.representors.is_empty()
    }
}

impl RepresentorLookup for RepresentorSet {
    fn representor(&self, resource_name: &str) -> Option<Arc<dyn AnyRepresentor>> {
        self.representors.get(resource_name).cloned()
    }

    fn resource_names(&self) -> Vec<String> {
        self.representors.keys().cloned().collect()
    }
}

// ============================================================================
// SECTION: Representor Cache
// ============================================================================

/// Result cached per key.
type CachedRepresentor = Result<Arc<dyn AnyRepresentor>, BuilderError>;

/// Compute-once cache of lazily built representors.
#[derive(Default)]
pub struct RepresentorCache {
    /// One cell per `(model type, resource name)`.
    cells: Mutex<BTreeMap<(TypeId, String), Arc<OnceLock<CachedRepresentor>>>>,
}

impl RepresentorCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached representor for model type `T` and `resource_name`,
    /// running `build` if no result exists yet.
    ///
    /// Concurrent first callers block on the same cell; `build` runs once.
    ///
    /// # Errors
    ///
    /// Returns the cached [`BuilderError`] when the build failed.
    pub fn get_or_build<T: 'static>(
        &self,
        resource_name: &str,
        build: impl FnOnce() -> CachedRepresentor,
    ) -> CachedRepresentor {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry((TypeId::of::<T>(), resource_name.to_string())).or_default())
        };
        cell.get_or_init(build).clone()
    }

    /// Returns the number of keys seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true when no key has been requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

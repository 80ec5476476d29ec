// crates/hypergate-core/src/runtime/relations.rs
// ============================================================================
// Module: In-Memory Relation Index
// Description: Shared index of inverse relations between representors.
// Purpose: Let bidirectional relations be discovered from both sides.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`InMemoryRelationIndex`] is filled while the representors of one
//! generation are built and read while documents are written. Registration
//! is idempotent per `(owner, relation name)`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::IdentifierType;
use crate::core::RelatedCollection;
use crate::core::RelationIndex;

// ============================================================================
// SECTION: Index
// ============================================================================

/// Mutex-guarded relation index.
#[derive(Debug, Default)]
pub struct InMemoryRelationIndex {
    /// Relations per owner type, in registration order.
    relations: Mutex<BTreeMap<IdentifierType, Vec<RelatedCollection>>>,
}

impl InMemoryRelationIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the map, recovering from poisoning since entries are append-only.
    fn guard(&self) -> MutexGuard<'_, BTreeMap<IdentifierType, Vec<RelatedCollection>>> {
        self.relations.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl RelationIndex for InMemoryRelationIndex {
    fn register(&self, owner: &IdentifierType, relation: RelatedCollection) {
        let mut relations = self.guard();
        let entries = relations.entry(owner.clone()).or_default();
        if !entries.iter().any(|existing| existing.name == relation.name) {
            entries.push(relation);
        }
    }

    fn related_collections(&self, owner: &IdentifierType) -> Vec<RelatedCollection> {
        self.guard().get(owner).cloned().unwrap_or_default()
    }
}

//! Existence provider contract
//!
//! Relation and asset fields only prove that referenced ids exist within the
//! current space (and match kind constraints). Lookups are batched: one call
//! per field, never one per element.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::errors::CollaboratorResult;

/// Tenant space all lookups are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpaceId(pub i64);

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Concrete collection identity resolved from a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectionId(pub i64);

/// What a batch of ids must refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTarget<'a> {
    /// Entries of one collection
    Entry { collection: CollectionId },
    /// Assets; an empty `kinds` accepts any kind
    Asset { kinds: &'a [String] },
}

/// Answers existence questions for references.
pub trait ExistenceProvider {
    /// Resolves a collection handle within `space`.
    fn resolve_collection(&self, space: SpaceId, handle: &str) -> CollaboratorResult<Option<CollectionId>>;

    /// Returns the subset of `ids` that exist in `space` and match `target`.
    fn existing(&self, space: SpaceId, target: ReferenceTarget<'_>, ids: &[i64]) -> CollaboratorResult<HashSet<i64>>;

    /// Single-id convenience over [`ExistenceProvider::existing`].
    fn exists(&self, space: SpaceId, target: ReferenceTarget<'_>, id: i64) -> CollaboratorResult<bool> {
        Ok(self.existing(space, target, &[id])?.contains(&id))
    }
}

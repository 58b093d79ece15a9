//! In-memory reference catalog
//!
//! An [`ExistenceProvider`] over fixed collections, entries and assets.
//! Backs the CLI (`--references`) and tests. Counts lookups so callers can
//! check that existence queries are batched per field.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::errors::{CollaboratorError, CollaboratorResult};
use super::existence::{CollectionId, ExistenceProvider, ReferenceTarget, SpaceId};

/// Serialized catalog: `{"spaces": [{"id", "collections", "assets"}]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub spaces: Vec<SpaceFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceFixture {
    pub id: i64,
    #[serde(default)]
    pub collections: Vec<CollectionFixture>,
    #[serde(default)]
    pub assets: Vec<AssetFixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFixture {
    pub id: i64,
    pub handle: String,
    #[serde(default)]
    pub entries: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetFixture {
    pub id: i64,
    pub kind: String,
}

/// Existence lookups against in-memory data.
#[derive(Debug, Default)]
pub struct ReferenceCatalog {
    collections: HashMap<(SpaceId, String), CollectionId>,
    entries: HashMap<CollectionId, HashSet<i64>>,
    assets: HashMap<(SpaceId, i64), String>,
    queries: AtomicUsize,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, space: SpaceId, handle: &str, id: CollectionId) -> Self {
        self.collections.insert((space, handle.to_string()), id);
        self.entries.entry(id).or_default();
        self
    }

    pub fn with_entries(mut self, collection: CollectionId, ids: &[i64]) -> Self {
        self.entries.entry(collection).or_default().extend(ids);
        self
    }

    pub fn with_asset(mut self, space: SpaceId, id: i64, kind: &str) -> Self {
        self.assets.insert((space, id), kind.to_string());
        self
    }

    pub fn from_file(file: CatalogFile) -> Self {
        let mut catalog = Self::new();
        for space in file.spaces {
            let space_id = SpaceId(space.id);
            for collection in space.collections {
                let id = CollectionId(collection.id);
                catalog = catalog
                    .with_collection(space_id, &collection.handle, id)
                    .with_entries(id, &collection.entries);
            }
            for asset in space.assets {
                catalog = catalog.with_asset(space_id, asset.id, &asset.kind);
            }
        }
        catalog
    }

    /// Loads a catalog from a JSON file
    pub fn load(path: &Path) -> CollaboratorResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CollaboratorError::Existence(format!("failed to read '{}': {}", path.display(), e))
        })?;
        let file: CatalogFile = serde_json::from_str(&content)
            .map_err(|e| CollaboratorError::Existence(format!("invalid catalog JSON: {}", e)))?;
        Ok(Self::from_file(file))
    }

    /// Number of `existing` calls served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl ExistenceProvider for ReferenceCatalog {
    fn resolve_collection(&self, space: SpaceId, handle: &str) -> CollaboratorResult<Option<CollectionId>> {
        Ok(self.collections.get(&(space, handle.to_string())).copied())
    }

    fn existing(&self, space: SpaceId, target: ReferenceTarget<'_>, ids: &[i64]) -> CollaboratorResult<HashSet<i64>> {
        self.queries.fetch_add(1, Ordering::Relaxed);

        let found = match target {
            ReferenceTarget::Entry { collection } => {
                // Collection ids are only reachable through a space-scoped resolve.
                let in_space = self.collections.iter().any(|((s, _), c)| *s == space && *c == collection);
                match self.entries.get(&collection) {
                    Some(known) if in_space => ids.iter().copied().filter(|id| known.contains(id)).collect(),
                    _ => HashSet::new(),
                }
            }
            ReferenceTarget::Asset { kinds } => ids
                .iter()
                .copied()
                .filter(|id| match self.assets.get(&(space, *id)) {
                    Some(kind) => kinds.is_empty() || kinds.iter().any(|k| k == kind),
                    None => false,
                })
                .collect(),
        };

        Ok(found)
    }
}

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use pinboard_types::{Entry, EntryId};
use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::EntryStore;

/// In-memory, HashMap-based entry store.
///
/// Intended for tests and embedding. All entries are held in memory behind a
/// `RwLock` for safe concurrent access. Entries are cloned on read.
pub struct InMemoryEntryStore {
    entries: RwLock<HashMap<EntryId, Entry>>,
    published: RwLock<HashSet<EntryId>>,
}

impl InMemoryEntryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            published: RwLock::new(HashSet::new()),
        }
    }

    /// Number of entries currently committed.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove all entries and published marks.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
        self.published.write().expect("lock poisoned").clear();
    }

    /// Return a sorted list of all committed entry ids.
    pub fn all_ids(&self) -> Vec<EntryId> {
        let map = self.entries.read().expect("lock poisoned");
        let mut ids: Vec<EntryId> = map.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for InMemoryEntryStore {
    fn commit(&self, entry_type: &str, payload: Value) -> StoreResult<EntryId> {
        let entry = Entry::new(entry_type, payload);
        let id = entry.id()?;
        let mut map = self.entries.write().expect("lock poisoned");
        // Idempotent: content-addressing guarantees the same id always maps
        // to the same content, so a second commit is a no-op.
        map.entry(id.clone()).or_insert(entry);
        debug!(id = %id.short(), entry_type, "committed entry");
        Ok(id)
    }

    fn put(&self, id: &EntryId) -> StoreResult<()> {
        let known = self
            .entries
            .read()
            .expect("lock poisoned")
            .contains_key(id);
        if !known {
            return Err(StoreError::UnknownEntry(id.clone()));
        }
        self.published
            .write()
            .expect("lock poisoned")
            .insert(id.clone());
        debug!(id = %id.short(), "published entry");
        Ok(())
    }

    fn get(&self, id: &EntryId) -> StoreResult<Entry> {
        let map = self.entries.read().expect("lock poisoned");
        map.get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn exists(&self, id: &EntryId) -> StoreResult<bool> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }

    fn is_published(&self, id: &EntryId) -> StoreResult<bool> {
        let set = self.published.read().expect("lock poisoned");
        Ok(set.contains(id))
    }
}

impl std::fmt::Debug for InMemoryEntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEntryStore")
            .field("entry_count", &self.len())
            .finish()
    }
}

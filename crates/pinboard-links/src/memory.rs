use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use pinboard_store::{EntryStore, StoreError};
use pinboard_types::{Entry, EntryId};
use tracing::debug;

use crate::error::{LinkError, LinkResult};
use crate::traits::LinkIndex;
use crate::types::Link;

/// In-memory link index.
///
/// Links are kept as insertion-ordered `Vec`s keyed by `(base, tag)` behind
/// a `RwLock`; appends take the write lock, so concurrent attaches under the
/// same key serialize instead of losing updates. The index holds a handle to
/// the content store for base checks and target loading but never mutates it.
pub struct InMemoryLinkIndex {
    links: RwLock<HashMap<(EntryId, String), Vec<EntryId>>>,
    store: Arc<dyn EntryStore>,
}

impl InMemoryLinkIndex {
    /// Create a new empty index backed by the given store.
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// Total number of links across all `(base, tag)` keys.
    pub fn len(&self) -> usize {
        self.links
            .read()
            .expect("lock poisoned")
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns `true` if no links are recorded.
    pub fn is_empty(&self) -> bool {
        self.links.read().expect("lock poisoned").is_empty()
    }

    /// Snapshot of every recorded link. Order is stable within a
    /// `(base, tag)` key, unspecified across keys.
    pub fn all_links(&self) -> Vec<Link> {
        let map = self.links.read().expect("lock poisoned");
        map.iter()
            .flat_map(|((base, tag), targets)| {
                targets
                    .iter()
                    .map(|t| Link::new(base.clone(), t.clone(), tag.clone()))
            })
            .collect()
    }
}

impl LinkIndex for InMemoryLinkIndex {
    fn attach(&self, base: &EntryId, target: EntryId, tag: &str) -> LinkResult<()> {
        let base_known = self
            .store
            .exists(base)
            .map_err(|e| LinkError::Unresolvable(e.to_string()))?;
        if !base_known {
            return Err(LinkError::UnknownBase(base.clone()));
        }

        let mut map = self.links.write().expect("lock poisoned");
        map.entry((base.clone(), tag.to_string()))
            .or_default()
            .push(target.clone());
        debug!(base = %base.short(), target = %target.short(), tag, "attached link");
        Ok(())
    }

    fn query(&self, base: &EntryId, tag: &str) -> LinkResult<Vec<EntryId>> {
        let map = self.links.read().expect("lock poisoned");
        Ok(map
            .get(&(base.clone(), tag.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn query_loaded(&self, base: &EntryId, tag: &str) -> LinkResult<Vec<(EntryId, Entry)>> {
        let targets = self.query(base, tag)?;
        let mut loaded = Vec::with_capacity(targets.len());
        for target in targets {
            let entry = self.store.get(&target).map_err(|e| match e {
                StoreError::NotFound(id) => {
                    LinkError::Unresolvable(format!("link target {id} has no entry"))
                }
                other => LinkError::Unresolvable(other.to_string()),
            })?;
            loaded.push((target, entry));
        }
        Ok(loaded)
    }
}

impl std::fmt::Debug for InMemoryLinkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLinkIndex")
            .field("link_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinboard_store::InMemoryEntryStore;
    use serde_json::json;

    fn fixture() -> (Arc<InMemoryEntryStore>, InMemoryLinkIndex, EntryId) {
        let store = Arc::new(InMemoryEntryStore::new());
        let base = store.commit("space", json!({"name": "general"})).unwrap();
        let index = InMemoryLinkIndex::new(Arc::clone(&store) as Arc<dyn EntryStore>);
        (store, index, base)
    }

    // -----------------------------------------------------------------------
    // Attach / query
    // -----------------------------------------------------------------------

    #[test]
    fn attach_and_query_preserves_order() {
        let (store, index, base) = fixture();
        let t1 = store.commit("post", json!({"n": 1})).unwrap();
        let t2 = store.commit("post", json!({"n": 2})).unwrap();

        index.attach(&base, t1.clone(), "post").unwrap();
        index.attach(&base, t2.clone(), "post").unwrap();

        let targets = index.query(&base, "post").unwrap();
        assert_eq!(targets, vec![t1, t2]);
    }

    #[test]
    fn query_with_no_links_is_empty_not_an_error() {
        let (_store, index, base) = fixture();
        let targets = index.query(&base, "post").unwrap();
        assert!(targets.is_empty());

        let loaded = index.query_loaded(&base, "post").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn tags_partition_links_under_one_base() {
        let (store, index, base) = fixture();
        let t1 = store.commit("post", json!({"n": 1})).unwrap();
        let t2 = store.commit("post", json!({"n": 2})).unwrap();

        index.attach(&base, t1.clone(), "post").unwrap();
        index.attach(&base, t2.clone(), "posts").unwrap();

        assert_eq!(index.query(&base, "post").unwrap(), vec![t1]);
        assert_eq!(index.query(&base, "posts").unwrap(), vec![t2]);
    }

    #[test]
    fn duplicate_triples_are_kept() {
        let (store, index, base) = fixture();
        let target = store.commit("post", json!({"n": 1})).unwrap();

        index.attach(&base, target.clone(), "post").unwrap();
        index.attach(&base, target.clone(), "post").unwrap();

        let targets = index.query(&base, "post").unwrap();
        assert_eq!(targets, vec![target.clone(), target.clone()]);

        let all = index.all_links();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], Link::new(base.clone(), target.clone(), "post"));
        assert_eq!(all[0], all[1]);
    }

    #[test]
    fn attach_under_unknown_base_is_rejected() {
        let (_store, index, _base) = fixture();
        let ghost = EntryId::from_raw("never-committed");
        let err = index
            .attach(&ghost, EntryId::from_raw("target"), "post")
            .unwrap_err();
        assert!(matches!(err, LinkError::UnknownBase(_)));
    }

    #[test]
    fn dangling_targets_are_tolerated_at_attach_time() {
        let (_store, index, base) = fixture();
        // Agent ids name no entry; they must still attach cleanly.
        index
            .attach(&base, EntryId::from_raw("alice@example.com"), "posts")
            .unwrap();
        let targets = index.query(&base, "posts").unwrap();
        assert_eq!(targets[0].as_str(), "alice@example.com");
    }

    // -----------------------------------------------------------------------
    // Loaded queries
    // -----------------------------------------------------------------------

    #[test]
    fn query_loaded_pairs_targets_with_entries() {
        let (store, index, base) = fixture();
        let t1 = store.commit("post", json!({"n": 1})).unwrap();
        index.attach(&base, t1.clone(), "post").unwrap();

        let loaded = index.query_loaded(&base, "post").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, t1);
        assert_eq!(loaded[0].1.payload, json!({"n": 1}));
    }

    #[test]
    fn query_loaded_with_dangling_target_is_unresolvable() {
        let (_store, index, base) = fixture();
        index
            .attach(&base, EntryId::from_raw("dangling"), "post")
            .unwrap();

        let err = index.query_loaded(&base, "post").unwrap_err();
        assert!(matches!(err, LinkError::Unresolvable(_)));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_attaches_lose_no_links() {
        use std::thread;

        let store = Arc::new(InMemoryEntryStore::new());
        let base = store.commit("space", json!({"name": "busy"})).unwrap();
        let index = Arc::new(InMemoryLinkIndex::new(
            Arc::clone(&store) as Arc<dyn EntryStore>
        ));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let index = Arc::clone(&index);
                let base = base.clone();
                thread::spawn(move || {
                    for j in 0..16 {
                        index
                            .attach(&base, EntryId::from_raw(format!("t-{i}-{j}")), "post")
                            .unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }

        assert_eq!(index.query(&base, "post").unwrap().len(), 8 * 16);
    }
}

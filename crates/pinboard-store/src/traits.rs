use pinboard_types::{Entry, EntryId};
use serde_json::Value;

use crate::error::StoreResult;

/// Content-addressed entry store.
///
/// All implementations must satisfy these invariants:
/// - The id returned by `commit` is a pure function of
///   `(entry_type, payload)`: committing identical content twice yields the
///   same id, and never two entries.
/// - Entries are immutable once committed.
/// - `get` is read-only; `commit` and `put` are the only mutations.
/// - Concurrent reads are always safe.
pub trait EntryStore: Send + Sync {
    /// Commit an entry and return its content-derived id.
    ///
    /// Idempotent for identical content. Fails with
    /// [`StoreError::Serialization`](crate::StoreError::Serialization) if
    /// the payload cannot be canonically encoded; never fails otherwise.
    fn commit(&self, entry_type: &str, payload: Value) -> StoreResult<EntryId>;

    /// Mark a previously committed entry as published, making it visible
    /// for replication and queries by other participants.
    ///
    /// Idempotent. Fails with
    /// [`StoreError::UnknownEntry`](crate::StoreError::UnknownEntry) if the
    /// id was never committed locally.
    fn put(&self, id: &EntryId) -> StoreResult<()>;

    /// Retrieve an entry by id.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) if
    /// the entry does not exist.
    fn get(&self, id: &EntryId) -> StoreResult<Entry>;

    /// Check whether an entry exists in the store.
    fn exists(&self, id: &EntryId) -> StoreResult<bool>;

    /// Check whether an entry has been published.
    ///
    /// Returns `false` for entries that are committed but still local, and
    /// for ids the store has never seen.
    fn is_published(&self, id: &EntryId) -> StoreResult<bool>;
}

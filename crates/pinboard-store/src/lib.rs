//! Content-addressed entry storage for Pinboard.
//!
//! Every entry is immutable and identified by the domain-separated BLAKE3
//! hash of its content, assigned at commit time. The store distinguishes
//! two visibility levels, mirroring the local-chain / replicated split of
//! the surrounding system:
//!
//! - **committed** — the entry exists locally and can be read back
//! - **published** — the entry has additionally been marked visible for
//!   replication and queries by other participants
//!
//! # Design Rules
//!
//! 1. Entries are immutable once committed (content-addressing guarantees
//!    this).
//! 2. `commit` and `put` are the only mutating operations; `get` is
//!    read-only.
//! 3. Both mutations are idempotent: re-committing identical content or
//!    re-publishing an id is a no-op.
//! 4. The store never interprets payloads — it is a pure key-value store.
//! 5. All failures surface as typed [`StoreError`]s, never silently.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryEntryStore;
pub use traits::EntryStore;

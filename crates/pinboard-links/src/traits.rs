use pinboard_types::{Entry, EntryId};

use crate::error::LinkResult;

/// Index of directed, tagged links between entries.
///
/// Implementations must preserve attachment order per `(base, tag)` and must
/// tolerate concurrent appends without losing updates. No deduplication is
/// performed.
pub trait LinkIndex: Send + Sync {
    /// Record `(base, target, tag)`.
    ///
    /// Fails with [`LinkError::UnknownBase`](crate::LinkError::UnknownBase)
    /// if the base does not resolve through the content store; callers must
    /// commit the base before linking under it. Targets are not checked.
    fn attach(&self, base: &EntryId, target: EntryId, tag: &str) -> LinkResult<()>;

    /// All target ids attached under `(base, tag)`, in attachment order.
    ///
    /// Returns an empty vec (not an error) when no links exist. Targets are
    /// returned as recorded, without resolving them to entries.
    fn query(&self, base: &EntryId, tag: &str) -> LinkResult<Vec<EntryId>>;

    /// All targets under `(base, tag)`, each resolved to its entry.
    ///
    /// Returns an empty vec when no links exist. A target that does not
    /// resolve through the content store is a storage fault and surfaces as
    /// [`LinkError::Unresolvable`](crate::LinkError::Unresolvable).
    fn query_loaded(&self, base: &EntryId, tag: &str) -> LinkResult<Vec<(EntryId, Entry)>>;
}

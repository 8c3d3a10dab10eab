use pinboard_types::{Entry, EntryHeader, EntryId, Source};

use crate::error::GateError;

/// The per-application rule set evaluated by the gate.
///
/// Implementations must be pure decision functions: they may read the store
/// and link index (holding their own handles), but must never mutate either.
/// Returning `Ok(false)` is the only rejection channel; an `Err` is treated
/// by the gate as a rejection too, never as acceptance.
pub trait AppRules: Send + Sync {
    /// One-time gate evaluated when this participant joins the replication
    /// group. A participant whose rules answer `false` never participates.
    fn genesis(&self) -> Result<bool, GateError> {
        Ok(true)
    }

    /// The single shared predicate behind both commit-side and put-side
    /// validation. `sources` identifies the participant(s) presenting the
    /// entry; implementations may inspect but must not trust them.
    fn validate_entry(
        &self,
        entry_type: &str,
        entry: &Entry,
        header: &EntryHeader,
        sources: &[Source],
    ) -> Result<bool, GateError>;

    /// Gate for link mutations, local or replicated.
    fn validate_link(
        &self,
        linking_entry_type: &str,
        base: &EntryId,
        target: &EntryId,
        tag: &str,
        sources: &[Source],
    ) -> Result<bool, GateError>;
}

use pinboard_types::EntryId;
use serde::{Deserialize, Serialize};

/// A directed, tagged association from one entry to another.
///
/// Links are many-to-many: a base may carry any number of links under the
/// same tag, including exact duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The query key: links are looked up by `(base, tag)`.
    pub base: EntryId,
    /// The entry (or externally minted id) the link points at.
    pub target: EntryId,
    /// String discriminator partitioning links under the same base.
    pub tag: String,
}

impl Link {
    /// Create a new link.
    pub fn new(base: EntryId, target: EntryId, tag: impl Into<String>) -> Self {
        Self {
            base,
            target,
            tag: tag.into(),
        }
    }
}

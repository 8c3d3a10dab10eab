use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::EntryId;

/// Per-entry metadata handed to validation alongside the entry itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryHeader {
    /// The entry's declared type.
    pub entry_type: String,
    /// The entry's content-derived id.
    pub entry_id: EntryId,
    /// When the entry was committed (or received, for replicated entries).
    pub timestamp: DateTime<Utc>,
}

impl EntryHeader {
    /// Create a header stamped with the given timestamp.
    pub fn new(entry_type: impl Into<String>, entry_id: EntryId, timestamp: DateTime<Utc>) -> Self {
        Self {
            entry_type: entry_type.into(),
            entry_id,
            timestamp,
        }
    }
}

/// Opaque reference to a participant presenting an entry or link for
/// acceptance.
///
/// Validation may inspect sources but this core never interprets them; trust
/// decisions belong to the peer identity collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source(String);

impl Source {
    /// Wrap a participant identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// Domain tag prepended to every content hash. Prevents an entry's bytes
/// from colliding with hashes computed by other subsystems.
const ENTRY_DOMAIN: &str = "pinboard-entry-v1";

/// Opaque identifier for an [`Entry`].
///
/// The canonical form is the hex-encoded, domain-separated BLAKE3 hash of the
/// entry's content (see [`EntryId::for_content`]): identical content always
/// produces the same id, making entries deduplicatable and verifiable.
///
/// An `EntryId` is deliberately string-backed rather than a fixed hash
/// width: link targets may be identifiers minted outside the store (for
/// example a participant's agent id registered under the application root),
/// and those must round-trip untouched.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Compute the canonical content-derived id for `(entry_type, payload)`.
    ///
    /// The payload is encoded as canonical JSON (`serde_json` keeps object
    /// keys sorted) and hashed with domain separation, so the id is a pure
    /// function of the content.
    pub fn for_content(entry_type: &str, payload: &Value) -> Result<Self, TypeError> {
        let bytes = serde_json::to_vec(&(entry_type, payload))
            .map_err(|e| TypeError::Serialization(e.to_string()))?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(ENTRY_DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(&bytes);
        Ok(Self(hex::encode(hasher.finalize().as_bytes())))
    }

    /// Wrap a raw identifier string without hashing.
    ///
    /// Used for ids minted by collaborators outside the store (agent ids,
    /// externally computed hashes).
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short prefix for log output (up to 8 characters).
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.short())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An immutable, typed record.
///
/// Entries are owned by the content store once committed; their identity is
/// assigned at commit time and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Application-defined entry type (e.g., `"post"`).
    pub entry_type: String,
    /// Arbitrary structured payload.
    pub payload: Value,
}

impl Entry {
    /// Create a new entry.
    pub fn new(entry_type: impl Into<String>, payload: Value) -> Self {
        Self {
            entry_type: entry_type.into(),
            payload,
        }
    }

    /// The content-derived identifier for this entry.
    pub fn id(&self) -> Result<EntryId, TypeError> {
        EntryId::for_content(&self.entry_type, &self.payload)
    }
}

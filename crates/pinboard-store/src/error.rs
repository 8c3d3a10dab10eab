use pinboard_types::{EntryId, TypeError};

/// Errors from entry store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested entry was not found.
    #[error("entry not found: {0}")]
    NotFound(EntryId),

    /// Attempted to publish an id that was never committed locally.
    #[error("cannot publish unknown entry: {0}")]
    UnknownEntry(EntryId),

    /// The payload cannot be canonically encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::Serialization(msg) => Self::Serialization(msg),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

use pinboard_types::EntryId;

/// Errors from link index operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The base of a link does not resolve through the content store.
    #[error("unknown link base: {0}")]
    UnknownBase(EntryId),

    /// A storage-layer fault prevented resolving linked entries.
    ///
    /// Never returned for "no links exist" — that is an empty result.
    #[error("unresolvable link target: {0}")]
    Unresolvable(String),
}

/// Result alias for link operations.
pub type LinkResult<T> = Result<T, LinkError>;

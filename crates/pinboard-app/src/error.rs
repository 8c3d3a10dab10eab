use pinboard_links::LinkError;
use pinboard_store::StoreError;
use pinboard_types::TypeError;

/// Errors from application operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The validation gate refused the entry or link. Terminal: no retry,
    /// no partial acceptance.
    #[error("rejected by validation: {reason}")]
    Rejected { reason: String },

    /// A content store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A link index failure.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// A payload could not be encoded, or did not match its entry type's
    /// schema.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<TypeError> for AppError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::Serialization(msg) => Self::Serialization(msg),
        }
    }
}

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

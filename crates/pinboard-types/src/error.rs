/// Errors from foundation type operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// The payload cannot be canonically encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

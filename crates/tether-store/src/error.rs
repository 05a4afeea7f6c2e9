use std::path::PathBuf;

/// Errors from hook store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A category or filename is not a usable single path segment.
    #[error("invalid key {segment:?}: {reason}")]
    InvalidKey { segment: String, reason: String },

    /// The value could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A record exists but does not decode as the requested type.
    #[error("corrupt record at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

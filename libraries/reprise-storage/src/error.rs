/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend cannot be reached (quota, private mode, poisoned lock, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Serialization/deserialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

impl From<StorageError> for reprise_core::RepriseError {
    fn from(err: StorageError) -> Self {
        reprise_core::RepriseError::storage(err.to_string())
    }
}

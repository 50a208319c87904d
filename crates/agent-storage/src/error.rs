//! Error types for object storage

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors an object store can fail with
#[derive(Error, Debug)]
pub enum StorageError {
    /// The bucket does not exist
    #[error("Bucket '{0}' not found")]
    BucketNotFound(String),

    /// Bucket or object name is empty or escapes its bucket
    #[error("Invalid name '{0}'")]
    InvalidName(String),

    /// Underlying filesystem fault
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert StorageError to agent_core::Error
impl From<StorageError> for agent_core::Error {
    fn from(err: StorageError) -> Self {
        agent_core::Error::ProcessingFailed(err.to_string())
    }
}

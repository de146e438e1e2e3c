//! Persistence error types.

use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while saving or restoring a snapshot
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Snapshot could not be encoded as JSON
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Stored value is not a valid snapshot
    #[error("Deserialization of key '{key}' failed: {reason}")]
    DeserializationFailed { key: String, reason: String },

    /// Built-in reference dataset did not parse
    #[error("Default city dataset is invalid: {0}")]
    DefaultDataset(String),

    /// Storage engine failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

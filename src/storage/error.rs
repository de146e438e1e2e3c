//! Storage engine error types.

use thiserror::Error;

/// Errors raised by a [`Storage`](super::Storage) engine
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem operation failed
    #[error("Storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Engine cannot serve requests (poisoned lock, quota, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

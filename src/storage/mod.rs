//! Key-value string storage engines.
//!
//! The store treats persistence as an opaque string-to-string map. The
//! engine is injected into the provider, so tests and alternative hosts
//! can supply their own.

pub mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Opaque persistent key-value string store.
pub trait Storage {
    /// Read a value, `None` when the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, overwriting whatever was there.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

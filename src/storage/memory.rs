use super::{Storage, StorageError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory storage engine.
///
/// Clones share the same map, so a test can keep a handle and inspect
/// what a provider wrote.
///
/// # Example
///
/// ```rust
/// use city_store::storage::{MemoryStorage, Storage};
///
/// let storage = MemoryStorage::new();
/// let view = storage.clone();
///
/// storage.set_item("state", "{}").unwrap();
/// assert_eq!(view.get_item("state").unwrap().as_deref(), Some("{}"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one value.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut items = HashMap::new();
        items.insert(key.into(), value.into());
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Unavailable("memory storage lock poisoned".to_string())
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.remove(key);
        Ok(())
    }
}

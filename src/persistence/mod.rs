//! Snapshot persistence.
//!
//! Snapshots are stored as JSON strings under a single key. On mount the
//! persisted value, when present, fully supersedes the built-in default;
//! the two are never merged.

use crate::config::{CorruptSnapshotPolicy, StoreConfig};
use crate::core::{CitiesState, City};
use crate::storage::Storage;
use serde_json::Value;
use tracing::{debug, info, warn};

pub mod error;

pub use error::PersistenceError;

const DEFAULT_CITIES: &str = include_str!("../../data/cities.json");

/// Where a resolved initial snapshot came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Read from storage
    Persisted,
    /// Key was absent; built-in default used
    Default,
    /// Stored value was corrupt; built-in default used
    Recovered,
}

/// The built-in snapshot: the reference dataset, idle, nothing selected.
pub fn default_snapshot() -> Result<CitiesState, PersistenceError> {
    let cities: Vec<City> = serde_json::from_str(DEFAULT_CITIES)
        .map_err(|e| PersistenceError::DefaultDataset(e.to_string()))?;
    Ok(CitiesState::with_cities(cities))
}

/// Encode a snapshot for storage.
pub fn serialize_snapshot(state: &CitiesState) -> Result<String, PersistenceError> {
    serde_json::to_string(state).map_err(|e| PersistenceError::SerializationFailed(e.to_string()))
}

/// Decode a stored snapshot. `key` only feeds the error message.
pub fn deserialize_snapshot(key: &str, raw: &str) -> Result<CitiesState, PersistenceError> {
    serde_json::from_str(raw).map_err(|e| PersistenceError::DeserializationFailed {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Serialize a snapshot and write it under the configured key.
pub fn save<S: Storage>(
    storage: &S,
    key: &str,
    state: &CitiesState,
) -> Result<(), PersistenceError> {
    let json = serialize_snapshot(state)?;
    storage.set_item(key, &json)?;
    debug!(key, bytes = json.len(), "persistence::save: written");
    Ok(())
}

/// Pick the starting snapshot.
///
/// A persisted value is used verbatim. An absent key, or a stored blank
/// value (`null`, `false`, `0`, `""`), yields `default`. A value that fails to parse follows
/// `config.on_corrupt`.
///
/// # Example
///
/// ```rust
/// use city_store::config::StoreConfig;
/// use city_store::core::{CitiesState, City};
/// use city_store::persistence::{resolve_initial_state, save, SnapshotSource};
/// use city_store::storage::MemoryStorage;
///
/// let storage = MemoryStorage::new();
/// let config = StoreConfig::default();
/// let default = CitiesState::with_cities(vec![City::new(1)]);
///
/// let (_, source) = resolve_initial_state(&storage, &config, default.clone()).unwrap();
/// assert_eq!(source, SnapshotSource::Default);
///
/// let persisted = CitiesState::with_cities(vec![City::new(2)]);
/// save(&storage, &config.storage_key, &persisted).unwrap();
///
/// let (state, source) = resolve_initial_state(&storage, &config, default).unwrap();
/// assert_eq!(source, SnapshotSource::Persisted);
/// assert_eq!(state, persisted);
/// ```
pub fn resolve_initial_state<S: Storage>(
    storage: &S,
    config: &StoreConfig,
    default: CitiesState,
) -> Result<(CitiesState, SnapshotSource), PersistenceError> {
    let key = config.storage_key.as_str();

    let Some(raw) = storage.get_item(key)? else {
        info!(key, "persistence::resolve_initial_state: using default snapshot");
        return Ok((default, SnapshotSource::Default));
    };

    let parsed = parse_stored(key, &raw).and_then(|value| {
        if is_blank(&value) {
            return Ok(None);
        }
        serde_json::from_value::<CitiesState>(value)
            .map(Some)
            .map_err(|e| PersistenceError::DeserializationFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    });

    match parsed {
        Ok(Some(state)) => {
            info!(
                key,
                cities = state.cities.len(),
                "persistence::resolve_initial_state: using persisted snapshot"
            );
            Ok((state, SnapshotSource::Persisted))
        }
        Ok(None) => {
            info!(key, "persistence::resolve_initial_state: stored value is blank, using default snapshot");
            Ok((default, SnapshotSource::Default))
        }
        Err(e) => match config.on_corrupt {
            CorruptSnapshotPolicy::Fail => Err(e),
            CorruptSnapshotPolicy::UseDefault => {
                warn!(key, error = %e, "persistence::resolve_initial_state: corrupt snapshot, using default");
                Ok((default, SnapshotSource::Recovered))
            }
        },
    }
}

fn parse_stored(key: &str, raw: &str) -> Result<Value, PersistenceError> {
    serde_json::from_str(raw).map_err(|e| PersistenceError::DeserializationFailed {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// `null`, `false`, `0` and `""` read the same as a missing key.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

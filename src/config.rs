//! Provider configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key the browser build of the application writes its snapshot under.
pub const DEFAULT_STORAGE_KEY: &str = "state";

/// What to do when the persisted value exists but does not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptSnapshotPolicy {
    /// Refuse to mount; the caller sees the deserialization error.
    #[default]
    Fail,

    /// Log a warning and start from the built-in default.
    UseDefault,
}

/// Configuration for a [`CitiesProvider`](crate::provider::CitiesProvider).
///
/// Every field has a default, so a partial JSON document is enough.
///
/// # Example
///
/// ```rust
/// use city_store::config::{CorruptSnapshotPolicy, StoreConfig};
///
/// let config: StoreConfig =
///     serde_json::from_str(r#"{"on_corrupt": "use_default"}"#).unwrap();
///
/// assert_eq!(config.storage_key, "state");
/// assert_eq!(config.on_corrupt, CorruptSnapshotPolicy::UseDefault);
/// assert!(!config.record_history);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_key: String,
    pub on_corrupt: CorruptSnapshotPolicy,
    pub record_history: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            on_corrupt: CorruptSnapshotPolicy::default(),
            record_history: false,
        }
    }
}

impl StoreConfig {
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::new()
    }

    /// Configuration whose key is private to this store instance.
    pub fn unique() -> Self {
        Self {
            storage_key: format!("{DEFAULT_STORAGE_KEY}-{}", Uuid::new_v4()),
            ..Self::default()
        }
    }
}

/// Builder for [`StoreConfig`]
#[derive(Clone, Debug, Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit storage key
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage_key = key.into();
        self
    }

    /// Prefix the default key with a namespace: `<namespace>:state`
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.storage_key = format!("{namespace}:{DEFAULT_STORAGE_KEY}");
        self
    }

    /// Set the corrupt snapshot policy
    pub fn on_corrupt(mut self, policy: CorruptSnapshotPolicy) -> Self {
        self.config.on_corrupt = policy;
        self
    }

    /// Record every dispatched action
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.config.record_history = enabled;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}

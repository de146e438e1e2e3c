//! City Store: a pure reducer-driven state store for a list of cities.
//!
//! The crate follows a "pure core, imperative shell" split. The core is a
//! snapshot type and a pure transition function with no side effects. The
//! shell is a provider that wires the core to a key-value string store
//! and persists every change.
//!
//! # Core Concepts
//!
//! - **Snapshot**: `CitiesState`, replaced wholesale on every transition
//! - **Action**: the closed set of transitions, serialized as `{type, payload}`
//! - **Reducer**: `reduce(&state, action) -> state`, pure and total
//! - **Provider**: owns the store, persists changes, exposes `get_city`,
//!   `create_city` and `delete_city`
//!
//! # Example
//!
//! ```rust
//! use city_store::config::StoreConfig;
//! use city_store::core::{CitiesState, City, CityId};
//! use city_store::provider::CitiesProvider;
//! use city_store::storage::MemoryStorage;
//!
//! let storage = MemoryStorage::new();
//! let default = CitiesState::with_cities(vec![City::new(1), City::new(2)]);
//!
//! let mut provider =
//!     CitiesProvider::mount_with_default(storage.clone(), StoreConfig::default(), default.clone())
//!         .unwrap();
//! provider.get_city(CityId::new(1));
//! provider.delete_city(CityId::new(2));
//! drop(provider);
//!
//! // A fresh mount picks the persisted snapshot over the default.
//! let provider = CitiesProvider::mount_with_default(storage, StoreConfig::default(), default)
//!     .unwrap();
//! assert_eq!(provider.cities().len(), 1);
//! assert!(provider.current_city().is_none());
//! ```

pub mod config;
pub mod core;
pub mod persistence;
pub mod provider;
pub mod storage;

// Re-export commonly used types
pub use crate::config::StoreConfig;
pub use crate::core::{reduce, Action, CitiesState, City, CityId};
pub use crate::provider::{use_cities, CitiesContext, CitiesProvider};

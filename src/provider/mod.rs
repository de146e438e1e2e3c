//! Provider and accessor: the imperative shell around the pure core.
//!
//! The provider owns a [`Store`](crate::core::Store) and a
//! [`Storage`](crate::storage::Storage) engine, persists every change, and
//! exposes the operations UI code uses through [`CitiesContext`].

mod cities;
mod context;
pub mod error;

pub use cities::CitiesProvider;
pub use context::{use_cities, CitiesContext};
pub use error::{ContextError, ProviderError};

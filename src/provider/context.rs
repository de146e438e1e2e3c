//! The context value UI code depends on, and its guarded accessor.

use super::cities::CitiesProvider;
use super::error::ContextError;
use crate::core::{City, CityId};
use crate::storage::Storage;
use std::ops::Deref;

/// Interface over a mounted cities provider.
///
/// Components take `&impl CitiesContext` (or `&mut`) as an explicit
/// dependency, so "no provider" cannot be expressed for them at all.
pub trait CitiesContext {
    fn cities(&self) -> &[City];
    fn is_loading(&self) -> bool;
    fn current_city(&self) -> Option<&City>;
    fn error(&self) -> &str;

    fn get_city(&mut self, id: CityId);
    fn create_city(&mut self, city: City);
    fn delete_city(&mut self, id: CityId);
}

impl<S: Storage> CitiesContext for CitiesProvider<S> {
    fn cities(&self) -> &[City] {
        CitiesProvider::cities(self)
    }

    fn is_loading(&self) -> bool {
        CitiesProvider::is_loading(self)
    }

    fn current_city(&self) -> Option<&City> {
        CitiesProvider::current_city(self)
    }

    fn error(&self) -> &str {
        CitiesProvider::error(self)
    }

    fn get_city(&mut self, id: CityId) {
        CitiesProvider::get_city(self, id)
    }

    fn create_city(&mut self, city: City) {
        CitiesProvider::create_city(self, city)
    }

    fn delete_city(&mut self, id: CityId) {
        CitiesProvider::delete_city(self, id)
    }
}

/// Resolve an optional context handle, failing loudly when it is missing.
///
/// For hosts that look the provider up dynamically (a component tree, a
/// registry). Works with both `&C` and `&mut C`.
///
/// # Example
///
/// ```rust
/// use city_store::provider::{use_cities, CitiesProvider, ContextError};
/// use city_store::storage::MemoryStorage;
///
/// let missing: Option<&CitiesProvider<MemoryStorage>> = None;
/// assert_eq!(use_cities(missing).err(), Some(ContextError::OutsideProvider));
/// ```
pub fn use_cities<R>(context: Option<R>) -> Result<R, ContextError>
where
    R: Deref,
    R::Target: CitiesContext,
{
    context.ok_or(ContextError::OutsideProvider)
}

//! The cities provider: a store wired to a storage engine.

use super::error::ProviderError;
use crate::config::StoreConfig;
use crate::core::{
    violations, Action, CitiesReducer, CitiesState, City, CityId, History, Store,
};
use crate::persistence::{self, SnapshotSource};
use crate::storage::Storage;
use serde_json::Value;
use tracing::{debug, trace, warn};

type Subscriber = Box<dyn Fn(&CitiesState)>;

/// Owns the cities store for as long as the UI subtree using it lives.
///
/// Changes are detected by value: a dispatch whose resulting snapshot equals
/// the previous one (by `PartialEq`) neither notifies nor writes, even when
/// the reducer built a fresh value. A dispatch that does change the
/// snapshot commits it, notifies subscribers, and then writes the full
/// snapshot under the configured key.
///
/// A failed write never rolls back or reports the committed change, so a
/// caller cannot retry an action that already happened. The failure is
/// logged, [`has_unsaved_changes`](Self::has_unsaved_changes) turns true,
/// and the next successful write (a later change or [`flush`](Self::flush))
/// catches storage up. Dropping the provider discards the in-memory
/// snapshot; the persisted copy stays.
///
/// # Example
///
/// ```rust
/// use city_store::config::StoreConfig;
/// use city_store::core::{City, CityId};
/// use city_store::provider::CitiesProvider;
/// use city_store::storage::{MemoryStorage, Storage};
///
/// let storage = MemoryStorage::new();
/// let mut provider = CitiesProvider::mount(storage.clone(), StoreConfig::default()).unwrap();
///
/// provider.create_city(City::new(3).with_name("Porto"));
/// assert_eq!(provider.current_city().map(|c| c.id), Some(CityId::new(3)));
///
/// let saved = storage.get_item("state").unwrap().unwrap();
/// assert!(saved.contains("Porto"));
/// ```
pub struct CitiesProvider<S: Storage> {
    store: Store<CitiesReducer>,
    storage: S,
    config: StoreConfig,
    source: SnapshotSource,
    subscribers: Vec<Subscriber>,
    unsaved: bool,
}

impl<S: Storage> CitiesProvider<S> {
    /// Mount with the built-in reference dataset as the default snapshot.
    pub fn mount(storage: S, config: StoreConfig) -> Result<Self, ProviderError> {
        let default = persistence::default_snapshot()?;
        Self::mount_with_default(storage, config, default)
    }

    /// Mount with a caller-supplied default snapshot.
    ///
    /// The resolved snapshot is audited, each violation is logged, and the
    /// snapshot is written back once before the provider is returned.
    pub fn mount_with_default(
        storage: S,
        config: StoreConfig,
        default: CitiesState,
    ) -> Result<Self, ProviderError> {
        debug!(key = %config.storage_key, "CitiesProvider::mount: called");

        let (initial, source) = persistence::resolve_initial_state(&storage, &config, default)?;

        for violation in violations(&initial) {
            warn!(key = %config.storage_key, %violation, "CitiesProvider::mount: snapshot invariant broken");
        }

        persistence::save(&storage, &config.storage_key, &initial)?;

        let store = if config.record_history {
            Store::with_history(initial)
        } else {
            Store::new(initial)
        };

        Ok(Self {
            store,
            storage,
            config,
            source,
            subscribers: Vec::new(),
            unsaved: false,
        })
    }

    /// Apply an action, then notify and persist if the snapshot changed.
    pub fn dispatch(&mut self, action: Action) {
        let previous = self.store.dispatch(action);

        if previous == *self.store.state() {
            trace!("CitiesProvider::dispatch: snapshot unchanged");
            return;
        }

        for subscriber in &self.subscribers {
            subscriber(self.store.state());
        }

        self.persist();
    }

    /// Dispatch an action given by kind name and untyped payload.
    pub fn dispatch_raw(&mut self, kind: &str, payload: Value) -> Result<(), ProviderError> {
        let action = Action::from_kind(kind, payload)?;
        self.dispatch(action);
        Ok(())
    }

    /// Select a city. Does nothing if it is already the current selection.
    pub fn get_city(&mut self, id: CityId) {
        if self.store.state().current_id() == Some(id) {
            trace!(%id, "CitiesProvider::get_city: already selected");
            return;
        }
        self.dispatch(Action::CityLoaded(id));
    }

    pub fn create_city(&mut self, city: City) {
        self.dispatch(Action::CityCreated(city));
    }

    pub fn delete_city(&mut self, id: CityId) {
        self.dispatch(Action::CityDeleted(id));
    }

    /// Mark a fetch as in flight.
    pub fn mark_loading(&mut self) {
        self.dispatch(Action::Loading);
    }

    /// Replace the collection with freshly fetched cities.
    pub fn load_cities(&mut self, cities: Vec<City>) {
        self.dispatch(Action::CitiesLoaded(cities));
    }

    /// Record a failed fetch.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.dispatch(Action::Rejected(message.into()));
    }

    /// Write the current snapshot if an earlier write failed.
    ///
    /// Safe to call repeatedly: it does nothing once storage is current.
    pub fn flush(&mut self) -> Result<(), ProviderError> {
        if !self.unsaved {
            return Ok(());
        }
        persistence::save(&self.storage, &self.config.storage_key, self.store.state())?;
        self.unsaved = false;
        debug!(key = %self.config.storage_key, "CitiesProvider::flush: storage caught up");
        Ok(())
    }

    /// True when the last write failed and storage is behind the snapshot.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    fn persist(&mut self) {
        match persistence::save(&self.storage, &self.config.storage_key, self.store.state()) {
            Ok(()) => self.unsaved = false,
            Err(e) => {
                warn!(key = %self.config.storage_key, error = %e, "CitiesProvider::dispatch: write failed, snapshot kept in memory");
                self.unsaved = true;
            }
        }
    }

    /// Register a callback run with the new snapshot after every change.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&CitiesState) + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    pub fn snapshot(&self) -> &CitiesState {
        self.store.state()
    }

    pub fn cities(&self) -> &[City] {
        &self.store.state().cities
    }

    pub fn is_loading(&self) -> bool {
        self.store.state().is_loading
    }

    pub fn current_city(&self) -> Option<&City> {
        self.store.state().current_city.as_ref()
    }

    pub fn error(&self) -> &str {
        &self.store.state().error
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Where the snapshot this provider mounted with came from.
    pub fn source(&self) -> SnapshotSource {
        self.source
    }

    /// Dispatch history, when `record_history` is enabled.
    pub fn history(&self) -> Option<&History<Action>> {
        self.store.history()
    }

    /// Rebuild the current snapshot from history, when recording.
    pub fn replay(&self) -> Option<CitiesState> {
        self.store.replay()
    }

    /// Unmount, handing back the storage engine.
    pub fn unmount(self) -> S {
        debug!(key = %self.config.storage_key, "CitiesProvider::unmount: called");
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn mounted() -> (CitiesProvider<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let default = CitiesState::with_cities(vec![City::new(1), City::new(2)]);
        let provider =
            CitiesProvider::mount_with_default(storage.clone(), StoreConfig::default(), default)
                .unwrap();
        (provider, storage)
    }

    fn stored(storage: &MemoryStorage) -> CitiesState {
        let raw = storage.get_item("state").unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn mount_persists_initial_snapshot() {
        let (provider, storage) = mounted();

        assert_eq!(provider.source(), SnapshotSource::Default);
        assert_eq!(stored(&storage), *provider.snapshot());
    }

    #[test]
    fn every_change_is_persisted() {
        let (mut provider, storage) = mounted();

        provider.get_city(CityId::new(2));
        assert_eq!(stored(&storage).current_id(), Some(CityId::new(2)));

        provider.reject("network down");
        assert_eq!(stored(&storage).error, "network down");
    }

    #[test]
    fn get_city_short_circuits_on_current_selection() {
        let (mut provider, _) = mounted();
        let renders = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&renders);
        provider.subscribe(move |_| *counter.borrow_mut() += 1);

        provider.get_city(CityId::new(1));
        provider.get_city(CityId::new(1));

        assert_eq!(*renders.borrow(), 1);
    }

    #[test]
    fn get_city_short_circuit_skips_history() {
        let storage = MemoryStorage::new();
        let config = StoreConfig::builder().record_history(true).build();
        let default = CitiesState::with_cities(vec![City::new(1)]);
        let mut provider = CitiesProvider::mount_with_default(storage, config, default).unwrap();

        provider.get_city(CityId::new(1));
        provider.get_city(CityId::new(1));

        assert_eq!(provider.history().map(|h| h.len()), Some(1));
    }

    #[test]
    fn unchanged_snapshot_does_not_notify() {
        let (mut provider, _) = mounted();
        provider.mark_loading();

        let renders = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&renders);
        provider.subscribe(move |_| *counter.borrow_mut() += 1);

        provider.mark_loading();
        assert_eq!(*renders.borrow(), 0);
    }

    #[test]
    fn subscribers_see_new_snapshot() {
        let (mut provider, _) = mounted();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        provider.subscribe(move |state| sink.borrow_mut().push(state.cities.len()));

        provider.create_city(City::new(3));
        provider.delete_city(CityId::new(1));

        assert_eq!(*seen.borrow(), vec![3, 2]);
    }

    #[test]
    fn equal_snapshot_from_reducer_is_not_a_change() {
        let (mut provider, storage) = mounted();
        let renders = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&renders);
        provider.subscribe(move |_| *counter.borrow_mut() += 1);
        storage.remove_item("state").unwrap();

        // Nothing selected and id 9 absent: the reducer rebuilds an equal snapshot.
        provider.delete_city(CityId::new(9));

        assert_eq!(*renders.borrow(), 0);
        assert!(storage.get_item("state").unwrap().is_none());
    }

    #[test]
    fn flush_without_failed_write_is_a_no_op() {
        let (mut provider, storage) = mounted();
        storage.remove_item("state").unwrap();

        provider.flush().unwrap();

        assert!(storage.get_item("state").unwrap().is_none());
    }

    #[test]
    fn dispatch_raw_rejects_unknown_kind() {
        let (mut provider, storage) = mounted();
        let before = stored(&storage);

        let result = provider.dispatch_raw("city/renamed", Value::Null);

        assert!(matches!(result, Err(ProviderError::Action(_))));
        assert_eq!(stored(&storage), before);
    }

    #[test]
    fn dispatch_raw_coerces_string_ids() {
        let (mut provider, _) = mounted();

        provider
            .dispatch_raw("city/loaded", Value::String("2".to_string()))
            .unwrap();

        assert_eq!(provider.current_city().map(|c| c.id), Some(CityId::new(2)));
    }

    #[test]
    fn loading_flow_for_fetch_collaborator() {
        let (mut provider, _) = mounted();

        provider.mark_loading();
        assert!(provider.is_loading());

        provider.load_cities(vec![City::new(7)]);
        assert!(!provider.is_loading());
        assert_eq!(provider.cities(), &[City::new(7)]);
        assert_eq!(provider.error(), "");
    }

    #[test]
    fn unmount_returns_storage_with_last_snapshot() {
        let (mut provider, _) = mounted();
        provider.create_city(City::new(3));
        let snapshot = provider.snapshot().clone();

        let storage = provider.unmount();

        assert_eq!(stored(&storage), snapshot);
    }
}

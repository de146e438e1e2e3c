//! Snapshot holder driven by a [`Reducer`].

use super::history::History;
use super::reducer::Reducer;
use chrono::Utc;
use tracing::debug;

/// Holds the current snapshot and applies actions through `R::reduce`.
///
/// All mutation is serialized through [`Store::dispatch`]; every dispatch
/// replaces the snapshot as a whole.
///
/// # Example
///
/// ```rust
/// use city_store::core::{Action, CitiesReducer, CitiesState, City, Store};
///
/// let mut store: Store<CitiesReducer> =
///     Store::new(CitiesState::with_cities(vec![City::new(1)]));
///
/// store.dispatch(Action::Loading);
/// assert!(store.state().is_loading);
/// ```
pub struct Store<R: Reducer> {
    initial: R::State,
    current: R::State,
    history: Option<History<R::Action>>,
}

impl<R: Reducer> Store<R> {
    /// Create a store that does not record history.
    pub fn new(initial: R::State) -> Self {
        Self {
            current: initial.clone(),
            initial,
            history: None,
        }
    }

    /// Create a store that records every dispatched action.
    pub fn with_history(initial: R::State) -> Self {
        Self {
            history: Some(History::new()),
            ..Self::new(initial)
        }
    }

    /// Current snapshot (pure)
    pub fn state(&self) -> &R::State {
        &self.current
    }

    /// Snapshot the store started from (pure)
    pub fn initial_state(&self) -> &R::State {
        &self.initial
    }

    /// Recorded history, if recording is enabled (pure)
    pub fn history(&self) -> Option<&History<R::Action>> {
        self.history.as_ref()
    }

    /// Apply an action and return the previous snapshot.
    pub fn dispatch(&mut self, action: R::Action) -> R::State {
        debug!(kind = R::kind(&action), "Store::dispatch: called");

        if let Some(history) = &self.history {
            self.history = Some(history.record(action.clone(), Utc::now()));
        }

        let next = R::reduce(&self.current, action);
        std::mem::replace(&mut self.current, next)
    }

    /// Rebuild the current snapshot from the initial one and the history.
    ///
    /// Returns `None` when history recording is disabled.
    pub fn replay(&self) -> Option<R::State> {
        self.history.as_ref().map(|history| {
            history
                .actions()
                .fold(self.initial.clone(), |state, action| R::reduce(&state, action))
        })
    }
}

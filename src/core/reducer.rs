//! The pure transition function.
//!
//! `reduce` maps `(snapshot, action)` to a new snapshot and reads nothing
//! else, which makes every transition replayable and trivially testable.

use super::action::Action;
use super::state::CitiesState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A pure state-transition function over a snapshot type.
///
/// Implementations must be deterministic and must not mutate the input
/// snapshot; the store relies on this to replace snapshots atomically.
pub trait Reducer {
    /// Snapshot type, serializable for persistence.
    type State: Clone + PartialEq + Debug + Serialize + DeserializeOwned;

    /// Closed set of transitions.
    type Action: Clone + Debug;

    /// Produce the next snapshot.
    fn reduce(state: &Self::State, action: Self::Action) -> Self::State;

    /// Wire name of an action, used for logging.
    fn kind(action: &Self::Action) -> &'static str;
}

/// Reducer for the cities snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct CitiesReducer;

impl Reducer for CitiesReducer {
    type State = CitiesState;
    type Action = Action;

    fn reduce(state: &CitiesState, action: Action) -> CitiesState {
        reduce(state, action)
    }

    fn kind(action: &Action) -> &'static str {
        action.kind()
    }
}

/// Apply one action to a snapshot.
///
/// # Example
///
/// ```rust
/// use city_store::core::{reduce, Action, CitiesState, City, CityId};
///
/// let state = CitiesState::with_cities(vec![City::new(1), City::new(2)]);
///
/// let next = reduce(&state, Action::CityLoaded(CityId::new(1)));
/// assert_eq!(next.current_id(), Some(CityId::new(1)));
///
/// // The input is untouched.
/// assert!(state.current_city.is_none());
/// ```
pub fn reduce(state: &CitiesState, action: Action) -> CitiesState {
    match action {
        Action::Loading => CitiesState {
            is_loading: true,
            ..state.clone()
        },

        Action::CitiesLoaded(cities) => CitiesState {
            is_loading: false,
            cities,
            ..state.clone()
        },

        Action::CityLoaded(id) => CitiesState {
            is_loading: false,
            current_city: state.find(id).cloned(),
            ..state.clone()
        },

        // No dedupe: a duplicate id is appended like any other city.
        Action::CityCreated(city) => {
            let mut cities = state.cities.clone();
            cities.push(city.clone());
            CitiesState {
                is_loading: false,
                cities,
                current_city: Some(city),
                error: state.error.clone(),
            }
        }

        // Selection is cleared even when the id was not present.
        Action::CityDeleted(id) => CitiesState {
            is_loading: false,
            cities: state
                .cities
                .iter()
                .filter(|city| city.id != id)
                .cloned()
                .collect(),
            current_city: None,
            error: state.error.clone(),
        },

        Action::Rejected(message) => CitiesState {
            is_loading: false,
            error: message,
            ..state.clone()
        },
    }
}

/// Fold a sequence of actions over a starting snapshot.
pub fn replay<I>(initial: &CitiesState, actions: I) -> CitiesState
where
    I: IntoIterator<Item = Action>,
{
    actions
        .into_iter()
        .fold(initial.clone(), |state, action| reduce(&state, action))
}

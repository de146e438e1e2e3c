//! Invariant audit for snapshots.
//!
//! Persisted snapshots are used verbatim, so a value written by an older
//! build (or by another writer of the same key) may break invariants the
//! reducer would never produce on its own. The audit reports every such
//! problem at once using `Validation`, instead of stopping at the first.

use super::city::CityId;
use super::state::CitiesState;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A broken snapshot invariant.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Violation {
    #[error("City id {id} appears more than once")]
    DuplicateId { id: CityId },

    #[error("Current city {id} is not present in the city list")]
    DanglingSelection { id: CityId },

    #[error("Snapshot was stored while a load was in flight")]
    LoadingPersisted,
}

/// Check a snapshot against every invariant, accumulating ALL violations.
///
/// # Example
///
/// ```rust
/// use city_store::core::{audit, CitiesState, City};
///
/// let mut state = CitiesState::with_cities(vec![City::new(1), City::new(1)]);
/// state.current_city = Some(City::new(9));
///
/// let result = audit(&state);
/// assert!(result.is_failure());
/// ```
pub fn audit(state: &CitiesState) -> Validation<(), NonEmptyVec<Violation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<Violation>>> = Vec::new();

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for city in &state.cities {
        if !seen.insert(city.id) && reported.insert(city.id) {
            checks.push(Validation::fail(Violation::DuplicateId { id: city.id }));
        }
    }

    if let Some(id) = state.current_id() {
        let check = if state.has_dangling_selection() {
            Validation::fail(Violation::DanglingSelection { id })
        } else {
            Validation::success(())
        };
        checks.push(check);
    }

    let check = if state.is_loading {
        Validation::fail(Violation::LoadingPersisted)
    } else {
        Validation::success(())
    };
    checks.push(check);

    Validation::all_vec(checks).map(|_| ())
}

/// Flatten an audit result into a plain list, empty when clean.
pub fn violations(state: &CitiesState) -> Vec<Violation> {
    match audit(state) {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::city::City;

    #[test]
    fn clean_snapshot_passes() {
        let mut state = CitiesState::with_cities(vec![City::new(1), City::new(2)]);
        state.current_city = Some(City::new(2));

        assert!(audit(&state).is_success());
        assert!(violations(&state).is_empty());
    }

    #[test]
    fn audit_accumulates_all_violations() {
        let mut state =
            CitiesState::with_cities(vec![City::new(1), City::new(1), City::new(1), City::new(2)]);
        state.current_city = Some(City::new(5));
        state.is_loading = true;

        match audit(&state) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .any(|e| *e == Violation::DuplicateId { id: CityId::new(1) }));
                assert!(errors
                    .iter()
                    .any(|e| *e == Violation::DanglingSelection { id: CityId::new(5) }));
                assert!(errors.iter().any(|e| *e == Violation::LoadingPersisted));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn each_duplicate_id_reported_once() {
        let state = CitiesState::with_cities(vec![
            City::new(3),
            City::new(3),
            City::new(3),
            City::new(4),
            City::new(4),
        ]);

        let found = violations(&state);
        assert_eq!(
            found,
            vec![
                Violation::DuplicateId { id: CityId::new(3) },
                Violation::DuplicateId { id: CityId::new(4) },
            ]
        );
    }
}

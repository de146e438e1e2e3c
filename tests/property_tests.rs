//! Property-based tests for the transition function and persistence.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated snapshots and action sequences.

use city_store::core::{reduce, replay, Action, CitiesState, City, CityId};
use city_store::persistence::{deserialize_snapshot, serialize_snapshot};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arbitrary_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[A-Za-z0-9 ]{0,12}".prop_map(Value::from),
        prop::collection::vec("[a-z]{1,6}", 0..3).prop_map(Value::from),
    ]
}

/// A coordinate written the way some client wrote it: a number or a string.
///
/// Numbers are quarter-degrees so they survive a text round trip exactly.
fn arbitrary_coordinate(bound: i32) -> impl Strategy<Value = Value> {
    prop_oneof![
        (-bound * 4..=bound * 4).prop_map(|q| json!(q as f64 / 4.0)),
        (-bound * 100..=bound * 100).prop_map(|c| json!(format!("{:.2}", c as f64 / 100.0))),
    ]
}

fn arbitrary_date() -> impl Strategy<Value = String> {
    prop_oneof![
        (2000..2030i32, 1..=12u32, 1..=28u32, 0..24u32)
            .prop_map(|(y, m, d, h)| format!("{y:04}-{m:02}-{d:02}T{h:02}:00:00.000Z")),
        (2000..2030i32, 1..=12u32, 1..=28u32).prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
    ]
}

prop_compose! {
    fn arbitrary_city()(
        id in 0..20u64,
        name in proptest::option::of("[A-Za-z ]{1,12}"),
        country in proptest::option::of(("[A-Za-z]{3,10}", "[A-Z]{2}")),
        notes in proptest::option::of(".{0,24}"),
        date in proptest::option::of(arbitrary_date()),
        position in proptest::option::of((arbitrary_coordinate(90), arbitrary_coordinate(180))),
        extra in prop::collection::btree_map("x[a-zA-Z]{1,8}", arbitrary_leaf(), 0..3),
    ) -> City {
        let mut city = City::new(id);
        if let Some(name) = name {
            city = city.with_name(name);
        }
        if let Some((country, emoji)) = country {
            city = city.with_country(country, emoji);
        }
        if let Some(notes) = notes {
            city = city.with_notes(notes);
        }
        if let Some(date) = date {
            city = city.with_field("date", date);
        }
        if let Some((lat, lng)) = position {
            city = city.with_field("position", json!({ "lat": lat, "lng": lng }));
        }
        for (key, value) in extra {
            city = city.with_field(key, value);
        }
        city
    }
}

prop_compose! {
    fn arbitrary_state()(
        cities in prop::collection::vec(arbitrary_city(), 0..8),
        is_loading in any::<bool>(),
        current in proptest::option::of(arbitrary_city()),
        error in "[a-z ]{0,16}",
    ) -> CitiesState {
        CitiesState {
            cities,
            is_loading,
            current_city: current,
            error,
        }
    }
}

fn arbitrary_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Loading),
        prop::collection::vec(arbitrary_city(), 0..5).prop_map(Action::CitiesLoaded),
        (0..20u64).prop_map(|id| Action::CityLoaded(CityId::new(id))),
        arbitrary_city().prop_map(Action::CityCreated),
        (0..20u64).prop_map(|id| Action::CityDeleted(CityId::new(id))),
        "[a-z ]{1,16}".prop_map(Action::Rejected),
    ]
}

proptest! {
    #[test]
    fn reduce_is_deterministic(state in arbitrary_state(), action in arbitrary_action()) {
        let a = reduce(&state, action.clone());
        let b = reduce(&state, action);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn only_loading_sets_the_flag(state in arbitrary_state(), action in arbitrary_action()) {
        let next = reduce(&state, action.clone());
        prop_assert_eq!(next.is_loading, matches!(action, Action::Loading));
    }

    #[test]
    fn create_always_appends(state in arbitrary_state(), city in arbitrary_city()) {
        let next = reduce(&state, Action::CityCreated(city.clone()));

        prop_assert_eq!(next.cities.len(), state.cities.len() + 1);
        prop_assert_eq!(next.cities.last(), Some(&city));
        prop_assert_eq!(next.current_city, Some(city));
    }

    #[test]
    fn delete_removes_every_match_and_clears_selection(
        state in arbitrary_state(),
        id in 0..20u64,
    ) {
        let id = CityId::new(id);
        let next = reduce(&state, Action::CityDeleted(id));

        prop_assert!(next.cities.iter().all(|c| c.id != id));
        let kept: Vec<&City> = state.cities.iter().filter(|c| c.id != id).collect();
        prop_assert_eq!(next.cities.iter().collect::<Vec<_>>(), kept);
        prop_assert!(next.current_city.is_none());
        prop_assert!(!next.is_loading);
    }

    #[test]
    fn delete_of_absent_id_keeps_list(state in arbitrary_state()) {
        let next = reduce(&state, Action::CityDeleted(CityId::new(1000)));

        prop_assert_eq!(&next.cities, &state.cities);
        prop_assert!(next.current_city.is_none());
    }

    #[test]
    fn error_only_changes_on_rejected(state in arbitrary_state(), action in arbitrary_action()) {
        let next = reduce(&state, action.clone());
        match action {
            Action::Rejected(message) => prop_assert_eq!(next.error, message),
            _ => prop_assert_eq!(next.error, state.error),
        }
    }

    #[test]
    fn selection_comes_from_list_after_city_loaded(
        state in arbitrary_state(),
        id in 0..20u64,
    ) {
        let id = CityId::new(id);
        let next = reduce(&state, Action::CityLoaded(id));

        prop_assert_eq!(next.current_city.as_ref(), state.find(id));
    }

    #[test]
    fn replay_equals_stepwise_reduce(
        state in arbitrary_state(),
        actions in prop::collection::vec(arbitrary_action(), 0..12),
    ) {
        let mut stepwise = state.clone();
        for action in actions.clone() {
            stepwise = reduce(&stepwise, action);
        }

        prop_assert_eq!(replay(&state, actions), stepwise);
    }

    #[test]
    fn snapshot_roundtrip_serialization(state in arbitrary_state()) {
        let json = serialize_snapshot(&state).unwrap();
        let restored = deserialize_snapshot("state", &json).unwrap();
        prop_assert_eq!(restored, state);
    }

    #[test]
    fn city_fields_survive_serialization_verbatim(city in arbitrary_city()) {
        let json = serde_json::to_value(&city).unwrap();
        let restored: City = serde_json::from_value(json.clone()).unwrap();

        prop_assert_eq!(serde_json::to_value(&restored).unwrap(), json);
        prop_assert_eq!(restored.position(), city.position());
        prop_assert_eq!(restored.date(), city.date());
    }

    #[test]
    fn action_roundtrip_serialization(action in arbitrary_action()) {
        let json = serde_json::to_string(&action).unwrap();
        let restored: Action = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, action);
    }

    #[test]
    fn unknown_kinds_never_parse(kind in "[a-z/]{1,16}") {
        prop_assume!(!city_store::core::ACTION_KINDS.contains(&kind.as_str()));
        prop_assert!(Action::from_kind(&kind, Value::Null).is_err());
    }
}

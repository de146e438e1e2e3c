//! The cities snapshot: the unit of truth held by the store.

use super::city::{City, CityId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Complete state value at one point in time.
///
/// Snapshots are replaced wholesale on every transition; nothing ever
/// mutates a snapshot that an observer has already seen.
///
/// The serialized form uses camelCase field names and writes an empty
/// selection as `{}`, which keeps it interchangeable with values written
/// by the browser build of the application.
///
/// # Example
///
/// ```rust
/// use city_store::core::{CitiesState, City};
///
/// let state = CitiesState::with_cities(vec![City::new(1), City::new(2)]);
///
/// let json = serde_json::to_value(&state).unwrap();
/// assert_eq!(json["currentCity"], serde_json::json!({}));
/// assert_eq!(json["isLoading"], false);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitiesState {
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(
        default,
        serialize_with = "serialize_selection",
        deserialize_with = "deserialize_selection"
    )]
    pub current_city: Option<City>,
    #[serde(default)]
    pub error: String,
}

impl CitiesState {
    /// Snapshot with the given cities, nothing selected and no error.
    pub fn with_cities(cities: Vec<City>) -> Self {
        Self {
            cities,
            ..Self::default()
        }
    }

    /// First city whose id matches.
    pub fn find(&self, id: CityId) -> Option<&City> {
        self.cities.iter().find(|city| city.id == id)
    }

    /// Id of the current selection, if any.
    pub fn current_id(&self) -> Option<CityId> {
        self.current_city.as_ref().map(|city| city.id)
    }

    /// True when a city is selected but no longer present in `cities`.
    pub fn has_dangling_selection(&self) -> bool {
        self.current_id().is_some_and(|id| self.find(id).is_none())
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

fn serialize_selection<S: Serializer>(
    selection: &Option<City>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match selection {
        Some(city) => city.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

// `{}`, `null` and a missing field all mean "nothing selected".
fn deserialize_selection<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<City>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(None),
        Some(other) => serde_json::from_value(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

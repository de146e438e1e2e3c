//! Actions: tagged requests to transition the cities snapshot.

use super::city::{City, CityId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Every action kind the transition function understands.
pub const ACTION_KINDS: [&str; 6] = [
    "loading",
    "cities/loaded",
    "city/loaded",
    "city/created",
    "city/deleted",
    "rejected",
];

/// A request to move the store to a new snapshot.
///
/// The set of kinds is closed, so the transition function is total over
/// this type. Untyped input goes through [`Action::from_kind`] (or serde),
/// where an unrecognized kind is an [`ActionError::UnknownKind`].
///
/// Serialized form: `{"type": "<kind>", "payload": <payload>}`.
///
/// # Example
///
/// ```rust
/// use city_store::core::{Action, CityId};
///
/// let action: Action = serde_json::from_str(r#"{"type":"city/loaded","payload":"7"}"#).unwrap();
/// assert_eq!(action, Action::CityLoaded(CityId::new(7)));
///
/// let unknown = serde_json::from_str::<Action>(r#"{"type":"city/renamed"}"#);
/// assert!(unknown.is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    /// A fetch has started.
    #[serde(rename = "loading")]
    Loading,

    /// Replace the whole collection.
    #[serde(rename = "cities/loaded")]
    CitiesLoaded(Vec<City>),

    /// Select the first city with this id.
    #[serde(rename = "city/loaded")]
    CityLoaded(CityId),

    /// Append a city and select it.
    #[serde(rename = "city/created")]
    CityCreated(City),

    /// Remove every city with this id and clear the selection.
    #[serde(rename = "city/deleted")]
    CityDeleted(CityId),

    /// Record a domain error.
    #[serde(rename = "rejected")]
    Rejected(String),
}

/// Errors raised while turning untyped input into an [`Action`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActionError {
    #[error("Unknown action type '{kind}'")]
    UnknownKind { kind: String },

    #[error("Invalid payload for action '{kind}': {reason}")]
    InvalidPayload { kind: String, reason: String },
}

impl Action {
    /// The wire name of this action's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::CitiesLoaded(_) => "cities/loaded",
            Self::CityLoaded(_) => "city/loaded",
            Self::CityCreated(_) => "city/created",
            Self::CityDeleted(_) => "city/deleted",
            Self::Rejected(_) => "rejected",
        }
    }

    /// Build an action from a kind name and an untyped payload.
    ///
    /// The payload is ignored for `loading`. Ids accept numbers or numeric
    /// strings.
    pub fn from_kind(kind: &str, payload: Value) -> Result<Self, ActionError> {
        fn parse<T: serde::de::DeserializeOwned>(
            kind: &str,
            payload: Value,
        ) -> Result<T, ActionError> {
            serde_json::from_value(payload).map_err(|e| ActionError::InvalidPayload {
                kind: kind.to_string(),
                reason: e.to_string(),
            })
        }

        match kind {
            "loading" => Ok(Self::Loading),
            "cities/loaded" => parse(kind, payload).map(Self::CitiesLoaded),
            "city/loaded" => parse(kind, payload).map(Self::CityLoaded),
            "city/created" => parse(kind, payload).map(Self::CityCreated),
            "city/deleted" => parse(kind, payload).map(Self::CityDeleted),
            "rejected" => parse(kind, payload).map(Self::Rejected),
            _ => Err(ActionError::UnknownKind {
                kind: kind.to_string(),
            }),
        }
    }
}

#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

impl TryFrom<RawAction> for Action {
    type Error = ActionError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        Action::from_kind(&raw.kind, raw.payload)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawAction::deserialize(deserializer)?;
        Action::try_from(raw).map_err(serde::de::Error::custom)
    }
}

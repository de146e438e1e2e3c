//! City records and their canonical identifier.
//!
//! Identifiers arrive from the outside world as either JSON numbers or
//! numeric strings (route parameters, form values). They are coerced into a
//! single [`CityId`] representation once, at the boundary, so every
//! comparison inside the store is a plain integer comparison.
//!
//! Everything else about a city is stored as the JSON it arrived as. The
//! browser build writes coordinates as strings and dates in more than one
//! format, so typed views are offered as lenient accessors instead of
//! being enforced on load.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier of a [`City`].
///
/// # Example
///
/// ```rust
/// use city_store::core::CityId;
///
/// let from_route: CityId = "73930385".parse().unwrap();
/// let from_json: CityId = serde_json::from_str("\"73930385\"").unwrap();
///
/// assert_eq!(from_route, CityId::new(73930385));
/// assert_eq!(from_route, from_json);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CityId(u64);

impl CityId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid city identifier.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid city id '{0}': expected a non-negative integer")]
pub struct ParseCityIdError(String);

impl FromStr for CityId {
    type Err = ParseCityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(CityId)
            .map_err(|_| ParseCityIdError(s.to_string()))
    }
}

impl Serialize for CityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

struct CityIdVisitor;

impl Visitor<'_> for CityIdVisitor {
    type Value = CityId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<CityId, E> {
        Ok(CityId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<CityId, E> {
        u64::try_from(v)
            .map(CityId)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<CityId, E> {
        if v.fract() == 0.0 && v >= 0.0 && v < u64::MAX as f64 {
            Ok(CityId(v as u64))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<CityId, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for CityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CityIdVisitor)
    }
}

/// Geographic coordinates of a city.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// A selectable geographic point.
///
/// Only `id` is meaningful to the store. Every other field is kept as raw
/// JSON in `fields` and written back exactly as it was read.
///
/// # Example
///
/// ```rust
/// use city_store::core::{City, CityId};
///
/// let city: City = serde_json::from_str(
///     r#"{"id": 3, "name": "X", "position": {"lat": "41.15", "lng": "-8.61"}}"#,
/// )
/// .unwrap();
///
/// assert_eq!(city.id, CityId::new(3));
/// assert_eq!(city.fields["name"], "X");
/// assert_eq!(city.position().map(|p| p.lat), Some(41.15));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl City {
    /// Create a city with only an identifier.
    pub fn new(id: u64) -> Self {
        Self {
            id: CityId(id),
            fields: Map::new(),
        }
    }

    /// Set a raw field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_field("cityName", name.into())
    }

    pub fn with_country(self, country: impl Into<String>, emoji: impl Into<String>) -> Self {
        self.with_field("country", country.into())
            .with_field("emoji", emoji.into())
    }

    pub fn with_date(self, date: DateTime<Utc>) -> Self {
        self.with_field("date", date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn with_notes(self, notes: impl Into<String>) -> Self {
        self.with_field("notes", notes.into())
    }

    pub fn with_position(self, lat: f64, lng: f64) -> Self {
        self.with_field("position", serde_json::json!({ "lat": lat, "lng": lng }))
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn city_name(&self) -> Option<&str> {
        self.text("cityName")
    }

    pub fn country(&self) -> Option<&str> {
        self.text("country")
    }

    pub fn emoji(&self) -> Option<&str> {
        self.text("emoji")
    }

    pub fn notes(&self) -> Option<&str> {
        self.text("notes")
    }

    /// The `date` field as a timestamp.
    ///
    /// Accepts RFC 3339 and plain `YYYY-MM-DD` (read as midnight UTC).
    /// `None` when missing or unparseable; the raw value is untouched.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        let raw = self.text("date")?;
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return Some(date.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    }

    /// The `position` field, with numbers or numeric strings for coordinates.
    pub fn position(&self) -> Option<Position> {
        let position = self.fields.get("position")?;
        let coordinate = |key: &str| match position.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Some(Position {
            lat: coordinate("lat")?,
            lng: coordinate("lng")?,
        })
    }
}

//! Normalisation of the backend's JSON conventions.
//!
//! The backend is loose about identifier types, nulls and timestamp
//! formats. Everything is settled here, once, so the typed model in
//! [`crate::models`] sees canonical values, or the raw text where a stored
//! value cannot be read.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{FleetError, Result};

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

/// Identifier sent either as a JSON string or a number.
pub fn id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

/// Optional identifier; `null` and `""` both mean absent.
pub fn opt_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?
        .map(RawId::into_string)
        .filter(|s| !s.trim().is_empty()))
}

/// `null` deserialises to the type's default instead of failing.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub mod timestamp {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

/// A timestamp as the backend sent it.
///
/// Values that do not parse are kept verbatim and serialised back unchanged,
/// so updating a record never overwrites a date the console could not read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WireTime {
    #[default]
    Missing,
    Parsed(DateTime<Utc>),
    Unparsed(String),
}

impl WireTime {
    pub const fn parsed(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Parsed(dt) => Some(dt),
            Self::Missing | Self::Unparsed(_) => None,
        }
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<DateTime<Utc>> for WireTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Parsed(value)
    }
}

impl Serialize for WireTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Missing => serializer.serialize_none(),
            Self::Parsed(dt) => serializer.serialize_str(&format_timestamp(dt)),
            Self::Unparsed(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for WireTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<String>::deserialize(deserializer)? {
            None => Self::Missing,
            Some(raw) => parse_timestamp(&raw).map_or_else(
                || {
                    if !raw.is_empty() {
                        tracing::debug!("Keeping unparseable timestamp as sent: {}", raw);
                    }
                    Self::Unparsed(raw)
                },
                Self::Parsed,
            ),
        })
    }
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(WIRE_FORMAT).to_string()
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) or
/// a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(midnight_utc)
}

pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Parses a form date (`YYYY-MM-DD`) into midnight UTC.
pub fn parse_form_date(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(midnight_utc)
        .map_err(|_| {
            FleetError::Validation(format!("Fecha inválida '{raw}' (formato AAAA-MM-DD)"))
        })
}

/// Parses a form time (`HH:MM`) as a timestamp on `anchor`.
pub fn anchor_time(anchor: NaiveDate, raw: &str) -> Result<DateTime<Utc>> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|time| anchor.and_time(time).and_utc())
        .map_err(|_| FleetError::Validation(format!("Hora inválida '{raw}' (formato HH:MM)")))
}

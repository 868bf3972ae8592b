//! ISO-8601 timestamp parsing at the service boundary.
//!
//! Reminders store naive local times. Inputs carrying an offset (`Z`,
//! `+02:00`) keep their wall-clock reading and drop the offset; no timezone
//! conversion is performed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 date or date-time.
///
/// A bare date means midnight.
pub fn parse(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Format a timestamp the way the API returns it. Sub-second precision is
/// only written when present.
pub fn format(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// Deserialize an optional timestamp with [`parse`]. `null` means "not set".
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw:?}"))),
    }
}

/// Deserialize an optional list of timestamps with [`parse`].
pub fn deserialize_opt_vec<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<NaiveDateTime>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Vec<String>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    raw.iter()
        .map(|entry| {
            parse(entry).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {entry:?}")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

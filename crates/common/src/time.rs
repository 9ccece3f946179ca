//! Timestamp and duration formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats elapsed seconds as `M:SS`.
///
/// Minutes are not padded and keep growing past an hour (`3600` renders as
/// `60:00`).
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Serde helpers for ISO-8601 UTC instants with millisecond precision,
/// e.g. `2024-05-01T10:00:00.000Z`.
pub mod iso_millis {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Renders an instant the way browsers render `Date#toISOString`.
    pub fn format(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

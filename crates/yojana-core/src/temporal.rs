//! # Temporal Types
//!
//! UTC-only timestamp type for the Yojana Stack. All timestamps are stored
//! in UTC with second-level precision and a `Z` suffix in serialized form.
//!
//! ## Design Decision
//!
//! Gazette notifications and circulars carry dates in a handful of fixed
//! textual formats: a bare date, a local-naive datetime, or a full RFC 3339
//! timestamp. All of them are normalized to UTC at parse time so that
//! point-in-time queries compare a single, unambiguous axis. Local time
//! conversion is a presentation concern for the consuming application.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A UTC timestamp with second-level precision.
///
/// Serializes to ISO 8601 format with `Z` suffix (e.g. `2019-02-24T00:00:00Z`).
/// Parses the fixed input formats used by scheme packs:
///
/// - `2019-02-24`: a bare date, taken as midnight UTC
/// - `2019-02-24T10:30:00`: a naive datetime, taken as UTC
/// - `2019-02-24T10:30:00+05:30`: RFC 3339 with offset, converted to UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse a timestamp from one of the fixed textual formats.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] when the string matches
    /// none of the accepted formats.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Self(naive.and_utc()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self(date.and_time(chrono::NaiveTime::MIN).and_utc()));
        }

        Err(ValidationError::InvalidTimestamp {
            value: value.to_string(),
            reason: "expected YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS, or RFC 3339".to_string(),
        })
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Return the timestamp as an ISO 8601 string with Z suffix,
    /// truncated to seconds.
    pub fn to_canonical_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl std::str::FromStr for Timestamp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let ts = Timestamp::parse("2019-02-24").unwrap();
        assert_eq!(ts.to_canonical_string(), "2019-02-24T00:00:00Z");
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        let ts = Timestamp::parse("2019-06-01T10:30:00").unwrap();
        assert_eq!(ts.to_canonical_string(), "2019-06-01T10:30:00Z");
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = Timestamp::parse("2019-06-01T10:30:00+05:30").unwrap();
        assert_eq!(ts.to_canonical_string(), "2019-06-01T05:00:00Z");
    }

    #[test]
    fn rejects_garbage() {
        let err = Timestamp::parse("not-a-date").unwrap_err();
        assert!(format!("{err}").contains("not-a-date"));
    }

    #[test]
    fn rejects_day_month_order() {
        assert!(Timestamp::parse("24-02-2019").is_err());
    }

    #[test]
    fn ordering_follows_chronology() {
        let earlier = Timestamp::parse("2019-02-24").unwrap();
        let later = Timestamp::parse("2019-06-01").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn serde_round_trip() {
        let ts = Timestamp::parse("2019-02-24T12:00:00").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2019-02-24T12:00:00Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn deserialize_accepts_bare_date() {
        let ts: Timestamp = serde_json::from_str("\"2019-02-24\"").unwrap();
        assert_eq!(ts.to_canonical_string(), "2019-02-24T00:00:00Z");
    }

    proptest! {
        #[test]
        fn canonical_string_round_trips(secs in 0i64..4_102_444_800) {
            let dt = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
            let ts = Timestamp::from_datetime(dt);
            let reparsed = Timestamp::parse(&ts.to_canonical_string()).unwrap();
            prop_assert_eq!(reparsed, ts);
        }
    }
}

//! Time utilities: parsing client-supplied event dates, the canonical storage
//! format, and serde helpers for timestamps on the wire.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Naive date-time layouts accepted besides RFC 3339. Values without an
/// offset are taken as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an event date as sent by a client.
///
/// Accepts RFC 3339 (`2025-10-10T10:00:00Z`, `2025-10-10T12:00:00+02:00`),
/// naive date-times (`2025-10-10T10:00`) and plain dates (`2025-10-10`, taken
/// as midnight UTC).
pub fn parse_event_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Canonical text form used both in SQLite and on the wire:
/// `YYYY-MM-DDTHH:MM:SS.sssZ`. Fixed width, so text order is time order.
pub fn to_storage(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn from_storage(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn now_storage() -> String {
    to_storage(&Utc::now())
}

/// `serialize_with` helper emitting the canonical text form.
pub fn serialize_iso<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_storage(dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_and_normalizes_offset() {
        let dt = parse_event_date("2025-10-10T12:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 10, 10, 10, 0, 0).unwrap());
    }

    #[test]
    fn plain_date_is_midnight_utc() {
        let dt = parse_event_date("2025-10-10").unwrap();
        assert_eq!(to_storage(&dt), "2025-10-10T00:00:00.000Z");
    }

    #[test]
    fn naive_datetime_without_seconds() {
        let dt = parse_event_date("2025-10-10T18:30").unwrap();
        assert_eq!(to_storage(&dt), "2025-10-10T18:30:00.000Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_event_date("").is_none());
        assert!(parse_event_date("tomorrow").is_none());
        assert!(parse_event_date("2025-13-40").is_none());
    }

    #[test]
    fn storage_form_sorts_chronologically() {
        let a = to_storage(&parse_event_date("2025-01-02T09:00:00Z").unwrap());
        let b = to_storage(&parse_event_date("2025-01-10T08:00:00Z").unwrap());
        assert!(a < b);
        assert_eq!(from_storage(&a), parse_event_date("2025-01-02T09:00:00Z"));
    }
}

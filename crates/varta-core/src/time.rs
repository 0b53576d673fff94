//! Timestamp parsing and display helpers.
//!
//! The backend serializes times inconsistently (`OffsetDateTime` with an
//! offset, `LocalDateTime` without), so timestamps stay strings on the wire
//! and are parsed leniently where the client needs to order or format them.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a backend timestamp. Offset-less values are taken as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parses a `YYYY-MM-DDTHH:MM` schedule entered in the operator's local time.
#[must_use]
pub fn parse_local_input(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// ISO-8601 UTC with millisecond precision, e.g. `2025-03-01T09:30:00.000Z`.
#[must_use]
pub fn to_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Local date and time for display; unparsable input is returned as-is.
#[must_use]
pub fn display_datetime(raw: &str) -> String {
    parse_timestamp(raw).map_or_else(
        || raw.to_string(),
        |dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Local date for display; unparsable input is returned as-is.
#[must_use]
pub fn display_date(raw: &str) -> String {
    parse_timestamp(raw).map_or_else(
        || raw.to_string(),
        |dt| dt.with_timezone(&Local).format("%Y-%m-%d").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_offset_and_naive_forms() {
        let with_offset = parse_timestamp("2025-03-01T10:00:00+01:00").unwrap();
        let naive = parse_timestamp("2025-03-01T09:00:00").unwrap();
        let fractional = parse_timestamp("2025-03-01T09:00:00.123456").unwrap();

        assert_eq!(with_offset, naive);
        assert_eq!(to_iso(&fractional), "2025-03-01T09:00:00.123Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_local_input("").is_none());
    }

    #[test]
    fn iso_uses_z_suffix() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(to_iso(&dt), "2025-01-02T03:04:05.000Z");
    }

    #[test]
    fn display_passes_through_unparsable() {
        assert_eq!(display_date("-"), "-");
    }
}

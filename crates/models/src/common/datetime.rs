//! Timestamp conversion between `chrono` values and their wire form.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Parses a timestamp string into UTC.
///
/// Accepts RFC 3339 with any offset. An ISO-8601 date-time without an offset
/// (`2016-01-01T00:00:00.000`) is read as UTC.
///
/// # Examples
///
/// ```
/// use rheactor_models::common::parse_datetime;
/// use chrono::Datelike;
///
/// let dt = parse_datetime("2016-01-01T00:00:00.000Z").unwrap();
/// assert_eq!(dt.year(), 2016);
/// ```
///
/// # Errors
///
/// Returns the RFC 3339 `chrono::ParseError` if neither form matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(err) => NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .map_err(|_| err),
    }
}

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Formats a timestamp for the wire.
///
/// Always UTC with a `Z` suffix. Fractional seconds are written with as many
/// digits as needed, so parsing the result yields the same instant.
///
/// ```
/// use rheactor_models::common::{format_datetime, parse_datetime};
///
/// let dt = parse_datetime("2016-01-01T00:00:00.250Z").unwrap();
/// assert_eq!(format_datetime(dt), "2016-01-01T00:00:00.250Z");
/// ```
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_datetime_valid() {
        let dt = parse_datetime("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_datetime_with_timezone() {
        let dt = parse_datetime("2024-01-15T10:30:00+05:00").unwrap();
        assert_eq!(dt.hour(), 5);
    }

    #[test]
    fn test_parse_datetime_without_offset_is_utc() {
        let expected = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2016-01-01T00:00:00.000").unwrap(), expected);
        assert_eq!(parse_datetime("2016-01-01T00:00:00").unwrap(), expected);

        let dt = parse_datetime("2016-01-01T12:30:15.250").unwrap();
        assert_eq!(format_datetime(dt), "2016-01-01T12:30:15.250Z");
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("not-a-date").is_err());
        assert!(parse_datetime("").is_err());
        assert!(parse_datetime("2024-01-15").is_err());
        assert!(parse_datetime("2024-01-15T25:00:00").is_err());
    }

    #[test]
    fn test_format_whole_seconds() {
        let dt = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_datetime(dt), "2016-01-01T00:00:00Z");
    }

    #[test]
    fn test_format_preserves_sub_millisecond_precision() {
        let dt = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let formatted = format_datetime(dt);
        assert_eq!(parse_datetime(&formatted).unwrap(), dt);
    }
}

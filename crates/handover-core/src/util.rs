//! Shared utility functions used across multiple modules.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Trim a string in place, reusing the allocation when nothing changes.
pub fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Check whether a string is empty once surrounding whitespace is removed.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Parse a handover timestamp.
///
/// Accepts RFC 3339 (`2024-03-01T09:30:00.000Z`), naive date-times in either
/// `T` or space separated form (read as UTC), and bare `YYYY-MM-DD` dates.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Render a timestamp in the canonical stored form (RFC 3339, UTC, millis).
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current Unix timestamp in milliseconds.
pub fn unix_millis_now() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_strips_surrounding_whitespace() {
        assert_eq!(trimmed("  Laptop \n".to_string()), "Laptop");
        assert_eq!(trimmed("Mouse".to_string()), "Mouse");
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339_and_naive_forms() {
        let expected = "2024-03-01T09:30:00.000Z";
        for input in [
            "2024-03-01T09:30:00Z",
            "2024-03-01T10:30:00+01:00",
            "2024-03-01T09:30:00",
            "2024-03-01 09:30:00",
        ] {
            let parsed = parse_timestamp(input).unwrap();
            assert_eq!(format_timestamp(parsed), expected, "input {input}");
        }

        let date_only = parse_timestamp("2024-03-01").unwrap();
        assert_eq!(format_timestamp(date_only), "2024-03-01T00:00:00.000Z");
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-01").is_none());
    }
}

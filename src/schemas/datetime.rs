//! Lenient timestamp parsing for request bodies.
//!
//! Clients send `starts_at` either as RFC 3339 or as a bare
//! `YYYY-MM-DD HH:MM[:SS]` / `YYYY-MM-DD` local string, which is read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `[start 00:00, end + 1 day 00:00)`, covering the whole end day
pub fn day_range(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let upper = end.succ_opt().unwrap_or(end);
    (start_of_day(start), start_of_day(upper))
}

/// `#[serde(deserialize_with = "datetime::deserialize")]`
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parses_rfc3339_with_offset() {
        let dt = parse_datetime("2025-05-01T10:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parses_space_separated() {
        let dt = parse_datetime("2025-05-01 09:30:15").unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (9, 30, 15));
    }

    #[test]
    fn test_parses_bare_date_as_midnight() {
        let dt = parse_datetime("2025-05-01").unwrap();
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_datetime("next tuesday").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn test_day_range_covers_whole_end_day() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let (start, end) = day_range(d, d);
        assert_eq!(end - start, chrono::Duration::days(1));
        assert_eq!(end.month(), 2);
    }
}

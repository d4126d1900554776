/// Utilities for date and time parsing and formatting
///
/// Parsing never fails loudly: anything that is not a real calendar date comes
/// back as `None`.
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a timestamp in any of the accepted textual forms.
///
/// RFC 3339 values with an offset are converted to UTC; date-only values land
/// on midnight, month keys (`YYYY-MM`) on the first day of the month.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| parse_month(trimmed))
        .map(start_of_day)
}

/// Month key "2024-03" as its first day
fn parse_month(s: &str) -> Option<NaiveDate> {
    let (year, month) = s.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Milliseconds since the Unix epoch to a UTC timestamp
pub fn datetime_from_epoch_millis(ms: f64) -> Option<NaiveDateTime> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms.round() as i64).map(|dt| dt.naive_utc())
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Number of days between two timestamps, rounded, never below 1
pub fn range_days(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let ms = (to - from).num_milliseconds() as f64;
    let days = (ms / 86_400_000.0).round() as i64;
    days.max(1)
}

/// Format as ISO date: "2024-03-15"
pub fn format_iso_date(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Format as DD/MM/YYYY HH:MM:SS: "15/03/2024 14:02:26"
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%d/%m/%Y %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_datetime_forms() {
        assert_eq!(
            parse_datetime("2024-03-15T14:02:26.123Z").map(|d| format_datetime(&d)),
            Some("15/03/2024 14:02:26".to_string())
        );
        assert_eq!(
            parse_datetime("2024-03-15T14:02:26-03:00"),
            Some(at(2024, 3, 15, 17, 2, 26))
        );
        assert_eq!(
            parse_datetime("2024-03-15 14:02:26"),
            Some(at(2024, 3, 15, 14, 2, 26))
        );
        assert_eq!(
            parse_datetime("15/03/2024 14:02"),
            Some(at(2024, 3, 15, 14, 2, 0))
        );
        assert_eq!(parse_datetime(" 2024-03-15 "), Some(at(2024, 3, 15, 0, 0, 0)));
    }

    #[test]
    fn test_month_key() {
        assert_eq!(parse_datetime("2024-03"), Some(at(2024, 3, 1, 0, 0, 0)));
        assert_eq!(parse_datetime("2024-13"), None);
        assert_eq!(parse_datetime("2024-3"), None);
        assert_eq!(parse_datetime("24-03"), None);
    }

    #[test]
    fn test_invalid_dates_are_none() {
        assert_eq!(parse_datetime("invalid"), None);
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("2024-02-30"), None);
        assert_eq!(parse_datetime("31/13/2024"), None);
        assert_eq!(datetime_from_epoch_millis(f64::NAN), None);
    }

    #[test]
    fn test_epoch_millis() {
        assert_eq!(
            datetime_from_epoch_millis(1_710_511_346_000.0),
            Some(at(2024, 3, 15, 14, 2, 26))
        );
    }

    #[test]
    fn test_range_days() {
        let from = at(2024, 1, 1, 0, 0, 0);
        assert_eq!(range_days(from, at(2024, 1, 31, 0, 0, 0)), 30);
        assert_eq!(range_days(from, from), 1);
        assert_eq!(range_days(from, at(2024, 1, 1, 13, 0, 0)), 1);
    }

    #[test]
    fn test_format_date() {
        let dt = at(2024, 12, 31, 23, 59, 59);
        assert_eq!(format_datetime(&dt), "31/12/2024 23:59:59");
        assert_eq!(format_iso_date(&dt), "2024-12-31");
    }
}

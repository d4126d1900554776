use chrono::{Datelike, NaiveDateTime};
use contracts::shared::charts::Granularity;

use crate::shared::date_utils::range_days;

/// Bucket size for a date range of `days` days
pub fn granularity_for_days(days: i64) -> Granularity {
    if days <= 45 {
        Granularity::Day
    } else if days <= 180 {
        Granularity::Week
    } else {
        Granularity::Month
    }
}

/// Bucket size for an effective date range; monthly when either end is open
pub fn granularity_for_range(from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Granularity {
    match (from, to) {
        (Some(from), Some(to)) => granularity_for_days(range_days(from, to)),
        _ => Granularity::Month,
    }
}

/// Fixed-width key whose lexical order is chronological:
/// `2024-03-15`, `2024-W11` (ISO week), `2024-03`.
pub fn bucket_key(at: &NaiveDateTime, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => at.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let week = at.iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
        Granularity::Month => format!("{:04}-{:02}", at.year(), at.month()),
    }
}

const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

/// Short weekday label for an index where 0 is Sunday
pub fn weekday_label_from_index(index: i64) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| WEEKDAY_LABELS.get(i))
        .map(|s| s.to_string())
        .unwrap_or_else(|| index.to_string())
}

/// Canonical short label for a weekday name ("segunda-feira" -> "Seg").
/// Unrecognised names are returned unchanged.
pub fn normalize_weekday_label(name: &str) -> String {
    let lower = name.to_lowercase();
    let prefixes: [(&str, &str); 8] = [
        ("dom", "Dom"),
        ("seg", "Seg"),
        ("ter", "Ter"),
        ("qua", "Qua"),
        ("qui", "Qui"),
        ("sex", "Sex"),
        ("sab", "Sáb"),
        ("sáb", "Sáb"),
    ];
    prefixes
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| name.to_string())
}

//! Raw record to [`CanonicalRow`] conversion.
//!
//! Keys are trimmed and matched exactly against the known source columns.
//! A value that cannot be read as its field type becomes null; normalization
//! itself never fails.

use chrono::NaiveDateTime;
use contracts::shared::orders::{
    CanonicalRow, CategoricalField, NumericField, RawRecord, ORDER_DATETIME_KEY,
};
use serde_json::Value;

use crate::shared::date_utils::{datetime_from_epoch_millis, parse_datetime};

pub fn normalize(raw: &RawRecord) -> CanonicalRow {
    let mut row = CanonicalRow::default();

    for (raw_key, value) in raw {
        let key = raw_key.trim();

        if key == ORDER_DATETIME_KEY {
            row.order_datetime = read_datetime(value);
        } else if let Some(field) = NumericField::from_source_key(key) {
            match read_number(value) {
                Some(n) => row.numeric.insert(field, n),
                None => row.numeric.remove(&field),
            };
        } else if let Some(field) = CategoricalField::from_source_key(key) {
            match read_category(value) {
                Some(s) => row.categorical.insert(field, s),
                None => row.categorical.remove(&field),
            };
        } else {
            row.extra.insert(key.to_string(), value.clone());
        }
    }

    row
}

pub fn normalize_all(records: &[RawRecord]) -> Vec<CanonicalRow> {
    records.iter().map(normalize).collect()
}

/// Numbers are taken as-is; text is parsed after turning a decimal comma into
/// a point. Anything non-finite is null.
fn read_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn read_category(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text in any accepted date format, or a number of epoch milliseconds
fn read_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_datetime(s),
        Value::Number(n) => n.as_f64().and_then(datetime_from_epoch_millis),
        _ => None,
    }
}

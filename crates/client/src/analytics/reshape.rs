//! Defensive readers for backend aggregate payloads.
//!
//! Payloads come either bare or wrapped in `{"data": ...}`, and the same
//! column may be named differently across backend versions. These helpers
//! resolve values by ordered alias lists and never fail: a missing or
//! mistyped value falls back to a default.

use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

/// `payload.data` when present and non-null, otherwise the payload itself
pub fn unwrap_data(payload: &Value) -> &Value {
    match payload.get("data") {
        Some(data) if !data.is_null() => data,
        _ => payload,
    }
}

/// Object rows of an array payload; anything else reads as no rows
pub fn as_rows(payload: &Value) -> Vec<&JsonObject> {
    unwrap_data(payload)
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

pub fn as_object(payload: &Value) -> Option<&JsonObject> {
    unwrap_data(payload).as_object()
}

/// First alias holding a JSON number
pub fn pick_number(obj: &JsonObject, aliases: &[&str]) -> Option<f64> {
    aliases
        .iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_f64))
        .find(|n| n.is_finite())
}

pub fn pick_number_or(obj: &JsonObject, aliases: &[&str], default: f64) -> f64 {
    pick_number(obj, aliases).unwrap_or(default)
}

/// First alias holding a JSON string
pub fn pick_string<'a>(obj: &'a JsonObject, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
}

/// First key, in payload order, outside the exclusion list
pub fn first_key_except<'a>(obj: &'a JsonObject, exclusions: &[&str]) -> Option<&'a str> {
    obj.keys()
        .map(String::as_str)
        .find(|key| !exclusions.contains(key))
}

/// Display text of a scalar value; `None` for null
pub fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Label of the `index`-th row: a string under one of `aliases`, else the
/// value of the first key outside `exclusions`, else `"Category {index + 1}"`.
pub fn resolve_label(obj: &JsonObject, aliases: &[&str], exclusions: &[&str], index: usize) -> String {
    if let Some(label) = pick_string(obj, aliases) {
        return label.to_string();
    }
    first_key_except(obj, exclusions)
        .and_then(|key| obj.get(key))
        .and_then(label_text)
        .unwrap_or_else(|| format!("Category {}", index + 1))
}

/// List of option labels, e.g. `{"data": ["iFood", "Rappi"]}`
pub fn string_list(payload: &Value) -> Vec<String> {
    unwrap_data(payload)
        .as_array()
        .map(|items| items.iter().filter_map(label_text).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_unwrap_data() {
        assert_eq!(unwrap_data(&json!({"data": [1]})), &json!([1]));
        assert_eq!(unwrap_data(&json!({"data": null, "x": 1})), &json!({"data": null, "x": 1}));
        assert_eq!(unwrap_data(&json!({"x": 1})), &json!({"x": 1}));
        assert_eq!(as_rows(&json!({"data": [{"a": 1}, 2, {"b": 2}]})).len(), 2);
        assert!(as_rows(&json!({"data": {"a": 1}})).is_empty());
    }

    #[test]
    fn test_pick_number_skips_non_numbers() {
        let row = obj(json!({"total": "12", "revenue": 30.5, "pct": 0}));
        assert_eq!(pick_number(&row, &["total", "revenue"]), Some(30.5));
        assert_eq!(pick_number_or(&row, &["missing"], 0.0), 0.0);
        assert_eq!(pick_number(&row, &["pct"]), Some(0.0));
    }

    #[test]
    fn test_first_key_follows_payload_order() {
        let row = obj(json!({"revenue": 1.0, "zona": "Sul", "area": "x"}));
        assert_eq!(first_key_except(&row, &["revenue"]), Some("zona"));
        assert_eq!(first_key_except(&obj(json!({"revenue": 1})), &["revenue"]), None);
    }

    #[test]
    fn test_resolve_label_fallbacks() {
        let with_alias = obj(json!({"total": 10, "plataforma": "iFood"}));
        assert_eq!(resolve_label(&with_alias, &["platform", "plataforma"], &["total"], 0), "iFood");

        let by_key = obj(json!({"total": 10, "canal": 7}));
        assert_eq!(resolve_label(&by_key, &["platform"], &["total"], 0), "7");

        let nothing = obj(json!({"total": 10}));
        assert_eq!(resolve_label(&nothing, &["platform"], &["total"], 2), "Category 3");
    }

    #[test]
    fn test_string_list() {
        assert_eq!(string_list(&json!({"data": ["iFood", "Rappi", null]})), vec!["iFood", "Rappi"]);
        assert!(string_list(&json!({"error": "x"})).is_empty());
    }
}

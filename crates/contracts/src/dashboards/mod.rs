pub mod finance;
pub mod local;
pub mod ops;
pub mod overview;
pub mod satisfaction;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Time span covered by the whole dataset, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetPeriod {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

/// Label with a count (platform orders, status distribution, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCount {
    pub label: String,
    pub count: f64,
}

/// Label with a value (average revenue per region, choropleth value, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

/// Point of a time series keyed by the backend's date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: String,
    pub value: f64,
}

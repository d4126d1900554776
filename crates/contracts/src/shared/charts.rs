use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Grouped values
// ---------------------------------------------------------------------------

/// Mean of a metric per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    pub key: String,
    pub mean: f64,
    /// Rows that contributed a non-null value
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// Sum of a metric per category with its share of the grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
    /// Percentage of the grand total, `None` when unknown
    pub share_pct: Option<f64>,
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Time bucket size. Serialized as the backend `freq` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "W")]
    Week,
    #[serde(rename = "M")]
    Month,
}

impl Granularity {
    pub fn as_param(&self) -> &'static str {
        match self {
            Granularity::Day => "D",
            Granularity::Week => "W",
            Granularity::Month => "M",
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Month
    }
}

/// Count and sum for one time bucket; `key` is a fixed-width ISO string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub key: String,
    pub count: usize,
    pub sum: f64,
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    /// Requested percentile in [0, 100]
    pub p: f64,
    pub value: f64,
}

/// Box-plot summary of a distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantileSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

// ---------------------------------------------------------------------------
// Gauge
// ---------------------------------------------------------------------------

/// Colour band of a percentage gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeBand {
    Good,
    Warning,
    Bad,
}

/// Percentage on the 0-100 display scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeReading {
    pub value: f64,
    pub band: GaugeBand,
}

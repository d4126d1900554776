use serde::{Deserialize, Serialize};

use crate::shared::charts::{GaugeReading, QuantileSummary};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpsKpis {
    pub avg_prep_minutes: Option<f64>,
    pub avg_delivery_minutes: Option<f64>,
    pub avg_delay_minutes: Option<f64>,
    pub avg_distance_km: Option<f64>,
    pub on_time_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourValue {
    pub hour: u32,
    pub value: f64,
}

/// Delivery time distribution of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPercentiles {
    pub region: String,
    pub mean: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateRate {
    pub label: String,
    pub late_count: f64,
    pub on_time_count: f64,
    /// Fraction in [0, 1]
    pub late_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayBox {
    pub weekday: String,
    pub summary: QuantileSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatCell {
    pub hour: u32,
    pub weekday: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpsView {
    pub kpis: Option<OpsKpis>,
    pub on_time_gauge: Option<GaugeReading>,
    pub orders_by_hour: Vec<HourValue>,
    /// Sorted by p90, slowest region first
    pub delivery_percentiles_by_region: Vec<RegionPercentiles>,
    pub late_rate_by_region: Vec<LateRate>,
    pub delivery_by_weekday: Vec<WeekdayBox>,
    pub avg_delivery_by_hour: Vec<HourValue>,
    pub heatmap: Vec<HeatCell>,
    pub late_rate_by_platform: Vec<LateRate>,
}

use serde::{Deserialize, Serialize};

use super::{DatasetPeriod, LabeledCount, LabeledValue};
use crate::shared::charts::{GaugeReading, Granularity};

/// Headline numbers of the overview page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewKpis {
    pub total_orders: f64,
    pub total_revenue: f64,
    pub average_ticket: f64,
    /// Only some backend versions report the next three
    pub cancelled_pct: Option<f64>,
    pub orders_per_day: Option<f64>,
    pub on_time_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueOrdersPoint {
    pub date: String,
    pub revenue: f64,
    pub orders: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewView {
    pub dataset_period: Option<DatasetPeriod>,
    /// Filter options
    pub platforms: Vec<String>,
    pub macro_regions: Vec<String>,
    pub granularity: Granularity,
    pub kpis: Option<OverviewKpis>,
    pub orders_by_platform: Vec<LabeledCount>,
    pub status_distribution: Vec<LabeledCount>,
    pub avg_revenue_by_region: Vec<LabeledValue>,
    pub revenue_with_orders: Vec<RevenueOrdersPoint>,
    pub top_regions_by_orders: Vec<LabeledCount>,
    pub choropleth: Vec<LabeledValue>,
    pub on_time_gauge: Option<GaugeReading>,
}

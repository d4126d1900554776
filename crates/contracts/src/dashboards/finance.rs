use serde::{Deserialize, Serialize};

use super::{DatasetPeriod, DatedValue, LabeledValue};
use crate::shared::charts::{GroupTotal, Granularity};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceKpis {
    pub gross_revenue: f64,
    pub net_revenue: f64,
    pub margin: f64,
    pub average_ticket: f64,
    pub orders: f64,
}

/// Gross and net revenue of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRevenue {
    pub region: String,
    pub gross: f64,
    pub net: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceView {
    pub dataset_period: Option<DatasetPeriod>,
    pub platforms: Vec<String>,
    pub macro_regions: Vec<String>,
    pub granularity: Granularity,
    pub kpis: Option<FinanceKpis>,
    pub revenue_series: Vec<DatedValue>,
    pub revenue_by_platform: Vec<GroupTotal>,
    pub revenue_by_class: Vec<LabeledValue>,
    pub revenue_by_item_class: Vec<LabeledValue>,
    pub revenue_by_region: Vec<RegionRevenue>,
    pub top_clients: Vec<LabeledValue>,
}

use serde::{Deserialize, Serialize};

use crate::shared::charts::{
    GaugeReading, GroupCount, GroupMean, HistogramBin, PercentileValue, ScatterPoint, TimeBucket,
};

/// Dashboard computed on the client from raw order rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalSummary {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub revenue_by_day: Vec<TimeBucket>,
    pub avg_ticket_by_platform: Vec<GroupMean>,
    pub satisfaction_by_region: Vec<GroupMean>,
    pub orders_by_status: Vec<GroupCount>,
    pub delivery_percentiles: Vec<PercentileValue>,
    pub delivery_histogram: Vec<HistogramBin>,
    pub distance_vs_delivery: Vec<ScatterPoint>,
    pub on_time_gauge: Option<GaugeReading>,
}

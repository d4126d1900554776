use serde::{Deserialize, Serialize};

use super::{DatedValue, LabeledValue};
use crate::shared::charts::ScatterPoint;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionKpis {
    /// Mean satisfaction level (1-5)
    pub average_score: f64,
    pub very_satisfied_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionView {
    pub kpis: Option<SatisfactionKpis>,
    pub by_region: Vec<LabeledValue>,
    /// x = delivery minutes, y = satisfaction level
    pub delivery_vs_score: Vec<ScatterPoint>,
    pub timeseries: Vec<DatedValue>,
    pub by_platform: Vec<LabeledValue>,
    /// Filter options derived from the loaded data
    pub platforms: Vec<String>,
    pub macro_regions: Vec<String>,
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Raw heterogeneous record as read from a spreadsheet row or a JSON payload.
pub type RawRecord = Map<String, Value>;

/// Source column holding the order timestamp.
pub const ORDER_DATETIME_KEY: &str = "order_datetime";

// ---------------------------------------------------------------------------
// Known fields
// ---------------------------------------------------------------------------

/// Numeric order attributes recognised by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    DistanceKm,
    PrepTimeMinutes,
    EtaMinutes,
    ActualDeliveryMinutes,
    TotalBrl,
    CommissionPct,
    ItemCount,
    SatisfactionLevel,
}

impl NumericField {
    pub const ALL: [NumericField; 8] = [
        NumericField::DistanceKm,
        NumericField::PrepTimeMinutes,
        NumericField::EtaMinutes,
        NumericField::ActualDeliveryMinutes,
        NumericField::TotalBrl,
        NumericField::CommissionPct,
        NumericField::ItemCount,
        NumericField::SatisfactionLevel,
    ];

    /// Column name in the source dataset
    pub fn source_key(&self) -> &'static str {
        match self {
            NumericField::DistanceKm => "distance_km",
            NumericField::PrepTimeMinutes => "tempo_preparo_minutos",
            NumericField::EtaMinutes => "eta_minutes_quote",
            NumericField::ActualDeliveryMinutes => "actual_delivery_minutes",
            NumericField::TotalBrl => "total_brl",
            NumericField::CommissionPct => "platform_commission_pct",
            NumericField::ItemCount => "num_itens",
            NumericField::SatisfactionLevel => "satisfacao_nivel",
        }
    }

    pub fn from_source_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.source_key() == key)
    }
}

/// Categorical order attributes recognised by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    /// Macro-neighborhood (region) of the delivery
    MacroRegion,
    Customer,
    Neighborhood,
    Platform,
    OrderMode,
    Status,
    OrderClass,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 7] = [
        CategoricalField::MacroRegion,
        CategoricalField::Customer,
        CategoricalField::Neighborhood,
        CategoricalField::Platform,
        CategoricalField::OrderMode,
        CategoricalField::Status,
        CategoricalField::OrderClass,
    ];

    /// Column name in the source dataset (also the backend query parameter name)
    pub fn source_key(&self) -> &'static str {
        match self {
            CategoricalField::MacroRegion => "macro_bairro",
            CategoricalField::Customer => "nome_cliente",
            CategoricalField::Neighborhood => "bairro_destino",
            CategoricalField::Platform => "platform",
            CategoricalField::OrderMode => "order_mode",
            CategoricalField::Status => "status",
            CategoricalField::OrderClass => "classe_pedido",
        }
    }

    pub fn from_source_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.source_key() == key)
    }
}

// ---------------------------------------------------------------------------
// Canonical row
// ---------------------------------------------------------------------------

/// Normalized, typed order record.
///
/// A field missing from `numeric` / `categorical` is the same thing as a null
/// value: aggregations skip the row for that metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub order_datetime: Option<NaiveDateTime>,
    #[serde(default)]
    pub numeric: BTreeMap<NumericField, f64>,
    #[serde(default)]
    pub categorical: BTreeMap<CategoricalField, String>,
    /// Unknown columns, keyed by their trimmed source name
    #[serde(default)]
    pub extra: BTreeMap<String, Value>,
}

impl CanonicalRow {
    pub fn numeric(&self, field: NumericField) -> Option<f64> {
        self.numeric.get(&field).copied()
    }

    pub fn category(&self, field: CategoricalField) -> Option<&str> {
        self.categorical.get(&field).map(String::as_str)
    }

    pub fn with_datetime(mut self, at: NaiveDateTime) -> Self {
        self.order_datetime = Some(at);
        self
    }

    pub fn with_numeric(mut self, field: NumericField, value: f64) -> Self {
        self.numeric.insert(field, value);
        self
    }

    pub fn with_category(mut self, field: CategoricalField, value: impl Into<String>) -> Self {
        self.categorical.insert(field, value.into());
        self
    }
}

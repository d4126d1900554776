use contracts::dashboards::ops::{
    HeatCell, HourValue, LateRate, OpsKpis, OpsView, RegionPercentiles, WeekdayBox,
};
use serde_json::Value;

use super::{DashboardPage, PageContext};
use crate::analytics::gauge::gauge_reading;
use crate::analytics::reshape::{as_object, as_rows, pick_number, pick_number_or, resolve_label, JsonObject};
use crate::analytics::stats::five_number_summary;
use crate::analytics::temporal::{normalize_weekday_label, weekday_label_from_index};
use crate::coordinator::{BatchResult, NamedRequest};
use crate::shared::api_utils::QueryParams;

const KPIS: &str = "kpis";
const ORDERS_BY_HOUR: &str = "orders_by_hour";
const PERCENTILES: &str = "percentiles_by_macro";
const LATE_BY_MACRO: &str = "late_rate_by_macro";
const BY_WEEKDAY: &str = "delivery_by_weekday";
const AVG_BY_HOUR: &str = "avg_delivery_by_hour";
const HEATMAP: &str = "heatmap_hour_weekday";
const LATE_BY_PLATFORM: &str = "late_rate_by_platform";

/// Operational page. Its aggregates cover the whole dataset, so it has no
/// filters and skips phase 1.
pub struct OpsPage;

impl DashboardPage for OpsPage {
    type View = OpsView;

    fn name(&self) -> &'static str {
        "ops"
    }

    fn uses_context(&self) -> bool {
        false
    }

    fn requests(&self, _ctx: &PageContext) -> Vec<NamedRequest> {
        [
            (KPIS, "kpis"),
            (ORDERS_BY_HOUR, "orders_by_hour"),
            (PERCENTILES, "percentis_by_macro"),
            (LATE_BY_MACRO, "late_rate_by_macro"),
            (BY_WEEKDAY, "delivery_by_weekday"),
            (AVG_BY_HOUR, "avg_delivery_by_hour"),
            (HEATMAP, "heatmap_hour_weekday"),
            (LATE_BY_PLATFORM, "late_rate_by_platform"),
        ]
        .into_iter()
        .map(|(name, endpoint)| {
            NamedRequest::new(
                name,
                &format!("/api/dashboard/ops/{}", endpoint),
                QueryParams::new(),
            )
        })
        .collect()
    }

    fn assemble(&self, _ctx: &PageContext, batch: &BatchResult) -> OpsView {
        let kpis = batch.value(KPIS).and_then(read_kpis);

        let mut percentiles: Vec<RegionPercentiles> = rows(batch.value(PERCENTILES))
            .enumerate()
            .map(|(idx, row)| RegionPercentiles {
                region: resolve_label(row, &["macro_bairro"], &["mean", "p50", "p75", "p90", "count"], idx),
                mean: pick_number_or(row, &["mean"], 0.0),
                p50: pick_number_or(row, &["p50"], 0.0),
                p75: pick_number_or(row, &["p75"], 0.0),
                p90: pick_number_or(row, &["p90"], 0.0),
                count: pick_number_or(row, &["count"], 0.0),
            })
            .collect();
        percentiles.sort_by(|a, b| b.p90.partial_cmp(&a.p90).unwrap_or(std::cmp::Ordering::Equal));

        OpsView {
            on_time_gauge: kpis.as_ref().and_then(|k| k.on_time_rate_pct).map(gauge_reading),
            kpis,
            orders_by_hour: hour_values(batch.value(ORDERS_BY_HOUR), "orders"),
            delivery_percentiles_by_region: percentiles,
            late_rate_by_region: late_rates(batch.value(LATE_BY_MACRO), "macro_bairro"),
            delivery_by_weekday: rows(batch.value(BY_WEEKDAY))
                .map(|row| WeekdayBox {
                    weekday: weekday_label(row.get("weekday")),
                    summary: five_number_summary(&numbers(row.get("values"))),
                })
                .collect(),
            avg_delivery_by_hour: hour_values(batch.value(AVG_BY_HOUR), "avg_delivery_minutes"),
            heatmap: rows(batch.value(HEATMAP))
                .map(|row| HeatCell {
                    hour: hour(row),
                    weekday: weekday_label(row.get("weekday")),
                    value: pick_number_or(row, &["value"], 0.0),
                })
                .collect(),
            late_rate_by_platform: late_rates(batch.value(LATE_BY_PLATFORM), "platform"),
        }
    }
}

fn rows(payload: Option<&Value>) -> impl Iterator<Item = &JsonObject> {
    payload.map(as_rows).unwrap_or_default().into_iter()
}

fn read_kpis(payload: &Value) -> Option<OpsKpis> {
    let obj = as_object(payload)?;
    Some(OpsKpis {
        avg_prep_minutes: pick_number(obj, &["tempo_medio_preparo"]),
        avg_delivery_minutes: pick_number(obj, &["tempo_medio_entrega"]),
        avg_delay_minutes: pick_number(obj, &["atraso_medio"]),
        avg_distance_km: pick_number(obj, &["distancia_media"]),
        on_time_rate_pct: pick_number(obj, &["on_time_rate_pct"]),
    })
}

fn hour(row: &JsonObject) -> u32 {
    pick_number_or(row, &["hour"], 0.0).max(0.0) as u32
}

fn hour_values(payload: Option<&Value>, value_key: &str) -> Vec<HourValue> {
    rows(payload)
        .map(|row| HourValue {
            hour: hour(row),
            value: pick_number_or(row, &[value_key], 0.0),
        })
        .collect()
}

/// Late-delivery rates, worst first
fn late_rates(payload: Option<&Value>, label_key: &str) -> Vec<LateRate> {
    let mut rates: Vec<LateRate> = rows(payload)
        .enumerate()
        .map(|(idx, row)| LateRate {
            label: resolve_label(row, &[label_key], &["late_count", "on_time_count", "late_rate"], idx),
            late_count: pick_number_or(row, &["late_count"], 0.0),
            on_time_count: pick_number_or(row, &["on_time_count"], 0.0),
            late_rate: pick_number_or(row, &["late_rate"], 0.0),
        })
        .collect();
    rates.sort_by(|a, b| b.late_rate.partial_cmp(&a.late_rate).unwrap_or(std::cmp::Ordering::Equal));
    rates
}

/// Weekdays arrive either as an index (0 = Sunday) or as a name
fn weekday_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(weekday_label_from_index)
            .unwrap_or_else(|| n.to_string()),
        Some(Value::String(s)) => normalize_weekday_label(s),
        _ => String::new(),
    }
}

fn numbers(value: Option<&Value>) -> Vec<f64> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default()
}

use contracts::dashboards::overview::{OverviewKpis, OverviewView, RevenueOrdersPoint};
use contracts::dashboards::{LabeledCount, LabeledValue};
use serde_json::Value;

use super::{DashboardPage, PageContext};
use crate::analytics::gauge::{gauge_reading, percent_scale};
use crate::analytics::reshape::{
    as_object, as_rows, label_text, pick_number, pick_number_or, resolve_label,
};
use crate::coordinator::{BatchResult, NamedRequest};
use crate::shared::api_utils::QueryParams;

const KPIS: &str = "kpis";
const BY_PLATFORM: &str = "by_platform";
const STATUS: &str = "status_distribution";
const REGION_AVG: &str = "macro_avg_revenue";
const TIMESERIES: &str = "revenue_with_orders";
const TOP_REGIONS: &str = "top_macros_by_orders";
const CHOROPLETH: &str = "choropleth";
const OPS_KPIS: &str = "ops_kpis";

const TOP_REGIONS_LIMIT: usize = 5;

/// Headline page: orders, revenue and delivery punctuality
pub struct OverviewPage;

impl DashboardPage for OverviewPage {
    type View = OverviewView;

    fn name(&self) -> &'static str {
        "overview"
    }

    fn requests(&self, ctx: &PageContext) -> Vec<NamedRequest> {
        let params = ctx.params();
        let path = |endpoint: &str| format!("/api/dashboard/overview/{}", endpoint);

        vec![
            NamedRequest::new(KPIS, &path("kpis"), params.clone()),
            NamedRequest::new(BY_PLATFORM, &path("by_platform"), params.clone()),
            NamedRequest::new(STATUS, &path("status_distribution"), params.clone()),
            NamedRequest::new(REGION_AVG, &path("macro_bairro_avg_receita"), params.clone()),
            NamedRequest::new(
                TIMESERIES,
                &path("timeseries_revenue_with_orders"),
                params.clone().set("freq", ctx.granularity.as_param()),
            ),
            NamedRequest::new(
                TOP_REGIONS,
                &path("top_macro_bairros_by_orders"),
                params.clone().set("top_n", TOP_REGIONS_LIMIT as i64),
            ),
            NamedRequest::new(
                CHOROPLETH,
                &path("macro_bairro_choropleth"),
                params.set("metric", "avg_receita"),
            ),
            // Punctuality is not filtered by the backend
            NamedRequest::new(OPS_KPIS, "/api/dashboard/ops/kpis", QueryParams::new()),
        ]
    }

    fn assemble(&self, ctx: &PageContext, batch: &BatchResult) -> OverviewView {
        let kpis = batch.value(KPIS).and_then(read_kpis);

        // ops/kpis wins; the overview KPI is a fallback for older backends
        let on_time = batch
            .value(OPS_KPIS)
            .and_then(as_object)
            .and_then(|obj| pick_number(obj, &["on_time_rate_pct"]))
            .or_else(|| kpis.as_ref().and_then(|k| k.on_time_rate_pct));

        let mut top_regions = labeled_counts(batch.value(TOP_REGIONS), "macro_bairro", "orders");
        top_regions.truncate(TOP_REGIONS_LIMIT);

        OverviewView {
            dataset_period: ctx.dataset_period,
            platforms: ctx.platforms.clone(),
            macro_regions: ctx.macro_regions.clone(),
            granularity: ctx.granularity,
            kpis,
            orders_by_platform: labeled_counts(batch.value(BY_PLATFORM), "platform", "orders"),
            status_distribution: labeled_counts(batch.value(STATUS), "status", "count"),
            avg_revenue_by_region: labeled_values(batch.value(REGION_AVG), "macro_bairro", "avg_receita"),
            revenue_with_orders: batch
                .value(TIMESERIES)
                .map(read_revenue_with_orders)
                .unwrap_or_default(),
            top_regions_by_orders: top_regions,
            choropleth: labeled_values(batch.value(CHOROPLETH), "macro_bairro", "value"),
            on_time_gauge: on_time.map(gauge_reading),
        }
    }
}

fn read_kpis(payload: &Value) -> Option<OverviewKpis> {
    let obj = as_object(payload)?;
    Some(OverviewKpis {
        total_orders: pick_number_or(obj, &["total_pedidos"], 0.0),
        total_revenue: pick_number_or(obj, &["receita_total"], 0.0),
        average_ticket: pick_number_or(obj, &["ticket_medio"], 0.0),
        cancelled_pct: pick_number(obj, &["cancelados_pct"]).map(percent_scale),
        orders_per_day: pick_number(obj, &["pedidos_por_dia"]),
        on_time_rate_pct: pick_number(obj, &["on_time_rate_pct"]),
    })
}

fn labeled_counts(payload: Option<&Value>, label_key: &str, count_key: &str) -> Vec<LabeledCount> {
    payload
        .map(as_rows)
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(idx, row)| LabeledCount {
            label: resolve_label(row, &[label_key], &[count_key], idx),
            count: pick_number_or(row, &[count_key], 0.0),
        })
        .collect()
}

fn labeled_values(payload: Option<&Value>, label_key: &str, value_key: &str) -> Vec<LabeledValue> {
    payload
        .map(as_rows)
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(idx, row)| LabeledValue {
            label: resolve_label(row, &[label_key], &[value_key], idx),
            value: pick_number_or(row, &[value_key], 0.0),
        })
        .collect()
}

fn read_revenue_with_orders(payload: &Value) -> Vec<RevenueOrdersPoint> {
    as_rows(payload)
        .into_iter()
        .map(|row| RevenueOrdersPoint {
            date: row.get("date").and_then(label_text).unwrap_or_default(),
            revenue: pick_number_or(row, &["receita_total"], 0.0),
            orders: pick_number_or(row, &["orders"], 0.0),
        })
        .collect()
}

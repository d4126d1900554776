use contracts::dashboards::finance::{FinanceKpis, FinanceView, RegionRevenue};
use contracts::dashboards::{DatedValue, LabeledValue};
use contracts::shared::charts::GroupTotal;
use serde_json::Value;

use super::{DashboardPage, PageContext};
use crate::analytics::reshape::{
    as_object, as_rows, label_text, pick_number, pick_number_or, resolve_label, JsonObject,
};
use crate::coordinator::{BatchResult, NamedRequest};

const KPIS: &str = "kpis";
const TIMESERIES: &str = "revenue_series";
const BY_PLATFORM: &str = "revenue_by_platform";
const BY_CLASS: &str = "revenue_by_class";
const BY_ITEM_CLASS: &str = "revenue_by_item_class";
const BY_REGION: &str = "revenue_by_region";
const TOP_CLIENTS: &str = "top_clients";

const TOP_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Column aliases across backend versions
// ---------------------------------------------------------------------------

const PLATFORM_LABELS: &[&str] = &["platform", "plataforma", "platform_col"];
const PLATFORM_NON_LABELS: &[&str] = &[
    "total",
    "total_brl",
    "revenue",
    "pct",
    "pct_col",
    "total_col",
    "receita_total",
    "receita",
    "receita_bruta",
    "receita_liquida",
    "percentual",
    "percent",
];
const PLATFORM_TOTALS: &[&str] = &[
    "receita_bruta",
    "receita_liquida",
    "total",
    "total_brl",
    "revenue",
    "total_col",
    "receita_total",
    "receita",
];
const PLATFORM_SHARES: &[&str] = &["pct", "pct_col", "percentual", "percent"];

/// Revenue breakdowns and margins
pub struct FinancePage;

impl DashboardPage for FinancePage {
    type View = FinanceView;

    fn name(&self) -> &'static str {
        "finance"
    }

    fn requests(&self, ctx: &PageContext) -> Vec<NamedRequest> {
        let params = ctx.params();
        let path = |endpoint: &str| format!("/api/dashboard/finance/{}", endpoint);

        vec![
            NamedRequest::new(KPIS, &path("kpis"), params.clone()),
            NamedRequest::new(
                TIMESERIES,
                &path("timeseries_revenue"),
                params.clone().set("freq", ctx.granularity.as_param()),
            ),
            NamedRequest::new(BY_PLATFORM, &path("revenue_by_platform"), params.clone()),
            NamedRequest::new(BY_CLASS, &path("revenue_by_class"), params.clone()),
            NamedRequest::new(BY_ITEM_CLASS, &path("revenue_by_item_class_barplot"), params.clone()),
            NamedRequest::new(
                BY_REGION,
                &path("revenue_by_macro_bairro"),
                params.clone().set("top_n", TOP_LIMIT),
            ),
            NamedRequest::new(TOP_CLIENTS, &path("top_clients"), params.set("top_n", TOP_LIMIT)),
        ]
    }

    fn assemble(&self, ctx: &PageContext, batch: &BatchResult) -> FinanceView {
        FinanceView {
            dataset_period: ctx.dataset_period,
            platforms: ctx.platforms.clone(),
            macro_regions: ctx.macro_regions.clone(),
            granularity: ctx.granularity,
            kpis: batch.value(KPIS).and_then(read_kpis),
            revenue_series: read_rows(batch.value(TIMESERIES), |_, row| DatedValue {
                date: row.get("date").and_then(label_text).unwrap_or_default(),
                value: pick_number_or(row, &["net", "gross"], 0.0),
            }),
            revenue_by_platform: read_rows(batch.value(BY_PLATFORM), platform_total),
            revenue_by_class: read_rows(batch.value(BY_CLASS), |idx, row| LabeledValue {
                label: resolve_label(row, &[], &["revenue"], idx),
                value: pick_number_or(row, &["revenue"], 0.0),
            }),
            revenue_by_item_class: read_rows(batch.value(BY_ITEM_CLASS), |idx, row| LabeledValue {
                label: resolve_label(row, &[], &["total_brl", "revenue", "total"], idx),
                value: pick_number_or(row, &["total_brl", "total", "revenue"], 0.0),
            }),
            revenue_by_region: read_rows(batch.value(BY_REGION), |idx, row| RegionRevenue {
                region: resolve_label(
                    row,
                    &[],
                    &["receita_bruta", "receita_liquida", "revenue", "total"],
                    idx,
                ),
                gross: pick_number_or(row, &["receita_bruta", "total", "revenue"], 0.0),
                net: pick_number_or(row, &["receita_liquida", "receita_bruta", "net"], 0.0),
            }),
            top_clients: read_rows(batch.value(TOP_CLIENTS), |idx, row| LabeledValue {
                label: resolve_label(row, &[], &["spent", "revenue"], idx),
                value: pick_number_or(row, &["revenue", "spent"], 0.0),
            }),
        }
    }
}

fn read_rows<T>(payload: Option<&Value>, read: impl Fn(usize, &JsonObject) -> T) -> Vec<T> {
    payload
        .map(as_rows)
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(idx, row)| read(idx, row))
        .collect()
}

fn read_kpis(payload: &Value) -> Option<FinanceKpis> {
    let obj = as_object(payload)?;
    Some(FinanceKpis {
        gross_revenue: pick_number_or(obj, &["receita_total"], 0.0),
        net_revenue: pick_number_or(obj, &["receita_liquida"], 0.0),
        margin: pick_number_or(obj, &["margem_total", "receita_liquida"], 0.0),
        average_ticket: pick_number_or(obj, &["ticket_medio"], 0.0),
        orders: pick_number_or(obj, &["total_pedidos", "pedidos"], 0.0),
    })
}

/// Platform revenue row; a non-positive share is treated as unknown
fn platform_total(idx: usize, row: &JsonObject) -> GroupTotal {
    GroupTotal {
        key: resolve_label(row, PLATFORM_LABELS, PLATFORM_NON_LABELS, idx),
        total: pick_number_or(row, PLATFORM_TOTALS, 0.0),
        share_pct: pick_number(row, PLATFORM_SHARES).filter(|pct| *pct > 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::testing::FakeFetcher;
    use crate::coordinator::PageStore;
    use crate::dashboards::refresh;
    use contracts::shared::batch::{BatchStatus, Settled};
    use contracts::shared::filters::{FilterCriteria, NumericRange};
    use contracts::shared::orders::NumericField;
    use serde_json::json;

    fn batch(entries: Vec<(&str, Value)>) -> BatchResult {
        BatchResult::from_entries(
            entries
                .into_iter()
                .map(|(name, value)| (name.to_string(), Settled::Ok { value }))
                .collect(),
        )
    }

    #[test]
    fn test_kpi_aliases() {
        let view = FinancePage.assemble(
            &PageContext::default(),
            &batch(vec![(
                KPIS,
                json!({"data": {"receita_total": 1000.0, "receita_liquida": 800.0, "pedidos": 25}}),
            )]),
        );
        assert_eq!(
            view.kpis,
            Some(FinanceKpis {
                gross_revenue: 1000.0,
                net_revenue: 800.0,
                margin: 800.0,
                average_ticket: 0.0,
                orders: 25.0,
            })
        );
    }

    #[test]
    fn test_platform_rows_with_varying_shapes() {
        let view = FinancePage.assemble(
            &PageContext::default(),
            &batch(vec![(
                BY_PLATFORM,
                json!([
                    {"plataforma": "iFood", "receita_bruta": 700.0, "pct": 70.0},
                    {"total_brl": 300.0, "canal": "Rappi", "pct": 0},
                    {"total": 5.0}
                ]),
            )]),
        );
        assert_eq!(
            view.revenue_by_platform,
            vec![
                GroupTotal {
                    key: "iFood".into(),
                    total: 700.0,
                    share_pct: Some(70.0)
                },
                GroupTotal {
                    key: "Rappi".into(),
                    total: 300.0,
                    share_pct: None
                },
                GroupTotal {
                    key: "Category 3".into(),
                    total: 5.0,
                    share_pct: None
                },
            ]
        );
    }

    #[test]
    fn test_breakdowns_resolve_labels_by_position() {
        let view = FinancePage.assemble(
            &PageContext::default(),
            &batch(vec![
                (TIMESERIES, json!([{"date": "2024-01", "gross": 10.0}, {"date": "2024-02", "net": 7.0, "gross": 9.0}])),
                (BY_CLASS, json!([{"revenue": 50.0, "classe": "premium"}])),
                (BY_ITEM_CLASS, json!([{"item_class": "bebida", "total": 12.0}])),
                (BY_REGION, json!([{"macro_bairro": "Centro", "receita_bruta": 100.0}])),
                (TOP_CLIENTS, json!([{"client": "Ana", "spent": 90.0}])),
            ]),
        );

        assert_eq!(view.revenue_series[0].value, 10.0);
        assert_eq!(view.revenue_series[1].value, 7.0);
        assert_eq!(view.revenue_by_class[0].label, "premium");
        assert_eq!(view.revenue_by_item_class[0].value, 12.0);
        assert_eq!(
            view.revenue_by_region[0],
            RegionRevenue {
                region: "Centro".into(),
                gross: 100.0,
                net: 100.0
            }
        );
        assert_eq!(view.top_clients[0].value, 90.0);
    }

    #[tokio::test]
    async fn test_score_filter_and_top_n_are_sent() {
        let fetcher = FakeFetcher::new()
            .respond("/api/dashboard/finance/kpis", json!({"receita_total": 1.0}))
            .respond("/api/dashboard/finance/top_clients", json!({"data": []}));
        let store = PageStore::new();
        let criteria = FilterCriteria::default()
            .with_range(NumericField::SatisfactionLevel, NumericRange::exactly(5.0));

        let report = refresh(&FinancePage, &fetcher, &store, &criteria).await;
        assert_eq!(report.status, BatchStatus::PartialOk);

        let params = fetcher.params_for("/api/dashboard/finance/top_clients").unwrap();
        assert_eq!(params.get("score_min").as_deref(), Some("5"));
        assert_eq!(params.get("top_n").as_deref(), Some("10"));
        // no dataset period resolved, so no date bounds and monthly buckets
        let series = fetcher.params_for("/api/dashboard/finance/timeseries_revenue").unwrap();
        assert_eq!(series.get("start_date"), None);
        assert_eq!(series.get("freq").as_deref(), Some("M"));

        let view = store.snapshot().view;
        assert_eq!(view.kpis.map(|k| k.gross_revenue), Some(1.0));
        assert!(view.revenue_by_platform.is_empty());
    }
}

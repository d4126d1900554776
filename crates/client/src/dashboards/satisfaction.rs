use chrono::{Duration, NaiveDate};
use contracts::dashboards::satisfaction::{SatisfactionKpis, SatisfactionView};
use contracts::dashboards::{DatedValue, LabeledValue};
use contracts::shared::charts::ScatterPoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DashboardPage, PageContext};
use crate::analytics::reshape::{as_object, as_rows, label_text, pick_number, pick_number_or, resolve_label};
use crate::coordinator::{BatchResult, NamedRequest};
use crate::shared::api_utils::QueryParams;
use crate::shared::date_utils::parse_datetime;

const KPIS: &str = "kpis";
const BY_REGION: &str = "by_macro_bairro";
const SCATTER: &str = "delivery_vs_score";
const TIMESERIES: &str = "timeseries";
const BY_PLATFORM: &str = "by_platform";

const SCORE_COLUMN: &str = "satisfacao_nivel";

/// Deliveries slower than this many minutes count as late
pub const LATE_THRESHOLD_MINUTES: f64 = 30.0;

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Customer satisfaction page. Filtering happens on the loaded data with
/// [`SatisfactionFilters`], so the page fetches unfiltered aggregates.
pub struct SatisfactionPage;

impl DashboardPage for SatisfactionPage {
    type View = SatisfactionView;

    fn name(&self) -> &'static str {
        "satisfaction"
    }

    fn uses_context(&self) -> bool {
        false
    }

    fn requests(&self, _ctx: &PageContext) -> Vec<NamedRequest> {
        let path = |endpoint: &str| format!("/api/dashboard/satisfaction/{}", endpoint);
        let scored = QueryParams::new().set("score_col", SCORE_COLUMN);

        vec![
            NamedRequest::new(KPIS, &path("kpis"), QueryParams::new()),
            NamedRequest::new(
                BY_REGION,
                &path("by_macro_bairro"),
                scored.clone().set("macro_col", "macro_bairro"),
            ),
            NamedRequest::new(
                SCATTER,
                &path("scatter_time_vs_score"),
                scored.clone().set("delivery_col", "actual_delivery_minutes"),
            ),
            NamedRequest::new(
                TIMESERIES,
                &path("timeseries"),
                scored.clone().set("date_col", "order_date").set("freq", "M"),
            ),
            NamedRequest::new(
                BY_PLATFORM,
                &path("heatmap_platform"),
                scored.set("platform_col", "platform"),
            ),
        ]
    }

    fn assemble(&self, _ctx: &PageContext, batch: &BatchResult) -> SatisfactionView {
        let by_region = averages(batch.value(BY_REGION), "macro_bairro");
        let by_platform = averages(batch.value(BY_PLATFORM), "platform");

        SatisfactionView {
            kpis: batch.value(KPIS).and_then(|payload| {
                let obj = as_object(payload)?;
                Some(SatisfactionKpis {
                    average_score: pick_number_or(obj, &["nivel_medio"], 0.0),
                    very_satisfied_pct: pick_number_or(obj, &["%_muito_satisfeitos"], 0.0),
                })
            }),
            delivery_vs_score: batch
                .value(SCATTER)
                .map(as_rows)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|row| {
                    Some(ScatterPoint {
                        x: pick_number(row, &["delivery_minutes"])?,
                        y: pick_number(row, &["satisfacao"])?,
                    })
                })
                .collect(),
            timeseries: batch
                .value(TIMESERIES)
                .map(as_rows)
                .unwrap_or_default()
                .into_iter()
                .map(|row| DatedValue {
                    date: row.get("date").and_then(label_text).unwrap_or_default(),
                    value: pick_number_or(row, &["avg_satisfacao"], 0.0),
                })
                .collect(),
            platforms: distinct_labels(&by_platform),
            macro_regions: distinct_labels(&by_region),
            by_region,
            by_platform,
        }
    }
}

fn averages(payload: Option<&Value>, label_key: &str) -> Vec<LabeledValue> {
    payload
        .map(as_rows)
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(idx, row)| LabeledValue {
            label: resolve_label(row, &[label_key], &["avg_satisfacao"], idx),
            value: pick_number_or(row, &["avg_satisfacao"], 0.0),
        })
        .collect()
}

fn distinct_labels(values: &[LabeledValue]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for value in values {
        if !labels.contains(&value.label) {
            labels.push(value.label.clone());
        }
    }
    labels
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    All,
    /// Delivery time above [`LATE_THRESHOLD_MINUTES`]
    Late,
    OnTime,
}

/// Filters applied to an already loaded [`SatisfactionView`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionFilters {
    /// Scatter points whose rounded score equals this value
    pub score: Option<u8>,
    /// Trailing window for the time series; `None` keeps all points.
    /// Points are dated by day (`YYYY-MM-DD`) or month (`YYYY-MM`).
    pub window_days: Option<i64>,
    pub platform: Option<String>,
    pub macro_region: Option<String>,
    pub delivery_status: DeliveryStatus,
}

impl Default for SatisfactionFilters {
    fn default() -> Self {
        Self {
            score: None,
            window_days: Some(DEFAULT_WINDOW_DAYS),
            platform: None,
            macro_region: None,
            delivery_status: DeliveryStatus::All,
        }
    }
}

impl SatisfactionFilters {
    /// Filtered copy of `view`. `today` anchors the trailing window.
    ///
    /// KPIs and filter options are left untouched.
    pub fn apply(&self, view: &SatisfactionView, today: NaiveDate) -> SatisfactionView {
        // A window reaching past the calendar's range keeps every point
        let cutoff = self
            .window_days
            .and_then(Duration::try_days)
            .and_then(|window| today.checked_sub_signed(window));

        SatisfactionView {
            kpis: view.kpis.clone(),
            timeseries: view
                .timeseries
                .iter()
                .filter(|point| match cutoff {
                    None => true,
                    Some(cutoff) => parse_datetime(&point.date).is_some_and(|at| at.date() >= cutoff),
                })
                .cloned()
                .collect(),
            delivery_vs_score: view
                .delivery_vs_score
                .iter()
                .filter(|point| self.score.map_or(true, |score| point.y.round() == score as f64))
                .filter(|point| match self.delivery_status {
                    DeliveryStatus::All => true,
                    DeliveryStatus::Late => point.x > LATE_THRESHOLD_MINUTES,
                    DeliveryStatus::OnTime => point.x <= LATE_THRESHOLD_MINUTES,
                })
                .copied()
                .collect(),
            by_region: only_label(&view.by_region, self.macro_region.as_deref()),
            by_platform: only_label(&view.by_platform, self.platform.as_deref()),
            platforms: view.platforms.clone(),
            macro_regions: view.macro_regions.clone(),
        }
    }
}

fn only_label(values: &[LabeledValue], wanted: Option<&str>) -> Vec<LabeledValue> {
    values
        .iter()
        .filter(|v| wanted.map_or(true, |w| v.label == w))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::testing::FakeFetcher;
    use crate::coordinator::PageStore;
    use crate::dashboards::refresh;
    use contracts::shared::batch::{BatchStatus, LoadState};
    use contracts::shared::filters::FilterCriteria;
    use serde_json::json;

    fn backend() -> FakeFetcher {
        FakeFetcher::new()
            .respond(
                "/api/dashboard/satisfaction/kpis",
                json!({"nivel_medio": 4.1, "%_muito_satisfeitos": 48.0}),
            )
            .respond(
                "/api/dashboard/satisfaction/by_macro_bairro",
                json!({"data": [{"macro_bairro": "Centro", "avg_satisfacao": 4.3}, {"macro_bairro": "Norte", "avg_satisfacao": 3.6}]}),
            )
            .fail("/api/dashboard/satisfaction/scatter_time_vs_score", 400)
            .respond(
                "/api/dashboard/satisfaction/timeseries",
                json!({"data": [{"date": "2024-01-31", "avg_satisfacao": 4.0}, {"date": "2024-03-31", "avg_satisfacao": 4.2}]}),
            )
            .respond(
                "/api/dashboard/satisfaction/heatmap_platform",
                json!({"data": [{"platform": "iFood", "avg_satisfacao": 4.4}, {"platform": "iFood", "avg_satisfacao": 4.0}]}),
            )
    }

    fn view() -> SatisfactionView {
        SatisfactionView {
            delivery_vs_score: vec![
                ScatterPoint { x: 20.0, y: 4.6 },
                ScatterPoint { x: 45.0, y: 2.0 },
                ScatterPoint { x: 30.0, y: 5.0 },
            ],
            timeseries: vec![
                DatedValue {
                    date: "2024-02-05".into(),
                    value: 4.0,
                },
                DatedValue {
                    date: "2024-03-05".into(),
                    value: 4.5,
                },
                DatedValue {
                    date: "bad".into(),
                    value: 1.0,
                },
            ],
            by_region: vec![
                LabeledValue {
                    label: "Centro".into(),
                    value: 4.3,
                },
                LabeledValue {
                    label: "Norte".into(),
                    value: 3.6,
                },
            ],
            ..SatisfactionView::default()
        }
    }

    #[tokio::test]
    async fn test_failed_panel_does_not_blank_the_page() {
        let fetcher = backend();
        let store = PageStore::new();
        let report = refresh(&SatisfactionPage, &fetcher, &store, &FilterCriteria::default()).await;

        assert_eq!(report.status, BatchStatus::PartialOk);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.state, LoadState::Succeeded { partial: true });
        assert_eq!(snapshot.error, None);

        let view = snapshot.view;
        assert_eq!(view.kpis.map(|k| k.very_satisfied_pct), Some(48.0));
        assert!(view.delivery_vs_score.is_empty());
        assert_eq!(view.timeseries.len(), 2);
        assert_eq!(view.platforms, vec!["iFood"]);
        assert_eq!(view.macro_regions, vec!["Centro", "Norte"]);

        let series = fetcher.params_for("/api/dashboard/satisfaction/timeseries").unwrap();
        assert_eq!(series.get("freq").as_deref(), Some("M"));
        assert_eq!(series.get("score_col").as_deref(), Some("satisfacao_nivel"));
    }

    #[test]
    fn test_default_filters_keep_last_thirty_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let filtered = SatisfactionFilters::default().apply(&view(), today);

        assert_eq!(filtered.timeseries.len(), 1);
        assert_eq!(filtered.timeseries[0].date, "2024-03-05");
        assert_eq!(filtered.delivery_vs_score.len(), 3);
        assert_eq!(filtered.by_region.len(), 2);
    }

    #[test]
    fn test_month_keyed_points_use_first_day_of_month() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let monthly = SatisfactionView {
            timeseries: vec![
                DatedValue {
                    date: "2024-01".into(),
                    value: 3.9,
                },
                DatedValue {
                    date: "2024-03".into(),
                    value: 4.2,
                },
            ],
            ..SatisfactionView::default()
        };

        let filtered = SatisfactionFilters::default().apply(&monthly, today);
        assert_eq!(filtered.timeseries.len(), 1);
        assert_eq!(filtered.timeseries[0].date, "2024-03");
    }

    #[test]
    fn test_oversized_window_keeps_everything() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        for days in [200_000_000, i64::MAX] {
            let filters = SatisfactionFilters {
                window_days: Some(days),
                ..SatisfactionFilters::default()
            };
            assert_eq!(filters.apply(&view(), today).timeseries.len(), 3);
        }
    }

    #[test]
    fn test_score_and_delivery_status_filters() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let filters = SatisfactionFilters {
            score: Some(5),
            window_days: None,
            delivery_status: DeliveryStatus::OnTime,
            macro_region: Some("Norte".into()),
            ..SatisfactionFilters::default()
        };
        let filtered = filters.apply(&view(), today);

        // 4.6 rounds to 5; 30 minutes is still on time
        assert_eq!(
            filtered.delivery_vs_score,
            vec![ScatterPoint { x: 20.0, y: 4.6 }, ScatterPoint { x: 30.0, y: 5.0 }]
        );
        assert_eq!(filtered.timeseries.len(), 3);
        assert_eq!(filtered.by_region.len(), 1);

        let late = SatisfactionFilters {
            delivery_status: DeliveryStatus::Late,
            window_days: None,
            ..SatisfactionFilters::default()
        }
        .apply(&view(), today);
        assert_eq!(late.delivery_vs_score, vec![ScatterPoint { x: 45.0, y: 2.0 }]);
    }
}

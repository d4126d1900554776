//! Dashboard page loaders.
//!
//! A refresh runs in two phases. Phase 1 resolves the shared context (dataset
//! period, filter options) and derives the time-series granularity from the
//! effective date range. Phase 2 fires the page's own batch with the resolved
//! filters. The result is offered to the page's [`PageStore`] under the
//! generation taken when the refresh started.

pub mod finance;
pub mod local;
pub mod ops;
pub mod overview;
pub mod satisfaction;

use contracts::dashboards::DatasetPeriod;
use contracts::shared::batch::{BatchStatus, Settled};
use contracts::shared::charts::Granularity;
use contracts::shared::filters::FilterCriteria;
use contracts::shared::orders::NumericField;
use serde::Serialize;
use serde_json::Value;

use crate::analytics::reshape::{as_object, string_list};
use crate::analytics::temporal::granularity_for_range;
use crate::coordinator::{run_batch, BatchResult, Generation, NamedRequest, PageStore, PageUpdate};
use crate::shared::api_client::AggregateFetcher;
use crate::shared::api_utils::QueryParams;
use crate::shared::date_utils::{format_datetime, format_iso_date, parse_datetime, start_of_day};

pub use finance::FinancePage;
pub use ops::OpsPage;
pub use overview::OverviewPage;
pub use satisfaction::SatisfactionPage;

const CONTEXT_PERIOD: &str = "context_period";
const CONTEXT_PLATFORMS: &str = "context_platforms";
const CONTEXT_MACROS: &str = "context_macros";

/// Inputs shared by every phase-2 request of a page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContext {
    /// Criteria with open date bounds filled from the dataset period
    pub criteria: FilterCriteria,
    pub granularity: Granularity,
    pub dataset_period: Option<DatasetPeriod>,
    pub platforms: Vec<String>,
    pub macro_regions: Vec<String>,
}

impl PageContext {
    /// Context for pages that skip phase 1
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            granularity: granularity_for_range(criteria.date_from, criteria.date_to),
            criteria: criteria.clone(),
            ..Self::default()
        }
    }

    /// Backend filter parameters of the resolved criteria
    pub fn params(&self) -> QueryParams {
        criteria_params(&self.criteria)
    }
}

/// A dashboard page: which aggregates it needs and how it reads them
pub trait DashboardPage: Send + Sync {
    type View: Clone + Default + Serialize + Send;

    fn name(&self) -> &'static str;

    /// Whether the page runs phase 1 before its own batch
    fn uses_context(&self) -> bool {
        true
    }

    fn requests(&self, ctx: &PageContext) -> Vec<NamedRequest>;

    /// Build the view from a settled batch. Failed requests leave their
    /// panels empty.
    fn assemble(&self, ctx: &PageContext, batch: &BatchResult) -> Self::View;
}

/// Outcome of one [`refresh`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub generation: Generation,
    /// `false` when a newer refresh or an unmount made this one stale
    pub applied: bool,
    pub status: BatchStatus,
}

/// Query parameters for `criteria`. Unset criteria are not sent.
pub fn criteria_params(criteria: &FilterCriteria) -> QueryParams {
    let mut params = QueryParams::new()
        .set_opt("start_date", criteria.date_from.as_ref().map(format_iso_date))
        .set_opt("end_date", criteria.date_to.as_ref().map(format_iso_date));

    for (field, value) in &criteria.equals {
        params = params.set(field.source_key(), value.as_str());
    }

    if let Some(range) = criteria.ranges.get(&NumericField::SatisfactionLevel) {
        params = params
            .set_opt("score_min", range.min)
            .set_opt("score_max", range.max);
    }

    params
}

fn dataset_period(payload: &Value) -> Option<DatasetPeriod> {
    let periodo = as_object(payload)?.get("periodo")?;
    let min = parse_datetime(periodo.get("min")?.as_str()?)?;
    let max = parse_datetime(periodo.get("max")?.as_str()?)?;
    Some(DatasetPeriod { min, max })
}

/// Phase 1: dataset period and filter options, fetched without filters.
///
/// Open date bounds default to the dataset period (whole days), and the
/// granularity is derived from the resulting range.
pub async fn resolve_context(
    fetcher: &dyn AggregateFetcher,
    criteria: &FilterCriteria,
) -> (PageContext, BatchResult) {
    let batch = run_batch(
        fetcher,
        vec![
            NamedRequest::new(CONTEXT_PERIOD, "/api/dashboard/overview/kpis", QueryParams::new()),
            NamedRequest::new(CONTEXT_PLATFORMS, "/api/dashboard/meta/platforms", QueryParams::new()),
            NamedRequest::new(CONTEXT_MACROS, "/api/dashboard/meta/macros", QueryParams::new()),
        ],
    )
    .await;

    let period = batch.value(CONTEXT_PERIOD).and_then(dataset_period);

    let mut resolved = criteria.clone();
    if let Some(period) = period {
        tracing::debug!(
            "Dataset period {} to {}",
            format_datetime(&period.min),
            format_datetime(&period.max)
        );
        if resolved.date_from.is_none() {
            resolved.date_from = Some(start_of_day(period.min.date()));
        }
        if resolved.date_to.is_none() {
            resolved.date_to = Some(start_of_day(period.max.date()));
        }
    }

    let ctx = PageContext {
        granularity: granularity_for_range(resolved.date_from, resolved.date_to),
        criteria: resolved,
        dataset_period: period,
        platforms: batch.value(CONTEXT_PLATFORMS).map(string_list).unwrap_or_default(),
        macro_regions: batch.value(CONTEXT_MACROS).map(string_list).unwrap_or_default(),
    };
    (ctx, batch)
}

/// Message shown when nothing could be loaded
fn blocking_message(batch: &BatchResult) -> String {
    let errors: Vec<(&str, Option<u16>)> = batch
        .iter()
        .filter_map(|(_, outcome)| match outcome {
            Settled::Error { reason, http_status } => Some((reason.as_str(), *http_status)),
            Settled::Ok { .. } => None,
        })
        .collect();

    if errors.iter().any(|(_, status)| *status == Some(400)) {
        return "A requested column does not exist. Check the query parameters.".to_string();
    }
    match errors.first() {
        Some((reason, _)) => format!("Failed to load dashboard data: {}", reason),
        None => "Failed to load dashboard data".to_string(),
    }
}

/// Run both phases for `page` and commit the view if still current
pub async fn refresh<P: DashboardPage>(
    page: &P,
    fetcher: &dyn AggregateFetcher,
    store: &PageStore<P::View>,
    criteria: &FilterCriteria,
) -> RefreshReport {
    let generation = store.begin();
    if !store.is_mounted() {
        tracing::debug!("Skipping refresh of unmounted {} page", page.name());
        return RefreshReport {
            generation,
            applied: false,
            status: BatchStatus::Empty,
        };
    }
    tracing::info!("Refreshing {} (generation {})", page.name(), generation.0);

    let (ctx, context_batch) = if page.uses_context() {
        resolve_context(fetcher, criteria).await
    } else {
        (PageContext::from_criteria(criteria), BatchResult::default())
    };

    let page_batch = run_batch(fetcher, page.requests(&ctx)).await;
    let view = page.assemble(&ctx, &page_batch);

    let combined = context_batch.merge(page_batch);
    let status = combined.status();
    let error = (status == BatchStatus::AllRejected).then(|| blocking_message(&combined));
    let failed_panels = combined.failed().into_iter().map(String::from).collect();

    let applied = store.commit(
        generation,
        PageUpdate {
            view,
            status,
            failed_panels,
            error,
        },
    );

    RefreshReport {
        generation,
        applied,
        status,
    }
}

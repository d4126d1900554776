use anyhow::Context;
use clap::{Args, ValueEnum};
use contracts::shared::batch::BatchStatus;
use contracts::shared::filters::FilterCriteria;
use dashboard_client::coordinator::{PageSnapshot, PageStore};
use dashboard_client::dashboards::satisfaction::{DeliveryStatus, SatisfactionFilters};
use dashboard_client::dashboards::{
    refresh, DashboardPage, FinancePage, OpsPage, OverviewPage, SatisfactionPage,
};
use dashboard_client::shared::api_client::HttpFetcher;
use dashboard_client::shared::format::{format_percent, format_score};

use super::{print_json, FilterArgs};
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageName {
    Overview,
    Finance,
    Ops,
    Satisfaction,
}

impl PageName {
    /// Filter flags that are set but have no effect on this page.
    ///
    /// Ops fetches unfiltered aggregates; satisfaction applies only the
    /// platform and region filters, to the loaded view.
    fn unsupported_flags(self, filters: &FilterArgs) -> Vec<&'static str> {
        let set = [
            ("--from", filters.from.is_some()),
            ("--to", filters.to.is_some()),
            ("--platform", filters.platform.is_some()),
            ("--macro-region", filters.macro_region.is_some()),
            ("--status", filters.status.is_some()),
            ("--score-min", filters.score_min.is_some()),
            ("--score-max", filters.score_max.is_some()),
        ];
        let view_level = ["--platform", "--macro-region"];

        set.into_iter()
            .filter(|(_, present)| *present)
            .map(|(flag, _)| flag)
            .filter(|flag| match self {
                PageName::Overview | PageName::Finance => false,
                PageName::Ops => true,
                PageName::Satisfaction => !view_level.contains(flag),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeliveryArg {
    All,
    Late,
    OnTime,
}

impl From<DeliveryArg> for DeliveryStatus {
    fn from(value: DeliveryArg) -> Self {
        match value {
            DeliveryArg::All => DeliveryStatus::All,
            DeliveryArg::Late => DeliveryStatus::Late,
            DeliveryArg::OnTime => DeliveryStatus::OnTime,
        }
    }
}

/// View-level filters of the satisfaction page
#[derive(Debug, Clone, Args)]
pub struct SatisfactionArgs {
    /// Keep scatter points whose rounded score equals this value
    #[arg(long)]
    pub score: Option<u8>,

    /// Trailing window of the time series, in days
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i64).range(0..=36_500))]
    pub window_days: i64,

    /// Keep the whole time series instead of the trailing window
    #[arg(long, conflicts_with = "window_days")]
    pub all_history: bool,

    #[arg(long, value_enum, default_value_t = DeliveryArg::All)]
    pub delivery: DeliveryArg,
}

impl SatisfactionArgs {
    fn view_filters(&self, filters: &FilterArgs) -> SatisfactionFilters {
        SatisfactionFilters {
            score: self.score,
            window_days: (!self.all_history).then_some(self.window_days),
            platform: filters.platform.clone(),
            macro_region: filters.macro_region.clone(),
            delivery_status: self.delivery.into(),
        }
    }
}

/// Load one dashboard page from the API and print its snapshot as JSON
pub async fn execute(
    config: &Config,
    name: PageName,
    filters: &FilterArgs,
    satisfaction: &SatisfactionArgs,
) -> anyhow::Result<()> {
    let unsupported = name.unsupported_flags(filters);
    if !unsupported.is_empty() {
        anyhow::bail!(
            "{} not supported by the {:?} page",
            unsupported.join(", "),
            name
        );
    }

    let criteria = filters.to_criteria()?;
    let fetcher = HttpFetcher::new(config.api.clone())
        .with_context(|| format!("Cannot reach API at {}", config.api.base_url))?;

    match name {
        PageName::Overview => print_json(&load(&OverviewPage, &fetcher, &criteria).await?),
        PageName::Finance => print_json(&load(&FinancePage, &fetcher, &criteria).await?),
        PageName::Ops => print_json(&load(&OpsPage, &fetcher, &criteria).await?),
        PageName::Satisfaction => {
            let mut snapshot = load(&SatisfactionPage, &fetcher, &criteria).await?;
            let today = chrono::Local::now().date_naive();
            snapshot.view = satisfaction.view_filters(filters).apply(&snapshot.view, today);
            if let Some(kpis) = &snapshot.view.kpis {
                tracing::info!(
                    "Average satisfaction {}, very satisfied {}",
                    format_score(Some(kpis.average_score)),
                    format_percent(Some(kpis.very_satisfied_pct))
                );
            }
            print_json(&snapshot)
        }
    }
}

async fn load<P: DashboardPage>(
    page: &P,
    fetcher: &HttpFetcher,
    criteria: &FilterCriteria,
) -> anyhow::Result<PageSnapshot<P::View>> {
    let store = PageStore::new();
    let report = refresh(page, fetcher, &store, criteria).await;
    let snapshot = store.snapshot();

    match report.status {
        BatchStatus::AllRejected => {
            let message = snapshot.error.unwrap_or_else(|| "Failed to load dashboard data".into());
            anyhow::bail!("{} page: {}", page.name(), message);
        }
        BatchStatus::PartialOk => {
            tracing::warn!(
                "{} page loaded with failed panels: {}",
                page.name(),
                snapshot.failed_panels.join(", ")
            );
        }
        BatchStatus::AllOk | BatchStatus::Empty => {}
    }

    Ok(snapshot)
}

use std::path::Path;

use anyhow::Context;
use dashboard_client::dashboards::local::summarize_records;
use dashboard_client::shared::excel_importer::read_csv_file;
use dashboard_client::shared::format::{format_brl, format_minutes, format_percent};

use super::{print_json, FilterArgs};

/// Summarize a local CSV export of orders and print the result as JSON
pub fn execute(path: &Path, filters: &FilterArgs) -> anyhow::Result<()> {
    let criteria = filters.to_criteria()?;
    let sheet = read_csv_file(path).with_context(|| format!("Failed to import {}", path.display()))?;

    tracing::info!(
        "Imported {} rows with {} columns from {}",
        sheet.metadata.row_count,
        sheet.metadata.columns.len(),
        sheet.metadata.file_name
    );

    let summary = summarize_records(&sheet.records, &criteria);
    let revenue: f64 = summary.revenue_by_day.iter().map(|bucket| bucket.sum).sum();
    let median_delivery = (summary.filtered_rows > 0)
        .then(|| summary.delivery_percentiles.iter().find(|p| p.p == 50.0))
        .flatten()
        .map(|p| p.value);
    tracing::info!(
        "{} of {} rows match the filters, revenue {}, median delivery {}, on time {}",
        summary.filtered_rows,
        summary.total_rows,
        format_brl(revenue),
        format_minutes(median_delivery),
        format_percent(summary.on_time_gauge.as_ref().map(|gauge| gauge.value))
    );

    print_json(&summary)
}

use std::path::Path;

use anyhow::Context;
use contracts::shared::orders::CanonicalRow;
use dashboard_client::analytics::filter::apply;
use dashboard_client::analytics::normalizer::normalize_all;
use dashboard_client::shared::excel_importer::read_csv_file;
use dashboard_client::shared::export::{records_to_csv, to_exportable_rows, write_csv_file};

use super::FilterArgs;

/// Normalize and filter a CSV of orders, then write it back in export layout
pub fn execute(input: &Path, output: &Path, filters: &FilterArgs) -> anyhow::Result<()> {
    let criteria = filters.to_criteria()?;
    let sheet = read_csv_file(input).with_context(|| format!("Failed to import {}", input.display()))?;

    let rows = apply(&normalize_all(&sheet.records), &criteria);
    let content = render(&rows).with_context(|| format!("Nothing to export from {}", input.display()))?;
    write_csv_file(output, &content)?;

    tracing::info!("Exported {} rows to {}", rows.len(), output.display());
    Ok(())
}

fn render(rows: &[CanonicalRow]) -> anyhow::Result<String> {
    Ok(records_to_csv(&to_exportable_rows(rows))?)
}

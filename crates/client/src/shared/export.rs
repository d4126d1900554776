//! Export of order rows and chart data to spreadsheet-friendly CSV
//!
//! Output uses `;` as separator and starts with a UTF-8 BOM so that Excel
//! opens accented text correctly.

use std::path::Path;

use contracts::shared::charts::{GroupCount, GroupMean, PercentileValue, TimeBucket};
use contracts::shared::export::{FlatRecord, FlatValue};
use contracts::shared::orders::{CanonicalRow, CategoricalField, NumericField, ORDER_DATETIME_KEY};
use serde_json::Value;
use thiserror::Error;

const SEPARATOR: u8 = b';';
const BOM: &str = "\u{FEFF}";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to export")]
    Empty,

    #[error("Failed to render CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Types that can be written as CSV rows with a fixed header
pub trait ExcelExportable {
    fn headers() -> Vec<&'static str>;

    fn to_csv_row(&self) -> Vec<String>;
}

impl ExcelExportable for GroupMean {
    fn headers() -> Vec<&'static str> {
        vec!["key", "mean", "count"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![self.key.clone(), self.mean.to_string(), self.count.to_string()]
    }
}

impl ExcelExportable for GroupCount {
    fn headers() -> Vec<&'static str> {
        vec!["key", "count"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![self.key.clone(), self.count.to_string()]
    }
}

impl ExcelExportable for TimeBucket {
    fn headers() -> Vec<&'static str> {
        vec!["period", "count", "sum"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![self.key.clone(), self.count.to_string(), self.sum.to_string()]
    }
}

impl ExcelExportable for PercentileValue {
    fn headers() -> Vec<&'static str> {
        vec!["percentile", "value"]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![self.p.to_string(), self.value.to_string()]
    }
}

/// Render typed chart rows as CSV text
pub fn export_to_csv<T: ExcelExportable>(data: &[T]) -> Result<String, ExportError> {
    if data.is_empty() {
        return Err(ExportError::Empty);
    }

    let headers: Vec<String> = T::headers().into_iter().map(String::from).collect();
    let rows = data.iter().map(|item| item.to_csv_row());
    render_csv(&headers, rows)
}

/// Flatten canonical rows for export.
///
/// Known columns come first under their source names (timestamp, categorical
/// fields, numeric fields), followed by passthrough columns in key order.
pub fn to_exportable_rows(rows: &[CanonicalRow]) -> Vec<FlatRecord> {
    rows.iter().map(flatten_row).collect()
}

fn flatten_row(row: &CanonicalRow) -> FlatRecord {
    let mut record = FlatRecord::default();

    let timestamp = row
        .order_datetime
        .map(|dt| FlatValue::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
        .unwrap_or(FlatValue::Empty);
    record.push(ORDER_DATETIME_KEY, timestamp);

    for field in CategoricalField::ALL {
        let value = row
            .category(field)
            .map(|s| FlatValue::Text(s.to_string()))
            .unwrap_or(FlatValue::Empty);
        record.push(field.source_key(), value);
    }

    for field in NumericField::ALL {
        let value = row.numeric(field).map(FlatValue::Number).unwrap_or(FlatValue::Empty);
        record.push(field.source_key(), value);
    }

    for (key, value) in &row.extra {
        record.push(key.clone(), flat_value(value));
    }

    record
}

fn flat_value(value: &Value) -> FlatValue {
    match value {
        Value::Null => FlatValue::Empty,
        Value::Number(n) => n.as_f64().map(FlatValue::Number).unwrap_or(FlatValue::Empty),
        Value::String(s) => FlatValue::Text(s.clone()),
        Value::Bool(b) => FlatValue::Text(b.to_string()),
        other => FlatValue::Text(other.to_string()),
    }
}

/// Render flat records as CSV text.
///
/// The header is the union of all columns in first-seen order; a record
/// without a column gets an empty cell.
pub fn records_to_csv(records: &[FlatRecord]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for column in record.columns() {
            if !headers.iter().any(|h| h == column) {
                headers.push(column.to_string());
            }
        }
    }

    let rows = records.iter().map(|record| {
        headers
            .iter()
            .map(|h| record.get(h).map(FlatValue::to_cell).unwrap_or_default())
            .collect::<Vec<_>>()
    });
    render_csv(&headers, rows)
}

pub fn write_csv_file(path: &Path, content: &str) -> Result<(), ExportError> {
    std::fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// `;`-separated text behind a UTF-8 BOM. Cells holding the separator,
/// quotes or line breaks are quoted.
fn render_csv(
    headers: &[String],
    rows: impl Iterator<Item = Vec<String>>,
) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(SEPARATOR)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(BOM.as_bytes().to_vec());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_row() -> CanonicalRow {
        let mut row = CanonicalRow::default()
            .with_datetime(
                NaiveDate::from_ymd_opt(2024, 3, 15)
                    .unwrap()
                    .and_hms_opt(14, 2, 26)
                    .unwrap(),
            )
            .with_category(CategoricalField::Platform, "iFood")
            .with_numeric(NumericField::TotalBrl, 42.5);
        row.extra.insert("zeta".to_string(), json!("last"));
        row.extra.insert("alpha".to_string(), json!(true));
        row
    }

    #[test]
    fn test_known_columns_first_then_extras_sorted() {
        let records = to_exportable_rows(&[sample_row()]);
        let columns: Vec<&str> = records[0].columns().collect();

        assert_eq!(columns[0], "order_datetime");
        assert_eq!(columns[1], "macro_bairro");
        assert_eq!(&columns[columns.len() - 2..], &["alpha", "zeta"]);
        assert_eq!(
            records[0].get("order_datetime"),
            Some(&FlatValue::Text("2024-03-15 14:02:26".to_string()))
        );
        assert_eq!(records[0].get("total_brl"), Some(&FlatValue::Number(42.5)));
        assert_eq!(records[0].get("distance_km"), Some(&FlatValue::Empty));
        assert_eq!(records[0].get("alpha"), Some(&FlatValue::Text("true".to_string())));
    }

    #[test]
    fn test_records_to_csv_unions_columns() {
        let mut first = FlatRecord::default();
        first.push("platform", FlatValue::Text("Loja; Centro".into()));
        let mut second = FlatRecord::default();
        second.push("platform", FlatValue::Text("Rappi".into()));
        second.push("total_brl", FlatValue::Number(10.0));

        let csv = records_to_csv(&[first, second]).unwrap();
        assert_eq!(
            csv,
            "\u{FEFF}platform;total_brl\n\"Loja; Centro\";\nRappi;10\n"
        );
    }

    #[test]
    fn test_line_breaks_and_quotes_are_quoted() {
        let mut record = FlatRecord::default();
        record.push("note", FlatValue::Text("linha 1\nlinha 2".into()));
        record.push("quote", FlatValue::Text("diz \"oi\"".into()));
        record.push("plain", FlatValue::Text("ok".into()));

        let csv = records_to_csv(&[record]).unwrap();
        assert_eq!(
            csv,
            "\u{FEFF}note;quote;plain\n\"linha 1\nlinha 2\";\"diz \"\"oi\"\"\";ok\n"
        );
    }

    #[test]
    fn test_empty_export_is_an_error() {
        assert!(matches!(records_to_csv(&[]), Err(ExportError::Empty)));
        assert!(matches!(
            export_to_csv::<GroupMean>(&[]),
            Err(ExportError::Empty)
        ));
    }

    #[test]
    fn test_export_chart_rows() {
        let data = vec![GroupMean {
            key: "Zona \"Sul\"".to_string(),
            mean: 15.0,
            count: 2,
        }];
        let csv = export_to_csv(&data).unwrap();
        assert_eq!(csv, "\u{FEFF}key;mean;count\n\"Zona \"\"Sul\"\"\";15;2\n");
    }
}

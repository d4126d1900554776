use contracts::shared::orders::RawRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("File is empty")]
    Empty,

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Metadata of an imported sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetMetadata {
    /// Header cells, trimmed
    pub columns: Vec<String>,
    /// Data rows kept (header and blank rows excluded)
    pub row_count: usize,
    pub file_name: String,
}

/// Sheet converted into header-keyed records
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub metadata: SheetMetadata,
    pub records: Vec<RawRecord>,
}

impl SheetData {
    /// Build records from a grid whose first row holds the headers.
    ///
    /// Header text is kept as written; the normalizer trims keys. Empty cells
    /// become `null` and rows with no non-blank cell are skipped.
    pub fn from_raw(raw_data: Vec<Vec<String>>, file_name: impl Into<String>) -> Result<Self, ImportError> {
        let mut rows = raw_data.into_iter();
        let headers = rows.next().ok_or(ImportError::Empty)?;
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ImportError::Empty);
        }

        let mut records = Vec::new();
        for row in rows {
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let mut record = RawRecord::new();
            for (idx, header) in headers.iter().enumerate() {
                if header.trim().is_empty() {
                    continue;
                }
                let value = match row.get(idx) {
                    Some(cell) if !cell.trim().is_empty() => Value::String(cell.clone()),
                    _ => Value::Null,
                };
                record.insert(header.clone(), value);
            }
            records.push(record);
        }

        let metadata = SheetMetadata {
            columns: headers.iter().map(|h| h.trim().to_string()).collect(),
            row_count: records.len(),
            file_name: file_name.into(),
        };

        Ok(Self { metadata, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_from_raw_keys_rows_by_header() {
        let data = SheetData::from_raw(
            grid(&[
                &[" platform ", "total_brl"],
                &["iFood", "42,50"],
                &["", ""],
                &["Rappi"],
            ]),
            "orders.csv",
        )
        .unwrap();

        assert_eq!(data.metadata.columns, vec!["platform", "total_brl"]);
        assert_eq!(data.metadata.row_count, 2);
        assert_eq!(data.records[0][" platform "], Value::String("iFood".into()));
        assert_eq!(data.records[0]["total_brl"], Value::String("42,50".into()));
        assert_eq!(data.records[1]["total_brl"], Value::Null);
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        assert!(matches!(
            SheetData::from_raw(Vec::new(), "empty.csv"),
            Err(ImportError::Empty)
        ));
        assert!(matches!(
            SheetData::from_raw(grid(&[&["", " "]]), "blank.csv"),
            Err(ImportError::Empty)
        ));
    }
}

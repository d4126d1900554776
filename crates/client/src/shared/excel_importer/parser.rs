use std::path::Path;

use super::types::{ImportError, SheetData};

const BOM: char = '\u{FEFF}';

/// Guess the field separator from the header line: `;` wins over `,` when it
/// occurs at least as often.
fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > 0 && semicolons >= commas {
        b';'
    } else {
        b','
    }
}

/// Parse CSV text into a grid of cells
pub fn parse_csv_grid(content: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let content = content.trim_start_matches(BOM);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

/// Read CSV text (`;` or `,` separated) into header-keyed records
pub fn read_csv_str(content: &str, file_name: &str) -> Result<SheetData, ImportError> {
    let data = SheetData::from_raw(parse_csv_grid(content)?, file_name)?;
    tracing::debug!(
        "Imported {} rows, {} columns from {}",
        data.metadata.row_count,
        data.metadata.columns.len(),
        file_name
    );
    Ok(data)
}

pub fn read_csv_file(path: &Path) -> Result<SheetData, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    read_csv_str(&content, &file_name)
}

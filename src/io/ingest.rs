//! CSV ingest.
//!
//! Turns a delimited file of samples into a `SeriesTable` ready to fit.
//!
//! Design goals:
//! - **Strict schema** for the named columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Missing values survive**: an empty or `NaN` cell becomes NaN and is
//!   left for the fitting routines to drop, so item order is unchanged
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::data::source::{SeriesTable, XYSource};
use crate::error::AppError;

/// Which columns hold the samples.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub x: String,
    pub y: String,
    /// Column holding a series label; `None` puts every row in one series.
    pub series: Option<String>,
}

/// Summary stats about the samples that were loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    pub n_samples: usize,
    /// Samples with a NaN coordinate.
    pub n_missing: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: samples grouped by series + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub table: SeriesTable,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Name given to the only series when no series column is configured.
pub const DEFAULT_SERIES: &str = "series";

/// Load `(x, y)` samples from a CSV file.
pub fn load_samples(path: &Path, columns: &ColumnSpec) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_samples(file, columns)
}

/// Same as `load_samples`, reading from any source of CSV text.
pub fn read_samples<R: std::io::Read>(reader: R, columns: &ColumnSpec) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let x_idx = column_index(&header_map, &columns.x)?;
    let y_idx = column_index(&header_map, &columns.y)?;
    let series_idx = columns
        .series
        .as_deref()
        .map(|name| column_index(&header_map, name))
        .transpose()?;

    let mut table = SeriesTable::new();
    if series_idx.is_none() {
        table.ensure_series(DEFAULT_SERIES);
    }

    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_used = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, x_idx, y_idx, series_idx) {
            Ok((label, x, y)) => {
                let series = table.ensure_series(label.unwrap_or(DEFAULT_SERIES));
                table
                    .push(series, x, y)
                    .map_err(|e| AppError::new(2, format!("Line {line}: {e}")))?;
                rows_used += 1;
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows in CSV."));
    }

    let stats = compute_stats(&table)
        .ok_or_else(|| AppError::new(3, "No complete (x, y) samples in CSV: every row has a missing value."))?;

    Ok(IngestedData {
        table,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn column_index(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(&normalize_header_name(name))
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
}

fn parse_row<'a>(
    record: &'a StringRecord,
    x_idx: usize,
    y_idx: usize,
    series_idx: Option<usize>,
) -> Result<(Option<&'a str>, f64, f64), String> {
    let x = parse_value(record.get(x_idx)).map_err(|v| format!("Invalid x value '{v}'."))?;
    let y = parse_value(record.get(y_idx)).map_err(|v| format!("Invalid y value '{v}'."))?;
    let label = match series_idx {
        Some(idx) => Some(
            record
                .get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| "Missing series label.".to_string())?,
        ),
        None => None,
    };
    Ok((label, x, y))
}

/// Empty cells and `NaN`/`NA` are missing and map to NaN.
fn parse_value(cell: Option<&str>) -> Result<f64, String> {
    let s = cell.map(str::trim).unwrap_or("");
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("na") {
        return Ok(f64::NAN);
    }
    s.parse::<f64>().map_err(|_| s.to_string())
}

fn compute_stats(table: &SeriesTable) -> Option<DatasetStats> {
    let mut n_samples = 0usize;
    let mut n_missing = 0usize;
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for series in 0..table.series_count() {
        for item in 0..table.item_count(series) {
            let x = table.x_value(series, item);
            let y = table.y_value(series, item);
            if x.is_nan() || y.is_nan() {
                n_missing += 1;
                continue;
            }
            n_samples += 1;
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if n_samples == 0 {
        return None;
    }

    Some(DatasetStats {
        n_samples,
        n_missing,
        x_min,
        x_max,
        y_min,
        y_max,
    })
}

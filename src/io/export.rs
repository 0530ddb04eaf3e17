//! CSV exports.
//!
//! Plain `x,y,...` files meant to be easy to consume in spreadsheets or
//! downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::domain::{Observation, Residual};
use crate::error::AppError;

/// Write per-sample fitted values and residuals.
pub fn write_residuals_csv(path: &Path, residuals: &[Residual]) -> Result<(), AppError> {
    let mut writer = create_writer(path)?;
    writer
        .write_record(["x", "y", "y_fit", "residual"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in residuals {
        writer
            .write_record([
                format!("{:.10}", r.sample.x),
                format!("{:.10}", r.sample.y),
                format!("{:.10}", r.y_fit),
                format!("{:.10}", r.residual),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

/// Write `(x, y)` samples, one row each. NaN is written as an empty cell.
pub fn write_samples_csv(path: &Path, samples: &[Observation]) -> Result<(), AppError> {
    let mut writer = create_writer(path)?;
    writer
        .write_record(["x", "y"])
        .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;

    for s in samples {
        writer
            .write_record([fmt_cell(s.x), fmt_cell(s.y)])
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))
}

fn create_writer(path: &Path) -> Result<csv::Writer<File>, AppError> {
    csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))
}

fn fmt_cell(v: f64) -> String {
    if v.is_nan() { String::new() } else { format!("{v:.10}") }
}

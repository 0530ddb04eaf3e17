//! Read/write fit JSON files.
//!
//! A fit file is the portable representation of a fitted model:
//! - model kind, order and coefficients (plus R² and the degenerate flag)
//! - quality stats over the samples it was fitted to
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::FitFile`. Non-finite numbers are written as
//! `null` and read back as NaN.

use std::fs::File;
use std::path::Path;

use crate::domain::{FitFile, FitGrid, FitQuality, FitResult};
use crate::error::AppError;
use crate::models::predict_fit;

/// Number of grid points stored in a fit file.
pub const GRID_POINTS: usize = 101;

/// Assemble a fit file, evaluating the model over `[x_min, x_max]`.
pub fn build_fit_file(
    source: &str,
    series: Option<&str>,
    fit: &FitResult,
    quality: &FitQuality,
    x_min: f64,
    x_max: f64,
) -> FitFile {
    FitFile {
        tool: "trendfit".to_string(),
        source: source.to_string(),
        series: series.map(str::to_string),
        fit: fit.clone(),
        quality: quality.clone(),
        grid: build_grid(fit, x_min, x_max, GRID_POINTS),
    }
}

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, fit_file: &FitFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create fit JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, fit_file)
        .map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;
    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let fit_file: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))?;
    Ok(fit_file)
}

fn build_grid(fit: &FitResult, x_min: f64, x_max: f64, n: usize) -> FitGrid {
    let n = n.max(2);
    let mut x0 = x_min;
    let mut x1 = x_max;
    if !(x0.is_finite() && x1.is_finite()) || x1 < x0 {
        x0 = 0.0;
        x1 = 1.0;
    }
    if (x1 - x0).abs() < 1e-12 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let xi = x0 + u * (x1 - x0);
        x.push(xi);
        y.push(predict_fit(fit, xi));
    }
    FitGrid { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinearFit, ModelSpec};

    fn quality() -> FitQuality {
        FitQuality { n: 3, sse: 0.0, rmse: 0.0, r_squared: f64::NAN }
    }

    #[test]
    fn grid_spans_range() {
        let fit: FitResult = LinearFit { intercept: 1.0, slope: 2.0, n: 3 }.into();
        let file = build_fit_file("in.csv", None, &fit, &quality(), 0.0, 10.0);
        assert_eq!(file.grid.x.len(), GRID_POINTS);
        assert_eq!(file.grid.x[0], 0.0);
        assert_eq!(file.grid.x[GRID_POINTS - 1], 10.0);
        assert_eq!(file.grid.y[GRID_POINTS - 1], 21.0);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let fit: FitResult = LinearFit { intercept: 0.0, slope: 1.0, n: 2 }.into();
        let grid = build_grid(&fit, 3.0, 3.0, 5);
        assert_eq!(grid.x, vec![2.5, 2.75, 3.0, 3.25, 3.5]);
    }

    #[test]
    fn round_trip_keeps_nan_as_nan() {
        let path = std::env::temp_dir().join(format!("trendfit-fit-{}.json", std::process::id()));
        let fit = FitResult {
            model: ModelSpec::polynomial(1),
            coefficients: vec![4.0, 0.0],
            r_squared: Some(f64::NAN),
            degenerate: false,
            n: 3,
        };
        let file = build_fit_file("in.csv", Some("a"), &fit, &quality(), 0.0, 2.0);
        write_fit_json(&path, &file).unwrap();
        let back = read_fit_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.series.as_deref(), Some("a"));
        assert_eq!(back.fit.model, ModelSpec::polynomial(1));
        assert_eq!(back.fit.coefficients, vec![4.0, 0.0]);
        // `Some(NaN)` is written as null and comes back as "no R²".
        assert_eq!(back.fit.r_squared, None);
        assert!(back.quality.r_squared.is_nan());
        assert_eq!(back.grid.y[0], 4.0);
    }
}

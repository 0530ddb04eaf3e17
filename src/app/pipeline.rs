//! Shared "fit pipeline" logic behind `trendfit fit`.
//!
//! Keeping this in one place keeps the core workflow testable without the CLI:
//! CSV ingest -> series selection -> optional x window -> fit -> residuals -> quality
//!
//! The app layer then only does presentation (printing, plotting, exports).

use crate::data::extract::{MissingPolicy, extract_samples};
use crate::data::range::{ItemRange, SeriesWindow};
use crate::data::source::{SeriesTable, XYSource};
use crate::domain::{FitConfig, FitQuality, FitResult, ModelKind, ModelSpec, Observation, Residual};
use crate::error::{AppError, FitError};
use crate::fit::batch::{SeriesFit, fit_all_series};
use crate::fit::fitter::{EliminationTrace, fit_model, fit_polynomial_traced};
use crate::io::ingest::{ColumnSpec, IngestedData, load_samples};
use crate::report::{compute_residuals, fit_quality};

/// All computed outputs of a single-series `trendfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub series: usize,
    pub series_name: Option<String>,
    /// Item range the fit was restricted to, when an x window was given.
    pub window: Option<ItemRange>,
    /// Non-missing samples the model was fitted to.
    pub samples: Vec<Observation>,
    pub fit: FitResult,
    pub trace: Option<EliminationTrace>,
    pub residuals: Vec<Residual>,
    pub quality: FitQuality,
}

/// Outputs of an `--all-series` run.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub ingest: IngestedData,
    pub fits: Vec<SeriesFit>,
}

/// Execute the single-series pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let ingest = load_samples(&config.csv_path, &column_spec(config))?;
    let series = resolve_series(&ingest.table, config.series.as_deref())?;

    let (window, samples, (fit, trace)) = match (config.x_low, config.x_high) {
        (Some(low), Some(high)) => {
            let view = SeriesWindow::for_x_range(&ingest.table, series, low, high)?;
            let samples = extract_samples(&view, 0, MissingPolicy::Skip);
            (Some(view.range()), samples, fit_series(&view, 0, config.model)?)
        }
        (None, None) => {
            let samples = extract_samples(&ingest.table, series, MissingPolicy::Skip);
            (None, samples, fit_series(&ingest.table, series, config.model)?)
        }
        _ => return Err(AppError::new(2, "Both --x-low and --x-high are required for an x window.")),
    };

    let residuals = compute_residuals(&samples, &fit);
    let quality = fit_quality(&residuals, &fit);
    let series_name = ingest.table.series_name(series).map(str::to_string);

    Ok(RunOutput {
        ingest,
        series,
        series_name,
        window,
        samples,
        fit,
        trace,
        residuals,
        quality,
    })
}

/// Fit every series of the input in parallel.
pub fn run_batch(config: &FitConfig) -> Result<BatchOutput, AppError> {
    if config.x_low.is_some() || config.x_high.is_some() {
        return Err(AppError::new(2, "An x window cannot be combined with --all-series."));
    }
    let ingest = load_samples(&config.csv_path, &column_spec(config))?;
    let fits = fit_all_series(&ingest.table, config.model);
    Ok(BatchOutput { ingest, fits })
}

fn column_spec(config: &FitConfig) -> ColumnSpec {
    ColumnSpec {
        x: config.x_column.clone(),
        y: config.y_column.clone(),
        series: config.series_column.clone(),
    }
}

fn resolve_series(table: &SeriesTable, name: Option<&str>) -> Result<usize, AppError> {
    match name {
        Some(name) => table
            .series_index(name)
            .ok_or_else(|| AppError::new(2, format!("Unknown series '{name}'."))),
        None => Ok(0),
    }
}

/// Polynomial fits keep their elimination matrices for the debug bundle.
fn fit_series<S: XYSource + ?Sized>(
    source: &S,
    series: usize,
    model: ModelSpec,
) -> Result<(FitResult, Option<EliminationTrace>), FitError> {
    match model.kind {
        ModelKind::Polynomial => {
            let (fit, trace) = fit_polynomial_traced(source, series, model.order)?;
            Ok((fit.into(), Some(trace)))
        }
        ModelKind::Linear | ModelKind::Power => Ok((fit_model(source, series, model)?, None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_csv(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("trendfit-{name}-{}.csv", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    fn config(csv_path: PathBuf, model: ModelSpec) -> FitConfig {
        FitConfig {
            csv_path,
            x_column: "x".to_string(),
            y_column: "y".to_string(),
            series_column: None,
            series: None,
            all_series: false,
            model,
            x_low: None,
            x_high: None,
            plot: false,
            plot_width: 60,
            plot_height: 15,
            export_residuals: None,
            export_fit: None,
            debug_dir: None,
        }
    }

    #[test]
    fn fits_whole_series() {
        let path = write_csv("line", "x,y\n1,5\n2,8\n3,\n4,14\n");
        let run = run_fit(&config(path.clone(), ModelSpec::linear())).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(run.samples.len(), 3);
        assert!((run.fit.coefficients[0] - 2.0).abs() < 1e-12);
        assert!((run.fit.coefficients[1] - 3.0).abs() < 1e-12);
        assert!(run.trace.is_none());
        assert!(run.quality.sse < 1e-20);
        assert_eq!(run.window, None);
    }

    #[test]
    fn window_limits_the_fit() {
        // Outside [2, 4] the data leaves the line.
        let path = write_csv("window", "x,y\n0,100\n1,2\n2,3\n3,4\n4,5\n5,6\n6,-50\n");
        let mut cfg = config(path.clone(), ModelSpec::polynomial(1));
        cfg.x_low = Some(1.5);
        cfg.x_high = Some(5.5);
        let run = run_fit(&cfg).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(run.window, Some(ItemRange { lo: 2, hi: 5 }));
        assert_eq!(run.samples.len(), 4);
        assert!((run.fit.coefficients[0] - 1.0).abs() < 1e-9);
        assert!((run.fit.coefficients[1] - 1.0).abs() < 1e-9);
        assert!(run.trace.is_some());
    }

    #[test]
    fn unknown_series_name_is_input_error() {
        let path = write_csv("series", "g,x,y\na,1,1\na,2,2\n");
        let mut cfg = config(path.clone(), ModelSpec::linear());
        cfg.series_column = Some("g".to_string());
        cfg.series = Some("b".to_string());
        let err = run_fit(&cfg).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn too_few_samples_is_data_error() {
        let path = write_csv("short", "x,y\n1,1\n2,\n");
        let err = run_fit(&config(path.clone(), ModelSpec::linear())).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn batch_fits_each_series() {
        let path = write_csv("batch", "g,x,y\na,1,1\na,2,2\nb,1,3\nb,2,5\nc,1,1\n");
        let mut cfg = config(path.clone(), ModelSpec::linear());
        cfg.series_column = Some("g".to_string());
        let out = run_batch(&cfg).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(out.fits.len(), 3);
        assert!(out.fits[0].result.is_ok());
        assert_eq!(out.fits[1].result.as_ref().unwrap().coefficients, vec![1.0, 2.0]);
        assert!(out.fits[2].result.is_err());
    }
}

//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments (plus `.env` / environment defaults)
//! - runs the fit pipeline
//! - prints reports/plots and warnings
//! - writes optional exports and the debug bundle

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs, SampleArgs};
use crate::data::sample::{SampleConfig, generate_sample};
use crate::domain::{FitConfig, ModelKind, ModelSpec};
use crate::error::AppError;

pub mod pipeline;

const DEFAULT_PLOT_WIDTH: usize = 100;
const DEFAULT_PLOT_HEIGHT: usize = 25;
const DEFAULT_DEBUG_DIR: &str = "debug";

/// Entry point for the `trendfit` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(&args),
        Command::Plot(args) => handle_plot(&args),
        Command::Sample(args) => handle_sample(&args),
    }
}

fn handle_fit(args: &FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(args)?;
    if config.all_series {
        return handle_batch(&config);
    }

    let run = pipeline::run_fit(&config)?;
    warn_row_errors(&run.ingest);
    warn_fit(&run.fit);

    let source = config.csv_path.display().to_string();
    println!(
        "{}",
        crate::report::format_fit_summary(
            &source,
            run.series_name.as_deref(),
            &run.ingest.stats,
            &run.fit,
            &run.quality,
        )
    );
    if let Some(range) = run.window {
        println!("Window: items {}..={} ({} used)\n", range.lo, range.hi, run.samples.len());
    }

    let worst = crate::report::largest_residuals(&run.residuals, 5);
    println!("Largest residuals:\n{}", crate::report::format_residuals(&worst));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.samples,
            &run.fit,
            config.plot_width,
            config.plot_height,
            Some(worst.as_slice()),
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_residuals {
        crate::io::export::write_residuals_csv(path, &run.residuals)?;
    }
    if let Some(path) = &config.export_fit {
        let fit_file = crate::io::fitfile::build_fit_file(
            &source,
            run.series_name.as_deref(),
            &run.fit,
            &run.quality,
            run.ingest.stats.x_min,
            run.ingest.stats.x_max,
        );
        crate::io::fitfile::write_fit_json(path, &fit_file)?;
    }
    if let Some(dir) = &config.debug_dir {
        let ctx = crate::debug::DebugContext {
            source: &source,
            series: run.series_name.as_deref(),
            fit: &run.fit,
            quality: &run.quality,
            residuals: &run.residuals,
            trace: run.trace.as_ref(),
        };
        let path = crate::debug::write_debug_bundle(dir, &ctx)?;
        eprintln!("Debug bundle written to {}", path.display());
    }

    Ok(())
}

fn handle_batch(config: &FitConfig) -> Result<(), AppError> {
    let out = pipeline::run_batch(config)?;
    warn_row_errors(&out.ingest);
    println!("Model: {}\n", config.model.label());
    println!("{}", crate::report::format_batch_summary(&out.fits));

    if out.fits.iter().all(|f| f.result.is_err()) {
        return Err(AppError::new(3, "No series could be fitted."));
    }
    Ok(())
}

fn handle_plot(args: &PlotArgs) -> Result<(), AppError> {
    let fit_file = crate::io::fitfile::read_fit_json(&args.fit)?;
    let width = args.width.unwrap_or_else(|| env_usize("TRENDFIT_PLOT_WIDTH", DEFAULT_PLOT_WIDTH));
    let height = args.height.unwrap_or_else(|| env_usize("TRENDFIT_PLOT_HEIGHT", DEFAULT_PLOT_HEIGHT));

    println!("{} fitted to {}", fit_file.fit.model.label(), fit_file.source);
    println!("{}", crate::plot::render_ascii_plot_from_fit_file(&fit_file, width, height));
    Ok(())
}

fn handle_sample(args: &SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        model: SampleConfig::model_for(args.model, &args.coefficients),
        coefficients: args.coefficients.clone(),
        n: args.count,
        x_min: args.x_min,
        x_max: args.x_max,
        noise: args.noise,
        missing_prob: args.missing_prob,
        seed: args.seed,
    };
    let samples = generate_sample(&config)?;
    crate::io::export::write_samples_csv(&args.out, &samples)?;
    eprintln!("Wrote {} samples to {}", samples.len(), args.out.display());
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    let model = match args.model {
        ModelKind::Linear => ModelSpec::linear(),
        ModelKind::Power => ModelSpec::power(),
        ModelKind::Polynomial => {
            if args.order == 0 {
                return Err(AppError::new(2, "--order must be >= 1."));
            }
            ModelSpec::polynomial(args.order)
        }
    };

    let debug_dir = args.debug.then(|| {
        std::env::var("TRENDFIT_DEBUG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DEBUG_DIR))
    });

    Ok(FitConfig {
        csv_path: args.csv.clone(),
        x_column: args.x_column.clone(),
        y_column: args.y_column.clone(),
        series_column: args.series_column.clone(),
        series: args.series.clone(),
        all_series: args.all_series,
        model,
        x_low: args.x_low,
        x_high: args.x_high,
        plot: !args.no_plot,
        plot_width: args.width.unwrap_or_else(|| env_usize("TRENDFIT_PLOT_WIDTH", DEFAULT_PLOT_WIDTH)),
        plot_height: args.height.unwrap_or_else(|| env_usize("TRENDFIT_PLOT_HEIGHT", DEFAULT_PLOT_HEIGHT)),
        export_residuals: args.export.clone(),
        export_fit: args.export_fit.clone(),
        debug_dir,
    })
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn warn_row_errors(ingest: &crate::io::ingest::IngestedData) {
    if ingest.row_errors.is_empty() {
        return;
    }
    eprintln!(
        "Warning: skipped {} of {} rows.",
        ingest.row_errors.len(),
        ingest.rows_read
    );
    for err in ingest.row_errors.iter().take(10) {
        eprintln!("  line {}: {}", err.line, err.message);
    }
}

fn warn_fit(fit: &crate::domain::FitResult) {
    if fit.degenerate {
        eprintln!("Warning: normal equations are singular; trailing coefficients were set to 0.");
    }
    if fit.coefficients.iter().any(|c| !c.is_finite()) {
        eprintln!("Warning: fit produced non-finite coefficients.");
    }
    if fit.r_squared.is_some_and(|r| !r.is_finite()) {
        eprintln!("Warning: R² is undefined (constant y values).");
    }
}

//! Command-line parsing for the `trendfit` regression tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ModelKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "trendfit", version, about = "Least-squares trend fitting (linear, power, polynomial)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a model to samples from a CSV file, print diagnostics, and optionally plot/export.
    Fit(FitArgs),
    /// Plot a previously exported fit JSON.
    Plot(PlotArgs),
    /// Generate synthetic samples from a known model.
    Sample(SampleArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Input CSV with a header row.
    #[arg(long, value_name = "FILE")]
    pub csv: PathBuf,

    /// Column holding x-values.
    #[arg(long = "x", default_value = "x")]
    pub x_column: String,

    /// Column holding y-values.
    #[arg(long = "y", default_value = "y")]
    pub y_column: String,

    /// Column holding series labels (one series per distinct label).
    #[arg(long)]
    pub series_column: Option<String>,

    /// Series to fit (defaults to the first one).
    #[arg(long)]
    pub series: Option<String>,

    /// Fit every series in parallel and print one line per series.
    #[arg(long)]
    pub all_series: bool,

    /// Model family.
    #[arg(long, value_enum, default_value_t = ModelKind::Linear)]
    pub model: ModelKind,

    /// Polynomial order (polynomial model only).
    #[arg(long, default_value_t = 2)]
    pub order: usize,

    /// Only fit samples inside the window [x-low, x-high].
    #[arg(long, requires = "x_high", allow_hyphen_values = true)]
    pub x_low: Option<f64>,

    /// Upper bound of the x window.
    #[arg(long, requires = "x_low", allow_hyphen_values = true)]
    pub x_high: Option<f64>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns). Defaults to `TRENDFIT_PLOT_WIDTH` or 100.
    #[arg(long)]
    pub width: Option<usize>,

    /// Plot height (rows). Defaults to `TRENDFIT_PLOT_HEIGHT` or 25.
    #[arg(long)]
    pub height: Option<usize>,

    /// Export per-sample fitted values and residuals to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the fit (model + coefficients + fitted grid) to JSON.
    #[arg(long = "export-fit")]
    pub export_fit: Option<PathBuf>,

    /// Write a markdown debug bundle (directory from `TRENDFIT_DEBUG_DIR`, default `debug`).
    #[arg(long)]
    pub debug: bool,
}

/// Options for plotting a saved fit.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Fit JSON file produced by `trendfit fit --export-fit`.
    #[arg(long, value_name = "JSON")]
    pub fit: PathBuf,

    /// Plot width (columns).
    #[arg(long)]
    pub width: Option<usize>,

    /// Plot height (rows).
    #[arg(long)]
    pub height: Option<usize>,
}

/// Options for synthetic sample generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Model family the samples follow.
    #[arg(long, value_enum, default_value_t = ModelKind::Linear)]
    pub model: ModelKind,

    /// Model coefficients, comma separated (`a,b` or `a0,a1,...`).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub coefficients: Vec<f64>,

    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 50)]
    pub count: usize,

    /// Smallest x-value.
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub x_min: f64,

    /// Largest x-value.
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub x_max: f64,

    /// Standard deviation of the Gaussian noise added to y.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Probability that a y-value is left missing.
    #[arg(long, default_value_t = 0.0)]
    pub missing_prob: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,
}

//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the fitting routines and handed to callers by value
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

// JSON has no NaN/∞; serde_json writes them as `null`. Read `null` back as NaN.
fn f64_or_nan<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(de)?.unwrap_or(f64::NAN))
}

fn vec_f64_or_nan<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<f64>, D::Error> {
    let values = Vec::<Option<f64>>::deserialize(de)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// One `(x, y)` sample.
///
/// Either coordinate may be NaN at the source; such samples are treated as
/// missing and dropped before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
}

impl Observation {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `true` when either coordinate is NaN.
    pub fn is_missing(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

/// Which model family to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// `y = a + b·x`
    Linear,
    /// `y = a·x^b`
    Power,
    /// `y = a0 + a1·x + … + ak·x^k`
    #[value(alias = "poly")]
    Polynomial,
}

impl ModelKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear",
            ModelKind::Power => "Power",
            ModelKind::Polynomial => "Polynomial",
        }
    }
}

/// A model family plus its polynomial order (ignored for linear/power).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub kind: ModelKind,
    pub order: usize,
}

impl ModelSpec {
    pub fn linear() -> Self {
        Self { kind: ModelKind::Linear, order: 1 }
    }

    pub fn power() -> Self {
        Self { kind: ModelKind::Power, order: 1 }
    }

    pub fn polynomial(order: usize) -> Self {
        Self { kind: ModelKind::Polynomial, order }
    }

    /// Minimum number of valid samples the model needs.
    pub fn min_samples(&self) -> usize {
        match self.kind {
            ModelKind::Linear | ModelKind::Power => 2,
            ModelKind::Polynomial => self.order + 1,
        }
    }

    /// Label such as `Polynomial (order 3)`.
    pub fn label(&self) -> String {
        match self.kind {
            ModelKind::Polynomial => format!("{} (order {})", self.kind.display_name(), self.order),
            kind => kind.display_name().to_string(),
        }
    }
}

/// OLS fit of `y = intercept + slope·x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    /// Number of samples the fit used.
    pub n: usize,
}

impl LinearFit {
    /// `[a, b]` with `a` the intercept and `b` the slope.
    pub fn to_array(&self) -> [f64; 2] {
        [self.intercept, self.slope]
    }
}

/// Fit of `y = a·x^b` obtained on log-transformed samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerFit {
    pub a: f64,
    pub b: f64,
    /// Number of samples the fit used.
    pub n: usize,
}

impl PowerFit {
    pub fn to_array(&self) -> [f64; 2] {
        [self.a, self.b]
    }
}

/// Polynomial least-squares fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFit {
    /// `[a0, a1, …, a_order]`, lowest power first.
    pub coefficients: Vec<f64>,
    /// Coefficient of determination, `SS_reg / SS_tot`.
    pub r_squared: f64,
    /// Index of the first coefficient the elimination could not resolve.
    ///
    /// Set when a reduced system had no usable pivot; every coefficient from
    /// this index on is reported as `0.0`.
    pub degenerate_from: Option<usize>,
    /// Number of samples the fit used.
    pub n: usize,
}

impl PolynomialFit {
    pub fn order(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate_from.is_some()
    }

    /// `[a0, …, a_order, R²]`.
    pub fn to_vec(&self) -> Vec<f64> {
        let mut out = self.coefficients.clone();
        out.push(self.r_squared);
        out
    }
}

/// Model-agnostic fit output used by reporting, plotting and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: ModelSpec,
    /// `[a, b]` for linear/power; `[a0 … a_order]` for polynomial.
    #[serde(deserialize_with = "vec_f64_or_nan")]
    pub coefficients: Vec<f64>,
    /// Only polynomial fits compute R² as part of the fit.
    pub r_squared: Option<f64>,
    pub degenerate: bool,
    pub n: usize,
}

impl From<LinearFit> for FitResult {
    fn from(fit: LinearFit) -> Self {
        Self {
            model: ModelSpec::linear(),
            coefficients: fit.to_array().to_vec(),
            r_squared: None,
            degenerate: false,
            n: fit.n,
        }
    }
}

impl From<PowerFit> for FitResult {
    fn from(fit: PowerFit) -> Self {
        Self {
            model: ModelSpec::power(),
            coefficients: fit.to_array().to_vec(),
            r_squared: None,
            degenerate: false,
            n: fit.n,
        }
    }
}

impl From<PolynomialFit> for FitResult {
    fn from(fit: PolynomialFit) -> Self {
        Self {
            model: ModelSpec::polynomial(fit.order()),
            degenerate: fit.is_degenerate(),
            r_squared: Some(fit.r_squared),
            n: fit.n,
            coefficients: fit.coefficients,
        }
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    #[serde(deserialize_with = "f64_or_nan")]
    pub sse: f64,
    #[serde(deserialize_with = "f64_or_nan")]
    pub rmse: f64,
    #[serde(deserialize_with = "f64_or_nan")]
    pub r_squared: f64,
}

/// A per-sample fitted value (used for reports and exports).
#[derive(Debug, Clone, Copy)]
pub struct Residual {
    pub sample: Observation,
    pub y_fit: f64,
    pub residual: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub csv_path: PathBuf,
    pub x_column: String,
    pub y_column: String,
    /// Column holding a series label; `None` means a single series.
    pub series_column: Option<String>,
    /// Series to fit when the file holds several.
    pub series: Option<String>,
    /// Fit every series in parallel instead of a single one.
    pub all_series: bool,

    pub model: ModelSpec,

    /// Optional visible x window; fitting is restricted to the live items.
    pub x_low: Option<f64>,
    pub x_high: Option<f64>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_residuals: Option<PathBuf>,
    pub export_fit: Option<PathBuf>,

    /// Write a markdown debug bundle into this directory.
    pub debug_dir: Option<PathBuf>,
}

/// A saved fit file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub source: String,
    pub series: Option<String>,
    pub fit: FitResult,
    pub quality: FitQuality,
    pub grid: FitGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitGrid {
    pub x: Vec<f64>,
    #[serde(deserialize_with = "vec_f64_or_nan")]
    pub y: Vec<f64>,
}

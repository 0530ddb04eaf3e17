//! Fit every series of a source at once.
//!
//! Fits share nothing but the read-only source, so each series is fitted on
//! its own rayon task. Output order follows series order.

use rayon::prelude::*;

use crate::data::source::XYSource;
use crate::domain::{FitResult, ModelSpec};
use crate::error::FitError;
use crate::fit::fitter::fit_model;

/// Fit outcome for one series.
#[derive(Debug, Clone)]
pub struct SeriesFit {
    pub series: usize,
    pub name: Option<String>,
    pub result: Result<FitResult, FitError>,
}

/// Fit `model` to every series in `source`.
///
/// A failing series (for example one with too few samples) does not stop the
/// others; its error is kept in `SeriesFit::result`.
pub fn fit_all_series<S: XYSource + Sync + ?Sized>(source: &S, model: ModelSpec) -> Vec<SeriesFit> {
    (0..source.series_count())
        .into_par_iter()
        .map(|series| SeriesFit {
            series,
            name: source.series_name(series).map(str::to_string),
            result: fit_model(source, series, model),
        })
        .collect()
}

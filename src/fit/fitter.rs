//! Public fitting entry points.
//!
//! Every fit follows the same shape:
//!
//! 1. check the series index (and the polynomial order)
//! 2. extract the series into a local working sequence, dropping NaN samples
//! 3. check the model's minimum sample count
//! 4. run the model's least-squares solve
//!
//! Fits are pure: they read the source, allocate their own working storage and
//! return an owned result. Numeric trouble is reported through the result
//! (non-finite values, `PolynomialFit::degenerate_from`), never as an error.

use nalgebra::DMatrix;

use crate::data::extract::{MissingPolicy, extract_samples};
use crate::data::source::{XYSource, ensure_series};
use crate::domain::{FitResult, LinearFit, ModelKind, ModelSpec, Observation, PolynomialFit, PowerFit};
use crate::error::FitError;
use crate::math::{back_substitute, build_normal_equations, linear_fit, power_fit, reduce_in_place};
use crate::models::polynomial_value;

/// Intermediate matrices of a polynomial solve, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct EliminationTrace {
    /// Augmented normal equations as built from the samples.
    pub normal: DMatrix<f64>,
    /// The same system after row reduction (upper triangular).
    pub reduced: DMatrix<f64>,
}

/// `y = a + b·x` over a single table of `[x, y]` rows.
pub fn fit_linear(table: &[[f64; 2]]) -> Result<LinearFit, FitError> {
    fit_linear_series(table, 0)
}

/// `y = a + b·x` over one series of `source`.
pub fn fit_linear_series<S: XYSource + ?Sized>(source: &S, series: usize) -> Result<LinearFit, FitError> {
    ensure_series(source, series)?;
    let samples = extract_samples(source, series, MissingPolicy::Skip);
    linear_fit(&samples)
}

/// `y = a·x^b` over a single table of `[x, y]` rows.
pub fn fit_power(table: &[[f64; 2]]) -> Result<PowerFit, FitError> {
    fit_power_series(table, 0)
}

/// `y = a·x^b` over one series of `source`.
pub fn fit_power_series<S: XYSource + ?Sized>(source: &S, series: usize) -> Result<PowerFit, FitError> {
    ensure_series(source, series)?;
    let samples = extract_samples(source, series, MissingPolicy::Skip);
    power_fit(&samples)
}

/// Polynomial of `order` over a single table of `[x, y]` rows.
pub fn fit_polynomial_table(table: &[[f64; 2]], order: usize) -> Result<PolynomialFit, FitError> {
    fit_polynomial(table, 0, order)
}

/// Polynomial of `order` over one series of `source`.
///
/// Returns `[a0 … a_order]` plus R² (see `PolynomialFit::to_vec`). At least
/// `order + 1` non-NaN samples are required.
pub fn fit_polynomial<S: XYSource + ?Sized>(
    source: &S,
    series: usize,
    order: usize,
) -> Result<PolynomialFit, FitError> {
    let samples = polynomial_samples(source, series, order)?;
    polynomial_fit(&samples, order)
}

/// Same as `fit_polynomial`, also returning the matrices of the solve.
pub fn fit_polynomial_traced<S: XYSource + ?Sized>(
    source: &S,
    series: usize,
    order: usize,
) -> Result<(PolynomialFit, EliminationTrace), FitError> {
    let samples = polynomial_samples(source, series, order)?;
    polynomial_fit_traced(&samples, order)
}

fn polynomial_samples<S: XYSource + ?Sized>(
    source: &S,
    series: usize,
    order: usize,
) -> Result<Vec<Observation>, FitError> {
    if order == 0 {
        return Err(FitError::InvalidOrder(order));
    }
    ensure_series(source, series)?;

    let min = order + 1;
    let item_count = source.item_count(series);
    if item_count < min {
        return Err(FitError::InsufficientData { got: item_count, min });
    }

    let samples = extract_samples(source, series, MissingPolicy::Skip);
    if samples.len() < min {
        return Err(FitError::InsufficientData {
            got: samples.len(),
            min,
        });
    }
    Ok(samples)
}

/// Polynomial fit over samples that are already free of missing values.
pub fn polynomial_fit(samples: &[Observation], order: usize) -> Result<PolynomialFit, FitError> {
    polynomial_fit_traced(samples, order).map(|(fit, _)| fit)
}

fn polynomial_fit_traced(
    samples: &[Observation],
    order: usize,
) -> Result<(PolynomialFit, EliminationTrace), FitError> {
    if order == 0 {
        return Err(FitError::InvalidOrder(order));
    }
    if samples.len() < order + 1 {
        return Err(FitError::InsufficientData {
            got: samples.len(),
            min: order + 1,
        });
    }

    let normal = build_normal_equations(samples, order);
    let mut reduced = normal.clone();
    let degenerate_from = reduce_in_place(&mut reduced)?;
    let coefficients = back_substitute(&reduced, degenerate_from);
    let r_squared = r_squared(samples, &coefficients);

    let fit = PolynomialFit {
        coefficients,
        r_squared,
        degenerate_from,
        n: samples.len(),
    };
    Ok((fit, EliminationTrace { normal, reduced }))
}

/// `Σ(ŷ − ȳ)² / Σ(y − ȳ)²` for a polynomial over `samples`.
///
/// Constant `y` makes the denominator zero; the result is then NaN or ±∞.
pub fn r_squared(samples: &[Observation], coefficients: &[f64]) -> f64 {
    let n = samples.len() as f64;
    let mean_y = samples.iter().map(|s| s.y).sum::<f64>() / n;

    let mut ss_reg = 0.0;
    let mut ss_tot = 0.0;
    for s in samples {
        let y_calc = polynomial_value(coefficients, s.x);
        ss_reg += (y_calc - mean_y).powi(2);
        ss_tot += (s.y - mean_y).powi(2);
    }
    ss_reg / ss_tot
}

/// Fit any supported model over one series.
pub fn fit_model<S: XYSource + ?Sized>(
    source: &S,
    series: usize,
    model: ModelSpec,
) -> Result<FitResult, FitError> {
    let result: FitResult = match model.kind {
        ModelKind::Linear => fit_linear_series(source, series)?.into(),
        ModelKind::Power => fit_power_series(source, series)?.into(),
        ModelKind::Polynomial => fit_polynomial(source, series, model.order)?.into(),
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::SeriesTable;

    fn quadratic_table() -> Vec<[f64; 2]> {
        (0..5)
            .map(|i| {
                let x = i as f64;
                [x, 1.0 + 2.0 * x + 3.0 * x * x]
            })
            .collect()
    }

    #[test]
    fn quadratic_recovered_exactly() {
        let fit = fit_polynomial_table(&quadratic_table(), 2).unwrap();
        for (got, want) in fit.coefficients.iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert!(!fit.is_degenerate());
        assert_eq!(fit.to_vec().len(), 4);
    }

    #[test]
    fn order_zero_rejected() {
        assert_eq!(
            fit_polynomial_table(&quadratic_table(), 0).unwrap_err(),
            FitError::InvalidOrder(0)
        );
    }

    #[test]
    fn too_few_items_before_filtering() {
        let table = [[0.0, 1.0], [1.0, 2.0]];
        assert_eq!(
            fit_polynomial_table(&table, 2).unwrap_err(),
            FitError::InsufficientData { got: 2, min: 3 }
        );
    }

    #[test]
    fn too_few_items_after_filtering() {
        let table = [[0.0, 1.0], [1.0, f64::NAN], [f64::NAN, 3.0], [3.0, 4.0]];
        assert_eq!(
            fit_polynomial_table(&table, 2).unwrap_err(),
            FitError::InsufficientData { got: 2, min: 3 }
        );
    }

    #[test]
    fn identical_x_is_degenerate_not_an_error() {
        let table = [[2.0, 1.0], [2.0, 3.0]];
        let fit = fit_polynomial_table(&table, 1).unwrap();
        assert_eq!(fit.degenerate_from, Some(1));
        assert_eq!(fit.coefficients, vec![2.0, 0.0]);
        assert_eq!(fit.r_squared, 0.0);
    }

    #[test]
    fn constant_y_gives_non_finite_r_squared() {
        let table = [[0.0, 4.0], [1.0, 4.0], [2.0, 4.0]];
        let fit = fit_polynomial_table(&table, 1).unwrap();
        assert!(!fit.r_squared.is_finite());
    }

    #[test]
    fn unknown_series_rejected() {
        let mut table = SeriesTable::new();
        table.add_series("a", vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        assert!(matches!(
            fit_linear_series(&table, 3),
            Err(FitError::UnknownSeries { series: 3, count: 1 })
        ));
    }

    #[test]
    fn traced_fit_keeps_matrices() {
        let table = quadratic_table();
        let (fit, trace) = fit_polynomial_traced(table.as_slice(), 0, 2).unwrap();
        assert_eq!(trace.normal.shape(), (3, 4));
        assert_eq!(trace.reduced.shape(), (3, 4));
        assert_eq!(trace.normal[(0, 0)], 5.0);
        assert_eq!(trace.reduced[(1, 0)], 0.0);
        assert_eq!(trace.reduced[(2, 1)], 0.0);
        assert_eq!(fit.n, 5);
    }

    #[test]
    fn dispatcher_wraps_each_model() {
        let table = quadratic_table();
        let poly = fit_model(table.as_slice(), 0, ModelSpec::polynomial(2)).unwrap();
        assert_eq!(poly.coefficients.len(), 3);
        assert!(poly.r_squared.is_some());

        let line = fit_model(table.as_slice(), 0, ModelSpec::linear()).unwrap();
        assert_eq!(line.coefficients.len(), 2);
        assert_eq!(line.r_squared, None);
    }
}

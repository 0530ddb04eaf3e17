//! Reporting utilities: residuals, fit quality and formatted terminal output.
//!
//! We keep this apart from the fitting code so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;

use crate::domain::{FitQuality, FitResult, Observation, Residual};
use crate::models::predict_fit;

/// Fitted value and residual (`y − ŷ`) for each sample.
///
/// Non-finite predictions (e.g. a power law at `x <= 0`) are kept as they are.
pub fn compute_residuals(samples: &[Observation], fit: &FitResult) -> Vec<Residual> {
    samples
        .iter()
        .map(|&sample| {
            let y_fit = predict_fit(fit, sample.x);
            Residual {
                sample,
                y_fit,
                residual: sample.y - y_fit,
            }
        })
        .collect()
}

/// SSE / RMSE / R² over a set of residuals.
///
/// R² is the fit's own value when it has one (polynomial fits), otherwise
/// `1 − SSE/SST`.
pub fn fit_quality(residuals: &[Residual], fit: &FitResult) -> FitQuality {
    let n = residuals.len();
    let sse: f64 = residuals.iter().map(|r| r.residual * r.residual).sum();
    let rmse = (sse / n as f64).sqrt();

    let r_squared = fit.r_squared.unwrap_or_else(|| {
        let mean_y = residuals.iter().map(|r| r.sample.y).sum::<f64>() / n as f64;
        let sst: f64 = residuals.iter().map(|r| (r.sample.y - mean_y).powi(2)).sum();
        1.0 - sse / sst
    });

    FitQuality { n, sse, rmse, r_squared }
}

/// Residuals sorted by absolute size, largest first.
pub fn largest_residuals(residuals: &[Residual], top_n: usize) -> Vec<Residual> {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| {
        b.residual
            .abs()
            .partial_cmp(&a.residual.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(top_n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinearFit, PolynomialFit};

    fn line_fit() -> FitResult {
        LinearFit { intercept: 1.0, slope: 2.0, n: 3 }.into()
    }

    #[test]
    fn residuals_against_line() {
        let samples = [
            Observation::new(0.0, 1.0),
            Observation::new(1.0, 4.0),
            Observation::new(2.0, 4.0),
        ];
        let residuals = compute_residuals(&samples, &line_fit());
        let got: Vec<f64> = residuals.iter().map(|r| r.residual).collect();
        assert_eq!(got, vec![0.0, 1.0, -1.0]);
        assert_eq!(residuals[2].y_fit, 5.0);
    }

    #[test]
    fn quality_falls_back_to_sse_over_sst() {
        let samples = [
            Observation::new(0.0, 1.0),
            Observation::new(1.0, 4.0),
            Observation::new(2.0, 4.0),
        ];
        let fit = line_fit();
        let q = fit_quality(&compute_residuals(&samples, &fit), &fit);
        assert_eq!(q.n, 3);
        assert_eq!(q.sse, 2.0);
        // mean 3, SST = 4 + 1 + 1
        assert!((q.r_squared - (1.0 - 2.0 / 6.0)).abs() < 1e-12);
        assert!((q.rmse - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn quality_uses_polynomial_r_squared() {
        let fit: FitResult = PolynomialFit {
            coefficients: vec![1.0, 2.0],
            r_squared: 0.25,
            degenerate_from: None,
            n: 2,
        }
        .into();
        let samples = [Observation::new(0.0, 1.0), Observation::new(1.0, 3.0)];
        let q = fit_quality(&compute_residuals(&samples, &fit), &fit);
        assert_eq!(q.r_squared, 0.25);
        assert_eq!(q.sse, 0.0);
    }

    #[test]
    fn largest_residuals_by_magnitude() {
        let samples = [
            Observation::new(0.0, 1.5),
            Observation::new(1.0, 0.0),
            Observation::new(2.0, 5.0),
        ];
        let top = largest_residuals(&compute_residuals(&samples, &line_fit()), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].sample.x, 1.0);
        assert_eq!(top[1].sample.x, 0.0);
    }
}

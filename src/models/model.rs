//! Model evaluation for linear / power / polynomial fits.
//!
//! Reporting, plotting, exports and R² all need `ŷ(x)` for a fitted model;
//! it lives here so those callers stay generic over the model kind.

use crate::domain::{FitResult, ModelKind};

/// Evaluate the model at `x`.
///
/// `coefficients` is `[a, b]` for linear/power and `[a0 … ak]` for polynomial.
///
/// # Panics
/// Panics if a linear/power model is given fewer than two coefficients.
pub fn predict(kind: ModelKind, x: f64, coefficients: &[f64]) -> f64 {
    match kind {
        ModelKind::Linear => coefficients[0] + coefficients[1] * x,
        ModelKind::Power => coefficients[0] * x.powf(coefficients[1]),
        ModelKind::Polynomial => polynomial_value(coefficients, x),
    }
}

/// `Σ a_i · x^i`, evaluated by Horner's rule.
pub fn polynomial_value(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &a| acc * x + a)
}

/// Evaluate a fit result at `x`.
pub fn predict_fit(fit: &FitResult, x: f64) -> f64 {
    predict(fit.model.kind, x, &fit.coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_and_power() {
        assert_eq!(predict(ModelKind::Linear, 2.0, &[1.0, 3.0]), 7.0);
        assert_eq!(predict(ModelKind::Power, 3.0, &[2.0, 2.0]), 18.0);
    }

    #[test]
    fn horner_matches_expanded_form() {
        let coefficients = [1.0, 2.0, 3.0];
        for &x in &[-2.0, 0.0, 0.5, 4.0] {
            let expanded = 1.0 + 2.0 * x + 3.0 * x * x;
            assert!((predict(ModelKind::Polynomial, x, &coefficients) - expanded).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_polynomial_is_zero() {
        assert_eq!(polynomial_value(&[], 5.0), 0.0);
    }
}

//! Closed-form simple regression.
//!
//! Both the straight line `y = a + b·x` and the power law `y = a·x^b` reduce to
//! the same four running sums; the power law just feeds `(ln x, ln y)` in and
//! exponentiates the intercept on the way out.
//!
//! Nothing here guards the arithmetic: identical x-values give `Sxx = 0` and an
//! infinite or NaN slope, and non-positive inputs to the power law give NaN
//! logarithms that flow into the result. Callers check finiteness if they care.

use crate::domain::{LinearFit, Observation, PowerFit};
use crate::error::FitError;

/// Minimum sample count for a two-parameter fit.
pub const MIN_SAMPLES: usize = 2;

/// Running sums `Σx, Σy, Σx², Σxy`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OlsSums {
    pub n: usize,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_xx: f64,
    pub sum_xy: f64,
}

impl OlsSums {
    pub fn push(&mut self, x: f64, y: f64) {
        self.n += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xx += x * x;
        self.sum_xy += x * y;
    }

    /// `(intercept, slope)` from the centered sums.
    ///
    /// `Sxx = Σx² − (Σx)²/n`, `Sxy = Σxy − Σx·Σy/n`, `slope = Sxy/Sxx`,
    /// `intercept = ȳ − slope·x̄`.
    pub fn intercept_slope(&self) -> (f64, f64) {
        let n = self.n as f64;
        let sxx = self.sum_xx - (self.sum_x * self.sum_x) / n;
        let sxy = self.sum_xy - (self.sum_x * self.sum_y) / n;
        let x_bar = self.sum_x / n;
        let y_bar = self.sum_y / n;
        let slope = sxy / sxx;
        (y_bar - slope * x_bar, slope)
    }
}

fn ensure_enough(n: usize) -> Result<(), FitError> {
    if n < MIN_SAMPLES {
        return Err(FitError::InsufficientData {
            got: n,
            min: MIN_SAMPLES,
        });
    }
    Ok(())
}

/// OLS straight line through `samples`.
pub fn linear_fit(samples: &[Observation]) -> Result<LinearFit, FitError> {
    ensure_enough(samples.len())?;
    let mut sums = OlsSums::default();
    for s in samples {
        sums.push(s.x, s.y);
    }
    let (intercept, slope) = sums.intercept_slope();
    Ok(LinearFit {
        intercept,
        slope,
        n: sums.n,
    })
}

/// Power law `y = a·x^b` via OLS on `(ln x, ln y)`.
pub fn power_fit(samples: &[Observation]) -> Result<PowerFit, FitError> {
    ensure_enough(samples.len())?;
    let mut sums = OlsSums::default();
    for s in samples {
        sums.push(s.x.ln(), s.y.ln());
    }
    let (ln_a, b) = sums.intercept_slope();
    Ok(PowerFit {
        a: ln_a.exp(),
        b,
        n: sums.n,
    })
}

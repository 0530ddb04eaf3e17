//! Normal equations for polynomial least squares.
//!
//! For a polynomial of order `k` the normal equations `XᵀX·a = Xᵀy` of the
//! Vandermonde design matrix only involve power sums, so we accumulate them
//! directly instead of materializing `X`:
//!
//! ```text
//! M[e][c]     = Σ x_i^(e+c)      e, c in 0..=k
//! M[e][k + 1] = Σ y_i · x_i^e
//! ```
//!
//! The result is a `(k+1) x (k+2)` augmented matrix.

use nalgebra::DMatrix;

use crate::domain::Observation;

/// Build the augmented normal-equation matrix for `order`.
///
/// `samples` must already be free of missing values.
pub fn build_normal_equations(samples: &[Observation], order: usize) -> DMatrix<f64> {
    let equations = order + 1;
    let rhs = equations;
    let mut matrix = DMatrix::<f64>::zeros(equations, equations + 1);

    for s in samples {
        for e in 0..equations {
            for c in 0..equations {
                matrix[(e, c)] += s.x.powi((e + c) as i32);
            }
            matrix[(e, rhs)] += s.y * s.x.powi(e as i32);
        }
    }

    matrix
}

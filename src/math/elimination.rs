//! Row reduction of the augmented normal-equation system.
//!
//! The reduction is deliberately *not* Gaussian elimination with partial
//! pivoting. Its results on borderline systems are part of the observable
//! behavior of polynomial fits, so the exact policy is preserved:
//!
//! 1. At step `k` the active block is rows `k..m`, columns `k..=m`. Row `k` is
//!    the pivot row. Every row `e > k` is replaced by
//!    `M[k][c] − M[e][c] · (M[k][k] / M[e][k])` for `c > k`, and `M[e][k]`
//!    becomes zero. Note the factor divides by the *eliminated* row's leading
//!    entry; a zero there yields non-finite values that are left to propagate.
//! 2. If the next pivot `M[k+1][k+1]` is exactly zero, the first later row with
//!    a nonzero entry in that column is swapped into place. If there is none,
//!    rows `k+1..m` are zero-filled and the reduction stops: the system is
//!    degenerate from row `k+1` on.
//! 3. Back-substitution runs from the last equation upward. Unknowns in the
//!    zero-filled block are reported as `0.0`.
//!
//! All steps work in place on the one matrix; no reduced copies are allocated.

use nalgebra::DMatrix;

use crate::error::FitError;

/// Outcome of solving an augmented system.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// One value per equation.
    pub coefficients: Vec<f64>,
    /// First row left without a usable pivot, if any.
    pub degenerate_from: Option<usize>,
}

/// Reduce `matrix` to upper-triangular form in place.
///
/// Returns the row index from which the system is degenerate, if it is.
pub fn reduce_in_place(matrix: &mut DMatrix<f64>) -> Result<Option<usize>, FitError> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols != rows + 1 {
        return Err(FitError::MatrixShape { rows, cols });
    }
    let rhs = rows;

    for k in 0..rows - 1 {
        let pivot = matrix[(k, k)];
        for e in (k + 1)..rows {
            let factor = pivot / matrix[(e, k)];
            for c in (k + 1)..=rhs {
                matrix[(e, c)] = matrix[(k, c)] - matrix[(e, c)] * factor;
            }
            matrix[(e, k)] = 0.0;
        }

        let next = k + 1;
        if matrix[(next, next)] == 0.0 {
            match ((next + 1)..rows).find(|&i| matrix[(i, next)] != 0.0) {
                Some(i) => matrix.swap_rows(next, i),
                None => {
                    matrix.rows_mut(next, rows - next).fill(0.0);
                    return Ok(Some(next));
                }
            }
        }
    }

    Ok(None)
}

/// Back-substitute an upper-triangular augmented matrix.
///
/// Rows at or past `degenerate_from` are not solved; their unknowns stay `0.0`.
pub fn back_substitute(matrix: &DMatrix<f64>, degenerate_from: Option<usize>) -> Vec<f64> {
    let rows = matrix.nrows();
    let rhs = rows;
    let solved_rows = degenerate_from.unwrap_or(rows).min(rows);

    let mut coefficients = vec![0.0; rows];
    for e in (0..solved_rows).rev() {
        let mut value = matrix[(e, rhs)];
        for c in (e + 1)..rows {
            value -= matrix[(e, c)] * coefficients[c];
        }
        coefficients[e] = value / matrix[(e, e)];
    }
    coefficients
}

/// Solve an `m x (m + 1)` augmented system. The input is left untouched.
pub fn solve_augmented(matrix: &DMatrix<f64>) -> Result<Solution, FitError> {
    let mut work = matrix.clone();
    let degenerate_from = reduce_in_place(&mut work)?;
    let coefficients = back_substitute(&work, degenerate_from);
    Ok(Solution {
        coefficients,
        degenerate_from,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_system() {
        // 2a + b = 5, a + 3b = 10  ->  a = 1, b = 3
        let m = DMatrix::from_row_slice(2, 3, &[2.0, 1.0, 5.0, 1.0, 3.0, 10.0]);
        let sol = solve_augmented(&m).unwrap();
        assert!((sol.coefficients[0] - 1.0).abs() < 1e-12);
        assert!((sol.coefficients[1] - 3.0).abs() < 1e-12);
        assert_eq!(sol.degenerate_from, None);
    }

    #[test]
    fn solves_three_by_three() {
        // x + y + z = 6, 2x + y + 3z = 13, x + 4y + z = 12 -> (1, 2, 3)
        let m = DMatrix::from_row_slice(
            3,
            4,
            &[1.0, 1.0, 1.0, 6.0, 2.0, 1.0, 3.0, 13.0, 1.0, 4.0, 1.0, 12.0],
        );
        let sol = solve_augmented(&m).unwrap();
        for (got, want) in sol.coefficients.iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
        }
    }

    #[test]
    fn zero_pivot_swaps_in_first_usable_row() {
        //  x +  y +  z = 3
        //  x +  y + 2z = 4
        //  x + 2y +  z = 4
        // Eliminating column 0 leaves [0, 0, -1 | -1] and [0, -1, 0 | -1]; the
        // first has a zero pivot so the second is swapped in.
        let mut m = DMatrix::from_row_slice(
            3,
            4,
            &[1.0, 1.0, 1.0, 3.0, 1.0, 1.0, 2.0, 4.0, 1.0, 2.0, 1.0, 4.0],
        );
        let degenerate = reduce_in_place(&mut m).unwrap();
        assert_eq!(degenerate, None);
        assert_eq!(m[(1, 1)], -1.0);
        assert_eq!(m[(1, 2)], 0.0);
        assert_eq!(m[(1, 3)], -1.0);
        // The swapped-out row now leads with zero, so its elimination factor
        // is infinite and the last row goes non-finite.
        assert!(m[(2, 2)].is_infinite());
    }

    #[test]
    fn no_usable_pivot_zero_fills_the_rest() {
        // Second equation is a multiple of the first.
        let m = DMatrix::from_row_slice(2, 3, &[2.0, 4.0, 4.0, 4.0, 8.0, 8.0]);
        let sol = solve_augmented(&m).unwrap();
        assert_eq!(sol.degenerate_from, Some(1));
        assert_eq!(sol.coefficients[1], 0.0);
        assert!((sol.coefficients[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_leading_entry_in_eliminated_row_propagates() {
        // Row 1 has a zero in column 0, so the elimination factor is infinite.
        let m = DMatrix::from_row_slice(2, 3, &[5.0, 0.0, 10.0, 0.0, 10.0, 20.0]);
        let sol = solve_augmented(&m).unwrap();
        assert!(sol.coefficients.iter().any(|c| !c.is_finite()));
        assert_eq!(sol.degenerate_from, None);
    }

    #[test]
    fn rejects_non_augmented_shape() {
        let m = DMatrix::<f64>::zeros(3, 3);
        assert_eq!(
            solve_augmented(&m).unwrap_err(),
            FitError::MatrixShape { rows: 3, cols: 3 }
        );
    }

    #[test]
    fn single_equation_divides_through() {
        let m = DMatrix::from_row_slice(1, 2, &[4.0, 10.0]);
        let sol = solve_augmented(&m).unwrap();
        assert_eq!(sol.coefficients, vec![2.5]);
    }
}

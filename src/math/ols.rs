//! Least squares solver with a conditioning gate.
//!
//! The inner step of calibration solves, for a fixed `tau`:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! where the design matrix has three columns (intercept, slope loading,
//! curvature loading). Extreme `tau` values push the two loadings toward
//! collinearity, so we solve via SVD and reject candidates whose condition
//! number exceeds the caller's ceiling rather than returning a wild solution.

use nalgebra::{DMatrix, DVector};

/// Result of a successful least-squares solve.
#[derive(Debug, Clone)]
pub struct LsSolution {
    pub beta: DVector<f64>,
    /// Condition number of the design matrix (ratio of extreme singular values).
    pub condition: f64,
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` when the design matrix is rank-deficient, its condition
/// number exceeds `max_condition`, or the solution is non-finite.
pub fn solve_least_squares(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    max_condition: f64,
) -> Option<LsSolution> {
    let svd = x.clone().svd(true, true);

    let s_max = svd
        .singular_values
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    let s_min = svd
        .singular_values
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    if !(s_max.is_finite() && s_min.is_finite()) || s_max <= 0.0 {
        return None;
    }

    let condition = if s_min > 0.0 { s_max / s_min } else { f64::INFINITY };
    if !condition.is_finite() || condition > max_condition {
        return None;
    }

    let beta = svd.solve(y, s_max * 1e-14).ok()?;
    if beta.iter().all(|v| v.is_finite()) {
        Some(LsSolution { beta, condition })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_simple_line() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let sol = solve_least_squares(&x, &y, 1e12).unwrap();
        assert!((sol.beta[0] - 2.0).abs() < 1e-10);
        assert!((sol.beta[1] - 3.0).abs() < 1e-10);
        assert!(sol.condition >= 1.0);
    }

    #[test]
    fn rejects_collinear_columns() {
        // Second column is an exact copy of the first.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]);

        assert!(solve_least_squares(&x, &y, 1e12).is_none());
    }

    #[test]
    fn condition_ceiling_is_enforced() {
        // Nearly collinear columns: solvable with a loose ceiling, rejected
        // with a strict one.
        let eps = 1e-6;
        let x = DMatrix::from_row_slice(
            4,
            2,
            &[
                1.0,
                1.0 + eps,
                2.0,
                2.0 + eps,
                3.0,
                3.0 + eps,
                4.0,
                4.0 + eps,
            ],
        );
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]);

        assert!(solve_least_squares(&x, &y, 1e12).is_some());
        assert!(solve_least_squares(&x, &y, 1e3).is_none());
    }
}

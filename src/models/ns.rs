//! Nelson–Siegel evaluation primitives.
//!
//! The fitter relies on two operations:
//! - build a design row for a given maturity and tau (for the inner OLS)
//! - predict `y(t)` given full parameters (for residuals/plots)

use crate::domain::NelsonSiegelParams;
use crate::math::{loading_curvature, loading_slope};

/// Number of linear coefficients (intercept, slope, curvature).
pub const BETA_LEN: usize = 3;

/// Total parameter count (betas plus tau), the identification minimum for
/// calibration inputs.
pub const PARAM_COUNT: usize = BETA_LEN + 1;

/// Fill a design row `[1, slope(t, tau), curvature(t, tau)]`.
///
/// # Panics
/// Panics if `out` does not have length [`BETA_LEN`]. Callers size the row
/// once and reuse it across maturities.
pub fn fill_design_row(t: f64, tau: f64, out: &mut [f64]) {
    out[0] = 1.0;
    out[1] = loading_slope(t, tau);
    out[2] = loading_curvature(t, tau);
}

/// Predict `y(t)` for the given parameters.
pub fn predict(t: f64, params: &NelsonSiegelParams) -> f64 {
    params.beta0
        + params.beta1 * loading_slope(t, params.tau)
        + params.beta2 * loading_curvature(t, params.tau)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_matches_closed_form() {
        let params = NelsonSiegelParams {
            beta0: 4.5,
            beta1: 0.8,
            beta2: -1.2,
            tau: 1.8,
        };
        let t: f64 = 7.0;
        let x = t / params.tau;
        let slope = (1.0 - (-x).exp()) / x;
        let expected = params.beta0
            + params.beta1 * slope
            + params.beta2 * (slope - (-x).exp());

        let got = predict(t, &params);
        assert!(
            (got - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "predict {got} vs closed form {expected}"
        );
    }

    #[test]
    fn short_end_limit_is_level_plus_slope() {
        let params = NelsonSiegelParams {
            beta0: 4.0,
            beta1: 1.25,
            beta2: -0.7,
            tau: 2.0,
        };
        assert_eq!(predict(0.0, &params), params.beta0 + params.beta1);
        let near_zero = predict(1e-6, &params);
        assert!((near_zero - (params.beta0 + params.beta1)).abs() < 1e-6);
    }

    #[test]
    fn long_end_approaches_beta0() {
        let params = NelsonSiegelParams {
            beta0: 4.6,
            beta1: 0.7,
            beta2: -1.0,
            tau: 1.5,
        };
        let y = predict(500.0, &params);
        assert!((y - params.beta0).abs() < 1e-2);
    }

    #[test]
    fn design_row_is_consistent_with_predict() {
        let params = NelsonSiegelParams {
            beta0: 2.0,
            beta1: -0.5,
            beta2: 3.0,
            tau: 0.9,
        };
        let mut row = [0.0; BETA_LEN];
        for &t in &[0.0, 0.25, 1.0, 10.0, 30.0] {
            fill_design_row(t, params.tau, &mut row);
            let via_row = params.beta0 * row[0] + params.beta1 * row[1] + params.beta2 * row[2];
            assert!((via_row - predict(t, &params)).abs() < 1e-12);
        }
    }
}

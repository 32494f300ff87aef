//! Nelson–Siegel calibration.
//!
//! Given observations `(m_i, y_i)` we solve, for each candidate `tau`:
//!
//! - an ordinary least-squares problem for the best betas (the model is
//!   linear in the betas at fixed tau)
//! - the resulting sum of squared residuals
//!
//! and minimize over `tau` with a deterministic log-spaced grid sweep
//! followed by golden-section refinement around the winning grid point.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{
    normalize_observations, FitQuality, FittedCurve, NelsonSiegelParams, Observation,
};
use crate::error::CurveError;
use crate::fit::tau_grid::log_space;
use crate::math::solve_least_squares;
use crate::models::{fill_design_row, predict, BETA_LEN, PARAM_COUNT};

/// Options controlling the outer tau search and the conditioning gate.
#[derive(Debug, Clone)]
pub struct FitOptions {
    pub tau_min: f64,
    pub tau_max: f64,
    pub tau_steps: usize,
    /// Condition-number ceiling for the inner solve. Candidates above it are
    /// rejected; if every candidate is rejected the fit is degenerate.
    pub max_condition: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tau_min: 0.05,
            tau_max: 30.0,
            tau_steps: 60,
            max_condition: 1e12,
        }
    }
}

/// Inner-stage result: the betas that are optimal for one fixed tau.
#[derive(Debug, Clone)]
pub struct InnerFit {
    pub params: NelsonSiegelParams,
    pub sse: f64,
    pub condition: f64,
}

/// Calibrate with default options.
pub fn calibrate(observations: &[Observation]) -> Result<FittedCurve, CurveError> {
    calibrate_with(observations, &FitOptions::default())
}

/// Calibrate a Nelson–Siegel curve by two-stage least squares.
pub fn calibrate_with(
    observations: &[Observation],
    opts: &FitOptions,
) -> Result<FittedCurve, CurveError> {
    let obs = normalize_observations(observations)?;
    if obs.len() < PARAM_COUNT {
        return Err(CurveError::InsufficientData {
            needed: PARAM_COUNT,
            got: obs.len(),
        });
    }

    let maturities: Vec<f64> = obs.iter().map(|o| o.maturity_years).collect();
    let yields: Vec<f64> = obs.iter().map(|o| o.yield_pct).collect();

    let grid = log_space(opts.tau_min, opts.tau_max, opts.tau_steps)?;

    // Stage 2 (outer): sweep the tau grid, solving stage 1 (inner) at each
    // candidate in parallel.
    let candidates: Vec<(usize, InnerFit)> = grid
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &tau)| {
            solve_for_tau(&maturities, &yields, tau, opts.max_condition).map(|fit| (idx, fit))
        })
        .collect();

    let Some(&(best_idx, ref best_grid)) = candidates.iter().min_by(|(ia, a), (ib, b)| {
        a.sse
            .partial_cmp(&b.sse)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(ia.cmp(ib))
    }) else {
        return Err(CurveError::DegenerateFit {
            limit: opts.max_condition,
        });
    };

    // Local refinement between the grid neighbours of the winner.
    let lo = grid[best_idx.saturating_sub(1)];
    let hi = grid[(best_idx + 1).min(grid.len() - 1)];
    let refined = refine_tau(&maturities, &yields, lo, hi, opts.max_condition);

    let best = match refined {
        Some(fit) if fit.sse < best_grid.sse => fit,
        _ => best_grid.clone(),
    };

    let n = obs.len();
    let quality = FitQuality {
        sse: best.sse,
        rmse: (best.sse / n as f64).sqrt(),
        n,
    };
    FittedCurve::new(best.params, quality)
}

/// Stage 1: solve the linear least-squares problem for a fixed tau.
///
/// Pure in its inputs; exposed so the inner solve can be exercised in
/// isolation from the outer search. Returns `None` when the design matrix
/// fails the conditioning gate.
pub fn solve_for_tau(
    maturities: &[f64],
    yields: &[f64],
    tau: f64,
    max_condition: f64,
) -> Option<InnerFit> {
    if !(tau.is_finite() && tau > 0.0) {
        return None;
    }

    let n = maturities.len();
    let mut x = DMatrix::<f64>::zeros(n, BETA_LEN);
    let mut y = DVector::<f64>::zeros(n);
    let mut row = [0.0; BETA_LEN];

    for i in 0..n {
        fill_design_row(maturities[i], tau, &mut row);
        for j in 0..BETA_LEN {
            x[(i, j)] = row[j];
        }
        y[i] = yields[i];
    }

    let sol = solve_least_squares(&x, &y, max_condition)?;
    let params = NelsonSiegelParams {
        beta0: sol.beta[0],
        beta1: sol.beta[1],
        beta2: sol.beta[2],
        tau,
    };

    let mut sse = 0.0;
    for i in 0..n {
        let r = yields[i] - predict(maturities[i], &params);
        sse += r * r;
    }

    if sse.is_finite() {
        Some(InnerFit {
            params,
            sse,
            condition: sol.condition,
        })
    } else {
        None
    }
}

/// Golden-section minimization of SSE over `ln(tau)` in `[lo, hi]`.
///
/// Candidates that fail the conditioning gate score as infinite, so the
/// search walks away from ill-conditioned regions deterministically.
fn refine_tau(
    maturities: &[f64],
    yields: &[f64],
    lo: f64,
    hi: f64,
    max_condition: f64,
) -> Option<InnerFit> {
    const INV_PHI: f64 = 0.618_033_988_749_894_9;
    const MAX_ITERS: usize = 60;

    if !(lo > 0.0 && hi > lo) {
        return None;
    }

    let objective = |ln_tau: f64| -> (f64, Option<InnerFit>) {
        match solve_for_tau(maturities, yields, ln_tau.exp(), max_condition) {
            Some(fit) => (fit.sse, Some(fit)),
            None => (f64::INFINITY, None),
        }
    };

    let mut a = lo.ln();
    let mut b = hi.ln();
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let (mut fc, mut fit_c) = objective(c);
    let (mut fd, mut fit_d) = objective(d);

    for _ in 0..MAX_ITERS {
        if (b - a).abs() < 1e-12 {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            fit_d = fit_c.take();
            c = b - INV_PHI * (b - a);
            (fc, fit_c) = objective(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            fit_c = fit_d.take();
            d = a + INV_PHI * (b - a);
            (fd, fit_d) = objective(d);
        }
    }

    if fc < fd { fit_c } else { fit_d }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve_from(params: &NelsonSiegelParams, maturities: &[f64]) -> Vec<Observation> {
        maturities
            .iter()
            .map(|&m| Observation::new(m, predict(m, params)))
            .collect()
    }

    const TREASURY_TENORS: [f64; 11] = [
        1.0 / 12.0,
        0.25,
        0.5,
        1.0,
        2.0,
        3.0,
        5.0,
        7.0,
        10.0,
        20.0,
        30.0,
    ];

    #[test]
    fn noise_free_round_trip_recovers_parameters() {
        let truth = NelsonSiegelParams {
            beta0: 4.5,
            beta1: 0.8,
            beta2: -1.2,
            tau: 1.8,
        };
        let obs = curve_from(&truth, &TREASURY_TENORS);

        let fitted = calibrate(&obs).unwrap();
        let p = fitted.params();

        assert!((p.beta0 - truth.beta0).abs() < 1e-4, "beta0 {}", p.beta0);
        assert!((p.beta1 - truth.beta1).abs() < 1e-4, "beta1 {}", p.beta1);
        assert!((p.beta2 - truth.beta2).abs() < 1e-4, "beta2 {}", p.beta2);
        assert!((p.tau - truth.tau).abs() < 1e-4, "tau {}", p.tau);
        assert!(fitted.quality().sse < 1e-8);
    }

    #[test]
    fn round_trip_holds_for_an_inverted_curve() {
        let truth = NelsonSiegelParams {
            beta0: 4.0,
            beta1: 1.5,
            beta2: -2.0,
            tau: 0.9,
        };
        let obs = curve_from(&truth, &TREASURY_TENORS);
        let p = calibrate(&obs).unwrap().params();
        assert!((p.tau - truth.tau).abs() < 1e-4);
        assert!((p.beta1 - truth.beta1).abs() < 1e-4);
    }

    #[test]
    fn fewer_than_four_distinct_maturities_is_insufficient() {
        let obs = vec![
            Observation::new(1.0, 4.9),
            Observation::new(5.0, 4.2),
            Observation::new(10.0, 4.35),
        ];
        assert!(matches!(
            calibrate(&obs),
            Err(CurveError::InsufficientData { needed: 4, got: 3 })
        ));

        // Duplicates collapse before the count: five rows, three maturities.
        let obs = vec![
            Observation::new(1.0, 4.9),
            Observation::new(1.0, 4.8),
            Observation::new(5.0, 4.2),
            Observation::new(5.0, 4.3),
            Observation::new(10.0, 4.35),
        ];
        assert!(matches!(
            calibrate(&obs),
            Err(CurveError::InsufficientData { needed: 4, got: 3 })
        ));
    }

    #[test]
    fn non_positive_maturity_is_rejected() {
        let obs = vec![
            Observation::new(-0.5, 5.0),
            Observation::new(1.0, 4.9),
            Observation::new(5.0, 4.2),
            Observation::new(10.0, 4.35),
        ];
        assert!(matches!(
            calibrate(&obs),
            Err(CurveError::InvalidMaturity { .. })
        ));
    }

    #[test]
    fn impossible_condition_ceiling_reports_degenerate_fit() {
        let truth = NelsonSiegelParams {
            beta0: 4.5,
            beta1: 0.8,
            beta2: -1.2,
            tau: 1.8,
        };
        let obs = curve_from(&truth, &TREASURY_TENORS);
        let opts = FitOptions {
            max_condition: 1.0,
            ..FitOptions::default()
        };
        assert!(matches!(
            calibrate_with(&obs, &opts),
            Err(CurveError::DegenerateFit { .. })
        ));
    }

    #[test]
    fn treasury_snapshot_scenario_fits_sanely() {
        // Short-to-long snapshot of an inverted-then-rising curve.
        let obs = vec![
            Observation::new(1.0 / 12.0, 5.30),
            Observation::new(1.0, 4.90),
            Observation::new(5.0, 4.20),
            Observation::new(10.0, 4.35),
            Observation::new(30.0, 4.60),
        ];

        let fitted = calibrate(&obs).unwrap();
        assert!(fitted.quality().sse < 1.0, "sse {}", fitted.quality().sse);

        let y10 = fitted.evaluate(10.0).unwrap();
        let y20 = fitted.evaluate(20.0).unwrap();
        let y30 = fitted.evaluate(30.0).unwrap();
        let (lo, hi) = if y10 <= y30 { (y10, y30) } else { (y30, y10) };
        assert!(
            y20 >= lo && y20 <= hi,
            "y(20)={y20} outside [{lo}, {hi}]"
        );
    }

    #[test]
    fn inner_solve_is_exact_at_the_true_tau() {
        let truth = NelsonSiegelParams {
            beta0: 4.5,
            beta1: 0.8,
            beta2: -1.2,
            tau: 1.8,
        };
        let maturities: Vec<f64> = TREASURY_TENORS.to_vec();
        let yields: Vec<f64> = maturities.iter().map(|&m| predict(m, &truth)).collect();

        let fit = solve_for_tau(&maturities, &yields, truth.tau, 1e12).unwrap();
        assert!(fit.sse < 1e-18);
        assert!((fit.params.beta0 - truth.beta0).abs() < 1e-9);
        assert!((fit.params.beta1 - truth.beta1).abs() < 1e-9);
        assert!((fit.params.beta2 - truth.beta2).abs() < 1e-9);
        assert!(fit.condition >= 1.0);
    }
}

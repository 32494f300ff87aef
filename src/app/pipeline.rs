//! Shared pipeline logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflows:
//!
//! - curve: FRED fetch -> calibrate NS -> spline -> residual triples
//! - pca:   FRED fetch -> daily changes -> correlation eigendecomposition
//!
//! Both have a `_with_*` variant that accepts pre-fetched data, which is the
//! seam tests (and any future front-end) use to avoid the network.

use crate::data::fred::{fetch_panel, fetch_snapshot, CurveSnapshot, FredClient, YieldPanel};
use crate::data::sample::{sample_panel, sample_snapshot, synthetic_panel};
use crate::domain::{CurveConfig, FittedCurve, FittedPoint, PcaConfig, TreasuryTenor};
use crate::error::AppError;
use crate::fit::{calibrate_with, FitOptions};
use crate::math::{daily_changes, scree, spline_fit, ExplainedVariance, SplineCurve};
use crate::report::compute_points;

/// Business days per month used to size the offline sample panel.
const SAMPLE_DAYS_PER_MONTH: usize = 21;

/// All computed outputs of a single `tsy curve` run.
#[derive(Debug, Clone)]
pub struct CurveRunOutput {
    pub snapshot: CurveSnapshot,
    pub curve: FittedCurve,
    pub spline: SplineCurve,
    pub points: Vec<FittedPoint>,
}

/// Execute the full curve pipeline and return the computed outputs.
pub fn run_curve(config: &CurveConfig) -> Result<CurveRunOutput, AppError> {
    let snapshot = if config.offline {
        sample_snapshot()
    } else {
        let client = FredClient::from_env()?;
        fetch_snapshot(&client, config.asof_date)?
    };

    run_curve_with_snapshot(config, snapshot)
}

/// Execute the curve pipeline with a pre-fetched snapshot.
pub fn run_curve_with_snapshot(
    config: &CurveConfig,
    snapshot: CurveSnapshot,
) -> Result<CurveRunOutput, AppError> {
    let observations = snapshot.to_observations();

    let opts = FitOptions {
        tau_min: config.tau_min,
        tau_max: config.tau_max,
        tau_steps: config.tau_steps,
        max_condition: config.max_condition,
    };
    let curve = calibrate_with(&observations, &opts)?;
    let spline = spline_fit(&observations)?;
    let points = compute_points(&snapshot, &curve, Some(&spline))?;

    Ok(CurveRunOutput {
        snapshot,
        curve,
        spline,
        points,
    })
}

/// All computed outputs of a single `tsy pca` run.
#[derive(Debug, Clone)]
pub struct PcaRunOutput {
    pub synthetic: ExplainedVariance,
    pub real: ExplainedVariance,
    pub panel: YieldPanel,
}

/// Execute the full correlation-study pipeline.
pub fn run_pca(config: &PcaConfig) -> Result<PcaRunOutput, AppError> {
    let panel = if config.offline {
        sample_panel(
            config.seed,
            config.window_months as usize * SAMPLE_DAYS_PER_MONTH,
        )?
    } else {
        let client = FredClient::from_env()?;
        fetch_panel(&client, &TreasuryTenor::SHORT, config.window_months, None)?
    };

    run_pca_with_panel(config, panel)
}

/// Execute the correlation-study pipeline with a pre-fetched panel.
pub fn run_pca_with_panel(config: &PcaConfig, panel: YieldPanel) -> Result<PcaRunOutput, AppError> {
    let synthetic_data = synthetic_panel(
        config.synthetic_samples,
        config.synthetic_vars,
        config.synthetic_sd,
        config.seed,
    )?;
    let synthetic = scree(&synthetic_data)?;

    let changes = daily_changes(&panel.values)?;
    let real = scree(&changes)?;

    Ok(PcaRunOutput {
        synthetic,
        real,
        panel,
    })
}

//! Deterministic offline data.
//!
//! `--offline` runs use these instead of FRED: a fixed curve snapshot, a
//! seeded random-walk yield panel, and the seeded i.i.d. Gaussian panel for
//! the synthetic half of the correlation study.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use nalgebra::DMatrix;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::fred::{CurveSnapshot, YieldPanel};
use crate::domain::TreasuryTenor;
use crate::error::AppError;

/// As-of date stamped on offline artifacts.
fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or_default()
}

/// A full-curve snapshot shaped like the mid-2024 inverted Treasury curve.
pub fn sample_snapshot() -> CurveSnapshot {
    let yields = vec![
        (TreasuryTenor::M1, 5.47),
        (TreasuryTenor::M3, 5.48),
        (TreasuryTenor::M6, 5.33),
        (TreasuryTenor::Y1, 5.09),
        (TreasuryTenor::Y2, 4.71),
        (TreasuryTenor::Y3, 4.49),
        (TreasuryTenor::Y5, 4.33),
        (TreasuryTenor::Y7, 4.32),
        (TreasuryTenor::Y10, 4.36),
        (TreasuryTenor::Y20, 4.61),
        (TreasuryTenor::Y30, 4.51),
    ];
    CurveSnapshot {
        date: sample_date(),
        yields,
    }
}

/// A seeded random-walk panel for the short tenors.
///
/// Innovations mix one common level factor with per-series noise, so the
/// panel exhibits the factor structure the correlation study is meant to
/// surface (first component dominant, remainder small).
pub fn sample_panel(seed: u64, business_days: usize) -> Result<YieldPanel, AppError> {
    if business_days < 3 {
        return Err(AppError::new(2, "Sample panel needs at least 3 days."));
    }

    let tenors = TreasuryTenor::SHORT.to_vec();
    let snapshot = sample_snapshot();
    let mut levels: Vec<f64> = tenors
        .iter()
        .map(|t| {
            snapshot
                .yields
                .iter()
                .find(|(s, _)| s == t)
                .map(|(_, y)| *y)
                .unwrap_or(5.0)
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let level_shock = Normal::new(0.0, 0.04)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;
    let idio_shock = Normal::new(0.0, 0.01)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut dates = Vec::with_capacity(business_days);
    let mut values = DMatrix::zeros(business_days, tenors.len());

    let mut date = sample_date();
    for i in 0..business_days {
        date = next_business_day(date);
        dates.push(date);

        let common = level_shock.sample(&mut rng);
        for (j, level) in levels.iter_mut().enumerate() {
            *level += common + idio_shock.sample(&mut rng);
            values[(i, j)] = *level;
        }
    }

    Ok(YieldPanel {
        tenors,
        dates,
        values,
    })
}

/// The synthetic half of the correlation study: `n_samples x n_vars`
/// i.i.d. draws from `N(0, sd^2)`.
pub fn synthetic_panel(
    n_samples: usize,
    n_vars: usize,
    sd: f64,
    seed: u64,
) -> Result<DMatrix<f64>, AppError> {
    if n_samples < 2 || n_vars == 0 {
        return Err(AppError::new(
            2,
            "Synthetic panel needs at least 2 samples and 1 variable.",
        ));
    }
    if !(sd.is_finite() && sd > 0.0) {
        return Err(AppError::new(2, "Synthetic standard deviation must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal =
        Normal::new(0.0, sd).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut out = DMatrix::zeros(n_samples, n_vars);
    for i in 0..n_samples {
        for j in 0..n_vars {
            out[(i, j)] = normal.sample(&mut rng);
        }
    }
    Ok(out)
}

fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while matches!(next.weekday(), Weekday::Sat | Weekday::Sun) {
        next += Duration::days(1);
    }
    next
}

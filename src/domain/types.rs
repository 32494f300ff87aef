//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// U.S. Treasury constant-maturity series available from FRED.
///
/// The variants are ordered short to long; `ALL` preserves that order so
/// snapshots come out sorted by maturity without an extra sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreasuryTenor {
    M1,
    M3,
    M6,
    Y1,
    Y2,
    Y3,
    Y5,
    Y7,
    Y10,
    Y20,
    Y30,
}

impl TreasuryTenor {
    pub const ALL: [TreasuryTenor; 11] = [
        TreasuryTenor::M1,
        TreasuryTenor::M3,
        TreasuryTenor::M6,
        TreasuryTenor::Y1,
        TreasuryTenor::Y2,
        TreasuryTenor::Y3,
        TreasuryTenor::Y5,
        TreasuryTenor::Y7,
        TreasuryTenor::Y10,
        TreasuryTenor::Y20,
        TreasuryTenor::Y30,
    ];

    /// The five short tenors used for the correlation/PCA study.
    pub const SHORT: [TreasuryTenor; 5] = [
        TreasuryTenor::M1,
        TreasuryTenor::M3,
        TreasuryTenor::M6,
        TreasuryTenor::Y1,
        TreasuryTenor::Y2,
    ];

    /// FRED series identifier.
    pub fn series_id(self) -> &'static str {
        match self {
            TreasuryTenor::M1 => "DGS1MO",
            TreasuryTenor::M3 => "DGS3MO",
            TreasuryTenor::M6 => "DGS6MO",
            TreasuryTenor::Y1 => "DGS1",
            TreasuryTenor::Y2 => "DGS2",
            TreasuryTenor::Y3 => "DGS3",
            TreasuryTenor::Y5 => "DGS5",
            TreasuryTenor::Y7 => "DGS7",
            TreasuryTenor::Y10 => "DGS10",
            TreasuryTenor::Y20 => "DGS20",
            TreasuryTenor::Y30 => "DGS30",
        }
    }

    /// Maturity in years.
    pub fn years(self) -> f64 {
        match self {
            TreasuryTenor::M1 => 1.0 / 12.0,
            TreasuryTenor::M3 => 3.0 / 12.0,
            TreasuryTenor::M6 => 6.0 / 12.0,
            TreasuryTenor::Y1 => 1.0,
            TreasuryTenor::Y2 => 2.0,
            TreasuryTenor::Y3 => 3.0,
            TreasuryTenor::Y5 => 5.0,
            TreasuryTenor::Y7 => 7.0,
            TreasuryTenor::Y10 => 10.0,
            TreasuryTenor::Y20 => 20.0,
            TreasuryTenor::Y30 => 30.0,
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            TreasuryTenor::M1 => "1M",
            TreasuryTenor::M3 => "3M",
            TreasuryTenor::M6 => "6M",
            TreasuryTenor::Y1 => "1Y",
            TreasuryTenor::Y2 => "2Y",
            TreasuryTenor::Y3 => "3Y",
            TreasuryTenor::Y5 => "5Y",
            TreasuryTenor::Y7 => "7Y",
            TreasuryTenor::Y10 => "10Y",
            TreasuryTenor::Y20 => "20Y",
            TreasuryTenor::Y30 => "30Y",
        }
    }
}

/// A single curve observation: maturity in years and yield in percent.
///
/// Maturities must be strictly positive for calibration; yields are FRED
/// `DGS*` values kept in percent end-to-end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub maturity_years: f64,
    pub yield_pct: f64,
}

impl Observation {
    pub fn new(maturity_years: f64, yield_pct: f64) -> Self {
        Self {
            maturity_years,
            yield_pct,
        }
    }
}

/// Nelson–Siegel parameters.
///
/// - `beta0`: long-run level (`y(t) → beta0` as `t → ∞`)
/// - `beta1`: short-end component (`y(0) = beta0 + beta1`)
/// - `beta2`: medium-term hump component
/// - `tau`: decay scale in years; must be strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelsonSiegelParams {
    pub beta0: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub tau: f64,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    /// Sum of squared residuals at the chosen parameters.
    pub sse: f64,
    pub rmse: f64,
    /// Number of observations used (after duplicate-maturity averaging).
    pub n: usize,
}

/// A calibrated Nelson–Siegel curve.
///
/// Immutable once produced: the parameters are only reachable through
/// accessors, so the tau > 0 invariant established at construction holds for
/// the lifetime of the value. (Persistence goes through [`CurveFile`], which
/// stores the raw parameters; rebuilding a curve from it re-runs validation.)
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    params: NelsonSiegelParams,
    quality: FitQuality,
}

impl FittedCurve {
    /// Build a curve from known parameters.
    ///
    /// `quality` describes the calibration that produced the parameters; use
    /// [`FitQuality`] with `sse = 0, n = 0` for curves constructed directly
    /// (e.g. in tests or when reloading exported parameters).
    pub fn new(params: NelsonSiegelParams, quality: FitQuality) -> Result<Self, CurveError> {
        if !(params.tau.is_finite() && params.tau > 0.0) {
            return Err(CurveError::InvalidTau { value: params.tau });
        }
        for (name, value) in [
            ("beta0", params.beta0),
            ("beta1", params.beta1),
            ("beta2", params.beta2),
        ] {
            if !value.is_finite() {
                return Err(CurveError::NonFiniteParameter { name, value });
            }
        }
        Ok(Self { params, quality })
    }

    pub fn params(&self) -> NelsonSiegelParams {
        self.params
    }

    pub fn quality(&self) -> FitQuality {
        self.quality
    }

    /// Evaluate the curve at a maturity in years.
    ///
    /// Maturity 0 is handled via the limit convention `y(0) = beta0 + beta1`;
    /// any non-negative maturity is valid, including extrapolation beyond the
    /// calibration range.
    pub fn evaluate(&self, maturity_years: f64) -> Result<f64, CurveError> {
        if !(maturity_years.is_finite() && maturity_years >= 0.0) {
            return Err(CurveError::InvalidMaturity {
                value: maturity_years,
            });
        }
        Ok(crate::models::predict(maturity_years, &self.params))
    }
}

/// A per-tenor fitted result (used for reporting and exports).
#[derive(Debug, Clone)]
pub struct FittedPoint {
    /// Series label, e.g. `10Y`.
    pub label: String,
    pub maturity_years: f64,
    pub observed: f64,
    pub fitted: f64,
    pub residual: f64,
    /// Spline value at the same maturity (`None` when the spline was skipped).
    pub spline: Option<f64>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub asof_date: NaiveDate,
    pub params: NelsonSiegelParams,
    pub fit_quality: FitQuality,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub maturity_years: Vec<f64>,
    pub yield_pct: Vec<f64>,
}

/// Configuration for a `tsy curve` run (derived from CLI flags plus defaults).
#[derive(Debug, Clone)]
pub struct CurveConfig {
    /// Fit on the built-in sample snapshot instead of fetching from FRED.
    pub offline: bool,
    /// Optional as-of date cap for the FRED fetch.
    pub asof_date: Option<NaiveDate>,

    pub tau_min: f64,
    pub tau_max: f64,
    pub tau_steps: usize,
    /// Condition-number ceiling for the inner least-squares solve.
    pub max_condition: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
    pub svg: Option<PathBuf>,
}

/// Configuration for a `tsy pca` run.
#[derive(Debug, Clone)]
pub struct PcaConfig {
    /// Use the built-in deterministic panel instead of fetching from FRED.
    pub offline: bool,
    /// Trailing window (months) of daily yields for the real-data panel.
    pub window_months: u32,

    pub synthetic_samples: usize,
    pub synthetic_vars: usize,
    pub synthetic_sd: f64,
    pub seed: u64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// Write the fetched yield panel to CSV (mirrors the historical export).
    pub export_panel: Option<PathBuf>,
    pub svg: Option<PathBuf>,
}

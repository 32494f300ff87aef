//! Error types.
//!
//! Two layers:
//!
//! - [`CurveError`]: typed failures from the numeric core (calibration,
//!   evaluation, spline interpolation, PCA). Library callers match on these.
//! - [`AppError`]: application-level error carrying a process exit code, used
//!   at the CLI boundary for configuration, I/O, and data-source failures.
//!
//! Exit code conventions: 2 = usage/configuration, 3 = insufficient data,
//! 4 = data-source or fit failure.

use thiserror::Error;

/// Typed failures from the numeric core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// Fewer distinct maturities than needed to identify the parameters.
    #[error("at least {needed} distinct maturities are required, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A maturity was non-positive or non-finite where a positive one is required.
    #[error("maturity must be positive and finite, got {value}")]
    InvalidMaturity { value: f64 },

    /// The decay scale was non-positive or non-finite.
    #[error("tau must be positive and finite, got {value}")]
    InvalidTau { value: f64 },

    /// The tau search grid was misconfigured.
    #[error("invalid tau grid: min={min}, max={max}, steps={steps} (need finite 0 < min < max and steps >= 2)")]
    InvalidTauRange { min: f64, max: f64, steps: usize },

    /// A beta coefficient was NaN or infinite.
    #[error("parameter {name} must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    /// An observed yield was NaN or infinite.
    #[error("observed yield must be finite, got {value} at {maturity}y")]
    NonFiniteYield { maturity: f64, value: f64 },

    /// Every tau candidate produced an ill-conditioned design matrix.
    #[error("no tau candidate produced a well-conditioned fit (condition limit {limit:.1e})")]
    DegenerateFit { limit: f64 },

    /// Spline evaluation outside the knot range (splines do not extrapolate).
    #[error("maturity {value}y is outside the interpolation range [{min}y, {max}y]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    /// A data panel is unusable for correlation analysis.
    #[error("degenerate panel: {reason}")]
    DegeneratePanel { reason: String },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        let exit_code = match err {
            CurveError::InsufficientData { .. } => 3,
            CurveError::InvalidTauRange { .. } => 2,
            _ => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_maps_to_exit_code_3() {
        let app: AppError = CurveError::InsufficientData { needed: 4, got: 2 }.into();
        assert_eq!(app.exit_code(), 3);
    }

    #[test]
    fn fit_errors_map_to_exit_code_4() {
        let app: AppError = CurveError::DegenerateFit { limit: 1e12 }.into();
        assert_eq!(app.exit_code(), 4);
        let app: AppError = CurveError::InvalidMaturity { value: -1.0 }.into();
        assert_eq!(app.exit_code(), 4);
    }
}

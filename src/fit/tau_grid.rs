//! Tau grid generation.
//!
//! The outer search starts from a deterministic grid over tau:
//!
//! - it avoids the local-minima issues of general nonlinear starts
//! - it is reproducible given the same inputs/flags
//! - with one scalar to search, a modest grid plus local refinement is fast

use crate::error::CurveError;

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, CurveError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) || steps < 2 {
        return Err(CurveError::InvalidTauRange { min, max, steps });
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(0.05, 30.0, 7).unwrap();
        assert!((v[0] - 0.05).abs() < 1e-12);
        assert!((v[v.len() - 1] - 30.0).abs() < 1e-12);
    }

    #[test]
    fn log_space_is_strictly_increasing() {
        let v = log_space(0.1, 10.0, 40).unwrap();
        assert!(v.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn log_space_rejects_bad_ranges() {
        assert!(log_space(0.0, 10.0, 5).is_err());
        assert!(log_space(10.0, 1.0, 5).is_err());
        assert!(log_space(1.0, 10.0, 1).is_err());
        assert!(log_space(f64::NAN, 10.0, 5).is_err());
    }
}

//! Observation validation and normalization.
//!
//! Both fitters (Nelson–Siegel and spline) consume the same normalized form:
//! maturities validated, sorted ascending, duplicates averaged. Averaging
//! (rather than last-writer) keeps the result independent of input order and
//! guarantees strictly increasing maturities afterwards.

use std::cmp::Ordering;

use crate::domain::Observation;
use crate::error::CurveError;

/// Validate and normalize raw observations.
///
/// - non-positive or non-finite maturity → [`CurveError::InvalidMaturity`]
/// - NaN/infinite yield → [`CurveError::NonFiniteYield`]
/// - duplicate maturities are averaged into a single observation
pub fn normalize_observations(observations: &[Observation]) -> Result<Vec<Observation>, CurveError> {
    let mut obs = Vec::with_capacity(observations.len());
    for o in observations {
        if !(o.maturity_years.is_finite() && o.maturity_years > 0.0) {
            return Err(CurveError::InvalidMaturity {
                value: o.maturity_years,
            });
        }
        if !o.yield_pct.is_finite() {
            return Err(CurveError::NonFiniteYield {
                maturity: o.maturity_years,
                value: o.yield_pct,
            });
        }
        obs.push(*o);
    }

    obs.sort_by(|a, b| {
        a.maturity_years
            .partial_cmp(&b.maturity_years)
            .unwrap_or(Ordering::Equal)
    });

    let mut out: Vec<Observation> = Vec::with_capacity(obs.len());
    let mut i = 0;
    while i < obs.len() {
        let maturity = obs[i].maturity_years;
        let mut sum = 0.0;
        let mut count = 0usize;
        while i < obs.len() && obs[i].maturity_years == maturity {
            sum += obs[i].yield_pct;
            count += 1;
            i += 1;
        }
        out.push(Observation::new(maturity, sum / count as f64));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_keeps_distinct_maturities() {
        let raw = vec![
            Observation::new(10.0, 4.35),
            Observation::new(1.0, 4.90),
            Observation::new(5.0, 4.20),
        ];
        let out = normalize_observations(&raw).unwrap();
        let maturities: Vec<f64> = out.iter().map(|o| o.maturity_years).collect();
        assert_eq!(maturities, vec![1.0, 5.0, 10.0]);
    }

    #[test]
    fn averages_duplicate_maturities() {
        let raw = vec![
            Observation::new(5.0, 4.0),
            Observation::new(5.0, 5.0),
            Observation::new(1.0, 4.9),
        ];
        let out = normalize_observations(&raw).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].maturity_years, 5.0);
        assert!((out[1].yield_pct - 4.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_maturity() {
        let raw = vec![Observation::new(0.0, 4.9)];
        assert!(matches!(
            normalize_observations(&raw),
            Err(CurveError::InvalidMaturity { .. })
        ));
        let raw = vec![Observation::new(-1.0, 4.9)];
        assert!(matches!(
            normalize_observations(&raw),
            Err(CurveError::InvalidMaturity { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_yield() {
        let raw = vec![Observation::new(1.0, f64::NAN)];
        assert!(matches!(
            normalize_observations(&raw),
            Err(CurveError::NonFiniteYield { .. })
        ));
    }
}

//! Reporting utilities: per-tenor fitted values and formatted terminal output.

pub mod format;

pub use format::*;

use crate::data::fred::CurveSnapshot;
use crate::domain::{FittedCurve, FittedPoint};
use crate::error::AppError;
use crate::math::SplineCurve;

/// Compute observed/fitted/residual triples for each snapshot tenor.
///
/// The spline value is `None` only if the spline was not fitted; every
/// snapshot maturity lies inside the knot range by construction.
pub fn compute_points(
    snapshot: &CurveSnapshot,
    curve: &FittedCurve,
    spline: Option<&SplineCurve>,
) -> Result<Vec<FittedPoint>, AppError> {
    let mut out = Vec::with_capacity(snapshot.yields.len());
    for &(tenor, observed) in &snapshot.yields {
        let m = tenor.years();
        let fitted = curve.evaluate(m)?;
        if !fitted.is_finite() {
            return Err(AppError::new(
                4,
                "Non-finite model prediction during residual computation.",
            ));
        }
        let spline_fit = match spline {
            Some(s) => Some(s.evaluate(m)?),
            None => None,
        };
        out.push(FittedPoint {
            label: tenor.display_name().to_string(),
            maturity_years: m,
            observed,
            fitted,
            residual: observed - fitted,
            spline: spline_fit,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::sample_snapshot;
    use crate::fit::calibrate;
    use crate::math::spline_fit;

    #[test]
    fn points_cover_every_tenor_with_small_residuals() {
        let snapshot = sample_snapshot();
        let obs = snapshot.to_observations();
        let curve = calibrate(&obs).unwrap();
        let spline = spline_fit(&obs).unwrap();

        let points = compute_points(&snapshot, &curve, Some(&spline)).unwrap();
        assert_eq!(points.len(), snapshot.yields.len());
        for p in &points {
            assert!((p.observed - p.fitted - p.residual).abs() < 1e-12);
            // The spline interpolates, so it reproduces each observation.
            let s = p.spline.unwrap();
            assert!((s - p.observed).abs() < 1e-9);
        }
    }
}

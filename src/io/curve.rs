//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted curve:
//! - Nelson–Siegel parameters + fit quality
//! - run metadata (as-of date)
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use crate::data::fred::CurveSnapshot;
use crate::domain::{CurveFile, CurveGrid, FittedCurve};
use crate::error::AppError;

/// Write a curve JSON file.
pub fn write_curve_json(
    path: &Path,
    curve: &FittedCurve,
    snapshot: &CurveSnapshot,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create curve JSON '{}': {e}", path.display()),
        )
    })?;

    let maturities: Vec<f64> = snapshot.yields.iter().map(|(t, _)| t.years()).collect();
    let m_min = maturities.iter().cloned().fold(f64::INFINITY, f64::min);
    let m_max = maturities.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let grid = build_grid(curve, m_min, m_max, 101)?;

    let out = CurveFile {
        tool: "tsy".to_string(),
        asof_date: snapshot.date,
        params: curve.params(),
        fit_quality: curve.quality(),
        grid,
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open curve JSON '{}': {e}", path.display()),
        )
    })?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

fn build_grid(curve: &FittedCurve, m_min: f64, m_max: f64, n: usize) -> Result<CurveGrid, AppError> {
    let n = n.max(2);
    let mut m0 = m_min;
    let mut m1 = m_max;
    if !(m0.is_finite() && m1.is_finite()) || m1 <= m0 {
        m0 = 1.0 / 12.0;
        m1 = 30.0;
    }

    let mut maturity_years = Vec::with_capacity(n);
    let mut yield_pct = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let m = m0 + u * (m1 - m0);
        maturity_years.push(m);
        yield_pct.push(curve.evaluate(m)?);
    }

    Ok(CurveGrid {
        maturity_years,
        yield_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::sample_snapshot;
    use crate::fit::calibrate;

    #[test]
    fn curve_json_round_trips() {
        let snapshot = sample_snapshot();
        let curve = calibrate(&snapshot.to_observations()).unwrap();

        let dir = std::env::temp_dir();
        let path = dir.join("tsy_curve_roundtrip_test.json");
        write_curve_json(&path, &curve, &snapshot).unwrap();

        let loaded = read_curve_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.tool, "tsy");
        assert_eq!(loaded.asof_date, snapshot.date);
        assert!((loaded.params.tau - curve.params().tau).abs() < 1e-12);
        assert_eq!(loaded.grid.maturity_years.len(), 101);
        assert_eq!(loaded.grid.yield_pct.len(), 101);
        // Grid spans the snapshot's maturity range.
        assert!((loaded.grid.maturity_years[0] - 1.0 / 12.0).abs() < 1e-9);
        assert!((loaded.grid.maturity_years[100] - 30.0).abs() < 1e-9);
    }
}

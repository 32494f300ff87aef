//! CSV exports.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per tenor for fit results, one row per date for the
//! yield panel.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::data::fred::YieldPanel;
use crate::domain::FittedPoint;
use crate::error::AppError;

/// Write per-tenor fit results to a CSV file.
pub fn write_results_csv(
    path: &Path,
    points: &[FittedPoint],
    asof_date: NaiveDate,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(
        file,
        "series,asof_date,maturity_years,observed_pct,ns_fit_pct,ns_residual_pct,spline_fit_pct"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in points {
        writeln!(
            file,
            "{},{},{:.10},{:.6},{:.6},{:.6},{}",
            p.label,
            asof_date,
            p.maturity_years,
            p.observed,
            p.fitted,
            p.residual,
            p.spline.map(|v| format!("{v:.6}")).unwrap_or_default(),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the fetched yield panel to a CSV file (date plus one column per series).
pub fn write_panel_csv(path: &Path, panel: &YieldPanel) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create panel CSV '{}': {e}", path.display()),
        )
    })?;

    let header: Vec<&str> = panel.tenors.iter().map(|t| t.series_id()).collect();
    writeln!(file, "date,{}", header.join(","))
        .map_err(|e| AppError::new(2, format!("Failed to write panel CSV header: {e}")))?;

    for (i, date) in panel.dates.iter().enumerate() {
        let row: Vec<String> = (0..panel.values.ncols())
            .map(|j| format!("{:.4}", panel.values[(i, j)]))
            .collect();
        writeln!(file, "{date},{}", row.join(","))
            .map_err(|e| AppError::new(2, format!("Failed to write panel CSV row: {e}")))?;
    }

    Ok(())
}

//! SVG chart rendering via Plotters.
//!
//! The SVG backend is pure Rust (no fontconfig/font-kit), which keeps the
//! build free of native dependencies while still producing a figure on disk
//! next to the CSV/JSON exports.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FittedCurve, FittedPoint};
use crate::error::AppError;
use crate::math::{ExplainedVariance, SplineCurve};

const CURVE_SAMPLES: usize = 200;

fn render_err(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::new(2, format!("Failed to render SVG '{}': {e}", path.display()))
}

/// Write the curve-fit chart: observed points, Nelson–Siegel line, and the
/// spline overlay when present.
pub fn write_curve_svg(
    path: &Path,
    points: &[FittedPoint],
    curve: &FittedCurve,
    spline: Option<&SplineCurve>,
) -> Result<(), AppError> {
    let (m_min, m_max) = points
        .iter()
        .fold(None, |acc: Option<(f64, f64)>, p| match acc {
            None => Some((p.maturity_years, p.maturity_years)),
            Some((lo, hi)) => Some((lo.min(p.maturity_years), hi.max(p.maturity_years))),
        })
        .unwrap_or((1.0 / 12.0, 30.0));

    let ns_line: Vec<(f64, f64)> = (0..CURVE_SAMPLES)
        .filter_map(|i| {
            let u = i as f64 / (CURVE_SAMPLES as f64 - 1.0);
            let m = m_min + u * (m_max - m_min);
            curve.evaluate(m).ok().map(|y| (m, y))
        })
        .collect();

    let spline_line: Vec<(f64, f64)> = match spline {
        Some(s) => (0..CURVE_SAMPLES)
            .filter_map(|i| {
                let u = i as f64 / (CURVE_SAMPLES as f64 - 1.0);
                let m = s.min_maturity() + u * (s.max_maturity() - s.min_maturity());
                s.evaluate(m).ok().map(|y| (m, y))
            })
            .collect(),
        None => Vec::new(),
    };

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(_, y) in ns_line.iter().chain(spline_line.iter()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    for p in points {
        y_min = y_min.min(p.observed);
        y_max = y_max.max(p.observed);
    }
    if !(y_min.is_finite() && y_max.is_finite() && y_max > y_min) {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = (y_max - y_min) * 0.05;
    let (y_min, y_max) = (y_min - pad, y_max + pad);

    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Treasury yield curve", ("sans-serif", 22).into_font())
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(48)
        .build_cartesian_2d(m_min..m_max, y_min..y_max)
        .map_err(|e| render_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Maturity (years)")
        .y_desc("Yield (%)")
        .draw()
        .map_err(|e| render_err(path, e))?;

    chart
        .draw_series(LineSeries::new(ns_line, &RED))
        .map_err(|e| render_err(path, e))?
        .label("Nelson-Siegel")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));

    if !spline_line.is_empty() {
        chart
            .draw_series(LineSeries::new(spline_line, &BLUE))
            .map_err(|e| render_err(path, e))?
            .label("Cubic spline")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));
    }

    chart
        .draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.maturity_years, p.observed), 3, BLACK.filled())),
        )
        .map_err(|e| render_err(path, e))?
        .label("Observed")
        .legend(|(x, y)| Circle::new((x + 8, y), 3, BLACK.filled()));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(|e| render_err(path, e))?;

    root.present().map_err(|e| render_err(path, e))?;
    Ok(())
}

/// Write the scree chart: cumulative explained variance for the synthetic
/// and real panels side by side.
pub fn write_scree_svg(
    path: &Path,
    synthetic: &ExplainedVariance,
    real: &ExplainedVariance,
) -> Result<(), AppError> {
    let k = synthetic.cumulative.len().max(real.cumulative.len());
    if k == 0 {
        return Err(AppError::new(2, "Nothing to plot: no components."));
    }

    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative explained variance", ("sans-serif", 22).into_font())
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(48)
        .build_cartesian_2d(0.5..k as f64 + 0.5, 0.0..1.05)
        .map_err(|e| render_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Number of components")
        .y_desc("Cumulative explained variance")
        .draw()
        .map_err(|e| render_err(path, e))?;

    let to_line = |ev: &ExplainedVariance| -> Vec<(f64, f64)> {
        ev.cumulative
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i + 1) as f64, c))
            .collect()
    };

    chart
        .draw_series(LineSeries::new(to_line(synthetic), &BLUE))
        .map_err(|e| render_err(path, e))?
        .label("Synthetic (i.i.d.)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE));

    chart
        .draw_series(LineSeries::new(to_line(real), &RED))
        .map_err(|e| render_err(path, e))?
        .label("Daily yield changes")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(|e| render_err(path, e))?;

    root.present().map_err(|e| render_err(path, e))?;
    Ok(())
}

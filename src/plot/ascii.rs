//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed yields: `o`
//! - Nelson–Siegel curve: `-` line
//! - spline overlay: `.` line

use crate::domain::{CurveFile, FittedCurve, FittedPoint};
use crate::math::{ExplainedVariance, SplineCurve};

/// Render the curve-fit plot for an in-memory result.
pub fn render_curve_plot(
    points: &[FittedPoint],
    curve: &FittedCurve,
    spline: Option<&SplineCurve>,
    width: usize,
    height: usize,
) -> String {
    let (m_min, m_max) = maturity_range(points).unwrap_or((1.0 / 12.0, 30.0));
    let ns_line = sample_ns(curve, m_min, m_max, width.max(2));
    let spline_line = spline.map(|s| sample_spline(s, width.max(2)));

    render_grid(points, &ns_line, spline_line.as_deref(), m_min, m_max, width, height)
}

/// Render a plot from a saved curve JSON file (curve only, no overlay points).
pub fn render_curve_file_plot(file: &CurveFile, width: usize, height: usize) -> String {
    let grid: Vec<(f64, f64)> = file
        .grid
        .maturity_years
        .iter()
        .zip(file.grid.yield_pct.iter())
        .map(|(&m, &y)| (m, y))
        .collect();
    let (m_min, m_max) = line_range(&grid).unwrap_or((1.0 / 12.0, 30.0));

    render_grid(&[], &grid, None, m_min, m_max, width, height)
}

/// Render a cumulative-explained-variance (scree) plot.
pub fn render_scree_plot(title: &str, ev: &ExplainedVariance, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let k = ev.cumulative.len();
    let mut out = String::new();
    out.push_str(&format!(
        "{title}: components={k} | cumulative=[{:.1}%, {:.1}%]\n",
        ev.cumulative.first().copied().unwrap_or(0.0) * 100.0,
        ev.cumulative.last().copied().unwrap_or(0.0) * 100.0
    ));
    if k == 0 {
        return out;
    }

    let mut grid = vec![vec![' '; width]; height];
    let line: Vec<(f64, f64)> = ev
        .cumulative
        .iter()
        .enumerate()
        .map(|(i, &c)| (i as f64, c))
        .collect();
    let x_max = (k - 1).max(1) as f64;

    draw_polyline(&mut grid, &line, 0.0, x_max, 0.0, 1.05, '-');
    for &(x, c) in &line {
        let col = map_x(x, 0.0, x_max, width);
        let row = map_y(c, 0.0, 1.05, height);
        grid[row][col] = 'o';
    }

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn render_grid(
    points: &[FittedPoint],
    ns_line: &[(f64, f64)],
    spline_line: Option<&[(f64, f64)]>,
    m_min: f64,
    m_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = value_range(points, ns_line, spline_line).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curves first so observed points can overlay.
    draw_polyline(&mut grid, ns_line, m_min, m_max, y_min, y_max, '-');
    if let Some(line) = spline_line {
        draw_polyline(&mut grid, line, m_min, m_max, y_min, y_max, '.');
    }

    for p in points {
        let x = map_x(p.maturity_years, m_min, m_max, width);
        let y = map_y(p.observed, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: maturity=[{m_min:.3}, {m_max:.3}] years | yield=[{y_min:.2}, {y_max:.2}]%\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn maturity_range(points: &[FittedPoint]) -> Option<(f64, f64)> {
    let mut min_m = f64::INFINITY;
    let mut max_m = f64::NEG_INFINITY;
    for p in points {
        min_m = min_m.min(p.maturity_years);
        max_m = max_m.max(p.maturity_years);
    }
    if min_m.is_finite() && max_m.is_finite() && max_m > min_m {
        Some((min_m, max_m))
    } else {
        None
    }
}

fn line_range(line: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_m = f64::INFINITY;
    let mut max_m = f64::NEG_INFINITY;
    for &(m, _) in line {
        min_m = min_m.min(m);
        max_m = max_m.max(m);
    }
    if min_m.is_finite() && max_m.is_finite() && max_m > min_m {
        Some((min_m, max_m))
    } else {
        None
    }
}

fn sample_ns(curve: &FittedCurve, m_min: f64, m_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let m = m_min + u * (m_max - m_min);
        if let Ok(y) = curve.evaluate(m) {
            out.push((m, y));
        }
    }
    out
}

fn sample_spline(spline: &SplineCurve, n: usize) -> Vec<(f64, f64)> {
    // Splines do not extrapolate; sample only the knot range.
    let (lo, hi) = (spline.min_maturity(), spline.max_maturity());
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let m = lo + u * (hi - lo);
        if let Ok(y) = spline.evaluate(m) {
            out.push((m, y));
        }
    }
    out
}

fn value_range(
    points: &[FittedPoint],
    ns_line: &[(f64, f64)],
    spline_line: Option<&[(f64, f64)]>,
) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in points {
        min_y = min_y.min(p.observed);
        max_y = max_y.max(p.observed);
    }
    for &(_, y) in ns_line {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if let Some(line) = spline_line {
        for &(_, y) in line {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(m: f64, m_min: f64, m_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((m - m_min) / (m_max - m_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(
    grid: &mut [Vec<char>],
    line: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if line.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in line {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        if let Some((px, py)) = prev {
            draw_line(grid, px, py, cx, cy, ch);
        } else {
            grid[cy][cx] = ch;
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish). Only writes into empty cells so
/// earlier layers show through.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, NelsonSiegelParams};

    #[test]
    fn plot_golden_snapshot_small() {
        // Flat curve at 4.0% with two observed points.
        let curve = FittedCurve::new(
            NelsonSiegelParams {
                beta0: 4.0,
                beta1: 0.0,
                beta2: 0.0,
                tau: 1.0,
            },
            FitQuality {
                sse: 0.0,
                rmse: 0.0,
                n: 2,
            },
        )
        .unwrap();

        let points = vec![
            FittedPoint {
                label: "1Y".to_string(),
                maturity_years: 1.0,
                observed: 4.0,
                fitted: 4.0,
                residual: 0.0,
                spline: None,
            },
            FittedPoint {
                label: "10Y".to_string(),
                maturity_years: 10.0,
                observed: 4.4,
                fitted: 4.0,
                residual: 0.4,
                spline: None,
            },
        ];

        let txt = render_curve_plot(&points, &curve, None, 10, 5);
        let expected = concat!(
            "Plot: maturity=[1.000, 10.000] years | yield=[3.98, 4.42]%\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn scree_plot_marks_every_component() {
        let ev = ExplainedVariance {
            eigenvalues: vec![3.0, 1.0, 0.5, 0.3, 0.2],
            ratios: vec![0.6, 0.2, 0.1, 0.06, 0.04],
            cumulative: vec![0.6, 0.8, 0.9, 0.96, 1.0],
        };
        let txt = render_scree_plot("Scree", &ev, 40, 10);
        assert!(txt.starts_with("Scree: components=5"));
        assert!(txt.matches('o').count() >= 5);
    }
}

//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::data::fred::{CurveSnapshot, YieldPanel};
use crate::domain::{FittedCurve, FittedPoint};
use crate::math::ExplainedVariance;

/// Format the full curve-fit summary: parameters, diagnostics, and the
/// per-tenor observed/fitted table.
pub fn format_curve_summary(
    snapshot: &CurveSnapshot,
    curve: &FittedCurve,
    points: &[FittedPoint],
) -> String {
    let params = curve.params();
    let quality = curve.quality();

    let mut out = String::new();
    out.push_str("=== tsy - Treasury Yield Curve Fit (FRED-based) ===\n");
    out.push_str(&format!("As-of: {}\n", snapshot.date));
    out.push_str(&format!("Points: n={}\n", quality.n));

    out.push_str("\nNelson-Siegel parameters:\n");
    out.push_str(&format!(
        "- beta0={:.6}  beta1={:.6}  beta2={:.6}  tau={:.6}y\n",
        params.beta0, params.beta1, params.beta2, params.tau
    ));
    out.push_str(&format!(
        "- y(0)={:.4}%  y(inf)={:.4}%\n",
        params.beta0 + params.beta1,
        params.beta0
    ));
    out.push_str(&format!(
        "- SSE={:.6}  RMSE={:.4}%\n",
        quality.sse, quality.rmse
    ));

    out.push_str("\nTenor   Maturity   Observed   NS fit     Resid     Spline\n");
    for p in points {
        let spline = p
            .spline
            .map(|v| format!("{v:>8.4}"))
            .unwrap_or_else(|| "       -".to_string());
        out.push_str(&format!(
            "{:<7} {:>7.3}y  {:>7.4}%  {:>7.4}%  {:>+8.4}  {spline}\n",
            p.label, p.maturity_years, p.observed, p.fitted, p.residual
        ));
    }

    out
}

/// Format the correlation-study summary: one scree table per panel.
pub fn format_pca_summary(
    synthetic: &ExplainedVariance,
    real: &ExplainedVariance,
    panel: &YieldPanel,
) -> String {
    let mut out = String::new();
    out.push_str("=== tsy - Yield Correlation Study (PCA) ===\n");

    out.push_str("\nSynthetic panel (i.i.d. Gaussian):\n");
    out.push_str(&format_scree_table(synthetic));

    let series: Vec<&str> = panel.tenors.iter().map(|t| t.series_id()).collect();
    out.push_str(&format!(
        "\nDaily yield changes ({} .. {}, {} rows, series: {}):\n",
        panel.dates.first().map(|d| d.to_string()).unwrap_or_default(),
        panel.dates.last().map(|d| d.to_string()).unwrap_or_default(),
        panel.dates.len(),
        series.join(", ")
    ));
    out.push_str(&format_scree_table(real));

    out.push_str(
        "\nReading: i.i.d. variables spread variance evenly across components;\n\
         real curve changes concentrate it in the first one or two factors.\n",
    );
    out
}

fn format_scree_table(ev: &ExplainedVariance) -> String {
    let mut out = String::new();
    out.push_str("  PC   Eigenvalue   Explained   Cumulative\n");
    for (i, ((lambda, ratio), cum)) in ev
        .eigenvalues
        .iter()
        .zip(ev.ratios.iter())
        .zip(ev.cumulative.iter())
        .enumerate()
    {
        out.push_str(&format!(
            "  {:<4} {:>9.4}   {:>8.2}%   {:>9.2}%\n",
            i + 1,
            lambda,
            ratio * 100.0,
            cum * 100.0
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{sample_panel, sample_snapshot, synthetic_panel};
    use crate::fit::calibrate;
    use crate::math::{daily_changes, scree, spline_fit};
    use crate::report::compute_points;

    #[test]
    fn curve_summary_mentions_every_tenor() {
        let snapshot = sample_snapshot();
        let obs = snapshot.to_observations();
        let curve = calibrate(&obs).unwrap();
        let spline = spline_fit(&obs).unwrap();
        let points = compute_points(&snapshot, &curve, Some(&spline)).unwrap();

        let text = format_curve_summary(&snapshot, &curve, &points);
        for (tenor, _) in &snapshot.yields {
            assert!(text.contains(tenor.display_name()), "missing {tenor:?}");
        }
        assert!(text.contains("beta0"));
        assert!(text.contains("RMSE"));
    }

    #[test]
    fn pca_summary_has_one_row_per_component() {
        let synth = scree(&synthetic_panel(50, 5, 0.01, 0).unwrap()).unwrap();
        let panel = sample_panel(0, 60).unwrap();
        let real = scree(&daily_changes(&panel.values).unwrap()).unwrap();

        let text = format_pca_summary(&synth, &real, &panel);
        // 5 synthetic + 5 real components, one "PC" header line per table.
        assert_eq!(text.matches("  PC ").count(), 2);
        assert!(text.contains("DGS1MO"));
    }
}

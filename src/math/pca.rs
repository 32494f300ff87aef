//! Principal component analysis of yield-change panels.
//!
//! The study asks one question: how much of the daily variation of the curve
//! is explained by how many factors? We answer it by eigendecomposing the
//! Pearson correlation matrix of the panel columns, which is exactly PCA of
//! the column-standardized data. Note the correlation matrix is the input to
//! the decomposition, never treated as an observation matrix itself.

use nalgebra::{DMatrix, SymmetricEigen};

use crate::error::CurveError;

/// Scree data: eigenvalues of the correlation matrix in descending order,
/// with their share of total variance and the cumulative share.
#[derive(Debug, Clone)]
pub struct ExplainedVariance {
    pub eigenvalues: Vec<f64>,
    pub ratios: Vec<f64>,
    pub cumulative: Vec<f64>,
}

/// First differences down the rows of a panel (row t minus row t-1).
pub fn daily_changes(panel: &DMatrix<f64>) -> Result<DMatrix<f64>, CurveError> {
    if panel.nrows() < 2 {
        return Err(CurveError::DegeneratePanel {
            reason: format!("need at least 2 rows to difference, got {}", panel.nrows()),
        });
    }
    let mut out = DMatrix::zeros(panel.nrows() - 1, panel.ncols());
    for i in 1..panel.nrows() {
        for j in 0..panel.ncols() {
            out[(i - 1, j)] = panel[(i, j)] - panel[(i - 1, j)];
        }
    }
    Ok(out)
}

/// Pearson correlation matrix of the data columns.
///
/// A column with zero sample variance makes correlations undefined and is
/// reported as a degenerate panel rather than producing NaNs.
pub fn correlation_matrix(data: &DMatrix<f64>) -> Result<DMatrix<f64>, CurveError> {
    let n = data.nrows();
    let k = data.ncols();
    if n < 2 {
        return Err(CurveError::DegeneratePanel {
            reason: format!("need at least 2 rows for correlations, got {n}"),
        });
    }
    if k == 0 {
        return Err(CurveError::DegeneratePanel {
            reason: "panel has no columns".to_string(),
        });
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(CurveError::DegeneratePanel {
            reason: "panel contains non-finite values".to_string(),
        });
    }

    // Column means and sample standard deviations (n-1 denominator).
    let mut means = vec![0.0; k];
    for j in 0..k {
        means[j] = data.column(j).sum() / n as f64;
    }
    let mut stds = vec![0.0; k];
    for j in 0..k {
        let ss: f64 = data.column(j).iter().map(|v| (v - means[j]).powi(2)).sum();
        stds[j] = (ss / (n as f64 - 1.0)).sqrt();
        if stds[j] <= 0.0 {
            return Err(CurveError::DegeneratePanel {
                reason: format!("column {j} has zero variance"),
            });
        }
    }

    let mut corr = DMatrix::zeros(k, k);
    for a in 0..k {
        corr[(a, a)] = 1.0;
        for b in (a + 1)..k {
            let mut cov = 0.0;
            for i in 0..n {
                cov += (data[(i, a)] - means[a]) * (data[(i, b)] - means[b]);
            }
            cov /= n as f64 - 1.0;
            let r = cov / (stds[a] * stds[b]);
            corr[(a, b)] = r;
            corr[(b, a)] = r;
        }
    }
    Ok(corr)
}

/// Explained-variance ratios from a correlation matrix.
pub fn explained_variance(corr: &DMatrix<f64>) -> Result<ExplainedVariance, CurveError> {
    if corr.nrows() != corr.ncols() || corr.nrows() == 0 {
        return Err(CurveError::DegeneratePanel {
            reason: format!("correlation matrix must be square, got {}x{}", corr.nrows(), corr.ncols()),
        });
    }

    let eig = SymmetricEigen::new(corr.clone());

    // Eigenvalues of a correlation matrix are non-negative up to roundoff;
    // clamp the noise and sort descending.
    let mut eigenvalues: Vec<f64> = eig.eigenvalues.iter().map(|&v| v.max(0.0)).collect();
    eigenvalues.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let total: f64 = eigenvalues.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(CurveError::DegeneratePanel {
            reason: "eigenvalue spectrum has no mass".to_string(),
        });
    }

    let ratios: Vec<f64> = eigenvalues.iter().map(|v| v / total).collect();
    let mut cumulative = Vec::with_capacity(ratios.len());
    let mut acc = 0.0;
    for r in &ratios {
        acc += r;
        cumulative.push(acc);
    }

    Ok(ExplainedVariance {
        eigenvalues,
        ratios,
        cumulative,
    })
}

/// Correlation matrix + eigendecomposition in one step.
pub fn scree(data: &DMatrix<f64>) -> Result<ExplainedVariance, CurveError> {
    let corr = correlation_matrix(data)?;
    explained_variance(&corr)
}

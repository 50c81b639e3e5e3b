//! Ordinary least squares over the harmonic design matrix.
//!
//! The systems are tiny (at most 19 columns), so the normal equations
//! `XᵀX β = Xᵀy` solved by Gaussian elimination with partial pivoting
//! are accurate and fast. Per-group partial R² refits the intercept
//! plus only that group's columns and compares the residual sum of
//! squares against total variance — characterizing how much each
//! periodicity explains on its own.

use tracing::debug;

use crate::design::DesignLayout;

/// Fitted harmonic model plus diagnostics.
#[derive(Debug, Clone)]
pub struct HarmonicFit {
    pub coeffs: Vec<f64>,
    pub layout: DesignLayout,
    pub residual_std: f64,
    /// Fraction of variance explained by intercept + daily columns.
    pub r2_daily: f64,
    /// `None` when the group was dropped for lack of history.
    pub r2_weekly: Option<f64>,
    pub r2_biweekly: Option<f64>,
    pub r2_total: f64,
}

impl HarmonicFit {
    /// Evaluate the fitted model at time index `t` (hours).
    pub fn predict(&self, t: f64) -> f64 {
        let row = self.layout.row(t);
        row.iter().zip(&self.coeffs).map(|(x, c)| x * c).sum()
    }
}

/// Fit the multi-period harmonic model to an hourly intensity history.
pub fn fit_harmonics(history: &[f64], n_daily: usize, n_weekly: usize) -> HarmonicFit {
    let n = history.len();
    let layout = DesignLayout::for_history(n, n_daily, n_weekly);
    let x = layout.matrix((0..n).map(|i| i as f64));

    let coeffs = lstsq(&x, history).unwrap_or_else(|| {
        // A singular normal matrix only shows up with pathological
        // inputs (e.g. repeated identical timestamps); fall back to the
        // intercept-only model rather than failing the evaluation.
        debug!(samples = n, "harmonic fit singular, using intercept-only");
        let mut c = vec![0.0; layout.n_cols];
        c[0] = mean(history);
        c
    });

    let residuals: Vec<f64> = x
        .iter()
        .zip(history)
        .map(|(row, &y)| y - dot(row, &coeffs))
        .collect();
    let residual_std = std_dev(&residuals);

    let y_mean = mean(history);
    let ss_total: f64 = history.iter().map(|&y| (y - y_mean).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let r2_total = if ss_total > 0.0 {
        (1.0 - ss_res / ss_total).max(0.0)
    } else {
        0.0
    };

    let r2_daily = partial_r2(&x, history, ss_total, layout.daily.clone());
    let r2_weekly = layout
        .weekly
        .clone()
        .map(|cols| partial_r2(&x, history, ss_total, cols));
    let r2_biweekly = layout
        .biweekly
        .clone()
        .map(|cols| partial_r2(&x, history, ss_total, cols));

    HarmonicFit {
        coeffs,
        layout,
        residual_std,
        r2_daily,
        r2_weekly,
        r2_biweekly,
        r2_total,
    }
}

/// R² of a refit using only the intercept plus `cols`.
fn partial_r2(x: &[Vec<f64>], y: &[f64], ss_total: f64, cols: std::ops::Range<usize>) -> f64 {
    if ss_total <= 0.0 || cols.is_empty() {
        return 0.0;
    }
    let sub: Vec<Vec<f64>> = x
        .iter()
        .map(|row| {
            let mut r = Vec::with_capacity(1 + cols.len());
            r.push(row[0]);
            r.extend(cols.clone().map(|i| row[i]));
            r
        })
        .collect();
    let Some(coeffs) = lstsq(&sub, y) else {
        return 0.0;
    };
    let ss_res: f64 = sub
        .iter()
        .zip(y)
        .map(|(row, &yi)| (yi - dot(row, &coeffs)).powi(2))
        .sum();
    (1.0 - ss_res / ss_total).max(0.0)
}

/// Least squares via the normal equations.
///
/// Returns `None` when the normal matrix is singular to working
/// precision.
pub(crate) fn lstsq(x: &[Vec<f64>], y: &[f64]) -> Option<Vec<f64>> {
    let n_rows = x.len();
    if n_rows == 0 || n_rows != y.len() {
        return None;
    }
    let n_cols = x[0].len();

    // XᵀX and Xᵀy.
    let mut a = vec![vec![0.0; n_cols + 1]; n_cols];
    for (row, &yi) in x.iter().zip(y) {
        for i in 0..n_cols {
            for j in i..n_cols {
                a[i][j] += row[i] * row[j];
            }
            a[i][n_cols] += row[i] * yi;
        }
    }
    // Symmetric fill below the diagonal.
    for i in 0..n_cols {
        for j in 0..i {
            a[i][j] = a[j][i];
        }
    }

    solve_augmented(&mut a, n_cols)
}

/// Gaussian elimination with partial pivoting on an augmented matrix.
fn solve_augmented(a: &mut [Vec<f64>], n: usize) -> Option<Vec<f64>> {
    for col in 0..n {
        // Pivot on the largest magnitude in this column.
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..=n {
                a[row][k] -= factor * a[col][k];
            }
        }
    }

    // Back substitution.
    let mut beta = vec![0.0; n];
    for col in (0..n).rev() {
        let mut acc = a[col][n];
        for k in col + 1..n {
            acc -= a[col][k] * beta[k];
        }
        beta[col] = acc / a[col][col];
    }
    Some(beta)
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub(crate) fn mean(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / v.len() as f64
}

/// Population standard deviation.
pub fn std_dev(v: &[f64]) -> f64 {
    if v.len() < 2 {
        return 0.0;
    }
    let m = mean(v);
    (v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / v.len() as f64).sqrt()
}

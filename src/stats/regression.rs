//! Ordinary least-squares line fit with goodness-of-fit figures.

use crate::data::Table;
use crate::error::{ReportError, Result};
use log::debug;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for the slope's t-test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Result of fitting `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Number of (x, y) pairs used.
    pub n: usize,
    /// Pearson correlation coefficient; `NaN` when y has no variance.
    pub r: f64,
    /// Two-sided p-value for a zero slope; `None` for n <= 2 or a perfect fit.
    pub p_value: Option<f64>,
}

impl LinearFit {
    /// Fit a line through paired points.
    pub fn fit(points: &[(f64, f64)]) -> Result<LinearFit> {
        let n = points.len();
        if n < 2 {
            return Err(ReportError::DegenerateFit(format!(
                "need at least 2 points, got {n}"
            )));
        }

        let nf = n as f64;
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / nf;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / nf;

        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for &(x, y) in points {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        if sxx == 0.0 {
            return Err(ReportError::DegenerateFit(
                "x has zero variance".to_string(),
            ));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let r = if syy == 0.0 {
            f64::NAN
        } else {
            sxy / (sxx * syy).sqrt()
        };

        Ok(LinearFit {
            slope,
            intercept,
            n,
            r,
            p_value: Self::slope_p_value(r, n),
        })
    }

    /// Fit `y_column` against `x_column`, pairing rows where both are present.
    pub fn from_columns(table: &Table, x_column: &str, y_column: &str) -> Result<LinearFit> {
        let points = Self::paired_points(table, x_column, y_column)?;
        let fit = Self::fit(&points)?;
        debug!(
            "Fitted '{}' ~ '{}' over {} points: slope {:.4}, intercept {:.4}, r {:.3}",
            y_column, x_column, fit.n, fit.slope, fit.intercept, fit.r
        );
        Ok(fit)
    }

    /// Rows where both columns hold finite numbers.
    pub fn paired_points(table: &Table, x_column: &str, y_column: &str) -> Result<Vec<(f64, f64)>> {
        let xs = table.numeric_values(x_column)?;
        let ys = table.numeric_values(y_column)?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| match (x, y) {
                (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
                _ => None,
            })
            .collect())
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }

    pub fn is_significant(&self) -> bool {
        self.p_value.is_some_and(|p| p <= SIGNIFICANCE_THRESHOLD)
    }

    fn slope_p_value(r: f64, n: usize) -> Option<f64> {
        if n <= 2 || r.is_nan() || r.abs() >= 1.0 {
            return None;
        }
        let df = (n - 2) as f64;
        let t = r * (df / (1.0 - r * r)).sqrt();
        let dist = StudentsT::new(0.0, 1.0, df).ok()?;
        Some(2.0 * (1.0 - dist.cdf(t.abs())))
    }
}

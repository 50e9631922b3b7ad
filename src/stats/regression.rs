//! Least-squares fits and Pearson correlation.

use crate::data::DataProcessor;
use crate::error::{PlotError, Result};
use crate::stats::StatsCalculator;
use polars::prelude::DataFrame;
use rayon::prelude::*;

/// Ordinary least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    n: usize,
    x_mean: f64,
    sxx: f64,
    residual_se: f64,
}

impl LinearFit {
    /// Fit `ys` on `xs`. Needs at least two distinct x values.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return None;
        }
        let (xs, ys) = (&xs[..n], &ys[..n]);

        let x_mean = StatsCalculator::mean(xs);
        let y_mean = StatsCalculator::mean(ys);
        let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
        if sxx <= 0.0 {
            return None;
        }
        let sxy: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (x - x_mean) * (y - y_mean))
            .sum();

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let residual_se = if n > 2 {
            let sse: f64 = xs
                .iter()
                .zip(ys)
                .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
                .sum();
            (sse / (n - 2) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            slope,
            intercept,
            n,
            x_mean,
            sxx,
            residual_se,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Confidence interval of the mean prediction at `x`.
    pub fn confidence_interval(&self, x: f64) -> (f64, f64) {
        let y = self.predict(x);
        if self.n <= 2 {
            return (y, y);
        }
        let se = self.residual_se
            * (1.0 / self.n as f64 + (x - self.x_mean).powi(2) / self.sxx).sqrt();
        let half = StatsCalculator::t_critical((self.n - 2) as f64) * se;
        (y - half, y + half)
    }
}

/// Pearson correlation of two equally long samples. NaN when either side
/// has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let x_mean = StatsCalculator::mean(&xs[..n]);
    let y_mean = StatsCalculator::mean(&ys[..n]);

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - x_mean) * (y - y_mean);
        sxx += (x - x_mean).powi(2);
        syy += (y - y_mean).powi(2);
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Keep only rows where both sides are present.
pub fn complete_pairs(xs: &[Option<f64>], ys: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    xs.iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip()
}

/// Square correlation matrix over the numeric columns of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` squared entries.
    pub values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Pairwise-complete Pearson correlation of every numeric column.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns = DataProcessor::numeric_columns(df);
        if columns.is_empty() {
            return Err(PlotError::NoNumericColumns);
        }

        let data = columns
            .iter()
            .map(|name| DataProcessor::numeric_values(df, name))
            .collect::<Result<Vec<_>>>()?;

        let n = columns.len();
        let values = (0..n * n)
            .into_par_iter()
            .map(|idx| {
                let (i, j) = (idx / n, idx % n);
                let (xs, ys) = complete_pairs(&data[i], &data[j]);
                pearson(&xs, &ys)
            })
            .collect();

        Ok(Self { columns, values })
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.columns.len() + col]
    }

    /// Finite minimum and maximum, if any entry is finite.
    pub fn range(&self) -> Option<(f64, f64)> {
        let finite = self.values.iter().copied().filter(|v| v.is_finite());
        let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        (min <= max).then_some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use polars::prelude::*;

    #[test]
    fn fit_recovers_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let fit = LinearFit::fit(&xs, &ys).unwrap();
        assert_float_eq!(fit.slope, 2.0, abs <= 1e-12);
        assert_float_eq!(fit.intercept, 1.0, abs <= 1e-12);
        let (lo, hi) = fit.confidence_interval(1.5);
        assert_float_eq!(lo, 4.0, abs <= 1e-9);
        assert_float_eq!(hi, 4.0, abs <= 1e-9);
    }

    #[test]
    fn band_widens_away_from_mean() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.1, 0.9, 2.2, 2.8, 4.1];
        let fit = LinearFit::fit(&xs, &ys).unwrap();
        let (lo_mid, hi_mid) = fit.confidence_interval(2.0);
        let (lo_end, hi_end) = fit.confidence_interval(4.0);
        assert!(hi_end - lo_end > hi_mid - lo_mid);
    }

    #[test]
    fn fit_needs_distinct_x() {
        assert!(LinearFit::fit(&[1.0, 1.0], &[2.0, 3.0]).is_none());
        assert!(LinearFit::fit(&[1.0], &[2.0]).is_none());
    }

    #[test]
    fn pearson_extremes() {
        assert_float_eq!(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0, abs <= 1e-12);
        assert_float_eq!(pearson(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]), -1.0, abs <= 1e-12);
        assert!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_nan());
    }

    #[test]
    fn matrix_uses_pairwise_complete_rows() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), vec![Some(1.0), Some(2.0), Some(3.0), None]),
            Column::new("b".into(), vec![Some(2.0), Some(4.0), Some(6.0), Some(100.0)]),
            Column::new("s".into(), vec!["w", "x", "y", "z"]),
        ])
        .unwrap();

        let matrix = CorrelationMatrix::from_dataframe(&df).unwrap();
        assert_eq!(matrix.columns, vec!["a", "b"]);
        assert_float_eq!(matrix.get(0, 1), 1.0, abs <= 1e-12);
        assert_float_eq!(matrix.get(1, 0), 1.0, abs <= 1e-12);
        assert_float_eq!(matrix.get(1, 1), 1.0, abs <= 1e-12);
    }

    #[test]
    fn matrix_needs_numeric_columns() {
        let df = DataFrame::new(vec![Column::new("s".into(), vec!["a", "b"])]).unwrap();
        assert!(matches!(
            CorrelationMatrix::from_dataframe(&df),
            Err(PlotError::NoNumericColumns)
        ));
    }
}

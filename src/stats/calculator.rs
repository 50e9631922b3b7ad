//! Statistics Calculator Module
//! Distribution summaries behind the categorical and pair charts.

use statrs::distribution::{Continuous, ContinuousCDF, Normal, StudentsT};

/// Confidence level for error bars and bands.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Bandwidths beyond the data extremes the density curve extends to.
pub const KDE_CUT: f64 = 2.0;

/// Five-number summary plus fliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Nested letter-value boxes, widest (quartiles) first.
#[derive(Debug, Clone, PartialEq)]
pub struct LetterValues {
    pub median: f64,
    pub levels: Vec<(f64, f64)>,
    pub outliers: Vec<f64>,
}

/// Sample mean with a t-based confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanEstimate {
    pub mean: f64,
    pub low: f64,
    pub high: f64,
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Stateless statistics helpers.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn std_dev(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 2 {
            return 0.0;
        }
        let mean = Self::mean(values);
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }
        let sorted = Self::sorted(values);

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        // Whiskers end at the most extreme observations inside the fences.
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Some(BoxStats {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Letter values with Tukey's depth rule: `floor(log2(n)) - 3` levels,
    /// at least one.
    pub fn letter_values(values: &[f64]) -> Option<LetterValues> {
        if values.is_empty() {
            return None;
        }
        let sorted = Self::sorted(values);
        let n = sorted.len() as f64;
        let k = ((n.log2().floor() as i64) - 3).max(1) as usize;

        let levels: Vec<(f64, f64)> = (1..=k)
            .map(|i| {
                let tail = 100.0 * 0.5f64.powi(i as i32 + 1);
                (
                    Self::percentile(&sorted, tail),
                    Self::percentile(&sorted, 100.0 - tail),
                )
            })
            .collect();

        let (lowest, highest) = levels.last().copied().unwrap_or((sorted[0], sorted[0]));
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lowest || v > highest)
            .collect();

        Some(LetterValues {
            median: Self::percentile(&sorted, 50.0),
            levels,
            outliers,
        })
    }

    /// Two-sided Student-t quantile for `CONFIDENCE_LEVEL` with `dof` degrees of freedom.
    pub fn t_critical(dof: f64) -> f64 {
        let p = 1.0 - (1.0 - CONFIDENCE_LEVEL) / 2.0;
        StudentsT::new(0.0, 1.0, dof)
            .map(|dist| dist.inverse_cdf(p))
            .unwrap_or(f64::NAN)
    }

    /// Mean with a t-interval. A single observation gets a zero-width interval.
    pub fn mean_ci(values: &[f64]) -> Option<MeanEstimate> {
        if values.is_empty() {
            return None;
        }
        let mean = Self::mean(values);
        let n = values.len();
        if n < 2 {
            return Some(MeanEstimate {
                mean,
                low: mean,
                high: mean,
            });
        }

        let se = Self::std_dev(values) / (n as f64).sqrt();
        let half = Self::t_critical((n - 1) as f64) * se;
        Some(MeanEstimate {
            mean,
            low: mean - half,
            high: mean + half,
        })
    }

    /// Scott's rule bandwidth, `None` for degenerate samples.
    pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
        let std = Self::std_dev(values);
        if values.len() < 2 || std <= 0.0 {
            return None;
        }
        Some(std * (values.len() as f64).powf(-0.2))
    }

    /// Gaussian kernel density evaluated on `grid_points` evenly spaced
    /// positions covering the data plus `KDE_CUT` bandwidths on each side.
    pub fn kde(values: &[f64], grid_points: usize) -> Option<Vec<(f64, f64)>> {
        let bandwidth = Self::scott_bandwidth(values)?;
        let kernel = Normal::new(0.0, 1.0).ok()?;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min) - KDE_CUT * bandwidth;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + KDE_CUT * bandwidth;
        let step = (max - min) / (grid_points.max(2) - 1) as f64;
        let norm = values.len() as f64 * bandwidth;

        let curve = (0..grid_points.max(2))
            .map(|i| {
                let x = min + i as f64 * step;
                let density = values
                    .iter()
                    .map(|v| kernel.pdf((x - v) / bandwidth))
                    .sum::<f64>()
                    / norm;
                (x, density)
            })
            .collect();
        Some(curve)
    }

    /// Histogram with Sturges' bin count.
    pub fn histogram(values: &[f64]) -> Option<Histogram> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max <= min {
            max = min + 1.0;
        }

        let bins = ((values.len() as f64).log2().ceil() as usize + 1).max(1);
        let width = (max - min) / bins as f64;
        let edges = (0..=bins).map(|i| min + i as f64 * width).collect();

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram { edges, counts })
    }
}

//! Summary statistics and histograms over curvature values.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default histogram bin count for curvature reports.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Summary statistics over a set of curvature values.
///
/// # Example
///
/// ```
/// use contour_curvature::CurvatureStatistics;
///
/// let stats = CurvatureStatistics::from_values(&[0.1, 0.4, 0.2, 0.3]).unwrap();
/// assert_eq!(stats.count, 4);
/// assert!((stats.median - 0.25).abs() < 1e-12);
/// assert!(CurvatureStatistics::from_values(&[]).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvatureStatistics {
    /// Number of values.
    pub count: usize,
    /// Smallest value.
    pub min: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median (mean of the two middle values for even counts).
    pub median: f64,
    /// Largest value.
    pub max: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl CurvatureStatistics {
    /// Compute statistics, ignoring NaN values. Returns `None` if nothing is left.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Some(Self {
            count,
            min: sorted[0],
            mean,
            median,
            max: sorted[count - 1],
            std_dev: variance.sqrt(),
        })
    }
}

impl fmt::Display for CurvatureStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Curvature Statistics")?;
        writeln!(f, "---------------------------------------")?;
        writeln!(f, "Count:              {}", self.count)?;
        writeln!(f, "Min:                {:.6}", self.min)?;
        writeln!(f, "Mean:               {:.6}", self.mean)?;
        writeln!(f, "Median:             {:.6}", self.median)?;
        writeln!(f, "Max:                {:.6}", self.max)?;
        writeln!(f, "Standard Deviation: {:.6}", self.std_dev)
    }
}

/// Equal-width histogram over `[min, max]`; the last bin is closed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvatureHistogram {
    /// Bin edges, one more than the number of bins.
    pub edges: Vec<f64>,
    /// Number of values per bin.
    pub counts: Vec<usize>,
}

impl CurvatureHistogram {
    /// Bin `values` into `bins` equal-width bins.
    ///
    /// NaN values are skipped. When every value is equal the range is
    /// widened by 0.5 on each side. Returns `None` for zero bins or no
    /// values.
    ///
    /// # Example
    ///
    /// ```
    /// use contour_curvature::CurvatureHistogram;
    ///
    /// let hist = CurvatureHistogram::new(&[0.0, 0.1, 0.5, 1.0], 2).unwrap();
    /// assert_eq!(hist.counts, vec![2, 2]);
    /// assert_eq!(hist.edges, vec![0.0, 0.5, 1.0]);
    /// ```
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let stats = CurvatureStatistics::from_values(&finite)?;

        let (lo, hi) = if stats.max > stats.min {
            (stats.min, stats.max)
        } else {
            (stats.min - 0.5, stats.max + 0.5)
        };
        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|k| lo + k as f64 * width).collect();
        edges[bins] = hi;

        let mut counts = vec![0; bins];
        for v in finite {
            let bin = (((v - lo) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Some(Self { edges, counts })
    }

    /// Number of bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of binned values.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for CurvatureHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);
        for (i, &count) in self.counts.iter().enumerate() {
            let bar = "#".repeat(count * 40 / peak);
            writeln!(
                f,
                "[{:>8.4}, {:>8.4}) {:>6} {bar}",
                self.edges[i],
                self.edges[i + 1],
                count
            )?;
        }
        Ok(())
    }
}

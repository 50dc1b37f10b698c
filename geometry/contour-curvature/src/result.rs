//! Result types for curvature estimation.

use std::fmt;

use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ContourFailure, NumericalInstability};
use crate::overlay::CurvatureOverlay;
use crate::params::CurvatureMethod;
use crate::stats::CurvatureStatistics;

/// Where along a contour a sample was evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleParameter {
    /// Index into the input point sequence (discrete method).
    Index(usize),
    /// Arc-length distance from the first retained point (polynomial method).
    ArcLength(f64),
}

impl SampleParameter {
    /// The parameter as a float, for ordering and plotting.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        match *self {
            Self::Index(i) => i as f64,
            Self::ArcLength(s) => s,
        }
    }
}

impl fmt::Display for SampleParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "index {i}"),
            Self::ArcLength(s) => write!(f, "arc length {s:.4}"),
        }
    }
}

/// Integer pixel location, `row = round(y)`, `col = round(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PixelCoord {
    /// Image row.
    pub row: i64,
    /// Image column.
    pub col: i64,
}

/// Curvature evaluated at one position along a contour.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvatureSample {
    /// Position of the sample. For the polynomial method this is the fitted
    /// position, not a raw input coordinate.
    pub position: Point2<f64>,
    /// Unsigned curvature magnitude.
    pub curvature: f64,
    /// Where the sample was evaluated.
    pub parameter: SampleParameter,
}

impl CurvatureSample {
    /// Position rounded to the nearest pixel, for raster overlays.
    ///
    /// This view is lossy; keep `position` for anything geometric.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pixel(&self) -> PixelCoord {
        PixelCoord {
            row: self.position.y.round() as i64,
            col: self.position.x.round() as i64,
        }
    }
}

/// Curvature samples for one contour.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContourCurvature {
    /// Position of the contour in the batch input (0 for single runs).
    pub contour_index: usize,
    /// Samples in ascending parameter order.
    pub samples: Vec<CurvatureSample>,
    /// Positions where curvature was forced to zero.
    pub instabilities: Vec<NumericalInstability>,
    /// Fit windows whose weighted design matrix lost rank and were solved
    /// by minimum-norm least squares (polynomial method only).
    #[cfg_attr(feature = "serde", serde(default))]
    pub rank_deficient_fits: usize,
}

impl ContourCurvature {
    /// Curvature values in sample order.
    #[must_use]
    pub fn curvature_values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.curvature).collect()
    }

    /// Rounded pixel positions in sample order.
    #[must_use]
    pub fn pixels(&self) -> Vec<PixelCoord> {
        self.samples.iter().map(CurvatureSample::pixel).collect()
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check whether no positions were evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check whether any numerical instability was recorded.
    #[must_use]
    pub fn has_instabilities(&self) -> bool {
        !self.instabilities.is_empty()
    }

    /// Clamp every curvature to at most `max`.
    pub fn clamp_to(&mut self, max: f64) {
        for sample in &mut self.samples {
            sample.curvature = sample.curvature.min(max);
        }
    }
}

/// Aggregated results for a batch of contours (one per detected cell).
#[derive(Debug, Clone, Default)]
pub struct BatchCurvature {
    /// Method the batch was processed with.
    pub method: CurvatureMethod,
    /// Successful contours in input order.
    pub contours: Vec<ContourCurvature>,
    /// Contours that were skipped, in input order.
    pub failures: Vec<ContourFailure>,
}

impl BatchCurvature {
    /// All samples across contours, grouped by contour in input order.
    pub fn samples(&self) -> impl Iterator<Item = &CurvatureSample> {
        self.contours.iter().flat_map(|c| c.samples.iter())
    }

    /// All curvature values across contours.
    #[must_use]
    pub fn curvature_values(&self) -> Vec<f64> {
        self.samples().map(|s| s.curvature).collect()
    }

    /// Total number of samples.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.contours.iter().map(ContourCurvature::len).sum()
    }

    /// Total number of recorded numerical instabilities.
    #[must_use]
    pub fn instability_count(&self) -> usize {
        self.contours.iter().map(|c| c.instabilities.len()).sum()
    }

    /// Total number of fit windows solved with a rank-deficient design.
    #[must_use]
    pub fn rank_deficient_count(&self) -> usize {
        self.contours.iter().map(|c| c.rank_deficient_fits).sum()
    }

    /// Check whether any contour was skipped.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Summary statistics over all curvature values.
    #[must_use]
    pub fn statistics(&self) -> Option<CurvatureStatistics> {
        CurvatureStatistics::from_values(&self.curvature_values())
    }

    /// Sparse pixel overlay of all samples.
    #[must_use]
    pub fn overlay(&self) -> CurvatureOverlay {
        CurvatureOverlay::from_samples(self.samples())
    }
}

impl fmt::Display for BatchCurvature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Contour Curvature ({}):", self.method)?;
        writeln!(f, "  Contours processed: {}", self.contours.len())?;
        writeln!(f, "  Contours skipped: {}", self.failures.len())?;
        writeln!(f, "  Samples: {}", self.sample_count())?;
        if self.instability_count() > 0 {
            writeln!(f, "  Unstable samples: {}", self.instability_count())?;
        }
        if self.rank_deficient_count() > 0 {
            writeln!(f, "  Rank-deficient fits: {}", self.rank_deficient_count())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CurvatureError;
    use approx::assert_relative_eq;

    fn sample(x: f64, y: f64, curvature: f64, i: usize) -> CurvatureSample {
        CurvatureSample {
            position: Point2::new(x, y),
            curvature,
            parameter: SampleParameter::Index(i),
        }
    }

    #[test]
    fn test_pixel_rounding() {
        let s = sample(3.4, 7.6, 0.2, 0);
        assert_eq!(s.pixel(), PixelCoord { row: 8, col: 3 });
        // Unrounded position is untouched.
        assert_relative_eq!(s.position.x, 3.4);

        let s = sample(-0.6, 2.5, 0.2, 0);
        assert_eq!(s.pixel(), PixelCoord { row: 3, col: -1 });
    }

    #[test]
    fn test_parameter_value() {
        assert_relative_eq!(SampleParameter::Index(4).value(), 4.0);
        assert_relative_eq!(SampleParameter::ArcLength(2.5).value(), 2.5);
        assert_eq!(SampleParameter::ArcLength(2.5).to_string(), "arc length 2.5000");
    }

    #[test]
    fn test_clamp_to() {
        let mut contour = ContourCurvature {
            contour_index: 0,
            samples: vec![sample(0.0, 0.0, 0.5, 0), sample(1.0, 0.0, 3.0, 1)],
            ..ContourCurvature::default()
        };
        contour.clamp_to(1.0);
        assert_eq!(contour.curvature_values(), vec![0.5, 1.0]);
        assert!(!contour.has_instabilities());
    }

    #[test]
    fn test_batch_aggregation_preserves_grouping() {
        let batch = BatchCurvature {
            method: CurvatureMethod::Discrete,
            contours: vec![
                ContourCurvature {
                    contour_index: 0,
                    samples: vec![sample(0.0, 0.0, 0.1, 0), sample(1.0, 0.0, 0.2, 1)],
                    ..ContourCurvature::default()
                },
                ContourCurvature {
                    contour_index: 2,
                    samples: vec![sample(5.0, 5.0, 0.3, 0)],
                    rank_deficient_fits: 2,
                    ..ContourCurvature::default()
                },
            ],
            failures: vec![ContourFailure {
                contour_index: 1,
                error: CurvatureError::degenerate(11, 3),
            }],
        };

        assert_eq!(batch.sample_count(), 3);
        assert_eq!(batch.curvature_values(), vec![0.1, 0.2, 0.3]);
        assert!(batch.has_failures());

        let stats = batch.statistics().unwrap();
        assert_relative_eq!(stats.max, 0.3);
        assert_eq!(batch.overlay().len(), 3);

        let text = batch.to_string();
        assert!(text.contains("Contours processed: 2"));
        assert!(text.contains("Contours skipped: 1"));
        assert_eq!(batch.rank_deficient_count(), 2);
        assert!(text.contains("Rank-deficient fits: 2"));
    }
}

//! Sparse per-pixel curvature overlay.
//!
//! Maps rounded sample positions to curvature for rendering on top of the
//! source image. Values are clamped to `[0, 1]`, which is lossy and meant
//! for display only. When several samples round to the same pixel the last
//! one wins.

use hashbrown::HashMap;

use crate::result::{CurvatureSample, PixelCoord};

/// Upper bound of overlay values.
pub const OVERLAY_MAX: f64 = 1.0;

/// Sparse map from pixel to displayed curvature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurvatureOverlay {
    values: HashMap<PixelCoord, f64>,
}

impl CurvatureOverlay {
    /// Create an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an overlay from samples in order.
    ///
    /// # Example
    ///
    /// ```
    /// use contour_curvature::{CurvatureOverlay, CurvatureSample, PixelCoord, SampleParameter};
    /// use nalgebra::Point2;
    ///
    /// let samples = [CurvatureSample {
    ///     position: Point2::new(4.2, 9.7),
    ///     curvature: 3.0,
    ///     parameter: SampleParameter::Index(0),
    /// }];
    /// let overlay = CurvatureOverlay::from_samples(&samples);
    /// assert_eq!(overlay.get(PixelCoord { row: 10, col: 4 }), Some(1.0));
    /// ```
    pub fn from_samples<'a>(samples: impl IntoIterator<Item = &'a CurvatureSample>) -> Self {
        let mut overlay = Self::new();
        for sample in samples {
            overlay.insert(sample);
        }
        overlay
    }

    /// Write one sample, replacing any value already at its pixel.
    pub fn insert(&mut self, sample: &CurvatureSample) {
        let value = if sample.curvature.is_nan() {
            0.0
        } else {
            sample.curvature.clamp(0.0, OVERLAY_MAX)
        };
        self.values.insert(sample.pixel(), value);
    }

    /// Value at a pixel, if any sample landed there.
    #[must_use]
    pub fn get(&self, pixel: PixelCoord) -> Option<f64> {
        self.values.get(&pixel).copied()
    }

    /// Number of covered pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether no pixel is covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Covered pixels and their values, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (PixelCoord, f64)> + '_ {
        self.values.iter().map(|(&p, &v)| (p, v))
    }

    /// Smallest rectangle containing every covered pixel, as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> Option<(PixelCoord, PixelCoord)> {
        let mut keys = self.values.keys();
        let first = *keys.next()?;
        Some(keys.fold((first, first), |(lo, hi), p| {
            (
                PixelCoord {
                    row: lo.row.min(p.row),
                    col: lo.col.min(p.col),
                },
                PixelCoord {
                    row: hi.row.max(p.row),
                    col: hi.col.max(p.col),
                },
            )
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::result::SampleParameter;
    use nalgebra::Point2;

    fn sample(x: f64, y: f64, curvature: f64) -> CurvatureSample {
        CurvatureSample {
            position: Point2::new(x, y),
            curvature,
            parameter: SampleParameter::Index(0),
        }
    }

    #[test]
    fn test_clamps_to_display_range() {
        let overlay = CurvatureOverlay::from_samples(&[
            sample(0.0, 0.0, 0.25),
            sample(1.0, 0.0, 7.0),
            sample(2.0, 0.0, f64::NAN),
        ]);
        assert_eq!(overlay.get(PixelCoord { row: 0, col: 0 }), Some(0.25));
        assert_eq!(overlay.get(PixelCoord { row: 0, col: 1 }), Some(1.0));
        assert_eq!(overlay.get(PixelCoord { row: 0, col: 2 }), Some(0.0));
        assert_eq!(overlay.get(PixelCoord { row: 5, col: 5 }), None);
    }

    #[test]
    fn test_last_sample_wins() {
        let overlay =
            CurvatureOverlay::from_samples(&[sample(3.1, 2.9, 0.2), sample(2.9, 3.2, 0.6)]);
        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.get(PixelCoord { row: 3, col: 3 }), Some(0.6));
    }

    #[test]
    fn test_bounds() {
        assert!(CurvatureOverlay::new().bounds().is_none());
        let overlay = CurvatureOverlay::from_samples(&[
            sample(4.0, -1.0, 0.1),
            sample(-2.0, 6.0, 0.1),
            sample(1.0, 1.0, 0.1),
        ]);
        let (lo, hi) = overlay.bounds().unwrap();
        assert_eq!(lo, PixelCoord { row: -1, col: -2 });
        assert_eq!(hi, PixelCoord { row: 6, col: 4 });
        assert_eq!(overlay.iter().count(), 3);
    }
}

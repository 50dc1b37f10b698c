//! Ordered 2D boundary point sequences.
//!
//! A contour is the traced outline of one detected cell. Point order is
//! significant: it defines the traversal direction and which points are
//! adjacent. A contour may be closed (first and last point adjacent) or an
//! open traced path; the estimators treat both the same way.

use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered sequence of boundary points for one cell.
///
/// # Example
///
/// ```
/// use contour_curvature::Contour;
///
/// let contour = Contour::from_coords(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
/// assert_eq!(contour.len(), 3);
/// assert!((contour.length() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contour {
    points: Vec<Point2<f64>>,
}

impl Contour {
    /// Create a contour from points in traversal order.
    #[must_use]
    pub const fn new(points: Vec<Point2<f64>>) -> Self {
        Self { points }
    }

    /// Create a contour from `[x, y]` coordinate pairs.
    #[must_use]
    pub fn from_coords(coords: &[[f64; 2]]) -> Self {
        Self {
            points: coords.iter().map(|&[x, y]| Point2::new(x, y)).collect(),
        }
    }

    /// The points of the contour in traversal order.
    #[must_use]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Consume the contour and return its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point2<f64>> {
        self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the contour has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total polyline length through all points in order.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Count consecutive pairs that sit on the same location.
    #[must_use]
    pub fn coincident_pairs(&self) -> usize {
        self.points.windows(2).filter(|w| w[0] == w[1]).count()
    }
}

impl From<Vec<Point2<f64>>> for Contour {
    fn from(points: Vec<Point2<f64>>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point2<f64>> for Contour {
    fn from_iter<T: IntoIterator<Item = Point2<f64>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_coords() {
        let contour = Contour::from_coords(&[[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(contour.len(), 2);
        assert_relative_eq!(contour.points()[1].x, 3.0);
        assert_relative_eq!(contour.points()[1].y, 4.0);
    }

    #[test]
    fn test_length() {
        let contour = Contour::from_coords(&[[0.0, 0.0], [3.0, 4.0], [3.0, 0.0]]);
        assert_relative_eq!(contour.length(), 9.0, epsilon = 1e-12);
        assert_relative_eq!(Contour::default().length(), 0.0);
    }

    #[test]
    fn test_coincident_pairs() {
        let contour =
            Contour::from_coords(&[[0.0, 0.0], [0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 0.0]]);
        assert_eq!(contour.coincident_pairs(), 3);
        assert!(!contour.is_empty());
    }

    #[test]
    fn test_collect() {
        let contour: Contour = (0..4).map(|i| Point2::new(f64::from(i), 0.0)).collect();
        assert_eq!(contour.len(), 4);
    }
}

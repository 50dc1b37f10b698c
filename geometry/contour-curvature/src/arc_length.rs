//! Arc-length reparametrization of contours.
//!
//! Converts an ordered point sequence into cumulative chord-length
//! coordinates. Coincident consecutive points are dropped first so that no
//! arc-length step is zero.

use nalgebra::Point2;
use tracing::debug;

use crate::contour::Contour;
use crate::error::{CurvatureError, CurvatureResult};

/// Cumulative arc length per retained contour point.
///
/// `distances` and `points` are parallel arrays. `distances[0]` is zero and
/// the sequence is strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthTrace {
    distances: Vec<f64>,
    points: Vec<Point2<f64>>,
    dropped: usize,
}

impl ArcLengthTrace {
    /// Cumulative arc length at each retained point.
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// The retained points.
    #[must_use]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Number of retained points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether no points were retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of coincident points removed from the input.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Arc length of the whole trace.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }
}

/// Parametrize a contour by cumulative arc length.
///
/// Runs of coincident consecutive points collapse to their first point.
///
/// # Errors
///
/// Returns [`CurvatureError::DegenerateContour`] if fewer than `min_points`
/// distinct points remain.
///
/// # Example
///
/// ```
/// use contour_curvature::{parametrize, Contour};
///
/// let contour = Contour::from_coords(&[[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 2.0]]);
/// let trace = parametrize(&contour, 3).unwrap();
/// assert_eq!(trace.distances(), &[0.0, 1.0, 3.0]);
/// assert_eq!(trace.dropped(), 1);
/// ```
pub fn parametrize(contour: &Contour, min_points: usize) -> CurvatureResult<ArcLengthTrace> {
    let input = contour.points();
    let mut points: Vec<Point2<f64>> = Vec::with_capacity(input.len());
    let mut distances = Vec::with_capacity(input.len());

    for &point in input {
        match points.last() {
            None => distances.push(0.0),
            Some(last) => {
                let previous = distances.last().copied().unwrap_or(0.0);
                let next = previous + (point - last).norm();
                // Also catches steps lost to rounding at large arc lengths.
                if next <= previous {
                    continue;
                }
                distances.push(next);
            }
        }
        points.push(point);
    }

    let dropped = input.len() - points.len();
    if dropped > 0 {
        debug!(dropped, retained = points.len(), "Removed coincident contour points");
    }

    if points.len() < min_points {
        return Err(CurvatureError::degenerate(min_points, points.len()));
    }

    Ok(ArcLengthTrace {
        distances,
        points,
        dropped,
    })
}

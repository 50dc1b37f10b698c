//! Curvature from finite differences of the raw point sequence.
//!
//! Derivatives are taken with respect to point index, not arc length. The
//! curvature formula is invariant under reparametrization, so on evenly
//! sampled contours this matches the geometric curvature; on uneven
//! sampling it is only an approximation.
//!
//! Values are capped at [`DISCRETE_CURVATURE_CAP`]. Under the index
//! parametrization values above the cap come from sampling artifacts
//! rather than real shape.

use nalgebra::Point2;
use tracing::debug;

use crate::contour::Contour;
use crate::error::{CurvatureError, CurvatureResult, NumericalInstability};
use crate::result::{ContourCurvature, CurvatureSample, SampleParameter};

/// Largest curvature the discrete method reports.
pub const DISCRETE_CURVATURE_CAP: f64 = 1.0;

/// Minimum number of points for a first difference.
const MIN_POINTS: usize = 2;

/// Numerical gradient of a uniformly spaced sequence.
///
/// Central differences in the interior, one-sided differences at the ends.
/// Returns an empty vector for fewer than two values.
#[must_use]
pub fn gradient(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < MIN_POINTS {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(n);
    out.push(values[1] - values[0]);
    for i in 1..n - 1 {
        out.push((values[i + 1] - values[i - 1]) / 2.0);
    }
    out.push(values[n - 1] - values[n - 2]);
    out
}

/// Curvature from first and second derivatives of a planar curve.
///
/// Returns `None` when the squared speed is at or below `epsilon`.
#[must_use]
pub fn curvature_from_derivatives(
    dx: f64,
    dy: f64,
    ddx: f64,
    ddy: f64,
    epsilon: f64,
) -> Option<f64> {
    let speed_squared = dx * dx + dy * dy;
    if speed_squared <= epsilon || !speed_squared.is_finite() {
        return None;
    }
    Some((dx * ddy - ddx * dy).abs() / speed_squared.powf(1.5))
}

/// Estimate curvature at every input point by finite differences.
///
/// One sample is produced per input point, at the unrounded input position.
/// Use [`CurvatureSample::pixel`] for the rounded raster view.
///
/// # Errors
///
/// Returns [`CurvatureError::DegenerateContour`] for fewer than two points
/// and [`CurvatureError::NonFiniteCoordinate`] for NaN or infinite input.
///
/// # Example
///
/// ```
/// use contour_curvature::{estimate_discrete, Contour};
///
/// // Straight line: zero curvature everywhere.
/// let line = Contour::from_coords(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]);
/// let result = estimate_discrete(&line, 1e-12).unwrap();
/// assert_eq!(result.len(), 4);
/// assert!(result.samples.iter().all(|s| s.curvature.abs() < 1e-12));
/// ```
pub fn estimate_discrete(contour: &Contour, epsilon: f64) -> CurvatureResult<ContourCurvature> {
    let points = contour.points();
    if points.len() < MIN_POINTS {
        return Err(CurvatureError::degenerate(MIN_POINTS, points.len()));
    }
    if let Some(index) = first_non_finite(points) {
        return Err(CurvatureError::non_finite(index));
    }

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

    let dx = gradient(&xs);
    let dy = gradient(&ys);
    let ddx = gradient(&dx);
    let ddy = gradient(&dy);

    let mut samples = Vec::with_capacity(points.len());
    let mut instabilities = Vec::new();

    for (i, &position) in points.iter().enumerate() {
        let parameter = SampleParameter::Index(i);
        let curvature = match curvature_from_derivatives(dx[i], dy[i], ddx[i], ddy[i], epsilon) {
            Some(k) => k.min(DISCRETE_CURVATURE_CAP),
            None => {
                instabilities.push(NumericalInstability {
                    parameter,
                    speed_squared: dx[i] * dx[i] + dy[i] * dy[i],
                });
                0.0
            }
        };
        samples.push(CurvatureSample {
            position,
            curvature,
            parameter,
        });
    }

    debug!(
        points = points.len(),
        unstable = instabilities.len(),
        "Discrete curvature estimated"
    );

    Ok(ContourCurvature {
        contour_index: 0,
        samples,
        instabilities,
        rank_deficient_fits: 0,
    })
}

pub(crate) fn first_non_finite(points: &[Point2<f64>]) -> Option<usize> {
    points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
}

//! Weighted least-squares polynomial fitting.
//!
//! Polynomials are fit in a normalized abscissa `u = (s - center) / scale`
//! so the Vandermonde matrix stays well conditioned regardless of where the
//! window sits along the contour. Derivatives are returned with respect to
//! the unscaled abscissa `s`.
//!
//! Systems are solved through the SVD pseudo-inverse. A window whose
//! weighted design matrix loses rank (for example when narrow Gaussian
//! weights underflow at the window edges) still gets the minimum-norm
//! least-squares fit, flagged through [`PlanarFit::is_rank_deficient`].

// Polynomial orders are tiny; index-to-float casts are exact.
#![allow(clippy::cast_precision_loss)]

use nalgebra::{DMatrix, Point2};

use crate::error::{CurvatureError, CurvatureResult};

/// Singular values below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-12;

/// A polynomial in a shifted and scaled abscissa.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    /// Coefficients in ascending powers of the normalized abscissa.
    coefficients: Vec<f64>,
    center: f64,
    scale: f64,
}

impl Polynomial {
    /// Degree of the polynomial (number of coefficients minus one).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Value at `s`.
    #[must_use]
    pub fn value(&self, s: f64) -> f64 {
        let u = self.normalize(s);
        self.coefficients.iter().rev().fold(0.0, |acc, &c| acc * u + c)
    }

    /// First derivative with respect to `s`.
    #[must_use]
    pub fn first_derivative(&self, s: f64) -> f64 {
        let u = self.normalize(s);
        let du = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (k, &c)| acc * u + k as f64 * c);
        du / self.scale
    }

    /// Second derivative with respect to `s`.
    #[must_use]
    pub fn second_derivative(&self, s: f64) -> f64 {
        let u = self.normalize(s);
        let ddu = self
            .coefficients
            .iter()
            .enumerate()
            .skip(2)
            .rev()
            .fold(0.0, |acc, (k, &c)| acc * u + (k * (k - 1)) as f64 * c);
        ddu / (self.scale * self.scale)
    }

    fn normalize(&self, s: f64) -> f64 {
        (s - self.center) / self.scale
    }
}

/// Two polynomials `x(s)` and `y(s)` fit to the same window.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarFit {
    /// Fit of the x coordinate.
    pub x: Polynomial,
    /// Fit of the y coordinate.
    pub y: Polynomial,
    /// Numerical rank of the weighted design matrix.
    pub rank: usize,
}

impl PlanarFit {
    /// Check whether the design matrix had fewer independent columns than
    /// the polynomial has coefficients.
    #[must_use]
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.x.coefficients.len()
    }

    /// Fitted position at `s`.
    #[must_use]
    pub fn position(&self, s: f64) -> Point2<f64> {
        Point2::new(self.x.value(s), self.y.value(s))
    }
}

/// Fit `x(s)` and `y(s)` of the given order by (weighted) least squares.
///
/// `center` is the abscissa the normalization is anchored on, normally the
/// arc length of the window's middle sample. When `weights` is given, each
/// regression row is multiplied by its weight.
///
/// # Errors
///
/// Returns [`CurvatureError::UnderdeterminedFit`] if there are not more
/// samples than the polynomial order. Rank loss in the weighted design
/// matrix is not an error; see [`PlanarFit::rank`]. Returns
/// [`CurvatureError::NonFiniteCoordinate`] for NaN or infinite input.
///
/// # Example
///
/// ```
/// use contour_curvature::fit_planar;
/// use nalgebra::Point2;
///
/// let s = [0.0, 1.0, 2.0, 3.0, 4.0];
/// let points: Vec<_> = s.iter().map(|&t| Point2::new(t, t * t)).collect();
/// let fit = fit_planar(&s, &points, 2, 2.0, None).unwrap();
/// assert!((fit.y.second_derivative(1.5) - 2.0).abs() < 1e-9);
/// ```
pub fn fit_planar(
    abscissa: &[f64],
    points: &[Point2<f64>],
    order: usize,
    center: f64,
    weights: Option<&[f64]>,
) -> CurvatureResult<PlanarFit> {
    let samples = abscissa.len().min(points.len());
    let columns = order + 1;
    if samples <= order {
        return Err(CurvatureError::underdetermined(order, samples));
    }

    if let Some(index) = (0..samples).find(|&i| {
        let w = weights.and_then(|w| w.get(i)).copied().unwrap_or(1.0);
        !(abscissa[i].is_finite() && points[i].x.is_finite() && points[i].y.is_finite())
            || !w.is_finite()
    }) {
        return Err(CurvatureError::non_finite(index));
    }

    let scale = abscissa[..samples]
        .iter()
        .map(|&s| (s - center).abs())
        .fold(0.0_f64, f64::max);
    let scale = if scale > 0.0 { scale } else { 1.0 };

    let mut design = DMatrix::<f64>::zeros(samples, columns);
    let mut rhs = DMatrix::<f64>::zeros(samples, 2);

    for row in 0..samples {
        let w = weights.and_then(|w| w.get(row)).copied().unwrap_or(1.0);
        let u = (abscissa[row] - center) / scale;
        let mut power = w;
        for col in 0..columns {
            design[(row, col)] = power;
            power *= u;
        }
        rhs[(row, 0)] = w * points[row].x;
        rhs[(row, 1)] = w * points[row].y;
    }

    let svd = design.svd(true, true);
    let tolerance = svd.singular_values.max() * RANK_TOLERANCE;
    let rank = svd.rank(tolerance);

    let solution = svd
        .solve(&rhs, tolerance)
        .map_err(|_| CurvatureError::underdetermined(order, samples))?;

    let x = solution.column(0).iter().copied().collect();
    let y = solution.column(1).iter().copied().collect();

    Ok(PlanarFit {
        x: Polynomial {
            coefficients: x,
            center,
            scale,
        },
        y: Polynomial {
            coefficients: y,
            center,
            scale,
        },
        rank,
    })
}

/// Gaussian weights over `abscissa`, centered on `mean`.
///
/// `sigma` is the window span divided by `width_factor`.
#[must_use]
pub fn gaussian_weights(abscissa: &[f64], mean: f64, width_factor: f64) -> Vec<f64> {
    let (min, max) = abscissa
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(s), hi.max(s))
        });
    let sigma = (max - min) / width_factor;
    let denom = 2.0 * sigma * sigma;

    abscissa
        .iter()
        .map(|&s| {
            let d = s - mean;
            (-(d * d) / denom).exp()
        })
        .collect()
}

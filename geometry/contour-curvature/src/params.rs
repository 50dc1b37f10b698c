//! Parameters for curvature estimation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CurvatureError, CurvatureResult};

/// Largest `fit_half_width` whose window length fits in a `usize`.
pub const MAX_FIT_HALF_WIDTH: usize = (usize::MAX - 1) / 2;

/// Curvature estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CurvatureMethod {
    /// Finite differences of the raw coordinates against point index.
    #[default]
    Discrete,
    /// Sliding-window polynomial fit against arc length.
    PolynomialFit,
}

impl fmt::Display for CurvatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discrete => write!(f, "discrete"),
            Self::PolynomialFit => write!(f, "polynomial fit"),
        }
    }
}

/// Parameters for curvature estimation.
///
/// Options marked "polynomial only" are ignored by the discrete method.
///
/// # Example
///
/// ```
/// use contour_curvature::{CurvatureMethod, CurvatureParams};
///
/// // The discrete method needs no further options.
/// let params = CurvatureParams::default();
/// assert_eq!(params.method, CurvatureMethod::Discrete);
/// assert!(params.validate().is_ok());
///
/// // Polynomial fit resampled to 100 evenly spaced positions.
/// let params = CurvatureParams::polynomial_fit(100).order(2).pad(5);
/// assert!(params.validate().is_ok());
///
/// // Resampling and evaluating at input positions are exclusive.
/// let params = CurvatureParams::polynomial_fit(100).evaluate_at_input_positions(true);
/// assert!(params.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvatureParams {
    /// Which estimator to run.
    pub method: CurvatureMethod,

    /// Polynomial order of each local fit (polynomial only).
    pub order: usize,

    /// Half-width of the fit window in samples (polynomial only).
    /// Each window holds `2 * fit_half_width + 1` samples.
    pub fit_half_width: usize,

    /// Samples excluded from evaluation at each end of the trace
    /// (polynomial only).
    pub pad: usize,

    /// Gaussian weighting of the fit (polynomial only). `Some(w)` sets
    /// sigma to the window's arc-length span divided by `w`.
    pub weighted: Option<f64>,

    /// Evaluate at the retained input arc lengths instead of resampling
    /// (polynomial only).
    pub evaluate_at_input_positions: bool,

    /// Number of evenly spaced arc-length positions to evaluate
    /// (polynomial only).
    pub resampled_points: Option<usize>,

    /// Upper clamp for polynomial-method curvature. This is a presentation
    /// policy and discards information above the cap. The discrete method
    /// always caps at 1.0.
    pub max_curvature: Option<f64>,

    /// Squared-speed threshold under which curvature is reported as zero.
    pub epsilon: f64,

    /// Whether batches are processed in parallel (via rayon).
    pub parallel: bool,
}

impl Default for CurvatureParams {
    fn default() -> Self {
        Self {
            method: CurvatureMethod::Discrete,
            order: 3,
            fit_half_width: 5,
            pad: 10,
            weighted: None,
            evaluate_at_input_positions: false,
            resampled_points: None,
            max_curvature: None,
            epsilon: 1e-12,
            parallel: false,
        }
    }
}

impl CurvatureParams {
    /// Parameters for the discrete finite-difference method.
    #[must_use]
    pub fn discrete() -> Self {
        Self::default()
    }

    /// Polynomial fit evaluated at `points` evenly spaced arc lengths.
    #[must_use]
    pub fn polynomial_fit(points: usize) -> Self {
        Self {
            method: CurvatureMethod::PolynomialFit,
            resampled_points: Some(points),
            ..Self::default()
        }
    }

    /// Polynomial fit evaluated at the retained input positions.
    #[must_use]
    pub fn polynomial_at_input_positions() -> Self {
        Self {
            method: CurvatureMethod::PolynomialFit,
            evaluate_at_input_positions: true,
            ..Self::default()
        }
    }

    /// Set the polynomial order.
    #[must_use]
    pub const fn order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Set the fit window half-width.
    #[must_use]
    pub const fn fit_half_width(mut self, half_width: usize) -> Self {
        self.fit_half_width = half_width;
        self
    }

    /// Set the end padding.
    #[must_use]
    pub const fn pad(mut self, pad: usize) -> Self {
        self.pad = pad;
        self
    }

    /// Enable Gaussian weighting with the given width factor.
    #[must_use]
    pub const fn weighted(mut self, width_factor: f64) -> Self {
        self.weighted = Some(width_factor);
        self
    }

    /// Toggle evaluation at input positions.
    #[must_use]
    pub const fn evaluate_at_input_positions(mut self, enabled: bool) -> Self {
        self.evaluate_at_input_positions = enabled;
        self
    }

    /// Set the number of resampled positions.
    #[must_use]
    pub const fn resampled_points(mut self, points: usize) -> Self {
        self.resampled_points = Some(points);
        self
    }

    /// Clamp polynomial-method curvature to at most `max`.
    #[must_use]
    pub const fn max_curvature(mut self, max: f64) -> Self {
        self.max_curvature = Some(max);
        self
    }

    /// Enable or disable parallel batch processing.
    #[must_use]
    pub const fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Number of samples in one fit window.
    ///
    /// Saturates at `usize::MAX` for half-widths above
    /// [`MAX_FIT_HALF_WIDTH`], which [`CurvatureParams::validate`] rejects.
    #[must_use]
    pub const fn window_len(&self) -> usize {
        self.fit_half_width.saturating_mul(2).saturating_add(1)
    }

    /// Check option ranges and combinations.
    ///
    /// # Errors
    ///
    /// Returns [`CurvatureError::InvalidConfiguration`] for out-of-range or
    /// incompatible options, and [`CurvatureError::UnderdeterminedFit`] when
    /// the polynomial order needs more samples than a window holds.
    pub fn validate(&self) -> CurvatureResult<()> {
        if self.epsilon.is_nan() || self.epsilon < 0.0 {
            return Err(CurvatureError::invalid_configuration(format!(
                "epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        if let Some(max) = self.max_curvature {
            if max.is_nan() || max <= 0.0 {
                return Err(CurvatureError::invalid_configuration(format!(
                    "max_curvature must be positive, got {max}"
                )));
            }
        }
        if self.resampled_points == Some(0) {
            return Err(CurvatureError::invalid_configuration(
                "resampled_points must be positive",
            ));
        }

        match self.method {
            CurvatureMethod::Discrete => {
                if self.resampled_points.is_some() {
                    return Err(CurvatureError::invalid_configuration(
                        "the discrete method evaluates every input point and cannot resample",
                    ));
                }
            }
            CurvatureMethod::PolynomialFit => self.validate_polynomial()?,
        }

        Ok(())
    }

    fn validate_polynomial(&self) -> CurvatureResult<()> {
        if self.order == 0 {
            return Err(CurvatureError::invalid_configuration(
                "order must be at least 1",
            ));
        }
        if self.fit_half_width == 0 || self.fit_half_width > MAX_FIT_HALF_WIDTH {
            return Err(CurvatureError::invalid_configuration(format!(
                "fit_half_width must be in 1..={MAX_FIT_HALF_WIDTH}, got {}",
                self.fit_half_width
            )));
        }
        if let Some(w) = self.weighted {
            if !w.is_finite() || w <= 0.0 {
                return Err(CurvatureError::invalid_configuration(format!(
                    "weighted must be a positive finite factor, got {w}"
                )));
            }
        }
        match (self.evaluate_at_input_positions, self.resampled_points) {
            (true, Some(_)) => {
                return Err(CurvatureError::invalid_configuration(
                    "evaluate_at_input_positions is incompatible with resampled_points",
                ));
            }
            (false, None) => {
                return Err(CurvatureError::invalid_configuration(
                    "set resampled_points or enable evaluate_at_input_positions",
                ));
            }
            _ => {}
        }
        if self.order >= self.window_len() {
            return Err(CurvatureError::underdetermined(
                self.order,
                self.window_len(),
            ));
        }
        Ok(())
    }
}

//! Error types for curvature estimation.

use thiserror::Error;

use crate::result::SampleParameter;

/// Result type alias for curvature operations.
pub type CurvatureResult<T> = Result<T, CurvatureError>;

/// Errors that can occur while estimating contour curvature.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurvatureError {
    /// Too few distinct points to form a fit window.
    #[error("degenerate contour: need at least {required} distinct points, got {actual}")]
    DegenerateContour {
        /// Minimum number of distinct points required.
        required: usize,
        /// Number of distinct points available.
        actual: usize,
    },

    /// Polynomial order is too high for the number of samples in a window.
    #[error("underdetermined fit: polynomial order {order} needs more than {window} samples")]
    UnderdeterminedFit {
        /// Requested polynomial order.
        order: usize,
        /// Number of samples in one fit window.
        window: usize,
    },

    /// Configuration options are out of range or incompatible.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A contour point has a NaN or infinite coordinate.
    #[error("non-finite coordinate at point {index}")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
    },
}

impl CurvatureError {
    /// Create a degenerate contour error.
    #[must_use]
    pub const fn degenerate(required: usize, actual: usize) -> Self {
        Self::DegenerateContour { required, actual }
    }

    /// Create an underdetermined fit error.
    #[must_use]
    pub const fn underdetermined(order: usize, window: usize) -> Self {
        Self::UnderdeterminedFit { order, window }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(details: impl Into<String>) -> Self {
        Self::InvalidConfiguration(details.into())
    }

    /// Create a non-finite coordinate error.
    #[must_use]
    pub const fn non_finite(index: usize) -> Self {
        Self::NonFiniteCoordinate { index }
    }

    /// Check if this is a degenerate contour error.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateContour { .. })
    }

    /// Check if this is an underdetermined fit error.
    #[must_use]
    pub fn is_underdetermined(&self) -> bool {
        matches!(self, Self::UnderdeterminedFit { .. })
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

/// Non-fatal diagnostic: the curve speed was too small to evaluate curvature.
///
/// The affected sample carries curvature `0.0` instead of a diverging value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumericalInstability {
    /// Where along the contour the instability occurred.
    pub parameter: SampleParameter,
    /// Squared speed `x'^2 + y'^2` that fell under the threshold.
    pub speed_squared: f64,
}

impl std::fmt::Display for NumericalInstability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "near-zero speed ({:.3e}) at {}, curvature forced to 0",
            self.speed_squared, self.parameter
        )
    }
}

/// A contour that was skipped during batch processing.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourFailure {
    /// Position of the contour in the batch input.
    pub contour_index: usize,
    /// Why the contour was skipped.
    pub error: CurvatureError,
}

impl std::fmt::Display for ContourFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "contour {}: {}", self.contour_index, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurvatureError::degenerate(11, 4);
        assert!(err.to_string().contains("at least 11"));
        assert!(err.to_string().contains("got 4"));

        let err = CurvatureError::underdetermined(5, 5);
        assert!(err.to_string().contains("order 5"));

        let err = CurvatureError::invalid_configuration("pad too large");
        assert!(err.to_string().contains("pad too large"));

        let err = CurvatureError::non_finite(12);
        assert!(err.to_string().contains("point 12"));
    }

    #[test]
    fn test_error_predicates() {
        let err = CurvatureError::degenerate(3, 1);
        assert!(err.is_degenerate());
        assert!(!err.is_underdetermined());

        let err = CurvatureError::underdetermined(3, 3);
        assert!(err.is_underdetermined());
        assert!(!err.is_invalid_configuration());

        let err = CurvatureError::invalid_configuration("x");
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn test_failure_display() {
        let failure = ContourFailure {
            contour_index: 7,
            error: CurvatureError::degenerate(11, 2),
        };
        let text = failure.to_string();
        assert!(text.starts_with("contour 7"));
        assert!(text.contains("degenerate"));

        let warning = NumericalInstability {
            parameter: SampleParameter::Index(3),
            speed_squared: 0.0,
        };
        assert!(warning.to_string().contains("index 3"));
    }
}

//! Curvature estimation along traced 2D cell boundaries.
//!
//! Given the ordered boundary points of a cell (as produced by any
//! contour tracer), this crate estimates unsigned curvature at positions
//! along the boundary for overlay rendering and statistics.
//!
//! # Methods
//!
//! - **Discrete** ([`estimate_discrete`]): first and second finite
//!   differences of the raw coordinates against point index. One sample per
//!   input point, capped at 1.0.
//! - **Polynomial fit** ([`estimate_polynomial`]): the contour is
//!   reparametrized by arc length ([`parametrize`]); a polynomial pair
//!   `x(s), y(s)` is fit over a sliding window (optionally Gaussian
//!   weighted) and curvature is evaluated analytically, either on an even
//!   resampling of arc length or at the input positions.
//!
//! Both compute `|x' y'' - x'' y'| / (x'^2 + y'^2)^(3/2)`. Where the speed
//! vanishes the sample is reported as zero and a [`NumericalInstability`]
//! is recorded instead.
//!
//! # Example
//!
//! ```
//! use contour_curvature::{Contour, CurvatureParams, CurvaturePipeline};
//! use nalgebra::Point2;
//!
//! // 200 samples on a unit circle.
//! let contour: Contour = (0..200)
//!     .map(|i| {
//!         let t = std::f64::consts::TAU * f64::from(i) / 200.0;
//!         Point2::new(t.cos(), t.sin())
//!     })
//!     .collect();
//!
//! let params = CurvatureParams::polynomial_fit(100).order(3).fit_half_width(5);
//! let pipeline = CurvaturePipeline::new(params).unwrap();
//! let result = pipeline.run(&contour).unwrap();
//!
//! assert_eq!(result.len(), 100);
//! assert!(result.samples.iter().all(|s| (s.curvature - 1.0).abs() < 0.05));
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies** and no imaging
//! or plotting dependencies. Segmentation and contour tracing plug in via
//! the [`CellSegmenter`] and [`ContourTracer`] traits.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for contours, params
//!   and results

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::module_name_repetitions, clippy::many_single_char_names)]

mod arc_length;
mod collaborators;
mod contour;
mod discrete;
mod error;
mod overlay;
mod params;
mod pipeline;
mod polyfit;
mod polynomial;
mod result;
mod stats;

// Re-export main types and functions
pub use arc_length::{ArcLengthTrace, parametrize};
pub use collaborators::{CellMask, CellSegmenter, ContourTracer};
pub use contour::Contour;
pub use discrete::{
    DISCRETE_CURVATURE_CAP, curvature_from_derivatives, estimate_discrete, gradient,
};
pub use error::{ContourFailure, CurvatureError, CurvatureResult, NumericalInstability};
pub use overlay::{CurvatureOverlay, OVERLAY_MAX};
pub use params::{CurvatureMethod, CurvatureParams, MAX_FIT_HALF_WIDTH};
pub use pipeline::CurvaturePipeline;
pub use polyfit::{PlanarFit, Polynomial, fit_planar, gaussian_weights};
pub use polynomial::{EvaluationPositions, estimate_polynomial, evaluation_distances, linspace};
pub use result::{
    BatchCurvature, ContourCurvature, CurvatureSample, PixelCoord, SampleParameter,
};
pub use stats::{CurvatureHistogram, CurvatureStatistics, DEFAULT_HISTOGRAM_BINS};

// Re-export nalgebra types for convenience
pub use nalgebra::Point2;

//! Curvature pipeline: estimator selection, edge policy and batching.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::arc_length::parametrize;
use crate::collaborators::{CellSegmenter, ContourTracer};
use crate::contour::Contour;
use crate::discrete::{estimate_discrete, first_non_finite};
use crate::error::{ContourFailure, CurvatureError, CurvatureResult};
use crate::params::{CurvatureMethod, CurvatureParams};
use crate::polynomial::{EvaluationPositions, estimate_polynomial, evaluation_distances};
use crate::result::{BatchCurvature, ContourCurvature};

/// Validated curvature pipeline.
///
/// Configuration problems are reported once, by [`CurvaturePipeline::new`].
/// After that, per-contour data problems never stop a batch: they are
/// collected as [`ContourFailure`]s next to the successful results.
///
/// # Example
///
/// ```
/// use contour_curvature::{Contour, CurvatureParams, CurvaturePipeline};
///
/// let circle: Contour = (0..120)
///     .map(|i| {
///         let t = std::f64::consts::TAU * f64::from(i) / 120.0;
///         nalgebra::Point2::new(10.0 * t.cos(), 10.0 * t.sin())
///     })
///     .collect();
/// let short = Contour::from_coords(&[[0.0, 0.0], [1.0, 1.0]]);
///
/// let pipeline = CurvaturePipeline::new(CurvatureParams::polynomial_fit(50)).unwrap();
/// let batch = pipeline.run_batch(&[circle, short]);
///
/// assert_eq!(batch.contours.len(), 1);
/// assert_eq!(batch.contours[0].len(), 50);
/// assert_eq!(batch.failures[0].contour_index, 1);
/// ```
#[derive(Debug, Clone)]
pub struct CurvaturePipeline {
    params: CurvatureParams,
}

impl CurvaturePipeline {
    /// Create a pipeline after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns [`CurvatureError::InvalidConfiguration`] or
    /// [`CurvatureError::UnderdeterminedFit`] if the parameters cannot work
    /// for any contour.
    pub fn new(params: CurvatureParams) -> CurvatureResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The validated parameters.
    #[must_use]
    pub const fn params(&self) -> &CurvatureParams {
        &self.params
    }

    /// Estimate curvature along one contour.
    ///
    /// # Errors
    ///
    /// Returns [`CurvatureError::DegenerateContour`] if the contour has too
    /// few distinct points and [`CurvatureError::NonFiniteCoordinate`] if a
    /// coordinate is NaN or infinite.
    pub fn run(&self, contour: &Contour) -> CurvatureResult<ContourCurvature> {
        if let Some(index) = first_non_finite(contour.points()) {
            return Err(CurvatureError::non_finite(index));
        }

        let result = match self.params.method {
            CurvatureMethod::Discrete => estimate_discrete(contour, self.params.epsilon)?,
            CurvatureMethod::PolynomialFit => self.run_polynomial(contour)?,
        };

        if result.has_instabilities() {
            warn!(
                unstable = result.instabilities.len(),
                samples = result.len(),
                "Near-zero speed, curvature forced to 0"
            );
        }
        if result.rank_deficient_fits > 0 {
            warn!(
                windows = result.rank_deficient_fits,
                "Rank-deficient fit windows, using minimum-norm solutions"
            );
        }
        Ok(result)
    }

    fn run_polynomial(&self, contour: &Contour) -> CurvatureResult<ContourCurvature> {
        let params = &self.params;
        let trace = parametrize(contour, params.window_len())?;

        let positions = match params.resampled_points {
            Some(count) if !params.evaluate_at_input_positions => {
                EvaluationPositions::Resampled(count)
            }
            _ => EvaluationPositions::Input,
        };
        let evaluation = evaluation_distances(&trace, params.pad, positions);

        debug!(
            points = contour.len(),
            retained = trace.len(),
            positions = evaluation.len(),
            "Evaluating polynomial curvature"
        );

        let mut result = estimate_polynomial(&trace, &evaluation, params)?;
        if let Some(max) = params.max_curvature {
            result.clamp_to(max);
        }
        Ok(result)
    }

    /// Estimate curvature for every contour in a batch.
    ///
    /// Results keep input order and each carries its input index. Contours
    /// that fail are reported in `failures` and do not affect the others.
    /// Runs in parallel when `params.parallel` is set.
    #[must_use]
    pub fn run_batch(&self, contours: &[Contour]) -> BatchCurvature {
        info!(
            contours = contours.len(),
            method = %self.params.method,
            parallel = self.params.parallel,
            "Starting curvature estimation"
        );

        let outcomes: Vec<CurvatureResult<ContourCurvature>> = if self.params.parallel {
            contours.par_iter().map(|c| self.run(c)).collect()
        } else {
            contours.iter().map(|c| self.run(c)).collect()
        };

        let mut batch = BatchCurvature {
            method: self.params.method,
            ..BatchCurvature::default()
        };

        for (contour_index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(mut result) => {
                    result.contour_index = contour_index;
                    batch.contours.push(result);
                }
                Err(error) => {
                    warn!(contour = contour_index, %error, "Skipping contour");
                    batch.failures.push(ContourFailure {
                        contour_index,
                        error,
                    });
                }
            }
        }

        info!(
            processed = batch.contours.len(),
            skipped = batch.failures.len(),
            samples = batch.sample_count(),
            "Curvature estimation complete"
        );

        batch
    }

    /// Segment an image into cells, trace each cell and estimate curvature.
    ///
    /// A mask the tracer returns no contour for is reported as a
    /// [`CurvatureError::DegenerateContour`] failure with zero points.
    #[must_use]
    pub fn run_cells<I, S, T>(&self, image: &I, segmenter: &S, tracer: &T) -> BatchCurvature
    where
        I: ?Sized,
        S: CellSegmenter<I> + ?Sized,
        T: ContourTracer + ?Sized,
    {
        let masks = segmenter.segment(image);
        debug!(cells = masks.len(), "Segmented image");

        let mut cell_indices = Vec::with_capacity(masks.len());
        let mut traced = Vec::with_capacity(masks.len());
        let mut untraced = Vec::new();
        for (index, mask) in masks.iter().enumerate() {
            match tracer.trace(mask) {
                Some(contour) => {
                    cell_indices.push(index);
                    traced.push(contour);
                }
                None => untraced.push(index),
            }
        }

        let mut batch = self.run_batch(&traced);

        for result in &mut batch.contours {
            result.contour_index = cell_indices[result.contour_index];
        }
        for failure in &mut batch.failures {
            failure.contour_index = cell_indices[failure.contour_index];
        }
        let required = match self.params.method {
            CurvatureMethod::Discrete => 2,
            CurvatureMethod::PolynomialFit => self.params.window_len(),
        };
        for contour_index in untraced {
            warn!(contour = contour_index, "No contour traced for cell");
            batch.failures.push(ContourFailure {
                contour_index,
                error: CurvatureError::degenerate(required, 0),
            });
        }
        batch.failures.sort_by_key(|f| f.contour_index);

        batch
    }
}

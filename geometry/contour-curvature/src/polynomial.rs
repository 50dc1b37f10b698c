//! Curvature from sliding-window polynomial fits against arc length.
//!
//! For every evaluation distance the estimator picks the window whose
//! center sample owns that distance, fits `x(s)` and `y(s)` over the
//! `2 * fit_half_width + 1` samples of the window, and evaluates curvature
//! analytically from the fitted derivatives.
//!
//! # Window ownership
//!
//! Sample `i` owns the half-open interval
//! `[(d[i-1] + d[i]) / 2, (d[i] + d[i+1]) / 2)`, so neighbouring windows
//! partition the evaluation range with no overlap and no gaps. Distances
//! owned by a sample too close to either end of the trace for a full window
//! (or inside the pad) go to the nearest valid window instead.

use tracing::debug;

use crate::arc_length::ArcLengthTrace;
use crate::discrete::curvature_from_derivatives;
use crate::error::{CurvatureError, CurvatureResult, NumericalInstability};
use crate::params::CurvatureParams;
use crate::polyfit::{PlanarFit, fit_planar, gaussian_weights};
use crate::result::{ContourCurvature, CurvatureSample, SampleParameter};

/// Where along the trace curvature is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationPositions {
    /// Evenly spaced arc lengths, endpoints included.
    Resampled(usize),
    /// The retained input arc lengths.
    Input,
}

/// Arc lengths to evaluate, excluding `pad` samples at each end.
///
/// Resampling spans `d[pad]..=d[n - pad - 1]`; input positions are
/// `d[pad..n - pad - 1]`. Both are empty when `n <= 2 * pad + 1`.
///
/// # Example
///
/// ```
/// use contour_curvature::{evaluation_distances, parametrize, Contour, EvaluationPositions};
///
/// let coords: Vec<[f64; 2]> = (0..8).map(|i| [f64::from(i), 0.0]).collect();
/// let trace = parametrize(&Contour::from_coords(&coords), 1).unwrap();
///
/// let resampled = evaluation_distances(&trace, 2, EvaluationPositions::Resampled(3));
/// assert_eq!(resampled, vec![2.0, 3.5, 5.0]);
///
/// let input = evaluation_distances(&trace, 2, EvaluationPositions::Input);
/// assert_eq!(input, vec![2.0, 3.0, 4.0]);
/// ```
#[must_use]
pub fn evaluation_distances(
    trace: &ArcLengthTrace,
    pad: usize,
    positions: EvaluationPositions,
) -> Vec<f64> {
    let d = trace.distances();
    let n = d.len();
    if n <= 2 * pad + 1 {
        return Vec::new();
    }

    let last = n - pad - 1;
    match positions {
        EvaluationPositions::Resampled(count) => linspace(d[pad], d[last], count),
        EvaluationPositions::Input => d[pad..last].to_vec(),
    }
}

/// `count` evenly spaced values from `start` to `end` inclusive.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|k| start + k as f64 * step).collect();
            values[count - 1] = end;
            values
        }
    }
}

/// Estimate curvature at each evaluation distance by local polynomial fits.
///
/// `evaluation` must be sorted ascending. Uses `order`, `fit_half_width`,
/// `pad`, `weighted` and `epsilon` from `params`. Output samples carry the
/// fitted position and are in the same order as `evaluation`.
///
/// # Errors
///
/// Returns [`CurvatureError::UnderdeterminedFit`] if `order` is not below the
/// window length and [`CurvatureError::DegenerateContour`] if the trace is
/// shorter than one window.
///
/// # Example
///
/// ```
/// use contour_curvature::{
///     estimate_polynomial, evaluation_distances, parametrize, Contour, CurvatureParams,
///     EvaluationPositions,
/// };
///
/// let coords: Vec<[f64; 2]> = (0..200)
///     .map(|i| {
///         let t = std::f64::consts::TAU * f64::from(i) / 200.0;
///         [5.0 * t.cos(), 5.0 * t.sin()]
///     })
///     .collect();
/// let params = CurvatureParams::polynomial_at_input_positions();
/// let trace = parametrize(&Contour::from_coords(&coords), params.window_len()).unwrap();
/// let distances = evaluation_distances(&trace, params.pad, EvaluationPositions::Input);
///
/// let result = estimate_polynomial(&trace, &distances, &params).unwrap();
/// assert!(result.samples.iter().all(|s| (s.curvature - 0.2).abs() < 1e-3));
/// ```
pub fn estimate_polynomial(
    trace: &ArcLengthTrace,
    evaluation: &[f64],
    params: &CurvatureParams,
) -> CurvatureResult<ContourCurvature> {
    let window = params.window_len();
    if params.order >= window {
        return Err(CurvatureError::underdetermined(params.order, window));
    }
    let n = trace.len();
    if n < window {
        return Err(CurvatureError::degenerate(window, n));
    }

    let mut result = ContourCurvature {
        contour_index: 0,
        samples: Vec::with_capacity(evaluation.len()),
        instabilities: Vec::new(),
        rank_deficient_fits: 0,
    };

    let half = params.fit_half_width;
    let first_center = params.pad.max(half);
    let last_center = (n - 1 - half).min(n.saturating_sub(params.pad + 1));
    if evaluation.is_empty() || first_center > last_center {
        debug!(retained = n, pad = params.pad, "No positions to evaluate");
        return Ok(result);
    }

    let d = trace.distances();
    let midpoints: Vec<f64> = d.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect();

    let mut current: Option<(usize, PlanarFit)> = None;
    let mut windows_fitted = 0_usize;

    for &s in evaluation {
        let owner = midpoints.partition_point(|&m| m <= s);
        let center = owner.clamp(first_center, last_center);

        let fit = match current.take() {
            Some((c, fit)) if c == center => fit,
            _ => {
                windows_fitted += 1;
                let fit = fit_window(trace, center, params)?;
                if fit.is_rank_deficient() {
                    result.rank_deficient_fits += 1;
                }
                fit
            }
        };

        let dx = fit.x.first_derivative(s);
        let dy = fit.y.first_derivative(s);
        let ddx = fit.x.second_derivative(s);
        let ddy = fit.y.second_derivative(s);
        let parameter = SampleParameter::ArcLength(s);

        let curvature = curvature_from_derivatives(dx, dy, ddx, ddy, params.epsilon)
            .unwrap_or_else(|| {
                result.instabilities.push(NumericalInstability {
                    parameter,
                    speed_squared: dx * dx + dy * dy,
                });
                0.0
            });

        result.samples.push(CurvatureSample {
            position: fit.position(s),
            curvature,
            parameter,
        });
        current = Some((center, fit));
    }

    debug!(
        retained = n,
        evaluated = result.samples.len(),
        windows = windows_fitted,
        rank_deficient = result.rank_deficient_fits,
        unstable = result.instabilities.len(),
        "Polynomial curvature estimated"
    );

    Ok(result)
}

/// Fit the window of `2 * fit_half_width + 1` samples centered on `center`.
fn fit_window(
    trace: &ArcLengthTrace,
    center: usize,
    params: &CurvatureParams,
) -> CurvatureResult<PlanarFit> {
    let range = center - params.fit_half_width..=center + params.fit_half_width;
    let distances = &trace.distances()[range.clone()];
    let points = &trace.points()[range];
    let mean = trace.distances()[center];

    match params.weighted {
        Some(width_factor) => {
            let weights = gaussian_weights(distances, mean, width_factor);
            fit_planar(distances, points, params.order, mean, Some(&weights))
        }
        None => fit_planar(distances, points, params.order, mean, None),
    }
}

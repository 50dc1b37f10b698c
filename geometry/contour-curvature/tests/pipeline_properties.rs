//! End-to-end behaviour of the curvature pipeline.
//!
//! Organized by concern:
//!
//! - Geometry: circles and straight lines
//! - Evaluation positions: resampling counts, ordering and padding
//! - Errors: configuration, underdetermined fits, batch isolation
//! - Determinism

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::cast_precision_loss)]

use std::f64::consts::TAU;

use approx::assert_relative_eq;
use contour_curvature::{
    Contour, CurvatureError, CurvatureMethod, CurvatureParams, CurvaturePipeline, Point2,
    SampleParameter, parametrize,
};

fn circle(radius: f64, n: usize) -> Contour {
    (0..n)
        .map(|i| {
            let theta = TAU * i as f64 / n as f64;
            Point2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

fn line(n: usize) -> Contour {
    (0..n)
        .map(|i| Point2::new(3.0 + 0.8 * i as f64, -1.0 + 0.6 * i as f64))
        .collect()
}

fn pipeline(params: CurvatureParams) -> CurvaturePipeline {
    CurvaturePipeline::new(params).expect("valid params")
}

// =============================================================================
// Geometry
// =============================================================================

mod geometry {
    use super::*;

    #[test]
    fn unit_circle_polynomial_fit() {
        let params = CurvatureParams::polynomial_fit(150).order(3).fit_half_width(5);
        let result = pipeline(params).run(&circle(1.0, 200)).unwrap();

        assert_eq!(result.len(), 150);
        for sample in &result.samples {
            assert_relative_eq!(sample.curvature, 1.0, epsilon = 0.05);
        }
    }

    #[test]
    fn unit_circle_at_input_positions() {
        let params = CurvatureParams::polynomial_at_input_positions();
        let result = pipeline(params).run(&circle(1.0, 200)).unwrap();

        // d[pad..n - pad - 1]
        assert_eq!(result.len(), 200 - 2 * 10 - 1);
        for sample in &result.samples {
            assert_relative_eq!(sample.curvature, 1.0, epsilon = 0.05);
        }
    }

    #[test]
    fn pixel_scale_circle_matches_inverse_radius() {
        let radius = 25.0;
        let params = CurvatureParams::polynomial_fit(80).weighted(2.0);
        let result = pipeline(params).run(&circle(radius, 160)).unwrap();
        for sample in &result.samples {
            assert_relative_eq!(sample.curvature, 1.0 / radius, epsilon = 1e-3);
        }
    }

    #[test]
    fn narrow_gaussian_weights_still_estimate() {
        let contour = circle(20.0, 400);
        for width_factor in [10.0, 20.0, 40.0] {
            let params = CurvatureParams::polynomial_fit(50).weighted(width_factor);
            let result = pipeline(params).run(&contour).unwrap();
            assert_eq!(result.len(), 50);
            for sample in &result.samples {
                assert_relative_eq!(sample.curvature, 0.05, epsilon = 2e-3);
            }
        }

        // Only the center sample carries weight: the fit degenerates to a
        // constant, which is reported per sample rather than as an error.
        let params = CurvatureParams::polynomial_fit(50).weighted(100.0);
        let result = pipeline(params).run(&contour).unwrap();
        assert_eq!(result.len(), 50);
        assert!(result.rank_deficient_fits > 0);
    }

    #[test]
    fn straight_line_is_flat_for_both_methods() {
        let contour = line(60);

        let discrete = pipeline(CurvatureParams::discrete()).run(&contour).unwrap();
        assert_eq!(discrete.len(), 60);
        assert!(discrete.samples.iter().all(|s| s.curvature < 1e-9));

        let poly = pipeline(CurvatureParams::polynomial_fit(30)).run(&contour).unwrap();
        assert_eq!(poly.len(), 30);
        assert!(poly.samples.iter().all(|s| s.curvature < 1e-6));
    }

    #[test]
    fn discrete_clamps_at_one() {
        // Radius 0.25 has curvature 4.
        let result = pipeline(CurvatureParams::discrete()).run(&circle(0.25, 40)).unwrap();
        for sample in &result.samples[2..38] {
            assert_eq!(sample.curvature, 1.0);
        }

        // Values already below the cap pass through.
        let result = pipeline(CurvatureParams::discrete()).run(&circle(4.0, 40)).unwrap();
        for sample in &result.samples[2..38] {
            assert_relative_eq!(sample.curvature, 0.25, epsilon = 1e-9);
        }
    }

    #[test]
    fn polynomial_positions_are_fitted() {
        let params = CurvatureParams::polynomial_fit(37);
        let result = pipeline(params).run(&circle(12.0, 150)).unwrap();
        for sample in &result.samples {
            assert_relative_eq!(sample.position.coords.norm(), 12.0, epsilon = 1e-2);
            let pixel = sample.pixel();
            assert_eq!(pixel.col, sample.position.x.round() as i64);
            assert_eq!(pixel.row, sample.position.y.round() as i64);
        }
    }
}

// =============================================================================
// Evaluation positions
// =============================================================================

mod evaluation {
    use super::*;

    #[test]
    fn resampling_returns_exact_count_in_increasing_order() {
        for n in [1, 2, 17, 64, 500] {
            let params = CurvatureParams::polynomial_fit(n);
            let result = pipeline(params).run(&circle(6.0, 120)).unwrap();
            assert_eq!(result.len(), n);

            let arc: Vec<f64> = result
                .samples
                .iter()
                .map(|s| match s.parameter {
                    SampleParameter::ArcLength(d) => d,
                    SampleParameter::Index(_) => panic!("expected arc length"),
                })
                .collect();
            assert!(arc.windows(2).all(|w| w[1] > w[0]));
        }
    }

    #[test]
    fn pad_covering_whole_contour_is_empty_not_error() {
        let contour = line(21);
        for params in [
            CurvatureParams::polynomial_fit(40).pad(10),
            CurvatureParams::polynomial_at_input_positions().pad(10),
        ] {
            let result = pipeline(params).run(&contour).unwrap();
            assert!(result.is_empty());
            assert!(!result.has_instabilities());
        }
    }

    #[test]
    fn evaluation_stays_inside_padded_range() {
        let contour = circle(5.0, 90);
        let trace = parametrize(&contour, 11).unwrap();
        let d = trace.distances();

        let result = pipeline(CurvatureParams::polynomial_fit(25).pad(7)).run(&contour).unwrap();
        let first = result.samples.first().unwrap().parameter.value();
        let last = result.samples.last().unwrap().parameter.value();
        assert_relative_eq!(first, d[7], epsilon = 1e-9);
        assert_relative_eq!(last, d[90 - 7 - 1], epsilon = 1e-9);
    }

    #[test]
    fn duplicate_points_do_not_disturb_the_estimate() {
        let contour: Contour = circle(2.0, 100)
            .into_points()
            .into_iter()
            .flat_map(|p| [p, p])
            .collect();

        let result = pipeline(CurvatureParams::polynomial_fit(40)).run(&contour).unwrap();
        assert_eq!(result.len(), 40);
        for sample in &result.samples {
            assert_relative_eq!(sample.curvature, 0.5, epsilon = 0.01);
        }
        assert!(!result.has_instabilities());
    }
}

// =============================================================================
// Errors
// =============================================================================

mod errors {
    use super::*;

    #[test]
    fn underdetermined_order_is_rejected() {
        let params = CurvatureParams::polynomial_fit(10).order(5).fit_half_width(2);
        let err = CurvaturePipeline::new(params).unwrap_err();
        assert_eq!(err, CurvatureError::underdetermined(5, 5));
    }

    #[test]
    fn incompatible_options_are_rejected_up_front() {
        let params = CurvatureParams {
            method: CurvatureMethod::PolynomialFit,
            evaluate_at_input_positions: true,
            resampled_points: Some(100),
            ..CurvatureParams::default()
        };
        assert!(CurvaturePipeline::new(params).unwrap_err().is_invalid_configuration());
    }

    #[test]
    fn degenerate_contour_after_dedup() {
        let contour = Contour::from_coords(&[[1.0, 1.0]; 40]);
        let err = pipeline(CurvatureParams::polynomial_fit(10)).run(&contour).unwrap_err();
        assert_eq!(err, CurvatureError::degenerate(11, 1));
    }

    #[test]
    fn batch_failures_do_not_abort_other_contours() {
        let contours = vec![
            circle(3.0, 100),
            Contour::from_coords(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]),
            circle(6.0, 100),
            Contour::default(),
        ];
        let batch = pipeline(CurvatureParams::polynomial_fit(20)).run_batch(&contours);

        let processed: Vec<usize> = batch.contours.iter().map(|c| c.contour_index).collect();
        assert_eq!(processed, vec![0, 2]);
        let failed: Vec<usize> = batch.failures.iter().map(|f| f.contour_index).collect();
        assert_eq!(failed, vec![1, 3]);
        assert!(batch.failures.iter().all(|f| f.error.is_degenerate()));

        assert_eq!(batch.sample_count(), 40);
        let stats = batch.statistics().unwrap();
        assert_relative_eq!(stats.min, 1.0 / 6.0, epsilon = 1e-3);
        assert_relative_eq!(stats.max, 1.0 / 3.0, epsilon = 1e-3);
    }
}

// =============================================================================
// Determinism
// =============================================================================

mod determinism {
    use super::*;

    #[test]
    fn identical_runs_are_bit_identical() {
        let contours: Vec<Contour> = (2..8).map(|r| circle(f64::from(r), 75)).collect();
        for params in [
            CurvatureParams::discrete(),
            CurvatureParams::polynomial_fit(33).weighted(1.5),
            CurvatureParams::polynomial_at_input_positions().parallel(true),
        ] {
            let p = pipeline(params);
            let first = p.run_batch(&contours);
            let second = p.run_batch(&contours);
            assert_eq!(first.contours, second.contours);
        }
    }
}

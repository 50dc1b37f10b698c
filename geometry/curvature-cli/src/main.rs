//! Contour curvature command-line driver.
//!
//! Reads pre-traced cell contours from JSON, estimates curvature along each
//! one and prints summary statistics with a histogram.
//!
//! # Input
//!
//! A JSON array of contours, each an array of `[x, y]` pairs in pixel
//! coordinates:
//!
//! ```json
//! [[[10.0, 4.0], [11.0, 4.0], [12.0, 5.0]], [[40.0, 40.0], [41.0, 41.0]]]
//! ```
//!
//! # Examples
//!
//! - `contour-curvature --input cells.json` - discrete method
//! - `contour-curvature --input cells.json --method poly --points 200 --weighted 2`
//! - `contour-curvature --input cells.json --method poly --at-input-positions --output samples.json`

mod logging;
mod report;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use contour_curvature::{
    Contour, CurvatureParams, CurvaturePipeline, DEFAULT_HISTOGRAM_BINS,
};
use tracing::info;

/// Resampled positions per contour when `--points` is not given.
const DEFAULT_POINTS: usize = 200;

/// Estimate curvature along traced cell contours
#[derive(Parser)]
#[command(name = "contour-curvature")]
#[command(about = "Estimate curvature along traced cell contours", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file with an array of contours, each an array of [x, y] pairs
    #[arg(long)]
    input: PathBuf,

    /// Estimation method
    #[arg(long, value_enum, default_value_t = Method::Discrete)]
    method: Method,

    /// Polynomial order of the local fit
    #[arg(long)]
    order: Option<usize>,

    /// Samples on each side of the window center
    #[arg(long)]
    fit_half_width: Option<usize>,

    /// Samples excluded from evaluation at each end of a contour
    #[arg(long)]
    pad: Option<usize>,

    /// Gaussian-weight the fit; sigma is the window span divided by this value
    #[arg(long, value_name = "W")]
    weighted: Option<f64>,

    /// Evaluate at the input points instead of resampling
    #[arg(long)]
    at_input_positions: bool,

    /// Evenly spaced positions per contour
    #[arg(long, value_name = "N")]
    points: Option<usize>,

    /// Clamp polynomial curvature to this value
    #[arg(long, value_name = "C")]
    max_curvature: Option<f64>,

    /// Process contours in parallel
    #[arg(long)]
    parallel: bool,

    /// Histogram bins
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    bins: usize,

    /// Write per-contour samples as JSON
    #[arg(long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Finite differences against point index, capped at 1.0
    Discrete,
    /// Sliding-window polynomial fits against arc length
    Poly,
}

impl Cli {
    fn params(&self) -> CurvatureParams {
        let mut params = match self.method {
            Method::Discrete => CurvatureParams::discrete(),
            Method::Poly if self.at_input_positions && self.points.is_none() => {
                CurvatureParams::polynomial_at_input_positions()
            }
            Method::Poly => CurvatureParams::polynomial_fit(self.points.unwrap_or(DEFAULT_POINTS)),
        };

        // Pass conflicting flags through so validation reports them.
        if self.at_input_positions {
            params = params.evaluate_at_input_positions(true);
        }
        if let (Method::Discrete, Some(points)) = (self.method, self.points) {
            params = params.resampled_points(points);
        }
        if let Some(order) = self.order {
            params = params.order(order);
        }
        if let Some(half_width) = self.fit_half_width {
            params = params.fit_half_width(half_width);
        }
        if let Some(pad) = self.pad {
            params = params.pad(pad);
        }
        if let Some(width_factor) = self.weighted {
            params = params.weighted(width_factor);
        }
        if let Some(max) = self.max_curvature {
            params = params.max_curvature(max);
        }
        params.parallel(self.parallel)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let pipeline =
        CurvaturePipeline::new(cli.params()).context("Invalid curvature parameters")?;
    let contours = load_contours(&cli.input)?;
    info!(path = %cli.input.display(), contours = contours.len(), "Loaded contours");

    let batch = pipeline.run_batch(&contours);
    report::print(&batch, cli.bins);

    if let Some(path) = &cli.output {
        let json =
            serde_json::to_string_pretty(&batch.contours).context("Failed to serialize samples")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write samples to {}", path.display()))?;
        info!(path = %path.display(), samples = batch.sample_count(), "Wrote samples");
    }

    Ok(())
}

fn load_contours(path: &Path) -> Result<Vec<Contour>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_contours(&text).with_context(|| format!("Failed to parse contours in {}", path.display()))
}

fn parse_contours(text: &str) -> Result<Vec<Contour>> {
    let raw: Vec<Vec<[f64; 2]>> = serde_json::from_str(text)?;
    Ok(raw.iter().map(|coords| Contour::from_coords(coords)).collect())
}

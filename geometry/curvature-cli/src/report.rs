//! Terminal summary of a curvature batch.

use contour_curvature::{BatchCurvature, CurvatureHistogram};
use owo_colors::OwoColorize;

/// Print batch totals, statistics, histogram and skipped contours.
pub fn print(batch: &BatchCurvature, bins: usize) {
    println!();
    print!("{batch}");
    println!();

    let values = batch.curvature_values();
    match batch.statistics() {
        Some(stats) => {
            print!("{stats}");
            println!();
        }
        None => println!("{}", "No curvature samples.".yellow()),
    }

    if let Some(histogram) = CurvatureHistogram::new(&values, bins) {
        println!("{}", "Histogram".bold());
        print!("{histogram}");
        println!();
    }

    if batch.has_failures() {
        println!("{}", format!("Skipped {} contour(s):", batch.failures.len()).yellow());
        for failure in &batch.failures {
            println!("  {} {failure}", "✗".red());
        }
    } else {
        println!("{}", "✓ All contours processed".green());
    }
}

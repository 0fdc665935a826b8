//! Per-parameter marginal histograms with credible intervals.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::domain::{Chain, ParamSelection};
use crate::error::AppError;
use crate::plot::display_label;
use crate::stats::{credible_interval, histogram};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

const HIST_COLOR: RGBColor = RGBColor(135, 206, 235); // skyblue
const CI68_COLOR: RGBColor = RGBColor(255, 165, 0); // orange
const CI95_COLOR: RGBColor = RED;

/// Sanitize a display label into a filename stem.
///
/// Leading/trailing `$` are stripped, backslashes removed, and remaining
/// path-hostile characters replaced so labels with spaces or slashes still
/// produce usable filenames.
pub fn sanitize_label(label: &str) -> String {
    label
        .trim_matches('$')
        .chars()
        .filter(|c| *c != '\\')
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '{' | '}') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Output filenames for every selected parameter, in selection order.
///
/// Two labels that sanitize identically (e.g. `EFAC` and `$EFAC$`) must not
/// overwrite each other, so collisions get the chain column appended.
pub fn marginal_filenames(selection: &ParamSelection) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(selection.len());
    for (label, column) in selection.iter() {
        let stem = sanitize_label(label);
        let name = if seen.insert(stem.clone()) {
            format!("{stem}_posterior.png")
        } else {
            format!("{stem}_c{column}_posterior.png")
        };
        names.push(name);
    }
    names
}

/// Render one credible-interval histogram per selected parameter.
///
/// Creates `outdir` if absent and returns the written paths in selection
/// order. Existing files at the same paths are overwritten.
pub fn render_marginals(
    chain: &Chain,
    selection: &ParamSelection,
    outdir: &Path,
    bins: usize,
) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(outdir).map_err(|e| {
        AppError::input(format!(
            "Failed to create output directory '{}': {e}",
            outdir.display()
        ))
    })?;

    let filenames = marginal_filenames(selection);
    let mut written = Vec::with_capacity(selection.len());

    for ((label, column), filename) in selection.iter().zip(filenames) {
        let path = outdir.join(filename);
        let samples = chain.parameter(column)?;
        draw_marginal(&samples, label, &path, bins).map_err(|e| {
            AppError::render(format!(
                "Failed to render marginal for '{label}' to '{}': {e}",
                path.display()
            ))
        })?;
        written.push(path);
    }

    Ok(written)
}

fn draw_marginal(
    samples: &[f64],
    label: &str,
    path: &Path,
    bins: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let ci68 = credible_interval(samples, 0.68)?;
    let ci95 = credible_interval(samples, 0.95)?;
    let hist = histogram(samples, bins)?;

    let x_min = hist.edges[0];
    let x_max = hist.edges[hist.edges.len() - 1];
    let y_max = hist.max_density() * 1.15;

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(display_label(label))
        .y_desc("Posterior density")
        .label_style(("sans-serif", 14))
        .draw()?;

    // Histogram bars first, shaded interval bands over them, median on top.
    chart.draw_series(hist.density.iter().enumerate().map(|(i, &d)| {
        Rectangle::new(
            [(hist.edges[i], 0.0), (hist.edges[i + 1], d)],
            HIST_COLOR.mix(0.7).filled(),
        )
    }))?;

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(ci95.lower, 0.0), (ci95.upper, y_max)],
            CI95_COLOR.mix(0.15).filled(),
        )))?
        .label("95% CI")
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 16, y + 5)], CI95_COLOR.mix(0.3).filled())
        });

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(ci68.lower, 0.0), (ci68.upper, y_max)],
            CI68_COLOR.mix(0.3).filled(),
        )))?
        .label("68% CI")
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 16, y + 5)], CI68_COLOR.mix(0.5).filled())
        });

    chart
        .draw_series(LineSeries::new(
            [(ci68.median, 0.0), (ci68.median, y_max)],
            BLACK.stroke_width(2),
        ))?
        .label(format!("Median = {:.2}", ci68.median))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLACK.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 13))
        .draw()?;

    root.present()?;
    Ok(())
}

//! Joint posterior corner plot.
//!
//! K selected parameters produce a K×K panel grid:
//!
//! - diagonal: 1-D marginal histograms, captioned `label = median +u/-l`
//! - lower triangle: filled 2-D highest-density regions at the 68% and 95%
//!   credible levels (no raw scatter)
//! - upper triangle: blank
//!
//! The whole figure carries one suptitle naming the pulsar.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::FontStyle;

use crate::domain::{Chain, ParamSelection};
use crate::error::AppError;
use crate::plot::display_label;
use crate::stats::{credible_interval, hdr_thresholds, histogram, histogram2d};

/// Pixel side length of one panel.
const PANEL_SIDE: u32 = 320;
/// Height reserved for the suptitle.
const TITLE_BAND: u32 = 50;
/// Bins per axis for the 2-D density panels.
const DENSITY_BINS: usize = 40;
/// Bins for the diagonal histograms.
const DIAGONAL_BINS: usize = 40;

const FILL_COLOR: RGBColor = RGBColor(0, 100, 0); // darkgreen

/// Render the corner plot to a single PNG at `out`.
pub fn render_corner(
    chain: &Chain,
    selection: &ParamSelection,
    pulsar: &str,
    out: &Path,
) -> Result<(), AppError> {
    selection.validate_against(chain)?;
    draw_corner(chain, selection, pulsar, out).map_err(|e| {
        AppError::render(format!(
            "Failed to render corner plot to '{}': {e}",
            out.display()
        ))
    })
}

fn draw_corner(
    chain: &Chain,
    selection: &ParamSelection,
    pulsar: &str,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let k = selection.len() as u32;
    let side = PANEL_SIDE * k;
    let root = BitMapBackend::new(out, (side, side + TITLE_BAND)).into_drawing_area();
    root.fill(&WHITE)?;

    let grid = root
        .titled(
            &format!("Posterior for {pulsar}"),
            ("sans-serif", 28).into_font().style(FontStyle::Bold),
        )?
        .split_evenly((k as usize, k as usize));

    let params: Vec<(String, Vec<f64>)> = selection
        .iter()
        .map(|(label, column)| Ok((label.to_string(), chain.parameter(column)?)))
        .collect::<Result<_, AppError>>()?;

    for (row, (row_label, row_samples)) in params.iter().enumerate() {
        for (col, (col_label, col_samples)) in params.iter().enumerate() {
            let area = &grid[row * params.len() + col];
            if col > row {
                continue;
            }
            let bottom = row == params.len() - 1;
            if col == row {
                draw_diagonal(area, row_label, row_samples, bottom)?;
            } else {
                draw_density(
                    area,
                    col_label,
                    col_samples,
                    row_label,
                    row_samples,
                    bottom,
                    col == 0,
                )?;
            }
        }
    }

    root.present()?;
    Ok(())
}

/// Diagonal panel: marginal histogram with a `median +u/-l` caption.
fn draw_diagonal(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    label: &str,
    samples: &[f64],
    bottom: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ci = credible_interval(samples, 0.68)?;
    let hist = histogram(samples, DIAGONAL_BINS)?;
    let x_min = hist.edges[0];
    let x_max = hist.edges[hist.edges.len() - 1];
    let y_max = hist.max_density() * 1.1;

    let caption = format!(
        "{} = {:.2} +{:.2}/-{:.2}",
        display_label(label),
        ci.median,
        ci.plus(),
        ci.minus()
    );

    let mut chart = ChartBuilder::on(area)
        .margin(6)
        .caption(caption, ("sans-serif", 13).into_font().style(FontStyle::Bold))
        .x_label_area_size(if bottom { 28 } else { 0 })
        .y_label_area_size(8)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh().disable_y_mesh().disable_y_axis();
    if bottom {
        mesh.x_desc(display_label(label))
            .x_labels(4)
            .label_style(("sans-serif", 11));
    } else {
        mesh.disable_x_axis();
    }
    mesh.draw()?;

    chart.draw_series(hist.density.iter().enumerate().map(|(i, &d)| {
        Rectangle::new(
            [(hist.edges[i], 0.0), (hist.edges[i + 1], d)],
            FILL_COLOR.mix(0.6).filled(),
        )
    }))?;

    Ok(())
}

/// Off-diagonal panel: filled highest-density regions at 68% / 95%.
fn draw_density(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    x_label: &str,
    x_samples: &[f64],
    y_label: &str,
    y_samples: &[f64],
    bottom: bool,
    left: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let hist = histogram2d(x_samples, y_samples, DENSITY_BINS)?;
    // Threshold order matters: the 95% region is the looser (lower) cut.
    let thresholds = hdr_thresholds(&hist.counts, &[0.68, 0.95]);
    let (t68, t95) = (thresholds[0], thresholds[1]);

    let x_min = hist.x_edges[0];
    let x_max = hist.x_edges[hist.x_edges.len() - 1];
    let y_min = hist.y_edges[0];
    let y_max = hist.y_edges[hist.y_edges.len() - 1];

    let mut chart = ChartBuilder::on(area)
        .margin(6)
        .x_label_area_size(if bottom { 28 } else { 0 })
        .y_label_area_size(if left { 40 } else { 8 })
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh().disable_y_mesh();
    if bottom {
        mesh.x_desc(display_label(x_label))
            .x_labels(4)
            .label_style(("sans-serif", 11));
    } else {
        mesh.disable_x_axis();
    }
    if left {
        mesh.y_desc(display_label(y_label)).y_labels(4);
    } else {
        mesh.disable_y_axis();
    }
    mesh.draw()?;

    // Wider (95%) region first, 68% core over it in a darker shade.
    for (threshold, shade) in [(t95, 0.25), (t68, 0.65)] {
        if threshold == 0 {
            continue;
        }
        chart.draw_series(hist.counts.iter().enumerate().filter_map(|(idx, &c)| {
            if c < threshold {
                return None;
            }
            let ix = idx % hist.bins;
            let iy = idx / hist.bins;
            Some(Rectangle::new(
                [
                    (hist.x_edges[ix], hist.y_edges[iy]),
                    (hist.x_edges[ix + 1], hist.y_edges[iy + 1]),
                ],
                FILL_COLOR.mix(shade).filled(),
            ))
        }))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn renders_a_corner_png() {
        // Two weakly correlated parameters, deterministic pseudo-noise.
        let data: Vec<f64> = (0..400)
            .flat_map(|i| {
                let t = i as f64;
                let a = (t * 0.7).sin();
                let b = (t * 1.3).cos();
                [2.5 + a, -14.0 + 0.4 * a + 0.2 * b]
            })
            .collect();
        let chain = Chain::new(DMatrix::from_row_slice(400, 2, &data));
        let selection = ParamSelection::new(vec![
            (r"$\gamma_\mathrm{red}$".to_string(), 0),
            (r"$\log_{10}A_\mathrm{red}$".to_string(), 1),
        ]);

        let out = std::env::temp_dir().join("ptapost-test-corner.png");
        render_corner(&chain, &selection, "PSR J1910-0309", &out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn out_of_range_selection_fails_before_rendering() {
        let chain = Chain::new(DMatrix::from_element(10, 2, 1.0));
        let selection = ParamSelection::new(vec![("EFAC".to_string(), 7)]);
        let out = std::env::temp_dir().join("ptapost-test-corner-bad.png");
        let err = render_corner(&chain, &selection, "PSR J0000+0000", &out).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}

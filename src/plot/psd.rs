//! Log-log PSD comparison figure.
//!
//! Overlays four series on one log-log axis pair:
//!
//! - the raw periodogram from tempo2 (`comp.dat`)
//! - tempo2's fitted spectral model (`cholSpec.dat`)
//! - the shaded 5-95% posterior band
//! - the posterior median power law
//!
//! All series share the tempo2 frequency grid (already in cycles/year), so
//! no interpolation happens here.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{PsdBand, Spectrum};
use crate::error::AppError;

const WIDTH: u32 = 840;
const HEIGHT: u32 = 600;

const RAW_COLOR: RGBColor = RGBColor(31, 119, 180); // matplotlib C0
const MODEL_COLOR: RGBColor = RGBColor(255, 127, 14); // matplotlib C1
const BAYES_COLOR: RGBColor = RGBColor(0, 128, 0); // green

/// Render the comparison plot to a PNG at `out`.
pub fn render_psd_comparison(
    raw: &Spectrum,
    model: &Spectrum,
    band: &PsdBand,
    out: &Path,
) -> Result<(), AppError> {
    // Degenerate data is diagnosed before the backend is touched so the
    // caller sees a data error, not a rendering failure.
    let bounds = log_bounds(raw, model, band)?;
    draw_psd(raw, model, band, bounds, out).map_err(|e| {
        AppError::render(format!(
            "Failed to render PSD comparison to '{}': {e}",
            out.display()
        ))
    })
}

fn draw_psd(
    raw: &Spectrum,
    model: &Spectrum,
    band: &PsdBand,
    bounds: (std::ops::Range<f64>, std::ops::Range<f64>),
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x_range, y_range) = bounds;

    let root = BitMapBackend::new(out, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(12)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Frequency [1/yr]")
        .y_desc("PSD")
        .label_style(("sans-serif", 14))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            positive_pairs(&raw.freq, &raw.power),
            RAW_COLOR.mix(0.6),
        ))?
        .label("Raw PSD (comp.dat)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RAW_COLOR.mix(0.6)));

    chart
        .draw_series(LineSeries::new(
            positive_pairs(&model.freq, &model.power),
            MODEL_COLOR.stroke_width(2),
        ))?
        .label("Tempo2 model (cholSpec.dat)")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], MODEL_COLOR.stroke_width(2))
        });

    // Band polygon: upper envelope forward, lower envelope back.
    let mut envelope: Vec<(f64, f64)> = positive_pairs(&band.freq, &band.upper).collect();
    let mut lower: Vec<(f64, f64)> = positive_pairs(&band.freq, &band.lower).collect();
    lower.reverse();
    envelope.extend(lower);
    chart
        .draw_series(std::iter::once(Polygon::new(
            envelope,
            BAYES_COLOR.mix(0.5).filled(),
        )))?
        .label("Bayes posterior 90%")
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 20, y + 5)], BAYES_COLOR.mix(0.5).filled())
        });

    chart
        .draw_series(LineSeries::new(
            positive_pairs(&band.freq, &band.median),
            BAYES_COLOR.stroke_width(2),
        ))?
        .label("Bayes median (power-law)")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], BAYES_COLOR.stroke_width(2))
        });

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 13))
        .draw()?;

    root.present()?;
    Ok(())
}

/// (freq, value) pairs with both members positive, as log axes require.
fn positive_pairs<'a>(
    freq: &'a [f64],
    values: &'a [f64],
) -> impl Iterator<Item = (f64, f64)> + 'a {
    freq.iter()
        .zip(values)
        .map(|(&f, &v)| (f, v))
        .filter(|&(f, v)| f > 0.0 && v > 0.0 && f.is_finite() && v.is_finite())
}

/// Shared log-log axis bounds over every plotted series, with padding.
fn log_bounds(
    raw: &Spectrum,
    model: &Spectrum,
    band: &PsdBand,
) -> Result<(std::ops::Range<f64>, std::ops::Range<f64>), AppError> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    let series: [(&[f64], &[f64]); 4] = [
        (&raw.freq, &raw.power),
        (&model.freq, &model.power),
        (&band.freq, &band.lower),
        (&band.freq, &band.upper),
    ];
    for (freq, values) in series {
        for (f, v) in positive_pairs(freq, values) {
            x_min = x_min.min(f);
            x_max = x_max.max(f);
            y_min = y_min.min(v);
            y_max = y_max.max(v);
        }
    }

    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return Err(AppError::data(
            "No positive (frequency, power) points to plot on log-log axes.",
        ));
    }

    Ok((x_min * 0.8..x_max * 1.25, y_min * 0.5..y_max * 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_inputs() -> (Spectrum, Spectrum, PsdBand) {
        let freq: Vec<f64> = (1..=20).map(|i| 0.1 * i as f64).collect();
        let power: Vec<f64> = freq.iter().map(|f| 1e-12 * f.powf(-3.0)).collect();
        let raw = Spectrum {
            freq: freq.clone(),
            power: power.iter().map(|p| p * 1.4).collect(),
        };
        let model = Spectrum {
            freq: freq.clone(),
            power: power.clone(),
        };
        let band = PsdBand {
            freq: freq.clone(),
            lower: power.iter().map(|p| p * 0.5).collect(),
            median: power.clone(),
            upper: power.iter().map(|p| p * 2.0).collect(),
        };
        (raw, model, band)
    }

    #[test]
    fn renders_a_comparison_png() {
        let (raw, model, band) = toy_inputs();
        let out = std::env::temp_dir().join("ptapost-test-psd.png");
        render_psd_comparison(&raw, &model, &band, &out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn all_nonpositive_data_is_a_data_error() {
        let empty = Spectrum {
            freq: vec![1.0],
            power: vec![-1.0],
        };
        let band = PsdBand {
            freq: vec![1.0],
            lower: vec![0.0],
            median: vec![0.0],
            upper: vec![0.0],
        };
        let out = std::env::temp_dir().join("ptapost-test-psd-bad.png");
        let err = render_psd_comparison(&empty, &empty.clone(), &band, &out).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}

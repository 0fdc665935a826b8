//! Percentiles, credible intervals, and histogram binning.
//!
//! Small pure functions kept free of plotting concerns so they are easy to
//! test in isolation. The percentile convention matches numpy's default
//! (linear interpolation between closest ranks), because the credible
//! intervals printed by this tool are expected to agree with values users
//! have previously computed with `np.percentile` on the same chains.

use crate::error::AppError;

/// A posterior interval around the median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibleInterval {
    pub lower: f64,
    pub median: f64,
    pub upper: f64,
}

impl CredibleInterval {
    /// Offset of the upper bound above the median.
    pub fn plus(&self) -> f64 {
        self.upper - self.median
    }

    /// Offset of the lower bound below the median.
    pub fn minus(&self) -> f64 {
        self.median - self.lower
    }
}

/// Linear-interpolated percentile (numpy convention).
///
/// `rank = q/100 * (n - 1)`, interpolating between the two nearest order
/// statistics. NaN samples are not rejected; they sort last and will
/// contaminate high percentiles, exactly as the raw chain would.
pub fn percentile(samples: &[f64], q: f64) -> Result<f64, AppError> {
    if samples.is_empty() {
        return Err(AppError::data("Cannot take a percentile of no samples."));
    }
    if !(0.0..=100.0).contains(&q) {
        return Err(AppError::input(format!(
            "Percentile {q} is outside [0, 100]."
        )));
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let rank = q / 100.0 * (sorted.len() as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Ok(sorted[lo]);
    }
    let frac = rank - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn median(samples: &[f64]) -> Result<f64, AppError> {
    percentile(samples, 50.0)
}

/// Central credible interval containing `mass` of the posterior probability.
///
/// `mass = 0.68` gives the (16, 50, 84) percentile triple; `mass = 0.95`
/// gives (2.5, 50, 97.5).
pub fn credible_interval(samples: &[f64], mass: f64) -> Result<CredibleInterval, AppError> {
    if mass <= 0.0 || mass >= 1.0 {
        return Err(AppError::input(format!(
            "Credible mass {mass} must be in (0, 1)."
        )));
    }
    let tail = (1.0 - mass) / 2.0 * 100.0;
    Ok(CredibleInterval {
        lower: percentile(samples, tail)?,
        median: percentile(samples, 50.0)?,
        upper: percentile(samples, 100.0 - tail)?,
    })
}

/// A 1-D density histogram (normalized so the bin areas sum to 1).
#[derive(Debug, Clone)]
pub struct Histogram {
    /// `bins + 1` edges, evenly spaced over the sample range.
    pub edges: Vec<f64>,
    /// `bins` density values.
    pub density: Vec<f64>,
}

impl Histogram {
    pub fn max_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }
}

/// Bin samples into a density histogram over their own min..max range.
pub fn histogram(samples: &[f64], bins: usize) -> Result<Histogram, AppError> {
    if samples.is_empty() {
        return Err(AppError::data("Cannot histogram an empty sample vector."));
    }
    if bins == 0 {
        return Err(AppError::input("Histogram bin count must be > 0."));
    }

    let (min, max) = sample_range(samples)?;
    // Degenerate (constant) samples get a token width so the bar is visible.
    let span = if max > min { max - min } else { 1.0 };
    let width = span / bins as f64;

    let mut counts = vec![0usize; bins];
    for &x in samples {
        if !x.is_finite() {
            continue;
        }
        let idx = (((x - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let norm = samples.len() as f64 * width;
    let density = counts.iter().map(|&c| c as f64 / norm).collect();
    let edges = (0..=bins).map(|i| min + i as f64 * width).collect();

    Ok(Histogram { edges, density })
}

/// A 2-D count histogram over a pair of sample vectors.
#[derive(Debug, Clone)]
pub struct Histogram2d {
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    /// Row-major `bins × bins` counts, `counts[iy * bins + ix]`.
    pub counts: Vec<usize>,
    pub bins: usize,
}

pub fn histogram2d(x: &[f64], y: &[f64], bins: usize) -> Result<Histogram2d, AppError> {
    if x.len() != y.len() {
        return Err(AppError::input(
            "2-D histogram requires equal-length sample vectors.",
        ));
    }
    if x.is_empty() {
        return Err(AppError::data("Cannot histogram an empty sample vector."));
    }
    if bins == 0 {
        return Err(AppError::input("Histogram bin count must be > 0."));
    }

    let (x_min, x_max) = sample_range(x)?;
    let (y_min, y_max) = sample_range(y)?;
    let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
    let y_span = if y_max > y_min { y_max - y_min } else { 1.0 };
    let x_width = x_span / bins as f64;
    let y_width = y_span / bins as f64;

    let mut counts = vec![0usize; bins * bins];
    for (&xi, &yi) in x.iter().zip(y) {
        if !(xi.is_finite() && yi.is_finite()) {
            continue;
        }
        let ix = (((xi - x_min) / x_width) as usize).min(bins - 1);
        let iy = (((yi - y_min) / y_width) as usize).min(bins - 1);
        counts[iy * bins + ix] += 1;
    }

    Ok(Histogram2d {
        x_edges: (0..=bins).map(|i| x_min + i as f64 * x_width).collect(),
        y_edges: (0..=bins).map(|i| y_min + i as f64 * y_width).collect(),
        counts,
        bins,
    })
}

/// Highest-density-region count thresholds for the given probability masses.
///
/// For each mass, the returned threshold is the largest per-bin count `t`
/// such that the bins with count ≥ t together hold at least `mass` of the
/// total samples. Bins at or above the threshold form the filled contour
/// region at that credible level.
pub fn hdr_thresholds(counts: &[usize], masses: &[f64]) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    let mut sorted: Vec<usize> = counts.iter().copied().filter(|&c| c > 0).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    masses
        .iter()
        .map(|&mass| {
            if total == 0 {
                return 0;
            }
            let target = mass * total as f64;
            let mut cum = 0usize;
            for &c in &sorted {
                cum += c;
                if cum as f64 >= target {
                    return c;
                }
            }
            // mass ≥ 1 or rounding: include every occupied bin.
            *sorted.last().unwrap_or(&0)
        })
        .collect()
}

fn sample_range(samples: &[f64]) -> Result<(f64, f64), AppError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &x in samples {
        if x.is_finite() {
            min = min.min(x);
            max = max.max(x);
        }
    }
    if !(min.is_finite() && max.is_finite()) {
        return Err(AppError::data(
            "Sample vector contains no finite values.",
        ));
    }
    Ok((min, max))
}

//! Posterior power-spectral-density synthesis.
//!
//! Red timing noise is modeled as a power law in frequency,
//!
//! ```text
//! S(f) = A^2 / (12 π^2) * (f / f_ref)^(-γ),   A = 10^log10A
//! ```
//!
//! with amplitude defined at a reference frequency (1/yr by convention).
//! The posterior band is built by evaluating this model on the reference
//! frequency grid for a random subset of posterior (γ, log10A) draws and
//! collapsing the ensemble to median/5%/95% curves.

use rand::rngs::StdRng;
use rand::{SeedableRng, seq::index};
use rayon::prelude::*;

use crate::domain::PsdBand;
use crate::error::AppError;
use crate::stats::percentile;

/// Power-law PSD at frequency `f` (same units as `f_ref`).
pub fn power_law_psd(f: f64, log10_a: f64, gamma: f64, f_ref: f64) -> f64 {
    let a = 10f64.powf(log10_a);
    a * a / (12.0 * std::f64::consts::PI.powi(2)) * (f / f_ref).powf(-gamma)
}

/// Select `k` draw indices uniformly, without replacement.
///
/// Refuses `k > available` rather than silently under-sampling the
/// posterior.
pub fn draw_indices(rng: &mut StdRng, available: usize, k: usize) -> Result<Vec<usize>, AppError> {
    if k == 0 {
        return Err(AppError::input("Draw count must be > 0."));
    }
    if k > available {
        return Err(AppError::data(format!(
            "Requested {k} posterior draws but only {available} samples are available."
        )));
    }
    Ok(index::sample(rng, available, k).into_vec())
}

/// Evaluate the posterior PSD ensemble and reduce it to percentile bands.
///
/// `gamma` and `log10_a` are parallel per-sample vectors; the returned band
/// shares `freq` with the reference spectra so the comparison plot needs no
/// interpolation.
pub fn posterior_band(
    gamma: &[f64],
    log10_a: &[f64],
    freq: &[f64],
    draws: usize,
    f_ref: f64,
    seed: u64,
) -> Result<PsdBand, AppError> {
    if gamma.len() != log10_a.len() {
        return Err(AppError::input(
            "Spectral-index and log-amplitude sample vectors differ in length.",
        ));
    }
    if freq.is_empty() {
        return Err(AppError::data("Reference frequency grid is empty."));
    }
    if !(f_ref.is_finite() && f_ref > 0.0) {
        return Err(AppError::input(format!(
            "Reference frequency {f_ref} must be finite and > 0."
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let indices = draw_indices(&mut rng, gamma.len(), draws)?;

    // One PSD curve per draw; draws are independent, so evaluate in parallel.
    let curves: Vec<Vec<f64>> = indices
        .par_iter()
        .map(|&i| {
            freq.iter()
                .map(|&f| power_law_psd(f, log10_a[i], gamma[i], f_ref))
                .collect()
        })
        .collect();

    // Reduce along the draw axis, one frequency at a time.
    let mut lower = Vec::with_capacity(freq.len());
    let mut median = Vec::with_capacity(freq.len());
    let mut upper = Vec::with_capacity(freq.len());
    let mut column = Vec::with_capacity(curves.len());
    for j in 0..freq.len() {
        column.clear();
        column.extend(curves.iter().map(|c| c[j]));
        lower.push(percentile(&column, 5.0)?);
        median.push(percentile(&column, 50.0)?);
        upper.push(percentile(&column, 95.0)?);
    }

    Ok(PsdBand {
        freq: freq.to_vec(),
        lower,
        median,
        upper,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn power_law_at_reference_frequency_drops_the_gamma_term() {
        // γ exponent is zero at f = f_ref, so S = (10^-14)^2 / (12 π^2).
        let s = power_law_psd(1.0, -14.0, 3.0, 1.0);
        let expected = 1e-28 / (12.0 * std::f64::consts::PI.powi(2));
        assert!((s - expected).abs() <= 1e-15 * expected.abs());
    }

    #[test]
    fn power_law_steepens_with_gamma() {
        let shallow = power_law_psd(10.0, -14.0, 1.0, 1.0);
        let steep = power_law_psd(10.0, -14.0, 4.0, 1.0);
        assert!(steep < shallow);
    }

    #[test]
    fn draw_indices_are_unique_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let idx = draw_indices(&mut rng, 100, 60).unwrap();
        assert_eq!(idx.len(), 60);
        assert!(idx.iter().all(|&i| i < 100));
        let unique: HashSet<usize> = idx.iter().copied().collect();
        assert_eq!(unique.len(), 60);
    }

    #[test]
    fn over_requesting_draws_fails_instead_of_under_sampling() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = draw_indices(&mut rng, 10, 11).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn identical_samples_collapse_the_band() {
        // Every draw evaluates the same curve, so lower == median == upper.
        let gamma = vec![3.0; 20];
        let log10_a = vec![-14.0; 20];
        let freq = vec![0.5, 1.0, 2.0];
        let band = posterior_band(&gamma, &log10_a, &freq, 10, 1.0, 42).unwrap();
        for j in 0..freq.len() {
            let expected = power_law_psd(freq[j], -14.0, 3.0, 1.0);
            assert!((band.lower[j] - expected).abs() <= 1e-12 * expected);
            assert!((band.median[j] - expected).abs() <= 1e-12 * expected);
            assert!((band.upper[j] - expected).abs() <= 1e-12 * expected);
        }
    }

    #[test]
    fn band_orders_lower_median_upper() {
        let gamma: Vec<f64> = (0..50).map(|i| 2.0 + 0.05 * i as f64).collect();
        let log10_a: Vec<f64> = (0..50).map(|i| -15.0 + 0.02 * i as f64).collect();
        let freq = vec![0.3, 1.0, 3.0, 10.0];
        let band = posterior_band(&gamma, &log10_a, &freq, 30, 1.0, 42).unwrap();
        for j in 0..freq.len() {
            assert!(band.lower[j] <= band.median[j]);
            assert!(band.median[j] <= band.upper[j]);
        }
    }

    #[test]
    fn same_seed_reproduces_the_band() {
        let gamma: Vec<f64> = (0..40).map(|i| 1.0 + 0.1 * i as f64).collect();
        let log10_a: Vec<f64> = (0..40).map(|i| -16.0 + 0.05 * i as f64).collect();
        let freq = vec![0.5, 5.0];
        let a = posterior_band(&gamma, &log10_a, &freq, 20, 1.0, 9).unwrap();
        let b = posterior_band(&gamma, &log10_a, &freq, 20, 1.0, 9).unwrap();
        assert_eq!(a.median, b.median);
        assert_eq!(a.lower, b.lower);
        assert_eq!(a.upper, b.upper);
    }
}

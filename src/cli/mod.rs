//! Command-line parsing for the posterior visualization tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the statistics/plotting code. Every knob of a
//! run is an explicit argument; the defaults reproduce the usual
//! single-pulsar red-noise setup, so a bare invocation needs only paths.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ptapost",
    version,
    about = "Posterior plots for PTA red-noise MCMC chains"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Corner plot + per-parameter marginal histograms from an MCMC chain.
    Corner(CornerArgs),
    /// Posterior PSD band overlaid on tempo2 reference spectra.
    Psd(PsdArgs),
}

/// Options for the corner/marginal pipeline.
#[derive(Debug, Parser, Clone)]
pub struct CornerArgs {
    /// PTMCMCSampler chain file (whitespace-delimited, samples x parameters).
    pub chain: PathBuf,

    /// Fraction of initial samples to discard as burn-in.
    #[arg(long, default_value_t = 0.25)]
    pub burn_in: f64,

    /// Parameter to plot, as LABEL=COLUMN (repeatable; order sets panel order).
    ///
    /// Defaults to the red-noise set: EFAC=0, EQUAD=1, gamma=2, log10A=3.
    #[arg(long = "param", value_name = "LABEL=COLUMN")]
    pub params: Vec<String>,

    /// Pulsar name used in the figure title.
    #[arg(long, default_value = "PSR J1910-0309")]
    pub pulsar: String,

    /// Output path for the corner plot PNG.
    #[arg(long, default_value = "posterior_corner.png")]
    pub out: PathBuf,

    /// Output directory for marginal histograms (created if absent).
    #[arg(long, default_value = "marginals")]
    pub outdir: PathBuf,

    /// Histogram bin count for the marginal plots.
    #[arg(long, default_value_t = 40)]
    pub bins: usize,

    /// Write per-parameter credible intervals to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export_summary: Option<PathBuf>,
}

/// Options for the PSD comparison pipeline.
#[derive(Debug, Parser, Clone)]
pub struct PsdArgs {
    /// PTMCMCSampler chain file (whitespace-delimited, samples x parameters).
    pub chain: PathBuf,

    /// tempo2 raw periodogram table (comp.dat).
    #[arg(long, value_name = "FILE")]
    pub raw: PathBuf,

    /// tempo2 fitted spectral model table (cholSpec.dat).
    #[arg(long, value_name = "FILE")]
    pub model: PathBuf,

    /// Fraction of initial samples to discard as burn-in.
    #[arg(long, default_value_t = 0.3)]
    pub burn_in: f64,

    /// Chain column holding the red-noise spectral index (gamma).
    #[arg(long, default_value_t = 1)]
    pub gamma_col: usize,

    /// Chain column holding the red-noise log10 amplitude.
    #[arg(long, default_value_t = 2)]
    pub log10a_col: usize,

    /// Number of posterior draws for the PSD ensemble.
    #[arg(long, default_value_t = 500)]
    pub draws: usize,

    /// Reference frequency in cycles/year.
    #[arg(long, default_value_t = 1.0)]
    pub f_ref: f64,

    /// Multiplier applied to reference-spectrum frequencies (days -> years).
    #[arg(long, default_value_t = 365.25)]
    pub freq_scale: f64,

    /// Random seed for draw selection.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output path for the comparison PNG.
    #[arg(long, default_value = "psd_comparison.png")]
    pub out: PathBuf,
}

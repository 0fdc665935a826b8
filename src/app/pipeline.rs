//! The two linear pipelines behind the CLI subcommands.
//!
//! Each is a strict load -> compute -> render sequence with no branching on
//! results and no retries; the first error aborts the run. Keeping them
//! here (rather than in `app`) leaves the CLI layer purely presentational
//! and makes end-to-end runs testable in-process.

use std::path::PathBuf;

use crate::domain::{CornerConfig, ParamSummary, PsdConfig, RunSummary};
use crate::error::AppError;
use crate::io;
use crate::plot;
use crate::psd;
use crate::stats::credible_interval;

/// Outputs of a `ptapost corner` run.
#[derive(Debug, Clone)]
pub struct CornerRun {
    pub summary: RunSummary,
    pub corner_path: PathBuf,
    pub marginal_paths: Vec<PathBuf>,
    pub summary_path: Option<PathBuf>,
}

/// Outputs of a `ptapost psd` run.
#[derive(Debug, Clone)]
pub struct PsdRun {
    pub n_samples: usize,
    pub out_path: PathBuf,
}

/// Corner pipeline: chain -> intervals -> corner PNG -> marginal PNGs.
pub fn run_corner(config: &CornerConfig) -> Result<CornerRun, AppError> {
    let chain = io::load_chain(&config.chain_path, config.burn_in_frac)?;
    config.selection.validate_against(&chain)?;

    let mut params = Vec::with_capacity(config.selection.len());
    for (label, column) in config.selection.iter() {
        let samples = chain.parameter(column)?;
        let ci68 = credible_interval(&samples, 0.68)?;
        let ci95 = credible_interval(&samples, 0.95)?;
        params.push(ParamSummary {
            label: label.to_string(),
            column,
            median: ci68.median,
            ci68: [ci68.lower, ci68.upper],
            ci95: [ci95.lower, ci95.upper],
        });
    }

    plot::corner::render_corner(&chain, &config.selection, &config.pulsar, &config.corner_out)?;
    let marginal_paths =
        plot::marginal::render_marginals(&chain, &config.selection, &config.marginals_dir, config.bins)?;

    let summary = RunSummary {
        tool: "ptapost".to_string(),
        pulsar: config.pulsar.clone(),
        chain_file: config.chain_path.display().to_string(),
        burn_in_frac: config.burn_in_frac,
        n_samples: chain.n_samples(),
        params,
    };

    let summary_path = match &config.export_summary {
        Some(path) => {
            io::write_summary_json(path, &summary)?;
            Some(path.clone())
        }
        None => None,
    };

    Ok(CornerRun {
        summary,
        corner_path: config.corner_out.clone(),
        marginal_paths,
        summary_path,
    })
}

/// PSD pipeline: chain + tempo2 spectra -> posterior band -> comparison PNG.
pub fn run_psd(config: &PsdConfig) -> Result<PsdRun, AppError> {
    let chain = io::load_chain(&config.chain_path, config.burn_in_frac)?;
    let gamma = chain.parameter(config.gamma_column)?;
    let log10_a = chain.parameter(config.log10_a_column)?;

    let raw = io::load_spectrum(&config.raw_psd_path, config.freq_scale)?;
    let model = io::load_spectrum(&config.model_psd_path, config.freq_scale)?;

    // The posterior band is evaluated on the model grid, matching the
    // convention that cholSpec.dat defines the comparison frequencies.
    let band = psd::posterior_band(
        &gamma,
        &log10_a,
        &model.freq,
        config.draws,
        config.f_ref,
        config.seed,
    )?;

    plot::psd::render_psd_comparison(&raw, &model, &band, &config.out)?;

    Ok(PsdRun {
        n_samples: chain.n_samples(),
        out_path: config.out.clone(),
    })
}

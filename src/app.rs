//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves them into run configs
//! - executes the requested pipeline
//! - prints confirmations and summaries

use clap::Parser;

use crate::cli::{Command, CornerArgs, PsdArgs};
use crate::domain::{CornerConfig, ParamSelection, PsdConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ptapost` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    match cli.command {
        Command::Corner(args) => handle_corner(args),
        Command::Psd(args) => handle_psd(args),
    }
}

fn handle_corner(args: CornerArgs) -> Result<(), AppError> {
    let config = corner_config_from_args(&args)?;
    let run = pipeline::run_corner(&config)?;

    println!(
        "{}",
        crate::report::format_corner_header(
            &config.pulsar,
            run.summary.n_samples,
            config.burn_in_frac
        )
    );
    print!("{}", crate::report::format_param_summaries(&run.summary.params));
    println!("{}", crate::report::ok_saved("Corner plot", &run.corner_path));
    for (summary, path) in run.summary.params.iter().zip(&run.marginal_paths) {
        println!(
            "{}",
            crate::report::ok_saved(&format!("Marginal for {}", summary.label), path)
        );
    }
    if let Some(path) = &run.summary_path {
        println!("{}", crate::report::ok_saved("Posterior summary", path));
    }

    Ok(())
}

fn handle_psd(args: PsdArgs) -> Result<(), AppError> {
    let config = psd_config_from_args(&args);
    let run = pipeline::run_psd(&config)?;

    println!(
        "=== ptapost - PSD comparison ===\n\
         Samples: n={} (burn-in fraction {}) | draws: {} | f_ref: {} 1/yr",
        run.n_samples, config.burn_in_frac, config.draws, config.f_ref
    );
    println!("{}", crate::report::ok_saved("PSD comparison", &run.out_path));

    Ok(())
}

pub fn corner_config_from_args(args: &CornerArgs) -> Result<CornerConfig, AppError> {
    let selection = if args.params.is_empty() {
        ParamSelection::default_red_noise()
    } else {
        ParamSelection::parse(&args.params)?
    };
    Ok(CornerConfig {
        chain_path: args.chain.clone(),
        burn_in_frac: args.burn_in,
        selection,
        pulsar: args.pulsar.clone(),
        corner_out: args.out.clone(),
        marginals_dir: args.outdir.clone(),
        bins: args.bins,
        export_summary: args.export_summary.clone(),
    })
}

pub fn psd_config_from_args(args: &PsdArgs) -> PsdConfig {
    PsdConfig {
        chain_path: args.chain.clone(),
        burn_in_frac: args.burn_in,
        gamma_column: args.gamma_col,
        log10_a_column: args.log10a_col,
        raw_psd_path: args.raw.clone(),
        model_psd_path: args.model.clone(),
        draws: args.draws,
        f_ref: args.f_ref,
        freq_scale: args.freq_scale,
        seed: args.seed,
        out: args.out.clone(),
    }
}

//! Domain types: chains, parameter selections, spectra, and run configs.
//!
//! Everything here is a plain value type. The pipelines own their data
//! exclusively from load to render; nothing is cached between runs.

use std::path::PathBuf;

use nalgebra::DMatrix;
use serde::Serialize;

use crate::error::AppError;

/// Retained MCMC samples (post burn-in).
///
/// Rows are samples, columns are model parameters. No schema is enforced
/// beyond the column-index convention supplied by the caller.
#[derive(Debug, Clone)]
pub struct Chain {
    data: DMatrix<f64>,
}

impl Chain {
    pub fn new(data: DMatrix<f64>) -> Self {
        Self { data }
    }

    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_params(&self) -> usize {
        self.data.ncols()
    }

    /// Extract one parameter column as an owned sample vector.
    pub fn parameter(&self, column: usize) -> Result<Vec<f64>, AppError> {
        if column >= self.data.ncols() {
            return Err(AppError::input(format!(
                "Parameter column {column} is out of range (chain has {} columns).",
                self.data.ncols()
            )));
        }
        Ok(self.data.column(column).iter().copied().collect())
    }
}

/// Ordered mapping from display label to chain column.
///
/// Insertion order determines panel order in the corner plot and the order
/// of marginal outputs. Labels may carry TeX-style markup (`$...$`); the
/// renderers sanitize it where needed.
#[derive(Debug, Clone)]
pub struct ParamSelection {
    entries: Vec<(String, usize)>,
}

impl ParamSelection {
    pub fn new(entries: Vec<(String, usize)>) -> Self {
        Self { entries }
    }

    /// The usual single-pulsar red-noise selection: EFAC, EQUAD, spectral
    /// index, log-amplitude in columns 0..4.
    pub fn default_red_noise() -> Self {
        Self::new(vec![
            ("EFAC".to_string(), 0),
            ("EQUAD".to_string(), 1),
            (r"$\gamma_\mathrm{red}$".to_string(), 2),
            (r"$\log_{10}A_\mathrm{red}$".to_string(), 3),
        ])
    }

    /// Parse repeated `LABEL=COLUMN` CLI arguments, preserving order.
    pub fn parse(specs: &[String]) -> Result<Self, AppError> {
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            // Split on the last '=' so labels like `$\log_{10}A$` survive.
            let (label, column) = spec.rsplit_once('=').ok_or_else(|| {
                AppError::input(format!(
                    "Invalid --param '{spec}': expected LABEL=COLUMN."
                ))
            })?;
            let label = label.trim();
            if label.is_empty() {
                return Err(AppError::input(format!(
                    "Invalid --param '{spec}': empty label."
                )));
            }
            let column: usize = column.trim().parse().map_err(|_| {
                AppError::input(format!(
                    "Invalid --param '{spec}': column must be a non-negative integer."
                ))
            })?;
            entries.push((label.to_string(), column));
        }
        if entries.is_empty() {
            return Err(AppError::input("Parameter selection is empty."));
        }
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// Fail early if any selected column is out of range for the chain.
    pub fn validate_against(&self, chain: &Chain) -> Result<(), AppError> {
        for (label, column) in self.iter() {
            if column >= chain.n_params() {
                return Err(AppError::input(format!(
                    "Column {column} for '{label}' is out of range (chain has {} columns).",
                    chain.n_params()
                )));
            }
        }
        Ok(())
    }
}

/// A reference spectrum loaded from a tempo2 output table.
///
/// Frequencies are stored already converted to cycles/year.
#[derive(Debug, Clone)]
pub struct Spectrum {
    pub freq: Vec<f64>,
    pub power: Vec<f64>,
}

/// Posterior PSD percentile band on a fixed frequency grid.
#[derive(Debug, Clone)]
pub struct PsdBand {
    pub freq: Vec<f64>,
    pub lower: Vec<f64>,
    pub median: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Resolved configuration for a `ptapost corner` run.
#[derive(Debug, Clone)]
pub struct CornerConfig {
    pub chain_path: PathBuf,
    pub burn_in_frac: f64,
    pub selection: ParamSelection,
    pub pulsar: String,
    pub corner_out: PathBuf,
    pub marginals_dir: PathBuf,
    pub bins: usize,
    pub export_summary: Option<PathBuf>,
}

/// Resolved configuration for a `ptapost psd` run.
#[derive(Debug, Clone)]
pub struct PsdConfig {
    pub chain_path: PathBuf,
    pub burn_in_frac: f64,
    pub gamma_column: usize,
    pub log10_a_column: usize,
    pub raw_psd_path: PathBuf,
    pub model_psd_path: PathBuf,
    pub draws: usize,
    pub f_ref: f64,
    pub freq_scale: f64,
    pub seed: u64,
    pub out: PathBuf,
}

/// Per-parameter posterior summary, exportable as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ParamSummary {
    pub label: String,
    pub column: usize,
    pub median: f64,
    /// 68% credible interval (16th/84th percentiles).
    pub ci68: [f64; 2],
    /// 95% credible interval (2.5th/97.5th percentiles).
    pub ci95: [f64; 2],
}

/// Whole-run summary written by `--export-summary`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub pulsar: String,
    pub chain_file: String,
    pub burn_in_frac: f64,
    pub n_samples: usize,
    pub params: Vec<ParamSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_3x2() -> Chain {
        Chain::new(DMatrix::from_row_slice(3, 2, &[
            1.0, 10.0, //
            2.0, 20.0, //
            3.0, 30.0,
        ]))
    }

    #[test]
    fn parameter_extracts_column_in_row_order() {
        let chain = chain_3x2();
        assert_eq!(chain.parameter(1).unwrap(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn parameter_out_of_range_is_an_input_error() {
        let chain = chain_3x2();
        let err = chain.parameter(2).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn selection_parse_preserves_order_and_markup() {
        let specs = vec![
            "EFAC=0".to_string(),
            r"$\log_{10}A_\mathrm{red}$=3".to_string(),
        ];
        let sel = ParamSelection::parse(&specs).unwrap();
        let entries: Vec<_> = sel.iter().collect();
        assert_eq!(entries[0], ("EFAC", 0));
        assert_eq!(entries[1], (r"$\log_{10}A_\mathrm{red}$", 3));
    }

    #[test]
    fn selection_parse_rejects_bad_specs() {
        assert!(ParamSelection::parse(&["EFAC".to_string()]).is_err());
        assert!(ParamSelection::parse(&["=0".to_string()]).is_err());
        assert!(ParamSelection::parse(&["EFAC=x".to_string()]).is_err());
        assert!(ParamSelection::parse(&[]).is_err());
    }

    #[test]
    fn validate_against_flags_out_of_range_columns() {
        let chain = chain_3x2();
        let bad = ParamSelection::new(vec![("EFAC".to_string(), 5)]);
        assert_eq!(bad.validate_against(&chain).unwrap_err().exit_code(), 2);

        let ok = ParamSelection::new(vec![("EFAC".to_string(), 1)]);
        assert!(ok.validate_against(&chain).is_ok());
    }
}

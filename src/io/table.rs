//! Whitespace-table ingest for chains and reference spectra.
//!
//! Both input kinds are plain-text numeric matrices: PTMCMCSampler chain
//! files (samples × parameters) and tempo2 `spectralModel` outputs
//! (frequency, power). Parsing follows `np.loadtxt` conventions so files
//! from the usual sampler/tempo2 workflow load unchanged: blank lines and
//! `#` comment lines are skipped, fields are split on any whitespace, and
//! ragged rows are an error.
//!
//! No value-level validation is performed beyond "parses as a float":
//! NaN/Inf entries propagate into the statistics exactly as the raw chain
//! would produce them.

use std::fs;
use std::path::Path;

use nalgebra::DMatrix;

use crate::domain::{Chain, Spectrum};
use crate::error::AppError;

/// Parse a whitespace-delimited numeric table.
///
/// Errors name the offending 1-based line so users can find the problem in
/// multi-megabyte chain files.
pub fn parse_matrix(text: &str) -> Result<DMatrix<f64>, String> {
    let mut values = Vec::new();
    let mut ncols = None;
    let mut nrows = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let start = values.len();
        for field in line.split_whitespace() {
            let v: f64 = field
                .parse()
                .map_err(|_| format!("Line {}: invalid number '{field}'.", idx + 1))?;
            values.push(v);
        }
        let width = values.len() - start;

        match ncols {
            None => ncols = Some(width),
            Some(expected) if expected != width => {
                return Err(format!(
                    "Line {}: expected {expected} columns, found {width}.",
                    idx + 1
                ));
            }
            Some(_) => {}
        }
        nrows += 1;
    }

    let ncols = ncols.unwrap_or(0);
    if nrows == 0 {
        return Err("Table contains no data rows.".to_string());
    }

    Ok(DMatrix::from_row_slice(nrows, ncols, &values))
}

/// Load a numeric table from disk with an explicit existence check.
///
/// The check runs before any parsing so a bad path fails fast with a clear
/// message instead of a parser diagnostic.
pub fn load_matrix(path: &Path, what: &str) -> Result<DMatrix<f64>, AppError> {
    if !path.exists() {
        return Err(AppError::input(format!(
            "{what} file '{}' not found.",
            path.display()
        )));
    }
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::input(format!(
            "Failed to read {what} file '{}': {e}",
            path.display()
        ))
    })?;
    parse_matrix(&text).map_err(|e| {
        AppError::input(format!(
            "Failed to parse {what} file '{}': {e}",
            path.display()
        ))
    })
}

/// Drop the first `floor(frac · nrows)` rows of a matrix.
///
/// The retained rows are a suffix of the original, in original order, with
/// columns untouched.
pub fn apply_burn_in(matrix: DMatrix<f64>, frac: f64) -> Result<DMatrix<f64>, AppError> {
    if !frac.is_finite() || !(0.0..1.0).contains(&frac) {
        return Err(AppError::input(format!(
            "Burn-in fraction {frac} must be in [0, 1)."
        )));
    }
    let nrows = matrix.nrows();
    let burn = (frac * nrows as f64).floor() as usize;
    Ok(matrix.rows(burn, nrows - burn).into_owned())
}

/// Load an MCMC chain and discard burn-in.
pub fn load_chain(path: &Path, burn_in_frac: f64) -> Result<Chain, AppError> {
    let matrix = load_matrix(path, "Chain")?;
    let retained = apply_burn_in(matrix, burn_in_frac)?;
    if retained.nrows() == 0 {
        return Err(AppError::data(format!(
            "No samples remain in '{}' after burn-in.",
            path.display()
        )));
    }
    Ok(Chain::new(retained))
}

/// Load a (frequency, power) reference spectrum, scaling frequencies.
///
/// tempo2 writes frequencies in cycles/day; `freq_scale = 365.25` converts
/// them to the cycles/year convention used throughout the PSD pipeline.
pub fn load_spectrum(path: &Path, freq_scale: f64) -> Result<Spectrum, AppError> {
    let matrix = load_matrix(path, "Spectrum")?;
    if matrix.ncols() < 2 {
        return Err(AppError::input(format!(
            "Spectrum file '{}' needs at least 2 columns (frequency, power), found {}.",
            path.display(),
            matrix.ncols()
        )));
    }
    Ok(Spectrum {
        freq: matrix.column(0).iter().map(|f| f * freq_scale).collect(),
        power: matrix.column(1).iter().copied().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_matrix_skips_comments_and_blank_lines() {
        let text = "# header\n1 2 3\n\n  4 5 6\n# trailing\n";
        let m = parse_matrix(text).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (2, 3));
        assert_eq!(m[(1, 2)], 6.0);
    }

    #[test]
    fn parse_matrix_rejects_ragged_rows() {
        let err = parse_matrix("1 2\n3\n").unwrap_err();
        assert!(err.contains("Line 2"), "{err}");
    }

    #[test]
    fn parse_matrix_rejects_non_numeric_fields() {
        let err = parse_matrix("1 2\n3 x\n").unwrap_err();
        assert!(err.contains("'x'"), "{err}");
    }

    #[test]
    fn parse_matrix_rejects_empty_tables() {
        assert!(parse_matrix("# only comments\n").is_err());
    }

    #[test]
    fn burn_in_keeps_exactly_the_row_suffix() {
        // 10 rows, column 0 = row index.
        let rows: Vec<f64> = (0..10).flat_map(|i| [i as f64, 100.0 + i as f64]).collect();
        let m = DMatrix::from_row_slice(10, 2, &rows);

        // floor(0.25 * 10) = 2 rows dropped; suffix preserved in order.
        let kept = apply_burn_in(m.clone(), 0.25).unwrap();
        assert_eq!(kept.nrows(), 8);
        let first_col: Vec<f64> = kept.column(0).iter().copied().collect();
        assert_eq!(first_col, (2..10).map(f64::from).collect::<Vec<_>>());

        // f = 0 keeps everything unchanged.
        let all = apply_burn_in(m.clone(), 0.0).unwrap();
        assert_eq!(all, m);

        // f close to 1 keeps a single row rather than failing.
        let last = apply_burn_in(m, 0.95).unwrap();
        assert_eq!(last.nrows(), 1);
        assert_eq!(last[(0, 0)], 9.0);
    }

    #[test]
    fn burn_in_row_count_matches_floor_formula() {
        for n in [1usize, 3, 7, 100] {
            let m = DMatrix::from_element(n, 1, 0.0);
            for f in [0.0, 0.1, 0.3333, 0.5, 0.9] {
                let kept = apply_burn_in(m.clone(), f).unwrap();
                let burn = (f * n as f64).floor() as usize;
                assert_eq!(kept.nrows(), n - burn, "n={n} f={f}");
            }
        }
    }

    #[test]
    fn burn_in_rejects_fractions_outside_unit_interval() {
        let m = DMatrix::from_element(4, 1, 0.0);
        assert_eq!(apply_burn_in(m.clone(), 1.0).unwrap_err().exit_code(), 2);
        assert_eq!(apply_burn_in(m.clone(), -0.1).unwrap_err().exit_code(), 2);
        assert_eq!(
            apply_burn_in(m, f64::NAN).unwrap_err().exit_code(),
            2
        );
    }

    #[test]
    fn missing_chain_file_fails_before_parsing() {
        let path = PathBuf::from("/nonexistent/chain_1_J1910.txt");
        let err = load_chain(&path, 0.25).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn spectrum_frequencies_are_scaled_in_place() {
        let dir = std::env::temp_dir().join("ptapost-test-spectrum");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cholSpec.dat");
        std::fs::write(&path, "0.01 1e-10\n0.02 2e-10\n").unwrap();

        let spec = load_spectrum(&path, 365.25).unwrap();
        assert!((spec.freq[0] - 3.6525).abs() < 1e-12);
        assert!((spec.freq[1] - 7.305).abs() < 1e-12);
        assert_eq!(spec.power, vec![1e-10, 2e-10]);
    }
}

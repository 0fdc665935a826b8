//! Terminal output formatting.
//!
//! Formatting stays out of the pipeline code so output changes are
//! localized and the compute path remains quiet.

use std::path::Path;

use crate::domain::ParamSummary;

/// Confirmation line for a written file.
pub fn ok_saved(what: &str, path: &Path) -> String {
    format!("[OK] {what} saved to {}", path.display())
}

/// One-line posterior summary per parameter.
pub fn format_param_summaries(params: &[ParamSummary]) -> String {
    let mut out = String::new();
    for p in params {
        out.push_str(&format!(
            "{}: median={:.4} 68%=[{:.4}, {:.4}] 95%=[{:.4}, {:.4}]\n",
            p.label, p.median, p.ci68[0], p.ci68[1], p.ci95[0], p.ci95[1]
        ));
    }
    out
}

/// Header line for a corner run.
pub fn format_corner_header(pulsar: &str, n_samples: usize, burn_in_frac: f64) -> String {
    format!(
        "=== ptapost - posterior plots for {pulsar} ===\n\
         Samples: n={n_samples} (burn-in fraction {burn_in_frac})"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn summary_lines_carry_both_intervals() {
        let params = vec![ParamSummary {
            label: "EFAC".to_string(),
            column: 0,
            median: 1.0,
            ci68: [0.9, 1.1],
            ci95: [0.8, 1.2],
        }];
        let text = format_param_summaries(&params);
        assert!(text.contains("EFAC: median=1.0000"));
        assert!(text.contains("68%=[0.9000, 1.1000]"));
        assert!(text.contains("95%=[0.8000, 1.2000]"));
    }

    #[test]
    fn ok_line_names_the_file() {
        let line = ok_saved("Corner plot", &PathBuf::from("posterior_corner.png"));
        assert_eq!(line, "[OK] Corner plot saved to posterior_corner.png");
    }
}

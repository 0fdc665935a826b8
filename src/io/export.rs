//! Posterior summary JSON export.
//!
//! The summary is the "portable" result of a corner run: per-parameter
//! medians and credible intervals, plus enough run metadata to know which
//! chain produced them. Downstream scripts can consume it without
//! re-reading the (much larger) chain file.

use std::fs::File;
use std::path::Path;

use crate::domain::RunSummary;
use crate::error::AppError;

/// Write a run summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create summary JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::render(format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParamSummary;

    #[test]
    fn summary_round_trips_through_json() {
        let summary = RunSummary {
            tool: "ptapost".to_string(),
            pulsar: "PSR J1910-0309".to_string(),
            chain_file: "chain_1.txt".to_string(),
            burn_in_frac: 0.25,
            n_samples: 750,
            params: vec![ParamSummary {
                label: "EFAC".to_string(),
                column: 0,
                median: 1.02,
                ci68: [0.95, 1.10],
                ci95: [0.90, 1.18],
            }],
        };

        let dir = std::env::temp_dir().join("ptapost-test-export");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("summary.json");
        write_summary_json(&path, &summary).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["pulsar"], "PSR J1910-0309");
        assert_eq!(parsed["params"][0]["median"], 1.02);
    }
}

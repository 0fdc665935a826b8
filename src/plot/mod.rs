//! Plotters-based figure rendering.
//!
//! Three renderers, all writing PNG via the bitmap backend:
//!
//! - `corner`: joint posterior grid (histograms + filled density regions)
//! - `marginal`: one credible-interval histogram per parameter
//! - `psd`: log-log PSD comparison against tempo2 reference spectra
//!
//! Parameter labels may carry TeX-style markup from enterprise parameter
//! names (`$\gamma_\mathrm{red}$`). The bitmap backend has no TeX, so
//! labels are flattened to plain text before drawing.

pub mod corner;
pub mod marginal;
pub mod psd;

/// Flatten TeX-style markup in a label for plain-text rendering.
///
/// `$\gamma_\mathrm{red}$` becomes `gamma_red`.
pub fn display_label(label: &str) -> String {
    label
        .replace("\\mathrm", "")
        .replace(['$', '\\', '{', '}'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_label_flattens_markup() {
        assert_eq!(display_label(r"$\gamma_\mathrm{red}$"), "gamma_red");
        assert_eq!(display_label(r"$\log_{10}A_\mathrm{red}$"), "log_10A_red");
        assert_eq!(display_label("EFAC"), "EFAC");
    }
}

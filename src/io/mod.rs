//! Input/output helpers.
//!
//! - whitespace-table ingest: chains and reference spectra (`table`)
//! - posterior summary JSON export (`export`)

pub mod export;
pub mod table;

pub use export::*;
pub use table::*;

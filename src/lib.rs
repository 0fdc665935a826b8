//! `pta-posterior` library crate.
//!
//! The binary (`ptapost`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., batch runs over many pulsars)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod psd;
pub mod report;
pub mod stats;

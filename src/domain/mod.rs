//! Core domain types shared across the pipelines.

pub mod types;

pub use types::*;

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the solver selection enum (`Method`)
//! - the resolved run configuration (`FitConfig`)

pub mod types;

pub use types::*;

//! Regression model state, prediction, and fit statistics.
//!
//! `metrics` holds the statistics as pure functions so the same code scores
//! both freshly fitted models and models restored from disk.

pub mod metrics;
pub mod model;

pub use model::*;

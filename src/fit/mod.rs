//! Regression fitting.
//!
//! Responsibilities:
//!
//! - augment a design matrix with the intercept column
//! - solve it with one of the three strategies (`Method`)
//! - fit whole grids of pairwise regressions (parallel)

pub mod fitter;
pub mod pairs;

pub use fitter::*;
pub use pairs::*;

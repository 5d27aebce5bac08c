//! Reporting utilities: fit summaries, pair grids, and prediction tables.

pub mod format;

pub use format::*;

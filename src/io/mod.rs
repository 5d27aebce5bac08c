//! Input/output helpers.
//!
//! - model JSON read/write (`model`)
//!
//! Dataset CSV ingest lives with the dataset type in `data`.

pub mod model;

pub use model::*;

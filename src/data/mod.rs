//! Data sources for regression.
//!
//! The fitter is written against the `DataSource` trait; `Dataset` is the
//! in-memory, CSV-backed implementation used by the binary and the tests.

pub mod dataset;

pub use dataset::*;

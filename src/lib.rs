//! `linreg` library crate.
//!
//! Linear and polynomial least-squares regression with three interchangeable
//! solvers (SVD least squares, normal equations, Gram-Schmidt QR), plus the
//! usual fit statistics.
//!
//! The binary (`linreg`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the numerical core is reusable from other tools and notebooks

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

//! Mathematical utilities: polynomial basis, QR decomposition, and the
//! linear-algebra primitives behind the fitting strategies.

pub mod basis;
pub mod ols;
pub mod qr;

pub use basis::*;
pub use ols::*;
pub use qr::*;

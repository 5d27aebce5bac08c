//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - selected on the command line
//! - recorded in saved model files
//! - passed through the fitting pipeline unchanged

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which numerical strategy solves the augmented linear system.
///
/// All three return the same coefficient layout (slopes, then intercept) and
/// agree on well-conditioned input. They differ in how they fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// SVD least-squares solve. Tolerates tall and rank-deficient systems.
    #[default]
    #[value(alias = "scipy")]
    Lstsq,
    /// Normal equations with an explicit `(AᵗA)⁻¹`.
    ///
    /// Squares the condition number of the design, so it is the first of the
    /// three to fail on nearly collinear predictors.
    Normal,
    /// Gram-Schmidt QR followed by triangular back-substitution.
    Qr,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Lstsq, Method::Normal, Method::Qr];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Method::Lstsq => "least squares (SVD)",
            Method::Normal => "normal equations",
            Method::Qr => "QR (Gram-Schmidt)",
        }
    }
}

/// A full `linreg fit` configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus `.env` defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub data_path: PathBuf,
    pub ind_vars: Vec<String>,
    pub dep_var: String,
    pub method: Method,
    /// Polynomial degree; values above 1 require exactly one predictor.
    pub degree: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub save_model: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_defaults_to_least_squares() {
        assert_eq!(Method::default(), Method::Lstsq);
    }

    #[test]
    fn method_parses_scipy_alias() {
        assert_eq!(Method::from_str("scipy", true).unwrap(), Method::Lstsq);
        assert_eq!(Method::from_str("qr", true).unwrap(), Method::Qr);
        assert!(Method::from_str("cholesky", true).is_err());
    }

    #[test]
    fn method_serializes_lowercase() {
        let json = serde_json::to_string(&Method::Normal).unwrap();
        assert_eq!(json, "\"normal\"");
    }
}

//! Error types.
//!
//! - `RegressionError`: typed failures from the numerical core (fitting,
//!   prediction, statistics). Callers can match on the variant.
//! - `AppError`: what the `linreg` binary reports, with a process exit code.

use thiserror::Error;

/// Failures raised by the regression core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    /// A design column is linearly dependent on the columns before it.
    #[error("Rank-deficient design matrix: column {column} has zero norm after orthogonalization")]
    RankDeficient { column: usize },

    /// A matrix that must be inverted (or back-substituted) is singular.
    #[error("Singular matrix encountered during {operation}")]
    SingularMatrix { operation: &'static str },

    /// Dimensions of two inputs disagree.
    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// R² is undefined because the response has zero variance.
    #[error("R^2 is undefined: response variable has zero variance")]
    ZeroVariance,

    /// The least-squares primitive refused the system.
    #[error("Least-squares solve failed: {0}")]
    Solver(String),

    /// An operation needs state that no fit or `initialize` call has provided.
    #[error("Model is missing {0}; fit or initialize it first")]
    NotFitted(&'static str),

    #[error("Invalid polynomial degree {0}: must be >= 1")]
    InvalidDegree(usize),

    #[error("Polynomial regression takes exactly one predictor, got {0}")]
    MultiplePredictors(usize),

    #[error("No samples to fit")]
    EmptyInput,

    #[error("Non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<RegressionError> for AppError {
    /// Input/shape problems exit with 3, numerical failures with 4.
    fn from(err: RegressionError) -> Self {
        let code = match err {
            RegressionError::ShapeMismatch { .. }
            | RegressionError::EmptyInput
            | RegressionError::NonFinite(_)
            | RegressionError::UnknownVariable(_)
            | RegressionError::InvalidDegree(_)
            | RegressionError::MultiplePredictors(_)
            | RegressionError::NotFitted(_) => 3,
            RegressionError::RankDeficient { .. }
            | RegressionError::SingularMatrix { .. }
            | RegressionError::ZeroVariance
            | RegressionError::Solver(_) => 4,
        };
        AppError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regression_errors_map_to_exit_codes() {
        let shape: AppError = RegressionError::ShapeMismatch {
            context: "predict",
            expected: 2,
            actual: 3,
        }
        .into();
        assert_eq!(shape.exit_code(), 3);
        assert!(shape.to_string().contains("expected 2, got 3"));

        let singular: AppError = RegressionError::SingularMatrix {
            operation: "normal equations inverse",
        }
        .into();
        assert_eq!(singular.exit_code(), 4);
    }
}

//! Dense linear-algebra primitives used by the fitting strategies.
//!
//! These are thin wrappers around nalgebra that turn its `Option`/`&str`
//! failure signals into `RegressionError`s and reject non-finite output:
//!
//! - `solve_least_squares`: SVD-based least squares (tall or rank-deficient
//!   systems are fine; small singular values are truncated).
//! - `invert`: explicit inverse with a conditioning check, used only by the
//!   normal-equations path.
//! - `back_substitute`: upper-triangular solve, used by the QR path.
//!
//! (Nalgebra's `QR::solve` is intended for square systems and will panic for
//! non-square matrices, so the general solve goes through SVD.)

use nalgebra::{DMatrix, DVector};

use crate::error::RegressionError;

/// Reciprocal condition number below which a matrix is treated as singular
/// before inversion.
pub const RCOND_MIN: f64 = 1e-13;

/// Solve `min ||x β - y||²` using SVD.
///
/// Singular values below `ε · max(n, k) · σ_max` are treated as zero, which
/// yields the minimum-norm solution for rank-deficient systems.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    if x.nrows() != y.len() {
        return Err(RegressionError::ShapeMismatch {
            context: "least-squares rows",
            expected: x.nrows(),
            actual: y.len(),
        });
    }

    let svd = x.clone().svd(true, true);
    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let tol = f64::EPSILON * x.nrows().max(x.ncols()) as f64 * sigma_max;

    let beta = svd
        .solve(y, tol)
        .map_err(|e| RegressionError::Solver(e.to_string()))?;
    if !beta.iter().all(|v| v.is_finite()) {
        return Err(RegressionError::Solver("solution is not finite".to_string()));
    }
    Ok(beta)
}

/// Invert a square matrix, refusing numerically singular input.
pub fn invert(m: &DMatrix<f64>) -> Result<DMatrix<f64>, RegressionError> {
    const OP: &str = "matrix inversion";

    if !m.is_square() {
        return Err(RegressionError::ShapeMismatch {
            context: "matrix inversion",
            expected: m.nrows(),
            actual: m.ncols(),
        });
    }

    let sv = m.singular_values();
    let s_max = sv.iter().copied().fold(0.0_f64, f64::max);
    let s_min = sv.iter().copied().fold(f64::INFINITY, f64::min);
    if !(s_max > 0.0 && s_min / s_max >= RCOND_MIN) {
        return Err(RegressionError::SingularMatrix { operation: OP });
    }

    let inv = m
        .clone()
        .try_inverse()
        .ok_or(RegressionError::SingularMatrix { operation: OP })?;
    if !inv.iter().all(|v| v.is_finite()) {
        return Err(RegressionError::SingularMatrix { operation: OP });
    }
    Ok(inv)
}

/// Solve `r x = b` for upper-triangular `r` by back-substitution.
///
/// Only the upper triangle of `r` is read.
pub fn back_substitute(r: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    const OP: &str = "triangular back-substitution";

    if !r.is_square() || r.nrows() != b.len() {
        return Err(RegressionError::ShapeMismatch {
            context: "triangular solve",
            expected: r.ncols(),
            actual: b.len(),
        });
    }

    let x = r
        .solve_upper_triangular(b)
        .ok_or(RegressionError::SingularMatrix { operation: OP })?;
    if !x.iter().all(|v| v.is_finite()) {
        return Err(RegressionError::SingularMatrix { operation: OP });
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_tolerates_duplicate_columns() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 6.0]);

        // Minimum-norm solution splits the weight evenly.
        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 1.0).abs() < 1e-9);
        assert!((beta[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn least_squares_rejects_row_mismatch() {
        let x = DMatrix::<f64>::zeros(3, 2);
        let y = DVector::<f64>::zeros(4);
        assert!(matches!(
            solve_least_squares(&x, &y),
            Err(RegressionError::ShapeMismatch { expected: 3, actual: 4, .. })
        ));
    }

    #[test]
    fn invert_round_trips_well_conditioned_matrix() {
        let m = DMatrix::from_row_slice(2, 2, &[4.0, 7.0, 2.0, 6.0]);
        let inv = invert(&m).unwrap();
        let id = &m * &inv;
        assert!((id - DMatrix::<f64>::identity(2, 2)).norm() < 1e-12);
    }

    #[test]
    fn invert_refuses_singular_matrix() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(matches!(invert(&m), Err(RegressionError::SingularMatrix { .. })));
    }

    #[test]
    fn back_substitution_solves_triangular_system() {
        let r = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 0.0, 4.0]);
        let b = DVector::from_row_slice(&[5.0, 8.0]);
        let x = back_substitute(&r, &b).unwrap();
        assert!((x[1] - 2.0).abs() < 1e-12);
        assert!((x[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn back_substitution_refuses_zero_pivot() {
        let r = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 0.0, 0.0]);
        let b = DVector::from_row_slice(&[1.0, 1.0]);
        assert!(matches!(
            back_substitute(&r, &b),
            Err(RegressionError::SingularMatrix { .. })
        ));
    }
}

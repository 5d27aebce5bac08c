//! QR decomposition by modified Gram-Schmidt.
//!
//! Columns are processed left to right. Each new column is copied, stripped of
//! its projection onto every already-orthonormalized column (projecting the
//! running remainder, not the original column), and normalized. `R` is then
//! `Qᵗ A` with its strictly-lower part set to zero.
//!
//! Gram-Schmidt loses orthogonality faster than Householder QR as the column
//! count grows; for the handful of columns a regression design has this is not
//! a concern.

use nalgebra::DMatrix;

use crate::error::RegressionError;

/// A remainder norm at or below this fraction of the column's own norm means
/// the column lies in the span of the previous ones.
const RANK_TOL: f64 = 1e-10;

/// Decompose `a` (n × k) into orthonormal `q` (n × k) and upper-triangular
/// `r` (k × k) with `a = q r`.
///
/// Returns `RankDeficient` for the first column that is (numerically) a
/// linear combination of earlier ones, including all-zero columns.
pub fn qr_decomposition(a: &DMatrix<f64>) -> Result<(DMatrix<f64>, DMatrix<f64>), RegressionError> {
    let (n, k) = a.shape();
    let mut q = DMatrix::<f64>::zeros(n, k);

    for i in 0..k {
        let mut current = a.column(i).clone_owned();
        let original_norm = current.norm();

        for j in 0..i {
            let qj = q.column(j);
            let proj = qj.dot(&current);
            current.axpy(-proj, &qj, 1.0);
        }

        let norm = current.norm();
        if !(norm > RANK_TOL * original_norm) {
            return Err(RegressionError::RankDeficient { column: i });
        }
        q.set_column(i, &(current / norm));
    }

    let mut r = q.transpose() * a;
    r.fill_lower_triangle(0.0, 1);

    Ok((q, r))
}

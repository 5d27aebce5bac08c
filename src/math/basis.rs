//! Polynomial basis for single-predictor regression.
//!
//! A degree-`p` model of one predictor `x` is linear in the features
//! `x, x^2, ..., x^p`. There is no `x^0` column here: the fitter appends the
//! intercept column itself, so the same expanded matrix works for every
//! solving strategy.

use nalgebra::{DMatrix, DVector};

use crate::error::RegressionError;

/// Expand `x` into an `n × degree` matrix whose column `j` holds `x^(j+1)`.
///
/// `degree = 1` returns `x` unchanged as a single column.
pub fn polynomial_matrix(x: &DVector<f64>, degree: usize) -> Result<DMatrix<f64>, RegressionError> {
    if degree == 0 {
        return Err(RegressionError::InvalidDegree(degree));
    }
    Ok(DMatrix::from_fn(x.len(), degree, |i, j| x[i].powi(j as i32 + 1)))
}

/// Evaluate `intercept + Σ coefs[j] * x^(j+1)` at a single point.
pub fn polynomial_value(x: f64, coefs: &[f64], intercept: f64) -> f64 {
    let mut acc = intercept;
    let mut power = 1.0;
    for &c in coefs {
        power *= x;
        acc += c * power;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_one_is_identity() {
        let x = DVector::from_row_slice(&[1.5, -2.0, 0.0, 7.25]);
        let m = polynomial_matrix(&x, 1).unwrap();
        assert_eq!(m.shape(), (4, 1));
        for i in 0..x.len() {
            assert_eq!(m[(i, 0)], x[i]);
        }
    }

    #[test]
    fn columns_hold_increasing_powers() {
        let x = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let m = polynomial_matrix(&x, 3).unwrap();
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m.row(1).iter().copied().collect::<Vec<_>>(), vec![2.0, 4.0, 8.0]);
        assert_eq!(m.row(2).iter().copied().collect::<Vec<_>>(), vec![3.0, 9.0, 27.0]);
    }

    #[test]
    fn degree_zero_is_rejected() {
        let x = DVector::from_row_slice(&[1.0]);
        assert_eq!(
            polynomial_matrix(&x, 0).unwrap_err(),
            RegressionError::InvalidDegree(0)
        );
    }

    #[test]
    fn polynomial_value_matches_expansion() {
        // 1 + 2x + 3x^2 at x = 2
        assert!((polynomial_value(2.0, &[2.0, 3.0], 1.0) - 17.0).abs() < 1e-12);
        assert_eq!(polynomial_value(5.0, &[], 4.0), 4.0);
    }
}

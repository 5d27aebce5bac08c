//! Fit-quality statistics over plain vectors.
//!
//! `LinearRegression` uses these against its stored response; the `predict`
//! command uses them directly against a dataset column.

use nalgebra::DVector;

use crate::error::RegressionError;

/// `y - y_pred`, elementwise.
pub fn residuals(y: &DVector<f64>, y_pred: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    check_same_len(y, y_pred)?;
    Ok(y - y_pred)
}

/// Coefficient of determination `1 - SSE / SST`.
///
/// A response with zero variance has no defined R²; that case returns
/// `ZeroVariance` instead of a NaN. A response counts as constant only when
/// every value equals the first, so a small spread around a large mean still
/// gets an R².
pub fn r_squared(y: &DVector<f64>, y_pred: &DVector<f64>) -> Result<f64, RegressionError> {
    check_same_len(y, y_pred)?;
    let Some(&first) = y.as_slice().first() else {
        return Err(RegressionError::EmptyInput);
    };
    if y.iter().all(|&v| v == first) {
        return Err(RegressionError::ZeroVariance);
    }

    let y_mean = y.mean();
    let sst: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let sse: f64 = y.iter().zip(y_pred.iter()).map(|(a, b)| (a - b).powi(2)).sum();

    if !(sst > 0.0) {
        return Err(RegressionError::ZeroVariance);
    }
    Ok(1.0 - sse / sst)
}

/// Mean of squared residuals.
pub fn mse(residuals: &DVector<f64>) -> Result<f64, RegressionError> {
    if residuals.is_empty() {
        return Err(RegressionError::EmptyInput);
    }
    Ok(residuals.norm_squared() / residuals.len() as f64)
}

fn check_same_len(y: &DVector<f64>, y_pred: &DVector<f64>) -> Result<(), RegressionError> {
    if y.len() != y_pred.len() {
        return Err(RegressionError::ShapeMismatch {
            context: "response/prediction length",
            expected: y.len(),
            actual: y_pred.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r_squared_is_one_for_perfect_predictions() {
        let y = DVector::from_row_slice(&[1.0, 3.0, 2.0, 5.0]);
        assert!((r_squared(&y, &y).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn r_squared_is_zero_when_predicting_the_mean() {
        let y = DVector::from_row_slice(&[1.0, 3.0, 2.0, 6.0]);
        let mean = DVector::from_element(4, y.mean());
        assert!(r_squared(&y, &mean).unwrap().abs() < 1e-12);
    }

    #[test]
    fn r_squared_can_be_negative_for_bad_predictions() {
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let bad = DVector::from_row_slice(&[3.0, 2.0, 1.0]);
        assert!((r_squared(&y, &bad).unwrap() + 3.0).abs() < 1e-12);
    }

    #[test]
    fn constant_response_has_no_r_squared() {
        let y = DVector::from_element(5, 0.1);
        let pred = DVector::from_element(5, 0.1);
        assert_eq!(r_squared(&y, &pred).unwrap_err(), RegressionError::ZeroVariance);

        let zeros = DVector::<f64>::zeros(3);
        assert_eq!(r_squared(&zeros, &zeros).unwrap_err(), RegressionError::ZeroVariance);
    }

    #[test]
    fn small_spread_around_large_mean_has_r_squared() {
        // Epoch-second scale values: SST is exactly 10.
        let y = DVector::from_fn(5, |i, _| 1.7e9 + (i + 1) as f64);
        assert!((r_squared(&y, &y).unwrap() - 1.0).abs() < 1e-12);

        let mean = DVector::from_element(5, y.mean());
        assert!(r_squared(&y, &mean).unwrap().abs() < 1e-12);
    }

    #[test]
    fn residuals_are_plain_differences() {
        let y = DVector::from_row_slice(&[1.0, 2.0, 4.0]);
        let pred = DVector::from_row_slice(&[0.5, 2.0, 5.0]);
        let r = residuals(&y, &pred).unwrap();
        assert_eq!(r.as_slice(), &[0.5, 0.0, -1.0]);
        assert!((mse(&r).unwrap() - 1.25 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn length_mismatch_is_reported() {
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        let pred = DVector::from_row_slice(&[1.0]);
        assert!(matches!(
            residuals(&y, &pred),
            Err(RegressionError::ShapeMismatch { expected: 2, actual: 1, .. })
        ));
        assert_eq!(mse(&DVector::<f64>::zeros(0)).unwrap_err(), RegressionError::EmptyInput);
    }
}

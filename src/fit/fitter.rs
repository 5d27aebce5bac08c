//! Coefficient solvers for a single design matrix.
//!
//! Given:
//! - a design matrix `A` (n samples × k predictors)
//! - a response vector `y` (n samples)
//!
//! every strategy:
//! - appends a trailing column of ones to `A` (the intercept term)
//! - solves the augmented system `[A | 1] c ≈ y`
//! - returns `c` of length `k + 1`: the k slopes followed by the intercept
//!
//! Inputs are validated once in `solve` before dispatch so the strategies can
//! assume consistent, finite data.

use nalgebra::{DMatrix, DVector};

use crate::domain::Method;
use crate::error::RegressionError;
use crate::math::{back_substitute, invert, qr_decomposition, solve_least_squares};

/// Append a column of ones after the last predictor column.
pub fn augment(a: &DMatrix<f64>) -> DMatrix<f64> {
    let k = a.ncols();
    a.clone().insert_column(k, 1.0)
}

/// Split an augmented coefficient vector into `(slope, intercept)`.
///
/// The intercept is always the final element.
pub fn split_coefficients(c: &DVector<f64>) -> Result<(DVector<f64>, f64), RegressionError> {
    let Some(&intercept) = c.as_slice().last() else {
        return Err(RegressionError::EmptyInput);
    };
    let slope = c.rows(0, c.len() - 1).clone_owned();
    Ok((slope, intercept))
}

/// Validate inputs and solve with the chosen strategy.
pub fn solve(method: Method, a: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    validate(a, y)?;

    log::debug!(
        "solving {}x{} design (+ intercept) via {}",
        a.nrows(),
        a.ncols(),
        method.display_name()
    );

    let c = match method {
        Method::Lstsq => fit_lstsq(a, y),
        Method::Normal => fit_normal(a, y),
        Method::Qr => fit_qr(a, y),
    };

    if let Err(err) = &c {
        log::warn!("{} fit failed: {err}", method.display_name());
    }
    c
}

/// Direct least-squares fit via SVD.
pub fn fit_lstsq(a: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    let aug = augment(a);
    solve_least_squares(&aug, y)
}

/// Normal-equations fit: `c = (AᵗA)⁻¹ Aᵗy`.
pub fn fit_normal(a: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    let aug = augment(a);
    let at = aug.transpose();
    let ata = &at * &aug;
    let aty = &at * y;

    let ata_inv = invert(&ata)?;
    let c = ata_inv * aty;
    if !c.iter().all(|v| v.is_finite()) {
        return Err(RegressionError::SingularMatrix {
            operation: "normal equations",
        });
    }
    Ok(c)
}

/// QR fit: decompose `[A | 1] = QR`, then back-substitute `R c = Qᵗy`.
pub fn fit_qr(a: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    let aug = augment(a);
    let (q, r) = qr_decomposition(&aug)?;
    let qty = q.transpose() * y;
    back_substitute(&r, &qty)
}

fn validate(a: &DMatrix<f64>, y: &DVector<f64>) -> Result<(), RegressionError> {
    if a.nrows() == 0 {
        return Err(RegressionError::EmptyInput);
    }
    if a.nrows() != y.len() {
        return Err(RegressionError::ShapeMismatch {
            context: "predictor/response sample count",
            expected: a.nrows(),
            actual: y.len(),
        });
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(RegressionError::NonFinite("predictor data"));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(RegressionError::NonFinite("response data"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn line_data() -> (DMatrix<f64>, DVector<f64>) {
        let a = DMatrix::from_column_slice(5, 1, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 6.0, 8.0, 10.0]);
        (a, y)
    }

    #[test]
    fn augment_appends_trailing_ones() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let aug = augment(&a);
        assert_eq!(aug.shape(), (2, 3));
        assert_eq!(aug.column(2).iter().copied().collect::<Vec<_>>(), vec![1.0, 1.0]);
        assert_eq!(aug[(1, 0)], 3.0);
    }

    #[test]
    fn every_method_recovers_exact_line() {
        let (a, y) = line_data();
        for method in Method::ALL {
            let c = solve(method, &a, &y).unwrap();
            assert_eq!(c.len(), 2);
            let (slope, intercept) = split_coefficients(&c).unwrap();
            assert!((slope[0] - 2.0).abs() < 1e-9, "{method:?} slope {}", slope[0]);
            assert!(intercept.abs() < 1e-9, "{method:?} intercept {intercept}");
        }
    }

    #[test]
    fn methods_agree_on_random_well_conditioned_input() {
        let mut rng = StdRng::seed_from_u64(42);
        let (n, k) = (60, 4);
        let a = DMatrix::from_fn(n, k, |_, _| rng.gen_range(-3.0..3.0));
        let truth = DVector::from_row_slice(&[1.5, -2.0, 0.25, 3.0]);
        let noise = DVector::from_fn(n, |_, _| rng.gen_range(-0.1..0.1));
        let y = &a * &truth + DVector::from_element(n, 7.0) + noise;

        let reference = solve(Method::Lstsq, &a, &y).unwrap();
        for method in [Method::Normal, Method::Qr] {
            let c = solve(method, &a, &y).unwrap();
            assert_eq!(c.len(), k + 1);
            for (got, want) in c.iter().zip(reference.iter()) {
                let scale = want.abs().max(1.0);
                assert!(
                    (got - want).abs() <= 1e-8 * scale,
                    "{method:?}: {got} vs {want}"
                );
            }
        }
        // Intercept sits in the last slot for every method.
        assert!((reference[k] - 7.0).abs() < 0.1);
    }

    #[test]
    fn normal_equations_fail_where_least_squares_succeeds() {
        // Second predictor duplicates the first.
        let a = DMatrix::from_row_slice(5, 2, &[
            1.0, 1.0, //
            2.0, 2.0, //
            3.0, 3.0, //
            4.0, 4.0, //
            5.0, 5.0,
        ]);
        let y = DVector::from_row_slice(&[3.0, 5.0, 7.0, 9.0, 11.0]);

        assert!(solve(Method::Lstsq, &a, &y).is_ok());
        assert!(matches!(
            solve(Method::Normal, &a, &y),
            Err(RegressionError::SingularMatrix { .. })
        ));
        assert_eq!(
            solve(Method::Qr, &a, &y).unwrap_err(),
            RegressionError::RankDeficient { column: 1 }
        );
    }

    #[test]
    fn sample_count_mismatch_is_rejected() {
        let a = DMatrix::<f64>::zeros(4, 1);
        let y = DVector::<f64>::zeros(3);
        for method in Method::ALL {
            assert_eq!(
                solve(method, &a, &y).unwrap_err(),
                RegressionError::ShapeMismatch {
                    context: "predictor/response sample count",
                    expected: 4,
                    actual: 3,
                }
            );
        }
    }

    #[test]
    fn empty_and_non_finite_inputs_are_rejected() {
        let a = DMatrix::<f64>::zeros(0, 1);
        let y = DVector::<f64>::zeros(0);
        assert_eq!(solve(Method::Qr, &a, &y).unwrap_err(), RegressionError::EmptyInput);

        let (a, mut y) = line_data();
        y[2] = f64::NAN;
        assert_eq!(
            solve(Method::Lstsq, &a, &y).unwrap_err(),
            RegressionError::NonFinite("response data")
        );
    }

    #[test]
    fn split_puts_last_element_in_intercept() {
        let c = DVector::from_row_slice(&[0.5, -1.0, 3.0]);
        let (slope, intercept) = split_coefficients(&c).unwrap();
        assert_eq!(slope.as_slice(), &[0.5, -1.0]);
        assert_eq!(intercept, 3.0);
    }
}

//! Fitted regression state.
//!
//! `LinearRegression` holds everything one fit produces: variable names,
//! polynomial degree, the design matrix and response it was fitted on, the
//! coefficients, and the fit statistics.
//!
//! A fit builds a complete new record and swaps it in only once every step has
//! succeeded, so a failed fit never leaves a mix of old and new fields behind.
//! `initialize` is the one exception to "fit sets everything": it lets callers
//! restore saved coefficients without data.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::data::DataSource;
use crate::domain::Method;
use crate::error::RegressionError;
use crate::fit::{solve, split_coefficients};
use crate::math::{polynomial_matrix, polynomial_value};
use crate::models::metrics;

/// Fitted (or initialized) regression model.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    ind_vars: Vec<String>,
    dep_var: Option<String>,
    degree: usize,
    a: Option<DMatrix<f64>>,
    y: Option<DVector<f64>>,
    slope: Option<DVector<f64>>,
    intercept: Option<f64>,
    residuals: Option<DVector<f64>>,
    r2: Option<f64>,
    mse: Option<f64>,
}

/// Fields for `LinearRegression::initialize`. Only `Some` values are applied.
#[derive(Debug, Clone, Default)]
pub struct ModelInit {
    pub ind_vars: Option<Vec<String>>,
    pub dep_var: Option<String>,
    /// Either a column (k × 1) or a row (1 × k) of slope coefficients.
    pub slope: Option<DMatrix<f64>>,
    pub intercept: Option<f64>,
    pub degree: Option<usize>,
}

/// Fitted curve sampled at evenly spaced predictor values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionLine {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self {
            ind_vars: Vec::new(),
            dep_var: None,
            degree: 1,
            a: None,
            y: None,
            slope: None,
            intercept: None,
            residuals: None,
            r2: None,
            mse: None,
        }
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit `dep_var` on one or more predictors selected from `data`.
    ///
    /// Returns the augmented coefficient vector (slopes, then intercept).
    pub fn linear_regression<D: DataSource + ?Sized>(
        &mut self,
        data: &D,
        ind_vars: &[&str],
        dep_var: &str,
        method: Method,
    ) -> Result<DVector<f64>, RegressionError> {
        let a = data.select_data(ind_vars)?;
        let y = response_column(data, dep_var)?;
        self.fit_matrices(ind_vars, dep_var, a, y, 1, method)
    }

    /// Fit a degree-`degree` polynomial of a single predictor.
    pub fn poly_regression<D: DataSource + ?Sized>(
        &mut self,
        data: &D,
        ind_var: &str,
        dep_var: &str,
        degree: usize,
        method: Method,
    ) -> Result<DVector<f64>, RegressionError> {
        let a = data.select_data(&[ind_var])?;
        let y = response_column(data, dep_var)?;
        self.fit_matrices(&[ind_var], dep_var, a, y, degree, method)
    }

    /// Fit on matrices the caller already holds.
    ///
    /// `a` is the raw predictor matrix; when `degree > 1` it must have a single
    /// column, which is expanded to `x, x², ..., x^degree` before solving.
    pub fn fit_matrices(
        &mut self,
        ind_vars: &[&str],
        dep_var: &str,
        a: DMatrix<f64>,
        y: DVector<f64>,
        degree: usize,
        method: Method,
    ) -> Result<DVector<f64>, RegressionError> {
        if degree == 0 {
            return Err(RegressionError::InvalidDegree(degree));
        }
        let design = if degree > 1 {
            if a.ncols() != 1 {
                return Err(RegressionError::MultiplePredictors(a.ncols()));
            }
            polynomial_matrix(&a.column(0).clone_owned(), degree)?
        } else {
            a
        };

        let c = solve(method, &design, &y)?;
        let (slope, intercept) = split_coefficients(&c)?;

        let mut next = Self {
            ind_vars: ind_vars.iter().map(|s| s.to_string()).collect(),
            dep_var: Some(dep_var.to_string()),
            degree,
            a: Some(design),
            y: Some(y),
            slope: Some(slope),
            intercept: Some(intercept),
            residuals: None,
            r2: None,
            mse: None,
        };

        let y_pred = next.predict(None)?;
        let residuals = next.compute_residuals(&y_pred)?;
        next.r2 = Some(next.r_squared(&y_pred)?);
        next.mse = Some(metrics::mse(&residuals)?);
        next.residuals = Some(residuals);

        log::debug!(
            "fitted {} ~ {:?} (degree {degree}): R^2={:?}",
            dep_var,
            ind_vars,
            next.r2
        );

        *self = next;
        Ok(c)
    }

    /// Predict `X · slope + intercept`.
    ///
    /// With `x = None` the stored design matrix is used. A supplied `x` must
    /// already be in design form (polynomial-expanded for `degree > 1`) and
    /// have one column per slope coefficient.
    pub fn predict(&self, x: Option<&DMatrix<f64>>) -> Result<DVector<f64>, RegressionError> {
        let slope = self.slope.as_ref().ok_or(RegressionError::NotFitted("slope"))?;
        let intercept = self.intercept.ok_or(RegressionError::NotFitted("intercept"))?;
        let x = match x {
            Some(x) => x,
            None => self.a.as_ref().ok_or(RegressionError::NotFitted("design matrix"))?,
        };

        if x.ncols() != slope.len() {
            return Err(RegressionError::ShapeMismatch {
                context: "prediction input columns",
                expected: slope.len(),
                actual: x.ncols(),
            });
        }
        Ok((x * slope).add_scalar(intercept))
    }

    /// Predict from raw values of the single predictor, expanding them to the
    /// model's polynomial degree first.
    pub fn predict_values(&self, x: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
        let design = polynomial_matrix(x, self.degree)?;
        self.predict(Some(&design))
    }

    /// Observed minus predicted response, using the stored response.
    pub fn compute_residuals(&self, y_pred: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
        let y = self.y.as_ref().ok_or(RegressionError::NotFitted("response vector"))?;
        metrics::residuals(y, y_pred)
    }

    /// R² of `y_pred` against the stored response.
    pub fn r_squared(&self, y_pred: &DVector<f64>) -> Result<f64, RegressionError> {
        let y = self.y.as_ref().ok_or(RegressionError::NotFitted("response vector"))?;
        metrics::r_squared(y, y_pred)
    }

    /// Mean squared error, recomputed from the current coefficients.
    pub fn compute_mse(&self) -> Result<f64, RegressionError> {
        let y_pred = self.predict(None)?;
        let residuals = self.compute_residuals(&y_pred)?;
        metrics::mse(&residuals)
    }

    /// Overwrite the supplied fields without fitting.
    ///
    /// Everything is validated before anything is written.
    pub fn initialize(&mut self, init: ModelInit) -> Result<(), RegressionError> {
        let slope = init.slope.map(slope_vector).transpose()?;
        if init.degree == Some(0) {
            return Err(RegressionError::InvalidDegree(0));
        }

        if let Some(ind_vars) = init.ind_vars {
            self.ind_vars = ind_vars;
        }
        if let Some(dep_var) = init.dep_var {
            self.dep_var = Some(dep_var);
        }
        if let Some(slope) = slope {
            self.slope = Some(slope);
        }
        if let Some(intercept) = init.intercept {
            self.intercept = Some(intercept);
        }
        if let Some(degree) = init.degree {
            self.degree = degree;
        }
        Ok(())
    }

    /// Sample the fitted curve between the smallest and largest observed
    /// value of the (linear) predictor.
    pub fn line(&self, samples: usize) -> Result<RegressionLine, RegressionError> {
        let a = self.a.as_ref().ok_or(RegressionError::NotFitted("design matrix"))?;
        if a.nrows() == 0 || a.ncols() == 0 {
            return Err(RegressionError::EmptyInput);
        }
        let x = a.column(0);
        self.line_between(x.min(), x.max(), samples)
    }

    /// Sample the fitted curve on `[x_min, x_max]`.
    ///
    /// Only single-predictor models (linear or polynomial) have a line.
    pub fn line_between(&self, x_min: f64, x_max: f64, samples: usize) -> Result<RegressionLine, RegressionError> {
        let slope = self.slope.as_ref().ok_or(RegressionError::NotFitted("slope"))?;
        let intercept = self.intercept.ok_or(RegressionError::NotFitted("intercept"))?;
        if slope.len() != self.degree {
            return Err(RegressionError::MultiplePredictors(slope.len()));
        }

        let n = samples.max(2);
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for i in 0..n {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            xs.push(x);
            ys.push(polynomial_value(x, slope.as_slice(), intercept));
        }
        Ok(RegressionLine { x: xs, y: ys })
    }

    pub fn ind_vars(&self) -> &[String] {
        &self.ind_vars
    }

    pub fn dep_var(&self) -> Option<&str> {
        self.dep_var.as_deref()
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Design matrix of the last fit (polynomial-expanded when `degree > 1`).
    pub fn a(&self) -> Option<&DMatrix<f64>> {
        self.a.as_ref()
    }

    pub fn y(&self) -> Option<&DVector<f64>> {
        self.y.as_ref()
    }

    /// Slope coefficients as a column vector, one per design column.
    pub fn slope(&self) -> Option<&DVector<f64>> {
        self.slope.as_ref()
    }

    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }

    pub fn residuals(&self) -> Option<&DVector<f64>> {
        self.residuals.as_ref()
    }

    pub fn r2(&self) -> Option<f64> {
        self.r2
    }

    pub fn mse(&self) -> Option<f64> {
        self.mse
    }
}

fn response_column<D: DataSource + ?Sized>(data: &D, dep_var: &str) -> Result<DVector<f64>, RegressionError> {
    let m = data.select_data(&[dep_var])?;
    if m.ncols() != 1 {
        return Err(RegressionError::ShapeMismatch {
            context: "response columns",
            expected: 1,
            actual: m.ncols(),
        });
    }
    Ok(m.column(0).clone_owned())
}

/// Accept a slope given as either a column or a row and store it as a column.
fn slope_vector(m: DMatrix<f64>) -> Result<DVector<f64>, RegressionError> {
    if m.ncols() == 1 || m.nrows() == 1 {
        Ok(DVector::from_iterator(m.len(), m.iter().copied()))
    } else {
        Err(RegressionError::ShapeMismatch {
            context: "slope (row or column vector)",
            expected: 1,
            actual: m.nrows().min(m.ncols()),
        })
    }
}

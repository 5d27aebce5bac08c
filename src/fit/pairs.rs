//! Pairwise simple regressions across a set of variables.
//!
//! For variables `v_0 .. v_{n-1}` the grid holds, at `(row, col)`, the fit of
//! `v_row ~ v_col` (row = dependent, column = independent), matching the
//! layout of a scatter-plot matrix: x axis per column, y axis per row.
//!
//! Every cell is an independent model, so cells are fitted in parallel. A cell
//! that cannot be fitted (e.g. a constant variable has no R²) keeps its error
//! instead of failing the whole grid.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::data::DataSource;
use crate::domain::Method;
use crate::error::RegressionError;
use crate::models::LinearRegression;

/// Result of one `dep_var ~ ind_var` regression.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFit {
    pub ind_var: String,
    pub dep_var: String,
    pub slope: f64,
    pub intercept: f64,
    pub r2: f64,
}

/// `n × n` grid of pairwise fits, stored row-major.
#[derive(Debug, Clone)]
pub struct PairGrid {
    pub vars: Vec<String>,
    pub cells: Vec<Result<PairFit, RegressionError>>,
}

impl PairGrid {
    pub fn size(&self) -> usize {
        self.vars.len()
    }

    /// Fit of `vars[row] ~ vars[col]`.
    pub fn get(&self, row: usize, col: usize) -> Option<&Result<PairFit, RegressionError>> {
        let n = self.size();
        if row < n && col < n {
            self.cells.get(row * n + col)
        } else {
            None
        }
    }
}

/// Fit every ordered pair of `vars`.
///
/// The columns are selected once and shared by all cells. Unknown variable
/// names fail the whole call; numerical failures are recorded per cell.
pub fn pair_regressions<D: DataSource + ?Sized>(
    data: &D,
    vars: &[&str],
    method: Method,
) -> Result<PairGrid, RegressionError> {
    if vars.is_empty() {
        return Err(RegressionError::EmptyInput);
    }
    let columns = data.select_data(vars)?;

    let n = vars.len();
    let cells: Vec<Result<PairFit, RegressionError>> = (0..n * n)
        .into_par_iter()
        .map(|idx| {
            let (row, col) = (idx / n, idx % n);
            let fit = fit_pair(&columns, vars, col, row, method);
            if let Err(err) = &fit {
                log::warn!("pair {} ~ {} not fitted: {err}", vars[row], vars[col]);
            }
            fit
        })
        .collect();

    Ok(PairGrid {
        vars: vars.iter().map(|s| s.to_string()).collect(),
        cells,
    })
}

fn fit_pair(
    columns: &DMatrix<f64>,
    vars: &[&str],
    ind: usize,
    dep: usize,
    method: Method,
) -> Result<PairFit, RegressionError> {
    let mut model = LinearRegression::new();
    model.fit_matrices(
        &[vars[ind]],
        vars[dep],
        columns.columns(ind, 1).into_owned(),
        columns.column(dep).into_owned(),
        1,
        method,
    )?;

    let slope = model
        .slope()
        .and_then(|s| s.as_slice().first().copied())
        .ok_or(RegressionError::NotFitted("slope"))?;
    let intercept = model.intercept().ok_or(RegressionError::NotFitted("intercept"))?;
    let r2 = model.r2().ok_or(RegressionError::NotFitted("R^2"))?;

    Ok(PairFit {
        ind_var: vars[ind].to_string(),
        dep_var: vars[dep].to_string(),
        slope,
        intercept,
        r2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dataset() -> Dataset {
        Dataset::from_columns(vec![
            ("x", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            ("y", vec![3.0, 5.0, 7.0, 9.0, 11.0, 13.0]),
            ("z", vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0]),
            ("c", vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn grid_layout_is_dependent_by_independent() {
        let grid = pair_regressions(&dataset(), &["x", "y", "z"], Method::Qr).unwrap();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.cells.len(), 9);

        // Row 1 (y) regressed on column 0 (x): y = 2x + 1.
        let fit = grid.get(1, 0).unwrap().as_ref().unwrap();
        assert_eq!(fit.dep_var, "y");
        assert_eq!(fit.ind_var, "x");
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!((fit.r2 - 1.0).abs() < 1e-9);

        assert!(grid.get(3, 0).is_none());
    }

    #[test]
    fn diagonal_is_a_perfect_fit_and_r2_is_symmetric() {
        let grid = pair_regressions(&dataset(), &["x", "y", "z"], Method::Lstsq).unwrap();
        for i in 0..3 {
            let diag = grid.get(i, i).unwrap().as_ref().unwrap();
            assert!((diag.r2 - 1.0).abs() < 1e-9);
            for j in 0..3 {
                let a = grid.get(i, j).unwrap().as_ref().unwrap().r2;
                let b = grid.get(j, i).unwrap().as_ref().unwrap().r2;
                assert!((a - b).abs() < 1e-9, "R^2({i},{j}) != R^2({j},{i})");
            }
        }
    }

    #[test]
    fn constant_variable_fails_only_its_cells() {
        let grid = pair_regressions(&dataset(), &["x", "c"], Method::Lstsq).unwrap();
        assert!(grid.get(0, 0).unwrap().is_ok());
        // c as the response: zero variance.
        assert_eq!(
            grid.get(1, 0).unwrap().as_ref().unwrap_err(),
            &RegressionError::ZeroVariance
        );
        // x on a constant predictor: [c | 1] is rank deficient, which SVD
        // still solves, but the fit explains nothing.
        let fit = grid.get(0, 1).unwrap().as_ref().unwrap();
        assert!(fit.r2.abs() < 1e-9);
    }

    #[test]
    fn columns_are_selected_once_for_the_whole_grid() {
        struct CountingSource {
            inner: Dataset,
            calls: AtomicUsize,
        }

        impl DataSource for CountingSource {
            fn select_data(&self, names: &[&str]) -> Result<DMatrix<f64>, RegressionError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.inner.select_data(names)
            }
        }

        let source = CountingSource {
            inner: dataset(),
            calls: AtomicUsize::new(0),
        };
        let grid = pair_regressions(&source, &["x", "y", "z"], Method::Qr).unwrap();
        assert_eq!(grid.cells.len(), 9);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_variable_fails_the_grid() {
        let err = pair_regressions(&dataset(), &["x", "nope"], Method::Lstsq).unwrap_err();
        assert_eq!(err, RegressionError::UnknownVariable("nope".to_string()));
        assert_eq!(
            pair_regressions(&dataset(), &[], Method::Lstsq).unwrap_err(),
            RegressionError::EmptyInput
        );
    }
}

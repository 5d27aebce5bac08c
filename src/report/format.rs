//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use nalgebra::DVector;

use crate::domain::Method;
use crate::fit::PairGrid;
use crate::models::LinearRegression;

/// Format the fit summary: variables, method, coefficients, statistics.
pub fn format_fit_summary(model: &LinearRegression, method: Method) -> String {
    let mut out = String::new();

    out.push_str("=== linreg - regression fit ===\n");
    out.push_str(&format!(
        "Model: {} ~ {}\n",
        model.dep_var().unwrap_or("?"),
        model.ind_vars().join(" + ")
    ));
    out.push_str(&format!("Method: {}\n", method.display_name()));
    out.push_str(&format!("Degree: {}\n", model.degree()));
    if let Some(a) = model.a() {
        out.push_str(&format!("Samples: n={} | design columns={}\n", a.nrows(), a.ncols()));
    }

    out.push_str("\nCoefficients:\n");
    if let Some(slope) = model.slope() {
        for (j, &b) in slope.iter().enumerate() {
            out.push_str(&format!("  {:<20} {b:>14.6}\n", term_label(model, j)));
        }
    }
    if let Some(b0) = model.intercept() {
        out.push_str(&format!("  {:<20} {b0:>14.6}\n", "(intercept)"));
    }

    out.push_str("\nFit quality:\n");
    out.push_str(&format!("  R^2 = {}\n", fmt_opt(model.r2())));
    out.push_str(&format!("  MSE = {}\n", fmt_opt(model.mse())));

    out
}

/// Format the R² matrix of a pairwise grid (rows = dependent variable).
pub fn format_pair_grid(grid: &PairGrid) -> String {
    let mut out = String::new();
    out.push_str("R^2 by pair (row ~ column):\n");

    out.push_str(&format!("{:<12}", ""));
    for v in &grid.vars {
        out.push_str(&format!(" {:>10}", truncate(v, 10)));
    }
    out.push('\n');

    for (row, dep) in grid.vars.iter().enumerate() {
        out.push_str(&format!("{:<12}", truncate(dep, 12)));
        for col in 0..grid.size() {
            let cell = match grid.get(row, col) {
                Some(Ok(fit)) => format!("{:.5}", fit.r2),
                _ => "--".to_string(),
            };
            out.push_str(&format!(" {cell:>10}"));
        }
        out.push('\n');
    }

    out.push_str("\nFitted lines:\n");
    for fit in grid.cells.iter().flatten().filter(|f| f.dep_var != f.ind_var) {
        let sign = if fit.intercept < 0.0 { '-' } else { '+' };
        out.push_str(&format!(
            "  {} = {:.6} * {} {sign} {:.6}\n",
            fit.dep_var,
            fit.slope,
            fit.ind_var,
            fit.intercept.abs()
        ));
    }

    out
}

/// Format predictions, with observed values and residuals when available.
pub fn format_predictions(y_pred: &DVector<f64>, y_obs: Option<&DVector<f64>>) -> String {
    let mut out = String::new();
    match y_obs {
        Some(_) => out.push_str(&format!("{:>6} {:>14} {:>14} {:>14}\n", "row", "predicted", "observed", "residual")),
        None => out.push_str(&format!("{:>6} {:>14}\n", "row", "predicted")),
    }

    for (i, &p) in y_pred.iter().enumerate() {
        match y_obs.and_then(|y| y.get(i)) {
            Some(&o) => out.push_str(&format!("{i:>6} {p:>14.6} {o:>14.6} {:>14.6}\n", o - p)),
            None => out.push_str(&format!("{i:>6} {p:>14.6}\n")),
        }
    }

    out
}

/// Name of design column `j`: the predictor itself, or `x^k` for polynomial terms.
fn term_label(model: &LinearRegression, j: usize) -> String {
    let vars = model.ind_vars();
    if model.degree() > 1 {
        let base = vars.first().map(String::as_str).unwrap_or("x");
        if j == 0 {
            base.to_string()
        } else {
            format!("{base}^{}", j + 1)
        }
    } else {
        vars.get(j).cloned().unwrap_or_else(|| format!("x{j}"))
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.6}")).unwrap_or_else(|| "n/a".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

//! Shared "fit pipeline" logic behind the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dataset load -> variable selection -> fit -> statistics
//!
//! The commands can then focus on presentation (printing, plotting, saving).

use nalgebra::DVector;

use crate::data::{DataSource, Dataset};
use crate::domain::FitConfig;
use crate::error::{AppError, RegressionError};
use crate::io::ModelFile;
use crate::models::{LinearRegression, metrics};

/// All computed outputs of a single `linreg fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub model: LinearRegression,
}

/// Predictions of a saved model against a dataset.
#[derive(Debug, Clone)]
pub struct PredictOutput {
    pub y_pred: DVector<f64>,
    /// Response column, when the dataset has one.
    pub y_obs: Option<DVector<f64>>,
    pub r2: Option<f64>,
    pub mse: Option<f64>,
}

/// Execute the fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let dataset = Dataset::from_csv(&config.data_path)?;
    let model = fit_dataset(&dataset, config)?;
    Ok(RunOutput { dataset, model })
}

/// Fit the configured model on an already loaded dataset.
pub fn fit_dataset<D: DataSource + ?Sized>(data: &D, config: &FitConfig) -> Result<LinearRegression, AppError> {
    let ind_vars: Vec<&str> = config.ind_vars.iter().map(String::as_str).collect();
    let mut model = LinearRegression::new();

    if config.degree > 1 {
        let [ind_var] = ind_vars.as_slice() else {
            return Err(RegressionError::MultiplePredictors(ind_vars.len()).into());
        };
        model.poly_regression(data, ind_var, &config.dep_var, config.degree, config.method)?;
    } else {
        model.linear_regression(data, &ind_vars, &config.dep_var, config.method)?;
    }
    Ok(model)
}

/// Apply a saved model to a dataset.
///
/// Statistics are reported only when the dataset also holds the model's
/// response variable and it is not constant.
pub fn run_predict(saved: &ModelFile, dataset: &Dataset) -> Result<PredictOutput, AppError> {
    let model = saved.to_model()?;
    let ind_vars: Vec<&str> = model.ind_vars().iter().map(String::as_str).collect();
    if ind_vars.is_empty() {
        return Err(AppError::new(3, "Model file names no predictor variables."));
    }

    let x = dataset.select_data(&ind_vars)?;
    let y_pred = if model.degree() > 1 {
        model.predict_values(&x.column(0).clone_owned())?
    } else {
        model.predict(Some(&x))?
    };

    let y_obs = match model.dep_var() {
        Some(dep) if dataset.has_variable(dep) => Some(dataset.select_data(&[dep])?.column(0).clone_owned()),
        _ => None,
    };
    let (r2, mse) = match &y_obs {
        Some(y) => {
            let r2 = match metrics::r_squared(y, &y_pred) {
                Ok(v) => Some(v),
                Err(RegressionError::ZeroVariance) => None,
                Err(err) => return Err(err.into()),
            };
            let mse = Some(metrics::mse(&metrics::residuals(y, &y_pred)?)?);
            (r2, mse)
        }
        None => (None, None),
    };

    Ok(PredictOutput { y_pred, y_obs, r2, mse })
}

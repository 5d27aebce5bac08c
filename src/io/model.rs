//! Read/write model JSON files.
//!
//! A model file is the portable representation of a fit:
//! - variable names and polynomial degree
//! - slope coefficients and intercept
//! - fit statistics from the run that produced it
//! - a precomputed regression line for quick plotting (single-predictor models)
//!
//! Reading a file back goes through `LinearRegression::initialize`, so a
//! restored model can predict without refitting.

use std::fs::File;
use std::path::Path;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::domain::Method;
use crate::error::{AppError, RegressionError};
use crate::models::{LinearRegression, ModelInit, RegressionLine};

/// Points sampled along the saved regression line.
const LINE_SAMPLES: usize = 101;

/// A saved model file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub ind_vars: Vec<String>,
    pub dep_var: Option<String>,
    pub degree: usize,
    pub method: Option<Method>,
    pub slope: Vec<f64>,
    pub intercept: f64,
    pub r2: Option<f64>,
    pub mse: Option<f64>,
    pub line: Option<RegressionLine>,
}

impl ModelFile {
    /// Capture a fitted (or initialized) model.
    pub fn from_model(model: &LinearRegression, method: Option<Method>) -> Result<Self, RegressionError> {
        let slope = model.slope().ok_or(RegressionError::NotFitted("slope"))?;
        let intercept = model.intercept().ok_or(RegressionError::NotFitted("intercept"))?;

        Ok(Self {
            tool: "linreg".to_string(),
            ind_vars: model.ind_vars().to_vec(),
            dep_var: model.dep_var().map(str::to_string),
            degree: model.degree(),
            method,
            slope: slope.iter().copied().collect(),
            intercept,
            r2: model.r2(),
            mse: model.mse(),
            line: model.line(LINE_SAMPLES).ok(),
        })
    }

    /// Rebuild a model that can predict, without data or refitting.
    pub fn to_model(&self) -> Result<LinearRegression, RegressionError> {
        let mut model = LinearRegression::new();
        model.initialize(ModelInit {
            ind_vars: Some(self.ind_vars.clone()),
            dep_var: self.dep_var.clone(),
            slope: Some(DMatrix::from_column_slice(self.slope.len(), 1, &self.slope)),
            intercept: Some(self.intercept),
            degree: Some(self.degree),
        })?;
        Ok(model)
    }
}

/// Write a model JSON file.
pub fn write_model_json(path: &Path, model: &LinearRegression, method: Option<Method>) -> Result<(), AppError> {
    let saved = ModelFile::from_model(model, method)?;
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create model JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &saved)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;

    log::info!("saved model to {}", path.display());
    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let saved: ModelFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;
    Ok(saved)
}

//! Command-line parsing for the regression tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.
//!
//! Flags marked with an `env` name can also be set from the environment or a
//! `.env` file in the working directory.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Method;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "linreg", version, about = "Linear and polynomial regression (lstsq / normal / QR)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a linear or polynomial regression and print diagnostics.
    Fit(FitArgs),
    /// Fit every pair of variables and print the R² grid.
    Pairs(PairsArgs),
    /// Predict with a saved model file.
    Predict(PredictArgs),
}

/// Options for `linreg fit`.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Dataset CSV (header row, optional type row).
    #[arg(short = 'd', long, env = "LINREG_DATA")]
    pub data: PathBuf,

    /// Predictor variable(s). Repeat or comma-separate for multiple regression.
    #[arg(short = 'x', long = "x", required = true, value_delimiter = ',')]
    pub ind_vars: Vec<String>,

    /// Response variable.
    #[arg(short = 'y', long = "y")]
    pub dep_var: String,

    /// Solving strategy.
    #[arg(short = 'm', long, value_enum, env = "LINREG_METHOD", default_value_t = Method::Lstsq)]
    pub method: Method,

    /// Polynomial degree (single predictor only when > 1).
    #[arg(short = 'p', long, default_value_t = 1)]
    pub degree: usize,

    /// Disable the terminal scatter plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, env = "LINREG_PLOT_WIDTH", default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, env = "LINREG_PLOT_HEIGHT", default_value_t = 20)]
    pub height: usize,

    /// Save the fitted model to JSON.
    #[arg(long, value_name = "JSON")]
    pub save: Option<PathBuf>,
}

/// Options for `linreg pairs`.
#[derive(Debug, Parser)]
pub struct PairsArgs {
    /// Dataset CSV.
    #[arg(short = 'd', long, env = "LINREG_DATA")]
    pub data: PathBuf,

    /// Variables to include (comma-separated or repeated).
    #[arg(long = "vars", required = true, value_delimiter = ',')]
    pub vars: Vec<String>,

    /// Solving strategy.
    #[arg(short = 'm', long, value_enum, env = "LINREG_METHOD", default_value_t = Method::Lstsq)]
    pub method: Method,
}

/// Options for `linreg predict`.
#[derive(Debug, Parser)]
pub struct PredictArgs {
    /// Model JSON produced by `linreg fit --save`.
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// Dataset CSV holding the model's predictor column(s).
    #[arg(short = 'd', long, env = "LINREG_DATA")]
    pub data: PathBuf,
}

//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` defaults
//! - parses CLI arguments
//! - runs the fit / pairs / predict pipelines
//! - prints reports and plots
//! - writes optional model exports

use clap::Parser;

use crate::cli::{Command, FitArgs, PairsArgs, PredictArgs};
use crate::data::Dataset;
use crate::domain::FitConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `linreg` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` values become defaults for the flags that declare an `env` name.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Pairs(args) => handle_pairs(args),
        Command::Predict(args) => handle_predict(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!("{}", crate::report::format_fit_summary(&run.model, config.method));

    // Only single-predictor models have a line to draw.
    if config.plot && config.ind_vars.len() == 1 {
        let plot = crate::plot::render_model_scatter(&run.model, config.plot_width, config.plot_height)?;
        println!("{plot}");
    }

    if let Some(path) = &config.save_model {
        crate::io::write_model_json(path, &run.model, Some(config.method))?;
    }

    Ok(())
}

fn handle_pairs(args: PairsArgs) -> Result<(), AppError> {
    let dataset = Dataset::from_csv(&args.data)?;
    let vars: Vec<&str> = args.vars.iter().map(String::as_str).collect();
    let grid = crate::fit::pair_regressions(&dataset, &vars, args.method)?;

    println!("{}", crate::report::format_pair_grid(&grid));
    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let saved = crate::io::read_model_json(&args.model)?;
    let dataset = Dataset::from_csv(&args.data)?;
    let out = pipeline::run_predict(&saved, &dataset)?;

    println!("{}", crate::report::format_predictions(&out.y_pred, out.y_obs.as_ref()));
    if let Some(mse) = out.mse {
        let r2 = out
            .r2
            .map(|v| format!("{v:.6}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!("R^2 = {r2}\nMSE = {mse:.6}");
    }
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        data_path: args.data.clone(),
        ind_vars: args.ind_vars.clone(),
        dep_var: args.dep_var.clone(),
        method: args.method,
        degree: args.degree,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        save_model: args.save.clone(),
    }
}

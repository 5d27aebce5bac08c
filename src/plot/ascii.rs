//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks of a fit in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted regression line/curve: `-`

use crate::error::RegressionError;
use crate::models::{LinearRegression, RegressionLine};

/// Render the observed data of a single-predictor model with its fitted curve.
///
/// The header carries the variable names and R².
pub fn render_model_scatter(model: &LinearRegression, width: usize, height: usize) -> Result<String, RegressionError> {
    let a = model.a().ok_or(RegressionError::NotFitted("design matrix"))?;
    let y = model.y().ok_or(RegressionError::NotFitted("response vector"))?;
    let line = model.line(width.max(2))?;

    let x: Vec<f64> = a.column(0).iter().copied().collect();
    let y: Vec<f64> = y.iter().copied().collect();

    let x_name = model.ind_vars().first().map(String::as_str).unwrap_or("x");
    let y_name = model.dep_var().unwrap_or("y");
    let r2 = model
        .r2()
        .map(|v| format!("{v:.4}"))
        .unwrap_or_else(|| "n/a".to_string());

    let mut out = format!("{y_name} ~ {x_name} (degree {}) | R^2={r2}\n", model.degree());
    out.push_str(&render_scatter(&x, &y, Some(&line), width, height));
    Ok(out)
}

/// Render points and an optional line on a `width × height` character grid.
pub fn render_scatter(
    x: &[f64],
    y: &[f64],
    line: Option<&RegressionLine>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    let curve: Option<Vec<(f64, f64)>> =
        line.map(|l| l.x.iter().copied().zip(l.y.iter().copied()).collect());

    let (x_min, x_max) = range(points.iter().map(|p| p.0))
        .or_else(|| curve.as_ref().and_then(|c| range(c.iter().map(|p| p.0))))
        .unwrap_or((0.0, 1.0));
    let ys = points
        .iter()
        .map(|p| p.1)
        .chain(curve.iter().flatten().map(|p| p.1));
    let (y_min, y_max) = range(ys).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw curve first (so points can overlay).
    if let Some(curve) = &curve {
        draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);
    }

    for &(px, py) in &points {
        if !(px.is_finite() && py.is_finite()) {
            continue;
        }
        let gx = map_x(px, x_min, x_max, width);
        let gy = map_y(py, y_min, y_max, height);
        grid[gy][gx] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Finite min/max of a sequence, if it spans a non-empty interval.
fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let gx = map_x(x, x_min, x_max, width);
        let gy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, gx, gy, '-');
        } else {
            grid[gy][gx] = '-';
        }
        prev = Some((gx, gy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

//! Named-column numeric datasets.
//!
//! The regression core only ever asks a dataset for "these columns, by name"
//! (`DataSource::select_data`). `Dataset` is the in-memory implementation,
//! loadable from CSV.
//!
//! CSV conventions:
//! - the first row holds variable names
//! - an optional second row may declare column types (`numeric`, `string`,
//!   `enum`, `date`); only `numeric` columns are kept
//! - without a type row, a column is numeric if most of its values parse as
//!   `f64`
//! - a blank or unparseable value in a numeric column is an error

use std::fs::File;
use std::io::Read;
use std::path::Path;

use nalgebra::DMatrix;

use crate::error::{AppError, RegressionError};

const TYPE_NAMES: [&str; 4] = ["numeric", "string", "enum", "date"];

/// Something the fitter can pull named columns from.
pub trait DataSource {
    /// Return the named variables as columns of a new matrix, in the order
    /// requested. The result is a copy; callers may mutate it freely.
    fn select_data(&self, names: &[&str]) -> Result<DMatrix<f64>, RegressionError>;
}

/// In-memory table of numeric variables (rows = samples).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    data: DMatrix<f64>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, data: DMatrix<f64>) -> Result<Self, RegressionError> {
        if headers.len() != data.ncols() {
            return Err(RegressionError::ShapeMismatch {
                context: "dataset headers",
                expected: data.ncols(),
                actual: headers.len(),
            });
        }
        Ok(Self { headers, data })
    }

    /// Build a dataset from `(name, values)` pairs of equal length.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self, RegressionError> {
        let n = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut headers = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(n * columns.len());
        for (name, col) in columns {
            if col.len() != n {
                return Err(RegressionError::ShapeMismatch {
                    context: "dataset column length",
                    expected: n,
                    actual: col.len(),
                });
            }
            headers.push(name.into());
            values.extend(col);
        }
        let data = DMatrix::from_column_slice(n, headers.len(), &values);
        Self::new(headers, data)
    }

    /// Load a CSV file.
    pub fn from_csv(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::new(2, format!("Failed to open dataset '{}': {e}", path.display())))?;
        let dataset = Self::from_reader(file)?;
        log::info!(
            "loaded {} samples x {} variables from {}",
            dataset.num_samples(),
            dataset.headers.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parse CSV text from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| AppError::new(2, format!("Failed to read CSV header: {e}")))?
            .iter()
            .map(|h| h.to_string())
            .collect();
        if headers.is_empty() {
            return Err(AppError::new(2, "CSV has no header row."));
        }

        let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| AppError::new(2, format!("Invalid CSV row: {e}")))?;
            // Line 1 is the header.
            let line = record.position().map(|p| p.line() as usize).unwrap_or(i + 2);
            rows.push((line, record.iter().map(|s| s.to_string()).collect()));
        }

        let declared_types = match rows.first() {
            Some((_, first)) if is_type_row(first) => Some(rows.remove(0).1),
            _ => None,
        };

        let keep: Vec<usize> = match &declared_types {
            Some(types) => (0..headers.len())
                .filter(|&j| types.get(j).is_some_and(|t| t.eq_ignore_ascii_case("numeric")))
                .collect(),
            // Mostly-numeric columns are kept; their bad cells fail by line below.
            None => (0..headers.len())
                .filter(|&j| {
                    let parsed = rows
                        .iter()
                        .filter(|(_, r)| r.get(j).is_some_and(|v| v.parse::<f64>().is_ok()))
                        .count();
                    rows.is_empty() || parsed * 2 > rows.len()
                })
                .collect(),
        };
        for (j, name) in headers.iter().enumerate() {
            if !keep.contains(&j) {
                log::warn!("skipping non-numeric column '{name}'");
            }
        }

        let n = rows.len();
        let mut values = Vec::with_capacity(n * keep.len());
        for &j in &keep {
            for (line, row) in &rows {
                let raw = row.get(j).map(String::as_str).unwrap_or("");
                let v: f64 = raw.parse().map_err(|_| {
                    AppError::new(
                        2,
                        format!("Line {line}: column '{}' has non-numeric value '{raw}'.", headers[j]),
                    )
                })?;
                values.push(v);
            }
        }

        let kept_headers: Vec<String> = keep.iter().map(|&j| headers[j].clone()).collect();
        let data = DMatrix::from_column_slice(n, kept_headers.len(), &values);
        Self::new(kept_headers, data).map_err(AppError::from)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn num_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}

impl DataSource for Dataset {
    fn select_data(&self, names: &[&str]) -> Result<DMatrix<f64>, RegressionError> {
        let idx = names
            .iter()
            .map(|&name| {
                self.column_index(name)
                    .ok_or_else(|| RegressionError::UnknownVariable(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DMatrix::from_fn(self.data.nrows(), idx.len(), |r, c| {
            self.data[(r, idx[c])]
        }))
    }
}

fn is_type_row(row: &[String]) -> bool {
    !row.is_empty()
        && row
            .iter()
            .all(|cell| TYPE_NAMES.iter().any(|t| cell.eq_ignore_ascii_case(t)))
}

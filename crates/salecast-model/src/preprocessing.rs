//! Column transformer applied between the record table and the model.
//!
//! Numeric columns are imputed and standardized with a per-column
//! mean/std `Scaler`; categorical columns are imputed and one-hot encoded
//! against the categories seen at fit time. The output matrix lays out the
//! scaled numeric columns first, then one indicator block per categorical
//! column, both in fitted order.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InferenceError;
use crate::frame::{value_kind, Frame};
use crate::math::Array2;

/// Simple standard scaler (per-column mean/std).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl Scaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f32 = 1e-6;

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// Fit a `Scaler` from an `Array2<f32>` where rows are samples and
/// columns are features. An empty matrix yields the identity scaler.
pub fn fit_scaler(x: &Array2<f32>) -> Scaler {
    let (nrows, ncols) = x.shape();
    if nrows == 0 {
        return Scaler {
            mean: vec![0.0; ncols],
            std: vec![1.0; ncols],
        };
    }

    let mut mean = vec![0.0f32; ncols];
    for r in 0..nrows {
        for c in 0..ncols {
            mean[c] += x[(r, c)];
        }
    }
    let nrows_f = nrows as f32;
    for v in mean.iter_mut() {
        *v /= nrows_f;
    }

    let mut var = vec![0.0f32; ncols];
    for r in 0..nrows {
        for c in 0..ncols {
            let d = x[(r, c)] - mean[c];
            var[c] += d * d;
        }
    }
    for v in var.iter_mut() {
        *v = (*v / nrows_f).sqrt().max(Scaler::MIN_STD);
    }

    Scaler { mean, std: var }
}

/// Transform all rows using the provided `Scaler` and return a new `Array2<f32>`.
pub fn transform_all(x: &Array2<f32>, sc: &Scaler) -> Result<Array2<f32>, InferenceError> {
    let (nrows, ncols) = x.shape();
    if sc.len() != ncols {
        return Err(InferenceError::FeatureCount {
            expected: sc.len(),
            found: ncols,
        });
    }

    let mut out = Vec::with_capacity(nrows * ncols);
    for r in 0..nrows {
        for c in 0..ncols {
            let v = (x[(r, c)] - sc.mean[c]) / sc.std[c].max(Scaler::MIN_STD);
            out.push(v);
        }
    }

    Ok(Array2::from_shape_vec((nrows, ncols), out)?)
}

/// What to do with a categorical value that was not seen at fit time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Encode as an all-zero indicator block.
    Ignore,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    /// Replacement for missing or null cells. `None` makes them an error.
    #[serde(default)]
    pub fill_value: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub fill_value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub numeric: Vec<NumericColumn>,
    pub scaler: Scaler,
    pub categorical: Vec<CategoricalColumn>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

impl Preprocessor {
    /// Fit imputation values, the scaler and the category vocabularies.
    ///
    /// Numeric columns are imputed with the median, categorical columns with
    /// the most frequent value (ties go to the lexicographically smallest).
    pub fn fit<S: AsRef<str>>(
        frame: &Frame,
        numeric: &[S],
        categorical: &[S],
        handle_unknown: HandleUnknown,
    ) -> Result<Self, InferenceError> {
        if frame.nrows() == 0 {
            return Err(InferenceError::EmptyTable);
        }

        let mut numeric_columns = Vec::with_capacity(numeric.len());
        for name in numeric.iter().map(|n| n.as_ref()) {
            if !frame.has_column(name) {
                return Err(InferenceError::MissingColumn(name.to_string()));
            }
            let mut observed = frame
                .column(name)
                .map(|cell| numeric_value(name, cell))
                .filter_map(Result::transpose)
                .collect::<Result<Vec<f32>, _>>()?;
            observed.sort_by(f32::total_cmp);
            numeric_columns.push(NumericColumn {
                name: name.to_string(),
                fill_value: median(&observed),
            });
        }

        let mut categorical_columns = Vec::with_capacity(categorical.len());
        for name in categorical.iter().map(|n| n.as_ref()) {
            if !frame.has_column(name) {
                return Err(InferenceError::MissingColumn(name.to_string()));
            }
            let mut counts: HashMap<String, usize> = HashMap::new();
            for cell in frame.column(name) {
                if let Some(value) = category_value(name, cell)? {
                    *counts.entry(value).or_default() += 1;
                }
            }
            let categories: BTreeSet<String> = counts.keys().cloned().collect();
            let fill_value = categories
                .iter()
                .max_by(|a, b| counts[*a].cmp(&counts[*b]).then_with(|| b.cmp(a)))
                .cloned();
            categorical_columns.push(CategoricalColumn {
                name: name.to_string(),
                categories: categories.into_iter().collect(),
                fill_value,
            });
        }

        let mut preprocessor = Preprocessor {
            numeric: numeric_columns,
            scaler: Scaler {
                mean: Vec::new(),
                std: Vec::new(),
            },
            categorical: categorical_columns,
            handle_unknown,
        };
        let imputed = preprocessor.impute_numeric(frame)?;
        preprocessor.scaler = fit_scaler(&imputed);
        Ok(preprocessor)
    }

    /// Column names the transformer was fitted with, numeric first.
    pub fn feature_names_in(&self) -> Vec<&str> {
        self.numeric
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.categorical.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// Width of the matrix produced by `transform`.
    pub fn n_features_out(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(|c| c.categories.len()).sum::<usize>()
    }

    /// Transform a frame whose columns are exactly `feature_names_in()`.
    pub fn transform(&self, frame: &Frame) -> Result<Array2<f32>, InferenceError> {
        let expected = self.feature_names_in();
        if frame.columns().iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(InferenceError::ColumnMismatch {
                expected: expected.into_iter().map(str::to_string).collect(),
                found: frame.columns().to_vec(),
            });
        }

        let scaled = transform_all(&self.impute_numeric(frame)?, &self.scaler)?;

        let nrows = frame.nrows();
        let n_numeric = self.numeric.len();
        let mut out = Array2::from_elem((nrows, self.n_features_out()), 0.0f32);
        for r in 0..nrows {
            for c in 0..n_numeric {
                out[(r, c)] = scaled[(r, c)];
            }
        }

        let mut offset = n_numeric;
        for column in &self.categorical {
            let name = column.name.as_str();
            for (r, cell) in frame.column(name).enumerate() {
                let value = match category_value(name, cell)? {
                    Some(value) => value,
                    None => column
                        .fill_value
                        .clone()
                        .ok_or_else(|| InferenceError::MissingValue {
                            column: name.to_string(),
                        })?,
                };
                match column.categories.iter().position(|c| *c == value) {
                    Some(idx) => out[(r, offset + idx)] = 1.0,
                    None if self.handle_unknown == HandleUnknown::Ignore => {}
                    None => {
                        return Err(InferenceError::UnknownCategory {
                            column: name.to_string(),
                            value,
                        })
                    }
                }
            }
            offset += column.categories.len();
        }

        Ok(out)
    }

    fn impute_numeric(&self, frame: &Frame) -> Result<Array2<f32>, InferenceError> {
        let nrows = frame.nrows();
        let mut x = Array2::from_elem((nrows, self.numeric.len()), 0.0f32);
        for (c, column) in self.numeric.iter().enumerate() {
            let name = column.name.as_str();
            for (r, cell) in frame.column(name).enumerate() {
                x[(r, c)] = match numeric_value(name, cell)? {
                    Some(v) => v,
                    None => column.fill_value.ok_or_else(|| InferenceError::MissingValue {
                        column: name.to_string(),
                    })?,
                };
            }
        }
        Ok(x)
    }
}

/// Numeric reading of a cell. `Ok(None)` means missing (absent, null or NaN).
fn numeric_value(column: &str, cell: Option<&Value>) -> Result<Option<f32>, InferenceError> {
    let v = match cell {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(|f| f as f32),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) => match s.trim().parse::<f32>() {
            Ok(f) => Some(f),
            Err(_) => {
                return Err(InferenceError::NotNumeric {
                    column: column.to_string(),
                    value: format!("'{}'", s),
                })
            }
        },
        Some(other) => {
            return Err(InferenceError::UnsupportedValue {
                column: column.to_string(),
                kind: value_kind(other),
            })
        }
    };
    Ok(v.filter(|f| !f.is_nan()))
}

/// Category string for a cell. Numbers and booleans use their JSON text.
fn category_value(column: &str, cell: Option<&Value>) -> Result<Option<String>, InferenceError> {
    match cell {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
        Some(other) => Err(InferenceError::UnsupportedValue {
            column: column.to_string(),
            kind: value_kind(other),
        }),
    }
}

fn median(sorted: &[f32]) -> Option<f32> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

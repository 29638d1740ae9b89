//! Columnar view over a batch of schema-less JSON records.
//!
//! Each record becomes one row. The column set is the union of the keys seen
//! across all records, in first-seen order; a key that a given record lacks
//! is simply a missing cell for that row.
use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::InferenceError;

/// One input record: feature name to scalar value.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Frame {
    pub fn from_records(rows: Vec<Record>) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }
        Frame { columns, rows }
    }

    /// Build a frame from decoded JSON values. Every element must be an object.
    pub fn from_values(values: Vec<Value>) -> Result<Self, InferenceError> {
        let rows = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(record) => Ok(record),
                other => Err(InferenceError::MalformedRecord {
                    index,
                    kind: value_kind(&other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_records(rows))
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Names from `required` that are not columns of this frame, in the
    /// order they appear in `required`. Only presence is checked; a column
    /// whose cells are all null still counts as present.
    pub fn missing_columns<S: AsRef<str>>(&self, required: &[S]) -> Vec<String> {
        required
            .iter()
            .map(|n| n.as_ref())
            .filter(|name| !self.has_column(name))
            .map(str::to_string)
            .collect()
    }

    /// Project onto exactly `names`, in that order. Extra columns are dropped.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Frame, InferenceError> {
        if let Some(absent) = names.iter().map(|n| n.as_ref()).find(|n| !self.has_column(n)) {
            return Err(InferenceError::MissingColumn(absent.to_string()));
        }

        let columns: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
                    .collect::<Record>()
            })
            .collect();

        Ok(Frame { columns, rows })
    }

    /// Cell lookup; `None` when the row lacks the key.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a Value>> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }
}

/// Short JSON type name used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

use std::path::PathBuf;

use thiserror::Error;

use crate::math::ShapeError;

/// Failures while loading, validating or writing an artifact bundle.
///
/// These are startup errors: a service that hits one must not start serving.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write artifact {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize artifact: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("inconsistent artifact: {0}")]
    Inconsistent(String),

    #[error("failed to build artifact: {0}")]
    Build(#[from] InferenceError),
}

/// Request-shape problems detected before any inference runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("No JSON payload provided")]
    NoPayload,

    #[error("Invalid JSON format. Must be object or list of objects.")]
    InvalidFormat,

    #[error("Missing required features: {0:?}")]
    MissingFeatures(Vec<String>),
}

/// Anything that goes wrong once the request passed validation.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("records must be JSON objects, element {index} is {kind}")]
    MalformedRecord { index: usize, kind: &'static str },

    #[error("column '{0}' is not present in the table")]
    MissingColumn(String),

    #[error("columns {found:?} do not match the columns the preprocessor was fitted with {expected:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("could not convert {value} to float in column '{column}'")]
    NotNumeric { column: String, value: String },

    #[error("unsupported {kind} value in column '{column}'")]
    UnsupportedValue { column: String, kind: &'static str },

    #[error("Input contains NaN in column '{column}'")]
    MissingValue { column: String },

    #[error("Found unknown categories ['{value}'] in column '{column}' during transform")]
    UnknownCategory { column: String, value: String },

    #[error("X has {found} features, but the model is expecting {expected} features as input")]
    FeatureCount { expected: usize, found: usize },

    #[error("model returned {found} predictions for {expected} rows")]
    PredictionCount { expected: usize, found: usize },

    #[error("feature matrix has {rows} rows but {targets} targets were given")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("cannot fit on an empty table")]
    EmptyTable,

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Outcome of running the predict pipeline on a batch of records.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

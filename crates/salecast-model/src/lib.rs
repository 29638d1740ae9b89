//! salecast-model: inference core for the seasonal sale-prediction service.
//!
//! This crate owns everything between a decoded JSON payload and a list of
//! predictions: the artifact bundle (GBDT model, fitted preprocessor and the
//! feature lists), the record table built from request records, the column
//! transformer, and response shaping.
//!
//! The HTTP surface lives in `salecast-cli`; nothing here depends on a web
//! framework so the same pipeline also backs offline batch scoring.
pub mod artifact;
pub mod config;
pub mod error;
/// Sample data and a trained sample artifact for tests and smoke runs.
#[doc(hidden)]
pub mod fixtures;
pub mod frame;
pub mod inference;
pub mod math;
pub mod models;
pub mod preprocessing;

pub use artifact::Artifact;
pub use error::{ArtifactError, InferenceError, PredictError, RequestError};
pub use frame::{Frame, Record};
pub use inference::{PredictionBatch, PredictionRecord, PASSTHROUGH_FIELDS};

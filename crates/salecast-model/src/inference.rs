//! The predict pipeline: payload → records → table → validate → transform →
//! predict → response records.
use serde::Serialize;
use serde_json::Value;

use crate::artifact::Artifact;
use crate::error::{PredictError, RequestError};
use crate::frame::Frame;
use crate::models::RegressorModel;

/// Input fields echoed back next to the prediction when a record carries them.
pub const PASSTHROUGH_FIELDS: [&str; 3] = ["Product ID", "Name", "season"];

/// One output row. Passthrough fields are omitted when the input row lacked them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub prediction: f64,
    #[serde(rename = "Product ID", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Value>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionBatch {
    pub n_samples: usize,
    pub results: Vec<PredictionRecord>,
}

/// Decode a request body. An empty body, invalid JSON and a literal `null`
/// all count as "no payload".
pub fn parse_payload(body: &[u8]) -> Result<Value, RequestError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) | Err(_) => Err(RequestError::NoPayload),
        Ok(value) => Ok(value),
    }
}

/// A single object is a batch of one; an array is the batch itself.
pub fn records_from_payload(payload: Value) -> Result<Vec<Value>, RequestError> {
    match payload {
        Value::Object(record) => Ok(vec![Value::Object(record)]),
        Value::Array(records) => Ok(records),
        _ => Err(RequestError::InvalidFormat),
    }
}

impl Artifact {
    /// Run the whole pipeline on a batch of decoded records.
    ///
    /// Missing feature columns are reported before any inference happens.
    /// Only column presence is checked: a null cell is handed to the
    /// preprocessor, which imputes it or fails.
    pub fn predict(&self, records: Vec<Value>) -> Result<PredictionBatch, PredictError> {
        let frame = Frame::from_values(records)?;

        let missing = frame.missing_columns(self.feature_order());
        if !missing.is_empty() {
            return Err(RequestError::MissingFeatures(missing).into());
        }

        let x = self.preprocessor().transform(&frame.select(self.feature_order())?)?;
        let predictions = self.model().predict(&x)?;
        log::debug!(
            "predicted {} rows with {} model",
            predictions.len(),
            self.model().name()
        );

        let results: Vec<PredictionRecord> = predictions
            .into_iter()
            .zip(frame.rows())
            .map(|(y_hat, row)| PredictionRecord {
                prediction: f64::from(y_hat),
                product_id: row.get(PASSTHROUGH_FIELDS[0]).cloned(),
                name: row.get(PASSTHROUGH_FIELDS[1]).cloned(),
                season: row.get(PASSTHROUGH_FIELDS[2]).cloned(),
            })
            .collect();

        Ok(PredictionBatch {
            n_samples: results.len(),
            results,
        })
    }
}

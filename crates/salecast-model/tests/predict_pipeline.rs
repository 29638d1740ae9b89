//! End-to-end tests of the predict pipeline on the sample artifact.

use serde_json::{json, Value};

use salecast_model::fixtures::{sample_artifact, sample_record, sample_sales};
use salecast_model::preprocessing::HandleUnknown;
use salecast_model::{InferenceError, PredictError, RequestError};

fn without(mut record: Value, key: &str) -> Value {
    record.as_object_mut().unwrap().remove(key);
    record
}

#[test]
fn single_record_yields_one_prediction() {
    let artifact = sample_artifact(HandleUnknown::Error).unwrap();
    let batch = artifact.predict(vec![sample_record()]).unwrap();

    assert_eq!(batch.n_samples, 1);
    assert_eq!(batch.results.len(), 1);
    assert!(batch.results[0].prediction.is_finite());
    assert_eq!(batch.results[0].product_id, Some(json!(123)));
    assert_eq!(batch.results[0].season, Some(json!("Spring")));
}

#[test]
fn batch_preserves_order() {
    let artifact = sample_artifact(HandleUnknown::Error).unwrap();
    let (records, _) = sample_sales();
    let ids: Vec<Value> = records.iter().map(|r| r["Product ID"].clone()).collect();

    let batch = artifact.predict(records).unwrap();
    assert_eq!(batch.n_samples, ids.len());
    let echoed: Vec<Value> = batch
        .results
        .iter()
        .map(|r| r.product_id.clone().unwrap())
        .collect();
    assert_eq!(echoed, ids);
}

#[test]
fn model_separates_high_and_low_volume_rows() {
    let artifact = sample_artifact(HandleUnknown::Error).unwrap();
    let (records, targets) = sample_sales();
    let batch = artifact.predict(records).unwrap();

    // row 6 has the largest volume in the training set, row 7 the smallest
    assert!(targets[6] > targets[7]);
    assert!(
        batch.results[6].prediction > batch.results[7].prediction,
        "{:?}",
        batch.results
    );
}

#[test]
fn missing_feature_is_reported_without_inference() {
    let artifact = sample_artifact(HandleUnknown::Error).unwrap();
    let err = artifact
        .predict(vec![without(sample_record(), "Rating")])
        .unwrap_err();
    match err {
        PredictError::Request(RequestError::MissingFeatures(missing)) => {
            assert_eq!(missing, vec!["Rating"])
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn feature_present_in_any_row_counts_as_present() {
    let artifact = sample_artifact(HandleUnknown::Error).unwrap();
    // the column exists through the first row, the second row imputes it
    let batch = artifact
        .predict(vec![sample_record(), without(sample_record(), "Rating")])
        .unwrap();
    assert_eq!(batch.n_samples, 2);
}

#[test]
fn unknown_category_fails_inference() {
    let artifact = sample_artifact(HandleUnknown::Error).unwrap();
    let mut record = sample_record();
    record["Section"] = json!("KIDS");

    let err = artifact.predict(vec![record]).unwrap_err();
    assert!(matches!(
        err,
        PredictError::Inference(InferenceError::UnknownCategory { .. })
    ));
}

#[test]
fn unknown_category_is_ignored_when_configured() {
    let artifact = sample_artifact(HandleUnknown::Ignore).unwrap();
    let mut record = sample_record();
    record["Section"] = json!("KIDS");
    assert_eq!(artifact.predict(vec![record]).unwrap().n_samples, 1);
}

#[test]
fn empty_batch_reports_every_feature_missing() {
    let artifact = sample_artifact(HandleUnknown::Error).unwrap();
    match artifact.predict(Vec::new()).unwrap_err() {
        PredictError::Request(RequestError::MissingFeatures(missing)) => {
            assert_eq!(missing, artifact.feature_order())
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn predictions_are_deterministic() {
    let artifact = sample_artifact(HandleUnknown::Error).unwrap();
    let first = artifact.predict(vec![sample_record()]).unwrap();
    let second = artifact.predict(vec![sample_record()]).unwrap();
    assert_eq!(first, second);
}

//! Deterministic sample sales and a small artifact trained on them.
//!
//! Used by the test suites of this workspace and for local smoke runs of
//! the service; real artifacts come from the training pipeline.
use serde_json::{json, Value};

use crate::artifact::Artifact;
use crate::config::ModelConfig;
use crate::error::ArtifactError;
use crate::frame::Frame;
use crate::models::GBDTRegressor;
use crate::preprocessing::{HandleUnknown, Preprocessor};

pub const NUMERIC_FEATURES: [&str; 6] = [
    "Price",
    "Rating",
    "Time_year",
    "Time_month",
    "Time_day",
    "Time_dayofweek",
];

pub const CATEGORICAL_FEATURES: [&str; 5] =
    ["Promotion", "Product Category", "Seasonal", "Terms", "Section"];

/// One fully populated request record, including every passthrough field.
pub fn sample_record() -> Value {
    json!({
        "Product ID": 123,
        "Name": "Linen Wrap Dress",
        "Price": 29.99,
        "Rating": 4.5,
        "Time_year": 2025,
        "Time_month": 3,
        "Time_day": 21,
        "Time_dayofweek": 4,
        "Promotion": "Yes",
        "Product Category": "Tops",
        "Seasonal": "Spring",
        "Terms": "Standard",
        "Section": "WOMAN",
        "season": "Spring"
    })
}

/// Training rows and their sales volumes.
pub fn sample_sales() -> (Vec<Value>, Vec<f32>) {
    let rows = [
        // price, rating, y, m, d, dow, promo, category, seasonal, terms, section, season, volume
        (29.99, 4.5, 2024, 3, 21, 3, "Yes", "Tops", "Spring", "Standard", "WOMAN", "Spring", 1450.0),
        (49.90, 3.9, 2024, 6, 14, 4, "No", "Dresses", "Summer", "Standard", "WOMAN", "Summer", 980.0),
        (19.50, 4.1, 2024, 7, 2, 1, "Yes", "Tops", "Summer", "Premium", "MAN", "Summer", 1720.0),
        (89.00, 4.8, 2024, 11, 29, 4, "Yes", "Coats", "Winter", "Premium", "WOMAN", "Autumn", 2300.0),
        (75.00, 3.2, 2024, 12, 10, 1, "No", "Coats", "Winter", "Standard", "MAN", "Winter", 640.0),
        (39.95, 4.0, 2025, 1, 15, 2, "No", "Trousers", "Winter", "Standard", "MAN", "Winter", 870.0),
        (24.99, 4.6, 2025, 4, 8, 1, "Yes", "Dresses", "Spring", "Premium", "WOMAN", "Spring", 1910.0),
        (59.00, 2.8, 2025, 5, 30, 4, "No", "Trousers", "Spring", "Standard", "MAN", "Spring", 410.0),
        (34.50, 4.3, 2025, 8, 19, 1, "Yes", "Dresses", "Summer", "Standard", "WOMAN", "Summer", 1580.0),
        (99.00, 4.7, 2025, 10, 3, 4, "No", "Coats", "Autumn", "Premium", "WOMAN", "Autumn", 1230.0),
        (15.99, 3.5, 2025, 9, 12, 4, "Yes", "Tops", "Autumn", "Standard", "MAN", "Autumn", 1340.0),
        (44.00, 4.2, 2025, 2, 27, 3, "No", "Trousers", "Winter", "Premium", "WOMAN", "Winter", 1050.0),
    ];

    let mut records = Vec::with_capacity(rows.len());
    let mut targets = Vec::with_capacity(rows.len());
    for (i, (price, rating, y, m, d, dow, promo, category, seasonal, terms, section, season, volume)) in
        rows.into_iter().enumerate()
    {
        records.push(json!({
            "Product ID": 1000 + i,
            "Name": format!("{} #{}", category, i),
            "Price": price,
            "Rating": rating,
            "Time_year": y,
            "Time_month": m,
            "Time_day": d,
            "Time_dayofweek": dow,
            "Promotion": promo,
            "Product Category": category,
            "Seasonal": seasonal,
            "Terms": terms,
            "Section": section,
            "season": season,
        }));
        targets.push(volume);
    }
    (records, targets)
}

/// Fit the preprocessor and a GBDT regressor on `sample_sales()`.
pub fn sample_artifact(handle_unknown: HandleUnknown) -> Result<Artifact, ArtifactError> {
    let (records, targets) = sample_sales();
    let frame = Frame::from_values(records)?;

    let numeric: Vec<String> = NUMERIC_FEATURES.iter().map(|s| s.to_string()).collect();
    let categorical: Vec<String> = CATEGORICAL_FEATURES.iter().map(|s| s.to_string()).collect();
    let feature_order: Vec<&str> = NUMERIC_FEATURES
        .iter()
        .chain(CATEGORICAL_FEATURES.iter())
        .copied()
        .collect();

    let training = frame.select(&feature_order)?;
    let preprocessor = Preprocessor::fit(&training, &numeric, &categorical, handle_unknown)?;
    let x = preprocessor.transform(&training)?;
    let model = GBDTRegressor::fit(&x, &targets, &ModelConfig::new(0.2, 3, 40))?;

    Artifact::new(model, preprocessor, numeric, categorical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegressorModel;

    #[test]
    fn sample_artifact_is_consistent() {
        let artifact = sample_artifact(HandleUnknown::Error).unwrap();
        assert_eq!(artifact.feature_order().len(), 11);
        assert_eq!(artifact.feature_order()[0], "Price");
        assert_eq!(artifact.feature_order()[6], "Promotion");
        assert_eq!(
            artifact.model().n_features(),
            artifact.preprocessor().n_features_out()
        );
    }

    #[test]
    fn sample_record_has_every_feature() {
        let record = sample_record();
        for name in NUMERIC_FEATURES.iter().chain(CATEGORICAL_FEATURES.iter()) {
            assert!(record.get(name).is_some(), "sample record lacks {}", name);
        }
    }
}

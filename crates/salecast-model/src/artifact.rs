//! The model bundle loaded once at startup.
//!
//! On disk the artifact is a single JSON document with the members `model`,
//! `preprocessor`, `numeric_features` and `categorical_features`. Loading
//! checks that the bundle is self-consistent so that a broken artifact stops
//! the process before it serves anything.
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;
use crate::models::{GBDTRegressor, RegressorModel};
use crate::preprocessing::Preprocessor;

#[derive(Debug)]
pub struct Artifact {
    model: GBDTRegressor,
    preprocessor: Preprocessor,
    numeric_features: Vec<String>,
    categorical_features: Vec<String>,
    feature_order: Vec<String>,
}

#[derive(Deserialize)]
struct Bundle {
    model: GBDTRegressor,
    preprocessor: Preprocessor,
    numeric_features: Vec<String>,
    categorical_features: Vec<String>,
}

#[derive(Serialize)]
struct BundleRef<'a> {
    model: &'a GBDTRegressor,
    preprocessor: &'a Preprocessor,
    numeric_features: &'a [String],
    categorical_features: &'a [String],
}

impl Artifact {
    pub fn new(
        model: GBDTRegressor,
        preprocessor: Preprocessor,
        numeric_features: Vec<String>,
        categorical_features: Vec<String>,
    ) -> Result<Self, ArtifactError> {
        let feature_order: Vec<String> = numeric_features
            .iter()
            .chain(categorical_features.iter())
            .cloned()
            .collect();

        if feature_order.is_empty() {
            return Err(ArtifactError::Inconsistent(
                "artifact lists no features".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = feature_order.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(ArtifactError::Inconsistent(format!(
                "feature '{}' is listed more than once",
                dup
            )));
        }

        let fitted = preprocessor.feature_names_in();
        if fitted.iter().copied().ne(feature_order.iter().map(String::as_str)) {
            return Err(ArtifactError::Inconsistent(format!(
                "preprocessor was fitted with {:?} but the feature order is {:?}",
                fitted, feature_order
            )));
        }

        if preprocessor.scaler.len() != preprocessor.numeric.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "scaler has {} columns for {} numeric features",
                preprocessor.scaler.len(),
                preprocessor.numeric.len()
            )));
        }

        if preprocessor.n_features_out() != model.n_features() {
            return Err(ArtifactError::Inconsistent(format!(
                "preprocessor produces {} columns but the model expects {}",
                preprocessor.n_features_out(),
                model.n_features()
            )));
        }

        Ok(Artifact {
            model,
            preprocessor,
            numeric_features,
            categorical_features,
            feature_order,
        })
    }

    /// Read and validate an artifact from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bundle: Bundle = serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let artifact = Artifact::new(
            bundle.model,
            bundle.preprocessor,
            bundle.numeric_features,
            bundle.categorical_features,
        )?;
        log::info!(
            "Loaded artifact {:?}: {} numeric + {} categorical features, {} model inputs",
            path,
            artifact.numeric_features.len(),
            artifact.categorical_features.len(),
            artifact.model.n_features()
        );
        Ok(artifact)
    }

    pub fn to_json(&self) -> Result<String, ArtifactError> {
        serde_json::to_string(&BundleRef {
            model: &self.model,
            preprocessor: &self.preprocessor,
            numeric_features: &self.numeric_features,
            categorical_features: &self.categorical_features,
        })
        .map_err(ArtifactError::Serialize)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ArtifactError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn model(&self) -> &GBDTRegressor {
        &self.model
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn numeric_features(&self) -> &[String] {
        &self.numeric_features
    }

    pub fn categorical_features(&self) -> &[String] {
        &self.categorical_features
    }

    /// Numeric feature names followed by categorical feature names.
    pub fn feature_order(&self) -> &[String] {
        &self.feature_order
    }
}

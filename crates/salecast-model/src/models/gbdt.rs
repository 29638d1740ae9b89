use std::fmt;

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::InferenceError;
use crate::math::Array2;
use crate::models::regressor_trait::RegressorModel;

/// Gradient Boosting Decision Tree (GBDT) regressor.
///
/// Serialized inside the artifact as `{"n_features": .., "booster": ..}`
/// where `booster` is the gbdt-rs model.
#[derive(Serialize, Deserialize)]
pub struct GBDTRegressor {
    n_features: usize,
    booster: GBDT,
}

impl GBDTRegressor {
    pub fn fit(x: &Array2<f32>, y: &[f32], params: &ModelConfig) -> Result<Self, InferenceError> {
        if x.nrows() != y.len() {
            return Err(InferenceError::LengthMismatch {
                rows: x.nrows(),
                targets: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(InferenceError::EmptyTable);
        }

        let feature_size = x.ncols();
        let mut config = Config::new();
        config.set_feature_size(feature_size);
        config.set_shrinkage(params.learning_rate);
        config.set_max_depth(params.max_depth);
        config.set_iterations(params.num_boost_round as usize);
        config.set_debug(params.debug);
        config.set_training_optimization_level(params.training_optimization_level);
        config.set_loss(&params.loss_type);

        let mut booster = GBDT::new(&config);

        let mut train_x = DataVec::new();
        for (row, &target) in x.rows().zip(y) {
            train_x.push(Data::new_training_data(row.to_vec(), 1.0, target, None));
        }

        booster.fit(&mut train_x);
        log::debug!(
            "fitted GBDT regressor on {} rows x {} features",
            x.nrows(),
            feature_size
        );

        Ok(GBDTRegressor {
            n_features: feature_size,
            booster,
        })
    }
}

impl RegressorModel for GBDTRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f32>, InferenceError> {
        if x.ncols() != self.n_features {
            return Err(InferenceError::FeatureCount {
                expected: self.n_features,
                found: x.ncols(),
            });
        }

        let mut test_x = DataVec::new();
        for row in x.rows() {
            test_x.push(Data::new_training_data(row.to_vec(), 1.0, 0.0, None));
        }
        let predictions = self.booster.predict(&test_x);

        if predictions.len() != x.nrows() {
            return Err(InferenceError::PredictionCount {
                expected: x.nrows(),
                found: predictions.len(),
            });
        }
        Ok(predictions)
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}

impl fmt::Debug for GBDTRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GBDTRegressor")
            .field("n_features", &self.n_features)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_set() -> (Array2<f32>, Vec<f32>) {
        // y = 10 * x0 + 1, x1 is noise
        let x = Array2::from_shape_vec(
            (8, 2),
            vec![
                0.0, 0.3, 1.0, 0.1, 2.0, 0.7, 3.0, 0.2, 4.0, 0.9, 5.0, 0.4, 6.0, 0.6, 7.0, 0.5,
            ],
        )
        .unwrap();
        let y = (0..8).map(|i| 10.0 * i as f32 + 1.0).collect();
        (x, y)
    }

    #[test]
    fn test_gbdt_regressor_tracks_target() {
        let (x, y) = training_set();
        let model = GBDTRegressor::fit(&x, &y, &ModelConfig::new(0.3, 3, 50)).unwrap();

        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions.len(), 8);
        assert!(
            predictions[7] > predictions[0],
            "predictions should increase with x0: {:?}",
            predictions
        );
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.name(), "gbdt");
    }

    #[test]
    fn predict_rejects_wrong_width() {
        let (x, y) = training_set();
        let model = GBDTRegressor::fit(&x, &y, &ModelConfig::new(0.3, 3, 5)).unwrap();
        let narrow = Array2::from_shape_vec((1, 1), vec![1.0]).unwrap();
        let err = model.predict(&narrow).unwrap_err();
        assert_eq!(
            err.to_string(),
            "X has 1 features, but the model is expecting 2 features as input"
        );
    }

    #[test]
    fn fit_rejects_mismatched_targets() {
        let (x, _) = training_set();
        assert!(matches!(
            GBDTRegressor::fit(&x, &[1.0, 2.0], &ModelConfig::default()),
            Err(InferenceError::LengthMismatch { rows: 8, targets: 2 })
        ));
    }

    #[test]
    fn survives_json_round_trip() {
        let (x, y) = training_set();
        let model = GBDTRegressor::fit(&x, &y, &ModelConfig::new(0.3, 3, 10)).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: GBDTRegressor = serde_json::from_str(&json).unwrap();
        assert_eq!(model.predict(&x).unwrap(), restored.predict(&x).unwrap());
    }
}

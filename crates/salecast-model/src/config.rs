use serde::{Deserialize, Serialize};

/// Hyper-parameters for fitting a `GBDTRegressor`.
///
/// Artifacts are trained elsewhere; this is used to build fixture models.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub learning_rate: f32,
    pub max_depth: u32,
    pub num_boost_round: u32,
    pub debug: bool,
    pub training_optimization_level: u8,
    /// gbdt-rs loss name, e.g. `SquaredError` or `LAD`.
    pub loss_type: String,
}

impl ModelConfig {
    pub fn new(learning_rate: f32, max_depth: u32, num_boost_round: u32) -> Self {
        Self {
            learning_rate,
            max_depth,
            num_boost_round,
            ..Self::default()
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_depth: 4,
            num_boost_round: 50,
            debug: false,
            training_optimization_level: 2,
            loss_type: "SquaredError".to_string(),
        }
    }
}

use crate::error::InferenceError;
use crate::math::Array2;

/// Contract between the predict pipeline and a fitted regression model.
pub trait RegressorModel {
    /// Number of input columns the model was trained on.
    fn n_features(&self) -> usize;

    /// One prediction per row of `x`, in row order.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f32>, InferenceError>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "regressor"
    }
}

//! Minimal dense matrix used between the preprocessor and the model.
pub mod matrix;

pub use matrix::{Array2, ShapeError};

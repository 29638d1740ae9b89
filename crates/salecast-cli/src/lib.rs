//! salecast-cli: HTTP inference service and batch scoring for the seasonal
//! sale-prediction model.
pub mod api;
pub mod batch;
pub mod config;

//! Response bodies and the mapping from pipeline errors to HTTP statuses.
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use salecast_model::{InferenceError, PredictError, RequestError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok(service_name: &str) -> Self {
        Self {
            status: "ok".to_string(),
            message: format!("{} is running", service_name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_features: Option<Vec<String>>,
}

/// Every way a request can fail.
///
/// `Request` and `PayloadTooLarge` are caught before inference and answer
/// 400 with their specific message; everything else is the catch-all 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("{0}")]
    Internal(String),
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Request(e) => ApiError::Request(e),
            PredictError::Inference(e) => ApiError::Inference(e),
        }
    }
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Request(RequestError::MissingFeatures(missing)) => ErrorResponse {
                error: "Missing required features".to_string(),
                missing_features: Some(missing.clone()),
            },
            other => ErrorResponse {
                error: other.to_string(),
                missing_features: None,
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Request(_) | ApiError::PayloadTooLarge { .. } => StatusCode::BAD_REQUEST,
            ApiError::Inference(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("predict failed: {}", self);
        } else {
            log::warn!("rejected request: {}", self);
        }
        HttpResponse::build(status).json(ErrorResponse::from(self))
    }
}

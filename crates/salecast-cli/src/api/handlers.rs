//! API request handlers

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use salecast_model::inference::{parse_payload, records_from_payload};

use crate::api::response::{ApiError, HealthResponse};
use crate::api::server::AppState;

/// Liveness probe; never fails once the server is up.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::ok(&state.service_name))
}

/// Score one record or a list of records.
///
/// The body is read as a raw stream so a missing or wrong content type is
/// treated the same as an empty body, and an oversized body still gets a
/// JSON error.
pub async fn predict(
    state: web::Data<AppState>,
    body: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let limit = state.max_payload_bytes;
    let body = body
        .to_bytes_limited(limit)
        .await
        .map_err(|_| ApiError::PayloadTooLarge { limit })?
        .map_err(|e| ApiError::Internal(format!("failed to read request body: {}", e)))?;

    let payload = parse_payload(&body)?;
    let records = records_from_payload(payload)?;
    log::debug!("predict request with {} records", records.len());

    let artifact = Arc::clone(&state.artifact);
    let batch = web::block(move || artifact.predict(records))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(batch))
}

//! HTTP surface: `GET /health` and `POST /predict`.
use actix_web::web;

pub mod handlers;
pub mod response;
pub mod server;

pub use response::ApiError;
pub use server::AppState;

/// Register every route of the service.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/predict", web::post().to(handlers::predict));
}

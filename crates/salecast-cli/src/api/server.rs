//! Application state and server bootstrap.

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use salecast_model::Artifact;

use crate::api::configure_routes;
use crate::config::ServerConfig;

/// Shared, read-only state handed to every worker.
pub struct AppState {
    pub artifact: Arc<Artifact>,
    pub service_name: String,
    /// Largest `/predict` body accepted, in bytes.
    pub max_payload_bytes: usize,
}

impl AppState {
    pub fn new(artifact: Artifact, service_name: impl Into<String>) -> Self {
        Self {
            artifact: Arc::new(artifact),
            service_name: service_name.into(),
            max_payload_bytes: ServerConfig::default().max_payload_bytes,
        }
    }

    pub fn with_payload_limit(mut self, max_payload_bytes: usize) -> Self {
        self.max_payload_bytes = max_payload_bytes;
        self
    }
}

/// Bind and run the HTTP server until it is stopped.
pub async fn run(config: ServerConfig, artifact: Artifact) -> std::io::Result<()> {
    let state = web::Data::new(
        AppState::new(artifact, config.service_name.clone())
            .with_payload_limit(config.max_payload_bytes),
    );

    log::info!(
        "{} listening on {}:{}",
        config.service_name,
        config.host,
        config.port
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server.bind((config.host.as_str(), config.port))?.run().await?;

    log::info!("Server stopped.");
    Ok(())
}

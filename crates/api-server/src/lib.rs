//! REST API server for US identity-document parsing
//!
//! Four multipart upload endpoints, one per document type, each forwarding
//! the uploaded image to the matching remote processor and returning the
//! normalized result record as JSON:
//!
//! - `POST /countries/us/ids/driver-licenses/parse`
//! - `POST /countries/us/ids/passports/parse`
//! - `POST /countries/us/ids/id-proof`
//! - `POST /countries/us/patents/parse`

mod config;
mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use id_doc_docai::{HttpDocumentAi, HttpDocumentAiConfig};
use id_doc_extraction::DocumentService;

pub use config::Config;
pub use handlers::*;

/// API server state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    /// Document parsing service, shared by every request
    pub service: Arc<DocumentService>,
}

impl ApiState {
    /// Create API state backed by the HTTP document processor
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let client = HttpDocumentAi::new(HttpDocumentAiConfig {
            project_id: config.project_id,
            access_token: config.access_token,
            endpoint: config.endpoint,
        });

        Self::with_service(DocumentService::new(Arc::new(client), config.processors))
    }

    /// Create API state around an existing service (used by tests to
    /// substitute a fake processor)
    #[must_use]
    pub fn with_service(service: DocumentService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Document parsing
        .route(
            "/countries/us/ids/driver-licenses/parse",
            post(parse_driver_license),
        )
        .route("/countries/us/ids/passports/parse", post(parse_passport))
        .route("/countries/us/ids/id-proof", post(id_proof))
        .route("/countries/us/patents/parse", post(parse_patent))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server
///
/// # Errors
/// Returns an error when the listener cannot bind or the server fails.
pub async fn start_server(addr: &str, state: ApiState) -> Result<(), std::io::Error> {
    tracing::info!("Starting API server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await
}

//! # Solid Client ID Server
//!
//! The remote-fetch collaborator of the validation engine, as an axum
//! service.
//!
//! ## Endpoint
//!
//! `POST /validate-remote-document?documentIri=<iri>`
//!
//! | outcome | status | body |
//! |---|---|---|
//! | fetched | 200 | `{results, document, documentIri, body}` |
//! | fetch failed | 200 | `{error: {message}, results: null, document: null}` |
//! | `documentIri` missing or empty | 400 | `{error: {message}}` |
//! | any other method | 405 | `{error: {message}}` |
//!
//! The service fetches whatever IRI it is handed, so [`serve`] refuses
//! loopback, private and link-local destinations unless
//! [`ServerConfig::allow_private_networks`] is set.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use solid_clientid_server::{ServerConfig, serve};
//!
//! # async fn run() -> Result<(), solid_clientid_server::ServerError> {
//! serve(ServerConfig::default()).await
//! # }
//! ```

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use solid_clientid::service::{DOCUMENT_IRI_PARAM, VALIDATE_REMOTE_DOCUMENT_PATH};
use solid_clientid::{
    DocumentFetcher, FetchError, FetcherConfig, InProcessValidationService,
    RemoteValidationResponse,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client for fetching documents could not be built
    #[error("Fetcher error: {0}")]
    Fetcher(#[from] FetchError),
}

/// Configuration for [`serve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1:3000`)
    pub bind_address: String,

    /// Answer CORS preflights from any origin
    pub permissive_cors: bool,

    /// Let callers point the service at internal hosts. Only for servers on
    /// a trusted network.
    pub allow_private_networks: bool,

    /// How documents are fetched
    pub fetcher: FetcherConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            permissive_cors: false,
            allow_private_networks: false,
            fetcher: FetcherConfig::default(),
        }
    }
}

impl ServerConfig {
    /// The fetcher configuration [`serve`] runs with.
    pub fn effective_fetcher(&self) -> FetcherConfig {
        FetcherConfig {
            block_private_networks: self.fetcher.block_private_networks
                || !self.allow_private_networks,
            ..self.fetcher.clone()
        }
    }
}

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<InProcessValidationService>,
}

impl AppState {
    pub fn new(service: InProcessValidationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// State with a fetcher built from `config`
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails
    pub fn from_config(config: &FetcherConfig) -> Result<Self, FetchError> {
        let fetcher = DocumentFetcher::with_config(config.clone())?;
        Ok(Self::new(InProcessValidationService::new(fetcher)))
    }
}

#[derive(Debug, Deserialize)]
struct DocumentQuery {
    #[serde(rename = "documentIri")]
    document_iri: Option<String>,
}

/// `{error: {message}}` response with a status code.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": { "message": self.message } });
        (self.status, Json(body)).into_response()
    }
}

async fn validate_remote_document(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<RemoteValidationResponse>, ApiError> {
    let iri = query
        .document_iri
        .map(|iri| iri.trim().to_string())
        .filter(|iri| !iri.is_empty())
        .ok_or_else(|| ApiError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Query parameter {DOCUMENT_IRI_PARAM} is required."),
        })?;

    debug!("Validating remote document {}", iri);
    Ok(Json(state.service.inspect(&iri).await))
}

async fn method_not_allowed() -> ApiError {
    ApiError {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: format!("Only POST is supported on {VALIDATE_REMOTE_DOCUMENT_PATH}."),
    }
}

/// Build the collaborator router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            VALIDATE_REMOTE_DOCUMENT_PATH,
            post(validate_remote_document).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `config.bind_address` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServerError`] if the fetcher cannot be built or the address
/// cannot be bound.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let fetcher = config.effective_fetcher();
    let state = AppState::from_config(&fetcher)?;
    let mut app = router(state);
    if config.permissive_cors {
        app = app.layer(CorsLayer::permissive());
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!("Solid client identifier validation service ready");
    info!("   Listening: {}", listener.local_addr()?);
    info!("   Endpoint: {} (POST)", VALIDATE_REMOTE_DOCUMENT_PATH);
    info!("   User-Agent: {}", fetcher.user_agent);
    if !fetcher.block_private_networks {
        warn!("Private network destinations are allowed");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Validation service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_blocks_private_networks_by_default() {
        assert!(ServerConfig::default().effective_fetcher().block_private_networks);

        let trusted = ServerConfig {
            allow_private_networks: true,
            ..ServerConfig::default()
        };
        assert!(!trusted.effective_fetcher().block_private_networks);

        // a fetcher that already blocks keeps blocking
        let mut explicit = trusted.clone();
        explicit.fetcher.block_private_networks = true;
        assert!(explicit.effective_fetcher().block_private_networks);
    }
}

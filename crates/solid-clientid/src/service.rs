//! # Validation Service
//!
//! The remote engine never fetches documents itself. It asks a
//! [`ValidationService`] to fetch the IRI and run the remote rules, and gets
//! back the findings together with the fetched body.
//!
//! - [`HttpValidationService`] talks to a collaborator over HTTP
//!   (`POST /validate-remote-document?documentIri=...`).
//! - [`InProcessValidationService`] runs the same procedure locally with a
//!   [`DocumentFetcher`]; the collaborator server is built on it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::RuleCatalog;
use crate::document::ClientIdDocument;
use crate::engine::run_rules;
use crate::fetch::{DocumentFetcher, FetchError};
use crate::result::ValidationResult;
use crate::rule::ValidationContext;

/// Path of the collaborator endpoint.
pub const VALIDATE_REMOTE_DOCUMENT_PATH: &str = "/validate-remote-document";

/// Query parameter carrying the IRI.
pub const DOCUMENT_IRI_PARAM: &str = "documentIri";

/// Validation service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service could not be reached
    #[error("Validation service request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Validation service answered with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The answer was not a validation response
    #[error("Invalid response from validation service: {0}")]
    InvalidResponse(String),
}

/// `{ "message": ... }` error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// What the collaborator answers for one IRI.
///
/// On success `results` and `document_iri` are set and `document` holds the
/// parsed body, or `null` if it was not JSON. On a failed fetch only `error`
/// is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteValidationResponse {
    #[serde(default)]
    pub results: Option<Vec<ValidationResult>>,

    #[serde(default)]
    pub document: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_iri: Option<String>,

    /// Raw body text as fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorMessage>,
}

impl RemoteValidationResponse {
    /// A failed fetch.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            results: None,
            document: None,
            document_iri: None,
            body: None,
            error: Some(ErrorMessage {
                message: message.into(),
            }),
        }
    }
}

/// Fetches a document and runs the remote rules on it.
#[async_trait]
pub trait ValidationService: Send + Sync + fmt::Debug {
    /// Fetch `iri` and return the remote findings plus the fetched body.
    ///
    /// A document that cannot be fetched is an `Ok` response carrying
    /// `error`; `Err` means the service itself is unusable.
    async fn validate_remote_document(
        &self,
        iri: &str,
    ) -> Result<RemoteValidationResponse, ServiceError>;
}

/// Configuration for [`HttpValidationService`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the collaborator, without the endpoint path
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Client for a remote validation collaborator.
#[derive(Debug, Clone)]
pub struct HttpValidationService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpValidationService {
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ServiceError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                VALIDATE_REMOTE_DOCUMENT_PATH
            ),
        })
    }
}

#[async_trait]
impl ValidationService for HttpValidationService {
    async fn validate_remote_document(
        &self,
        iri: &str,
    ) -> Result<RemoteValidationResponse, ServiceError> {
        debug!("Requesting remote validation of {} from {}", iri, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[(DOCUMENT_IRI_PARAM, iri)])
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<RemoteValidationResponse>(&text)
                .ok()
                .and_then(|body| body.error)
                .map_or(text, |error| error.message);
            warn!("Validation service answered {} for {}", status, iri);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| ServiceError::InvalidResponse(e.to_string()))
    }
}

/// Runs the collaborator procedure in-process.
#[derive(Debug, Clone)]
pub struct InProcessValidationService {
    fetcher: DocumentFetcher,
    rules: RuleCatalog,
}

impl InProcessValidationService {
    /// Use `fetcher` and the remote rule catalog.
    pub fn new(fetcher: DocumentFetcher) -> Self {
        Self::with_rules(fetcher, RuleCatalog::remote())
    }

    pub fn with_rules(fetcher: DocumentFetcher, rules: RuleCatalog) -> Self {
        Self { fetcher, rules }
    }

    /// Fetch `iri`, run the remote rules against the outcome and package it
    /// the way the collaborator endpoint answers.
    pub async fn inspect(&self, iri: &str) -> RemoteValidationResponse {
        match self.fetcher.fetch(iri).await {
            Ok(fetched) => {
                let document = serde_json::from_str::<Value>(&fetched.body).ok();
                let parsed = document
                    .clone()
                    .and_then(|value| ClientIdDocument::from_value(value).ok())
                    .unwrap_or_default();

                let body = fetched.body.clone();
                let context = ValidationContext::new(parsed)
                    .with_document_iri(iri)
                    .with_fetch_response(fetched);
                let results = run_rules(&context, &self.rules).await;

                RemoteValidationResponse {
                    results: Some(results),
                    document,
                    document_iri: Some(iri.to_string()),
                    body: Some(body),
                    error: None,
                }
            }
            Err(error) => {
                warn!("Could not fetch {}: {}", iri, error);
                RemoteValidationResponse::failure(fetch_failure_message(iri, &error))
            }
        }
    }
}

fn fetch_failure_message(iri: &str, error: &FetchError) -> String {
    match error {
        FetchError::InvalidIri(_) => format!("{iri} is not an http(s) IRI."),
        FetchError::Blocked { reason, .. } => {
            format!("{iri} is not reachable from this validator: {reason}.")
        }
        other => format!("Could not fetch {iri}: {other}"),
    }
}

#[async_trait]
impl ValidationService for InProcessValidationService {
    async fn validate_remote_document(
        &self,
        iri: &str,
    ) -> Result<RemoteValidationResponse, ServiceError> {
        Ok(self.inspect(iri).await)
    }
}

//! # Rule Contract
//!
//! Every check of the catalog implements [`ValidationRule`]: static metadata,
//! an optional catalog of the results it can produce, and an async `check`
//! that turns a [`ValidationContext`] into zero or more [`RuleResult`]s.
//!
//! Rules are stateless. They may run concurrently against the same context,
//! never mutate it, and never fail: "no findings" is an empty list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::ClientIdDocument;
use crate::result::{ResultDescription, RuleMetadata, RuleResult};

/// What the remote fetch of a document returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    /// The IRI that was requested
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Raw `content-type` header, if present
    pub content_type: Option<String>,

    /// `location` header of a redirect response
    pub location: Option<String>,

    /// Response body as text
    pub body: String,
}

impl FetchResponse {
    /// Whether the server answered with a redirect instead of the document.
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Media type without parameters, lower-cased.
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// Input of a single rule invocation.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    document: ClientIdDocument,
    document_iri: Option<String>,
    fetch_response: Option<FetchResponse>,
}

impl ValidationContext {
    /// Context for a locally supplied document
    pub fn new(document: ClientIdDocument) -> Self {
        Self {
            document,
            document_iri: None,
            fetch_response: None,
        }
    }

    /// Attach the IRI the document was requested from
    pub fn with_document_iri(mut self, iri: impl Into<String>) -> Self {
        self.document_iri = Some(iri.into());
        self
    }

    /// Attach the raw fetch outcome
    pub fn with_fetch_response(mut self, response: FetchResponse) -> Self {
        self.fetch_response = Some(response);
        self
    }

    pub fn document(&self) -> &ClientIdDocument {
        &self.document
    }

    pub fn document_iri(&self) -> Option<&str> {
        self.document_iri.as_deref()
    }

    pub fn fetch_response(&self) -> Option<&FetchResponse> {
        self.fetch_response.as_ref()
    }
}

/// A single, independent check of the catalog.
#[async_trait]
pub trait ValidationRule: Send + Sync + std::fmt::Debug {
    /// Name, description and category of this rule
    fn metadata(&self) -> &RuleMetadata;

    /// The findings this rule can produce, for documentation
    fn result_descriptions(&self) -> &'static [ResultDescription] {
        &[]
    }

    /// Run the check. Must not panic and must not mutate the context.
    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult>;
}

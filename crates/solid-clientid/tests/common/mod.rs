//! Common test utilities for integration tests
//!
//! A wiremock server that plays the part of a web server publishing Client
//! Identifier Documents, plus a few ready-made documents.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Path the mock publishes the document under
pub const DOCUMENT_PATH: &str = "/clientid.jsonld";

/// Mock web server hosting a client identifier document
pub struct MockDocumentHost {
    pub server: MockServer,
    pub document_iri: String,
}

impl MockDocumentHost {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let document_iri = format!("{}{}", server.uri(), DOCUMENT_PATH);
        Self {
            server,
            document_iri,
        }
    }

    /// Serve `body` with the given content type
    pub async fn serve(&self, body: &Value, content_type: &str) {
        Mock::given(method("GET"))
            .and(path(DOCUMENT_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", content_type)
                    .set_body_string(body.to_string()),
            )
            .mount(&self.server)
            .await;
    }

    /// Serve a redirect to `location`
    pub async fn redirect(&self, location: &str) {
        Mock::given(method("GET"))
            .and(path(DOCUMENT_PATH))
            .respond_with(ResponseTemplate::new(301).insert_header("location", location))
            .mount(&self.server)
            .await;
    }

    /// Serve an error status with an HTML body
    pub async fn fail(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(DOCUMENT_PATH))
            .respond_with(
                ResponseTemplate::new(status)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<h1>nope</h1>"),
            )
            .mount(&self.server)
            .await;
    }
}

/// A document that passes every local rule without errors
pub fn compliant_document(client_id: &str) -> Value {
    json!({
        "@context": ["https://www.w3.org/ns/solid/oidc-context.jsonld"],
        "client_id": client_id,
        "client_name": "Example App",
        "redirect_uris": ["https://app.example/callback"],
        "scope": "openid webid offline_access",
        "grant_types": ["authorization_code", "refresh_token"],
        "response_types": ["code"],
        "token_endpoint_auth_method": "none",
        "contacts": ["admin@app.example"]
    })
}

//! Integration tests for remote validation
//!
//! Tests cover:
//! - The in-process collaborator fetching from a mock web server
//! - The remote rules against redirects, error statuses and content types
//! - The HTTP validation service client against a mock collaborator
//! - Merging of remote and local findings

mod common;

use common::{MockDocumentHost, compliant_document};
use serde_json::json;
use solid_clientid::{
    DocumentFetcher, HttpValidationService, InProcessValidationService, RemoteValidator,
    RuleCategory, ServiceConfig, Status, ValidationResult,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn in_process_validator() -> RemoteValidator<InProcessValidationService> {
    RemoteValidator::new(InProcessValidationService::new(
        DocumentFetcher::new().expect("HTTP client"),
    ))
}

fn titles_of<'a>(results: &'a [ValidationResult], rule: &str) -> Vec<&'a str> {
    results
        .iter()
        .filter(|result| result.rule.name == rule)
        .map(ValidationResult::title)
        .collect()
}

#[tokio::test]
async fn test_compliant_remote_document() {
    // GIVEN: a host serving a compliant document at its own client_id
    let host = MockDocumentHost::start().await;
    host.serve(&compliant_document(&host.document_iri), "application/ld+json")
        .await;

    // WHEN: the IRI is validated
    let results = in_process_validator().validate_remote(&host.document_iri).await;

    // THEN: remote findings come first and nothing is an error
    assert_eq!(results[0].rule.category, RuleCategory::Remote);
    assert_eq!(titles_of(&results, "remoteDocumentAsJsonLd"), vec!["Served as JSON-LD"]);
    assert_eq!(titles_of(&results, "remoteMatchingClientId"), vec!["Matching client_id"]);
    let errors: Vec<_> = results
        .iter()
        .filter(|result| result.status() == Status::Error)
        .collect();
    // the mock's http localhost client_id only draws warnings
    assert!(errors.is_empty(), "unexpected errors: {errors:#?}");
    assert!(results.iter().any(|result| result.rule.category == RuleCategory::Local));
}

#[tokio::test]
async fn test_client_id_mismatch_and_plain_json() {
    let host = MockDocumentHost::start().await;
    host.serve(
        &compliant_document("https://somewhere-else.example/id"),
        "application/json; charset=utf-8",
    )
    .await;

    let results = in_process_validator().validate_remote(&host.document_iri).await;

    assert_eq!(
        titles_of(&results, "remoteDocumentAsJsonLd"),
        vec!["Served as application/json"]
    );
    assert_eq!(titles_of(&results, "remoteMatchingClientId"), vec!["client_id mismatch"]);
}

#[tokio::test]
async fn test_missing_client_id() {
    let host = MockDocumentHost::start().await;
    host.serve(&json!({}), "application/ld+json").await;

    let results = in_process_validator().validate_remote(&host.document_iri).await;
    assert_eq!(titles_of(&results, "remoteMatchingClientId"), vec!["No client_id set"]);
}

#[tokio::test]
async fn test_redirect_is_reported() {
    let host = MockDocumentHost::start().await;
    host.redirect("https://elsewhere.example/id").await;

    let results = in_process_validator().validate_remote(&host.document_iri).await;
    assert_eq!(
        titles_of(&results, "remoteDocumentAsJsonLd"),
        vec!["Redirect during fetch"]
    );
}

#[tokio::test]
async fn test_error_status_skips_local_rules() {
    let host = MockDocumentHost::start().await;
    host.fail(404).await;

    let results = in_process_validator().validate_remote(&host.document_iri).await;

    assert_eq!(
        titles_of(&results, "remoteDocumentAsJsonLd"),
        vec!["Unexpected status code"]
    );
    // the HTML body is no document, so only remote rules ran
    assert!(results.iter().all(|result| result.rule.category == RuleCategory::Remote));
}

#[tokio::test]
async fn test_unreachable_host() {
    // GIVEN: a server that is shut down again
    let server = MockServer::start().await;
    let iri = format!("{}/id", server.uri());
    drop(server);

    let results = in_process_validator().validate_remote(&iri).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title(), "Document could not be fetched");
}

#[tokio::test]
async fn test_http_service_round_trip() {
    // GIVEN: a collaborator answering with one remote finding and a document
    let collaborator = MockServer::start().await;
    let iri = "https://app.example/id";
    Mock::given(method("POST"))
        .and(path("/validate-remote-document"))
        .and(query_param("documentIri", iri))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "status": "success",
                "title": "Served as JSON-LD",
                "description": "ok",
                "affectedFields": [],
                "rule": {
                    "name": "remoteDocumentAsJsonLd",
                    "description": "served as JSON-LD",
                    "category": "remote"
                }
            }],
            "document": compliant_document(iri),
            "documentIri": iri
        })))
        .expect(1)
        .mount(&collaborator)
        .await;

    let service = HttpValidationService::new(&ServiceConfig {
        base_url: collaborator.uri(),
        ..ServiceConfig::default()
    })
    .unwrap();

    // WHEN: the IRI is validated through the HTTP service
    let results = RemoteValidator::new(service).validate_remote(iri).await;

    // THEN: the remote finding is followed by the local findings
    assert_eq!(results[0].title(), "Served as JSON-LD");
    assert!(results.len() > 1);
    assert!(results[1..].iter().all(|result| result.rule.category == RuleCategory::Local));
}

#[tokio::test]
async fn test_http_service_fetch_error() {
    let collaborator = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/validate-remote-document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "message": "Could not fetch https://app.example/id: connection refused" },
            "results": null,
            "document": null
        })))
        .mount(&collaborator)
        .await;

    let service = HttpValidationService::new(&ServiceConfig {
        base_url: collaborator.uri(),
        ..ServiceConfig::default()
    })
    .unwrap();
    let results = RemoteValidator::new(service)
        .validate_remote("https://app.example/id")
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title(), "Document could not be fetched");
    assert!(results[0].result.description.contains("connection refused"));
}

#[tokio::test]
async fn test_http_service_non_json_answer() {
    let collaborator = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&collaborator)
        .await;

    let service = HttpValidationService::new(&ServiceConfig {
        base_url: collaborator.uri(),
        ..ServiceConfig::default()
    })
    .unwrap();
    let results = RemoteValidator::new(service)
        .validate_remote("https://app.example/id")
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title(), "Validation service unavailable");
}

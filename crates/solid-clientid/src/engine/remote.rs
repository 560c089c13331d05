//! Remote validation: a [`ValidationService`] fetches the document and reports
//! remote findings, then the local catalog runs on the fetched body.

use tracing::{debug, warn};

use crate::catalog::RuleCatalog;
use crate::result::{ResultDescription, RuleMetadata, Status, ValidationResult};
use crate::service::ValidationService;

use super::local::{DocumentInput, validate_local};

static REMOTE_ENGINE: RuleMetadata = RuleMetadata::remote(
    "remoteValidation",
    "The document IRI must be given and the document must be retrievable.",
);

const NO_IRI: ResultDescription = ResultDescription::new(
    Status::Error,
    "No IRI given",
    "Enter the IRI of the Client Identifier Document to validate.",
);

const SERVICE_UNAVAILABLE: ResultDescription = ResultDescription::new(
    Status::Error,
    "Validation service unavailable",
    "The remote validation service could not be reached or gave an unusable answer.",
);

const NOT_FETCHED: ResultDescription = ResultDescription::new(
    Status::Error,
    "Document could not be fetched",
    "The document could not be retrieved from the given IRI.",
);

fn engine_result(template: ResultDescription, description: Option<String>) -> ValidationResult {
    let mut result = template.emit();
    if let Some(description) = description {
        result = result.with_description(description);
    }
    ValidationResult::new(result, REMOTE_ENGINE.clone())
}

/// Validates documents by IRI.
///
/// Remote findings come from the [`ValidationService`]; the fetched body is
/// then run through the local engine. Remote findings come first.
#[derive(Debug, Clone)]
pub struct RemoteValidator<S> {
    service: S,
    local_rules: RuleCatalog,
}

impl<S: ValidationService> RemoteValidator<S> {
    /// Use `service` and the full local catalog.
    pub fn new(service: S) -> Self {
        Self::with_local_rules(service, RuleCatalog::local())
    }

    pub fn with_local_rules(service: S, local_rules: RuleCatalog) -> Self {
        Self {
            service,
            local_rules,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Validate the document at `iri`.
    pub async fn validate_remote(&self, iri: &str) -> Vec<ValidationResult> {
        let iri = iri.trim();
        if iri.is_empty() {
            return vec![engine_result(NO_IRI, None)];
        }

        let response = match self.service.validate_remote_document(iri).await {
            Ok(response) => response,
            Err(error) => {
                warn!("Remote validation of {} failed: {}", iri, error);
                return vec![engine_result(
                    SERVICE_UNAVAILABLE,
                    Some(format!("{} {error}", SERVICE_UNAVAILABLE.description)),
                )];
            }
        };

        if let Some(error) = response.error {
            return vec![engine_result(NOT_FETCHED, Some(error.message))];
        }

        let mut results = response.results.unwrap_or_default();
        debug!(remote = results.len(), "received remote findings for {}", iri);

        if let Some(document) = response.document {
            results.extend(validate_local(DocumentInput::Json(document), &self.local_rules).await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{RuleResult, Status};
    use crate::service::{RemoteValidationResponse, ServiceError};
    use crate::rules::ValidScope;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct StubService {
        answer: Mutex<Option<Result<RemoteValidationResponse, ServiceError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubService {
        fn answering(answer: Result<RemoteValidationResponse, ServiceError>) -> Self {
            Self {
                answer: Mutex::new(Some(answer)),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ValidationService for StubService {
        async fn validate_remote_document(
            &self,
            iri: &str,
        ) -> Result<RemoteValidationResponse, ServiceError> {
            self.calls.lock().unwrap().push(iri.to_string());
            self.answer
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(ServiceError::Transport("no answer".to_string())))
        }
    }

    #[tokio::test]
    async fn test_empty_iri_makes_no_call() {
        let validator = RemoteValidator::new(StubService::default());
        let results = validator.validate_remote("  ").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), "No IRI given");
        assert!(validator.service().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_failure() {
        let validator = RemoteValidator::new(StubService::answering(Err(
            ServiceError::InvalidResponse("expected value".to_string()),
        )));
        let results = validator.validate_remote("https://app.example/id").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status(), Status::Error);
        assert_eq!(results[0].title(), "Validation service unavailable");
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let validator = RemoteValidator::new(StubService::answering(Ok(
            RemoteValidationResponse::failure("connection refused"),
        )));
        let results = validator.validate_remote("https://app.example/id").await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title(), "Document could not be fetched");
        assert_eq!(results[0].result.description, "connection refused");
    }

    #[tokio::test]
    async fn test_remote_findings_come_first() {
        static REMOTE: RuleMetadata = RuleMetadata::remote("remoteRule", "");
        let remote_finding = ValidationResult::new(
            RuleResult::new(Status::Success, "Served as JSON-LD", ""),
            REMOTE.clone(),
        );
        let validator = RemoteValidator::with_local_rules(
            StubService::answering(Ok(RemoteValidationResponse {
                results: Some(vec![remote_finding.clone()]),
                document: Some(json!({ "scope": "openid webid" })),
                document_iri: Some("https://app.example/id".to_string()),
                body: None,
                error: None,
            })),
            RuleCatalog::default().with_rule(ValidScope),
        );

        let results = validator.validate_remote("https://app.example/id").await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], remote_finding);
        assert_eq!(results[1].rule.name, "validScope");
    }
}

use async_trait::async_trait;

use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::remote(
    "remoteMatchingClientId",
    "The client_id in the fetched document must equal the IRI it was fetched from.",
);

const MISSING: ResultDescription = ResultDescription::new(
    Status::Error,
    "No client_id set",
    "The fetched document has no client_id, so identity providers cannot tie it to the requested IRI.",
);

const MISMATCH: ResultDescription = ResultDescription::new(
    Status::Error,
    "client_id mismatch",
    "The client_id of the fetched document differs from the IRI it was fetched from.",
);

const MATCHING: ResultDescription = ResultDescription::new(
    Status::Success,
    "Matching client_id",
    "The client_id equals the IRI the document was fetched from.",
);

const RESULTS: &[ResultDescription] = &[MISSING, MISMATCH, MATCHING];

#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteMatchingClientId;

#[async_trait]
impl ValidationRule for RemoteMatchingClientId {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        match context.document_iri() {
            Some(iri) => check_client_id(context.document(), iri),
            None => Vec::new(),
        }
    }
}

fn check_client_id(document: &ClientIdDocument, iri: &str) -> Vec<RuleResult> {
    let field = Field::ClientId.as_str();
    let Some(client_id) = document.get(Field::ClientId) else {
        return vec![MISSING.emit()];
    };

    if client_id.as_str() == Some(iri) {
        vec![MATCHING.emit_for(field, client_id.clone())]
    } else {
        vec![MISMATCH.emit_for(field, client_id.clone()).with_description(format!(
            "The document was fetched from {iri} but its client_id is {client_id}."
        ))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{document, statuses};
    use serde_json::json;

    const IRI: &str = "https://app.example/id";

    #[tokio::test]
    async fn test_no_iri_is_silent() {
        let context = ValidationContext::new(document(json!({})));
        assert!(RemoteMatchingClientId.check(&context).await.is_empty());
    }

    #[tokio::test]
    async fn test_client_id_matching() {
        let check = |body| {
            let context = ValidationContext::new(document(body)).with_document_iri(IRI);
            async move { RemoteMatchingClientId.check(&context).await }
        };

        let missing = check(json!({})).await;
        assert_eq!(statuses(&missing), vec![Status::Error]);
        assert_eq!(missing[0].title, "No client_id set");

        let mismatch = check(json!({ "client_id": "https://other.example/id" })).await;
        assert_eq!(statuses(&mismatch), vec![Status::Error]);
        assert_eq!(mismatch[0].title, "client_id mismatch");

        let matching = check(json!({ "client_id": IRI })).await;
        assert_eq!(statuses(&matching), vec![Status::Success]);
    }
}

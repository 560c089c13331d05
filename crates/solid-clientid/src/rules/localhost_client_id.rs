use async_trait::async_trait;

use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};
use crate::uri::{is_localhost, parse_uri};

static METADATA: RuleMetadata = RuleMetadata::local(
    "noLocalhostClientId",
    "client_id should not point at localhost.",
);

const LOCALHOST: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Localhost client id",
    "Identity providers cannot dereference a client_id on localhost. This only works for local development setups.",
);

const RESULTS: &[ResultDescription] = &[LOCALHOST];

#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocalhostClientId;

#[async_trait]
impl ValidationRule for NoLocalhostClientId {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_localhost(context.document())
    }
}

fn check_localhost(document: &ClientIdDocument) -> Vec<RuleResult> {
    document
        .get_str(Field::ClientId)
        .filter(|raw| parse_uri(raw).is_some_and(|url| is_localhost(&url)))
        .map(|raw| LOCALHOST.emit_for(Field::ClientId.as_str(), raw))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::document;
    use serde_json::json;

    #[test]
    fn test_localhost_client_id_warns() {
        for id in ["http://localhost:3000/id", "https://127.0.0.1/id"] {
            assert_eq!(check_localhost(&document(json!({ "client_id": id }))).len(), 1);
        }
        assert!(check_localhost(&document(json!({ "client_id": "https://app.example/id" }))).is_empty());
        assert!(check_localhost(&document(json!({}))).is_empty());
    }
}

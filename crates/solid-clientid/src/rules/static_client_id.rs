use async_trait::async_trait;

use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};
use crate::uri::{has_query, parse_uri};

static METADATA: RuleMetadata = RuleMetadata::local(
    "staticClientIdUri",
    "client_id should be a static URI without a query string.",
);

const HAS_QUERY: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Client id with query",
    "A query string in client_id suggests a dynamically generated document; identity providers may cache or compare it verbatim.",
);

const RESULTS: &[ResultDescription] = &[HAS_QUERY];

#[derive(Debug, Default, Clone, Copy)]
pub struct StaticClientIdUri;

#[async_trait]
impl ValidationRule for StaticClientIdUri {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_static(context.document())
    }
}

fn check_static(document: &ClientIdDocument) -> Vec<RuleResult> {
    let Some(raw) = document.get_str(Field::ClientId) else {
        return Vec::new();
    };
    match parse_uri(raw) {
        Some(url) if has_query(&url) => vec![HAS_QUERY.emit_for(Field::ClientId.as_str(), raw)],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::document;
    use serde_json::json;

    #[test]
    fn test_query_warns() {
        let results = check_static(&document(json!({ "client_id": "https://app.example/id?v=2" })));
        assert_eq!(results.len(), 1);
        assert!(results[0].affects("client_id"));

        assert!(check_static(&document(json!({ "client_id": "https://app.example/id" }))).is_empty());
    }
}

use async_trait::async_trait;

use super::{indexed, string_entries};
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "responseTypesMatchGrantTypes",
    "response_types must not require grants Solid-OIDC forbids.",
);

const NEEDS_IMPLICIT: ResultDescription = ResultDescription::new(
    Status::Error,
    "Response type requires implicit grant",
    "Response types containing token or id_token are issued through the implicit or hybrid flow, which Solid-OIDC does not allow.",
);

const RESULTS: &[ResultDescription] = &[NEEDS_IMPLICIT];

#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseTypesMatchGrantTypes;

#[async_trait]
impl ValidationRule for ResponseTypesMatchGrantTypes {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_consistency(context.document())
    }
}

/// `code id_token` style values are space-separated combinations.
fn needs_implicit(response_type: &str) -> bool {
    response_type
        .split_whitespace()
        .any(|part| part == "token" || part == "id_token")
}

fn check_consistency(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::ResponseTypes;
    let Some(entries) = document.get(field).and_then(string_entries) else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let response_type = (*entry)?;
            needs_implicit(response_type)
                .then(|| NEEDS_IMPLICIT.emit_for(indexed(field, index), response_type))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::document;
    use serde_json::json;

    #[test]
    fn test_implicit_response_types() {
        let results = check_consistency(&document(json!({
            "response_types": ["code", "code id_token", "token", 4]
        })));
        assert_eq!(results.len(), 2);
        assert!(results[0].affects("response_types[1]"));
        assert!(results[1].affects("response_types[2]"));
    }

    #[test]
    fn test_code_only_is_silent() {
        assert!(check_consistency(&document(json!({ "response_types": ["code"] }))).is_empty());
        assert!(check_consistency(&document(json!({}))).is_empty());
    }
}

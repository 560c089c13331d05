use async_trait::async_trait;

use crate::document::ClientIdDocument;
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "noUnknownFields",
    "Every key should be a known client metadata field or a localization of one.",
);

const UNKNOWN: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Unknown field",
    "The key is not a Solid-OIDC client metadata field and will be ignored. Check it for typos or an invalid language tag.",
);

const RESULTS: &[ResultDescription] = &[UNKNOWN];

#[derive(Debug, Default, Clone, Copy)]
pub struct NoUnknownFields;

#[async_trait]
impl ValidationRule for NoUnknownFields {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_unknown_fields(context.document())
    }
}

fn check_unknown_fields(document: &ClientIdDocument) -> Vec<RuleResult> {
    document
        .unknown()
        .map(|(key, value)| {
            UNKNOWN
                .emit_for(key, value.clone())
                .with_description(format!("`{key}` is not a known client metadata field."))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{document, statuses};
    use serde_json::json;

    #[test]
    fn test_unknown_keys_warn_once_each() {
        let results = check_unknown_fields(&document(json!({
            "client_name": "App",
            "client_name#de": "Anwendung",
            "client_secret": "shh",
            "scope#de": "openid",
            "client_uri#de_DE": "https://a.example"
        })));
        assert_eq!(statuses(&results), vec![Status::Warning; 3]);
        assert!(results.iter().any(|result| result.affects("client_secret")));
        assert!(results.iter().any(|result| result.affects("scope#de")));
        assert!(results.iter().any(|result| result.affects("client_uri#de_DE")));
    }

    #[test]
    fn test_known_document_is_silent() {
        let results = check_unknown_fields(&document(json!({
            "@context": "https://www.w3.org/ns/solid/oidc-context.jsonld",
            "redirect_uris": [],
            "logo_uri#en-GB": "https://a.example/logo.png"
        })));
        assert!(results.is_empty());
    }
}

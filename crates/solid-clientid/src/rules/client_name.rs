use async_trait::async_trait;
use serde_json::Value;

use super::json_type;
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "validClientName",
    "client_name and its localizations should be non-blank strings.",
);

const MISSING: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Missing client name",
    "Without client_name the identity provider can only show the client id on the consent screen.",
);

const NOT_A_STRING: ResultDescription = ResultDescription::new(
    Status::Error,
    "Invalid client name",
    "client_name must be a string.",
);

const BLANK: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Blank client name",
    "client_name only contains whitespace.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid client name",
    "client_name is set.",
);

const RESULTS: &[ResultDescription] = &[MISSING, NOT_A_STRING, BLANK, VALID];

#[derive(Debug, Default, Clone, Copy)]
pub struct ValidClientName;

#[async_trait]
impl ValidationRule for ValidClientName {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_client_name(context.document())
    }
}

fn check_variant(key: String, value: &Value) -> Option<RuleResult> {
    match value {
        Value::String(name) if name.trim().is_empty() => Some(BLANK.emit_for(key, value.clone())),
        Value::String(_) => None,
        other => Some(
            NOT_A_STRING
                .emit_for(key.clone(), other.clone())
                .with_description(format!("`{key}` must be a string, found {}.", json_type(other))),
        ),
    }
}

fn check_client_name(document: &ClientIdDocument) -> Vec<RuleResult> {
    let mut results = Vec::new();
    if !document.contains(Field::ClientName) {
        results.push(MISSING.emit());
    }

    results.extend(
        document
            .variants(Field::ClientName)
            .into_iter()
            .filter_map(|(key, value)| check_variant(key, value)),
    );

    if results.is_empty() {
        let mut valid = VALID.emit();
        for (key, value) in document.variants(Field::ClientName) {
            valid = valid.with_field(key, value.clone());
        }
        results.push(valid);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{document, statuses};
    use serde_json::json;

    #[test]
    fn test_missing_name() {
        assert_eq!(statuses(&check_client_name(&document(json!({})))), vec![Status::Warning]);
    }

    #[test]
    fn test_localized_variants_are_checked() {
        let results = check_client_name(&document(json!({
            "client_name": "App",
            "client_name#de": "   ",
            "client_name#fr": 3
        })));
        assert_eq!(statuses(&results), vec![Status::Warning, Status::Error]);
        assert!(results[0].affects("client_name#de"));
        assert!(results[1].affects("client_name#fr"));
    }

    #[test]
    fn test_valid_name_lists_all_variants() {
        let results = check_client_name(&document(json!({
            "client_name": "App",
            "client_name#de": "Anwendung"
        })));
        assert_eq!(statuses(&results), vec![Status::Success]);
        assert_eq!(results[0].affected_fields.len(), 2);
    }
}

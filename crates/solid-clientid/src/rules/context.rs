use async_trait::async_trait;
use serde_json::Value;

use crate::document::{ClientIdDocument, Field, SOLID_OIDC_CONTEXT};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "validContext",
    "The document must declare the Solid-OIDC JSON-LD context.",
);

const MISSING: ResultDescription = ResultDescription::new(
    Status::Error,
    "Missing @context",
    "Solid-OIDC client identifier documents are JSON-LD and must set @context to https://www.w3.org/ns/solid/oidc-context.jsonld.",
);

const WRONG: ResultDescription = ResultDescription::new(
    Status::Error,
    "Invalid @context",
    "@context must be exactly https://www.w3.org/ns/solid/oidc-context.jsonld, either as a string or as an array with that single entry.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid @context",
    "The document declares the Solid-OIDC context.",
);

const RESULTS: &[ResultDescription] = &[MISSING, WRONG, VALID];

/// Checks `@context` against the canonical Solid-OIDC context.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidContext;

#[async_trait]
impl ValidationRule for ValidContext {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_context(context.document())
    }
}

fn is_canonical(value: &Value) -> bool {
    match value {
        Value::String(context) => context == SOLID_OIDC_CONTEXT,
        Value::Array(entries) => matches!(entries.as_slice(), [Value::String(only)] if only == SOLID_OIDC_CONTEXT),
        _ => false,
    }
}

fn check_context(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::Context.as_str();
    match document.get(Field::Context) {
        None => vec![MISSING.emit()],
        Some(value) if is_canonical(value) => vec![VALID.emit_for(field, value.clone())],
        Some(value) => vec![WRONG.emit_for(field, value.clone())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{document, statuses};
    use serde_json::json;

    #[test]
    fn test_missing_context() {
        assert_eq!(statuses(&check_context(&document(json!({})))), vec![Status::Error]);
    }

    #[test]
    fn test_canonical_forms() {
        for context in [json!(SOLID_OIDC_CONTEXT), json!([SOLID_OIDC_CONTEXT])] {
            let results = check_context(&document(json!({ "@context": context })));
            assert_eq!(statuses(&results), vec![Status::Success]);
        }
    }

    #[test]
    fn test_non_canonical_forms() {
        for context in [
            json!("https://www.w3.org/ns/activitystreams"),
            json!([SOLID_OIDC_CONTEXT, "https://schema.org"]),
            json!([]),
            json!({ "@vocab": SOLID_OIDC_CONTEXT }),
        ] {
            let results = check_context(&document(json!({ "@context": context })));
            assert_eq!(statuses(&results), vec![Status::Error]);
            assert_eq!(results[0].title, "Invalid @context");
        }
    }
}

use async_trait::async_trait;
use serde_json::Value;

use super::json_type;
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};
use crate::uri::parse_uri;

const MISSING_REQUIRED: ResultDescription = ResultDescription::new(
    Status::Error,
    "Missing URI field",
    "This field is required.",
);

const MISSING_OPTIONAL: ResultDescription = ResultDescription::new(
    Status::Info,
    "Missing URI field",
    "This optional field is not set. Identity providers show it to users when present.",
);

const NOT_A_STRING: ResultDescription = ResultDescription::new(
    Status::Error,
    "Invalid URI field",
    "URI fields must be strings.",
);

const MALFORMED: ResultDescription = ResultDescription::new(
    Status::Error,
    "Malformed URI",
    "The value is not an absolute URI.",
);

const NOT_HTTPS: ResultDescription = ResultDescription::new(
    Status::Warning,
    "URI without https",
    "Identity providers may refuse to fetch or link to URIs that are not served over https.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid URI field",
    "The value is an https URI.",
);

const REQUIRED_RESULTS: &[ResultDescription] =
    &[MISSING_REQUIRED, NOT_A_STRING, MALFORMED, NOT_HTTPS, VALID];
const OPTIONAL_RESULTS: &[ResultDescription] =
    &[MISSING_OPTIONAL, NOT_A_STRING, MALFORMED, NOT_HTTPS, VALID];

/// Checks one URI-valued field and its localized variants.
///
/// The catalog runs one instance per URI field; they only differ in the
/// severity reported for a missing value.
#[derive(Debug, Clone)]
pub struct ValidUriField {
    metadata: RuleMetadata,
    field: Field,
    required: bool,
}

impl ValidUriField {
    pub const fn new(metadata: RuleMetadata, field: Field, required: bool) -> Self {
        Self {
            metadata,
            field,
            required,
        }
    }

    pub const fn client_id() -> Self {
        Self::new(
            RuleMetadata::local(
                "validUriFields/client_id",
                "client_id must be an https URI; it is the address of this document.",
            ),
            Field::ClientId,
            true,
        )
    }

    pub const fn client_uri() -> Self {
        Self::new(
            RuleMetadata::local(
                "validUriFields/client_uri",
                "client_uri, if set, should be an https URI of the client's home page.",
            ),
            Field::ClientUri,
            false,
        )
    }

    pub const fn logo_uri() -> Self {
        Self::new(
            RuleMetadata::local(
                "validUriFields/logo_uri",
                "logo_uri, if set, should be an https URI of the client's logo.",
            ),
            Field::LogoUri,
            false,
        )
    }

    pub const fn tos_uri() -> Self {
        Self::new(
            RuleMetadata::local(
                "validUriFields/tos_uri",
                "tos_uri, if set, should be an https URI of the terms of service.",
            ),
            Field::TosUri,
            false,
        )
    }

    pub const fn policy_uri() -> Self {
        Self::new(
            RuleMetadata::local(
                "validUriFields/policy_uri",
                "policy_uri, if set, should be an https URI of the privacy policy.",
            ),
            Field::PolicyUri,
            false,
        )
    }

    pub fn field(&self) -> Field {
        self.field
    }

    fn check_document(&self, document: &ClientIdDocument) -> Vec<RuleResult> {
        let mut results = Vec::new();
        if !document.contains(self.field) {
            let missing = if self.required {
                MISSING_REQUIRED
            } else {
                MISSING_OPTIONAL
            };
            results.push(
                missing
                    .emit()
                    .with_description(format!("{} is not set. {}", self.field, missing.description)),
            );
        }

        let variants = document.variants(self.field);
        results.extend(
            variants
                .iter()
                .filter_map(|(key, value)| check_variant(key, value)),
        );

        if results.is_empty() {
            let mut valid = VALID.emit();
            for (key, value) in variants {
                valid = valid.with_field(key, value.clone());
            }
            results.push(valid);
        }
        results
    }
}

fn check_variant(key: &str, value: &Value) -> Option<RuleResult> {
    let Some(raw) = value.as_str() else {
        return Some(
            NOT_A_STRING
                .emit_for(key, value.clone())
                .with_description(format!("`{key}` must be a string, found {}.", json_type(value))),
        );
    };
    let Some(url) = parse_uri(raw) else {
        return Some(
            MALFORMED
                .emit_for(key, raw)
                .with_description(format!("`{key}` is not an absolute URI: `{raw}`.")),
        );
    };
    (url.scheme() != "https").then(|| {
        NOT_HTTPS
            .emit_for(key, raw)
            .with_description(format!("`{key}` uses the `{}` scheme instead of https.", url.scheme()))
    })
}

#[async_trait]
impl ValidationRule for ValidUriField {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        if self.required {
            REQUIRED_RESULTS
        } else {
            OPTIONAL_RESULTS
        }
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        self.check_document(context.document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{document, statuses};
    use serde_json::json;

    #[test]
    fn test_missing_severity_per_instance() {
        let empty = document(json!({}));
        assert_eq!(
            statuses(&ValidUriField::client_id().check_document(&empty)),
            vec![Status::Error]
        );
        assert_eq!(
            statuses(&ValidUriField::logo_uri().check_document(&empty)),
            vec![Status::Info]
        );
    }

    #[test]
    fn test_grading() {
        let rule = ValidUriField::client_uri();
        let results = rule.check_document(&document(json!({
            "client_uri": "http://app.example",
            "client_uri#de": "nope",
            "client_uri#fr": false
        })));
        assert_eq!(
            statuses(&results),
            vec![Status::Warning, Status::Error, Status::Error]
        );
        assert!(results[0].affects("client_uri"));
        assert!(results[1].affects("client_uri#de"));
        assert_eq!(results[2].title, "Invalid URI field");
    }

    #[test]
    fn test_valid_https() {
        let results = ValidUriField::policy_uri().check_document(&document(json!({
            "policy_uri": "https://app.example/privacy"
        })));
        assert_eq!(statuses(&results), vec![Status::Success]);
    }
}

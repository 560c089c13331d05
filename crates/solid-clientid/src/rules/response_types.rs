use async_trait::async_trait;

use super::{indexed, string_entries};
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "validResponseType",
    "response_types, if set, should only contain code.",
);

const MALFORMED: ResultDescription = ResultDescription::new(
    Status::Error,
    "Malformed response types",
    "response_types must be an array of strings.",
);

const NOT_CODE: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Unexpected response type",
    "Solid-OIDC uses the authorization code flow; response types other than code are not needed.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid response types",
    "response_types only contains code.",
);

const RESULTS: &[ResultDescription] = &[MALFORMED, NOT_CODE, VALID];

#[derive(Debug, Default, Clone, Copy)]
pub struct ValidResponseType;

#[async_trait]
impl ValidationRule for ValidResponseType {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_response_types(context.document())
    }
}

fn check_response_types(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::ResponseTypes;
    let Some(value) = document.get(field) else {
        return Vec::new();
    };
    let Some(entries) = string_entries(value)
        .and_then(|entries| entries.into_iter().collect::<Option<Vec<_>>>())
    else {
        return vec![MALFORMED.emit_for(field.as_str(), value.clone())];
    };

    let mut results: Vec<_> = entries
        .iter()
        .enumerate()
        .filter(|(_, response_type)| **response_type != "code")
        .map(|(index, response_type)| NOT_CODE.emit_for(indexed(field, index), *response_type))
        .collect();

    if results.is_empty() {
        results.push(VALID.emit_for(field.as_str(), value.clone()));
    }
    results
}

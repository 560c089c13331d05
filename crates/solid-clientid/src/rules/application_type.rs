use async_trait::async_trait;

use crate::document::{ApplicationType, ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "validApplicationType",
    "application_type, if set, must be web or native.",
);

const INVALID: ResultDescription = ResultDescription::new(
    Status::Error,
    "Invalid application type",
    "application_type must be either web or native.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid application type",
    "application_type is web or native.",
);

const RESULTS: &[ResultDescription] = &[INVALID, VALID];

#[derive(Debug, Default, Clone, Copy)]
pub struct ValidApplicationType;

#[async_trait]
impl ValidationRule for ValidApplicationType {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_application_type(context.document())
    }
}

fn check_application_type(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::ApplicationType.as_str();
    let Some(value) = document.get(Field::ApplicationType) else {
        return Vec::new();
    };

    match value.as_str().map(str::parse::<ApplicationType>) {
        Some(Ok(_)) => vec![VALID.emit_for(field, value.clone())],
        Some(Err(reason)) => vec![INVALID.emit_for(field, value.clone()).with_description(format!(
            "{reason}; application_type must be either web or native."
        ))],
        None => vec![INVALID.emit_for(field, value.clone())],
    }
}

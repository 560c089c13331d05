use async_trait::async_trait;

use super::json_type;
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata =
    RuleMetadata::local("validRequireAuthTime", "require_auth_time, if set, must be a boolean.");

const NOT_A_BOOLEAN: ResultDescription = ResultDescription::new(
    Status::Error,
    "Invalid require_auth_time",
    "require_auth_time must be true or false.",
);

const RESULTS: &[ResultDescription] = &[NOT_A_BOOLEAN];

#[derive(Debug, Default, Clone, Copy)]
pub struct ValidRequireAuthTime;

#[async_trait]
impl ValidationRule for ValidRequireAuthTime {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_require_auth_time(context.document())
    }
}

fn check_require_auth_time(document: &ClientIdDocument) -> Vec<RuleResult> {
    match document.get(Field::RequireAuthTime) {
        Some(value) if !value.is_boolean() => vec![
            NOT_A_BOOLEAN
                .emit_for(Field::RequireAuthTime.as_str(), value.clone())
                .with_description(format!(
                    "require_auth_time must be true or false, found {}.",
                    json_type(value)
                )),
        ],
        _ => Vec::new(),
    }
}

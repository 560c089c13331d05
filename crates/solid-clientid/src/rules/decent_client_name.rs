use async_trait::async_trait;

use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

/// Longest client name that still fits a consent screen.
pub const MAX_CLIENT_NAME_LENGTH: usize = 50;

static METADATA: RuleMetadata = RuleMetadata::local(
    "decentClientName",
    "Client names should be short enough to be displayed.",
);

const TOO_LONG: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Long client name",
    "Client names longer than 50 characters are likely to be truncated by identity providers.",
);

const RESULTS: &[ResultDescription] = &[TOO_LONG];

#[derive(Debug, Default, Clone, Copy)]
pub struct DecentClientName;

#[async_trait]
impl ValidationRule for DecentClientName {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_length(context.document())
    }
}

fn check_length(document: &ClientIdDocument) -> Vec<RuleResult> {
    document
        .variants(Field::ClientName)
        .into_iter()
        .filter_map(|(key, value)| {
            let length = value.as_str()?.chars().count();
            (length > MAX_CLIENT_NAME_LENGTH).then(|| {
                TOO_LONG
                    .emit_for(key.clone(), value.clone())
                    .with_description(format!(
                        "`{key}` is {length} characters long; keep it at {MAX_CLIENT_NAME_LENGTH} or below."
                    ))
            })
        })
        .collect()
}

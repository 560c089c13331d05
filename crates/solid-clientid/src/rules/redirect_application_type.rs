use async_trait::async_trait;

use super::{indexed, parsed_redirect_uris};
use crate::document::{ApplicationType, ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "redirectUrisApplicationTypeRule",
    "Redirect URI schemes and hosts must fit the application_type of the client.",
);

const MISMATCH: ResultDescription = ResultDescription::new(
    Status::Error,
    "Redirect URI does not fit application type",
    "web clients need https redirect URIs (http or https on localhost); native clients need a custom scheme or localhost.",
);

const RESULTS: &[ResultDescription] = &[MISMATCH];

#[derive(Debug, Default, Clone, Copy)]
pub struct RedirectUrisApplicationType;

#[async_trait]
impl ValidationRule for RedirectUrisApplicationType {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_application_type_match(context.document())
    }
}

fn check_application_type_match(document: &ClientIdDocument) -> Vec<RuleResult> {
    // an invalid application_type is reported by validApplicationType
    let application_type = match document.get(Field::ApplicationType) {
        None => ApplicationType::default(),
        Some(value) => match value.as_str().map(str::parse::<ApplicationType>) {
            Some(Ok(application_type)) => application_type,
            _ => return Vec::new(),
        },
    };
    let Some(uris) = parsed_redirect_uris(document) else {
        return Vec::new();
    };

    uris.iter()
        .filter_map(|(index, raw, url)| {
            let violation = application_type.check_redirect_uri(url).err()?;
            Some(
                MISMATCH
                    .emit_for(indexed(Field::RedirectUris, *index), *raw)
                    .with_description(format!(
                        "`{raw}` is not allowed for application type {application_type}: {violation}."
                    )),
            )
        })
        .collect()
}

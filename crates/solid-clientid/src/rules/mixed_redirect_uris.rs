use async_trait::async_trait;

use super::{indexed, parsed_redirect_uris};
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};
use crate::uri::is_localhost;

static METADATA: RuleMetadata = RuleMetadata::local(
    "noMixedRedirectUris",
    "Redirect URIs must either all point at localhost or all point at remote hosts.",
);

const MIXED: ResultDescription = ResultDescription::new(
    Status::Error,
    "Mixed localhost and remote redirect URIs",
    "A client is either a development client running on localhost or a deployed one; mixing both exposes production users to local redirect targets.",
);

const RESULTS: &[ResultDescription] = &[MIXED];

#[derive(Debug, Default, Clone, Copy)]
pub struct NoMixedRedirectUris;

#[async_trait]
impl ValidationRule for NoMixedRedirectUris {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_mixed(context.document())
    }
}

fn check_mixed(document: &ClientIdDocument) -> Vec<RuleResult> {
    let Some(uris) = parsed_redirect_uris(document) else {
        return Vec::new();
    };

    let localhost_count = uris.iter().filter(|(_, _, url)| is_localhost(url)).count();
    if localhost_count == 0 || localhost_count == uris.len() {
        return Vec::new();
    }

    let mut result = MIXED.emit();
    for (index, raw, _) in &uris {
        result = result.with_field(indexed(Field::RedirectUris, *index), *raw);
    }
    vec![result]
}

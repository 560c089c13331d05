use async_trait::async_trait;
use std::collections::BTreeSet;

use super::{indexed, parsed_redirect_uris};
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "sameDomainForRedirectUris",
    "All redirect URIs should share one host name.",
);

const MULTIPLE_HOSTS: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Redirect URIs on different hosts",
    "Redirect URIs spanning several host names usually indicate a copy-paste mistake or a document shared between unrelated deployments.",
);

const RESULTS: &[ResultDescription] = &[MULTIPLE_HOSTS];

#[derive(Debug, Default, Clone, Copy)]
pub struct SameDomainForRedirectUris;

#[async_trait]
impl ValidationRule for SameDomainForRedirectUris {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_same_domain(context.document())
    }
}

fn check_same_domain(document: &ClientIdDocument) -> Vec<RuleResult> {
    let Some(uris) = parsed_redirect_uris(document) else {
        return Vec::new();
    };

    let hosts: BTreeSet<String> = uris
        .iter()
        .filter_map(|(_, _, url)| url.host_str())
        .map(str::to_ascii_lowercase)
        .collect();
    if hosts.len() <= 1 {
        return Vec::new();
    }

    let hosts: Vec<_> = hosts.into_iter().collect();
    let mut result = MULTIPLE_HOSTS.emit().with_description(format!(
        "Redirect URIs point at {} different hosts: {}.",
        hosts.len(),
        hosts.join(", ")
    ));
    for (index, raw, _) in &uris {
        result = result.with_field(indexed(Field::RedirectUris, *index), *raw);
    }
    vec![result]
}

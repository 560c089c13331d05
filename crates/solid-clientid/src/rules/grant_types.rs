use async_trait::async_trait;
use std::collections::HashSet;

use super::{indexed, json_type, string_entries};
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

/// Grant types registered for OAuth 2.0 clients.
pub const KNOWN_GRANT_TYPES: &[&str] = &[
    "authorization_code",
    "refresh_token",
    "implicit",
    "client_credentials",
    "password",
    "urn:ietf:params:oauth:grant-type:device_code",
    "urn:ietf:params:oauth:grant-type:jwt-bearer",
];

static METADATA: RuleMetadata = RuleMetadata::local(
    "validGrantTypes",
    "grant_types must list authorization_code and must not allow the implicit grant.",
);

const UNSET: ResultDescription = ResultDescription::new(
    Status::Error,
    "Missing grant types",
    "Set grant_types explicitly; Solid-OIDC clients use at least authorization_code.",
);

const NOT_AN_ARRAY: ResultDescription = ResultDescription::new(
    Status::Error,
    "Malformed grant types",
    "grant_types must be an array of strings.",
);

const NOT_A_STRING: ResultDescription = ResultDescription::new(
    Status::Error,
    "Malformed grant type",
    "Every grant type must be a string.",
);

const IMPLICIT: ResultDescription = ResultDescription::new(
    Status::Error,
    "Implicit grant not allowed",
    "The implicit grant leaks tokens through the browser and is not supported by Solid-OIDC.",
);

const MISSING_AUTHORIZATION_CODE: ResultDescription = ResultDescription::new(
    Status::Error,
    "Missing authorization_code grant",
    "Solid-OIDC requires the authorization code flow.",
);

const DUPLICATE: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Duplicate grant type",
    "A grant type is listed more than once.",
);

const UNKNOWN: ResultDescription = ResultDescription::new(
    Status::Info,
    "Unknown grant type",
    "The grant type is not registered for OAuth 2.0. Identity providers may reject it.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid grant types",
    "grant_types includes authorization_code and no forbidden grant.",
);

const RESULTS: &[ResultDescription] = &[
    UNSET,
    NOT_AN_ARRAY,
    NOT_A_STRING,
    IMPLICIT,
    MISSING_AUTHORIZATION_CODE,
    DUPLICATE,
    UNKNOWN,
    VALID,
];

#[derive(Debug, Default, Clone, Copy)]
pub struct ValidGrantTypes;

#[async_trait]
impl ValidationRule for ValidGrantTypes {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_grant_types(context.document())
    }
}

fn check_grant_types(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::GrantTypes;
    let Some(value) = document.get(field) else {
        return vec![UNSET.emit()];
    };
    let Some(entries) = string_entries(value) else {
        return vec![NOT_AN_ARRAY.emit_for(field.as_str(), value.clone()).with_description(
            format!("grant_types must be an array of strings, found {}.", json_type(value)),
        )];
    };

    let mut results = Vec::new();
    let mut grants = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Some(grant) => grants.push((index, *grant)),
            None => results.push(NOT_A_STRING.emit_for(indexed(field, index), value[index].clone())),
        }
    }

    for (index, grant) in &grants {
        if *grant == "implicit" {
            results.push(IMPLICIT.emit_for(indexed(field, *index), *grant));
        }
    }

    if !grants.iter().any(|(_, grant)| *grant == "authorization_code") {
        results.push(MISSING_AUTHORIZATION_CODE.emit_for(field.as_str(), value.clone()));
    }

    let mut seen = HashSet::new();
    for (index, grant) in &grants {
        if !seen.insert(*grant) {
            results.push(
                DUPLICATE
                    .emit_for(indexed(field, *index), *grant)
                    .with_description(format!("`{grant}` is listed more than once.")),
            );
        }
    }

    for (index, grant) in &grants {
        if !KNOWN_GRANT_TYPES.contains(grant) {
            results.push(UNKNOWN.emit_for(indexed(field, *index), *grant));
        }
    }

    if results.is_empty() {
        results.push(VALID.emit_for(field.as_str(), value.clone()));
    }
    results
}

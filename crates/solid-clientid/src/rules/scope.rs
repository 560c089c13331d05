use async_trait::async_trait;
use std::collections::HashSet;

use super::{json_type, scope_tokens};
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

/// Scope tokens with a meaning defined by OpenID Connect or Solid-OIDC.
pub const KNOWN_SCOPES: &[&str] = &[
    "openid",
    "webid",
    "offline_access",
    "profile",
    "email",
    "address",
    "phone",
];

static METADATA: RuleMetadata = RuleMetadata::local(
    "validScope",
    "scope must be a space-separated string containing openid and webid exactly once.",
);

const NOT_A_STRING: ResultDescription = ResultDescription::new(
    Status::Error,
    "Invalid scope",
    "scope must be a string of space-separated scope tokens.",
);

const MISSING_OPENID: ResultDescription = ResultDescription::new(
    Status::Error,
    "Missing openid scope",
    "Solid-OIDC is built on OpenID Connect; the openid scope is required.",
);

const MISSING_WEBID: ResultDescription = ResultDescription::new(
    Status::Error,
    "Missing webid scope",
    "Solid-OIDC clients must request the webid scope to receive the WebID claim.",
);

const DUPLICATE: ResultDescription = ResultDescription::new(
    Status::Error,
    "Duplicate scope",
    "Every scope token must appear only once.",
);

const UNKNOWN: ResultDescription = ResultDescription::new(
    Status::Info,
    "Unknown scope",
    "The scope is neither defined by OpenID Connect nor by Solid-OIDC. Identity providers may ignore it.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid scope",
    "scope contains openid and webid.",
);

const RESULTS: &[ResultDescription] = &[
    NOT_A_STRING,
    MISSING_OPENID,
    MISSING_WEBID,
    DUPLICATE,
    UNKNOWN,
    VALID,
];

#[derive(Debug, Default, Clone, Copy)]
pub struct ValidScope;

#[async_trait]
impl ValidationRule for ValidScope {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_scope(context.document())
    }
}

fn check_scope(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::Scope.as_str();
    let Some(tokens) = scope_tokens(document) else {
        return vec![match document.get(Field::Scope) {
            None => NOT_A_STRING
                .emit()
                .with_description("scope is missing; Solid-OIDC clients must request at least `openid webid`."),
            Some(value) => NOT_A_STRING.emit_for(field, value.clone()).with_description(format!(
                "scope must be a string of space-separated scope tokens, found {}.",
                json_type(value)
            )),
        }];
    };
    let raw = document.get_str(Field::Scope).unwrap_or_default();

    let mut results = Vec::new();
    if !tokens.contains(&"openid") {
        results.push(MISSING_OPENID.emit_for(field, raw));
    }
    if !tokens.contains(&"webid") {
        results.push(MISSING_WEBID.emit_for(field, raw));
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for token in &tokens {
        if !seen.insert(*token) && reported.insert(*token) {
            results.push(
                DUPLICATE
                    .emit_for(field, raw)
                    .with_description(format!("The scope `{token}` appears more than once.")),
            );
        }
    }

    let mut unknown_reported = HashSet::new();
    for token in &tokens {
        if !KNOWN_SCOPES.contains(token) && unknown_reported.insert(*token) {
            results.push(UNKNOWN.emit_for(field, *token));
        }
    }

    if results.is_empty() {
        results.push(VALID.emit_for(field, raw));
    }
    results
}

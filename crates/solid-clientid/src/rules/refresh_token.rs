use async_trait::async_trait;

use super::scope_tokens;
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "refreshTokenRule",
    "The refresh_token grant and the offline_access scope must be requested together.",
);

const GRANT_WITHOUT_SCOPE: ResultDescription = ResultDescription::new(
    Status::Error,
    "refresh_token without offline_access",
    "The client allows the refresh_token grant but does not request the offline_access scope, so it will never receive a refresh token.",
);

const SCOPE_WITHOUT_GRANT: ResultDescription = ResultDescription::new(
    Status::Error,
    "offline_access without refresh_token",
    "The client requests offline_access but does not allow the refresh_token grant, so it cannot use the refresh token it receives.",
);

const ALIGNED: ResultDescription = ResultDescription::new(
    Status::Success,
    "Refresh token settings aligned",
    "The refresh_token grant and the offline_access scope agree.",
);

const RESULTS: &[ResultDescription] = &[GRANT_WITHOUT_SCOPE, SCOPE_WITHOUT_GRANT, ALIGNED];

#[derive(Debug, Default, Clone, Copy)]
pub struct RefreshTokenRule;

#[async_trait]
impl ValidationRule for RefreshTokenRule {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_refresh_token(context.document())
    }
}

fn check_refresh_token(document: &ClientIdDocument) -> Vec<RuleResult> {
    let has_grant = document
        .get(Field::GrantTypes)
        .and_then(|value| value.as_array())
        .is_some_and(|grants| grants.iter().any(|grant| grant == "refresh_token"));
    let has_scope = scope_tokens(document)
        .is_some_and(|tokens| tokens.contains(&"offline_access"));

    let grant_types = document.get(Field::GrantTypes).cloned().unwrap_or_default();
    let scope = document.get(Field::Scope).cloned().unwrap_or_default();

    let template = match (has_grant, has_scope) {
        (true, false) => GRANT_WITHOUT_SCOPE,
        (false, true) => SCOPE_WITHOUT_GRANT,
        _ => ALIGNED,
    };
    vec![
        template
            .emit_for(Field::GrantTypes.as_str(), grant_types)
            .with_field(Field::Scope.as_str(), scope),
    ]
}

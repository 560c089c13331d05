use async_trait::async_trait;

use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "rightAuthenticationMethod",
    "Clients identified by a document are public clients; token_endpoint_auth_method must be none.",
);

const UNSET: ResultDescription = ResultDescription::new(
    Status::Error,
    "Missing token endpoint authentication method",
    "token_endpoint_auth_method defaults to client_secret_basic, but a Solid-OIDC client has no secret. Set it to none.",
);

const WRONG: ResultDescription = ResultDescription::new(
    Status::Error,
    "Wrong token endpoint authentication method",
    "token_endpoint_auth_method must be none for clients identified by a Client Identifier Document.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid token endpoint authentication method",
    "token_endpoint_auth_method is none.",
);

const RESULTS: &[ResultDescription] = &[UNSET, WRONG, VALID];

#[derive(Debug, Default, Clone, Copy)]
pub struct RightAuthenticationMethod;

#[async_trait]
impl ValidationRule for RightAuthenticationMethod {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_auth_method(context.document())
    }
}

fn check_auth_method(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::TokenEndpointAuthMethod.as_str();
    match document.get(Field::TokenEndpointAuthMethod) {
        None => vec![UNSET.emit()],
        Some(value) if value == "none" => vec![VALID.emit_for(field, value.clone())],
        Some(value) => vec![WRONG.emit_for(field, value.clone())],
    }
}

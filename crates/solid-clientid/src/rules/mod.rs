//! # Rule Catalog
//!
//! Each module holds one standalone, side-effect-free check implementing
//! [`ValidationRule`](crate::rule::ValidationRule). The checks only report on
//! the fields they own and never fix anything.
//!
//! [`local_rules`] and [`remote_rules`] list the catalog in execution order;
//! [`RuleCatalog`](crate::catalog::RuleCatalog) wraps them for the engines.

pub mod application_type;
pub mod auth_method;
pub mod client_name;
pub mod contacts;
pub mod context;
pub mod decent_client_name;
pub mod default_max_age;
pub mod grant_types;
pub mod localhost_client_id;
pub mod mixed_redirect_uris;
pub mod redirect_application_type;
pub mod redirect_uris;
pub mod refresh_token;
pub mod remote;
pub mod require_auth_time;
pub mod response_grant_consistency;
pub mod response_types;
pub mod same_domain;
pub mod scope;
pub mod static_client_id;
pub mod unknown_fields;
pub mod uri_fields;

use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::document::{ClientIdDocument, Field};
use crate::rule::ValidationRule;
use crate::uri::parse_uri;

pub use application_type::ValidApplicationType;
pub use auth_method::RightAuthenticationMethod;
pub use client_name::ValidClientName;
pub use contacts::ValidContactsField;
pub use context::ValidContext;
pub use decent_client_name::DecentClientName;
pub use default_max_age::ValidDefaultMaxAge;
pub use grant_types::ValidGrantTypes;
pub use localhost_client_id::NoLocalhostClientId;
pub use mixed_redirect_uris::NoMixedRedirectUris;
pub use redirect_application_type::RedirectUrisApplicationType;
pub use redirect_uris::ValidRedirectUris;
pub use refresh_token::RefreshTokenRule;
pub use remote::{RemoteDocumentAsJsonLd, RemoteMatchingClientId};
pub use require_auth_time::ValidRequireAuthTime;
pub use response_grant_consistency::ResponseTypesMatchGrantTypes;
pub use response_types::ValidResponseType;
pub use same_domain::SameDomainForRedirectUris;
pub use scope::ValidScope;
pub use static_client_id::StaticClientIdUri;
pub use unknown_fields::NoUnknownFields;
pub use uri_fields::ValidUriField;

/// The local rule catalog in execution order.
pub fn local_rules() -> Vec<Arc<dyn ValidationRule>> {
    vec![
        Arc::new(ValidContext),
        Arc::new(ValidRedirectUris),
        Arc::new(NoMixedRedirectUris),
        Arc::new(SameDomainForRedirectUris),
        Arc::new(RedirectUrisApplicationType),
        Arc::new(ValidScope),
        Arc::new(ValidGrantTypes),
        Arc::new(RefreshTokenRule),
        Arc::new(RightAuthenticationMethod),
        Arc::new(NoUnknownFields),
        Arc::new(ValidClientName),
        Arc::new(DecentClientName),
        Arc::new(ValidUriField::client_id()),
        Arc::new(ValidUriField::client_uri()),
        Arc::new(ValidUriField::logo_uri()),
        Arc::new(ValidUriField::tos_uri()),
        Arc::new(ValidUriField::policy_uri()),
        Arc::new(ValidDefaultMaxAge),
        Arc::new(NoLocalhostClientId),
        Arc::new(StaticClientIdUri),
        Arc::new(ValidContactsField),
        Arc::new(ValidResponseType),
        Arc::new(ValidApplicationType),
        Arc::new(ValidRequireAuthTime),
        Arc::new(ResponseTypesMatchGrantTypes),
    ]
}

/// The remote rule catalog in execution order.
pub fn remote_rules() -> Vec<Arc<dyn ValidationRule>> {
    vec![Arc::new(RemoteDocumentAsJsonLd), Arc::new(RemoteMatchingClientId)]
}

/// `field[index]`
pub(crate) fn indexed(field: Field, index: usize) -> String {
    format!("{field}[{index}]")
}

/// JSON type name for messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The redirect URIs that are strings and parse, with their index.
///
/// Returns `None` when `redirect_uris` is missing or not an array.
pub(crate) fn parsed_redirect_uris(document: &ClientIdDocument) -> Option<Vec<(usize, &str, Url)>> {
    let entries = document.get(Field::RedirectUris)?.as_array()?;
    Some(
        entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let raw = entry.as_str()?;
                parse_uri(raw).map(|url| (index, raw, url))
            })
            .collect(),
    )
}

/// String entries of an array field; `None` entries are non-strings.
pub(crate) fn string_entries(value: &Value) -> Option<Vec<Option<&str>>> {
    value
        .as_array()
        .map(|entries| entries.iter().map(Value::as_str).collect())
}

/// Whitespace-separated tokens of the `scope` field, if it is a string.
pub(crate) fn scope_tokens(document: &ClientIdDocument) -> Option<Vec<&str>> {
    document
        .get_str(Field::Scope)
        .map(|scope| scope.split_whitespace().collect())
}

//! # Document Generator
//!
//! Builds a minimal, Solid-OIDC compliant Client Identifier Document from
//! [`GeneratorParams`].
//!
//! Generation is a fixed pipeline of independent checks. The first violated
//! invariant aborts generation with a [`GenerationError`]; no partial document
//! is ever returned. The produced document only contains fields whose value
//! differs from the OpenID Connect / Solid-OIDC default, plus `redirect_uris`
//! and `scope` which are always present.
//!
//! ## Example
//!
//! ```rust
//! use solid_clientid::generator::{generate, GeneratorParams};
//!
//! let generated = generate(&GeneratorParams::new(
//!     vec!["https://app.example/callback".to_string()],
//!     "https://app.example/webid#this",
//! ))
//! .unwrap();
//!
//! let keys = generated.document.keys();
//! assert_eq!(keys.len(), 4);
//! assert_eq!(generated.document.get_str(solid_clientid::Field::Scope), Some("openid webid"));
//! ```

mod error;
mod params;

pub use error::{GenerationError, GenerationErrorKind};
pub use params::{GeneratorParams, Localizable, LocalizedValue};

use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

use crate::document::{ApplicationType, ClientIdDocument, Field, LocalizedKey};
use crate::language_tag::is_valid_language_tag;
use crate::uri::parse_uri;

/// Scope used when none is given.
pub const DEFAULT_SCOPE: &str = "openid webid";

/// Grant type required by Solid-OIDC and used when none is given.
pub const AUTHORIZATION_CODE: &str = "authorization_code";

/// OpenID Connect default for `token_endpoint_auth_method`.
pub const DEFAULT_AUTH_METHOD: &str = "client_secret_basic";

/// Auth method implied for clients identified by a URI.
pub const PUBLIC_CLIENT_AUTH_METHOD: &str = "none";

/// Below this many seconds a `default_max_age` forces very frequent logins.
pub const MIN_RECOMMENDED_MAX_AGE: i64 = 60;

/// A non-fatal observation made while generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationWarning {
    /// `default_max_age` is positive but below [`MIN_RECOMMENDED_MAX_AGE`]
    ShortDefaultMaxAge { seconds: i64 },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortDefaultMaxAge { seconds } => write!(
                f,
                "default_max_age of {seconds} seconds is below {MIN_RECOMMENDED_MAX_AGE} seconds; users will have to log in again very often"
            ),
        }
    }
}

/// A generated document together with any non-fatal warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    pub document: ClientIdDocument,
    pub warnings: Vec<GenerationWarning>,
}

type Check = fn(&GeneratorParams) -> Result<(), GenerationError>;

/// Invariant checks in the order they are enforced.
const PIPELINE: [Check; 7] = [
    check_redirect_uris,
    check_redirect_schemes,
    check_client_id,
    check_scope,
    check_localizable_fields,
    check_grant_types,
    check_default_max_age,
];

/// Localizable parameters in validation order, with whether their values are URIs.
fn localizable_params(params: &GeneratorParams) -> [(Field, Option<&Localizable>, bool); 5] {
    [
        (Field::ClientName, params.client_name.as_ref(), false),
        (Field::ClientUri, params.client_uri.as_ref(), true),
        (Field::LogoUri, params.logo_uri.as_ref(), true),
        (Field::TosUri, params.tos_uri.as_ref(), true),
        (Field::PolicyUri, params.policy_uri.as_ref(), true),
    ]
}

/// Generate a Client Identifier Document.
///
/// # Errors
///
/// Returns the first [`GenerationError`] the parameters violate.
pub fn generate(params: &GeneratorParams) -> Result<GeneratedDocument, GenerationError> {
    for check in PIPELINE {
        check(params)?;
    }

    let warnings = collect_warnings(params);
    for warning in &warnings {
        warn!("{}", warning);
    }

    let document = assemble(params);
    debug!(keys = document.len(), "generated client identifier document");

    Ok(GeneratedDocument { document, warnings })
}

fn check_redirect_uris(params: &GeneratorParams) -> Result<(), GenerationError> {
    if params.redirect_uris.is_empty() {
        return Err(GenerationError::MissingRedirectUris);
    }

    for uri in &params.redirect_uris {
        if parse_uri(uri).is_none() {
            return Err(GenerationError::InvalidRedirectUri { uri: uri.clone() });
        }
    }

    Ok(())
}

fn check_redirect_schemes(params: &GeneratorParams) -> Result<(), GenerationError> {
    let application_type = params.application_type.unwrap_or_default();

    for uri in &params.redirect_uris {
        let Some(url) = parse_uri(uri) else {
            continue;
        };
        application_type
            .check_redirect_uri(&url)
            .map_err(|violation| GenerationError::RedirectUriNotAllowed {
                uri: uri.clone(),
                application_type,
                violation,
            })?;
    }

    Ok(())
}

/// Whether the client id is a dereferenceable URI.
fn is_uri_client_id(params: &GeneratorParams) -> bool {
    parse_uri(&params.client_id).is_some()
}

/// `token_endpoint_auth_method` after applying the default.
fn effective_auth_method(params: &GeneratorParams) -> &str {
    match params.token_endpoint_auth_method.as_deref() {
        Some(method) => method,
        None if is_uri_client_id(params) => PUBLIC_CLIENT_AUTH_METHOD,
        None => DEFAULT_AUTH_METHOD,
    }
}

fn check_client_id(params: &GeneratorParams) -> Result<(), GenerationError> {
    if params.client_id.trim().is_empty() {
        return Err(GenerationError::MissingClientId);
    }

    let method = effective_auth_method(params);
    if is_uri_client_id(params) && method != PUBLIC_CLIENT_AUTH_METHOD {
        return Err(GenerationError::AuthMethodNotNone {
            method: method.to_string(),
        });
    }

    Ok(())
}

fn check_scope(params: &GeneratorParams) -> Result<(), GenerationError> {
    let scope = params.scope.as_deref().unwrap_or(DEFAULT_SCOPE);
    let count = |wanted: &str| scope.split_whitespace().filter(|token| *token == wanted).count();

    if count("openid") == 1 && count("webid") == 1 {
        Ok(())
    } else {
        Err(GenerationError::InvalidScope {
            scope: scope.to_string(),
        })
    }
}

fn check_localizable_fields(params: &GeneratorParams) -> Result<(), GenerationError> {
    for (field, value, is_uri) in localizable_params(params) {
        let Some(value) = value else {
            continue;
        };
        let entries = value.entries();

        let mut seen = HashSet::new();
        for (lang, _) in &entries {
            if !seen.insert(*lang) {
                return Err(GenerationError::DuplicateLocales {
                    param: field.as_str(),
                });
            }
            if !lang.is_empty() && !is_valid_language_tag(lang) {
                return Err(GenerationError::InvalidLanguageTag {
                    tag: (*lang).to_string(),
                });
            }
        }

        if is_uri {
            for (_, uri) in &entries {
                if parse_uri(uri).is_none() {
                    return Err(GenerationError::InvalidUri {
                        param: field.as_str(),
                        value: (*uri).to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

fn check_grant_types(params: &GeneratorParams) -> Result<(), GenerationError> {
    let Some(grant_types) = &params.grant_types else {
        return Ok(());
    };

    let authorization_codes = grant_types
        .iter()
        .filter(|grant| *grant == AUTHORIZATION_CODE)
        .count();
    if authorization_codes == 1 {
        Ok(())
    } else {
        Err(GenerationError::InvalidGrantTypes {
            found: grant_types.clone(),
        })
    }
}

fn check_default_max_age(params: &GeneratorParams) -> Result<(), GenerationError> {
    match params.default_max_age {
        Some(value) if value < 0 => Err(GenerationError::NegativeMaxAge { value }),
        _ => Ok(()),
    }
}

fn collect_warnings(params: &GeneratorParams) -> Vec<GenerationWarning> {
    match params.default_max_age {
        Some(seconds) if seconds > 0 && seconds < MIN_RECOMMENDED_MAX_AGE => {
            vec![GenerationWarning::ShortDefaultMaxAge { seconds }]
        }
        _ => Vec::new(),
    }
}

fn is_default_grant_types(grant_types: &[String]) -> bool {
    matches!(grant_types, [only] if only == AUTHORIZATION_CODE)
}

/// Build the minimal document. Assumes the pipeline passed.
fn assemble(params: &GeneratorParams) -> ClientIdDocument {
    let mut document = ClientIdDocument::new();

    document.set(
        Field::RedirectUris,
        Value::from(params.redirect_uris.clone()),
    );

    if is_uri_client_id(params) {
        document.set(Field::ClientId, params.client_id.as_str());
    }

    let method = effective_auth_method(params);
    if method != DEFAULT_AUTH_METHOD {
        document.set(Field::TokenEndpointAuthMethod, method);
    }

    if params.application_type.unwrap_or_default() != ApplicationType::default() {
        document.set(
            Field::ApplicationType,
            params.application_type.unwrap_or_default().as_str(),
        );
    }

    for (field, value, _) in localizable_params(params) {
        let Some(value) = value else {
            continue;
        };
        for (lang, val) in value.entries() {
            if lang.is_empty() {
                document.set(field, val);
            } else if let Some(key) = LocalizedKey::new(field, lang) {
                document.set_localized(key, val);
            }
        }
    }

    if params.require_auth_time == Some(true) {
        document.set(Field::RequireAuthTime, true);
    }

    if let Some(max_age) = params.default_max_age {
        document.set(Field::DefaultMaxAge, max_age);
    }

    if let Some(contacts) = params.contacts.as_ref().filter(|contacts| !contacts.is_empty()) {
        document.set(Field::Contacts, Value::from(contacts.clone()));
    }

    if let Some(grant_types) = params
        .grant_types
        .as_ref()
        .filter(|grant_types| !is_default_grant_types(grant_types))
    {
        document.set(Field::GrantTypes, Value::from(grant_types.clone()));
    }

    document.set(
        Field::Scope,
        params.scope.as_deref().unwrap_or(DEFAULT_SCOPE),
    );

    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CLIENT_ID: &str = "https://app.example/webid#this";

    fn params() -> GeneratorParams {
        GeneratorParams::new(vec!["https://app.example/callback".to_string()], CLIENT_ID)
    }

    fn sorted_keys(document: &ClientIdDocument) -> Vec<String> {
        let mut keys = document.keys();
        keys.sort();
        keys
    }

    #[test]
    fn test_minimal_document_for_uri_client_id() {
        let generated = generate(&params()).unwrap();

        assert_eq!(
            sorted_keys(&generated.document),
            vec!["client_id", "redirect_uris", "scope", "token_endpoint_auth_method"]
        );
        assert_eq!(generated.document.get_str(Field::Scope), Some("openid webid"));
        assert_eq!(
            generated.document.get_str(Field::TokenEndpointAuthMethod),
            Some("none")
        );
        assert!(generated.warnings.is_empty());
    }

    #[test]
    fn test_minimal_document_for_plain_client_id() {
        let generated = generate(&GeneratorParams::new(
            vec!["https://app.example/callback".to_string()],
            "my-client",
        ))
        .unwrap();

        assert_eq!(sorted_keys(&generated.document), vec!["redirect_uris", "scope"]);
    }

    #[test]
    fn test_explicit_defaults_are_omitted() {
        let explicit = params()
            .with_grant_types(vec![AUTHORIZATION_CODE.to_string()])
            .with_application_type(ApplicationType::Web)
            .with_require_auth_time(false);

        assert_eq!(
            generate(&explicit).unwrap().document,
            generate(&params()).unwrap().document
        );
    }

    #[test]
    fn test_localization_flattening() {
        let generated = generate(&params().with_client_uri(vec![
            LocalizedValue::new("", "https://x.example"),
            LocalizedValue::new("de-DE", "https://y.example"),
        ]))
        .unwrap();

        let value = generated.document.to_value();
        assert_eq!(value["client_uri"], "https://x.example");
        assert_eq!(value["client_uri#de-DE"], "https://y.example");
    }

    #[test]
    fn test_duplicate_locales_fail() {
        let err = generate(&params().with_client_name(vec![
            LocalizedValue::new("de", "A"),
            LocalizedValue::new("de", "B"),
        ]))
        .unwrap_err();

        assert_eq!(err.to_string(), "Locales for parameter `client_name` are not unique.");
        assert_eq!(err.kind(), GenerationErrorKind::Localization);
    }

    #[test]
    fn test_invalid_language_tag_fails() {
        let err = generate(&params().with_client_name(vec![LocalizedValue::new("de_DE", "A")]))
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("Language tag de_DE no valid IETF BCP 47 language tag")
        );
    }

    #[test]
    fn test_scope_invariant() {
        let err = generate(&params().with_scope("webid")).unwrap_err();
        assert!(
            err.to_string()
                .contains("Parameter scope must include webid and openid once")
        );

        assert!(generate(&params().with_scope("webid openid custom")).is_ok());
        assert!(generate(&params().with_scope("openid webid openid")).is_err());
        assert!(generate(&params().with_scope("openid\twebid")).is_ok());
    }

    #[test]
    fn test_grant_type_invariant() {
        let err = generate(&params().with_grant_types(vec!["refresh_token".to_string()]))
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("Solid OIDC requires the grant_type 'authorization_code'")
        );

        let grants = vec![AUTHORIZATION_CODE.to_string(), "refresh_token".to_string()];
        let generated = generate(&params().with_grant_types(grants.clone())).unwrap();
        assert_eq!(
            generated.document.get(Field::GrantTypes),
            Some(&Value::from(grants))
        );
    }

    #[test]
    fn test_redirect_application_type_matrix() {
        let web = GeneratorParams::new(vec!["http://no-tls.example".to_string()], CLIENT_ID);
        assert_eq!(
            generate(&web).unwrap_err().kind(),
            GenerationErrorKind::RedirectUriScheme
        );

        let native_https = params().with_application_type(ApplicationType::Native);
        assert!(generate(&native_https).is_err());

        let native_custom = GeneratorParams::new(vec!["customscheme://x".to_string()], CLIENT_ID)
            .with_application_type(ApplicationType::Native);
        let generated = generate(&native_custom).unwrap();
        assert_eq!(generated.document.get_str(Field::ApplicationType), Some("native"));
    }

    #[test]
    fn test_redirect_uris_required() {
        let err = generate(&GeneratorParams::new(Vec::new(), CLIENT_ID)).unwrap_err();
        assert!(err.to_string().contains("At least one redirect uri is required"));

        let err = generate(&GeneratorParams::new(vec!["not a uri".to_string()], CLIENT_ID))
            .unwrap_err();
        assert_eq!(err.kind(), GenerationErrorKind::RedirectUris);
    }

    #[test]
    fn test_client_id_rules() {
        let err = generate(&GeneratorParams::new(
            vec!["https://app.example/cb".to_string()],
            "",
        ))
        .unwrap_err();
        assert!(err.to_string().contains("Client id must be set"));

        let err = generate(&params().with_token_endpoint_auth_method("client_secret_basic"))
            .unwrap_err();
        assert!(err.to_string().contains("client authentication method"));
        assert!(err.to_string().contains("must be set to none"));
    }

    #[test]
    fn test_invalid_uri_parameter() {
        let err = generate(&params().with_logo_uri("logo.png")).unwrap_err();
        assert_eq!(
            err,
            GenerationError::InvalidUri {
                param: "logo_uri",
                value: "logo.png".to_string()
            }
        );
    }

    #[test]
    fn test_default_max_age() {
        let err = generate(&params().with_default_max_age(-1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The parameter default_max_age must be greater than 0 or undefined."
        );

        let zero = generate(&params().with_default_max_age(0)).unwrap();
        assert!(zero.warnings.is_empty());
        assert_eq!(zero.document.get(Field::DefaultMaxAge), Some(&Value::from(0)));

        let short = generate(&params().with_default_max_age(30)).unwrap();
        assert_eq!(
            short.warnings,
            vec![GenerationWarning::ShortDefaultMaxAge { seconds: 30 }]
        );
    }

    #[test]
    fn test_first_violation_wins() {
        // both the scope and the grant types are wrong; scope is checked first
        let err = generate(
            &params()
                .with_scope("profile")
                .with_grant_types(vec!["implicit".to_string()]),
        )
        .unwrap_err();
        assert_eq!(err.kind(), GenerationErrorKind::Scope);
    }

    #[test]
    fn test_optional_fields_included_when_not_default() {
        let generated = generate(
            &params()
                .with_require_auth_time(true)
                .with_contacts(vec!["admin@app.example".to_string()])
                .with_client_name("Example"),
        )
        .unwrap();

        let value = generated.document.to_value();
        assert_eq!(value["require_auth_time"], true);
        assert_eq!(value["contacts"][0], "admin@app.example");
        assert_eq!(value["client_name"], "Example");
    }
}

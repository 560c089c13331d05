//! Generator failures.

use thiserror::Error;

use crate::document::{ApplicationType, RedirectSchemeViolation};

/// An invariant of the Solid-OIDC client metadata contract the generator
/// parameters violate. Generation stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No redirect URI given
    #[error("At least one redirect uri is required.")]
    MissingRedirectUris,

    /// A redirect URI does not parse
    #[error("Redirect uri `{uri}` is no valid URI.")]
    InvalidRedirectUri { uri: String },

    /// A redirect URI does not fit the application type
    #[error("Redirect uri `{uri}` is not allowed for application type {application_type}: {violation}.")]
    RedirectUriNotAllowed {
        uri: String,
        application_type: ApplicationType,
        violation: RedirectSchemeViolation,
    },

    /// Empty client id
    #[error("Client id must be set and must not be empty.")]
    MissingClientId,

    /// URI client id with a confidential client authentication method
    #[error(
        "If the client id is a dereferenceable URI, the client authentication method token_endpoint_auth_method must be set to none, found `{method}`."
    )]
    AuthMethodNotNone { method: String },

    /// Scope without `openid`/`webid`, or with one of them twice
    #[error("Parameter scope must include webid and openid once. Found `{scope}`.")]
    InvalidScope { scope: String },

    /// A URI parameter does not parse
    #[error("Parameter {param} must be a valid URI. Found `{value}`.")]
    InvalidUri { param: &'static str, value: String },

    /// `authorization_code` missing or repeated
    #[error("Solid OIDC requires the grant_type 'authorization_code' exactly once. Found {found:?}.")]
    InvalidGrantTypes { found: Vec<String> },

    /// The same language appears twice for one parameter
    #[error("Locales for parameter `{param}` are not unique.")]
    DuplicateLocales { param: &'static str },

    /// Malformed language tag
    #[error("Language tag {tag} no valid IETF BCP 47 language tag.")]
    InvalidLanguageTag { tag: String },

    /// Negative `default_max_age`
    #[error("The parameter default_max_age must be greater than 0 or undefined.")]
    NegativeMaxAge { value: i64 },
}

/// Discriminant of a [`GenerationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationErrorKind {
    RedirectUris,
    RedirectUriScheme,
    ClientId,
    AuthenticationMethod,
    Scope,
    Uri,
    GrantTypes,
    Localization,
    MaxAge,
}

impl GenerationError {
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            Self::MissingRedirectUris | Self::InvalidRedirectUri { .. } => {
                GenerationErrorKind::RedirectUris
            }
            Self::RedirectUriNotAllowed { .. } => GenerationErrorKind::RedirectUriScheme,
            Self::MissingClientId => GenerationErrorKind::ClientId,
            Self::AuthMethodNotNone { .. } => GenerationErrorKind::AuthenticationMethod,
            Self::InvalidScope { .. } => GenerationErrorKind::Scope,
            Self::InvalidUri { .. } => GenerationErrorKind::Uri,
            Self::InvalidGrantTypes { .. } => GenerationErrorKind::GrantTypes,
            Self::DuplicateLocales { .. } | Self::InvalidLanguageTag { .. } => {
                GenerationErrorKind::Localization
            }
            Self::NegativeMaxAge { .. } => GenerationErrorKind::MaxAge,
        }
    }
}

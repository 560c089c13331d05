//! Input parameters of the document generator.

use serde::{Deserialize, Serialize};

use crate::document::ApplicationType;

/// One language variant of a localizable parameter.
///
/// An empty `lang` addresses the unlocalized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedValue {
    pub lang: String,
    pub val: String,
}

impl LocalizedValue {
    pub fn new(lang: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            val: val.into(),
        }
    }
}

/// A localizable textual parameter: one plain value, or a list of language
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Localizable {
    Single(String),
    Localized(Vec<LocalizedValue>),
}

impl Localizable {
    /// `(lang, value)` pairs; a plain value is reported with an empty tag.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        match self {
            Localizable::Single(value) => vec![("", value.as_str())],
            Localizable::Localized(values) => values
                .iter()
                .map(|entry| (entry.lang.as_str(), entry.val.as_str()))
                .collect(),
        }
    }
}

impl From<&str> for Localizable {
    fn from(value: &str) -> Self {
        Localizable::Single(value.to_string())
    }
}

impl From<String> for Localizable {
    fn from(value: String) -> Self {
        Localizable::Single(value)
    }
}

impl From<Vec<LocalizedValue>> for Localizable {
    fn from(values: Vec<LocalizedValue>) -> Self {
        Localizable::Localized(values)
    }
}

/// Everything [`generate`](super::generate) needs to build a document.
///
/// Optional parameters left as `None` fall back to the OpenID Connect /
/// Solid-OIDC defaults.
///
/// # Example
///
/// ```rust
/// use solid_clientid::generator::{GeneratorParams, LocalizedValue};
///
/// let params = GeneratorParams::new(
///     vec!["https://app.example/callback".to_string()],
///     "https://app.example/id",
/// )
/// .with_client_name(vec![
///     LocalizedValue::new("", "Example"),
///     LocalizedValue::new("de-DE", "Beispiel"),
/// ])
/// .with_grant_types(vec!["authorization_code".into(), "refresh_token".into()])
/// .with_scope("openid webid offline_access");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorParams {
    pub redirect_uris: Vec<String>,
    pub client_id: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub application_type: Option<ApplicationType>,
    #[serde(default)]
    pub client_uri: Option<Localizable>,
    #[serde(default)]
    pub logo_uri: Option<Localizable>,
    #[serde(default)]
    pub client_name: Option<Localizable>,
    #[serde(default)]
    pub tos_uri: Option<Localizable>,
    #[serde(default)]
    pub policy_uri: Option<Localizable>,
    #[serde(default)]
    pub require_auth_time: Option<bool>,
    #[serde(default)]
    pub default_max_age: Option<i64>,
    #[serde(default)]
    pub contacts: Option<Vec<String>>,
    #[serde(default)]
    pub grant_types: Option<Vec<String>>,
    #[serde(default)]
    pub token_endpoint_auth_method: Option<String>,
}

impl GeneratorParams {
    /// Create parameters with the two required values
    pub fn new(redirect_uris: Vec<String>, client_id: impl Into<String>) -> Self {
        Self {
            redirect_uris,
            client_id: client_id.into(),
            ..Self::default()
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_application_type(mut self, application_type: ApplicationType) -> Self {
        self.application_type = Some(application_type);
        self
    }

    pub fn with_client_uri(mut self, client_uri: impl Into<Localizable>) -> Self {
        self.client_uri = Some(client_uri.into());
        self
    }

    pub fn with_logo_uri(mut self, logo_uri: impl Into<Localizable>) -> Self {
        self.logo_uri = Some(logo_uri.into());
        self
    }

    pub fn with_client_name(mut self, client_name: impl Into<Localizable>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    pub fn with_tos_uri(mut self, tos_uri: impl Into<Localizable>) -> Self {
        self.tos_uri = Some(tos_uri.into());
        self
    }

    pub fn with_policy_uri(mut self, policy_uri: impl Into<Localizable>) -> Self {
        self.policy_uri = Some(policy_uri.into());
        self
    }

    pub fn with_require_auth_time(mut self, require_auth_time: bool) -> Self {
        self.require_auth_time = Some(require_auth_time);
        self
    }

    pub fn with_default_max_age(mut self, seconds: i64) -> Self {
        self.default_max_age = Some(seconds);
        self
    }

    pub fn with_contacts(mut self, contacts: Vec<String>) -> Self {
        self.contacts = Some(contacts);
        self
    }

    pub fn with_grant_types(mut self, grant_types: Vec<String>) -> Self {
        self.grant_types = Some(grant_types);
        self
    }

    pub fn with_token_endpoint_auth_method(mut self, method: impl Into<String>) -> Self {
        self.token_endpoint_auth_method = Some(method.into());
        self
    }
}

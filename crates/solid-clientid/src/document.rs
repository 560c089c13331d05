//! # Client Identifier Document
//!
//! A Solid-OIDC Client Identifier Document is a JSON-LD object describing an
//! OAuth 2.0 / OpenID Connect client. Its keys fall into three groups:
//!
//! - the sixteen recognised fields ([`Field`]),
//! - localized variants `<field>#<bcp47-tag>` of the localizable fields,
//! - everything else, kept verbatim as unknown keys.
//!
//! Values are kept as raw [`serde_json::Value`]s: the validation rules must be
//! able to report on documents whose fields have the wrong JSON type.
//!
//! ## Example Document
//!
//! ```json
//! {
//!   "@context": ["https://www.w3.org/ns/solid/oidc-context.jsonld"],
//!   "client_id": "https://app.example/id",
//!   "client_name": "Example App",
//!   "client_name#de-DE": "Beispiel-App",
//!   "redirect_uris": ["https://app.example/callback"],
//!   "scope": "openid webid offline_access",
//!   "grant_types": ["authorization_code", "refresh_token"],
//!   "token_endpoint_auth_method": "none"
//! }
//! ```

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::language_tag::is_valid_language_tag;
use crate::uri::is_localhost;

/// The JSON-LD context every Solid-OIDC client document must declare.
pub const SOLID_OIDC_CONTEXT: &str = "https://www.w3.org/ns/solid/oidc-context.jsonld";

/// Separator between a localizable field and its language tag.
pub const LOCALE_SEPARATOR: char = '#';

/// The recognised keys of a Client Identifier Document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Context,
    ClientId,
    ClientName,
    ClientUri,
    LogoUri,
    TosUri,
    PolicyUri,
    RedirectUris,
    Scope,
    GrantTypes,
    ResponseTypes,
    ApplicationType,
    TokenEndpointAuthMethod,
    RequireAuthTime,
    DefaultMaxAge,
    Contacts,
}

impl Field {
    /// Every recognised field, in serialization order.
    pub const ALL: [Field; 16] = [
        Field::Context,
        Field::ClientId,
        Field::ClientName,
        Field::ClientUri,
        Field::LogoUri,
        Field::TosUri,
        Field::PolicyUri,
        Field::RedirectUris,
        Field::Scope,
        Field::GrantTypes,
        Field::ResponseTypes,
        Field::ApplicationType,
        Field::TokenEndpointAuthMethod,
        Field::RequireAuthTime,
        Field::DefaultMaxAge,
        Field::Contacts,
    ];

    /// The JSON key of this field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Context => "@context",
            Field::ClientId => "client_id",
            Field::ClientName => "client_name",
            Field::ClientUri => "client_uri",
            Field::LogoUri => "logo_uri",
            Field::TosUri => "tos_uri",
            Field::PolicyUri => "policy_uri",
            Field::RedirectUris => "redirect_uris",
            Field::Scope => "scope",
            Field::GrantTypes => "grant_types",
            Field::ResponseTypes => "response_types",
            Field::ApplicationType => "application_type",
            Field::TokenEndpointAuthMethod => "token_endpoint_auth_method",
            Field::RequireAuthTime => "require_auth_time",
            Field::DefaultMaxAge => "default_max_age",
            Field::Contacts => "contacts",
        }
    }

    /// Whether `<field>#<tag>` variants of this field are allowed.
    pub const fn is_localizable(self) -> bool {
        matches!(
            self,
            Field::ClientName | Field::ClientUri | Field::LogoUri | Field::TosUri | Field::PolicyUri
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == key)
            .ok_or_else(|| UnknownField(key.to_string()))
    }
}

/// A key that is not one of the recognised [`Field`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

/// Key of a localized variant, e.g. `client_name#de-DE`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalizedKey {
    field: Field,
    tag: String,
}

impl LocalizedKey {
    /// Build a localized key. Returns `None` when the field is not localizable
    /// or the tag is not a well-formed BCP 47 tag.
    pub fn new(field: Field, tag: impl Into<String>) -> Option<Self> {
        let tag = tag.into();
        (field.is_localizable() && is_valid_language_tag(&tag)).then_some(Self { field, tag })
    }

    /// Split a raw `<field>#<tag>` key.
    pub fn parse(key: &str) -> Option<Self> {
        let (field, tag) = key.split_once(LOCALE_SEPARATOR)?;
        Self::new(field.parse().ok()?, tag)
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for LocalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, LOCALE_SEPARATOR, self.tag)
    }
}

/// `application_type` values defined by OpenID Connect Dynamic Client Registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    #[default]
    Web,
    Native,
}

impl ApplicationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationType::Web => "web",
            ApplicationType::Native => "native",
        }
    }

    /// Check a redirect URI's scheme and host against this application type.
    ///
    /// `web` clients must use `https` for remote hosts and `http`/`https` for
    /// localhost. `native` clients must not use `http`/`https` for remote
    /// hosts; custom schemes and localhost are fine.
    ///
    /// # Errors
    ///
    /// Returns the [`RedirectSchemeViolation`] describing the mismatch.
    pub fn check_redirect_uri(self, url: &Url) -> Result<(), RedirectSchemeViolation> {
        let scheme = url.scheme();
        let web_scheme = scheme == "http" || scheme == "https";
        let localhost = is_localhost(url);

        match self {
            ApplicationType::Web if localhost && !web_scheme => {
                Err(RedirectSchemeViolation::WebLocalhostScheme)
            }
            ApplicationType::Web if !localhost && scheme != "https" => {
                Err(RedirectSchemeViolation::WebRequiresHttps)
            }
            ApplicationType::Native if !localhost && web_scheme => {
                Err(RedirectSchemeViolation::NativeRemoteWebScheme)
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "web" => Ok(ApplicationType::Web),
            "native" => Ok(ApplicationType::Native),
            other => Err(format!("unsupported application type `{other}`")),
        }
    }
}

/// A redirect URI that does not fit its application type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RedirectSchemeViolation {
    /// Remote redirect URI of a web client without TLS
    #[error("web clients must use https for redirect uris that are not on localhost")]
    WebRequiresHttps,

    /// Localhost redirect URI of a web client with a non-web scheme
    #[error("web clients may only use http or https for localhost redirect uris")]
    WebLocalhostScheme,

    /// Remote http(s) redirect URI of a native client
    #[error(
        "native clients must use a custom scheme or localhost, not http or https on a remote host"
    )]
    NativeRemoteWebScheme,
}

/// The document is not a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a client identifier document must be a JSON object, found {0}")]
pub struct DocumentError(&'static str);

/// A Client Identifier Document.
///
/// Recognised fields live in a fixed record, localized variants in an
/// ordered map keyed by `(field, tag)`, and anything else in `unknown`. The
/// split happens at the serialization boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientIdDocument {
    context: Option<Value>,
    client_id: Option<Value>,
    client_name: Option<Value>,
    client_uri: Option<Value>,
    logo_uri: Option<Value>,
    tos_uri: Option<Value>,
    policy_uri: Option<Value>,
    redirect_uris: Option<Value>,
    scope: Option<Value>,
    grant_types: Option<Value>,
    response_types: Option<Value>,
    application_type: Option<Value>,
    token_endpoint_auth_method: Option<Value>,
    require_auth_time: Option<Value>,
    default_max_age: Option<Value>,
    contacts: Option<Value>,
    localized: BTreeMap<LocalizedKey, Value>,
    unknown: BTreeMap<String, Value>,
}

impl ClientIdDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, field: Field) -> &Option<Value> {
        match field {
            Field::Context => &self.context,
            Field::ClientId => &self.client_id,
            Field::ClientName => &self.client_name,
            Field::ClientUri => &self.client_uri,
            Field::LogoUri => &self.logo_uri,
            Field::TosUri => &self.tos_uri,
            Field::PolicyUri => &self.policy_uri,
            Field::RedirectUris => &self.redirect_uris,
            Field::Scope => &self.scope,
            Field::GrantTypes => &self.grant_types,
            Field::ResponseTypes => &self.response_types,
            Field::ApplicationType => &self.application_type,
            Field::TokenEndpointAuthMethod => &self.token_endpoint_auth_method,
            Field::RequireAuthTime => &self.require_auth_time,
            Field::DefaultMaxAge => &self.default_max_age,
            Field::Contacts => &self.contacts,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<Value> {
        match field {
            Field::Context => &mut self.context,
            Field::ClientId => &mut self.client_id,
            Field::ClientName => &mut self.client_name,
            Field::ClientUri => &mut self.client_uri,
            Field::LogoUri => &mut self.logo_uri,
            Field::TosUri => &mut self.tos_uri,
            Field::PolicyUri => &mut self.policy_uri,
            Field::RedirectUris => &mut self.redirect_uris,
            Field::Scope => &mut self.scope,
            Field::GrantTypes => &mut self.grant_types,
            Field::ResponseTypes => &mut self.response_types,
            Field::ApplicationType => &mut self.application_type,
            Field::TokenEndpointAuthMethod => &mut self.token_endpoint_auth_method,
            Field::RequireAuthTime => &mut self.require_auth_time,
            Field::DefaultMaxAge => &mut self.default_max_age,
            Field::Contacts => &mut self.contacts,
        }
    }

    /// Value of a recognised field.
    pub fn get(&self, field: Field) -> Option<&Value> {
        self.slot(field).as_ref()
    }

    /// String value of a recognised field, `None` if unset or not a string.
    pub fn get_str(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Whether the key is present at all (a JSON `null` counts as present).
    pub fn contains(&self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    /// Set a recognised field.
    pub fn set(&mut self, field: Field, value: impl Into<Value>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Remove a recognised field, returning its previous value.
    pub fn remove(&mut self, field: Field) -> Option<Value> {
        self.slot_mut(field).take()
    }

    /// Set a localized variant.
    pub fn set_localized(&mut self, key: LocalizedKey, value: impl Into<Value>) {
        self.localized.insert(key, value.into());
    }

    /// All localized variants of one field, ordered by tag.
    pub fn localized(&self, field: Field) -> impl Iterator<Item = (&LocalizedKey, &Value)> {
        self.localized.iter().filter(move |(key, _)| key.field == field)
    }

    /// Every localized variant of every field.
    pub fn localized_entries(&self) -> impl Iterator<Item = (&LocalizedKey, &Value)> {
        self.localized.iter()
    }

    /// The unlocalized value (if any) followed by all localized variants,
    /// each paired with its full key.
    pub fn variants(&self, field: Field) -> Vec<(String, &Value)> {
        let mut variants = Vec::new();
        if let Some(value) = self.get(field) {
            variants.push((field.as_str().to_string(), value));
        }
        variants.extend(self.localized(field).map(|(key, value)| (key.to_string(), value)));
        variants
    }

    /// Keys that are neither recognised fields nor valid localizations.
    pub fn unknown(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.unknown.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        Field::ALL.iter().filter(|field| self.contains(**field)).count()
            + self.localized.len()
            + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All top-level keys in serialization order.
    pub fn keys(&self) -> Vec<String> {
        self.entries().map(|(key, _)| key).collect()
    }

    fn entries(&self) -> impl Iterator<Item = (String, &Value)> {
        let fixed = Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field.as_str().to_string(), value)));
        let localized = self
            .localized
            .iter()
            .map(|(key, value)| (key.to_string(), value));
        let unknown = self.unknown.iter().map(|(key, value)| (key.clone(), value));
        fixed.chain(localized).chain(unknown)
    }

    /// Split a JSON object into the fixed record, localizations and unknown keys.
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut document = Self::default();
        for (key, value) in map {
            if let Ok(field) = key.parse::<Field>() {
                document.set(field, value);
            } else if let Some(localized) = LocalizedKey::parse(&key) {
                document.localized.insert(localized, value);
            } else {
                document.unknown.insert(key, value);
            }
        }
        document
    }

    /// Build a document from an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Err(DocumentError("null")),
            Value::Bool(_) => Err(DocumentError("a boolean")),
            Value::Number(_) => Err(DocumentError("a number")),
            Value::String(_) => Err(DocumentError("a string")),
            Value::Array(_) => Err(DocumentError("an array")),
        }
    }

    /// Merge everything back into one JSON object.
    pub fn to_map(&self) -> Map<String, Value> {
        self.entries()
            .map(|(key, value)| (key, value.clone()))
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }
}

impl Serialize for ClientIdDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.entries() {
            map.serialize_entry(&key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClientIdDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_map)
    }
}

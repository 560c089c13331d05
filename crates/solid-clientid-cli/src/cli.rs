//! CLI argument parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use solid_clientid::language_tag::is_valid_language_tag;
use solid_clientid::{ApplicationType, GeneratorParams, Localizable, LocalizedValue};
use std::path::PathBuf;

use crate::error::{CliError, CliResult};

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(
    name = "solid-clientid",
    version,
    about = "Generate and validate Solid-OIDC Client Identifier Documents",
    long_about = "Generate minimal Client Identifier Documents and validate existing ones,\n\
                  either locally or by fetching them from their client_id the way an\n\
                  identity provider would.\n\n\
                  Configuration is read from solid-clientid.toml (or --config) and\n\
                  SOLID_CLIENTID_* environment variables."
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file (default: ./solid-clientid.toml if present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a minimal Client Identifier Document
    Generate(GenerateArgs),

    /// Validate a document from a file or stdin
    Validate(ValidateArgs),

    /// Fetch a document from its IRI and validate it
    ValidateRemote(ValidateRemoteArgs),

    /// List every rule and the findings it can produce
    Rules,

    /// Run the remote-fetch validation service
    Serve(ServeArgs),
}

/// Generator parameters.
///
/// Localizable values are either a plain value or `lang=value`; the flag may
/// be repeated. `=value` addresses the unlocalized field explicitly, and is
/// the only way to write a plain value whose text before the first `=` looks
/// like a language tag (`Tom=Jerry` is read as language `Tom`).
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Redirect URI (repeatable, at least one)
    #[arg(long = "redirect-uri", required = true)]
    pub redirect_uris: Vec<String>,

    /// The client identifier, usually the URI the document is published at
    #[arg(long)]
    pub client_id: String,

    /// Space-separated scope (default: "openid webid")
    #[arg(long)]
    pub scope: Option<String>,

    /// Application type
    #[arg(long)]
    pub application_type: Option<ApplicationType>,

    /// Client homepage
    #[arg(long)]
    pub client_uri: Vec<String>,

    /// Logo
    #[arg(long)]
    pub logo_uri: Vec<String>,

    /// Human-readable client name, `Name` or `lang=Name` (repeatable)
    ///
    /// Text before the first `=` that is a well-formed language tag is read as
    /// the language, so `Tom=Jerry` sets `client_name#Tom`. Write `=Tom=Jerry`
    /// for the literal name.
    #[arg(long, value_name = "[LANG=]NAME")]
    pub client_name: Vec<String>,

    /// Terms of service
    #[arg(long)]
    pub tos_uri: Vec<String>,

    /// Privacy policy
    #[arg(long)]
    pub policy_uri: Vec<String>,

    /// Whether the auth_time claim is required
    #[arg(long)]
    pub require_auth_time: Option<bool>,

    /// Maximum authentication age in seconds
    #[arg(long, allow_negative_numbers = true)]
    pub default_max_age: Option<i64>,

    /// Contact e-mail address (repeatable)
    #[arg(long = "contact")]
    pub contacts: Vec<String>,

    /// Grant type (repeatable, default: authorization_code)
    #[arg(long = "grant-type")]
    pub grant_types: Vec<String>,

    /// Token endpoint authentication method
    #[arg(long)]
    pub token_endpoint_auth_method: Option<String>,

    /// Write the document to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Convert the flags into generator parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidArguments`] if a localized value carries an
    /// empty value.
    pub fn to_params(&self) -> CliResult<GeneratorParams> {
        let mut params = GeneratorParams::new(self.redirect_uris.clone(), self.client_id.clone());
        params.scope = self.scope.clone();
        params.application_type = self.application_type;
        params.client_uri = parse_localizable(&self.client_uri)?;
        params.logo_uri = parse_localizable(&self.logo_uri)?;
        params.client_name = parse_localizable(&self.client_name)?;
        params.tos_uri = parse_localizable(&self.tos_uri)?;
        params.policy_uri = parse_localizable(&self.policy_uri)?;
        params.require_auth_time = self.require_auth_time;
        params.default_max_age = self.default_max_age;
        params.contacts = non_empty(&self.contacts);
        params.grant_types = non_empty(&self.grant_types);
        params.token_endpoint_auth_method = self.token_endpoint_auth_method.clone();
        Ok(params)
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

/// Split `lang=value`.
///
/// The prefix only counts as a language tag if it is empty or a well-formed
/// tag, so URIs with query strings pass through untouched. Plain text such as
/// `Tom=Jerry` is ambiguous and splits; a leading `=` keeps it whole.
pub fn parse_localized_value(raw: &str) -> LocalizedValue {
    match raw.split_once('=') {
        Some((lang, value)) if lang.is_empty() || is_valid_language_tag(lang) => {
            LocalizedValue::new(lang, value)
        }
        _ => LocalizedValue::new("", raw),
    }
}

/// Collapse repeated flag values into one [`Localizable`].
///
/// # Errors
///
/// Returns [`CliError::InvalidArguments`] for `lang=` with nothing after it.
pub fn parse_localizable(values: &[String]) -> CliResult<Option<Localizable>> {
    let entries: Vec<LocalizedValue> = values.iter().map(|raw| parse_localized_value(raw)).collect();
    if let Some(empty) = entries.iter().find(|entry| entry.val.is_empty()) {
        return Err(CliError::InvalidArguments(format!(
            "missing value for language `{}`",
            empty.lang
        )));
    }

    Ok(match entries.as_slice() {
        [] => None,
        [single] if single.lang.is_empty() => Some(Localizable::Single(single.val.clone())),
        _ => Some(Localizable::Localized(entries)),
    })
}

/// Local validation arguments
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Document file, or `-` for stdin
    #[arg(default_value = "-")]
    pub path: String,

    /// Only report findings on this field (e.g. `redirect_uris`, `clientName#de`)
    #[arg(long)]
    pub field: Option<String>,
}

/// Remote validation arguments
#[derive(Args, Debug, Clone)]
pub struct ValidateRemoteArgs {
    /// IRI the document is published at
    pub iri: String,

    /// Base URL of a validation service; without one the document is
    /// fetched in-process
    #[arg(long)]
    pub service_url: Option<String>,

    /// Only report findings on this field
    #[arg(long)]
    pub field: Option<String>,
}

/// Server arguments
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Bind address (overrides the config file)
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// Answer CORS requests from any origin
    #[arg(long)]
    pub permissive_cors: bool,

    /// Fetch documents on loopback, private and link-local addresses too
    /// (trusted networks only)
    #[arg(long)]
    pub allow_private_networks: bool,
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables with colors
    Human,
    /// Pretty-printed JSON
    Json,
}

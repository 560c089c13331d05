//! Error types for CLI operations

use solid_clientid::{FetchError, GenerationError, ServiceError};
use solid_clientid_server::ServerError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The generator rejected the parameters
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Validation produced error findings
    #[error("Validation found {errors} error(s)")]
    ValidationFailed { errors: usize },

    /// The validation service could not be set up
    #[error("Validation service error: {0}")]
    Service(#[from] ServiceError),

    /// The document fetcher could not be set up
    #[error("Fetcher error: {0}")]
    Fetch(#[from] FetchError),

    /// The collaborator server failed
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

impl CliError {
    /// Get user-friendly suggestions for resolving the error
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidArguments(_) => vec![
                "Localized values are written lang=value, e.g. --client-name de-DE=Beispiel",
                "Use --help to see expected format",
            ],
            Self::Generation(_) => vec![
                "Check redirect URIs against --application-type",
                "The scope must contain openid and webid exactly once",
            ],
            Self::ValidationFailed { .. } => {
                vec!["Run `solid-clientid rules` to see what each rule checks"]
            }
            Self::Service(_) => vec![
                "Check if the validation service is running",
                "Omit --service-url to fetch the document in-process",
            ],
            Self::Server(_) => vec!["Check that the bind address is free (--bind)"],
            Self::Config(_) => vec![
                "Check the TOML syntax of the config file",
                "Environment overrides use SOLID_CLIENTID_<SECTION>__<KEY>",
            ],
            _ => vec![],
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

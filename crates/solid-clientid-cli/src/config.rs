//! Layered configuration: optional TOML file, then `SOLID_CLIENTID_*`
//! environment variables.
//!
//! ```toml
//! [fetcher]
//! request_timeout_secs = 10
//! user_agent = "my-idp/1.0"
//!
//! [service]
//! base_url = "https://validator.example"
//!
//! [server]
//! bind_address = "0.0.0.0:3000"
//! # only on a trusted network
//! allow_private_networks = false
//! ```
//!
//! Nested keys are addressed with `__` in the environment, e.g.
//! `SOLID_CLIENTID_SERVER__BIND_ADDRESS=0.0.0.0:8080`.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use solid_clientid::{FetcherConfig, ServiceConfig};
use solid_clientid_server::ServerConfig;
use std::path::Path;

use crate::error::{CliError, CliResult};

/// Config file read from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "solid-clientid.toml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "SOLID_CLIENTID";

/// Everything the commands can be configured with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How documents are fetched, by `validate-remote` and `serve`
    pub fetcher: FetcherConfig,

    /// Remote validation service; unset means in-process fetching
    pub service: Option<ServiceConfig>,

    /// Collaborator server settings. Its fetcher is taken from `fetcher`.
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] if it
    /// exists, with environment variables layered on top.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit file is missing or has an unsupported
    /// extension, or if the merged configuration does not deserialize.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let mut builder = Config::builder();

        builder = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::InvalidArguments(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                let format = match path.extension().and_then(|s| s.to_str()) {
                    Some("toml") => FileFormat::Toml,
                    Some("json") => FileFormat::Json,
                    _ => {
                        return Err(CliError::InvalidArguments(format!(
                            "unsupported config format: {}",
                            path.display()
                        )));
                    }
                };
                let name = path.to_str().ok_or_else(|| {
                    CliError::InvalidArguments(format!("non UTF-8 config path: {}", path.display()))
                })?;
                builder.add_source(File::new(name, format))
            }
            None => builder.add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false)),
        };

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Server settings with the shared fetcher configuration applied
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            fetcher: self.fetcher.clone(),
            ..self.server.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::default();
        assert_eq!(config.service, None);
        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
        assert_eq!(config.fetcher, FetcherConfig::default());
    }

    #[test]
    fn test_load_toml_file() {
        let file = write_config(
            ".toml",
            r#"
            [fetcher]
            request_timeout_secs = 3
            user_agent = "test-agent/1.0"

            [service]
            base_url = "https://validator.example"

            [server]
            bind_address = "0.0.0.0:8080"
            "#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.fetcher.request_timeout_secs, 3);
        assert_eq!(config.fetcher.user_agent, "test-agent/1.0");
        // unset keys keep their defaults
        assert_eq!(config.fetcher.max_response_size, FetcherConfig::default().max_response_size);
        let service = config.service.clone().unwrap();
        assert_eq!(service.base_url, "https://validator.example");
        assert_eq!(service.request_timeout_secs, ServiceConfig::default().request_timeout_secs);

        let server = config.server_config();
        assert_eq!(server.bind_address, "0.0.0.0:8080");
        assert_eq!(server.fetcher.user_agent, "test-agent/1.0");
        // the served fetcher blocks internal hosts even though `fetcher` does not
        assert!(!config.fetcher.block_private_networks);
        assert!(server.effective_fetcher().block_private_networks);
    }

    #[test]
    fn test_trusted_server_opt_in() {
        let file = write_config(".toml", "[server]\nallow_private_networks = true\n");
        let server = AppConfig::load(Some(file.path())).unwrap().server_config();
        assert!(!server.effective_fetcher().block_private_networks);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/solid-clientid.toml")));
        assert!(matches!(result, Err(CliError::InvalidArguments(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_config(".ini", "[server]\n");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(CliError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let file = write_config(".toml", "[fetcher]\nrequest_timeout_secs = \"soon\"\n");
        assert!(matches!(AppConfig::load(Some(file.path())), Err(CliError::Config(_))));
    }
}

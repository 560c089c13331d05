//! # Solid Client ID CLI
//!
//! Command-line front-end for generating and validating Solid-OIDC Client
//! Identifier Documents.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a document with a localized name
//! solid-clientid generate --client-id https://app.example/id \
//!   --redirect-uri https://app.example/callback \
//!   --client-name "Example" --client-name de-DE=Beispiel
//!
//! # Validate a local file, or stdin with `-`
//! solid-clientid validate client-id.jsonld
//!
//! # Fetch and validate a published document
//! solid-clientid validate-remote https://app.example/id
//!
//! # Run the validation service other tools can call
//! solid-clientid serve --bind 0.0.0.0:3000
//! ```
//!
//! Validation commands exit with status 1 when any finding is an error.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod formatter;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub use cli::{Cli, Commands, OutputFormat};
pub use config::AppConfig;
pub use error::{CliError, CliResult};
pub use executor::CommandExecutor;
pub use formatter::Formatter;

/// Run the CLI application
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let colored = !cli.no_color && cli.format == OutputFormat::Human;
    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Formatter::new(cli.format, colored).display_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let executor = CommandExecutor::new(cli.format, colored, config);
    match executor.execute(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            executor.display_error(&e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins over the
/// default level unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

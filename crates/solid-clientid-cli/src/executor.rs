//! Command execution

use solid_clientid::{
    DocumentFetcher, HttpValidationService, InProcessValidationService, RemoteValidator,
    RuleCatalog, ServiceConfig, Status, ValidationResult, filter_by_field, generate,
    validate_local,
};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use crate::cli::{Commands, GenerateArgs, OutputFormat, ServeArgs, ValidateArgs, ValidateRemoteArgs};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::formatter::Formatter;

/// Execute CLI commands
pub struct CommandExecutor {
    pub formatter: Formatter,
    config: AppConfig,
}

impl CommandExecutor {
    #[must_use]
    pub fn new(format: OutputFormat, colored: bool, config: AppConfig) -> Self {
        Self {
            formatter: Formatter::new(format, colored),
            config,
        }
    }

    /// Display an error with rich formatting
    pub fn display_error(&self, error: &CliError) {
        self.formatter.display_error(error);
    }

    /// Execute a command
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ValidationFailed`] when a validation reports an
    /// error finding, or the error of the failing step.
    pub async fn execute(&self, command: Commands) -> CliResult<()> {
        match command {
            Commands::Generate(args) => self.execute_generate(&args).await,
            Commands::Validate(args) => self.execute_validate(args).await,
            Commands::ValidateRemote(args) => self.execute_validate_remote(args).await,
            Commands::Rules => self.formatter.display_rules(&RuleCatalog::all().describe()),
            Commands::Serve(args) => self.execute_serve(args).await,
        }
    }

    async fn execute_generate(&self, args: &GenerateArgs) -> CliResult<()> {
        // warnings are already logged by the generator
        let generated = generate(&args.to_params()?)?;
        let json = serde_json::to_string_pretty(&generated.document)?;
        match &args.output {
            Some(path) => {
                tokio::fs::write(path, format!("{json}\n")).await?;
                info!("Wrote {}", path.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }

    async fn execute_validate(&self, args: ValidateArgs) -> CliResult<()> {
        let text = read_document(&args.path).await?;
        let results = validate_local(text, &RuleCatalog::local()).await;
        let subject = if args.path == "-" { "stdin" } else { args.path.as_str() };
        self.report(subject, results, args.field.as_deref())
    }

    async fn execute_validate_remote(&self, args: ValidateRemoteArgs) -> CliResult<()> {
        let service_config = match (args.service_url, &self.config.service) {
            (Some(base_url), configured) => Some(ServiceConfig {
                base_url,
                ..configured.clone().unwrap_or_default()
            }),
            (None, configured) => configured.clone(),
        };

        let results = match service_config {
            Some(config) => {
                debug!("Validating {} through {}", args.iri, config.base_url);
                let service = HttpValidationService::new(&config)?;
                RemoteValidator::new(service).validate_remote(&args.iri).await
            }
            None => {
                debug!("Validating {} in-process", args.iri);
                let fetcher = DocumentFetcher::with_config(self.config.fetcher.clone())?;
                RemoteValidator::new(InProcessValidationService::new(fetcher))
                    .validate_remote(&args.iri)
                    .await
            }
        };

        self.report(&args.iri, results, args.field.as_deref())
    }

    async fn execute_serve(&self, args: ServeArgs) -> CliResult<()> {
        let mut config = self.config.server_config();
        if let Some(bind) = args.bind {
            config.bind_address = bind;
        }
        if args.permissive_cors {
            config.permissive_cors = true;
        }
        if args.allow_private_networks {
            config.allow_private_networks = true;
        }
        solid_clientid_server::serve(config).await?;
        Ok(())
    }

    fn report(
        &self,
        subject: &str,
        results: Vec<ValidationResult>,
        field: Option<&str>,
    ) -> CliResult<()> {
        let results = match field {
            Some(field) => filter_by_field(results, field),
            None => results,
        };
        self.formatter.display_results(subject, &results)?;
        check_findings(&results)
    }
}

/// Fail when any finding is an error.
///
/// # Errors
///
/// Returns [`CliError::ValidationFailed`] with the number of errors.
pub fn check_findings(results: &[ValidationResult]) -> CliResult<()> {
    let errors = results
        .iter()
        .filter(|result| result.status() == Status::Error)
        .count();
    if errors > 0 {
        warn!("{} error finding(s)", errors);
        return Err(CliError::ValidationFailed { errors });
    }
    Ok(())
}

async fn read_document(path: &str) -> CliResult<String> {
    if path == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(text)
    } else {
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

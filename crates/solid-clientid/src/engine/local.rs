//! Local validation: parse the input, then run every rule of a catalog on it
//! concurrently.

use futures::future::join_all;
use serde_json::Value;
use tracing::debug;

use crate::catalog::RuleCatalog;
use crate::document::ClientIdDocument;
use crate::result::{ResultDescription, RuleMetadata, Status, ValidationResult};
use crate::rule::ValidationContext;

static PARSER: RuleMetadata = RuleMetadata::local(
    "parseDocument",
    "The input must be a JSON object before any rule can run.",
);

const INVALID_JSON: ResultDescription = ResultDescription::new(
    Status::Error,
    "Invalid JSON",
    "The document could not be parsed as a JSON object.",
);

/// A document as handed to the local engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentInput {
    /// Raw text, parsed by the engine
    Text(String),

    /// Already parsed JSON
    Json(Value),
}

impl From<String> for DocumentInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for DocumentInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for DocumentInput {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<ClientIdDocument> for DocumentInput {
    fn from(document: ClientIdDocument) -> Self {
        Self::Json(document.to_value())
    }
}

impl DocumentInput {
    fn into_document(self) -> Result<ClientIdDocument, String> {
        let value = match self {
            Self::Text(text) => serde_json::from_str(&text).map_err(|e| e.to_string())?,
            Self::Json(value) => value,
        };
        ClientIdDocument::from_value(value).map_err(|e| e.to_string())
    }
}

fn invalid_json(reason: &str) -> ValidationResult {
    ValidationResult::new(
        INVALID_JSON
            .emit()
            .with_description(format!("{} {reason}.", INVALID_JSON.description)),
        PARSER.clone(),
    )
}

/// Validate a locally supplied document against `catalog`.
///
/// Text that is not JSON, or JSON that is not an object, yields exactly one
/// "Invalid JSON" error and no rule runs.
pub async fn validate_local(
    input: impl Into<DocumentInput>,
    catalog: &RuleCatalog,
) -> Vec<ValidationResult> {
    match input.into().into_document() {
        Ok(document) => run_rules(&ValidationContext::new(document), catalog).await,
        Err(reason) => {
            debug!("rejecting unparsable document: {}", reason);
            vec![invalid_json(&reason)]
        }
    }
}

/// Run every rule of `catalog` against `context` and tag the findings.
///
/// Rules run concurrently; the flattened list keeps catalog order.
pub async fn run_rules(context: &ValidationContext, catalog: &RuleCatalog) -> Vec<ValidationResult> {
    let checks = catalog.iter().map(|rule| async move {
        let results = rule.check(context).await;
        debug!(rule = %rule.metadata().name, findings = results.len(), "rule finished");
        results
            .into_iter()
            .map(|result| ValidationResult::new(result, rule.metadata().clone()))
            .collect::<Vec<_>>()
    });

    join_all(checks).await.into_iter().flatten().collect()
}

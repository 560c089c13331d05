//! Diagnostic types produced by the validation rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Error,
    Warning,
    Info,
    Success,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Error => "error",
            Status::Warning => "warning",
            Status::Info => "info",
            Status::Success => "success",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document field a finding refers to.
///
/// `field_name` may carry an index (`redirect_uris[1]`) or a locale
/// (`client_name#de`) suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedField {
    pub field_name: String,
    pub field_value: Value,
}

impl AffectedField {
    pub fn new(field_name: impl Into<String>, field_value: impl Into<Value>) -> Self {
        Self {
            field_name: field_name.into(),
            field_value: field_value.into(),
        }
    }
}

/// One finding of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub status: Status,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub affected_fields: Vec<AffectedField>,
}

impl RuleResult {
    pub fn new(status: Status, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            description: description.into(),
            affected_fields: Vec::new(),
        }
    }

    /// Attach an affected field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.affected_fields.push(AffectedField::new(name, value));
        self
    }

    /// Replace the description with a more specific one.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether any affected field matches `field_name` exactly.
    pub fn affects(&self, field_name: &str) -> bool {
        self.affected_fields
            .iter()
            .any(|field| field.field_name == field_name)
    }
}

/// Whether a rule inspects the document itself or the way it was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Local,
    Remote,
}

impl RuleCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleCategory::Local => "local",
            RuleCategory::Remote => "remote",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMetadata {
    pub name: Cow<'static, str>,
    pub description: Cow<'static, str>,
    pub category: RuleCategory,
}

impl RuleMetadata {
    pub const fn local(name: &'static str, description: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            category: RuleCategory::Local,
        }
    }

    pub const fn remote(name: &'static str, description: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            category: RuleCategory::Remote,
        }
    }
}

/// A possible finding of a rule, published for documentation and used as the
/// template the rule builds its [`RuleResult`]s from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultDescription {
    pub status: Status,
    pub title: &'static str,
    pub description: &'static str,
}

impl ResultDescription {
    pub const fn new(status: Status, title: &'static str, description: &'static str) -> Self {
        Self {
            status,
            title,
            description,
        }
    }

    /// Instantiate the template as a finding without affected fields.
    pub fn emit(&self) -> RuleResult {
        RuleResult::new(self.status, self.title, self.description)
    }

    /// Instantiate the template with one affected field.
    pub fn emit_for(&self, name: impl Into<String>, value: impl Into<Value>) -> RuleResult {
        self.emit().with_field(name, value)
    }
}

/// A [`RuleResult`] tagged with the metadata of the rule that produced it.
///
/// The engine attaches the metadata; rules never do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    #[serde(flatten)]
    pub result: RuleResult,
    pub rule: RuleMetadata,
}

impl ValidationResult {
    pub fn new(result: RuleResult, rule: RuleMetadata) -> Self {
        Self { result, rule }
    }

    pub fn status(&self) -> Status {
        self.result.status
    }

    pub fn title(&self) -> &str {
        &self.result.title
    }

    pub fn affected_fields(&self) -> &[AffectedField] {
        &self.result.affected_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_value(Status::Warning).unwrap(), json!("warning"));
        let status: Status = serde_json::from_value(json!("success")).unwrap();
        assert_eq!(status, Status::Success);
    }

    #[test]
    fn test_rule_result_always_serializes_affected_fields() {
        let result = RuleResult::new(Status::Info, "t", "d");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["affectedFields"], json!([]));
    }

    #[test]
    fn test_validation_result_wire_format() {
        const META: RuleMetadata = RuleMetadata::local("validScope", "Checks the scope");
        let result = ValidationResult::new(
            RuleResult::new(Status::Error, "Missing openid", "...").with_field("scope", "webid"),
            META,
        );
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["affectedFields"][0]["fieldName"], "scope");
        assert_eq!(value["rule"]["name"], "validScope");
        assert_eq!(value["rule"]["category"], "local");

        let back: ValidationResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_template_emit() {
        const TEMPLATE: ResultDescription =
            ResultDescription::new(Status::Warning, "Title", "Description");
        let result = TEMPLATE.emit_for("contacts[0]", "");
        assert_eq!(result.status, Status::Warning);
        assert!(result.affects("contacts[0]"));
    }
}

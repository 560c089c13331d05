use async_trait::async_trait;
use serde_json::Value;

use super::{indexed, json_type};
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "validContactsField",
    "contacts, if set, should be an array of non-empty strings.",
);

const UNSET: ResultDescription = ResultDescription::new(
    Status::Info,
    "No contacts",
    "Listing at least one contact helps identity provider operators reach the people responsible for the client.",
);

const NOT_AN_ARRAY: ResultDescription = ResultDescription::new(
    Status::Error,
    "Malformed contacts",
    "contacts must be an array of strings.",
);

const NOT_A_STRING: ResultDescription = ResultDescription::new(
    Status::Error,
    "Malformed contact",
    "Every contact must be a string.",
);

const EMPTY_ENTRY: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Empty contact",
    "The contact is an empty string.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid contacts",
    "contacts lists at least one contact.",
);

const RESULTS: &[ResultDescription] = &[UNSET, NOT_AN_ARRAY, NOT_A_STRING, EMPTY_ENTRY, VALID];

#[derive(Debug, Default, Clone, Copy)]
pub struct ValidContactsField;

#[async_trait]
impl ValidationRule for ValidContactsField {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_contacts(context.document())
    }
}

fn check_contacts(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::Contacts;
    let value = match document.get(field) {
        None => return vec![UNSET.emit()],
        Some(Value::Array(entries)) if entries.is_empty() => {
            return vec![UNSET.emit_for(field.as_str(), Value::Array(Vec::new()))];
        }
        Some(value) => value,
    };
    let Value::Array(entries) = value else {
        return vec![NOT_AN_ARRAY.emit_for(field.as_str(), value.clone()).with_description(
            format!("contacts must be an array of strings, found {}.", json_type(value)),
        )];
    };

    let mut results = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Value::String(contact) if contact.trim().is_empty() => {
                results.push(EMPTY_ENTRY.emit_for(indexed(field, index), entry.clone()));
            }
            Value::String(_) => {}
            other => results.push(NOT_A_STRING.emit_for(indexed(field, index), other.clone())),
        }
    }

    if results.is_empty() {
        results.push(VALID.emit_for(field.as_str(), value.clone()));
    }
    results
}

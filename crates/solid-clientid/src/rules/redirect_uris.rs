use async_trait::async_trait;
use serde_json::Value;

use super::{indexed, json_type};
use crate::document::{ClientIdDocument, Field};
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};
use crate::uri::{has_explicit_path, has_query, parse_uri};

static METADATA: RuleMetadata = RuleMetadata::local(
    "validRedirectUris",
    "redirect_uris must be a non-empty array of absolute URIs with an explicit path and no query.",
);

const MISSING: ResultDescription = ResultDescription::new(
    Status::Error,
    "Missing redirect URIs",
    "redirect_uris is required for clients using the authorization code flow.",
);

const NOT_AN_ARRAY: ResultDescription = ResultDescription::new(
    Status::Error,
    "Malformed redirect URIs",
    "redirect_uris must be an array of URI strings.",
);

const EMPTY: ResultDescription = ResultDescription::new(
    Status::Error,
    "Empty redirect URIs",
    "redirect_uris must contain at least one URI.",
);

const MALFORMED_ENTRY: ResultDescription = ResultDescription::new(
    Status::Error,
    "Malformed redirect URI",
    "Every redirect URI must be an absolute URI string.",
);

const NO_PATH: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Redirect URI without path",
    "Authorization servers compare redirect URIs as exact strings; spell out the path (at least `/`) to avoid mismatches.",
);

const HAS_QUERY: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Redirect URI with query",
    "Redirect URIs should not contain a query string; authorization servers may reject or mangle it.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid redirect URIs",
    "All redirect URIs are well-formed.",
);

const RESULTS: &[ResultDescription] = &[
    MISSING,
    NOT_AN_ARRAY,
    EMPTY,
    MALFORMED_ENTRY,
    NO_PATH,
    HAS_QUERY,
    VALID,
];

/// Checks the shape of `redirect_uris` and of each entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidRedirectUris;

#[async_trait]
impl ValidationRule for ValidRedirectUris {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_redirect_uris(context.document())
    }
}

fn check_redirect_uris(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::RedirectUris;
    let Some(value) = document.get(field) else {
        return vec![MISSING.emit()];
    };
    let Value::Array(entries) = value else {
        return vec![NOT_AN_ARRAY
            .emit_for(field.as_str(), value.clone())
            .with_description(format!(
                "redirect_uris must be an array of URI strings, found {}.",
                json_type(value)
            ))];
    };
    if entries.is_empty() {
        return vec![EMPTY.emit_for(field.as_str(), value.clone())];
    }

    let mut results = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let name = indexed(field, index);
        let Some(raw) = entry.as_str() else {
            results.push(MALFORMED_ENTRY.emit_for(name, entry.clone()).with_description(format!(
                "Redirect URIs must be strings, found {}.",
                json_type(entry)
            )));
            continue;
        };
        let Some(url) = parse_uri(raw) else {
            results.push(
                MALFORMED_ENTRY
                    .emit_for(name, raw)
                    .with_description(format!("`{raw}` is not an absolute URI.")),
            );
            continue;
        };
        if !has_explicit_path(raw, &url) {
            results.push(NO_PATH.emit_for(name.clone(), raw));
        }
        if has_query(&url) {
            results.push(HAS_QUERY.emit_for(name, raw));
        }
    }

    if results.is_empty() {
        results.push(VALID.emit_for(field.as_str(), value.clone()));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{document, statuses};
    use serde_json::json;

    #[test]
    fn test_missing_and_malformed_container() {
        assert_eq!(
            check_redirect_uris(&document(json!({})))[0].title,
            "Missing redirect URIs"
        );
        assert_eq!(
            check_redirect_uris(&document(json!({ "redirect_uris": "https://a.example/cb" })))[0]
                .title,
            "Malformed redirect URIs"
        );
        assert_eq!(
            check_redirect_uris(&document(json!({ "redirect_uris": [] })))[0].title,
            "Empty redirect URIs"
        );
    }

    #[test]
    fn test_entry_findings_are_indexed() {
        let results = check_redirect_uris(&document(json!({
            "redirect_uris": [
                "https://a.example/cb",
                42,
                "not a uri",
                "https://a.example",
                "https://a.example/cb?x=1"
            ]
        })));

        assert_eq!(
            statuses(&results),
            vec![Status::Error, Status::Error, Status::Warning, Status::Warning]
        );
        assert!(results[0].affects("redirect_uris[1]"));
        assert!(results[1].affects("redirect_uris[2]"));
        assert!(results[2].affects("redirect_uris[3]"));
        assert_eq!(results[3].title, "Redirect URI with query");
        assert!(results[3].affects("redirect_uris[4]"));
    }

    #[test]
    fn test_clean_redirect_uris() {
        let results = check_redirect_uris(&document(json!({
            "redirect_uris": ["https://a.example/cb", "com.example.app:/callback"]
        })));
        assert_eq!(statuses(&results), vec![Status::Success]);
    }
}

//! Field-scoped validation.

use crate::catalog::RuleCatalog;
use crate::document::LOCALE_SEPARATOR;
use crate::result::ValidationResult;

use super::local::{DocumentInput, validate_local};

/// Normalise a field name for comparison.
///
/// `redirectUris[2]`, ` Redirect-URIs `, and `redirect_uris` all become
/// `redirect_uris`. A `#tag` locale suffix is kept and lower-cased.
pub fn normalize_field_name(name: &str) -> String {
    let name = name.trim();
    let (field, tag) = match name.split_once(LOCALE_SEPARATOR) {
        Some((field, tag)) => (field, Some(tag)),
        None => (name, None),
    };

    let field = field.split('[').next().unwrap_or_default();
    let mut normalized = String::with_capacity(field.len() + 4);
    let mut previous: Option<char> = None;
    for c in field.chars() {
        match c {
            '-' | ' ' | '_' => {
                if !normalized.ends_with('_') {
                    normalized.push('_');
                }
            }
            c if c.is_ascii_uppercase() => {
                if previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit()) {
                    normalized.push('_');
                }
                normalized.push(c.to_ascii_lowercase());
            }
            c => normalized.push(c),
        }
        previous = Some(c);
    }

    match tag {
        Some(tag) => format!("{normalized}{LOCALE_SEPARATOR}{}", tag.trim().to_ascii_lowercase()),
        None => normalized,
    }
}

/// Strip the locale suffix of an already normalised name.
fn without_locale(name: &str) -> &str {
    name.split_once(LOCALE_SEPARATOR)
        .map_or(name, |(field, _)| field)
}

/// Keep the results that name `field` among their affected fields.
///
/// Without a locale in `field`, findings on every localization of that field
/// match too.
pub fn filter_by_field(results: Vec<ValidationResult>, field: &str) -> Vec<ValidationResult> {
    let wanted = normalize_field_name(field);
    let with_locale = wanted.contains(LOCALE_SEPARATOR);

    results
        .into_iter()
        .filter(|result| {
            result.affected_fields().iter().any(|affected| {
                let name = normalize_field_name(&affected.field_name);
                if with_locale {
                    name == wanted
                } else {
                    without_locale(&name) == wanted
                }
            })
        })
        .collect()
}

/// [`validate_local`] narrowed to the findings on one field.
pub async fn validate_local_field(
    input: impl Into<DocumentInput>,
    catalog: &RuleCatalog,
    field: &str,
) -> Vec<ValidationResult> {
    filter_by_field(validate_local(input, catalog).await, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{RuleMetadata, RuleResult, Status};

    static RULE: RuleMetadata = RuleMetadata::local("test", "test rule");

    fn finding(field: &str) -> ValidationResult {
        ValidationResult::new(
            RuleResult::new(Status::Warning, field, "").with_field(field, ""),
            RULE.clone(),
        )
    }

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_field_name("redirectUris"), "redirect_uris");
        assert_eq!(normalize_field_name(" redirect-uris[3] "), "redirect_uris");
        assert_eq!(normalize_field_name("Client Name"), "client_name");
        assert_eq!(normalize_field_name("tokenEndpointAuthMethod"), "token_endpoint_auth_method");
        assert_eq!(normalize_field_name("@context"), "@context");
        assert_eq!(normalize_field_name("clientName#de-DE"), "client_name#de-de");
    }

    #[test]
    fn test_filter_by_field() {
        let results = vec![
            finding("redirect_uris[0]"),
            finding("client_name"),
            finding("client_name#de"),
            finding("scope"),
        ];

        let redirect = filter_by_field(results.clone(), "redirectUris");
        assert_eq!(redirect.len(), 1);

        let names = filter_by_field(results.clone(), "client_name");
        assert_eq!(names.len(), 2);

        let german = filter_by_field(results, "client_name#DE");
        assert_eq!(german.len(), 1);
        assert_eq!(german[0].title(), "client_name#de");
    }
}

use async_trait::async_trait;
use serde_json::Value;

use crate::document::{ClientIdDocument, Field};
use crate::generator::MIN_RECOMMENDED_MAX_AGE;
use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{ValidationContext, ValidationRule};

static METADATA: RuleMetadata = RuleMetadata::local(
    "validDefaultMaxAge",
    "default_max_age, if set, must be a positive number of seconds.",
);

const INVALID: ResultDescription = ResultDescription::new(
    Status::Error,
    "Invalid default max age",
    "default_max_age must be a positive integer number of seconds.",
);

const SHORT: ResultDescription = ResultDescription::new(
    Status::Info,
    "Short default max age",
    "With a default_max_age below 60 seconds users will have to log in again very often.",
);

const VALID: ResultDescription = ResultDescription::new(
    Status::Success,
    "Valid default max age",
    "default_max_age is a positive number of seconds.",
);

const RESULTS: &[ResultDescription] = &[INVALID, SHORT, VALID];

#[derive(Debug, Default, Clone, Copy)]
pub struct ValidDefaultMaxAge;

#[async_trait]
impl ValidationRule for ValidDefaultMaxAge {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        check_max_age(context.document())
    }
}

/// Positive whole seconds. Integral floats such as `3600.0` count, since JSON
/// does not tell them apart from `3600`; fractions, overflow and strings do not.
#[allow(clippy::cast_possible_truncation)]
fn positive_seconds(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|seconds| seconds.fract() == 0.0 && seconds.abs() < i64::MAX as f64)
                .map(|seconds| seconds as i64)
        })
        .filter(|seconds| *seconds > 0)
}

fn check_max_age(document: &ClientIdDocument) -> Vec<RuleResult> {
    let field = Field::DefaultMaxAge.as_str();
    let Some(value) = document.get(Field::DefaultMaxAge) else {
        return Vec::new();
    };

    match positive_seconds(value) {
        None => vec![INVALID.emit_for(field, value.clone())],
        Some(seconds) if seconds < MIN_RECOMMENDED_MAX_AGE => {
            vec![SHORT.emit_for(field, seconds)]
        }
        Some(seconds) => vec![VALID.emit_for(field, seconds)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{document, statuses};
    use serde_json::json;

    #[test]
    fn test_max_age_grading() {
        let check = |value: Value| statuses(&check_max_age(&document(json!({ "default_max_age": value }))));

        assert_eq!(check(json!(3600)), vec![Status::Success]);
        assert_eq!(check(json!(30)), vec![Status::Info]);
        assert_eq!(check(json!(0)), vec![Status::Error]);
        assert_eq!(check(json!(-5)), vec![Status::Error]);
        assert_eq!(check(json!(1.5)), vec![Status::Error]);
        assert_eq!(check(json!("3600")), vec![Status::Error]);
        assert_eq!(check(json!(u64::MAX)), vec![Status::Error]);
    }

    #[test]
    fn test_integral_floats_are_whole_seconds() {
        let check = |value: Value| check_max_age(&document(json!({ "default_max_age": value })));

        let results = check(json!(3600.0));
        assert_eq!(statuses(&results), vec![Status::Success]);
        assert_eq!(results[0].affected_fields[0].field_value, json!(3600));
        assert_eq!(statuses(&check(json!(30.0))), vec![Status::Info]);
        assert_eq!(statuses(&check(json!(0.0))), vec![Status::Error]);
        assert_eq!(statuses(&check(json!(1e300))), vec![Status::Error]);
    }

    #[test]
    fn test_unset_is_silent() {
        assert!(check_max_age(&document(json!({}))).is_empty());
    }
}

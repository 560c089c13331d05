//! Property tests for the document generator

use proptest::prelude::*;
use solid_clientid::{Field, GeneratorParams, LocalizedValue, generate};

const CLIENT_ID: &str = "https://app.example/webid#this";

fn params() -> GeneratorParams {
    GeneratorParams::new(vec!["https://app.example/callback".to_string()], CLIENT_ID)
}

/// Scope tokens that are neither `openid` nor `webid`.
fn extra_token() -> impl Strategy<Value = String> {
    "[a-z_:]{1,12}".prop_filter("not a required scope", |token| {
        token != "openid" && token != "webid"
    })
}

proptest! {
    #[test]
    fn scope_with_required_tokens_once_is_accepted(
        extras in proptest::collection::vec(extra_token(), 0..5),
        openid_first in any::<bool>(),
    ) {
        let mut tokens = extras.clone();
        let (first, second) = if openid_first { ("openid", "webid") } else { ("webid", "openid") };
        tokens.insert(0, first.to_string());
        tokens.push(second.to_string());
        let scope = tokens.join(" ");

        let generated = generate(&params().with_scope(scope.clone())).unwrap();
        prop_assert_eq!(generated.document.get_str(Field::Scope), Some(scope.as_str()));
    }

    #[test]
    fn scope_without_webid_is_rejected(extras in proptest::collection::vec(extra_token(), 0..5)) {
        let mut tokens = extras;
        tokens.push("openid".to_string());
        prop_assert!(generate(&params().with_scope(tokens.join(" "))).is_err());
    }

    #[test]
    fn generation_is_deterministic(max_age in 0i64..100_000, name in "[A-Za-z ]{1,20}") {
        let input = params()
            .with_default_max_age(max_age)
            .with_client_name(vec![LocalizedValue::new("", name.clone()), LocalizedValue::new("en", name)]);
        let first = generate(&input).unwrap();
        let second = generate(&input).unwrap();
        prop_assert_eq!(first, second);
    }
}

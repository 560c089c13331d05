use async_trait::async_trait;

use crate::result::{ResultDescription, RuleMetadata, RuleResult, Status};
use crate::rule::{FetchResponse, ValidationContext, ValidationRule};

/// Media type a Client Identifier Document must be served with.
pub const JSON_LD_MEDIA_TYPE: &str = "application/ld+json";

static METADATA: RuleMetadata = RuleMetadata::remote(
    "remoteDocumentAsJsonLd",
    "The document must be served directly, with status 200 and content-type application/ld+json.",
);

const REDIRECTED: ResultDescription = ResultDescription::new(
    Status::Error,
    "Redirect during fetch",
    "The IRI answered with a redirect. Identity providers fetch the client_id without following redirects.",
);

const BAD_STATUS: ResultDescription = ResultDescription::new(
    Status::Error,
    "Unexpected status code",
    "The document must be served with status 200.",
);

const MISSING_CONTENT_TYPE: ResultDescription = ResultDescription::new(
    Status::Error,
    "Missing content-type",
    "The response has no content-type header; it must be application/ld+json.",
);

const PLAIN_JSON: ResultDescription = ResultDescription::new(
    Status::Warning,
    "Served as application/json",
    "The document is served as application/json. Most identity providers accept that, but the correct media type is application/ld+json.",
);

const WRONG_CONTENT_TYPE: ResultDescription = ResultDescription::new(
    Status::Error,
    "Wrong content-type",
    "The document must be served with content-type application/ld+json.",
);

const SERVED_AS_JSON_LD: ResultDescription = ResultDescription::new(
    Status::Success,
    "Served as JSON-LD",
    "The document is served with status 200 and content-type application/ld+json.",
);

const RESULTS: &[ResultDescription] = &[
    REDIRECTED,
    BAD_STATUS,
    MISSING_CONTENT_TYPE,
    PLAIN_JSON,
    WRONG_CONTENT_TYPE,
    SERVED_AS_JSON_LD,
];

#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteDocumentAsJsonLd;

#[async_trait]
impl ValidationRule for RemoteDocumentAsJsonLd {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn result_descriptions(&self) -> &'static [ResultDescription] {
        RESULTS
    }

    async fn check(&self, context: &ValidationContext) -> Vec<RuleResult> {
        context
            .fetch_response()
            .map(check_response)
            .unwrap_or_default()
    }
}

fn check_response(response: &FetchResponse) -> Vec<RuleResult> {
    if response.is_redirect() {
        let target = response.location.as_deref().unwrap_or("an unknown location");
        return vec![REDIRECTED.emit().with_description(format!(
            "{} answered with status {} and redirects to {target}. Serve the document directly.",
            response.url, response.status
        ))];
    }

    if response.status != 200 {
        return vec![BAD_STATUS.emit().with_description(format!(
            "{} answered with status {}; the document must be served with status 200.",
            response.url, response.status
        ))];
    }

    let result = match response.media_type().as_deref() {
        None => MISSING_CONTENT_TYPE.emit(),
        Some(JSON_LD_MEDIA_TYPE) => SERVED_AS_JSON_LD.emit(),
        Some("application/json") => PLAIN_JSON.emit(),
        Some(other) => WRONG_CONTENT_TYPE.emit().with_description(format!(
            "The document is served as {other}; it must be served as {JSON_LD_MEDIA_TYPE}."
        )),
    };
    vec![result]
}

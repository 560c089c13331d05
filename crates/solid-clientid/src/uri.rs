//! URI helpers shared by the generator and the rule catalog.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

static LOOPBACK_V4_RE: OnceLock<Regex> = OnceLock::new();

/// Parse an absolute URI. Relative references are rejected.
pub fn parse_uri(raw: &str) -> Option<Url> {
    Url::parse(raw).ok()
}

/// Whether `host` denotes the local machine: `localhost`, `[::1]` or `127.x.x.x`.
pub fn is_localhost_host(host: &str) -> bool {
    let loopback_v4 = LOOPBACK_V4_RE.get_or_init(|| {
        Regex::new(r"^127\.\d{1,3}\.\d{1,3}\.\d{1,3}$").expect("loopback pattern is valid")
    });

    host.eq_ignore_ascii_case("localhost") || host == "[::1]" || loopback_v4.is_match(host)
}

/// Whether the parsed URI points at the local machine.
pub fn is_localhost(url: &Url) -> bool {
    url.host_str().is_some_and(is_localhost_host)
}

/// Whether the raw URI spells out a path component.
///
/// The URL parser normalises `https://app.example` to a path of `/`, so the
/// check looks at the original text after the authority. Special schemes
/// tolerate any number of slashes (or none) before the host, as in
/// `https:app.example`.
pub fn has_explicit_path(raw: &str, url: &Url) -> bool {
    if url.cannot_be_a_base() || url.host().is_none() {
        return !url.path().is_empty();
    }

    let Some((_, rest)) = raw.trim().split_once(':') else {
        return !url.path().is_empty();
    };
    let authority_and_rest = rest.trim_start_matches(['/', '\\']);
    match authority_and_rest.find(['/', '\\', '?', '#']) {
        Some(idx) => authority_and_rest[idx..].starts_with(['/', '\\']),
        None => false,
    }
}

/// Whether the URI carries a query component (an empty `?` counts).
pub fn has_query(url: &Url) -> bool {
    url.query().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_detection() {
        for raw in [
            "http://localhost:3000/cb",
            "http://127.0.0.1/cb",
            "http://127.10.20.30:8080/cb",
            "http://[::1]:4000/cb",
        ] {
            let url = parse_uri(raw).unwrap();
            assert!(is_localhost(&url), "{raw} should be localhost");
        }

        let remote = parse_uri("https://app.example/cb").unwrap();
        assert!(!is_localhost(&remote));
        let custom = parse_uri("com.example.app:/callback").unwrap();
        assert!(!is_localhost(&custom));
    }

    #[test]
    fn test_explicit_path() {
        let cases = [
            ("https://app.example", false),
            ("https://app.example/", true),
            ("https://app.example/callback", true),
            ("https://app.example?x=/y", false),
            ("https://app.example:8443#frag", false),
            ("com.example.app:/callback", true),
            ("urn:example:client", true),
            ("https:app.example", false),
            ("https:/app.example", false),
            ("https:app.example/callback", true),
            ("https:///app.example?x=/y", false),
        ];
        for (raw, expected) in cases {
            let url = parse_uri(raw).unwrap();
            assert_eq!(has_explicit_path(raw, &url), expected, "{raw}");
        }
    }

    #[test]
    fn test_query_detection() {
        assert!(has_query(&parse_uri("https://a.example/cb?x=1").unwrap()));
        assert!(!has_query(&parse_uri("https://a.example/cb").unwrap()));
    }

    #[test]
    fn test_relative_references_rejected() {
        assert!(parse_uri("/callback").is_none());
        assert!(parse_uri("my-client").is_none());
        assert!(parse_uri("").is_none());
    }
}

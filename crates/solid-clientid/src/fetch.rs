//! # Remote Document Fetcher
//!
//! Fetches a Client Identifier Document the way an identity provider would:
//! a single `GET` with an identifying User-Agent, no redirect following, a
//! timeout and a cap on the body size. The raw outcome is returned as a
//! [`FetchResponse`] so the remote rules can judge status and headers.
//!
//! A fetcher exposed to untrusted callers should set
//! [`FetcherConfig::block_private_networks`]: the destination host is then
//! resolved up front and loopback, private, link-local and unspecified
//! addresses are refused before any request is sent.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, ToSocketAddrs};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::{Host, Url};

use crate::rule::FetchResponse;
use crate::uri::parse_uri;

/// Accept header sent with every fetch.
pub const ACCEPT: &str = "application/ld+json, application/json;q=0.9, */*;q=0.1";

/// Fetcher errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// The IRI is not an absolute http(s) URI
    #[error("Invalid document IRI `{0}`")]
    InvalidIri(String),

    /// The server did not answer in time
    #[error("Fetching {0} timed out")]
    Timeout(String),

    /// Connection or protocol failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response size limit exceeded
    #[error("Response exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    /// The destination is on a network the fetcher may not reach
    #[error("Refusing to fetch {iri}: {reason}")]
    Blocked { iri: String, reason: String },
}

/// Configuration for [`DocumentFetcher`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Whole-request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds (default: 5)
    pub connect_timeout_secs: u64,

    /// Maximum response size in bytes (default: 1 MiB)
    pub max_response_size: usize,

    /// User agent for HTTP requests
    pub user_agent: String,

    /// Refuse hosts that resolve to loopback, private, link-local or
    /// unspecified addresses (default: false)
    pub block_private_networks: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            max_response_size: 1024 * 1024,
            user_agent: format!("solid-clientid-validator/{}", env!("CARGO_PKG_VERSION")),
            block_private_networks: false,
        }
    }
}

impl FetcherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// HTTP fetcher for remote Client Identifier Documents.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl DocumentFetcher {
    /// Create a fetcher with default configuration
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(FetcherConfig::default())
    }

    /// Create a fetcher with custom configuration
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails
    pub fn with_config(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| FetchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch the document at `iri`.
    ///
    /// Any HTTP answer, including redirects and error statuses, is a
    /// successful fetch; only transport problems are errors.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the IRI is unusable or its host is blocked,
    /// the request fails or times out, or the body exceeds the size limit.
    pub async fn fetch(&self, iri: &str) -> Result<FetchResponse, FetchError> {
        let url = parse_uri(iri)
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| FetchError::InvalidIri(iri.to_string()))?;
        if self.config.block_private_networks {
            check_destination(iri, &url)?;
        }

        debug!("Fetching client identifier document: {}", iri);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| self.classify(iri, &e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Non-success status {} for document: {}", status, iri);
        }

        let header = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let location = header(reqwest::header::LOCATION);

        let limit = self.config.max_response_size;
        if let Some(content_length) = response.content_length()
            && content_length > limit as u64
        {
            return Err(FetchError::ResponseTooLarge { limit });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify(iri, &e))?;
        if body.len() > limit {
            return Err(FetchError::ResponseTooLarge { limit });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "fetched document");
        Ok(FetchResponse {
            url: iri.to_string(),
            status: status.as_u16(),
            content_type,
            location,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    fn classify(&self, iri: &str, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            warn!("Timed out after {:?} fetching {}", self.config.request_timeout(), iri);
            FetchError::Timeout(iri.to_string())
        } else {
            FetchError::Http(error.to_string())
        }
    }
}

/// Refuse `url` when its host is, or resolves to, an internal address.
fn check_destination(iri: &str, url: &Url) -> Result<(), FetchError> {
    let blocked = |reason: String| {
        warn!("Blocked fetch of {}: {}", iri, reason);
        FetchError::Blocked {
            iri: iri.to_string(),
            reason,
        }
    };

    let addresses: Vec<IpAddr> = match url.host() {
        Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
        Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            if domain == "localhost" || domain.ends_with(".localhost") {
                return Err(blocked(format!("{domain} is the local machine")));
            }
            let port = url.port_or_known_default().unwrap_or(443);
            (domain.as_str(), port)
                .to_socket_addrs()
                .map_err(|e| FetchError::Http(format!("Could not resolve {domain}: {e}")))?
                .map(|addr| addr.ip())
                .collect()
        }
        None => return Err(FetchError::InvalidIri(iri.to_string())),
    };

    if addresses.len() > 1 {
        debug!("{} resolves to {:?}", iri, addresses);
    }
    match addresses.into_iter().find_map(internal_range) {
        Some((ip, range)) => Err(blocked(format!("{ip} is a {range} address"))),
        None => Ok(()),
    }
}

/// The internal range `ip` falls into, if any.
fn internal_range(ip: IpAddr) -> Option<(IpAddr, &'static str)> {
    let range = match ip {
        IpAddr::V4(v4) => ipv4_range(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => ipv4_range(v4),
            None => ipv6_range(v6),
        },
    };
    range.map(|range| (ip, range))
}

fn ipv4_range(ip: Ipv4Addr) -> Option<&'static str> {
    if ip.is_loopback() {
        Some("loopback")
    } else if ip.is_private() {
        Some("private network")
    } else if ip.is_link_local() {
        // includes the 169.254.169.254 cloud metadata endpoint
        Some("link-local")
    } else if ip.is_unspecified() || ip.is_broadcast() {
        Some("non-routable")
    } else {
        None
    }
}

fn ipv6_range(ip: Ipv6Addr) -> Option<&'static str> {
    let first = ip.segments()[0];
    if ip.is_loopback() {
        Some("loopback")
    } else if first & 0xfe00 == 0xfc00 {
        Some("unique local")
    } else if first & 0xffc0 == 0xfe80 {
        Some("link-local")
    } else if ip.is_unspecified() {
        Some("non-routable")
    } else {
        None
    }
}

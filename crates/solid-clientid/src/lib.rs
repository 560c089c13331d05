//! # Solid Client ID - Client Identifier Documents for Solid-OIDC
//!
//! Generate and validate Solid-OIDC Client Identifier Documents: the JSON-LD
//! metadata a client publishes at its `client_id` URI.
//!
//! ## Design Principles
//!
//! - **Generation fails fast**: the first violated invariant is returned as a
//!   [`GenerationError`]; there is no partial document
//! - **Validation never fails**: every finding, including unparsable input, is
//!   a [`ValidationResult`]
//! - **Explicit catalogs**: engines take a [`RuleCatalog`] argument, so tests
//!   and callers can run any subset of rules
//!
//! ## Architecture
//!
//! - [`document`] - The document model (fixed fields, localizations, unknown keys)
//! - [`generator`] - Minimal document generation from [`GeneratorParams`]
//! - [`rule`] - The [`ValidationRule`] contract and [`ValidationContext`]
//! - [`rules`] - The rule catalog
//! - [`catalog`] - [`RuleCatalog`], the list the engines run
//! - [`engine`] - Local, field-scoped and remote validation
//! - [`fetch`] - Fetching documents the way an identity provider does
//! - [`service`] - The remote-fetch collaborator, over HTTP or in-process
//!
//! ## Quick Start
//!
//! ```rust
//! use solid_clientid::{RuleCatalog, Status, validate_local};
//!
//! # tokio_test::block_on(async {
//! let document = r#"{
//!     "@context": ["https://www.w3.org/ns/solid/oidc-context.jsonld"],
//!     "client_id": "https://app.example/id",
//!     "redirect_uris": ["https://app.example/callback"],
//!     "scope": "openid webid",
//!     "grant_types": ["authorization_code"],
//!     "token_endpoint_auth_method": "none"
//! }"#;
//!
//! let results = validate_local(document, &RuleCatalog::local()).await;
//! assert!(results.iter().all(|result| result.status() != Status::Error));
//! # });
//! ```

pub mod catalog;
pub mod document;
pub mod engine;
pub mod fetch;
pub mod generator;
pub mod language_tag;
pub mod result;
pub mod rule;
pub mod rules;
pub mod service;
pub mod uri;

pub use catalog::RuleCatalog;
pub use document::{ApplicationType, ClientIdDocument, Field, LocalizedKey, SOLID_OIDC_CONTEXT};
pub use engine::{
    DocumentInput, RemoteValidator, filter_by_field, normalize_field_name, validate_local,
    validate_local_field,
};
pub use fetch::{DocumentFetcher, FetchError, FetcherConfig};
pub use generator::{
    GeneratedDocument, GenerationError, GenerationErrorKind, GenerationWarning, GeneratorParams,
    Localizable, LocalizedValue, generate,
};
pub use result::{
    AffectedField, ResultDescription, RuleCategory, RuleMetadata, RuleResult, Status,
    ValidationResult,
};
pub use rule::{FetchResponse, ValidationContext, ValidationRule};
pub use service::{
    HttpValidationService, InProcessValidationService, RemoteValidationResponse, ServiceConfig,
    ServiceError, ValidationService,
};

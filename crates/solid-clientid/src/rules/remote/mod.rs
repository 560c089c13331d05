//! Rules that look at how the document was served rather than at its content.
//!
//! They need [`ValidationContext::document_iri`](crate::rule::ValidationContext::document_iri)
//! and [`ValidationContext::fetch_response`](crate::rule::ValidationContext::fetch_response)
//! and stay silent when those are absent.

mod document_as_json_ld;
mod matching_client_id;

pub use document_as_json_ld::RemoteDocumentAsJsonLd;
pub use matching_client_id::RemoteMatchingClientId;

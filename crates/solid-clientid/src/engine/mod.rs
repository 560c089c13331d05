//! # Validation Engines
//!
//! - [`validate_local`] parses a document and fans out over a [`RuleCatalog`](crate::catalog::RuleCatalog).
//! - [`validate_local_field`] narrows that down to one field.
//! - [`RemoteValidator`] asks a [`ValidationService`](crate::service::ValidationService)
//!   for the remote findings and then runs the local engine on the fetched body.
//!
//! Input-level failures never escape as errors; they become a single
//! synthetic result tagged with one of the engine's own pseudo-rules.

mod field;
mod local;
mod remote;

pub use field::{filter_by_field, normalize_field_name, validate_local_field};
pub use local::{DocumentInput, run_rules, validate_local};
pub use remote::RemoteValidator;

#[cfg(test)]
mod tests {
    #[test]
    fn test_engine_modules_carry_docs() {
        for (name, source) in [
            ("field", include_str!("field.rs")),
            ("local", include_str!("local.rs")),
            ("remote", include_str!("remote.rs")),
        ] {
            assert!(source.starts_with("//! "), "{name}.rs has no module doc");
        }
    }
}

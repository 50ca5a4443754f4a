//! # fhirconform
//!
//! A schema-driven structural conformance engine for FHIR R4 resources.
//! Resources are plain `serde_json::Value` documents; each shape (resource,
//! backbone structure, or complex datatype) is described by a declarative
//! [`Schema`] of attribute declarations, and the engine walks an instance
//! against its schema, recursing through a read-only [`Registry`] and
//! accumulating [`Issue`]s instead of failing fast.
//!
//! ## Quick Start
//!
//! ```rust
//! use fhirconform::conform_default;
//! use serde_json::json;
//!
//! let patient = json!({ "resourceType": "Patient", "gender": "male" });
//! let outcome = conform_default("Patient", &patient);
//! assert!(outcome.is_valid);
//! assert!(outcome.issues.is_empty());
//! ```
//!
//! Validation never raises for malformed data: every structural violation,
//! failed lexical check, or configuration defect becomes an issue in the
//! returned [`Outcome`]. The only errors surfaced as `Result` are build-time
//! defects while assembling schemas or registries (duplicate names).

pub mod catalog;
pub mod conformance;
pub mod error;
pub mod issue;
pub mod primitive;
pub mod reference;
pub mod registry;
pub mod schema;
pub mod validator;
pub mod walker;

pub use conformance::{conform, conform_default};
pub use error::{SchemaError, SchemaResult};
pub use issue::{Issue, IssueDetails, Outcome, Severity};
pub use primitive::PrimitiveValidator;
pub use registry::{CustomCheck, Registry, ShapeEntry, ShapeKind};
pub use schema::{Attribute, DeclaredType, PrimitiveKind, Schema};

/// Validation configuration options
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Maximum recursion depth for nested shape descent (default: 64).
    /// Exceeding it records a fatal `too-deep` issue for that branch instead
    /// of exhausting the host call stack.
    pub max_depth: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

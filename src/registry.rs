//! The dispatch registry
//!
//! Maps declared shape names to the schema and custom checks responsible for
//! them. A registry is assembled once, at startup, by merging the composite
//! datatype, backbone structure, and resource sub-tables (primitive kinds
//! are dispatched statically through [`crate::schema::PrimitiveKind`]); it
//! is read-only thereafter and may be shared freely across validation calls.

use crate::ValidationConfig;
use crate::error::{SchemaError, SchemaResult};
use crate::issue::Issue;
use crate::primitive::PrimitiveValidator;
use crate::schema::Schema;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A shape-specific cross-field invariant, run after structural checks
/// against the normalized instance.
pub type CustomCheck = Box<dyn Fn(&Value, &str, &mut Vec<Issue>) + Send + Sync>;

/// Which sub-table a shape belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Complex,
    Backbone,
    Resource,
}

/// One registered shape: its schema plus any custom constraint checks
pub struct ShapeEntry {
    pub name: &'static str,
    pub kind: ShapeKind,
    pub schema: Schema,
    pub checks: Vec<CustomCheck>,
}

impl ShapeEntry {
    pub fn new(name: &'static str, kind: ShapeKind, schema: Schema) -> Self {
        Self {
            name,
            kind,
            schema,
            checks: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: CustomCheck) -> Self {
        self.checks.push(check);
        self
    }
}

/// Name-keyed dispatch table, immutable after assembly
pub struct Registry {
    shapes: HashMap<&'static str, ShapeEntry>,
    // The Dosage composite is resolved by a direct conditional ahead of the
    // generic table; kept out of `shapes` so the override stays an explicit
    // resolution rule rather than an ordinary entry.
    dosage: Option<ShapeEntry>,
    primitives: PrimitiveValidator,
    config: ValidationConfig,
}

impl Registry {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            shapes: HashMap::new(),
            dosage: None,
            primitives: PrimitiveValidator::new(),
            config,
        }
    }

    /// Register one shape. A name collision is a build-time defect.
    pub fn insert(&mut self, entry: ShapeEntry) -> SchemaResult<()> {
        if entry.name == "Dosage" {
            if self.dosage.is_some() {
                return Err(SchemaError::duplicate_shape(entry.name));
            }
            self.dosage = Some(entry);
            return Ok(());
        }
        if self.shapes.contains_key(entry.name) {
            return Err(SchemaError::duplicate_shape(entry.name));
        }
        self.shapes.insert(entry.name, entry);
        Ok(())
    }

    /// Merge a whole sub-table in order.
    pub fn merge(&mut self, entries: Vec<ShapeEntry>) -> SchemaResult<()> {
        for entry in entries {
            self.insert(entry)?;
        }
        Ok(())
    }

    /// Resolve a declared type name to its shape entry.
    pub fn resolve(&self, name: &str) -> Option<&ShapeEntry> {
        // Explicit override ahead of the generic lookup; see field comment
        if name == "Dosage" {
            return self.dosage.as_ref();
        }
        self.shapes.get(name)
    }

    pub fn primitives(&self) -> &PrimitiveValidator {
        &self.primitives
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Standalone per-shape validation: resolve a shape by name and run its
    /// validator, appending to a caller-owned issue list.
    pub fn validate(&self, name: &str, instance: &Value, path: &str, issues: &mut Vec<Issue>) {
        match self.resolve(name) {
            Some(entry) => crate::validator::validate_shape(self, entry, instance, path, 0, issues),
            None => issues.push(Issue::fatal(
                "not-supported",
                format!("{path}: no validator registered for shape '{name}'"),
                "Missing dispatch registry entry",
            )),
        }
    }

    /// The registry for the shipped shape catalog, assembled once per process.
    pub fn builtin() -> &'static Registry {
        static BUILTIN: OnceLock<Registry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            crate::catalog::build_registry(ValidationConfig::default())
                .expect("builtin shape catalog is well-formed")
        })
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("shapes", &self.shapes.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

//! Error types for schema and registry construction
//!
//! These errors only surface while assembling the shape catalog (a duplicate
//! attribute inside one schema, or two shapes registered under the same
//! name). Data-shape violations never become `Err` — they are accumulated as
//! [`crate::Issue`]s instead.

use thiserror::Error;

/// Result type for schema and registry construction
pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two attribute declarations in one schema share a name
    #[error("duplicate attribute '{name}' in schema")]
    DuplicateAttribute { name: String },

    /// Two shapes were registered under the same name during registry merge
    #[error("duplicate shape '{name}' in registry")]
    DuplicateShape { name: String },
}

impl SchemaError {
    pub fn duplicate_attribute(name: impl Into<String>) -> Self {
        Self::DuplicateAttribute { name: name.into() }
    }

    pub fn duplicate_shape(name: impl Into<String>) -> Self {
        Self::DuplicateShape { name: name.into() }
    }
}

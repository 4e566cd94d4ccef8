//! # Type Catalog Error Types
//!
//! Errors raised while registering or looking up type descriptors.
//!
//! - **Lookup Errors**: a type or field with no registered mapping
//! - **Configuration Errors**: file I/O and parsing issues while loading a
//!   YAML registration table
//!
//! Lookup errors are raised at the builder call that names the type or field,
//! never deferred to compilation.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("No type descriptor registered for `{type_name}`")]
    UnknownType { type_name: String },
    #[error("Field `{field}` of `{type_name}` has no mapped property")]
    UnknownField { type_name: String, field: String },
    #[error("Type `{type_name}` is already registered with a different descriptor")]
    DuplicateType { type_name: String },
    #[error("Failed to read type catalog: {error}")]
    ConfigRead { error: String },
    #[error("Failed to parse type catalog: {error}")]
    ConfigParse { error: String },
}

impl CatalogError {
    /// Create a ConfigRead error naming the file that failed to load
    pub fn read_error_with_context(path: impl Into<String>, error: impl Into<String>) -> Self {
        CatalogError::ConfigRead {
            error: format!("{}\n  Context: {}", error.into(), path.into()),
        }
    }
}

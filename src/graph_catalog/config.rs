/// Type catalog registration tables.
///
/// A catalog can be declared in YAML instead of (or alongside) `GraphEntity`
/// implementations:
///
/// ```yaml
/// types:
///   - type_name: Person
///     category: node
///     label: Person
///     properties:
///       name: name
///       last_seen: lastSeen
///   - type_name: Knows
///     category: relationship
///     label: KNOWS
/// ```
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::errors::CatalogError;
use super::type_descriptor::TypeDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeCatalogConfig {
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl TypeCatalogConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(content).map_err(|e| CatalogError::ConfigParse {
            error: e.to_string(),
        })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::read_error_with_context(path.display().to_string(), e.to_string())
        })?;
        Self::from_yaml_str(&content)
    }
}

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::config::TypeCatalogConfig;
use super::errors::CatalogError;
use super::type_descriptor::{GraphEntity, TypeDescriptor};
use crate::config::BuilderConfig;

/// Registry of type descriptors, keyed by type name.
///
/// A catalog is assembled once at startup and then shared read-only
/// (typically as `Arc<TypeCatalog>`) by every client that builds queries.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the descriptor of a `GraphEntity` implementation
    pub fn register<T: GraphEntity>(&mut self) -> Result<(), CatalogError> {
        self.insert(T::descriptor())
    }

    /// Register a descriptor. Re-registering an identical descriptor is a no-op.
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> Result<(), CatalogError> {
        if let Some(existing) = self.types.get(&descriptor.type_name) {
            if **existing == descriptor {
                return Ok(());
            }
            return Err(CatalogError::DuplicateType {
                type_name: descriptor.type_name,
            });
        }
        log::debug!(
            "Registered {} type `{}` with label `{}`",
            descriptor.category,
            descriptor.type_name,
            descriptor.label
        );
        self.types
            .insert(descriptor.type_name.clone(), Arc::new(descriptor));
        Ok(())
    }

    pub fn from_table(config: TypeCatalogConfig) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for descriptor in config.types {
            catalog.insert(descriptor)?;
        }
        Ok(catalog)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        Self::from_table(TypeCatalogConfig::from_yaml_str(content)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        Self::from_table(TypeCatalogConfig::from_yaml_file(path)?)
    }

    /// Load the table named by `catalog_path`, or start empty when none is configured
    pub fn from_config(config: &BuilderConfig) -> Result<Self, CatalogError> {
        match &config.catalog_path {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::new()),
        }
    }

    /// Look up the descriptor registered under `type_name`
    pub fn describe(&self, type_name: &str) -> Result<Arc<TypeDescriptor>, CatalogError> {
        self.types
            .get(type_name)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownType {
                type_name: type_name.to_string(),
            })
    }

    pub fn describe_type<T: GraphEntity>(&self) -> Result<Arc<TypeDescriptor>, CatalogError> {
        self.describe(T::TYPE_NAME)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

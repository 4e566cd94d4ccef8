use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::CatalogError;

/// Whether a domain type maps onto graph nodes or relationships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Node,
    Relationship,
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityCategory::Node => write!(f, "node"),
            EntityCategory::Relationship => write!(f, "relationship"),
        }
    }
}

/// Declarative mapping of a domain record type onto the graph.
///
/// `properties` maps the record's field names to graph property names, in
/// declaration order:
///
/// ```text
/// Person { name, last_seen }  ->  (:Person {name, lastSeen})
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub type_name: String,
    pub category: EntityCategory,
    pub label: String,
    #[serde(default)]
    pub properties: IndexMap<String, String>,
}

impl TypeDescriptor {
    pub fn new(
        type_name: impl Into<String>,
        category: EntityCategory,
        label: impl Into<String>,
    ) -> Self {
        TypeDescriptor {
            type_name: type_name.into(),
            category,
            label: label.into(),
            properties: IndexMap::new(),
        }
    }

    /// Descriptor for a node type
    pub fn node(type_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(type_name, EntityCategory::Node, label)
    }

    /// Descriptor for a relationship type
    pub fn relationship(type_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(type_name, EntityCategory::Relationship, label)
    }

    /// Map a record field onto a graph property
    pub fn with_property(mut self, field: impl Into<String>, property: impl Into<String>) -> Self {
        self.properties.insert(field.into(), property.into());
        self
    }

    /// Property name mapped for `field`
    pub fn property(&self, field: &str) -> Result<&str, CatalogError> {
        self.properties
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| CatalogError::UnknownField {
                type_name: self.type_name.clone(),
                field: field.to_string(),
            })
    }
}

/// Static registration interface for domain record types.
///
/// ```ignore
/// struct Person;
///
/// impl GraphEntity for Person {
///     const TYPE_NAME: &'static str = "Person";
///
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::node(Self::TYPE_NAME, "Person").with_property("age", "age")
///     }
/// }
/// ```
pub trait GraphEntity {
    const TYPE_NAME: &'static str;

    fn descriptor() -> TypeDescriptor;
}

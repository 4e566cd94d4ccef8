//! Type descriptor lookup.
//!
//! Domain record types are mapped onto graph entities through explicit,
//! statically registered [`TypeDescriptor`]s: a graph category, a label and an
//! ordered field -> property map. The [`TypeCatalog`] answers lookups by type
//! name and never mutates after construction.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod type_descriptor;

pub use catalog::TypeCatalog;
pub use config::TypeCatalogConfig;
pub use errors::CatalogError;
pub use type_descriptor::{EntityCategory, GraphEntity, TypeDescriptor};

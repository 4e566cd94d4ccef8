//! Cyphercraft - a compiler from fluent builder calls to Cypher text
//!
//! This crate provides:
//! - Type descriptors mapping domain records onto graph labels and properties
//! - A variable registry resolving names, query text and identity tokens
//! - Pattern and boolean expression models
//! - A clause accumulator with subqueries, unions and FOREACH blocks
//! - A byte-exact printer producing the query text, parameters and bindings
//!
//! ```ignore
//! let mut client = Client::new(catalog);
//! let n = client.entity::<Person>()?;
//! let compiled = client
//!     .match_(node(qual(&n, "n")?))
//!     .where_(cond(n.field("age")?, ">", 30))
//!     .return_([&n])
//!     .compile()?;
//! assert_eq!(compiled.cypher, "MATCH (n:Person)\nWHERE n.age > 30\nRETURN n");
//! ```

pub mod config;
pub mod cypher_generator;
pub mod graph_catalog;
pub mod query_builder;

pub use config::{BuilderConfig, ConfigError};
pub use cypher_generator::{CompileError, CompiledCypher};
pub use graph_catalog::{CatalogError, EntityCategory, GraphEntity, TypeCatalog, TypeDescriptor};
pub use query_builder::{BuilderError, Client, Entity, Identifier, IdentityToken};

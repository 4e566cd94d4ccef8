use thiserror::Error;

use crate::graph_catalog::errors::CatalogError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuilderError {
    #[error("Cannot qualify `{identifier}` as `{requested}`: it already has both a name and an expression")]
    DuplicateQualification {
        identifier: String,
        requested: String,
    },
    #[error("Unresolved identifier `{identifier}` (never bound, or replaced by a later bind)")]
    UnresolvedIdentifier { identifier: String },
    #[error("{operator} expects {expected} operand(s), got {found}")]
    MalformedBooleanExpression {
        operator: String,
        expected: String,
        found: usize,
    },
    #[error("{clause} needs at least one item")]
    EmptyClause { clause: &'static str },
    #[error("Nesting depth {depth} exceeds the configured maximum of {max}")]
    NestingTooDeep { depth: u32, max: u32 },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

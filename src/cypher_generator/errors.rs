use thiserror::Error;

use crate::query_builder::errors::BuilderError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("Misplaced {clause} clause: it must directly follow {expected}")]
    MisplacedClause {
        clause: &'static str,
        expected: String,
    },
    #[error(transparent)]
    Builder(#[from] BuilderError),
}

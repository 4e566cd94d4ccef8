//! Compiler from accumulated clauses to Cypher text.
//!
//! A single pass: adjacency rules are checked over the whole sequence, then
//! every clause prints as one line (or a small block) joined by newlines,
//! with nested blocks indented two spaces per level.

use indexmap::IndexMap;

use crate::config::BuilderConfig;
use crate::query_builder::ast::{Clause, IdentityToken};

mod errors;
mod printer;
mod to_cypher;
mod validation;

pub use errors::CompileError;
pub use printer::Printer;
pub use to_cypher::ToCypher;

/// Output of a successful compilation
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCypher {
    pub cypher: String,
    /// Values of every `$name` placeholder, in first-use order
    pub parameters: IndexMap<String, serde_json::Value>,
    /// `(column, destination)` pairs for decoding result rows
    pub bindings: Vec<(String, IdentityToken)>,
}

impl CompiledCypher {
    /// Destination bound to a result column
    pub fn destination(&self, column: &str) -> Option<IdentityToken> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == column)
            .map(|(_, token)| *token)
    }
}

pub fn compile(
    clauses: &[Clause],
    parameters: IndexMap<String, serde_json::Value>,
    config: &BuilderConfig,
) -> Result<CompiledCypher, CompileError> {
    log::debug!("Compiling {} clauses", clauses.len());
    validation::validate_sequence(clauses)?;

    let cypher = printer::print(clauses);
    let mut bindings = Vec::new();
    collect_bindings(clauses, &mut bindings);

    if config.log_compiled_queries {
        log::info!("Compiled Cypher:\n{}", cypher);
    }
    Ok(CompiledCypher {
        cypher,
        parameters,
        bindings,
    })
}

/// RETURN columns of the outer statement and of every union branch. A
/// subquery's RETURN feeds the enclosing query, so it binds nothing.
fn collect_bindings(clauses: &[Clause], bindings: &mut Vec<(String, IdentityToken)>) {
    for clause in clauses {
        match clause {
            Clause::Return(projection) => {
                for binding in projection.items.iter().filter_map(|item| item.binding()) {
                    let entry = (binding.column.to_string(), binding.token);
                    if !bindings.contains(&entry) {
                        bindings.push(entry);
                    }
                }
            }
            Clause::Union(branches) | Clause::UnionAll(branches) => {
                for branch in branches {
                    collect_bindings(branch, bindings);
                }
            }
            _ => {}
        }
    }
}

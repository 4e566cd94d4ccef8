//! Clause adjacency rules.
//!
//! Modifier clauses attach to the clause right before them in the same
//! sequence. Each nested sequence (subquery body, union branch, FOREACH
//! updates) is checked on its own.

use super::errors::CompileError;
use crate::query_builder::ast::Clause;

const AFTER_MERGE: &[&str] = &["MERGE", "ON MATCH", "ON CREATE"];
const AFTER_PROJECTION: &[&str] = &["WITH", "RETURN"];
const AFTER_ORDER: &[&str] = &["WITH", "RETURN", "ORDER BY"];
const AFTER_SKIP: &[&str] = &["WITH", "RETURN", "ORDER BY", "SKIP"];

/// Keywords a clause must directly follow, or `None` when it can appear anywhere
fn required_predecessors(clause: &Clause) -> Option<&'static [&'static str]> {
    match clause {
        Clause::OnMatch(_) | Clause::OnCreate(_) => Some(AFTER_MERGE),
        Clause::OrderBy(_) => Some(AFTER_PROJECTION),
        Clause::Skip(_) => Some(AFTER_ORDER),
        Clause::Limit(_) => Some(AFTER_SKIP),
        _ => None,
    }
}

fn describe(keywords: &[&str]) -> String {
    match keywords.split_last() {
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        None => String::new(),
    }
}

pub fn validate_sequence(clauses: &[Clause]) -> Result<(), CompileError> {
    let mut previous: Option<&Clause> = None;
    for clause in clauses {
        if let Some(allowed) = required_predecessors(clause) {
            let attached = previous.is_some_and(|p| allowed.contains(&p.keyword()));
            if !attached {
                log::debug!(
                    "{} follows {}",
                    clause.keyword(),
                    previous.map(Clause::keyword).unwrap_or("nothing")
                );
                return Err(CompileError::MisplacedClause {
                    clause: clause.keyword(),
                    expected: describe(allowed),
                });
            }
        }

        match clause {
            Clause::Subquery(body) => validate_sequence(body)?,
            Clause::ForEach { updates, .. } => validate_sequence(updates)?,
            Clause::Union(branches) | Clause::UnionAll(branches) => {
                for branch in branches {
                    validate_sequence(branch)?;
                }
            }
            _ => {}
        }
        previous = Some(clause);
    }
    Ok(())
}

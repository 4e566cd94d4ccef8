use super::to_cypher::{join, ToCypher};
use crate::query_builder::ast::Clause;

const INDENT: &str = "  ";

/// Line-oriented writer; every clause prints as one line or a small block
#[derive(Debug, Default)]
pub struct Printer {
    lines: Vec<String>,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }

    fn line(&mut self, depth: usize, text: &str) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(depth), text).trim_end().to_string());
    }

    pub fn clauses(&mut self, clauses: &[Clause], depth: usize) {
        for clause in clauses {
            self.clause(clause, depth);
        }
    }

    fn block(&mut self, keyword: &str, items: Vec<String>, depth: usize) {
        match items.as_slice() {
            [single] => self.line(depth, &format!("{} {}", keyword, single)),
            _ => {
                self.line(depth, keyword);
                let last = items.len().saturating_sub(1);
                for (i, item) in items.iter().enumerate() {
                    let separator = if i < last { "," } else { "" };
                    self.line(depth + 1, &format!("{}{}", item, separator));
                }
            }
        }
    }

    pub fn clause(&mut self, clause: &Clause, depth: usize) {
        match clause {
            Clause::Use(database) => self.line(depth, &format!("USE {}", database)),
            Clause::Match(chains) => self.line(depth, &format!("MATCH {}", join(chains))),
            Clause::OptionalMatch(chains) => {
                self.line(depth, &format!("OPTIONAL MATCH {}", join(chains)))
            }
            Clause::Create(chains) => self.line(depth, &format!("CREATE {}", join(chains))),
            Clause::Merge(chain) => self.line(depth, &format!("MERGE {}", chain.to_cypher())),
            Clause::OnMatch(assignments) => {
                self.line(depth, "ON MATCH");
                self.block("SET", assignments.iter().map(ToCypher::to_cypher).collect(), depth + 1);
            }
            Clause::OnCreate(assignments) => {
                self.line(depth, "ON CREATE");
                self.block("SET", assignments.iter().map(ToCypher::to_cypher).collect(), depth + 1);
            }
            Clause::Where(expression) => {
                self.line(depth, &format!("WHERE {}", expression.to_cypher()))
            }
            Clause::With(projection) => {
                self.line(depth, &format!("WITH {}", projection.to_cypher()))
            }
            Clause::Return(projection) => {
                self.line(depth, &format!("RETURN {}", projection.to_cypher()))
            }
            Clause::OrderBy(items) => self.line(depth, &format!("ORDER BY {}", join(items))),
            Clause::Skip(count) => self.line(depth, &format!("SKIP {}", count)),
            Clause::Limit(count) => self.line(depth, &format!("LIMIT {}", count)),
            Clause::Set(assignments) => {
                self.block("SET", assignments.iter().map(ToCypher::to_cypher).collect(), depth)
            }
            Clause::Remove(removals) => self.line(depth, &format!("REMOVE {}", join(removals))),
            Clause::Delete(targets) => self.line(depth, &format!("DELETE {}", targets.join(", "))),
            Clause::DetachDelete(targets) => {
                self.line(depth, &format!("DETACH DELETE {}", targets.join(", ")))
            }
            Clause::Unwind { expression, alias } => {
                self.line(depth, &format!("UNWIND {} AS {}", expression, alias))
            }
            Clause::Call(procedure) => self.line(depth, &format!("CALL {}", procedure)),
            Clause::Show(command) => self.line(depth, &format!("SHOW {}", command)),
            Clause::Yield(items) => self.line(depth, &format!("YIELD {}", join(items))),
            Clause::ForEach {
                variable,
                list,
                updates,
            } => {
                let updates: Vec<String> = updates.iter().map(inline).collect();
                self.line(
                    depth,
                    &format!("FOREACH ({} IN {} | {})", variable, list, updates.join(" ")),
                );
            }
            Clause::Subquery(body) => {
                self.line(depth, "CALL {");
                self.clauses(body, depth + 1);
                self.line(depth, "}");
            }
            Clause::Union(branches) => self.union(branches, "UNION", depth),
            Clause::UnionAll(branches) => self.union(branches, "UNION ALL", depth),
            Clause::RawText(text) => {
                for line in text.trim().lines() {
                    self.line(depth, line.trim());
                }
            }
        }
    }

    fn union(&mut self, branches: &[Vec<Clause>], separator: &str, depth: usize) {
        for (i, branch) in branches.iter().enumerate() {
            if i > 0 {
                self.line(depth, separator);
            }
            self.clauses(branch, depth);
        }
    }
}

/// A clause printed on a single line, as inside FOREACH
fn inline(clause: &Clause) -> String {
    let mut printer = Printer::new();
    printer.clause(clause, 0);
    printer
        .lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print(clauses: &[Clause]) -> String {
    let mut printer = Printer::new();
    printer.clauses(clauses, 0);
    printer.finish()
}

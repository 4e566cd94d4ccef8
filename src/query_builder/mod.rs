//! Fluent construction of Cypher statements.
//!
//! Identifiers written at builder calls (names, query text, identity tokens,
//! entity fields, type values, named parameters) resolve through a
//! [`VariableRegistry`] so that one logical variable prints the same way in
//! every clause. The [`Client`] accumulates the resolved clauses; the
//! `cypher_generator` turns them into text.

pub mod ast;
pub mod client;
pub mod errors;
pub mod expression;
pub mod mutation;
pub mod registry;
pub mod variable;

pub use ast::{
    Binding, Clause, Direction, Entity, Identifier, IdentityToken, Path, Pattern, PatternPart,
    RemoveItem, SetItem, SortItem, SortOrder, VarOption, VarSpec, Variable,
};
pub use client::{Branch, Client, Updater};
pub use errors::BuilderError;
pub use expression::{and, atom, cond, not, not_all, or, xor, BooleanOperator, Condition, Expression};
pub use mutation::{remove_labels, remove_prop, set_labels, set_merge, set_props, set_prop_value};
pub use registry::VariableRegistry;
pub use variable::{
    bind, expr, label, name, named_param, node, path, props, props_expr, qual, qual_with, var,
    var_length, var_with,
};

//! Comparison and boolean expression trees.
//!
//! The same tree shape is used twice: as a [`Condition`], whose atoms are the
//! identifiers the caller wrote, and as an [`Expression`], whose atoms are the
//! resolved query text the compiler prints.
//!
//! Printing follows the boolean operator binding order
//! `NOT > AND > XOR > OR`. A binary boolean child is parenthesized whenever it
//! binds more loosely than its parent or mixes with a different operator, and
//! identical-operator chains flatten. Raw text operands that carry their own
//! top-level boolean keyword are parenthesized too:
//!
//! ```text
//! OR(XOR(a, AND(b, c)), NOT(OR(d, e)))  =>  (a XOR (b AND c)) OR NOT (d OR e)
//! AND(AND(a, b), c)                     =>  a AND b AND c
//! ```

use std::fmt;

use super::ast::Identifier;
use super::errors::BuilderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    And,
    Or,
    Xor,
    Not,
}

impl BooleanOperator {
    /// Binding strength, tightest first
    pub fn precedence(&self) -> u8 {
        match self {
            BooleanOperator::Not => 4,
            BooleanOperator::And => 3,
            BooleanOperator::Xor => 2,
            BooleanOperator::Or => 1,
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, BooleanOperator::Not)
    }
}

impl fmt::Display for BooleanOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
            BooleanOperator::Xor => "XOR",
            BooleanOperator::Not => "NOT",
        };
        write!(f, "{}", keyword)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression<A = String> {
    Atom(A),
    Comparison {
        left: A,
        operator: String,
        right: A,
    },
    Boolean {
        operator: BooleanOperator,
        operands: Vec<Expression<A>>,
    },
    Raw(String),
}

/// Expression tree as written by the caller
pub type Condition = Expression<Identifier>;

impl<A> Expression<A> {
    fn boolean(operator: BooleanOperator, operands: Vec<Expression<A>>) -> Result<Self, BuilderError> {
        let arity_ok = if operator.is_unary() {
            operands.len() == 1
        } else {
            operands.len() >= 2
        };
        if !arity_ok {
            return Err(BuilderError::MalformedBooleanExpression {
                operator: operator.to_string(),
                expected: if operator.is_unary() { "exactly 1" } else { "at least 2" }.to_string(),
                found: operands.len(),
            });
        }
        Ok(Expression::Boolean { operator, operands })
    }

    /// Rebuild the tree with every atom mapped through `f`
    pub fn try_map<B, E>(self, f: &mut impl FnMut(A) -> Result<B, E>) -> Result<Expression<B>, E> {
        Ok(match self {
            Expression::Atom(atom) => Expression::Atom(f(atom)?),
            Expression::Comparison {
                left,
                operator,
                right,
            } => Expression::Comparison {
                left: f(left)?,
                operator,
                right: f(right)?,
            },
            Expression::Boolean { operator, operands } => Expression::Boolean {
                operator,
                operands: operands
                    .into_iter()
                    .map(|operand| operand.try_map(&mut *f))
                    .collect::<Result<Vec<_>, E>>()?,
            },
            Expression::Raw(text) => Expression::Raw(text),
        })
    }
}

impl From<&str> for Condition {
    fn from(text: &str) -> Self {
        Expression::Raw(text.to_string())
    }
}

impl From<String> for Condition {
    fn from(text: String) -> Self {
        Expression::Raw(text)
    }
}

/// `left <operator> right`, e.g. `cond(age, ">", 30)`
pub fn cond(
    left: impl Into<Identifier>,
    operator: impl Into<String>,
    right: impl Into<Identifier>,
) -> Condition {
    Expression::Comparison {
        left: left.into(),
        operator: operator.into(),
        right: right.into(),
    }
}

/// A single value used as a predicate, e.g. `exists(n.name)`
pub fn atom(identifier: impl Into<Identifier>) -> Condition {
    Expression::Atom(identifier.into())
}

pub fn and(operands: impl IntoIterator<Item = Condition>) -> Result<Condition, BuilderError> {
    Expression::boolean(BooleanOperator::And, operands.into_iter().collect())
}

pub fn or(operands: impl IntoIterator<Item = Condition>) -> Result<Condition, BuilderError> {
    Expression::boolean(BooleanOperator::Or, operands.into_iter().collect())
}

pub fn xor(operands: impl IntoIterator<Item = Condition>) -> Result<Condition, BuilderError> {
    Expression::boolean(BooleanOperator::Xor, operands.into_iter().collect())
}

pub fn not(operand: Condition) -> Condition {
    Expression::Boolean {
        operator: BooleanOperator::Not,
        operands: vec![operand],
    }
}

/// Arity-checked variant of [`not`] for operand lists assembled at runtime
pub fn not_all(operands: impl IntoIterator<Item = Condition>) -> Result<Condition, BuilderError> {
    Expression::boolean(BooleanOperator::Not, operands.into_iter().collect())
}

fn needs_parens(parent: BooleanOperator, child: &Expression) -> bool {
    match child {
        Expression::Boolean { operator, .. } if !operator.is_unary() => {
            operator.precedence() < parent.precedence() || *operator != parent
        }
        Expression::Atom(text) | Expression::Raw(text) => has_top_level_boolean(text),
        _ => false,
    }
}

/// Whether `text` contains an `AND`/`OR`/`XOR`/`NOT` keyword outside any
/// brackets or string literal. `IS NOT` is a comparison, not a negation.
fn has_top_level_boolean(text: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut word = String::new();
    let mut previous = String::new();
    fn ends_word(word: &mut String, previous: &mut String, depth: usize) -> bool {
        if word.is_empty() {
            return false;
        }
        let negation = word.eq_ignore_ascii_case("NOT") && !previous.eq_ignore_ascii_case("IS");
        let found = depth == 0
            && (negation || ["AND", "OR", "XOR"].iter().any(|k| word.eq_ignore_ascii_case(k)));
        *previous = std::mem::take(word);
        found
    }
    for ch in text.chars() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        if ch.is_alphanumeric() || ch == '_' || ch == '.' || ch == '$' {
            word.push(ch);
            continue;
        }
        if ends_word(&mut word, &mut previous, depth) {
            return true;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    ends_word(&mut word, &mut previous, depth)
}

fn write_operand(f: &mut fmt::Formatter<'_>, parent: BooleanOperator, child: &Expression) -> fmt::Result {
    if needs_parens(parent, child) {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Atom(text) | Expression::Raw(text) => write!(f, "{}", text),
            Expression::Comparison {
                left,
                operator,
                right,
            } => write!(f, "{} {} {}", left, operator, right),
            Expression::Boolean { operator, operands } => {
                if operator.is_unary() {
                    write!(f, "{} ", operator)?;
                    // arity is checked on construction; a malformed tree prints its operands in turn
                    for operand in operands {
                        write_operand(f, *operator, operand)?;
                    }
                    return Ok(());
                }
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", operator)?;
                    }
                    write_operand(f, *operator, operand)?;
                }
                Ok(())
            }
        }
    }
}

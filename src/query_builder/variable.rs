//! Constructors for variable uses, patterns and parameters.
//!
//! ```text
//! node(qual(&person, "p")?)            (p:Person)
//! qual("timestamp()", "t")?            timestamp() AS t
//! qual_with(&count, "count(c)",
//!           [VarOption::Name("n".into())])?   count(c) AS n
//! ```

use super::ast::{Identifier, IdentityToken, Path, Pattern, VarOption, VarSpec};
use super::errors::BuilderError;

/// A variable use with no qualification
pub fn var(identifier: impl Into<Identifier>) -> VarSpec {
    VarSpec::new(identifier)
}

/// A variable use configured by options
pub fn var_with(
    identifier: impl Into<Identifier>,
    options: impl IntoIterator<Item = VarOption>,
) -> VarSpec {
    let mut spec = VarSpec::new(identifier);
    for option in options {
        spec.apply(option);
    }
    spec
}

/// Qualify an identifier with a name or expression.
///
/// Precedence is `identifier > expr > name`: when the identifier already
/// carries an expression (it is query text, or a variable qualified earlier),
/// `expr` becomes its alias; otherwise `expr` becomes its expression.
pub fn qual(identifier: impl Into<Identifier>, expr: impl Into<String>) -> Result<VarSpec, BuilderError> {
    qual_with(identifier, expr, std::iter::empty())
}

/// [`qual`] with additional options. A `VarOption::Name` cannot be combined
/// with an identifier that is itself query text, since both would compete for
/// the alias.
pub fn qual_with(
    identifier: impl Into<Identifier>,
    expr: impl Into<String>,
    options: impl IntoIterator<Item = VarOption>,
) -> Result<VarSpec, BuilderError> {
    let mut spec = var_with(identifier, options);
    let expr = expr.into();
    if let (Some(text), Some(_)) = (spec.identifier.text(), &spec.name) {
        return Err(BuilderError::DuplicateQualification {
            identifier: text.to_string(),
            requested: expr,
        });
    }
    spec.qualifier = Some(expr);
    Ok(spec)
}

/// Bind an identifier to a result destination. A token identifier is retired:
/// later uses of it fail to resolve and `token` takes its place.
pub fn bind(identifier: impl Into<Identifier>, token: IdentityToken) -> VarSpec {
    let mut spec = VarSpec::new(identifier);
    spec.bind = Some(token);
    spec
}

/// Verbatim query text, never treated as a bare name
pub fn expr(text: impl Into<String>) -> Identifier {
    Identifier::RawExpression(text.into())
}

/// `$name`, with `value` shipped in the compiled parameters
pub fn named_param(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Identifier {
    Identifier::NamedParameter {
        name: name.into(),
        value: value.into(),
    }
}

pub fn name(name: impl Into<String>) -> VarOption {
    VarOption::Name(name.into())
}

pub fn label(label: impl Into<String>) -> VarOption {
    VarOption::Label(label.into())
}

pub fn var_length(var_length: impl Into<String>) -> VarOption {
    VarOption::VarLength(var_length.into())
}

/// Property map; keys print in the order given
pub fn props<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> VarOption
where
    K: Into<String>,
    V: Into<Identifier>,
{
    VarOption::Props(
        entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect(),
    )
}

pub fn props_expr(props_expr: impl Into<String>) -> VarOption {
    VarOption::PropsExpr(props_expr.into())
}

/// Start a pattern at a node
pub fn node(identifier: impl Into<VarSpec>) -> Pattern {
    Pattern {
        start: identifier.into(),
        segments: Vec::new(),
    }
}

/// `identifier = pattern`
pub fn path(pattern: Pattern, identifier: impl Into<VarSpec>) -> Path {
    Path {
        pattern,
        variable: identifier.into(),
    }
}

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use super::expression::Expression;
use crate::graph_catalog::errors::CatalogError;
use crate::graph_catalog::type_descriptor::TypeDescriptor;

/// Opaque handle standing in for a caller-side result destination.
///
/// Tokens are issued by [`Client::token`](super::client::Client::token) and
/// [`Client::entity`](super::client::Client::entity); two tokens are the same
/// identity only if they were produced by the same issue call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityToken(u64);

impl IdentityToken {
    pub(crate) fn new(id: u64) -> Self {
        IdentityToken(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id())
    }
}

/// A typed result destination: an identity token plus the descriptor of the
/// domain type it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    token: IdentityToken,
    descriptor: Arc<TypeDescriptor>,
}

impl Entity {
    pub(crate) fn new(token: IdentityToken, descriptor: Arc<TypeDescriptor>) -> Self {
        Entity { token, descriptor }
    }

    pub fn token(&self) -> IdentityToken {
        self.token
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Reference to one of the entity's fields, printed as `<owner>.<property>`.
    ///
    /// Fails immediately when the descriptor maps no property for `field`.
    pub fn field(&self, field: &str) -> Result<Identifier, CatalogError> {
        let property = self.descriptor.property(field)?.to_string();
        Ok(Identifier::OpaqueReference {
            token: self.token,
            descriptor: Some(self.descriptor.clone()),
            field: Some(FieldRef {
                field: field.to_string(),
                property,
            }),
        })
    }
}

/// A record field resolved through its type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub field: String,
    pub property: String,
}

/// Every form a caller can use to refer to a variable or value.
#[derive(Debug, Clone, PartialEq)]
pub enum Identifier {
    /// No variable at all: `()` or `-->`
    Anonymous,
    /// A bare variable name such as `n`
    Name(String),
    /// Verbatim query text such as `timestamp()` or `n.name`
    RawExpression(String),
    /// A token, optionally narrowed to one of its fields
    OpaqueReference {
        token: IdentityToken,
        descriptor: Option<Arc<TypeDescriptor>>,
        field: Option<FieldRef>,
    },
    /// A registered type used as a value: an unnamed entity carrying its label
    TypeValue(Arc<TypeDescriptor>),
    /// `$name`, with the value shipped in the compiled parameters
    NamedParameter {
        name: String,
        value: serde_json::Value,
    },
}

impl Identifier {
    /// Text identity for `Name` and `RawExpression` identifiers
    pub fn text(&self) -> Option<&str> {
        match self {
            Identifier::Name(text) | Identifier::RawExpression(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Anonymous => write!(f, "()"),
            Identifier::Name(text) | Identifier::RawExpression(text) => write!(f, "{}", text),
            Identifier::OpaqueReference { token, field, .. } => match field {
                Some(field) => write!(f, "{}.{}", token, field.field),
                None => write!(f, "{}", token),
            },
            Identifier::TypeValue(descriptor) => write!(f, ":{}", descriptor.type_name),
            Identifier::NamedParameter { name, .. } => write!(f, "${}", name),
        }
    }
}

fn is_plain_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl From<&str> for Identifier {
    fn from(text: &str) -> Self {
        Identifier::from(text.to_string())
    }
}

impl From<String> for Identifier {
    fn from(text: String) -> Self {
        if is_plain_name(&text) {
            Identifier::Name(text)
        } else {
            Identifier::RawExpression(text)
        }
    }
}

impl From<()> for Identifier {
    fn from(_: ()) -> Self {
        Identifier::Anonymous
    }
}

impl From<IdentityToken> for Identifier {
    fn from(token: IdentityToken) -> Self {
        Identifier::OpaqueReference {
            token,
            descriptor: None,
            field: None,
        }
    }
}

impl From<&Entity> for Identifier {
    fn from(entity: &Entity) -> Self {
        Identifier::OpaqueReference {
            token: entity.token,
            descriptor: Some(entity.descriptor.clone()),
            field: None,
        }
    }
}

impl From<Entity> for Identifier {
    fn from(entity: Entity) -> Self {
        Identifier::from(&entity)
    }
}

impl From<bool> for Identifier {
    fn from(value: bool) -> Self {
        Identifier::RawExpression(value.to_string())
    }
}

macro_rules! literal_identifier {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Identifier {
                fn from(value: $ty) -> Self {
                    Identifier::RawExpression(value.to_string())
                }
            }
        )*
    };
}

literal_identifier!(i32, i64, u32, u64, usize, f64);

/// Canonical bound entity held by the variable registry.
///
/// `expr` is what the variable was defined from; `name` is the alias it is
/// referred to by afterwards. A variable referenced by a bare name carries
/// that name as its expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variable {
    pub name: Option<String>,
    pub expr: Option<String>,
    pub bound_identity: Option<IdentityToken>,
    pub label_pattern: Option<String>,
    pub properties: IndexMap<String, String>,
    pub props_expr: Option<String>,
    pub var_length: Option<String>,
}

impl Variable {
    /// Text later clauses use to refer to this variable
    pub fn reference(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.expr.as_deref())
            .filter(|text| !text.is_empty())
    }

    pub fn has_expr(&self) -> bool {
        self.expr.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// Option applied while building a [`VarSpec`]
#[derive(Debug, Clone, PartialEq)]
pub enum VarOption {
    Name(String),
    Label(String),
    VarLength(String),
    Props(Vec<(String, Identifier)>),
    PropsExpr(String),
}

/// Unresolved description of a variable use, as written at a builder call.
///
/// The client resolves it against its registry when the clause is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct VarSpec {
    pub identifier: Identifier,
    pub qualifier: Option<String>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub properties: IndexMap<String, Identifier>,
    pub props_expr: Option<String>,
    pub var_length: Option<String>,
    pub bind: Option<IdentityToken>,
}

impl VarSpec {
    pub fn new(identifier: impl Into<Identifier>) -> Self {
        VarSpec {
            identifier: identifier.into(),
            qualifier: None,
            name: None,
            label: None,
            properties: IndexMap::new(),
            props_expr: None,
            var_length: None,
            bind: None,
        }
    }

    pub fn apply(&mut self, option: VarOption) {
        match option {
            VarOption::Name(name) => self.name = Some(name),
            VarOption::Label(label) => self.label = Some(label),
            VarOption::VarLength(var_length) => self.var_length = Some(var_length),
            VarOption::Props(props) => self.properties.extend(props),
            VarOption::PropsExpr(props_expr) => self.props_expr = Some(props_expr),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label expression, e.g. `Person` or `Person|Movie`
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Variable-length expression of a relationship, e.g. `*` or `*1..3`
    pub fn var_length(mut self, var_length: impl Into<String>) -> Self {
        self.var_length = Some(var_length.into());
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Identifier>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn props_expr(mut self, props_expr: impl Into<String>) -> Self {
        self.props_expr = Some(props_expr.into());
        self
    }
}

/// Lets every identifier source stand wherever a richer wrapper is expected
macro_rules! from_identifier_sources {
    ($target:ty => $ctor:path) => {
        from_identifier_sources!(@impl $target => $ctor;
            Identifier, &str, String, (), IdentityToken, &Entity, Entity,
            bool, i32, i64, u32, u64, usize, f64);
    };
    (@impl $target:ty => $ctor:path; $($source:ty),*) => {
        $(
            impl From<$source> for $target {
                fn from(value: $source) -> Self {
                    $ctor(Identifier::from(value))
                }
            }
        )*
    };
}

from_identifier_sources!(VarSpec => VarSpec::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,   // `-[]->`
    Incoming,   // `<-[]-`
    Undirected, // `-[]-`
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub direction: Direction,
    pub relationship: VarSpec,
    pub node: VarSpec,
}

/// A node followed by zero or more relationship segments
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub start: VarSpec,
    pub segments: Vec<Segment>,
}

impl Pattern {
    pub fn connect(
        mut self,
        direction: Direction,
        relationship: impl Into<VarSpec>,
        node: impl Into<VarSpec>,
    ) -> Self {
        self.segments.push(Segment {
            direction,
            relationship: relationship.into(),
            node: node.into(),
        });
        self
    }

    /// `-[rel]->(node)`
    pub fn to(self, relationship: impl Into<VarSpec>, node: impl Into<VarSpec>) -> Self {
        self.connect(Direction::Outgoing, relationship, node)
    }

    /// `<-[rel]-(node)`
    pub fn from(self, relationship: impl Into<VarSpec>, node: impl Into<VarSpec>) -> Self {
        self.connect(Direction::Incoming, relationship, node)
    }

    /// `-[rel]-(node)`
    pub fn related(self, relationship: impl Into<VarSpec>, node: impl Into<VarSpec>) -> Self {
        self.connect(Direction::Undirected, relationship, node)
    }
}

/// `p = (...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub pattern: Pattern,
    pub variable: VarSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternPart {
    Chain(Pattern),
    Path(Path),
}

impl From<Pattern> for PatternPart {
    fn from(pattern: Pattern) -> Self {
        PatternPart::Chain(pattern)
    }
}

impl From<Path> for PatternPart {
    fn from(path: Path) -> Self {
        PatternPart::Path(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One `ORDER BY` key as written at the builder call
#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    pub identifier: Identifier,
    pub order: SortOrder,
}

impl SortItem {
    pub fn asc(identifier: impl Into<Identifier>) -> Self {
        SortItem {
            identifier: identifier.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn desc(identifier: impl Into<Identifier>) -> Self {
        SortItem {
            identifier: identifier.into(),
            order: SortOrder::Descending,
        }
    }
}

from_identifier_sources!(SortItem => SortItem::asc);

/// One SET item as written at the builder call
#[derive(Debug, Clone, PartialEq)]
pub enum SetItem {
    /// `x.prop = value`
    Property { target: Identifier, value: Identifier },
    /// `x:L1:L2`
    Labels { target: Identifier, labels: Vec<String> },
    /// `x += value`
    Merge { target: Identifier, value: Identifier },
    /// `x = value`
    Replace { target: Identifier, value: Identifier },
}

/// One REMOVE item as written at the builder call
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveItem {
    Property(Identifier),
    Labels { target: Identifier, labels: Vec<String> },
}

// ============================================================================
// Resolved forms, produced by the client and consumed by the compiler
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub variable: Variable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipPattern {
    pub variable: Variable,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternChain {
    pub path: Option<String>,
    pub start: NodePattern,
    pub segments: Vec<(RelationshipPattern, NodePattern)>,
}

/// Association of a compiled column with a caller-supplied destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<'a> {
    pub column: &'a str,
    pub token: IdentityToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub text: String,
    pub column: String,
    pub binding: Option<IdentityToken>,
}

impl ProjectionItem {
    pub fn binding(&self) -> Option<Binding<'_>> {
        self.binding.map(|token| Binding {
            column: &self.column,
            token,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub distinct: bool,
    pub items: Vec<ProjectionItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expression: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Property { target: String, value: String },
    Labels { target: String, labels: Vec<String> },
    Merge { target: String, value: String },
    Replace { target: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Removal {
    Property(String),
    Labels { target: String, labels: Vec<String> },
}

/// One accumulated clause
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Use(String),
    Match(Vec<PatternChain>),
    OptionalMatch(Vec<PatternChain>),
    Create(Vec<PatternChain>),
    Merge(PatternChain),
    OnMatch(Vec<Assignment>),
    OnCreate(Vec<Assignment>),
    Where(Expression),
    With(Projection),
    Return(Projection),
    OrderBy(Vec<OrderItem>),
    Skip(String),
    Limit(String),
    Set(Vec<Assignment>),
    Remove(Vec<Removal>),
    Delete(Vec<String>),
    DetachDelete(Vec<String>),
    Unwind { expression: String, alias: String },
    Call(String),
    Show(String),
    Yield(Vec<ProjectionItem>),
    ForEach {
        variable: String,
        list: String,
        updates: Vec<Clause>,
    },
    Subquery(Vec<Clause>),
    Union(Vec<Vec<Clause>>),
    UnionAll(Vec<Vec<Clause>>),
    RawText(String),
}

impl Clause {
    /// True for a list clause or block that was given nothing to print
    pub fn is_empty(&self) -> bool {
        match self {
            Clause::Match(items) | Clause::OptionalMatch(items) | Clause::Create(items) => {
                items.is_empty()
            }
            Clause::OnMatch(items) | Clause::OnCreate(items) | Clause::Set(items) => items.is_empty(),
            Clause::With(projection) | Clause::Return(projection) => projection.items.is_empty(),
            Clause::OrderBy(items) => items.is_empty(),
            Clause::Remove(items) => items.is_empty(),
            Clause::Delete(items) | Clause::DetachDelete(items) => items.is_empty(),
            Clause::Yield(items) => items.is_empty(),
            Clause::ForEach { updates, .. } => updates.is_empty(),
            Clause::Subquery(clauses) => clauses.is_empty(),
            Clause::Union(branches) | Clause::UnionAll(branches) => branches.is_empty(),
            Clause::Use(_)
            | Clause::Merge(_)
            | Clause::Where(_)
            | Clause::Skip(_)
            | Clause::Limit(_)
            | Clause::Unwind { .. }
            | Clause::Call(_)
            | Clause::Show(_)
            | Clause::RawText(_) => false,
        }
    }

    /// Leading keyword, used in diagnostics
    pub fn keyword(&self) -> &'static str {
        match self {
            Clause::Use(_) => "USE",
            Clause::Match(_) => "MATCH",
            Clause::OptionalMatch(_) => "OPTIONAL MATCH",
            Clause::Create(_) => "CREATE",
            Clause::Merge(_) => "MERGE",
            Clause::OnMatch(_) => "ON MATCH",
            Clause::OnCreate(_) => "ON CREATE",
            Clause::Where(_) => "WHERE",
            Clause::With(_) => "WITH",
            Clause::Return(_) => "RETURN",
            Clause::OrderBy(_) => "ORDER BY",
            Clause::Skip(_) => "SKIP",
            Clause::Limit(_) => "LIMIT",
            Clause::Set(_) => "SET",
            Clause::Remove(_) => "REMOVE",
            Clause::Delete(_) => "DELETE",
            Clause::DetachDelete(_) => "DETACH DELETE",
            Clause::Unwind { .. } => "UNWIND",
            Clause::Call(_) => "CALL",
            Clause::Show(_) => "SHOW",
            Clause::Yield(_) => "YIELD",
            Clause::ForEach { .. } => "FOREACH",
            Clause::Subquery(_) => "CALL {}",
            Clause::Union(_) => "UNION",
            Clause::UnionAll(_) => "UNION ALL",
            Clause::RawText(_) => "raw text",
        }
    }
}

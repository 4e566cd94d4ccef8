//! Clause accumulator.
//!
//! A [`Client`] owns one in-progress query: its variable registry, the ordered
//! clause list and the named parameters collected so far. Every fluent method
//! resolves its identifiers against the registry and appends exactly one
//! clause. Clause order is not checked here; adjacency rules need the whole
//! sequence and are enforced by the compiler.
//!
//! Errors that only show up against registry state (a retired token, a second
//! full qualification) are recorded on the client and returned by
//! [`Client::compile`]. The first recorded error wins.

use indexmap::IndexMap;
use std::sync::Arc;

use super::ast::{
    Assignment, Clause, Entity, Identifier, IdentityToken, NodePattern, OrderItem, PatternChain,
    PatternPart, Projection, ProjectionItem, RelationshipPattern, Removal, RemoveItem, SetItem,
    SortItem, VarSpec, Variable,
};
use super::errors::BuilderError;
use super::expression::Condition;
use super::registry::{Qualified, Slot, VariableRegistry};
use crate::config::BuilderConfig;
use crate::cypher_generator::{self, CompileError, CompiledCypher};
use crate::graph_catalog::{GraphEntity, TypeCatalog, TypeDescriptor};

/// One branch of a UNION
pub type Branch<'a> = Box<dyn FnOnce(Client) -> Client + 'a>;

/// A variable use after resolution
struct ResolvedUse {
    variable: Variable,
    created: bool,
    qualified: Option<Qualified>,
}

impl ResolvedUse {
    /// Type labels are only printed where a variable is introduced
    fn declared(&self) -> bool {
        self.created || self.qualified.is_some()
    }
}

#[derive(Debug)]
pub struct Client {
    catalog: Arc<TypeCatalog>,
    config: Arc<BuilderConfig>,
    registry: VariableRegistry,
    clauses: Vec<Clause>,
    parameters: IndexMap<String, serde_json::Value>,
    next_token: u64,
    depth: u32,
    error: Option<BuilderError>,
}

impl Default for Client {
    fn default() -> Self {
        Client::new(Arc::new(TypeCatalog::new()))
    }
}

impl Client {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Client::with_config(catalog, BuilderConfig::default())
    }

    pub fn with_config(catalog: Arc<TypeCatalog>, config: BuilderConfig) -> Self {
        Client {
            catalog,
            config: Arc::new(config),
            registry: VariableRegistry::new(),
            clauses: Vec::new(),
            parameters: IndexMap::new(),
            next_token: 0,
            depth: 0,
            error: None,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// First error recorded so far, if any
    pub fn error(&self) -> Option<&BuilderError> {
        self.error.as_ref()
    }

    /// Issue an untyped result destination
    pub fn token(&mut self) -> IdentityToken {
        self.next_token += 1;
        IdentityToken::new(self.next_token)
    }

    /// Issue a result destination typed by a registered `GraphEntity`
    pub fn entity<T: GraphEntity>(&mut self) -> Result<Entity, BuilderError> {
        let descriptor = self.catalog.describe_type::<T>()?;
        Ok(Entity::new(self.token(), descriptor))
    }

    /// The registered type as a value: an unnamed node or relationship
    /// carrying the type's label
    pub fn type_value<T: GraphEntity>(&self) -> Result<Identifier, BuilderError> {
        Ok(Identifier::TypeValue(self.catalog.describe_type::<T>()?))
    }

    pub fn describe(&self, type_name: &str) -> Result<Arc<TypeDescriptor>, BuilderError> {
        Ok(self.catalog.describe(type_name)?)
    }

    /// Compile the accumulated clauses into query text
    pub fn compile(self) -> Result<CompiledCypher, CompileError> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        cypher_generator::compile(&self.clauses, self.parameters, &self.config)
    }

    // ------------------------------------------------------------------
    // Reading clauses
    // ------------------------------------------------------------------

    pub fn use_(self, database: impl Into<String>) -> Self {
        let database = database.into();
        self.push(Ok(Clause::Use(database)))
    }

    pub fn match_(self, pattern: impl Into<PatternPart>) -> Self {
        self.match_all([pattern.into()])
    }

    /// `MATCH p1, p2, ...`
    pub fn match_all<P: Into<PatternPart>>(mut self, patterns: impl IntoIterator<Item = P>) -> Self {
        let result = self.resolve_patterns(patterns).map(Clause::Match);
        self.push(result)
    }

    pub fn optional_match(self, pattern: impl Into<PatternPart>) -> Self {
        self.optional_match_all([pattern.into()])
    }

    pub fn optional_match_all<P: Into<PatternPart>>(
        mut self,
        patterns: impl IntoIterator<Item = P>,
    ) -> Self {
        let result = self.resolve_patterns(patterns).map(Clause::OptionalMatch);
        self.push(result)
    }

    pub fn where_(mut self, condition: impl Into<Condition>) -> Self {
        let condition: Condition = condition.into();
        let result = condition
            .try_map(&mut |atom| self.resolve_value(atom))
            .map(Clause::Where);
        self.push(result)
    }

    pub fn with<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VarSpec>,
    {
        self.project(false, items, Clause::With)
    }

    pub fn with_distinct<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VarSpec>,
    {
        self.project(true, items, Clause::With)
    }

    pub fn return_<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VarSpec>,
    {
        self.project(false, items, Clause::Return)
    }

    pub fn return_distinct<I>(self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VarSpec>,
    {
        self.project(true, items, Clause::Return)
    }

    pub fn order_by<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SortItem>,
    {
        let result = items
            .into_iter()
            .map(|item| {
                let item: SortItem = item.into();
                Ok(OrderItem {
                    expression: self.resolve_value(item.identifier)?,
                    order: item.order,
                })
            })
            .collect::<Result<Vec<_>, BuilderError>>()
            .map(Clause::OrderBy);
        self.push(result)
    }

    pub fn skip(mut self, count: impl Into<Identifier>) -> Self {
        let result = self.resolve_value(count.into()).map(Clause::Skip);
        self.push(result)
    }

    pub fn limit(mut self, count: impl Into<Identifier>) -> Self {
        let result = self.resolve_value(count.into()).map(Clause::Limit);
        self.push(result)
    }

    /// `UNWIND expression AS alias`
    pub fn unwind(mut self, expression: impl Into<Identifier>, alias: impl Into<VarSpec>) -> Self {
        let result = self.resolve_value(expression.into()).and_then(|expression| {
            let alias = self.resolve_reference(alias.into())?;
            Ok(Clause::Unwind { expression, alias })
        });
        self.push(result)
    }

    /// Standalone procedure call, e.g. `db.labels()`
    pub fn call(self, procedure: impl Into<String>) -> Self {
        let procedure = procedure.into();
        self.push(Ok(Clause::Call(procedure)))
    }

    /// `SHOW <command>`, e.g. `PROCEDURES`
    pub fn show(self, command: impl Into<String>) -> Self {
        let command = command.into();
        self.push(Ok(Clause::Show(command)))
    }

    pub fn yield_<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VarSpec>,
    {
        let result = self.projection_items(items).map(Clause::Yield);
        self.push(result)
    }

    /// Verbatim query text, printed on its own line
    pub fn cypher(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.push(Ok(Clause::RawText(text)))
    }

    // ------------------------------------------------------------------
    // Writing clauses
    // ------------------------------------------------------------------

    pub fn create(self, pattern: impl Into<PatternPart>) -> Self {
        self.create_all([pattern.into()])
    }

    pub fn create_all<P: Into<PatternPart>>(mut self, patterns: impl IntoIterator<Item = P>) -> Self {
        let result = self.resolve_patterns(patterns).map(Clause::Create);
        self.push(result)
    }

    pub fn merge(mut self, pattern: impl Into<PatternPart>) -> Self {
        let result = self.resolve_pattern(pattern.into()).map(Clause::Merge);
        self.push(result)
    }

    /// `ON MATCH SET ...`; must directly follow a MERGE or another ON block
    pub fn on_match(mut self, items: impl IntoIterator<Item = SetItem>) -> Self {
        let result = self.assignments(items).map(Clause::OnMatch);
        self.push(result)
    }

    /// `ON CREATE SET ...`; must directly follow a MERGE or another ON block
    pub fn on_create(mut self, items: impl IntoIterator<Item = SetItem>) -> Self {
        let result = self.assignments(items).map(Clause::OnCreate);
        self.push(result)
    }

    pub fn set(mut self, items: impl IntoIterator<Item = SetItem>) -> Self {
        let result = self.assignments(items).map(Clause::Set);
        self.push(result)
    }

    pub fn remove(mut self, items: impl IntoIterator<Item = RemoveItem>) -> Self {
        let result = items
            .into_iter()
            .map(|item| self.removal(item))
            .collect::<Result<Vec<_>, BuilderError>>()
            .map(Clause::Remove);
        self.push(result)
    }

    pub fn delete<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        let result = self.values(targets).map(Clause::Delete);
        self.push(result)
    }

    pub fn detach_delete<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        let result = self.values(targets).map(Clause::DetachDelete);
        self.push(result)
    }

    // ------------------------------------------------------------------
    // Nested blocks
    // ------------------------------------------------------------------

    /// `CALL { ... }`. The block shares this client's variables: outer
    /// variables are visible inside, and variables it introduces stay
    /// resolvable afterwards.
    pub fn subquery(mut self, build: impl FnOnce(Client) -> Client) -> Self {
        if let Err(error) = self.check_nesting() {
            self.fail(error);
            return self;
        }
        let registry = std::mem::take(&mut self.registry);
        let child = build(self.nested(registry));
        let (clauses, registry) = self.absorb(child);
        self.registry = registry;
        self.push(Ok(Clause::Subquery(clauses)))
    }

    /// `FOREACH (variable IN list | ...)`, restricted to updating clauses
    pub fn for_each(
        mut self,
        variable: impl Into<Identifier>,
        list: impl Into<Identifier>,
        update: impl FnOnce(Updater) -> Updater,
    ) -> Self {
        if let Err(error) = self.check_nesting() {
            self.fail(error);
            return self;
        }
        let heading = self.resolve_value(list.into()).and_then(|list| {
            let variable = self.resolve_value(variable.into())?;
            Ok((variable, list))
        });
        let (variable, list) = match heading {
            Ok(heading) => heading,
            Err(error) => return self.push(Err(error)),
        };
        let registry = std::mem::take(&mut self.registry);
        let updater = update(Updater {
            client: self.nested(registry),
        });
        let (updates, registry) = self.absorb(updater.client);
        self.registry = registry;
        self.push(Ok(Clause::ForEach {
            variable,
            list,
            updates,
        }))
    }

    /// `first UNION second`
    pub fn union<'a>(
        self,
        first: impl FnOnce(Client) -> Client + 'a,
        second: impl FnOnce(Client) -> Client + 'a,
    ) -> Self {
        let first: Branch<'a> = Box::new(first);
        let second: Branch<'a> = Box::new(second);
        self.union_branches(false, vec![first, second])
    }

    /// `first UNION ALL second`
    pub fn union_all<'a>(
        self,
        first: impl FnOnce(Client) -> Client + 'a,
        second: impl FnOnce(Client) -> Client + 'a,
    ) -> Self {
        let first: Branch<'a> = Box::new(first);
        let second: Branch<'a> = Box::new(second);
        self.union_branches(true, vec![first, second])
    }

    /// Any number of UNION (or UNION ALL, when `all`) branches. Each branch
    /// starts with a fresh set of variables; tokens issued outside stay
    /// usable in every branch.
    pub fn union_branches(mut self, all: bool, branches: Vec<Branch<'_>>) -> Self {
        if let Err(error) = self.check_nesting() {
            self.fail(error);
            return self;
        }
        let mut statements = Vec::with_capacity(branches.len());
        for branch in branches {
            let child = branch(self.nested(VariableRegistry::new()));
            let (clauses, _) = self.absorb(child);
            statements.push(clauses);
        }
        let clause = if all {
            Clause::UnionAll(statements)
        } else {
            Clause::Union(statements)
        };
        self.push(Ok(clause))
    }

    // ------------------------------------------------------------------
    // Accumulation
    // ------------------------------------------------------------------

    fn push(mut self, result: Result<Clause, BuilderError>) -> Self {
        match result {
            Ok(clause) if clause.is_empty() => self.fail(BuilderError::EmptyClause {
                clause: clause.keyword(),
            }),
            Ok(clause) => {
                log::debug!("Appended {} clause at depth {}", clause.keyword(), self.depth);
                self.clauses.push(clause);
            }
            Err(error) => self.fail(error),
        }
        self
    }

    fn fail(&mut self, error: BuilderError) {
        log::debug!("Recorded builder error: {}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn check_nesting(&self) -> Result<(), BuilderError> {
        let depth = self.depth + 1;
        let max = self.config.max_nesting_depth;
        if depth > max {
            return Err(BuilderError::NestingTooDeep { depth, max });
        }
        Ok(())
    }

    fn nested(&self, registry: VariableRegistry) -> Client {
        Client {
            catalog: self.catalog.clone(),
            config: self.config.clone(),
            registry,
            clauses: Vec::new(),
            parameters: IndexMap::new(),
            next_token: self.next_token,
            depth: self.depth + 1,
            error: None,
        }
    }

    /// Fold a finished nested client back in, returning its clauses and registry
    fn absorb(&mut self, child: Client) -> (Vec<Clause>, VariableRegistry) {
        self.next_token = self.next_token.max(child.next_token);
        for (name, value) in child.parameters {
            self.add_parameter(name, value);
        }
        if let Some(error) = child.error {
            self.fail(error);
        }
        (child.clauses, child.registry)
    }

    fn add_parameter(&mut self, name: String, value: serde_json::Value) {
        if let Some(previous) = self.parameters.get(&name) {
            if *previous != value {
                log::warn!("Parameter ${} redefined, keeping the last value", name);
            }
        }
        self.parameters.insert(name, value);
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    fn resolve_use(&mut self, spec: VarSpec) -> Result<ResolvedUse, BuilderError> {
        let VarSpec {
            identifier,
            qualifier,
            name,
            bind,
            ..
        } = spec;
        if let Identifier::NamedParameter { name, value } = &identifier {
            self.add_parameter(name.clone(), value.clone());
        }

        let resolution = self.registry.resolve(&identifier)?;
        let mut slot = resolution.slot;
        // query text is never renamed; a qualified use gets its own copy
        if identifier.text().is_some() && bind.is_none() && (qualifier.is_some() || name.is_some()) {
            slot = Slot::Detached(Box::new(self.registry.variable(&slot).clone()));
        }

        let qualified = match (qualifier, name) {
            (Some(qualifier), name) => Some(self.registry.qualify(
                &mut slot,
                &identifier,
                &qualifier,
                name.as_deref(),
            )?),
            (None, Some(name)) => Some(self.registry.qualify(&mut slot, &identifier, &name, None)?),
            (None, None) => None,
        };
        if let Some(token) = bind {
            self.registry.rebind(&mut slot, &identifier, token)?;
        }

        Ok(ResolvedUse {
            variable: self.registry.variable(&slot).clone(),
            created: resolution.created,
            qualified,
        })
    }

    /// Text a later clause uses to refer to `spec`
    fn resolve_reference(&mut self, spec: VarSpec) -> Result<String, BuilderError> {
        let shown = spec.identifier.to_string();
        let used = self.resolve_use(spec)?;
        used.variable
            .reference()
            .map(str::to_string)
            .ok_or(BuilderError::UnresolvedIdentifier { identifier: shown })
    }

    fn resolve_value(&mut self, identifier: Identifier) -> Result<String, BuilderError> {
        self.resolve_reference(VarSpec::new(identifier))
    }

    fn values<I>(&mut self, identifiers: I) -> Result<Vec<String>, BuilderError>
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        identifiers
            .into_iter()
            .map(|identifier| self.resolve_value(identifier.into()))
            .collect()
    }

    /// Resolve a node or relationship into the variable its pattern prints
    fn resolve_entity(&mut self, mut spec: VarSpec) -> Result<Variable, BuilderError> {
        let label = spec.label.take();
        let properties = std::mem::take(&mut spec.properties);
        let props_expr = spec.props_expr.take();
        let var_length = spec.var_length.take();

        let used = self.resolve_use(spec)?;
        let properties = properties
            .into_iter()
            .map(|(key, value)| Ok((key, self.resolve_value(value)?)))
            .collect::<Result<IndexMap<_, _>, BuilderError>>()?;
        let declared = used.declared();
        let variable = used.variable;

        Ok(Variable {
            name: None,
            expr: variable.reference().map(str::to_string),
            bound_identity: variable.bound_identity,
            label_pattern: label.or(variable.label_pattern.filter(|_| declared)),
            properties,
            props_expr,
            var_length,
        })
    }

    fn resolve_pattern(&mut self, part: PatternPart) -> Result<PatternChain, BuilderError> {
        let (pattern, path) = match part {
            PatternPart::Chain(pattern) => (pattern, None),
            PatternPart::Path(path) => (path.pattern, Some(path.variable)),
        };
        let path = match path {
            Some(variable) => Some(self.resolve_reference(variable)?),
            None => None,
        };
        let start = NodePattern {
            variable: self.resolve_entity(pattern.start)?,
        };
        let mut segments = Vec::with_capacity(pattern.segments.len());
        for segment in pattern.segments {
            let relationship = RelationshipPattern {
                variable: self.resolve_entity(segment.relationship)?,
                direction: segment.direction,
            };
            let node = NodePattern {
                variable: self.resolve_entity(segment.node)?,
            };
            segments.push((relationship, node));
        }
        Ok(PatternChain {
            path,
            start,
            segments,
        })
    }

    fn resolve_patterns<P: Into<PatternPart>>(
        &mut self,
        patterns: impl IntoIterator<Item = P>,
    ) -> Result<Vec<PatternChain>, BuilderError> {
        patterns
            .into_iter()
            .map(|pattern| self.resolve_pattern(pattern.into()))
            .collect()
    }

    fn projection_item(&mut self, spec: VarSpec) -> Result<ProjectionItem, BuilderError> {
        let shown = spec.identifier.to_string();
        let used = self.resolve_use(spec)?;
        let variable = used.variable;
        let column = variable
            .reference()
            .ok_or(BuilderError::UnresolvedIdentifier { identifier: shown })?
            .to_string();

        let text = match (&used.qualified, variable.expr.as_deref()) {
            (Some(Qualified::Alias { source }), _) if *source != column => {
                format!("{} AS {}", source, column)
            }
            (Some(Qualified::Expression), Some(expr)) if expr != column => {
                format!("{} AS {}", expr, column)
            }
            _ => column.clone(),
        };

        Ok(ProjectionItem {
            text,
            column,
            binding: variable.bound_identity,
        })
    }

    fn projection_items<I>(&mut self, items: I) -> Result<Vec<ProjectionItem>, BuilderError>
    where
        I: IntoIterator,
        I::Item: Into<VarSpec>,
    {
        items
            .into_iter()
            .map(|item| self.projection_item(item.into()))
            .collect()
    }

    fn project<I>(mut self, distinct: bool, items: I, clause: fn(Projection) -> Clause) -> Self
    where
        I: IntoIterator,
        I::Item: Into<VarSpec>,
    {
        let result = self
            .projection_items(items)
            .map(|items| clause(Projection { distinct, items }));
        self.push(result)
    }

    fn assignments(
        &mut self,
        items: impl IntoIterator<Item = SetItem>,
    ) -> Result<Vec<Assignment>, BuilderError> {
        items
            .into_iter()
            .map(|item| self.assignment(item))
            .collect()
    }

    fn assignment(&mut self, item: SetItem) -> Result<Assignment, BuilderError> {
        Ok(match item {
            SetItem::Property { target, value } => Assignment::Property {
                target: self.resolve_value(target)?,
                value: self.resolve_value(value)?,
            },
            SetItem::Labels { target, labels } => Assignment::Labels {
                target: self.resolve_value(target)?,
                labels,
            },
            SetItem::Merge { target, value } => Assignment::Merge {
                target: self.resolve_value(target)?,
                value: self.resolve_value(value)?,
            },
            SetItem::Replace { target, value } => Assignment::Replace {
                target: self.resolve_value(target)?,
                value: self.resolve_value(value)?,
            },
        })
    }

    fn removal(&mut self, item: RemoveItem) -> Result<Removal, BuilderError> {
        Ok(match item {
            RemoveItem::Property(target) => Removal::Property(self.resolve_value(target)?),
            RemoveItem::Labels { target, labels } => Removal::Labels {
                target: self.resolve_value(target)?,
                labels,
            },
        })
    }
}

/// Restricted builder handed to [`Client::for_each`]: only updating clauses
/// can appear inside a FOREACH.
#[derive(Debug)]
pub struct Updater {
    client: Client,
}

impl Updater {
    pub fn set(self, items: impl IntoIterator<Item = SetItem>) -> Self {
        Updater {
            client: self.client.set(items),
        }
    }

    pub fn remove(self, items: impl IntoIterator<Item = RemoveItem>) -> Self {
        Updater {
            client: self.client.remove(items),
        }
    }

    pub fn delete<I>(self, targets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        Updater {
            client: self.client.delete(targets),
        }
    }

    pub fn detach_delete<I>(self, targets: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Identifier>,
    {
        Updater {
            client: self.client.detach_delete(targets),
        }
    }
}

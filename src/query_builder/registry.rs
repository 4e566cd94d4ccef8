//! Variable registry.
//!
//! Resolves every identifier form to one canonical [`Variable`]:
//!
//! - `Name` / `RawExpression`: keyed by text
//! - `OpaqueReference`: keyed by token, or by `(token, field)` for field paths
//! - `TypeValue`, `NamedParameter`, `Anonymous`: never registered, each
//!   resolution yields a fresh detached variable
//!
//! A token handed to [`VariableRegistry::rebind`] is retired; resolving it
//! afterwards fails with `UnresolvedIdentifier`.

use std::collections::{HashMap, HashSet};

use super::ast::{FieldRef, Identifier, IdentityToken, Variable};
use super::errors::BuilderError;

pub type VarId = usize;

/// Where a resolved variable lives
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Registered(VarId),
    Detached(Box<Variable>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub slot: Slot,
    /// The variable did not exist before this resolution
    pub created: bool,
}

/// What a qualification assigned
#[derive(Debug, Clone, PartialEq)]
pub enum Qualified {
    /// The qualifier became the expression of a variable that had none
    Expression,
    /// The qualifier became the alias of `source`, the variable's previous reference
    Alias { source: String },
}

#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: Vec<Variable>,
    by_text: HashMap<String, VarId>,
    by_token: HashMap<IdentityToken, VarId>,
    by_field: HashMap<(IdentityToken, String), VarId>,
    /// Field variables whose expression was set by an explicit qualification
    pinned: HashSet<VarId>,
    retired: HashSet<IdentityToken>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variable<'a>(&'a self, slot: &'a Slot) -> &'a Variable {
        match slot {
            Slot::Registered(id) => &self.variables[*id],
            Slot::Detached(variable) => variable,
        }
    }

    pub fn variable_mut<'a>(&'a mut self, slot: &'a mut Slot) -> &'a mut Variable {
        match slot {
            Slot::Registered(id) => &mut self.variables[*id],
            Slot::Detached(variable) => variable,
        }
    }

    fn check_live(&self, token: IdentityToken) -> Result<(), BuilderError> {
        if self.retired.contains(&token) {
            return Err(BuilderError::UnresolvedIdentifier {
                identifier: token.to_string(),
            });
        }
        Ok(())
    }

    fn push(&mut self, variable: Variable) -> VarId {
        self.variables.push(variable);
        self.variables.len() - 1
    }

    /// Resolve an identifier to its canonical variable, creating it on first use
    pub fn resolve(&mut self, identifier: &Identifier) -> Result<Resolution, BuilderError> {
        match identifier {
            Identifier::Anonymous => Ok(Resolution {
                slot: Slot::Detached(Box::default()),
                created: true,
            }),
            Identifier::Name(text) | Identifier::RawExpression(text) => {
                if let Some(id) = self.by_text.get(text) {
                    return Ok(Resolution {
                        slot: Slot::Registered(*id),
                        created: false,
                    });
                }
                let id = self.push(Variable {
                    expr: Some(text.clone()),
                    ..Default::default()
                });
                self.by_text.insert(text.clone(), id);
                log::debug!("Registered variable `{}`", text);
                Ok(Resolution {
                    slot: Slot::Registered(id),
                    created: true,
                })
            }
            Identifier::OpaqueReference {
                token,
                descriptor,
                field: None,
            } => {
                self.check_live(*token)?;
                if let Some(id) = self.by_token.get(token) {
                    return Ok(Resolution {
                        slot: Slot::Registered(*id),
                        created: false,
                    });
                }
                let id = self.push(Variable {
                    bound_identity: Some(*token),
                    label_pattern: descriptor.as_ref().map(|d| d.label.clone()),
                    ..Default::default()
                });
                self.by_token.insert(*token, id);
                log::debug!("Registered variable for token {}", token);
                Ok(Resolution {
                    slot: Slot::Registered(id),
                    created: true,
                })
            }
            Identifier::OpaqueReference {
                token,
                field: Some(field),
                ..
            } => self.resolve_field(*token, field),
            Identifier::TypeValue(descriptor) => Ok(Resolution {
                slot: Slot::Detached(Box::new(Variable {
                    label_pattern: Some(descriptor.label.clone()),
                    ..Default::default()
                })),
                created: true,
            }),
            Identifier::NamedParameter { name, .. } => Ok(Resolution {
                slot: Slot::Detached(Box::new(Variable {
                    expr: Some(format!("${}", name)),
                    ..Default::default()
                })),
                created: true,
            }),
        }
    }

    /// A field path resolves to `<owner>.<property>` using the owner's current
    /// reference, so renaming the owner renames later uses of the field. An
    /// owner that was never bound leaves the field variable without an
    /// expression until it is qualified. A field that was qualified or aliased
    /// keeps its own text.
    fn resolve_field(&mut self, token: IdentityToken, field: &FieldRef) -> Result<Resolution, BuilderError> {
        self.check_live(token)?;
        let expr = self
            .by_token
            .get(&token)
            .and_then(|id| self.variables[*id].reference())
            .map(|owner| format!("{}.{}", owner, field.property));
        let key = (token, field.field.clone());
        if let Some(&id) = self.by_field.get(&key) {
            let variable = &mut self.variables[id];
            if variable.name.is_none() && !self.pinned.contains(&id) {
                variable.expr = expr;
            }
            return Ok(Resolution {
                slot: Slot::Registered(id),
                created: false,
            });
        }
        let id = self.push(Variable {
            expr,
            ..Default::default()
        });
        self.by_field.insert(key, id);
        Ok(Resolution {
            slot: Slot::Registered(id),
            created: true,
        })
    }

    /// Apply a qualification to a resolved variable.
    ///
    /// `identifier > qualifier > name`: a variable that already has an
    /// expression takes the qualifier as its alias (and then cannot also take
    /// `name`); otherwise the qualifier becomes its expression and `name`, if
    /// any, its alias.
    pub fn qualify(
        &mut self,
        slot: &mut Slot,
        identifier: &Identifier,
        qualifier: &str,
        name: Option<&str>,
    ) -> Result<Qualified, BuilderError> {
        let registered = match slot {
            Slot::Registered(id) => Some(*id),
            Slot::Detached(_) => None,
        };
        let variable = self.variable_mut(slot);
        if variable.has_expr() {
            if name.is_some() {
                return Err(BuilderError::DuplicateQualification {
                    identifier: identifier.to_string(),
                    requested: qualifier.to_string(),
                });
            }
            let source = variable.reference().unwrap_or_default().to_string();
            log::debug!("Aliased `{}` as `{}`", source, qualifier);
            variable.name = Some(qualifier.to_string());
            Ok(Qualified::Alias { source })
        } else {
            variable.expr = Some(qualifier.to_string());
            if let Some(name) = name {
                variable.name = Some(name.to_string());
            }
            log::debug!("Qualified {} as `{}`", identifier, qualifier);
            if let Some(id) = registered {
                self.pinned.insert(id);
            }
            Ok(Qualified::Expression)
        }
    }

    /// Attach `token` to a resolved variable. When `identifier` is itself a
    /// token, that token is retired.
    pub fn rebind(
        &mut self,
        slot: &mut Slot,
        identifier: &Identifier,
        token: IdentityToken,
    ) -> Result<(), BuilderError> {
        self.check_live(token)?;
        let id = match slot {
            Slot::Registered(id) => *id,
            Slot::Detached(variable) => {
                let id = self.push(std::mem::take(variable.as_mut()));
                *slot = Slot::Registered(id);
                id
            }
        };
        if let Identifier::OpaqueReference {
            token: old,
            field: None,
            ..
        } = identifier
        {
            if *old != token {
                self.by_token.remove(old);
                self.retired.insert(*old);
                log::debug!("Retired token {} in favour of {}", old, token);
            }
        }
        self.by_token.insert(token, id);
        self.variables[id].bound_identity = Some(token);
        Ok(())
    }
}

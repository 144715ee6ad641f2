use std::collections::{BTreeMap, BTreeSet};

use super::*;
use crate::{PatternError, Result};

/// Incremental builder of [`Conjunction`]s.
///
/// ```
/// # use conclude_api::pattern::{Conjunction, RolePlayer};
/// # use conclude_api::label::Label;
/// # use conclude_api::variable::Variable;
/// # fn main() -> conclude_api::Result<()> {
/// let x = Variable::named("x")?;
/// let mut builder = Conjunction::builder();
/// let rel = builder.anonymous();
/// let conjunction = builder
///     .relation(rel.clone(), [RolePlayer::new(Label::from("employment:employee"), x.clone())])
///     .isa(rel, Label::new("employment"))
///     .resolve(x, ["person", "student"])
///     .build()?;
/// assert_eq!(conjunction.constraints().len(), 2);
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConjunctionBuilder {
    constraints: Vec<Constraint>,
    resolved: BTreeMap<Variable, BTreeSet<Label>>,
    next_anonymous: usize,
}

impl ConjunctionBuilder {
    /// Allocate a fresh anonymous variable.
    pub fn anonymous(&mut self) -> Variable {
        let var = Variable::anonymous(self.next_anonymous);
        self.next_anonymous += 1;
        var
    }

    /// Add `thing isa type_var`.
    pub fn isa<T: Into<Variable>>(mut self, thing: Variable, type_var: T) -> Self {
        self.constraints.push(Constraint::Isa {
            thing,
            type_var: type_var.into(),
        });
        self
    }

    /// Add `owner has attribute`.
    pub fn has(mut self, owner: Variable, attribute: Variable) -> Self {
        self.constraints.push(Constraint::Has { owner, attribute });
        self
    }

    /// Add `relation (players...)`.
    pub fn relation<I>(mut self, relation: Variable, players: I) -> Self
    where
        I: IntoIterator<Item = RolePlayer>,
    {
        self.constraints.push(Constraint::Relation {
            relation,
            players: players.into_iter().collect(),
        });
        self
    }

    /// Add a value constraint on `attribute`.
    pub fn value(mut self, attribute: Variable, predicate: ValuePredicate) -> Self {
        self.constraints.push(Constraint::Value {
            attribute,
            predicate,
        });
        self
    }

    /// Attach the feasible types of `var`, as computed by type inference.
    ///
    /// Successive calls for the same variable accumulate.
    pub fn resolve<I, L>(mut self, var: Variable, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        self.resolved
            .entry(var)
            .or_default()
            .extend(labels.into_iter().map(Into::into));
        self
    }

    /// Check the consistency of the constraints, and build the conjunction.
    pub fn build(self) -> Result<Conjunction> {
        let mut things = BTreeSet::new();
        for constraint in &self.constraints {
            if let Constraint::Relation { relation, players } = constraint {
                if players.is_empty() {
                    return Err(PatternError::EmptyRelation(relation.clone()));
                }
            }
            for var in constraint.things() {
                if var.as_label().is_some() {
                    return Err(PatternError::LabelAsThing(var.clone()));
                }
                things.insert(var);
            }
        }
        if let Some(var) = self
            .constraints
            .iter()
            .flat_map(Constraint::types)
            .find(|var| things.contains(var))
        {
            return Err(PatternError::InconsistentVariable(var.clone()));
        }
        Ok(Conjunction {
            constraints: self.constraints,
            resolved: self.resolved,
        })
    }
}

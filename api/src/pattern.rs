//! I define [`Conjunction`], a resolved pattern:
//! a list of [`Constraint`]s together with the types that upstream type inference
//! deemed feasible for each of its variables.
//!
//! Conjunctions are built with a [`ConjunctionBuilder`].
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::label::Label;
use crate::predicate::ValuePredicate;
use crate::variable::Variable;

mod _builder;
pub use _builder::*;

/// A role-player in a relation constraint.
///
/// The role is either a label variable (`employment:employee`),
/// a named variable (`$role`), or absent (`($x)`).
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RolePlayer {
    /// The role played, if specified.
    pub role: Option<Variable>,
    /// The thing playing the role.
    pub player: Variable,
}

impl RolePlayer {
    /// A role-player with a specified role.
    pub fn new<R: Into<Variable>>(role: R, player: Variable) -> Self {
        RolePlayer {
            role: Some(role.into()),
            player,
        }
    }

    /// A role-player whose role is left unspecified.
    pub fn untyped(player: Variable) -> Self {
        RolePlayer { role: None, player }
    }
}

impl fmt::Display for RolePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.role {
            Some(role) => write!(f, "{}: {}", role, self.player),
            None => write!(f, "{}", self.player),
        }
    }
}

/// An atomic constraint of a [`Conjunction`].
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// `thing isa type_var`
    Isa {
        /// The typed thing
        thing: Variable,
        /// Its type
        type_var: Variable,
    },
    /// `owner has attribute`
    Has {
        /// The owner
        owner: Variable,
        /// The owned attribute
        attribute: Variable,
    },
    /// `relation (role: player, ...)`
    Relation {
        /// The relation
        relation: Variable,
        /// Its role-players, in pattern order
        players: Vec<RolePlayer>,
    },
    /// `attribute <predicate>`
    Value {
        /// The constrained attribute
        attribute: Variable,
        /// The predicate its value must satisfy
        predicate: ValuePredicate,
    },
}

impl Constraint {
    /// The variables of this constraint standing in a thing position.
    pub fn things(&self) -> Vec<&Variable> {
        match self {
            Constraint::Isa { thing, .. } => vec![thing],
            Constraint::Has { owner, attribute } => vec![owner, attribute],
            Constraint::Relation { relation, players } => std::iter::once(relation)
                .chain(players.iter().map(|rp| &rp.player))
                .collect(),
            Constraint::Value { attribute, .. } => vec![attribute],
        }
    }

    /// The variables of this constraint standing in a type position.
    pub fn types(&self) -> Vec<&Variable> {
        match self {
            Constraint::Isa { type_var, .. } => vec![type_var],
            Constraint::Relation { players, .. } => {
                players.iter().filter_map(|rp| rp.role.as_ref()).collect()
            }
            Constraint::Has { .. } | Constraint::Value { .. } => vec![],
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Isa { thing, type_var } => write!(f, "{thing} isa {type_var}"),
            Constraint::Has { owner, attribute } => write!(f, "{owner} has {attribute}"),
            Constraint::Relation { relation, players } => {
                write!(f, "{relation} (")?;
                for (i, rp) in players.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{rp}")?;
                }
                write!(f, ")")
            }
            Constraint::Value {
                attribute,
                predicate,
            } => write!(f, "{attribute} {predicate}"),
        }
    }
}

/// A conjunction of constraints, resolved by type inference.
///
/// Each variable may carry the set of type labels it can possibly take.
/// A variable without such a set is unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conjunction {
    constraints: Vec<Constraint>,
    resolved: BTreeMap<Variable, BTreeSet<Label>>,
}

impl Conjunction {
    /// Start building a conjunction.
    pub fn builder() -> ConjunctionBuilder {
        ConjunctionBuilder::default()
    }

    /// The constraints of this conjunction, in pattern order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The feasible types of `var`, if type inference constrained it.
    pub fn resolved_types(&self, var: &Variable) -> Option<&BTreeSet<Label>> {
        self.resolved.get(var)
    }

    /// All the variables occurring in this conjunction.
    pub fn variables(&self) -> BTreeSet<&Variable> {
        self.constraints
            .iter()
            .flat_map(|c| c.things().into_iter().chain(c.types()))
            .collect()
    }

    /// The constraints whose subject (thing, owner, relation or attribute) is `var`.
    pub fn constraints_on<'s>(&'s self, var: &'s Variable) -> impl Iterator<Item = &'s Constraint> {
        self.constraints.iter().filter(move |c| match c {
            Constraint::Isa { thing, .. } => thing == var,
            Constraint::Has { owner, .. } => owner == var,
            Constraint::Relation { relation, .. } => relation == var,
            Constraint::Value { attribute, .. } => attribute == var,
        })
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for c in &self.constraints {
            write!(f, " {c};")?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod test;

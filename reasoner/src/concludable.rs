//! I define [`Concludable`], a minimal fragment of a resolved conjunction
//! that the conclusion of a rule could produce.
//!
//! Concludables are extracted from a [`Conjunction`] with [`Concludable::create`],
//! and unified with the [`Conclusion`](crate::rule::Conclusion) of rules
//! with [`Concludable::unify`].
use std::collections::BTreeSet;
use std::fmt;

use conclude_api::label::Label;
use conclude_api::pattern::Conjunction;
use conclude_api::predicate::ValuePredicate;
use conclude_api::variable::Variable;

mod _extract;
mod _unify;
pub use _unify::Unifiers;

/// A variable of a concludable, with the types that type inference deemed feasible for it.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedVar {
    var: Variable,
    types: Option<BTreeSet<Label>>,
}

impl ResolvedVar {
    pub(crate) fn new(conjunction: &Conjunction, var: &Variable) -> Self {
        ResolvedVar {
            var: var.clone(),
            types: conjunction.resolved_types(var).cloned(),
        }
    }

    /// The variable.
    pub fn var(&self) -> &Variable {
        &self.var
    }

    /// Its feasible types, if type inference constrained it.
    pub fn types(&self) -> Option<&BTreeSet<Label>> {
        self.types.as_ref()
    }
}

/// A role-player of a [`Relation`] concludable.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRolePlayer {
    role: Option<ResolvedVar>,
    player: ResolvedVar,
}

impl ResolvedRolePlayer {
    /// The role, if specified.
    pub fn role(&self) -> Option<&ResolvedVar> {
        self.role.as_ref()
    }

    /// The player.
    pub fn player(&self) -> &ResolvedVar {
        &self.player
    }
}

/// `owner has attribute`, with the type and value constraints of the attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct Has {
    owner: ResolvedVar,
    attribute: ResolvedVar,
    attribute_type: Option<ResolvedVar>,
    values: Vec<ValuePredicate>,
}

impl Has {
    /// The owner.
    pub fn owner(&self) -> &ResolvedVar {
        &self.owner
    }

    /// The owned attribute.
    pub fn attribute(&self) -> &ResolvedVar {
        &self.attribute
    }

    /// The type of the attribute, if specified.
    pub fn attribute_type(&self) -> Option<&ResolvedVar> {
        self.attribute_type.as_ref()
    }

    /// The value predicates on the attribute.
    pub fn values(&self) -> &[ValuePredicate] {
        &self.values
    }
}

/// `relation (role: player, ...)`, with the type of the relation.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    relation: ResolvedVar,
    relation_type: Option<ResolvedVar>,
    players: Vec<ResolvedRolePlayer>,
}

impl Relation {
    /// The relation.
    pub fn relation(&self) -> &ResolvedVar {
        &self.relation
    }

    /// The type of the relation, if specified.
    pub fn relation_type(&self) -> Option<&ResolvedVar> {
        self.relation_type.as_ref()
    }

    /// The role-players, in pattern order (repetitions included).
    pub fn players(&self) -> &[ResolvedRolePlayer] {
        &self.players
    }
}

/// An attribute, with its type and value constraints but no owner.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    attribute: ResolvedVar,
    attribute_type: Option<ResolvedVar>,
    values: Vec<ValuePredicate>,
}

impl Attribute {
    /// The attribute.
    pub fn attribute(&self) -> &ResolvedVar {
        &self.attribute
    }

    /// The type of the attribute, if specified.
    pub fn attribute_type(&self) -> Option<&ResolvedVar> {
        self.attribute_type.as_ref()
    }

    /// The value predicates on the attribute.
    pub fn values(&self) -> &[ValuePredicate] {
        &self.values
    }
}

/// `thing isa type`.
#[derive(Clone, Debug, PartialEq)]
pub struct Isa {
    thing: ResolvedVar,
    type_var: ResolvedVar,
}

impl Isa {
    /// The typed thing.
    pub fn thing(&self) -> &ResolvedVar {
        &self.thing
    }

    /// Its type.
    pub fn type_var(&self) -> &ResolvedVar {
        &self.type_var
    }
}

/// A minimal fragment of a conjunction that a rule could conclude.
#[derive(Clone, Debug, PartialEq)]
pub enum Concludable {
    /// An ownership
    Has(Has),
    /// A relation
    Relation(Relation),
    /// An attribute with a value
    Attribute(Attribute),
    /// A bare type assertion
    Isa(Isa),
}

impl Concludable {
    /// Value comparisons with other variables.
    ///
    /// No rule can conclude them;
    /// they are kept here to filter answers once the other variables are bound.
    pub fn context(&self) -> impl Iterator<Item = &ValuePredicate> {
        let values = match self {
            Concludable::Has(has) => has.values(),
            Concludable::Attribute(attribute) => attribute.values(),
            Concludable::Relation(_) | Concludable::Isa(_) => &[],
        };
        values.iter().filter(|p| !p.is_constant())
    }

    /// The variables of this concludable, in every position.
    pub fn variables(&self) -> BTreeSet<&Variable> {
        let mut vars = BTreeSet::new();
        match self {
            Concludable::Has(has) => {
                vars.insert(has.owner.var());
                vars.insert(has.attribute.var());
                vars.extend(has.attribute_type.as_ref().map(ResolvedVar::var));
            }
            Concludable::Relation(rel) => {
                vars.insert(rel.relation.var());
                vars.extend(rel.relation_type.as_ref().map(ResolvedVar::var));
                for rp in &rel.players {
                    vars.insert(rp.player.var());
                    vars.extend(rp.role.as_ref().map(ResolvedVar::var));
                }
            }
            Concludable::Attribute(attribute) => {
                vars.insert(attribute.attribute.var());
                vars.extend(attribute.attribute_type.as_ref().map(ResolvedVar::var));
            }
            Concludable::Isa(isa) => {
                vars.insert(isa.thing.var());
                vars.insert(isa.type_var.var());
            }
        }
        vars
    }
}

impl fmt::Display for Has {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has ", self.owner.var)?;
        if let Some(t) = &self.attribute_type {
            write!(f, "{} ", t.var)?;
        }
        write!(f, "{}", self.attribute.var)?;
        for p in &self.values {
            write!(f, "; {} {}", self.attribute.var, p)?;
        }
        Ok(())
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.relation.var)?;
        for (i, rp) in self.players.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if let Some(role) = &rp.role {
                write!(f, "{}: ", role.var)?;
            }
            write!(f, "{}", rp.player.var)?;
        }
        write!(f, ")")?;
        if let Some(t) = &self.relation_type {
            write!(f, " isa {}", t.var)?;
        }
        Ok(())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.attribute.var)?;
        if let Some(t) = &self.attribute_type {
            write!(f, " isa {}", t.var)?;
        }
        for p in &self.values {
            write!(f, "; {} {}", self.attribute.var, p)?;
        }
        Ok(())
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} isa {}", self.thing.var, self.type_var.var)
    }
}

impl fmt::Display for Concludable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concludable::Has(has) => fmt::Display::fmt(has, f),
            Concludable::Relation(rel) => fmt::Display::fmt(rel, f),
            Concludable::Attribute(attribute) => fmt::Display::fmt(attribute, f),
            Concludable::Isa(isa) => fmt::Display::fmt(isa, f),
        }
    }
}

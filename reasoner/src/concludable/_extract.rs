use std::collections::BTreeSet;

use conclude_api::pattern::{Conjunction, Constraint};
use conclude_api::predicate::ValuePredicate;
use conclude_api::variable::Variable;

use super::*;
use crate::IllegalState;

impl Concludable {
    /// Extract the concludables of `conjunction`.
    ///
    /// Every constraint that a rule could conclude ends up in exactly one concludable:
    /// * relations absorb the `isa` of their relation variable,
    /// * ownerships absorb the `isa` and the value constraints of their attribute,
    /// * remaining `isa` constraints become attributes (if their thing carries values)
    ///   or bare type assertions,
    /// * remaining value constraints become attributes.
    ///
    /// The result is ordered by the position of the constraints in the conjunction,
    /// so extraction is deterministic.
    pub fn create(conjunction: &Conjunction) -> Result<Vec<Concludable>, IllegalState> {
        Extraction::new(conjunction).run()
    }
}

struct Extraction<'a> {
    conjunction: &'a Conjunction,
    /// indices of the `isa` constraints absorbed so far
    absorbed_isa: BTreeSet<usize>,
    /// attributes whose value constraints are absorbed so far
    absorbed_values: BTreeSet<&'a Variable>,
    concludables: Vec<Concludable>,
}

impl<'a> Extraction<'a> {
    fn new(conjunction: &'a Conjunction) -> Self {
        Extraction {
            conjunction,
            absorbed_isa: BTreeSet::new(),
            absorbed_values: BTreeSet::new(),
            concludables: vec![],
        }
    }

    fn run(mut self) -> Result<Vec<Concludable>, IllegalState> {
        let conjunction = self.conjunction;
        let constraints = conjunction.constraints();
        for constraint in constraints {
            match constraint {
                Constraint::Relation { relation, players } => {
                    let relation_type = self.absorb_isa(relation)?;
                    let players = players
                        .iter()
                        .map(|rp| {
                            let role = match &rp.role {
                                Some(role) => Some(self.type_var(role, constraint)?),
                                None => None,
                            };
                            Ok(ResolvedRolePlayer {
                                role,
                                player: self.resolved(&rp.player),
                            })
                        })
                        .collect::<Result<_, IllegalState>>()?;
                    self.concludables.push(Concludable::Relation(Relation {
                        relation: self.resolved(relation),
                        relation_type,
                        players,
                    }));
                }
                Constraint::Has { owner, attribute } => {
                    let attribute_type = self.absorb_isa(attribute)?;
                    let values = self.absorb_values(attribute);
                    self.concludables.push(Concludable::Has(Has {
                        owner: self.resolved(owner),
                        attribute: self.resolved(attribute),
                        attribute_type,
                        values,
                    }));
                }
                Constraint::Isa { .. } | Constraint::Value { .. } => {}
            }
        }
        for (i, constraint) in constraints.iter().enumerate() {
            if let Constraint::Isa { thing, type_var } = constraint {
                if self.absorbed_isa.insert(i) {
                    let type_var = self.type_var(type_var, constraint)?;
                    let values = self.absorb_values(thing);
                    let concludable = if values.is_empty() {
                        Concludable::Isa(Isa {
                            thing: self.resolved(thing),
                            type_var,
                        })
                    } else {
                        Concludable::Attribute(Attribute {
                            attribute: self.resolved(thing),
                            attribute_type: Some(type_var),
                            values,
                        })
                    };
                    self.concludables.push(concludable);
                }
            }
        }
        for constraint in constraints {
            if let Constraint::Value { attribute, .. } = constraint {
                let values = self.absorb_values(attribute);
                if !values.is_empty() {
                    self.concludables.push(Concludable::Attribute(Attribute {
                        attribute: self.resolved(attribute),
                        attribute_type: None,
                        values,
                    }));
                }
            }
        }
        log::trace!(
            "extracted {} concludable(s) from {}",
            self.concludables.len(),
            self.conjunction
        );
        Ok(self.concludables)
    }

    fn resolved(&self, var: &Variable) -> ResolvedVar {
        ResolvedVar::new(self.conjunction, var)
    }

    /// Only named variables and labels can stand for types.
    fn type_var(
        &self,
        var: &Variable,
        constraint: &Constraint,
    ) -> Result<ResolvedVar, IllegalState> {
        if var.is_anonymous() {
            log::warn!("anonymous variable {var} used as a type in '{constraint}'");
            Err(IllegalState::UnclassifiableConstraint(
                constraint.to_string(),
            ))
        } else {
            Ok(self.resolved(var))
        }
    }

    /// The type of the first `isa` on `thing` not absorbed yet, if any.
    fn absorb_isa(&mut self, thing: &Variable) -> Result<Option<ResolvedVar>, IllegalState> {
        let conjunction = self.conjunction;
        let found = conjunction.constraints().iter().enumerate().find(|(i, c)| {
            !self.absorbed_isa.contains(i)
                && matches!(c, Constraint::Isa { thing: t, .. } if t == thing)
        });
        let Some((i, constraint)) = found else {
            return Ok(None);
        };
        let Constraint::Isa { type_var, .. } = constraint else {
            return Ok(None);
        };
        let type_var = self.type_var(type_var, constraint)?;
        self.absorbed_isa.insert(i);
        Ok(Some(type_var))
    }

    /// All the value constraints on `attribute`, unless already absorbed.
    fn absorb_values(&mut self, attribute: &'a Variable) -> Vec<ValuePredicate> {
        if !self.absorbed_values.insert(attribute) {
            return vec![];
        }
        let conjunction = self.conjunction;
        conjunction
            .constraints()
            .iter()
            .filter_map(|c| match c {
                Constraint::Value {
                    attribute: a,
                    predicate,
                } if a == attribute => Some(predicate.clone()),
                _ => None,
            })
            .collect()
    }
}

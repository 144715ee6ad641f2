//! I define [`Rule`], a condition (disjunction of conjunctions)
//! and a validated [`Conclusion`].
use std::fmt;

use conclude_api::pattern::Conjunction;
use conclude_api::predicate::Comparator;

use crate::concludable::{Concludable, Has, Relation, ResolvedVar};
use crate::IllegalState;

/// The conclusion of a rule: a single ownership or a single relation.
#[derive(Clone, Debug, PartialEq)]
pub enum Conclusion {
    /// The rule concludes an ownership
    Has(Has),
    /// The rule concludes a relation
    Relation(Relation),
}

impl Conclusion {
    /// The concluded thing and its explicit type, if any:
    /// the relation of a relation conclusion,
    /// or the attribute of an ownership conclusion with an explicit attribute type.
    pub fn isa(&self) -> Option<(&ResolvedVar, &ResolvedVar)> {
        match self {
            Conclusion::Has(has) => Some((has.attribute(), has.attribute_type()?)),
            Conclusion::Relation(rel) => Some((rel.relation(), rel.relation_type()?)),
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conclusion::Has(has) => write!(f, "{has}"),
            Conclusion::Relation(rel) => write!(f, "{rel}"),
        }
    }
}

/// A rule: whenever one of the conjunctions of the condition holds, the conclusion holds.
///
/// The condition and the conclusion share the variable namespace of the rule,
/// distinct from the namespace of any query.
#[derive(Clone, Debug)]
pub struct Rule {
    label: String,
    condition: Vec<Conjunction>,
    then: Conjunction,
    conclusion: Conclusion,
}

impl Rule {
    /// Build a rule, checking that `then` is a valid conclusion.
    ///
    /// A valid conclusion is a single ownership or relation,
    /// possibly with the type of the concluded relation or attribute.
    /// A concluded relation must be typed, and all its roles must be specified.
    /// A concluded attribute may only have a single constant value.
    pub fn new<L: Into<String>>(
        label: L,
        condition: Vec<Conjunction>,
        then: Conjunction,
    ) -> Result<Self, IllegalState> {
        let label = label.into();
        if condition.is_empty() {
            return Err(IllegalState::EmptyCondition(label));
        }
        let invalid = |reason: String| {
            log::warn!("invalid conclusion for rule '{label}': {reason}");
            IllegalState::InvalidRuleConclusion {
                rule: label.clone(),
                reason,
            }
        };
        let mut concludables = Concludable::create(&then)?;
        if concludables.len() != 1 {
            return Err(invalid(format!(
                "expected a single ownership or relation, found {} concludables in {then}",
                concludables.len()
            )));
        }
        let conclusion = match concludables.pop() {
            Some(Concludable::Has(has)) => {
                if has.values().len() > 1
                    || has
                        .values()
                        .iter()
                        .any(|p| !p.is_constant() || p.comparator() != Comparator::Eq)
                {
                    return Err(invalid(format!(
                        "the concluded attribute {} must have at most one constant value",
                        has.attribute().var()
                    )));
                }
                Conclusion::Has(has)
            }
            Some(Concludable::Relation(rel)) => {
                if rel.relation_type().is_none() {
                    return Err(invalid(format!(
                        "the concluded relation {} must be typed",
                        rel.relation().var()
                    )));
                }
                if let Some(rp) = rel.players().iter().find(|rp| rp.role().is_none()) {
                    return Err(invalid(format!(
                        "the role of {} must be specified",
                        rp.player().var()
                    )));
                }
                Conclusion::Relation(rel)
            }
            Some(other) => {
                return Err(invalid(format!(
                    "'{other}' is neither an ownership nor a relation"
                )))
            }
            None => return Err(invalid("empty conclusion".into())),
        };
        Ok(Rule {
            label,
            condition,
            then,
            conclusion,
        })
    }

    /// The label of this rule.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The condition of this rule, as a disjunction of conjunctions.
    pub fn condition(&self) -> &[Conjunction] {
        &self.condition
    }

    /// The conclusion of this rule, as written.
    pub fn then(&self) -> &Conjunction {
        &self.then
    }

    /// The conclusion of this rule.
    pub fn conclusion(&self) -> &Conclusion {
        &self.conclusion
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {}: when {{", self.label)?;
        for (i, conjunction) in self.condition.iter().enumerate() {
            if i > 0 {
                write!(f, " or")?;
            }
            write!(f, " {conjunction}")?;
        }
        write!(f, " }} then {}", self.then)
    }
}

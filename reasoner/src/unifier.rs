//! I define [`Unifier`], the correspondence between the variables of a query [`Concludable`]
//! and the variables of a rule conclusion, produced by [`Concludable::unify`].
//!
//! A unifier is used in both directions:
//! * [`Unifier::unify_answer`] maps a (partial) answer of the query into the variables of the rule,
//! * [`Unifier::un_unify`] maps an answer of the rule back into answers of the query.
//!
//! [`Concludable`]: crate::concludable::Concludable
//! [`Concludable::unify`]: crate::concludable::Concludable::unify
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use conclude_api::answer::ConceptMap;
use conclude_api::concept::Concept;
use conclude_api::label::Label;
use conclude_api::predicate::ValuePredicate;
use conclude_api::variable::Variable;

mod _un_unify;
pub use _un_unify::Projections;

/// Constraints that the concepts bound to some variables must satisfy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Requirements {
    types: BTreeMap<Variable, BTreeSet<Label>>,
    isa_explicit: BTreeMap<Variable, BTreeSet<Label>>,
    predicates: BTreeMap<Variable, Vec<ValuePredicate>>,
}

impl Requirements {
    /// The labels allowed for the type bound to `var`, if constrained.
    pub fn types(&self, var: &Variable) -> Option<&BTreeSet<Label>> {
        self.types.get(var)
    }

    /// The labels allowed for the type of the instance bound to `var`, if constrained.
    pub fn isa_explicit(&self, var: &Variable) -> Option<&BTreeSet<Label>> {
        self.isa_explicit.get(var)
    }

    /// The predicates that the value bound to `var` must satisfy.
    pub fn predicates(&self, var: &Variable) -> &[ValuePredicate] {
        self.predicates.get(var).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether no variable is constrained.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.isa_explicit.is_empty() && self.predicates.is_empty()
    }

    /// Whether `concept`, bound to `var`, satisfies every requirement on `var`.
    pub fn satisfied_by(&self, var: &Variable, concept: &Concept) -> bool {
        if let Some(labels) = self.types(var) {
            match concept {
                Concept::Type(label) if labels.contains(label) => {}
                _ => return false,
            }
        }
        if let Some(labels) = self.isa_explicit(var) {
            match concept {
                Concept::Thing(thing) if labels.contains(thing.type_label()) => {}
                _ => return false,
            }
        }
        let predicates = self.predicates(var);
        if !predicates.is_empty() {
            let Some(value) = concept.as_thing().and_then(|t| t.value()) else {
                return false;
            };
            return predicates.iter().all(|p| p.test(value));
        }
        true
    }

    /// Repeated requirements on the same variable are intersected.
    fn require_types(&mut self, var: &Variable, labels: BTreeSet<Label>) {
        require_labels(&mut self.types, var, labels)
    }

    fn require_isa_explicit(&mut self, var: &Variable, labels: BTreeSet<Label>) {
        require_labels(&mut self.isa_explicit, var, labels)
    }

    fn require_predicates<I>(&mut self, var: &Variable, predicates: I)
    where
        I: IntoIterator<Item = ValuePredicate>,
    {
        let mut predicates = predicates.into_iter().peekable();
        if predicates.peek().is_none() {
            return;
        }
        let known = self.predicates.entry(var.clone()).or_default();
        for p in predicates {
            if !known.contains(&p) {
                known.push(p);
            }
        }
    }
}

fn require_labels(
    table: &mut BTreeMap<Variable, BTreeSet<Label>>,
    var: &Variable,
    labels: BTreeSet<Label>,
) {
    match table.get_mut(var) {
        Some(known) => known.retain(|l| labels.contains(l)),
        None => {
            table.insert(var.clone(), labels);
        }
    }
}

/// Concepts already known for some query variables, supplied to [`Unifier::un_unify`].
///
/// Fixing a variable here restricts the answers produced for it to that single concept.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstanceRequirements(ConceptMap);

impl InstanceRequirements {
    /// No concept known in advance.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The concept known for `var`, if any.
    pub fn get(&self, var: &Variable) -> Option<&Concept> {
        self.0.get(var)
    }

    /// Whether no concept is known.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the known concepts.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Concept)> {
        self.0.iter()
    }
}

impl From<ConceptMap> for InstanceRequirements {
    fn from(concepts: ConceptMap) -> Self {
        InstanceRequirements(concepts)
    }
}

impl FromIterator<(Variable, Concept)> for InstanceRequirements {
    fn from_iter<T: IntoIterator<Item = (Variable, Concept)>>(iter: T) -> Self {
        InstanceRequirements(iter.into_iter().collect())
    }
}

/// A many-to-many correspondence between query variables and rule variables,
/// with the requirements that rule answers must satisfy to be answers of the query.
///
/// The two directions of the mapping have different meanings:
/// * a query variable mapped to several rule variables
///   requires the concepts bound to all of them to be identical;
/// * a rule variable mapped to several query variables
///   binds all of them to the same concept.
///
/// A unifier never has an empty mapping.
#[derive(Clone, Debug, PartialEq)]
pub struct Unifier {
    /// query variable → rule variables
    mapping: BTreeMap<Variable, BTreeSet<Variable>>,
    /// rule variable → query variables
    reverse: BTreeMap<Variable, BTreeSet<Variable>>,
    /// keyed by query variables
    requirements: Requirements,
    /// keyed by rule variables
    unified: Requirements,
}

impl Unifier {
    /// The query → rule direction of the mapping.
    pub fn mapping(&self) -> &BTreeMap<Variable, BTreeSet<Variable>> {
        &self.mapping
    }

    /// The rule → query direction of the mapping.
    pub fn reverse_mapping(&self) -> &BTreeMap<Variable, BTreeSet<Variable>> {
        &self.reverse
    }

    /// The rule variables corresponding to query variable `var`.
    pub fn rule_variables(&self, var: &Variable) -> Option<&BTreeSet<Variable>> {
        self.mapping.get(var)
    }

    /// The query variables corresponding to rule variable `var`.
    pub fn query_variables(&self, var: &Variable) -> Option<&BTreeSet<Variable>> {
        self.reverse.get(var)
    }

    /// The requirements, keyed by query variables.
    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// The requirements, keyed by rule variables.
    pub fn unified_requirements(&self) -> &Requirements {
        &self.unified
    }

    /// Two unifiers with the same key are interchangeable.
    ///
    /// Requirements keyed by query variables, and those copied from them onto rule variables,
    /// follow from the mapping; only the types required directly on rule variables may differ.
    pub(crate) fn key(&self) -> UnifierKey {
        (self.mapping.clone(), self.unified.types.clone())
    }

    /// Map an answer of the query into the variables of the rule.
    ///
    /// Return `None` if the answer violates the requirements,
    /// or binds different concepts to query variables sharing a rule variable.
    /// Otherwise, return the answer in rule variables,
    /// and the [`InstanceRequirements`] to pass to [`Unifier::un_unify`]
    /// along with the answers of the rule.
    ///
    /// Label variables of the rule are constants, and never bound in the result.
    pub fn unify_answer(&self, answer: &ConceptMap) -> Option<(ConceptMap, InstanceRequirements)> {
        let mut bound = BTreeMap::new();
        for (query_var, concept) in answer {
            let Some(rule_vars) = self.mapping.get(query_var) else {
                continue;
            };
            if !self.requirements.satisfied_by(query_var, concept) {
                log::trace!("{query_var} = {concept} violates the requirements of {self}");
                return None;
            }
            for rule_var in rule_vars.iter().filter(|v| v.is_retrievable()) {
                match bound.get(rule_var) {
                    Some(other) if other != concept => {
                        log::trace!("{rule_var} can not be both {other} and {concept}");
                        return None;
                    }
                    Some(_) => {}
                    None => {
                        bound.insert(rule_var.clone(), concept.clone());
                    }
                }
            }
        }
        let instance = answer.filter(|v| self.mapping.contains_key(v));
        Some((bound.into(), instance.into()))
    }
}

impl fmt::Display for Unifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (query_var, rule_vars)) in self.mapping.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {query_var} -> [")?;
            for (j, rule_var) in rule_vars.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{rule_var}")?;
            }
            write!(f, "]")?;
        }
        write!(f, " }}")
    }
}

pub(crate) type UnifierKey = (
    BTreeMap<Variable, BTreeSet<Variable>>,
    BTreeMap<Variable, BTreeSet<Label>>,
);

/// Accumulate the mapping and requirements of a [`Unifier`].
#[derive(Clone, Debug, Default)]
pub(crate) struct UnifierBuilder {
    mapping: BTreeMap<Variable, BTreeSet<Variable>>,
    requirements: Requirements,
    /// keyed by rule variables matched against labels of the query
    rule_requirements: Requirements,
}

impl UnifierBuilder {
    pub fn add(&mut self, query_var: &Variable, rule_var: &Variable) {
        self.mapping
            .entry(query_var.clone())
            .or_default()
            .insert(rule_var.clone());
    }

    pub fn require_types(&mut self, var: &Variable, labels: BTreeSet<Label>) {
        self.requirements.require_types(var, labels);
    }

    /// Constrain a rule variable matched against a label of the query.
    pub fn require_rule_types(&mut self, rule_var: &Variable, labels: BTreeSet<Label>) {
        self.rule_requirements.require_types(rule_var, labels);
    }

    pub fn require_isa_explicit(&mut self, var: &Variable, labels: BTreeSet<Label>) {
        self.requirements.require_isa_explicit(var, labels);
    }

    pub fn require_predicates<I>(&mut self, var: &Variable, predicates: I)
    where
        I: IntoIterator<Item = ValuePredicate>,
    {
        self.requirements.require_predicates(var, predicates);
    }

    /// Return `None` if nothing was mapped.
    pub fn build(self) -> Option<Unifier> {
        if self.mapping.is_empty() {
            return None;
        }
        let mut reverse: BTreeMap<Variable, BTreeSet<Variable>> = BTreeMap::new();
        let mut unified = self.rule_requirements;
        for (query_var, rule_vars) in &self.mapping {
            for rule_var in rule_vars {
                reverse
                    .entry(rule_var.clone())
                    .or_default()
                    .insert(query_var.clone());
                if let Some(labels) = self.requirements.types(query_var) {
                    unified.require_types(rule_var, labels.clone());
                }
                if let Some(labels) = self.requirements.isa_explicit(query_var) {
                    unified.require_isa_explicit(rule_var, labels.clone());
                }
                unified.require_predicates(
                    rule_var,
                    self.requirements.predicates(query_var).iter().cloned(),
                );
            }
        }
        Some(Unifier {
            mapping: self.mapping,
            reverse,
            requirements: self.requirements,
            unified,
        })
    }
}

#[cfg(test)]
mod test;

use std::collections::{BTreeMap, BTreeSet};

use conclude_api::answer::ConceptMap;
use conclude_api::concept::Concept;
use conclude_api::hierarchy::TypeHierarchy;
use conclude_api::label::Label;
use conclude_api::variable::Variable;

use super::*;
use crate::_cartesian::Cartesian;
use crate::{IllegalState, ReasonerError};

impl Unifier {
    /// Map an answer of the rule back into answers of the query.
    ///
    /// The answer is discarded (no projection) if any concept violates the requirements,
    /// or if query variables mapped to several rule variables get different concepts.
    /// Labels of the rule are constants, always bound to their own type.
    ///
    /// Query type variables are then expanded:
    /// * a named type variable bound to a type may stand for any of its supertypes
    ///   (within its `types` requirement);
    /// * a variable whose rule counterpart is unbound may stand for any label of its `types` requirement.
    ///
    /// `instance` fixes some query variables to a known concept,
    /// which collapses their expansion.
    /// The projections are the cartesian product of the expansions,
    /// produced lazily.
    ///
    /// # Errors
    /// * [`ReasonerError::Hierarchy`] if a supertype lookup fails,
    /// * [`IllegalState::UnboundRuleVariable`] if a rule variable is unbound in `concepts`
    ///   while its query counterparts can not be expanded.
    pub fn un_unify<H: TypeHierarchy>(
        &self,
        concepts: &ConceptMap,
        instance: &InstanceRequirements,
        hierarchy: &H,
    ) -> Result<Projections, ReasonerError<H::Error>> {
        for (rule_var, concept) in concepts.iter().filter(|(v, _)| v.is_retrievable()) {
            if !self.unified.satisfied_by(rule_var, concept) {
                log::trace!("{rule_var} = {concept} violates the requirements of {self}");
                return Ok(Projections::empty());
            }
        }
        let mut bound: BTreeMap<&Variable, Concept> = BTreeMap::new();
        let mut open: BTreeMap<&Variable, BTreeSet<Label>> = BTreeMap::new();
        for (rule_var, query_vars) in &self.reverse {
            let concept = match rule_var.as_label() {
                Some(label) => Some(Concept::Type(label.clone())),
                None => concepts.get(rule_var).cloned(),
            };
            match concept {
                Some(concept) => {
                    if !self.unified.satisfied_by(rule_var, &concept) {
                        log::trace!("{rule_var} = {concept} violates the requirements of {self}");
                        return Ok(Projections::empty());
                    }
                    for query_var in query_vars {
                        match bound.get(query_var) {
                            Some(other) if *other != concept => {
                                log::trace!("{query_var} can not be both {other} and {concept}");
                                return Ok(Projections::empty());
                            }
                            Some(_) => {}
                            None => {
                                bound.insert(query_var, concept.clone());
                            }
                        }
                    }
                }
                None => {
                    for query_var in query_vars {
                        let Some(types) = self.requirements.types(query_var) else {
                            log::warn!("{rule_var} is unbound, and {query_var} has no type to expand in {self}");
                            return Err(IllegalState::UnboundRuleVariable(rule_var.clone()).into());
                        };
                        let mut labels = types.clone();
                        if let Some(unified) = self.unified.types(rule_var) {
                            labels.retain(|l| unified.contains(l));
                        }
                        match open.get_mut(query_var) {
                            Some(known) => known.retain(|l| labels.contains(l)),
                            None => {
                                open.insert(query_var, labels);
                            }
                        }
                    }
                }
            }
        }

        let mut candidates: BTreeMap<&Variable, Vec<Concept>> = BTreeMap::new();
        for (query_var, labels) in open {
            let candidate = match bound.remove(query_var) {
                Some(concept) => match &concept {
                    Concept::Type(label) if labels.contains(label) => vec![concept.clone()],
                    _ => {
                        log::trace!("{query_var} = {concept} is outside {labels:?}");
                        return Ok(Projections::empty());
                    }
                },
                None => labels.into_iter().map(Concept::Type).collect(),
            };
            candidates.insert(query_var, candidate);
        }
        for (query_var, concept) in bound {
            let candidate = match &concept {
                Concept::Type(label) if query_var.is_named() => {
                    let mut supertypes = hierarchy
                        .supertypes(label)
                        .map_err(ReasonerError::Hierarchy)?;
                    if let Some(types) = self.requirements.types(query_var) {
                        supertypes.retain(|l| types.contains(l));
                    }
                    supertypes.into_iter().map(Concept::Type).collect()
                }
                _ => vec![concept.clone()],
            };
            candidates.insert(query_var, candidate);
        }

        for (query_var, known) in instance.iter() {
            let Some(candidate) = candidates.get_mut(query_var) else {
                continue;
            };
            if !candidate.contains(known) {
                log::trace!("{query_var} = {known} is not a possible projection");
                return Ok(Projections::empty());
            }
            *candidate = vec![known.clone()];
        }

        let (variables, dimensions): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .map(|(query_var, candidate)| (query_var.clone(), candidate))
            .unzip();
        Ok(Projections {
            variables,
            product: Some(Cartesian::new(dimensions)),
        })
    }
}

/// The answers of a query projected from one answer of a rule,
/// produced by [`Unifier::un_unify`].
pub struct Projections {
    variables: Vec<Variable>,
    product: Option<Cartesian<Concept>>,
}

impl Projections {
    fn empty() -> Self {
        Projections {
            variables: vec![],
            product: None,
        }
    }
}

impl Iterator for Projections {
    type Item = ConceptMap;

    fn next(&mut self) -> Option<Self::Item> {
        let concepts = self.product.as_mut()?.next()?;
        Some(self.variables.iter().cloned().zip(concepts).collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.product {
            Some(product) => product.size_hint(),
            None => (0, Some(0)),
        }
    }
}

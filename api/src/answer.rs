//! I define [`ConceptMap`], the answers exchanged with the rule evaluator.
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use crate::concept::Concept;
use crate::variable::Variable;

/// An immutable mapping from variables to the concepts bound to them.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ConceptMap(BTreeMap<Variable, Concept>);

impl ConceptMap {
    /// An empty answer.
    pub fn new() -> Self {
        ConceptMap(BTreeMap::new())
    }

    /// The concept bound to `var`, if any.
    pub fn get(&self, var: &Variable) -> Option<&Concept> {
        self.0.get(var)
    }

    /// Whether `var` is bound in this answer.
    pub fn contains(&self, var: &Variable) -> bool {
        self.0.contains_key(var)
    }

    /// The number of bound variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the bindings of this answer, in variable order.
    pub fn iter(&self) -> btree_map::Iter<'_, Variable, Concept> {
        self.0.iter()
    }

    /// Iterate over the bound variables, in order.
    pub fn variables(&self) -> btree_map::Keys<'_, Variable, Concept> {
        self.0.keys()
    }

    /// The restriction of this answer to the variables satisfying `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> ConceptMap
    where
        F: FnMut(&Variable) -> bool,
    {
        self.0
            .iter()
            .filter(|(var, _)| predicate(var))
            .map(|(var, concept)| (var.clone(), concept.clone()))
            .collect()
    }
}

impl FromIterator<(Variable, Concept)> for ConceptMap {
    fn from_iter<T: IntoIterator<Item = (Variable, Concept)>>(iter: T) -> Self {
        ConceptMap(iter.into_iter().collect())
    }
}

impl From<BTreeMap<Variable, Concept>> for ConceptMap {
    fn from(map: BTreeMap<Variable, Concept>) -> Self {
        ConceptMap(map)
    }
}

impl IntoIterator for ConceptMap {
    type Item = (Variable, Concept);
    type IntoIter = btree_map::IntoIter<Variable, Concept>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConceptMap {
    type Item = (&'a Variable, &'a Concept);
    type IntoIter = btree_map::Iter<'a, Variable, Concept>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ConceptMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, concept)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var}: {concept}")?;
        }
        write!(f, "}}")
    }
}

//! Prelude re-exporting the most commonly used types and traits.

pub use crate::answer::ConceptMap;
pub use crate::concept::{Concept, Iid, Thing, Value, ValueType};
pub use crate::hierarchy::TypeHierarchy;
pub use crate::label::Label;
pub use crate::pattern::{Conjunction, Constraint, RolePlayer};
pub use crate::predicate::{Comparator, Operand, ValuePredicate};
pub use crate::variable::Variable;

use conclude_api::variable::Variable;
use thiserror::Error;

/// A broken internal invariant.
///
/// These errors never denote a mismatch between a query and a rule
/// (mismatches are represented by empty sequences),
/// but a defect upstream or in the engine itself.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum IllegalState {
    /// A constraint can not be classified into any kind of concludable.
    #[error("Illegal state: the constraint '{0}' can not be classified as a concludable")]
    UnclassifiableConstraint(String),
    /// The conclusion of a rule is not a single `has` or relation pattern.
    #[error("Illegal state: the conclusion of rule '{rule}' is invalid: {reason}")]
    InvalidRuleConclusion {
        /// The label of the rule.
        rule: String,
        /// What is wrong with its conclusion.
        reason: String,
    },
    /// A rule must have at least one condition.
    #[error("Illegal state: rule '{0}' has no condition")]
    EmptyCondition(String),
    /// A unifier maps a rule variable which is bound neither in the answer
    /// nor by a type requirement.
    #[error("Illegal state: the rule variable {0} is unbound and can not be expanded")]
    UnboundRuleVariable(Variable),
}

/// Error raised by unification.
#[derive(Debug, Error)]
pub enum ReasonerError<E: std::error::Error + Send + Sync + 'static> {
    /// The type hierarchy raised an error during unification
    #[error("Error from type hierarchy: {0}")]
    Hierarchy(#[source] E),
    /// An internal invariant was violated
    #[error(transparent)]
    IllegalState(#[from] IllegalState),
}

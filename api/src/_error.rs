use thiserror::Error;

use crate::variable::{InvalidVarName, Variable};

/// Type alias for `Result` with default error `PatternError`.
///
/// Can be used like `std::result::Result` as well.
pub type Result<T, E = PatternError> = std::result::Result<T, E>;

/// This error is raised when building a pattern fails.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Names of variables must match `[A-Za-z_][A-Za-z0-9_-]*`.
    #[error(transparent)]
    InvalidVarName(#[from] InvalidVarName),
    /// The pattern of a `like` predicate is not a valid regular expression.
    #[error("The given pattern '{pattern}' is not a valid regular expression: {err}")]
    InvalidRegex {
        /// The faulty pattern.
        pattern: String,
        /// What is wrong with `pattern`.
        err: String,
    },
    /// A string predicate (`contains`, `like`) was given a non-string operand.
    #[error("The operand of '{0}' must be a string")]
    NonStringOperand(String),
    /// A variable is used both as a thing and as a type.
    #[error("The variable {0} is used both as a thing and as a type")]
    InconsistentVariable(Variable),
    /// A relation constraint must have at least one role-player.
    #[error("The relation {0} has no role-player")]
    EmptyRelation(Variable),
    /// A label can only stand in a type position.
    #[error("The label {0} is used in the position of a thing")]
    LabelAsThing(Variable),
}

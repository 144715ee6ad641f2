//! I define [`Variable`], which identifies a position in a pattern,
//! and the [`VarName`] wrapper type,
//! which guarantees that the underlying `str` is a valid variable name.
use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::label::Label;

lazy_static! {
    /// Production of variable names.
    ///
    /// # Captures
    ///
    /// This regular expression matches the whole input (`^...$`),
    /// therefore, it can not be used to capture variable names in an arbitrary string.
    static ref VARNAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap();
}

/// This wrapper guarantees that the underlying `str`
/// matches `[A-Za-z_][A-Za-z0-9_-]*`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VarName(Arc<str>);

impl VarName {
    /// Build a `VarName`, checking that `name` is valid.
    pub fn new(name: &str) -> Result<Self, InvalidVarName> {
        if VARNAME.is_match(name) {
            Ok(VarName(name.into()))
        } else {
            Err(InvalidVarName(name.to_string()))
        }
    }

    /// Gets a reference to the underlying &str.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// This error is raised when trying to parse an invalid variable name.
#[derive(Debug, Error)]
#[error("The given variable name '{0}' is not a valid variable name")]
pub struct InvalidVarName(pub String);

/// A position in a pattern.
///
/// Variables are value keys:
/// two variables are the same iff they have the same kind and the same name, number or label.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Variable {
    /// A variable named in the pattern, displayed as `$name`.
    Named(VarName),
    /// A synthetic variable, numbered in pattern order, displayed as `$_N`.
    Anonymous(usize),
    /// A constant type or role label standing in a type position
    /// (`isa employment`, `employment:employee`).
    ///
    /// Label variables take part in unification like any other variable,
    /// but they are bookkeeping only and never appear in answers handed back to the caller.
    Label(Label),
}

impl Variable {
    /// Build a named variable, checking that `name` is valid.
    pub fn named(name: &str) -> Result<Self, InvalidVarName> {
        VarName::new(name).map(Variable::Named)
    }

    /// Build the anonymous variable number `n`.
    pub fn anonymous(n: usize) -> Self {
        Variable::Anonymous(n)
    }

    /// Build a label variable.
    pub fn label<L: Into<Label>>(label: L) -> Self {
        Variable::Label(label.into())
    }

    /// Whether this variable is named.
    pub fn is_named(&self) -> bool {
        matches!(self, Variable::Named(_))
    }

    /// Whether this variable is anonymous.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Variable::Anonymous(_))
    }

    /// The label of this variable, if it is a label variable.
    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Variable::Label(label) => Some(label),
            _ => None,
        }
    }

    /// Whether this variable may be part of an answer handed back to the caller.
    pub fn is_retrievable(&self) -> bool {
        !matches!(self, Variable::Label(_))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Named(name) => write!(f, "${}", name.as_str()),
            Variable::Anonymous(n) => write!(f, "$_{n}"),
            Variable::Label(label) => write!(f, "{label}"),
        }
    }
}

impl From<Label> for Variable {
    fn from(label: Label) -> Self {
        Variable::Label(label)
    }
}

impl From<VarName> for Variable {
    fn from(name: VarName) -> Self {
        Variable::Named(name)
    }
}

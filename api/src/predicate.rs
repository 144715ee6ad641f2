//! I define [`ValuePredicate`], a comparison constraining the value of an attribute.
use std::cmp::Ordering;
use std::fmt;

use regex::Regex;

use crate::concept::Value;
use crate::variable::Variable;
use crate::{PatternError, Result};

/// The comparison performed by a [`ValuePredicate`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Comparator {
    /// `=`
    Eq,
    /// `!=`
    Neq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// Case-insensitive substring
    Contains,
    /// Regular expression search
    Like,
}

impl Comparator {
    /// Whether this comparator only applies to strings.
    pub fn is_string(&self) -> bool {
        matches!(self, Comparator::Contains | Comparator::Like)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparator::Eq => "=",
            Comparator::Neq => "!=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Contains => "contains",
            Comparator::Like => "like",
        };
        f.write_str(symbol)
    }
}

/// The right-hand side of a [`ValuePredicate`].
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// A literal value
    Constant(Value),
    /// The value of another attribute variable
    Variable(Variable),
}

/// A comparison between the value of an attribute and an [`Operand`].
///
/// The regular expression of `like` predicates is compiled once, at construction.
#[derive(Clone, Debug)]
pub struct ValuePredicate {
    comparator: Comparator,
    operand: Operand,
    regex: Option<Regex>,
}

impl ValuePredicate {
    /// Build a predicate, checking that `operand` suits `comparator`.
    pub fn new(comparator: Comparator, operand: Operand) -> Result<Self> {
        let regex = match (&comparator, &operand) {
            (Comparator::Like, Operand::Constant(Value::String(pattern))) => {
                Some(Regex::new(pattern).map_err(|err| PatternError::InvalidRegex {
                    pattern: pattern.to_string(),
                    err: err.to_string(),
                })?)
            }
            (c, Operand::Constant(value)) if c.is_string() && value.as_str().is_none() => {
                return Err(PatternError::NonStringOperand(comparator.to_string()));
            }
            (Comparator::Like, Operand::Variable(_)) => {
                return Err(PatternError::NonStringOperand(comparator.to_string()));
            }
            _ => None,
        };
        Ok(ValuePredicate {
            comparator,
            operand,
            regex,
        })
    }

    /// `= value`
    pub fn equals<V: Into<Value>>(value: V) -> Self {
        Self::constant(Comparator::Eq, value.into())
    }

    /// `!= value`
    pub fn not_equals<V: Into<Value>>(value: V) -> Self {
        Self::constant(Comparator::Neq, value.into())
    }

    /// `> value`
    pub fn gt<V: Into<Value>>(value: V) -> Self {
        Self::constant(Comparator::Gt, value.into())
    }

    /// `>= value`
    pub fn gte<V: Into<Value>>(value: V) -> Self {
        Self::constant(Comparator::Gte, value.into())
    }

    /// `< value`
    pub fn lt<V: Into<Value>>(value: V) -> Self {
        Self::constant(Comparator::Lt, value.into())
    }

    /// `<= value`
    pub fn lte<V: Into<Value>>(value: V) -> Self {
        Self::constant(Comparator::Lte, value.into())
    }

    /// `contains 'txt'`
    pub fn contains(txt: &str) -> Self {
        Self::constant(Comparator::Contains, txt.into())
    }

    /// `like 'pattern'`
    pub fn like(pattern: &str) -> Result<Self> {
        Self::new(Comparator::Like, Operand::Constant(pattern.into()))
    }

    /// A comparison with the value of another variable.
    pub fn with_variable(comparator: Comparator, var: Variable) -> Result<Self> {
        Self::new(comparator, Operand::Variable(var))
    }

    fn constant(comparator: Comparator, value: Value) -> Self {
        ValuePredicate {
            comparator,
            operand: Operand::Constant(value),
            regex: None,
        }
    }

    /// The comparator of this predicate.
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// The operand of this predicate.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Whether the operand of this predicate is a literal value.
    pub fn is_constant(&self) -> bool {
        matches!(self.operand, Operand::Constant(_))
    }

    /// The literal operand of this predicate, if any.
    pub fn constant_value(&self) -> Option<&Value> {
        match &self.operand {
            Operand::Constant(value) => Some(value),
            Operand::Variable(_) => None,
        }
    }

    /// Whether `value` satisfies this predicate.
    ///
    /// Values of incomparable kinds never satisfy a predicate.
    /// Predicates comparing with another variable can not be decided on a single value,
    /// and are always satisfied.
    pub fn test(&self, value: &Value) -> bool {
        let Operand::Constant(operand) = &self.operand else {
            return true;
        };
        match self.comparator {
            Comparator::Eq => value.compare(operand) == Some(Ordering::Equal),
            Comparator::Neq => matches!(
                value.compare(operand),
                Some(Ordering::Less | Ordering::Greater)
            ),
            Comparator::Gt => value.compare(operand) == Some(Ordering::Greater),
            Comparator::Gte => matches!(
                value.compare(operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Comparator::Lt => value.compare(operand) == Some(Ordering::Less),
            Comparator::Lte => matches!(
                value.compare(operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Comparator::Contains => match (value.as_str(), operand.as_str()) {
                (Some(txt), Some(needle)) => txt.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
            Comparator::Like => match (value.as_str(), &self.regex) {
                (Some(txt), Some(regex)) => regex.is_match(txt),
                _ => false,
            },
        }
    }
}

impl PartialEq for ValuePredicate {
    fn eq(&self, other: &Self) -> bool {
        // the regex is derived from the operand
        self.comparator == other.comparator && self.operand == other.operand
    }
}

impl fmt::Display for ValuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Operand::Constant(value) => write!(f, "{} {}", self.comparator, value),
            Operand::Variable(var) => write!(f, "{} {}", self.comparator, var),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case(ValuePredicate::lt(20), Value::from(15), true)]
    #[test_case(ValuePredicate::lt(20), Value::from(25), false)]
    #[test_case(ValuePredicate::lt(20), Value::from(20), false)]
    #[test_case(ValuePredicate::lte(20), Value::from(20), true)]
    #[test_case(ValuePredicate::gt(20), Value::from(25), true)]
    #[test_case(ValuePredicate::gte(20.5), Value::from(20), false)]
    #[test_case(ValuePredicate::equals(20), Value::from(20.0), true)]
    #[test_case(ValuePredicate::not_equals(20), Value::from(21), true)]
    #[test_case(ValuePredicate::equals(20), Value::from("20"), false; "incomparable eq")]
    #[test_case(ValuePredicate::not_equals(20), Value::from("20"), false; "incomparable neq")]
    #[test_case(ValuePredicate::not_equals("john"), Value::from("john"), false)]
    #[test_case(ValuePredicate::not_equals("john"), Value::from("jane"), true)]
    #[test_case(ValuePredicate::contains("van"), Value::from("Vanessa"), true)]
    #[test_case(ValuePredicate::contains("van"), Value::from("Jane"), false)]
    #[test_case(ValuePredicate::contains("van"), Value::from(42), false)]
    fn test_value(predicate: ValuePredicate, value: Value, exp: bool) {
        assert_eq!(predicate.test(&value), exp);
    }

    #[test_case("john@gmail.com", true)]
    #[test_case("john@grakn.net", true)]
    #[test_case("john@gmail.org", false)]
    #[test_case("John@gmail.com", false)]
    fn like(txt: &str, exp: bool) {
        let predicate = ValuePredicate::like(r"^[a-z]+@[a-z]+\.(com|net)$").unwrap();
        assert_eq!(predicate.test(&txt.into()), exp);
    }

    #[test]
    fn invalid_regex() {
        assert!(matches!(
            ValuePredicate::like("[a-z"),
            Err(PatternError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn non_string_operand() {
        assert!(matches!(
            ValuePredicate::new(Comparator::Contains, Operand::Constant(Value::Long(1))),
            Err(PatternError::NonStringOperand(_))
        ));
    }

    #[test]
    fn variable_operand_is_not_constant() {
        let predicate =
            ValuePredicate::with_variable(Comparator::Gt, Variable::named("y").unwrap()).unwrap();
        assert!(!predicate.is_constant());
        assert_eq!(predicate.constant_value(), None);
        assert!(predicate.test(&Value::Long(0)));
        assert_eq!(predicate.to_string(), "> $y");
    }

    #[test]
    fn display() {
        assert_eq!(ValuePredicate::lt(20).to_string(), "< 20");
        assert_eq!(ValuePredicate::not_equals("john").to_string(), "!= 'john'");
    }
}

//! I define [`Concept`], the values bound to variables in answers:
//! either a type (or role), or a [`Thing`], i.e. a data instance.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::label::Label;

/// The identifier of a data instance.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Iid(pub u64);

impl fmt::Display for Iid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// The kinds of values an attribute may hold.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueType {
    /// `true` or `false`
    Boolean,
    /// 64-bit signed integers
    Long,
    /// 64-bit floating point numbers
    Double,
    /// UTF-8 strings
    String,
}

/// The value held by an attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A boolean value
    Boolean(bool),
    /// An integer value
    Long(i64),
    /// A floating point value
    Double(f64),
    /// A string value
    String(Arc<str>),
}

impl Value {
    /// The [`ValueType`] of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Boolean(_) => ValueType::Boolean,
            Value::Long(_) => ValueType::Long,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
        }
    }

    /// The string held by this value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(txt) => Some(txt),
            _ => None,
        }
    }

    /// Compare two values.
    ///
    /// Longs and doubles are comparable with each other;
    /// any other pair of values of different kinds is incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
            (Value::Long(a), Value::Double(b)) => (*a as f64).partial_cmp(b),
            (Value::Double(a), Value::Long(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Double(d) => write!(f, "{d:?}"),
            Value::String(txt) => write!(f, "'{txt}'"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Long(n.into())
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(txt: &str) -> Self {
        Value::String(txt.into())
    }
}

impl From<String> for Value {
    fn from(txt: String) -> Self {
        Value::String(txt.into())
    }
}

/// A data instance: an entity, a relation or an attribute.
///
/// Things are identified by their [`Iid`]:
/// equality, ordering and hashing ignore the type label and value.
#[derive(Clone, Debug)]
pub struct Thing {
    iid: Iid,
    type_label: Label,
    value: Option<Value>,
}

impl Thing {
    /// Build an entity or relation instance.
    pub fn new(iid: Iid, type_label: Label) -> Self {
        Thing {
            iid,
            type_label,
            value: None,
        }
    }

    /// Build an attribute instance.
    pub fn attribute(iid: Iid, type_label: Label, value: Value) -> Self {
        Thing {
            iid,
            type_label,
            value: Some(value),
        }
    }

    /// The identifier of this thing.
    pub fn iid(&self) -> Iid {
        self.iid
    }

    /// The label of the direct type of this thing.
    pub fn type_label(&self) -> &Label {
        &self.type_label
    }

    /// The value of this thing, if it is an attribute.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl PartialEq for Thing {
    fn eq(&self, other: &Self) -> bool {
        self.iid == other.iid
    }
}

impl Eq for Thing {}

impl Hash for Thing {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.iid.hash(state)
    }
}

impl PartialOrd for Thing {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Thing {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iid.cmp(&other.iid)
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} isa {}", self.iid, value, self.type_label),
            None => write!(f, "{} isa {}", self.iid, self.type_label),
        }
    }
}

/// A value bound to a variable in an answer.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Concept {
    /// A type or a role
    Type(Label),
    /// A data instance
    Thing(Thing),
}

impl Concept {
    /// The label of this concept, if it is a type.
    pub fn as_type(&self) -> Option<&Label> {
        match self {
            Concept::Type(label) => Some(label),
            Concept::Thing(_) => None,
        }
    }

    /// This concept as a thing, if it is one.
    pub fn as_thing(&self) -> Option<&Thing> {
        match self {
            Concept::Type(_) => None,
            Concept::Thing(thing) => Some(thing),
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concept::Type(label) => write!(f, "type {label}"),
            Concept::Thing(thing) => thing.fmt(f),
        }
    }
}

impl From<Label> for Concept {
    fn from(label: Label) -> Self {
        Concept::Type(label)
    }
}

impl From<Thing> for Concept {
    fn from(thing: Thing) -> Self {
        Concept::Thing(thing)
    }
}

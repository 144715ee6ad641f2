//! I define [`Label`], the name of a type or of a (relation-scoped) role.
use std::fmt;
use std::sync::Arc;

/// The name of a type, optionally scoped by the relation type owning it.
///
/// Role labels are always scoped (`employment:employee`);
/// labels of entity, relation and attribute types never are.
/// Two labels are equal iff both their scope and their name are equal.
///
/// Labels are ordered by scope first (unscoped labels first), then by name.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Label {
    scope: Option<Arc<str>>,
    name: Arc<str>,
}

impl Label {
    /// Build an unscoped label.
    pub fn new(name: &str) -> Self {
        Label {
            scope: None,
            name: name.into(),
        }
    }

    /// Build a role label, scoped by the relation type `scope`.
    pub fn scoped(scope: &str, name: &str) -> Self {
        Label {
            scope: Some(scope.into()),
            name: name.into(),
        }
    }

    /// The root of all types.
    pub fn thing() -> Self {
        Label::new("thing")
    }

    /// The root of entity types.
    pub fn entity() -> Self {
        Label::new("entity")
    }

    /// The root of relation types.
    pub fn relation() -> Self {
        Label::new("relation")
    }

    /// The root of attribute types.
    pub fn attribute() -> Self {
        Label::new("attribute")
    }

    /// The root of all roles, `relation:role`.
    pub fn role() -> Self {
        Label::scoped("relation", "role")
    }

    /// The unscoped part of this label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The relation type scoping this label, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Whether this label names a role.
    pub fn is_role(&self) -> bool {
        self.scope.is_some()
    }

    /// The full textual form of this label (`scope:name` for roles).
    pub fn scoped_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{}:{}", scope, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// `"employment:employee"` is parsed as a role label, anything else as a plain label.
impl From<&str> for Label {
    fn from(txt: &str) -> Self {
        match txt.split_once(':') {
            Some((scope, name)) => Label::scoped(scope, name),
            None => Label::new(txt),
        }
    }
}

impl From<&Label> for Label {
    fn from(label: &Label) -> Self {
        label.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case("person", None, "person")]
    #[test_case("employment:employee", Some("employment"), "employee")]
    #[test_case("relation:role", Some("relation"), "role")]
    fn parse(txt: &str, scope: Option<&str>, name: &str) {
        let label = Label::from(txt);
        assert_eq!(label.scope(), scope);
        assert_eq!(label.name(), name);
        assert_eq!(label.is_role(), scope.is_some());
        assert_eq!(label.to_string(), txt);
    }

    #[test]
    fn equality_requires_both_components() {
        assert_eq!(Label::scoped("employment", "employee"), "employment:employee".into());
        assert_ne!(Label::scoped("employment", "employee"), Label::new("employee"));
        assert_ne!(
            Label::scoped("employment", "employee"),
            Label::scoped("part-time-employment", "employee")
        );
    }

    #[test]
    fn unscoped_labels_sort_first() {
        let mut labels = vec![Label::role(), Label::thing(), Label::relation()];
        labels.sort();
        assert_eq!(labels, vec![Label::relation(), Label::thing(), Label::role()]);
    }
}

//! I define the [`TypeHierarchy`] trait,
//! through which the unification engine consults the schema.
//!
//! The engine never stores the hierarchy itself:
//! it is injected as a read-only capability,
//! so that any blocking lookup belongs to the implementation.
use std::collections::BTreeSet;
use std::error::Error;

use crate::label::Label;

/// Read-only access to the subtype hierarchy of types and roles.
///
/// All closures are inclusive: a label is its own subtype and supertype.
pub trait TypeHierarchy {
    /// The error raised when a lookup fails (e.g. for an unknown label).
    type Error: Error + Send + Sync + 'static;

    /// All the subtypes of `label`, `label` included.
    fn subtypes(&self, label: &Label) -> Result<BTreeSet<Label>, Self::Error>;

    /// All the supertypes of `label`, `label` included.
    fn supertypes(&self, label: &Label) -> Result<BTreeSet<Label>, Self::Error>;

    /// Whether `sub` is a subtype of `sup` (or equal to it).
    fn is_subtype(&self, sub: &Label, sup: &Label) -> Result<bool, Self::Error> {
        Ok(sub == sup || self.supertypes(sub)?.contains(sup))
    }

    /// All the sub-roles of `role`, `role` included.
    fn role_closure(&self, role: &Label) -> Result<BTreeSet<Label>, Self::Error> {
        self.subtypes(role)
    }
}

impl<T: TypeHierarchy + ?Sized> TypeHierarchy for &T {
    type Error = T::Error;

    fn subtypes(&self, label: &Label) -> Result<BTreeSet<Label>, Self::Error> {
        T::subtypes(*self, label)
    }

    fn supertypes(&self, label: &Label) -> Result<BTreeSet<Label>, Self::Error> {
        T::supertypes(*self, label)
    }

    fn is_subtype(&self, sub: &Label, sup: &Label) -> Result<bool, Self::Error> {
        T::is_subtype(*self, sub, sup)
    }

    fn role_closure(&self, role: &Label) -> Result<BTreeSet<Label>, Self::Error> {
        T::role_closure(*self, role)
    }
}

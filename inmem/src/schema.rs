//! I define [`Schema`], an in-memory type hierarchy.
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use conclude_api::concept::{Concept, Iid, Thing, Value, ValueType};
use conclude_api::hierarchy::TypeHierarchy;
use conclude_api::label::Label;

use crate::{Result, SchemaError};

/// The kinds of types in a [`Schema`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TypeKind {
    /// `thing`, the root of all types
    Thing,
    /// An entity type
    Entity,
    /// A relation type
    Relation,
    /// An attribute type
    Attribute,
    /// A role, scoped by its relation type
    Role,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let txt = match self {
            TypeKind::Thing => "the root type",
            TypeKind::Entity => "an entity type",
            TypeKind::Relation => "a relation type",
            TypeKind::Attribute => "an attribute type",
            TypeKind::Role => "a role",
        };
        f.write_str(txt)
    }
}

#[derive(Clone, Debug)]
struct TypeDef {
    label: Label,
    kind: TypeKind,
    sup: Option<usize>,
    subs: BTreeSet<usize>,
    value_type: Option<ValueType>,
}

/// An in-memory type hierarchy, implementing [`TypeHierarchy`].
///
/// A new schema contains the root types `thing`, `entity`, `relation`, `attribute`,
/// and the root role `relation:role`.
/// Types are then declared top-down with the `define_*` methods.
///
/// A `Schema` also creates typed instances ([`create_thing`](Schema::create_thing),
/// [`create_attribute`](Schema::create_attribute)),
/// numbering them with a shared atomic counter,
/// so that it can be used from several threads.
#[derive(Debug)]
pub struct Schema {
    /// index-to-type
    i2t: Vec<TypeDef>,
    /// label-to-index
    l2i: HashMap<Label, usize>,
    next_iid: AtomicU64,
}

impl Schema {
    /// A schema containing only the root types.
    pub fn new() -> Self {
        let mut schema = Schema {
            i2t: vec![],
            l2i: HashMap::new(),
            next_iid: AtomicU64::new(1),
        };
        let thing = schema.insert(Label::thing(), TypeKind::Thing, None, None);
        schema.insert(Label::entity(), TypeKind::Entity, Some(thing), None);
        schema.insert(Label::relation(), TypeKind::Relation, Some(thing), None);
        schema.insert(Label::attribute(), TypeKind::Attribute, Some(thing), None);
        schema.insert(Label::role(), TypeKind::Role, None, None);
        schema
    }

    /// Declare the entity type `label`, subtype of `sup`.
    pub fn define_entity(&mut self, label: &str, sup: &str) -> Result<&mut Self> {
        self.define(Label::new(label), TypeKind::Entity, &Label::new(sup), None)
    }

    /// Declare the relation type `label`, subtype of `sup`.
    pub fn define_relation(&mut self, label: &str, sup: &str) -> Result<&mut Self> {
        self.define(Label::new(label), TypeKind::Relation, &Label::new(sup), None)
    }

    /// Declare the attribute type `label`, subtype of `sup`, holding values of `value_type`.
    ///
    /// If `sup` has a value type, it must be `value_type`.
    pub fn define_attribute(
        &mut self,
        label: &str,
        sup: &str,
        value_type: ValueType,
    ) -> Result<&mut Self> {
        let sup = Label::new(sup);
        if let Some(&i) = self.l2i.get(&sup) {
            let inherited = self.i2t[i].value_type;
            if inherited.is_some() && inherited != Some(value_type) {
                return Err(SchemaError::ValueTypeMismatch {
                    label: sup,
                    expected: inherited,
                    found: value_type,
                });
            }
        }
        self.define(
            Label::new(label),
            TypeKind::Attribute,
            &sup,
            Some(value_type),
        )
    }

    /// Declare the role `relation:role`.
    ///
    /// If `overridden` is given, the new role is a sub-role of the role with that name
    /// in the closest supertype of `relation` declaring it;
    /// otherwise it is a sub-role of `relation:role`.
    pub fn define_role(
        &mut self,
        relation: &str,
        role: &str,
        overridden: Option<&str>,
    ) -> Result<&mut Self> {
        let relation = Label::new(relation);
        let rel_index = self.index_of_kind(&relation, TypeKind::Relation)?;
        let sup = match overridden {
            None => Label::role(),
            Some(name) => self
                .ancestors(rel_index)
                .skip(1)
                .map(|i| Label::scoped(self.i2t[i].label.name(), name))
                .find(|candidate| self.l2i.contains_key(candidate))
                .ok_or_else(|| SchemaError::UnknownLabel(Label::scoped(relation.name(), name)))?,
        };
        self.define(
            Label::scoped(relation.name(), role),
            TypeKind::Role,
            &sup,
            None,
        )
    }

    /// The kind of the type `label`, if it is defined.
    pub fn kind(&self, label: &Label) -> Option<TypeKind> {
        self.l2i.get(label).map(|&i| self.i2t[i].kind)
    }

    /// The value type of the attribute type `label`, if any.
    pub fn value_type(&self, label: &Label) -> Option<ValueType> {
        self.l2i.get(label).and_then(|&i| self.i2t[i].value_type)
    }

    /// The direct supertype of `label`, if any.
    pub fn direct_supertype(&self, label: &Label) -> Result<Option<&Label>> {
        let i = self.index(label)?;
        Ok(self.i2t[i].sup.map(|j| &self.i2t[j].label))
    }

    /// Resolve `label` to the concept representing that type.
    pub fn get_type(&self, label: &Label) -> Option<Concept> {
        self.l2i
            .get(label)
            .map(|&i| Concept::Type(self.i2t[i].label.clone()))
    }

    /// Create a new instance of the entity or relation type `label`.
    pub fn create_thing<L: Into<Label>>(&self, label: L) -> Result<Concept> {
        let label = label.into();
        let i = self.index(&label)?;
        match self.i2t[i].kind {
            TypeKind::Entity | TypeKind::Relation => {
                let thing = Thing::new(self.fresh_iid(), label);
                log::trace!("created {thing}");
                Ok(Concept::Thing(thing))
            }
            TypeKind::Attribute => Err(SchemaError::KindMismatch {
                label,
                expected: TypeKind::Entity,
            }),
            TypeKind::Thing | TypeKind::Role => Err(SchemaError::KindMismatch {
                label,
                expected: TypeKind::Relation,
            }),
        }
    }

    /// Create a new instance of the attribute type `label`, holding `value`.
    pub fn create_attribute<L, V>(&self, label: L, value: V) -> Result<Concept>
    where
        L: Into<Label>,
        V: Into<Value>,
    {
        let label = label.into();
        let value = value.into();
        let i = self.index_of_kind(&label, TypeKind::Attribute)?;
        let expected = self.i2t[i].value_type;
        if expected != Some(value.value_type()) {
            return Err(SchemaError::ValueTypeMismatch {
                label,
                expected,
                found: value.value_type(),
            });
        }
        let thing = Thing::attribute(self.fresh_iid(), label, value);
        log::trace!("created {thing}");
        Ok(Concept::Thing(thing))
    }

    fn fresh_iid(&self) -> Iid {
        Iid(self.next_iid.fetch_add(1, Ordering::Relaxed))
    }

    fn index(&self, label: &Label) -> Result<usize> {
        self.l2i
            .get(label)
            .copied()
            .ok_or_else(|| SchemaError::UnknownLabel(label.clone()))
    }

    fn index_of_kind(&self, label: &Label, expected: TypeKind) -> Result<usize> {
        let i = self.index(label)?;
        if self.i2t[i].kind == expected {
            Ok(i)
        } else {
            Err(SchemaError::KindMismatch {
                label: label.clone(),
                expected,
            })
        }
    }

    fn define(
        &mut self,
        label: Label,
        kind: TypeKind,
        sup: &Label,
        value_type: Option<ValueType>,
    ) -> Result<&mut Self> {
        if self.l2i.contains_key(&label) {
            return Err(SchemaError::DuplicateLabel(label));
        }
        let sup_index = self.index(sup)?;
        let sup_kind = self.i2t[sup_index].kind;
        if sup_kind != kind && !(sup_kind == TypeKind::Thing && kind != TypeKind::Role) {
            return Err(SchemaError::KindMismatch {
                label: sup.clone(),
                expected: kind,
            });
        }
        log::debug!("defining {label} sub {sup}");
        self.insert(label, kind, Some(sup_index), value_type);
        Ok(self)
    }

    fn insert(
        &mut self,
        label: Label,
        kind: TypeKind,
        sup: Option<usize>,
        value_type: Option<ValueType>,
    ) -> usize {
        let i = self.i2t.len();
        if let Some(j) = sup {
            self.i2t[j].subs.insert(i);
        }
        self.l2i.insert(label.clone(), i);
        self.i2t.push(TypeDef {
            label,
            kind,
            sup,
            subs: BTreeSet::new(),
            value_type,
        });
        i
    }

    /// `i` and its supertypes, from the closest to the root.
    fn ancestors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(i), move |&j| self.i2t[j].sup)
    }

    /// `i` and its subtypes, in depth-first order.
    fn descendants(&self, i: usize) -> Vec<usize> {
        let mut stack = vec![i];
        let mut found = vec![];
        while let Some(j) = stack.pop() {
            found.push(j);
            stack.extend(self.i2t[j].subs.iter().copied());
        }
        found
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::new()
    }
}

impl Clone for Schema {
    fn clone(&self) -> Self {
        Schema {
            i2t: self.i2t.clone(),
            l2i: self.l2i.clone(),
            next_iid: AtomicU64::new(self.next_iid.load(Ordering::Relaxed)),
        }
    }
}

impl TypeHierarchy for Schema {
    type Error = SchemaError;

    fn subtypes(&self, label: &Label) -> Result<BTreeSet<Label>> {
        let i = self.index(label)?;
        Ok(self
            .descendants(i)
            .into_iter()
            .map(|j| self.i2t[j].label.clone())
            .collect())
    }

    fn supertypes(&self, label: &Label) -> Result<BTreeSet<Label>> {
        let i = self.index(label)?;
        Ok(self
            .ancestors(i)
            .map(|j| self.i2t[j].label.clone())
            .collect())
    }

    fn is_subtype(&self, sub: &Label, sup: &Label) -> Result<bool> {
        let i = self.index(sub)?;
        let j = self.index(sup)?;
        Ok(self.ancestors(i).any(|k| k == j))
    }

    fn role_closure(&self, role: &Label) -> Result<BTreeSet<Label>> {
        self.index_of_kind(role, TypeKind::Role)?;
        self.subtypes(role)
    }
}

use std::collections::BTreeSet;

use conclude_api::hierarchy::TypeHierarchy;
use conclude_api::label::Label;
use conclude_api::predicate::{Comparator, ValuePredicate};
use conclude_api::variable::Variable;

use super::*;
use crate::_dedup::{DedupBy, IteratorDedupBy};
use crate::_role_players::RolePlayerMatches;
use crate::rule::Conclusion;
use crate::unifier::{Unifier, UnifierBuilder, UnifierKey};
use crate::ReasonerError;

type Result<T, E> = std::result::Result<T, ReasonerError<E>>;

impl Concludable {
    /// Unify this concludable with the conclusion of a rule.
    ///
    /// Every type lookup is performed here,
    /// so the returned [`Unifiers`] does not borrow `hierarchy`.
    /// No unifier is produced if the conclusion can not produce answers to this concludable.
    ///
    /// Ownerships, attributes and bare type assertions produce at most one unifier.
    /// Relations produce one unifier per distinct assignment
    /// of the query role-players to distinct role-players of the conclusion.
    pub fn unify<H: TypeHierarchy>(
        &self,
        conclusion: &Conclusion,
        hierarchy: &H,
    ) -> Result<Unifiers, H::Error> {
        let unifiers = match (self, conclusion) {
            (Concludable::Has(query), Conclusion::Has(rule)) => {
                Unifiers::single(unify_has(query, rule, hierarchy)?)
            }
            (Concludable::Attribute(query), Conclusion::Has(rule)) => {
                Unifiers::single(unify_attribute(query, rule, hierarchy)?)
            }
            (Concludable::Isa(query), _) => Unifiers::single(unify_isa(query, conclusion, hierarchy)?),
            (Concludable::Relation(query), Conclusion::Relation(rule)) => {
                unify_relation(query, rule, hierarchy)?
            }
            _ => Unifiers::single(None),
        };
        Ok(unifiers)
    }
}

/// The unifiers of a [`Concludable`] with a [`Conclusion`], produced lazily.
pub struct Unifiers(UnifiersInner);

enum UnifiersInner {
    Single(std::option::IntoIter<Unifier>),
    Relation(DedupBy<RelationUnifiers, UnifierKey, fn(&Unifier) -> UnifierKey>),
}

impl Unifiers {
    fn single(unifier: Option<Unifier>) -> Self {
        Unifiers(UnifiersInner::Single(unifier.into_iter()))
    }
}

impl Iterator for Unifiers {
    type Item = Unifier;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            UnifiersInner::Single(it) => it.next(),
            UnifiersInner::Relation(it) => it.next(),
        }
    }
}

/// The types that a type variable of the query may stand for.
///
/// A label stands for all its subtypes, a role label for all its sub-roles.
fn query_closure<H: TypeHierarchy>(
    var: &ResolvedVar,
    hierarchy: &H,
) -> Result<Option<BTreeSet<Label>>, H::Error> {
    let closure = match var.var() {
        Variable::Label(label) if label.is_role() => hierarchy.role_closure(label),
        Variable::Label(label) => hierarchy.subtypes(label),
        _ => return Ok(var.types().cloned()),
    };
    closure.map(Some).map_err(ReasonerError::Hierarchy)
}

/// The types that a type variable of a rule conclusion may stand for.
///
/// Conclusions insert instances of exactly the given type, so a label stands for itself only.
fn rule_closure(var: &ResolvedVar) -> Option<BTreeSet<Label>> {
    match var.var() {
        Variable::Label(label) => Some(BTreeSet::from([label.clone()])),
        _ => var.types().cloned(),
    }
}

/// `None` stands for any type.
fn intersects(a: Option<&BTreeSet<Label>>, b: Option<&BTreeSet<Label>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.is_disjoint(b),
        _ => true,
    }
}

/// Map a type variable of the query to one of the rule, if compatible.
fn add_type<H: TypeHierarchy>(
    builder: &mut UnifierBuilder,
    query: &ResolvedVar,
    rule: &ResolvedVar,
    hierarchy: &H,
) -> Result<bool, H::Error> {
    let closure = query_closure(query, hierarchy)?;
    if !intersects(closure.as_ref(), rule_closure(rule).as_ref()) {
        log::trace!("type {} can not unify with {}", query.var(), rule.var());
        return Ok(false);
    }
    map_type(builder, query.var(), rule.var(), closure);
    Ok(true)
}

/// Labels of the query are constants: they are constrained but never mapped.
/// A rule variable matched against a label must stand for a type in its closure.
fn map_type(
    builder: &mut UnifierBuilder,
    query_var: &Variable,
    rule_var: &Variable,
    closure: Option<BTreeSet<Label>>,
) {
    if query_var.is_retrievable() {
        builder.add(query_var, rule_var);
    } else if let Some(closure) = closure.as_ref().filter(|_| rule_var.is_retrievable()) {
        builder.require_rule_types(rule_var, closure.clone());
    }
    if let Some(closure) = closure {
        builder.require_types(query_var, closure);
    }
}

/// Map a thing variable of the query to one of the rule.
///
/// The type of the instance is constrained by the types of the query variable,
/// or failing that by `fallback`.
fn add_thing(
    builder: &mut UnifierBuilder,
    query: &ResolvedVar,
    rule: &ResolvedVar,
    fallback: Option<BTreeSet<Label>>,
) {
    builder.add(query.var(), rule.var());
    if let Some(types) = query.types().cloned().or(fallback) {
        builder.require_isa_explicit(query.var(), types);
    }
}

/// Whether the value concluded by a rule (if any) satisfies the constant predicates of the query.
fn values_compatible(query: &[ValuePredicate], rule: &[ValuePredicate]) -> bool {
    let concluded = rule
        .iter()
        .find(|p| p.comparator() == Comparator::Eq)
        .and_then(ValuePredicate::constant_value);
    match concluded {
        Some(value) => query
            .iter()
            .filter(|p| p.is_constant())
            .all(|p| p.test(value)),
        None => true,
    }
}

fn constants(values: &[ValuePredicate]) -> impl Iterator<Item = ValuePredicate> + '_ {
    values.iter().filter(|p| p.is_constant()).cloned()
}

fn unify_has<H: TypeHierarchy>(
    query: &Has,
    rule: &Has,
    hierarchy: &H,
) -> Result<Option<Unifier>, H::Error> {
    let concluded = concluded_types(rule.attribute_type(), rule.attribute());
    if !intersects(query.owner().types(), rule.owner().types())
        || !intersects(query.attribute().types(), concluded.as_ref())
    {
        log::trace!("incompatible ownerships '{query}' and '{rule}'");
        return Ok(None);
    }
    let mut builder = UnifierBuilder::default();
    let mut closure = None;
    if let Some(query_type) = query.attribute_type() {
        if let Some(rule_type) = rule.attribute_type() {
            if !add_type(&mut builder, query_type, rule_type, hierarchy)? {
                return Ok(None);
            }
        }
        closure = query_closure(query_type, hierarchy)?;
        if !intersects(closure.as_ref(), concluded.as_ref()) {
            log::trace!("'{rule}' can not own an attribute of type {}", query_type.var());
            return Ok(None);
        }
    }
    if !values_compatible(query.values(), rule.values()) {
        log::trace!("'{rule}' concludes a value rejected by '{query}'");
        return Ok(None);
    }
    let fallback = closure.or(concluded);
    add_thing(&mut builder, query.owner(), rule.owner(), None);
    add_thing(&mut builder, query.attribute(), rule.attribute(), fallback);
    builder.require_predicates(query.attribute().var(), constants(query.values()));
    Ok(builder.build())
}

/// The exact type of a concluded thing, or failing that its resolved types.
fn concluded_types(type_var: Option<&ResolvedVar>, thing: &ResolvedVar) -> Option<BTreeSet<Label>> {
    type_var
        .and_then(rule_closure)
        .or_else(|| thing.types().cloned())
}

fn unify_attribute<H: TypeHierarchy>(
    query: &Attribute,
    rule: &Has,
    hierarchy: &H,
) -> Result<Option<Unifier>, H::Error> {
    let Some(rule_type) = rule.attribute_type() else {
        log::trace!("'{rule}' does not conclude a new attribute");
        return Ok(None);
    };
    if !intersects(query.attribute().types(), rule_closure(rule_type).as_ref()) {
        log::trace!("incompatible attributes '{query}' and '{rule}'");
        return Ok(None);
    }
    let mut builder = UnifierBuilder::default();
    let mut closure = None;
    if let Some(query_type) = query.attribute_type() {
        if !add_type(&mut builder, query_type, rule_type, hierarchy)? {
            return Ok(None);
        }
        closure = query_closure(query_type, hierarchy)?;
    }
    if !values_compatible(query.values(), rule.values()) {
        log::trace!("'{rule}' concludes a value rejected by '{query}'");
        return Ok(None);
    }
    let fallback = closure.or_else(|| rule_closure(rule_type));
    add_thing(&mut builder, query.attribute(), rule.attribute(), fallback);
    builder.require_predicates(query.attribute().var(), constants(query.values()));
    Ok(builder.build())
}

fn unify_isa<H: TypeHierarchy>(
    query: &Isa,
    conclusion: &Conclusion,
    hierarchy: &H,
) -> Result<Option<Unifier>, H::Error> {
    let Some((rule_thing, rule_type)) = conclusion.isa() else {
        log::trace!("'{conclusion}' concludes no new instance");
        return Ok(None);
    };
    if !intersects(query.thing().types(), rule_closure(rule_type).as_ref()) {
        log::trace!("incompatible instances '{query}' and '{conclusion}'");
        return Ok(None);
    }
    let mut builder = UnifierBuilder::default();
    if !add_type(&mut builder, query.type_var(), rule_type, hierarchy)? {
        return Ok(None);
    }
    let closure = query_closure(query.type_var(), hierarchy)?;
    add_thing(&mut builder, query.thing(), rule_thing, closure);
    Ok(builder.build())
}

fn unify_relation<H: TypeHierarchy>(
    query: &Relation,
    rule: &Relation,
    hierarchy: &H,
) -> Result<Unifiers, H::Error> {
    let none = || Ok(Unifiers::single(None));
    if query.players().len() > rule.players().len() {
        log::trace!("'{query}' has more role-players than '{rule}'");
        return none();
    }
    let concluded = concluded_types(rule.relation_type(), rule.relation());
    if !intersects(query.relation().types(), concluded.as_ref()) {
        log::trace!("incompatible relations '{query}' and '{rule}'");
        return none();
    }
    let mut base = UnifierBuilder::default();
    let mut closure = None;
    if let Some(query_type) = query.relation_type() {
        if let Some(rule_type) = rule.relation_type() {
            if !add_type(&mut base, query_type, rule_type, hierarchy)? {
                return none();
            }
        }
        closure = query_closure(query_type, hierarchy)?;
    }
    let fallback = closure.or(concluded);
    add_thing(&mut base, query.relation(), rule.relation(), fallback);

    let role_closures = query
        .players()
        .iter()
        .map(|rp| match rp.role() {
            Some(role) => query_closure(role, hierarchy),
            None => Ok(None),
        })
        .collect::<Result<Vec<_>, H::Error>>()?;
    let mut candidates = Vec::with_capacity(query.players().len());
    for (query_rp, role_closure) in query.players().iter().zip(&role_closures) {
        let compatible: Vec<usize> = rule
            .players()
            .iter()
            .enumerate()
            .filter(|(_, rule_rp)| {
                let roles = match (role_closure, rule_rp.role()) {
                    (Some(closure), Some(role)) => {
                        intersects(Some(closure), rule_closure(role).as_ref())
                    }
                    _ => true,
                };
                roles && intersects(query_rp.player().types(), rule_rp.player().types())
            })
            .map(|(j, _)| j)
            .collect();
        if compatible.is_empty() {
            log::trace!(
                "no role-player of '{rule}' is compatible with {}",
                query_rp.player().var()
            );
            return none();
        }
        candidates.push(compatible);
    }
    let same_player = query
        .players()
        .iter()
        .enumerate()
        .map(|(i, rp)| {
            query.players()[..i]
                .iter()
                .enumerate()
                .filter(|(_, other)| other.player().var() == rp.player().var())
                .map(|(k, _)| k)
                .collect()
        })
        .collect();
    let coherent = rule
        .players()
        .iter()
        .map(|rp1| {
            rule.players()
                .iter()
                .map(|rp2| intersects(rp1.player().types(), rp2.player().types()))
                .collect()
        })
        .collect();

    let unifiers = RelationUnifiers {
        base,
        query_players: query.players().to_vec(),
        rule_players: rule.players().to_vec(),
        role_closures,
        matches: RolePlayerMatches::new(candidates, same_player, coherent),
    };
    let key: fn(&Unifier) -> UnifierKey = Unifier::key;
    Ok(Unifiers(UnifiersInner::Relation(
        unifiers.dedup_by_key(key),
    )))
}

/// One unifier per assignment of query role-players to rule role-players.
struct RelationUnifiers {
    /// the mapping of the relation and its type
    base: UnifierBuilder,
    query_players: Vec<ResolvedRolePlayer>,
    rule_players: Vec<ResolvedRolePlayer>,
    /// the closure of each query role, if any
    role_closures: Vec<Option<BTreeSet<Label>>>,
    matches: RolePlayerMatches,
}

impl Iterator for RelationUnifiers {
    type Item = Unifier;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let assignment = self.matches.next()?;
            let mut builder = self.base.clone();
            for (i, j) in assignment.into_iter().enumerate() {
                let query_rp = &self.query_players[i];
                let rule_rp = &self.rule_players[j];
                add_thing(&mut builder, query_rp.player(), rule_rp.player(), None);
                if let (Some(query_role), Some(rule_role)) = (query_rp.role(), rule_rp.role()) {
                    let closure = self.role_closures[i].clone();
                    map_type(&mut builder, query_role.var(), rule_role.var(), closure);
                }
            }
            if let Some(unifier) = builder.build() {
                return Some(unifier);
            }
        }
    }
}

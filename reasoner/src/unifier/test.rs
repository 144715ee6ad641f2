use std::collections::BTreeSet;

use conclude_api::answer::ConceptMap;
use conclude_api::concept::Concept;
use conclude_api::label::Label;
use conclude_api::pattern::Conjunction;
use conclude_api::predicate::ValuePredicate;
use conclude_inmem::SchemaError;
use test_case::test_case;

use super::*;
use crate::test::*;
use crate::{test_setup, IllegalState, ReasonerError};

fn answer<const N: usize>(pairs: [(&str, Concept); N]) -> ConceptMap {
    pairs.into_iter().map(|(var, c)| (v(var), c)).collect()
}

fn type_concept(label: &str) -> Concept {
    Concept::Type(Label::from(label))
}

/// `$r (employment:employee: $y) isa employment`, against a rule concluding the same
fn exact_relation() -> Unifier {
    let query = concludable(
        Conjunction::builder()
            .relation(v("$r"), [rp("employment:employee", "$y")])
            .isa(v("$r"), v("employment"))
            .resolve(v("$y"), ["person", "student", "student-driver"])
            .build()
            .unwrap(),
    );
    let rule = rule(
        "employed",
        relation(&[("employment:employee", "$x")], "employment"),
    );
    let mut unifiers = unify(&query, &rule);
    assert_eq!(unifiers.len(), 1);
    unifiers.pop().unwrap()
}

/// `$x has age $_0; $_0 < 20`, against a rule concluding an age of unknown value
fn younger_than_twenty() -> Unifier {
    let mut builder = Conjunction::builder();
    let age = builder.anonymous();
    let query = concludable(
        builder
            .clone()
            .has(v("$x"), age.clone())
            .isa(age.clone(), v("age"))
            .value(age.clone(), ValuePredicate::lt(20))
            .build()
            .unwrap(),
    );
    let then = builder
        .has(v("$p"), age.clone())
        .isa(age, v("age"))
        .build()
        .unwrap();
    let mut unifiers = unify(&query, &rule("aged", then));
    assert_eq!(unifiers.len(), 1);
    unifiers.pop().unwrap()
}

/// `($p, $p, $q)` against `($x, $x, $y)`, where `$p` plays both `$x` and `$y`
fn partially_reflexive() -> Unifier {
    let query = concludable(relation(
        &[
            ("employment:employee", "$p"),
            ("employment:employer", "$p"),
            ("employment:employee", "$q"),
        ],
        "employment",
    ));
    let rule = rule(
        "two-people-are-employed-one-is-also-the-employer",
        relation(
            &[
                ("employment:employee", "$x"),
                ("employment:employer", "$x"),
                ("employment:employee", "$y"),
            ],
            "employment",
        ),
    );
    unify(&query, &rule)
        .into_iter()
        .find(|u| u.rule_variables(&v("$p")).map(BTreeSet::len) == Some(2))
        .unwrap()
}

/// `$_0 ($role: $x) isa $rel`, against `$_0 (friendship:friend: $y) isa friendship`
fn type_variables(resolved: bool) -> Unifier {
    if resolved {
        resolved_type_variables(
            &["friendship", "relation", "thing"],
            &["friendship:friend", "relation:role"],
        )
    } else {
        resolved_type_variables(&[], &[])
    }
}

/// Same as [`type_variables`], with the given types for `$rel` and `$role` (if not empty).
fn resolved_type_variables(rel_types: &[&str], role_types: &[&str]) -> Unifier {
    let mut builder = Conjunction::builder();
    let rel = builder.anonymous();
    let mut builder = builder
        .relation(rel.clone(), [rp("$role", "$x")])
        .isa(rel, v("$rel"));
    if !rel_types.is_empty() {
        builder = builder.resolve(v("$rel"), rel_types.iter().copied());
    }
    if !role_types.is_empty() {
        builder = builder.resolve(v("$role"), role_types.iter().copied());
    }
    let query = concludable(builder.build().unwrap());
    let rule = rule(
        "friends",
        relation(&[("friendship:friend", "$y")], "friendship"),
    );
    let mut unifiers = unify(&query, &rule);
    assert_eq!(unifiers.len(), 1);
    unifiers.pop().unwrap()
}

/// `$_0 (role: $p) isa employment`, against `$_0 ($employee: $x) isa employment`
/// where `$employee` is either an employee or an employer
fn role_variable(role: &str) -> Unifier {
    let query = concludable(relation(&[(role, "$p")], "employment"));
    let then = {
        let mut builder = Conjunction::builder();
        let rel = builder.anonymous();
        builder
            .relation(rel.clone(), [rp("$employee", "$x")])
            .isa(rel, v("employment"))
            .resolve(v("$employee"), ["employment:employee", "employment:employer"])
            .build()
            .unwrap()
    };
    let mut unifiers = unify(&query, &rule("employed", then));
    assert_eq!(unifiers.len(), 1);
    unifiers.pop().unwrap()
}

fn type_pairs(projections: Projections) -> BTreeSet<(Concept, Concept)> {
    projections
        .map(|cm| {
            (
                cm.get(&v("$rel")).unwrap().clone(),
                cm.get(&v("$role")).unwrap().clone(),
            )
        })
        .collect()
}

// requirements

#[test]
fn empty_builder_builds_nothing() {
    let mut builder = UnifierBuilder::default();
    builder.require_types(&v("$t"), labels(&["person"]));
    assert!(builder.build().is_none());
}

#[test]
fn repeated_requirements_are_intersected() {
    let mut builder = UnifierBuilder::default();
    builder.add(&v("$x"), &v("$y"));
    builder.require_isa_explicit(&v("$x"), labels(&["person", "student"]));
    builder.require_isa_explicit(&v("$x"), labels(&["student", "organisation"]));
    builder.require_predicates(&v("$x"), [ValuePredicate::lt(20)]);
    builder.require_predicates(&v("$x"), [ValuePredicate::lt(20), ValuePredicate::gt(0)]);
    let unifier = builder.build().unwrap();
    let requirements = unifier.requirements();
    assert_eq!(requirements.isa_explicit(&v("$x")), Some(&labels(&["student"])));
    assert_eq!(
        requirements.predicates(&v("$x")),
        &[ValuePredicate::lt(20), ValuePredicate::gt(0)]
    );
    assert_eq!(
        unifier.unified_requirements().isa_explicit(&v("$y")),
        Some(&labels(&["student"]))
    );
    assert_eq!(unifier.query_variables(&v("$y")), Some(&[v("$x")].into()));
}

#[test]
fn requirements_are_checked_against_concepts() {
    let schema = schema();
    let mut builder = UnifierBuilder::default();
    builder.add(&v("$t"), &v("$t"));
    builder.require_types(&v("$t"), labels(&["person", "student"]));
    builder.require_isa_explicit(&v("$x"), labels(&["person", "student"]));
    builder.require_predicates(&v("$a"), [ValuePredicate::lt(20)]);
    let unifier = builder.build().unwrap();
    let requirements = unifier.requirements();

    let person = schema.create_thing("person").unwrap();
    let organisation = schema.create_thing("organisation").unwrap();
    let young = schema.create_attribute("age", 15).unwrap();
    let old = schema.create_attribute("age", 25).unwrap();

    assert!(requirements.satisfied_by(&v("$t"), &type_concept("student")));
    assert!(!requirements.satisfied_by(&v("$t"), &type_concept("entity")));
    assert!(!requirements.satisfied_by(&v("$t"), &person));

    assert!(requirements.satisfied_by(&v("$x"), &person));
    assert!(!requirements.satisfied_by(&v("$x"), &organisation));
    assert!(!requirements.satisfied_by(&v("$x"), &type_concept("person")));

    assert!(requirements.satisfied_by(&v("$a"), &young));
    assert!(!requirements.satisfied_by(&v("$a"), &old));
    assert!(!requirements.satisfied_by(&v("$a"), &person));

    assert!(requirements.satisfied_by(&v("$z"), &organisation));
    assert!(!requirements.is_empty());
    assert!(Requirements::default().is_empty());
}

#[test]
fn display() {
    assert_eq!(exact_relation().to_string(), "{ $r -> [$_0], $y -> [$x] }");
}

// query answers into rule answers

#[test]
fn unify_answer_renames_variables() {
    test_setup();
    let schema = schema();
    let unifier = exact_relation();
    let person = schema.create_thing("student").unwrap();
    let employment = schema.create_thing("part-time-employment").unwrap();
    let query_answer = answer([
        ("$y", person.clone()),
        ("$r", employment.clone()),
        ("$z", person.clone()),
    ]);
    let (rule_answer, instance) = unifier.unify_answer(&query_answer).unwrap();
    assert_eq!(
        rule_answer,
        answer([("$x", person.clone()), ("$_0", employment.clone())])
    );
    assert_eq!(instance.get(&v("$y")), Some(&person));
    assert_eq!(instance.get(&v("$r")), Some(&employment));
    assert_eq!(instance.get(&v("$z")), None);
}

#[test]
fn unify_answer_checks_requirements() {
    test_setup();
    let schema = schema();
    let exact = exact_relation();
    let friendship = schema.create_thing("friendship").unwrap();
    assert!(exact
        .unify_answer(&answer([("$r", friendship)]))
        .is_none());

    let younger = younger_than_twenty();
    let old = schema.create_attribute("age", 25).unwrap();
    let young = schema.create_attribute("age", 15).unwrap();
    assert!(younger.unify_answer(&answer([("$_0", old)])).is_none());
    assert!(younger.unify_answer(&answer([("$_0", young)])).is_some());
}

#[test]
fn unify_answer_rejects_conflicting_bindings() {
    test_setup();
    let schema = schema();
    let unifier = partially_reflexive();
    let a = schema.create_thing("person").unwrap();
    let b = schema.create_thing("person").unwrap();
    assert!(unifier
        .unify_answer(&answer([("$p", a.clone()), ("$q", b)]))
        .is_none());
    let (rule_answer, _) = unifier
        .unify_answer(&answer([("$p", a.clone()), ("$q", a.clone())]))
        .unwrap();
    assert_eq!(rule_answer, answer([("$x", a.clone()), ("$y", a)]));
}

#[test]
fn unify_answer_never_binds_rule_labels() {
    test_setup();
    let unifier = type_variables(false);
    let (rule_answer, instance) = unifier
        .unify_answer(&answer([("$rel", type_concept("friendship"))]))
        .unwrap();
    assert!(rule_answer.is_empty());
    assert_eq!(instance.get(&v("$rel")), Some(&type_concept("friendship")));
}

// rule answers into query answers

#[test]
fn un_unify_exact_relation() {
    test_setup();
    let schema = schema();
    let unifier = exact_relation();
    let person = schema.create_thing("person").unwrap();
    let employment = schema.create_thing("employment").unwrap();
    let projections: Vec<_> = unifier
        .un_unify(
            &answer([("$x", person.clone()), ("$_0", employment.clone())]),
            &InstanceRequirements::empty(),
            &schema,
        )
        .unwrap()
        .collect();
    assert_eq!(projections, vec![answer([("$y", person), ("$r", employment)])]);
}

#[test_case("friendship", "person"; "relation of the wrong type")]
#[test_case("employment", "organisation"; "player of the wrong type")]
fn un_unify_rejects_wrong_types(relation_type: &str, player_type: &str) {
    test_setup();
    let schema = schema();
    let unifier = exact_relation();
    let rule_answer = answer([
        ("$x", schema.create_thing(player_type).unwrap()),
        ("$_0", schema.create_thing(relation_type).unwrap()),
    ]);
    let projections = unifier
        .un_unify(&rule_answer, &InstanceRequirements::empty(), &schema)
        .unwrap();
    assert_eq!(projections.count(), 0);
}

#[test_case(15, 1; "satisfied")]
#[test_case(25, 0; "violated")]
fn un_unify_checks_predicates(age: i64, exp: usize) {
    test_setup();
    let schema = schema();
    let unifier = younger_than_twenty();
    let rule_answer = answer([
        ("$p", schema.create_thing("person").unwrap()),
        ("$_0", schema.create_attribute("age", age).unwrap()),
    ]);
    let projections = unifier
        .un_unify(&rule_answer, &InstanceRequirements::empty(), &schema)
        .unwrap();
    assert_eq!(projections.count(), exp);
}

#[test]
fn un_unify_requires_agreement_of_merged_variables() {
    test_setup();
    let schema = schema();
    let unifier = partially_reflexive();
    let a = schema.create_thing("person").unwrap();
    let b = schema.create_thing("person").unwrap();
    let employment = schema.create_thing("employment").unwrap();

    let same = answer([
        ("$x", a.clone()),
        ("$y", a.clone()),
        ("$_0", employment.clone()),
    ]);
    let projections: Vec<_> = unifier
        .un_unify(&same, &InstanceRequirements::empty(), &schema)
        .unwrap()
        .collect();
    assert_eq!(
        projections,
        vec![answer([
            ("$p", a.clone()),
            ("$q", a.clone()),
            ("$_0", employment.clone())
        ])]
    );

    let different = answer([("$x", a), ("$y", b), ("$_0", employment)]);
    let projections = unifier
        .un_unify(&different, &InstanceRequirements::empty(), &schema)
        .unwrap();
    assert_eq!(projections.count(), 0);
}

#[test]
fn un_unify_expands_bound_types_to_supertypes() {
    test_setup();
    let schema = schema();
    let unifier = type_variables(false);
    let rule_answer = answer([
        ("$y", schema.create_thing("person").unwrap()),
        ("$_0", schema.create_thing("friendship").unwrap()),
        ("friendship", type_concept("friendship")),
        ("friendship:friend", type_concept("friendship:friend")),
    ]);

    let projections = unifier
        .un_unify(&rule_answer, &InstanceRequirements::empty(), &schema)
        .unwrap();
    assert_eq!(projections.size_hint(), (6, Some(6)));
    let pairs = type_pairs(projections);
    let exp: BTreeSet<_> = ["friendship", "relation", "thing"]
        .into_iter()
        .flat_map(|rel| {
            ["friendship:friend", "relation:role"]
                .into_iter()
                .map(move |role| (type_concept(rel), type_concept(role)))
        })
        .collect();
    assert_eq!(pairs, exp);
}

#[test_case(&[("$rel", "friendship")], 2; "relation type known")]
#[test_case(&[("$role", "friendship:friend")], 3; "role known")]
#[test_case(&[("$rel", "relation"), ("$role", "relation:role")], 1; "both known")]
#[test_case(&[("$rel", "entity")], 0; "impossible relation type")]
#[test_case(&[("$other", "entity")], 6; "unrelated variable")]
fn un_unify_honours_instance_requirements(known: &[(&str, &str)], exp: usize) {
    test_setup();
    let schema = schema();
    let unifier = type_variables(false);
    let rule_answer = answer([
        ("$y", schema.create_thing("person").unwrap()),
        ("$_0", schema.create_thing("friendship").unwrap()),
        ("friendship", type_concept("friendship")),
        ("friendship:friend", type_concept("friendship:friend")),
    ]);
    let instance: InstanceRequirements = known
        .iter()
        .map(|&(var, label)| (v(var), type_concept(label)))
        .collect();
    let projections = unifier.un_unify(&rule_answer, &instance, &schema).unwrap();
    assert_eq!(projections.count(), exp);
}

#[test_case(true; "resolved")]
#[test_case(false; "unresolved")]
fn un_unify_binds_rule_labels_to_their_type(resolved: bool) {
    test_setup();
    let schema = schema();
    let unifier = type_variables(resolved);
    let rule_answer = answer([
        ("$y", schema.create_thing("person").unwrap()),
        ("$_0", schema.create_thing("friendship").unwrap()),
    ]);
    let projections = unifier
        .un_unify(&rule_answer, &InstanceRequirements::empty(), &schema)
        .unwrap();
    let pairs = type_pairs(projections);
    assert_eq!(pairs.len(), 6);
    assert!(pairs.contains(&(type_concept("thing"), type_concept("relation:role"))));
}

#[test]
fn un_unify_keeps_rule_labels_within_their_supertypes() {
    test_setup();
    let schema = schema();
    let unifier = resolved_type_variables(
        &["friendship", "employment", "relation", "thing"],
        &["friendship:friend", "employment:employee", "relation:role"],
    );
    let rule_answer = answer([
        ("$y", schema.create_thing("person").unwrap()),
        ("$_0", schema.create_thing("friendship").unwrap()),
    ]);
    let projections = unifier
        .un_unify(&rule_answer, &InstanceRequirements::empty(), &schema)
        .unwrap();
    let rels: BTreeSet<_> = type_pairs(projections)
        .into_iter()
        .map(|(rel, role)| {
            assert_ne!(role, type_concept("employment:employee"));
            rel
        })
        .collect();
    assert_eq!(
        rels,
        ["friendship", "relation", "thing"].into_iter().map(type_concept).collect()
    );
}

#[test_case("employment:employee", 1; "employee")]
#[test_case("employment:employer", 0; "employer")]
fn un_unify_checks_rule_roles_against_query_roles(bound_role: &str, exp: usize) {
    test_setup();
    let schema = schema();
    let unifier = role_variable("employment:employee");
    assert_eq!(
        unifier.unified_requirements().types(&v("$employee")),
        Some(&labels(&[
            "employment:employee",
            "part-time-employment:part-time-employee",
            "part-time-driving:night-shift-driver",
            "part-time-driving:day-shift-driver",
        ]))
    );
    let rule_answer = answer([
        ("$x", schema.create_thing("person").unwrap()),
        ("$_0", schema.create_thing("employment").unwrap()),
        ("$employee", type_concept(bound_role)),
    ]);
    let projections = unifier
        .un_unify(&rule_answer, &InstanceRequirements::empty(), &schema)
        .unwrap();
    assert_eq!(projections.count(), exp);
}

#[test]
fn un_unify_round_trips_unify_answer() {
    test_setup();
    let schema = schema();
    let unifier = type_variables(true);
    let query_answer = answer([
        ("$x", schema.create_thing("student").unwrap()),
        ("$_0", schema.create_thing("friendship").unwrap()),
        ("$rel", type_concept("relation")),
        ("$role", type_concept("friendship:friend")),
    ]);
    let (rule_answer, instance) = unifier.unify_answer(&query_answer).unwrap();
    let projections: Vec<_> = unifier
        .un_unify(&rule_answer, &instance, &schema)
        .unwrap()
        .collect();
    assert_eq!(projections, vec![query_answer]);
}

#[test]
fn un_unify_fails_on_unbound_thing() {
    test_setup();
    let schema = schema();
    let unifier = exact_relation();
    let rule_answer = answer([("$_0", schema.create_thing("employment").unwrap())]);
    let res = unifier.un_unify(&rule_answer, &InstanceRequirements::empty(), &schema);
    assert!(matches!(
        res,
        Err(ReasonerError::IllegalState(IllegalState::UnboundRuleVariable(ref var))) if *var == v("$x")
    ));
}

#[test]
fn un_unify_reports_hierarchy_errors() {
    test_setup();
    let schema = schema();
    let unifier = role_variable("$role");
    let rule_answer = answer([
        ("$x", schema.create_thing("person").unwrap()),
        ("$_0", schema.create_thing("employment").unwrap()),
        ("$employee", type_concept("unknown")),
    ]);
    let res = unifier.un_unify(&rule_answer, &InstanceRequirements::empty(), &schema);
    assert!(matches!(
        res,
        Err(ReasonerError::Hierarchy(SchemaError::UnknownLabel(_)))
    ));
}

#[test]
fn projections_are_lazy() {
    test_setup();
    let schema = schema();
    let unifier = type_variables(false);
    let rule_answer = answer([
        ("$y", schema.create_thing("person").unwrap()),
        ("$_0", schema.create_thing("friendship").unwrap()),
        ("friendship", type_concept("friendship")),
        ("friendship:friend", type_concept("friendship:friend")),
    ]);
    let mut projections = unifier
        .un_unify(&rule_answer, &InstanceRequirements::empty(), &schema)
        .unwrap();
    assert!(projections.next().is_some());
    assert_eq!(projections.size_hint(), (5, Some(5)));
}

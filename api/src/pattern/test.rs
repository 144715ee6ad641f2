use super::*;
use crate::PatternError;

fn var(name: &str) -> Variable {
    Variable::named(name).unwrap()
}

#[test]
fn builder_numbers_anonymous_variables_in_order() {
    let mut builder = Conjunction::builder();
    assert_eq!(builder.anonymous(), Variable::anonymous(0));
    assert_eq!(builder.anonymous(), Variable::anonymous(1));
}

#[test]
fn resolved_types_accumulate() {
    let conjunction = Conjunction::builder()
        .isa(var("x"), Label::new("person"))
        .resolve(var("x"), ["person"])
        .resolve(var("x"), ["student"])
        .build()
        .unwrap();
    let exp: BTreeSet<Label> = ["person", "student"].into_iter().map(Label::from).collect();
    assert_eq!(conjunction.resolved_types(&var("x")), Some(&exp));
    assert_eq!(conjunction.resolved_types(&var("y")), None);
}

#[test]
fn variables_cover_every_position() {
    let conjunction = Conjunction::builder()
        .relation(
            var("r"),
            [
                RolePlayer::new(var("role"), var("x")),
                RolePlayer::untyped(var("y")),
            ],
        )
        .isa(var("r"), var("rel"))
        .build()
        .unwrap();
    let got: Vec<String> = conjunction
        .variables()
        .into_iter()
        .map(Variable::to_string)
        .collect();
    assert_eq!(got, vec!["$r", "$rel", "$role", "$x", "$y"]);
}

#[test]
fn empty_relation_is_rejected() {
    let err = Conjunction::builder()
        .relation(var("r"), [])
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::EmptyRelation(v) if v == var("r")));
}

#[test]
fn label_as_thing_is_rejected() {
    let err = Conjunction::builder()
        .has(var("x"), Variable::label("name"))
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::LabelAsThing(_)));
}

#[test]
fn thing_and_type_variable_is_rejected() {
    let err = Conjunction::builder()
        .isa(var("x"), var("t"))
        .has(var("t"), var("y"))
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::InconsistentVariable(v) if v == var("t")));
}

#[test]
fn display() {
    let conjunction = Conjunction::builder()
        .relation(
            var("r"),
            [RolePlayer::new(Label::from("employment:employee"), var("x"))],
        )
        .isa(var("r"), Label::new("employment"))
        .value(var("a"), ValuePredicate::lt(20))
        .build()
        .unwrap();
    assert_eq!(
        conjunction.to_string(),
        "{ $r (employment:employee: $x); $r isa employment; $a < 20; }"
    );
}

#[test]
fn constraints_on_a_variable() {
    let conjunction = Conjunction::builder()
        .isa(var("x"), Label::new("person"))
        .has(var("x"), var("n"))
        .isa(var("n"), Label::new("name"))
        .build()
        .unwrap();
    assert_eq!(conjunction.constraints_on(&var("x")).count(), 2);
    assert_eq!(conjunction.constraints_on(&var("n")).count(), 1);
}

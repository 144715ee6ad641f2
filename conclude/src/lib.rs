//! This crate aims to provide the core of backward-chaining reasoning
//! over a typed knowledge graph.
//!
//! A *rule* concludes new facts (an ownership, or a relation)
//! whenever its condition holds.
//! To answer a query with rules,
//! the query is first split into [concludables](reasoner::concludable),
//! the fragments that a rule could possibly conclude.
//! Each concludable is then [unified](reasoner::concludable::Concludable::unify)
//! with the conclusion of every rule,
//! producing [unifiers](reasoner::unifier::Unifier):
//! correspondences between the variables of the query and those of the rule,
//! together with the requirements that rule answers must satisfy.
//! Finally, each answer of a rule is [projected back](reasoner::unifier::Unifier::un_unify)
//! into answers of the query.
//!
//! Type lookups go through the [`TypeHierarchy`](api::hierarchy::TypeHierarchy) trait;
//! [`inmem::Schema`] is an in-memory implementation of it.
//!
//! # Getting Started
//!
//! ```
//! use conclude::api::prelude::*;
//! use conclude::inmem::Schema;
//! use conclude::reasoner::concludable::Concludable;
//! use conclude::reasoner::rule::Rule;
//! use conclude::reasoner::unifier::InstanceRequirements;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut schema = Schema::new();
//! schema
//!     .define_entity("person", "entity")?
//!     .define_relation("employment", "relation")?
//!     .define_role("employment", "employee", None)?;
//!
//! // when { $x isa person; } then { (employment:employee: $x) isa employment; }
//! let x = Variable::named("x")?;
//! let when = Conjunction::builder()
//!     .isa(x.clone(), Label::new("person"))
//!     .build()?;
//! let mut builder = Conjunction::builder();
//! let rel = builder.anonymous();
//! let then = builder
//!     .relation(rel.clone(), [RolePlayer::new(Label::from("employment:employee"), x.clone())])
//!     .isa(rel.clone(), Label::new("employment"))
//!     .build()?;
//! let rule = Rule::new("everybody-is-employed", vec![when], then)?;
//!
//! // match { $e ($p) isa employment; }
//! let (e, p) = (Variable::named("e")?, Variable::named("p")?);
//! let query = Conjunction::builder()
//!     .relation(e.clone(), [RolePlayer::untyped(p.clone())])
//!     .isa(e.clone(), Label::new("employment"))
//!     .build()?;
//! let concludables = Concludable::create(&query)?;
//! assert_eq!(concludables.len(), 1);
//!
//! let unifiers: Vec<_> = concludables[0].unify(rule.conclusion(), &schema)?.collect();
//! assert_eq!(unifiers.len(), 1);
//!
//! // an answer of the rule...
//! let alice = schema.create_thing("person")?;
//! let job = schema.create_thing("employment")?;
//! let rule_answer: ConceptMap = [(x, alice.clone()), (rel, job.clone())].into_iter().collect();
//! // ... is an answer of the query
//! let answers: Vec<_> = unifiers[0]
//!     .un_unify(&rule_answer, &InstanceRequirements::empty(), &schema)?
//!     .collect();
//! assert_eq!(answers.len(), 1);
//! assert_eq!(answers[0].get(&p), Some(&alice));
//! assert_eq!(answers[0].get(&e), Some(&job));
//! # Ok(()) }
//! ```
#![deny(missing_docs)]

pub use conclude_api as api;
pub use conclude_inmem as inmem;
pub use conclude_reasoner as reasoner;

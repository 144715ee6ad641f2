//! This crate is part of [Conclude],
//! a typed unification engine for rule-based reasoning.
//!
//! It provides the core of backward-chaining rule resolution:
//! * [`Concludable::create`](concludable::Concludable::create) splits a conjunction
//!   into the fragments that a rule could conclude;
//! * [`Concludable::unify`](concludable::Concludable::unify) lazily enumerates
//!   the [`Unifier`](unifier::Unifier)s between such a fragment and the conclusion of a [`Rule`](rule::Rule);
//! * [`Unifier::un_unify`](unifier::Unifier::un_unify) lazily projects
//!   the answers of the rule back into answers of the query.
//!
//! Type lookups go through a [`TypeHierarchy`](conclude_api::hierarchy::TypeHierarchy)
//! supplied by the caller.
//!
//! [Conclude]: https://docs.rs/conclude/latest/conclude/

#![deny(missing_docs)]

mod _cartesian;
mod _dedup;
mod _error;
mod _role_players;
pub use _error::*;

pub mod applicable;
pub mod concludable;
pub mod rule;
pub mod unifier;


#[cfg(test)]
fn test_setup() {
    TEST_SETUP.call_once(|| {
        env_logger::init();
    });
}

#[cfg(test)]
static TEST_SETUP: std::sync::Once = std::sync::Once::new();

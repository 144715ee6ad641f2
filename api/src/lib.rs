//! This crate is part of [Conclude],
//! a typed unification engine for rule-based reasoning over knowledge graphs.
//!
//! It defines the value model shared by the other crates:
//! [variables](variable) and [labels](label) identifying pattern positions and types,
//! [concepts](concept) and [answers](answer) produced by query evaluation,
//! [value predicates](predicate), resolved [conjunctions](pattern),
//! and the [`TypeHierarchy`](hierarchy::TypeHierarchy) trait,
//! through which the engine consults the schema.
//!
//! [Conclude]: https://docs.rs/conclude/latest/conclude/
#![deny(missing_docs)]

pub mod answer;
pub mod concept;
pub mod hierarchy;
pub mod label;
pub mod pattern;
pub mod predicate;
pub mod variable;

mod _error;
pub use _error::*;

pub mod prelude;

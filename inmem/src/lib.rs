//! This crate is part of [Conclude],
//! a typed unification engine for rule-based reasoning over knowledge graphs.
//!
//! It provides [`Schema`], an in-memory type hierarchy
//! implementing [`TypeHierarchy`](conclude_api::hierarchy::TypeHierarchy),
//! which also acts as a minimal concept manager,
//! able to create typed instances.
//!
//! [Conclude]: https://docs.rs/conclude/latest/conclude/
#![deny(missing_docs)]

mod _error;
pub use _error::*;

pub mod schema;
pub use schema::Schema;

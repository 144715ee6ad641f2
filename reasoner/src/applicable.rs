//! I provide [`applicable_rules`],
//! which selects the rules that may produce answers to a [`Concludable`].
use conclude_api::hierarchy::TypeHierarchy;
use resiter::{Filter, Map};

use crate::concludable::Concludable;
use crate::rule::Rule;
use crate::unifier::Unifier;
use crate::ReasonerError;

/// Iterate over the rules whose conclusion unifies with `concludable`,
/// each with all its unifiers.
///
/// Rules that do not unify are skipped.
/// Errors are yielded in the stream, so the caller may decide to stop or to carry on.
pub fn applicable_rules<'a, H: TypeHierarchy>(
    concludable: &'a Concludable,
    rules: &'a [Rule],
    hierarchy: &'a H,
) -> impl Iterator<Item = Result<(&'a Rule, Vec<Unifier>), ReasonerError<H::Error>>> + 'a {
    rules
        .iter()
        .map(move |rule| {
            concludable
                .unify(rule.conclusion(), hierarchy)
                .map(|unifiers| (rule, unifiers))
        })
        .map_ok(|(rule, unifiers)| (rule, unifiers.collect::<Vec<_>>()))
        .filter_ok(move |(rule, unifiers)| {
            log::debug!(
                "rule '{}' produced {} unifier(s) for '{concludable}'",
                rule.label(),
                unifiers.len()
            );
            !unifiers.is_empty()
        })
}

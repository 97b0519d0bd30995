//! Structural rule lookup.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Host rules carry no stable identifiers, so rules are found by shape: "holds
//! an alternation list", "tests exactly `/\.module\.css$/`", "uses a loader
//! whose path contains `ignore-loader`". Patterns are compared by serialized
//! source because the host rebuilds its rules on every invocation.
//!
//! Absence is an ordinary answer here; callers decide whether it is fatal.

use webpack_rules::{LoaderEntry, Rule};

/// Index of the first rule satisfying `predicate`.
pub fn locate(rules: &[Rule], predicate: impl Fn(&Rule) -> bool) -> Option<usize> {
    rules.iter().position(predicate)
}

/// Index of the first loader whose name contains `needle`.
pub fn locate_loader(chain: &[LoaderEntry], needle: &str) -> Option<usize> {
    chain.iter().position(|entry| entry.is(needle))
}

/// Matches rules holding an alternation list.
pub fn has_alternation(rule: &Rule) -> bool {
    matches!(rule, Rule::Branch(_))
}

/// Matches leaf rules whose single test pattern serializes to `serialized`.
pub fn test_is(serialized: &str) -> impl Fn(&Rule) -> bool + '_ {
    move |rule| rule.test().is_some_and(|test| test.is(serialized))
}

/// Matches leaf rules whose issuer pattern serializes to `serialized`.
pub fn issuer_is(serialized: &str) -> impl Fn(&Rule) -> bool + '_ {
    move |rule| {
        rule.issuer()
            .and_then(|issuer| issuer.as_pattern())
            .is_some_and(|pattern| pattern.is(serialized))
    }
}

/// Matches leaf rules using a loader whose name contains `needle`.
pub fn uses_loader(needle: &str) -> impl Fn(&Rule) -> bool + '_ {
    move |rule| rule.uses().is_some_and(|uses| uses.mentions(needle))
}

//! Widening of neighbouring stylesheet rules to cover `.less`.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Three rules in the alternation list enumerate the stylesheet extensions
//! the host knows about. Each is patched independently; any of them may be
//! missing in a given host version, in which case it is skipped.

use webpack_rules::{Issuer, Pattern, Rule, RuleTest};

use crate::locate::{issuer_is, locate, test_is, uses_loader};

/// Issuer of the asset-URL rule (assets referenced from stylesheets).
pub const ASSET_ISSUER: &str = r"/\.(css|scss|sass)$/";

/// Test of the fallback rule, with and without the host's virtual-module suffix.
pub const FALLBACK_TESTS: [&str; 2] = [
    r"/\.(css|scss|sass)(\.webpack\[javascript\/auto\])?$/",
    r"/\.(css|scss|sass)$/",
];

/// Summary of which neighbouring rules were widened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjacentPatches {
    pub asset_issuer: bool,
    pub fallback_test: bool,
    pub ignore_test: bool,
}

/// Widen all three neighbouring rules to accept `extension`.
pub fn extend_adjacent_rules(one_of: &mut [Rule], extension: &str) -> AdjacentPatches {
    AdjacentPatches {
        asset_issuer: extend_asset_issuer(one_of, extension),
        fallback_test: extend_fallback_test(one_of, extension),
        ignore_test: extend_ignore_test(one_of, extension),
    }
}

/// Let assets referenced from `extension` files go through the asset rule.
pub fn extend_asset_issuer(one_of: &mut [Rule], extension: &str) -> bool {
    let index = locate(one_of, issuer_is(ASSET_ISSUER))
        .or_else(|| locate(one_of, uses_loader("/file-loader/")));
    let Some(leaf) = index.and_then(|index| one_of[index].as_leaf_mut()) else {
        tracing::debug!("No asset-URL rule, skipping");
        return false;
    };

    let current = leaf
        .issuer
        .as_ref()
        .and_then(Issuer::as_pattern)
        .cloned()
        .unwrap_or_else(|| Pattern::new(r"\.(css|scss|sass)$"));
    match current.with_extension(extension) {
        Some(widened) => {
            leaf.issuer = Some(Issuer::Pattern(widened));
            true
        }
        None => false,
    }
}

/// Let the fallback rule catch `extension` files no earlier rule handled.
pub fn extend_fallback_test(one_of: &mut [Rule], extension: &str) -> bool {
    let index = FALLBACK_TESTS
        .iter()
        .find_map(|serialized| locate(one_of, test_is(serialized)));
    let Some(leaf) = index.and_then(|index| one_of[index].as_leaf_mut()) else {
        tracing::debug!("No fallback stylesheet rule, skipping");
        return false;
    };

    let widened = leaf
        .test
        .as_ref()
        .and_then(RuleTest::as_pattern)
        .and_then(|pattern| pattern.with_extension(extension));
    match widened {
        Some(pattern) => {
            leaf.test = Some(RuleTest::One(pattern));
            true
        }
        None => false,
    }
}

/// Make the ignore rule also drop non-module `extension` files.
///
/// The rule's patterns each exclude module files of one language. The
/// pattern with an extension group is widened; without one, a dedicated
/// pattern is added.
pub fn extend_ignore_test(one_of: &mut [Rule], extension: &str) -> bool {
    let Some(leaf) = locate(one_of, uses_loader("ignore-loader"))
        .and_then(|index| one_of[index].as_leaf_mut())
    else {
        tracing::debug!("No ignore rule, skipping");
        return false;
    };

    let mut patterns = leaf
        .test
        .as_ref()
        .map(|test| test.patterns().to_vec())
        .unwrap_or_default();

    let accepts = |pattern: &Pattern| {
        pattern
            .extension_alternatives()
            .is_some_and(|alternatives| alternatives.contains(&extension))
    };
    if patterns.iter().any(accepts) {
        return false;
    }

    match patterns
        .iter()
        .position(|pattern| pattern.extension_alternatives().is_some())
    {
        Some(index) => {
            if let Some(widened) = patterns[index].with_extension(extension) {
                patterns[index] = widened;
            }
        }
        None => patterns.push(Pattern::new(format!(r"(?<!\.module)\.{extension}$"))),
    }

    leaf.test = Some(RuleTest::Any(patterns));
    true
}

//! Insertion of the adapted rule and write-back of the alternation list.
//!
//! Copyright (c) 2025 Posit, PBC

use webpack_rules::{BranchRule, Rule};

/// Insert `rule` right before the rule at `sibling_index`.
///
/// The sibling and everything after it shift down by one, so `rule` is tried
/// first whenever both could match.
pub fn splice_before(one_of: &mut Vec<Rule>, sibling_index: usize, rule: Rule) {
    let index = sibling_index.min(one_of.len());
    one_of.insert(index, rule);
    tracing::debug!(index, "Spliced rule into alternation list");
}

/// Replace the alternation list of the branch rule at `anchor`.
///
/// Returns `false` (and leaves `rules` untouched) when `anchor` is not a branch.
pub fn write_back(rules: &mut [Rule], anchor: usize, one_of: Vec<Rule>) -> bool {
    match rules.get_mut(anchor) {
        Some(Rule::Branch(BranchRule { one_of: target, .. })) => {
            *target = one_of;
            true
        }
        _ => false,
    }
}

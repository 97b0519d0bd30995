//! Caller options for the existing `.module.css` rule.
//!
//! Copyright (c) 2025 Posit, PBC

use webpack_rules::{OptionMap, Rule, Use};

use crate::css_options::merge_css_loader_options;
use crate::locate::{locate, test_is};

/// Serialized test of the CSS module rule.
pub const CSS_MODULE_TEST: &str = r"/\.module\.css$/";

/// Merge the caller's CSS loader options into the `.module.css` rule.
///
/// Returns `false` when the rule or its CSS loader is not present.
pub fn patch_css_module_rule(one_of: &mut [Rule], caller: &OptionMap) -> bool {
    let Some(index) = locate(one_of, test_is(CSS_MODULE_TEST)) else {
        tracing::warn!("No {} rule, CSS loader options not applied", CSS_MODULE_TEST);
        return false;
    };

    let css_loader = one_of[index]
        .as_leaf_mut()
        .and_then(|leaf| leaf.uses.as_mut())
        .and_then(|uses| match uses {
            Use::Chain(chain) => chain.iter_mut().find(|entry| entry.is("css-loader")),
            Use::Entry(entry) if entry.is("css-loader") => Some(entry),
            _ => None,
        });

    match css_loader {
        Some(entry) => {
            merge_css_loader_options(&mut entry.options, caller);
            true
        }
        None => {
            tracing::warn!(index, "CSS module rule has no css-loader");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use webpack_rules::{LeafRule, LoaderEntry, OptionValue, Pattern};

    fn map(value: serde_json::Value) -> OptionMap {
        match OptionValue::from(value) {
            OptionValue::Map(map) => map,
            _ => OptionMap::new(),
        }
    }

    fn css_module_rule() -> Rule {
        LeafRule::new()
            .with_test(Pattern::new(r"\.module\.css$"))
            .with_use(Use::Chain(vec![
                LoaderEntry::new("next-style-loader"),
                LoaderEntry::with_options(
                    "/app/node_modules/css-loader/cjs.js",
                    map(json!({ "importLoaders": 1, "modules": { "mode": "pure" } })),
                ),
            ]))
            .into()
    }

    #[test]
    fn test_patch_merges_caller_options() {
        let mut rules = vec![css_module_rule()];
        let caller = map(json!({ "esModule": false, "modules": { "mode": "local" } }));
        assert!(patch_css_module_rule(&mut rules, &caller));

        let options = &rules[0].uses().and_then(Use::chain).unwrap()[1].options;
        assert_eq!(
            OptionValue::Map(options.clone()).to_json(),
            json!({ "importLoaders": 1, "modules": { "mode": "local" }, "esModule": false })
        );
    }

    #[test]
    fn test_patch_without_rule_is_noop() {
        let mut rules: Vec<Rule> = vec![
            LeafRule::new()
                .with_test(Pattern::new(r"\.css$"))
                .into(),
        ];
        let before = rules.clone();
        assert!(!patch_css_module_rule(&mut rules, &map(json!({ "esModule": false }))));
        assert_eq!(rules, before);
    }
}

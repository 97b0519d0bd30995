//! Derivation of the `.less` rule from the SCSS module rule.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The host ships a fully configured rule for `.module.scss` / `.module.sass`
//! files: style injection, CSS Modules, PostCSS, URL rewriting and the SASS
//! compiler. The `.less` rule starts as a copy of it and is adapted:
//!
//! - the test only matches `.less`
//! - the issuer restriction is dropped; SCSS needs separate module and global
//!   rules told apart by importer, LESS relies on `modules.auto` instead
//! - `sass-loader` becomes `less-loader` (with theme injection)
//! - `resolve-url-loader` is removed, `less-loader` fails with it
//! - the CSS loader gets CSS Modules options computed for LESS

use webpack_rules::{LeafRule, LoaderEntry, OptionMap, OptionValue, Pattern, RuleTest, Use};

use crate::css_options::css_module_options;
use crate::locate::locate_loader;
use crate::options::PluginOptions;
use crate::theme::{LESS_OPTIONS_KEY, inject_theme};

/// Serialized test of the SCSS module rule used as the template.
pub const SASS_MODULE_TEST: &str = r"/\.module\.(scss|sass)$/";

/// Source of the `.less` rule's test.
pub const LESS_TEST_SOURCE: &str = r"\.less$";

/// Loader name of the LESS compiler.
pub const LESS_LOADER: &str = "less-loader";

const SASS_LOADER: &str = "sass-loader";
const RESOLVE_URL_LOADER: &str = "resolve-url-loader";
const CSS_LOADER: &str = "css-loader";

/// Build the `.less` rule from a copy of the SCSS module rule.
///
/// `template` is left untouched.
pub fn adapt_template(template: &LeafRule, plugin: &PluginOptions, dev: bool) -> LeafRule {
    let mut rule = template.clone();
    rule.test = Some(RuleTest::One(Pattern::new(LESS_TEST_SOURCE)));
    rule.issuer = None;

    let mut chain = into_chain(rule.uses.take());

    let compiler = LoaderEntry::with_options(LESS_LOADER, less_loader_options(plugin));
    match locate_loader(&chain, SASS_LOADER) {
        Some(index) => chain[index] = compiler,
        None => {
            tracing::warn!("Template rule has no sass-loader, appending less-loader");
            chain.push(compiler);
        }
    }

    match locate_loader(&chain, RESOLVE_URL_LOADER) {
        Some(index) => {
            chain.remove(index);
        }
        None => tracing::debug!("No resolve-url-loader in template rule"),
    }

    match locate_loader(&chain, CSS_LOADER) {
        Some(index) => {
            let mut css_loader = chain[index].clone();
            css_loader.options = css_module_options(&css_loader.options, plugin, dev);
            chain[index] = css_loader;
        }
        None => tracing::warn!("Template rule has no css-loader, CSS Modules not configured"),
    }

    rule.uses = Some(Use::Chain(chain));
    rule
}

/// Options of the LESS compiler loader.
///
/// `lessOptions.javascriptEnabled` is on unless the caller's `lessOptions`
/// turns it off; every other caller key is copied over as is.
pub fn less_loader_options(plugin: &PluginOptions) -> OptionMap {
    let mut less_options = OptionMap::new();
    less_options.insert("javascriptEnabled".to_string(), OptionValue::Bool(true));
    if let Some(caller) = plugin
        .less_loader_options
        .get(LESS_OPTIONS_KEY)
        .and_then(OptionValue::as_map)
    {
        webpack_rules::overlay(&mut less_options, caller);
    }

    let mut options = OptionMap::new();
    options.insert(LESS_OPTIONS_KEY.to_string(), OptionValue::Map(less_options));
    for (key, value) in &plugin.less_loader_options {
        if key != LESS_OPTIONS_KEY {
            options.insert(key.clone(), value.clone());
        }
    }

    inject_theme(&mut options, plugin);
    options
}

fn into_chain(uses: Option<Use>) -> Vec<LoaderEntry> {
    match uses {
        Some(Use::Chain(chain)) => chain,
        Some(Use::Entry(entry)) => vec![entry],
        Some(Use::Loader(name)) => vec![LoaderEntry::new(name)],
        None => Vec::new(),
    }
}

//! A rule configuration shaped like the one the host generates.

#![allow(dead_code)]

use serde_json::json;
use webpack_rules::{
    BuildTarget, Configuration, ExternalItem, ExternalResolution, ExternalsFn, Issuer, LeafRule,
    LoaderEntry, LocalIdentContext, OptionMap, OptionValue, Pattern, Rule, Use,
};

pub const STYLE_LOADER: &str = "/app/node_modules/next/dist/build/webpack/loaders/next-style-loader/index.js";
pub const CSS_LOADER: &str = "/app/node_modules/next/dist/compiled/css-loader/cjs.js";
pub const POSTCSS_LOADER: &str = "/app/node_modules/next/dist/compiled/postcss-loader/cjs.js";
pub const RESOLVE_URL_LOADER: &str = "/app/node_modules/next/dist/compiled/resolve-url-loader/index.js";
pub const SASS_LOADER: &str = "/app/node_modules/next/dist/compiled/sass-loader/cjs.js";
pub const FILE_LOADER: &str = "/app/node_modules/next/dist/compiled/file-loader/cjs.js";
pub const ERROR_LOADER: &str = "/app/node_modules/next/dist/build/webpack/loaders/error-loader.js";
pub const IGNORE_LOADER: &str = "/app/node_modules/next/dist/compiled/ignore-loader/index.js";

pub fn map(value: serde_json::Value) -> OptionMap {
    match OptionValue::from(value) {
        OptionValue::Map(map) => map,
        other => panic!("expected a map, got {other:?}"),
    }
}

fn host_css_loader(import_loaders: u64) -> LoaderEntry {
    let mut modules = OptionMap::new();
    modules.insert(
        "getLocalIdent".to_string(),
        OptionValue::LocalIdent(std::sync::Arc::new(
            |_: &LocalIdentContext, _: &str, local: &str| format!("host_{local}"),
        )),
    );
    let mut options = map(json!({ "importLoaders": import_loaders, "sourceMap": true }));
    options.insert("modules".to_string(), OptionValue::Map(modules));
    LoaderEntry::with_options(CSS_LOADER, options)
}

fn postcss_loader() -> LoaderEntry {
    LoaderEntry::with_options(POSTCSS_LOADER, map(json!({ "postcssOptions": {} })))
}

fn alternation_list() -> Vec<Rule> {
    let mut sass_issuer = OptionMap::new();
    sass_issuer.insert("and".to_string(), OptionValue::from(json!(["/app"])));
    sass_issuer.insert(
        "not".to_string(),
        OptionValue::Array(vec![OptionValue::Pattern(Pattern::new("node_modules"))]),
    );

    vec![
        LeafRule::new()
            .with_test(Pattern::new(r"\.module\.css$"))
            .with_use(Use::Chain(vec![
                LoaderEntry::new(STYLE_LOADER),
                host_css_loader(1),
                postcss_loader(),
            ]))
            .into(),
        LeafRule::new()
            .with_test(Pattern::new(r"\.module\.(scss|sass)$"))
            .with_issuer(Issuer::Condition(sass_issuer))
            .with_use(Use::Chain(vec![
                LoaderEntry::new(STYLE_LOADER),
                host_css_loader(3),
                postcss_loader(),
                LoaderEntry::with_options(
                    RESOLVE_URL_LOADER,
                    map(json!({ "sourceMap": true })),
                ),
                LoaderEntry::with_options(SASS_LOADER, map(json!({ "sourceMap": true }))),
            ]))
            .into(),
        LeafRule::new()
            .with_test(Pattern::new(r"(?<!\.module)\.css$"))
            .with_use(Use::Chain(vec![
                LoaderEntry::new(STYLE_LOADER),
                LoaderEntry::with_options(CSS_LOADER, map(json!({ "importLoaders": 1 }))),
                postcss_loader(),
            ]))
            .into(),
        LeafRule::new()
            .with_test(Pattern::new(r"(?<!\.module)\.(scss|sass)$"))
            .with_use(Use::Chain(vec![
                LoaderEntry::new(STYLE_LOADER),
                LoaderEntry::with_options(CSS_LOADER, map(json!({ "importLoaders": 3 }))),
                postcss_loader(),
                LoaderEntry::new(RESOLVE_URL_LOADER),
                LoaderEntry::new(SASS_LOADER),
            ]))
            .into(),
        LeafRule::new()
            .with_issuer(Issuer::Pattern(Pattern::new(r"\.(css|scss|sass)$")))
            .with_exclude(Pattern::new(r"\.(js|mjs|jsx|ts|tsx|html|json)$"))
            .with_use(Use::Entry(LoaderEntry::with_options(
                FILE_LOADER,
                map(json!({ "name": "static/media/[name].[hash].[ext]" })),
            )))
            .into(),
        LeafRule::new()
            .with_test(Pattern::new(
                r"\.(css|scss|sass)(\.webpack\[javascript\/auto\])?$",
            ))
            .with_use(Use::Entry(LoaderEntry::with_options(
                ERROR_LOADER,
                map(json!({ "reason": "Global CSS cannot be imported from files other than your Custom <App>." })),
            )))
            .into(),
        LeafRule::new()
            .with_tests(vec![
                Pattern::new(r"(?<!\.module)\.css$"),
                Pattern::new(r"(?<!\.module)\.(scss|sass)$"),
            ])
            .with_use(Use::Loader(IGNORE_LOADER.to_string()))
            .into(),
    ]
}

/// Top-level rules: a script rule, then the alternation-list anchor.
pub fn host_rules() -> Vec<Rule> {
    vec![
        LeafRule::new()
            .with_test(Pattern::new(r"\.(tsx|ts|js|mjs|jsx)$"))
            .with_use(Use::Loader("next-babel-loader".to_string()))
            .into(),
        Rule::branch(alternation_list()),
    ]
}

pub fn client_config(dev: bool) -> Configuration {
    Configuration::new(BuildTarget::Client, dev)
        .with_bundler_version("5.88.2")
        .with_rules(host_rules())
}

/// Server configuration whose externals are a single host function.
pub fn server_config(version: &str) -> Configuration {
    let host_externals = match webpack_rules::BundlerVersion::new(version).externals_convention() {
        webpack_rules::CallConvention::Contextual => ExternalsFn::contextual(|request| {
            host_resolution(&request.request)
        }),
        webpack_rules::CallConvention::Legacy => {
            ExternalsFn::legacy(|_context, request| host_resolution(request))
        }
    };
    Configuration::new(BuildTarget::Server, false)
        .with_bundler_version(version)
        .with_rules(host_rules())
        .with_externals(vec![ExternalItem::Function(host_externals)])
}

/// Host externals: bare package imports are external, everything else is bundled.
pub fn host_resolution(request: &str) -> ExternalResolution {
    if request.starts_with('.') || request.starts_with('/') {
        ExternalResolution::Skip
    } else {
        ExternalResolution::External(format!("commonjs {request}"))
    }
}

/// The alternation list of the anchor rule.
pub fn alternation(config: &Configuration) -> &[Rule] {
    config
        .rules
        .iter()
        .find_map(Rule::one_of)
        .expect("configuration has an alternation list")
}

/// One line per alternation-list rule: its test, or its issuer for rules without one.
pub fn describe_alternation(config: &Configuration) -> String {
    alternation(config)
        .iter()
        .map(|rule| match (rule.test(), rule.issuer()) {
            (Some(test), _) => test.to_string(),
            (None, Some(Issuer::Pattern(pattern))) => format!("issuer {pattern}"),
            _ => "-".to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Position of the rule whose test serializes to `serialized`.
pub fn position_of(config: &Configuration, serialized: &str) -> Option<usize> {
    alternation(config)
        .iter()
        .position(|rule| rule.test().is_some_and(|test| test.is(serialized)))
}

/// The `.less` rule's loader chain.
pub fn less_chain(config: &Configuration) -> Vec<LoaderEntry> {
    let index = position_of(config, r"/\.less$/").expect("a .less rule");
    alternation(config)[index]
        .uses()
        .and_then(Use::chain)
        .map(<[LoaderEntry]>::to_vec)
        .expect("a loader chain")
}

pub fn loader<'a>(chain: &'a [LoaderEntry], needle: &str) -> &'a LoaderEntry {
    chain
        .iter()
        .find(|entry| entry.is(needle))
        .unwrap_or_else(|| panic!("no {needle} in chain"))
}

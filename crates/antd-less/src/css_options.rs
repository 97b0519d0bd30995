//! CSS loader option merging.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Two merges live here. Patching the existing `.module.css` rule is a plain
//! overlay of the caller's options. Building the `.less` rule's CSS loader
//! options layers several sources, lowest to highest precedence:
//!
//! 1. the options cloned from the template rule
//! 2. `sourceMap`, on in development builds
//! 3. the caller's top-level CSS loader options
//! 4. the computed `modules` sub-map:
//!    - `localIdentName`: caller's, else the build-mode default
//!    - the template's own `modules` keys
//!    - `mode: "local"`
//!    - the caller's `modules` keys (so `mode` is caller-overridable)
//!    - `auto: true`, always
//!    - `getLocalIdent`: caller's generator, else the default one

use webpack_rules::{LocalIdentFn, OptionMap, OptionValue, overlay};

use crate::local_ident::{NextLocalIdent, default_local_ident_name, local_ident_fn};
use crate::options::PluginOptions;

/// Overlay the caller's CSS loader options onto existing ones.
///
/// Top-level keys are replaced. When both sides carry a `modules` map the
/// two are merged key by key, caller winning.
pub fn merge_css_loader_options(options: &mut OptionMap, caller: &OptionMap) {
    if caller.is_empty() {
        return;
    }

    let existing_modules = options
        .get("modules")
        .and_then(OptionValue::as_map)
        .cloned();

    overlay(options, caller);

    if let (Some(mut modules), Some(caller_modules)) = (
        existing_modules,
        caller.get("modules").and_then(OptionValue::as_map),
    ) {
        overlay(&mut modules, caller_modules);
        options.insert("modules".to_string(), OptionValue::Map(modules));
    }
}

/// Compute the CSS loader options of the `.less` rule from the template's.
pub fn css_module_options(existing: &OptionMap, plugin: &PluginOptions, dev: bool) -> OptionMap {
    let caller_modules = plugin.css_modules_options();

    let mut options = existing.clone();
    options.insert("sourceMap".to_string(), OptionValue::Bool(dev));
    overlay(&mut options, &plugin.css_loader_options);

    let local_ident_name = caller_modules
        .and_then(|modules| modules.get("localIdentName"))
        .and_then(OptionValue::as_str)
        .unwrap_or_else(|| default_local_ident_name(dev));

    let mut modules = OptionMap::new();
    modules.insert(
        "localIdentName".to_string(),
        OptionValue::from(local_ident_name),
    );
    if let Some(existing_modules) = existing.get("modules").and_then(OptionValue::as_map) {
        overlay(&mut modules, existing_modules);
    }
    modules.insert("mode".to_string(), OptionValue::from("local"));
    if let Some(caller_modules) = caller_modules {
        overlay(&mut modules, caller_modules);
    }
    modules.insert("auto".to_string(), OptionValue::Bool(true));
    modules.insert(
        "getLocalIdent".to_string(),
        OptionValue::LocalIdent(local_ident_generator(plugin, dev)),
    );

    options.insert("modules".to_string(), OptionValue::Map(modules));
    options
}

/// The caller's class-name generator, else the host-convention default.
fn local_ident_generator(plugin: &PluginOptions, dev: bool) -> LocalIdentFn {
    plugin
        .get_local_ident
        .clone()
        .or_else(|| {
            plugin
                .css_modules_options()
                .and_then(|modules| modules.get("getLocalIdent"))
                .and_then(OptionValue::as_local_ident)
                .cloned()
        })
        .unwrap_or_else(|| {
            local_ident_fn(NextLocalIdent::new(
                dev,
                plugin.nextjs.local_ident_name_follow_dev,
            ))
        })
}

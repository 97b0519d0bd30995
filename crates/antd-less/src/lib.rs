//! LESS stylesheet support for a bundler rule configuration.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate patches the host's module rules so that `.less` files get:
//! - CSS Modules scoping (`modules.auto`, scoped class names)
//! - theme variable overrides, static (`modifyVars`) or from a variables file
//! - the same treatment as other stylesheets in the asset, fallback and ignore rules
//! - on the server, UI library stylesheet imports kept out of externals
//!
//! The entry point is [`override_config`]. It mutates the configuration in
//! place and must be called once per configuration object.

mod adjacent;
mod css_module;
mod css_options;
mod error;
mod externals;
mod local_ident;
mod locate;
mod options;
mod plugin;
mod splice;
mod template;
mod theme;

pub use adjacent::{
    ASSET_ISSUER, AdjacentPatches, FALLBACK_TESTS, extend_adjacent_rules, extend_asset_issuer,
    extend_fallback_test, extend_ignore_test,
};
pub use css_module::{CSS_MODULE_TEST, patch_css_module_rule};
pub use css_options::{css_module_options, merge_css_loader_options};
pub use error::{MINIMUM_HOST_VERSION, PluginError};
pub use externals::{
    NULL_LOADER, UI_STYLE_PATTERN, is_ui_style_request, rewrite_server_externals, wrap_externals,
};
pub use local_ident::{
    DEV_LOCAL_IDENT_NAME, LocalIdentGenerator, NextLocalIdent, RELEASE_LOCAL_IDENT_NAME,
    default_local_ident_name, local_ident_fn,
};
pub use locate::{has_alternation, issuer_is, locate, locate_loader, test_is, uses_loader};
pub use options::{NextjsOptions, PluginOptions, PostProcessFn};
pub use plugin::{BuildContext, LESS_EXTENSION, override_config};
pub use splice::{splice_before, write_back};
pub use template::{LESS_LOADER, LESS_TEST_SOURCE, SASS_MODULE_TEST, adapt_template, less_loader_options};
pub use theme::{
    ADDITIONAL_DATA_KEY, ImportPlacement, LESS_OPTIONS_KEY, MODIFY_VARS_KEY, import_vars_file,
    inject_theme, vars_file_import,
};

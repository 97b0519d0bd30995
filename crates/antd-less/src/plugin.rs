//! The patch pipeline.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! One call patches one build target's configuration:
//!
//! 1. find the alternation-list anchor and the SCSS module template (fatal if absent)
//! 2. merge caller options into the `.module.css` rule
//! 3. derive the `.less` rule from the template
//! 4. widen the neighbouring stylesheet rules
//! 5. splice the `.less` rule in before its template and write the list back
//! 6. on the server, reroute the UI library's stylesheet imports
//! 7. run the caller's post-processing hook
//!
//! Steps 2-5 work on a copy of the alternation list; the configuration is
//! only touched once every precondition has been checked.
//!
//! The pipeline must run exactly once per configuration. A second run clones
//! and splices the template again, leaving duplicate `.less` rules behind.

use std::path::PathBuf;

use webpack_rules::{Configuration, Rule};

use crate::adjacent::extend_adjacent_rules;
use crate::css_module::patch_css_module_rule;
use crate::error::{MINIMUM_HOST_VERSION, PluginError};
use crate::externals::rewrite_server_externals;
use crate::locate::{has_alternation, locate, test_is};
use crate::options::PluginOptions;
use crate::splice::{splice_before, write_back};
use crate::template::{SASS_MODULE_TEST, adapt_template};

/// Extension of the stylesheet language being added.
pub const LESS_EXTENSION: &str = "less";

/// What the host knows about the build, passed through to the caller's hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContext {
    /// Project directory
    pub dir: PathBuf,

    /// Identifier of this build
    pub build_id: String,
}

impl BuildContext {
    pub fn new(dir: impl Into<PathBuf>, build_id: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            build_id: build_id.into(),
        }
    }
}

/// Patch `config` in place for LESS support.
///
/// # Errors
///
/// - [`PluginError::UnsupportedHost`] if no top-level rule holds an alternation list
/// - [`PluginError::MissingTemplateRule`] if the alternation list has no SCSS module rule
///
/// In both cases `config` is left unmodified.
pub fn override_config(
    config: &mut Configuration,
    context: &BuildContext,
    plugin: &PluginOptions,
) -> Result<(), PluginError> {
    let unsupported = || PluginError::UnsupportedHost {
        minimum_version: MINIMUM_HOST_VERSION,
    };
    let anchor = locate(&config.rules, has_alternation).ok_or_else(unsupported)?;
    let mut one_of = config.rules[anchor]
        .one_of()
        .map(<[Rule]>::to_vec)
        .ok_or_else(unsupported)?;

    let (template_index, template) = locate(&one_of, test_is(SASS_MODULE_TEST))
        .and_then(|index| one_of[index].as_leaf().map(|leaf| (index, leaf.clone())))
        .ok_or(PluginError::MissingTemplateRule {
            pattern: SASS_MODULE_TEST,
        })?;

    tracing::debug!(anchor, template_index, dev = config.dev, "Patching rules");

    tracing::debug!(step = "css-module", "Running patch step");
    patch_css_module_rule(&mut one_of, &plugin.css_loader_options);

    tracing::debug!(step = "less-rule", "Running patch step");
    let less_rule = adapt_template(&template, plugin, config.dev);

    tracing::debug!(step = "adjacent-rules", "Running patch step");
    let patched = extend_adjacent_rules(&mut one_of, LESS_EXTENSION);
    tracing::debug!(?patched, "Neighbouring rules widened");

    tracing::debug!(step = "splice", "Running patch step");
    splice_before(&mut one_of, template_index, less_rule.into());
    write_back(&mut config.rules, anchor, one_of);

    tracing::debug!(step = "server-externals", "Running patch step");
    rewrite_server_externals(config);

    if let Some(hook) = &plugin.webpack {
        tracing::debug!("Running post-processing hook");
        *config = hook(std::mem::take(config), context);
    }

    Ok(())
}

//! Theme variable injection into the LESS compiler loader.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Two ways to override theme variables:
//!
//! - `modifyVars`: a variable map written into `lessOptions.modifyVars`. It is
//!   read once when the configuration is built, so changes need a restart.
//! - a variables file: an `additionalData` rewrite that imports the file into
//!   every compiled stylesheet. It runs per file, so edits to the variables
//!   file are picked up by incremental rebuilds.
//!
//! Both may be used together.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use webpack_rules::{ContentRewriteFn, OptionMap, OptionValue};

use crate::options::PluginOptions;

/// Key of the compiler's own options inside the loader options.
pub const LESS_OPTIONS_KEY: &str = "lessOptions";

/// Key of the global variable overrides inside `lessOptions`.
pub const MODIFY_VARS_KEY: &str = "modifyVars";

/// Key of the per-file content rewrite in the loader options.
pub const ADDITIONAL_DATA_KEY: &str = "additionalData";

/// Where the variables-file import goes relative to the file content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportPlacement {
    /// Before the content, so the file's own definitions win
    #[default]
    Prepend,

    /// After the content, so the variables file wins
    Append,
}

impl ImportPlacement {
    pub fn from_append_flag(append: bool) -> Self {
        if append {
            ImportPlacement::Append
        } else {
            ImportPlacement::Prepend
        }
    }
}

/// Write the configured theme overrides into the compiler loader options.
pub fn inject_theme(compiler_options: &mut OptionMap, plugin: &PluginOptions) {
    if let Some(vars) = &plugin.modify_vars {
        let less_options = compiler_options
            .entry(LESS_OPTIONS_KEY.to_string())
            .or_insert_with(OptionValue::map);
        if !matches!(less_options, OptionValue::Map(_)) {
            *less_options = OptionValue::map();
        }
        if let Some(less_options) = less_options.as_map_mut() {
            less_options.insert(MODIFY_VARS_KEY.to_string(), OptionValue::Map(vars.clone()));
        }
        tracing::debug!(count = vars.len(), "Injected theme variable overrides");
    }

    if let Some(path) = &plugin.less_vars_file_path {
        let placement =
            ImportPlacement::from_append_flag(plugin.less_vars_file_path_append_to_end_of_content);
        compiler_options.insert(
            ADDITIONAL_DATA_KEY.to_string(),
            OptionValue::ContentRewrite(vars_file_import(path.clone(), placement)),
        );
        tracing::debug!(path = %path.display(), ?placement, "Installed variables file import");
    }
}

/// Build the per-file rewrite importing `path`.
pub fn vars_file_import(path: PathBuf, placement: ImportPlacement) -> ContentRewriteFn {
    Arc::new(move |content: &str| import_vars_file(content, &path, placement))
}

/// Add an import of `path` to `content`.
///
/// `path` is resolved against the current directory and normalized. When it
/// does not exist the content is returned unchanged.
pub fn import_vars_file(content: &str, path: &Path, placement: ImportPlacement) -> String {
    let resolved = match std::path::absolute(path) {
        Ok(absolute) => normalize(&absolute),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "Cannot resolve variables file");
            return content.to_string();
        }
    };

    if !resolved.exists() {
        return content.to_string();
    }

    let import = format!("@import '{}';", resolved.display());
    match placement {
        ImportPlacement::Prepend => format!("{import}\n\n{content}"),
        ImportPlacement::Append => format!("{content}\n\n{import}"),
    }
}

/// Drop `.` and fold `..` into its parent without touching the filesystem.
///
/// `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

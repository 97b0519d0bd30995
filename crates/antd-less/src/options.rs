//! Plugin options.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Options are usually written by users as JSON next to the rest of their
//! build configuration:
//!
//! ```json
//! {
//!   "modifyVars": { "@primary-color": "#04f" },
//!   "lessVarsFilePath": "./styles/variables.less",
//!   "lessVarsFilePathAppendToEndOfContent": false,
//!   "cssLoaderOptions": { "modules": { "localIdentName": "[local]--[hash:base64:6]" } },
//!   "lessLoaderOptions": { "lessOptions": { "math": "always" } },
//!   "nextjs": { "localIdentNameFollowDev": true }
//! }
//! ```
//!
//! Callbacks (a custom class-name generator, a post-processing hook) cannot
//! be expressed in JSON and are set with the builder methods.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use webpack_rules::{Configuration, LocalIdentFn, OptionMap, OptionValue};

use crate::error::PluginError;
use crate::plugin::BuildContext;

/// Post-processing hook run on the fully patched configuration.
pub type PostProcessFn = Arc<dyn Fn(Configuration, &BuildContext) -> Configuration + Send + Sync>;

/// Host-specific switches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NextjsOptions {
    /// Honour `localIdentName` in release builds too, instead of hash-only names
    pub local_ident_name_follow_dev: bool,
}

/// Caller-supplied options for the LESS integration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
    /// Variable overrides baked into the compiler options
    pub modify_vars: Option<OptionMap>,

    /// Variables file imported into every compiled stylesheet
    pub less_vars_file_path: Option<PathBuf>,

    /// Append the variables import instead of prepending it
    pub less_vars_file_path_append_to_end_of_content: bool,

    /// CSS loader options (with an optional `modules` sub-map)
    pub css_loader_options: OptionMap,

    /// Preprocessor loader options
    pub less_loader_options: OptionMap,

    pub nextjs: NextjsOptions,

    /// Class-name generator replacing the default one
    #[serde(skip)]
    pub get_local_ident: Option<LocalIdentFn>,

    /// Hook whose return value becomes the final configuration
    #[serde(skip)]
    pub webpack: Option<PostProcessFn>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            modify_vars: None,
            less_vars_file_path: None,
            less_vars_file_path_append_to_end_of_content: false,
            css_loader_options: default_css_loader_options(),
            less_loader_options: OptionMap::new(),
            nextjs: NextjsOptions::default(),
            get_local_ident: None,
            webpack: None,
        }
    }
}

/// `{ esModule: false, sourceMap: false, modules: { mode: "local" } }`
fn default_css_loader_options() -> OptionMap {
    match OptionValue::from(json!({
        "esModule": false,
        "sourceMap": false,
        "modules": { "mode": "local" }
    })) {
        OptionValue::Map(map) => map,
        _ => OptionMap::new(),
    }
}

impl PluginOptions {
    /// Parse options from JSON text; absent keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PluginError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_modify_vars(mut self, vars: OptionMap) -> Self {
        self.modify_vars = Some(vars);
        self
    }

    pub fn with_less_vars_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.less_vars_file_path = Some(path.into());
        self
    }

    pub fn with_vars_import_appended(mut self, append: bool) -> Self {
        self.less_vars_file_path_append_to_end_of_content = append;
        self
    }

    pub fn with_css_loader_options(mut self, options: OptionMap) -> Self {
        self.css_loader_options = options;
        self
    }

    pub fn with_less_loader_options(mut self, options: OptionMap) -> Self {
        self.less_loader_options = options;
        self
    }

    pub fn with_local_ident_name_follow_dev(mut self, follow: bool) -> Self {
        self.nextjs.local_ident_name_follow_dev = follow;
        self
    }

    pub fn with_local_ident(mut self, f: LocalIdentFn) -> Self {
        self.get_local_ident = Some(f);
        self
    }

    pub fn with_webpack(
        mut self,
        hook: impl Fn(Configuration, &BuildContext) -> Configuration + Send + Sync + 'static,
    ) -> Self {
        self.webpack = Some(Arc::new(hook));
        self
    }

    /// The caller's `modules` sub-map of the CSS loader options, if any.
    pub(crate) fn css_modules_options(&self) -> Option<&OptionMap> {
        self.css_loader_options
            .get("modules")
            .and_then(OptionValue::as_map)
    }
}

impl fmt::Debug for PluginOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginOptions")
            .field("modify_vars", &self.modify_vars)
            .field("less_vars_file_path", &self.less_vars_file_path)
            .field(
                "less_vars_file_path_append_to_end_of_content",
                &self.less_vars_file_path_append_to_end_of_content,
            )
            .field("css_loader_options", &self.css_loader_options)
            .field("less_loader_options", &self.less_loader_options)
            .field("nextjs", &self.nextjs)
            .field("get_local_ident", &self.get_local_ident.is_some())
            .field("webpack", &self.webpack.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_css_loader_options() {
        let options = PluginOptions::default();
        assert_eq!(
            OptionValue::Map(options.css_loader_options.clone()).to_json(),
            json!({ "esModule": false, "sourceMap": false, "modules": { "mode": "local" } })
        );
        assert!(options.modify_vars.is_none());
        assert!(options.less_loader_options.is_empty());
        assert!(!options.less_vars_file_path_append_to_end_of_content);
    }

    #[test]
    fn test_from_json_str_camel_case_keys() {
        let options = PluginOptions::from_json_str(
            r##"{
                "modifyVars": { "@primary-color": "#04f" },
                "lessVarsFilePath": "./styles/variables.less",
                "lessVarsFilePathAppendToEndOfContent": true,
                "nextjs": { "localIdentNameFollowDev": true }
            }"##,
        )
        .unwrap();

        let vars = options.modify_vars.as_ref().unwrap();
        assert_eq!(vars.get("@primary-color").and_then(OptionValue::as_str), Some("#04f"));
        assert_eq!(
            options.less_vars_file_path,
            Some(PathBuf::from("./styles/variables.less"))
        );
        assert!(options.less_vars_file_path_append_to_end_of_content);
        assert!(options.nextjs.local_ident_name_follow_dev);
        // Omitted keys keep the wrapper defaults
        assert_eq!(
            options.css_modules_options().and_then(|m| m.get("mode")),
            Some(&OptionValue::from("local"))
        );
    }

    #[test]
    fn test_explicit_css_loader_options_replace_defaults() {
        let options =
            PluginOptions::from_json_str(r#"{ "cssLoaderOptions": { "esModule": true } }"#).unwrap();
        assert_eq!(options.css_loader_options.len(), 1);
        assert!(options.css_modules_options().is_none());
    }

    #[test]
    fn test_from_json_str_rejects_malformed_input() {
        let err = PluginOptions::from_json_str(r#"{ "modifyVars": 3 }"#).unwrap_err();
        assert!(matches!(err, PluginError::InvalidOptions(_)));
    }

    #[test]
    fn test_builders_match_json_keys() {
        let built = PluginOptions::default()
            .with_less_vars_file("./styles/variables.less")
            .with_vars_import_appended(true)
            .with_local_ident_name_follow_dev(true);
        let parsed = PluginOptions::from_json_str(
            r#"{
                "lessVarsFilePath": "./styles/variables.less",
                "lessVarsFilePathAppendToEndOfContent": true,
                "nextjs": { "localIdentNameFollowDev": true }
            }"#,
        )
        .unwrap();
        assert_eq!(format!("{built:?}"), format!("{parsed:?}"));
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let options = PluginOptions::default().with_webpack(|config, _| config);
        let debug = format!("{:?}", options);
        assert!(debug.contains("webpack: true"));
        assert!(debug.contains("get_local_ident: false"));
    }
}

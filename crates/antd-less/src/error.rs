//! Error types for configuration patching.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

/// Oldest host version whose rule layout carries an alternation list.
pub const MINIMUM_HOST_VERSION: &str = "5.0.0";

/// Errors that can occur while patching a configuration
#[derive(Debug, Error)]
pub enum PluginError {
    /// No top-level rule holds an alternation list
    #[error(
        "This plugin is not compatible with Next.js versions below {minimum_version} https://err.sh/next-plugins/upgrade"
    )]
    UnsupportedHost { minimum_version: &'static str },

    /// The sibling preprocessor's module rule is missing from the alternation list
    #[error("No rule in the alternation list tests {pattern}, the .less rule cannot be derived from it")]
    MissingTemplateRule { pattern: &'static str },

    /// Plugin options could not be parsed
    #[error("Invalid plugin options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

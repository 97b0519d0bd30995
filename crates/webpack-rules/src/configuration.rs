//! The per-build configuration root.
//!
//! Copyright (c) 2025 Posit, PBC

use crate::externals::{CallConvention, ExternalItem};
use crate::rule::Rule;

/// Which bundle a configuration produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildTarget {
    #[default]
    Client,
    Server,
}

/// The host bundler's version string (e.g. `"5.88.2"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundlerVersion(String);

impl BundlerVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// The externals call convention of this bundler generation.
    ///
    /// Generation 5 passes a context object; everything older (and unknown
    /// versions) uses the three-argument form.
    pub fn externals_convention(&self) -> CallConvention {
        if self.0.starts_with('5') {
            CallConvention::Contextual
        } else {
            CallConvention::Legacy
        }
    }
}

/// Configuration for one build target.
///
/// Created by the host per build, patched in place, then handed back.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// Client or server bundle
    pub target: BuildTarget,

    /// Development (`true`) or release build
    pub dev: bool,

    /// Host bundler version
    pub bundler_version: BundlerVersion,

    /// Top-level module rules
    pub rules: Vec<Rule>,

    /// Externals list
    pub externals: Vec<ExternalItem>,
}

impl Configuration {
    pub fn new(target: BuildTarget, dev: bool) -> Self {
        Self {
            target,
            dev,
            ..Default::default()
        }
    }

    pub fn with_bundler_version(mut self, version: impl Into<String>) -> Self {
        self.bundler_version = BundlerVersion::new(version);
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_externals(mut self, externals: Vec<ExternalItem>) -> Self {
        self.externals = externals;
        self
    }

    pub fn is_server(&self) -> bool {
        self.target == BuildTarget::Server
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundler_version_convention() {
        assert_eq!(
            BundlerVersion::new("5.88.2").externals_convention(),
            CallConvention::Contextual
        );
        assert_eq!(
            BundlerVersion::new("4.46.0").externals_convention(),
            CallConvention::Legacy
        );
        assert_eq!(
            BundlerVersion::default().externals_convention(),
            CallConvention::Legacy
        );
    }

    #[test]
    fn test_configuration_builder() {
        let config = Configuration::new(BuildTarget::Server, true).with_bundler_version("5.0.0");
        assert!(config.is_server());
        assert!(config.dev);
        assert!(config.rules.is_empty());
    }
}

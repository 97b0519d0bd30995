//! Typed model of a bundler module-rule configuration tree.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The host tool-chain hands plugins a loosely-shaped configuration object.
//! This crate gives that object a shape:
//! - [`Configuration`]: one build target's rule list, externals and metadata
//! - [`Rule`]: either a branch holding an ordered alternation list or a leaf matcher
//! - [`Use`] / [`LoaderEntry`]: the loader chain of a leaf rule
//! - [`Pattern`]: a path test compared by its serialized `/source/flags` form
//! - [`OptionValue`]: the ordered, JSON-like options tree (which may carry callbacks)
//! - [`ExternalItem`] / [`ExternalsFn`]: externals, in both call conventions

mod configuration;
mod externals;
mod pattern;
mod rule;
mod value;

pub use configuration::{BuildTarget, BundlerVersion, Configuration};
pub use externals::{
    CallConvention, ExternalItem, ExternalRequest, ExternalResolution, ExternalsFn,
};
pub use pattern::Pattern;
pub use rule::{BranchRule, Issuer, LeafRule, LoaderEntry, Rule, RuleTest, Use};
pub use value::{
    ContentRewriteFn, LocalIdentContext, LocalIdentFn, OptionMap, OptionValue, overlay,
};

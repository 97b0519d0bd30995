//! Externals: imports resolved at runtime instead of being bundled.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Hosts describe externals as a list whose items are names, patterns,
//! mappings or functions. Functions come in two call conventions depending
//! on the bundler generation:
//! - legacy: `(context, request, callback)`
//! - contextual: `({ context, request, ... }, callback)`
//!
//! [`ExternalsFn::call`] hides the difference behind one request type.

use std::fmt;
use std::sync::Arc;

use crate::pattern::Pattern;
use crate::value::OptionMap;

/// An import being considered for externalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalRequest {
    /// Directory of the importing module
    pub context: String,

    /// The import specifier as written
    pub request: String,
}

impl ExternalRequest {
    pub fn new(context: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            request: request.into(),
        }
    }
}

/// The answer an externals function gives for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalResolution {
    /// Not an external: the callback was invoked without a value, so the
    /// request is left to the module rules.
    Skip,

    /// Resolve at runtime with this expression (e.g. `commonjs react`)
    External(String),
}

/// Which function signature a bundler generation uses for externals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConvention {
    /// `(context, request, callback)`
    Legacy,

    /// `({ context, request }, callback)`
    Contextual,
}

/// An externals function in either call convention.
#[derive(Clone)]
pub enum ExternalsFn {
    Legacy(Arc<dyn Fn(&str, &str) -> ExternalResolution + Send + Sync>),
    Contextual(Arc<dyn Fn(&ExternalRequest) -> ExternalResolution + Send + Sync>),
}

impl ExternalsFn {
    /// Wrap a three-argument style function.
    pub fn legacy(f: impl Fn(&str, &str) -> ExternalResolution + Send + Sync + 'static) -> Self {
        ExternalsFn::Legacy(Arc::new(f))
    }

    /// Wrap a two-argument style function.
    pub fn contextual(
        f: impl Fn(&ExternalRequest) -> ExternalResolution + Send + Sync + 'static,
    ) -> Self {
        ExternalsFn::Contextual(Arc::new(f))
    }

    pub fn convention(&self) -> CallConvention {
        match self {
            ExternalsFn::Legacy(_) => CallConvention::Legacy,
            ExternalsFn::Contextual(_) => CallConvention::Contextual,
        }
    }

    /// Invoke the function with its own convention's arguments.
    pub fn call(&self, request: &ExternalRequest) -> ExternalResolution {
        match self {
            ExternalsFn::Legacy(f) => f(&request.context, &request.request),
            ExternalsFn::Contextual(f) => f(request),
        }
    }
}

impl fmt::Debug for ExternalsFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalsFn::{:?}(<fn>)", self.convention())
    }
}

/// One item of a configuration's externals list.
#[derive(Debug, Clone)]
pub enum ExternalItem {
    /// A module name kept external
    Name(String),

    /// Requests matching this pattern are external
    Pattern(Pattern),

    /// Request-to-expression mapping
    Map(OptionMap),

    /// A resolution function
    Function(ExternalsFn),
}

impl ExternalItem {
    pub fn as_function(&self) -> Option<&ExternalsFn> {
        match self {
            ExternalItem::Function(f) => Some(f),
            _ => None,
        }
    }
}

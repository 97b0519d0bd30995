//! Loader options trees.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Loader options are JSON-like maps whose key order is meaningful to humans
//! reading a dumped configuration, so maps are [`IndexMap`]s. Unlike JSON,
//! options may also carry patterns and callbacks (a per-file content rewrite
//! for the preprocessor loader, a class-name generator for the CSS loader).

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::pattern::Pattern;

/// Ordered options mapping.
pub type OptionMap = IndexMap<String, OptionValue>;

/// Per-file source rewrite run by a preprocessor loader before compilation.
pub type ContentRewriteFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Scoped class-name generator: `(context, local_ident_name, local_name) -> class`.
pub type LocalIdentFn = Arc<dyn Fn(&LocalIdentContext, &str, &str) -> String + Send + Sync>;

/// What a class-name generator knows about the stylesheet being compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalIdentContext {
    /// Absolute path of the stylesheet
    pub resource_path: PathBuf,

    /// Project root the resource path is made relative to
    pub root_context: PathBuf,
}

/// A value in a loader options tree.
#[derive(Clone)]
pub enum OptionValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<OptionValue>),
    Map(OptionMap),

    /// A path pattern embedded in options or conditions
    Pattern(Pattern),

    /// Content rewrite callback (e.g. `additionalData`)
    ContentRewrite(ContentRewriteFn),

    /// Class-name generator callback (e.g. `getLocalIdent`)
    LocalIdent(LocalIdentFn),
}

impl OptionValue {
    /// Create an empty map value.
    pub fn map() -> Self {
        OptionValue::Map(OptionMap::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OptionMap> {
        match self {
            OptionValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut OptionMap> {
        match self {
            OptionValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn as_content_rewrite(&self) -> Option<&ContentRewriteFn> {
        match self {
            OptionValue::ContentRewrite(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_local_ident(&self) -> Option<&LocalIdentFn> {
        match self {
            OptionValue::LocalIdent(f) => Some(f),
            _ => None,
        }
    }

    /// Convert to JSON. Patterns become their serialized form, callbacks
    /// become the string `"[Function]"`.
    pub fn to_json(&self) -> Value {
        match self {
            OptionValue::Null => Value::Null,
            OptionValue::Bool(b) => Value::Bool(*b),
            OptionValue::Number(n) => Value::Number(n.clone()),
            OptionValue::String(s) => Value::String(s.clone()),
            OptionValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            OptionValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            OptionValue::Pattern(pattern) => Value::String(pattern.to_string()),
            OptionValue::ContentRewrite(_) | OptionValue::LocalIdent(_) => {
                Value::String("[Function]".to_string())
            }
        }
    }
}

/// Overlay `over` onto `base`: every key of `over` replaces the key in `base`.
///
/// Keys already present keep their position; new keys are appended.
pub fn overlay(base: &mut OptionMap, over: &OptionMap) {
    for (key, value) in over {
        base.insert(key.clone(), value.clone());
    }
}

impl fmt::Debug for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Null => write!(f, "Null"),
            OptionValue::Bool(b) => write!(f, "Bool({b})"),
            OptionValue::Number(n) => write!(f, "Number({n})"),
            OptionValue::String(s) => write!(f, "String({s:?})"),
            OptionValue::Array(items) => f.debug_list().entries(items).finish(),
            OptionValue::Map(map) => f.debug_map().entries(map).finish(),
            OptionValue::Pattern(pattern) => write!(f, "Pattern({pattern})"),
            OptionValue::ContentRewrite(_) => write!(f, "ContentRewrite(<fn>)"),
            OptionValue::LocalIdent(_) => write!(f, "LocalIdent(<fn>)"),
        }
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OptionValue::Null, OptionValue::Null) => true,
            (OptionValue::Bool(a), OptionValue::Bool(b)) => a == b,
            (OptionValue::Number(a), OptionValue::Number(b)) => a == b,
            (OptionValue::String(a), OptionValue::String(b)) => a == b,
            (OptionValue::Array(a), OptionValue::Array(b)) => a == b,
            (OptionValue::Map(a), OptionValue::Map(b)) => a == b,
            (OptionValue::Pattern(a), OptionValue::Pattern(b)) => a == b,
            (OptionValue::ContentRewrite(a), OptionValue::ContentRewrite(b)) => Arc::ptr_eq(a, b),
            (OptionValue::LocalIdent(a), OptionValue::LocalIdent(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Value> for OptionValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => OptionValue::Null,
            Value::Bool(b) => OptionValue::Bool(b),
            Value::Number(n) => OptionValue::Number(n),
            Value::String(s) => OptionValue::String(s),
            Value::Array(items) => OptionValue::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => OptionValue::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<OptionMap> for OptionValue {
    fn from(value: OptionMap) -> Self {
        OptionValue::Map(value)
    }
}

impl From<Pattern> for OptionValue {
    fn from(value: Pattern) -> Self {
        OptionValue::Pattern(value)
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(OptionValue::from)
    }
}

//! Path patterns used by rule tests, issuers and externals.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Patterns are kept as their source text and flags rather than as compiled
//! matchers; host patterns use lookbehind, which `regex` cannot compile.
//! Rules are cloned and re-created by the host between versions, so
//! identity means nothing: two patterns are the same when their serialized
//! `/source/flags` forms are equal.
//!
//! Sources are stored exactly as the host wrote them, escapes included:
//!
//! ```text
//! /\.(css|scss|sass)(\.webpack\[javascript\/auto\])?$/
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Finds the first extension enumeration of a pattern, e.g. `\.(css|scss|sass)`.
///
/// Captures the pipe-separated alternatives in group 1.
static EXTENSION_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\\.\(([0-9A-Za-z]+(?:\|[0-9A-Za-z]+)*)\)").unwrap()
});

/// A file-path test predicate, compared by serialized source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    flags: String,
}

impl Pattern {
    /// Create a pattern without flags.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: String::new(),
        }
    }

    /// Create a pattern with flags (`i`, `m`, `s`, ...).
    pub fn with_flags(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }

    /// Whether this pattern serializes to `serialized` (e.g. `/\.module\.css$/`).
    pub fn is(&self, serialized: &str) -> bool {
        self.to_string() == serialized
    }

    /// The alternatives of the first `\.(a|b|...)` extension group, if any.
    pub fn extension_alternatives(&self) -> Option<Vec<&str>> {
        EXTENSION_GROUP
            .captures(&self.source)
            .and_then(|captures| captures.get(1))
            .map(|group| group.as_str().split('|').collect())
    }

    /// Widen the first extension group to also accept `extension`.
    ///
    /// Everything outside the group (prefixes, suffixes, flags) is preserved.
    /// Returns `None` when the pattern has no extension group or already
    /// accepts the extension.
    pub fn with_extension(&self, extension: &str) -> Option<Pattern> {
        let captures = EXTENSION_GROUP.captures(&self.source)?;
        let group = captures.get(1)?;
        if group.as_str().split('|').any(|alt| alt == extension) {
            return None;
        }

        let mut source = String::with_capacity(self.source.len() + extension.len() + 1);
        source.push_str(&self.source[..group.end()]);
        source.push('|');
        source.push_str(extension);
        source.push_str(&self.source[group.end()..]);

        Some(Pattern {
            source,
            flags: self.flags.clone(),
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

//! Module rules and loader chains.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A rule list is an ordered sequence of [`Rule`]s. A rule is either:
//! - a [`BranchRule`] holding an alternation list (`oneOf`): children are
//!   tried in order and the first one that matches wins
//! - a [`LeafRule`] with a test pattern, an optional issuer restriction and
//!   the loaders to apply
//!
//! Loader chains apply right-to-left: the last [`LoaderEntry`] runs first.

use std::fmt;

use crate::pattern::Pattern;
use crate::value::OptionMap;

/// A module rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A rule holding an ordered alternation list
    Branch(BranchRule),

    /// A matcher with loaders
    Leaf(LeafRule),
}

/// A rule whose children are evaluated first-match-wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchRule {
    /// The alternation list
    pub one_of: Vec<Rule>,

    /// Host fields the engine does not interpret
    pub extra: OptionMap,
}

/// A rule matching files by path and applying loaders to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafRule {
    /// Test on the imported file's path
    pub test: Option<RuleTest>,

    /// Restriction on the importing file
    pub issuer: Option<Issuer>,

    /// Paths excluded from this rule
    pub exclude: Option<RuleTest>,

    /// Loaders applied to matched files
    pub uses: Option<Use>,

    /// Host fields the engine does not interpret (`sideEffects`, `type`, ...)
    pub extra: OptionMap,
}

/// A rule test: one pattern, or a set of patterns any of which may match.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleTest {
    One(Pattern),
    Any(Vec<Pattern>),
}

/// An issuer restriction.
#[derive(Debug, Clone, PartialEq)]
pub enum Issuer {
    /// The importer's path must match this pattern
    Pattern(Pattern),

    /// A structured condition (`and`, `not`, ...) kept opaque
    Condition(OptionMap),
}

/// The loaders of a leaf rule, in each of the shapes hosts write them.
#[derive(Debug, Clone, PartialEq)]
pub enum Use {
    /// A bare loader name or path (`use: "ignore-loader"`)
    Loader(String),

    /// A single loader with options (`use: { loader, options }`)
    Entry(LoaderEntry),

    /// An ordered loader chain
    Chain(Vec<LoaderEntry>),
}

/// One transform in a loader chain.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderEntry {
    /// Loader name or resolved path
    pub loader: String,

    /// Loader options
    pub options: OptionMap,
}

impl Rule {
    /// Create a branch rule from an alternation list.
    pub fn branch(one_of: Vec<Rule>) -> Self {
        Rule::Branch(BranchRule {
            one_of,
            extra: OptionMap::new(),
        })
    }

    /// The alternation list, when this is a branch.
    pub fn one_of(&self) -> Option<&[Rule]> {
        match self {
            Rule::Branch(branch) => Some(&branch.one_of),
            Rule::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafRule> {
        match self {
            Rule::Leaf(leaf) => Some(leaf),
            Rule::Branch(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafRule> {
        match self {
            Rule::Leaf(leaf) => Some(leaf),
            Rule::Branch(_) => None,
        }
    }

    /// The rule's test, when this is a leaf with one.
    pub fn test(&self) -> Option<&RuleTest> {
        self.as_leaf().and_then(|leaf| leaf.test.as_ref())
    }

    pub fn issuer(&self) -> Option<&Issuer> {
        self.as_leaf().and_then(|leaf| leaf.issuer.as_ref())
    }

    pub fn uses(&self) -> Option<&Use> {
        self.as_leaf().and_then(|leaf| leaf.uses.as_ref())
    }
}

impl From<LeafRule> for Rule {
    fn from(leaf: LeafRule) -> Self {
        Rule::Leaf(leaf)
    }
}

impl From<BranchRule> for Rule {
    fn from(branch: BranchRule) -> Self {
        Rule::Branch(branch)
    }
}

impl LeafRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test(mut self, pattern: Pattern) -> Self {
        self.test = Some(RuleTest::One(pattern));
        self
    }

    pub fn with_tests(mut self, patterns: Vec<Pattern>) -> Self {
        self.test = Some(RuleTest::Any(patterns));
        self
    }

    pub fn with_issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn with_exclude(mut self, pattern: Pattern) -> Self {
        self.exclude = Some(RuleTest::One(pattern));
        self
    }

    pub fn with_use(mut self, uses: Use) -> Self {
        self.uses = Some(uses);
        self
    }
}

impl RuleTest {
    /// All patterns of this test.
    pub fn patterns(&self) -> &[Pattern] {
        match self {
            RuleTest::One(pattern) => std::slice::from_ref(pattern),
            RuleTest::Any(patterns) => patterns,
        }
    }

    /// The single pattern, when the test is not a set.
    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            RuleTest::One(pattern) => Some(pattern),
            RuleTest::Any(_) => None,
        }
    }

    /// Whether this is a single pattern serializing to `serialized`.
    pub fn is(&self, serialized: &str) -> bool {
        self.as_pattern().is_some_and(|pattern| pattern.is(serialized))
    }
}

impl fmt::Display for RuleTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleTest::One(pattern) => write!(f, "{pattern}"),
            RuleTest::Any(patterns) => {
                for (i, pattern) in patterns.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{pattern}")?;
                }
                Ok(())
            }
        }
    }
}

impl Issuer {
    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Issuer::Pattern(pattern) => Some(pattern),
            Issuer::Condition(_) => None,
        }
    }
}

impl Use {
    /// Names of every loader in this use, in chain order.
    pub fn loader_names(&self) -> Vec<&str> {
        match self {
            Use::Loader(name) => vec![name.as_str()],
            Use::Entry(entry) => vec![entry.loader.as_str()],
            Use::Chain(chain) => chain.iter().map(|entry| entry.loader.as_str()).collect(),
        }
    }

    /// Whether any loader name contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.loader_names().iter().any(|name| name.contains(needle))
    }

    pub fn chain(&self) -> Option<&[LoaderEntry]> {
        match self {
            Use::Chain(chain) => Some(chain),
            _ => None,
        }
    }

}

impl LoaderEntry {
    /// A loader without options.
    pub fn new(loader: impl Into<String>) -> Self {
        Self {
            loader: loader.into(),
            options: OptionMap::new(),
        }
    }

    pub fn with_options(loader: impl Into<String>, options: OptionMap) -> Self {
        Self {
            loader: loader.into(),
            options,
        }
    }

    /// Whether the loader name contains `needle` (names are often resolved paths).
    pub fn is(&self, needle: &str) -> bool {
        self.loader.contains(needle)
    }
}

//! `RuleTable` — Static/dynamic string-keyed rules with first-match-wins lookup
//!
//! A table holds two independent rule lists:
//!
//! - [`StaticRule`] — exact match on a string
//! - [`DynamicRule`] — regex match; the value is created from the captures on
//!   first use and memoized per input string
//!
//! [`RuleTable::resolve`] scans static rules first, then dynamic rules, each in
//! insertion order. The first match wins.

use std::collections::HashMap;
use std::fmt;

use regex::{Captures, Regex};

use crate::EngineError;

/// Type-erased value factory for dynamic rules.
type BoxedCreate<T> = Box<dyn Fn(&Captures<'_>) -> T + Send + Sync>;

// ═══════════════════════════════════════════════════════════════════════════════
// Rules
// ═══════════════════════════════════════════════════════════════════════════════

/// Exact-match rule.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticRule<T> {
    /// Unique key, used for removal and introspection.
    pub key: String,
    /// The input string this rule matches exactly.
    pub match_string: String,
    /// The resolved value.
    pub value: T,
}

impl<T> StaticRule<T> {
    /// Create a static rule.
    pub fn new(key: impl Into<String>, match_string: impl Into<String>, value: impl Into<T>) -> Self {
        Self {
            key: key.into(),
            match_string: match_string.into(),
            value: value.into(),
        }
    }
}

/// Pattern rule whose value is computed from regex captures.
///
/// The factory runs at most once per distinct input; later lookups of the same
/// input return the memoized value.
pub struct DynamicRule<T> {
    /// Unique key, used for removal and introspection.
    pub key: String,
    /// The pattern inputs are matched against.
    pub pattern: Regex,
    /// Example inputs. Documentation and autocomplete only, never matched.
    pub examples: Vec<String>,
    create: BoxedCreate<T>,
    memo: HashMap<String, T>,
}

impl<T> DynamicRule<T> {
    /// Create a dynamic rule from a regex source.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPattern`] if the regex is invalid.
    pub fn new<I, S, F>(
        key: impl Into<String>,
        pattern: &str,
        examples: I,
        create: F,
    ) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Captures<'_>) -> T + Send + Sync + 'static,
    {
        let pattern = Regex::new(pattern).map_err(|e| EngineError::InvalidPattern {
            pattern: pattern.to_owned(),
            message: e.to_string(),
        })?;
        Ok(Self::with_regex(key, pattern, examples, create))
    }

    /// Create a dynamic rule from an already compiled regex.
    pub fn with_regex<I, S, F>(key: impl Into<String>, pattern: Regex, examples: I, create: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Captures<'_>) -> T + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            pattern,
            examples: examples.into_iter().map(Into::into).collect(),
            create: Box::new(create),
            memo: HashMap::new(),
        }
    }

    /// Number of inputs whose value has been created and memoized.
    #[must_use]
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }
}

impl<T> fmt::Debug for DynamicRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicRule")
            .field("key", &self.key)
            .field("pattern", &self.pattern.as_str())
            .field("examples", &self.examples)
            .field("memoized", &self.memo.len())
            .finish()
    }
}

/// A rule of either kind.
#[derive(Debug)]
pub enum Rule<T> {
    /// Exact match.
    Static(StaticRule<T>),
    /// Regex match.
    Dynamic(DynamicRule<T>),
}

impl<T> Rule<T> {
    /// The rule's unique key.
    pub fn key(&self) -> &str {
        match self {
            Self::Static(rule) => &rule.key,
            Self::Dynamic(rule) => &rule.key,
        }
    }
}

impl<T> From<StaticRule<T>> for Rule<T> {
    fn from(rule: StaticRule<T>) -> Self {
        Self::Static(rule)
    }
}

impl<T> From<DynamicRule<T>> for Rule<T> {
    fn from(rule: DynamicRule<T>) -> Self {
        Self::Dynamic(rule)
    }
}

/// A successful lookup: the key of the rule that matched and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// Key of the matching rule.
    pub key: String,
    /// The resolved value.
    pub value: T,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RuleTable
// ═══════════════════════════════════════════════════════════════════════════════

/// Generic static/dynamic rule store.
///
/// # INV: First-match-wins
///
/// Static rules are scanned before dynamic rules, each in insertion order.
/// Rule order is significant; two static rules with the same match string
/// resolve to the one added first.
///
/// # Resolved-value cache
///
/// Callers that post-process a value (see [`AliasResolver`](crate::AliasResolver))
/// may store the final result with [`set_resolved`](Self::set_resolved). The cache
/// is consulted before any scan and is cleared on every rule mutation, so a
/// lookup always reflects the rules present at the time it is made.
pub struct RuleTable<T> {
    static_rules: Vec<StaticRule<T>>,
    dynamic_rules: Vec<DynamicRule<T>>,
    resolved: HashMap<String, Resolved<T>>,
}

impl<T: Clone> RuleTable<T> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            static_rules: Vec::new(),
            dynamic_rules: Vec::new(),
            resolved: HashMap::new(),
        }
    }

    /// Add a rule of either kind.
    pub fn add(&mut self, rule: Rule<T>) {
        match rule {
            Rule::Static(rule) => self.add_static_rule(rule),
            Rule::Dynamic(rule) => self.add_dynamic_rule(rule),
        }
    }

    /// Add a static rule. A rule with the same key is replaced in place.
    pub fn add_static_rule(&mut self, rule: StaticRule<T>) {
        self.resolved.clear();
        match self.static_rules.iter_mut().find(|r| r.key == rule.key) {
            Some(slot) => *slot = rule,
            None => self.static_rules.push(rule),
        }
    }

    /// Remove a static rule by key, returning it if present.
    pub fn remove_static_rule(&mut self, key: &str) -> Option<StaticRule<T>> {
        let index = self.static_rules.iter().position(|r| r.key == key)?;
        self.resolved.clear();
        Some(self.static_rules.remove(index))
    }

    /// Add a dynamic rule. A rule with the same key is replaced in place.
    pub fn add_dynamic_rule(&mut self, rule: DynamicRule<T>) {
        self.resolved.clear();
        match self.dynamic_rules.iter_mut().find(|r| r.key == rule.key) {
            Some(slot) => *slot = rule,
            None => self.dynamic_rules.push(rule),
        }
    }

    /// Remove a dynamic rule by key, returning it if present.
    pub fn remove_dynamic_rule(&mut self, key: &str) -> Option<DynamicRule<T>> {
        let index = self.dynamic_rules.iter().position(|r| r.key == key)?;
        self.resolved.clear();
        Some(self.dynamic_rules.remove(index))
    }

    /// Look up `input`.
    ///
    /// 1. A cached final result, if one was stored with [`set_resolved`](Self::set_resolved)
    /// 2. The first static rule whose match string equals `input`
    /// 3. The first dynamic rule whose pattern matches `input` (value memoized per input)
    ///
    /// Returns `None` if nothing matches.
    pub fn resolve(&mut self, input: &str) -> Option<Resolved<T>> {
        if let Some(hit) = self.resolved.get(input) {
            tracing::trace!(input, key = %hit.key, "rule table cache hit");
            return Some(hit.clone());
        }

        if let Some(rule) = self.static_rules.iter().find(|r| r.match_string == input) {
            return Some(Resolved {
                key: rule.key.clone(),
                value: rule.value.clone(),
            });
        }

        for rule in &mut self.dynamic_rules {
            let Some(captures) = rule.pattern.captures(input) else {
                continue;
            };
            let value = match rule.memo.get(input) {
                Some(value) => value.clone(),
                None => {
                    let value = (rule.create)(&captures);
                    rule.memo.insert(input.to_owned(), value.clone());
                    value
                }
            };
            return Some(Resolved {
                key: rule.key.clone(),
                value,
            });
        }

        None
    }

    /// Store a post-processed final value for `input`.
    ///
    /// Subsequent [`resolve`](Self::resolve) calls return it without scanning,
    /// until the next rule mutation.
    pub fn set_resolved(&mut self, input: impl Into<String>, key: impl Into<String>, value: T) {
        self.resolved.insert(
            input.into(),
            Resolved {
                key: key.into(),
                value,
            },
        );
    }

    /// Static rules in insertion order.
    pub fn static_rules(&self) -> impl Iterator<Item = &StaticRule<T>> {
        self.static_rules.iter()
    }

    /// Dynamic rules in insertion order.
    pub fn dynamic_rules(&self) -> impl Iterator<Item = &DynamicRule<T>> {
        self.dynamic_rules.iter()
    }

    /// Every known input: static match strings, then dynamic examples.
    ///
    /// Used by tooling for autocomplete and documentation.
    #[must_use]
    pub fn examples(&self) -> Vec<&str> {
        self.static_rules
            .iter()
            .map(|r| r.match_string.as_str())
            .chain(
                self.dynamic_rules
                    .iter()
                    .flat_map(|r| r.examples.iter().map(String::as_str)),
            )
            .collect()
    }

    /// Total number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.static_rules.len() + self.dynamic_rules.len()
    }

    /// Returns `true` if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.static_rules.is_empty() && self.dynamic_rules.is_empty()
    }
}

impl<T: Clone> Default for RuleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RuleTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleTable")
            .field("static_rules", &self.static_rules.len())
            .field("dynamic_rules", &self.dynamic_rules.len())
            .field("cached", &self.resolved.len())
            .finish()
    }
}

//! `AliasResolver` — Recursive alias expansion over a [`RuleTable`]
//!
//! An alias resolves to an ordered list of strings. Each string is itself
//! looked up again: aliases may expand to deeper aliases or bottom out as
//! literals. The flattened result contains only literals.

use regex::Captures;

use crate::{DynamicRule, EngineError, Resolved, Rule, RuleTable, StaticRule, MAX_EXPANSION_DEPTH};

/// One level of expansion.
struct Expansion {
    values: Vec<String>,
    /// No element at this level expanded further (and none was cut by the depth guard).
    bottomed_out: bool,
}

/// Resolves nesting or selector aliases to literal strings.
///
/// # Caching
///
/// A flattened result is written back to the table only when none of its
/// elements needed deeper resolution. Partially resolved chains are never
/// cached, so rules added after a probe are still picked up.
///
/// # Example
///
/// ```
/// use atoma::AliasResolver;
///
/// let mut aliases = AliasResolver::new();
/// aliases.add_static_alias_rule(AliasResolver::static_rule("screens", "@screens", ["@sm", "@lg"]));
/// aliases.add_static_alias_rule(AliasResolver::static_rule("sm", "@sm", ["@media (min-width: 640px)"]));
///
/// assert_eq!(
///     aliases.resolve_alias("@screens").unwrap(),
///     vec!["@media (min-width: 640px)", "@lg"],
/// );
/// assert!(aliases.resolve_alias("@unknown").is_none());
/// ```
#[derive(Debug, Default)]
pub struct AliasResolver {
    table: RuleTable<Vec<String>>,
}

impl AliasResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a static alias rule.
    pub fn static_rule<I, S>(key: impl Into<String>, alias: impl Into<String>, values: I) -> StaticRule<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticRule::new(key, alias, values.into_iter().map(Into::into).collect::<Vec<String>>())
    }

    /// Convenience constructor for a dynamic alias rule.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPattern`] if the regex is invalid.
    pub fn dynamic_rule<I, S, F>(
        key: impl Into<String>,
        pattern: &str,
        examples: I,
        create: F,
    ) -> Result<DynamicRule<Vec<String>>, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Captures<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        DynamicRule::new(key, pattern, examples, create)
    }

    /// Add a rule of either kind.
    pub fn add_rule(&mut self, rule: Rule<Vec<String>>) {
        self.table.add(rule);
    }

    /// Add a static alias rule.
    pub fn add_static_alias_rule(&mut self, rule: StaticRule<Vec<String>>) {
        self.table.add_static_rule(rule);
    }

    /// Remove a static alias rule by key.
    pub fn remove_static_alias_rule(&mut self, key: &str) -> Option<StaticRule<Vec<String>>> {
        self.table.remove_static_rule(key)
    }

    /// Add a dynamic alias rule.
    pub fn add_dynamic_alias_rule(&mut self, rule: DynamicRule<Vec<String>>) {
        self.table.add_dynamic_rule(rule);
    }

    /// Remove a dynamic alias rule by key.
    pub fn remove_dynamic_alias_rule(&mut self, key: &str) -> Option<DynamicRule<Vec<String>>> {
        self.table.remove_dynamic_rule(key)
    }

    /// The underlying rule table (introspection).
    pub fn table(&self) -> &RuleTable<Vec<String>> {
        &self.table
    }

    /// Single-level lookup, without recursive expansion.
    pub(crate) fn lookup(&mut self, alias: &str) -> Option<Resolved<Vec<String>>> {
        self.table.resolve(alias)
    }

    /// Resolve `alias` to its flattened list of literals.
    ///
    /// Returns `None` if `alias` matches no rule; the caller treats the token
    /// as a literal.
    pub fn resolve_alias(&mut self, alias: &str) -> Option<Vec<String>> {
        let expansion = self.expand(alias, &mut Vec::new())?;
        if !expansion.bottomed_out {
            tracing::trace!(alias, "alias chain resolved through deeper aliases, not cached");
        }
        Some(expansion.values)
    }

    /// `path` holds the aliases currently being expanded, outermost first.
    fn expand(&mut self, alias: &str, path: &mut Vec<String>) -> Option<Expansion> {
        let resolved = self.table.resolve(alias)?;

        path.push(alias.to_owned());
        let mut values = Vec::with_capacity(resolved.value.len());
        let mut bottomed_out = true;
        for token in resolved.value {
            if path.contains(&token) {
                tracing::warn!(alias, token = %token, "alias refers back to itself, keeping token literal");
                bottomed_out = false;
                values.push(token);
                continue;
            }
            if path.len() >= MAX_EXPANSION_DEPTH {
                tracing::warn!(
                    alias,
                    token = %token,
                    max = MAX_EXPANSION_DEPTH,
                    "alias expansion too deep, keeping token literal"
                );
                bottomed_out = false;
                values.push(token);
                continue;
            }
            match self.expand(&token, path) {
                Some(deeper) => {
                    bottomed_out = false;
                    values.extend(deeper.values);
                }
                None => values.push(token),
            }
        }
        path.pop();

        if bottomed_out {
            self.table.set_resolved(alias, resolved.key, values.clone());
        }

        Some(Expansion { values, bottomed_out })
    }
}

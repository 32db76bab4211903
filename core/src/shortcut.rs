//! `ShortcutResolver` — Shortcut (macro) names to style items
//!
//! Same table shape as [`AliasResolver`](crate::AliasResolver), but values are
//! lists of [`StyleItem`]s and recursion is driven by the engine: an item that
//! names another shortcut re-enters the style pipeline.

use regex::Captures;

use crate::{DynamicRule, EngineError, Rule, RuleTable, StaticRule, StyleItem};

/// Resolves shortcut names to their style items (one level, no recursion).
///
/// # Example
///
/// ```
/// use atoma::{ShortcutResolver, StyleGroup, StyleItem};
///
/// let mut shortcuts = ShortcutResolver::new();
/// shortcuts.add_static_shortcut_rule(ShortcutResolver::static_rule(
///     "btn-primary",
///     "btn-primary",
///     [StyleItem::from("btn"), StyleGroup::new().set("color", "white").into()],
/// ));
///
/// assert_eq!(shortcuts.resolve_shortcut("btn-primary").len(), 2);
/// assert!(shortcuts.resolve_shortcut("unknown").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ShortcutResolver {
    table: RuleTable<Vec<StyleItem>>,
}

impl ShortcutResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a static shortcut rule.
    pub fn static_rule<I>(key: impl Into<String>, name: impl Into<String>, items: I) -> StaticRule<Vec<StyleItem>>
    where
        I: IntoIterator<Item = StyleItem>,
    {
        StaticRule::new(key, name, items.into_iter().collect::<Vec<_>>())
    }

    /// Convenience constructor for a dynamic shortcut rule.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPattern`] if the regex is invalid.
    pub fn dynamic_rule<I, S, F>(
        key: impl Into<String>,
        pattern: &str,
        examples: I,
        create: F,
    ) -> Result<DynamicRule<Vec<StyleItem>>, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Captures<'_>) -> Vec<StyleItem> + Send + Sync + 'static,
    {
        DynamicRule::new(key, pattern, examples, create)
    }

    /// Add a rule of either kind.
    pub fn add_rule(&mut self, rule: Rule<Vec<StyleItem>>) {
        self.table.add(rule);
    }

    /// Add a static shortcut rule.
    pub fn add_static_shortcut_rule(&mut self, rule: StaticRule<Vec<StyleItem>>) {
        self.table.add_static_rule(rule);
    }

    /// Remove a static shortcut rule by key.
    pub fn remove_static_shortcut_rule(&mut self, key: &str) -> Option<StaticRule<Vec<StyleItem>>> {
        self.table.remove_static_rule(key)
    }

    /// Add a dynamic shortcut rule.
    pub fn add_dynamic_shortcut_rule(&mut self, rule: DynamicRule<Vec<StyleItem>>) {
        self.table.add_dynamic_rule(rule);
    }

    /// Remove a dynamic shortcut rule by key.
    pub fn remove_dynamic_shortcut_rule(&mut self, key: &str) -> Option<DynamicRule<Vec<StyleItem>>> {
        self.table.remove_dynamic_rule(key)
    }

    /// The underlying rule table (introspection).
    pub fn table(&self) -> &RuleTable<Vec<StyleItem>> {
        &self.table
    }

    /// Resolve `name` to its style items.
    ///
    /// Unknown names resolve to an empty list: they produce no styles.
    pub fn resolve_shortcut(&mut self, name: &str) -> Vec<StyleItem> {
        self.table
            .resolve(name)
            .map(|resolved| resolved.value)
            .unwrap_or_default()
    }
}

//! `StyleGroupExtractor` — One style group to atomic style records
//!
//! Extraction resolves the group's control keys against the alias tables,
//! expands applied shortcuts through the engine, and emits one
//! [`AtomicStyleContent`] per declared property. Unset values are kept as
//! override markers; merging happens later in [`optimize`](crate::optimize).

use crate::{AtomicStyleContent, StyleGroup};

/// Callbacks the extractor needs from its host.
///
/// The engine implements this over its resolvers. Shortcut expansion
/// re-enters the full style pipeline, so applied shortcuts may themselves
/// apply or reference other shortcuts.
pub trait ExtractContext {
    /// Resolve a nesting token. `None` means "not an alias, keep literal".
    fn resolve_nesting_alias(&mut self, alias: &str) -> Option<Vec<String>>;

    /// Resolve a selector token. `None` means "not an alias, keep literal".
    fn resolve_selector_alias(&mut self, alias: &str) -> Option<Vec<String>>;

    /// Expand a shortcut name to its (already optimized) atomic records.
    fn expand_shortcut(&mut self, name: &str) -> Vec<AtomicStyleContent>;
}

/// Normalizes style groups using the engine-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleGroupExtractor {
    default_nesting: Vec<String>,
    default_selector: Vec<String>,
    default_important: bool,
}

impl StyleGroupExtractor {
    /// Create an extractor with the given defaults.
    #[must_use]
    pub fn new(default_nesting: Vec<String>, default_selector: Vec<String>, default_important: bool) -> Self {
        Self {
            default_nesting,
            default_selector,
            default_important,
        }
    }

    /// Default nesting levels, outer to inner.
    pub fn default_nesting(&self) -> &[String] {
        &self.default_nesting
    }

    /// Default selector templates.
    pub fn default_selector(&self) -> &[String] {
        &self.default_selector
    }

    /// Default `!important` flag.
    pub fn default_important(&self) -> bool {
        self.default_important
    }

    /// Extract the atomic records of one group.
    ///
    /// Applied shortcuts come first so the group's own properties override
    /// them on identity collisions.
    pub fn extract(&self, group: &StyleGroup, ctx: &mut dyn ExtractContext) -> Vec<AtomicStyleContent> {
        let mut list = Vec::new();
        for name in &group.apply {
            list.extend(ctx.expand_shortcut(name));
        }

        if group.properties.is_empty() {
            return list;
        }

        let nesting = match &group.nesting {
            Some(tokens) => resolve_tokens(tokens, |t| ctx.resolve_nesting_alias(t)),
            None => self.default_nesting.clone(),
        };
        let selector = match &group.selector {
            Some(tokens) => resolve_tokens(tokens, |t| ctx.resolve_selector_alias(t)),
            None => self.default_selector.clone(),
        };
        let important = group.important.unwrap_or(self.default_important);

        list.extend(group.properties.iter().map(|(property, value)| AtomicStyleContent {
            nesting: nesting.clone(),
            selector: selector.clone(),
            important,
            property: normalize_property(property),
            value: value.clone(),
        }));
        list
    }
}

/// Substitute each alias token with its resolved list; unknown tokens pass through.
fn resolve_tokens(tokens: &[String], mut resolve: impl FnMut(&str) -> Option<Vec<String>>) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match resolve(token) {
            Some(resolved) => out.extend(resolved),
            None => out.push(token.clone()),
        }
    }
    out
}

/// Canonical (kebab-case) form of a property name.
///
/// ```
/// use atoma::normalize_property;
///
/// assert_eq!(normalize_property("backgroundColor"), "background-color");
/// assert_eq!(normalize_property("WebkitTransition"), "-webkit-transition");
/// assert_eq!(normalize_property("background-color"), "background-color");
/// assert_eq!(normalize_property("--brandColor"), "--brandColor");
/// ```
#[must_use]
pub fn normalize_property(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_owned();
    }
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

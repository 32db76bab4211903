//! Presets — reusable configuration fragments.

use crate::{AliasResolver, Rule, ShortcutResolver, StyleItem};

/// A named bundle of rules and global styles.
///
/// Presets may include other presets. Installing a preset installs its
/// nested presets first (depth-first, in declaration order), then its own
/// rules.
///
/// # Example
///
/// ```
/// use atoma::{AliasResolver, EngineBuilder, Preset, StyleGroup, ShortcutResolver};
///
/// let screens = Preset::new("screens")
///     .nesting_alias(AliasResolver::static_rule("sm", "@sm", ["@media (min-width: 640px)"]));
/// let layout = Preset::new("layout")
///     .preset(screens)
///     .shortcut(ShortcutResolver::static_rule(
///         "hidden",
///         "hidden",
///         [StyleGroup::new().set("display", "none").into()],
///     ));
///
/// let mut engine = EngineBuilder::new().preset(layout).build().unwrap();
/// engine.style([StyleGroup::new().nesting(["@sm"]).apply(["hidden"]).set("color", "red")]);
/// ```
#[derive(Debug, Default)]
pub struct Preset {
    pub(crate) name: String,
    pub(crate) nesting_aliases: Vec<Rule<Vec<String>>>,
    pub(crate) selector_aliases: Vec<Rule<Vec<String>>>,
    pub(crate) shortcuts: Vec<Rule<Vec<StyleItem>>>,
    pub(crate) global_styles: Vec<String>,
    pub(crate) presets: Vec<Preset>,
}

impl Preset {
    /// Create an empty preset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The preset's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Include another preset, installed before this one's rules.
    #[must_use]
    pub fn preset(mut self, preset: Preset) -> Self {
        self.presets.push(preset);
        self
    }

    /// Add a nesting alias rule.
    #[must_use]
    pub fn nesting_alias(mut self, rule: impl Into<Rule<Vec<String>>>) -> Self {
        self.nesting_aliases.push(rule.into());
        self
    }

    /// Add a selector alias rule.
    #[must_use]
    pub fn selector_alias(mut self, rule: impl Into<Rule<Vec<String>>>) -> Self {
        self.selector_aliases.push(rule.into());
        self
    }

    /// Add a shortcut rule.
    #[must_use]
    pub fn shortcut(mut self, rule: impl Into<Rule<Vec<StyleItem>>>) -> Self {
        self.shortcuts.push(rule.into());
        self
    }

    /// Add global CSS.
    #[must_use]
    pub fn global_style(mut self, css: impl Into<String>) -> Self {
        self.global_styles.push(css.into());
        self
    }

    /// Move every rule into the resolvers, nested presets first.
    pub(crate) fn install(
        self,
        nesting: &mut AliasResolver,
        selector: &mut AliasResolver,
        shortcuts: &mut ShortcutResolver,
        global_styles: &mut Vec<String>,
    ) {
        for preset in self.presets {
            preset.install(nesting, selector, shortcuts, global_styles);
        }
        if !self.name.is_empty() {
            tracing::debug!(
                preset = %self.name,
                nesting_aliases = self.nesting_aliases.len(),
                selector_aliases = self.selector_aliases.len(),
                shortcuts = self.shortcuts.len(),
                "installing preset"
            );
        }
        for rule in self.nesting_aliases {
            nesting.add_rule(rule);
        }
        for rule in self.selector_aliases {
            selector.add_rule(rule);
        }
        for rule in self.shortcuts {
            shortcuts.add_rule(rule);
        }
        global_styles.extend(self.global_styles);
    }
}

//! Engine — the compiler driver
//!
//! [`Engine::style`] runs the whole pipeline:
//!
//! ```text
//! style items → ShortcutResolver → StyleGroupExtractor → optimize → names → registry
//! ```
//!
//! and [`Engine::render_styles`] generates CSS from the registry on demand.

use std::collections::HashMap;
use std::fmt;

use crate::{
    render, validate, AliasResolver, AtomicStyle, AtomicStyleContent, EngineError, ExtractContext,
    Preset, Rule, ShortcutResolver, StyleGroupExtractor, StyleItem, DEFAULT_SELECTOR,
    MAX_EXPANSION_DEPTH,
};

/// Registration listener.
type Listener = Box<dyn FnMut(&AtomicStyle)>;

/// Handle returned by [`Engine::on_atomic_style_registered`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for an [`Engine`].
///
/// Rules from presets are inserted before the builder's own rules, in
/// declaration order (nested presets first). With first-match-wins lookup a
/// preset rule therefore shadows a later rule with the same match string.
///
/// # Example
///
/// ```
/// use atoma::{AliasResolver, EngineBuilder, ShortcutResolver, StyleGroup};
///
/// let mut engine = EngineBuilder::new()
///     .prefix("x-")
///     .default_important(true)
///     .nesting_alias(AliasResolver::static_rule("sm", "@sm", ["@media (min-width: 640px)"]))
///     .shortcut(ShortcutResolver::static_rule(
///         "center",
///         "center",
///         [StyleGroup::new().set("display", "flex").set("alignItems", "center").into()],
///     ))
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.style(["center"]), vec!["x-a", "x-b"]);
/// ```
#[derive(Debug)]
pub struct EngineBuilder {
    prefix: String,
    default_nesting: Vec<String>,
    default_selector: Vec<String>,
    default_important: bool,
    presets: Vec<Preset>,
    own: Preset,
}

impl EngineBuilder {
    /// Create a builder with the default configuration: no prefix, no
    /// nesting, selector `.{a}`, not important.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            default_nesting: Vec::new(),
            default_selector: vec![DEFAULT_SELECTOR.to_owned()],
            default_important: false,
            presets: Vec::new(),
            own: Preset::new(""),
        }
    }

    /// Prefix prepended to every allocated name.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Nesting used by groups without a nesting override.
    #[must_use]
    pub fn default_nesting<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_nesting = levels.into_iter().map(Into::into).collect();
        self
    }

    /// Selector templates used by groups without a selector override.
    /// Each must contain the `{a}` placeholder.
    #[must_use]
    pub fn default_selector<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_selector = templates.into_iter().map(Into::into).collect();
        self
    }

    /// `!important` flag used by groups without an override.
    #[must_use]
    pub fn default_important(mut self, important: bool) -> Self {
        self.default_important = important;
        self
    }

    /// Add a preset. Preset rules are inserted before the builder's own.
    #[must_use]
    pub fn preset(mut self, preset: Preset) -> Self {
        self.presets.push(preset);
        self
    }

    /// Add a nesting alias rule.
    #[must_use]
    pub fn nesting_alias(mut self, rule: impl Into<Rule<Vec<String>>>) -> Self {
        self.own = self.own.nesting_alias(rule);
        self
    }

    /// Add a selector alias rule.
    #[must_use]
    pub fn selector_alias(mut self, rule: impl Into<Rule<Vec<String>>>) -> Self {
        self.own = self.own.selector_alias(rule);
        self
    }

    /// Add a shortcut rule.
    #[must_use]
    pub fn shortcut(mut self, rule: impl Into<Rule<Vec<StyleItem>>>) -> Self {
        self.own = self.own.shortcut(rule);
        self
    }

    /// Add global CSS, rendered before atomic styles.
    #[must_use]
    pub fn global_style(mut self, css: impl Into<String>) -> Self {
        self.own = self.own.global_style(css);
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// - [`EngineError::MissingPlaceholder`] — a default selector lacks `{a}`
    /// - [`EngineError::CycleDetected`] — a static alias or shortcut chain loops
    pub fn build(self) -> Result<Engine, EngineError> {
        let mut resolvers = Resolvers::default();
        let mut global_styles = Vec::new();

        for preset in self.presets.into_iter().chain(std::iter::once(self.own)) {
            preset.install(
                &mut resolvers.nesting_aliases,
                &mut resolvers.selector_aliases,
                &mut resolvers.shortcuts,
                &mut global_styles,
            );
        }

        let mut engine = Engine {
            prefix: self.prefix,
            extractor: StyleGroupExtractor::new(
                self.default_nesting,
                self.default_selector,
                self.default_important,
            ),
            resolvers,
            global_styles: Vec::new(),
            names: HashMap::new(),
            registry: Vec::new(),
            registered: HashMap::new(),
            listeners: Vec::new(),
            next_listener: 0,
        };
        for css in global_styles {
            engine.add_global_style(&css);
        }
        engine.validate()?;
        Ok(engine)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Engine
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct Resolvers {
    nesting_aliases: AliasResolver,
    selector_aliases: AliasResolver,
    shortcuts: ShortcutResolver,
}

/// The atomic style engine.
///
/// Owns the rule tables, the name cache and the registry of emitted styles.
/// Registered styles accumulate for the lifetime of the instance; build a
/// fresh engine per compilation context.
///
/// # Single writer
///
/// All methods that touch the registry take `&mut self`. There is no
/// internal locking and no suspension point anywhere in the pipeline.
pub struct Engine {
    prefix: String,
    extractor: StyleGroupExtractor,
    resolvers: Resolvers,
    global_styles: Vec<String>,
    names: HashMap<AtomicStyleContent, String>,
    registry: Vec<AtomicStyle>,
    registered: HashMap<String, usize>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Engine {
    /// Start building an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Pipeline
    // ───────────────────────────────────────────────────────────────────────────

    /// Resolve style items to atomic style names.
    ///
    /// Items are expanded in order, concatenated, and passed through
    /// [`optimize`]. Every surviving record gets its name (allocated on first
    /// sight); newly seen records are registered and announced to listeners.
    /// Identities whose final value is unset contribute no name.
    pub fn style<I>(&mut self, items: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: Into<StyleItem>,
    {
        let items: Vec<StyleItem> = items.into_iter().map(Into::into).collect();
        let contents = self.resolve_style_items(&items);

        let mut names = Vec::with_capacity(contents.len());
        for content in contents {
            if content.is_unset() {
                continue;
            }
            let name = self.get_or_allocate_name(&content);
            if !self.registered.contains_key(&name) {
                self.register(AtomicStyle {
                    name: name.clone(),
                    content,
                });
            }
            names.push(name);
        }
        names
    }

    /// Resolve style items to optimized atomic records without registering them.
    pub fn resolve_style_items(&mut self, items: &[StyleItem]) -> Vec<AtomicStyleContent> {
        Pipeline {
            extractor: &self.extractor,
            resolvers: &mut self.resolvers,
            active: Vec::new(),
        }
        .resolve_items(items)
    }

    /// The name for `content`, allocating `prefix + base26(n)` on first sight.
    ///
    /// # INV: bijection
    ///
    /// The same content always gets the same name; distinct contents never
    /// share one. Names are never recycled.
    ///
    /// Any content is named, including unset override markers, which
    /// [`style`](Self::style) never passes here. Call this only with
    /// renderable content, or the marker consumes a letter no rendered
    /// style will carry.
    pub fn get_or_allocate_name(&mut self, content: &AtomicStyleContent) -> String {
        if let Some(name) = self.names.get(content) {
            return name.clone();
        }
        let name = format!("{}{}", self.prefix, number_to_alphabets(self.names.len()));
        self.names.insert(content.clone(), name.clone());
        name
    }

    fn register(&mut self, style: AtomicStyle) {
        tracing::trace!(name = %style.name, property = %style.content.property, "atomic style registered");
        self.registered.insert(style.name.clone(), self.registry.len());
        self.registry.push(style);

        let style = &self.registry[self.registry.len() - 1];
        for (_, listener) in &mut self.listeners {
            listener(style);
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Events
    // ───────────────────────────────────────────────────────────────────────────

    /// Subscribe to registrations. Fires exactly once per newly allocated
    /// name, synchronously, during [`style`](Self::style).
    pub fn on_atomic_style_registered(&mut self, listener: impl FnMut(&AtomicStyle) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        let listener: Listener = Box::new(listener);
        self.listeners.push((id, listener));
        id
    }

    /// Unsubscribe. Returns `false` if the listener was already removed.
    pub fn off_atomic_style_registered(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Global styles & rendering
    // ───────────────────────────────────────────────────────────────────────────

    /// Append pre-formed CSS, outside the atomic pipeline.
    ///
    /// Whitespace runs collapse to one space; blank input is ignored.
    pub fn add_global_style(&mut self, css: &str) {
        let minified = css.split_whitespace().collect::<Vec<_>>().join(" ");
        if !minified.is_empty() {
            self.global_styles.push(minified);
        }
    }

    /// Global CSS, concatenated in insertion order.
    #[must_use]
    pub fn render_global_styles(&self) -> String {
        self.global_styles.concat()
    }

    /// CSS for every registered atomic style, grouped by nesting.
    #[must_use]
    pub fn render_atomic_styles(&self) -> String {
        render::render_atomic_styles(&self.registry)
    }

    /// Global then atomic CSS, each non-empty section bracketed with marker comments.
    #[must_use]
    pub fn render_styles(&self) -> String {
        let mut out = String::new();
        let global = self.render_global_styles();
        if !global.is_empty() {
            out.push_str("/* atoma global styles start */");
            out.push_str(&global);
            out.push_str("/* atoma global styles end */");
        }
        let atomic = self.render_atomic_styles();
        if !atomic.is_empty() {
            out.push_str("/* atoma atomic styles start */");
            out.push_str(&atomic);
            out.push_str("/* atoma atomic styles end */");
        }
        out
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Introspection & configuration
    // ───────────────────────────────────────────────────────────────────────────

    /// Re-check the configuration: default selectors carry the placeholder
    /// and no static alias or shortcut chain is cyclic.
    ///
    /// # Errors
    ///
    /// Same as [`EngineBuilder::build`].
    pub fn validate(&mut self) -> Result<(), EngineError> {
        validate::check_selectors(self.extractor.default_selector())?;
        validate::check_alias_cycles("nesting alias", &mut self.resolvers.nesting_aliases)?;
        validate::check_alias_cycles("selector alias", &mut self.resolvers.selector_aliases)?;
        validate::check_shortcut_cycles(&mut self.resolvers.shortcuts)
    }

    /// Name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Default nesting levels.
    pub fn default_nesting(&self) -> &[String] {
        self.extractor.default_nesting()
    }

    /// Default selector templates.
    pub fn default_selector(&self) -> &[String] {
        self.extractor.default_selector()
    }

    /// Default `!important` flag.
    pub fn default_important(&self) -> bool {
        self.extractor.default_important()
    }

    /// Nesting alias rules.
    pub fn nesting_aliases(&self) -> &AliasResolver {
        &self.resolvers.nesting_aliases
    }

    /// Mutable nesting alias rules. Changes apply to later lookups.
    pub fn nesting_aliases_mut(&mut self) -> &mut AliasResolver {
        &mut self.resolvers.nesting_aliases
    }

    /// Selector alias rules.
    pub fn selector_aliases(&self) -> &AliasResolver {
        &self.resolvers.selector_aliases
    }

    /// Mutable selector alias rules. Changes apply to later lookups.
    pub fn selector_aliases_mut(&mut self) -> &mut AliasResolver {
        &mut self.resolvers.selector_aliases
    }

    /// Shortcut rules.
    pub fn shortcuts(&self) -> &ShortcutResolver {
        &self.resolvers.shortcuts
    }

    /// Mutable shortcut rules. Changes apply to later lookups.
    pub fn shortcuts_mut(&mut self) -> &mut ShortcutResolver {
        &mut self.resolvers.shortcuts
    }

    /// Registered atomic styles, in registration order.
    pub fn atomic_styles(&self) -> &[AtomicStyle] {
        &self.registry
    }

    /// Look up a registered style by name.
    pub fn atomic_style(&self, name: &str) -> Option<&AtomicStyle> {
        self.registered.get(name).map(|&index| &self.registry[index])
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("prefix", &self.prefix)
            .field("extractor", &self.extractor)
            .field("resolvers", &self.resolvers)
            .field("global_styles", &self.global_styles.len())
            .field("registered", &self.registry.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ═══════════════════════════════════════════════════════════════════════════════

/// One expansion pass over the engine's resolvers.
///
/// Borrowing the extractor and the resolvers separately lets shortcut
/// expansion recurse back into the pipeline without touching the registry.
struct Pipeline<'a> {
    extractor: &'a StyleGroupExtractor,
    resolvers: &'a mut Resolvers,
    /// Shortcuts currently being expanded, outermost first.
    active: Vec<String>,
}

impl Pipeline<'_> {
    fn resolve_items(&mut self, items: &[StyleItem]) -> Vec<AtomicStyleContent> {
        let mut list = Vec::new();
        for item in items {
            match item {
                StyleItem::Shortcut(name) => list.extend(self.expand_shortcut(name)),
                StyleItem::Group(group) => {
                    let extractor = self.extractor;
                    list.extend(extractor.extract(group, self));
                }
            }
        }
        optimize(list)
    }
}

impl ExtractContext for Pipeline<'_> {
    fn resolve_nesting_alias(&mut self, alias: &str) -> Option<Vec<String>> {
        self.resolvers.nesting_aliases.resolve_alias(alias)
    }

    fn resolve_selector_alias(&mut self, alias: &str) -> Option<Vec<String>> {
        self.resolvers.selector_aliases.resolve_alias(alias)
    }

    fn expand_shortcut(&mut self, name: &str) -> Vec<AtomicStyleContent> {
        if self.active.iter().any(|active| active == name) {
            tracing::warn!(shortcut = name, "shortcut refers back to itself, ignoring");
            return Vec::new();
        }
        if self.active.len() >= MAX_EXPANSION_DEPTH {
            tracing::warn!(
                shortcut = name,
                max = MAX_EXPANSION_DEPTH,
                "shortcut expansion too deep, ignoring"
            );
            return Vec::new();
        }

        let items = self.resolvers.shortcuts.resolve_shortcut(name);
        if items.is_empty() {
            tracing::debug!(shortcut = name, "unknown shortcut produces no styles");
            return Vec::new();
        }

        self.active.push(name.to_owned());
        let list = self.resolve_items(&items);
        self.active.pop();
        list
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Optimization & naming
// ═══════════════════════════════════════════════════════════════════════════════

/// The override pass: last identity wins, unset deletes.
///
/// Records are keyed by [`identity`](AtomicStyleContent::identity):
///
/// - first occurrence inserts
/// - a later occurrence with a value replaces and moves to the end
/// - a later unset occurrence deletes the identity
///
/// The result keeps the order in which survivors were last inserted.
#[must_use]
pub fn optimize(list: Vec<AtomicStyleContent>) -> Vec<AtomicStyleContent> {
    let mut slots: Vec<Option<AtomicStyleContent>> = Vec::with_capacity(list.len());
    let mut index = HashMap::new();

    for content in list {
        let key = content.identity();
        match index.get(&key).copied() {
            None => {
                index.insert(key, slots.len());
                slots.push(Some(content));
            }
            Some(previous) => {
                slots[previous] = None;
                if content.is_unset() {
                    index.remove(&key);
                } else {
                    index.insert(key, slots.len());
                    slots.push(Some(content));
                }
            }
        }
    }

    slots.into_iter().flatten().collect()
}

/// Bijective base-26: 0 → `a`, 25 → `z`, 26 → `aa`, 701 → `zz`, 702 → `aaa`.
pub(crate) fn number_to_alphabets(mut n: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

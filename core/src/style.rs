//! Style items, style groups and atomic style records.
//!
//! - [`StyleItem`] = what callers pass to [`Engine::style`](crate::Engine::style)
//! - [`StyleGroup`] = one property bag with optional nesting/selector/important overrides
//! - [`AtomicStyleContent`] = one normalized declaration with its full context
//! - [`AtomicStyle`] = a registered content with its allocated name

use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// PropertyValue
// ═══════════════════════════════════════════════════════════════════════════════

/// The value of one CSS property.
///
/// `Many` renders as several declarations sharing the property name,
/// e.g. vendor fallbacks (`display:-webkit-box;display:flex`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// A single declaration.
    One(String),
    /// One declaration per entry, in order.
    Many(Vec<String>),
}

impl PropertyValue {
    /// Iterate the rendered values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::One(v) => std::slice::from_ref(v),
            Self::Many(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }

    #[cfg(feature = "config")]
    pub(crate) fn map_strings(&self, f: impl Fn(&str) -> String) -> Self {
        match self {
            Self::One(v) => Self::One(f(v)),
            Self::Many(vs) => Self::Many(vs.iter().map(|v| f(v)).collect()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(v) => f.write_str(v),
            Self::Many(vs) => write!(f, "[{}]", vs.join(", ")),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::One(s.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::One(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::One(n.to_string())
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        Self::One(n.to_string())
    }
}

impl From<u32> for PropertyValue {
    fn from(n: u32) -> Self {
        Self::One(n.to_string())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::One(n.to_string())
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(vs: Vec<String>) -> Self {
        Self::Many(vs)
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(vs: Vec<&str>) -> Self {
        Self::Many(vs.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PropertyValue {
    fn from(vs: [&str; N]) -> Self {
        Self::Many(vs.into_iter().map(str::to_owned).collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// StyleGroup
// ═══════════════════════════════════════════════════════════════════════════════

/// One property bag plus its control keys.
///
/// Control keys (`nesting`, `selector`, `important`, `apply`) fall back to
/// the engine defaults when absent. Properties keep their insertion order;
/// setting an existing property replaces its value in place.
///
/// # Example
///
/// ```
/// use atoma::StyleGroup;
///
/// let group = StyleGroup::new()
///     .nesting(["@media (min-width: 300px)"])
///     .selector([".aaa .{a}"])
///     .important(false)
///     .apply(["center"])
///     .set("color", "blue")
///     .unset("display");
///
/// assert_eq!(group.properties().count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleGroup {
    pub(crate) nesting: Option<Vec<String>>,
    pub(crate) selector: Option<Vec<String>>,
    pub(crate) important: Option<bool>,
    pub(crate) apply: Vec<String>,
    pub(crate) properties: Vec<(String, Option<PropertyValue>)>,
}

impl StyleGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the nesting with these tokens (each may be an alias).
    #[must_use]
    pub fn nesting<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nesting = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Override the selector templates with these tokens (each may be an alias).
    #[must_use]
    pub fn selector<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selector = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Override the `!important` flag.
    #[must_use]
    pub fn important(mut self, important: bool) -> Self {
        self.important = Some(important);
        self
    }

    /// Merge in these shortcuts before the group's own properties.
    #[must_use]
    pub fn apply<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set a property. The name is normalized to kebab-case at extraction.
    #[must_use]
    pub fn set(self, property: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.put(property.into(), Some(value.into()))
    }

    /// Mark a property as unset: it suppresses any earlier value of the same
    /// identity within one `style()` call.
    #[must_use]
    pub fn unset(self, property: impl Into<String>) -> Self {
        self.put(property.into(), None)
    }

    pub(crate) fn put(mut self, property: String, value: Option<PropertyValue>) -> Self {
        match self.properties.iter_mut().find(|(name, _)| *name == property) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((property, value)),
        }
        self
    }

    /// The nesting override tokens, if any.
    pub fn nesting_override(&self) -> Option<&[String]> {
        self.nesting.as_deref()
    }

    /// The selector override tokens, if any.
    pub fn selector_override(&self) -> Option<&[String]> {
        self.selector.as_deref()
    }

    /// The important override, if any.
    pub fn important_override(&self) -> Option<bool> {
        self.important
    }

    /// Shortcut names merged in before the group's own properties.
    pub fn applied(&self) -> &[String] {
        &self.apply
    }

    /// Declared properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, Option<&PropertyValue>)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// StyleItem
// ═══════════════════════════════════════════════════════════════════════════════

/// Input to the style pipeline: a shortcut name or a literal group.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleItem {
    /// A shortcut name, expanded through the [`ShortcutResolver`](crate::ShortcutResolver).
    Shortcut(String),
    /// A literal style group.
    Group(StyleGroup),
}

impl From<&str> for StyleItem {
    fn from(name: &str) -> Self {
        Self::Shortcut(name.to_owned())
    }
}

impl From<String> for StyleItem {
    fn from(name: String) -> Self {
        Self::Shortcut(name)
    }
}

impl From<StyleGroup> for StyleItem {
    fn from(group: StyleGroup) -> Self {
        Self::Group(group)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// AtomicStyleContent
// ═══════════════════════════════════════════════════════════════════════════════

/// One declaration with its full rendering context.
///
/// Equality and hashing cover every field: this is the "full key" used for
/// name allocation. [`identity`](Self::identity) drops the value and is used
/// for override grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomicStyleContent {
    /// Wrapping at-rules, outer to inner. Empty means no wrapping.
    pub nesting: Vec<String>,
    /// Selector templates containing the name placeholder.
    pub selector: Vec<String>,
    /// Whether declarations get `!important`.
    pub important: bool,
    /// Canonical (kebab-case) property name.
    pub property: String,
    /// `None` is an override marker: "drop this identity from the current call".
    pub value: Option<PropertyValue>,
}

impl AtomicStyleContent {
    /// The override-grouping key: everything but the value.
    #[must_use]
    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            nesting: self.nesting.clone(),
            selector: self.selector.clone(),
            important: self.important,
            property: self.property.clone(),
        }
    }

    /// Returns `true` if this record is an override marker.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.value.is_none()
    }
}

/// `(nesting, selector, important, property)`: content without its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    /// Wrapping at-rules.
    pub nesting: Vec<String>,
    /// Selector templates.
    pub selector: Vec<String>,
    /// `!important` flag.
    pub important: bool,
    /// Property name.
    pub property: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// AtomicStyle
// ═══════════════════════════════════════════════════════════════════════════════

/// A registered atomic style. Created once per distinct content, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicStyle {
    /// The allocated name (prefix + base-26 letters).
    pub name: String,
    /// What the name renders to.
    pub content: AtomicStyleContent,
}

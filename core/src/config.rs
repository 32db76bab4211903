//! Config types for declarative engine construction.
//!
//! These types mirror the builder API but are serde-deserializable, enabling
//! config-driven engines via [`Engine::from_config()`](crate::Engine::from_config).
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type |
//! |-------------|--------------|
//! | [`EngineConfig`] | [`EngineBuilder`](crate::EngineBuilder) |
//! | [`PresetConfig`] | [`Preset`](crate::Preset) |
//! | [`AliasRuleConfig`] | [`Rule<Vec<String>>`](crate::Rule) |
//! | [`ShortcutRuleConfig`] | [`Rule<Vec<StyleItem>>`](crate::Rule) |
//!
//! Dynamic rule values are templates: every string is expanded against the
//! pattern's captures with [`Captures::expand`] syntax (`$1`, `${name}`).

use std::fmt;

use regex::Captures;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::{
    DynamicRule, Engine, EngineBuilder, EngineError, Preset, PropertyValue, Rule, StaticRule, StyleGroup,
    StyleItem,
};

/// Either a single value or a list.
///
/// ```json
/// "@media print"
/// ["@media print", "@supports (display: grid)"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single value.
    One(T),
    /// A list of values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Flatten into a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Top-level engine configuration.
///
/// ```json
/// {
///   "prefix": "x-",
///   "default_selector": ".{a}",
///   "aliases": { "nesting": [{ "type": "static", "key": "sm", "alias": "@sm", "value": "@media (min-width: 640px)" }] },
///   "shortcuts": [{ "type": "static", "key": "center", "name": "center", "value": { "display": "flex" } }]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Prefix for allocated names.
    pub prefix: String,
    /// Default nesting levels. Absent means none.
    pub default_nesting: Option<OneOrMany<String>>,
    /// Default selector templates. Absent means `.{a}`.
    pub default_selector: Option<OneOrMany<String>>,
    /// Default `!important` flag.
    pub default_important: bool,
    /// Presets, installed before this config's own rules.
    pub presets: Vec<PresetConfig>,
    /// Nesting and selector alias rules.
    pub aliases: AliasesConfig,
    /// Shortcut rules.
    pub shortcuts: Vec<ShortcutRuleConfig>,
    /// Global CSS.
    pub global_styles: Vec<String>,
}

impl EngineConfig {
    /// Parse a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the JSON does not match the
    /// config shape.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig { message: e.to_string() })
    }

    /// Convert into a builder.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPattern`] if a dynamic rule's pattern
    /// does not compile.
    pub fn into_builder(self) -> Result<EngineBuilder, EngineError> {
        let mut builder = EngineBuilder::new()
            .prefix(self.prefix)
            .default_important(self.default_important);
        if let Some(nesting) = self.default_nesting {
            builder = builder.default_nesting(nesting.into_vec());
        }
        if let Some(selector) = self.default_selector {
            builder = builder.default_selector(selector.into_vec());
        }
        for preset in self.presets {
            builder = builder.preset(preset.into_preset()?);
        }
        for rule in self.aliases.nesting {
            builder = builder.nesting_alias(rule.into_rule()?);
        }
        for rule in self.aliases.selector {
            builder = builder.selector_alias(rule.into_rule()?);
        }
        for rule in self.shortcuts {
            builder = builder.shortcut(rule.into_rule()?);
        }
        for css in self.global_styles {
            builder = builder.global_style(css);
        }
        Ok(builder)
    }
}

/// A reusable configuration fragment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresetConfig {
    /// Preset name, for diagnostics.
    pub name: String,
    /// Nested presets, installed first.
    pub presets: Vec<PresetConfig>,
    /// Nesting and selector alias rules.
    pub aliases: AliasesConfig,
    /// Shortcut rules.
    pub shortcuts: Vec<ShortcutRuleConfig>,
    /// Global CSS.
    pub global_styles: Vec<String>,
}

impl PresetConfig {
    /// Convert into a runtime preset.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPattern`] if a dynamic rule's pattern
    /// does not compile.
    pub fn into_preset(self) -> Result<Preset, EngineError> {
        let mut preset = Preset::new(self.name);
        for nested in self.presets {
            preset = preset.preset(nested.into_preset()?);
        }
        for rule in self.aliases.nesting {
            preset = preset.nesting_alias(rule.into_rule()?);
        }
        for rule in self.aliases.selector {
            preset = preset.selector_alias(rule.into_rule()?);
        }
        for rule in self.shortcuts {
            preset = preset.shortcut(rule.into_rule()?);
        }
        for css in self.global_styles {
            preset = preset.global_style(css);
        }
        Ok(preset)
    }
}

/// The two alias tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AliasesConfig {
    /// Nesting alias rules.
    pub nesting: Vec<AliasRuleConfig>,
    /// Selector alias rules.
    pub selector: Vec<AliasRuleConfig>,
}

/// Configuration for an alias rule.
///
/// Uses `#[serde(tag = "type")]` for discriminated union deserialization:
///
/// ```json
/// { "type": "static", "key": "sm", "alias": "@sm", "value": "@media (min-width: 640px)" }
/// { "type": "dynamic", "key": "mw", "pattern": "^@mw-(\\d+)$", "examples": ["@mw-300"], "value": "@media (min-width: ${1}px)" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum AliasRuleConfig {
    /// Exact-match alias.
    Static {
        /// Unique rule key.
        key: String,
        /// The alias string.
        alias: String,
        /// What it expands to.
        value: OneOrMany<String>,
    },
    /// Pattern alias.
    Dynamic {
        /// Unique rule key.
        key: String,
        /// Regex the alias is matched against.
        pattern: String,
        /// Example inputs.
        #[serde(default)]
        examples: Vec<String>,
        /// Templates expanded against the captures.
        value: OneOrMany<String>,
    },
}

impl AliasRuleConfig {
    /// Convert into a runtime rule.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPattern`] if the pattern does not compile.
    pub fn into_rule(self) -> Result<Rule<Vec<String>>, EngineError> {
        match self {
            Self::Static { key, alias, value } => Ok(Rule::Static(StaticRule::new(key, alias, value.into_vec()))),
            Self::Dynamic {
                key,
                pattern,
                examples,
                value,
            } => {
                let templates = value.into_vec();
                let rule = DynamicRule::new(key, &pattern, examples, move |caps: &Captures<'_>| {
                    expand_all(caps, &templates)
                })?;
                Ok(Rule::Dynamic(rule))
            }
        }
    }
}

/// Configuration for a shortcut rule.
///
/// ```json
/// { "type": "static", "key": "btn", "name": "btn", "value": ["center", { "padding": "4px" }] }
/// { "type": "dynamic", "key": "px", "pattern": "^px-\\[(.*)\\]$", "value": { "paddingLeft": "$1", "paddingRight": "$1" } }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ShortcutRuleConfig {
    /// Exact-match shortcut.
    Static {
        /// Unique rule key.
        key: String,
        /// The shortcut name.
        name: String,
        /// Style items it expands to.
        value: OneOrMany<StyleItem>,
    },
    /// Pattern shortcut.
    Dynamic {
        /// Unique rule key.
        key: String,
        /// Regex the name is matched against.
        pattern: String,
        /// Example inputs.
        #[serde(default)]
        examples: Vec<String>,
        /// Item templates expanded against the captures.
        value: OneOrMany<StyleItem>,
    },
}

impl ShortcutRuleConfig {
    /// Convert into a runtime rule.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPattern`] if the pattern does not compile.
    pub fn into_rule(self) -> Result<Rule<Vec<StyleItem>>, EngineError> {
        match self {
            Self::Static { key, name, value } => Ok(Rule::Static(StaticRule::new(key, name, value.into_vec()))),
            Self::Dynamic {
                key,
                pattern,
                examples,
                value,
            } => {
                let templates = value.into_vec();
                let rule = DynamicRule::new(key, &pattern, examples, move |caps: &Captures<'_>| {
                    templates.iter().map(|item| expand_item(caps, item)).collect::<Vec<_>>()
                })?;
                Ok(Rule::Dynamic(rule))
            }
        }
    }
}

impl Engine {
    /// Build an engine from declarative config.
    ///
    /// # Errors
    ///
    /// Any error of [`EngineConfig::into_builder`] or [`EngineBuilder::build`].
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.into_builder()?.build()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Template expansion
// ═══════════════════════════════════════════════════════════════════════════════

fn expand(caps: &Captures<'_>, template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    caps.expand(template, &mut out);
    out
}

fn expand_all(caps: &Captures<'_>, templates: &[String]) -> Vec<String> {
    templates.iter().map(|t| expand(caps, t)).collect()
}

fn expand_item(caps: &Captures<'_>, item: &StyleItem) -> StyleItem {
    match item {
        StyleItem::Shortcut(name) => StyleItem::Shortcut(expand(caps, name)),
        StyleItem::Group(group) => StyleItem::Group(StyleGroup {
            nesting: group.nesting.as_deref().map(|t| expand_all(caps, t)),
            selector: group.selector.as_deref().map(|t| expand_all(caps, t)),
            important: group.important,
            apply: expand_all(caps, &group.apply),
            properties: group
                .properties
                .iter()
                .map(|(name, value)| {
                    let value = value.as_ref().map(|v| v.map_strings(|s| expand(caps, s)));
                    (name.clone(), value)
                })
                .collect(),
        }),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Style item deserialization
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    List(Vec<String>),
}

impl From<RawValue> for PropertyValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Text(s) => s.into(),
            RawValue::Integer(n) => n.into(),
            RawValue::Float(n) => n.into(),
            RawValue::List(values) => values.into(),
        }
    }
}

/// A style item is a shortcut name (string) or a style group (map).
impl<'de> Deserialize<'de> for StyleItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawItem {
            Shortcut(String),
            Group(StyleGroup),
        }

        Ok(match RawItem::deserialize(deserializer)? {
            RawItem::Shortcut(name) => Self::Shortcut(name),
            RawItem::Group(group) => Self::Group(group),
        })
    }
}

/// Control keys are recognized by name; every other key is a property, kept
/// in document order. `null` marks the property unset.
impl<'de> Deserialize<'de> for StyleGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(StyleGroupVisitor)
    }
}

struct StyleGroupVisitor;

impl<'de> Visitor<'de> for StyleGroupVisitor {
    type Value = StyleGroup;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of control keys and CSS properties")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<StyleGroup, A::Error> {
        let mut group = StyleGroup::new();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "nesting" => group.nesting = Some(map.next_value::<OneOrMany<String>>()?.into_vec()),
                "selector" => group.selector = Some(map.next_value::<OneOrMany<String>>()?.into_vec()),
                "important" => group.important = Some(map.next_value()?),
                "apply" => group.apply.extend(map.next_value::<OneOrMany<String>>()?.into_vec()),
                _ => {
                    if key.is_empty() {
                        return Err(de::Error::custom("property name must not be empty"));
                    }
                    let value = map.next_value::<Option<RawValue>>()?;
                    group = group.put(key, value.map(PropertyValue::from));
                }
            }
        }
        Ok(group)
    }
}

//! atoma - atomic CSS generation engine
//!
//! Turns high-level style items (property bags, shortcut names, nesting and
//! selector aliases) into a deduplicated set of single-declaration CSS rules
//! ("atomic styles") and the CSS text that renders them.
//!
//! # Pipeline
//!
//! The engine is a small compiler:
//!
//! - [`RuleTable<T>`] — Static (exact) and dynamic (regex) rules, first-match-wins
//! - [`AliasResolver`] — Expands nesting/selector aliases to literal strings, recursively
//! - [`ShortcutResolver`] — Expands shortcut names to lists of [`StyleItem`]s
//! - [`StyleGroupExtractor`] — Normalizes one [`StyleGroup`] into [`AtomicStyleContent`] records
//! - [`Engine`] — Override pass, name allocation, registry, CSS generation
//!
//! # Key Invariants
//!
//! 1. **Last identity wins**: within one [`Engine::style`] call, a later record with the
//!    same (nesting, selector, important, property) replaces the earlier one. An unset
//!    value removes the identity from the call's output entirely.
//!
//! 2. **Name bijection**: every distinct content (identity + value) gets exactly one name,
//!    allocated as `prefix + a, b, ..., z, aa, ab, ...`. Names are never reused.
//!
//! 3. **No runtime errors**: unknown aliases are literals, unknown shortcuts expand to
//!    nothing. Only construction and validation return [`EngineError`].
//!
//! # Example
//!
//! ```
//! use atoma::prelude::*;
//!
//! let mut engine = EngineBuilder::new().build().unwrap();
//!
//! let names = engine.style([StyleGroup::new()
//!     .set("color", "red")
//!     .set("backgroundColor", "red")]);
//! assert_eq!(names, vec!["a", "b"]);
//!
//! let css = engine.render_atomic_styles();
//! assert_eq!(css, ".a{color:red}.b{background-color:red}");
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod alias;
mod engine;
mod extract;
mod preset;
mod render;
mod rule_table;
mod shortcut;
mod style;
mod validate;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use alias::AliasResolver;
pub use engine::{optimize, Engine, EngineBuilder, ListenerId};
pub use extract::{normalize_property, ExtractContext, StyleGroupExtractor};
pub use preset::Preset;
pub use render::wrap_with_nesting;
pub use rule_table::{DynamicRule, Resolved, Rule, RuleTable, StaticRule};
pub use shortcut::ShortcutResolver;
pub use style::{AtomicStyle, AtomicStyleContent, IdentityKey, PropertyValue, StyleGroup, StyleItem};

#[cfg(feature = "config")]
pub use config::{AliasRuleConfig, AliasesConfig, EngineConfig, OneOrMany, PresetConfig, ShortcutRuleConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use atoma::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AliasResolver, AtomicStyle, AtomicStyleContent, DynamicRule, Engine, EngineBuilder,
        EngineError, Preset, PropertyValue, Rule, RuleTable, ShortcutResolver, StaticRule,
        StyleGroup, StyleItem,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Placeholder replaced by the allocated atomic style name in selector templates.
///
/// External templates must contain this literal substring, e.g. `".{a}"` or
/// `"[data-atoma~=\"{a}\"]"`.
pub const ATOMIC_STYLE_NAME_PLACEHOLDER: &str = "{a}";

/// Default selector template: a class selector on the allocated name.
pub const DEFAULT_SELECTOR: &str = ".{a}";

/// Maximum depth of recursive alias or shortcut expansion.
///
/// A token already being expanded higher up the chain is never expanded
/// again, so cycles stop at their first repeat. This bound catches chains
/// that never repeat, such as a dynamic rule producing ever-new tokens.
/// Past either limit the token is treated as unresolved and a warning is
/// logged. Static cycles are rejected earlier by [`EngineBuilder::build`].
pub const MAX_EXPANSION_DEPTH: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from engine construction, configuration and validation.
///
/// The style and render paths never fail; these are caught when the engine
/// is built. Fix the configuration and rebuild.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A dynamic rule's pattern is not a valid regex.
    #[error("invalid pattern \"{pattern}\": {message}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        message: String,
    },

    /// Configuration deserialization or construction failed.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// The underlying error message.
        message: String,
    },

    /// A default selector template lacks [`ATOMIC_STYLE_NAME_PLACEHOLDER`].
    #[error("selector template \"{selector}\" does not contain the \"{{a}}\" placeholder")]
    MissingPlaceholder {
        /// The offending selector template.
        selector: String,
    },

    /// A static alias or shortcut chain refers back to itself.
    #[error("cycle detected in {table} rules: {}", path.join(" -> "))]
    CycleDetected {
        /// Which table the cycle lives in (`"nesting alias"`, `"selector alias"`, `"shortcut"`).
        table: &'static str,
        /// The chain of match strings, starting and ending at the same entry.
        path: Vec<String>,
    },
}

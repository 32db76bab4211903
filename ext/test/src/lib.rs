//! atoma-test: Reference presets for conformance testing
//!
//! Provides a small but realistic preset (breakpoints, state selectors,
//! layout shortcuts) and a listener recorder. This is the reference
//! extension that demonstrates how to package atoma presets.
//!
//! # Example
//!
//! ```
//! use atoma_test::prelude::*;
//!
//! let mut engine = reference_engine().unwrap();
//! let recorder = Recorder::attach(&mut engine);
//!
//! let names = engine.style(["btn-primary"]);
//! assert_eq!(recorder.names(), names);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use atoma::prelude::*;
use regex::Captures;

#[cfg(feature = "fixtures")]
pub mod config_fixture;
#[cfg(feature = "fixtures")]
pub mod fixture;

/// Breakpoint media queries, smallest first.
pub const BREAKPOINTS: [(&str, &str); 3] = [
    ("@sm", "@media (min-width: 640px)"),
    ("@md", "@media (min-width: 768px)"),
    ("@lg", "@media (min-width: 1024px)"),
];

/// Nesting aliases: breakpoints, `@dark`, `@mw-<px>`, and `@wide` (an alias of `@lg`).
///
/// # Errors
///
/// Returns [`EngineError::InvalidPattern`] if a dynamic pattern fails to compile.
pub fn breakpoints_preset() -> Result<Preset, EngineError> {
    let mut preset = Preset::new("breakpoints");
    for (alias, query) in BREAKPOINTS {
        preset = preset.nesting_alias(AliasResolver::static_rule(&alias[1..], alias, [query]));
    }
    let preset = preset
        .nesting_alias(AliasResolver::static_rule(
            "dark",
            "@dark",
            ["@media (prefers-color-scheme: dark)"],
        ))
        .nesting_alias(AliasResolver::static_rule("wide", "@wide", ["@lg"]))
        .nesting_alias(AliasResolver::dynamic_rule(
            "mw",
            r"^@mw-(\d+)$",
            ["@mw-300"],
            |c: &Captures<'_>| vec![format!("@media (min-width: {}px)", &c[1])],
        )?);
    Ok(preset)
}

/// Selector aliases: `hover`, `focus`, `group-hover`, and `interactive`
/// (which expands to both `hover` and `focus`).
#[must_use]
pub fn states_preset() -> Preset {
    Preset::new("states")
        .selector_alias(AliasResolver::static_rule("hover", "hover", [".{a}:hover"]))
        .selector_alias(AliasResolver::static_rule("focus", "focus", [".{a}:focus"]))
        .selector_alias(AliasResolver::static_rule("group-hover", "group-hover", [".group:hover .{a}"]))
        .selector_alias(AliasResolver::static_rule("interactive", "interactive", ["hover", "focus"]))
}

/// Layout shortcuts: `center`, `btn`, `btn-primary`, `card`, `px-<n>`, `py-<n>`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPattern`] if a dynamic pattern fails to compile.
pub fn layout_preset() -> Result<Preset, EngineError> {
    let preset = Preset::new("layout")
        .shortcut(ShortcutResolver::static_rule(
            "center",
            "center",
            [StyleGroup::new()
                .set("display", "flex")
                .set("alignItems", "center")
                .set("justifyContent", "center")
                .into()],
        ))
        .shortcut(ShortcutResolver::static_rule(
            "btn",
            "btn",
            [StyleGroup::new()
                .apply(["center"])
                .set("display", "inline-flex")
                .set("borderRadius", "4px")
                .into()],
        ))
        .shortcut(ShortcutResolver::static_rule(
            "btn-primary",
            "btn-primary",
            [
                StyleItem::from("btn"),
                StyleGroup::new().set("backgroundColor", "blue").set("color", "white").into(),
            ],
        ))
        .shortcut(ShortcutResolver::static_rule(
            "card",
            "card",
            [
                StyleItem::from("px-4"),
                StyleItem::from("py-2"),
                StyleGroup::new().set("borderRadius", "8px").into(),
            ],
        ))
        .shortcut(spacing_rule("px", "paddingLeft", "paddingRight")?)
        .shortcut(spacing_rule("py", "paddingTop", "paddingBottom")?);
    Ok(preset)
}

/// `<prefix>-<n>` sets two sides to `n * 4` pixels.
fn spacing_rule(
    prefix: &'static str,
    first: &'static str,
    second: &'static str,
) -> Result<DynamicRule<Vec<StyleItem>>, EngineError> {
    let pattern = format!(r"^{prefix}-(\d+)$");
    ShortcutResolver::dynamic_rule(prefix, &pattern, [format!("{prefix}-4")], move |c: &Captures<'_>| {
        let px = c[1].parse::<u32>().map_or_else(|_| c[1].to_string(), |n| format!("{}px", n * 4));
        vec![StyleGroup::new().set(first, px.as_str()).set(second, px).into()]
    })
}

/// All reference presets combined.
///
/// # Errors
///
/// Same as [`breakpoints_preset`] and [`layout_preset`].
pub fn reference_preset() -> Result<Preset, EngineError> {
    Ok(Preset::new("reference")
        .preset(breakpoints_preset()?)
        .preset(states_preset())
        .preset(layout_preset()?))
}

/// An engine with [`reference_preset`] installed and default settings.
///
/// # Errors
///
/// Propagates [`EngineError`] from [`EngineBuilder::build`].
pub fn reference_engine() -> Result<Engine, EngineError> {
    EngineBuilder::new().preset(reference_preset()?).build()
}

/// Records every registration event of an engine.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    styles: Rc<RefCell<Vec<AtomicStyle>>>,
}

impl Recorder {
    /// Subscribe a new recorder to `engine`.
    pub fn attach(engine: &mut Engine) -> Self {
        let recorder = Self::default();
        let sink = Rc::clone(&recorder.styles);
        engine.on_atomic_style_registered(move |style| sink.borrow_mut().push(style.clone()));
        recorder
    }

    /// Names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.styles.borrow().iter().map(|s| s.name.clone()).collect()
    }

    /// Recorded styles in registration order.
    #[must_use]
    pub fn styles(&self) -> Vec<AtomicStyle> {
        self.styles.borrow().clone()
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{reference_engine, reference_preset, Recorder};
    pub use atoma::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_engine_builds() {
        let engine = reference_engine().unwrap();
        assert_eq!(engine.nesting_aliases().table().len(), 6);
        assert_eq!(engine.selector_aliases().table().len(), 4);
        assert_eq!(engine.shortcuts().table().len(), 6);
    }

    #[test]
    fn spacing_shortcut_scales() {
        let mut engine = reference_engine().unwrap();
        engine.style(["px-2"]);
        assert_eq!(
            engine.render_atomic_styles(),
            ".a{padding-left:8px}.b{padding-right:8px}"
        );
    }

    #[test]
    fn recorder_sees_each_name_once() {
        let mut engine = reference_engine().unwrap();
        let recorder = Recorder::attach(&mut engine);

        engine.style(["center"]);
        engine.style(["center"]);
        assert_eq!(recorder.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn interactive_expands_to_both_states() {
        let mut engine = reference_engine().unwrap();
        engine.style([StyleGroup::new().selector(["interactive"]).set("color", "red")]);
        assert_eq!(engine.render_atomic_styles(), ".a:hover,.a:focus{color:red}");
    }

    #[test]
    fn state_selectors_address_the_class() {
        let mut engine = reference_engine().unwrap();
        engine.style([
            StyleGroup::new().selector(["hover"]).set("color", "red"),
            StyleGroup::new().selector(["focus"]).set("display", "none"),
            StyleGroup::new().selector(["group-hover"]).set("opacity", 1),
        ]);
        assert_eq!(
            engine.render_atomic_styles(),
            ".a:hover{color:red}.b:focus{display:none}.group:hover .c{opacity:1}"
        );
    }

    #[test]
    fn examples_cover_static_and_dynamic() {
        let engine = reference_engine().unwrap();
        let examples = engine.shortcuts().table().examples();
        assert!(examples.contains(&"btn-primary"));
        assert!(examples.contains(&"px-4"));
    }
}

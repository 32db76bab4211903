//! CSS generation from registered atomic styles.
//!
//! Output is minified: no whitespace between rules, `property:value`
//! declarations joined with `;`.
//!
//! ```text
//! registry ──group by nesting──▶ group by body ──▶ selectors,joined{body} ──▶ wrap
//! ```

use std::collections::HashMap;

use crate::{AtomicStyle, AtomicStyleContent, ATOMIC_STYLE_NAME_PLACEHOLDER};

/// Wrap `body` in nesting levels, outer to inner.
///
/// Empty levels are skipped.
///
/// ```
/// use atoma::wrap_with_nesting;
///
/// let levels = ["@media (min-width: 640px)".to_string(), "@supports (display: grid)".to_string()];
/// assert_eq!(
///     wrap_with_nesting(&levels, ".a{color:red}"),
///     "@media (min-width: 640px){@supports (display: grid){.a{color:red}}}",
/// );
/// assert_eq!(wrap_with_nesting(&[], ".a{color:red}"), ".a{color:red}");
/// ```
#[must_use]
pub fn wrap_with_nesting(levels: &[String], body: &str) -> String {
    wrap(&nesting_key(levels), body)
}

/// The non-empty levels; records with equal keys render in one wrapper.
fn nesting_key(levels: &[String]) -> Vec<&str> {
    levels.iter().map(String::as_str).filter(|level| !level.is_empty()).collect()
}

fn wrap(levels: &[&str], body: &str) -> String {
    levels
        .iter()
        .rev()
        .fold(body.to_owned(), |inner, level| format!("{level}{{{inner}}}"))
}

/// `property:value` declarations for one record; `None` for override markers.
fn declarations(content: &AtomicStyleContent) -> Option<String> {
    let value = content.value.as_ref()?;
    let suffix = if content.important { " !important" } else { "" };
    Some(
        value
            .iter()
            .map(|v| format!("{}:{v}{suffix}", content.property))
            .collect::<Vec<_>>()
            .join(";"),
    )
}

/// Selector templates with the placeholder replaced by `name`.
///
/// Templates without the placeholder cannot address the style and are dropped.
fn selectors(name: &str, content: &AtomicStyleContent) -> Vec<String> {
    content
        .selector
        .iter()
        .filter(|template| template.contains(ATOMIC_STYLE_NAME_PLACEHOLDER))
        .map(|template| template.replace(ATOMIC_STYLE_NAME_PLACEHOLDER, name))
        .collect()
}

impl AtomicStyle {
    /// Render this style alone, wrapped in its nesting.
    ///
    /// Returns `None` if the content is an override marker or none of its
    /// selector templates carries the name placeholder.
    ///
    /// ```
    /// use atoma::{AtomicStyle, AtomicStyleContent};
    ///
    /// let style = AtomicStyle {
    ///     name: "a".into(),
    ///     content: AtomicStyleContent {
    ///         nesting: vec!["@media print".into()],
    ///         selector: vec![".{a}".into(), ".{a}:hover".into()],
    ///         important: true,
    ///         property: "color".into(),
    ///         value: Some("red".into()),
    ///     },
    /// };
    /// assert_eq!(style.to_css().unwrap(), "@media print{.a,.a:hover{color:red !important}}");
    /// ```
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        let body = declarations(&self.content)?;
        let selectors = selectors(&self.name, &self.content);
        if selectors.is_empty() {
            return None;
        }
        let rule = format!("{}{{{body}}}", selectors.join(","));
        Some(wrap_with_nesting(&self.content.nesting, &rule))
    }
}

/// Rules sharing one nesting context.
#[derive(Default)]
struct NestingGroup<'a> {
    /// Declaration bodies in first-seen order, each with its selectors.
    rules: Vec<(String, Vec<String>)>,
    by_body: HashMap<String, usize>,
    nesting: Vec<&'a str>,
}

impl NestingGroup<'_> {
    fn push(&mut self, body: String, selectors: Vec<String>) {
        match self.by_body.get(&body) {
            Some(&index) => self.rules[index].1.extend(selectors),
            None => {
                self.by_body.insert(body.clone(), self.rules.len());
                self.rules.push((body, selectors));
            }
        }
    }

    fn render(&self) -> String {
        let body: String = self
            .rules
            .iter()
            .map(|(body, selectors)| format!("{}{{{body}}}", selectors.join(",")))
            .collect();
        wrap(&self.nesting, &body)
    }
}

/// Render every style, grouped by nesting.
///
/// The un-nested group (including records whose levels are all empty)
/// comes first, then nested groups in first-seen order. Within a group, styles with an identical declaration body share
/// one comma-joined selector list.
pub(crate) fn render_atomic_styles(styles: &[AtomicStyle]) -> String {
    let mut groups: Vec<NestingGroup<'_>> = vec![NestingGroup::default()];
    let mut by_nesting: HashMap<Vec<&str>, usize> = HashMap::new();
    by_nesting.insert(Vec::new(), 0);

    for style in styles {
        let Some(body) = declarations(&style.content) else {
            continue;
        };
        let selectors = selectors(&style.name, &style.content);
        if selectors.is_empty() {
            tracing::debug!(name = %style.name, "no selector template carries the name placeholder, skipping");
            continue;
        }

        let nesting = nesting_key(&style.content.nesting);
        let index = match by_nesting.get(&nesting) {
            Some(&index) => index,
            None => {
                by_nesting.insert(nesting.clone(), groups.len());
                groups.push(NestingGroup {
                    nesting,
                    ..NestingGroup::default()
                });
                groups.len() - 1
            }
        };
        groups[index].push(body, selectors);
    }

    groups
        .iter()
        .filter(|group| !group.rules.is_empty())
        .map(NestingGroup::render)
        .collect()
}

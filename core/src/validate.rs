//! Configuration checks run by [`EngineBuilder::build`](crate::EngineBuilder::build)
//! and [`Engine::validate`](crate::Engine::validate).
//!
//! Cycle detection walks outward from every static rule's match string.
//! Dynamic rules take part as successors (a static alias may expand into a
//! token a pattern matches) but are not used as starting points: their input
//! space is open-ended. Walks stop at [`MAX_EXPANSION_DEPTH`], the same bound
//! the runtime guard uses.

use std::collections::HashSet;

use crate::{AliasResolver, EngineError, ShortcutResolver, StyleItem, ATOMIC_STYLE_NAME_PLACEHOLDER, MAX_EXPANSION_DEPTH};

/// Every template must carry the name placeholder.
pub(crate) fn check_selectors(templates: &[String]) -> Result<(), EngineError> {
    match templates.iter().find(|t| !t.contains(ATOMIC_STYLE_NAME_PLACEHOLDER)) {
        Some(template) => Err(EngineError::MissingPlaceholder {
            selector: template.clone(),
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_alias_cycles(table: &'static str, aliases: &mut AliasResolver) -> Result<(), EngineError> {
    let starts: Vec<String> = aliases.table().static_rules().map(|r| r.match_string.clone()).collect();
    let mut search = CycleSearch::new(|alias: &str| {
        aliases
            .lookup(alias)
            .map(|resolved| resolved.value)
            .unwrap_or_default()
    });
    search.run(table, &starts)
}

pub(crate) fn check_shortcut_cycles(shortcuts: &mut ShortcutResolver) -> Result<(), EngineError> {
    let starts: Vec<String> = shortcuts.table().static_rules().map(|r| r.match_string.clone()).collect();
    let mut search = CycleSearch::new(|name: &str| {
        let mut next = Vec::new();
        for item in shortcuts.resolve_shortcut(name) {
            match item {
                StyleItem::Shortcut(name) => next.push(name),
                StyleItem::Group(group) => next.extend(group.apply),
            }
        }
        next
    });
    search.run("shortcut", &starts)
}

/// Depth-first search for a back edge.
struct CycleSearch<F> {
    successors: F,
    path: Vec<String>,
    done: HashSet<String>,
}

impl<F: FnMut(&str) -> Vec<String>> CycleSearch<F> {
    fn new(successors: F) -> Self {
        Self {
            successors,
            path: Vec::new(),
            done: HashSet::new(),
        }
    }

    fn run(&mut self, table: &'static str, starts: &[String]) -> Result<(), EngineError> {
        for start in starts {
            if let Some(path) = self.visit(start) {
                return Err(EngineError::CycleDetected { table, path });
            }
        }
        Ok(())
    }

    fn visit(&mut self, node: &str) -> Option<Vec<String>> {
        if let Some(position) = self.path.iter().position(|n| n == node) {
            let mut cycle = self.path[position..].to_vec();
            cycle.push(node.to_owned());
            return Some(cycle);
        }
        if self.done.contains(node) || self.path.len() >= MAX_EXPANSION_DEPTH {
            return None;
        }

        self.path.push(node.to_owned());
        for next in (self.successors)(node) {
            if let Some(cycle) = self.visit(&next) {
                return Some(cycle);
            }
        }
        self.path.pop();
        self.done.insert(node.to_owned());
        None
    }
}

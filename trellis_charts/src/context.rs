// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Highlight, visibility, and color state shared by sibling charts.
//!
//! [`ChartContext`] is an immutable snapshot. [`ContextStore`] hands it out behind an [`Arc`] and
//! replaces it only when a setter produces a structurally different value, so setting the same
//! state twice is a no-op (and cannot drive a render loop).

use std::sync::Arc;

use hashbrown::HashMap;
use peniko::Color;

/// Immutable highlight/visibility/color state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartContext {
    /// Series keys currently highlighted.
    pub highlight_items: Vec<String>,
    /// Series keys currently hidden.
    pub disabled_items: Vec<String>,
    /// Per-series colors.
    pub colors_mapping: HashMap<String, Color>,
}

impl ChartContext {
    /// Returns `true` if `key` is highlighted.
    pub fn is_highlighted(&self, key: &str) -> bool {
        self.highlight_items.iter().any(|k| k == key)
    }

    /// Returns `true` if `key` is hidden.
    pub fn is_disabled(&self, key: &str) -> bool {
        self.disabled_items.iter().any(|k| k == key)
    }

    /// Color assigned to `key`, if any.
    pub fn color_for(&self, key: &str) -> Option<Color> {
        self.colors_mapping.get(key).copied()
    }

    /// The keys of `keys` that are not hidden, in order.
    pub fn visible_items<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        keys.into_iter()
            .filter(|k| !self.is_disabled(k))
            .map(str::to_owned)
            .collect()
    }
}

/// Owner of the current [`ChartContext`] snapshot.
#[derive(Clone, Debug, Default)]
pub struct ContextStore {
    snapshot: Arc<ChartContext>,
    version: u64,
}

impl ContextStore {
    /// A store holding the default (empty) context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store starting from `context`.
    pub fn with_context(context: ChartContext) -> Self {
        Self {
            snapshot: Arc::new(context),
            version: 0,
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<ChartContext> {
        Arc::clone(&self.snapshot)
    }

    /// Number of accepted changes so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces the highlighted keys. Returns `true` if anything changed.
    pub fn set_highlight_items(&mut self, items: Vec<String>) -> bool {
        self.update(|c| c.highlight_items = items)
    }

    /// Replaces the hidden keys. Returns `true` if anything changed.
    pub fn set_disabled_items(&mut self, items: Vec<String>) -> bool {
        self.update(|c| c.disabled_items = items)
    }

    /// Replaces the color mapping. Returns `true` if anything changed.
    pub fn set_colors_mapping(&mut self, colors: HashMap<String, Color>) -> bool {
        self.update(|c| c.colors_mapping = colors)
    }

    /// Hides `key` if visible, shows it if hidden.
    pub fn toggle_disabled(&mut self, key: &str) -> bool {
        self.update(|c| {
            if let Some(i) = c.disabled_items.iter().position(|k| k == key) {
                c.disabled_items.remove(i);
            } else {
                c.disabled_items.push(key.to_owned());
            }
        })
    }

    /// Replaces the whole snapshot. Returns `true` if anything changed.
    pub fn replace(&mut self, context: ChartContext) -> bool {
        self.update(|c| *c = context)
    }

    fn update(&mut self, f: impl FnOnce(&mut ChartContext)) -> bool {
        let mut next = ChartContext::clone(&self.snapshot);
        f(&mut next);
        if next == *self.snapshot {
            tracing::trace!(version = self.version, "context write conflated");
            return false;
        }
        self.snapshot = Arc::new(next);
        self.version += 1;
        tracing::debug!(version = self.version, "context updated");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::color::palette::css;

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn equal_writes_are_conflated() {
        let mut store = ContextStore::new();
        assert!(store.set_highlight_items(keys(&["a"])));
        let before = store.snapshot();
        assert!(!store.set_highlight_items(keys(&["a"])));
        assert_eq!(store.version(), 1);
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn snapshots_are_immutable() {
        let mut store = ContextStore::new();
        let old = store.snapshot();
        let mut colors = HashMap::new();
        colors.insert("a".to_owned(), css::RED);
        assert!(store.set_colors_mapping(colors));
        assert_eq!(old.color_for("a"), None);
        assert_eq!(store.snapshot().color_for("a"), Some(css::RED));
    }

    #[test]
    fn toggling_hides_and_shows() {
        let mut store = ContextStore::new();
        assert!(store.toggle_disabled("b"));
        let ctx = store.snapshot();
        assert!(ctx.is_disabled("b"));
        assert_eq!(ctx.visible_items(["a", "b", "c"]), keys(&["a", "c"]));
        assert!(store.toggle_disabled("b"));
        assert!(!store.snapshot().is_disabled("b"));
        assert_eq!(store.version(), 2);
    }
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for tick density.
//!
//! Tick selection normally assumes a fixed label width. Axes whose labels vary a lot in length
//! (long category names, large numbers) can measure the formatted labels instead and feed the
//! widest one into [`crate::TickSelector`].

/// Extent of a single line of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtent {
    /// Advance width.
    pub width: f64,
    /// Line height.
    pub height: f64,
}

/// A minimal text measurement interface.
pub trait TextMeasurer {
    /// Measures `text` at `font_size`, in the same units as the marks.
    fn measure(&self, text: &str, font_size: f64) -> TextExtent;

    /// Width of the widest of `labels`, or `0` when there are none.
    fn widest(&self, labels: &[String], font_size: f64) -> f64 {
        labels
            .iter()
            .map(|l| self.measure(l, font_size).width)
            .fold(0.0, f64::max)
    }
}

/// Heuristic measurer assuming ~0.6em average glyph width and a 1.2em line.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> TextExtent {
        TextExtent {
            width: 0.6 * font_size * text.chars().count() as f64,
            height: 1.2 * font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widest_picks_longest_label() {
        let labels = vec!["a".to_owned(), "abcd".to_owned(), "ab".to_owned()];
        let w = HeuristicTextMeasurer.widest(&labels, 10.0);
        assert!((w - 24.0).abs() < 1e-9, "unexpected width {w}");
        assert_eq!(HeuristicTextMeasurer.widest(&[], 10.0), 0.0);
    }
}

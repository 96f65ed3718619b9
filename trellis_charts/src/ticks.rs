// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adaptive tick selection.
//!
//! Given an ordered domain and the pixels available along the axis, [`TickSelector`] picks a
//! subset of domain entries to label:
//! - the first and last entries are always kept,
//! - the count never exceeds what fits at the configured label width (nor the requested count),
//! - interior picks are evenly spaced by index.
//!
//! The selection depends only on the domain length and the two counts, so labels stay put when
//! the container is resized within the same density bucket.

use crate::measure::TextMeasurer;

/// Estimated width of one tick label, in pixels.
pub const DEFAULT_LABEL_WIDTH: f64 = 80.0;

/// Tick count used when a chart does not request one.
pub const DEFAULT_TICK_COUNT: usize = 15;

/// Chooses which domain entries get a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickSelector {
    /// Pixels reserved per label along the axis.
    pub label_width: f64,
}

impl Default for TickSelector {
    fn default() -> Self {
        Self {
            label_width: DEFAULT_LABEL_WIDTH,
        }
    }
}

impl TickSelector {
    /// Creates a selector reserving `label_width` pixels per label.
    pub fn new(label_width: f64) -> Self {
        Self { label_width }
    }

    /// How many labels fit in `available_width`.
    ///
    /// Non-positive or non-finite widths fit none.
    pub fn max_fitting(&self, available_width: f64) -> usize {
        if available_width.is_nan()
            || available_width <= 0.0
            || self.label_width.is_nan()
            || self.label_width <= 0.0
        {
            return 0;
        }
        let n = (available_width / self.label_width).floor();
        if !n.is_finite() {
            return usize::MAX;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "finite, non-negative, and saturating on overflow"
        )]
        {
            n as usize
        }
    }

    /// The tick budget: `max(2, min(max_fitting, requested))`.
    pub fn effective_count(&self, available_width: f64, requested: usize) -> usize {
        self.max_fitting(available_width).min(requested).max(2)
    }

    /// Selects indices into a domain of length `len`, in ascending order.
    pub fn select_indices(&self, len: usize, available_width: f64, requested: usize) -> Vec<usize> {
        match len {
            0 => return Vec::new(),
            1 => return vec![0],
            _ => {}
        }
        let last = len - 1;
        let count = self.effective_count(available_width, requested);
        if count <= 2 || len <= 2 {
            return vec![0, last];
        }
        if len <= count {
            return (0..len).collect();
        }

        let step = last as f64 / (count - 1) as f64;
        let mut out = Vec::with_capacity(count);
        out.push(0);
        for i in 1..count - 1 {
            let index = {
                let f = (i as f64 * step).round();
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "bounded by the domain length"
                )]
                {
                    f as usize
                }
            };
            if index > 0 && index < last && out.last() != Some(&index) {
                out.push(index);
            }
        }
        out.push(last);
        tracing::trace!(len, count, picked = out.len(), "selected ticks");
        out
    }

    /// Selects the ticks to render from `domain`, preserving domain order.
    pub fn select<T: Clone>(&self, domain: &[T], available_width: f64, requested: usize) -> Vec<T> {
        self.select_indices(domain.len(), available_width, requested)
            .into_iter()
            .map(|i| domain[i].clone())
            .collect()
    }
}

/// Selects ticks with the default 80px label width.
pub fn select_ticks<T: Clone>(domain: &[T], available_width: f64, requested: usize) -> Vec<T> {
    TickSelector::default().select(domain, available_width, requested)
}

/// Label width derived from measured labels: the widest label plus `padding`.
///
/// Falls back to [`DEFAULT_LABEL_WIDTH`] when there is nothing to measure.
pub fn measured_label_width(
    labels: &[String],
    measurer: &dyn TextMeasurer,
    font_size: f64,
    padding: f64,
) -> f64 {
    let widest = measurer.widest(labels, font_size);
    if widest > 0.0 {
        widest + padding.max(0.0)
    } else {
        DEFAULT_LABEL_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    fn years(from: i32, to: i32) -> Vec<i32> {
        (from..=to).collect()
    }

    #[test]
    fn empty_and_single_domains() {
        let empty: [i32; 0] = [];
        assert!(select_ticks(&empty, 500.0, 15).is_empty());
        assert_eq!(select_ticks(&["Only"], 500.0, 15), vec!["Only"]);
    }

    #[test]
    fn small_domain_is_returned_whole() {
        assert_eq!(
            select_ticks(&[2001, 2002, 2003], 500.0, 15),
            vec![2001, 2002, 2003]
        );
    }

    #[test]
    fn twenty_years_in_400px() {
        let domain = years(2001, 2020);
        let ticks = select_ticks(&domain, 400.0, 15);
        assert_eq!(ticks, vec![2001, 2006, 2011, 2015, 2020]);
    }

    #[test]
    fn zero_or_negative_width_keeps_endpoints_only() {
        let domain = years(2001, 2020);
        assert_eq!(select_ticks(&domain, 0.0, 15), vec![2001, 2020]);
        assert_eq!(select_ticks(&domain, -50.0, 15), vec![2001, 2020]);
        assert_eq!(select_ticks(&domain, f64::NAN, 15), vec![2001, 2020]);
    }

    #[test]
    fn requested_count_caps_density() {
        let domain = years(2001, 2100);
        let ticks = select_ticks(&domain, 10_000.0, 4);
        assert_eq!(ticks.len(), 4);
        assert_eq!(ticks.first(), Some(&2001));
        assert_eq!(ticks.last(), Some(&2100));
    }

    #[test]
    fn boundaries_and_cap_hold_across_inputs() {
        let sel = TickSelector::default();
        for len in 1..60_usize {
            let domain: Vec<usize> = (0..len).collect();
            for width in [0.0, 79.0, 80.0, 161.0, 400.0, 1234.0, 5000.0] {
                for requested in [2_usize, 3, 5, 15, 100] {
                    let ticks = sel.select(&domain, width, requested);
                    assert_eq!(ticks.first(), Some(&0), "first kept for {len}/{width}");
                    assert_eq!(ticks.last(), Some(&(len - 1)), "last kept for {len}/{width}");
                    let cap = sel.effective_count(width, requested);
                    assert!(ticks.len() <= cap.max(1), "cap exceeded for {len}/{width}");
                    assert!(ticks.len() <= len, "more ticks than domain for {len}");
                    assert!(ticks.windows(2).all(|w| w[0] < w[1]), "order lost");
                }
            }
        }
    }

    #[test]
    fn measured_width_widens_for_long_labels() {
        let labels = vec!["North America".to_owned(), "EU".to_owned()];
        let w = measured_label_width(&labels, &HeuristicTextMeasurer, 10.0, 8.0);
        assert!((w - (0.6 * 10.0 * 13.0 + 8.0)).abs() < 1e-9, "unexpected width {w}");
        assert_eq!(
            measured_label_width(&[], &HeuristicTextMeasurer, 10.0, 8.0),
            DEFAULT_LABEL_WIDTH
        );
    }
}

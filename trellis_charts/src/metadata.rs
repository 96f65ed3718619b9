// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-render metadata and its delivery.
//!
//! After each stable render a chart schedules a [`ChartMetadata`] on a [`MetadataBus`].
//! Delivery is deferred to the next [`MetadataBus::flush`] (one scheduler tick). Until then:
//! - scheduling again for the same chart replaces the pending value (last writer wins), and
//! - [`MetadataBus::cancel`] drops it (unmount).
//!
//! Listeners either follow one chart ([`MetadataBus::subscribe`]) or every chart
//! ([`MetadataBus::subscribe_all`], receiving the chart id alongside the metadata).

use core::fmt;

use hashbrown::HashMap;

use crate::chart::DataPoint;

/// The kind of chart that produced some metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChartType {
    /// Line chart.
    #[default]
    Line,
    /// Bar chart over a band axis.
    Bar,
    /// Area chart.
    Area,
    /// Gap chart: values with headroom above the maximum.
    Gap,
}

impl ChartType {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Area => "area",
            Self::Gap => "gap",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a mounted chart.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(pub String);

impl ChartId {
    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChartId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ChartId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// What a chart actually drew.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartMetadata {
    /// X keys of the drawn points, in first-seen order.
    pub x_axis_domain: Vec<String>,
    /// Value-axis domain after nice rounding; `[0, 0]` when nothing was drawn.
    pub y_axis_domain: [f64; 2],
    /// Series keys that were not hidden.
    pub visible_items: Vec<String>,
    /// Drawn points per visible series.
    pub rendered_data: HashMap<String, Vec<DataPoint>>,
    /// The producing chart's type.
    pub chart_type: ChartType,
}

/// Handle returned by the subscribe methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ChartListener = Box<dyn FnMut(&ChartMetadata)>;
type BubbleListener = Box<dyn FnMut(&ChartId, &ChartMetadata)>;

/// Observer registry with deferred, last-writer-wins delivery.
#[derive(Default)]
pub struct MetadataBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, ChartId, ChartListener)>,
    bubble: Vec<(SubscriptionId, BubbleListener)>,
    pending: Vec<(ChartId, ChartMetadata)>,
}

impl fmt::Debug for MetadataBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataBus")
            .field("listeners", &self.listeners.len())
            .field("bubble", &self.bubble.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl MetadataBus {
    /// An empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_subscription(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    /// Calls `f` with each metadata delivered for `chart`.
    pub fn subscribe(
        &mut self,
        chart: impl Into<ChartId>,
        f: impl FnMut(&ChartMetadata) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription();
        self.listeners.push((id, chart.into(), Box::new(f)));
        id
    }

    /// Calls `f` with every metadata delivered, for any chart.
    pub fn subscribe_all(
        &mut self,
        f: impl FnMut(&ChartId, &ChartMetadata) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription();
        self.bubble.push((id, Box::new(f)));
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len() + self.bubble.len();
        self.listeners.retain(|(sid, ..)| *sid != id);
        self.bubble.retain(|(sid, _)| *sid != id);
        before != self.listeners.len() + self.bubble.len()
    }

    /// Queues `metadata` for delivery on the next flush.
    ///
    /// Returns `true` if this superseded an undelivered value for the same chart.
    pub fn schedule(&mut self, chart: ChartId, metadata: ChartMetadata) -> bool {
        let superseded = self.remove_pending(&chart);
        if superseded {
            tracing::debug!(chart = %chart, "superseding pending metadata");
        } else {
            tracing::trace!(chart = %chart, "metadata scheduled");
        }
        self.pending.push((chart, metadata));
        superseded
    }

    /// Drops any undelivered metadata for `chart`. Returns `true` if something was dropped.
    pub fn cancel(&mut self, chart: &ChartId) -> bool {
        let cancelled = self.remove_pending(chart);
        if cancelled {
            tracing::debug!(chart = %chart, "pending metadata cancelled");
        }
        cancelled
    }

    fn remove_pending(&mut self, chart: &ChartId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(c, _)| c != chart);
        before != self.pending.len()
    }

    /// Returns `true` if `chart` has undelivered metadata.
    pub fn has_pending(&self, chart: &ChartId) -> bool {
        self.pending.iter().any(|(c, _)| c == chart)
    }

    /// Number of charts with undelivered metadata.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Delivers everything pending, in scheduling order. Returns how many values were delivered.
    pub fn flush(&mut self) -> usize {
        let pending = core::mem::take(&mut self.pending);
        let delivered = pending.len();
        for (chart, metadata) in pending {
            for (_, target, f) in &mut self.listeners {
                if *target == chart {
                    f(&metadata);
                }
            }
            for (_, f) in &mut self.bubble {
                f(&chart, &metadata);
            }
        }
        if delivered > 0 {
            tracing::trace!(delivered, "metadata flushed");
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn metadata(max: f64) -> ChartMetadata {
        ChartMetadata {
            x_axis_domain: vec!["2001".to_owned()],
            y_axis_domain: [0.0, max],
            visible_items: vec!["a".to_owned()],
            rendered_data: HashMap::new(),
            chart_type: ChartType::Line,
        }
    }

    #[test]
    fn delivery_is_deferred_until_flush() {
        let mut bus = MetadataBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe("c1", move |m| sink.borrow_mut().push(m.y_axis_domain[1]));

        bus.schedule("c1".into(), metadata(10.0));
        assert!(seen.borrow().is_empty());
        assert_eq!(bus.flush(), 1);
        assert_eq!(*seen.borrow(), vec![10.0]);
        assert_eq!(bus.flush(), 0);
    }

    #[test]
    fn last_writer_wins() {
        let mut bus = MetadataBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe("c1", move |m| sink.borrow_mut().push(m.y_axis_domain[1]));

        assert!(!bus.schedule("c1".into(), metadata(1.0)));
        assert!(bus.schedule("c1".into(), metadata(2.0)));
        assert_eq!(bus.pending_len(), 1);
        bus.flush();
        assert_eq!(*seen.borrow(), vec![2.0]);
    }

    #[test]
    fn cancel_drops_pending_metadata() {
        let mut bus = MetadataBus::new();
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        bus.subscribe_all(move |_, _| *sink.borrow_mut() += 1);

        let id = ChartId::from("c1");
        bus.schedule(id.clone(), metadata(1.0));
        assert!(bus.has_pending(&id));
        assert!(bus.cancel(&id));
        assert!(!bus.cancel(&id));
        bus.flush();
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn bubble_listeners_see_every_chart() {
        let mut bus = MetadataBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = bus.subscribe_all(move |id, _| sink.borrow_mut().push(id.to_string()));

        bus.schedule("a".into(), metadata(1.0));
        bus.schedule("b".into(), metadata(1.0));
        bus.flush();
        assert_eq!(*seen.borrow(), vec!["a".to_owned(), "b".to_owned()]);

        assert!(bus.unsubscribe(sub));
        assert!(!bus.unsubscribe(sub));
        bus.schedule("a".into(), metadata(1.0));
        bus.flush();
        assert_eq!(seen.borrow().len(), 2);
    }
}

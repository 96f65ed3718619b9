// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained scene and keyed diffing.

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use kurbo::Rect;

use crate::mark::{GroupId, Mark, MarkId, MarkPayload, Transition};

/// A change produced by reconciling a new mark list against the retained scene.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A mark that did not exist before.
    Enter {
        /// Mark id.
        id: MarkId,
        /// Render ordering hint.
        z_index: i32,
        /// Payload bounds, if known.
        bounds: Option<Rect>,
        /// New payload.
        new: Box<MarkPayload>,
        /// Requested transition.
        transition: Option<Transition>,
    },
    /// A mark whose drawn content changed.
    Update {
        /// Mark id.
        id: MarkId,
        /// Previous ordering hint.
        old_z_index: i32,
        /// New ordering hint.
        new_z_index: i32,
        /// Previous payload.
        old: Box<MarkPayload>,
        /// New payload.
        new: Box<MarkPayload>,
        /// Requested transition.
        transition: Option<Transition>,
    },
    /// A mark that is no longer produced.
    Exit {
        /// Mark id.
        id: MarkId,
        /// Last payload.
        old: Box<MarkPayload>,
    },
}

impl MarkDiff {
    /// Returns the id of the affected mark.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }

    /// Returns `true` for [`MarkDiff::Enter`].
    pub fn is_enter(&self) -> bool {
        matches!(self, Self::Enter { .. })
    }

    /// Returns `true` for [`MarkDiff::Exit`].
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit { .. })
    }
}

/// The retained set of marks from the most recent passes.
#[derive(Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
    passes: u64,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles a full frame: every retained mark missing from `marks` exits.
    pub fn tick(&mut self, marks: Vec<Mark>) -> Vec<MarkDiff> {
        self.reconcile(None, marks)
    }

    /// Reconciles a single group: only marks of `group` can exit.
    ///
    /// Every mark in `marks` is assigned to `group`.
    pub fn reconcile_group(&mut self, group: GroupId, marks: Vec<Mark>) -> Vec<MarkDiff> {
        self.reconcile(Some(group), marks)
    }

    /// Removes every mark of `group`.
    pub fn clear_group(&mut self, group: GroupId) -> Vec<MarkDiff> {
        self.reconcile(Some(group), Vec::new())
    }

    fn reconcile(&mut self, scope: Option<GroupId>, marks: Vec<Mark>) -> Vec<MarkDiff> {
        let mut diffs = Vec::new();
        let mut seen: HashSet<MarkId> = HashSet::with_capacity(marks.len());

        for mut mark in marks {
            if let Some(group) = scope {
                mark.group = group;
            }
            seen.insert(mark.id);
            match self.marks.entry(mark.id) {
                Entry::Occupied(mut e) => {
                    let old = e.get();
                    if !old.same_content(&mark) {
                        diffs.push(MarkDiff::Update {
                            id: mark.id,
                            old_z_index: old.z_index,
                            new_z_index: mark.z_index,
                            old: Box::new(old.payload.clone()),
                            new: Box::new(mark.payload.clone()),
                            transition: mark.transition,
                        });
                    }
                    e.insert(mark);
                }
                Entry::Vacant(e) => {
                    diffs.push(MarkDiff::Enter {
                        id: mark.id,
                        z_index: mark.z_index,
                        bounds: mark.payload.bounds(),
                        new: Box::new(mark.payload.clone()),
                        transition: mark.transition,
                    });
                    e.insert(mark);
                }
            }
        }

        let mut exits: Vec<MarkId> = self
            .marks
            .values()
            .filter(|m| scope.is_none_or(|g| m.group == g) && !seen.contains(&m.id))
            .map(|m| m.id)
            .collect();
        exits.sort_unstable();
        for id in exits {
            if let Some(old) = self.marks.remove(&id) {
                diffs.push(MarkDiff::Exit {
                    id,
                    old: Box::new(old.payload),
                });
            }
        }

        self.passes += 1;
        diffs
    }

    /// Number of reconcile passes applied so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Number of retained marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if no marks are retained.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Looks up a retained mark.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Iterates retained marks in arbitrary order.
    pub fn marks(&self) -> impl Iterator<Item = &Mark> {
        self.marks.values()
    }

    /// Iterates retained marks carrying `class`.
    pub fn marks_with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Mark> {
        self.marks.values().filter(move |m| m.has_class(class))
    }

    /// Counts retained marks carrying `class`.
    pub fn count_with_class(&self, class: &str) -> usize {
        self.marks_with_class(class).count()
    }

    /// Counts retained marks in `group`.
    pub fn group_len(&self, group: GroupId) -> usize {
        self.marks.values().filter(|m| m.group == group).count()
    }

    /// Returns retained marks in paint order: `(z_index, id)`.
    pub fn sorted_marks(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self.marks.values().collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use kurbo::{BezPath, Point};
    use peniko::Color;

    use super::*;
    use crate::mark::{PathMark, TextMark};

    fn label(id: u64, text: &str) -> Mark {
        Mark::builder(MarkId::from_raw(id))
            .class("tick-label")
            .text(TextMark::new(Point::new(id as f64, 0.0), text))
    }

    fn rule(id: u64, x: f64) -> Mark {
        let mut p = BezPath::new();
        p.move_to((x, 0.0));
        p.line_to((x, 10.0));
        Mark::builder(MarkId::from_raw(id))
            .class("grid-line")
            .path(PathMark::stroked(p, Color::BLACK, 1.0))
    }

    #[test]
    fn first_tick_enters_everything() {
        let mut scene = Scene::new();
        let diffs = scene.tick(vec![label(1, "a"), rule(2, 5.0)]);
        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(MarkDiff::is_enter));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn identical_tick_is_a_no_op() {
        let mut scene = Scene::new();
        scene.tick(vec![label(1, "a"), rule(2, 5.0)]);
        let diffs = scene.tick(vec![label(1, "a"), rule(2, 5.0)]);
        assert!(diffs.is_empty(), "unexpected diffs: {diffs:?}");
        assert_eq!(scene.count_with_class("grid-line"), 1);
        assert_eq!(scene.passes(), 2);
    }

    #[test]
    fn changed_payload_updates_and_missing_marks_exit() {
        let mut scene = Scene::new();
        scene.tick(vec![label(1, "a"), rule(2, 5.0)]);
        let diffs = scene.tick(vec![label(1, "b")]);
        assert_eq!(diffs.len(), 2);
        assert!(matches!(diffs[0], MarkDiff::Update { id, .. } if id == MarkId(1)));
        assert!(matches!(diffs[1], MarkDiff::Exit { id, .. } if id == MarkId(2)));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn group_reconcile_leaves_other_groups_alone() {
        let mut scene = Scene::new();
        let x = GroupId(1);
        let y = GroupId(2);
        scene.reconcile_group(x, vec![label(1, "a"), label(2, "b")]);
        scene.reconcile_group(y, vec![rule(10, 1.0)]);

        let diffs = scene.reconcile_group(x, vec![label(1, "a")]);
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].is_exit());
        assert_eq!(scene.group_len(x), 1);
        assert_eq!(scene.group_len(y), 1);

        let diffs = scene.clear_group(y);
        assert_eq!(diffs.len(), 1);
        assert_eq!(scene.group_len(y), 0);
    }

    #[test]
    fn transition_changes_alone_do_not_emit_updates() {
        let mut scene = Scene::new();
        let mut m = label(1, "a");
        m.transition = Some(Transition::fade_in(500));
        scene.tick(vec![m]);
        let diffs = scene.tick(vec![label(1, "a")]);
        assert!(diffs.is_empty(), "unexpected diffs: {diffs:?}");
        let kept = scene.get(MarkId(1)).expect("mark retained");
        assert_eq!(kept.transition, None);
    }

    #[test]
    fn sorted_marks_use_z_then_id() {
        let mut scene = Scene::new();
        let mut a = label(3, "a");
        a.z_index = -1;
        scene.tick(vec![label(2, "b"), a, label(1, "c")]);
        let ids: Vec<u64> = scene.sorted_marks().iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}

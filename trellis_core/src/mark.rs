// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark identities and payloads.

use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::{Brush, Color};
use smallvec::SmallVec;

/// Stable identity of a mark across render passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives an id from a namespace and a key (FNV-1a).
    ///
    /// The same `(base, key)` pair always yields the same id, so producers can key marks by
    /// data value (for example, one gridline per tick value) instead of by position in a list.
    pub fn for_key(base: u64, key: &[u8]) -> Self {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let mut h = OFFSET;
        for b in base.to_le_bytes().iter().chain(key) {
            h ^= u64::from(*b);
            h = h.wrapping_mul(PRIME);
        }
        Self(h)
    }
}

/// Identity of a group of marks reconciled together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u64);

/// Class names attached to a mark.
pub type MarkClasses = SmallVec<[&'static str; 2]>;

/// The kind of a mark payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// Filled rectangle.
    Rect,
    /// Unshaped text run.
    Text,
    /// Filled and/or stroked path.
    Path,
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the anchor point.
    #[default]
    Start,
    /// Text is centered on the anchor point.
    Middle,
    /// Text ends at the anchor point.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Middle of the em box.
    Middle,
    /// Hanging baseline (top).
    Hanging,
    /// Ideographic baseline (bottom).
    Ideographic,
}

/// How a renderer should animate a mark change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Fade the mark in from fully transparent.
    FadeIn,
    /// Interpolate geometry attributes from the previous payload.
    Tween,
}

/// A timed transition attached to a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    /// What to animate.
    pub kind: TransitionKind,
    /// Duration in milliseconds.
    pub duration_ms: u32,
    /// Delay before the transition starts, in milliseconds.
    pub delay_ms: u32,
}

impl Transition {
    /// A fade-in transition.
    pub const fn fade_in(duration_ms: u32) -> Self {
        Self {
            kind: TransitionKind::FadeIn,
            duration_ms,
            delay_ms: 0,
        }
    }

    /// An attribute tween transition.
    pub const fn tween(duration_ms: u32) -> Self {
        Self {
            kind: TransitionKind::Tween,
            duration_ms,
            delay_ms: 0,
        }
    }

    /// Sets the start delay.
    pub const fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Rectangle payload.
#[derive(Clone, Debug, PartialEq)]
pub struct RectMark {
    /// Rectangle in scene coordinates.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
}

/// Text payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    /// Anchor position.
    pub pos: Point,
    /// Text content (unshaped).
    pub text: String,
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Rotation in degrees around `pos`.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Fill paint.
    pub fill: Brush,
}

impl TextMark {
    /// Creates a text payload with default styling.
    pub fn new(pos: Point, text: impl Into<String>) -> Self {
        Self {
            pos,
            text: text.into(),
            font_size: 12.0,
            angle: 0.0,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            fill: Brush::default(),
        }
    }
}

/// Path payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMark {
    /// Path geometry.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width; `0` disables stroking.
    pub stroke_width: f64,
    /// Dash pattern (alternating on/off lengths); empty for a solid stroke.
    pub dash: SmallVec<[f64; 4]>,
}

impl PathMark {
    /// A stroked, unfilled path.
    pub fn stroked(path: BezPath, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            path,
            fill: Brush::Solid(Color::TRANSPARENT),
            stroke: stroke.into(),
            stroke_width,
            dash: SmallVec::new(),
        }
    }

    /// A filled, unstroked path.
    pub fn filled(path: BezPath, fill: impl Into<Brush>) -> Self {
        Self {
            path,
            fill: fill.into(),
            stroke: Brush::Solid(Color::TRANSPARENT),
            stroke_width: 0.0,
            dash: SmallVec::new(),
        }
    }

    /// Sets the dash pattern.
    pub fn with_dash(mut self, dash: &[f64]) -> Self {
        self.dash = dash.iter().copied().collect();
        self
    }
}

/// The drawable content of a mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// Rectangle.
    Rect(RectMark),
    /// Text.
    Text(TextMark),
    /// Path.
    Path(PathMark),
}

impl MarkPayload {
    /// Returns the payload kind.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect(_) => MarkKind::Rect,
            Self::Text(_) => MarkKind::Text,
            Self::Path(_) => MarkKind::Path,
        }
    }

    /// Geometric bounds, when they can be known without text metrics.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect),
            Self::Path(p) => Some(p.path.bounding_box()),
            Self::Text(_) => None,
        }
    }
}

/// A single retained mark.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Owning group.
    pub group: GroupId,
    /// Render ordering hint; renderers sort by `(z_index, id)`.
    pub z_index: i32,
    /// Role classes (e.g. `"grid-line"`).
    pub classes: MarkClasses,
    /// Drawable content.
    pub payload: MarkPayload,
    /// Transition to apply when this mark enters or changes.
    pub transition: Option<Transition>,
}

impl Mark {
    /// Starts building a mark with the given id.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder {
            id,
            group: GroupId::default(),
            z_index: 0,
            classes: SmallVec::new(),
            transition: None,
        }
    }

    /// Returns the payload kind.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }

    /// Returns `true` if this mark carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }

    /// Compares everything a renderer draws, ignoring the transition.
    pub(crate) fn same_content(&self, other: &Self) -> bool {
        self.z_index == other.z_index
            && self.classes == other.classes
            && self.payload == other.payload
    }
}

/// Builder for [`Mark`].
#[derive(Clone, Debug)]
pub struct MarkBuilder {
    id: MarkId,
    group: GroupId,
    z_index: i32,
    classes: MarkClasses,
    transition: Option<Transition>,
}

impl MarkBuilder {
    /// Sets the owning group.
    pub fn group(mut self, group: GroupId) -> Self {
        self.group = group;
        self
    }

    /// Sets the render ordering hint.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Adds a class name.
    pub fn class(mut self, class: &'static str) -> Self {
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Sets the transition.
    pub fn transition(mut self, transition: Option<Transition>) -> Self {
        self.transition = transition;
        self
    }

    /// Finishes with a rect payload.
    pub fn rect(self, rect: Rect, fill: impl Into<Brush>) -> Mark {
        self.finish(MarkPayload::Rect(RectMark {
            rect,
            fill: fill.into(),
        }))
    }

    /// Finishes with a text payload.
    pub fn text(self, text: TextMark) -> Mark {
        self.finish(MarkPayload::Text(text))
    }

    /// Finishes with a path payload.
    pub fn path(self, path: PathMark) -> Mark {
        self.finish(MarkPayload::Path(path))
    }

    fn finish(self, payload: MarkPayload) -> Mark {
        Mark {
            id: self.id,
            group: self.group,
            z_index: self.z_index,
            classes: self.classes,
            payload,
            transition: self.transition,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn keyed_ids_are_stable_and_namespaced() {
        let a = MarkId::for_key(1, b"2001");
        let b = MarkId::for_key(1, b"2001");
        let c = MarkId::for_key(2, b"2001");
        let d = MarkId::for_key(1, b"2002");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn builder_deduplicates_classes() {
        let m = Mark::builder(MarkId::from_raw(1))
            .class("tick-label")
            .class("tick-label")
            .class("axis-x")
            .text(TextMark::new(Point::ZERO, "x"));
        assert_eq!(m.classes.len(), 2);
        assert!(m.has_class("axis-x"));
        assert_eq!(m.kind(), MarkKind::Text);
    }

    #[test]
    fn path_bounds_follow_geometry() {
        let mut p = BezPath::new();
        p.move_to((10.0, 5.0));
        p.line_to((10.0, 45.0));
        let payload = MarkPayload::Path(PathMark::stroked(p, Color::BLACK, 1.0));
        let b = payload.bounds().expect("paths have bounds");
        assert_eq!(b, Rect::new(10.0, 5.0, 10.0, 45.0));
    }
}

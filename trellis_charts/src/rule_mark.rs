// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule mark generation.
//!
//! A "rule" is a straight stroked segment. Axes use rules for gridlines and the zero line.

use kurbo::BezPath;
use peniko::Brush;
use smallvec::SmallVec;
use trellis_core::{GroupId, Mark, MarkId, PathMark, Transition};

use crate::z_order;

/// A rule mark spec (a stroked line segment).
#[derive(Clone, Debug)]
pub struct RuleMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Start point x in scene coordinates.
    pub x0: f64,
    /// Start point y in scene coordinates.
    pub y0: f64,
    /// End point x in scene coordinates.
    pub x1: f64,
    /// End point y in scene coordinates.
    pub y1: f64,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
    /// Dash pattern; empty for a solid stroke.
    pub dash: SmallVec<[f64; 4]>,
    /// Rendering order hint.
    pub z_index: i32,
    /// Class names attached to the mark.
    pub classes: SmallVec<[&'static str; 2]>,
    /// Owning group, if any.
    pub group: Option<GroupId>,
    /// Animation hint for this pass.
    pub transition: Option<Transition>,
}

impl RuleMarkSpec {
    /// Creates a new rule between two points.
    pub fn new(id: MarkId, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            id,
            x0,
            y0,
            x1,
            y1,
            stroke: Brush::default(),
            stroke_width: 1.0,
            dash: SmallVec::new(),
            z_index: z_order::GRID_LINES,
            classes: SmallVec::new(),
            group: None,
            transition: None,
        }
    }

    /// Creates a horizontal rule.
    pub fn horizontal(id: MarkId, y: f64, x0: f64, x1: f64) -> Self {
        Self::new(id, x0, y, x1, y)
    }

    /// Creates a vertical rule.
    pub fn vertical(id: MarkId, x: f64, y0: f64, y1: f64) -> Self {
        Self::new(id, x, y0, x, y1)
    }

    /// Sets stroke paint and width.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// Sets the dash pattern.
    pub fn with_dash(mut self, dash: &[f64]) -> Self {
        self.dash = dash.iter().copied().collect();
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Adds a class name.
    pub fn with_class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    /// Assigns the owning group.
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Sets the animation hint.
    pub fn with_transition(mut self, transition: Option<Transition>) -> Self {
        self.transition = transition;
        self
    }

    /// Generates the rule mark.
    pub fn mark(&self) -> Mark {
        let mut p = BezPath::new();
        p.move_to((self.x0, self.y0));
        p.line_to((self.x1, self.y1));
        let mut builder = Mark::builder(self.id)
            .z_index(self.z_index)
            .transition(self.transition);
        if let Some(group) = self.group {
            builder = builder.group(group);
        }
        for class in self.classes.iter().copied() {
            builder = builder.class(class);
        }
        builder.path(
            PathMark::stroked(p, self.stroke.clone(), self.stroke_width).with_dash(&self.dash),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::color::palette::css;
    use trellis_core::MarkPayload;

    #[test]
    fn dashed_rule_carries_classes_and_dash() {
        let mark = RuleMarkSpec::horizontal(MarkId::from_raw(7), 20.0, 0.0, 100.0)
            .with_stroke(css::GRAY, 0.5)
            .with_dash(&[3.0, 3.0])
            .with_class("grid-line")
            .with_group(GroupId(2))
            .mark();
        assert!(mark.has_class("grid-line"));
        assert_eq!(mark.group, GroupId(2));
        assert_eq!(mark.z_index, z_order::GRID_LINES);
        let MarkPayload::Path(path) = &mark.payload else {
            panic!("rules are paths");
        };
        assert_eq!(path.dash.as_slice(), &[3.0, 3.0]);
        assert_eq!(path.stroke_width, 0.5);
    }
}

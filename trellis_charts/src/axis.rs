// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation and reconciliation.
//!
//! Axes here are deliberately minimal: there is no domain line and there are no tick marks.
//! Each selected tick produces
//! - a label (`tick-label`),
//! - an optional full-length dashed gridline (`grid-line`), and
//! - an optional small marker dot on the axis edge (`tick-marker`).
//!
//! On a linear vertical axis, the gridline for the value `0` is drawn solid and heavier
//! (`zero-line`) to anchor the baseline.
//!
//! Marks are keyed by tick value, so repeated renders update marks in place instead of
//! accumulating them. An [`AxisRenderer`] owns one [`GroupId`] and reconciles only its own marks.

use std::sync::Arc;

use kurbo::{Circle, Point, Rect, Shape};
use peniko::Brush;
use peniko::color::palette::css;
use smallvec::SmallVec;
use trellis_core::{
    GroupId, Mark, MarkDiff, MarkId, PathMark, Scene, TextAnchor, TextBaseline, TextMark,
    Transition,
};

use crate::format::INVALID_LABEL;
use crate::gate::{RenderGate, RenderPhase};
use crate::geometry::ContainerGeometry;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{Domain, Scale, ScaleKind, TickValue};
use crate::z_order;

/// Class on every tick label.
pub const CLASS_TICK_LABEL: &str = "tick-label";
/// Class on every ordinary gridline.
pub const CLASS_GRID_LINE: &str = "grid-line";
/// Class on the emphasized gridline at zero.
pub const CLASS_ZERO_LINE: &str = "zero-line";
/// Class on every tick marker dot.
pub const CLASS_TICK_MARKER: &str = "tick-marker";
/// Class on every mark of a horizontal axis.
pub const CLASS_AXIS_X: &str = "axis-x";
/// Class on every mark of a vertical axis.
pub const CLASS_AXIS_Y: &str = "axis-y";

/// Entrance fade for horizontal axes.
pub const HORIZONTAL_ENTRANCE_MS: u32 = 500;
/// Entrance fade for vertical axes.
pub const VERTICAL_ENTRANCE_MS: u32 = 750;
/// Tween applied to the zero line when the domain changes.
pub const ZERO_LINE_TWEEN_MS: u32 = 300;

const LABEL_KEY: u64 = 1;
const GRID_KEY: u64 = 2;
const MARKER_KEY: u64 = 3;
const ROLE_BITS: u32 = 2;

/// Formats a tick value into label text.
pub type TickFormatter = Arc<dyn Fn(&TickValue) -> String + Send + Sync>;

/// A paint, width, and dash triple for stroked rules.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
    /// Dash pattern; empty for a solid stroke.
    pub dash: SmallVec<[f64; 4]>,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
            dash: SmallVec::new(),
        }
    }

    /// Convenience for a dashed stroke.
    pub fn dashed(brush: impl Into<Brush>, stroke_width: f64, dash: &[f64]) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
            dash: dash.iter().copied().collect(),
        }
    }
}

/// Label and marker styling.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
    /// Fill paint for tick markers.
    pub marker_fill: Brush,
    /// Marker dot radius.
    pub marker_radius: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            label_fill: Brush::Solid(css::DIM_GRAY),
            label_font_size: 11.0,
            marker_fill: Brush::Solid(css::DIM_GRAY),
            marker_radius: 2.0,
        }
    }
}

/// Gridline styling.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStyle {
    /// Ordinary gridlines: dashed and light.
    pub line: StrokeStyle,
    /// The zero line: solid and heavier.
    pub zero_line: StrokeStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            line: StrokeStyle::dashed(css::BLACK.with_alpha(40.0 / 255.0), 1.0, &[4.0, 4.0]),
            zero_line: StrokeStyle::solid(css::BLACK.with_alpha(140.0 / 255.0), 1.5),
        }
    }
}

/// Axis orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis above the plot area.
    Top,
    /// A horizontal axis below the plot area.
    Bottom,
    /// A vertical axis left of the plot area.
    Left,
    /// A vertical axis right of the plot area.
    Right,
}

impl AxisOrient {
    /// Returns `true` for `Top` and `Bottom`.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Pixel range a scale for this axis maps onto.
    ///
    /// Vertical ranges run bottom to top so larger values sit higher.
    pub fn range(self, plot: Rect) -> (f64, f64) {
        if self.is_horizontal() {
            (plot.x0, plot.x1)
        } else {
            (plot.y1, plot.y0)
        }
    }

    /// Length available for tick labels along this axis.
    pub fn available_length(self, plot: Rect) -> f64 {
        if self.is_horizontal() {
            plot.width()
        } else {
            plot.height()
        }
    }
}

/// An axis description.
#[derive(Clone)]
pub struct AxisSpec {
    /// Stable-id base; generated mark ids derive from this base and the tick value.
    pub id_base: u64,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Label and marker styling.
    pub style: AxisStyle,
    /// Optional gridlines spanning the plot.
    pub grid: Option<GridStyle>,
    /// Whether to draw a marker dot per tick.
    pub markers: bool,
    /// Whether a linear vertical axis emphasizes its zero gridline.
    pub zero_line: bool,
    /// Gap between the plot edge and tick labels.
    pub label_padding: f64,
    /// Tick label rotation angle in degrees.
    pub label_angle: f64,
    /// Optional label formatter; defaults to the scale's own formatting.
    pub formatter: Option<TickFormatter>,
    /// Entrance fade duration.
    pub entrance_ms: u32,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisSpec")
            .field("id_base", &self.id_base)
            .field("orient", &self.orient)
            .field("style", &self.style)
            .field("grid", &self.grid)
            .field("markers", &self.markers)
            .field("zero_line", &self.zero_line)
            .field("label_padding", &self.label_padding)
            .field("label_angle", &self.label_angle)
            .field("formatter", &self.formatter.is_some())
            .field("entrance_ms", &self.entrance_ms)
            .finish()
    }
}

impl AxisSpec {
    /// Creates an axis with defaults for its orientation.
    ///
    /// The returned axis has markers on, zero-line emphasis on, no gridlines, no formatter,
    /// and an entrance fade of 500 ms (horizontal) or 750 ms (vertical).
    pub fn new(id_base: u64, orient: AxisOrient) -> Self {
        let (label_padding, entrance_ms) = if orient.is_horizontal() {
            (8.0, HORIZONTAL_ENTRANCE_MS)
        } else {
            (6.0, VERTICAL_ENTRANCE_MS)
        };
        Self {
            id_base,
            orient,
            style: AxisStyle::default(),
            grid: None,
            markers: true,
            zero_line: true,
            label_padding,
            label_angle: 0.0,
            formatter: None,
            entrance_ms,
        }
    }

    /// Convenience constructor for a `bottom` axis.
    pub fn bottom(id_base: u64) -> Self {
        Self::new(id_base, AxisOrient::Bottom)
    }

    /// Convenience constructor for a `top` axis.
    pub fn top(id_base: u64) -> Self {
        Self::new(id_base, AxisOrient::Top)
    }

    /// Convenience constructor for a `left` axis.
    pub fn left(id_base: u64) -> Self {
        Self::new(id_base, AxisOrient::Left)
    }

    /// Convenience constructor for a `right` axis.
    pub fn right(id_base: u64) -> Self {
        Self::new(id_base, AxisOrient::Right)
    }

    /// Set the axis style.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Enable gridlines using the provided style.
    pub fn with_grid(mut self, grid: GridStyle) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Disable gridlines.
    pub fn without_grid(mut self) -> Self {
        self.grid = None;
        self
    }

    /// Enable or disable marker dots.
    pub fn with_markers(mut self, markers: bool) -> Self {
        self.markers = markers;
        self
    }

    /// Enable or disable zero-line emphasis.
    pub fn with_zero_line(mut self, zero_line: bool) -> Self {
        self.zero_line = zero_line;
        self
    }

    /// Set label padding in scene coordinates.
    pub fn with_label_padding(mut self, label_padding: f64) -> Self {
        self.label_padding = label_padding;
        self
    }

    /// Set tick label rotation angle in degrees.
    pub fn with_label_angle(mut self, angle_degrees: f64) -> Self {
        self.label_angle = angle_degrees;
        self
    }

    /// Set a custom tick label formatter.
    pub fn with_formatter(
        mut self,
        f: impl Fn(&TickValue) -> String + Send + Sync + 'static,
    ) -> Self {
        self.formatter = Some(Arc::new(f));
        self
    }

    /// Use a shared formatter, or clear it with `None`.
    pub fn with_shared_formatter(mut self, f: Option<TickFormatter>) -> Self {
        self.formatter = f;
        self
    }

    /// Set the entrance fade duration.
    pub fn with_entrance_ms(mut self, entrance_ms: u32) -> Self {
        self.entrance_ms = entrance_ms;
        self
    }

    /// Label text for `tick`, given the full tick set it is drawn with.
    ///
    /// Non-finite values always read [`INVALID_LABEL`], whatever the formatter.
    pub fn label(&self, scale: &Scale, tick: &TickValue, ticks: &[TickValue]) -> String {
        if tick.as_value().is_some_and(|v| !v.is_finite()) {
            return INVALID_LABEL.to_owned();
        }
        match &self.formatter {
            Some(f) => f(tick),
            None => scale.default_label(tick, ticks),
        }
    }

    fn axis_class(&self) -> &'static str {
        if self.orient.is_horizontal() {
            CLASS_AXIS_X
        } else {
            CLASS_AXIS_Y
        }
    }

    // Roles occupy the low two bits, so neighbouring id bases never share ids.
    fn mark_id(&self, role: u64, tick: &TickValue) -> MarkId {
        MarkId::for_key((self.id_base << ROLE_BITS) | role, &tick.key_bytes())
    }

    /// Generates the marks for one pass.
    ///
    /// `domain_changed` decides whether the zero line tweens during an update pass. A non-finite
    /// tick draws only an [`INVALID_LABEL`] label, at the start of the axis.
    pub fn marks(
        &self,
        scale: &Scale,
        ticks: &[TickValue],
        geometry: &ContainerGeometry,
        phase: RenderPhase,
        domain_changed: bool,
    ) -> Vec<Mark> {
        let plot = geometry.plot_rect();
        let axis_class = self.axis_class();
        let entrance = phase
            .is_entrance()
            .then(|| Transition::fade_in(self.entrance_ms));
        let emphasize_zero =
            self.zero_line && !self.orient.is_horizontal() && scale.kind() == ScaleKind::Linear;
        let continuous = scale.kind() != ScaleKind::Band;

        let (lo, hi) = ordered(self.orient.range(plot));

        let mut out = Vec::new();
        let n = ticks.len();
        for (i, tick) in ticks.iter().enumerate() {
            // Non-finite ticks keep only their label, pinned to the start of the axis.
            let invalid = tick.as_value().is_some_and(|v| !v.is_finite());
            let pos = if invalid {
                Some(self.orient.range(plot).0)
            } else {
                scale.map(tick)
            };
            let Some(pos) = pos else {
                tracing::trace!(?tick, "skipping tick without a finite position");
                continue;
            };
            if pos < lo - 1.0e-9 || pos > hi + 1.0e-9 {
                continue;
            }

            if let Some(grid) = self.grid.as_ref().filter(|_| !invalid) {
                let is_zero = emphasize_zero && tick.as_value() == Some(0.0);
                let (style, class, z, transition) = if is_zero {
                    let tween = if phase.is_entrance() {
                        entrance
                    } else {
                        domain_changed.then(|| Transition::tween(ZERO_LINE_TWEEN_MS))
                    };
                    (&grid.zero_line, CLASS_ZERO_LINE, z_order::ZERO_LINE, tween)
                } else {
                    (&grid.line, CLASS_GRID_LINE, z_order::GRID_LINES, entrance)
                };
                let id = self.mark_id(GRID_KEY, tick);
                let rule = if self.orient.is_horizontal() {
                    RuleMarkSpec::vertical(id, pos, plot.y0, plot.y1)
                } else {
                    RuleMarkSpec::horizontal(id, pos, plot.x0, plot.x1)
                };
                out.push(
                    rule.with_stroke(style.brush.clone(), style.stroke_width)
                        .with_dash(&style.dash)
                        .with_z_index(z)
                        .with_class(class)
                        .with_class(axis_class)
                        .with_transition(transition)
                        .mark(),
                );
            }

            if self.markers && !invalid {
                let center = self.edge_point(plot, pos);
                let dot = Circle::new(center, self.style.marker_radius.max(0.0)).to_path(0.1);
                out.push(
                    Mark::builder(self.mark_id(MARKER_KEY, tick))
                        .z_index(z_order::AXIS_MARKERS)
                        .class(CLASS_TICK_MARKER)
                        .class(axis_class)
                        .transition(entrance)
                        .path(PathMark::filled(dot, self.style.marker_fill.clone())),
                );
            }

            let label = self.label(scale, tick, ticks);
            let (anchor, baseline) = self.label_alignment(continuous, i, n);
            let mut text = TextMark::new(self.label_point(plot, pos), label);
            text.font_size = self.style.label_font_size;
            text.angle = self.label_angle;
            text.anchor = anchor;
            text.baseline = baseline;
            text.fill = self.style.label_fill.clone();
            out.push(
                Mark::builder(self.mark_id(LABEL_KEY, tick))
                    .z_index(z_order::AXIS_LABELS)
                    .class(CLASS_TICK_LABEL)
                    .class(axis_class)
                    .transition(entrance)
                    .text(text),
            );
        }
        out
    }

    fn edge_point(&self, plot: Rect, pos: f64) -> Point {
        match self.orient {
            AxisOrient::Bottom => Point::new(pos, plot.y1),
            AxisOrient::Top => Point::new(pos, plot.y0),
            AxisOrient::Left => Point::new(plot.x0, pos),
            AxisOrient::Right => Point::new(plot.x1, pos),
        }
    }

    fn label_point(&self, plot: Rect, pos: f64) -> Point {
        let pad = self.label_padding.max(0.0);
        match self.orient {
            AxisOrient::Bottom => Point::new(pos, plot.y1 + pad),
            AxisOrient::Top => Point::new(pos, plot.y0 - pad),
            AxisOrient::Left => Point::new(plot.x0 - pad, pos),
            AxisOrient::Right => Point::new(plot.x1 + pad, pos),
        }
    }

    fn label_alignment(&self, continuous: bool, i: usize, n: usize) -> (TextAnchor, TextBaseline) {
        match self.orient {
            AxisOrient::Bottom | AxisOrient::Top => {
                let baseline = if self.orient == AxisOrient::Bottom {
                    TextBaseline::Hanging
                } else {
                    TextBaseline::Ideographic
                };
                // Keep the extent labels inside the plot's horizontal span.
                let anchor = if !continuous || n < 2 {
                    TextAnchor::Middle
                } else if i == 0 {
                    TextAnchor::Start
                } else if i + 1 == n {
                    TextAnchor::End
                } else {
                    TextAnchor::Middle
                };
                (anchor, baseline)
            }
            AxisOrient::Left => (TextAnchor::End, TextBaseline::Middle),
            AxisOrient::Right => (TextAnchor::Start, TextBaseline::Middle),
        }
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Reconciles one axis into a [`Scene`] pass after pass.
#[derive(Debug)]
pub struct AxisRenderer {
    spec: AxisSpec,
    group: GroupId,
    last_domain: Option<Domain>,
}

impl AxisRenderer {
    /// Creates a renderer; its marks live in the group named by `spec.id_base`.
    pub fn new(spec: AxisSpec) -> Self {
        let group = GroupId(spec.id_base);
        Self {
            spec,
            group,
            last_domain: None,
        }
    }

    /// The axis description.
    pub fn spec(&self) -> &AxisSpec {
        &self.spec
    }

    /// Replaces the axis description, keeping the domain history.
    pub fn set_spec(&mut self, spec: AxisSpec) {
        self.group = GroupId(spec.id_base);
        self.spec = spec;
    }

    /// The group holding this axis's marks.
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Draws `ticks` for `scale`, replacing whatever this axis drew before.
    ///
    /// Calling this again with the same inputs yields no diffs.
    pub fn render(
        &mut self,
        scene: &mut Scene,
        scale: &Scale,
        ticks: &[TickValue],
        geometry: &ContainerGeometry,
        phase: RenderPhase,
    ) -> Vec<MarkDiff> {
        let domain = scale.domain();
        let domain_changed = self.last_domain.as_ref() != Some(&domain);
        let marks = self.spec.marks(scale, ticks, geometry, phase, domain_changed);
        tracing::trace!(
            group = self.group.0,
            ticks = ticks.len(),
            marks = marks.len(),
            ?phase,
            domain_changed,
            "axis pass"
        );
        self.last_domain = Some(domain);
        scene.reconcile_group(self.group, marks)
    }

    /// Like [`AxisRenderer::render`], reading the phase from `gate` and flipping it afterwards.
    ///
    /// Use this when the axis is the only thing drawn per pass. Charts with several axes read
    /// the phase once and call [`AxisRenderer::render`] for each.
    pub fn render_gated(
        &mut self,
        scene: &mut Scene,
        scale: &Scale,
        ticks: &[TickValue],
        geometry: &ContainerGeometry,
        gate: &mut RenderGate,
    ) -> Vec<MarkDiff> {
        let phase = gate.phase();
        let diffs = self.render(scene, scale, ticks, geometry, phase);
        gate.mark_rendered();
        diffs
    }

    /// Removes this axis's marks and forgets the domain history.
    pub fn clear(&mut self, scene: &mut Scene) -> Vec<MarkDiff> {
        self.last_domain = None;
        scene.clear_group(self.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::AxisDataType;
    use crate::geometry::Margin;
    use crate::scale::ScaleBuilder;
    use trellis_core::{MarkPayload, TransitionKind};

    fn geometry() -> ContainerGeometry {
        ContainerGeometry::new(540.0, 340.0).with_margin(Margin::uniform(20.0))
    }

    fn linear_y(lo: f64, hi: f64) -> Scale {
        let range = AxisOrient::Left.range(geometry().plot_rect());
        ScaleBuilder::default()
            .build(
                &Domain::Continuous(lo, hi),
                range,
                AxisDataType::Number,
                ScaleKind::Linear,
            )
            .expect("linear scale")
    }

    fn band_x(keys: &[&str]) -> Scale {
        let range = AxisOrient::Bottom.range(geometry().plot_rect());
        ScaleBuilder::default()
            .build(
                &Domain::from_keys(keys.iter().copied()),
                range,
                AxisDataType::Band,
                ScaleKind::Band,
            )
            .expect("band scale")
    }

    #[test]
    fn draws_labels_markers_and_grid_without_domain_line() {
        let scale = band_x(&["a", "b", "c"]);
        let ticks = scale.tick_candidates(10);
        let spec = AxisSpec::bottom(100).with_grid(GridStyle::default());
        let mut scene = Scene::new();
        let mut axis = AxisRenderer::new(spec);
        axis.render(&mut scene, &scale, &ticks, &geometry(), RenderPhase::Update);

        assert_eq!(scene.count_with_class(CLASS_TICK_LABEL), 3);
        assert_eq!(scene.count_with_class(CLASS_GRID_LINE), 3);
        assert_eq!(scene.count_with_class(CLASS_TICK_MARKER), 3);
        assert_eq!(scene.count_with_class(CLASS_AXIS_X), 9);
        assert_eq!(scene.len(), 9);
    }

    #[test]
    fn repeated_render_does_not_duplicate() {
        let scale = linear_y(0.0, 100.0);
        let ticks = scale.tick_candidates(5);
        let mut scene = Scene::new();
        let mut axis = AxisRenderer::new(AxisSpec::left(200).with_grid(GridStyle::default()));
        let first = axis.render(&mut scene, &scale, &ticks, &geometry(), RenderPhase::Entrance);
        let count = scene.len();
        assert!(first.iter().all(MarkDiff::is_enter));

        let second = axis.render(&mut scene, &scale, &ticks, &geometry(), RenderPhase::Update);
        assert!(second.is_empty(), "unexpected diffs: {second:?}");
        assert_eq!(scene.len(), count);
    }

    #[test]
    fn entrance_fades_and_updates_apply_instantly() {
        let scale = band_x(&["x", "y"]);
        let ticks = scale.tick_candidates(10);
        let mut scene = Scene::new();
        let mut gate = RenderGate::new();
        let mut axis = AxisRenderer::new(AxisSpec::bottom(300));

        let diffs = axis.render_gated(&mut scene, &scale, &ticks, &geometry(), &mut gate);
        for d in &diffs {
            let MarkDiff::Enter { transition, .. } = d else {
                panic!("first pass only enters");
            };
            assert_eq!(
                *transition,
                Some(Transition::fade_in(HORIZONTAL_ENTRANCE_MS))
            );
        }
        assert!(!gate.is_first_render());

        let more = band_x(&["x", "y", "z"]);
        let ticks = more.tick_candidates(10);
        let diffs = axis.render_gated(&mut scene, &more, &ticks, &geometry(), &mut gate);
        let entered: Vec<_> = diffs.iter().filter(|d| d.is_enter()).collect();
        assert_eq!(entered.len(), 2, "one label and one marker enter");
        for d in diffs {
            match d {
                MarkDiff::Enter { transition, .. } | MarkDiff::Update { transition, .. } => {
                    assert_eq!(transition, None);
                }
                MarkDiff::Exit { .. } => panic!("nothing exits"),
            }
        }
        assert!(scene.marks().all(|m| m.transition.is_none()));
    }

    #[test]
    fn zero_line_is_solid_and_tweens_only_on_domain_change() {
        let mut scene = Scene::new();
        let spec = AxisSpec::left(400).with_grid(GridStyle::default());
        let mut axis = AxisRenderer::new(spec);
        let g = geometry();

        let a = linear_y(-50.0, 50.0);
        let ticks = a.tick_candidates(4);
        axis.render(&mut scene, &a, &ticks, &g, RenderPhase::Entrance);
        assert_eq!(scene.count_with_class(CLASS_ZERO_LINE), 1);
        let zero = scene
            .marks_with_class(CLASS_ZERO_LINE)
            .next()
            .expect("zero line");
        let MarkPayload::Path(path) = &zero.payload else {
            panic!("zero line is a path");
        };
        assert!(path.dash.is_empty());
        assert_eq!(path.stroke_width, 1.5);
        let zero_id = zero.id;

        // Same domain: nothing to do.
        let diffs = axis.render(&mut scene, &a, &ticks, &g, RenderPhase::Update);
        assert!(diffs.is_empty());

        // New domain moves the zero line, with a tween.
        let b = linear_y(-20.0, 80.0);
        let ticks = b.tick_candidates(4);
        let diffs = axis.render(&mut scene, &b, &ticks, &g, RenderPhase::Update);
        let zero_update = diffs
            .iter()
            .find(|d| d.id() == zero_id)
            .expect("zero line moved");
        let MarkDiff::Update { transition, .. } = zero_update else {
            panic!("zero line updates in place");
        };
        assert_eq!(
            transition.map(|t| t.kind),
            Some(TransitionKind::Tween)
        );
        for d in diffs.iter().filter(|d| d.id() != zero_id) {
            if let MarkDiff::Enter { transition, .. } | MarkDiff::Update { transition, .. } = d {
                assert_eq!(*transition, None);
            }
        }
    }

    #[test]
    fn zero_line_is_not_emphasized_on_horizontal_axes() {
        let range = AxisOrient::Bottom.range(geometry().plot_rect());
        let scale = ScaleBuilder::default()
            .build(
                &Domain::Continuous(-10.0, 10.0),
                range,
                AxisDataType::Number,
                ScaleKind::Linear,
            )
            .expect("linear scale");
        let ticks = scale.tick_candidates(4);
        let mut scene = Scene::new();
        let mut axis = AxisRenderer::new(AxisSpec::bottom(500).with_grid(GridStyle::default()));
        axis.render(&mut scene, &scale, &ticks, &geometry(), RenderPhase::Update);
        assert_eq!(scene.count_with_class(CLASS_ZERO_LINE), 0);
        assert_eq!(scene.count_with_class(CLASS_GRID_LINE), ticks.len());
    }

    #[test]
    fn empty_tick_set_draws_nothing_and_clears_previous_marks() {
        let scale = band_x(&["a"]);
        let ticks = scale.tick_candidates(10);
        let mut scene = Scene::new();
        let mut axis = AxisRenderer::new(AxisSpec::bottom(600).with_grid(GridStyle::default()));
        axis.render(&mut scene, &scale, &ticks, &geometry(), RenderPhase::Update);
        assert!(!scene.is_empty());

        let empty = band_x(&[]);
        let diffs = axis.render(&mut scene, &empty, &[], &geometry(), RenderPhase::Update);
        assert!(diffs.iter().all(MarkDiff::is_exit));
        assert!(scene.is_empty());
    }

    #[test]
    fn formatter_is_used_and_non_finite_values_read_invalid() {
        let scale = linear_y(0.0, 10.0);
        let spec = AxisSpec::left(700).with_formatter(|t| match t {
            TickValue::Value(v) => format!("{v}%"),
            TickValue::Category(c) => c.clone(),
        });
        let ticks = [TickValue::Value(5.0)];
        assert_eq!(spec.label(&scale, &ticks[0], &ticks), "5%");
        assert_eq!(
            spec.label(&scale, &TickValue::Value(f64::NAN), &ticks),
            INVALID_LABEL
        );

        let mut scene = Scene::new();
        let mut axis = AxisRenderer::new(spec);
        let ticks = [TickValue::Value(f64::INFINITY), TickValue::Value(5.0)];
        axis.render(&mut scene, &scale, &ticks, &geometry(), RenderPhase::Update);
        assert_eq!(scene.count_with_class(CLASS_TICK_LABEL), 2);
        assert_eq!(scene.count_with_class(CLASS_TICK_MARKER), 1);
        let invalid = scene
            .marks_with_class(CLASS_TICK_LABEL)
            .find_map(|m| match &m.payload {
                MarkPayload::Text(t) if t.text == INVALID_LABEL => Some(t.pos),
                _ => None,
            })
            .expect("invalid label drawn");
        // Pinned to the start of the value axis: the bottom of the plot.
        assert_eq!(invalid.y, geometry().plot_rect().y1);
    }

    #[test]
    fn adjacent_id_bases_do_not_collide() {
        let mut scene = Scene::new();
        let scale = band_x(&["a", "b"]);
        let ticks = scale.tick_candidates(10);
        let spec = AxisSpec::bottom(100).with_grid(GridStyle::default());
        let mut first = AxisRenderer::new(spec.clone());
        let mut second = AxisRenderer::new(AxisSpec { id_base: 101, ..spec.clone() });
        let mut third = AxisRenderer::new(AxisSpec { id_base: 102, ..spec });
        let g = geometry();
        first.render(&mut scene, &scale, &ticks, &g, RenderPhase::Update);
        second.render(&mut scene, &scale, &ticks, &g, RenderPhase::Update);
        third.render(&mut scene, &scale, &ticks, &g, RenderPhase::Update);

        // Label, gridline, and marker per tick, for each of the three axes.
        assert_eq!(scene.len(), 3 * 3 * ticks.len());
        assert_eq!(scene.group_len(GroupId(100)), 6);
        assert_eq!(scene.group_len(GroupId(101)), 6);
        assert_eq!(scene.group_len(GroupId(102)), 6);
    }

    #[test]
    fn axes_reconcile_independently() {
        let mut scene = Scene::new();
        let x = band_x(&["a", "b"]);
        let y = linear_y(0.0, 10.0);
        let mut xa = AxisRenderer::new(AxisSpec::bottom(800));
        let mut ya = AxisRenderer::new(AxisSpec::left(900));
        xa.render(&mut scene, &x, &x.tick_candidates(10), &geometry(), RenderPhase::Update);
        let y_ticks = y.tick_candidates(5);
        ya.render(&mut scene, &y, &y_ticks, &geometry(), RenderPhase::Update);
        let before = scene.count_with_class(CLASS_AXIS_Y);

        let diffs = xa.clear(&mut scene);
        assert_eq!(diffs.len(), 4);
        assert_eq!(scene.count_with_class(CLASS_AXIS_X), 0);
        assert_eq!(scene.count_with_class(CLASS_AXIS_Y), before);
    }
}

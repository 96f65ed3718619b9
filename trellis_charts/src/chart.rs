// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart instances: mount, render, update, unmount.
//!
//! A [`ChartInstance`] owns everything that outlives a single render pass: its retained
//! [`Scene`], its two [`AxisRenderer`]s, and its [`RenderGate`]. Every pass runs in a fixed
//! order:
//! 1. normalize keys and compute the x and value domains from visible series,
//! 2. build both scales,
//! 3. select ticks from each scale; continuous scales are niced with the tick count that fits,
//!    so their domain ends carry ticks,
//! 4. read the render phase once, draw both axes with it, then flip the gate,
//! 5. schedule metadata describing what was drawn.
//!
//! Unmounting drops the instance (and so its gate); a later mount starts with a fresh gate and
//! animates again.

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use peniko::Color;
use trellis_core::{MarkDiff, Scene};

use crate::axis::{AxisOrient, AxisRenderer, AxisSpec, GridStyle, TickFormatter};
use crate::context::ChartContext;
use crate::date::{AxisDataType, RawValue, normalize};
use crate::error::ChartResult;
use crate::gate::{RenderGate, RenderPhase};
use crate::geometry::{ContainerGeometry, Margin};
use crate::measure::{HeuristicTextMeasurer, TextMeasurer};
use crate::metadata::{ChartId, ChartMetadata, ChartType, MetadataBus};
use crate::scale::{Domain, Scale, ScaleBuilder, ScaleKind, TickValue};
use crate::svg;
use crate::ticks::{DEFAULT_LABEL_WIDTH, DEFAULT_TICK_COUNT, TickSelector, measured_label_width};

/// Id base (and group) of the x axis.
pub const X_AXIS_ID: u64 = 0x100;
/// Id base (and group) of the value axis.
pub const Y_AXIS_ID: u64 = 0x200;
/// Vertical pixels reserved per value-axis label.
pub const Y_LABEL_SLOT: f64 = 30.0;
/// Headroom added above the maximum of a gap chart.
pub const GAP_HEADROOM: f64 = 0.05;

const MEASURED_LABEL_GAP: f64 = 12.0;

/// One keyed value.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    /// Date or category key.
    pub key: RawValue,
    /// Numeric value.
    pub value: f64,
}

impl DataPoint {
    /// Creates a point.
    pub fn new(key: impl Into<RawValue>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// A named sequence of points.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    /// Series key, used for visibility, highlight, and color lookups.
    pub key: String,
    /// Points in input order.
    pub points: Vec<DataPoint>,
}

impl Series {
    /// An empty series.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            points: Vec::new(),
        }
    }

    /// Appends a point.
    pub fn with_point(mut self, key: impl Into<RawValue>, value: f64) -> Self {
        self.points.push(DataPoint::new(key, value));
        self
    }
}

/// The input of a render pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    /// Series in draw order.
    pub series: Vec<Series>,
}

impl Dataset {
    /// An empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a series.
    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Returns `true` when no series holds a point.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Per-chart configuration.
#[derive(Clone)]
pub struct ChartConfig {
    /// Container width.
    pub width: f64,
    /// Container height.
    pub height: f64,
    /// Margins around the plot.
    pub margin: Margin,
    /// How x keys are interpreted.
    pub axis_data_type: AxisDataType,
    /// Chart type; bar charts use a band x axis.
    pub chart_type: ChartType,
    /// Requested tick count for both axes.
    pub tick_count: usize,
    /// X label formatter.
    pub x_formatter: Option<TickFormatter>,
    /// Value label formatter.
    pub y_formatter: Option<TickFormatter>,
    /// Vertical gridlines from the x axis.
    pub grid_x: bool,
    /// Horizontal gridlines from the value axis.
    pub grid_y: bool,
    /// Marker dots on both axes.
    pub markers: bool,
    /// Size x tick density by measured label width instead of the fixed estimate.
    pub measured_labels: bool,
    /// Overrides the shared highlight items.
    pub highlight_items: Option<Vec<String>>,
    /// Overrides the shared disabled items.
    pub disabled_items: Option<Vec<String>>,
    /// Overrides the shared color mapping.
    pub colors_mapping: Option<HashMap<String, Color>>,
}

impl core::fmt::Debug for ChartConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChartConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("margin", &self.margin)
            .field("axis_data_type", &self.axis_data_type)
            .field("chart_type", &self.chart_type)
            .field("tick_count", &self.tick_count)
            .field("x_formatter", &self.x_formatter.is_some())
            .field("y_formatter", &self.y_formatter.is_some())
            .field("grid_x", &self.grid_x)
            .field("grid_y", &self.grid_y)
            .field("markers", &self.markers)
            .field("measured_labels", &self.measured_labels)
            .field("highlight_items", &self.highlight_items)
            .field("disabled_items", &self.disabled_items)
            .field("colors_mapping", &self.colors_mapping)
            .finish()
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            margin: Margin::default(),
            axis_data_type: AxisDataType::default(),
            chart_type: ChartType::default(),
            tick_count: DEFAULT_TICK_COUNT,
            x_formatter: None,
            y_formatter: None,
            grid_x: false,
            grid_y: true,
            markers: true,
            measured_labels: false,
            highlight_items: None,
            disabled_items: None,
            colors_mapping: None,
        }
    }
}

impl ChartConfig {
    /// Sets the container size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the margins.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the x key interpretation.
    pub fn with_axis_data_type(mut self, data_type: AxisDataType) -> Self {
        self.axis_data_type = data_type;
        self
    }

    /// Sets the chart type.
    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.chart_type = chart_type;
        self
    }

    /// Sets the requested tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Sets the x label formatter.
    pub fn with_x_formatter(
        mut self,
        f: impl Fn(&TickValue) -> String + Send + Sync + 'static,
    ) -> Self {
        self.x_formatter = Some(Arc::new(f));
        self
    }

    /// Sets the value label formatter.
    pub fn with_y_formatter(
        mut self,
        f: impl Fn(&TickValue) -> String + Send + Sync + 'static,
    ) -> Self {
        self.y_formatter = Some(Arc::new(f));
        self
    }

    /// Enables or disables gridlines per axis.
    pub fn with_grid(mut self, x: bool, y: bool) -> Self {
        self.grid_x = x;
        self.grid_y = y;
        self
    }

    /// Enables or disables tick markers.
    pub fn with_markers(mut self, markers: bool) -> Self {
        self.markers = markers;
        self
    }

    /// Enables or disables measured label density.
    pub fn with_measured_labels(mut self, measured: bool) -> Self {
        self.measured_labels = measured;
        self
    }

    /// Overrides the shared highlight items.
    pub fn with_highlight_items(mut self, items: Vec<String>) -> Self {
        self.highlight_items = Some(items);
        self
    }

    /// Overrides the shared disabled items.
    pub fn with_disabled_items(mut self, items: Vec<String>) -> Self {
        self.disabled_items = Some(items);
        self
    }

    /// Overrides the shared color mapping.
    pub fn with_colors_mapping(mut self, colors: HashMap<String, Color>) -> Self {
        self.colors_mapping = Some(colors);
        self
    }

    /// The container geometry.
    pub fn geometry(&self) -> ContainerGeometry {
        ContainerGeometry::new(self.width, self.height).with_margin(self.margin)
    }

    /// Scale kind of the x axis.
    pub fn x_scale_kind(&self) -> ScaleKind {
        if self.chart_type == ChartType::Bar {
            ScaleKind::Band
        } else {
            ScaleKind::for_data_type(self.axis_data_type)
        }
    }

    /// `shared` with this chart's overrides applied.
    pub fn effective_context(&self, shared: &ChartContext) -> ChartContext {
        let mut ctx = shared.clone();
        if let Some(items) = &self.highlight_items {
            ctx.highlight_items.clone_from(items);
        }
        if let Some(items) = &self.disabled_items {
            ctx.disabled_items.clone_from(items);
        }
        if let Some(colors) = &self.colors_mapping {
            ctx.colors_mapping.clone_from(colors);
        }
        ctx
    }

    fn x_axis_spec(&self) -> AxisSpec {
        let spec = AxisSpec::new(X_AXIS_ID, AxisOrient::Bottom)
            .with_markers(self.markers)
            .with_shared_formatter(self.x_formatter.clone());
        if self.grid_x {
            spec.with_grid(GridStyle::default())
        } else {
            spec
        }
    }

    fn y_axis_spec(&self) -> AxisSpec {
        let spec = AxisSpec::new(Y_AXIS_ID, AxisOrient::Left)
            .with_markers(self.markers)
            .with_shared_formatter(self.y_formatter.clone());
        if self.grid_y {
            spec.with_grid(GridStyle::default())
        } else {
            spec
        }
    }
}

/// Everything one render pass computed.
#[derive(Debug)]
pub struct RenderOutput {
    /// Phase both axes were drawn with.
    pub phase: RenderPhase,
    /// The x scale.
    pub x_scale: Scale,
    /// The value scale.
    pub y_scale: Scale,
    /// Ticks drawn on the x axis.
    pub x_ticks: Vec<TickValue>,
    /// Ticks drawn on the value axis.
    pub y_ticks: Vec<TickValue>,
    /// Scene changes, x axis first.
    pub diffs: Vec<MarkDiff>,
    /// Context after this chart's overrides, for drawing series.
    pub context: ChartContext,
    /// Metadata scheduled for this pass.
    pub metadata: ChartMetadata,
}

/// A mounted chart.
pub struct ChartInstance {
    id: ChartId,
    config: ChartConfig,
    gate: RenderGate,
    scene: Scene,
    x_axis: AxisRenderer,
    y_axis: AxisRenderer,
    scales: ScaleBuilder,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl core::fmt::Debug for ChartInstance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChartInstance")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("gate", &self.gate)
            .field("marks", &self.scene.len())
            .finish_non_exhaustive()
    }
}

impl ChartInstance {
    /// Mounts a chart with a fresh render gate.
    pub fn mount(id: impl Into<ChartId>, config: ChartConfig) -> ChartResult<Self> {
        config.geometry().validate()?;
        let id = id.into();
        tracing::debug!(chart = %id, chart_type = %config.chart_type, "chart mounted");
        Ok(Self {
            x_axis: AxisRenderer::new(config.x_axis_spec()),
            y_axis: AxisRenderer::new(config.y_axis_spec()),
            id,
            config,
            gate: RenderGate::new(),
            scene: Scene::new(),
            scales: ScaleBuilder::default(),
            measurer: Arc::new(HeuristicTextMeasurer),
        })
    }

    /// Uses `measurer` for measured label density.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + Send + Sync + 'static) -> Self {
        self.measurer = Arc::new(measurer);
        self
    }

    /// Replaces the scale construction rules.
    pub fn with_scale_builder(mut self, scales: ScaleBuilder) -> Self {
        self.scales = scales;
        self
    }

    /// The chart id.
    pub fn id(&self) -> &ChartId {
        &self.id
    }

    /// The current configuration.
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// The render gate.
    pub fn gate(&self) -> &RenderGate {
        &self.gate
    }

    /// The retained axis marks.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Applies a prop update. The render gate is kept.
    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        config.geometry().validate()?;
        self.x_axis.set_spec(config.x_axis_spec());
        self.y_axis.set_spec(config.y_axis_spec());
        self.config = config;
        Ok(())
    }

    /// Runs one render pass over `dataset`.
    ///
    /// Metadata for the pass is scheduled on `bus`, replacing any undelivered metadata of this
    /// chart.
    pub fn render(
        &mut self,
        dataset: &Dataset,
        shared: &ChartContext,
        bus: &mut MetadataBus,
    ) -> ChartResult<RenderOutput> {
        let geometry = self.config.geometry();
        geometry.validate()?;
        let context = self.config.effective_context(shared);
        let data_type = self.config.axis_data_type;
        let x_kind = self.config.x_scale_kind();

        let mut x_keys = Vec::new();
        let mut seen_keys = HashSet::new();
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let mut visible = Vec::new();
        let mut rendered = HashMap::new();
        for series in &dataset.series {
            if context.is_disabled(&series.key) {
                continue;
            }
            visible.push(series.key.clone());
            let mut drawn = Vec::new();
            for point in &series.points {
                if !point.value.is_finite() {
                    tracing::trace!(
                        series = %series.key,
                        key = %point.key,
                        "excluding non-finite value"
                    );
                    continue;
                }
                if x_kind == ScaleKind::Band {
                    // Bars on a date axis still drop keys that are not dates.
                    if data_type.is_date() && normalize(&point.key, data_type).is_none() {
                        continue;
                    }
                } else {
                    let Some(x) = normalize(&point.key, data_type) else {
                        continue;
                    };
                    xs.push(x);
                }
                let key = point.key.to_key_string();
                if seen_keys.insert(key.clone()) {
                    x_keys.push(key);
                }
                ys.push(point.value);
                drawn.push(point.clone());
            }
            rendered.insert(series.key.clone(), drawn);
        }

        let x_domain = if x_kind == ScaleKind::Band {
            Domain::from_keys(x_keys.iter().cloned())
        } else {
            Domain::from_values(xs)
        };
        let y_domain = match self.config.chart_type {
            ChartType::Gap => Domain::with_headroom(ys, GAP_HEADROOM),
            ChartType::Line | ChartType::Bar | ChartType::Area => Domain::from_values(ys),
        };

        let (x_scale, x_ticks) = self.resolve_axis(
            &x_domain,
            data_type,
            x_kind,
            self.x_axis.spec(),
            DEFAULT_LABEL_WIDTH,
            &geometry,
        )?;
        let (y_scale, y_ticks) = self.resolve_axis(
            &y_domain,
            AxisDataType::Number,
            ScaleKind::Linear,
            self.y_axis.spec(),
            Y_LABEL_SLOT,
            &geometry,
        )?;

        let phase = self.gate.phase();
        let mut diffs = self
            .x_axis
            .render(&mut self.scene, &x_scale, &x_ticks, &geometry, phase);
        diffs.extend(
            self.y_axis
                .render(&mut self.scene, &y_scale, &y_ticks, &geometry, phase),
        );
        self.gate.mark_rendered();

        let y_axis_domain = y_scale.domain().bounds().map_or([0.0, 0.0], |(a, b)| [a, b]);
        let metadata = ChartMetadata {
            x_axis_domain: x_keys,
            y_axis_domain,
            visible_items: visible,
            rendered_data: rendered,
            chart_type: self.config.chart_type,
        };
        bus.schedule(self.id.clone(), metadata.clone());
        tracing::debug!(
            chart = %self.id,
            ?phase,
            x_ticks = x_ticks.len(),
            y_ticks = y_ticks.len(),
            diffs = diffs.len(),
            "chart rendered"
        );

        Ok(RenderOutput {
            phase,
            x_scale,
            y_scale,
            x_ticks,
            y_ticks,
            diffs,
            context,
            metadata,
        })
    }

    /// Builds the scale for one axis together with the ticks drawn on it.
    ///
    /// Band axes thin their categories with a [`TickSelector`]. Continuous axes lower the nice
    /// count until the round-number ticks fit instead, which keeps them evenly spaced and puts a
    /// tick on both ends of the niced domain.
    fn resolve_axis(
        &self,
        domain: &Domain,
        data_type: AxisDataType,
        kind: ScaleKind,
        spec: &AxisSpec,
        label_width: f64,
        geometry: &ContainerGeometry,
    ) -> ChartResult<(Scale, Vec<TickValue>)> {
        let plot = geometry.plot_rect();
        let range = spec.orient.range(plot);
        let available = spec.orient.available_length(plot);
        let requested = self.config.tick_count;
        // Only horizontal labels compete for width; vertical ones stack by line height.
        let measured = self.config.measured_labels && spec.orient.is_horizontal();

        if kind == ScaleKind::Band {
            let scale = self.scales.build(domain, range, data_type, kind)?;
            let candidates = scale.tick_candidates(requested);
            let width = if measured {
                self.measured_width(&scale, spec, &candidates)
            } else {
                label_width
            };
            let ticks = TickSelector::new(width).select(&candidates, available, requested);
            return Ok((scale, ticks));
        }

        let budget = TickSelector::new(label_width).effective_count(available, requested);
        let (scale, ticks) = self.fit_continuous(domain, range, data_type, kind, budget)?;
        if measured {
            let width = self.measured_width(&scale, spec, &ticks);
            let budget = TickSelector::new(width).effective_count(available, requested);
            if ticks.len() > budget {
                return self.fit_continuous(domain, range, data_type, kind, budget);
            }
        }
        Ok((scale, ticks))
    }

    /// The finest nice scale whose ticks number at most `budget`.
    fn fit_continuous(
        &self,
        domain: &Domain,
        range: (f64, f64),
        data_type: AxisDataType,
        kind: ScaleKind,
        budget: usize,
    ) -> ChartResult<(Scale, Vec<TickValue>)> {
        let mut count = budget.max(1);
        loop {
            let scale = self
                .scales
                .with_nice_count(count)
                .build(domain, range, data_type, kind)?;
            let ticks = scale.tick_candidates(count);
            if ticks.len() <= budget {
                tracing::trace!(?kind, budget, count, ticks = ticks.len(), "fitted ticks");
                return Ok((scale, ticks));
            }
            if count == 1 {
                // Nothing coarser exists; label the domain ends only.
                let ends = match (ticks.first(), ticks.last()) {
                    (Some(first), Some(last)) => vec![first.clone(), last.clone()],
                    _ => Vec::new(),
                };
                return Ok((scale, ends));
            }
            count -= 1;
        }
    }

    fn measured_width(&self, scale: &Scale, spec: &AxisSpec, ticks: &[TickValue]) -> f64 {
        let labels: Vec<String> = ticks.iter().map(|t| spec.label(scale, t, ticks)).collect();
        measured_label_width(
            &labels,
            self.measurer.as_ref(),
            spec.style.label_font_size,
            MEASURED_LABEL_GAP,
        )
    }

    /// Serializes the axis marks as standalone SVG.
    pub fn to_svg(&self) -> String {
        svg::scene_to_svg(&self.scene, self.config.width, self.config.height)
    }

    /// Tears the chart down: cancels pending metadata and removes every axis mark.
    ///
    /// The render gate goes with the instance.
    pub fn unmount(mut self, bus: &mut MetadataBus) -> Vec<MarkDiff> {
        bus.cancel(&self.id);
        let mut diffs = self.x_axis.clear(&mut self.scene);
        diffs.extend(self.y_axis.clear(&mut self.scene));
        tracing::debug!(chart = %self.id, removed = diffs.len(), "chart unmounted");
        diffs
    }
}

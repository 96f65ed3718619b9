// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis tick selection and scale synchronization for `trellis_core` charts.
//!
//! Every render pass of a chart runs the same pipeline:
//! - **Date normalization** turns raw keys (`2020`, `"202003"`, `"2020-03-01"`) into numbers
//!   according to an [`AxisDataType`].
//! - **Scale construction** ([`ScaleBuilder`]) maps a [`Domain`] onto a pixel range as a linear,
//!   calendar, or band [`Scale`].
//! - **Tick selection** ([`TickSelector`]) thins the scale's tick candidates to what fits,
//!   always keeping the first and last entries.
//! - **Axis rendering** ([`AxisRenderer`]) reconciles labels, gridlines, and marker dots into a
//!   retained `trellis_core::Scene`, keyed by tick value.
//!
//! A per-mount [`RenderGate`] decides whether a pass is the entrance (marks fade in) or an
//! update (geometry applies immediately). [`ChartInstance`] wires the pipeline together and
//! publishes [`ChartMetadata`] through a [`MetadataBus`].
//!
//! Series marks are out of scope; hosts draw them from [`RenderOutput`]'s scales.

mod axis;
mod chart;
mod context;
mod date;
mod error;
mod format;
mod gate;
mod geometry;
mod measure;
mod metadata;
mod rule_mark;
mod scale;
mod svg;
mod ticks;
mod time;
mod z_order;

pub use axis::{
    AxisOrient, AxisRenderer, AxisSpec, AxisStyle, CLASS_AXIS_X, CLASS_AXIS_Y, CLASS_GRID_LINE,
    CLASS_TICK_LABEL, CLASS_TICK_MARKER, CLASS_ZERO_LINE, GridStyle, HORIZONTAL_ENTRANCE_MS,
    StrokeStyle, TickFormatter, VERTICAL_ENTRANCE_MS, ZERO_LINE_TWEEN_MS,
};
pub use chart::{
    ChartConfig, ChartInstance, DataPoint, Dataset, GAP_HEADROOM, RenderOutput, Series,
    X_AXIS_ID, Y_AXIS_ID, Y_LABEL_SLOT,
};
pub use context::{ChartContext, ContextStore};
pub use date::{
    AxisDataType, DateError, RawValue, UnknownAxisDataType, month_start_ms, normalize, parse_date,
};
pub use error::{ChartError, ChartResult};
pub use format::{INVALID_LABEL, format_number, format_tick_with_step, tick_step};
pub use gate::{RenderGate, RenderGateState, RenderPhase};
pub use geometry::{ContainerGeometry, Margin};
pub use measure::{HeuristicTextMeasurer, TextExtent, TextMeasurer};
pub use metadata::{ChartId, ChartMetadata, ChartType, MetadataBus, SubscriptionId};
pub use rule_mark::RuleMarkSpec;
pub use scale::{
    Domain, Scale, ScaleBand, ScaleBuilder, ScaleKind, ScaleLinear, ScaleTime, TickValue,
};
pub use svg::scene_to_svg;
pub use ticks::{
    DEFAULT_LABEL_WIDTH, DEFAULT_TICK_COUNT, TickSelector, measured_label_width, select_ticks,
};
pub use time::{
    CalendarStep, CalendarUnit, calendar_step, calendar_ticks, format_calendar,
    nice_calendar_domain,
};
pub use z_order::*;

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for axis marks.
//!
//! Every mark carries an explicit `z_index`. Renderers sort by `(z_index, MarkId)` for a
//! deterministic tie-break.

/// Dashed gridlines, drawn behind everything else.
pub const GRID_LINES: i32 = -50;
/// The emphasized zero line, above ordinary gridlines.
pub const ZERO_LINE: i32 = -40;

/// Series marks drawn by the host chart.
pub const SERIES: i32 = 0;

/// Per-tick marker dots.
pub const AXIS_MARKERS: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;

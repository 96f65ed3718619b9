// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales: mappings from a logical domain to a pixel range.
//!
//! Scales are rebuilt, never mutated, whenever their domain, range, or axis data type changes.
//! [`ScaleBuilder`] picks the construction rules per [`ScaleKind`]:
//! - `Linear`: "nice" numeric domain, clamped output.
//! - `Time`: domain snapped to whole calendar months or years, clamped output.
//! - `Band`: ordered unique categories divided into equal, padded slots.

use core::fmt;

use hashbrown::{HashMap, HashSet};

use crate::date::AxisDataType;
use crate::error::{ChartError, ChartResult};
use crate::format::{format_tick_with_step, tick_step};
use crate::time::{self, CalendarStep, CalendarUnit};

/// The family of a scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleKind {
    /// Continuous numeric scale.
    Linear,
    /// Continuous calendar scale over epoch milliseconds.
    Time,
    /// Discrete categorical scale.
    Band,
}

impl ScaleKind {
    /// The kind an axis of `data_type` uses by default.
    pub fn for_data_type(data_type: AxisDataType) -> Self {
        match data_type {
            AxisDataType::Number => Self::Linear,
            AxisDataType::DateAnnual | AxisDataType::DateMonthly => Self::Time,
            AxisDataType::Band => Self::Band,
        }
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linear => "linear",
            Self::Time => "time",
            Self::Band => "band",
        })
    }
}

/// The logical extent of an axis.
#[derive(Clone, Debug, PartialEq)]
pub enum Domain {
    /// No usable values.
    Empty,
    /// A `[min, max]` interval.
    Continuous(f64, f64),
    /// Ordered unique category keys.
    Discrete(Vec<String>),
}

impl Domain {
    /// `[min, max]` of the finite `values`, or [`Domain::Empty`] if there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            if !v.is_finite() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_finite() && max.is_finite() {
            Self::Continuous(min, max)
        } else {
            Self::Empty
        }
    }

    /// Unique `keys` in first-seen order.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out: Vec<String> = Vec::new();
        for k in keys {
            let k = k.into();
            if seen.insert(k.clone()) {
                out.push(k);
            }
        }
        Self::Discrete(out)
    }

    /// Value domain with headroom above the maximum.
    ///
    /// The maximum grows by `fraction` of its magnitude. The minimum is pinned to zero when every
    /// value is non-negative and left untouched otherwise.
    pub fn with_headroom(values: impl IntoIterator<Item = f64>, fraction: f64) -> Self {
        let Self::Continuous(min, max) = Self::from_values(values) else {
            return Self::Empty;
        };
        let max = max + max.abs() * fraction.max(0.0);
        let min = if min >= 0.0 { 0.0 } else { min };
        Self::Continuous(min, max)
    }

    /// Returns `true` when the domain holds no values.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Continuous(..) => false,
            Self::Discrete(keys) => keys.is_empty(),
        }
    }

    /// Continuous bounds, if any.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous(a, b) => Some((*a, *b)),
            _ => None,
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Continuous(..) => "continuous",
            Self::Discrete(_) => "discrete",
        }
    }
}

/// A value an axis can place a tick at.
#[derive(Clone, Debug, PartialEq)]
pub enum TickValue {
    /// A continuous value (number or epoch milliseconds).
    Value(f64),
    /// A category key.
    Category(String),
}

impl TickValue {
    /// The continuous value, if this is one.
    pub fn as_value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Category(_) => None,
        }
    }

    /// Bytes identifying this tick, stable across passes.
    pub fn key_bytes(&self) -> Vec<u8> {
        match self {
            // `+ 0.0` folds -0.0 into 0.0.
            Self::Value(v) => (v + 0.0).to_bits().to_le_bytes().to_vec(),
            Self::Category(s) => s.as_bytes().to_vec(),
        }
    }
}

impl From<f64> for TickValue {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for TickValue {
    fn from(value: &str) -> Self {
        Self::Category(value.to_owned())
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
    empty: bool,
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
            empty: false,
        }
    }

    /// A scale with no domain; every value maps to the middle of `range`.
    pub fn degenerate(range: (f64, f64)) -> Self {
        Self {
            domain: (0.0, 0.0),
            range,
            clamp: true,
            empty: true,
        }
    }

    /// Enables or disables output clamping to the range.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Expands the domain outward to round tick boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        if !self.empty {
            self.domain = nice_domain(self.domain.0, self.domain.1, count);
        }
        self
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if self.empty || denom == 0.0 {
            return 0.5 * (r0 + r1);
        }
        let mut t = (x - d0) / denom;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }

    /// Maps a range position back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let mut t = (y - r0) / denom;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        d0 + t * (d1 - d0)
    }

    /// The `(min, max)` domain after any nice rounding.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The `(start, end)` pixel range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns `true` for a scale built from an empty domain.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Returns “nice-ish” tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if self.empty {
            return Vec::new();
        }
        let (lo, hi) = ordered(self.domain);
        let eps = (hi - lo).abs() * 1e-9;
        nice_ticks(lo, hi, count)
            .into_iter()
            .filter(|v| *v >= lo - eps && *v <= hi + eps)
            .collect()
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Expands `[d0, d1]` until it starts and ends on ticks of its own step.
///
/// Widening the domain can coarsen the step, so rounding repeats until it settles.
fn nice_domain(d0: f64, d1: f64, count: usize) -> (f64, f64) {
    let (mut lo, mut hi) = ordered((d0, d1));
    for _ in 0..NICE_ITERATIONS {
        let ticks = nice_ticks(lo, hi, count);
        let (Some(&a), Some(&b)) = (ticks.first(), ticks.last()) else {
            break;
        };
        if ticks.len() < 2 || (a == lo && b == hi) {
            break;
        }
        lo = a;
        hi = b;
    }
    if d0 <= d1 { (lo, hi) } else { (hi, lo) }
}

const NICE_ITERATIONS: usize = 10;

fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let span = max - min;
    let step = nice_step(span / count as f64);
    if step == 0.0 {
        return vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    // Snap to the step grid so accumulated error doesn't leak into labels (0.30000000000000004).
    (0..=n)
        .map(|i| ((start + step * i as f64) / step).round() * step)
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A calendar scale over epoch milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
    finest: CalendarUnit,
}

impl ScaleTime {
    /// Creates a time scale stepping by at least `finest` units.
    pub fn new(domain: (f64, f64), range: (f64, f64), finest: CalendarUnit) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
            finest,
        }
    }

    /// A time scale with no domain.
    pub fn degenerate(range: (f64, f64), finest: CalendarUnit) -> Self {
        Self {
            inner: ScaleLinear::degenerate(range),
            finest,
        }
    }

    /// Enables or disables output clamping to the range.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.inner = self.inner.with_clamp(clamp);
        self
    }

    /// Snaps the domain outward to the calendar step chosen for `count` ticks.
    ///
    /// The result starts and ends on ticks of that step.
    pub fn nice(mut self, count: usize) -> Self {
        if self.inner.is_empty() {
            return self;
        }
        let (mut lo, mut hi) = ordered(self.inner.domain());
        for _ in 0..NICE_ITERATIONS {
            let step = time::calendar_step(lo, hi, count, self.finest);
            let (a, b) = time::nice_calendar_domain(lo, hi, step);
            if a == lo && b == hi {
                break;
            }
            lo = a;
            hi = b;
        }
        self.inner = ScaleLinear {
            domain: (lo, hi),
            ..self.inner
        };
        self
    }

    /// The calendar step used for `count` ticks.
    pub fn step(&self, count: usize) -> CalendarStep {
        let (d0, d1) = ordered(self.inner.domain());
        time::calendar_step(d0, d1, count, self.finest)
    }

    /// Maps an instant into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Maps a range position back to an instant.
    pub fn invert(&self, y: f64) -> f64 {
        self.inner.invert(y)
    }

    /// The `(min, max)` domain in epoch milliseconds.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    /// The `(start, end)` pixel range.
    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    /// Returns `true` for a scale built from an empty domain.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The finest calendar unit ticks may use.
    pub fn finest_unit(&self) -> CalendarUnit {
        self.finest
    }

    /// Calendar-aligned tick instants inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if self.inner.is_empty() {
            return Vec::new();
        }
        let (d0, d1) = ordered(self.inner.domain());
        time::calendar_ticks(d0, d1, self.step(count))
    }
}

/// A discrete band scale for categorical axes.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBand {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a band scale over `domain` (duplicates dropped, first occurrence wins).
    pub fn new(domain: Vec<String>, range: (f64, f64)) -> Self {
        let mut keys = Vec::with_capacity(domain.len());
        let mut index = HashMap::with_capacity(domain.len());
        for k in domain {
            if !index.contains_key(&k) {
                index.insert(k.clone(), keys.len());
                keys.push(k);
            }
        }
        Self {
            domain: keys,
            index,
            range,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.domain.len() as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.domain.len()
    }

    /// Returns the categories in order.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// The `(start, end)` pixel range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Position of `key` in the domain.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Returns the start position for a band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let bw = self.band_width();
        let step = bw * (1.0 + self.padding_inner);
        let start = if r1 >= r0 { r0 } else { r1 };
        start + bw * self.padding_outer + step * index as f64
    }

    /// Start of the band for `key`.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.index_of(key).map(|i| self.x(i))
    }

    /// Center of the band for `key`.
    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key).map(|x| x + 0.5 * self.band_width())
    }
}

/// A built scale.
#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Time scale.
    Time(ScaleTime),
    /// Band scale.
    Band(ScaleBand),
}

impl Scale {
    /// Returns the scale kind.
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Linear(_) => ScaleKind::Linear,
            Self::Time(_) => ScaleKind::Time,
            Self::Band(_) => ScaleKind::Band,
        }
    }

    /// The bound domain.
    pub fn domain(&self) -> Domain {
        match self {
            Self::Linear(s) if s.is_empty() => Domain::Empty,
            Self::Time(s) if s.is_empty() => Domain::Empty,
            Self::Linear(s) => Domain::Continuous(s.domain().0, s.domain().1),
            Self::Time(s) => Domain::Continuous(s.domain().0, s.domain().1),
            Self::Band(s) => Domain::Discrete(s.domain().to_vec()),
        }
    }

    /// The bound pixel range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Time(s) => s.range(),
            Self::Band(s) => s.range(),
        }
    }

    /// Band width for band scales, `0` otherwise.
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Band(s) => s.band_width(),
            _ => 0.0,
        }
    }

    /// Pixel position of `tick`, or `None` if it cannot be placed.
    ///
    /// Band ticks sit at the center of their band. Non-finite values and ticks of the wrong
    /// shape have no position.
    pub fn map(&self, tick: &TickValue) -> Option<f64> {
        if tick.as_value().is_some_and(|v| !v.is_finite()) {
            return None;
        }
        let px = match (self, tick) {
            (Self::Linear(s), TickValue::Value(v)) => s.map(*v),
            (Self::Time(s), TickValue::Value(v)) => s.map(*v),
            (Self::Band(s), TickValue::Category(k)) => s.center(k)?,
            _ => return None,
        };
        px.is_finite().then_some(px)
    }

    /// Inverse mapping for continuous scales; band scales do not invert.
    pub fn invert(&self, px: f64) -> Option<f64> {
        match self {
            Self::Linear(s) => Some(s.invert(px)),
            Self::Time(s) => Some(s.invert(px)),
            Self::Band(_) => None,
        }
    }

    /// Candidate tick values, in domain order, before density reduction.
    pub fn tick_candidates(&self, count: usize) -> Vec<TickValue> {
        match self {
            Self::Linear(s) => s.ticks(count).into_iter().map(TickValue::Value).collect(),
            Self::Time(s) => s.ticks(count).into_iter().map(TickValue::Value).collect(),
            Self::Band(s) => s
                .domain()
                .iter()
                .map(|k| TickValue::Category(k.clone()))
                .collect(),
        }
    }

    /// Default label for `tick`, given the full tick set it belongs to.
    ///
    /// Linear labels use as many decimals as the tick spacing needs. Time labels read as years
    /// unless the scale ticks by month and some tick falls inside a year.
    pub fn default_label(&self, tick: &TickValue, ticks: &[TickValue]) -> String {
        match (self, tick) {
            (_, TickValue::Category(k)) => k.clone(),
            (Self::Time(s), TickValue::Value(v)) => {
                let unit = match s.finest_unit() {
                    CalendarUnit::Year => CalendarUnit::Year,
                    CalendarUnit::Month => {
                        let all_january = ticks
                            .iter()
                            .filter_map(TickValue::as_value)
                            .all(|t| time::format_calendar(t, CalendarUnit::Month).starts_with("Jan"));
                        if all_january && ticks.len() > 1 {
                            CalendarUnit::Year
                        } else {
                            CalendarUnit::Month
                        }
                    }
                };
                time::format_calendar(*v, unit)
            }
            (_, TickValue::Value(v)) => {
                let values: Vec<f64> = ticks.iter().filter_map(TickValue::as_value).collect();
                format_tick_with_step(*v, tick_step(&values))
            }
        }
    }
}

/// Construction rules shared by every chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBuilder {
    /// Whether continuous domains are expanded to round boundaries.
    pub nice: bool,
    /// Tick count driving nice rounding. Charts replace it with the count their axis fits.
    pub nice_count: usize,
    /// Whether continuous output is clamped to the range.
    pub clamp: bool,
    /// Inner band padding, as a fraction of the band width.
    pub padding_inner: f64,
    /// Outer band padding, as a fraction of the band width.
    pub padding_outer: f64,
}

impl Default for ScaleBuilder {
    fn default() -> Self {
        Self {
            nice: true,
            nice_count: 10,
            clamp: true,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }
}

impl ScaleBuilder {
    /// Enables or disables nice rounding.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Sets the tick count used for nice rounding.
    pub fn with_nice_count(mut self, count: usize) -> Self {
        self.nice_count = count;
        self
    }

    /// Enables or disables output clamping.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Sets band padding.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner;
        self.padding_outer = outer;
        self
    }

    /// Builds a scale of `kind` mapping `domain` onto `range`.
    ///
    /// Empty or non-finite continuous domains produce a degenerate scale that maps everything
    /// to the middle of the range.
    pub fn build(
        &self,
        domain: &Domain,
        range: (f64, f64),
        data_type: AxisDataType,
        kind: ScaleKind,
    ) -> ChartResult<Scale> {
        match kind {
            ScaleKind::Linear => {
                if data_type == AxisDataType::Band {
                    return Err(ChartError::UnsupportedDataType { kind, data_type });
                }
                let scale = match continuous_bounds(domain, kind)? {
                    Some(d) => {
                        let s = ScaleLinear::new(d, range).with_clamp(self.clamp);
                        if self.nice { s.nice(self.nice_count) } else { s }
                    }
                    None => ScaleLinear::degenerate(range),
                };
                Ok(Scale::Linear(scale))
            }
            ScaleKind::Time => {
                let finest = match data_type {
                    AxisDataType::DateMonthly => CalendarUnit::Month,
                    AxisDataType::DateAnnual => CalendarUnit::Year,
                    AxisDataType::Number | AxisDataType::Band => {
                        return Err(ChartError::UnsupportedDataType { kind, data_type });
                    }
                };
                let scale = match continuous_bounds(domain, kind)? {
                    Some(d) => {
                        let s = ScaleTime::new(d, range, finest).with_clamp(self.clamp);
                        if self.nice { s.nice(self.nice_count) } else { s }
                    }
                    None => ScaleTime::degenerate(range, finest),
                };
                Ok(Scale::Time(scale))
            }
            ScaleKind::Band => match domain {
                Domain::Discrete(keys) => Ok(Scale::Band(
                    ScaleBand::new(keys.clone(), range)
                        .with_padding(self.padding_inner, self.padding_outer),
                )),
                Domain::Empty => Ok(Scale::Band(ScaleBand::new(Vec::new(), range))),
                Domain::Continuous(..) => Err(ChartError::DomainMismatch {
                    kind,
                    domain: domain.shape(),
                }),
            },
        }
    }
}

fn continuous_bounds(domain: &Domain, kind: ScaleKind) -> ChartResult<Option<(f64, f64)>> {
    match domain {
        Domain::Continuous(a, b) if a.is_finite() && b.is_finite() => Ok(Some(ordered((*a, *b)))),
        Domain::Continuous(a, b) => {
            tracing::debug!(min = a, max = b, "non-finite domain, using a degenerate scale");
            Ok(None)
        }
        Domain::Empty => Ok(None),
        Domain::Discrete(keys) if keys.is_empty() => Ok(None),
        Domain::Discrete(_) => Err(ChartError::DomainMismatch {
            kind,
            domain: domain.shape(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::month_start_ms;

    fn build(domain: Domain, range: (f64, f64), ty: AxisDataType) -> Scale {
        ScaleBuilder::default()
            .build(&domain, range, ty, ScaleKind::for_data_type(ty))
            .expect("scale builds")
    }

    #[test]
    fn linear_domain_is_niced_outward() {
        let s = build(Domain::Continuous(0.3, 97.0), (0.0, 500.0), AxisDataType::Number);
        assert_eq!(s.domain(), Domain::Continuous(0.0, 100.0));
    }

    #[test]
    fn clamped_linear_output_stays_in_range() {
        let s = build(Domain::Continuous(0.0, 10.0), (300.0, 20.0), AxisDataType::Number);
        for v in [-5.0, 0.0, 3.3, 10.0, 42.0] {
            let px = s.map(&TickValue::Value(v)).expect("finite");
            assert!((20.0..=300.0).contains(&px), "{v} mapped outside: {px}");
        }
    }

    #[test]
    fn continuous_scales_invert() {
        let s = build(Domain::Continuous(-20.0, 80.0), (0.0, 640.0), AxisDataType::Number);
        for v in [-20.0, -3.5, 0.0, 41.25, 80.0] {
            let px = s.map(&TickValue::Value(v)).expect("finite");
            let back = s.invert(px).expect("linear inverts");
            assert!((back - v).abs() < 1e-9, "{v} round-tripped to {back}");
        }

        let lo = month_start_ms(2001, 1).expect("valid");
        let hi = month_start_ms(2020, 1).expect("valid");
        let t = build(Domain::Continuous(lo, hi), (0.0, 800.0), AxisDataType::DateAnnual);
        let mid = month_start_ms(2010, 7).expect("valid");
        let back = t.invert(t.map(&TickValue::Value(mid)).expect("finite"));
        assert!((back.expect("time inverts") - mid).abs() < 1.0);
    }

    #[test]
    fn band_scale_does_not_invert() {
        let s = build(Domain::from_keys(["a", "b"]), (0.0, 100.0), AxisDataType::Band);
        assert_eq!(s.invert(10.0), None);
    }

    #[test]
    fn single_category_is_centered() {
        let s = build(Domain::from_keys(["Only"]), (0.0, 120.0), AxisDataType::Band);
        let center = s.map(&TickValue::from("Only")).expect("known key");
        assert!((center - 60.0).abs() < 1e-9, "center at {center}");
        assert!((s.bandwidth() - 100.0).abs() < 1e-9);
        assert_eq!(s.map(&TickValue::from("Other")), None);
    }

    #[test]
    fn band_keys_are_unique_in_insertion_order() {
        let d = Domain::from_keys(["b", "a", "b", "c"]);
        assert_eq!(
            d,
            Domain::Discrete(vec!["b".to_owned(), "a".to_owned(), "c".to_owned()])
        );
    }

    #[test]
    fn empty_continuous_domain_maps_to_midpoint() {
        let s = build(Domain::Empty, (0.0, 200.0), AxisDataType::Number);
        assert_eq!(s.domain(), Domain::Empty);
        assert_eq!(s.map(&TickValue::Value(5.0)), Some(100.0));
        assert!(s.tick_candidates(10).is_empty());

        let nan = build(Domain::Continuous(f64::NAN, 1.0), (0.0, 200.0), AxisDataType::Number);
        assert_eq!(nan.domain(), Domain::Empty);
    }

    #[test]
    fn single_value_domain_has_one_tick() {
        let s = build(Domain::Continuous(7.0, 7.0), (0.0, 200.0), AxisDataType::Number);
        assert_eq!(s.tick_candidates(10), vec![TickValue::Value(7.0)]);
        assert_eq!(s.map(&TickValue::Value(7.0)), Some(100.0));
    }

    #[test]
    fn time_scale_snaps_to_whole_years() {
        let lo = month_start_ms(2003, 4).expect("valid");
        let hi = month_start_ms(2019, 9).expect("valid");
        let s = build(Domain::Continuous(lo, hi), (0.0, 800.0), AxisDataType::DateAnnual);
        let (d0, d1) = s.domain().bounds().expect("continuous");
        assert_eq!(d0, month_start_ms(2002, 1).expect("valid"));
        assert_eq!(d1, month_start_ms(2020, 1).expect("valid"));
        let ticks = s.tick_candidates(10);
        let labels: Vec<String> = ticks.iter().map(|t| s.default_label(t, &ticks)).collect();
        assert_eq!(labels.first().map(String::as_str), Some("2002"));
        assert_eq!(labels.last().map(String::as_str), Some("2020"));
    }

    #[test]
    fn monthly_time_labels_name_months() {
        let lo = month_start_ms(2020, 1).expect("valid");
        let hi = month_start_ms(2020, 6).expect("valid");
        let s = build(Domain::Continuous(lo, hi), (0.0, 800.0), AxisDataType::DateMonthly);
        let ticks = s.tick_candidates(6);
        assert_eq!(s.default_label(&ticks[1], &ticks), "Feb 2020");
    }

    #[test]
    fn mismatched_domains_are_rejected() {
        let b = ScaleBuilder::default();
        assert_eq!(
            b.build(
                &Domain::Continuous(0.0, 1.0),
                (0.0, 1.0),
                AxisDataType::Band,
                ScaleKind::Band
            ),
            Err(ChartError::DomainMismatch {
                kind: ScaleKind::Band,
                domain: "continuous"
            })
        );
        assert!(matches!(
            b.build(
                &Domain::from_keys(["x"]),
                (0.0, 1.0),
                AxisDataType::Number,
                ScaleKind::Linear
            ),
            Err(ChartError::DomainMismatch { .. })
        ));
        assert!(matches!(
            b.build(
                &Domain::Continuous(0.0, 1.0),
                (0.0, 1.0),
                AxisDataType::Number,
                ScaleKind::Time
            ),
            Err(ChartError::UnsupportedDataType { .. })
        ));
    }

    #[test]
    fn headroom_pads_max_and_pins_non_negative_min() {
        assert_eq!(
            Domain::with_headroom([10.0, 40.0, 100.0], 0.05),
            Domain::Continuous(0.0, 105.0)
        );
        assert_eq!(
            Domain::with_headroom([-10.0, 40.0], 0.05),
            Domain::Continuous(-10.0, 42.0)
        );
        assert_eq!(Domain::with_headroom([f64::NAN], 0.05), Domain::Empty);
    }
}

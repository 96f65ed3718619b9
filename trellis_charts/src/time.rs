// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calendar-aware time ticks.
//!
//! Time is modeled as milliseconds since the Unix epoch (UTC). Unlike numeric ticks, time ticks
//! step by whole calendar units, so every tick lands on the first of a month or of a year:
//! - monthly steps of 1, 2, 3, or 6 months (aligned to the year),
//! - yearly steps of 1, 2, 5, 10, ... years (aligned to multiples of the step).

use chrono::{DateTime, Datelike};

use crate::date::month_start_ms;
use crate::format::INVALID_LABEL;

/// The coarsest unit a calendar step counts in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CalendarUnit {
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

/// A calendar tick interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CalendarStep {
    /// Unit being counted.
    pub unit: CalendarUnit,
    /// Number of units between ticks.
    pub every: u32,
}

impl CalendarStep {
    /// Step length in months.
    pub fn months(&self) -> i64 {
        match self.unit {
            CalendarUnit::Month => i64::from(self.every),
            CalendarUnit::Year => 12 * i64::from(self.every),
        }
    }
}

const MONTH_STEPS: &[u32] = &[1, 2, 3, 6];
const YEAR_STEPS: &[u32] = &[1, 2, 5, 10, 20, 25, 50, 100, 200, 250, 500, 1000];

/// Picks a step giving roughly `count` ticks over `[min_ms, max_ms]`.
///
/// `finest` bounds how small the step can get: annual axes never tick by month.
pub fn calendar_step(min_ms: f64, max_ms: f64, count: usize, finest: CalendarUnit) -> CalendarStep {
    let span = match (month_index(min_ms), month_index(max_ms)) {
        (Some(a), Some(b)) => (b - a).abs().max(1),
        _ => 1,
    };
    #[allow(clippy::cast_precision_loss, reason = "month spans are small")]
    let target = span as f64 / count.max(1) as f64;

    if finest == CalendarUnit::Month {
        for &m in MONTH_STEPS {
            if f64::from(m) >= target {
                return CalendarStep {
                    unit: CalendarUnit::Month,
                    every: m,
                };
            }
        }
    }
    let target_years = target / 12.0;
    for &y in YEAR_STEPS {
        if f64::from(y) >= target_years {
            return CalendarStep {
                unit: CalendarUnit::Year,
                every: y,
            };
        }
    }
    let every = {
        let e = target_years.ceil().clamp(1.0, f64::from(u32::MAX));
        #[allow(clippy::cast_possible_truncation, reason = "clamped to the u32 range")]
        {
            e as u32
        }
    };
    CalendarStep {
        unit: CalendarUnit::Year,
        every,
    }
}

/// Tick instants within `[min_ms, max_ms]` (inclusive), aligned to `step`.
pub fn calendar_ticks(mut min_ms: f64, mut max_ms: f64, step: CalendarStep) -> Vec<f64> {
    if !min_ms.is_finite() || !max_ms.is_finite() {
        return Vec::new();
    }
    if min_ms > max_ms {
        core::mem::swap(&mut min_ms, &mut max_ms);
    }
    let (Some(lo), Some(hi)) = (month_index(min_ms), month_index(max_ms)) else {
        return Vec::new();
    };
    let stride = step.months().max(1);
    let mut idx = ceil_multiple(lo, stride);
    if index_to_ms(idx).is_some_and(|ms| ms < min_ms) {
        idx += stride;
    }

    let mut out = Vec::new();
    while idx <= hi && out.len() < 10_000 {
        let Some(ms) = index_to_ms(idx) else {
            break;
        };
        if ms > max_ms {
            break;
        }
        out.push(ms);
        idx += stride;
    }
    out
}

/// Expands `[min_ms, max_ms]` outward to `step` boundaries.
pub fn nice_calendar_domain(min_ms: f64, max_ms: f64, step: CalendarStep) -> (f64, f64) {
    let (lo, hi) = if min_ms <= max_ms {
        (min_ms, max_ms)
    } else {
        (max_ms, min_ms)
    };
    let (Some(lo_idx), Some(hi_idx)) = (month_index(lo), month_index(hi)) else {
        return (lo, hi);
    };
    let stride = step.months().max(1);
    let start = index_to_ms(lo_idx.div_euclid(stride) * stride).unwrap_or(lo);
    let mut end_idx = ceil_multiple(hi_idx, stride);
    if index_to_ms(end_idx).is_some_and(|ms| ms < hi) {
        end_idx += stride;
    }
    let end = index_to_ms(end_idx).unwrap_or(hi);
    (start, end)
}

/// Formats an instant for a tick at `unit` granularity: `2020` or `Mar 2020`.
pub fn format_calendar(ms: f64, unit: CalendarUnit) -> String {
    let Some(dt) = datetime(ms) else {
        return INVALID_LABEL.to_owned();
    };
    match unit {
        CalendarUnit::Year => format!("{}", dt.year()),
        CalendarUnit::Month => {
            const NAMES: [&str; 12] = [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ];
            let name = NAMES.get(dt.month0() as usize).copied().unwrap_or("???");
            format!("{name} {}", dt.year())
        }
    }
}

fn datetime(ms: f64) -> Option<DateTime<chrono::Utc>> {
    if !ms.is_finite() {
        return None;
    }
    let ms = ms.floor().clamp(i64::MIN as f64, i64::MAX as f64);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
    let ms = ms as i64;
    DateTime::from_timestamp_millis(ms)
}

/// Months since year 0 for the month containing `ms`.
fn month_index(ms: f64) -> Option<i64> {
    let dt = datetime(ms)?;
    Some(i64::from(dt.year()) * 12 + i64::from(dt.month0()))
}

fn index_to_ms(idx: i64) -> Option<f64> {
    let year = i32::try_from(idx.div_euclid(12)).ok()?;
    #[allow(clippy::cast_possible_truncation, reason = "rem_euclid(12) is in 0..12")]
    let month = idx.rem_euclid(12) as u32 + 1;
    month_start_ms(year, month)
}

fn ceil_multiple(v: i64, m: i64) -> i64 {
    (v + m - 1).div_euclid(m) * m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> f64 {
        month_start_ms(year, month).expect("valid month")
    }

    #[test]
    fn annual_axes_step_by_whole_years() {
        let step = calendar_step(ym(2001, 1), ym(2020, 1), 10, CalendarUnit::Year);
        assert_eq!(step.unit, CalendarUnit::Year);
        assert_eq!(step.every, 2);
        let ticks = calendar_ticks(ym(2001, 1), ym(2020, 1), step);
        let labels: Vec<String> = ticks
            .iter()
            .map(|t| format_calendar(*t, CalendarUnit::Year))
            .collect();
        assert_eq!(labels.first().map(String::as_str), Some("2002"));
        assert_eq!(labels.last().map(String::as_str), Some("2020"));
        assert_eq!(labels.len(), 10);
    }

    #[test]
    fn monthly_axes_step_by_months() {
        let step = calendar_step(ym(2020, 1), ym(2020, 12), 6, CalendarUnit::Month);
        assert_eq!(
            step,
            CalendarStep {
                unit: CalendarUnit::Month,
                every: 2
            }
        );
        let ticks = calendar_ticks(ym(2020, 1), ym(2020, 12), step);
        assert_eq!(ticks.len(), 6);
        assert_eq!(format_calendar(ticks[1], CalendarUnit::Month), "Mar 2020");
    }

    #[test]
    fn nice_domain_expands_to_boundaries() {
        let step = CalendarStep {
            unit: CalendarUnit::Year,
            every: 5,
        };
        let (lo, hi) = nice_calendar_domain(ym(2003, 4), ym(2011, 2), step);
        assert_eq!(lo, ym(2000, 1));
        assert_eq!(hi, ym(2015, 1));

        let (lo, hi) = nice_calendar_domain(ym(2000, 1), ym(2010, 1), step);
        assert_eq!(lo, ym(2000, 1));
        assert_eq!(hi, ym(2010, 1));
    }

    #[test]
    fn non_finite_instants_format_as_invalid() {
        assert_eq!(format_calendar(f64::NAN, CalendarUnit::Year), INVALID_LABEL);
        assert!(calendar_ticks(f64::NAN, 0.0, CalendarStep {
            unit: CalendarUnit::Year,
            every: 1
        })
        .is_empty());
    }
}

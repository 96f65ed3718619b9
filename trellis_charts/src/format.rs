// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick label formatting.

/// Label used for values that cannot be formatted (`NaN`, infinities).
pub const INVALID_LABEL: &str = "Invalid";

/// Formats a numeric tick value using as many decimals as the tick `step` needs.
///
/// A `step` of `0.05` yields two decimals; integral steps yield none. Non-finite values yield
/// [`INVALID_LABEL`].
pub fn format_tick_with_step(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return INVALID_LABEL.to_owned();
    }
    let decimals = decimals_for_step(step).unwrap_or_else(|| decimals_for_value(v));
    let s = format!("{v:.decimals$}");
    if s.bytes().all(|b| matches!(b, b'-' | b'0' | b'.')) {
        // Avoid "-0" / "-0.00" for values that round to zero.
        return s.trim_start_matches('-').to_owned();
    }
    s
}

/// Formats a number without a step hint, trimming trailing zeros.
pub fn format_number(v: f64) -> String {
    format_tick_with_step(v, f64::NAN)
}

/// Difference between the first two ticks, or `NaN` when there are fewer than two.
pub fn tick_step(ticks: &[f64]) -> f64 {
    match ticks {
        [a, b, ..] => (b - a).abs(),
        _ => f64::NAN,
    }
}

fn decimals_for_step(step: f64) -> Option<usize> {
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let d = (-step.log10().floor()).clamp(0.0, 10.0);
    #[allow(clippy::cast_possible_truncation, reason = "clamped to 0..=10")]
    let d = d as usize;
    Some(d)
}

fn decimals_for_value(v: f64) -> usize {
    for d in 0_u8..=6 {
        let scale = 10_f64.powi(i32::from(d));
        if ((v * scale).round() - v * scale).abs() < 1e-9 {
            return usize::from(d);
        }
    }
    6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_follow_step() {
        assert_eq!(format_tick_with_step(20.0, 10.0), "20");
        assert_eq!(format_tick_with_step(0.4, 0.2), "0.4");
        assert_eq!(format_tick_with_step(0.15, 0.05), "0.15");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(format_tick_with_step(-0.0, 1.0), "0");
        assert_eq!(format_tick_with_step(-1e-12, 0.5), "0.0");
    }

    #[test]
    fn non_finite_values_are_invalid() {
        assert_eq!(format_tick_with_step(f64::NAN, 1.0), INVALID_LABEL);
        assert_eq!(format_number(f64::INFINITY), INVALID_LABEL);
    }

    #[test]
    fn stepless_numbers_trim() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
    }
}

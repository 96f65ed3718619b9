// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Date normalization for axis inputs.
//!
//! Chart keys arrive in heterogeneous shapes: `2020`, `"2020"`, `202003`, `"2020-03-01"`,
//! RFC 3339 timestamps. [`normalize`] turns them into a canonical number per
//! [`AxisDataType`]:
//! - `Number`: the value itself,
//! - `DateAnnual` / `DateMonthly`: milliseconds since the Unix epoch (UTC).
//!
//! Unparseable inputs normalize to `None` and are excluded from domain and tick computation.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// How an axis interprets its key values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisDataType {
    /// Plain numbers.
    Number,
    /// Years (`2020`), or any generic date.
    #[default]
    DateAnnual,
    /// Year-months (`202003`), or any generic date.
    DateMonthly,
    /// Categorical keys.
    Band,
}

impl AxisDataType {
    /// The configuration name of this data type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::DateAnnual => "date_annual",
            Self::DateMonthly => "date_monthly",
            Self::Band => "band",
        }
    }

    /// Returns `true` for the date-like data types.
    pub fn is_date(self) -> bool {
        matches!(self, Self::DateAnnual | Self::DateMonthly)
    }
}

impl fmt::Display for AxisDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`AxisDataType`] name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown axis data type `{0}`")]
pub struct UnknownAxisDataType(pub String);

impl FromStr for AxisDataType {
    type Err = UnknownAxisDataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(Self::Number),
            "date_annual" => Ok(Self::DateAnnual),
            "date_monthly" => Ok(Self::DateMonthly),
            "band" => Ok(Self::Band),
            other => Err(UnknownAxisDataType(other.to_owned())),
        }
    }
}

/// A raw key value as supplied by a dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// A numeric key.
    Number(f64),
    /// A textual key.
    Text(String),
}

impl RawValue {
    /// Returns the canonical string form of this value.
    ///
    /// Integral numbers print without a fractional part, so `2020.0` reads as `"2020"`.
    pub fn to_key_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(v) => format_key_number(*v),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(v) => f.write_str(&format_key_number(*v)),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

fn format_key_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1.0e15 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "integral and bounded well inside the i64 range"
        )]
        let i = v as i64;
        format!("{i}")
    } else {
        format!("{v}")
    }
}

/// Why a value could not be turned into an instant.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DateError {
    /// A `YYYYMM` key with a month outside `1..=12` or a non-positive year.
    #[error("`{0}` is not a valid YYYYMM key")]
    InvalidYearMonth(String),
    /// No supported date format matched.
    #[error("`{0}` is not a recognized date")]
    Unparseable(String),
    /// The axis data type is not date-like.
    #[error("the `{0}` axis data type does not carry dates")]
    NotADate(AxisDataType),
}

/// Normalizes `raw` for an axis of type `data_type`.
///
/// Returns `None` when the value cannot be interpreted; callers exclude such points.
/// `Band` keys are categorical and never normalize.
pub fn normalize(raw: &RawValue, data_type: AxisDataType) -> Option<f64> {
    match data_type {
        AxisDataType::Number => match raw {
            RawValue::Number(v) => Some(*v),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        },
        AxisDataType::DateAnnual | AxisDataType::DateMonthly => {
            match parse_date(raw, data_type) {
                Ok(ms) => Some(ms),
                Err(err) => {
                    tracing::trace!(%raw, %err, "excluding unparseable date key");
                    None
                }
            }
        }
        AxisDataType::Band => None,
    }
}

/// Parses `raw` into milliseconds since the Unix epoch (UTC).
pub fn parse_date(raw: &RawValue, data_type: AxisDataType) -> Result<f64, DateError> {
    let s = raw.to_key_string();
    match data_type {
        AxisDataType::DateAnnual => {
            if is_digits(&s, 4) {
                let year: i32 = s
                    .parse()
                    .map_err(|_| DateError::Unparseable(s.clone()))?;
                return month_start_ms(year, 1).ok_or(DateError::Unparseable(s));
            }
            parse_generic(&s)
        }
        AxisDataType::DateMonthly => {
            if is_digits(&s, 6) {
                if let Some(ms) = parse_year_month(&s) {
                    return Ok(ms);
                }
                tracing::trace!(key = %s, "invalid YYYYMM key, trying generic parse");
                return parse_generic(&s).map_err(|_| DateError::InvalidYearMonth(s));
            }
            parse_generic(&s)
        }
        other => Err(DateError::NotADate(other)),
    }
}

/// Milliseconds since the epoch for the first day of `year`-`month` (UTC).
pub fn month_start_ms(year: i32, month: u32) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    let dt = date.and_hms_opt(0, 0, 0)?;
    Some(millis_f64(dt.and_utc().timestamp_millis()))
}

fn parse_year_month(s: &str) -> Option<f64> {
    let year: i32 = s.get(..4)?.parse().ok()?;
    let month: u32 = s.get(4..)?.parse().ok()?;
    if year <= 0 || !(1..=12).contains(&month) {
        return None;
    }
    month_start_ms(year, month)
}

fn parse_generic(s: &str) -> Result<f64, DateError> {
    let t = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Ok(millis_f64(dt.timestamp_millis()));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Ok(millis_f64(dt.and_utc().timestamp_millis()));
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(t, fmt)
            && let Some(dt) = d.and_hms_opt(0, 0, 0)
        {
            return Ok(millis_f64(dt.and_utc().timestamp_millis()));
        }
    }
    // `YYYY-MM` has no day component, which chrono's date parser requires.
    if t.len() == 7
        && t.as_bytes()[4] == b'-'
        && let Ok(d) = NaiveDate::parse_from_str(&format!("{t}-01"), "%Y-%m-%d")
        && let Some(dt) = d.and_hms_opt(0, 0, 0)
    {
        return Ok(millis_f64(dt.and_utc().timestamp_millis()));
    }
    Err(DateError::Unparseable(s.to_owned()))
}

fn is_digits(s: &str, n: usize) -> bool {
    s.len() == n && s.bytes().all(|b| b.is_ascii_digit())
}

#[allow(
    clippy::cast_precision_loss,
    reason = "epoch milliseconds for representable dates fit in 53 bits"
)]
fn millis_f64(ms: i64) -> f64 {
    ms as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_2020: f64 = 1_577_836_800_000.0;
    const MS_2020_03: f64 = 1_583_020_800_000.0;

    #[test]
    fn number_is_identity() {
        assert_eq!(normalize(&RawValue::from(42.5), AxisDataType::Number), Some(42.5));
        assert_eq!(normalize(&RawValue::from("7"), AxisDataType::Number), Some(7.0));
        assert_eq!(normalize(&RawValue::from("seven"), AxisDataType::Number), None);
    }

    #[test]
    fn annual_four_digit_keys_are_january_first() {
        assert_eq!(normalize(&RawValue::from(2020), AxisDataType::DateAnnual), Some(MS_2020));
        assert_eq!(normalize(&RawValue::from("2020"), AxisDataType::DateAnnual), Some(MS_2020));
    }

    #[test]
    fn annual_falls_back_to_generic_parsing() {
        assert_eq!(
            normalize(&RawValue::from("2020-03-01"), AxisDataType::DateAnnual),
            Some(MS_2020_03)
        );
        assert_eq!(
            normalize(&RawValue::from("2020-03-01T00:00:00Z"), AxisDataType::DateAnnual),
            Some(MS_2020_03)
        );
        assert_eq!(normalize(&RawValue::from("soon"), AxisDataType::DateAnnual), None);
    }

    #[test]
    fn monthly_six_digit_keys_are_first_of_month() {
        assert_eq!(
            normalize(&RawValue::from(202003), AxisDataType::DateMonthly),
            Some(MS_2020_03)
        );
        assert_eq!(
            normalize(&RawValue::from("2020-03"), AxisDataType::DateMonthly),
            Some(MS_2020_03)
        );
    }

    #[test]
    fn monthly_invalid_month_is_excluded() {
        let raw = RawValue::from("202013");
        assert_eq!(normalize(&raw, AxisDataType::DateMonthly), None);
        assert_eq!(
            parse_date(&raw, AxisDataType::DateMonthly),
            Err(DateError::InvalidYearMonth("202013".to_owned()))
        );
        assert_eq!(normalize(&RawValue::from("000001"), AxisDataType::DateMonthly), None);
    }

    #[test]
    fn band_keys_do_not_normalize() {
        assert_eq!(normalize(&RawValue::from("2020"), AxisDataType::Band), None);
        assert_eq!(
            parse_date(&RawValue::from("2020"), AxisDataType::Band),
            Err(DateError::NotADate(AxisDataType::Band))
        );
    }

    #[test]
    fn data_type_names_round_trip() {
        for ty in [
            AxisDataType::Number,
            AxisDataType::DateAnnual,
            AxisDataType::DateMonthly,
            AxisDataType::Band,
        ] {
            assert_eq!(ty.as_str().parse::<AxisDataType>(), Ok(ty));
        }
        assert!("weekly".parse::<AxisDataType>().is_err());
    }

    #[test]
    fn integral_numbers_have_clean_key_strings() {
        assert_eq!(RawValue::from(2020.0).to_key_string(), "2020");
        assert_eq!(RawValue::from(1.5).to_key_string(), "1.5");
    }
}

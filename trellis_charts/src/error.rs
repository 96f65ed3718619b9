// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Data-shape problems (unparseable dates, empty domains, non-finite values) are never errors;
//! they degrade to documented fallbacks. These variants cover caller misconfiguration.

use thiserror::Error;

use crate::date::AxisDataType;
use crate::scale::ScaleKind;

/// Errors returned by scale construction and chart rendering.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ChartError {
    /// The domain shape does not fit the requested scale kind.
    #[error("a {kind} scale cannot be built from a {domain} domain")]
    DomainMismatch {
        /// Requested scale kind.
        kind: ScaleKind,
        /// Shape of the supplied domain.
        domain: &'static str,
    },
    /// The axis data type cannot drive the requested scale kind.
    #[error("a {kind} scale does not support the `{data_type}` axis data type")]
    UnsupportedDataType {
        /// Requested scale kind.
        kind: ScaleKind,
        /// Supplied axis data type.
        data_type: AxisDataType,
    },
    /// Container dimensions are not finite numbers.
    #[error("container dimensions must be finite, got {width}x{height}")]
    InvalidGeometry {
        /// Container width.
        width: f64,
        /// Container height.
        height: f64,
    },
}

/// Result alias for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

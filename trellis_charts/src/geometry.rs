// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container geometry: outer size minus margins gives the plot rectangle.

use kurbo::Rect;

use crate::error::{ChartError, ChartResult};

/// Per-side margins, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    /// Space above the plot.
    pub top: f64,
    /// Space right of the plot.
    pub right: f64,
    /// Space below the plot.
    pub bottom: f64,
    /// Space left of the plot.
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        }
    }
}

impl Margin {
    /// The same margin on every side.
    pub fn uniform(m: f64) -> Self {
        Self {
            top: m,
            right: m,
            bottom: m,
            left: m,
        }
    }

    /// Sets the top margin.
    pub fn with_top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    /// Sets the right margin.
    pub fn with_right(mut self, right: f64) -> Self {
        self.right = right;
        self
    }

    /// Sets the bottom margin.
    pub fn with_bottom(mut self, bottom: f64) -> Self {
        self.bottom = bottom;
        self
    }

    /// Sets the left margin.
    pub fn with_left(mut self, left: f64) -> Self {
        self.left = left;
        self
    }
}

/// Outer size and margins of a chart container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerGeometry {
    /// Outer width.
    pub width: f64,
    /// Outer height.
    pub height: f64,
    /// Margins reserved for guides.
    pub margin: Margin,
}

impl ContainerGeometry {
    /// Creates a geometry with default margins.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
        }
    }

    /// Sets the margins.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Rejects non-finite dimensions.
    ///
    /// Zero or negative sizes are allowed; they collapse to an empty plot.
    pub fn validate(&self) -> ChartResult<()> {
        if self.width.is_finite() && self.height.is_finite() {
            Ok(())
        } else {
            Err(ChartError::InvalidGeometry {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// The plot rectangle, never inverted.
    pub fn plot_rect(&self) -> Rect {
        let m = self.margin;
        let x0 = m.left.max(0.0);
        let y0 = m.top.max(0.0);
        let x1 = (self.width - m.right.max(0.0)).max(x0);
        let y1 = (self.height - m.bottom.max(0.0)).max(y0);
        Rect::new(x0, y0, x1, y1)
    }

    /// Plot width available to a horizontal axis.
    pub fn inner_width(&self) -> f64 {
        self.plot_rect().width()
    }

    /// Plot height available to a vertical axis.
    pub fn inner_height(&self) -> f64 {
        self.plot_rect().height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_rect_subtracts_margins() {
        let g = ContainerGeometry::new(600.0, 400.0).with_margin(Margin::uniform(50.0));
        assert_eq!(g.plot_rect(), Rect::new(50.0, 50.0, 550.0, 350.0));
        assert_eq!(g.inner_width(), 500.0);
    }

    #[test]
    fn undersized_container_collapses() {
        let g = ContainerGeometry::new(30.0, -10.0);
        let r = g.plot_rect();
        assert_eq!(r.width(), 0.0);
        assert_eq!(r.height(), 0.0);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn non_finite_size_is_rejected() {
        assert!(matches!(
            ContainerGeometry::new(f64::NAN, 10.0).validate(),
            Err(ChartError::InvalidGeometry { .. })
        ));
    }
}

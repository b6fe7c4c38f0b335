// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small measure/arrange layout helper for charts.
//!
//! - **Measure**: guides (title, axes) report the thickness they need.
//! - **Arrange**: the plot rectangle gets whatever remains of the view, and each guide is placed
//!   adjacent to it.

use kurbo::Rect;

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in scene units.
    pub width: f64,
    /// Height in scene units.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Layout inputs for a single chart with a left axis and a bottom axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChartLayoutSpec {
    /// Title thickness reserved above the plot, if any.
    pub title_top: Option<f64>,
    /// Outer chart bounds.
    pub view_size: Size,
    /// Padding applied on all sides of the view.
    pub outer_padding: f64,
    /// Left axis thickness, if any.
    pub axis_left: Option<f64>,
    /// Bottom axis thickness, if any.
    pub axis_bottom: Option<f64>,
}

/// Output of the arrange pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Outer chart bounds.
    pub view: Rect,
    /// Title band, spanning the view width.
    pub title_top: Option<Rect>,
    /// The data rectangle.
    pub plot: Rect,
    /// Left axis band, the height of the plot.
    pub axis_left: Option<Rect>,
    /// Bottom axis band, the width of the plot.
    pub axis_bottom: Option<Rect>,
}

impl ChartLayout {
    /// Computes a layout from the provided specification.
    ///
    /// The plot never has negative extent; when guides do not fit, it collapses to zero size.
    pub fn arrange(spec: &ChartLayoutSpec) -> Self {
        let pad = spec.outer_padding.max(0.0);
        let title_h = spec.title_top.unwrap_or(0.0).max(0.0);
        let left_w = spec.axis_left.unwrap_or(0.0).max(0.0);
        let bottom_h = spec.axis_bottom.unwrap_or(0.0).max(0.0);
        let view_w = spec.view_size.width.max(0.0);
        let view_h = spec.view_size.height.max(0.0);

        let x0 = pad + left_w;
        let y0 = pad + title_h;
        let plot_w = (view_w - x0 - pad).max(0.0);
        let plot_h = (view_h - y0 - bottom_h - pad).max(0.0);
        let plot = Rect::new(x0, y0, x0 + plot_w, y0 + plot_h);

        let view = Rect::new(0.0, 0.0, view_w, view_h);
        let title_top =
            (title_h > 0.0).then(|| Rect::new(0.0, pad, view.x1, pad + title_h));
        let axis_left =
            (left_w > 0.0).then(|| Rect::new(plot.x0 - left_w, plot.y0, plot.x0, plot.y1));
        let axis_bottom =
            (bottom_h > 0.0).then(|| Rect::new(plot.x0, plot.y1, plot.x1, plot.y1 + bottom_h));

        Self {
            view,
            title_top,
            plot,
            axis_left,
            axis_bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guides_surround_the_plot() {
        let layout = ChartLayout::arrange(&ChartLayoutSpec {
            title_top: Some(40.0),
            view_size: Size::new(400.0, 300.0),
            outer_padding: 10.0,
            axis_left: Some(60.0),
            axis_bottom: Some(30.0),
        });
        assert_eq!(layout.plot, Rect::new(70.0, 50.0, 390.0, 260.0));
        assert_eq!(layout.title_top, Some(Rect::new(0.0, 10.0, 400.0, 50.0)));
        assert_eq!(layout.axis_left, Some(Rect::new(10.0, 50.0, 70.0, 260.0)));
        assert_eq!(layout.axis_bottom, Some(Rect::new(70.0, 260.0, 390.0, 290.0)));
    }

    #[test]
    fn oversized_guides_collapse_the_plot() {
        let layout = ChartLayout::arrange(&ChartLayoutSpec {
            title_top: None,
            view_size: Size::new(50.0, 50.0),
            outer_padding: 0.0,
            axis_left: Some(80.0),
            axis_bottom: None,
        });
        assert_eq!(layout.plot.width(), 0.0);
        assert!(layout.title_top.is_none());
        assert!(layout.axis_bottom.is_none());
    }
}

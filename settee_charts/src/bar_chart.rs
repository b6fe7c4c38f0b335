// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal bar charts.
//!
//! One bar per buffer row. Row `0` occupies the bottom band and later rows stack upward, so a
//! table sorted descending reads with its largest value nearest the value axis.

use kurbo::Rect;
use peniko::color::palette::css;
use peniko::{Brush, Color};

use crate::axis::{AxisScale, AxisSpec, GridStyle};
use crate::scale::ScaleLinearSpec;
use crate::{
    ChartLayout, ChartLayoutSpec, HeuristicTextMeasurer, Mark, MarkId, PlotBuffer, RectMarkSpec,
    Scene, Size, TextMeasurer, TitleSpec, z_order,
};

const BACKGROUND_ID: u64 = 1;
const TITLE_ID: u64 = 2;
const CATEGORY_AXIS_BASE: u64 = 1 << 32;
const VALUE_AXIS_BASE: u64 = 2 << 32;
const BAR_BASE: u64 = 3 << 32;

/// A horizontal bar chart over a [`PlotBuffer`].
#[derive(Clone, Debug)]
pub struct HBarChartSpec {
    /// Chart title.
    pub title: String,
    /// Canvas size in scene units.
    pub view_size: Size,
    /// Padding around the whole canvas.
    pub outer_padding: f64,
    /// Canvas background.
    pub background: Brush,
    /// Bar fill.
    pub bar_fill: Brush,
    /// Approximate number of value-axis ticks.
    pub tick_count: usize,
    /// Title font size.
    pub title_font_size: f64,
    /// Optional category-axis title.
    pub label_title: Option<String>,
    /// Optional value-axis title.
    pub value_title: Option<String>,
}

impl Default for HBarChartSpec {
    fn default() -> Self {
        Self {
            title: "Total Sales by Month".to_string(),
            view_size: Size::new(1600.0, 1200.0),
            outer_padding: 24.0,
            background: css::WHITE.into(),
            bar_fill: Color::from_rgb8(0x1f, 0x77, 0xb4).into(),
            tick_count: 8,
            title_font_size: 24.0,
            label_title: None,
            value_title: None,
        }
    }
}

impl HBarChartSpec {
    /// Creates a chart with the default canvas and title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the canvas size.
    pub fn with_view_size(mut self, view_size: Size) -> Self {
        self.view_size = view_size;
        self
    }

    /// Sets the bar fill.
    pub fn with_bar_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.bar_fill = fill.into();
        self
    }

    /// Sets titles for the category (left) and value (bottom) axes.
    pub fn with_axis_titles(
        mut self,
        label_title: impl Into<String>,
        value_title: impl Into<String>,
    ) -> Self {
        self.label_title = Some(label_title.into());
        self.value_title = Some(value_title.into());
        self
    }

    fn axes(&self, buffer: &PlotBuffer) -> (AxisSpec, AxisSpec) {
        let mut category = AxisSpec::left(
            CATEGORY_AXIS_BASE,
            AxisScale::Band(buffer.labels().to_vec()),
        );
        if let Some(t) = &self.label_title {
            category = category.with_title(t.clone());
        }
        let mut value = AxisSpec::bottom(
            VALUE_AXIS_BASE,
            AxisScale::Linear(ScaleLinearSpec::new(buffer.value_domain()).with_nice(true)),
        )
        .with_tick_count(self.tick_count)
        .with_grid(GridStyle::default());
        if let Some(t) = &self.value_title {
            value = value.with_title(t.clone());
        }
        (category, value)
    }

    /// Generates the chart marks using heuristic text metrics.
    pub fn marks(&self, buffer: &PlotBuffer) -> Vec<Mark> {
        self.scene_with(buffer, &HeuristicTextMeasurer).marks
    }

    /// Lays out and generates the chart using heuristic text metrics.
    pub fn scene(&self, buffer: &PlotBuffer) -> Scene {
        self.scene_with(buffer, &HeuristicTextMeasurer)
    }

    /// Lays out and generates the chart using the provided text measurer.
    pub fn scene_with(&self, buffer: &PlotBuffer, measurer: &dyn TextMeasurer) -> Scene {
        let title = TitleSpec::new(MarkId::from_raw(TITLE_ID), self.title.clone())
            .with_font_size(self.title_font_size)
            .with_padding(0.5 * self.title_font_size);
        let (category, value) = self.axes(buffer);

        let layout = ChartLayout::arrange(&ChartLayoutSpec {
            title_top: Some(title.measure(measurer)),
            view_size: self.view_size,
            outer_padding: self.outer_padding,
            axis_left: Some(category.measure(measurer)),
            axis_bottom: Some(value.measure(measurer)),
        });
        let plot = layout.plot;

        let mut marks = vec![
            RectMarkSpec::new(MarkId::from_raw(BACKGROUND_ID), layout.view)
                .with_fill(self.background.clone())
                .with_z_index(z_order::PLOT_BACKGROUND)
                .mark(),
        ];
        if let Some(rect) = layout.title_top {
            marks.push(title.mark(rect));
        }
        if let Some(rect) = layout.axis_left {
            marks.extend(category.marks(plot, rect));
        }
        if let Some(rect) = layout.axis_bottom {
            marks.extend(value.marks(plot, rect));
        }

        if let (Some(bands), Some(x)) = (category.scale_band(plot), value.scale_linear(plot)) {
            let x0 = x.map(0.0);
            for (i, (_, v)) in buffer.iter().enumerate() {
                let v = if v.is_finite() { v } else { 0.0 };
                let (y0, y1) = bands.band(i);
                marks.push(
                    RectMarkSpec::new(
                        MarkId::from_raw(BAR_BASE + i as u64),
                        Rect::new(x0, y0, x.map(v), y1),
                    )
                    .with_fill(self.bar_fill.clone())
                    .with_z_index(z_order::SERIES_FILL)
                    .mark(),
                );
            }
        }

        Scene {
            view: layout.view,
            marks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(marks: &[Mark]) -> Vec<Rect> {
        marks
            .iter()
            .filter(|m| m.z_index == z_order::SERIES_FILL)
            .filter_map(|m| m.as_rect().map(|r| r.rect))
            .collect()
    }

    fn sales() -> PlotBuffer {
        [("Charlotte", 5000.0), ("Ben", 3000.0), ("Dan", 500.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn first_row_is_the_bottom_bar() {
        let bars = bars(&HBarChartSpec::new().marks(&sales()));
        assert_eq!(bars.len(), 3);
        assert!(bars[0].y0 > bars[1].y0 && bars[1].y0 > bars[2].y0);
        assert!(bars[0].width() > bars[1].width() && bars[1].width() > bars[2].width());
        // Every bar starts at the zero line.
        assert!(bars.iter().all(|b| (b.x0 - bars[0].x0).abs() < 1e-9));
    }

    #[test]
    fn negative_values_extend_left_of_zero() {
        let buffer: PlotBuffer = [("up", 40.0), ("down", -20.0)].into_iter().collect();
        let bars = bars(&HBarChartSpec::new().marks(&buffer));
        assert!((bars[0].x0 - bars[1].x1).abs() < 1e-9);
        assert!(bars[1].x0 < bars[0].x0);
    }

    #[test]
    fn empty_buffer_renders_title_and_axes_only() {
        let scene = HBarChartSpec::new().scene(&PlotBuffer::new());
        assert!(bars(&scene.marks).is_empty());
        assert!(
            scene
                .marks
                .iter()
                .any(|m| m.as_text().is_some_and(|t| t.text == "Total Sales by Month"))
        );
        assert!(scene.marks.iter().any(|m| m.z_index == z_order::AXIS_RULES));
        let labels: Vec<&str> = scene
            .marks
            .iter()
            .filter(|m| m.z_index == z_order::AXIS_LABELS)
            .filter_map(|m| m.as_text().map(|t| t.text.as_str()))
            .collect();
        assert_eq!(labels.first(), Some(&"0.0"));
        assert_eq!(labels.last(), Some(&"1.0"));
    }

    #[test]
    fn default_canvas_and_svg_output() {
        let scene = HBarChartSpec::new().scene(&sales());
        assert_eq!(scene.view, Rect::new(0.0, 0.0, 1600.0, 1200.0));
        let svg = scene.to_svg_string();
        assert!(svg.contains(r#"width="1600" height="1200""#));
        assert!(svg.contains(">Total Sales by Month</text>"));
        assert!(svg.contains(">Charlotte</text>"));
        assert_eq!(svg.matches(r##"fill="#1f77b4""##).count(), 3);
    }
}

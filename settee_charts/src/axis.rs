// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! A single [`AxisSpec`] can be measured (for layout) and arranged (to generate marks). Category
//! axes use a band scale whose labels come from the data; value axes use a linear scale with
//! nice ticks.

use kurbo::{Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;

use crate::format::format_tick_with_step;
use crate::scale::{ScaleBand, ScaleLinear, ScaleLinearSpec};
use crate::{
    Mark, MarkId, RuleMarkSpec, TextAnchor, TextBaseline, TextMarkSpec, TextMeasurer, z_order,
};

const TICK_OFFSET: u64 = 1;
const LABEL_OFFSET: u64 = 1 << 20;
const GRID_OFFSET: u64 = 2 << 20;
const TITLE_OFFSET: u64 = 3 << 20;

/// A paint + width pair for stroked rules.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// Axis styling.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the domain line and tick marks.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
    /// Fill paint for the axis title.
    pub title_fill: Brush,
    /// Font size for the axis title.
    pub title_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        let rule = StrokeStyle::default();
        Self {
            rule: rule.clone(),
            label_fill: rule.brush.clone(),
            label_font_size: 10.0,
            title_fill: rule.brush,
            title_font_size: 11.0,
        }
    }
}

/// Gridline styling.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStyle {
    /// Stroke style for gridlines.
    pub stroke: StrokeStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle::solid(css::BLACK.with_alpha(40.0 / 255.0), 1.0),
        }
    }
}

/// Axis placement relative to the plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A vertical axis to the left of the plot. Values increase upward.
    Left,
    /// A horizontal axis below the plot. Values increase rightward.
    Bottom,
}

/// The scale an axis describes.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisScale {
    /// One band per label, in order.
    Band(Vec<String>),
    /// A continuous value scale.
    Linear(ScaleLinearSpec),
}

/// An axis specification.
#[derive(Clone, Debug)]
pub struct AxisSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// The axis scale.
    pub scale: AxisScale,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks for linear scales.
    pub tick_count: usize,
    /// Tick line length.
    pub tick_size: f64,
    /// Gap between the tick end and its label.
    pub tick_padding: f64,
    /// Axis styling.
    pub style: AxisStyle,
    /// Gridlines spanning the plot, if any.
    pub grid: Option<GridStyle>,
    /// Optional axis title.
    pub title: Option<String>,
    /// Distance from tick labels to the title.
    pub title_offset: f64,
}

impl AxisSpec {
    /// Creates a new axis with default styling, no grid and no title.
    pub fn new(id_base: u64, scale: AxisScale, orient: AxisOrient) -> Self {
        let tick_padding = match orient {
            AxisOrient::Bottom => 4.0,
            AxisOrient::Left => 6.0,
        };
        Self {
            id_base,
            scale,
            orient,
            tick_count: 10,
            tick_size: 5.0,
            tick_padding,
            style: AxisStyle::default(),
            grid: None,
            title: None,
            title_offset: 10.0,
        }
    }

    /// Convenience constructor for a left axis.
    pub fn left(id_base: u64, scale: AxisScale) -> Self {
        Self::new(id_base, scale, AxisOrient::Left)
    }

    /// Convenience constructor for a bottom axis.
    pub fn bottom(id_base: u64, scale: AxisScale) -> Self {
        Self::new(id_base, scale, AxisOrient::Bottom)
    }

    /// Sets the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Sets the axis style.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Enables gridlines using the provided style.
    pub fn with_grid(mut self, grid: GridStyle) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Sets the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn range(&self, plot: Rect) -> (f64, f64) {
        match self.orient {
            AxisOrient::Bottom => (plot.x0, plot.x1),
            AxisOrient::Left => (plot.y1, plot.y0),
        }
    }

    /// Returns the band scale over `plot`, if this is a category axis.
    pub fn scale_band(&self, plot: Rect) -> Option<ScaleBand> {
        match &self.scale {
            AxisScale::Band(labels) => Some(ScaleBand::new(self.range(plot), labels.len())),
            AxisScale::Linear(_) => None,
        }
    }

    /// Returns the linear scale over `plot`, if this is a value axis.
    pub fn scale_linear(&self, plot: Rect) -> Option<ScaleLinear> {
        match &self.scale {
            AxisScale::Linear(spec) => Some(spec.instantiate(self.range(plot), self.tick_count)),
            AxisScale::Band(_) => None,
        }
    }

    /// Tick labels in tick order, with the value used to place each one.
    fn tick_labels(&self) -> Vec<(f64, String)> {
        match &self.scale {
            AxisScale::Band(labels) => labels
                .iter()
                .enumerate()
                .map(|(i, l)| (i as f64, l.clone()))
                .collect(),
            AxisScale::Linear(spec) => {
                let (d0, d1) = spec.resolved_domain(self.tick_count);
                let ticks = ScaleLinear::new((d0, d1), (0.0, 1.0)).ticks(self.tick_count);
                let step = tick_step(&ticks);
                ticks
                    .into_iter()
                    .map(|v| (v, format_tick_with_step(v, step)))
                    .collect()
            }
        }
    }

    /// Measures the thickness this axis needs along its normal direction.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> f64 {
        let font_size = self.style.label_font_size;
        let labels = self.tick_labels();
        let label_extent = match self.orient {
            AxisOrient::Left => labels
                .iter()
                .map(|(_, l)| measurer.measure(l, font_size).width)
                .fold(0.0_f64, f64::max),
            AxisOrient::Bottom if labels.is_empty() => 0.0,
            AxisOrient::Bottom => measurer.measure("Mg", font_size).height,
        };
        let mut out = self.tick_size.abs() + self.tick_padding.max(0.0) + label_extent;
        if let Some(title) = &self.title {
            let title_extent = match self.orient {
                // Rotated, so the title's height maps to width.
                AxisOrient::Left => self.style.title_font_size,
                AxisOrient::Bottom => measurer.measure(title, self.style.title_font_size).height,
            };
            out += self.title_offset.max(0.0) + title_extent;
        }
        out
    }

    /// Generates axis marks for the plot rectangle and the reserved axis rectangle.
    pub fn marks(&self, plot: Rect, axis_rect: Rect) -> Vec<Mark> {
        let band = self.scale_band(plot);
        let linear = self.scale_linear(plot);
        let position = |v: f64| match (&band, &linear) {
            (Some(b), _) => b.center(discrete_index(v)),
            (None, Some(s)) => s.map(v),
            (None, None) => 0.0,
        };
        let (lo, hi) = match self.orient {
            AxisOrient::Left => (plot.y0, plot.y1),
            AxisOrient::Bottom => (plot.x0, plot.x1),
        };
        let ticks: Vec<(f64, String)> = self
            .tick_labels()
            .into_iter()
            .map(|(v, l)| (position(v), l))
            .filter(|(p, _)| *p >= lo - 1.0e-9 && *p <= hi + 1.0e-9)
            .collect();

        let mut out = Vec::new();
        let rule = &self.style.rule;
        let ts = self.tick_size.abs();

        if let Some(grid) = &self.grid {
            for (i, (p, _)) in ticks.iter().enumerate() {
                let id = self.id(GRID_OFFSET, i);
                let spec = match self.orient {
                    AxisOrient::Left => RuleMarkSpec::horizontal(id, *p, plot.x0, plot.x1),
                    AxisOrient::Bottom => RuleMarkSpec::vertical(id, *p, plot.y0, plot.y1),
                };
                out.push(
                    spec.with_style(&grid.stroke)
                        .with_z_index(z_order::GRID_LINES)
                        .mark(),
                );
            }
        }

        let domain = match self.orient {
            AxisOrient::Left => RuleMarkSpec::vertical(self.id(0, 0), plot.x0, plot.y0, plot.y1),
            AxisOrient::Bottom => {
                RuleMarkSpec::horizontal(self.id(0, 0), plot.y1, plot.x0, plot.x1)
            }
        };
        out.push(
            domain
                .with_style(rule)
                .with_z_index(z_order::AXIS_RULES)
                .mark(),
        );

        for (i, (p, label)) in ticks.into_iter().enumerate() {
            let (tick, label_spec) = match self.orient {
                AxisOrient::Left => (
                    RuleMarkSpec::horizontal(self.id(TICK_OFFSET, i), p, plot.x0 - ts, plot.x0),
                    TextMarkSpec::new(
                        self.id(LABEL_OFFSET, i),
                        Point::new(plot.x0 - ts - self.tick_padding, p),
                        label,
                    )
                    .with_anchor(TextAnchor::End)
                    .with_baseline(TextBaseline::Middle),
                ),
                AxisOrient::Bottom => (
                    RuleMarkSpec::vertical(self.id(TICK_OFFSET, i), p, plot.y1, plot.y1 + ts),
                    TextMarkSpec::new(
                        self.id(LABEL_OFFSET, i),
                        Point::new(p, plot.y1 + ts + self.tick_padding),
                        label,
                    )
                    .with_anchor(TextAnchor::Middle)
                    .with_baseline(TextBaseline::Hanging),
                ),
            };
            out.push(
                tick.with_style(rule)
                    .with_z_index(z_order::AXIS_RULES)
                    .mark(),
            );
            out.push(
                label_spec
                    .with_font_size(self.style.label_font_size)
                    .with_fill(self.style.label_fill.clone())
                    .with_z_index(z_order::AXIS_LABELS)
                    .mark(),
            );
        }

        if let Some(title) = &self.title {
            let fs = self.style.title_font_size;
            // Titles sit on the outer edge of `axis_rect` so they never overlap tick labels.
            let spec = match self.orient {
                AxisOrient::Left => TextMarkSpec::new(
                    self.id(TITLE_OFFSET, 0),
                    Point::new(axis_rect.x0 + 0.5 * fs, 0.5 * (plot.y0 + plot.y1)),
                    title.clone(),
                )
                .with_angle(-90.0),
                AxisOrient::Bottom => TextMarkSpec::new(
                    self.id(TITLE_OFFSET, 0),
                    Point::new(0.5 * (plot.x0 + plot.x1), axis_rect.y1 - fs),
                    title.clone(),
                )
                .with_baseline(TextBaseline::Hanging),
            };
            out.push(
                spec.with_anchor(TextAnchor::Middle)
                    .with_font_size(fs)
                    .with_fill(self.style.title_fill.clone())
                    .with_z_index(z_order::AXIS_TITLES)
                    .mark(),
            );
        }

        out
    }

    fn id(&self, offset: u64, index: usize) -> MarkId {
        MarkId::from_raw(self.id_base + offset + index as u64)
    }
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

fn discrete_index(v: f64) -> usize {
    if !v.is_finite() || v < 0.0 {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "band positions come from enumerate indices"
    )]
    {
        v.round() as usize
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{HeuristicTextMeasurer, MarkPayload};

    fn labels(marks: &[Mark]) -> Vec<String> {
        marks
            .iter()
            .filter(|m| m.z_index == z_order::AXIS_LABELS)
            .filter_map(|m| m.as_text().map(|t| t.text.clone()))
            .collect()
    }

    #[test]
    fn value_axis_labels_follow_nice_ticks() {
        let axis = AxisSpec::bottom(
            100,
            AxisScale::Linear(ScaleLinearSpec::new((0.0, 4800.0)).with_nice(true)),
        )
        .with_tick_count(5);
        let plot = Rect::new(0.0, 0.0, 500.0, 200.0);
        let marks = axis.marks(plot, Rect::new(0.0, 200.0, 500.0, 230.0));
        assert_eq!(labels(&marks), ["0", "1000", "2000", "3000", "4000", "5000"]);
    }

    #[test]
    fn category_axis_places_first_label_at_the_bottom() {
        let axis = AxisSpec::left(
            100,
            AxisScale::Band(vec!["Charlotte".into(), "Ben".into(), "Dan".into()]),
        );
        let plot = Rect::new(80.0, 0.0, 400.0, 300.0);
        let marks = axis.marks(plot, Rect::new(0.0, 0.0, 80.0, 300.0));
        let ys: Vec<(String, f64)> = marks
            .iter()
            .filter(|m| m.z_index == z_order::AXIS_LABELS)
            .filter_map(|m| m.as_text().map(|t| (t.text.clone(), t.pos.y)))
            .collect();
        assert_eq!(ys.len(), 3);
        assert_eq!(ys[0].0, "Charlotte");
        assert!(ys[0].1 > ys[1].1 && ys[1].1 > ys[2].1);
        assert!(ys.iter().all(|(_, y)| *y > 0.0 && *y < 300.0));
    }

    #[test]
    fn left_measure_grows_with_label_width() {
        let short = AxisSpec::left(0, AxisScale::Band(vec!["Ben".into()]));
        let long = AxisSpec::left(0, AxisScale::Band(vec!["Charlotte".into()]));
        let m = HeuristicTextMeasurer;
        assert!(long.measure(&m) > short.measure(&m));
        let titled = long.clone().with_title("rep");
        assert!(titled.measure(&m) > long.measure(&m));
    }

    #[test]
    fn grid_spans_the_plot() {
        let axis = AxisSpec::bottom(
            0,
            AxisScale::Linear(ScaleLinearSpec::new((0.0, 10.0)).with_nice(true)),
        )
        .with_tick_count(2)
        .with_grid(GridStyle::default());
        let plot = Rect::new(0.0, 20.0, 100.0, 120.0);
        let marks = axis.marks(plot, Rect::new(0.0, 120.0, 100.0, 140.0));
        let grid: Vec<_> = marks
            .iter()
            .filter(|m| m.z_index == z_order::GRID_LINES)
            .collect();
        assert!(!grid.is_empty());
        for m in grid {
            let MarkPayload::Rule(r) = &m.payload else {
                panic!("gridlines are rules");
            };
            assert_eq!((r.line.p0.y, r.line.p1.y), (20.0, 120.0));
        }
    }
}

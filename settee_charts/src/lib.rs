// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar chart generation for settee result tables.
//!
//! `settee_charts` turns a [`PlotBuffer`] (a materialized `(label, value)` series) into a
//! [`Scene`] of positioned marks and serializes it as SVG. The pieces follow a small
//! measure/arrange flow:
//!
//! - [`TitleSpec`] and [`AxisSpec`] measure the space they need with a [`TextMeasurer`].
//! - [`ChartLayout::arrange`] splits the canvas into title, axis, and plot rectangles.
//! - Guides and series emit [`Mark`]s ordered by [`z_order`] and [`MarkId`].
//!
//! ```
//! use settee_charts::{HBarChartSpec, PlotBuffer};
//!
//! let buffer: PlotBuffer = [("Charlotte", 5000.0), ("Ben", 3000.0)].into_iter().collect();
//! let svg = HBarChartSpec::new().scene(&buffer).to_svg_string();
//! assert!(svg.contains("Total Sales by Month"));
//! ```

mod axis;
mod bar_chart;
mod format;
mod layout;
mod mark;
mod measure;
mod plot_buffer;
mod rect_mark;
mod rule_mark;
mod scale;
mod svg;
mod text_mark;
mod title;

pub mod z_order;

pub use axis::{AxisOrient, AxisScale, AxisSpec, AxisStyle, GridStyle, StrokeStyle};
pub use bar_chart::HBarChartSpec;
pub use format::format_tick_with_step;
pub use layout::{ChartLayout, ChartLayoutSpec, Size};
pub use mark::{
    Mark, MarkId, MarkPayload, RectPayload, RulePayload, TextAnchor, TextBaseline, TextPayload,
};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use plot_buffer::PlotBuffer;
pub use rect_mark::RectMarkSpec;
pub use rule_mark::RuleMarkSpec;
pub use scale::{ScaleBand, ScaleLinear, ScaleLinearSpec, nice_ticks};
pub use svg::Scene;
pub use text_mark::TextMarkSpec;
pub use title::TitleSpec;

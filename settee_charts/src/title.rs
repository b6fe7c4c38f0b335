// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart titles.
//!
//! Titles reserve a band in [`crate::ChartLayout`] and render as a single text mark centered in
//! that band.

use kurbo::{Point, Rect};
use peniko::Brush;

use crate::{Mark, MarkId, TextAnchor, TextBaseline, TextMarkSpec, TextMeasurer, z_order};

/// A chart-level title.
#[derive(Clone, Debug)]
pub struct TitleSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Title text (unshaped).
    pub text: String,
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Vertical padding above and below the text.
    pub padding: f64,
    /// Horizontal anchor within the title band.
    pub anchor: TextAnchor,
}

impl TitleSpec {
    /// Creates a title spec with default styling.
    pub fn new(id: MarkId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            font_size: 12.0,
            fill: Brush::default(),
            padding: 6.0,
            anchor: TextAnchor::Middle,
        }
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the vertical padding.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Returns the band height this title needs.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> f64 {
        2.0 * self.padding.max(0.0) + measurer.measure(&self.text, self.font_size).height
    }

    /// Emits the title mark placed within `title_rect`.
    pub fn mark(&self, title_rect: Rect) -> Mark {
        let x = match self.anchor {
            TextAnchor::Start => title_rect.x0,
            TextAnchor::Middle => 0.5 * (title_rect.x0 + title_rect.x1),
            TextAnchor::End => title_rect.x1,
        };
        let y = 0.5 * (title_rect.y0 + title_rect.y1);
        TextMarkSpec::new(self.id, Point::new(x, y), self.text.clone())
            .with_font_size(self.font_size)
            .with_fill(self.fill.clone())
            .with_anchor(self.anchor)
            .with_baseline(TextBaseline::Middle)
            .with_z_index(z_order::TITLES)
            .mark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeuristicTextMeasurer;

    #[test]
    fn title_is_centered_in_its_band() {
        let title = TitleSpec::new(MarkId::from_raw(7), "Total").with_font_size(20.0);
        let h = title.measure(&HeuristicTextMeasurer);
        assert!((h - (12.0 + 24.0)).abs() < 1e-9);

        let mark = title.mark(Rect::new(0.0, 10.0, 200.0, 10.0 + h));
        let text = mark.as_text().expect("title is a text mark");
        assert_eq!(text.text, "Total");
        assert_eq!(text.anchor, TextAnchor::Middle);
        assert!((text.pos.x - 100.0).abs() < 1e-9);
        assert!((text.pos.y - (10.0 + 0.5 * h)).abs() < 1e-9);
    }
}

// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text mark generation.

use kurbo::Point;
use peniko::Brush;

use crate::{Mark, MarkId, MarkPayload, TextAnchor, TextBaseline, TextPayload, z_order};

/// Builds a text [`Mark`].
///
/// Defaults: 12-unit font, no rotation, start-anchored, vertically centered on `pos`, default
/// brush, and the [`z_order::TITLES`] layer.
#[derive(Clone, Debug)]
pub struct TextMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Rendering order hint ([`Mark::z_index`]).
    pub z_index: i32,
    /// The text as it will be emitted.
    pub payload: TextPayload,
}

impl TextMarkSpec {
    /// Creates a text mark anchored at `pos`.
    pub fn new(id: MarkId, pos: Point, text: impl Into<String>) -> Self {
        Self {
            id,
            z_index: z_order::TITLES,
            payload: TextPayload {
                pos,
                text: text.into(),
                font_size: 12.0,
                angle: 0.0,
                anchor: TextAnchor::Start,
                baseline: TextBaseline::Middle,
                fill: Brush::default(),
            },
        }
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.payload.font_size = font_size;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.payload.fill = fill.into();
        self
    }

    /// Sets the horizontal alignment relative to `pos`.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.payload.anchor = anchor;
        self
    }

    /// Sets the vertical alignment relative to `pos`.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.payload.baseline = baseline;
        self
    }

    /// Rotates the text around `pos`, in degrees. Negative angles turn counter-clockwise.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.payload.angle = angle;
        self
    }

    /// Moves the mark to another paint layer.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates the mark.
    pub fn mark(self) -> Mark {
        Mark {
            id: self.id,
            z_index: self.z_index,
            payload: MarkPayload::Text(self.payload),
        }
    }
}

// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule mark generation.
//!
//! Axes draw their domain line, ticks, and gridlines as rules.

use kurbo::{Line, Point};
use peniko::Brush;

use crate::{Mark, MarkId, MarkPayload, RulePayload, StrokeStyle, z_order};

/// Builds a rule [`Mark`]: one stroked segment, 1 unit wide by default.
#[derive(Clone, Debug)]
pub struct RuleMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Rendering order hint ([`Mark::z_index`]).
    pub z_index: i32,
    /// The segment as it will be emitted.
    pub payload: RulePayload,
}

impl RuleMarkSpec {
    /// A rule from `p0` to `p1`.
    pub fn new(id: MarkId, p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self {
            id,
            z_index: z_order::SERIES_STROKE,
            payload: RulePayload {
                line: Line::new(p0, p1),
                stroke: Brush::default(),
                stroke_width: 1.0,
            },
        }
    }

    /// A rule at height `y` spanning `x0..x1`.
    pub fn horizontal(id: MarkId, y: f64, x0: f64, x1: f64) -> Self {
        Self::new(id, (x0, y), (x1, y))
    }

    /// A rule at `x` spanning `y0..y1`.
    pub fn vertical(id: MarkId, x: f64, y0: f64, y1: f64) -> Self {
        Self::new(id, (x, y0), (x, y1))
    }

    /// Strokes the rule with `style`.
    pub fn with_style(mut self, style: &StrokeStyle) -> Self {
        self.payload.stroke = style.brush.clone();
        self.payload.stroke_width = style.stroke_width;
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
            payload: MarkPayload::Rule(self.payload),
        }
    }
}

// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle mark generation.

use kurbo::Rect;
use peniko::Brush;

use crate::{Mark, MarkId, MarkPayload, RectPayload, z_order};

/// Builds a filled rectangle [`Mark`] (bars and backgrounds).
#[derive(Clone, Debug)]
pub struct RectMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Rendering order hint ([`Mark::z_index`]).
    pub z_index: i32,
    /// The rectangle as it will be emitted.
    pub payload: RectPayload,
}

impl RectMarkSpec {
    /// A rectangle covering `rect`, normalized to non-negative width and height.
    pub fn new(id: MarkId, rect: Rect) -> Self {
        Self {
            id,
            z_index: z_order::SERIES_FILL,
            payload: RectPayload {
                rect: rect.abs(),
                fill: Brush::default(),
            },
        }
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.payload.fill = fill.into();
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
            payload: MarkPayload::Rect(self.payload),
        }
    }
}

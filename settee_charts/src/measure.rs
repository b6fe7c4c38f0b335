// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for guide layout.
//!
//! Charts never shape text. Guides ask a measurer for rough extents so layout can reserve
//! margins before marks are generated.

use crate::Size;

/// A minimal text measurement interface used by guide generators.
pub trait TextMeasurer {
    /// Returns the extent of `text` at `font_size`, in scene units.
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

/// Width-per-glyph heuristic.
///
/// Assumes an average advance of `0.6em` and a line height of `1.2em`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl HeuristicTextMeasurer {
    /// Average advance per character, in ems.
    pub const ADVANCE: f64 = 0.6;
    /// Line height, in ems.
    pub const LINE_HEIGHT: f64 = 1.2;
}

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        Size {
            width: Self::ADVANCE * font_size * text.chars().count() as f64,
            height: Self::LINE_HEIGHT * font_size,
        }
    }
}

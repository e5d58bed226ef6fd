// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for label layout.
//!
//! Shaping and glyph layout stay downstream; label placement only needs the extent of each
//! label's box, so the layout pass accepts a measurer.

use kurbo::Size;

/// A minimal text measurement interface used to size funnel labels.
///
/// Callers can plug in a real text measurement backend (e.g. based on shaping), or use
/// [`HeuristicTextMeasurer`].
pub trait TextMeasurer {
    /// Returns the unrotated size of a single line of `text`.
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

/// A tiny heuristic text measurer suitable for demos and early layout.
///
/// It assumes an average glyph width of ~0.6em and height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        let width = 0.6 * font_size * text.chars().count() as f64;
        Size::new(width, font_size)
    }
}

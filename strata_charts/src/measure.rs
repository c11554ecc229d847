// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text extents for guide layout.
//!
//! Scenes carry unshaped text, so axis and legend space is reserved from an estimate.

/// Estimates the extent of a run of text.
pub trait TextMeasurer {
    /// Returns `(width, height)` in scene units.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Assumes every glyph is 0.6em wide and a line is 1em tall.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        (0.6 * font_size * text.chars().count() as f64, font_size)
    }
}

/// Widest of `labels`.
pub(crate) fn max_width<'a>(
    measurer: &dyn TextMeasurer,
    labels: impl IntoIterator<Item = &'a str>,
    font_size: f64,
) -> f64 {
    labels
        .into_iter()
        .map(|l| measurer.measure(l, font_size).0)
        .fold(0.0, f64::max)
}

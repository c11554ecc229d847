// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-request chart styling.
//!
//! There are no global defaults: every [`ChartBuilder`](crate::ChartBuilder) call takes the
//! [`ChartStyle`] and [`ChartSize`] it should use.

use peniko::Color;
use peniko::color::palette::css;

use crate::color::{CategoricalColors, ColorInterpolator};

/// Output view size in scene units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartSize {
    /// View width.
    pub width: f64,
    /// View height.
    pub height: f64,
}

impl ChartSize {
    /// Creates a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for ChartSize {
    fn default() -> Self {
        Self::new(640.0, 400.0)
    }
}

/// Space kept clear around the chart, outside guides.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margin {
    /// Top.
    pub top: f64,
    /// Right.
    pub right: f64,
    /// Bottom.
    pub bottom: f64,
    /// Left.
    pub left: f64,
}

impl Margin {
    /// The same margin on every side.
    pub fn uniform(m: f64) -> Self {
        Self {
            top: m,
            right: m,
            bottom: m,
            left: m,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(12.0)
    }
}

/// Colors, type sizes and spacing for one chart request.
#[derive(Clone, Debug)]
pub struct ChartStyle {
    /// Key-to-color assignment for categorical encodings.
    pub categorical_colors: CategoricalColors,
    /// Color ramp for sequential encodings.
    pub sequential_interpolator: ColorInterpolator,
    /// Labels, titles and legend text.
    pub text_color: Color,
    /// Axis lines and ticks.
    pub axis_color: Color,
    /// Gridlines.
    pub grid_color: Color,
    /// What [`Fill::NoData`](strata_core::Fill::NoData) should render as.
    ///
    /// Chart builders emit the `NoData` reference; renderers resolve it with this color.
    pub no_data_color: Color,
    /// Tick label and legend font size.
    pub font_size: f64,
    /// Chart title font size.
    pub title_font_size: f64,
    /// Outer margin.
    pub margin: Margin,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            categorical_colors: CategoricalColors::default(),
            sequential_interpolator: ColorInterpolator::default(),
            text_color: Color::from_rgba8(0x33, 0x33, 0x33, 0xff),
            axis_color: css::BLACK,
            grid_color: css::BLACK.with_alpha(40.0 / 255.0),
            no_data_color: Color::from_rgba8(0xd9, 0xd9, 0xd9, 0xff),
            font_size: 10.0,
            title_font_size: 14.0,
            margin: Margin::default(),
        }
    }
}

impl ChartStyle {
    /// Sets the categorical colors.
    pub fn with_categorical_colors(mut self, colors: CategoricalColors) -> Self {
        self.categorical_colors = colors;
        self
    }

    /// Sets the sequential interpolator.
    pub fn with_sequential_interpolator(mut self, interpolator: ColorInterpolator) -> Self {
        self.sequential_interpolator = interpolator;
        self
    }

    /// Sets the text color.
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Sets the no-data color.
    pub fn with_no_data_color(mut self, color: Color) -> Self {
        self.no_data_color = color;
        self
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size.max(1.0);
        self
    }

    /// Sets the outer margin.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }
}

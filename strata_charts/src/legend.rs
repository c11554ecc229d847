// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legends: categorical swatches and a sequential color ramp.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Color;
use strata_core::{Fill, Key, Primitive, TextAnchor, TextBaseline};

use crate::color::ColorInterpolator;
use crate::format::format_value;
use crate::measure::{TextMeasurer, max_width};
use crate::style::ChartStyle;
use crate::z_order;

const SWATCH: f64 = 10.0;
const ROW_GAP: f64 = 4.0;
const LABEL_DX: f64 = 6.0;
const RAMP_WIDTH: f64 = 12.0;
const RAMP_HEIGHT: f64 = 120.0;
const RAMP_STEPS: usize = 32;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LegendItem {
    pub(crate) label: String,
    pub(crate) fill: Fill,
}

impl LegendItem {
    pub(crate) fn new(label: impl Into<String>, fill: impl Into<Fill>) -> Self {
        Self {
            label: label.into(),
            fill: fill.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Legend {
    /// One swatch and label per item, top to bottom.
    Swatches {
        title: Option<String>,
        items: Vec<LegendItem>,
    },
    /// A stepped gradient with min/max labels and an optional no-data swatch.
    Ramp {
        title: Option<String>,
        domain: (f64, f64),
        interpolator: ColorInterpolator,
        no_data: bool,
    },
}

impl Legend {
    /// One swatch per key, labeled with the key.
    pub(crate) fn swatches(title: Option<&str>, keys: &[Key], colors: &[Color]) -> Self {
        Self::Swatches {
            title: title.map(String::from),
            items: keys
                .iter()
                .zip(colors)
                .map(|(k, &c)| LegendItem::new(k.to_string(), c))
                .collect(),
        }
    }

    fn title(&self) -> Option<&str> {
        match self {
            Self::Swatches { title, .. } | Self::Ramp { title, .. } => title.as_deref(),
        }
    }

    fn title_height(&self, style: &ChartStyle) -> f64 {
        if self.title().is_some() {
            style.font_size + ROW_GAP * 2.0
        } else {
            0.0
        }
    }

    fn row_height(style: &ChartStyle) -> f64 {
        SWATCH.max(style.font_size)
    }

    /// `(width, height)` of the legend block.
    pub(crate) fn size(&self, measurer: &dyn TextMeasurer, style: &ChartStyle) -> (f64, f64) {
        let font = style.font_size;
        let title_w = self.title().map_or(0.0, |t| measurer.measure(t, font).0);
        let (body_w, body_h) = match self {
            Self::Swatches { items, .. } => {
                let label_w = max_width(measurer, items.iter().map(|i| i.label.as_str()), font);
                let n = items.len() as f64;
                let h = if items.is_empty() {
                    0.0
                } else {
                    n * Self::row_height(style) + (n - 1.0) * ROW_GAP
                };
                (SWATCH + LABEL_DX + label_w, h)
            }
            Self::Ramp {
                domain, no_data, ..
            } => {
                let label_w = max_width(
                    measurer,
                    [
                        format_value(domain.0).as_str(),
                        format_value(domain.1).as_str(),
                        "no data",
                    ],
                    font,
                );
                let extra = if *no_data {
                    ROW_GAP * 2.0 + Self::row_height(style)
                } else {
                    0.0
                };
                (RAMP_WIDTH + LABEL_DX + label_w, RAMP_HEIGHT + extra)
            }
        };
        (body_w.max(title_w), self.title_height(style) + body_h)
    }

    pub(crate) fn primitives(&self, origin: Point, style: &ChartStyle) -> Vec<Primitive> {
        let font = style.font_size;
        let mut out = Vec::new();
        if let Some(title) = self.title() {
            out.push(
                Primitive::text(origin, title, font)
                    .with_baseline(TextBaseline::Hanging)
                    .with_fill(style.text_color)
                    .with_z_index(z_order::LEGEND_LABELS),
            );
        }
        let x = origin.x;
        let y0 = origin.y + self.title_height(style);
        let row_h = Self::row_height(style);

        let label = |pos: (f64, f64), text: String| {
            Primitive::text(pos, text, font)
                .with_fill(style.text_color)
                .with_z_index(z_order::LEGEND_LABELS)
        };

        match self {
            Self::Swatches { items, .. } => {
                for (i, item) in items.iter().enumerate() {
                    let y = y0 + i as f64 * (row_h + ROW_GAP);
                    let sy = y + (row_h - SWATCH) * 0.5;
                    out.push(
                        Primitive::rect(Rect::new(x, sy, x + SWATCH, sy + SWATCH))
                            .with_fill(item.fill)
                            .with_z_index(z_order::LEGEND_SWATCHES),
                    );
                    out.push(label(
                        (x + SWATCH + LABEL_DX, y + row_h * 0.5),
                        item.label.clone(),
                    ));
                }
            }
            Self::Ramp {
                domain,
                interpolator,
                no_data,
                ..
            } => {
                // Top of the ramp is the domain maximum.
                let step_h = RAMP_HEIGHT / RAMP_STEPS as f64;
                for i in 0..RAMP_STEPS {
                    let t = 1.0 - (i as f64 + 0.5) / RAMP_STEPS as f64;
                    let y = y0 + i as f64 * step_h;
                    out.push(
                        Primitive::rect(Rect::new(x, y, x + RAMP_WIDTH, y + step_h))
                            .with_fill(interpolator.eval(t))
                            .with_z_index(z_order::LEGEND_SWATCHES),
                    );
                }
                let lx = x + RAMP_WIDTH + LABEL_DX;
                out.push(
                    label((lx, y0), format_value(domain.1)).with_baseline(TextBaseline::Hanging),
                );
                out.push(
                    label((lx, y0 + RAMP_HEIGHT), format_value(domain.0))
                        .with_baseline(TextBaseline::Alphabetic),
                );
                if *no_data {
                    let y = y0 + RAMP_HEIGHT + ROW_GAP * 2.0;
                    out.push(
                        Primitive::rect(Rect::new(x, y, x + RAMP_WIDTH, y + SWATCH))
                            .with_fill(Fill::NoData)
                            .with_z_index(z_order::LEGEND_SWATCHES),
                    );
                    out.push(
                        label((lx, y + SWATCH * 0.5), String::from("no data"))
                            .with_anchor(TextAnchor::Start),
                    );
                }
            }
        }
        out
    }
}

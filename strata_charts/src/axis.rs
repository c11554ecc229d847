// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis primitives: domain line, ticks, tick labels, optional gridlines and title.
//!
//! Labels only depend on the scale domain, so an [`Axis`] is measured before the plot is arranged
//! and re-ranged onto the plot edge when it emits primitives.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::f64::consts::FRAC_1_SQRT_2;

use kurbo::Rect;
use strata_core::{Primitive, TextAnchor, TextBaseline};

use crate::format::format_tick;
use crate::measure::{TextMeasurer, max_width};
use crate::scale::{ScaleBand, ScaleLinear, ScalePoint};
use crate::style::ChartStyle;
use crate::z_order;

const TICK_SIZE: f64 = 5.0;
const LABEL_PAD: f64 = 3.0;
const TITLE_PAD: f64 = 6.0;
const ROTATED_ANGLE: f64 = -45.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AxisOrient {
    Bottom,
    Left,
}

#[derive(Clone, Debug)]
pub(crate) enum AxisScale {
    Linear(ScaleLinear),
    Band(ScaleBand),
    Point(ScalePoint),
}

#[derive(Clone, Debug)]
pub(crate) struct Axis {
    orient: AxisOrient,
    scale: AxisScale,
    tick_count: usize,
    title: Option<String>,
    grid: bool,
    rotate_labels: bool,
}

impl Axis {
    pub(crate) fn bottom(scale: AxisScale) -> Self {
        Self::new(AxisOrient::Bottom, scale)
    }

    pub(crate) fn left(scale: AxisScale) -> Self {
        Self::new(AxisOrient::Left, scale)
    }

    fn new(orient: AxisOrient, scale: AxisScale) -> Self {
        Self {
            orient,
            scale,
            tick_count: 5,
            title: None,
            grid: false,
            rotate_labels: false,
        }
    }

    pub(crate) fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub(crate) fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    pub(crate) fn with_tick_count(mut self, count: usize) -> Self {
        self.tick_count = count;
        self
    }

    /// Rotates bottom labels when the widest one doesn't fit its slot on a plot about
    /// `plot_width` wide.
    pub(crate) fn fit_labels(
        mut self,
        measurer: &dyn TextMeasurer,
        font_size: f64,
        plot_width: f64,
    ) -> Self {
        if self.orient != AxisOrient::Bottom {
            return self;
        }
        let count = match &self.scale {
            AxisScale::Band(s) => s.count(),
            AxisScale::Point(s) => s.count(),
            AxisScale::Linear(_) => return self,
        };
        if count == 0 {
            return self;
        }
        let ticks = self.ticks((0.0, 1.0));
        let widest = max_width(measurer, ticks.iter().map(|(_, l)| l.as_str()), font_size);
        self.rotate_labels = widest > plot_width.max(0.0) / count as f64;
        self
    }

    /// Tick `(position, label)` pairs along `range`.
    fn ticks(&self, range: (f64, f64)) -> Vec<(f64, String)> {
        match &self.scale {
            AxisScale::Linear(s) => {
                let s = s.with_range(range);
                let ticks = s.ticks(self.tick_count);
                let step = match ticks.as_slice() {
                    [a, b, ..] => b - a,
                    _ => 1.0,
                };
                ticks
                    .into_iter()
                    .map(|t| (s.map(t), format_tick(t, step)))
                    .collect()
            }
            AxisScale::Band(s) => {
                let s = s.clone().with_range(range);
                let half = s.band_width() * 0.5;
                s.domain()
                    .iter()
                    .enumerate()
                    .map(|(i, k)| (s.x_at(i) + half, k.to_string()))
                    .collect()
            }
            AxisScale::Point(s) => {
                let s = s.clone().with_range(range);
                s.domain()
                    .iter()
                    .enumerate()
                    .map(|(i, k)| (s.x_at(i), k.to_string()))
                    .collect()
            }
        }
    }

    /// Thickness of the axis measured away from the plot edge.
    pub(crate) fn extent(&self, measurer: &dyn TextMeasurer, style: &ChartStyle) -> f64 {
        let font = style.font_size;
        let ticks = self.ticks((0.0, 1.0));
        let widest = max_width(measurer, ticks.iter().map(|(_, l)| l.as_str()), font);
        let labels = if ticks.is_empty() {
            0.0
        } else {
            LABEL_PAD
                + match (self.orient, self.rotate_labels) {
                    (AxisOrient::Bottom, false) => font,
                    (AxisOrient::Bottom, true) => (widest + font) * FRAC_1_SQRT_2,
                    (AxisOrient::Left, _) => widest,
                }
        };
        let title = if self.title.is_some() {
            TITLE_PAD + font
        } else {
            0.0
        };
        TICK_SIZE + labels + title
    }

    pub(crate) fn primitives(
        &self,
        plot: Rect,
        measurer: &dyn TextMeasurer,
        style: &ChartStyle,
    ) -> Vec<Primitive> {
        let mut out = Vec::new();
        let font = style.font_size;
        let ticks = self.ticks(match self.orient {
            AxisOrient::Bottom => (plot.x0, plot.x1),
            AxisOrient::Left => (plot.y1, plot.y0),
        });
        let is_linear = matches!(self.scale, AxisScale::Linear(_));

        match self.orient {
            AxisOrient::Bottom => {
                let y = plot.y1;
                out.push(
                    Primitive::line((plot.x0, y), (plot.x1, y))
                        .with_stroke(style.axis_color, 1.0)
                        .with_z_index(z_order::AXIS_RULES),
                );
                for (x, label) in &ticks {
                    out.push(
                        Primitive::line((*x, y), (*x, y + TICK_SIZE))
                            .with_stroke(style.axis_color, 1.0)
                            .with_z_index(z_order::AXIS_RULES),
                    );
                    if self.grid && is_linear {
                        out.push(
                            Primitive::line((*x, plot.y0), (*x, plot.y1))
                                .with_stroke(style.grid_color, 1.0)
                                .with_z_index(z_order::GRID),
                        );
                    }
                    let text =
                        Primitive::text((*x, y + TICK_SIZE + LABEL_PAD), label.clone(), font)
                            .with_fill(style.text_color)
                            .with_z_index(z_order::AXIS_LABELS);
                    out.push(if self.rotate_labels {
                        text.with_anchor(TextAnchor::End)
                            .with_baseline(TextBaseline::Middle)
                            .with_angle(ROTATED_ANGLE)
                    } else {
                        text.with_anchor(TextAnchor::Middle)
                            .with_baseline(TextBaseline::Hanging)
                    });
                }
                if let Some(title) = &self.title {
                    let y = plot.y1 + self.extent(measurer, style) - font * 0.5;
                    out.push(
                        Primitive::text((plot.center().x, y), title.clone(), font)
                            .with_anchor(TextAnchor::Middle)
                            .with_fill(style.text_color)
                            .with_z_index(z_order::AXIS_LABELS),
                    );
                }
            }
            AxisOrient::Left => {
                let x = plot.x0;
                out.push(
                    Primitive::line((x, plot.y0), (x, plot.y1))
                        .with_stroke(style.axis_color, 1.0)
                        .with_z_index(z_order::AXIS_RULES),
                );
                for (y, label) in &ticks {
                    out.push(
                        Primitive::line((x - TICK_SIZE, *y), (x, *y))
                            .with_stroke(style.axis_color, 1.0)
                            .with_z_index(z_order::AXIS_RULES),
                    );
                    if self.grid && is_linear {
                        out.push(
                            Primitive::line((plot.x0, *y), (plot.x1, *y))
                                .with_stroke(style.grid_color, 1.0)
                                .with_z_index(z_order::GRID),
                        );
                    }
                    out.push(
                        Primitive::text((x - TICK_SIZE - LABEL_PAD, *y), label.clone(), font)
                            .with_anchor(TextAnchor::End)
                            .with_fill(style.text_color)
                            .with_z_index(z_order::AXIS_LABELS),
                    );
                }
                if let Some(title) = &self.title {
                    let x = plot.x0 - self.extent(measurer, style) + font * 0.5;
                    out.push(
                        Primitive::text((x, plot.center().y), title.clone(), font)
                            .with_anchor(TextAnchor::Middle)
                            .with_angle(-90.0)
                            .with_fill(style.text_color)
                            .with_z_index(z_order::AXIS_LABELS),
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use strata_core::{Key, Shape};

    use super::*;
    use crate::measure::HeuristicTextMeasurer;

    fn labels(prims: &[Primitive]) -> Vec<&str> {
        prims
            .iter()
            .filter_map(|p| match &p.shape {
                Shape::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn linear_left_axis_labels_ticks() {
        let scale = ScaleLinear::new((0.0, 40.0), (200.0, 0.0));
        let axis = Axis::left(AxisScale::Linear(scale))
            .with_tick_count(4)
            .with_grid(true)
            .with_title("pct");
        let style = ChartStyle::default();
        let prims = axis.primitives(
            Rect::new(40.0, 0.0, 300.0, 200.0),
            &HeuristicTextMeasurer,
            &style,
        );
        assert_eq!(labels(&prims), ["0", "10", "20", "30", "40", "pct"]);
        let grid = prims.iter().filter(|p| p.z_index == z_order::GRID).count();
        assert_eq!(grid, 5);
    }

    #[test]
    fn crowded_band_labels_rotate_and_grow_the_extent() {
        let domain = vec![
            Key::text("Democratic Republic of the Congo"),
            Key::text("Central African Republic"),
        ];
        let axis = Axis::bottom(AxisScale::Band(ScaleBand::new(domain, (0.0, 1.0))));
        let style = ChartStyle::default();
        let flat = axis.extent(&HeuristicTextMeasurer, &style);
        let rotated = axis
            .fit_labels(&HeuristicTextMeasurer, style.font_size, 100.0)
            .extent(&HeuristicTextMeasurer, &style);
        assert!(rotated > flat);
    }

    #[test]
    fn empty_discrete_axis_still_draws_its_rule() {
        let axis = Axis::bottom(AxisScale::Point(ScalePoint::new(Vec::new(), (0.0, 10.0))));
        let prims = axis.primitives(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            &HeuristicTextMeasurer,
            &ChartStyle::default(),
        );
        assert_eq!(prims.len(), 1);
    }
}

// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measure/arrange layout for a single chart view.
//!
//! Guides are measured first (axis extents, legend size); [`ChartLayout::arrange`] then carves
//! the view into a title strip, the plot rectangle and a legend column right of the plot.

use kurbo::Rect;

use crate::style::{ChartSize, Margin};

/// Measured extents of everything around the plot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct LayoutSpec {
    pub(crate) title_height: f64,
    pub(crate) axis_left: f64,
    pub(crate) axis_bottom: f64,
    /// `(width, height)` of the legend block.
    pub(crate) legend: Option<(f64, f64)>,
}

/// Gap between the plot (or its right edge) and the legend column.
const LEGEND_GAP: f64 = 16.0;
/// Gap between the title strip and the plot.
const TITLE_GAP: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ChartLayout {
    pub(crate) view: Rect,
    pub(crate) title: Option<Rect>,
    pub(crate) plot: Rect,
    pub(crate) legend: Option<Rect>,
}

impl ChartLayout {
    pub(crate) fn arrange(size: ChartSize, margin: Margin, spec: &LayoutSpec) -> Self {
        let view = Rect::new(0.0, 0.0, size.width.max(0.0), size.height.max(0.0));
        let title_h = spec.title_height.max(0.0);

        let mut left = margin.left.max(0.0) + spec.axis_left.max(0.0);
        let mut right = margin.right.max(0.0);
        let mut top = margin.top.max(0.0);
        let bottom = margin.bottom.max(0.0) + spec.axis_bottom.max(0.0);

        let title = (title_h > 0.0).then(|| {
            let r = Rect::new(0.0, top, view.x1, top + title_h);
            top += title_h + TITLE_GAP;
            r
        });

        if let Some((w, _)) = spec.legend {
            right += w.max(0.0) + LEGEND_GAP;
        }

        // Never invert the plot, however small the view.
        left = left.min(view.x1);
        let x1 = (view.x1 - right).max(left);
        let y1 = (view.y1 - bottom).max(top.min(view.y1));
        let plot = Rect::new(left, top.min(y1), x1, y1);

        let legend = spec.legend.map(|(w, h)| {
            let x0 = plot.x1 + LEGEND_GAP;
            Rect::new(x0, plot.y0, x0 + w.max(0.0), plot.y0 + h.max(0.0))
        });

        Self {
            view,
            title,
            plot,
            legend,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn arrange_reserves_guides() {
        let layout = ChartLayout::arrange(
            ChartSize::new(400.0, 300.0),
            Margin::uniform(10.0),
            &LayoutSpec {
                title_height: 20.0,
                axis_left: 30.0,
                axis_bottom: 25.0,
                legend: Some((60.0, 40.0)),
            },
        );
        assert_eq!(layout.title, Some(Rect::new(0.0, 10.0, 400.0, 30.0)));
        assert_eq!(layout.plot, Rect::new(40.0, 38.0, 314.0, 265.0));
        assert_eq!(layout.legend, Some(Rect::new(330.0, 38.0, 390.0, 78.0)));
    }

    #[test]
    fn tiny_views_never_invert() {
        let layout = ChartLayout::arrange(
            ChartSize::new(20.0, 10.0),
            Margin::uniform(12.0),
            &LayoutSpec {
                axis_left: 40.0,
                axis_bottom: 30.0,
                ..LayoutSpec::default()
            },
        );
        assert!(layout.plot.width() >= 0.0);
        assert!(layout.plot.height() >= 0.0);
    }
}

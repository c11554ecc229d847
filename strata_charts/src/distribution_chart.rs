// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distribution charts: histogram, violin, boxplot and ridgeline.
//!
//! Binned charts resolve one set of thresholds over the whole column and share count scales
//! across groups, so shapes are comparable between categories.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect};
use strata_core::{DataShapeError, Error, Key, Primitive, Table};
use strata_transforms::{Bin, bin};

use crate::axis::{Axis, AxisScale};
use crate::builder::Canvas;
use crate::chart::{BoxplotSpec, HistogramSpec, RidgelineSpec, Thresholds, ViolinSpec};
use crate::format::format_value;
use crate::legend::Legend;
use crate::scale::{ScaleBand, ScaleLinear, ScaleOptions, discrete_domain, linear_domain};
use crate::z_order;

const TICKS: usize = 5;
const BAR_GAP: f64 = 1.0;
const RIDGE_OPACITY: f64 = 0.85;

fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Bins `values` over thresholds resolved from their own extent.
fn bin_column(
    values: &[f64],
    thresholds: &Thresholds,
    groups: Option<&[Key]>,
) -> Result<Vec<Bin>, DataShapeError> {
    let (lo, hi) = finite_extent(values).unwrap_or((0.0, 1.0));
    bin(values, &thresholds.resolve(lo, hi)?, groups)
}

/// `(first start, last end)` of a bin run.
fn bin_span(bins: &[Bin]) -> Option<(f64, f64)> {
    Some((bins.first()?.start, bins.last()?.end))
}

fn bin_label(b: &Bin) -> String {
    let close = if b.closed { ']' } else { ')' };
    format!("[{}, {}{close}", format_value(b.start), format_value(b.end))
}

// Missing values become NaN so group keys stay aligned; `bin` skips them.
fn numbers_or_nan(table: &Table, column: &str) -> Result<Vec<f64>, Error> {
    Ok(table
        .numbers(column)?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

pub(crate) fn histogram(
    canvas: &mut Canvas<'_>,
    spec: &HistogramSpec,
    table: &Table,
) -> Result<(), Error> {
    let values = numbers_or_nan(table, &spec.value)?;
    let keys = spec.group.as_deref().map(|g| table.keys(g)).transpose()?;
    let bins = bin_column(&values, &spec.thresholds, keys.as_deref())?;

    let groups: Vec<Key> = bins
        .first()
        .map(|b| b.groups.iter().map(|g| g.key.clone()).collect())
        .unwrap_or_default();
    let max_count = bins
        .iter()
        .flat_map(|b| b.groups.iter().map(|g| g.count()))
        .max()
        .unwrap_or(0);
    let colors = canvas.style.categorical_colors.resolve(&groups);
    let legend = spec
        .group
        .as_deref()
        .map(|title| Legend::swatches(Some(title), &groups, &colors));

    let x = ScaleLinear::new(
        linear_domain(
            bin_span(&bins).into_iter().flat_map(|(a, b)| [a, b]),
            &ScaleOptions::default(),
        ),
        (0.0, 1.0),
    );
    let y = ScaleLinear::new(
        linear_domain(
            [max_count as f64],
            &ScaleOptions::default().with_zero(true).with_nice(TICKS),
        ),
        (0.0, 1.0),
    );
    let x_axis = Axis::bottom(AxisScale::Linear(x)).with_title(&spec.value);
    let y_axis = Axis::left(AxisScale::Linear(y))
        .with_grid(true)
        .with_tick_count(TICKS)
        .with_title("count");
    let plot = canvas.frame(Some(&y_axis), Some(&x_axis), legend.as_ref());
    let x = x.with_range((plot.x0, plot.x1));
    let y = y.with_range((plot.y1, plot.y0));

    let zero = y.map(0.0);
    let n = groups.len().max(1) as f64;
    for b in &bins {
        let (x0, x1) = (x.map(b.start), x.map(b.end));
        let slot = (x1 - x0) / n;
        for (g, (group, color)) in b.groups.iter().zip(&colors).enumerate() {
            if group.count() == 0 {
                continue;
            }
            let gx = x0 + g as f64 * slot;
            let right = (gx + slot - BAR_GAP).max(gx);
            let tooltip = if spec.group.is_some() {
                format!("{} {}: {}", group.key, bin_label(b), group.count())
            } else {
                format!("{}: {}", bin_label(b), group.count())
            };
            canvas.push(
                Primitive::rect(Rect::new(gx, zero, right, y.map(group.count() as f64)).abs())
                    .with_fill(*color)
                    .with_z_index(z_order::MARKS)
                    .with_tooltip(tooltip),
            );
        }
    }
    Ok(())
}

pub(crate) fn violin(
    canvas: &mut Canvas<'_>,
    spec: &ViolinSpec,
    table: &Table,
) -> Result<(), Error> {
    let values = numbers_or_nan(table, &spec.value)?;
    let keys = table.keys(&spec.category)?;
    let bins = bin_column(&values, &spec.thresholds, Some(&keys))?;
    let categories = discrete_domain(keys, &ScaleOptions::default());
    let max_count = bins
        .iter()
        .flat_map(|b| b.groups.iter().map(|g| g.count()))
        .max()
        .unwrap_or(0);

    let x = ScaleBand::new(categories, (0.0, 1.0));
    let y = ScaleLinear::new(
        linear_domain(
            bin_span(&bins).into_iter().flat_map(|(a, b)| [a, b]),
            &ScaleOptions::default(),
        ),
        (0.0, 1.0),
    );
    let x_axis = canvas.fit_x_axis(Axis::bottom(AxisScale::Band(x.clone())).with_title(&spec.category));
    let y_axis = Axis::left(AxisScale::Linear(y))
        .with_grid(true)
        .with_tick_count(TICKS)
        .with_title(&spec.value);
    let plot = canvas.frame(Some(&y_axis), Some(&x_axis), None);
    let x = x.with_range((plot.x0, plot.x1));
    let y = y.with_range((plot.y1, plot.y0));
    // One half-width scale for every category.
    let half = ScaleLinear::new((0.0, max_count as f64), (0.0, x.band_width() * 0.5));

    let colors = canvas.style.categorical_colors.resolve(x.domain());
    for (i, (category, color)) in x.domain().iter().zip(&colors).enumerate() {
        let total: usize = bins.iter().map(|b| b.count_for(category)).sum();
        let Some((start, end)) = bin_span(&bins).filter(|_| total > 0) else {
            continue;
        };
        let cx = x.x_at(i) + x.band_width() * 0.5;
        let mut path = BezPath::new();
        path.move_to((cx, y.map(start)));
        for b in &bins {
            path.line_to((cx + half.map(b.count_for(category) as f64), y.map(b.midpoint())));
        }
        path.line_to((cx, y.map(end)));
        for b in bins.iter().rev() {
            path.line_to((cx - half.map(b.count_for(category) as f64), y.map(b.midpoint())));
        }
        path.close_path();
        canvas.push(
            Primitive::path(path)
                .with_fill(*color)
                .with_z_index(z_order::MARKS)
                .with_tooltip(format!("{category}: {total} values")),
        );
    }
    Ok(())
}

/// One summary row, already validated.
struct BoxRow {
    category: Key,
    min: f64,
    q1: f64,
    median: f64,
    q3: f64,
    max: f64,
    low: f64,
    high: f64,
}

pub(crate) fn boxplot(
    canvas: &mut Canvas<'_>,
    spec: &BoxplotSpec,
    table: &Table,
) -> Result<(), Error> {
    let category_idx = table.column_index(&spec.category)?;
    let stats = table.require(&[
        spec.min.as_str(),
        spec.q1.as_str(),
        spec.median.as_str(),
        spec.q3.as_str(),
        spec.max.as_str(),
    ])?;
    let lower_idx = spec
        .lower_whisker
        .as_deref()
        .map(|c| table.column_index(c))
        .transpose()?;
    let upper_idx = spec
        .upper_whisker
        .as_deref()
        .map(|c| table.column_index(c))
        .transpose()?;

    let mut rows: Vec<BoxRow> = Vec::new();
    for row in table.rows() {
        let nums: Option<Vec<f64>> = stats.iter().map(|&i| row.get(i).as_f64()).collect();
        let Some([min, q1, median, q3, max]) = nums.and_then(|n| <[f64; 5]>::try_from(n).ok())
        else {
            continue;
        };
        let low = match lower_idx {
            Some(i) => row.get(i).as_f64(),
            None => Some(min),
        };
        let high = match upper_idx {
            Some(i) => row.get(i).as_f64(),
            None => Some(max),
        };
        let (Some(low), Some(high)) = (low, high) else {
            continue;
        };
        rows.push(BoxRow {
            category: row.get(category_idx).key(),
            min,
            q1,
            median,
            q3,
            max,
            low,
            high,
        });
    }
    tracing::trace!(rows = rows.len(), skipped = table.len() - rows.len(), "boxplot rows");

    let categories = discrete_domain(
        rows.iter().map(|r| r.category.clone()),
        &ScaleOptions::default(),
    );
    let x = ScaleBand::new(categories, (0.0, 1.0)).with_padding(0.3, 0.15);
    let y = ScaleLinear::new(
        linear_domain(
            rows.iter().flat_map(|r| [r.min, r.max, r.low, r.high]),
            &ScaleOptions::default().with_nice(TICKS),
        ),
        (0.0, 1.0),
    );
    let x_axis = canvas.fit_x_axis(Axis::bottom(AxisScale::Band(x.clone())).with_title(&spec.category));
    let y_axis = Axis::left(AxisScale::Linear(y))
        .with_grid(true)
        .with_tick_count(TICKS);
    let plot = canvas.frame(Some(&y_axis), Some(&x_axis), None);
    let x = x.with_range((plot.x0, plot.x1));
    let y = y.with_range((plot.y1, plot.y0));

    let colors = canvas.style.categorical_colors.resolve(x.domain());
    let line_color = canvas.style.axis_color;
    for r in &rows {
        let Some(i) = x.index_of(&r.category) else {
            continue;
        };
        let color = colors[i];
        let x0 = x.x_at(i);
        let bw = x.band_width();
        let cx = x0 + bw * 0.5;
        let cap = bw * 0.25;
        let lines = [
            ((cx, y.map(r.low)), (cx, y.map(r.q1))),
            ((cx, y.map(r.q3)), (cx, y.map(r.high))),
            ((cx - cap, y.map(r.low)), (cx + cap, y.map(r.low))),
            ((cx - cap, y.map(r.high)), (cx + cap, y.map(r.high))),
        ];
        for (a, b) in lines {
            canvas.push(
                Primitive::line(a, b)
                    .with_stroke(line_color, 1.0)
                    .with_z_index(z_order::MARK_LINES),
            );
        }
        canvas.push(
            Primitive::rect(Rect::new(x0, y.map(r.q1), x0 + bw, y.map(r.q3)).abs())
                .with_fill(color)
                .with_stroke(line_color, 1.0)
                .with_z_index(z_order::MARKS)
                .with_tooltip(format!(
                    "{}: min {}, q1 {}, median {}, q3 {}, max {}",
                    r.category,
                    format_value(r.min),
                    format_value(r.q1),
                    format_value(r.median),
                    format_value(r.q3),
                    format_value(r.max)
                )),
        );
        canvas.push(
            Primitive::line((x0, y.map(r.median)), (x0 + bw, y.map(r.median)))
                .with_stroke(line_color, 2.0)
                .with_z_index(z_order::MARK_LINES),
        );
        // Extremes beyond separate whiskers are outliers.
        for v in [r.min, r.max] {
            if v < r.low || v > r.high {
                canvas.push(
                    Primitive::circle((cx, y.map(v)), 2.5)
                        .with_stroke(line_color, 1.0)
                        .with_z_index(z_order::MARK_POINTS)
                        .with_tooltip(format!("{}: {}", r.category, format_value(v))),
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn ridgeline(
    canvas: &mut Canvas<'_>,
    spec: &RidgelineSpec,
    table: &Table,
) -> Result<(), Error> {
    if !spec.overlap.is_finite() || spec.overlap <= 0.0 {
        return Err(DataShapeError::InvalidParameter {
            name: "overlap",
            reason: "must be finite and positive",
        }
        .into());
    }
    let values = numbers_or_nan(table, &spec.value)?;
    let keys = table.keys(&spec.entity)?;
    let bins = bin_column(&values, &spec.thresholds, Some(&keys))?;
    let entities = discrete_domain(keys, &ScaleOptions::default());
    let max_count = bins
        .iter()
        .flat_map(|b| b.groups.iter().map(|g| g.count()))
        .max()
        .unwrap_or(0);

    let x = ScaleLinear::new(
        linear_domain(
            bin_span(&bins).into_iter().flat_map(|(a, b)| [a, b]),
            &ScaleOptions::default(),
        ),
        (0.0, 1.0),
    );
    let y = ScaleBand::new(entities, (0.0, 1.0)).with_padding(0.0, 0.0);
    let x_axis = Axis::bottom(AxisScale::Linear(x)).with_title(&spec.value);
    let y_axis = Axis::left(AxisScale::Band(y.clone()));
    let plot = canvas.frame(Some(&y_axis), Some(&x_axis), None);
    let x = x.with_range((plot.x0, plot.x1));
    let y = y.with_range((plot.y0, plot.y1));
    let height = ScaleLinear::new((0.0, max_count as f64), (0.0, y.band_width() * spec.overlap));

    let colors = canvas.style.categorical_colors.resolve(y.domain());
    for (i, (entity, color)) in y.domain().iter().zip(&colors).enumerate() {
        let total: usize = bins.iter().map(|b| b.count_for(entity)).sum();
        let Some((start, end)) = bin_span(&bins).filter(|_| total > 0) else {
            continue;
        };
        let base = y.x_at(i) + y.band_width();
        let mut path = BezPath::new();
        path.move_to(Point::new(x.map(start), base));
        for b in &bins {
            path.line_to((x.map(b.midpoint()), base - height.map(b.count_for(entity) as f64)));
        }
        path.line_to((x.map(end), base));
        path.close_path();
        canvas.push(
            Primitive::path(path)
                .with_fill(*color)
                .with_opacity(RIDGE_OPACITY)
                .with_stroke(canvas.style.axis_color, 0.5)
                .with_z_index(z_order::MARKS)
                .with_tooltip(format!("{entity}: {total} values")),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use strata_core::{Shape, Value};

    use super::*;
    use crate::measure::HeuristicTextMeasurer;
    use crate::style::{ChartSize, ChartStyle};

    fn render(
        f: impl FnOnce(&mut Canvas<'_>) -> Result<(), Error>,
    ) -> Result<Vec<Primitive>, Error> {
        let style = ChartStyle::default();
        let mut canvas = Canvas::new(&style, &HeuristicTextMeasurer, ChartSize::default(), None);
        f(&mut canvas)?;
        Ok(canvas.finish().into_primitives())
    }

    fn marks(prims: &[Primitive]) -> Vec<&Primitive> {
        prims.iter().filter(|p| p.z_index == z_order::MARKS).collect()
    }

    fn samples() -> Table {
        Table::from_rows(
            ["region", "age"],
            [
                vec!["North".into(), 1.0.into()],
                vec!["North".into(), 2.0.into()],
                vec!["South".into(), 2.0.into()],
                vec!["South".into(), 3.0.into()],
                vec!["North".into(), Value::Null],
                vec!["South".into(), 9.0.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn histogram_bins_with_explicit_edges() {
        let spec =
            HistogramSpec::new("age").with_thresholds(Thresholds::Edges(vec![0.0, 5.0, 10.0]));
        let prims = render(|c| histogram(c, &spec, &samples())).unwrap();
        let tips: Vec<&str> = marks(&prims)
            .iter()
            .filter_map(|p| p.tooltip.as_deref())
            .collect();
        assert_eq!(tips, ["[0, 5): 4", "[5, 10]: 1"]);
    }

    #[test]
    fn grouped_histogram_puts_groups_side_by_side() {
        let spec = HistogramSpec::new("age")
            .with_group("region")
            .with_thresholds(Thresholds::Edges(vec![0.0, 5.0, 10.0]));
        let prims = render(|c| histogram(c, &spec, &samples())).unwrap();
        let bars = marks(&prims);
        let tips: Vec<&str> = bars.iter().filter_map(|p| p.tooltip.as_deref()).collect();
        assert_eq!(tips, ["North [0, 5): 2", "South [0, 5): 2", "South [5, 10]: 1"]);
        let north = bars[0].shape.bounds().unwrap();
        let south = bars[1].shape.bounds().unwrap();
        assert!(north.x1 <= south.x0);
        assert_eq!(north.height(), south.height());
        assert!(
            prims
                .iter()
                .any(|p| p.z_index == z_order::LEGEND_SWATCHES)
        );
    }

    #[test]
    fn descending_edges_are_rejected() {
        let spec = HistogramSpec::new("age").with_thresholds(Thresholds::Edges(vec![5.0, 1.0]));
        assert_eq!(
            render(|c| histogram(c, &spec, &samples())).unwrap_err(),
            Error::DataShape(DataShapeError::InvalidThresholds)
        );
    }

    #[test]
    fn empty_histogram_has_no_bars() {
        let empty = Table::new(["age"]).unwrap();
        let prims = render(|c| histogram(c, &HistogramSpec::new("age"), &empty)).unwrap();
        assert!(marks(&prims).is_empty());
    }

    #[test]
    fn violins_share_one_width_scale() {
        let spec = ViolinSpec {
            thresholds: Thresholds::Edges(vec![0.0, 5.0, 10.0]),
            ..ViolinSpec::new("region", "age")
        };
        let prims = render(|c| violin(c, &spec, &samples())).unwrap();
        let shapes = marks(&prims);
        assert_eq!(shapes.len(), 2);
        assert!(shapes.iter().all(|p| matches!(p.shape, Shape::Path(_))));
        // Both peak at 2 values in the first bin, so both are equally wide.
        let a = shapes[0].shape.bounds().unwrap();
        let b = shapes[1].shape.bounds().unwrap();
        assert!((a.width() - b.width()).abs() < 1e-9);
        assert!(a.x1 <= b.x0);
    }

    fn summaries() -> Table {
        Table::from_rows(
            ["region", "min", "lo", "q1", "med", "q3", "hi", "max"],
            [
                vec![
                    "North".into(),
                    0.0.into(),
                    1.0.into(),
                    2.0.into(),
                    3.0.into(),
                    4.0.into(),
                    5.0.into(),
                    9.0.into(),
                ],
                vec![
                    "South".into(),
                    1.0.into(),
                    1.0.into(),
                    Value::Null,
                    3.0.into(),
                    4.0.into(),
                    5.0.into(),
                    5.0.into(),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn boxplot_passes_summaries_through() {
        let spec = BoxplotSpec::new("region", ["min", "q1", "med", "q3", "max"]);
        let prims = render(|c| boxplot(c, &spec, &summaries())).unwrap();
        let boxes = marks(&prims);
        assert_eq!(boxes.len(), 1);
        assert_eq!(
            boxes[0].tooltip.as_deref(),
            Some("North: min 0, q1 2, median 3, q3 4, max 9")
        );
        assert!(
            prims
                .iter()
                .all(|p| p.z_index != z_order::MARK_POINTS)
        );
    }

    #[test]
    fn separate_whiskers_turn_extremes_into_outliers() {
        let spec = BoxplotSpec::new("region", ["min", "q1", "med", "q3", "max"])
            .with_whiskers("lo", "hi");
        let prims = render(|c| boxplot(c, &spec, &summaries())).unwrap();
        let outliers: Vec<&str> = prims
            .iter()
            .filter(|p| p.z_index == z_order::MARK_POINTS)
            .filter_map(|p| p.tooltip.as_deref())
            .collect();
        assert_eq!(outliers, ["North: 0", "North: 9"]);
    }

    #[test]
    fn ridges_sit_on_their_rows() {
        let spec = RidgelineSpec::new("region", "age");
        let prims = render(|c| ridgeline(c, &spec, &samples())).unwrap();
        let ridges = marks(&prims);
        assert_eq!(ridges.len(), 2);
        let north = ridges[0].shape.bounds().unwrap();
        let south = ridges[1].shape.bounds().unwrap();
        assert!(north.y1 < south.y1);

        let flat = RidgelineSpec {
            overlap: 0.0,
            ..RidgelineSpec::new("region", "age")
        };
        assert!(matches!(
            render(|c| ridgeline(c, &flat, &samples())),
            Err(Error::DataShape(DataShapeError::InvalidParameter { name: "overlap", .. }))
        ));
    }
}

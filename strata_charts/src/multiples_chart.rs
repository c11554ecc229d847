// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Charts over a time axis: streamgraph, horizon rows and bump chart.
//!
//! Domains are computed over every series or row before anything is drawn.

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

use kurbo::{BezPath, Rect};
use strata_core::{DataShapeError, Error, Key, Primitive, Table};
use strata_transforms::{Baseline, long_to_wide, max_rank, rank, stack_extent, stack_wide};

use crate::axis::{Axis, AxisScale};
use crate::builder::Canvas;
use crate::chart::{BumpSpec, HorizonSpec, StreamgraphSpec};
use crate::format::format_value;
use crate::legend::Legend;
use crate::scale::{ScaleBand, ScaleLinear, ScaleOptions, ScalePoint, discrete_domain, linear_domain};
use crate::z_order;

const HORIZON_ROW_PADDING: f64 = 0.15;
const BUMP_RADIUS: f64 = 4.0;
const BUMP_LINE_WIDTH: f64 = 2.0;

pub(crate) fn streamgraph(
    canvas: &mut Canvas<'_>,
    spec: &StreamgraphSpec,
    table: &Table,
) -> Result<(), Error> {
    if !matches!(spec.baseline, Baseline::Silhouette | Baseline::Wiggle) {
        return Err(DataShapeError::InvalidParameter {
            name: "baseline",
            reason: "streamgraphs support the silhouette and wiggle baselines",
        }
        .into());
    }
    let wide = long_to_wide(table, &spec.time, &spec.series, &spec.value)?.fill_missing(0.0);
    let stacks = stack_wide(&wide, spec.baseline);
    let series = wide.categories();
    let colors = canvas.style.categorical_colors.resolve(series);
    let legend = Legend::swatches(Some(&spec.series), series, &colors);

    let x = ScalePoint::new(wide.entities().to_vec(), (0.0, 1.0)).with_padding(0.0);
    let y = ScaleLinear::new(
        linear_domain(
            stack_extent(&stacks).into_iter().flat_map(|(lo, hi)| [lo, hi]),
            &ScaleOptions::default(),
        ),
        (0.0, 1.0),
    );
    let x_axis = canvas.fit_x_axis(Axis::bottom(AxisScale::Point(x.clone())).with_title(&spec.time));
    let plot = canvas.frame(None, Some(&x_axis), Some(&legend));
    let x = x.with_range((plot.x0, plot.x1));
    let y = y.with_range((plot.y1, plot.y0));

    if stacks.is_empty() {
        return Ok(());
    }
    for (s, (key, color)) in series.iter().zip(&colors).enumerate() {
        let mut path = BezPath::new();
        let mut total = 0.0;
        for (t, stack) in stacks.iter().enumerate() {
            let seg = &stack.segments[s];
            total += seg.value;
            let p = (x.x_at(t), y.map(seg.upper));
            if t == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        for (t, stack) in stacks.iter().enumerate().rev() {
            path.line_to((x.x_at(t), y.map(stack.segments[s].lower)));
        }
        path.close_path();
        canvas.push(
            Primitive::path(path)
                .with_fill(*color)
                .with_z_index(z_order::MARKS)
                .with_tooltip(format!("{key}: {}", format_value(total))),
        );
    }
    Ok(())
}

/// Height of band `band` (0-based) for magnitude `v`, as a fraction of the row.
fn band_fraction(v: f64, band: usize, band_size: f64) -> f64 {
    ((v - band as f64 * band_size) / band_size).clamp(0.0, 1.0)
}

pub(crate) fn horizon(
    canvas: &mut Canvas<'_>,
    spec: &HorizonSpec,
    table: &Table,
) -> Result<(), Error> {
    if spec.bands == 0 {
        return Err(DataShapeError::InvalidParameter {
            name: "bands",
            reason: "must be at least 1",
        }
        .into());
    }
    let wide = long_to_wide(table, &spec.entity, &spec.time, &spec.value)?;
    let max_abs = (0..wide.entities().len())
        .flat_map(|e| wide.row(e).iter().flatten())
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    let band_size = max_abs / spec.bands as f64;
    let sign_colors = canvas
        .style
        .categorical_colors
        .resolve(&[Key::text("positive"), Key::text("negative")]);

    let x = ScalePoint::new(wide.categories().to_vec(), (0.0, 1.0)).with_padding(0.0);
    let rows = ScaleBand::new(wide.entities().to_vec(), (0.0, 1.0))
        .with_padding(HORIZON_ROW_PADDING, HORIZON_ROW_PADDING * 0.5);
    let x_axis = canvas.fit_x_axis(Axis::bottom(AxisScale::Point(x.clone())).with_title(&spec.time));
    let y_axis = Axis::left(AxisScale::Band(rows.clone()));
    let plot = canvas.frame(Some(&y_axis), Some(&x_axis), None);
    let x = x.with_range((plot.x0, plot.x1));
    let rows = rows.with_range((plot.y0, plot.y1));

    if band_size <= 0.0 || wide.categories().is_empty() {
        return Ok(());
    }
    let times = wide.categories().len();
    for (e, entity) in wide.entities().iter().enumerate() {
        let top = rows.x_at(e);
        let row = Rect::new(plot.x0, top, plot.x1, top + rows.band_width());
        let values = wide.row(e);
        for (negative, color) in [false, true].into_iter().zip(&sign_colors) {
            let magnitude = |v: &Option<f64>| match *v {
                Some(v) if (v < 0.0) == negative => v.abs(),
                _ => 0.0,
            };
            for band in 0..spec.bands {
                let heights: Vec<f64> = values
                    .iter()
                    .map(|v| band_fraction(magnitude(v), band, band_size) * row.height())
                    .collect();
                if heights.iter().all(|&h| h == 0.0) {
                    continue;
                }
                // Positive bands grow up from the row bottom; negative bands hang from the top.
                let (base, dir) = if negative {
                    (row.y0, 1.0)
                } else {
                    (row.y1, -1.0)
                };
                let mut path = BezPath::new();
                path.move_to((x.x_at(0), base));
                for (t, h) in heights.iter().enumerate() {
                    path.line_to((x.x_at(t), base + dir * h));
                }
                path.line_to((x.x_at(times - 1), base));
                path.close_path();
                let mut p = Primitive::path(path)
                    .with_fill(*color)
                    .with_opacity((band + 1) as f64 / spec.bands as f64)
                    .with_z_index(z_order::MARKS);
                if band == 0 {
                    let sign = if negative { "below 0" } else { "above 0" };
                    p = p.with_tooltip(format!("{entity} {sign}"));
                }
                canvas.push(p);
            }
        }
    }
    Ok(())
}

pub(crate) fn bump(canvas: &mut Canvas<'_>, spec: &BumpSpec, table: &Table) -> Result<(), Error> {
    let ranked = rank(table, &spec.time, &spec.entity, &spec.value)?;
    let times = discrete_domain(table.keys(&spec.time)?, &ScaleOptions::default());
    let entities = discrete_domain(
        ranked.iter().map(|r| r.entity.clone()),
        &ScaleOptions::default(),
    );
    let ranks: Vec<Key> = (1..=max_rank(&ranked))
        .map(|r| Key::number(r as f64))
        .collect();
    let colors = canvas.style.categorical_colors.resolve(&entities);
    let legend = Legend::swatches(Some(&spec.entity), &entities, &colors);

    let x = ScalePoint::new(times, (0.0, 1.0));
    let y = ScalePoint::new(ranks, (0.0, 1.0));
    let x_axis = canvas.fit_x_axis(Axis::bottom(AxisScale::Point(x.clone())).with_title(&spec.time));
    let y_axis = Axis::left(AxisScale::Point(y.clone())).with_title("rank");
    let plot = canvas.frame(Some(&y_axis), Some(&x_axis), Some(&legend));
    let x = x.with_range((plot.x0, plot.x1));
    let y = y.with_range((plot.y0, plot.y1));

    for (entity, color) in entities.iter().zip(&colors) {
        // (time index, point) in time order.
        let mut points: Vec<(usize, (f64, f64))> = ranked
            .iter()
            .filter(|r| &r.entity == entity)
            .filter_map(|r| {
                let t = x.index_of(&r.slice)?;
                let py = y.x(&Key::number(r.rank as f64))?;
                Some((t, (x.x_at(t), py)))
            })
            .collect();
        points.sort_by_key(|(t, _)| *t);

        // Lines connect adjacent time slices only; a missing slice breaks the line.
        for run in points.chunk_by(|a, b| b.0 == a.0 + 1) {
            let [first, rest @ ..] = run else { continue };
            if rest.is_empty() {
                continue;
            }
            let mut path = BezPath::new();
            path.move_to(first.1);
            for (_, p) in rest {
                path.line_to(*p);
            }
            canvas.push(
                Primitive::path(path)
                    .with_stroke(*color, BUMP_LINE_WIDTH)
                    .with_z_index(z_order::MARK_LINES),
            );
        }
    }
    for r in &ranked {
        let Some(e) = entities.iter().position(|k| k == &r.entity) else {
            continue;
        };
        let (Some(px), Some(py)) = (x.x(&r.slice), y.x(&Key::number(r.rank as f64))) else {
            continue;
        };
        canvas.push(
            Primitive::circle((px, py), BUMP_RADIUS)
                .with_fill(colors[e])
                .with_z_index(z_order::MARK_POINTS)
                .with_tooltip(format!(
                    "{} {}: rank {} ({})",
                    r.entity,
                    r.slice,
                    r.rank,
                    format_value(r.value)
                )),
        );
    }
    Ok(())
}

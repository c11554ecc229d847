// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar, grouped bar, stacked bar and waffle charts.

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;
use core::cmp::Ordering;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::Rect;
use strata_core::{DataShapeError, Error, Fill, Key, Primitive, Table};
use strata_transforms::{Baseline, aggregate, long_to_wide, stack_extent, stack_wide};

use crate::axis::{Axis, AxisScale};
use crate::builder::Canvas;
use crate::chart::{BarSpec, GroupedBarSpec, StackedBarSpec, WaffleSpec};
use crate::format::format_value;
use crate::legend::{Legend, LegendItem};
use crate::scale::{ScaleBand, ScaleLinear, ScaleOptions, linear_domain};
use crate::z_order;

const TICKS: usize = 5;

fn value_options() -> ScaleOptions {
    ScaleOptions::default().with_zero(true).with_nice(TICKS)
}

// Larger values first; missing values last; ties keep input order.
fn descending(a: &Option<f64>, b: &Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub(crate) fn bar(canvas: &mut Canvas<'_>, spec: &BarSpec, table: &Table) -> Result<(), Error> {
    let category_idx = table.column_index(&spec.category)?;
    let value_idx = table.column_index(&spec.value)?;

    let mut bars: Vec<(Key, Option<f64>)> = match spec.reducer {
        Some(reducer) => aggregate(table, &[spec.category.as_str()], &spec.value, reducer)?
            .into_values()
            .into_iter()
            .map(|v| (v.key.get(0).cloned().unwrap_or(Key::Null), v.value))
            .collect(),
        None => table
            .rows()
            .iter()
            .map(|r| (r.get(category_idx).key(), r.get(value_idx).as_f64()))
            .collect(),
    };
    if spec.sort_descending {
        bars.sort_by(|a, b| descending(&a.1, &b.1));
    }

    let domain: Vec<Key> = bars.iter().map(|(k, _)| k.clone()).collect();
    let x = ScaleBand::new(domain, (0.0, 1.0));
    let y = ScaleLinear::new(
        linear_domain(bars.iter().filter_map(|b| b.1), &value_options()),
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

    let color = canvas.style.categorical_colors.resolve(&[Key::text(&*spec.value)])[0];
    let zero = y.map(0.0);
    for (i, (key, value)) in bars.iter().enumerate() {
        let Some(v) = value else { continue };
        let x0 = x.x_at(i);
        canvas.push(
            Primitive::rect(Rect::new(x0, zero, x0 + x.band_width(), y.map(*v)).abs())
                .with_fill(color)
                .with_z_index(z_order::MARKS)
                .with_tooltip(format!("{key}: {}", format_value(*v))),
        );
    }
    Ok(())
}

pub(crate) fn grouped_bar(
    canvas: &mut Canvas<'_>,
    spec: &GroupedBarSpec,
    table: &Table,
) -> Result<(), Error> {
    let grouped = aggregate(
        table,
        &[spec.category.as_str(), spec.series.as_str()],
        &spec.value,
        spec.reducer,
    )?
    .to_table()?;
    let wide = long_to_wide(&grouped, &spec.category, &spec.series, &spec.value)?;
    let series = wide.categories();
    if series.len() < 2 {
        return Err(DataShapeError::TooFewCategories {
            chart: "grouped_bar",
            needed: 2,
            found: series.len(),
        }
        .into());
    }

    let colors = canvas.style.categorical_colors.resolve(series);
    let legend = Legend::swatches(Some(&spec.series), series, &colors);
    let x = ScaleBand::new(wide.entities().to_vec(), (0.0, 1.0));
    let extent = wide.extent().into_iter().flat_map(|(lo, hi)| [lo, hi]);
    let y = ScaleLinear::new(linear_domain(extent, &value_options()), (0.0, 1.0));
    let x_axis = canvas.fit_x_axis(Axis::bottom(AxisScale::Band(x.clone())).with_title(&spec.category));
    let y_axis = Axis::left(AxisScale::Linear(y))
        .with_grid(true)
        .with_tick_count(TICKS)
        .with_title(&spec.value);
    let plot = canvas.frame(Some(&y_axis), Some(&x_axis), Some(&legend));
    let x = x.with_range((plot.x0, plot.x1));
    let y = y.with_range((plot.y1, plot.y0));
    let inner = ScaleBand::new(series.to_vec(), (0.0, x.band_width())).with_padding(0.05, 0.0);

    let zero = y.map(0.0);
    for (e, entity) in wide.entities().iter().enumerate() {
        let x0 = x.x_at(e);
        for (s, (key, color)) in series.iter().zip(&colors).enumerate() {
            let Some(v) = wide.get(e, s) else { continue };
            let bx = x0 + inner.x_at(s);
            canvas.push(
                Primitive::rect(Rect::new(bx, zero, bx + inner.band_width(), y.map(v)).abs())
                    .with_fill(*color)
                    .with_z_index(z_order::MARKS)
                    .with_tooltip(format!("{entity} / {key}: {}", format_value(v))),
            );
        }
    }
    Ok(())
}

pub(crate) fn stacked_bar(
    canvas: &mut Canvas<'_>,
    spec: &StackedBarSpec,
    table: &Table,
) -> Result<(), Error> {
    if !matches!(spec.baseline, Baseline::Zero | Baseline::Percent) {
        return Err(DataShapeError::InvalidParameter {
            name: "baseline",
            reason: "stacked bars support the zero and percent baselines",
        }
        .into());
    }
    let grouped = aggregate(
        table,
        &[spec.category.as_str(), spec.series.as_str()],
        &spec.value,
        spec.reducer,
    )?
    .to_table()?;
    // Absent (category, series) pairs stack as empty segments.
    let wide = long_to_wide(&grouped, &spec.category, &spec.series, &spec.value)?.fill_missing(0.0);
    let stacks = stack_wide(&wide, spec.baseline);

    let series = wide.categories();
    let colors = canvas.style.categorical_colors.resolve(series);
    let legend = Legend::swatches(Some(&spec.series), series, &colors);
    let y_domain = match spec.baseline {
        Baseline::Percent => (0.0, 100.0),
        _ => linear_domain(
            stack_extent(&stacks).into_iter().flat_map(|(lo, hi)| [lo, hi]),
            &value_options(),
        ),
    };
    let x = ScaleBand::new(wide.entities().to_vec(), (0.0, 1.0));
    let y = ScaleLinear::new(y_domain, (0.0, 1.0));
    let y_title = if spec.baseline == Baseline::Percent {
        format!("{} (%)", spec.value)
    } else {
        spec.value.clone()
    };
    let x_axis = canvas.fit_x_axis(Axis::bottom(AxisScale::Band(x.clone())).with_title(&spec.category));
    let y_axis = Axis::left(AxisScale::Linear(y))
        .with_grid(true)
        .with_tick_count(TICKS)
        .with_title(y_title);
    let plot = canvas.frame(Some(&y_axis), Some(&x_axis), Some(&legend));
    let x = x.with_range((plot.x0, plot.x1));
    let y = y.with_range((plot.y1, plot.y0));

    for (e, stack) in stacks.iter().enumerate() {
        let x0 = x.x_at(e);
        for (segment, color) in stack.segments.iter().zip(&colors) {
            if segment.upper == segment.lower {
                continue;
            }
            let tooltip = if spec.baseline == Baseline::Percent {
                format!(
                    "{} / {}: {} ({}%)",
                    stack.category,
                    segment.key,
                    format_value(segment.value),
                    format_value(segment.upper - segment.lower)
                )
            } else {
                format!(
                    "{} / {}: {}",
                    stack.category,
                    segment.key,
                    format_value(segment.value)
                )
            };
            canvas.push(
                Primitive::rect(
                    Rect::new(x0, y.map(segment.lower), x0 + x.band_width(), y.map(segment.upper))
                        .abs(),
                )
                .with_fill(*color)
                .with_z_index(z_order::MARKS)
                .with_tooltip(tooltip),
            );
        }
    }
    Ok(())
}

/// Splits `cells` between `values` in proportion, rounding by largest remainder.
///
/// The result sums to `cells` whenever any value is positive; otherwise it is all zeros.
/// Non-positive and non-finite values get no cells. Equal remainders favor earlier entries.
pub(crate) fn largest_remainder(values: &[f64], cells: usize) -> Vec<usize> {
    let clean: Vec<f64> = values
        .iter()
        .map(|&v| if v.is_finite() && v > 0.0 { v } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().sum();
    if total <= 0.0 {
        return alloc::vec![0; values.len()];
    }
    let quotas: Vec<f64> = clean.iter().map(|v| v * cells as f64 / total).collect();
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "quotas are finite, non-negative and at most `cells`"
    )]
    let mut counts: Vec<usize> = quotas.iter().map(|q| q.floor() as usize).collect();
    let assigned: usize = counts.iter().sum();
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();
        rb.total_cmp(&ra)
    });
    for &i in order.iter().take(cells.saturating_sub(assigned)) {
        counts[i] += 1;
    }
    counts
}

pub(crate) fn waffle(
    canvas: &mut Canvas<'_>,
    spec: &WaffleSpec,
    table: &Table,
) -> Result<(), Error> {
    if spec.side == 0 {
        return Err(DataShapeError::InvalidParameter {
            name: "side",
            reason: "must be at least 1",
        }
        .into());
    }
    let totals = aggregate(table, &[spec.category.as_str()], &spec.value, spec.reducer)?;
    let keys: Vec<Key> = totals
        .values()
        .iter()
        .map(|v| v.key.get(0).cloned().unwrap_or(Key::Null))
        .collect();
    let values: Vec<f64> = totals
        .values()
        .iter()
        .map(|v| v.value.unwrap_or(0.0))
        .collect();
    let cells = spec.side * spec.side;
    let counts = largest_remainder(&values, cells);
    let colors = canvas.style.categorical_colors.resolve(&keys);

    let legend = Legend::Swatches {
        title: Some(spec.category.clone()),
        items: keys
            .iter()
            .zip(&colors)
            .zip(&counts)
            .map(|((k, &c), n)| LegendItem::new(format!("{k} ({}%)", n * 100 / cells), c))
            .collect(),
    };
    let plot = canvas.frame(None, None, Some(&legend));

    let side = spec.side as f64;
    let cell = plot.width().min(plot.height()) / side;
    let gap = (cell * 0.1).min(2.0);
    // Cells fill row-major from the top-left, one category after another.
    let mut fills = keys
        .iter()
        .zip(&colors)
        .zip(&counts)
        .flat_map(|((k, &c), &n)| core::iter::repeat_n((k, Fill::Color(c)), n));
    for i in 0..cells {
        let (row, col) = ((i / spec.side) as f64, (i % spec.side) as f64);
        let x0 = plot.x0 + col * cell;
        let y0 = plot.y0 + row * cell;
        let rect = Rect::new(x0, y0, x0 + cell - gap, y0 + cell - gap);
        let p = match fills.next() {
            Some((key, fill)) => Primitive::rect(rect)
                .with_fill(fill)
                .with_tooltip(format!("{key}")),
            None => Primitive::rect(rect).with_fill(Fill::NoData),
        };
        canvas.push(p.with_z_index(z_order::MARKS));
    }
    Ok(())
}

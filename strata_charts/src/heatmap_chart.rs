// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Heatmap: one colored cell per (entity, value column).

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use strata_core::{Error, Fill, Key, Primitive, Table};
use strata_transforms::wide_to_long;

use crate::axis::{Axis, AxisScale};
use crate::builder::Canvas;
use crate::chart::HeatmapSpec;
use crate::format::format_opt;
use crate::legend::Legend;
use crate::scale::{ScaleBand, ScaleOptions, ScaleSequential, discrete_domain, linear_domain};
use crate::z_order;

const CELL_PADDING: f64 = 0.04;

pub(crate) fn heatmap(
    canvas: &mut Canvas<'_>,
    spec: &HeatmapSpec,
    table: &Table,
) -> Result<(), Error> {
    let columns: Vec<&str> = spec.columns.iter().map(String::as_str).collect();
    let records = wide_to_long(table, &spec.entity, &columns)?;

    let entities = discrete_domain(
        records.iter().map(|r| r.entity.clone()),
        &ScaleOptions::default(),
    );
    let categories: Vec<Key> = columns.iter().map(|&c| Key::text(c)).collect();
    let color = ScaleSequential::new(
        linear_domain(
            records.iter().filter_map(|r| r.value),
            &ScaleOptions::default().with_domain(spec.domain_min, spec.domain_max),
        ),
        canvas.style.sequential_interpolator.clone(),
    );
    let has_missing = records.iter().any(|r| r.value.is_none());
    let legend = Legend::Ramp {
        title: None,
        domain: color.domain(),
        interpolator: color.interpolator().clone(),
        no_data: has_missing,
    };

    let x = ScaleBand::new(categories, (0.0, 1.0)).with_padding(CELL_PADDING, 0.0);
    let y = ScaleBand::new(entities, (0.0, 1.0)).with_padding(CELL_PADDING, 0.0);
    let x_axis = canvas.fit_x_axis(Axis::bottom(AxisScale::Band(x.clone())));
    let y_axis = Axis::left(AxisScale::Band(y.clone()));
    let plot = canvas.frame(Some(&y_axis), Some(&x_axis), Some(&legend));
    let x = x.with_range((plot.x0, plot.x1));
    let y = y.with_range((plot.y0, plot.y1));

    for record in &records {
        let category = Key::text(record.category.as_str());
        let (Some(cx), Some(cy)) = (x.x(&category), y.x(&record.entity)) else {
            continue;
        };
        let fill = match record.value {
            Some(v) => Fill::Color(color.map(v)),
            None => Fill::NoData,
        };
        canvas.push(
            Primitive::rect(Rect::new(cx, cy, cx + x.band_width(), cy + y.band_width()))
                .with_fill(fill)
                .with_z_index(z_order::MARKS)
                .with_tooltip(format!(
                    "{} / {}: {}",
                    record.entity,
                    record.category,
                    format_opt(record.value)
                )),
        );
    }
    tracing::trace!(cells = records.len(), "drew heatmap");
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use strata_core::Value;

    use super::*;
    use crate::measure::HeuristicTextMeasurer;
    use crate::style::{ChartSize, ChartStyle};

    fn table() -> Table {
        Table::from_rows(
            ["country", "2019", "2020"],
            [
                vec!["Chad".into(), 10.0.into(), 30.0.into()],
                vec!["Mali".into(), Value::Null, 20.0.into()],
            ],
        )
        .unwrap()
    }

    fn cells(spec: &HeatmapSpec) -> Vec<Primitive> {
        let style = ChartStyle::default();
        let mut canvas = Canvas::new(&style, &HeuristicTextMeasurer, ChartSize::default(), None);
        heatmap(&mut canvas, spec, &table()).unwrap();
        canvas
            .finish()
            .into_primitives()
            .into_iter()
            .filter(|p| p.z_index == z_order::MARKS)
            .collect()
    }

    #[test]
    fn null_cells_are_no_data_not_zero() {
        let spec = HeatmapSpec::new("country", ["2019".into(), "2020".into()]);
        let cells = cells(&spec);
        assert_eq!(cells.len(), 4);
        let missing: Vec<&str> = cells
            .iter()
            .filter(|p| p.style.fill == Fill::NoData)
            .filter_map(|p| p.tooltip.as_deref())
            .collect();
        assert_eq!(missing, ["Mali / 2019: no data"]);

        let ramp = ChartStyle::default().sequential_interpolator;
        assert_eq!(cells[0].style.fill, Fill::Color(ramp.eval(0.0)));
        assert_eq!(cells[1].style.fill, Fill::Color(ramp.eval(1.0)));
    }

    #[test]
    fn cells_line_up_on_both_bands() {
        let spec = HeatmapSpec::new("country", ["2019".into(), "2020".into()]);
        let rects: Vec<Rect> = cells(&spec)
            .iter()
            .filter_map(|p| p.shape.bounds())
            .collect();
        assert_eq!(rects[0].y0, rects[1].y0);
        assert_eq!(rects[0].x0, rects[2].x0);
        assert!(rects[2].y0 > rects[0].y0);
    }

    #[test]
    fn pinned_domain_saturates_out_of_range_values() {
        let mut spec = HeatmapSpec::new("country", ["2019".into(), "2020".into()]);
        spec.domain_max = Some(20.0);
        let cells = cells(&spec);
        let ramp = ChartStyle::default().sequential_interpolator;
        assert_eq!(cells[1].style.fill, Fill::Color(ramp.eval(1.0)));
        assert_eq!(cells[3].style.fill, Fill::Color(ramp.eval(1.0)));
    }

    #[test]
    fn unknown_value_column_is_a_schema_error() {
        let style = ChartStyle::default();
        let mut canvas = Canvas::new(&style, &HeuristicTextMeasurer, ChartSize::default(), None);
        let spec = HeatmapSpec::new("country", ["2021".into()]);
        assert!(matches!(
            heatmap(&mut canvas, &spec, &table()),
            Err(Error::Schema(_))
        ));
    }
}

// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map charts: sequential choropleth, categorical choropleth and proportional symbols.
//!
//! Table rows are joined onto features by exact name. A feature without a value is filled with
//! [`Fill::NoData`], never with the color of zero.

extern crate alloc;

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use strata_core::{DataShapeError, Error, Fill, Key, Primitive, Table};

use crate::builder::Canvas;
use crate::chart::{CategoryMapSpec, ChoroplethSpec, SymbolMapSpec};
use crate::format::{format_opt, format_value};
use crate::geo::{GeoCollection, Projection, join_keys, join_values};
use crate::legend::{Legend, LegendItem};
use crate::scale::{ScaleOptions, ScaleSequential, ScaleSqrt, discrete_domain, linear_domain};
use crate::z_order;

const OUTLINE_WIDTH: f64 = 0.5;
const SYMBOL_OPACITY: f64 = 0.7;

/// Fits the collection into `plot`; `None` when it has no finite coordinates.
fn projection(geometry: &GeoCollection, plot: kurbo::Rect) -> Option<Projection> {
    geometry.bounds().map(|b| Projection::fit(b, plot))
}

pub(crate) fn choropleth(
    canvas: &mut Canvas<'_>,
    spec: &ChoroplethSpec,
    table: &Table,
    geometry: &GeoCollection,
) -> Result<(), Error> {
    let features = geometry.features();
    let values = join_values(features, table, &spec.name, &spec.value)?;
    let color = ScaleSequential::new(
        linear_domain(
            values.iter().flatten().copied(),
            &ScaleOptions::default().with_domain(spec.domain_min, spec.domain_max),
        ),
        canvas.style.sequential_interpolator.clone(),
    );
    let legend = Legend::Ramp {
        title: Some(spec.value.clone()),
        domain: color.domain(),
        interpolator: color.interpolator().clone(),
        no_data: values.iter().any(Option::is_none),
    };
    let plot = canvas.frame(None, None, Some(&legend));
    let Some(proj) = projection(geometry, plot) else {
        return Ok(());
    };

    let outline = canvas.style.grid_color;
    for (feature, value) in features.iter().zip(&values) {
        let fill = value.map_or(Fill::NoData, |v| Fill::Color(color.map(v)));
        canvas.push(
            Primitive::path(feature.path(&proj))
                .with_fill(fill)
                .with_stroke(outline, OUTLINE_WIDTH)
                .with_z_index(z_order::MARKS)
                .with_tooltip(format!("{}: {}", feature.name, format_opt(*value))),
        );
    }
    Ok(())
}

pub(crate) fn category_map(
    canvas: &mut Canvas<'_>,
    spec: &CategoryMapSpec,
    table: &Table,
    geometry: &GeoCollection,
) -> Result<(), Error> {
    let features = geometry.features();
    let keys = join_keys(features, table, &spec.name, &spec.category)?;
    let domain = discrete_domain(keys.iter().flatten().cloned(), &ScaleOptions::default());
    let colors = canvas.style.categorical_colors.resolve(&domain);

    let mut items: Vec<LegendItem> = domain
        .iter()
        .zip(&colors)
        .map(|(k, &c)| LegendItem::new(k.to_string(), c))
        .collect();
    if keys.iter().any(Option::is_none) {
        items.push(LegendItem::new("no data", Fill::NoData));
    }
    let legend = Legend::Swatches {
        title: Some(spec.category.clone()),
        items,
    };
    let plot = canvas.frame(None, None, Some(&legend));
    let Some(proj) = projection(geometry, plot) else {
        return Ok(());
    };

    let outline = canvas.style.grid_color;
    for (feature, key) in features.iter().zip(&keys) {
        let slot = key.as_ref().and_then(|k| domain.iter().position(|d| d == k));
        let fill = slot.map_or(Fill::NoData, |i| Fill::Color(colors[i]));
        let label = key.as_ref().map_or_else(|| "no data".to_string(), Key::to_string);
        canvas.push(
            Primitive::path(feature.path(&proj))
                .with_fill(fill)
                .with_stroke(outline, OUTLINE_WIDTH)
                .with_z_index(z_order::MARKS)
                .with_tooltip(format!("{}: {label}", feature.name)),
        );
    }
    Ok(())
}

pub(crate) fn symbol_map(
    canvas: &mut Canvas<'_>,
    spec: &SymbolMapSpec,
    table: &Table,
    geometry: &GeoCollection,
) -> Result<(), Error> {
    if !spec.max_radius.is_finite() || spec.max_radius <= 0.0 {
        return Err(DataShapeError::InvalidParameter {
            name: "max_radius",
            reason: "must be finite and positive",
        }
        .into());
    }
    let features = geometry.features();
    let values = join_values(features, table, &spec.name, &spec.value)?;
    let max = values.iter().flatten().fold(0.0_f64, |m, &v| m.max(v));
    let radius = ScaleSqrt::new((0.0, max), (0.0, spec.max_radius));
    let color = canvas
        .style
        .categorical_colors
        .resolve(&[Key::text(spec.value.as_str())])[0];

    let mut items = Vec::from([LegendItem::new(spec.value.clone(), color)]);
    if values.iter().any(Option::is_none) {
        items.push(LegendItem::new("no data", Fill::NoData));
    }
    let legend = Legend::Swatches { title: None, items };
    let plot = canvas.frame(None, None, Some(&legend));
    let Some(proj) = projection(geometry, plot) else {
        return Ok(());
    };

    let base = canvas.style.grid_color;
    let outline = canvas.style.axis_color;
    for (feature, value) in features.iter().zip(&values) {
        let fill = if value.is_some() {
            Fill::Color(base)
        } else {
            Fill::NoData
        };
        canvas.push(
            Primitive::path(feature.path(&proj))
                .with_fill(fill)
                .with_stroke(outline.with_alpha(0.3), OUTLINE_WIDTH)
                .with_z_index(z_order::MARKS),
        );
    }

    // Largest first so small circles stay on top.
    let mut symbols: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|v| *v > 0.0).map(|v| (i, v)))
        .collect();
    symbols.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (i, v) in symbols {
        let feature = &features[i];
        let Some(center) = feature.centroid() else {
            continue;
        };
        canvas.push(
            Primitive::circle(proj.project(center), radius.map(v))
                .with_fill(color)
                .with_opacity(SYMBOL_OPACITY)
                .with_stroke(outline, OUTLINE_WIDTH)
                .with_z_index(z_order::MARK_POINTS)
                .with_tooltip(format!("{}: {}", feature.name, format_value(v))),
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
    use crate::geo::GeoFeature;
    use crate::measure::HeuristicTextMeasurer;
    use crate::style::{ChartSize, ChartStyle};

    fn square(name: &str, x: f64) -> GeoFeature {
        GeoFeature::new(
            name,
            vec![vec![vec![(x, 0.0), (x + 1.0, 0.0), (x + 1.0, 1.0), (x, 1.0)]]],
        )
    }

    fn geometry() -> GeoCollection {
        GeoCollection::new(vec![square("Chad", 0.0), square("Niger", 1.0), square("Mali", 2.0)])
    }

    fn table() -> Table {
        Table::from_rows(
            ["country", "pct", "status"],
            [
                vec!["Chad".into(), 40.0.into(), "Conflict".into()],
                vec!["Niger".into(), 10.0.into(), "Stable".into()],
                vec!["Sudan".into(), 50.0.into(), "Conflict".into()],
            ],
        )
        .unwrap()
    }

    fn render(
        f: impl FnOnce(&mut Canvas<'_>) -> Result<(), Error>,
    ) -> Result<Vec<Primitive>, Error> {
        let style = ChartStyle::default();
        let mut canvas = Canvas::new(&style, &HeuristicTextMeasurer, ChartSize::default(), None);
        f(&mut canvas)?;
        Ok(canvas.finish().into_primitives())
    }

    fn regions(prims: &[Primitive]) -> Vec<&Primitive> {
        prims
            .iter()
            .filter(|p| p.z_index == z_order::MARKS)
            .collect()
    }

    #[test]
    fn unmatched_regions_are_no_data() {
        let geo = geometry();
        let prims =
            render(|c| choropleth(c, &ChoroplethSpec::new("country", "pct"), &table(), &geo))
                .unwrap();
        let regions = regions(&prims);
        assert_eq!(regions.len(), 3);
        let ramp = ChartStyle::default().sequential_interpolator;
        assert_eq!(regions[0].style.fill, Fill::Color(ramp.eval(1.0)));
        assert_eq!(regions[1].style.fill, Fill::Color(ramp.eval(0.0)));
        assert_eq!(regions[2].style.fill, Fill::NoData);
        assert_eq!(regions[2].tooltip.as_deref(), Some("Mali: no data"));
    }

    #[test]
    fn regions_keep_their_relative_positions() {
        let geo = geometry();
        let prims =
            render(|c| choropleth(c, &ChoroplethSpec::new("country", "pct"), &table(), &geo))
                .unwrap();
        let b: Vec<kurbo::Rect> = regions(&prims)
            .iter()
            .filter_map(|p| p.shape.bounds())
            .collect();
        assert!((b[0].x1 - b[1].x0).abs() < 1e-9);
        assert!((b[0].width() - b[0].height()).abs() < 1e-9);
    }

    #[test]
    fn category_map_adds_a_no_data_swatch() {
        let geo = geometry();
        let prims = render(|c| {
            category_map(c, &CategoryMapSpec::new("country", "status"), &table(), &geo)
        })
        .unwrap();
        let fills: Vec<Fill> = regions(&prims).iter().map(|p| p.style.fill).collect();
        let palette = ChartStyle::default().categorical_colors.resolve(&[
            Key::text("Conflict"),
            Key::text("Stable"),
        ]);
        assert_eq!(
            fills,
            [Fill::Color(palette[0]), Fill::Color(palette[1]), Fill::NoData]
        );
        let swatches: Vec<Fill> = prims
            .iter()
            .filter(|p| p.z_index == z_order::LEGEND_SWATCHES)
            .map(|p| p.style.fill)
            .collect();
        assert_eq!(swatches.last(), Some(&Fill::NoData));
    }

    #[test]
    fn symbols_scale_by_area_and_draw_largest_first() {
        let geo = geometry();
        let prims =
            render(|c| symbol_map(c, &SymbolMapSpec::new("country", "pct"), &table(), &geo))
                .unwrap();
        let circles: Vec<(f64, &str)> = prims
            .iter()
            .filter_map(|p| match (&p.shape, p.tooltip.as_deref()) {
                (Shape::Circle(c), Some(t)) => Some((c.radius, t)),
                _ => None,
            })
            .collect();
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0], (20.0, "Chad: 40"));
        assert_eq!(circles[1].1, "Niger: 10");
        assert!((circles[1].0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn missing_join_column_is_a_schema_error() {
        let geo = geometry();
        let with_null = Table::from_rows(["country"], [vec![Value::Null]]).unwrap();
        assert!(matches!(
            render(|c| choropleth(c, &ChoroplethSpec::new("country", "pct"), &with_null, &geo)),
            Err(Error::Schema(_))
        ));
    }
}

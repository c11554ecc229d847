// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart builder: dispatches a [`ChartKind`] to its family module and assembles the scene.

extern crate alloc;

use alloc::string::String;

use kurbo::{Point, Rect};
use strata_core::{DataShapeError, Error, Primitive, Scene, Table, TextAnchor};

use crate::axis::Axis;
use crate::chart::ChartKind;
use crate::geo::GeoCollection;
use crate::layout::{ChartLayout, LayoutSpec};
use crate::legend::Legend;
use crate::measure::{HeuristicTextMeasurer, TextMeasurer};
use crate::style::{ChartSize, ChartStyle};
use crate::{bar_chart, distribution_chart, heatmap_chart, map_chart, multiples_chart, z_order};

/// Text of the placeholder scene produced by [`ChartBuilder::build_or_placeholder`].
pub const PLACEHOLDER_MESSAGE: &str = "Error loading chart";

/// Inputs to one chart build.
#[derive(Clone, Copy, Debug)]
pub struct ChartData<'a> {
    table: &'a Table,
    geometry: Option<&'a GeoCollection>,
}

impl<'a> ChartData<'a> {
    /// Wraps a table.
    pub fn new(table: &'a Table) -> Self {
        Self {
            table,
            geometry: None,
        }
    }

    /// Attaches geometry for map charts.
    pub fn with_geometry(mut self, geometry: &'a GeoCollection) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Returns the table.
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// Returns the geometry, if any.
    pub fn geometry(&self) -> Option<&'a GeoCollection> {
        self.geometry
    }
}

/// Builds [`Scene`]s from tables.
///
/// A builder holds no state between calls; the same builder can produce any number of charts.
#[derive(Clone, Debug)]
pub struct ChartBuilder<M = HeuristicTextMeasurer> {
    style: ChartStyle,
    size: ChartSize,
    title: Option<String>,
    measurer: M,
}

impl ChartBuilder {
    /// Creates a builder with the heuristic text measurer.
    pub fn new(style: ChartStyle, size: ChartSize) -> Self {
        Self {
            style,
            size,
            title: None,
            measurer: HeuristicTextMeasurer,
        }
    }
}

impl<M: TextMeasurer> ChartBuilder<M> {
    /// Sets a chart title drawn above the plot.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the text measurer used to reserve guide space.
    pub fn with_measurer<N: TextMeasurer>(self, measurer: N) -> ChartBuilder<N> {
        ChartBuilder {
            style: self.style,
            size: self.size,
            title: self.title,
            measurer,
        }
    }

    /// Returns the style.
    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Returns the size.
    pub fn size(&self) -> ChartSize {
        self.size
    }

    /// Builds a chart.
    ///
    /// Missing columns are a [`SchemaError`](strata_core::SchemaError); data the chart can't be
    /// drawn from (too few series, bad thresholds, missing geometry) is a [`DataShapeError`].
    /// Empty tables build a valid scene with guides and no marks.
    pub fn build(&self, kind: &ChartKind, data: ChartData<'_>) -> Result<Scene, Error> {
        let table = data.table;
        tracing::debug!(chart = kind.name(), rows = table.len(), "building chart");

        let mut canvas = Canvas::new(
            &self.style,
            &self.measurer,
            self.size,
            self.title.as_deref(),
        );
        let geometry = || {
            data.geometry
                .ok_or(DataShapeError::MissingGeometry { chart: kind.name() })
        };
        match kind {
            ChartKind::Bar(spec) => bar_chart::bar(&mut canvas, spec, table)?,
            ChartKind::GroupedBar(spec) => bar_chart::grouped_bar(&mut canvas, spec, table)?,
            ChartKind::StackedBar(spec) => bar_chart::stacked_bar(&mut canvas, spec, table)?,
            ChartKind::Waffle(spec) => bar_chart::waffle(&mut canvas, spec, table)?,
            ChartKind::Heatmap(spec) => heatmap_chart::heatmap(&mut canvas, spec, table)?,
            ChartKind::Histogram(spec) => {
                distribution_chart::histogram(&mut canvas, spec, table)?;
            }
            ChartKind::Violin(spec) => distribution_chart::violin(&mut canvas, spec, table)?,
            ChartKind::Boxplot(spec) => distribution_chart::boxplot(&mut canvas, spec, table)?,
            ChartKind::Ridgeline(spec) => {
                distribution_chart::ridgeline(&mut canvas, spec, table)?;
            }
            ChartKind::Streamgraph(spec) => {
                multiples_chart::streamgraph(&mut canvas, spec, table)?;
            }
            ChartKind::Horizon(spec) => multiples_chart::horizon(&mut canvas, spec, table)?,
            ChartKind::Bump(spec) => multiples_chart::bump(&mut canvas, spec, table)?,
            ChartKind::Choropleth(spec) => {
                map_chart::choropleth(&mut canvas, spec, table, geometry()?)?;
            }
            ChartKind::CategoryMap(spec) => {
                map_chart::category_map(&mut canvas, spec, table, geometry()?)?;
            }
            ChartKind::SymbolMap(spec) => {
                map_chart::symbol_map(&mut canvas, spec, table, geometry()?)?;
            }
        }

        let scene = canvas.finish();
        tracing::debug!(
            chart = kind.name(),
            primitives = scene.len(),
            "built chart"
        );
        Ok(scene)
    }

    /// Builds a chart, degrading any error into a placeholder scene.
    ///
    /// The placeholder has the requested size and a single centered [`PLACEHOLDER_MESSAGE`]
    /// text primitive; the error is logged at `warn` level.
    pub fn build_or_placeholder(&self, kind: &ChartKind, data: ChartData<'_>) -> Scene {
        self.build(kind, data).unwrap_or_else(|err| {
            tracing::warn!(chart = kind.name(), %err, "chart degraded to placeholder");
            Scene::placeholder(
                self.size.width,
                self.size.height,
                PLACEHOLDER_MESSAGE,
                self.style.text_color,
            )
        })
    }
}

/// Per-build drawing state shared by the chart families.
pub(crate) struct Canvas<'a> {
    pub(crate) style: &'a ChartStyle,
    pub(crate) measurer: &'a dyn TextMeasurer,
    size: ChartSize,
    title: Option<&'a str>,
    scene: Scene,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(
        style: &'a ChartStyle,
        measurer: &'a dyn TextMeasurer,
        size: ChartSize,
        title: Option<&'a str>,
    ) -> Self {
        Self {
            style,
            measurer,
            size,
            title,
            scene: Scene::new(size.width, size.height),
        }
    }

    fn title_height(&self) -> f64 {
        if self.title.is_some() {
            self.style.title_font_size * 1.5
        } else {
            0.0
        }
    }

    /// Rotates crowded bottom labels, judged against a rough plot width.
    pub(crate) fn fit_x_axis(&self, axis: Axis) -> Axis {
        let m = self.style.margin;
        let rough = self.size.width - m.left - m.right - 4.0 * self.style.font_size;
        axis.fit_labels(self.measurer, self.style.font_size, rough)
    }

    /// Arranges the plot around the given guides, draws them, and returns the plot rectangle.
    pub(crate) fn frame(
        &mut self,
        left: Option<&Axis>,
        bottom: Option<&Axis>,
        legend: Option<&Legend>,
    ) -> Rect {
        let spec = LayoutSpec {
            title_height: self.title_height(),
            axis_left: left.map_or(0.0, |a| a.extent(self.measurer, self.style)),
            axis_bottom: bottom.map_or(0.0, |a| a.extent(self.measurer, self.style)),
            legend: legend.map(|l| l.size(self.measurer, self.style)),
        };
        let layout = ChartLayout::arrange(self.size, self.style.margin, &spec);
        for axis in left.into_iter().chain(bottom) {
            self.scene
                .extend(axis.primitives(layout.plot, self.measurer, self.style));
        }
        if let (Some(legend), Some(rect)) = (legend, layout.legend) {
            self.scene
                .extend(legend.primitives(rect.origin(), self.style));
        }
        layout.plot
    }

    pub(crate) fn push(&mut self, primitive: Primitive) {
        self.scene.push(primitive);
    }

    pub(crate) fn finish(mut self) -> Scene {
        if let Some(title) = self.title {
            let y = self.style.margin.top + self.title_height() * 0.5;
            self.scene.push(
                Primitive::text(
                    Point::new(self.size.width * 0.5, y),
                    title,
                    self.style.title_font_size,
                )
                .with_anchor(TextAnchor::Middle)
                .with_fill(self.style.text_color)
                .with_z_index(z_order::TITLE),
            );
        }
        self.scene.sort_by_z();
        self.scene
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use strata_core::{SchemaError, Shape, Value};

    use super::*;
    use crate::chart::{BarSpec, ChoroplethSpec};

    fn table() -> Table {
        Table::from_rows(
            ["country", "pct"],
            [
                vec!["Chad".into(), 41.0.into()],
                vec!["Niger".into(), 12.0.into()],
                vec!["Mali".into(), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn build_sorts_primitives_and_adds_the_title() {
        let builder = ChartBuilder::new(ChartStyle::default(), ChartSize::default())
            .with_title("Share in conflict");
        let kind = ChartKind::Bar(BarSpec::new("country", "pct"));
        let scene = builder.build(&kind, ChartData::new(&table())).unwrap();
        let z: std::vec::Vec<i32> = scene.primitives().iter().map(|p| p.z_index).collect();
        assert!(z.windows(2).all(|w| w[0] <= w[1]));
        let last = scene.primitives().last().unwrap();
        let Shape::Text(t) = &last.shape else {
            panic!("expected the title last");
        };
        assert_eq!(t.text, "Share in conflict");
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let builder = ChartBuilder::new(ChartStyle::default(), ChartSize::default());
        let kind = ChartKind::Bar(BarSpec::new("country", "share"));
        assert_eq!(
            builder.build(&kind, ChartData::new(&table())),
            Err(Error::Schema(SchemaError::missing("share")))
        );
    }

    #[test]
    fn maps_need_geometry_and_degrade_to_a_placeholder() {
        let builder = ChartBuilder::new(ChartStyle::default(), ChartSize::new(300.0, 200.0));
        let kind = ChartKind::Choropleth(ChoroplethSpec::new("country", "pct"));
        assert_eq!(
            builder.build(&kind, ChartData::new(&table())),
            Err(Error::DataShape(DataShapeError::MissingGeometry {
                chart: "choropleth"
            }))
        );
        let scene = builder.build_or_placeholder(&kind, ChartData::new(&table()));
        assert_eq!((scene.width, scene.height), (300.0, 200.0));
        let [p] = scene.primitives() else {
            panic!("expected a single placeholder primitive");
        };
        let Shape::Text(t) = &p.shape else {
            panic!("expected text");
        };
        assert_eq!(t.text, PLACEHOLDER_MESSAGE);
    }

    #[test]
    fn empty_table_builds_an_empty_chart() {
        let builder = ChartBuilder::new(ChartStyle::default(), ChartSize::default());
        let empty = Table::new(["country", "pct"]).unwrap();
        let kind = ChartKind::Bar(BarSpec::new("country", "pct"));
        let scene = builder.build(&kind, ChartData::new(&empty)).unwrap();
        assert!(scene.primitives().iter().all(|p| p.tooltip.is_none()));
    }
}

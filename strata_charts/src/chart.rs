// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart requests: one [`ChartKind`] variant per chart, each naming the columns it reads.
//!
//! With the `serde` feature these deserialize from an internally tagged object, for example
//! `{"type": "bar", "category": "country", "value": "pct"}`.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use strata_core::DataShapeError;
use strata_transforms::{Baseline, Reducer, nice_thresholds, step_thresholds};

/// How histogram-like charts choose their bin edges.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Thresholds {
    /// Round-number edges giving about this many bins.
    Count(usize),
    /// Edges at multiples of a fixed width.
    Step(f64),
    /// Explicit ascending edges.
    Edges(Vec<f64>),
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::Count(10)
    }
}

impl Thresholds {
    /// Resolves edges for data spanning `[min, max]`.
    pub fn resolve(&self, min: f64, max: f64) -> Result<Vec<f64>, DataShapeError> {
        match self {
            Self::Count(0) => Err(DataShapeError::InvalidParameter {
                name: "thresholds",
                reason: "bin count must be positive",
            }),
            Self::Count(n) => Ok(nice_thresholds(min, max, *n)),
            Self::Step(step) => step_thresholds(min, max, *step),
            Self::Edges(edges) => Ok(edges.clone()),
        }
    }
}

/// One bar per category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarSpec {
    /// Category column (x).
    pub category: String,
    /// Value column (bar height).
    pub value: String,
    /// Group rows by category first; without it every row is one bar.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reducer: Option<Reducer>,
    /// Sort bars by value, largest first. Missing values go last.
    #[cfg_attr(feature = "serde", serde(default = "yes"))]
    pub sort_descending: bool,
}

impl BarSpec {
    /// Creates a sorted, unaggregated bar chart request.
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
            reducer: None,
            sort_descending: true,
        }
    }

    /// Aggregates rows per category.
    pub fn with_reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = Some(reducer);
        self
    }

    /// Enables or disables descending sort.
    pub fn with_sort_descending(mut self, sort: bool) -> Self {
        self.sort_descending = sort;
        self
    }
}

/// Side-by-side bars per (category, series).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupedBarSpec {
    /// Outer band column.
    pub category: String,
    /// Inner band column; needs at least two distinct values.
    pub series: String,
    /// Value column.
    pub value: String,
    /// Reducer for repeated (category, series) rows.
    #[cfg_attr(feature = "serde", serde(default = "mean"))]
    pub reducer: Reducer,
}

impl GroupedBarSpec {
    /// Creates a grouped bar request reducing with the mean.
    pub fn new(
        category: impl Into<String>,
        series: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            series: series.into(),
            value: value.into(),
            reducer: Reducer::Mean,
        }
    }
}

/// Stacked bars per category, one segment per series.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackedBarSpec {
    /// Category column (x).
    pub category: String,
    /// Series column (segments).
    pub series: String,
    /// Value column.
    pub value: String,
    /// Reducer for repeated (category, series) rows.
    #[cfg_attr(feature = "serde", serde(default = "mean"))]
    pub reducer: Reducer,
    /// [`Baseline::Zero`] or [`Baseline::Percent`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub baseline: Baseline,
}

impl StackedBarSpec {
    /// Creates a zero-based stacked bar request.
    pub fn new(
        category: impl Into<String>,
        series: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            series: series.into(),
            value: value.into(),
            reducer: Reducer::Mean,
            baseline: Baseline::Zero,
        }
    }

    /// Sets the baseline.
    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// A square grid of cells split between categories by share.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaffleSpec {
    /// Category column.
    pub category: String,
    /// Value column.
    pub value: String,
    /// Reducer per category.
    #[cfg_attr(feature = "serde", serde(default = "sum"))]
    pub reducer: Reducer,
    /// Cells per side.
    #[cfg_attr(feature = "serde", serde(default = "ten"))]
    pub side: usize,
}

impl WaffleSpec {
    /// Creates a 10x10 waffle summing values per category.
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
            reducer: Reducer::Sum,
            side: 10,
        }
    }
}

/// A colored cell per (entity, value column).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeatmapSpec {
    /// Entity column (rows).
    pub entity: String,
    /// Value columns (columns), in display order.
    pub columns: Vec<String>,
    /// Pins the color domain minimum.
    #[cfg_attr(feature = "serde", serde(default))]
    pub domain_min: Option<f64>,
    /// Pins the color domain maximum.
    #[cfg_attr(feature = "serde", serde(default))]
    pub domain_max: Option<f64>,
}

impl HeatmapSpec {
    /// Creates a heatmap request.
    pub fn new(entity: impl Into<String>, columns: impl IntoIterator<Item = String>) -> Self {
        Self {
            entity: entity.into(),
            columns: columns.into_iter().collect(),
            domain_min: None,
            domain_max: None,
        }
    }
}

/// Counts per bin, optionally split by group.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramSpec {
    /// Numeric column.
    pub value: String,
    /// Optional grouping column; groups are drawn side by side within a bin.
    #[cfg_attr(feature = "serde", serde(default))]
    pub group: Option<String>,
    /// Bin edges.
    #[cfg_attr(feature = "serde", serde(default))]
    pub thresholds: Thresholds,
}

impl HistogramSpec {
    /// Creates an ungrouped histogram with about 10 bins.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            group: None,
            thresholds: Thresholds::default(),
        }
    }

    /// Groups by a column.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the thresholds.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

/// A mirrored density outline per category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViolinSpec {
    /// Category column (x).
    pub category: String,
    /// Numeric column (y).
    pub value: String,
    /// Bin edges, shared by every category.
    #[cfg_attr(feature = "serde", serde(default))]
    pub thresholds: Thresholds,
}

impl ViolinSpec {
    /// Creates a violin request.
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
            thresholds: Thresholds::default(),
        }
    }
}

/// Precomputed five-number summaries drawn as boxes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxplotSpec {
    /// Category column (x).
    pub category: String,
    /// Minimum column.
    pub min: String,
    /// First quartile column.
    pub q1: String,
    /// Median column.
    pub median: String,
    /// Third quartile column.
    pub q3: String,
    /// Maximum column.
    pub max: String,
    /// Lower whisker column; when set, `min` is drawn as an outlier dot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lower_whisker: Option<String>,
    /// Upper whisker column; when set, `max` is drawn as an outlier dot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub upper_whisker: Option<String>,
}

impl BoxplotSpec {
    /// Creates a boxplot request whose whiskers run to `min` and `max`.
    pub fn new(
        category: impl Into<String>,
        [min, q1, median, q3, max]: [&str; 5],
    ) -> Self {
        Self {
            category: category.into(),
            min: min.into(),
            q1: q1.into(),
            median: median.into(),
            q3: q3.into(),
            max: max.into(),
            lower_whisker: None,
            upper_whisker: None,
        }
    }

    /// Uses separate whisker columns.
    pub fn with_whiskers(mut self, lower: impl Into<String>, upper: impl Into<String>) -> Self {
        self.lower_whisker = Some(lower.into());
        self.upper_whisker = Some(upper.into());
        self
    }
}

/// One density area per entity, stacked top to bottom.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RidgelineSpec {
    /// Entity column (rows).
    pub entity: String,
    /// Numeric column (x).
    pub value: String,
    /// Bin edges, shared by every entity.
    #[cfg_attr(feature = "serde", serde(default))]
    pub thresholds: Thresholds,
    /// Peak height in row heights; above 1 ridges overlap the row above.
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub overlap: f64,
}

impl RidgelineSpec {
    /// Creates a ridgeline request.
    pub fn new(entity: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            value: value.into(),
            thresholds: Thresholds::default(),
            overlap: 1.0,
        }
    }
}

/// Stacked areas around a moving baseline.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamgraphSpec {
    /// Time column (x), in first-appearance order.
    pub time: String,
    /// Series column (layers).
    pub series: String,
    /// Value column.
    pub value: String,
    /// [`Baseline::Silhouette`] or [`Baseline::Wiggle`].
    #[cfg_attr(feature = "serde", serde(default = "silhouette"))]
    pub baseline: Baseline,
}

impl StreamgraphSpec {
    /// Creates a silhouette streamgraph request.
    pub fn new(
        time: impl Into<String>,
        series: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            time: time.into(),
            series: series.into(),
            value: value.into(),
            baseline: Baseline::Silhouette,
        }
    }

    /// Sets the baseline.
    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// One folded band chart per entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizonSpec {
    /// Entity column (rows).
    pub entity: String,
    /// Time column (x).
    pub time: String,
    /// Value column.
    pub value: String,
    /// Number of folded bands.
    #[cfg_attr(feature = "serde", serde(default = "three"))]
    pub bands: usize,
}

impl HorizonSpec {
    /// Creates a three-band horizon request.
    pub fn new(
        entity: impl Into<String>,
        time: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            time: time.into(),
            value: value.into(),
            bands: 3,
        }
    }
}

/// Rank lines across time slices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BumpSpec {
    /// Time column (x).
    pub time: String,
    /// Entity column (lines).
    pub entity: String,
    /// Value column ranked within each slice.
    pub value: String,
}

impl BumpSpec {
    /// Creates a bump chart request.
    pub fn new(
        time: impl Into<String>,
        entity: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            time: time.into(),
            entity: entity.into(),
            value: value.into(),
        }
    }
}

/// Regions colored by a sequential value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoroplethSpec {
    /// Table column matched against feature names.
    pub name: String,
    /// Value column.
    pub value: String,
    /// Pins the color domain minimum.
    #[cfg_attr(feature = "serde", serde(default))]
    pub domain_min: Option<f64>,
    /// Pins the color domain maximum.
    #[cfg_attr(feature = "serde", serde(default))]
    pub domain_max: Option<f64>,
}

impl ChoroplethSpec {
    /// Creates a choropleth request.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain_min: None,
            domain_max: None,
        }
    }
}

/// Regions colored by category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryMapSpec {
    /// Table column matched against feature names.
    pub name: String,
    /// Category column.
    pub category: String,
}

impl CategoryMapSpec {
    /// Creates a category map request.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Circles at region centroids, sized by value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolMapSpec {
    /// Table column matched against feature names.
    pub name: String,
    /// Value column; circle area is proportional to it.
    pub value: String,
    /// Radius of the largest circle.
    #[cfg_attr(feature = "serde", serde(default = "twenty"))]
    pub max_radius: f64,
}

impl SymbolMapSpec {
    /// Creates a symbol map request.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_radius: 20.0,
        }
    }
}

/// Every chart the builder can produce.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum ChartKind {
    /// See [`BarSpec`].
    Bar(BarSpec),
    /// See [`GroupedBarSpec`].
    GroupedBar(GroupedBarSpec),
    /// See [`StackedBarSpec`].
    StackedBar(StackedBarSpec),
    /// See [`WaffleSpec`].
    Waffle(WaffleSpec),
    /// See [`HeatmapSpec`].
    Heatmap(HeatmapSpec),
    /// See [`HistogramSpec`].
    Histogram(HistogramSpec),
    /// See [`ViolinSpec`].
    Violin(ViolinSpec),
    /// See [`BoxplotSpec`].
    Boxplot(BoxplotSpec),
    /// See [`RidgelineSpec`].
    Ridgeline(RidgelineSpec),
    /// See [`StreamgraphSpec`].
    Streamgraph(StreamgraphSpec),
    /// See [`HorizonSpec`].
    Horizon(HorizonSpec),
    /// See [`BumpSpec`].
    Bump(BumpSpec),
    /// See [`ChoroplethSpec`].
    Choropleth(ChoroplethSpec),
    /// See [`CategoryMapSpec`].
    CategoryMap(CategoryMapSpec),
    /// See [`SymbolMapSpec`].
    SymbolMap(SymbolMapSpec),
}

impl ChartKind {
    /// A short stable name, used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bar(_) => "bar",
            Self::GroupedBar(_) => "grouped_bar",
            Self::StackedBar(_) => "stacked_bar",
            Self::Waffle(_) => "waffle",
            Self::Heatmap(_) => "heatmap",
            Self::Histogram(_) => "histogram",
            Self::Violin(_) => "violin",
            Self::Boxplot(_) => "boxplot",
            Self::Ridgeline(_) => "ridgeline",
            Self::Streamgraph(_) => "streamgraph",
            Self::Horizon(_) => "horizon",
            Self::Bump(_) => "bump",
            Self::Choropleth(_) => "choropleth",
            Self::CategoryMap(_) => "category_map",
            Self::SymbolMap(_) => "symbol_map",
        }
    }

    /// Returns `true` for the map charts, which need geometry.
    pub fn needs_geometry(&self) -> bool {
        matches!(
            self,
            Self::Choropleth(_) | Self::CategoryMap(_) | Self::SymbolMap(_)
        )
    }
}

#[cfg(feature = "serde")]
fn yes() -> bool {
    true
}

#[cfg(feature = "serde")]
fn mean() -> Reducer {
    Reducer::Mean
}

#[cfg(feature = "serde")]
fn sum() -> Reducer {
    Reducer::Sum
}

#[cfg(feature = "serde")]
fn silhouette() -> Baseline {
    Baseline::Silhouette
}

#[cfg(feature = "serde")]
fn one() -> f64 {
    1.0
}

#[cfg(feature = "serde")]
fn three() -> usize {
    3
}

#[cfg(feature = "serde")]
fn ten() -> usize {
    10
}

#[cfg(feature = "serde")]
fn twenty() -> f64 {
    20.0
}

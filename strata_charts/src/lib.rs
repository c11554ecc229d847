// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart building for strata.
//!
//! This crate turns a [`strata_core::Table`] and a [`ChartKind`] request into a
//! [`strata_core::Scene`]:
//! - **Scales** map data values into positions and colors ([`resolve_scale`]).
//! - **Guides** (axes, legends, titles) are laid out around the plot using a [`TextMeasurer`].
//! - **Chart families** (bars, heatmap, distributions, time multiples, maps) emit primitives
//!   with tooltips and z-indices from [`z_order`].
//!
//! Rendering is out of scope; a scene is a flat list of resolved primitives that any backend can
//! draw.
//!
//! ```
//! use strata_charts::{BarSpec, ChartBuilder, ChartData, ChartKind, ChartSize, ChartStyle};
//! use strata_core::Table;
//!
//! let table = Table::from_rows(
//!     ["country", "pct"],
//!     [vec!["Chad".into(), 41.0.into()], vec!["Niger".into(), 12.0.into()]],
//! )
//! .unwrap();
//! let builder = ChartBuilder::new(ChartStyle::default(), ChartSize::new(480.0, 320.0));
//! let scene = builder
//!     .build(&ChartKind::Bar(BarSpec::new("country", "pct")), ChartData::new(&table))
//!     .unwrap();
//! assert_eq!(scene.tooltips().count(), 2);
//! ```

#![no_std]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

mod axis;
mod bar_chart;
mod builder;
mod chart;
mod color;
mod distribution_chart;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod geo;
mod heatmap_chart;
mod layout;
mod legend;
mod map_chart;
mod measure;
mod multiples_chart;
mod scale;
mod style;
pub mod z_order;

pub use builder::{ChartBuilder, ChartData, PLACEHOLDER_MESSAGE};
pub use chart::{
    BarSpec, BoxplotSpec, BumpSpec, CategoryMapSpec, ChartKind, ChoroplethSpec, GroupedBarSpec,
    HeatmapSpec, HistogramSpec, HorizonSpec, RidgelineSpec, StackedBarSpec, StreamgraphSpec,
    SymbolMapSpec, Thresholds, ViolinSpec, WaffleSpec,
};
pub use color::{CategoricalColors, ColorInterpolator, DEFAULT_PALETTE};
pub use geo::{GeoCollection, GeoFeature, Polygon, Projection, Ring, join_keys, join_values};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use scale::{
    Scale, ScaleBand, ScaleKind, ScaleLinear, ScaleOptions, ScalePoint, ScaleSequential,
    ScaleSqrt, discrete_domain, linear_domain, resolve_scale,
};
pub use style::{ChartSize, ChartStyle, Margin};

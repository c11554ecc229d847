// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-index bands used by every chart builder.
//!
//! [`strata_core::Scene::sort_by_z`] is stable, so primitives within a band keep emission order.

/// Gridlines.
pub const GRID: i32 = -50;

/// Filled data marks (bars, cells, areas, regions).
pub const MARKS: i32 = 0;
/// Lines and outlines drawn over filled marks.
pub const MARK_LINES: i32 = 10;
/// Dots and symbols.
pub const MARK_POINTS: i32 = 20;

/// Axis domain lines and ticks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels and axis titles.
pub const AXIS_LABELS: i32 = 40;

/// Legend swatches and ramps.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend text.
pub const LEGEND_LABELS: i32 = 70;
/// The chart title and placeholder messages.
pub const TITLE: i32 = 80;

// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table transforms for strata.
//!
//! Every transform is a pure function over an immutable [`strata_core::Table`]:
//! - [`aggregate`] groups rows and reduces a column per group,
//! - [`long_to_wide`] / [`wide_to_long`] pivot between observation and entity layouts,
//! - [`bin`] partitions a numeric column by thresholds, optionally per group,
//! - [`stack`] computes cumulative offsets under a [`Baseline`],
//! - [`rank`] orders entities within slices.
//!
//! Missing data is carried as `None` throughout. Defaulting it to zero is an explicit caller
//! step ([`Aggregation::fill_missing`], [`WideTable::fill_missing`]).

#![no_std]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

mod aggregate;
mod bin;
#[cfg(not(feature = "std"))]
mod float;
mod rank;
mod reshape;
mod stack;
mod ticks;

pub use aggregate::{AggregatedValue, Aggregation, GroupKey, Reducer, aggregate};
pub use bin::{Bin, BinGroup, bin, nice_thresholds, step_thresholds};
pub use rank::{Ranked, max_rank, rank};
pub use reshape::{LongRecord, WideTable, long_to_wide, wide_to_long};
pub use stack::{Baseline, StackSegment, StackedSeries, stack, stack_extent, stack_wide};
pub use ticks::{nice_domain, nice_step, nice_ticks};

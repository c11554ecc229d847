// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold binning.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use hashbrown::HashMap;
use strata_core::{DataShapeError, Key};

use crate::ticks::nice_ticks;

/// The members of one group that fell into a bin.
#[derive(Clone, Debug, PartialEq)]
pub struct BinGroup {
    /// Group key ([`Key::Null`] for ungrouped binning).
    pub key: Key,
    /// Binned values, in input order.
    pub values: Vec<f64>,
}

impl BinGroup {
    /// Returns the number of members.
    pub fn count(&self) -> usize {
        self.values.len()
    }
}

/// One interval of a [`bin`] call.
///
/// Intervals are half-open `[start, end)`, except the last of a call which also includes `end`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Upper edge; inclusive only when [`Bin::closed`] is set.
    pub end: f64,
    /// Whether `end` belongs to this bin.
    pub closed: bool,
    /// One entry per group in first-appearance order, including groups with no members here.
    pub groups: Vec<BinGroup>,
}

impl Bin {
    /// Returns the representative midpoint.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) * 0.5
    }

    /// Returns the width of the interval.
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Returns the number of members over all groups.
    pub fn count(&self) -> usize {
        self.groups.iter().map(BinGroup::count).sum()
    }

    /// Returns the member count of one group (zero for unknown groups).
    pub fn count_for(&self, key: &Key) -> usize {
        self.group(key).map_or(0, BinGroup::count)
    }

    /// Returns one group's members.
    pub fn group(&self, key: &Key) -> Option<&BinGroup> {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// Returns `true` if `value` falls into this interval.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && (value < self.end || (self.closed && value == self.end))
    }
}

/// Partitions `values` by `thresholds`.
///
/// Thresholds must be finite and strictly ascending. The effective edges are the thresholds,
/// extended on the left by `min(values)` and on the right by `max(values)` when the data reaches
/// past them, so the returned bins are contiguous and always cover the observed domain.
/// Non-finite values are skipped.
///
/// With `group_by` (parallel to `values`), each bin carries one [`BinGroup`] per distinct key.
/// Empty bins are kept; dropping them is up to the caller.
pub fn bin(
    values: &[f64],
    thresholds: &[f64],
    group_by: Option<&[Key]>,
) -> Result<Vec<Bin>, DataShapeError> {
    if thresholds.iter().any(|t| !t.is_finite())
        || thresholds.windows(2).any(|w| w[0] >= w[1])
    {
        return Err(DataShapeError::InvalidThresholds);
    }
    if let Some(keys) = group_by
        && keys.len() != values.len()
    {
        return Err(DataShapeError::InvalidParameter {
            name: "group_by",
            reason: "must have one key per value",
        });
    }

    let null = Key::Null;
    let mut groups: Vec<Key> = Vec::new();
    let mut group_slot: HashMap<&Key, usize> = HashMap::new();
    let mut members: Vec<(usize, f64)> = Vec::with_capacity(values.len());
    let mut extent: Option<(f64, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        let key = group_by.map_or(&null, |keys| &keys[i]);
        let slot = *group_slot.entry(key).or_insert_with(|| {
            groups.push(key.clone());
            groups.len() - 1
        });
        if !v.is_finite() {
            continue;
        }
        members.push((slot, v));
        extent = Some(match extent {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }

    let mut edges: Vec<f64> = Vec::with_capacity(thresholds.len() + 2);
    if let Some((lo, _)) = extent
        && thresholds.first().is_none_or(|&t| lo < t)
    {
        edges.push(lo);
    }
    edges.extend_from_slice(thresholds);
    if let Some((_, hi)) = extent
        && thresholds.last().is_none_or(|&t| hi > t)
    {
        edges.push(hi);
    }
    // Data sitting exactly on a lone threshold still gets a (zero-width) bin.
    if edges.len() == 1 && extent.is_some() {
        edges.push(edges[0]);
    }
    if edges.len() < 2 {
        return Ok(Vec::new());
    }

    let n_bins = edges.len() - 1;
    let mut bins: Vec<Bin> = edges
        .windows(2)
        .enumerate()
        .map(|(i, w)| Bin {
            start: w[0],
            end: w[1],
            closed: i + 1 == n_bins,
            groups: groups
                .iter()
                .map(|k| BinGroup {
                    key: k.clone(),
                    values: Vec::new(),
                })
                .collect(),
        })
        .collect();

    for (slot, v) in members {
        // Number of edges <= v, minus one, is the bin whose start is the last edge <= v.
        let idx = edges.partition_point(|&e| e <= v).saturating_sub(1).min(n_bins - 1);
        bins[idx].groups[slot].values.push(v);
    }

    tracing::trace!(
        values = values.len(),
        bins = bins.len(),
        groups = groups.len(),
        "binned values"
    );
    Ok(bins)
}

/// Returns thresholds at multiples of `step` covering `[min, max]`.
pub fn step_thresholds(min: f64, max: f64, step: f64) -> Result<Vec<f64>, DataShapeError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(DataShapeError::InvalidParameter {
            name: "step",
            reason: "must be finite and positive",
        });
    }
    if !min.is_finite() || !max.is_finite() || min > max {
        return Ok(Vec::new());
    }
    let first = (min / step).floor();
    let last = (max / step).ceil().max(first + 1.0);
    let n = last - first;
    if n > 10_000.0 {
        return Err(DataShapeError::InvalidParameter {
            name: "step",
            reason: "produces more than 10000 bins",
        });
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "n is finite, positive and at most 10000"
    )]
    let n = n as usize;
    Ok((0..=n).map(|i| (first + i as f64) * step).collect())
}

/// Returns round-number thresholds covering `[min, max]` with about `count` bins.
pub fn nice_thresholds(min: f64, max: f64, count: usize) -> Vec<f64> {
    let ticks = nice_ticks(min, max, count);
    if ticks.len() == 1 {
        // Degenerate domain: one bin around the value.
        let v = ticks[0];
        return alloc::vec![v - 0.5, v + 0.5];
    }
    ticks
}

#[cfg(test)]
mod tests {
    extern crate std;

    use proptest::prelude::*;

    use super::*;

    fn counts(bins: &[Bin]) -> Vec<usize> {
        bins.iter().map(Bin::count).collect()
    }

    #[test]
    fn thresholds_spanning_the_data() {
        let bins = bin(&[1.0, 5.0, 9.0, 15.0], &[0.0, 10.0, 20.0], None).unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!((bins[0].start, bins[0].end, bins[0].closed), (0.0, 10.0, false));
        assert_eq!((bins[1].start, bins[1].end, bins[1].closed), (10.0, 20.0, true));
        assert_eq!(counts(&bins), [3, 1]);
        assert_eq!(bins[0].midpoint(), 5.0);
    }

    #[test]
    fn interior_thresholds_extend_to_the_data() {
        let bins = bin(&[1.0, 5.0, 9.0, 15.0], &[4.0, 10.0], None).unwrap();
        let edges: Vec<(f64, f64)> = bins.iter().map(|b| (b.start, b.end)).collect();
        assert_eq!(edges, [(1.0, 4.0), (4.0, 10.0), (10.0, 15.0)]);
        assert_eq!(counts(&bins), [1, 2, 1]);
    }

    #[test]
    fn last_bin_is_closed() {
        let bins = bin(&[0.0, 10.0, 20.0], &[0.0, 10.0, 20.0], None).unwrap();
        assert_eq!(counts(&bins), [1, 2]);
        assert!(bins[1].contains(20.0));
        assert!(!bins[0].contains(10.0));
    }

    #[test]
    fn grouped_bins_keep_zero_entries() {
        let keys = [Key::text("Conflict"), Key::text("Stable"), Key::text("Stable")];
        let bins = bin(&[1.0, 2.0, 12.0], &[0.0, 10.0, 20.0], Some(&keys[..])).unwrap();
        assert_eq!(bins[0].groups.len(), 2);
        assert_eq!(bins[0].count_for(&Key::text("Conflict")), 1);
        assert_eq!(bins[0].count_for(&Key::text("Stable")), 1);
        assert_eq!(bins[1].count_for(&Key::text("Conflict")), 0);
        assert_eq!(bins[1].group(&Key::text("Stable")).unwrap().values, [12.0]);
    }

    #[test]
    fn group_counts_sum_to_finite_members() {
        let a = Key::text("Camp");
        let b = Key::text("Urban");
        let keys = [a.clone(), b.clone(), a.clone(), b.clone(), a.clone()];
        let values = [3.0, 4.0, f64::NAN, 25.0, 8.0];
        let bins = bin(&values, &[0.0, 10.0, 20.0, 30.0], Some(&keys[..])).unwrap();
        assert_eq!(bins.len(), 3);
        for b in &bins {
            assert_eq!(b.groups.len(), 2, "every bin lists every group");
        }
        // The middle bin is empty for both groups but still carries them.
        assert_eq!(bins[1].count_for(&a), 0);
        assert_eq!(bins[1].count_for(&b), 0);
        assert_eq!(bins[2].count_for(&a), 0);
        let total = |k: &Key| bins.iter().map(|bin| bin.count_for(k)).sum::<usize>();
        assert_eq!(total(&a), 2);
        assert_eq!(total(&b), 2);
        assert_eq!(bins[0].groups[0].key, a);
        assert_eq!(bins[0].groups[1].key, b);
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(
            bin(&[1.0], &[10.0, 0.0], None),
            Err(DataShapeError::InvalidThresholds)
        );
        assert_eq!(
            bin(&[1.0], &[0.0, f64::NAN], None),
            Err(DataShapeError::InvalidThresholds)
        );
        assert!(matches!(
            bin(&[1.0, 2.0], &[0.0], Some(&[Key::Null][..])),
            Err(DataShapeError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn non_finite_and_empty_inputs() {
        let bins = bin(&[f64::NAN, 3.0], &[0.0, 5.0], None).unwrap();
        assert_eq!(counts(&bins), [1]);
        assert!(bin(&[], &[], None).unwrap().is_empty());
        let bins = bin(&[], &[0.0, 5.0], None).unwrap();
        assert_eq!(counts(&bins), [0]);
        let single = bin(&[2.0], &[], None).unwrap();
        assert_eq!(counts(&single), [1]);
    }

    #[test]
    fn threshold_generators() {
        assert_eq!(
            step_thresholds(3.0, 27.0, 10.0).unwrap(),
            [0.0, 10.0, 20.0, 30.0]
        );
        assert_eq!(step_thresholds(10.0, 10.0, 5.0).unwrap(), [10.0, 15.0]);
        assert!(step_thresholds(0.0, 1.0, 0.0).is_err());
        assert_eq!(nice_thresholds(0.0, 41.0, 4), [0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(nice_thresholds(3.0, 3.0, 4), [2.5, 3.5]);
    }

    proptest! {
        #[test]
        fn bins_are_contiguous_and_cover_the_data(
            values in proptest::collection::vec(-1000.0..1000.0_f64, 1..80),
            mut thresholds in proptest::collection::vec(-1200.0..1200.0_f64, 0..8),
        ) {
            thresholds.sort_by(f64::total_cmp);
            thresholds.dedup();
            let bins = bin(&values, &thresholds, None).unwrap();

            let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(bins.first().unwrap().start <= lo);
            prop_assert!(bins.last().unwrap().end >= hi);
            for pair in bins.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
                prop_assert!(!pair[0].closed);
            }
            prop_assert!(bins.last().unwrap().closed);
            prop_assert_eq!(bins.iter().map(Bin::count).sum::<usize>(), values.len());
            for b in &bins {
                for g in &b.groups {
                    for &v in &g.values {
                        prop_assert!(b.contains(v));
                    }
                }
            }
        }
    }
}

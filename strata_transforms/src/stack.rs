// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cumulative stacking offsets.

extern crate alloc;

use alloc::vec::Vec;

use strata_core::{Key, SchemaError, Table};

use crate::reshape::WideTable;

/// Stack baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Baseline {
    /// The first key starts at 0.
    #[default]
    Zero,
    /// Each category's stack is centered on 0 (`lower[0] = -total / 2`).
    Silhouette,
    /// Values are rescaled to sum to 100 per category, then stacked from 0.
    ///
    /// A category whose values sum to 0 stays flat at 0.
    Percent,
    /// Streamgraph "wiggle" baseline (D3's `stackOffsetWiggle`).
    ///
    /// The baseline of each category is chosen to minimize the weighted change in slope from the
    /// previous category, so category order matters.
    Wiggle,
}

/// One key's slice of a stack.
#[derive(Clone, Debug, PartialEq)]
pub struct StackSegment {
    /// Series key.
    pub key: Key,
    /// Input value (non-numeric cells read as 0).
    pub value: f64,
    /// Lower offset.
    pub lower: f64,
    /// Upper offset.
    pub upper: f64,
}

/// The stacked segments of one category, in caller key order.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedSeries {
    /// Category (x value).
    pub category: Key,
    /// One segment per key.
    pub segments: Vec<StackSegment>,
}

impl StackedSeries {
    /// Returns the sum of input values.
    pub fn total(&self) -> f64 {
        self.segments.iter().map(|s| s.value).sum()
    }

    /// Returns the lower offset of the first segment.
    pub fn lower(&self) -> f64 {
        self.segments.first().map_or(0.0, |s| s.lower)
    }

    /// Returns the upper offset of the last segment.
    pub fn upper(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.upper)
    }

    /// Returns the segment for `key`.
    pub fn segment(&self, key: &Key) -> Option<&StackSegment> {
        self.segments.iter().find(|s| &s.key == key)
    }
}

/// Returns the `(min lower, max upper)` over several stacks.
pub fn stack_extent(series: &[StackedSeries]) -> Option<(f64, f64)> {
    series
        .iter()
        .flat_map(|s| &s.segments)
        .fold(None, |acc, s| {
            let (lo, hi) = (s.lower.min(s.upper), s.lower.max(s.upper));
            Some(match acc {
                None => (lo, hi),
                Some((a, b)) => (a.min(lo), b.max(hi)),
            })
        })
}

/// Stacks `keys` columns of a wide table, one stack per row.
///
/// `category_column` labels each row's stack. Keys keep the caller's order; nothing is
/// reordered.
pub fn stack(
    table: &Table,
    category_column: &str,
    keys: &[&str],
    baseline: Baseline,
) -> Result<Vec<StackedSeries>, SchemaError> {
    let category_idx = table.column_index(category_column)?;
    let key_idx = table.require(keys)?;
    let categories = table
        .rows()
        .iter()
        .map(|r| r.get(category_idx).key())
        .collect();
    let values = table
        .rows()
        .iter()
        .flat_map(|r| key_idx.iter().map(|&ki| r.get(ki).as_f64().unwrap_or(0.0)))
        .collect();
    Ok(stack_matrix(
        categories,
        keys.iter().map(|&k| Key::text(k)).collect(),
        values,
        baseline,
    ))
}

/// Stacks a [`WideTable`]: its entities are the categories and its categories are the keys.
pub fn stack_wide(wide: &WideTable, baseline: Baseline) -> Vec<StackedSeries> {
    let values = (0..wide.entities().len())
        .flat_map(|e| wide.row(e).iter().map(|v| v.unwrap_or(0.0)))
        .collect();
    stack_matrix(
        wide.entities().to_vec(),
        wide.categories().to_vec(),
        values,
        baseline,
    )
}

// `values` is row-major: categories x keys.
fn stack_matrix(
    categories: Vec<Key>,
    keys: Vec<Key>,
    values: Vec<f64>,
    baseline: Baseline,
) -> Vec<StackedSeries> {
    let width = keys.len();
    let rows: Vec<&[f64]> = if width == 0 {
        alloc::vec![&[][..]; categories.len()]
    } else {
        values.chunks(width).collect()
    };

    let starts: Vec<f64> = match baseline {
        Baseline::Zero | Baseline::Percent => alloc::vec![0.0; rows.len()],
        Baseline::Silhouette => rows
            .iter()
            .map(|r| -r.iter().sum::<f64>() * 0.5)
            .collect(),
        Baseline::Wiggle => wiggle_baseline(&rows),
    };

    let out: Vec<StackedSeries> = categories
        .into_iter()
        .zip(rows.iter().zip(starts))
        .map(|(category, (row, start))| {
            let total: f64 = row.iter().sum();
            let scale = match baseline {
                Baseline::Percent if total != 0.0 => 100.0 / total,
                Baseline::Percent => 0.0,
                _ => 1.0,
            };
            let mut last = start;
            let segments = keys
                .iter()
                .zip(row.iter())
                .map(|(key, &value)| {
                    let lower = last;
                    last += value * scale;
                    StackSegment {
                        key: key.clone(),
                        value,
                        lower,
                        upper: last,
                    }
                })
                .collect();
            StackedSeries { category, segments }
        })
        .collect();

    tracing::trace!(
        categories = out.len(),
        keys = width,
        ?baseline,
        "stacked series"
    );
    out
}

// y[0] = 0
// y[i] = y[i-1] - (sum_j v[i][j] * (v[i][j] - v[i-1][j]) / 2) / sum_j v[i][j]
fn wiggle_baseline(rows: &[&[f64]]) -> Vec<f64> {
    let mut baseline = alloc::vec![0.0; rows.len()];
    for i in 1..rows.len() {
        let sum: f64 = rows[i].iter().sum();
        baseline[i] = if sum == 0.0 {
            baseline[i - 1]
        } else {
            let k: f64 = rows[i]
                .iter()
                .zip(rows[i - 1].iter())
                .map(|(&v, &prev)| v * (v - prev) * 0.5)
                .sum();
            baseline[i - 1] - k / sum
        };
    }
    baseline
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use proptest::prelude::*;
    use strata_core::Value;

    use super::*;
    use crate::reshape::long_to_wide;

    fn assert_close(a: f64, b: f64) {
        let d = (a - b).abs();
        assert!(d < 1.0e-9, "expected {b}, got {a} (|Δ|={d})");
    }

    fn wide() -> Table {
        Table::from_rows(
            ["country", "primary", "secondary"],
            [
                vec!["A".into(), 20.0.into(), 10.0.into()],
                vec!["B".into(), Value::Null, 5.0.into()],
                vec!["C".into(), 0.0.into(), 0.0.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn zero_baseline_accumulates_in_key_order() {
        let s = stack(&wide(), "country", &["primary", "secondary"], Baseline::Zero).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].category, Key::text("A"));
        let a: Vec<(f64, f64)> = s[0].segments.iter().map(|g| (g.lower, g.upper)).collect();
        assert_eq!(a, [(0.0, 20.0), (20.0, 30.0)]);
        // Null stacks as 0.
        assert_eq!(s[1].segments[0].upper, 0.0);
        assert_eq!(s[1].upper(), 5.0);
    }

    #[test]
    fn silhouette_centers_each_stack() {
        let s = stack(&wide(), "country", &["primary", "secondary"], Baseline::Silhouette)
            .unwrap();
        assert_eq!(s[0].lower(), -15.0);
        assert_eq!(s[0].upper(), 15.0);
        assert_eq!(s[1].lower(), -2.5);
    }

    #[test]
    fn percent_sums_to_100_and_zero_totals_stay_flat() {
        let s = stack(&wide(), "country", &["primary", "secondary"], Baseline::Percent).unwrap();
        assert_close(s[0].segments[0].upper, 200.0 / 3.0);
        assert_close(s[0].upper(), 100.0);
        assert_close(s[1].upper(), 100.0);
        assert_eq!(s[2].upper(), 0.0);
        assert_eq!(s[0].segments[0].value, 20.0);
    }

    #[test]
    fn wiggle_matches_d3_baseline() {
        // s0: [1, 1, 1], s1: [1, 2, 3]; baselines [0, -1/3, -17/24].
        let table = Table::from_rows(
            ["x", "s0", "s1"],
            [
                vec![0.0.into(), 1.0.into(), 1.0.into()],
                vec![1.0.into(), 1.0.into(), 2.0.into()],
                vec![2.0.into(), 1.0.into(), 3.0.into()],
            ],
        )
        .unwrap();
        let s = stack(&table, "x", &["s0", "s1"], Baseline::Wiggle).unwrap();
        assert_close(s[0].lower(), 0.0);
        assert_close(s[1].lower(), -1.0 / 3.0);
        assert_close(s[1].segments[1].lower, 2.0 / 3.0);
        assert_close(s[2].lower(), -17.0 / 24.0);
        assert_close(s[2].upper(), 79.0 / 24.0);
    }

    #[test]
    fn stack_wide_uses_entities_as_categories() {
        let long = Table::from_rows(
            ["country", "status", "pct"],
            [
                vec!["A".into(), "Conflict".into(), 20.0.into()],
                vec!["A".into(), "Stable".into(), 10.0.into()],
                vec!["B".into(), "Stable".into(), 5.0.into()],
            ],
        )
        .unwrap();
        let wide = long_to_wide(&long, "country", "status", "pct").unwrap();
        let s = stack_wide(&wide, Baseline::Zero);
        assert_eq!(s[1].category, Key::text("B"));
        assert_eq!(s[1].segment(&Key::text("Conflict")).unwrap().upper, 0.0);
        assert_eq!(s[1].upper(), 5.0);
        assert_eq!(stack_extent(&s), Some((0.0, 30.0)));
    }

    #[test]
    fn missing_key_column_is_a_schema_error() {
        let err = stack(&wide(), "country", &["tertiary"], Baseline::Zero).unwrap_err();
        assert_eq!(err, SchemaError::missing("tertiary"));
    }

    proptest! {
        #[test]
        fn stack_invariants(
            rows in proptest::collection::vec(proptest::collection::vec(0.0..1000.0_f64, 3), 1..20)
        ) {
            let table = Table::from_rows(
                ["c", "k0", "k1", "k2"],
                rows.iter().enumerate().map(|(i, r)| {
                    let mut cells = vec![Value::Number(i as f64)];
                    cells.extend(r.iter().map(|&v| Value::Number(v)));
                    cells
                }),
            )
            .unwrap();
            let keys = ["k0", "k1", "k2"];

            for s in stack(&table, "c", &keys, Baseline::Zero).unwrap() {
                prop_assert_eq!(s.lower(), 0.0);
                prop_assert!((s.upper() - s.total()).abs() < 1e-6);
                for pair in s.segments.windows(2) {
                    prop_assert_eq!(pair[0].upper, pair[1].lower);
                }
            }
            for s in stack(&table, "c", &keys, Baseline::Percent).unwrap() {
                if s.total() > 0.0 {
                    prop_assert!((s.upper() - 100.0).abs() < 1e-6);
                }
            }
        }
    }
}

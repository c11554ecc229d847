// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-slice ranking.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use strata_core::{Key, SchemaError, Table};

/// An entity's position within one slice.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranked {
    /// Slice key (for example a year).
    pub slice: Key,
    /// Entity key.
    pub entity: Key,
    /// The ranked value.
    pub value: f64,
    /// 1-based rank; 1 is the largest value.
    pub rank: usize,
}

/// Ranks entities within each slice by descending value.
///
/// Slices keep first-appearance order and so do entities within a slice; equal values keep
/// their input order. Rows with a non-numeric value are not ranked.
pub fn rank(
    table: &Table,
    slice_column: &str,
    entity_column: &str,
    value_column: &str,
) -> Result<Vec<Ranked>, SchemaError> {
    let slice_idx = table.column_index(slice_column)?;
    let entity_idx = table.column_index(entity_column)?;
    let value_idx = table.column_index(value_column)?;

    let mut slices: Vec<(Key, Vec<(Key, f64)>)> = Vec::new();
    let mut slot: HashMap<Key, usize> = HashMap::new();
    for row in table.rows() {
        let Some(value) = row.get(value_idx).as_f64() else {
            continue;
        };
        let i = *slot.entry(row.get(slice_idx).key()).or_insert_with_key(|k| {
            slices.push((k.clone(), Vec::new()));
            slices.len() - 1
        });
        slices[i].1.push((row.get(entity_idx).key(), value));
    }

    let mut out = Vec::with_capacity(table.len());
    for (slice, mut entries) in slices {
        // Stable, so ties keep input order.
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        out.extend(
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (entity, value))| Ranked {
                    slice: slice.clone(),
                    entity,
                    value,
                    rank: i + 1,
                }),
        );
    }
    Ok(out)
}

/// Returns the largest rank in `ranked` (0 when empty).
pub fn max_rank(ranked: &[Ranked]) -> usize {
    ranked.iter().map(|r| r.rank).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use strata_core::Value;

    use super::*;

    #[test]
    fn ranks_descending_within_each_slice() {
        let table = Table::from_rows(
            ["year", "country", "pct"],
            [
                vec![2019.0.into(), "A".into(), 10.0.into()],
                vec![2019.0.into(), "B".into(), 30.0.into()],
                vec![2019.0.into(), "C".into(), 10.0.into()],
                vec![2020.0.into(), "A".into(), 50.0.into()],
                vec![2020.0.into(), "B".into(), Value::Null],
            ],
        )
        .unwrap();
        let ranked = rank(&table, "year", "country", "pct").unwrap();
        let got: Vec<(f64, &str, usize)> = ranked
            .iter()
            .map(|r| {
                (
                    r.slice.as_f64().unwrap(),
                    r.entity.as_str().unwrap(),
                    r.rank,
                )
            })
            .collect();
        assert_eq!(
            got,
            [
                (2019.0, "B", 1),
                (2019.0, "A", 2),
                (2019.0, "C", 3),
                (2020.0, "A", 1),
            ]
        );
        assert_eq!(max_rank(&ranked), 3);
    }
}

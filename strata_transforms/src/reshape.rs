// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long/wide pivots.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;
use strata_core::{Key, ParseError, SchemaError, Table, Value};

/// One entity per row, one numeric field per category.
///
/// Cells are `None` where the long input had no observation for an (entity, category) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct WideTable {
    entity_column: String,
    entities: Vec<Key>,
    categories: Vec<Key>,
    // Row-major: entities x categories.
    cells: Vec<Option<f64>>,
}

impl WideTable {
    fn empty(entity_column: &str, entities: Vec<Key>, categories: Vec<Key>) -> Self {
        let cells = alloc::vec![None; entities.len() * categories.len()];
        Self {
            entity_column: entity_column.to_string(),
            entities,
            categories,
            cells,
        }
    }

    /// Reads a table that is already wide: one row per entity, `value_columns` as categories.
    ///
    /// Category keys are the column names. Non-numeric cells become `None`.
    pub fn from_columns(
        table: &Table,
        entity_column: &str,
        value_columns: &[&str],
    ) -> Result<Self, SchemaError> {
        let entity_idx = table.column_index(entity_column)?;
        let value_idx = table.require(value_columns)?;
        let mut wide = Self::empty(
            entity_column,
            table.rows().iter().map(|r| r.get(entity_idx).key()).collect(),
            value_columns.iter().map(|&c| Key::text(c)).collect(),
        );
        let width = value_idx.len();
        for (ri, row) in table.rows().iter().enumerate() {
            for (ci, &vi) in value_idx.iter().enumerate() {
                wide.cells[ri * width + ci] = row.get(vi).as_f64();
            }
        }
        Ok(wide)
    }

    /// Returns the entity column name.
    pub fn entity_column(&self) -> &str {
        &self.entity_column
    }

    /// Returns entities in first-appearance order.
    pub fn entities(&self) -> &[Key] {
        &self.entities
    }

    /// Returns categories in first-appearance order.
    pub fn categories(&self) -> &[Key] {
        &self.categories
    }

    /// Returns the cell for (`entity`, `category`) indices.
    pub fn get(&self, entity: usize, category: usize) -> Option<f64> {
        if category >= self.categories.len() {
            return None;
        }
        self.cells
            .get(entity * self.categories.len() + category)
            .copied()
            .flatten()
    }

    /// Returns one entity's cells, aligned to [`WideTable::categories`].
    pub fn row(&self, entity: usize) -> &[Option<f64>] {
        let width = self.categories.len();
        let start = (entity * width).min(self.cells.len());
        let end = (start + width).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Looks up a cell by keys.
    pub fn value(&self, entity: &Key, category: &Key) -> Option<f64> {
        let ei = self.entities.iter().position(|e| e == entity)?;
        let ci = self.categories.iter().position(|c| c == category)?;
        self.get(ei, ci)
    }

    /// Sums one entity's present cells.
    pub fn row_total(&self, entity: usize) -> f64 {
        self.row(entity).iter().flatten().sum()
    }

    /// Returns the `(min, max)` over all present cells.
    pub fn extent(&self) -> Option<(f64, f64)> {
        self.cells.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Replaces every missing cell with `fill`.
    pub fn fill_missing(mut self, fill: f64) -> Self {
        for cell in &mut self.cells {
            if cell.is_none() {
                *cell = Some(fill);
            }
        }
        self
    }

    /// Converts to a [`Table`] with the entity column followed by one column per category.
    ///
    /// Category keys become column names through their `Display` form, so this fails if two
    /// categories print the same or one prints like the entity column.
    pub fn to_table(&self) -> Result<Table, ParseError> {
        let columns = core::iter::once(self.entity_column.clone())
            .chain(self.categories.iter().map(ToString::to_string));
        Table::from_rows(
            columns,
            self.entities.iter().enumerate().map(|(ei, entity)| {
                core::iter::once(entity.to_value())
                    .chain(self.row(ei).iter().map(|&v| Value::from(v)))
                    .collect()
            }),
        )
    }

    /// Unpivots back into long records, skipping missing cells.
    pub fn to_long(&self) -> Vec<LongRecord> {
        let mut out = Vec::new();
        for (ei, entity) in self.entities.iter().enumerate() {
            for (ci, category) in self.categories.iter().enumerate() {
                if let Some(v) = self.get(ei, ci) {
                    out.push(LongRecord {
                        entity: entity.clone(),
                        category: category.to_string(),
                        value: Some(v),
                    });
                }
            }
        }
        out
    }
}

/// One `{entity, category, value}` observation.
#[derive(Clone, Debug, PartialEq)]
pub struct LongRecord {
    /// Entity key.
    pub entity: Key,
    /// Category name (the source column name for [`wide_to_long`]).
    pub category: String,
    /// Numeric value, `None` for empty or non-numeric cells.
    pub value: Option<f64>,
}

/// Pivots long rows into one record per entity with one field per observed category.
///
/// Entities and categories keep first-appearance order. Repeated (entity, category)
/// observations are summed; pairs never observed stay `None` (see [`WideTable::fill_missing`]).
pub fn long_to_wide(
    table: &Table,
    entity_column: &str,
    category_column: &str,
    value_column: &str,
) -> Result<WideTable, SchemaError> {
    let entity_idx = table.column_index(entity_column)?;
    let category_idx = table.column_index(category_column)?;
    let value_idx = table.column_index(value_column)?;

    let mut entities: Vec<Key> = Vec::new();
    let mut categories: Vec<Key> = Vec::new();
    let mut entity_slot: HashMap<Key, usize> = HashMap::new();
    let mut category_slot: HashMap<Key, usize> = HashMap::new();
    let mut observed: Vec<(usize, usize, Option<f64>)> = Vec::with_capacity(table.len());
    for row in table.rows() {
        let e = *entity_slot
            .entry(row.get(entity_idx).key())
            .or_insert_with_key(|k| {
                entities.push(k.clone());
                entities.len() - 1
            });
        let c = *category_slot
            .entry(row.get(category_idx).key())
            .or_insert_with_key(|k| {
                categories.push(k.clone());
                categories.len() - 1
            });
        observed.push((e, c, row.get(value_idx).as_f64()));
    }

    let mut wide = WideTable::empty(entity_column, entities, categories);
    let width = wide.categories.len();
    for (e, c, v) in observed {
        let Some(v) = v else { continue };
        let cell = &mut wide.cells[e * width + c];
        *cell = Some(cell.unwrap_or(0.0) + v);
    }

    tracing::trace!(
        entities = wide.entities.len(),
        categories = width,
        "pivoted long to wide"
    );
    Ok(wide)
}

/// Unpivots `value_columns` into one record per (entity, column), in row then column order.
pub fn wide_to_long(
    table: &Table,
    entity_column: &str,
    value_columns: &[&str],
) -> Result<Vec<LongRecord>, SchemaError> {
    let entity_idx = table.column_index(entity_column)?;
    let value_idx = table.require(value_columns)?;

    let mut out = Vec::with_capacity(table.len() * value_columns.len());
    for row in table.rows() {
        let entity = row.get(entity_idx).key();
        for (&name, &vi) in value_columns.iter().zip(&value_idx) {
            out.push(LongRecord {
                entity: entity.clone(),
                category: name.to_string(),
                value: row.get(vi).as_f64(),
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use std::collections::BTreeSet;

    use super::*;
    use crate::aggregate::{Reducer, aggregate};

    fn long() -> Table {
        Table::from_rows(
            ["country", "status", "pct"],
            [
                vec!["A".into(), "Conflict".into(), 20.0.into()],
                vec!["A".into(), "Stable".into(), 10.0.into()],
                vec!["B".into(), "Stable".into(), 5.0.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn country_status_scenario() {
        let grouped = aggregate(&long(), &["country", "status"], "pct", Reducer::Mean)
            .unwrap()
            .to_table()
            .unwrap();
        let wide = long_to_wide(&grouped, "country", "status", "pct").unwrap();

        assert_eq!(wide.entities(), [Key::text("A"), Key::text("B")]);
        assert_eq!(
            wide.categories(),
            [Key::text("Conflict"), Key::text("Stable")]
        );
        assert_eq!(wide.row(0), [Some(20.0), Some(10.0)]);
        assert_eq!(wide.row(1), [None, Some(5.0)]);

        let filled = wide.fill_missing(0.0);
        assert_eq!(filled.row(1), [Some(0.0), Some(5.0)]);
        assert_eq!(
            filled.value(&Key::text("B"), &Key::text("Conflict")),
            Some(0.0)
        );
    }

    #[test]
    fn duplicate_observations_are_summed() {
        let table = Table::from_rows(
            ["e", "c", "v"],
            [
                vec!["x".into(), "k".into(), 1.0.into()],
                vec!["x".into(), "k".into(), 2.5.into()],
                vec!["x".into(), "j".into(), Value::Null],
            ],
        )
        .unwrap();
        let wide = long_to_wide(&table, "e", "c", "v").unwrap();
        assert_eq!(wide.row(0), [Some(3.5), None]);
        assert_eq!(wide.row_total(0), 3.5);
        assert_eq!(wide.extent(), Some((3.5, 3.5)));
    }

    #[test]
    fn wide_to_long_emits_one_record_per_column() {
        let table = Table::from_rows(
            ["country", "2019", "2020"],
            [vec!["Chad".into(), 41.0.into(), Value::Null]],
        )
        .unwrap();
        let long = wide_to_long(&table, "country", &["2019", "2020"]).unwrap();
        assert_eq!(
            long,
            vec![
                LongRecord {
                    entity: Key::text("Chad"),
                    category: "2019".into(),
                    value: Some(41.0),
                },
                LongRecord {
                    entity: Key::text("Chad"),
                    category: "2020".into(),
                    value: None,
                },
            ]
        );
        assert_eq!(
            wide_to_long(&table, "country", &["2021"]),
            Err(SchemaError::missing("2021"))
        );
    }

    #[test]
    fn long_wide_long_round_trip() {
        let wide = long_to_wide(&long(), "country", "status", "pct").unwrap();
        let table = wide.to_table().unwrap();
        assert_eq!(table.columns(), ["country", "Conflict", "Stable"]);

        let back = wide_to_long(&table, "country", &["Conflict", "Stable"]).unwrap();
        let got: BTreeSet<(String, String, u64)> = back
            .iter()
            .filter_map(|r| Some((r.entity.to_string(), r.category.clone(), r.value?.to_bits())))
            .collect();
        let expected: BTreeSet<(String, String, u64)> = [
            ("A", "Conflict", 20.0_f64),
            ("A", "Stable", 10.0),
            ("B", "Stable", 5.0),
        ]
        .into_iter()
        .map(|(e, c, v)| (e.into(), c.into(), v.to_bits()))
        .collect();
        assert_eq!(got, expected);
        assert_eq!(wide.to_long().len(), 3);
    }

    #[test]
    fn from_columns_reads_wide_input() {
        let table = Table::from_rows(
            ["year", "a", "b"],
            [
                vec![2019.0.into(), 1.0.into(), 2.0.into()],
                vec![2020.0.into(), "x".into(), 4.0.into()],
            ],
        )
        .unwrap();
        let wide = WideTable::from_columns(&table, "year", &["a", "b"]).unwrap();
        assert_eq!(wide.entities(), [Key::number(2019.0), Key::number(2020.0)]);
        assert_eq!(wide.row(1), [None, Some(4.0)]);
    }
}

// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group-by aggregation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;
use strata_core::{Key, ParseError, SchemaError, Table, Value};

/// A tuple of categorical values identifying one aggregation bucket.
///
/// Equality and hashing are value based. Most charts group by one or two columns, so keys are
/// stored inline up to length two.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GroupKey(SmallVec<[Key; 2]>);

impl GroupKey {
    /// Creates a key from its parts.
    pub fn new(parts: impl IntoIterator<Item = Key>) -> Self {
        Self(parts.into_iter().collect())
    }

    /// Returns the key parts in group-by column order.
    pub fn parts(&self) -> &[Key] {
        &self.0
    }

    /// Returns the part at `level`.
    pub fn get(&self, level: usize) -> Option<&Key> {
        self.0.get(level)
    }

    /// Returns the number of parts.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the key of a grouping with no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Key> for GroupKey {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// Reduction applied to each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Reducer {
    /// Mean value (skips non-numeric cells).
    Mean,
    /// Sum of values (skips non-numeric cells).
    Sum,
    /// Number of rows, whatever their value.
    Count,
    /// Minimum value (skips non-numeric cells).
    Min,
    /// Maximum value (skips non-numeric cells).
    Max,
}

/// One reduced group.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedValue {
    /// The group.
    pub key: GroupKey,
    /// The reduced value, or `None` if the group had no numeric input.
    ///
    /// [`Reducer::Count`] always produces a value.
    pub value: Option<f64>,
    /// The reducer that produced `value`.
    pub reducer: Reducer,
}

#[derive(Clone, Copy, Debug)]
struct Accumulator {
    rows: usize,
    numeric: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    const EMPTY: Self = Self {
        rows: 0,
        numeric: 0,
        sum: 0.0,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    fn push(&mut self, v: Option<f64>) {
        self.rows += 1;
        if let Some(v) = v {
            self.numeric += 1;
            self.sum += v;
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    fn finish(&self, reducer: Reducer) -> Option<f64> {
        match reducer {
            Reducer::Count => Some(self.rows as f64),
            _ if self.numeric == 0 => None,
            Reducer::Mean => Some(self.sum / self.numeric as f64),
            Reducer::Sum => Some(self.sum),
            Reducer::Min => Some(self.min),
            Reducer::Max => Some(self.max),
        }
    }
}

/// The output of [`aggregate`]: groups in first-appearance order.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    group_by: Vec<String>,
    value_column: String,
    reducer: Reducer,
    values: Vec<AggregatedValue>,
}

impl Aggregation {
    /// Returns the group-by column names.
    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    /// Returns the reduced column name.
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Returns the reducer.
    pub fn reducer(&self) -> Reducer {
        self.reducer
    }

    /// Returns the groups in first-appearance order.
    pub fn values(&self) -> &[AggregatedValue] {
        &self.values
    }

    /// Consumes the aggregation, returning its groups.
    pub fn into_values(self) -> Vec<AggregatedValue> {
        self.values
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a group's reduced value.
    ///
    /// The outer `Option` is `None` when the group does not exist.
    pub fn get(&self, key: &GroupKey) -> Option<Option<f64>> {
        self.values.iter().find(|v| &v.key == key).map(|v| v.value)
    }

    /// Adds every combination of observed group-by values that is not already present.
    ///
    /// Each level's values keep first-appearance order and combinations are enumerated with the
    /// last level varying fastest. Added groups carry `None`; use [`Aggregation::fill_missing`]
    /// to choose a default.
    pub fn complete(mut self) -> Self {
        let levels = self.group_by.len();
        let mut distinct: Vec<Vec<Key>> = alloc::vec![Vec::new(); levels];
        for v in &self.values {
            for (level, part) in v.key.parts().iter().enumerate() {
                if !distinct[level].contains(part) {
                    distinct[level].push(part.clone());
                }
            }
        }
        if levels == 0 || distinct.iter().any(Vec::is_empty) {
            return self;
        }

        let mut existing: HashMap<GroupKey, Option<f64>> = self
            .values
            .drain(..)
            .map(|v| (v.key, v.value))
            .collect();

        let mut cursor = alloc::vec![0_usize; levels];
        loop {
            let key: GroupKey = cursor
                .iter()
                .enumerate()
                .map(|(level, &i)| distinct[level][i].clone())
                .collect();
            let value = existing.remove(&key).flatten();
            self.values.push(AggregatedValue {
                key,
                value,
                reducer: self.reducer,
            });

            // Odometer increment, last level fastest.
            let mut level = levels;
            loop {
                if level == 0 {
                    return self;
                }
                level -= 1;
                cursor[level] += 1;
                if cursor[level] < distinct[level].len() {
                    break;
                }
                cursor[level] = 0;
            }
        }
    }

    /// Replaces every `None` value with `fill`.
    pub fn fill_missing(mut self, fill: f64) -> Self {
        for v in &mut self.values {
            if v.value.is_none() {
                v.value = Some(fill);
            }
        }
        self
    }

    /// Converts the groups back into a table: group-by columns followed by the value column.
    ///
    /// Fails if the value column name repeats a group-by column name.
    pub fn to_table(&self) -> Result<Table, ParseError> {
        let columns = self
            .group_by
            .iter()
            .chain(core::iter::once(&self.value_column))
            .cloned();
        Table::from_rows(
            columns,
            self.values.iter().map(|v| {
                v.key
                    .parts()
                    .iter()
                    .map(Key::to_value)
                    .chain(core::iter::once(Value::from(v.value)))
                    .collect()
            }),
        )
    }
}

/// Groups `table` rows by `group_by` columns and reduces `value_column` per group.
///
/// Groups appear in first-appearance order. [`Reducer::Count`] counts rows, so counts over all
/// groups sum to `table.len()`.
pub fn aggregate(
    table: &Table,
    group_by: &[&str],
    value_column: &str,
    reducer: Reducer,
) -> Result<Aggregation, SchemaError> {
    let group_idx = table.require(group_by)?;
    let value_idx = table.column_index(value_column)?;

    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut keys: Vec<GroupKey> = Vec::new();
    let mut accs: Vec<Accumulator> = Vec::new();
    for row in table.rows() {
        let key: GroupKey = group_idx.iter().map(|&ci| row.get(ci).key()).collect();
        let slot = *index.entry(key).or_insert_with_key(|key| {
            keys.push(key.clone());
            accs.push(Accumulator::EMPTY);
            keys.len() - 1
        });
        accs[slot].push(row.get(value_idx).as_f64());
    }

    tracing::trace!(
        rows = table.len(),
        groups = keys.len(),
        ?reducer,
        "aggregated table"
    );

    Ok(Aggregation {
        group_by: group_by.iter().map(|&s| s.into()).collect(),
        value_column: value_column.into(),
        reducer,
        values: keys
            .into_iter()
            .zip(accs)
            .map(|(key, acc)| AggregatedValue {
                key,
                value: acc.finish(reducer),
                reducer,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use proptest::prelude::*;

    use super::*;

    fn key(parts: &[&str]) -> GroupKey {
        parts.iter().map(|&p| Key::text(p)).collect()
    }

    fn status_table() -> Table {
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
    fn mean_by_two_levels_keeps_first_appearance_order() {
        let agg = aggregate(&status_table(), &["country", "status"], "pct", Reducer::Mean).unwrap();
        let got: Vec<(GroupKey, Option<f64>)> =
            agg.values().iter().map(|v| (v.key.clone(), v.value)).collect();
        assert_eq!(
            got,
            vec![
                (key(&["A", "Conflict"]), Some(20.0)),
                (key(&["A", "Stable"]), Some(10.0)),
                (key(&["B", "Stable"]), Some(5.0)),
            ]
        );
        assert!(agg.values().iter().all(|v| v.reducer == Reducer::Mean));
    }

    #[test]
    fn groups_without_numbers_are_none_not_zero() {
        let table = Table::from_rows(
            ["g", "v"],
            [
                vec!["x".into(), Value::Null],
                vec!["x".into(), "n/a".into()],
                vec!["y".into(), 2.0.into()],
                vec!["y".into(), 4.0.into()],
            ],
        )
        .unwrap();
        let sum = aggregate(&table, &["g"], "v", Reducer::Sum).unwrap();
        assert_eq!(sum.get(&key(&["x"])), Some(None));
        assert_eq!(sum.get(&key(&["y"])), Some(Some(6.0)));
        assert_eq!(sum.get(&key(&["z"])), None);

        let count = aggregate(&table, &["g"], "v", Reducer::Count).unwrap();
        assert_eq!(count.get(&key(&["x"])), Some(Some(2.0)));

        let min = aggregate(&table, &["g"], "v", Reducer::Min).unwrap();
        let max = aggregate(&table, &["g"], "v", Reducer::Max).unwrap();
        assert_eq!(min.get(&key(&["y"])), Some(Some(2.0)));
        assert_eq!(max.get(&key(&["y"])), Some(Some(4.0)));
    }

    #[test]
    fn complete_marks_absent_combinations() {
        let agg = aggregate(&status_table(), &["country", "status"], "pct", Reducer::Mean)
            .unwrap()
            .complete();
        assert_eq!(agg.len(), 4);
        assert_eq!(agg.values()[2].key, key(&["B", "Conflict"]));
        assert_eq!(agg.values()[2].value, None);

        let filled = agg.fill_missing(0.0);
        assert_eq!(filled.get(&key(&["B", "Conflict"])), Some(Some(0.0)));
        assert_eq!(filled.get(&key(&["B", "Stable"])), Some(Some(5.0)));
    }

    #[test]
    fn to_table_round_trips_group_columns() {
        let agg = aggregate(&status_table(), &["country"], "pct", Reducer::Sum).unwrap();
        let table = agg.to_table().unwrap();
        assert_eq!(table.columns(), ["country", "pct"]);
        assert_eq!(table.numbers("pct").unwrap(), vec![Some(30.0), Some(5.0)]);
    }

    #[test]
    fn missing_columns_are_schema_errors() {
        let err = aggregate(&status_table(), &["region"], "pct", Reducer::Mean).unwrap_err();
        assert_eq!(err, SchemaError::missing("region"));
        let err = aggregate(&status_table(), &["country"], "value", Reducer::Count).unwrap_err();
        assert_eq!(err, SchemaError::missing("value"));
    }

    proptest! {
        #[test]
        fn counts_sum_to_row_count(
            rows in proptest::collection::vec((0_u8..4, 0_u8..3, proptest::option::of(-100.0..100.0_f64)), 0..60)
        ) {
            let table = Table::from_rows(
                ["a", "b", "v"],
                rows.iter().map(|(a, b, v)| {
                    vec![Value::Number(f64::from(*a)), Value::Number(f64::from(*b)), Value::from(*v)]
                }),
            )
            .unwrap();
            let agg = aggregate(&table, &["a", "b"], "v", Reducer::Count).unwrap();
            let total: f64 = agg.values().iter().filter_map(|v| v.value).sum();
            prop_assert_eq!(total, rows.len() as f64);
        }
    }
}

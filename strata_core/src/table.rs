// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-oriented tables with named columns.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{ParseError, SchemaError};
use crate::value::{Key, Value};

static NULL: Value = Value::Null;

/// One observation.
///
/// Values are aligned to the owning [`Table`]'s column order; use [`Table::column_index`] to
/// address a cell by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Creates a row from cell values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Returns the cell at `index`, or [`Value::Null`] past the end.
    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NULL)
    }

    /// Returns all cells in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered sequence of rows sharing one ordered column set.
///
/// Tables are built once (by [`crate::TableLoader`] or [`Table::from_rows`]) and treated as
/// immutable by every downstream transform.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Result<Self, ParseError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(ParseError::MissingHeader);
        }
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(ParseError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Creates a table from column names and row values.
    ///
    /// Every row must have exactly one value per column.
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Result<Self, ParseError> {
        let mut table = Self::new(columns)?;
        for values in rows {
            table.push_row(values)?;
        }
        Ok(table)
    }

    /// Appends a row.
    ///
    /// Line numbers in [`ParseError::RaggedRow`] count the header as line 1.
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<(), ParseError> {
        if values.len() != self.columns.len() {
            return Err(ParseError::RaggedRow {
                line: self.rows.len() as u64 + 2,
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(Row::new(values));
        Ok(())
    }

    /// Returns column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns rows in file order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of a named column.
    pub fn column_index(&self, name: &str) -> Result<usize, SchemaError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| SchemaError::missing(name))
    }

    /// Returns `true` if the named column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Resolves several column names at once, failing on the first missing one.
    pub fn require(&self, names: &[&str]) -> Result<Vec<usize>, SchemaError> {
        names.iter().map(|n| self.column_index(n)).collect()
    }

    /// Returns the cell at (`row`, `column`).
    pub fn get(&self, row: usize, column: &str) -> Result<&Value, SchemaError> {
        let ci = self.column_index(column)?;
        Ok(self.rows.get(row).map_or(&NULL, |r| r.get(ci)))
    }

    /// Returns every cell of a column, in row order.
    pub fn values(&self, column: &str) -> Result<impl Iterator<Item = &Value> + '_, SchemaError> {
        let ci = self.column_index(column)?;
        Ok(self.rows.iter().map(move |r| r.get(ci)))
    }

    /// Returns a column as finite numbers (`None` for nulls, text, and non-finite values).
    pub fn numbers(&self, column: &str) -> Result<Vec<Option<f64>>, SchemaError> {
        Ok(self.values(column)?.map(Value::as_f64).collect())
    }

    /// Returns a column as categorical keys.
    pub fn keys(&self, column: &str) -> Result<Vec<Key>, SchemaError> {
        Ok(self.values(column)?.map(Value::key).collect())
    }

    /// Returns the distinct keys of a column in first-appearance order.
    pub fn distinct_keys(&self, column: &str) -> Result<Vec<Key>, SchemaError> {
        let mut out: Vec<Key> = Vec::new();
        for key in self.keys(column)? {
            if !out.contains(&key) {
                out.push(key);
            }
        }
        Ok(out)
    }
}

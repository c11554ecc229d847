// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy shared by every pipeline stage.
//!
//! Lower stages return the narrowest error they can produce; chart builders return [`Error`],
//! which wraps all of them.

extern crate alloc;

use alloc::string::String;

/// Malformed delimited text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input had no header row (or an empty one).
    #[error("missing header row")]
    MissingHeader,
    /// Two header cells share a name.
    #[error("duplicate column name `{name}`")]
    DuplicateColumn {
        /// The repeated column name.
        name: String,
    },
    /// A row has a different number of cells than the header.
    #[error("line {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        /// 1-based line number of the offending record.
        line: u64,
        /// Number of header cells.
        expected: usize,
        /// Number of cells in the offending record.
        found: usize,
    },
    /// Any other reader failure (invalid UTF-8, I/O).
    #[error("malformed input{}: {message}", line_suffix(.line))]
    Malformed {
        /// 1-based line number, when the reader knows it.
        line: Option<u64>,
        /// Reader-provided description.
        message: String,
    },
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| alloc::format!(" at line {l}"))
        .unwrap_or_default()
}

/// A referenced column is absent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The named column does not exist in the table.
    #[error("missing column `{column}`")]
    MissingColumn {
        /// The requested column name.
        column: String,
    },
}

impl SchemaError {
    /// Convenience constructor for [`SchemaError::MissingColumn`].
    pub fn missing(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}

/// A chart or transform precondition on the shape of the data is not met.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DataShapeError {
    /// Not enough distinct categories to draw the chart.
    #[error("{chart} needs at least {needed} categories, found {found}")]
    TooFewCategories {
        /// Chart name.
        chart: &'static str,
        /// Minimum number of categories.
        needed: usize,
        /// Number of categories present.
        found: usize,
    },
    /// Bin thresholds are not finite and strictly ascending.
    #[error("bin thresholds must be finite and strictly ascending")]
    InvalidThresholds,
    /// A map chart was requested without a geometry collection.
    #[error("{chart} requires a geometry collection")]
    MissingGeometry {
        /// Chart name.
        chart: &'static str,
    },
    /// A parameter is outside its accepted range.
    #[error("invalid `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Any pipeline failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// See [`ParseError`].
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// See [`SchemaError`].
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// See [`DataShapeError`].
    #[error(transparent)]
    DataShape(#[from] DataShapeError),
}

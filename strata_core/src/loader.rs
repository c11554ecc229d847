// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delimited-text loading (requires the `std` feature).

extern crate std;

use alloc::string::ToString;
use alloc::vec::Vec;

use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};

use crate::error::ParseError;
use crate::table::Table;
use crate::value::Value;

/// Parses delimited text (with a header row) into a [`Table`].
///
/// Cells are typed by [`Value::infer`]: decimal literals become numbers, empty cells become
/// nulls, and everything else stays text. Rows whose cell count differs from the header are an
/// error rather than being padded or truncated.
#[derive(Clone, Copy, Debug)]
pub struct TableLoader {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Whether surrounding whitespace is trimmed from headers and cells.
    pub trim: bool,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: true,
        }
    }
}

impl TableLoader {
    /// Creates a comma-separated loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter (for example `b'\t'`).
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote character.
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Enables or disables whitespace trimming.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parses `text` into a table.
    pub fn load(&self, text: &str) -> Result<Table, ParseError> {
        self.load_reader(text.as_bytes())
    }

    /// Parses delimited text from any reader.
    pub fn load_reader<R: std::io::Read>(&self, reader: R) -> Result<Table, ParseError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let header = rdr.headers().map_err(map_csv_error)?.clone();
        if header.is_empty() || header.iter().all(str::is_empty) {
            return Err(ParseError::MissingHeader);
        }
        let mut table = Table::new(header.iter().map(ToString::to_string))?;

        let mut record = StringRecord::new();
        loop {
            match rdr.read_record(&mut record) {
                Ok(true) => {
                    let values: Vec<Value> = record.iter().map(Value::infer).collect();
                    table.push_row(values)?;
                }
                Ok(false) => break,
                Err(err) => return Err(map_csv_error(err)),
            }
        }

        tracing::debug!(
            columns = table.columns().len(),
            rows = table.len(),
            "loaded table"
        );
        Ok(table)
    }
}

fn map_csv_error(err: csv::Error) -> ParseError {
    let line = err.position().map(csv::Position::line);
    match err.kind() {
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => ParseError::RaggedRow {
            line: pos.as_ref().map_or(line.unwrap_or(0), csv::Position::line),
            expected: usize::try_from(*expected_len).unwrap_or(usize::MAX),
            found: usize::try_from(*len).unwrap_or(usize::MAX),
        },
        _ => ParseError::Malformed {
            line,
            message: err.to_string(),
        },
    }
}

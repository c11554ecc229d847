// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell values and hashable categorical keys.

extern crate alloc;

use alloc::string::{String, ToString};
use core::fmt;

/// A single table cell.
///
/// Cells are inferred once at load time: anything that parses fully as a decimal literal is a
/// [`Value::Number`], empty cells are [`Value::Null`], and everything else is kept as text.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// An empty cell.
    #[default]
    Null,
    /// A numeric cell.
    Number(f64),
    /// A non-numeric cell.
    Text(String),
}

impl Value {
    /// Infers a value from raw cell text.
    ///
    /// The input is expected to be trimmed already. Words such as `inf` or `NaN` are kept as text,
    /// even though `f64::from_str` would accept them.
    pub fn infer(cell: &str) -> Self {
        if cell.is_empty() {
            return Self::Null;
        }
        if is_decimal_literal(cell)
            && let Ok(v) = cell.parse::<f64>()
        {
            return Self::Number(v);
        }
        Self::Text(cell.to_string())
    }

    /// Returns the numeric value, if this is a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Returns the text value, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for empty cells.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the categorical key for this value.
    pub fn key(&self) -> Key {
        Key::from(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A hashable categorical value.
///
/// Keys identify groups, categories, entities, and series. Numbers compare by bit pattern (with
/// `-0.0` folded into `0.0`), so a key built from a year column groups the same way a text key
/// does.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// The key of an empty cell.
    Null,
    /// A numeric key, stored as `f64` bits.
    Number(u64),
    /// A text key.
    Text(String),
}

impl Key {
    /// Creates a numeric key.
    pub fn number(v: f64) -> Self {
        let v = if v == 0.0 { 0.0 } else { v };
        Self::Number(v.to_bits())
    }

    /// Creates a text key.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns the numeric value for numeric keys.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Returns the text for text keys.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the key back into a cell value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Number(bits) => Value::Number(f64::from_bits(*bits)),
            Self::Text(s) => Value::Text(s.clone()),
        }
    }
}

impl From<&Value> for Key {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Number(v) => Self::number(*v),
            Value::Text(s) => Self::Text(s.clone()),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Returns `true` if `s` is `[+-]digits[.digits][(e|E)[+-]digits]`, allowing a bare leading or
/// trailing `.` as long as the mantissa has at least one digit.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let mut mantissa_digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        mantissa_digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let mut exp_digits = 0;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            exp_digits += 1;
        }
        if exp_digits == 0 {
            return false;
        }
    }

    i == bytes.len()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn infers_numbers_text_and_null() {
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("42"), Value::Number(42.0));
        assert_eq!(Value::infer("-3.5"), Value::Number(-3.5));
        assert_eq!(Value::infer("+.5"), Value::Number(0.5));
        assert_eq!(Value::infer("1e3"), Value::Number(1000.0));
        assert_eq!(Value::infer("2.5E-1"), Value::Number(0.25));
        assert_eq!(Value::infer("Chad"), Value::from("Chad"));
    }

    #[test]
    fn rejects_partial_and_special_numbers() {
        assert_eq!(Value::infer("12abc"), Value::from("12abc"));
        assert_eq!(Value::infer("1e"), Value::from("1e"));
        assert_eq!(Value::infer("."), Value::from("."));
        assert_eq!(Value::infer("inf"), Value::from("inf"));
        assert_eq!(Value::infer("NaN"), Value::from("NaN"));
        assert_eq!(Value::infer("1,000"), Value::from("1,000"));
    }

    #[test]
    fn numeric_keys_fold_negative_zero() {
        assert_eq!(Key::number(-0.0), Key::number(0.0));
        assert_eq!(Value::Number(2020.0).key(), Key::number(2020.0));
        assert_eq!(std::format!("{}", Key::number(2020.0)), "2020");
    }
}

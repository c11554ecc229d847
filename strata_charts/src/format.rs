// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number formatting for tick labels and tooltips.

extern crate alloc;

use alloc::string::{String, ToString};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Formats a tick so every label on an axis with spacing `step` uses the same precision.
pub(crate) fn format_tick(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let decimals = decimals_for_step(step);
    let v = normalize_zero(round_to(v, decimals));
    alloc::format!("{v:.decimals$}")
}

/// Formats a data value for a tooltip: at most two decimals, trailing zeros dropped.
pub(crate) fn format_value(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let v = normalize_zero(round_to(v, 2));
    let mut s = alloc::format!("{v:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Formats an optional value, spelling out missing data.
pub(crate) fn format_opt(v: Option<f64>) -> String {
    v.map_or_else(|| String::from("no data"), format_value)
}

// Smallest precision that makes `step * 10^d` integral, so 2.5 -> 1 and 0.25 -> 2.
fn decimals_for_step(step: f64) -> usize {
    let step = step.abs();
    if step == 0.0 || !step.is_finite() {
        return 0;
    }
    (0..=6_i32)
        .find(|&d| {
            let x = step * 10_f64.powi(d);
            (x - x.round()).abs() <= 1e-9 * x.abs().max(1.0)
        })
        .map_or(6, |d| usize::try_from(d).unwrap_or(6))
}

fn round_to(x: f64, decimals: usize) -> f64 {
    let factor = 10_f64.powi(i32::try_from(decimals.min(9)).unwrap_or(9));
    (x * factor).round() / factor
}

fn normalize_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn ticks_share_precision_with_their_step() {
        assert_eq!(format_tick(10.0, 2.0), "10");
        assert_eq!(format_tick(5.0, 2.5), "5.0");
        assert_eq!(format_tick(0.25, 0.25), "0.25");
        assert_eq!(format_tick(-0.0, 0.2), "0.0");
    }

    #[test]
    fn tooltip_values_drop_trailing_zeros() {
        assert_eq!(format_value(41.0), "41");
        assert_eq!(format_value(41.256), "41.26");
        assert_eq!(format_value(0.5), "0.5");
        assert_eq!(format_value(-0.001), "0");
        assert_eq!(format_opt(None), "no data");
    }
}

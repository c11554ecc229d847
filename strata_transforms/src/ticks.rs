// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! "Nice" round-number steps shared by bin thresholds and axis scales.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Rounds `step` to 1, 2, 5 or 10 times a power of ten.
///
/// Returns `0.0` for non-finite or non-positive input.
pub fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Returns evenly spaced round values covering `[min, max]`, aiming for about `count` intervals.
///
/// The first tick is at or below `min` and the last at or above `max`. Reversed bounds are
/// swapped; equal bounds produce a single tick.
pub fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f.min(10_000.0) as u64
        }
    } else {
        0
    };
    (0..=n).map(|i| start + step * i as f64).collect()
}

/// Extends `[min, max]` outward to the first and last of [`nice_ticks`].
pub fn nice_domain(min: f64, max: f64, count: usize) -> (f64, f64) {
    let ticks = nice_ticks(min, max, count);
    match (ticks.first(), ticks.last()) {
        (Some(&lo), Some(&hi)) if ticks.len() >= 2 => (lo, hi),
        _ => (min, max),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn steps_snap_to_one_two_five() {
        assert_eq!(nice_step(0.9), 1.0);
        assert_eq!(nice_step(1.6), 2.0);
        assert_eq!(nice_step(4.0), 5.0);
        assert_eq!(nice_step(8.0), 10.0);
        assert_eq!(nice_step(-1.0), 0.0);
    }

    #[test]
    fn ticks_cover_the_domain() {
        assert_eq!(nice_ticks(0.0, 41.2, 5), [0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(nice_ticks(7.0, 7.0, 5), [7.0]);
        assert!(nice_ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn nice_domain_rounds_outward() {
        assert_eq!(nice_domain(3.0, 97.0, 10), (0.0, 100.0));
        assert_eq!(nice_domain(5.0, 5.0, 10), (5.0, 5.0));
    }
}

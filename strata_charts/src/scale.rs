// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales: mappings from data values into scene coordinates or colors.
//!
//! Discrete scales ([`ScaleBand`], [`ScalePoint`]) are keyed by [`Key`] and keep their domain
//! in the order it was given. Continuous scales ([`ScaleLinear`], [`ScaleSqrt`],
//! [`ScaleSequential`]) map a `(min, max)` domain and never produce NaN for finite input, even
//! when the domain is degenerate.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use hashbrown::HashMap;
use peniko::Color;
use strata_core::{Key, Value};
use strata_transforms::{nice_domain, nice_ticks};

use crate::color::ColorInterpolator;

/// A discrete band scale: one equal-width slot per domain key.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBand {
    domain: Vec<Key>,
    slots: HashMap<Key, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a band scale over `domain` with padding `0.1` inside and out.
    pub fn new(domain: Vec<Key>, range: (f64, f64)) -> Self {
        let slots = domain
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
        Self {
            domain,
            slots,
            range,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the same scale over a different range.
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Returns the domain keys in band order.
    pub fn domain(&self) -> &[Key] {
        &self.domain
    }

    /// Returns the output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.domain.len()
    }

    /// Returns the position of `key` in the domain.
    pub fn index_of(&self, key: &Key) -> Option<usize> {
        self.slots.get(key).copied()
    }

    /// Returns the width of one band.
    pub fn band_width(&self) -> f64 {
        let n = self.count() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let span = (self.range.1 - self.range.0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the distance between the starts of two adjacent bands.
    pub fn step(&self) -> f64 {
        self.band_width() * (1.0 + self.padding_inner)
    }

    /// Returns the start of the band at `index`.
    pub fn x_at(&self, index: usize) -> f64 {
        let start = self.range.0.min(self.range.1);
        start + self.band_width() * self.padding_outer + self.step() * index as f64
    }

    /// Returns the start of the band for `key`.
    pub fn x(&self, key: &Key) -> Option<f64> {
        self.index_of(key).map(|i| self.x_at(i))
    }

    /// Returns the center of the band for `key`.
    pub fn center(&self, key: &Key) -> Option<f64> {
        self.x(key).map(|x| x + self.band_width() * 0.5)
    }
}

/// A discrete point scale: evenly spaced positions, one per domain key.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalePoint {
    domain: Vec<Key>,
    slots: HashMap<Key, usize>,
    range: (f64, f64),
    padding: f64,
}

impl ScalePoint {
    /// Creates a point scale over `domain` with half a step of outer padding.
    pub fn new(domain: Vec<Key>, range: (f64, f64)) -> Self {
        let slots = domain
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
        Self {
            domain,
            slots,
            range,
            padding: 0.5,
        }
    }

    /// Sets the outer padding in point steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Returns the same scale over a different range.
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Returns the domain keys in point order.
    pub fn domain(&self) -> &[Key] {
        &self.domain
    }

    /// Returns the output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns the number of points.
    pub fn count(&self) -> usize {
        self.domain.len()
    }

    /// Returns the position of `key` in the domain.
    pub fn index_of(&self, key: &Key) -> Option<usize> {
        self.slots.get(key).copied()
    }

    /// Returns the distance between adjacent points.
    pub fn step(&self) -> f64 {
        let n = self.count() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let denom = (n - 1.0) + 2.0 * self.padding;
        if denom == 0.0 {
            0.0
        } else {
            (self.range.1 - self.range.0).abs() / denom
        }
    }

    /// Returns the position of the point at `index`.
    ///
    /// A lone point without padding sits at the range midpoint.
    pub fn x_at(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let step = self.step();
        if step == 0.0 {
            return (r0 + r1) * 0.5;
        }
        r0.min(r1) + self.padding * step + step * index as f64
    }

    /// Returns the position of the point for `key`.
    pub fn x(&self, key: &Key) -> Option<f64> {
        self.index_of(key).map(|i| self.x_at(i))
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a scale mapping `domain` onto `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Returns the same scale over a different range.
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Maps a domain value into the range.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 || !denom.is_finite() {
            return (r0 + r1) * 0.5;
        }
        r0 + (x - d0) / denom * (r1 - r0)
    }

    /// Maps a range value back into the domain.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 || !denom.is_finite() {
            return (d0 + d1) * 0.5;
        }
        d0 + (y - r0) / denom * (d1 - d0)
    }

    /// Returns round tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = (
            self.domain.0.min(self.domain.1),
            self.domain.0.max(self.domain.1),
        );
        let eps = (hi - lo).abs() * 1e-9;
        nice_ticks(lo, hi, count)
            .into_iter()
            .filter(|&t| t >= lo - eps && t <= hi + eps)
            .collect()
    }
}

/// A square-root mapping, used to size symbols by area.
///
/// The domain is clamped to be non-negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSqrt {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleSqrt {
    /// Creates a sqrt scale; negative domain bounds are raised to 0.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain: (domain.0.max(0.0), domain.1.max(0.0)),
            range,
        }
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Maps a value; negative and non-finite inputs read as the domain start.
    ///
    /// A degenerate domain maps everything to the range start.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = (self.domain.0.sqrt(), self.domain.1.sqrt());
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 || !denom.is_finite() {
            return r0;
        }
        let x = if x.is_finite() { x.max(0.0) } else { 0.0 };
        r0 + (x.sqrt() - d0) / denom * (r1 - r0)
    }
}

/// A continuous domain normalized to `[0, 1]` and fed to a [`ColorInterpolator`].
#[derive(Clone, Debug)]
pub struct ScaleSequential {
    domain: (f64, f64),
    interpolator: ColorInterpolator,
}

impl ScaleSequential {
    /// Creates a sequential color scale.
    pub fn new(domain: (f64, f64), interpolator: ColorInterpolator) -> Self {
        Self {
            domain,
            interpolator,
        }
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the interpolator.
    pub fn interpolator(&self) -> &ColorInterpolator {
        &self.interpolator
    }

    /// Normalizes `x` into `[0, 1]`; a degenerate domain yields `0.5`.
    pub fn normalize(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let denom = d1 - d0;
        if denom == 0.0 || !denom.is_finite() {
            return 0.5;
        }
        ((x - d0) / denom).clamp(0.0, 1.0)
    }

    /// Maps a value to a color.
    pub fn map(&self, x: f64) -> Color {
        self.interpolator.eval(self.normalize(x))
    }
}

/// Which scale [`resolve_scale`] should build.
#[derive(Clone, Debug)]
pub enum ScaleKind {
    /// [`ScaleBand`].
    Band,
    /// [`ScalePoint`].
    Point,
    /// [`ScaleLinear`].
    Linear,
    /// [`ScaleSequential`] with the given interpolator.
    Sequential(ColorInterpolator),
}

/// Options shared by every [`ScaleKind`]; each kind reads the fields that apply to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScaleOptions {
    /// Explicit discrete domain order. Keys missing from the data are kept.
    pub order: Option<Vec<Key>>,
    /// Band `(inner, outer)` padding, or `(outer, _)` for point scales.
    pub padding: Option<(f64, f64)>,
    /// Extend the continuous domain to round ticks for about this many intervals.
    pub nice: Option<usize>,
    /// Replaces the observed minimum.
    pub domain_min: Option<f64>,
    /// Replaces the observed maximum.
    pub domain_max: Option<f64>,
    /// Extend the continuous domain to include 0.
    pub zero: bool,
}

impl ScaleOptions {
    /// Sets an explicit discrete order.
    pub fn with_order(mut self, order: Vec<Key>) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets padding.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding = Some((inner, outer));
        self
    }

    /// Enables nice domains.
    pub fn with_nice(mut self, count: usize) -> Self {
        self.nice = Some(count);
        self
    }

    /// Overrides domain bounds.
    pub fn with_domain(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    /// Includes 0 in the continuous domain.
    pub fn with_zero(mut self, zero: bool) -> Self {
        self.zero = zero;
        self
    }
}

/// A resolved scale.
#[derive(Clone, Debug)]
pub enum Scale {
    /// A band scale.
    Band(ScaleBand),
    /// A point scale.
    Point(ScalePoint),
    /// A linear scale.
    Linear(ScaleLinear),
    /// A sequential color scale.
    Sequential(ScaleSequential),
}

impl Scale {
    /// Returns the band scale, if this is one.
    pub fn as_band(&self) -> Option<&ScaleBand> {
        match self {
            Self::Band(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the point scale, if this is one.
    pub fn as_point(&self) -> Option<&ScalePoint> {
        match self {
            Self::Point(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the linear scale, if this is one.
    pub fn as_linear(&self) -> Option<&ScaleLinear> {
        match self {
            Self::Linear(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the sequential scale, if this is one.
    pub fn as_sequential(&self) -> Option<&ScaleSequential> {
        match self {
            Self::Sequential(s) => Some(s),
            _ => None,
        }
    }
}

/// Builds a scale of `kind` for `values` over `range`.
///
/// Discrete kinds use distinct non-null keys in first-encounter order (or
/// [`ScaleOptions::order`]); an empty input gives an empty domain. Continuous kinds use the
/// finite numeric extent, falling back to `[0, 1]` when there is none (see [`linear_domain`]).
/// `range` is ignored for sequential scales.
pub fn resolve_scale(
    kind: &ScaleKind,
    values: &[Value],
    range: (f64, f64),
    options: &ScaleOptions,
) -> Scale {
    match kind {
        ScaleKind::Band => {
            let (inner, outer) = options.padding.unwrap_or((0.1, 0.1));
            let domain = discrete_domain(values.iter().map(Value::key), options);
            Scale::Band(ScaleBand::new(domain, range).with_padding(inner, outer))
        }
        ScaleKind::Point => {
            let (padding, _) = options.padding.unwrap_or((0.5, 0.0));
            let domain = discrete_domain(values.iter().map(Value::key), options);
            Scale::Point(ScalePoint::new(domain, range).with_padding(padding))
        }
        ScaleKind::Linear => Scale::Linear(ScaleLinear::new(
            linear_domain(values.iter().filter_map(Value::as_f64), options),
            range,
        )),
        ScaleKind::Sequential(interpolator) => Scale::Sequential(ScaleSequential::new(
            linear_domain(values.iter().filter_map(Value::as_f64), options),
            interpolator.clone(),
        )),
    }
}

/// Distinct non-null keys in first-encounter order, or the explicit order from `options`.
pub fn discrete_domain(keys: impl IntoIterator<Item = Key>, options: &ScaleOptions) -> Vec<Key> {
    if let Some(order) = &options.order {
        return order.clone();
    }
    let mut seen = hashbrown::HashSet::new();
    keys.into_iter()
        .filter(|k| *k != Key::Null && seen.insert(k.clone()))
        .collect()
}

/// Continuous domain for `values` under `options`.
///
/// Order of application: finite extent (or `[0, 1]` when empty), `zero`, explicit bound
/// overrides, then `nice`.
pub fn linear_domain(values: impl IntoIterator<Item = f64>, options: &ScaleOptions) -> (f64, f64) {
    let extent = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        });
    let (mut lo, mut hi) = extent.unwrap_or((0.0, 1.0));
    if options.zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if let Some(min) = options.domain_min.filter(|v| v.is_finite()) {
        lo = min;
    }
    if let Some(max) = options.domain_max.filter(|v| v.is_finite()) {
        hi = max;
    }
    match options.nice {
        Some(count) if lo < hi => nice_domain(lo, hi, count),
        _ => (lo, hi),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn keys(names: &[&str]) -> Vec<Key> {
        names.iter().map(|&n| Key::text(n)).collect()
    }

    #[test]
    fn band_splits_range_with_padding() {
        let s = ScaleBand::new(keys(&["a", "b", "c"]), (0.0, 100.0)).with_padding(0.0, 0.0);
        assert_eq!(s.band_width(), 100.0 / 3.0);
        assert_eq!(s.x(&Key::text("a")), Some(0.0));
        assert!((s.center(&Key::text("b")).unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(s.x(&Key::text("z")), None);

        let padded = ScaleBand::new(keys(&["a", "b"]), (0.0, 100.0));
        // 2 + 0.1 + 0.2 band units
        let bw = 100.0 / 2.3;
        assert!((padded.band_width() - bw).abs() < 1e-9);
        assert!((padded.x_at(0) - 0.1 * bw).abs() < 1e-9);
    }

    #[test]
    fn point_spaces_evenly() {
        let s = ScalePoint::new(keys(&["2019", "2020", "2021"]), (0.0, 60.0));
        // 2 steps + 2 * 0.5 padding
        assert_eq!(s.step(), 20.0);
        assert_eq!(s.x(&Key::text("2019")), Some(10.0));
        assert_eq!(s.x(&Key::text("2021")), Some(50.0));
        let lone = ScalePoint::new(keys(&["a"]), (0.0, 60.0)).with_padding(0.0);
        assert_eq!(lone.x_at(0), 30.0);
    }

    #[test]
    fn degenerate_linear_maps_to_midpoint() {
        let values = [Value::Number(5.0), Value::Number(5.0)];
        let scale = resolve_scale(
            &ScaleKind::Linear,
            &values,
            (0.0, 100.0),
            &ScaleOptions::default(),
        );
        let s = scale.as_linear().unwrap();
        assert_eq!(s.map(5.0), 50.0);
        assert_eq!(s.map(-3.0), 50.0);
        assert!(!s.invert(20.0).is_nan());
    }

    #[test]
    fn linear_maps_and_inverts() {
        let s = ScaleLinear::new((0.0, 10.0), (100.0, 0.0));
        assert_eq!(s.map(0.0), 100.0);
        assert_eq!(s.map(2.5), 75.0);
        assert_eq!(s.invert(75.0), 2.5);
        assert_eq!(s.ticks(5), [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn continuous_domain_options() {
        let opts = ScaleOptions::default().with_zero(true).with_nice(5);
        assert_eq!(linear_domain([3.0, 41.0], &opts), (0.0, 50.0));
        assert_eq!(linear_domain([], &ScaleOptions::default()), (0.0, 1.0));
        let pinned = ScaleOptions::default().with_domain(Some(-1.0), Some(1.0));
        assert_eq!(linear_domain([0.2, f64::NAN], &pinned), (-1.0, 1.0));
    }

    #[test]
    fn discrete_domain_is_first_encounter_order() {
        let values = [
            Value::from("b"),
            Value::Null,
            Value::from("a"),
            Value::from("b"),
        ];
        let scale = resolve_scale(
            &ScaleKind::Band,
            &values,
            (0.0, 1.0),
            &ScaleOptions::default(),
        );
        assert_eq!(scale.as_band().unwrap().domain(), keys(&["b", "a"]));

        let ordered = ScaleOptions::default().with_order(keys(&["a", "b", "c"]));
        let scale = resolve_scale(&ScaleKind::Point, &values, (0.0, 1.0), &ordered);
        assert_eq!(scale.as_point().unwrap().count(), 3);

        let empty = resolve_scale(&ScaleKind::Band, &[], (0.0, 1.0), &ScaleOptions::default());
        assert_eq!(empty.as_band().unwrap().band_width(), 0.0);
    }

    #[test]
    fn sequential_degenerate_uses_interpolator_midpoint() {
        let interp = ColorInterpolator::blues();
        let scale = resolve_scale(
            &ScaleKind::Sequential(interp.clone()),
            &[Value::Number(7.0)],
            (0.0, 0.0),
            &ScaleOptions::default(),
        );
        let s = scale.as_sequential().unwrap();
        assert_eq!(s.normalize(7.0), 0.5);
        assert_eq!(s.map(7.0).to_rgba8(), interp.eval(0.5).to_rgba8());
    }

    #[test]
    fn sqrt_scales_area() {
        let s = ScaleSqrt::new((-5.0, 100.0), (0.0, 20.0));
        assert_eq!(s.domain(), (0.0, 100.0));
        assert_eq!(s.map(25.0), 10.0);
        assert_eq!(s.map(-1.0), 0.0);
        assert_eq!(ScaleSqrt::new((0.0, 0.0), (2.0, 20.0)).map(0.0), 2.0);
    }
}

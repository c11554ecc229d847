// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color interpolators and categorical color assignment.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use peniko::Color;
use peniko::color::palette::css;
use strata_core::Key;

/// The categorical palette used when a style doesn't supply one.
pub const DEFAULT_PALETTE: [Color; 8] = [
    css::CORNFLOWER_BLUE,
    css::ORANGE,
    css::MEDIUM_SEA_GREEN,
    css::CRIMSON,
    css::GOLDENROD,
    css::SLATE_BLUE,
    css::DARK_CYAN,
    css::HOT_PINK,
];

/// A function from `[0, 1]` to a color.
///
/// Inputs outside `[0, 1]` are clamped and NaN reads as `0.5`, so an interpolator never produces
/// an undefined color.
#[derive(Clone)]
pub struct ColorInterpolator(Arc<dyn Fn(f64) -> Color + Send + Sync>);

impl ColorInterpolator {
    /// Wraps an arbitrary interpolation function.
    pub fn new(f: impl Fn(f64) -> Color + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Piecewise-linear interpolation through evenly spaced `stops` (in sRGB).
    ///
    /// No stops yields gray; one stop yields that color everywhere.
    pub fn from_stops(stops: impl Into<Vec<Color>>) -> Self {
        let stops: Vec<Color> = stops.into();
        Self::new(move |t| match stops.as_slice() {
            [] => css::GRAY,
            [only] => *only,
            _ => {
                let segments = stops.len() - 1;
                let scaled = t * segments as f64;
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "t is clamped to [0, 1] so scaled is in [0, segments]"
                )]
                let i = (scaled as usize).min(segments - 1);
                lerp(stops[i], stops[i + 1], scaled - i as f64)
            }
        })
    }

    /// Light to dark blue.
    pub fn blues() -> Self {
        Self::from_stops([
            Color::from_rgba8(0xf7, 0xfb, 0xff, 0xff),
            Color::from_rgba8(0xc6, 0xdb, 0xef, 0xff),
            Color::from_rgba8(0x6b, 0xae, 0xd6, 0xff),
            Color::from_rgba8(0x21, 0x71, 0xb5, 0xff),
            Color::from_rgba8(0x08, 0x30, 0x6b, 0xff),
        ])
    }

    /// Light to dark red.
    pub fn reds() -> Self {
        Self::from_stops([
            Color::from_rgba8(0xfe, 0xe5, 0xd9, 0xff),
            Color::from_rgba8(0xfc, 0xae, 0x91, 0xff),
            Color::from_rgba8(0xfb, 0x6a, 0x4a, 0xff),
            Color::from_rgba8(0xde, 0x2d, 0x26, 0xff),
            Color::from_rgba8(0xa5, 0x0f, 0x15, 0xff),
        ])
    }

    /// A five-stop approximation of viridis.
    pub fn viridis() -> Self {
        Self::from_stops([
            Color::from_rgba8(0x44, 0x01, 0x54, 0xff),
            Color::from_rgba8(0x3b, 0x52, 0x8b, 0xff),
            Color::from_rgba8(0x21, 0x91, 0x8c, 0xff),
            Color::from_rgba8(0x5e, 0xc9, 0x62, 0xff),
            Color::from_rgba8(0xfd, 0xe7, 0x25, 0xff),
        ])
    }

    /// Evaluates the interpolator at `t`.
    pub fn eval(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        (self.0)(t)
    }
}

impl Default for ColorInterpolator {
    fn default() -> Self {
        Self::blues()
    }
}

impl fmt::Debug for ColorInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ColorInterpolator(..)")
    }
}

fn lerp(a: Color, b: Color, t: f64) -> Color {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "t is in [0, 1]; f32 precision is plenty for color channels"
    )]
    let t = t as f32;
    let [a0, a1, a2, a3] = a.components;
    let [b0, b1, b2, b3] = b.components;
    Color::new([
        a0 + (b0 - a0) * t,
        a1 + (b1 - a1) * t,
        a2 + (b2 - a2) * t,
        a3 + (b3 - a3) * t,
    ])
}

/// Maps category keys to colors.
///
/// Keys with an explicit assignment always get it; every other key takes the next palette entry
/// in domain order, cycling when the palette runs out.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoricalColors {
    assigned: HashMap<Key, Color>,
    palette: Vec<Color>,
}

impl CategoricalColors {
    /// Creates an assignment with the given fallback palette.
    pub fn new(palette: impl Into<Vec<Color>>) -> Self {
        Self {
            assigned: HashMap::new(),
            palette: palette.into(),
        }
    }

    /// Pins `key` to `color`.
    pub fn with_color(mut self, key: impl Into<Key>, color: Color) -> Self {
        self.assigned.insert(key.into(), color);
        self
    }

    /// Returns the explicit color for `key`, if any.
    pub fn assigned(&self, key: &Key) -> Option<Color> {
        self.assigned.get(key).copied()
    }

    /// Returns the fallback palette.
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Resolves one color per domain key.
    pub fn resolve(&self, domain: &[Key]) -> Vec<Color> {
        let mut next = 0;
        domain
            .iter()
            .map(|key| {
                self.assigned(key).unwrap_or_else(|| {
                    let color = if self.palette.is_empty() {
                        css::GRAY
                    } else {
                        self.palette[next % self.palette.len()]
                    };
                    next += 1;
                    color
                })
            })
            .collect()
    }
}

impl Default for CategoricalColors {
    fn default() -> Self {
        Self::new(DEFAULT_PALETTE)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn stops_interpolate_and_clamp() {
        let black = Color::from_rgba8(0, 0, 0, 255);
        let white = Color::from_rgba8(255, 255, 255, 255);
        let i = ColorInterpolator::from_stops([black, white]);
        assert_eq!(i.eval(0.0).to_rgba8(), black.to_rgba8());
        assert_eq!(i.eval(1.0).to_rgba8(), white.to_rgba8());
        assert_eq!(i.eval(7.0).to_rgba8(), white.to_rgba8());
        assert_eq!(i.eval(f64::NAN).to_rgba8(), i.eval(0.5).to_rgba8());
        let mid = i.eval(0.5).to_rgba8();
        assert!((127..=128).contains(&mid.r));
    }

    #[test]
    fn explicit_colors_win_and_the_rest_cycle() {
        let colors = CategoricalColors::new([css::RED, css::BLUE]).with_color("Stable", css::GREEN);
        let domain = [
            Key::text("Conflict"),
            Key::text("Stable"),
            Key::text("Recovery"),
            Key::text("Other"),
        ];
        assert_eq!(
            colors.resolve(&domain),
            [css::RED, css::GREEN, css::BLUE, css::RED]
        );
    }
}

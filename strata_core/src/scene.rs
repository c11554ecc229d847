// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable scene primitives.
//!
//! A [`Scene`] is the only thing handed to a renderer. Every coordinate is already resolved into
//! scene units and nothing refers back to tables or scales, so painting is a straight walk over
//! [`Scene::primitives`].

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Circle, Line, Point, Rect, Shape as _};
use peniko::Color;

/// Horizontal anchoring for text.
///
/// In SVG terms, this maps to the `text-anchor` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Anchor at the start (left in LTR).
    #[default]
    Start,
    /// Anchor in the middle.
    Middle,
    /// Anchor at the end (right in LTR).
    End,
}

/// Vertical alignment for text.
///
/// In SVG terms, this maps to the `dominant-baseline` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Baseline is centered on the anchor point.
    #[default]
    Middle,
    /// Baseline is the font's alphabetic baseline.
    Alphabetic,
    /// Baseline is the font's hanging baseline.
    Hanging,
}

/// A positioned run of unshaped text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextShape {
    /// Anchor position in scene coordinates.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Horizontal anchoring relative to [`TextShape::pos`].
    pub anchor: TextAnchor,
    /// Vertical alignment relative to [`TextShape::pos`].
    pub baseline: TextBaseline,
    /// Rotation in degrees, positive clockwise.
    pub angle: f64,
}

/// The geometry of a primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A vector path.
    Path(BezPath),
    /// A circle.
    Circle(Circle),
    /// A straight line segment.
    Line(Line),
    /// A text item.
    Text(TextShape),
}

impl Shape {
    /// Returns the bounding box, when it is known without shaping text.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(*r),
            Self::Path(p) => Some(p.bounding_box()),
            Self::Circle(c) => Some(c.bounding_box()),
            Self::Line(l) => Some(l.bounding_box()),
            Self::Text(_) => None,
        }
    }
}

/// What a primitive is filled with.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Fill {
    /// No fill (stroke-only shapes).
    #[default]
    None,
    /// A concrete color.
    Color(Color),
    /// The entity has no data; renderers pick their own "missing" treatment.
    ///
    /// This is kept distinct from any data color so a missing value is never drawn as if it
    /// were zero.
    NoData,
}

impl From<Color> for Fill {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

/// A solid stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in scene coordinates.
    pub width: f64,
}

impl Stroke {
    /// Creates a stroke.
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Paint attributes of a primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    /// Fill reference.
    pub fill: Fill,
    /// Optional stroke.
    pub stroke: Option<Stroke>,
    /// Opacity in `[0, 1]`, applied to fill and stroke.
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Fill::None,
            stroke: None,
            opacity: 1.0,
        }
    }
}

/// One draw primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    /// Geometry.
    pub shape: Shape,
    /// Paint.
    pub style: Style,
    /// Paint-order hint; higher values are drawn above lower ones.
    pub z_index: i32,
    /// Optional hover text.
    pub tooltip: Option<String>,
}

impl Primitive {
    /// Creates an unstyled primitive at z-index `0`.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            style: Style::default(),
            z_index: 0,
            tooltip: None,
        }
    }

    /// Creates a rectangle primitive.
    pub fn rect(rect: Rect) -> Self {
        Self::new(Shape::Rect(rect))
    }

    /// Creates a path primitive.
    pub fn path(path: BezPath) -> Self {
        Self::new(Shape::Path(path))
    }

    /// Creates a circle primitive.
    pub fn circle(center: impl Into<Point>, radius: f64) -> Self {
        Self::new(Shape::Circle(Circle::new(center, radius)))
    }

    /// Creates a line primitive.
    pub fn line(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self::new(Shape::Line(Line::new(p0, p1)))
    }

    /// Creates a text primitive with start anchoring and a middle baseline.
    pub fn text(pos: impl Into<Point>, text: impl Into<String>, font_size: f64) -> Self {
        Self::new(Shape::Text(TextShape {
            pos: pos.into(),
            text: text.into(),
            font_size,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Middle,
            angle: 0.0,
        }))
    }

    /// Sets the fill reference.
    pub fn with_fill(mut self, fill: impl Into<Fill>) -> Self {
        self.style.fill = fill.into();
        self
    }

    /// Sets a stroke.
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.style.stroke = Some(Stroke::new(color, width));
        self
    }

    /// Sets the opacity, clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.style.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the hover text.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Sets text anchoring. No-op for non-text shapes.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        if let Shape::Text(t) = &mut self.shape {
            t.anchor = anchor;
        }
        self
    }

    /// Sets the text baseline. No-op for non-text shapes.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        if let Shape::Text(t) = &mut self.shape {
            t.baseline = baseline;
        }
        self
    }

    /// Sets text rotation in degrees. No-op for non-text shapes.
    pub fn with_angle(mut self, angle: f64) -> Self {
        if let Shape::Text(t) = &mut self.shape {
            t.angle = angle;
        }
        self
    }
}

/// The output of a chart build: primitives in paint order plus the view size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// View width in scene coordinates.
    pub width: f64,
    /// View height in scene coordinates.
    pub height: f64,
    primitives: Vec<Primitive>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    /// Creates a scene holding a single centered message, used when a chart cannot be built.
    pub fn placeholder(width: f64, height: f64, message: impl Into<String>, color: Color) -> Self {
        let mut scene = Self::new(width, height);
        scene.push(
            Primitive::text((width * 0.5, height * 0.5), message, 12.0)
                .with_anchor(TextAnchor::Middle)
                .with_fill(color),
        );
        scene
    }

    /// Appends a primitive.
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Returns primitives in their current order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Consumes the scene, returning its primitives.
    pub fn into_primitives(self) -> Vec<Primitive> {
        self.primitives
    }

    /// Returns the number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns `true` if the scene has no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Stable-sorts primitives by z-index so insertion order breaks ties.
    pub fn sort_by_z(&mut self) {
        self.primitives.sort_by_key(|p| p.z_index);
    }

    /// Returns the union of all known primitive bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.primitives
            .iter()
            .filter_map(|p| p.shape.bounds())
            .reduce(|a, b| a.union(b))
    }

    /// Iterates primitives that carry a tooltip.
    pub fn tooltips(&self) -> impl Iterator<Item = (&Primitive, &str)> + '_ {
        self.primitives
            .iter()
            .filter_map(|p| p.tooltip.as_deref().map(|t| (p, t)))
    }
}

impl Extend<Primitive> for Scene {
    fn extend<T: IntoIterator<Item = Primitive>>(&mut self, iter: T) {
        self.primitives.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn sort_by_z_is_stable() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.push(Primitive::rect(Rect::new(0.0, 0.0, 1.0, 1.0)).with_z_index(10));
        scene.push(Primitive::rect(Rect::new(1.0, 0.0, 2.0, 1.0)).with_z_index(0));
        scene.push(Primitive::rect(Rect::new(2.0, 0.0, 3.0, 1.0)).with_z_index(0));
        scene.sort_by_z();

        let xs: Vec<f64> = scene
            .primitives()
            .iter()
            .map(|p| p.shape.bounds().unwrap().x0)
            .collect();
        assert_eq!(xs, [1.0, 2.0, 0.0]);
    }

    #[test]
    fn bounds_skip_text() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(Primitive::text((50.0, 50.0), "label", 12.0));
        assert_eq!(scene.bounds(), None);
        scene.push(Primitive::circle((5.0, 5.0), 2.0));
        scene.push(Primitive::line((0.0, 0.0), (1.0, 9.0)));
        assert_eq!(scene.bounds(), Some(Rect::new(0.0, 0.0, 7.0, 9.0)));
    }

    #[test]
    fn placeholder_carries_message() {
        let scene = Scene::placeholder(200.0, 100.0, "Error loading chart", css::BLACK);
        let [p] = scene.primitives() else {
            panic!("expected one primitive");
        };
        let Shape::Text(t) = &p.shape else {
            panic!("expected text");
        };
        assert_eq!(t.text, "Error loading chart");
        assert_eq!(t.pos, Point::new(100.0, 50.0));
    }

    #[test]
    fn opacity_is_clamped() {
        let p = Primitive::rect(Rect::ZERO).with_opacity(3.0);
        assert_eq!(p.style.opacity, 1.0);
        assert_eq!(p.with_fill(Fill::NoData).style.fill, Fill::NoData);
    }
}

// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG output for strata scenes.

use std::fmt::Write as _;

use peniko::Color;
use strata_charts::ChartStyle;
use strata_core::{Fill, Primitive, Scene, Shape, TextAnchor, TextBaseline};

/// Writes `scene` as a standalone SVG document.
///
/// Primitives are written in scene order, so a scene sorted by z-index layers correctly.
/// [`Fill::NoData`] resolves to the style's no-data color.
pub(crate) fn scene_to_svg(scene: &Scene, style: &ChartStyle) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = scene.width,
        h = scene.height,
    );
    let _ = writeln!(
        out,
        r##"<rect x="0" y="0" width="{}" height="{}" fill="#ffffff"/>"##,
        scene.width, scene.height
    );
    for p in scene.primitives() {
        write_primitive(&mut out, p, style);
    }
    out.push_str("</svg>\n");
    out
}

fn write_primitive(out: &mut String, p: &Primitive, style: &ChartStyle) {
    let text_body = match &p.shape {
        Shape::Rect(r) => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                r.x0,
                r.y0,
                r.width(),
                r.height()
            );
            None
        }
        Shape::Path(path) => {
            let _ = write!(out, r#"<path d="{}""#, path.to_svg());
            None
        }
        Shape::Circle(c) => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                c.center.x, c.center.y, c.radius
            );
            None
        }
        Shape::Line(l) => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                l.p0.x, l.p0.y, l.p1.x, l.p1.y
            );
            None
        }
        Shape::Text(t) => {
            let baseline = match t.baseline {
                TextBaseline::Middle => "middle",
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Hanging => "hanging",
            };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" font-family="sans-serif" dominant-baseline="{}""#,
                t.pos.x, t.pos.y, t.font_size, baseline
            );
            if t.angle != 0.0 {
                let _ = write!(
                    out,
                    r#" transform="rotate({} {} {})""#,
                    t.angle, t.pos.x, t.pos.y
                );
            }
            out.push_str(match t.anchor {
                TextAnchor::Start => r#" text-anchor="start""#,
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
            Some(t.text.as_str())
        }
    };

    match p.style.fill {
        Fill::None => out.push_str(r#" fill="none""#),
        Fill::Color(c) => write_paint_attr(out, "fill", c),
        Fill::NoData => write_paint_attr(out, "fill", style.no_data_color),
    }
    if let Some(stroke) = p.style.stroke {
        write_paint_attr(out, "stroke", stroke.color);
        let _ = write!(out, r#" stroke-width="{}""#, stroke.width);
    }
    if p.style.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, p.style.opacity);
    }

    // Tooltips become SVG <title> children, which browsers show on hover.
    let tooltip = p.tooltip.as_deref();
    match (text_body, tooltip) {
        (None, None) => out.push_str("/>\n"),
        (body, tooltip) => {
            out.push('>');
            if let Some(tip) = tooltip {
                let _ = write!(out, "<title>{}</title>", escape_xml(tip));
            }
            if let Some(body) = body {
                out.push_str(&escape_xml(body));
            }
            let tag = match &p.shape {
                Shape::Rect(_) => "rect",
                Shape::Path(_) => "path",
                Shape::Circle(_) => "circle",
                Shape::Line(_) => "line",
                Shape::Text(_) => "text",
            };
            let _ = writeln!(out, "</{tag}>");
        }
    }
}

fn write_paint_attr(out: &mut String, name: &str, color: Color) {
    let rgba = color.to_rgba8();
    let _ = write!(
        out,
        r##" {name}="#{:02x}{:02x}{:02x}""##,
        rgba.r, rgba.g, rgba.b
    );
    if rgba.a != 255 {
        let _ = write!(out, r#" {name}-opacity="{}""#, f64::from(rgba.a) / 255.0);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn no_data_resolves_to_the_style_color() {
        let mut scene = Scene::new(100.0, 50.0);
        scene.push(
            Primitive::rect(Rect::new(0.0, 0.0, 10.0, 10.0))
                .with_fill(Fill::NoData)
                .with_tooltip("Mali: no data"),
        );
        scene.push(Primitive::rect(Rect::new(10.0, 0.0, 20.0, 10.0)).with_fill(css::RED));
        let style = ChartStyle::default().with_no_data_color(Color::from_rgba8(1, 2, 3, 255));
        let svg = scene_to_svg(&scene, &style);
        assert!(svg.contains(r##"fill="#010203"><title>Mali: no data</title></rect>"##));
        assert!(svg.contains(r##"fill="#ff0000"/>"##));
    }

    #[test]
    fn text_is_escaped_and_rotated() {
        let mut scene = Scene::new(100.0, 50.0);
        scene.push(
            Primitive::text((5.0, 5.0), "A & B", 10.0)
                .with_angle(-90.0)
                .with_fill(css::BLACK),
        );
        let svg = scene_to_svg(&scene, &ChartStyle::default());
        assert!(svg.contains(r#"transform="rotate(-90 5 5)""#));
        assert!(svg.contains(">A &amp; B</text>"));
    }
}

// Copyright 2026 the Settee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG serialization for chart scenes.

use kurbo::Rect;
use peniko::Brush;

use crate::{Mark, MarkPayload, TextAnchor, TextBaseline};

/// A rendered chart: a view rectangle and its marks.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Outer bounds; becomes the SVG `viewBox`.
    pub view: Rect,
    /// Marks in generation order.
    pub marks: Vec<Mark>,
}

impl Scene {
    /// Returns the marks in paint order: by `z_index`, then by id.
    pub fn paint_order(&self) -> Vec<&Mark> {
        let mut marks: Vec<&Mark> = self.marks.iter().collect();
        marks.sort_by_key(|m| (m.z_index, m.id));
        marks
    }

    /// Serializes the scene as a standalone SVG document.
    pub fn to_svg_string(&self) -> String {
        let view = self.view;
        let mut out = String::new();
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}" font-family="sans-serif">"#,
            view.x0,
            view.y0,
            view.width(),
            view.height(),
            view.width(),
            view.height()
        ));
        out.push('\n');

        for mark in self.paint_order() {
            match &mark.payload {
                MarkPayload::Rect(r) => {
                    out.push_str(&format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                        r.rect.x0,
                        r.rect.y0,
                        r.rect.width(),
                        r.rect.height(),
                    ));
                    write_paint_attr(&mut out, "fill", &r.fill);
                    out.push_str("/>\n");
                }
                MarkPayload::Text(t) => {
                    let baseline = match t.baseline {
                        TextBaseline::Middle => "middle",
                        TextBaseline::Alphabetic => "alphabetic",
                        TextBaseline::Hanging => "hanging",
                    };
                    out.push_str(&format!(
                        r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
                        t.pos.x, t.pos.y, t.font_size, baseline
                    ));
                    if t.angle != 0.0 {
                        out.push_str(&format!(
                            r#" transform="rotate({} {} {})""#,
                            t.angle, t.pos.x, t.pos.y
                        ));
                    }
                    out.push_str(match t.anchor {
                        TextAnchor::Start => r#" text-anchor="start""#,
                        TextAnchor::Middle => r#" text-anchor="middle""#,
                        TextAnchor::End => r#" text-anchor="end""#,
                    });
                    write_paint_attr(&mut out, "fill", &t.fill);
                    out.push('>');
                    out.push_str(&escape_xml(&t.text));
                    out.push_str("</text>\n");
                }
                MarkPayload::Rule(r) => {
                    out.push_str(&format!(
                        r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                        r.line.p0.x, r.line.p0.y, r.line.p1.x, r.line.p1.y
                    ));
                    write_paint_attr(&mut out, "stroke", &r.stroke);
                    out.push_str(&format!(r#" stroke-width="{}""#, r.stroke_width));
                    out.push_str("/>\n");
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let value = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = (rgba.a != 255).then(|| f64::from(rgba.a) / 255.0);
            (value, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
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
    use kurbo::Point;
    use peniko::Color;

    use super::*;
    use crate::{MarkId, RectMarkSpec, TextMarkSpec};

    #[test]
    fn marks_serialize_in_paint_order() {
        let scene = Scene {
            view: Rect::new(0.0, 0.0, 100.0, 50.0),
            marks: vec![
                TextMarkSpec::new(MarkId::from_raw(2), Point::new(5.0, 5.0), "R&D <q1>").mark(),
                RectMarkSpec::new(MarkId::from_raw(1), Rect::new(0.0, 0.0, 10.0, 10.0))
                    .with_fill(Color::from_rgb8(0x1f, 0x77, 0xb4))
                    .mark(),
            ],
        };
        let svg = scene.to_svg_string();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 50""#));
        let rect = svg.find("<rect").expect("rect emitted");
        let text = svg.find("<text").expect("text emitted");
        assert!(rect < text, "series fill paints before titles");
        assert!(svg.contains(r##"fill="#1f77b4""##));
        assert!(svg.contains("R&amp;D &lt;q1&gt;"));
        assert!(svg.ends_with("</svg>\n"));
    }
}

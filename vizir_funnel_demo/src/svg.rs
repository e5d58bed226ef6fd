// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump utilities for `vizir_funnel_demo`.

use kurbo::Rect;
use peniko::Brush;
use vizir_funnel::{FunnelMark, MarkPayload};

#[derive(Debug, Default)]
pub(crate) struct SvgScene {
    marks: Vec<FunnelMark>,
    view_box: Option<Rect>,
}

impl SvgScene {
    pub(crate) fn set_view_box(&mut self, view_box: Rect) {
        self.view_box = Some(view_box);
    }

    pub(crate) fn set_marks(&mut self, mut marks: Vec<FunnelMark>) {
        marks.sort_by_key(|m| (m.z_index, m.key));
        self.marks = marks;
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let view_box = match (self.view_box, self.marks_bounds()) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };
        let view_box = view_box.unwrap_or_else(|| Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut out = String::new();

        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}" preserveAspectRatio="xMinYMin meet">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        ));
        out.push('\n');

        for mark in &self.marks {
            match &mark.payload {
                MarkPayload::Slice { path, fill } | MarkPayload::Link { path, fill } => {
                    let d = path.to_svg();
                    out.push_str(&format!(r#"<path d="{d}""#));
                    write_paint_attr(&mut out, "fill", fill);
                    out.push_str("/>\n");
                }
                MarkPayload::Tick {
                    line,
                    stroke,
                    stroke_width,
                } => {
                    out.push_str(&format!(
                        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke-width="{}""#,
                        line.p0.x, line.p0.y, line.p1.x, line.p1.y, stroke_width
                    ));
                    write_paint_attr(&mut out, "stroke", stroke);
                    out.push_str("/>\n");
                }
                MarkPayload::Label {
                    rect,
                    text,
                    font_size,
                    angle,
                    fill,
                } => {
                    let c = rect.center();
                    out.push_str(&format!(
                        r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="middle" text-anchor="middle""#,
                        c.x, c.y, font_size
                    ));
                    if *angle != 0.0 {
                        out.push_str(&format!(r#" transform="rotate({angle} {} {})""#, c.x, c.y));
                    }
                    write_paint_attr(&mut out, "fill", fill);
                    out.push('>');
                    out.push_str(&escape_xml(text));
                    out.push_str("</text>\n");
                }
            }
        }

        out.push_str("</svg>\n");
        out
    }

    fn marks_bounds(&self) -> Option<Rect> {
        let rect = self
            .marks
            .iter()
            .map(FunnelMark::bounds)
            .reduce(|a, b| a.union(b))?;
        // Add a small padding margin.
        Some(rect.inflate(10.0, 10.0))
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let fill_opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, fill_opacity)
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

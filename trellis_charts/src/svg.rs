// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG serialization of a [`Scene`].
//!
//! Marks are written in `(z_index, MarkId)` order. Class names become `class` attributes, so the
//! output can be queried the same way the scene can. Marks still carrying a fade-in get an
//! `<animate>` child on `opacity`.

use std::fmt::Write as _;

use peniko::Brush;
use trellis_core::{Mark, MarkPayload, Scene, TextAnchor, TextBaseline, Transition, TransitionKind};

/// Writes `scene` as a standalone `<svg>` element of the given size.
pub fn scene_to_svg(scene: &Scene, width: f64, height: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
    );
    for mark in scene.sorted_marks() {
        write_mark(&mut out, mark);
    }
    out.push_str("</svg>\n");
    out
}

fn write_mark(out: &mut String, mark: &Mark) {
    let tag = match &mark.payload {
        MarkPayload::Rect(r) => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                r.rect.x0,
                r.rect.y0,
                r.rect.width(),
                r.rect.height(),
            );
            write_paint_attr(out, "fill", &r.fill);
            "rect"
        }
        MarkPayload::Text(t) => {
            let baseline = match t.baseline {
                TextBaseline::Middle => "middle",
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Hanging => "hanging",
                TextBaseline::Ideographic => "ideographic",
            };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
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
            write_paint_attr(out, "fill", &t.fill);
            "text"
        }
        MarkPayload::Path(p) => {
            let _ = write!(out, r#"<path d="{}""#, p.path.to_svg());
            write_paint_attr(out, "fill", &p.fill);
            if p.stroke_width > 0.0 {
                write_paint_attr(out, "stroke", &p.stroke);
                let _ = write!(out, r#" stroke-width="{}""#, p.stroke_width);
            }
            if !p.dash.is_empty() {
                let dash: Vec<String> = p.dash.iter().map(f64::to_string).collect();
                let _ = write!(out, r#" stroke-dasharray="{}""#, dash.join(" "));
            }
            "path"
        }
    };
    if !mark.classes.is_empty() {
        let _ = write!(out, r#" class="{}""#, mark.classes.join(" "));
    }
    if let Some(t) = mark.transition.filter(|t| t.kind == TransitionKind::Tween) {
        let _ = write!(out, r#" style="transition: all {}ms""#, t.duration_ms);
    }
    out.push('>');

    if let MarkPayload::Text(t) = &mark.payload {
        out.push_str(&escape_xml(&t.text));
    }
    if let Some(t) = mark.transition.filter(|t| t.kind == TransitionKind::FadeIn) {
        write_fade_in(out, t);
    }
    let _ = writeln!(out, "</{tag}>");
}

fn write_fade_in(out: &mut String, t: Transition) {
    let _ = write!(
        out,
        r#"<animate attributeName="opacity" from="0" to="1" begin="{}ms" dur="{}ms" fill="freeze"/>"#,
        t.delay_ms, t.duration_ms
    );
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (fill, opacity)
        }
        _ => ("none".to_owned(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
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

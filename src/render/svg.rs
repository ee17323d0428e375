//! SVG serialization of a scene container

use super::commands::{num, path_data, DrawCommand};
use super::surface::{DrawingSurface, SceneSurface};
use crate::stream::error::{Result, StreamGraphError};
use std::fmt::Write;

const AXIS_COLOR: &str = "#444444";
const TICK_LENGTH: f64 = 5.0;
const FONT_FAMILY: &str = "sans-serif";

/// Standalone SVG document for one container, nodes in paint order
pub fn to_svg(surface: &SceneSurface, container: &str) -> Result<String> {
    let (width, height) = surface
        .container_size(container)
        .ok_or_else(|| StreamGraphError::MountTargetMissing(container.to_string()))?;

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
        w = num(width),
        h = num(height),
        font = FONT_FAMILY
    );
    for node in surface.nodes(container) {
        write_command(&mut out, &node.command);
    }
    out.push_str("</svg>\n");
    Ok(out)
}

/// `data:image/svg+xml;base64,...` URI for an SVG document
pub fn to_data_uri(svg: &str) -> String {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(svg.as_bytes());
    format!("data:image/svg+xml;base64,{}", encoded)
}

fn write_command(out: &mut String, command: &DrawCommand) {
    // writes into a String are infallible
    let _ = match command {
        DrawCommand::Area {
            path,
            fill,
            opacity,
            ..
        } => writeln!(
            out,
            r#"  <path d="{}" fill="{}" fill-opacity="{}"/>"#,
            path_data(path),
            fill,
            num(*opacity)
        ),
        DrawCommand::Badge {
            center,
            radius,
            fill,
            text_color,
            label,
            ..
        } => writeln!(
            out,
            concat!(
                r#"  <g><circle cx="{x}" cy="{y}" r="{r}" fill="{fill}"/>"#,
                r#"<text x="{x}" y="{y}" fill="{color}" font-size="12" text-anchor="middle" dominant-baseline="central">{label}</text></g>"#
            ),
            x = num(center.x),
            y = num(center.y),
            r = num(*radius),
            fill = fill,
            color = text_color,
            label = escape(label)
        ),
        DrawCommand::Axis {
            origin,
            width,
            ticks,
        } => {
            let _ = writeln!(
                out,
                r#"  <g transform="translate({},{})" font-size="10" fill="{c}">"#,
                num(origin.x),
                num(origin.y),
                c = AXIS_COLOR
            );
            let _ = writeln!(
                out,
                r#"    <line x1="0" y1="0" x2="{}" y2="0" stroke="{}"/>"#,
                num(*width),
                AXIS_COLOR
            );
            for tick in ticks {
                let _ = writeln!(
                    out,
                    r#"    <line x1="{x}" y1="0" x2="{x}" y2="{len}" stroke="{c}"/><text x="{x}" y="{ty}" text-anchor="middle">{label}</text>"#,
                    x = num(tick.position),
                    len = num(TICK_LENGTH),
                    c = AXIS_COLOR,
                    ty = num(TICK_LENGTH + 11.0),
                    label = escape(&tick.label)
                );
            }
            writeln!(out, "  </g>")
        }
        DrawCommand::GuideLine {
            x,
            y1,
            y2,
            stroke_width,
        } => writeln!(
            out,
            r##"  <line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="#000000" stroke-width="{}"/>"##,
            num(*y1),
            num(*y2),
            num(*stroke_width),
            x = num(*x)
        ),
        DrawCommand::Tooltip {
            position,
            width,
            line_height,
            lines,
            visible,
        } => {
            let visibility = if *visible { "visible" } else { "hidden" };
            let height = line_height * lines.len() as f64;
            let _ = writeln!(
                out,
                r##"  <g transform="translate({},{})" visibility="{}" font-size="12"><rect width="{}" height="{}" fill="#ffffff" stroke="#999999"/>"##,
                num(position.x),
                num(position.y),
                visibility,
                num(*width),
                num(height)
            );
            for (i, line) in lines.iter().enumerate() {
                let _ = writeln!(
                    out,
                    r#"    <text x="4" y="{}">{}</text>"#,
                    num(line_height * (i as f64 + 0.75)),
                    escape(line)
                );
            }
            writeln!(out, "  </g>")
        }
    };
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

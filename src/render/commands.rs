//! Draw commands produced by layout and applied to a drawing surface
//!
//! Coordinates are in container pixels with the origin at the top-left.

use crate::stream::axis::AxisTick;
use crate::stream::colors::Rgb;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One element of a path outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo { to: Point },
    LineTo { to: Point },
    CubicTo { c1: Point, c2: Point, to: Point },
    Close,
}

/// SVG path data (`d` attribute) for a list of segments
pub fn path_data(segments: &[PathSegment]) -> String {
    let mut d = String::new();
    for segment in segments {
        if !d.is_empty() {
            d.push(' ');
        }
        // writing to a String cannot fail
        let _ = match segment {
            PathSegment::MoveTo { to } => write!(d, "M{},{}", num(to.x), num(to.y)),
            PathSegment::LineTo { to } => write!(d, "L{},{}", num(to.x), num(to.y)),
            PathSegment::CubicTo { c1, c2, to } => write!(
                d,
                "C{},{} {},{} {},{}",
                num(c1.x),
                num(c1.y),
                num(c2.x),
                num(c2.y),
                num(to.x),
                num(to.y)
            ),
            PathSegment::Close => write!(d, "Z"),
        };
    }
    d
}

/// Format a coordinate with at most three decimals and no trailing zeros
pub(crate) fn num(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// A retained drawing instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Mirrored stream area for one row
    Area {
        row: usize,
        path: Vec<PathSegment>,
        fill: Rgb,
        opacity: f64,
    },
    /// Circular row label at the left margin
    Badge {
        row: usize,
        center: Point,
        radius: f64,
        fill: Rgb,
        text_color: Rgb,
        label: String,
    },
    /// Time axis; tick positions are relative to `origin.x`
    Axis {
        origin: Point,
        width: f64,
        ticks: Vec<AxisTick>,
    },
    /// Vertical cursor line
    GuideLine {
        x: f64,
        y1: f64,
        y2: f64,
        stroke_width: f64,
    },
    /// Cursor value readout
    Tooltip {
        position: Point,
        width: f64,
        line_height: f64,
        lines: Vec<String>,
        visible: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(2.123456), "2.123");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(-3.25), "-3.25");
        assert_eq!(num(100.0), "100");
    }

    #[test]
    fn test_path_data() {
        let path = vec![
            PathSegment::MoveTo { to: Point::new(0.0, 1.0) },
            PathSegment::CubicTo {
                c1: Point::new(1.0, 1.5),
                c2: Point::new(2.0, 2.0),
                to: Point::new(3.0, 2.0),
            },
            PathSegment::LineTo { to: Point::new(3.0, 4.0) },
            PathSegment::Close,
        ];
        assert_eq!(path_data(&path), "M0,1 C1,1.5 2,2 3,2 L3,4 Z");
    }

    #[test]
    fn test_command_serializes_with_kind_tag() {
        let cmd = DrawCommand::GuideLine {
            x: 10.0,
            y1: 0.0,
            y2: 50.0,
            stroke_width: 0.0,
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["kind"], "guide_line");
        assert_eq!(json["x"], 10.0);
    }
}

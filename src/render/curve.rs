//! Uniform cubic B-spline smoothing
//!
//! Interior control points are approximated, endpoints are interpolated.
//! The curve is emitted as cubic Bézier segments so any path renderer can
//! draw it.

use super::commands::{PathSegment, Point};

/// Streams points into basis-spline segments
///
/// `line_index` counts finished lines; the second line of an area starts
/// with a `LineTo` and ends with `Close`. `point` counts points seen on the
/// current line, saturating at 3.
struct BasisBuilder {
    segments: Vec<PathSegment>,
    line_index: u8,
    area: bool,
    point: u8,
    p0: Point,
    p1: Point,
}

impl BasisBuilder {
    fn new(area: bool) -> Self {
        Self {
            segments: Vec::new(),
            line_index: 0,
            area,
            point: 0,
            p0: Point::new(0.0, 0.0),
            p1: Point::new(0.0, 0.0),
        }
    }

    fn line_start(&mut self) {
        self.point = 0;
    }

    fn push(&mut self, p: Point) {
        match self.point {
            0 => {
                self.point = 1;
                if self.line_index > 0 {
                    self.segments.push(PathSegment::LineTo { to: p });
                } else {
                    self.segments.push(PathSegment::MoveTo { to: p });
                }
            }
            1 => self.point = 2,
            2 => {
                self.point = 3;
                self.segments.push(PathSegment::LineTo {
                    to: Point::new(
                        (5.0 * self.p0.x + self.p1.x) / 6.0,
                        (5.0 * self.p0.y + self.p1.y) / 6.0,
                    ),
                });
                self.bezier(p);
            }
            _ => self.bezier(p),
        }
        self.p0 = self.p1;
        self.p1 = p;
    }

    fn bezier(&mut self, p: Point) {
        let (p0, p1) = (self.p0, self.p1);
        self.segments.push(PathSegment::CubicTo {
            c1: Point::new((2.0 * p0.x + p1.x) / 3.0, (2.0 * p0.y + p1.y) / 3.0),
            c2: Point::new((p0.x + 2.0 * p1.x) / 3.0, (p0.y + 2.0 * p1.y) / 3.0),
            to: Point::new(
                (p0.x + 4.0 * p1.x + p.x) / 6.0,
                (p0.y + 4.0 * p1.y + p.y) / 6.0,
            ),
        });
    }

    fn line_end(&mut self) {
        if self.point == 3 {
            let last = self.p1;
            self.bezier(last);
        }
        if self.point >= 2 {
            self.segments.push(PathSegment::LineTo { to: self.p1 });
        }
        if self.area && self.line_index > 0 {
            self.segments.push(PathSegment::Close);
        }
        self.line_index += 1;
    }
}

/// Smooth a closed area between two edges
///
/// `upper` is traced forwards, `lower` backwards, and the outline is closed.
/// Both edges must have the same length.
pub fn basis_area(upper: &[Point], lower: &[Point]) -> Vec<PathSegment> {
    debug_assert_eq!(upper.len(), lower.len());
    if upper.is_empty() {
        return Vec::new();
    }

    let mut builder = BasisBuilder::new(true);
    builder.line_start();
    for &p in upper {
        builder.push(p);
    }
    builder.line_end();

    builder.line_start();
    for &p in lower.iter().rev() {
        builder.push(p);
    }
    builder.line_end();
    builder.segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis_line(points: &[Point]) -> Vec<PathSegment> {
        let mut builder = BasisBuilder::new(false);
        builder.line_start();
        for &p in points {
            builder.push(p);
        }
        builder.line_end();
        builder.segments
    }

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_two_points_is_a_straight_line() {
        let segments = basis_line(&pts(&[(0.0, 0.0), (10.0, 5.0)]));
        assert_eq!(
            segments,
            vec![
                PathSegment::MoveTo { to: Point::new(0.0, 0.0) },
                PathSegment::LineTo { to: Point::new(10.0, 5.0) },
            ]
        );
    }

    #[test]
    fn test_three_point_basis() {
        let segments = basis_line(&pts(&[(0.0, 0.0), (3.0, 3.0), (6.0, 0.0)]));
        assert_eq!(
            segments,
            vec![
                PathSegment::MoveTo { to: Point::new(0.0, 0.0) },
                PathSegment::LineTo { to: Point::new(0.5, 0.5) },
                PathSegment::CubicTo {
                    c1: Point::new(1.0, 1.0),
                    c2: Point::new(2.0, 2.0),
                    to: Point::new(3.0, 2.0),
                },
                PathSegment::CubicTo {
                    c1: Point::new(4.0, 2.0),
                    c2: Point::new(5.0, 1.0),
                    to: Point::new(5.5, 0.5),
                },
                PathSegment::LineTo { to: Point::new(6.0, 0.0) },
            ]
        );
    }

    #[test]
    fn test_endpoints_are_interpolated() {
        let line = pts(&[(0.0, 2.0), (1.0, 7.0), (2.0, -3.0), (3.0, 4.0), (4.0, 1.0)]);
        let segments = basis_line(&line);
        assert_eq!(segments.first(), Some(&PathSegment::MoveTo { to: line[0] }));
        assert_eq!(segments.last(), Some(&PathSegment::LineTo { to: line[4] }));
        // one lineTo, n-1 beziers, final lineTo
        assert_eq!(segments.len(), 1 + 1 + 4 + 1);
    }

    #[test]
    fn test_area_is_closed_and_traces_lower_edge_backwards() {
        let upper = pts(&[(0.0, 4.0), (5.0, 2.0), (10.0, 4.0)]);
        let lower = pts(&[(0.0, 6.0), (5.0, 8.0), (10.0, 6.0)]);
        let segments = basis_area(&upper, &lower);

        assert_eq!(segments[0], PathSegment::MoveTo { to: upper[0] });
        assert_eq!(segments.last(), Some(&PathSegment::Close));
        assert_eq!(
            segments.iter().filter(|s| matches!(s, PathSegment::MoveTo { .. })).count(),
            1
        );
        // the lower pass begins at the last lower point
        assert!(segments.contains(&PathSegment::LineTo { to: lower[2] }));
        // and ends at the first lower point, just before closing
        assert_eq!(
            segments[segments.len() - 2],
            PathSegment::LineTo { to: lower[0] }
        );
    }

    #[test]
    fn test_single_point_area() {
        let segments = basis_area(&pts(&[(5.0, 1.0)]), &pts(&[(5.0, 3.0)]));
        assert_eq!(
            segments,
            vec![
                PathSegment::MoveTo { to: Point::new(5.0, 1.0) },
                PathSegment::LineTo { to: Point::new(5.0, 3.0) },
                PathSegment::Close,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(basis_area(&[], &[]).is_empty());
        assert_eq!(basis_line(&[]), vec![]);
    }
}

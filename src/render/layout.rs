//! Pure layout of a stream graph
//!
//! `layout` turns validated input into draw commands without touching any
//! surface. Rows stack top to bottom in series order; each row is a mirrored
//! area around its midline, so a stream's thickness reads as its value.

use super::commands::{DrawCommand, Point};
use super::cursor::{IndexResolution, TooltipStyle};
use super::curve::basis_area;
use crate::stream::axis::{LinearScale, TimeAxis, TimeAxisBuilder, DEFAULT_MAX_TICKS};
use crate::stream::classifier::{classify_with, Classification};
use crate::stream::colors::{ColorMapper, Rgb};
use crate::stream::error::Result;
use crate::stream::series::{ClassificationThresholds, DateAxis, SeriesSet};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 16.0,
            right: 24.0,
            bottom: 16.0,
            left: 36.0,
        }
    }
}

/// Presentation settings shared by layout and the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub margins: Margins,
    /// Band below the rows reserved for the time axis
    pub axis_height: f64,
    pub max_ticks: usize,
    pub area_opacity: f64,
    pub badge_radius: f64,
    /// Badge centre, measured from the container's left edge
    pub badge_offset_x: f64,
    pub tooltip: TooltipStyle,
    pub index_resolution: IndexResolution,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            margins: Margins::default(),
            axis_height: 25.0,
            max_ticks: DEFAULT_MAX_TICKS,
            area_opacity: 0.8,
            badge_radius: 8.0,
            badge_offset_x: 12.0,
            tooltip: TooltipStyle::default(),
            index_resolution: IndexResolution::Nearest,
        }
    }
}

/// Container geometry for a given number of rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderLayout {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub axis_height: f64,
    pub content_width: f64,
    /// Height of the rows area, axis band excluded
    pub content_height: f64,
    pub row_height: f64,
    pub row_count: usize,
}

impl RenderLayout {
    pub fn new(
        width: f64,
        height: f64,
        margins: Margins,
        axis_height: f64,
        row_count: usize,
    ) -> Self {
        let content_width = (width - margins.left - margins.right).max(0.0);
        let content_height = (height - margins.top - margins.bottom - axis_height).max(0.0);
        let row_height = if row_count == 0 {
            0.0
        } else {
            content_height / row_count as f64
        };

        Self {
            width,
            height,
            margins,
            axis_height,
            content_width,
            content_height,
            row_height,
            row_count,
        }
    }

    pub fn row_midline(&self, row: usize) -> f64 {
        self.margins.top + self.row_height * (row as f64 + 0.5)
    }

    /// Top-left corner of the axis band
    pub fn axis_origin(&self) -> Point {
        Point::new(self.margins.left, self.margins.top + self.content_height)
    }

    /// Half-thickness of a row for a value, never beyond half a row
    pub fn value_scale(&self, thresholds: &ClassificationThresholds) -> LinearScale {
        LinearScale::new(
            (thresholds.domain_low, thresholds.domain_high),
            (0.0, self.row_height / 2.0),
        )
    }
}

/// Draw commands of one row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowScene {
    /// Creation order, 0-based
    pub index: usize,
    pub area: DrawCommand,
    pub badge: DrawCommand,
}

/// Everything needed to mount a stream graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamGraphScene {
    pub layout: RenderLayout,
    pub axis: TimeAxis,
    pub classification: Classification,
    pub rows: Vec<RowScene>,
    pub axis_command: DrawCommand,
}

/// Classify, build the axis and lay out every row
///
/// Fails with `InvalidInput` when the date axis does not match the series.
pub fn layout(
    series_set: &SeriesSet,
    dates: &DateAxis,
    thresholds: &ClassificationThresholds,
    container: (f64, f64),
    options: &RenderOptions,
    mapper: &ColorMapper,
) -> Result<StreamGraphScene> {
    dates.check_matches(series_set)?;

    let layout = RenderLayout::new(
        container.0,
        container.1,
        options.margins,
        options.axis_height,
        series_set.len(),
    );
    let classification = classify_with(series_set, thresholds, mapper);
    let axis = TimeAxisBuilder::new()
        .max_ticks(options.max_ticks)
        .build(dates, layout.content_width);
    let value_scale = layout.value_scale(thresholds);

    let xs: Vec<f64> = (0..series_set.sample_count())
        .map(|i| layout.margins.left + axis.index_scale.apply(i as f64))
        .collect();

    let rows = series_set
        .iter()
        .zip(&classification.results)
        .enumerate()
        .map(|(row, (samples, result))| {
            let mid = layout.row_midline(row);
            let (upper, lower): (Vec<Point>, Vec<Point>) = xs
                .iter()
                .zip(samples)
                .map(|(&x, &v)| {
                    let half = value_scale.apply_clamped(v);
                    (Point::new(x, mid - half), Point::new(x, mid + half))
                })
                .unzip();

            RowScene {
                index: row,
                area: DrawCommand::Area {
                    row,
                    path: basis_area(&upper, &lower),
                    fill: result.color,
                    opacity: options.area_opacity,
                },
                badge: DrawCommand::Badge {
                    row,
                    center: Point::new(options.badge_offset_x, mid),
                    radius: options.badge_radius,
                    fill: Rgb::GREY,
                    text_color: Rgb::WHITE,
                    label: (row + 1).to_string(),
                },
            }
        })
        .collect();

    let axis_command = DrawCommand::Axis {
        origin: layout.axis_origin(),
        width: layout.content_width,
        ticks: axis.ticks.clone(),
    };

    tracing::debug!(
        rows = layout.row_count,
        row_height = layout.row_height,
        content_width = layout.content_width,
        "Laid out stream graph"
    );

    Ok(StreamGraphScene {
        layout,
        axis,
        classification,
        rows,
        axis_command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::commands::PathSegment;
    use crate::stream::error::StreamGraphError;
    use chrono::{Duration, TimeZone, Utc};

    fn dates(n: usize) -> DateAxis {
        let start = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        DateAxis::new((0..n).map(|i| start + Duration::days(i as i64)).collect()).unwrap()
    }

    fn scene(series: Vec<Vec<f64>>) -> StreamGraphScene {
        let set = SeriesSet::new(series).unwrap();
        layout(
            &set,
            &dates(set.sample_count()),
            &ClassificationThresholds::default(),
            (800.0, 400.0),
            &RenderOptions::default(),
            &ColorMapper::default(),
        )
        .unwrap()
    }

    fn path_points(cmd: &DrawCommand) -> Vec<Point> {
        let DrawCommand::Area { path, .. } = cmd else {
            panic!("not an area: {:?}", cmd);
        };
        path.iter()
            .filter_map(|s| match s {
                PathSegment::MoveTo { to } | PathSegment::LineTo { to } => Some(*to),
                PathSegment::CubicTo { to, .. } => Some(*to),
                PathSegment::Close => None,
            })
            .collect()
    }

    #[test]
    fn test_layout_geometry() {
        let l = RenderLayout::new(800.0, 400.0, Margins::default(), 25.0, 2);
        assert_eq!(l.content_width, 740.0);
        assert_eq!(l.content_height, 343.0);
        assert_eq!(l.row_height, 171.5);
        assert_eq!(l.row_midline(0), 101.75);
        assert_eq!(l.row_midline(1), 273.25);
        assert_eq!(l.axis_origin(), Point::new(36.0, 359.0));
    }

    #[test]
    fn test_tiny_container_does_not_go_negative() {
        let l = RenderLayout::new(20.0, 20.0, Margins::default(), 25.0, 3);
        assert_eq!(l.content_width, 0.0);
        assert_eq!(l.content_height, 0.0);
        assert_eq!(l.row_height, 0.0);
    }

    #[test]
    fn test_one_area_and_badge_per_row() {
        let s = scene(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![0.0; 3]]);
        assert_eq!(s.rows.len(), 3);
        for (i, row) in s.rows.iter().enumerate() {
            assert_eq!(row.index, i);
            match &row.badge {
                DrawCommand::Badge { label, center, .. } => {
                    assert_eq!(label, &(i + 1).to_string());
                    assert_eq!(center.x, 12.0);
                    assert_eq!(center.y, s.layout.row_midline(i));
                }
                other => panic!("unexpected {:?}", other),
            }
            match &row.area {
                DrawCommand::Area { fill, opacity, .. } => {
                    assert_eq!(*fill, s.classification.results[i].color);
                    assert_eq!(*opacity, 0.8);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_zero_row_is_flat_on_its_midline() {
        let s = scene(vec![vec![0.0; 4], vec![5.0; 4]]);
        let mid = s.layout.row_midline(0);
        assert!(path_points(&s.rows[0].area)
            .iter()
            .all(|p| (p.y - mid).abs() < 1e-9));
    }

    #[test]
    fn test_area_thickness_is_clamped_to_half_a_row() {
        // 5 sits halfway through the default domain, 50 is far above it
        let s = scene(vec![vec![5.0, 5.0], vec![50.0, 50.0]]);
        let quarter = s.layout.row_height / 4.0;
        let half = s.layout.row_height / 2.0;

        let mid0 = s.layout.row_midline(0);
        let ys0: Vec<f64> = path_points(&s.rows[0].area).iter().map(|p| p.y).collect();
        assert!(ys0.iter().any(|y| (y - (mid0 - quarter)).abs() < 1e-9));
        assert!(ys0.iter().any(|y| (y - (mid0 + quarter)).abs() < 1e-9));

        let mid1 = s.layout.row_midline(1);
        for p in path_points(&s.rows[1].area) {
            assert!((p.y - mid1).abs() <= half + 1e-9);
        }
    }

    #[test]
    fn test_areas_span_the_content_width() {
        let s = scene(vec![vec![1.0, 3.0, 2.0, 4.0]]);
        let points = path_points(&s.rows[0].area);
        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min_x, 36.0);
        assert_eq!(max_x, 776.0);
    }

    #[test]
    fn test_axis_command() {
        let s = scene(vec![vec![1.0; 100]]);
        match &s.axis_command {
            DrawCommand::Axis {
                origin,
                width,
                ticks,
            } => {
                assert_eq!(*origin, s.layout.axis_origin());
                assert_eq!(*width, 740.0);
                assert_eq!(ticks.len(), 100);
                assert_eq!(ticks[0].label, "20-06-01");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_dates_are_rejected() {
        let set = SeriesSet::new(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let err = layout(
            &set,
            &dates(2),
            &ClassificationThresholds::default(),
            (800.0, 400.0),
            &RenderOptions::default(),
            &ColorMapper::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StreamGraphError::InvalidInput(_)));
    }
}

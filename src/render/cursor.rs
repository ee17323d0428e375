//! Synchronized cursor and tooltip
//!
//! One pointer position selects one sample index; the tooltip then lists the
//! value of every displayed row at that index. The cursor never touches the
//! drawing surface itself, the renderer turns its state into draw commands.

use super::commands::Point;
use super::layout::RenderLayout;
use crate::stream::axis::TimeAxis;
use crate::stream::series::SeriesSet;
use serde::Serialize;

/// How a pointer between two samples picks one of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexResolution {
    #[default]
    Nearest,
    Floor,
}

impl IndexResolution {
    /// Parse from a property value
    ///
    /// Validation happens in the property reader; anything other than
    /// "floor" resolves to nearest.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "floor" => Self::Floor,
            _ => Self::Nearest,
        }
    }
}

/// Tooltip geometry used for placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipStyle {
    pub width: f64,
    pub line_height: f64,
    /// Gap between pointer and tooltip
    pub offset: f64,
    /// Gap kept when the tooltip flips to the other side of the pointer
    pub flip_offset: f64,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            width: 140.0,
            line_height: 16.0,
            offset: 12.0,
            flip_offset: 10.0,
        }
    }
}

impl TooltipStyle {
    pub fn height(&self, line_count: usize) -> f64 {
        self.line_height * line_count as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorPhase {
    #[default]
    Hidden,
    Active,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CursorState {
    pub phase: CursorPhase,
    /// Last accepted pointer position, container-relative
    pub pointer: Option<Point>,
    pub index: Option<usize>,
    pub tooltip_position: Option<Point>,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Move,
    Leave,
}

/// Pointer event in container coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn enter(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Enter,
            x,
            y,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            x,
            y,
        }
    }

    pub fn leave() -> Self {
        Self {
            kind: PointerKind::Leave,
            x: 0.0,
            y: 0.0,
        }
    }
}

/// Everything the cursor reads from a mounted graph
#[derive(Debug, Clone, Copy)]
pub struct CursorFrame<'a> {
    pub layout: &'a RenderLayout,
    pub axis: &'a TimeAxis,
    pub series: &'a SeriesSet,
    /// Row indices still displayed, in display order
    pub rows: &'a [usize],
}

#[derive(Debug, Clone, Default)]
pub struct SynchronizedCursor {
    state: CursorState,
    resolution: IndexResolution,
    style: TooltipStyle,
}

impl SynchronizedCursor {
    pub fn new(resolution: IndexResolution, style: TooltipStyle) -> Self {
        Self {
            state: CursorState::default(),
            resolution,
            style,
        }
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn style(&self) -> &TooltipStyle {
        &self.style
    }

    pub fn is_active(&self) -> bool {
        self.state.phase == CursorPhase::Active
    }

    pub fn enter(&mut self) {
        self.state.phase = CursorPhase::Active;
    }

    /// Back to hidden with nothing selected
    pub fn reset(&mut self) {
        self.state = CursorState::default();
    }

    /// Track a pointer move; returns false when the event was ignored
    ///
    /// Pointers left of the content origin or right of the content width are
    /// ignored and leave the state untouched.
    pub fn move_to(&mut self, x: f64, y: f64, frame: &CursorFrame<'_>) -> bool {
        let offset = x - frame.layout.margins.left;
        if !offset.is_finite() || !(0.0..=frame.layout.content_width).contains(&offset) {
            return false;
        }

        let sample_count = frame.series.sample_count();
        let index = match self.resolution {
            IndexResolution::Nearest => frame.axis.index_at_nearest(offset, sample_count),
            IndexResolution::Floor => frame.axis.index_at_floor(offset, sample_count),
        };

        let pointer = Point::new(x, y);
        let lines = build_tooltip_lines(frame.series, frame.rows, index);
        let size = (self.style.width, self.style.height(lines.len()));
        let container = (frame.layout.width, frame.layout.height);

        self.state = CursorState {
            phase: CursorPhase::Active,
            pointer: Some(pointer),
            index: Some(index),
            tooltip_position: Some(tooltip_position(pointer, container, size, &self.style)),
            lines,
        };
        true
    }

    /// Rebuild tooltip lines after rows were removed
    pub fn refresh(&mut self, frame: &CursorFrame<'_>) {
        let (Some(index), Some(pointer)) = (self.state.index, self.state.pointer) else {
            return;
        };
        self.state.lines = build_tooltip_lines(frame.series, frame.rows, index);
        let size = (self.style.width, self.style.height(self.state.lines.len()));
        let container = (frame.layout.width, frame.layout.height);
        self.state.tooltip_position =
            Some(tooltip_position(pointer, container, size, &self.style));
    }
}

/// `"<label>: <value>"` for every listed row at one sample index
///
/// Labels are 1-based row positions at creation time.
pub fn build_tooltip_lines(series: &SeriesSet, rows: &[usize], index: usize) -> Vec<String> {
    rows.iter()
        .filter_map(|&row| {
            let value = series.get(row)?.get(index)?;
            Some(format!("{}: {}", row + 1, value))
        })
        .collect()
}

/// Pointer + offset, flipped to the other side of the pointer on any axis
/// where the tooltip would leave the container
pub fn tooltip_position(
    pointer: Point,
    container: (f64, f64),
    size: (f64, f64),
    style: &TooltipStyle,
) -> Point {
    let mut x = pointer.x + style.offset;
    if x + size.0 > container.0 {
        x = pointer.x - size.0 - style.flip_offset;
    }
    let mut y = pointer.y + style.offset;
    if y + size.1 > container.1 {
        y = pointer.y - size.1 - style.flip_offset;
    }
    Point::new(x, y)
}

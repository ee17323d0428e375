//! Stream graph renderer
//!
//! Owns everything it mounts on a surface: one area and one badge per row,
//! the time axis, the cursor guide line, the tooltip and the pointer
//! subscription. All of it is tagged with the renderer's id and removed by
//! [`StreamGraphRenderer::clear_all`].

use super::commands::{DrawCommand, Point};
use super::cursor::{CursorFrame, CursorState, PointerEvent, PointerKind, SynchronizedCursor};
use super::layout::{layout, RenderLayout, RenderOptions, StreamGraphScene};
use super::surface::{DrawingSurface, ListenerHandle, NodeId};
use crate::stream::axis::TimeAxis;
use crate::stream::classifier::Classification;
use crate::stream::colors::ColorMapper;
use crate::stream::error::{Result, StreamGraphError};
use crate::stream::series::{ClassificationThresholds, DateAxis, SeriesSet};
use uuid::Uuid;

/// Guide stroke width while the cursor is active
const ACTIVE_GUIDE_WIDTH: f64 = 1.0;

/// Nodes of one mounted row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHandle {
    /// Creation order, 0-based; the badge shows `index + 1`
    pub index: usize,
    pub area: NodeId,
    pub badge: NodeId,
}

/// State of a mounted graph
#[derive(Debug, Clone)]
struct Mounted {
    container: String,
    layout: RenderLayout,
    axis: TimeAxis,
    series: SeriesSet,
    classification: Classification,
    axis_node: NodeId,
    guide_node: NodeId,
    tooltip_node: NodeId,
    listener: ListenerHandle,
}

pub struct StreamGraphRenderer {
    id: Uuid,
    options: RenderOptions,
    mapper: ColorMapper,
    rows: Vec<RowHandle>,
    mounted: Option<Mounted>,
    cursor: SynchronizedCursor,
}

impl Default for StreamGraphRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default(), ColorMapper::default())
    }
}

impl StreamGraphRenderer {
    pub fn new(options: RenderOptions, mapper: ColorMapper) -> Self {
        let cursor = SynchronizedCursor::new(options.index_resolution, options.tooltip);
        Self {
            id: Uuid::new_v4(),
            options,
            mapper,
            rows: Vec::new(),
            mounted: None,
            cursor,
        }
    }

    /// Owner tag of every node this renderer creates
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Rows still displayed, in creation order
    pub fn rows(&self) -> &[RowHandle] {
        &self.rows
    }

    pub fn classification(&self) -> Option<&Classification> {
        self.mounted.as_ref().map(|m| &m.classification)
    }

    pub fn layout(&self) -> Option<&RenderLayout> {
        self.mounted.as_ref().map(|m| &m.layout)
    }

    pub fn cursor_state(&self) -> &CursorState {
        self.cursor.state()
    }

    /// Mount a stream graph into `container`
    ///
    /// Input and container are checked before the surface is touched. Any
    /// previous mount of this renderer is cleared first. Pointer events are
    /// subscribed to last.
    pub fn render<S: DrawingSurface>(
        &mut self,
        surface: &mut S,
        container: &str,
        series_set: &SeriesSet,
        dates: &DateAxis,
        thresholds: &ClassificationThresholds,
    ) -> Result<()> {
        dates.check_matches(series_set)?;
        let size = surface
            .container_size(container)
            .ok_or_else(|| StreamGraphError::MountTargetMissing(container.to_string()))?;

        self.clear_all(surface);

        let scene = layout(
            series_set,
            dates,
            thresholds,
            size,
            &self.options,
            &self.mapper,
        )?;

        if let Err(e) = self.mount_scene(surface, container, series_set, scene) {
            tracing::warn!("Mount into '{}' failed, rolling back: {}", container, e);
            self.clear_all(surface);
            return Err(e);
        }

        tracing::info!(
            container,
            rows = series_set.len(),
            samples = series_set.sample_count(),
            "Mounted stream graph"
        );
        Ok(())
    }

    fn mount_scene<S: DrawingSurface>(
        &mut self,
        surface: &mut S,
        container: &str,
        series_set: &SeriesSet,
        scene: StreamGraphScene,
    ) -> Result<()> {
        let axis_node = self.append(surface, container, scene.axis_command)?;
        let mut pending = vec![axis_node];

        for row in scene.rows {
            let area = match self.append(surface, container, row.area) {
                Ok(id) => id,
                Err(e) => return Err(self.discard(surface, &pending, e)),
            };
            let badge = match self.append(surface, container, row.badge) {
                Ok(id) => id,
                Err(e) => {
                    pending.push(area);
                    return Err(self.discard(surface, &pending, e));
                }
            };
            self.rows.push(RowHandle {
                index: row.index,
                area,
                badge,
            });
        }

        let layout = scene.layout;
        let guide = DrawCommand::GuideLine {
            x: layout.margins.left,
            y1: layout.margins.top,
            y2: layout.margins.top + layout.content_height,
            stroke_width: 0.0,
        };
        let guide_node = match self.append(surface, container, guide) {
            Ok(id) => id,
            Err(e) => return Err(self.discard(surface, &pending, e)),
        };
        pending.push(guide_node);

        let tooltip_node = match self.append(surface, container, self.tooltip_command(false)) {
            Ok(id) => id,
            Err(e) => return Err(self.discard(surface, &pending, e)),
        };
        pending.push(tooltip_node);

        let listener = match surface.listen(container, self.id) {
            Ok(handle) => handle,
            Err(e) => return Err(self.discard(surface, &pending, e)),
        };

        self.mounted = Some(Mounted {
            container: container.to_string(),
            layout,
            axis: scene.axis,
            series: series_set.clone(),
            classification: scene.classification,
            axis_node,
            guide_node,
            tooltip_node,
            listener,
        });
        Ok(())
    }

    fn append<S: DrawingSurface>(
        &self,
        surface: &mut S,
        container: &str,
        command: DrawCommand,
    ) -> Result<NodeId> {
        surface.append(container, self.id, command)
    }

    /// Remove nodes not yet tracked by `mounted`
    fn discard<S: DrawingSurface>(
        &self,
        surface: &mut S,
        nodes: &[NodeId],
        error: StreamGraphError,
    ) -> StreamGraphError {
        for &node in nodes {
            surface.remove(node);
        }
        error
    }

    /// Remove every row except the most recently added one
    ///
    /// Returns the number of rows removed.
    pub fn clear_all_but_last<S: DrawingSurface>(&mut self, surface: &mut S) -> usize {
        let Some(last) = self.rows.pop() else {
            return 0;
        };
        let removed: Vec<RowHandle> = std::mem::replace(&mut self.rows, vec![last]);
        for row in &removed {
            surface.remove(row.area);
            surface.remove(row.badge);
        }

        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), kept = last.index + 1, "Cleared rows");
            if self.cursor.is_active() {
                if let Some(mounted) = &self.mounted {
                    let rows = self.displayed_rows();
                    let frame = CursorFrame {
                        layout: &mounted.layout,
                        axis: &mounted.axis,
                        series: &mounted.series,
                        rows: &rows,
                    };
                    self.cursor.refresh(&frame);
                }
                self.sync_tooltip(surface);
            }
        }
        removed.len()
    }

    /// Remove every node this renderer owns and drop its subscription
    pub fn clear_all<S: DrawingSurface>(&mut self, surface: &mut S) {
        for row in self.rows.drain(..) {
            surface.remove(row.area);
            surface.remove(row.badge);
        }

        if let Some(mounted) = self.mounted.take() {
            surface.remove(mounted.axis_node);
            surface.remove(mounted.guide_node);
            surface.remove(mounted.tooltip_node);
            surface.unlisten(mounted.listener);
            tracing::info!(container = %mounted.container, "Disposed stream graph");
        }

        self.cursor.reset();
    }

    /// Route a pointer event from the host
    ///
    /// Returns whether the visible cursor changed. Events are ignored while
    /// nothing is mounted.
    pub fn handle_pointer<S: DrawingSurface>(
        &mut self,
        surface: &mut S,
        event: PointerEvent,
    ) -> Result<bool> {
        let Some(mounted) = &self.mounted else {
            return Ok(false);
        };

        match event.kind {
            PointerKind::Enter => {
                self.cursor.enter();
            }
            PointerKind::Leave => {
                self.cursor.reset();
            }
            PointerKind::Move => {
                let rows = self.displayed_rows();
                let frame = CursorFrame {
                    layout: &mounted.layout,
                    axis: &mounted.axis,
                    series: &mounted.series,
                    rows: &rows,
                };
                if !self.cursor.move_to(event.x, event.y, &frame) {
                    return Ok(false);
                }
            }
        }

        self.sync_guide(surface)?;
        self.sync_tooltip(surface);
        Ok(true)
    }

    fn displayed_rows(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.index).collect()
    }

    fn sync_guide<S: DrawingSurface>(&self, surface: &mut S) -> Result<()> {
        let Some(mounted) = &self.mounted else {
            return Ok(());
        };
        let layout = &mounted.layout;
        let state = self.cursor.state();

        let x = state.pointer.map_or(layout.margins.left, |p| p.x);
        let stroke_width = if self.cursor.is_active() {
            ACTIVE_GUIDE_WIDTH
        } else {
            0.0
        };

        surface.update(
            mounted.guide_node,
            DrawCommand::GuideLine {
                x,
                y1: layout.margins.top,
                y2: layout.margins.top + layout.content_height,
                stroke_width,
            },
        )
    }

    fn sync_tooltip<S: DrawingSurface>(&self, surface: &mut S) {
        let Some(mounted) = &self.mounted else {
            return;
        };
        let command = self.tooltip_command(self.cursor.is_active());
        if let Err(e) = surface.update(mounted.tooltip_node, command) {
            tracing::warn!("Tooltip update failed: {}", e);
        }
    }

    fn tooltip_command(&self, visible: bool) -> DrawCommand {
        let state = self.cursor.state();
        let style = self.cursor.style();
        DrawCommand::Tooltip {
            position: state.tooltip_position.unwrap_or(Point::new(0.0, 0.0)),
            width: style.width,
            line_height: style.line_height,
            lines: state.lines.clone(),
            visible,
        }
    }
}

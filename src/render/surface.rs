//! Drawing surface adapter
//!
//! The renderer only talks to a [`DrawingSurface`]. Nodes are tagged with
//! the id of the renderer that created them so several renderers can share
//! one container and each can remove exactly its own nodes.

use super::commands::DrawCommand;
use crate::stream::error::{Result, StreamGraphError};
use std::collections::HashMap;
use uuid::Uuid;

/// Handle of a node appended to a surface
pub type NodeId = Uuid;

/// Handle of a pointer-event subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(Uuid);

impl ListenerHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerHandle {
    fn default() -> Self {
        Self::new()
    }
}

pub trait DrawingSurface {
    /// Pixel size of a container, `None` when it does not exist
    fn container_size(&self, container: &str) -> Option<(f64, f64)>;

    /// Append a node to a container
    fn append(&mut self, container: &str, owner: Uuid, command: DrawCommand) -> Result<NodeId>;

    /// Replace the command of an existing node
    fn update(&mut self, node: NodeId, command: DrawCommand) -> Result<()>;

    /// Remove a node; returns false when it was already gone
    fn remove(&mut self, node: NodeId) -> bool;

    /// Subscribe `owner` to pointer events of a container
    fn listen(&mut self, container: &str, owner: Uuid) -> Result<ListenerHandle>;

    /// Drop a subscription; returns false when it was already gone
    fn unlisten(&mut self, handle: ListenerHandle) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub owner: Uuid,
    pub command: DrawCommand,
}

#[derive(Debug, Clone)]
struct Container {
    width: f64,
    height: f64,
    /// Paint order
    nodes: Vec<SceneNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Listener {
    container: String,
    owner: Uuid,
}

/// In-memory retained scene graph
#[derive(Debug, Clone, Default)]
pub struct SceneSurface {
    containers: HashMap<String, Container>,
    listeners: HashMap<ListenerHandle, Listener>,
}

impl SceneSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or resize) a container
    pub fn add_container(&mut self, id: &str, width: f64, height: f64) {
        let container = self
            .containers
            .entry(id.to_string())
            .or_insert_with(|| Container {
                width,
                height,
                nodes: Vec::new(),
            });
        container.width = width;
        container.height = height;
    }

    /// Nodes of a container in paint order
    pub fn nodes(&self, container: &str) -> &[SceneNode] {
        self.containers
            .get(container)
            .map(|c| c.nodes.as_slice())
            .unwrap_or(&[])
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.containers
            .values()
            .flat_map(|c| c.nodes.iter())
            .find(|n| n.id == id)
    }

    /// Number of nodes created by `owner` across all containers
    pub fn owned_nodes(&self, owner: Uuid) -> usize {
        self.containers
            .values()
            .flat_map(|c| c.nodes.iter())
            .filter(|n| n.owner == owner)
            .count()
    }

    /// Owners subscribed to a container's pointer events
    pub fn listeners(&self, container: &str) -> Vec<Uuid> {
        self.listeners
            .values()
            .filter(|l| l.container == container)
            .map(|l| l.owner)
            .collect()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.containers
            .values_mut()
            .flat_map(|c| c.nodes.iter_mut())
            .find(|n| n.id == id)
    }
}

impl DrawingSurface for SceneSurface {
    fn container_size(&self, container: &str) -> Option<(f64, f64)> {
        self.containers
            .get(container)
            .map(|c| (c.width, c.height))
    }

    fn append(&mut self, container: &str, owner: Uuid, command: DrawCommand) -> Result<NodeId> {
        let target = self
            .containers
            .get_mut(container)
            .ok_or_else(|| StreamGraphError::MountTargetMissing(container.to_string()))?;
        let id = Uuid::new_v4();
        target.nodes.push(SceneNode { id, owner, command });
        Ok(id)
    }

    fn update(&mut self, node: NodeId, command: DrawCommand) -> Result<()> {
        let target = self
            .node_mut(node)
            .ok_or(StreamGraphError::UnknownNode(node))?;
        target.command = command;
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> bool {
        for container in self.containers.values_mut() {
            if let Some(pos) = container.nodes.iter().position(|n| n.id == node) {
                container.nodes.remove(pos);
                return true;
            }
        }
        false
    }

    fn listen(&mut self, container: &str, owner: Uuid) -> Result<ListenerHandle> {
        if !self.containers.contains_key(container) {
            return Err(StreamGraphError::MountTargetMissing(container.to_string()));
        }
        let handle = ListenerHandle::new();
        self.listeners.insert(
            handle,
            Listener {
                container: container.to_string(),
                owner,
            },
        );
        Ok(handle)
    }

    fn unlisten(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(&handle).is_some()
    }
}

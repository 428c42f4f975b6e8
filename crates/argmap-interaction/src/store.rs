//! The port through which the interaction layer reads and writes the shared
//! diagram.
//!
//! Only the four required methods must be implemented. Every other operation
//! has a default that reports [`StoreError::Unsupported`], and the coordinator
//! degrades gracefully when it sees one.

use crate::error::StoreError;
use argmap_core::{Edge, EdgeId, Editor, Node, NodeId, Vec2};
use std::sync::Arc;

pub trait GraphStore {
    fn nodes(&self) -> Vec<Node>;

    fn node(&self, id: &NodeId) -> Option<Node>;

    fn edges(&self) -> Vec<Edge>;

    /// Best-effort position write. Local state may already reflect it before
    /// the collaboration layer propagates it.
    fn update_node_position(&self, id: &NodeId, position: Vec2) -> Result<(), StoreError>;

    /// Batched position write. Stores that can apply several updates as one
    /// change should override this.
    fn update_node_positions(&self, updates: &[(NodeId, Vec2)]) -> Result<(), StoreError> {
        for (id, position) in updates {
            self.update_node_position(id, *position)?;
        }
        Ok(())
    }

    /// Persist an edge anchor that so far only existed in the renderer.
    fn ensure_edge_anchor(
        &self,
        _anchor_id: &NodeId,
        _parent_edge_id: &EdgeId,
        _position: Vec2,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("ensure_edge_anchor"))
    }

    /// Copy a node and its incident edges, placing the copy at the original's
    /// position plus `offset`. Returns `None` when the original is gone.
    fn duplicate_node_with_connections(
        &self,
        _id: &NodeId,
        _offset: Vec2,
    ) -> Result<Option<NodeId>, StoreError> {
        Err(StoreError::Unsupported("duplicate_node_with_connections"))
    }

    /// Take an advisory lock on behalf of the local editor.
    fn lock_node(&self, _id: &NodeId, _reason: &str) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("lock_node"))
    }

    fn unlock_node(&self, _id: &NodeId) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("unlock_node"))
    }

    /// Editors currently holding a lock on `id`, the local editor included.
    fn editors_for_node(&self, _id: &NodeId) -> Result<Vec<Editor>, StoreError> {
        Err(StoreError::Unsupported("editors_for_node"))
    }

    /// Close the current undo batch.
    fn stop_capturing(&self) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("stop_capturing"))
    }

    fn set_node_selected(&self, _id: &NodeId, _selected: bool) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("set_node_selected"))
    }
}

impl<T: GraphStore + ?Sized> GraphStore for Arc<T> {
    fn nodes(&self) -> Vec<Node> {
        (**self).nodes()
    }

    fn node(&self, id: &NodeId) -> Option<Node> {
        (**self).node(id)
    }

    fn edges(&self) -> Vec<Edge> {
        (**self).edges()
    }

    fn update_node_position(&self, id: &NodeId, position: Vec2) -> Result<(), StoreError> {
        (**self).update_node_position(id, position)
    }

    fn update_node_positions(&self, updates: &[(NodeId, Vec2)]) -> Result<(), StoreError> {
        (**self).update_node_positions(updates)
    }

    fn ensure_edge_anchor(
        &self,
        anchor_id: &NodeId,
        parent_edge_id: &EdgeId,
        position: Vec2,
    ) -> Result<(), StoreError> {
        (**self).ensure_edge_anchor(anchor_id, parent_edge_id, position)
    }

    fn duplicate_node_with_connections(
        &self,
        id: &NodeId,
        offset: Vec2,
    ) -> Result<Option<NodeId>, StoreError> {
        (**self).duplicate_node_with_connections(id, offset)
    }

    fn lock_node(&self, id: &NodeId, reason: &str) -> Result<(), StoreError> {
        (**self).lock_node(id, reason)
    }

    fn unlock_node(&self, id: &NodeId) -> Result<(), StoreError> {
        (**self).unlock_node(id)
    }

    fn editors_for_node(&self, id: &NodeId) -> Result<Vec<Editor>, StoreError> {
        (**self).editors_for_node(id)
    }

    fn stop_capturing(&self) -> Result<(), StoreError> {
        (**self).stop_capturing()
    }

    fn set_node_selected(&self, id: &NodeId, selected: bool) -> Result<(), StoreError> {
        (**self).set_node_selected(id, selected)
    }
}

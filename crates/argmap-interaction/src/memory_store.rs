//! In-process [`GraphStore`] used by the CLI replay and the tests.
//!
//! A [`SharedGraph`] plays the role of the collaborative document. Each
//! [`MemoryGraphStore`] is one editor's connection to it, so locks taken
//! through one connection are visible to every other.

use crate::error::StoreError;
use crate::store::GraphStore;
use argmap_core::{Edge, EdgeId, Editor, Node, NodeId, Vec2};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Serializable contents of a diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone)]
struct LockEntry {
    editor: Editor,
    reason: String,
}

#[derive(Debug, Default)]
struct GraphState {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    locks: HashMap<NodeId, Vec<LockEntry>>,
    write_log: Vec<(NodeId, Vec2)>,
    capture_batches: usize,
    next_copy: u64,
}

impl GraphState {
    fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node, StoreError> {
        self.nodes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| StoreError::NodeNotFound(id.clone()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    state: Arc<RwLock<GraphState>>,
}

impl SharedGraph {
    pub fn new(document: GraphDocument) -> Self {
        Self {
            state: Arc::new(RwLock::new(GraphState {
                nodes: document.nodes,
                edges: document.edges,
                ..GraphState::default()
            })),
        }
    }

    /// Open a connection acting as `editor`.
    pub fn connect(&self, editor: Editor) -> MemoryGraphStore {
        MemoryGraphStore {
            graph: self.clone(),
            editor,
        }
    }

    pub fn document(&self) -> GraphDocument {
        let state = self.state.read();
        GraphDocument {
            nodes: state.nodes.clone(),
            edges: state.edges.clone(),
        }
    }

    /// Delete a node and its incident edges, as a remote collaborator would.
    pub fn remove_node(&self, id: &NodeId) -> bool {
        let mut state = self.state.write();
        let before = state.nodes.len();
        state.nodes.retain(|n| &n.id != id);
        state.edges.retain(|e| !e.touches(id));
        state.locks.remove(id);
        state.nodes.len() != before
    }

    pub fn insert_node(&self, node: Node) {
        let mut state = self.state.write();
        state.nodes.retain(|n| n.id != node.id);
        state.nodes.push(node);
    }

    /// Every position write in arrival order.
    pub fn write_log(&self) -> Vec<(NodeId, Vec2)> {
        self.state.read().write_log.clone()
    }

    pub fn writes_for(&self, id: &NodeId) -> usize {
        self.state
            .read()
            .write_log
            .iter()
            .filter(|(written, _)| written == id)
            .count()
    }

    pub fn clear_write_log(&self) {
        self.state.write().write_log.clear();
    }

    /// Number of closed undo batches.
    pub fn capture_batches(&self) -> usize {
        self.state.read().capture_batches
    }

    pub fn lock_holders(&self, id: &NodeId) -> Vec<Editor> {
        self.state
            .read()
            .locks
            .get(id)
            .map(|entries| entries.iter().map(|e| e.editor.clone()).collect())
            .unwrap_or_default()
    }

    pub fn lock_reason(&self, id: &NodeId, editor: &Editor) -> Option<String> {
        self.state.read().locks.get(id).and_then(|entries| {
            entries
                .iter()
                .find(|e| e.editor.id == editor.id)
                .map(|e| e.reason.clone())
        })
    }
}

/// One editor's view of a [`SharedGraph`].
#[derive(Debug, Clone)]
pub struct MemoryGraphStore {
    graph: SharedGraph,
    editor: Editor,
}

impl MemoryGraphStore {
    pub fn new(document: GraphDocument, editor: Editor) -> Self {
        SharedGraph::new(document).connect(editor)
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }
}

impl GraphStore for MemoryGraphStore {
    fn nodes(&self) -> Vec<Node> {
        self.graph.state.read().nodes.clone()
    }

    fn node(&self, id: &NodeId) -> Option<Node> {
        self.graph
            .state
            .read()
            .nodes
            .iter()
            .find(|n| &n.id == id)
            .cloned()
    }

    fn edges(&self) -> Vec<Edge> {
        self.graph.state.read().edges.clone()
    }

    fn update_node_position(&self, id: &NodeId, position: Vec2) -> Result<(), StoreError> {
        let mut state = self.graph.state.write();
        state.node_mut(id)?.position = position;
        state.write_log.push((id.clone(), position));
        Ok(())
    }

    fn update_node_positions(&self, updates: &[(NodeId, Vec2)]) -> Result<(), StoreError> {
        let mut state = self.graph.state.write();
        // validate first so a batch is all-or-nothing
        if let Some((missing, _)) = updates
            .iter()
            .find(|(id, _)| !state.nodes.iter().any(|n| &n.id == id))
        {
            return Err(StoreError::NodeNotFound(missing.clone()));
        }
        for (id, position) in updates {
            state.node_mut(id)?.position = *position;
            state.write_log.push((id.clone(), *position));
        }
        Ok(())
    }

    fn ensure_edge_anchor(
        &self,
        anchor_id: &NodeId,
        parent_edge_id: &EdgeId,
        position: Vec2,
    ) -> Result<(), StoreError> {
        let mut state = self.graph.state.write();
        if state.nodes.iter().any(|n| &n.id == anchor_id) {
            return Ok(());
        }
        if !state.edges.iter().any(|e| &e.id == parent_edge_id) {
            return Err(StoreError::EdgeNotFound(parent_edge_id.clone()));
        }
        tracing::debug!(anchor = %anchor_id, edge = %parent_edge_id, "materialized edge anchor");
        state.nodes.push(Node::anchor(
            anchor_id.as_str(),
            position,
            parent_edge_id.clone(),
        ));
        Ok(())
    }

    fn duplicate_node_with_connections(
        &self,
        id: &NodeId,
        offset: Vec2,
    ) -> Result<Option<NodeId>, StoreError> {
        let mut state = self.graph.state.write();
        let Some(original) = state.nodes.iter().find(|n| &n.id == id).cloned() else {
            return Ok(None);
        };

        state.next_copy += 1;
        let suffix = state.next_copy;
        let copy_id = NodeId(format!("{id}-copy-{suffix}"));

        let mut copy = original;
        copy.id = copy_id.clone();
        copy.position = copy.position + offset;
        copy.selected = false;

        let copied_edges: Vec<Edge> = state
            .edges
            .iter()
            .filter(|e| e.touches(id))
            .map(|e| {
                let mut edge = e.clone();
                edge.id = EdgeId(format!("{}-copy-{suffix}", e.id));
                if &edge.source == id {
                    edge.source = copy_id.clone();
                }
                if &edge.target == id {
                    edge.target = copy_id.clone();
                }
                edge
            })
            .collect();

        state.nodes.push(copy);
        state.edges.extend(copied_edges);
        Ok(Some(copy_id))
    }

    fn lock_node(&self, id: &NodeId, reason: &str) -> Result<(), StoreError> {
        let mut state = self.graph.state.write();
        if !state.nodes.iter().any(|n| &n.id == id) {
            return Err(StoreError::NodeNotFound(id.clone()));
        }
        let entries = state.locks.entry(id.clone()).or_default();
        entries.retain(|e| e.editor.id != self.editor.id);
        entries.push(LockEntry {
            editor: self.editor.clone(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    fn unlock_node(&self, id: &NodeId) -> Result<(), StoreError> {
        let mut state = self.graph.state.write();
        let released_all = match state.locks.get_mut(id) {
            Some(entries) => {
                entries.retain(|e| e.editor.id != self.editor.id);
                entries.is_empty()
            }
            None => false,
        };
        if released_all {
            state.locks.remove(id);
        }
        Ok(())
    }

    fn editors_for_node(&self, id: &NodeId) -> Result<Vec<Editor>, StoreError> {
        Ok(self.graph.lock_holders(id))
    }

    fn stop_capturing(&self) -> Result<(), StoreError> {
        self.graph.state.write().capture_batches += 1;
        Ok(())
    }

    fn set_node_selected(&self, id: &NodeId, selected: bool) -> Result<(), StoreError> {
        self.graph.state.write().node_mut(id)?.selected = selected;
        Ok(())
    }
}

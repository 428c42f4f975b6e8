//! Host input as seen by the interaction handlers.

use argmap_core::{EdgeId, Node, NodeId, NodeKind, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn bypass_snap(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn duplicate(&self) -> bool {
        self.alt
    }

    pub fn toggle_selection(&self) -> bool {
        self.shift
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Pointer location in diagram coordinates.
    pub position: Vec2,
    pub button: PointerButton,
    pub modifiers: Modifiers,
    default_prevented: bool,
    gesture_cancelled: bool,
}

impl PointerEvent {
    pub fn new(position: Vec2, modifiers: Modifiers) -> Self {
        Self {
            position,
            button: PointerButton::Primary,
            modifiers,
            default_prevented: false,
            gesture_cancelled: false,
        }
    }

    /// Stop the host's built-in handling of this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Ask the host to abandon the gesture this event belongs to.
    pub fn cancel_gesture(&mut self) {
        self.gesture_cancelled = true;
    }

    pub fn gesture_cancelled(&self) -> bool {
        self.gesture_cancelled
    }
}

/// The node a pointer event targets, with the position the host proposes
/// for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: NodeId,
    #[serde(default)]
    pub kind: NodeKind,
    pub position: Vec2,
    #[serde(default)]
    pub size: Vec2,
    #[serde(default)]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_edge_id: Option<EdgeId>,
}

impl NodeRef {
    pub fn new(id: impl Into<String>, position: Vec2) -> Self {
        Self {
            id: NodeId(id.into()),
            kind: NodeKind::CONTENT,
            position,
            size: Vec2::ZERO,
            selected: false,
            parent_edge_id: None,
        }
    }

    pub fn at(&self, position: Vec2) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}

impl From<&Node> for NodeRef {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
            position: node.position,
            size: node.size,
            selected: node.selected,
            parent_edge_id: node.parent_edge_id.clone(),
        }
    }
}

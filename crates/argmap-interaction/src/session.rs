//! Per-gesture drag state.

use crate::frame::FrameQueue;
use crate::input::Modifiers;
use argmap_core::{NodeId, Rect, Vec2};
use argmap_events::GestureId;
use std::collections::HashSet;

/// Lifecycle of the single drag a coordinator can run at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    /// Drag-stop received; the final snap is being written.
    Finalizing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Start,
    Move,
    Stop,
    /// Final write done and session state released.
    Committed,
    Abort,
}

impl DragPhase {
    /// Next phase, or `None` if `event` is not valid in this phase.
    pub fn transition(self, event: GestureEvent) -> Option<DragPhase> {
        use DragPhase::*;
        use GestureEvent::*;
        match (self, event) {
            (Idle, Start) => Some(Dragging),
            (Dragging, Move) => Some(Dragging),
            (Dragging, Stop) => Some(Finalizing),
            (Finalizing, Committed) => Some(Idle),
            (Dragging | Finalizing, Abort) => Some(Idle),
            _ => None,
        }
    }
}

/// A node moved by the gesture, with its geometry when the drag began.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: NodeId,
    pub initial_position: Vec2,
    pub size: Vec2,
}

impl Participant {
    pub fn initial_rect(&self) -> Rect {
        Rect::from_pos_size(self.initial_position, self.size)
    }
}

/// A drag move waiting for the next animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    /// Node the host reported the move for.
    pub node_id: NodeId,
    pub proposed: Vec2,
    pub modifiers: Modifiers,
}

#[derive(Debug)]
pub struct DragSession {
    pub gesture: GestureId,
    pub leader: Participant,
    /// Other selected nodes moving rigidly with the leader.
    pub followers: Vec<Participant>,
    /// Bounding box of all participants at drag start, when in group mode.
    pub group_bounds: Option<Rect>,
    /// Set when the leader is an alt-drag duplicate of this node.
    pub original: Option<NodeId>,
    pub finalizing_snap: bool,
    pub last_position: Vec2,
    pub frames: FrameQueue<PendingMove>,
}

impl DragSession {
    pub fn new(gesture: GestureId, leader: Participant, followers: Vec<Participant>) -> Self {
        let group_bounds = if followers.is_empty() {
            None
        } else {
            Rect::bounding(
                std::iter::once(&leader)
                    .chain(&followers)
                    .map(Participant::initial_rect),
            )
        };
        let last_position = leader.initial_position;
        Self {
            gesture,
            leader,
            followers,
            group_bounds,
            original: None,
            finalizing_snap: false,
            last_position,
            frames: FrameQueue::new(),
        }
    }

    /// Session whose leader is a fresh duplicate of `original`.
    pub fn for_duplicate(gesture: GestureId, duplicate: Participant, original: NodeId) -> Self {
        let mut session = Self::new(gesture, duplicate, Vec::new());
        session.original = Some(original);
        session
    }

    pub fn is_group(&self) -> bool {
        self.group_bounds.is_some()
    }

    pub fn participant_ids(&self) -> HashSet<NodeId> {
        std::iter::once(&self.leader)
            .chain(&self.followers)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Whether a host event about `node_id` belongs to this gesture.
    pub fn tracks(&self, node_id: &NodeId) -> bool {
        &self.leader.id == node_id || self.original.as_ref() == Some(node_id)
    }

    /// Displacement of the leader from where it started.
    pub fn leader_delta(&self, proposed: Vec2) -> Vec2 {
        proposed - self.leader.initial_position
    }

    /// Every participant shifted by the same `delta` from its start position.
    pub fn rigid_positions(&self, delta: Vec2) -> Vec<(NodeId, Vec2)> {
        std::iter::once(&self.leader)
            .chain(&self.followers)
            .map(|p| (p.id.clone(), p.initial_position + delta))
            .collect()
    }
}

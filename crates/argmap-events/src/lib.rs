use argmap_core::{Editor, NodeId, Vec2};
use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one drag gesture from drag-start to drag-stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GestureId(pub Uuid);

impl GestureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GestureId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// The node being moved disappeared from the store mid-gesture.
    NodeRemoved,
    /// A new drag-start arrived before the previous drag-stop.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // ========================================================================
    // Gesture lifecycle
    // ========================================================================
    DragStarted {
        gesture: GestureId,
        leader: NodeId,
        followers: Vec<NodeId>,
    },
    /// Drag-start refused because an annotation is held by someone else.
    DragVetoed {
        node: NodeId,
        locked: NodeId,
        editor: Editor,
    },
    DuplicateCreated {
        gesture: GestureId,
        original: NodeId,
        duplicate: NodeId,
    },
    DragFinished {
        gesture: GestureId,
        leader: NodeId,
        position: Vec2,
    },
    DragAborted {
        gesture: GestureId,
        leader: NodeId,
        reason: AbortReason,
    },

    // ========================================================================
    // Selection
    // ========================================================================
    SelectionToggled {
        node: NodeId,
        selected: bool,
    },

    // ========================================================================
    // Notifications
    // ========================================================================
    ShowInfo {
        message: String,
    },
    ShowWarning {
        message: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event bus has no receivers");
        }
    }

    /// Drain every pending event without blocking.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }

    /// Hand each pending event to `listener`, oldest first.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Host-side consumer of coordinator events (toasts, lock badges, replay logs).
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

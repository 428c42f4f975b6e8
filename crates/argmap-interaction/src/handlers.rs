//! Entry points the host wires to its node pointer events.
//!
//! Handlers never return errors: failures are logged and the event is left
//! to the host's default behaviour.

use crate::coordinator::{ClickContext, ClickOutcome, DragCoordinator, DragStart, MoveOutcome};
use crate::input::{NodeRef, PointerEvent};
use crate::store::GraphStore;
use argmap_graph::SnapResult;

type ClickCallback = Box<dyn FnMut(&NodeRef, &PointerEvent)>;

pub struct InteractionHandlers<S: GraphStore> {
    coordinator: DragCoordinator<S>,
    context: ClickContext,
    on_click: Option<ClickCallback>,
}

impl<S: GraphStore> InteractionHandlers<S> {
    pub fn new(coordinator: DragCoordinator<S>) -> Self {
        Self {
            coordinator,
            context: ClickContext::default(),
            on_click: None,
        }
    }

    /// Host click handler that runs for clicks we do not consume.
    pub fn with_click_handler(
        mut self,
        handler: impl FnMut(&NodeRef, &PointerEvent) + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    pub fn coordinator(&self) -> &DragCoordinator<S> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut DragCoordinator<S> {
        &mut self.coordinator
    }

    pub fn set_select_mode(&mut self, enabled: bool) {
        self.context.select_mode = enabled;
    }

    pub fn set_grab_mode(&mut self, enabled: bool) {
        self.context.grab_mode = enabled;
    }

    pub fn snap_result(&self) -> Option<&SnapResult> {
        self.coordinator.snap_result()
    }

    pub fn finalizing_snap(&self) -> bool {
        self.coordinator.finalizing_snap()
    }

    pub fn dragging_active(&self) -> bool {
        self.coordinator.dragging_active()
    }

    pub fn handle_node_click(&mut self, event: &mut PointerEvent, node: &NodeRef) {
        match self.coordinator.click(node, event.modifiers, self.context) {
            Ok(ClickOutcome::Toggled { .. } | ClickOutcome::Suppressed) => event.prevent_default(),
            Ok(ClickOutcome::Forwarded) => {
                if let Some(handler) = self.on_click.as_mut() {
                    handler(node, event);
                }
            }
            Err(err) => tracing::error!(node = %node.id, %err, "click handler failed"),
        }
    }

    /// Returns whether the gesture was accepted.
    pub fn handle_node_drag_start(&mut self, event: &mut PointerEvent, node: &NodeRef) -> bool {
        match self.coordinator.drag_start(node, event.modifiers) {
            Ok(DragStart::Started { .. }) => {
                event.prevent_default();
                true
            }
            Ok(DragStart::Vetoed { .. }) => {
                event.cancel_gesture();
                false
            }
            Err(err) => {
                tracing::error!(node = %node.id, %err, "drag-start handler failed");
                false
            }
        }
    }

    pub fn handle_node_drag(&mut self, event: &mut PointerEvent, node: &NodeRef) {
        match self.coordinator.drag(node, event.modifiers) {
            Ok(MoveOutcome::Scheduled | MoveOutcome::Applied(_)) => event.prevent_default(),
            Ok(MoveOutcome::Ignored | MoveOutcome::Aborted) => {}
            Err(err) => tracing::error!(node = %node.id, %err, "drag handler failed"),
        }
    }

    pub fn handle_node_drag_stop(&mut self, event: &mut PointerEvent, node: &NodeRef) {
        match self.coordinator.drag_stop(node, event.modifiers) {
            Ok(Some(_)) => event.prevent_default(),
            Ok(None) => {}
            Err(err) => tracing::error!(node = %node.id, %err, "drag-stop handler failed"),
        }
    }

    pub fn on_animation_frame(&mut self) {
        if let Err(err) = self.coordinator.on_animation_frame() {
            tracing::error!(%err, "animation frame update failed");
        }
    }
}

//! Drag coordination: turns the host's drag-start / drag / drag-stop stream
//! into position writes against a shared [`GraphStore`].
//!
//! One coordinator runs at most one gesture at a time. A gesture moves either
//! a single node, snapped against its neighbours, or the whole selection as a
//! rigid body snapped by its bounding box. Alt-drag moves a fresh duplicate
//! instead and keeps the original pinned in place.

use crate::clone_map::{AltCloneMap, CloneEntry};
use crate::error::{InteractionError, StoreError};
use crate::input::{Modifiers, NodeRef};
use crate::session::{DragPhase, DragSession, GestureEvent, Participant, PendingMove};
use crate::settings::InteractionSettings;
use crate::store::GraphStore;
use argmap_core::{EdgeId, Editor, EditorId, Node, NodeId, NodeKind, Vec2};
use argmap_events::{AbortReason, Event, EventBus, GestureId};
use argmap_graph::{GraphSnapshot, SnapEngine, SnapResult, border_midpoint};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum DragStart {
    Started {
        gesture: GestureId,
        leader: NodeId,
    },
    /// An objection attached to the node is locked by another editor.
    Vetoed {
        locked: NodeId,
        editor: Editor,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// Queued for the next animation frame.
    Scheduled,
    /// Written; carries the leader's new position.
    Applied(Vec2),
    Ignored,
    /// The gesture ended because a tracked node disappeared.
    Aborted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickContext {
    pub select_mode: bool,
    pub grab_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Toggled { selected: bool },
    Suppressed,
    /// Not ours; the host's own click handler should run.
    Forwarded,
}

/// Run an optional store operation, logging instead of failing.
fn guarded<T>(op: &'static str, result: Result<T, StoreError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) if err.is_unsupported() => {
            tracing::debug!(op, "store operation unsupported");
            None
        }
        Err(err) => {
            tracing::warn!(op, %err, "store operation failed");
            None
        }
    }
}

/// Objection nodes hanging off an edge anchor on any edge that touches
/// `node_id`, sorted by id.
fn attached_objections(snapshot: &GraphSnapshot, node_id: &NodeId) -> Vec<NodeId> {
    let incident: HashSet<&EdgeId> = snapshot.incident_edges(node_id).map(|e| &e.id).collect();
    let anchors: HashSet<&NodeId> = snapshot
        .nodes()
        .iter()
        .filter(|n| {
            n.is_anchor()
                && n
                    .parent_edge_id
                    .as_ref()
                    .is_some_and(|parent| incident.contains(parent))
        })
        .map(|n| &n.id)
        .collect();

    let mut objections: Vec<NodeId> = snapshot
        .edges()
        .iter()
        .flat_map(|e| [(&e.source, &e.target), (&e.target, &e.source)])
        .filter(|(anchor, _)| anchors.contains(anchor))
        .filter_map(|(_, other)| snapshot.node(other))
        .filter(|n| n.kind == NodeKind::OBJECTION)
        .map(|n| n.id.clone())
        .collect();
    objections.sort();
    objections.dedup();
    objections
}

pub struct DragCoordinator<S: GraphStore> {
    store: S,
    local_editor: EditorId,
    settings: InteractionSettings,
    snap: SnapEngine,
    events: EventBus,
    zoom: f32,
    phase: DragPhase,
    session: Option<DragSession>,
    clones: AltCloneMap,
    snap_result: Option<SnapResult>,
    settling: bool,
}

impl<S: GraphStore> DragCoordinator<S> {
    pub fn new(
        store: S,
        local_editor: EditorId,
        settings: InteractionSettings,
        events: EventBus,
    ) -> Self {
        let snap = SnapEngine::new(settings.snap.threshold_px);
        Self {
            store,
            local_editor,
            settings,
            snap,
            events,
            zoom: 1.0,
            phase: DragPhase::Idle,
            session: None,
            clones: AltCloneMap::new(),
            snap_result: None,
            settling: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: InteractionSettings) {
        self.snap = SnapEngine::new(settings.snap.threshold_px);
        self.settings = settings;
    }

    pub fn local_editor(&self) -> &EditorId {
        &self.local_editor
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        } else {
            tracing::warn!(zoom, "ignoring invalid zoom");
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn clone_map(&self) -> &AltCloneMap {
        &self.clones
    }

    /// Current alignment, for drawing guide lines. `None` when not snapped.
    pub fn snap_result(&self) -> Option<&SnapResult> {
        self.snap_result.as_ref()
    }

    /// Set from drag-stop until the next animation frame; the host can skip
    /// redrawing the committed position during that frame.
    pub fn finalizing_snap(&self) -> bool {
        self.settling || self.session.as_ref().is_some_and(|s| s.finalizing_snap)
    }

    pub fn dragging_active(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    fn advance(&mut self, event: GestureEvent) -> bool {
        match self.phase.transition(event) {
            Some(next) => {
                self.phase = next;
                true
            }
            None => {
                tracing::debug!(phase = ?self.phase, ?event, "ignored gesture event");
                false
            }
        }
    }

    // ========================================================================
    // Drag start
    // ========================================================================

    pub fn drag_start(
        &mut self,
        node: &NodeRef,
        modifiers: Modifiers,
    ) -> Result<DragStart, InteractionError> {
        let snapshot = GraphSnapshot::new(self.store.nodes(), self.store.edges());

        // a vetoed start leaves any running gesture untouched
        if let Some((locked, editor)) = self.foreign_lock(&node.id, &snapshot) {
            tracing::warn!(
                node = %node.id,
                %locked,
                editor = %editor.name,
                "drag vetoed by soft lock"
            );
            self.events.publish(Event::ShowWarning {
                message: format!("{} is being edited by {}", locked, editor.name),
            });
            self.events.publish(Event::DragVetoed {
                node: node.id.clone(),
                locked: locked.clone(),
                editor: editor.clone(),
            });
            return Ok(DragStart::Vetoed { locked, editor });
        }

        if let Some(stale) = &self.session {
            tracing::warn!(
                gesture = %stale.gesture,
                "drag-start before drag-stop, dropping stale gesture"
            );
            self.abort(AbortReason::Superseded);
        }
        self.settling = false;

        let stored = match snapshot.node(&node.id) {
            Some(stored) => stored.clone(),
            None if node.kind == NodeKind::EDGE_ANCHOR => self.materialize_anchor(node, &snapshot)?,
            None => return Err(InteractionError::UnknownNode(node.id.clone())),
        };
        let size = if stored.is_measured() {
            stored.size
        } else {
            node.size
        };
        let gesture = GestureId::new();

        let duplicate = if modifiers.duplicate() && !stored.is_anchor() {
            self.start_duplicate(gesture, node, &stored, size)
        } else {
            None
        };

        let session = match duplicate {
            Some(session) => session,
            None => {
                let leader = Participant {
                    id: stored.id.clone(),
                    initial_position: stored.position,
                    size,
                };
                let followers = if stored.selected || node.selected {
                    snapshot
                        .nodes()
                        .iter()
                        .filter(|n| n.selected && n.id != stored.id && !n.is_anchor())
                        .map(|n| Participant {
                            id: n.id.clone(),
                            initial_position: n.position,
                            size: n.size,
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                DragSession::new(gesture, leader, followers)
            }
        };

        self.advance(GestureEvent::Start);
        let leader = session.leader.id.clone();
        let followers: Vec<NodeId> = session.followers.iter().map(|p| p.id.clone()).collect();
        tracing::debug!(%gesture, %leader, followers = followers.len(), "drag started");
        self.events.publish(Event::DragStarted {
            gesture,
            leader: leader.clone(),
            followers,
        });
        self.session = Some(session);
        Ok(DragStart::Started { gesture, leader })
    }

    /// First objection near `node_id` locked by someone other than us.
    fn foreign_lock(&self, node_id: &NodeId, snapshot: &GraphSnapshot) -> Option<(NodeId, Editor)> {
        for objection in attached_objections(snapshot, node_id) {
            let Some(editors) = guarded("editors_for_node", self.store.editors_for_node(&objection))
            else {
                continue;
            };
            if let Some(editor) = editors.into_iter().find(|e| e.id != self.local_editor) {
                return Some((objection, editor));
            }
        }
        None
    }

    /// Persist an anchor that so far only existed in the renderer, placed at
    /// its parent edge's current midpoint.
    fn materialize_anchor(
        &self,
        node: &NodeRef,
        snapshot: &GraphSnapshot,
    ) -> Result<Node, InteractionError> {
        let parent = node
            .parent_edge_id
            .clone()
            .ok_or_else(|| InteractionError::UnknownNode(node.id.clone()))?;

        let geometry = &self.settings.geometry;
        let position = snapshot
            .edge(&parent)
            .and_then(|edge| {
                let source = snapshot.node(&edge.source)?;
                let target = snapshot.node(&edge.target)?;
                let fallback = (source.center() + target.center()) * 0.5;
                Some(border_midpoint(source, target, fallback, geometry))
            })
            .unwrap_or(node.position);

        guarded(
            "ensure_edge_anchor",
            self.store.ensure_edge_anchor(&node.id, &parent, position),
        );
        Ok(self
            .store
            .node(&node.id)
            .unwrap_or_else(|| Node::anchor(node.id.as_str(), position, parent)))
    }

    /// Create the alt-drag duplicate and hand it the soft lock. Any failure
    /// falls back to a plain drag of the original.
    fn start_duplicate(
        &mut self,
        gesture: GestureId,
        node: &NodeRef,
        original: &Node,
        size: Vec2,
    ) -> Option<DragSession> {
        let offset = node.position - original.position;
        let duplicate = match self
            .store
            .duplicate_node_with_connections(&original.id, offset)
        {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::debug!(node = %original.id, "original vanished before duplication");
                return None;
            }
            Err(err) if err.is_unsupported() => {
                tracing::debug!(node = %original.id, "store cannot duplicate, dragging original");
                return None;
            }
            Err(err) => {
                tracing::warn!(node = %original.id, %err, "duplication failed, dragging original");
                return None;
            }
        };

        // the original's lock is only released once the duplicate holds one
        let locked = guarded(
            "lock_node",
            self.store
                .lock_node(&duplicate, &self.settings.duplicate_lock_reason),
        );
        if locked.is_some() {
            guarded("unlock_node", self.store.unlock_node(&original.id));
        }
        self.clones.insert(
            original.id.clone(),
            CloneEntry {
                duplicate: duplicate.clone(),
                origin: original.position,
            },
        );
        self.events.publish(Event::DuplicateCreated {
            gesture,
            original: original.id.clone(),
            duplicate: duplicate.clone(),
        });

        let leader = Participant {
            id: duplicate,
            initial_position: original.position + offset,
            size,
        };
        let original_id = original.id.clone();
        Some(DragSession::for_duplicate(gesture, leader, original_id))
    }

    // ========================================================================
    // Drag moves
    // ========================================================================

    pub fn drag(
        &mut self,
        node: &NodeRef,
        modifiers: Modifiers,
    ) -> Result<MoveOutcome, InteractionError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(MoveOutcome::Ignored);
        };
        if session.finalizing_snap || !session.tracks(&node.id) {
            tracing::trace!(node = %node.id, "drag event outside active gesture");
            return Ok(MoveOutcome::Ignored);
        }
        if self.phase.transition(GestureEvent::Move).is_none() {
            return Ok(MoveOutcome::Ignored);
        }

        let pending = PendingMove {
            node_id: node.id.clone(),
            proposed: node.position,
            modifiers,
        };
        if self.settings.throttle_to_frames {
            session.frames.schedule(pending);
            return Ok(MoveOutcome::Scheduled);
        }
        self.apply_move(pending)
    }

    /// Apply the move queued for this frame, if any.
    pub fn on_animation_frame(&mut self) -> Result<MoveOutcome, InteractionError> {
        if std::mem::take(&mut self.settling) {
            tracing::trace!("commit frame settled");
        }
        let Some(pending) = self.session.as_mut().and_then(|s| s.frames.take()) else {
            return Ok(MoveOutcome::Ignored);
        };
        self.apply_move(pending)
    }

    fn tracked_node_removed(&self, session: &DragSession) -> bool {
        self.store.node(&session.leader.id).is_none()
            || session
                .original
                .as_ref()
                .is_some_and(|original| self.store.node(original).is_none())
    }

    fn apply_move(&mut self, pending: PendingMove) -> Result<MoveOutcome, InteractionError> {
        let removed = match &self.session {
            Some(session) => self.tracked_node_removed(session),
            None => return Ok(MoveOutcome::Ignored),
        };
        if removed {
            tracing::warn!(
                node = %pending.node_id,
                "dragged node removed remotely, ending gesture"
            );
            self.abort(AbortReason::NodeRemoved);
            return Ok(MoveOutcome::Aborted);
        }

        // alt-drag: the host moves the original, pin it back
        if let Some(entry) = self.clones.get(&pending.node_id) {
            self.store
                .update_node_position(&pending.node_id, entry.origin)?;
        }

        let Some(session) = &self.session else {
            return Ok(MoveOutcome::Ignored);
        };
        let nodes = self.store.nodes();
        let delta = session.leader_delta(pending.proposed);
        let snap_enabled = self.settings.snap.enabled;

        let (mut writes, snapped) = if pending.modifiers.bypass_snap() {
            // no snapping and no rigid follow: only the leader moves
            (vec![(session.leader.id.clone(), pending.proposed)], None)
        } else if let Some(bounds) = session.group_bounds {
            let result = if snap_enabled {
                self.snap.snap_group(
                    bounds,
                    delta,
                    &session.participant_ids(),
                    &nodes,
                    self.zoom,
                )
            } else {
                SnapResult::unsnapped(bounds.min + delta)
            };
            (session.rigid_positions(delta + result.offset), Some(result))
        } else {
            let result = if snap_enabled {
                self.snap.snap_node(
                    &session.leader.id,
                    pending.proposed,
                    session.leader.size,
                    &nodes,
                    self.zoom,
                )
            } else {
                SnapResult::unsnapped(pending.proposed)
            };
            let write = (session.leader.id.clone(), result.position);
            (vec![write], Some(result))
        };

        let present: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
        writes.retain(|(id, _)| present.contains(id));
        let leader_position = writes
            .iter()
            .find(|(id, _)| id == &session.leader.id)
            .map_or(pending.proposed, |(_, position)| *position);

        self.store.update_node_positions(&writes)?;
        if let Some(session) = self.session.as_mut() {
            session.last_position = leader_position;
        }
        self.snap_result = snapped.filter(SnapResult::is_snapped);
        tracing::trace!(
            x = leader_position.x,
            y = leader_position.y,
            writes = writes.len(),
            "applied drag move"
        );
        Ok(MoveOutcome::Applied(leader_position))
    }

    // ========================================================================
    // Drag stop
    // ========================================================================

    /// Write the final snapped position and release every piece of gesture
    /// state. Returns the committed leader position.
    ///
    /// Cleanup runs even when the final write fails; the error is returned
    /// afterwards.
    pub fn drag_stop(
        &mut self,
        node: &NodeRef,
        modifiers: Modifiers,
    ) -> Result<Option<Vec2>, InteractionError> {
        let tracked = self.session.as_ref().is_some_and(|s| s.tracks(&node.id));
        if !tracked || !self.advance(GestureEvent::Stop) {
            if let Some(entry) = self.clones.remove(&node.id) {
                guarded("unlock_node", self.store.unlock_node(&entry.duplicate));
            }
            tracing::debug!(node = %node.id, "drag-stop without matching gesture");
            return Ok(None);
        }

        if let Some(session) = self.session.as_mut() {
            session.finalizing_snap = true;
            session.frames.cancel();
        }

        let outcome = self.apply_move(PendingMove {
            node_id: node.id.clone(),
            proposed: node.position,
            modifiers,
        });
        let committed = match outcome {
            Ok(MoveOutcome::Applied(position)) => Some(position),
            _ => None,
        };
        self.finish(committed);
        outcome.map(|_| committed)
    }

    fn release_clone(&mut self, session: &DragSession) {
        if let Some(original) = &session.original {
            self.clones.remove(original);
            guarded("unlock_node", self.store.unlock_node(&session.leader.id));
        }
    }

    fn finish(&mut self, committed: Option<Vec2>) {
        let Some(session) = self.session.take() else {
            return;
        };
        guarded("stop_capturing", self.store.stop_capturing());
        self.release_clone(&session);
        self.snap_result = None;
        self.settling = true;
        self.advance(GestureEvent::Committed);

        let position = committed.unwrap_or(session.last_position);
        tracing::info!(
            gesture = %session.gesture,
            leader = %session.leader.id,
            x = position.x,
            y = position.y,
            "drag finished"
        );
        self.events.publish(Event::DragFinished {
            gesture: session.gesture,
            leader: session.leader.id,
            position,
        });
    }

    /// End the gesture without writing any more positions.
    fn abort(&mut self, reason: AbortReason) {
        let Some(session) = self.session.take() else {
            return;
        };
        guarded("stop_capturing", self.store.stop_capturing());
        self.release_clone(&session);
        self.snap_result = None;
        if !self.advance(GestureEvent::Abort) {
            self.phase = DragPhase::Idle;
        }
        tracing::info!(gesture = %session.gesture, ?reason, "drag aborted");
        self.events.publish(Event::DragAborted {
            gesture: session.gesture,
            leader: session.leader.id,
            reason,
        });
    }

    // ========================================================================
    // Clicks
    // ========================================================================

    pub fn click(
        &mut self,
        node: &NodeRef,
        modifiers: Modifiers,
        context: ClickContext,
    ) -> Result<ClickOutcome, InteractionError> {
        if context.select_mode && modifiers.toggle_selection() {
            let current = self
                .store
                .node(&node.id)
                .map_or(node.selected, |n| n.selected);
            let selected = !current;
            match self.store.set_node_selected(&node.id, selected) {
                Ok(()) => {}
                Err(err) if err.is_unsupported() => {
                    tracing::debug!(
                        node = %node.id,
                        "store has no selection state, host applies it"
                    );
                }
                Err(err) => return Err(err.into()),
            }
            self.events.publish(Event::SelectionToggled {
                node: node.id.clone(),
                selected,
            });
            return Ok(ClickOutcome::Toggled { selected });
        }
        if context.grab_mode {
            return Ok(ClickOutcome::Suppressed);
        }
        Ok(ClickOutcome::Forwarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::{GraphDocument, MemoryGraphStore};
    use argmap_core::Edge;

    fn editor() -> Editor {
        Editor::new("me", "Me")
    }

    fn coordinator(nodes: Vec<Node>, edges: Vec<Edge>) -> DragCoordinator<MemoryGraphStore> {
        let store = MemoryGraphStore::new(GraphDocument { nodes, edges }, editor());
        let mut settings = InteractionSettings::default();
        settings.throttle_to_frames = false;
        DragCoordinator::new(store, editor().id, settings, EventBus::new())
    }

    fn card(id: &str, x: f32, y: f32) -> Node {
        Node::new(id, Vec2::new(x, y), Vec2::new(100.0, 50.0))
    }

    fn grab(c: &DragCoordinator<MemoryGraphStore>, id: &str) -> NodeRef {
        NodeRef::from(&c.store().node(&NodeId::from(id)).unwrap())
    }

    #[test]
    fn test_single_drag_snaps_and_commits() {
        let mut c = coordinator(vec![card("a", 0.0, 0.0), card("b", 400.0, 300.0)], vec![]);
        let a = grab(&c, "a");

        assert!(matches!(
            c.drag_start(&a, Modifiers::default()).unwrap(),
            DragStart::Started { .. }
        ));
        assert!(c.dragging_active());

        // 10 units left of b's left edge
        let outcome = c.drag(&a.at(Vec2::new(390.0, 0.0)), Modifiers::default()).unwrap();
        assert_eq!(outcome, MoveOutcome::Applied(Vec2::new(400.0, 0.0)));
        let guide = c.snap_result().unwrap().x.as_ref().unwrap();
        assert_eq!(guide.target.as_str(), "b");

        let committed = c
            .drag_stop(&a.at(Vec2::new(395.0, 120.0)), Modifiers::default())
            .unwrap();
        assert_eq!(committed, Some(Vec2::new(400.0, 120.0)));
        assert!(!c.dragging_active());
        assert!(c.snap_result().is_none());
        assert_eq!(c.store().graph().capture_batches(), 1);
    }

    #[test]
    fn test_bypass_writes_raw_position() {
        let mut c = coordinator(vec![card("a", 0.0, 0.0), card("b", 400.0, 300.0)], vec![]);
        let a = grab(&c, "a");
        let bypass = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        c.drag_start(&a, bypass).unwrap();
        let outcome = c.drag(&a.at(Vec2::new(390.0, 0.0)), bypass).unwrap();
        assert_eq!(outcome, MoveOutcome::Applied(Vec2::new(390.0, 0.0)));
        assert!(c.snap_result().is_none());
    }

    #[test]
    fn test_throttled_moves_wait_for_frame() {
        let mut c = coordinator(vec![card("a", 0.0, 0.0)], vec![]);
        let mut settings = c.settings().clone();
        settings.throttle_to_frames = true;
        c.set_settings(settings);
        let a = grab(&c, "a");

        c.drag_start(&a, Modifiers::default()).unwrap();
        for x in [10.0, 20.0, 30.0] {
            let outcome = c.drag(&a.at(Vec2::new(x, 0.0)), Modifiers::default()).unwrap();
            assert_eq!(outcome, MoveOutcome::Scheduled);
        }
        assert!(c.store().graph().write_log().is_empty());

        assert_eq!(
            c.on_animation_frame().unwrap(),
            MoveOutcome::Applied(Vec2::new(30.0, 0.0))
        );
        assert_eq!(c.on_animation_frame().unwrap(), MoveOutcome::Ignored);
        assert_eq!(c.store().graph().writes_for(&NodeId::from("a")), 1);
    }

    #[test]
    fn test_moves_outside_gesture_are_ignored() {
        let mut c = coordinator(vec![card("a", 0.0, 0.0), card("b", 500.0, 500.0)], vec![]);
        let a = grab(&c, "a");
        let b = grab(&c, "b");
        let none = Modifiers::default();
        assert_eq!(c.drag(&a, none).unwrap(), MoveOutcome::Ignored);

        c.drag_start(&a, Modifiers::default()).unwrap();
        assert_eq!(c.drag(&b, none).unwrap(), MoveOutcome::Ignored);
        assert_eq!(c.drag_stop(&b, none).unwrap(), None);
        assert!(c.dragging_active());
    }

    #[test]
    fn test_unknown_node_is_an_error() {
        let mut c = coordinator(vec![card("a", 0.0, 0.0)], vec![]);
        let ghost = NodeRef::new("ghost", Vec2::ZERO);
        assert!(matches!(
            c.drag_start(&ghost, Modifiers::default()),
            Err(InteractionError::UnknownNode(_))
        ));
        assert!(!c.dragging_active());
    }

    #[test]
    fn test_new_start_supersedes_stale_gesture() {
        let mut c = coordinator(vec![card("a", 0.0, 0.0), card("b", 500.0, 500.0)], vec![]);
        let a = grab(&c, "a");
        let b = grab(&c, "b");
        c.drag_start(&a, Modifiers::default()).unwrap();
        c.events().drain();

        c.drag_start(&b, Modifiers::default()).unwrap();
        let events = c.events().drain();
        assert!(matches!(
            events[0],
            Event::DragAborted {
                reason: AbortReason::Superseded,
                ..
            }
        ));
        assert_eq!(c.session().unwrap().leader.id.as_str(), "b");
    }

    #[test]
    fn test_shift_click_toggles_in_select_mode() {
        let mut c = coordinator(vec![card("a", 0.0, 0.0)], vec![]);
        let a = grab(&c, "a");
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        let select = ClickContext {
            select_mode: true,
            grab_mode: false,
        };

        assert_eq!(
            c.click(&a, shift, select).unwrap(),
            ClickOutcome::Toggled { selected: true }
        );
        assert!(c.store().node(&a.id).unwrap().selected);
        assert_eq!(
            c.click(&a, shift, select).unwrap(),
            ClickOutcome::Toggled { selected: false }
        );

        let grab_mode = ClickContext {
            select_mode: false,
            grab_mode: true,
        };
        assert_eq!(
            c.click(&a, Modifiers::default(), grab_mode).unwrap(),
            ClickOutcome::Suppressed
        );
        assert_eq!(
            c.click(&a, shift, ClickContext::default()).unwrap(),
            ClickOutcome::Forwarded
        );
    }

    #[test]
    fn test_attached_objections() {
        let snapshot = GraphSnapshot::new(
            vec![
                card("a", 0.0, 0.0),
                card("b", 400.0, 0.0),
                Node::anchor("anchor", Vec2::new(250.0, 25.0), EdgeId::from("ab")),
                card("obj", 250.0, 200.0).with_kind(NodeKind::OBJECTION),
                card("note", 250.0, 400.0),
            ],
            vec![
                Edge::new("ab", "a", "b"),
                Edge::new("o1", "obj", "anchor"),
                Edge::new("o2", "note", "anchor"),
            ],
        );
        assert_eq!(
            attached_objections(&snapshot, &NodeId::from("a")),
            vec![NodeId::from("obj")]
        );
        let note = NodeId::from("note");
        assert!(attached_objections(&snapshot, &note).is_empty());
    }
}

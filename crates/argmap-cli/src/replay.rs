//! Scripted multi-editor sessions against an in-memory diagram.

use anyhow::{Context, Result, bail};
use argmap_core::{EdgeId, Editor, EditorId, NodeId, NodeKind, Vec2};
use argmap_events::{Event, EventBus};
use argmap_interaction::{
    DragCoordinator, GraphDocument, GraphStore, InteractionHandlers, InteractionSettings,
    MemoryGraphStore, Modifiers, NodeRef, PointerEvent, SharedGraph,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub settings: Option<InteractionSettings>,
    #[serde(default)]
    pub editors: Vec<Editor>,
    pub graph: GraphDocument,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    DragStart {
        editor: EditorId,
        node: NodeId,
        #[serde(default)]
        position: Option<Vec2>,
        #[serde(default)]
        modifiers: Modifiers,
        /// Drag an edge anchor that may not exist in the store yet.
        #[serde(default)]
        anchor_of: Option<EdgeId>,
    },
    Drag {
        editor: EditorId,
        node: NodeId,
        position: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DragStop {
        editor: EditorId,
        node: NodeId,
        position: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Frame {
        editor: EditorId,
    },
    Click {
        editor: EditorId,
        node: NodeId,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        select_mode: bool,
        #[serde(default)]
        grab_mode: bool,
    },
    Zoom {
        editor: EditorId,
        zoom: f32,
    },
    Lock {
        editor: EditorId,
        node: NodeId,
        #[serde(default)]
        reason: String,
    },
    Unlock {
        editor: EditorId,
        node: NodeId,
    },
    /// A collaborator deletes a node.
    Remove {
        node: NodeId,
    },
}

impl Step {
    fn editor(&self) -> Option<&EditorId> {
        match self {
            Step::DragStart { editor, .. }
            | Step::Drag { editor, .. }
            | Step::DragStop { editor, .. }
            | Step::Frame { editor }
            | Step::Click { editor, .. }
            | Step::Zoom { editor, .. }
            | Step::Lock { editor, .. }
            | Step::Unlock { editor, .. } => Some(editor),
            Step::Remove { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub editor: Option<EditorId>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub graph: GraphDocument,
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing scenario {}", path.display()))
    }
}

struct Session {
    handlers: InteractionHandlers<MemoryGraphStore>,
    events: EventBus,
}

pub struct Replay {
    graph: SharedGraph,
    settings: InteractionSettings,
    editors: Vec<Editor>,
    sessions: BTreeMap<EditorId, Session>,
}

impl Replay {
    /// `settings` overrides whatever the scenario embeds.
    pub fn new(scenario: &Scenario, settings: Option<InteractionSettings>) -> Self {
        let settings = settings
            .or_else(|| scenario.settings.clone())
            .unwrap_or_default();
        Self {
            graph: SharedGraph::new(scenario.graph.clone()),
            settings,
            editors: scenario.editors.clone(),
            sessions: BTreeMap::new(),
        }
    }

    fn session(&mut self, id: &EditorId) -> &mut Session {
        let graph = &self.graph;
        let settings = &self.settings;
        let editors = &self.editors;
        self.sessions.entry(id.clone()).or_insert_with(|| {
            let editor = editors
                .iter()
                .find(|e| &e.id == id)
                .cloned()
                .unwrap_or_else(|| Editor::new(id.0.clone(), id.0.clone()));
            let events = EventBus::new();
            let coordinator = DragCoordinator::new(
                graph.connect(editor),
                id.clone(),
                settings.clone(),
                events.clone(),
            );
            Session {
                handlers: InteractionHandlers::new(coordinator),
                events,
            }
        })
    }

    fn node_ref(&self, id: &NodeId, anchor_of: Option<&EdgeId>) -> Result<NodeRef> {
        let document = self.graph.document();
        if let Some(node) = document.nodes.iter().find(|n| &n.id == id) {
            return Ok(NodeRef::from(node));
        }
        match anchor_of {
            Some(edge) => Ok(NodeRef {
                kind: NodeKind::EDGE_ANCHOR,
                parent_edge_id: Some(edge.clone()),
                ..NodeRef::new(id.as_str(), Vec2::ZERO)
            }),
            None => bail!("unknown node {id}"),
        }
    }

    pub fn apply(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::DragStart {
                editor,
                node,
                position,
                modifiers,
                anchor_of,
            } => {
                let mut target = self.node_ref(node, anchor_of.as_ref())?;
                if let Some(position) = position {
                    target.position = *position;
                }
                let mut event = PointerEvent::new(target.position, *modifiers);
                let accepted = self
                    .session(editor)
                    .handlers
                    .handle_node_drag_start(&mut event, &target);
                tracing::debug!(%editor, %node, accepted, "drag-start");
            }
            Step::Drag {
                editor,
                node,
                position,
                modifiers,
            } => {
                let target = self.moved_ref(node, *position);
                let mut event = PointerEvent::new(*position, *modifiers);
                self.session(editor)
                    .handlers
                    .handle_node_drag(&mut event, &target);
            }
            Step::DragStop {
                editor,
                node,
                position,
                modifiers,
            } => {
                let target = self.moved_ref(node, *position);
                let mut event = PointerEvent::new(*position, *modifiers);
                let session = self.session(editor);
                session.handlers.on_animation_frame();
                session.handlers.handle_node_drag_stop(&mut event, &target);
            }
            Step::Frame { editor } => self.session(editor).handlers.on_animation_frame(),
            Step::Click {
                editor,
                node,
                modifiers,
                select_mode,
                grab_mode,
            } => {
                let target = self.node_ref(node, None)?;
                let mut event = PointerEvent::new(target.position, *modifiers);
                let handlers = &mut self.session(editor).handlers;
                handlers.set_select_mode(*select_mode);
                handlers.set_grab_mode(*grab_mode);
                handlers.handle_node_click(&mut event, &target);
            }
            Step::Zoom { editor, zoom } => {
                self.session(editor)
                    .handlers
                    .coordinator_mut()
                    .set_zoom(*zoom);
            }
            Step::Lock {
                editor,
                node,
                reason,
            } => {
                self.session(editor)
                    .handlers
                    .coordinator()
                    .store()
                    .lock_node(node, reason)
                    .with_context(|| format!("locking {node}"))?;
            }
            Step::Unlock { editor, node } => {
                self.session(editor)
                    .handlers
                    .coordinator()
                    .store()
                    .unlock_node(node)
                    .with_context(|| format!("unlocking {node}"))?;
            }
            Step::Remove { node } => {
                if !self.graph.remove_node(node) {
                    tracing::warn!(%node, "remove step for missing node");
                }
            }
        }
        Ok(())
    }

    /// Node reference for a move event. Nodes deleted remotely are still
    /// reported by the host until it catches up.
    fn moved_ref(&self, id: &NodeId, position: Vec2) -> NodeRef {
        match self.node_ref(id, None) {
            Ok(node) => node.at(position),
            Err(_) => NodeRef::new(id.as_str(), position),
        }
    }

    fn drain_events(&self, editor: Option<&EditorId>) -> Vec<Event> {
        editor
            .and_then(|id| self.sessions.get(id))
            .map(|session| session.events.drain())
            .unwrap_or_default()
    }

    pub fn run(mut self, steps: &[Step]) -> Result<ReplayReport> {
        let mut reports = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            self.apply(step)
                .with_context(|| format!("step {index} failed"))?;
            reports.push(StepReport {
                index,
                editor: step.editor().cloned(),
                events: self.drain_events(step.editor()),
            });
        }
        Ok(ReplayReport {
            steps: reports,
            graph: self.graph.document(),
        })
    }
}

pub fn replay(scenario: &Scenario, settings: Option<InteractionSettings>) -> Result<ReplayReport> {
    if scenario.steps.is_empty() {
        bail!("scenario has no steps");
    }
    Replay::new(scenario, settings).run(&scenario.steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALT_CLONE: &str = r#"{
        "editors": [{"id": "alice", "name": "Alice"}],
        "graph": {
            "nodes": [
                {"id": "claim", "position": {"x": 0, "y": 0}, "size": {"x": 120, "y": 60}}
            ],
            "edges": []
        },
        "steps": [
            {"action": "drag_start", "editor": "alice", "node": "claim",
             "modifiers": {"alt": true}},
            {"action": "drag", "editor": "alice", "node": "claim", "position": {"x": 150, "y": 0}},
            {"action": "frame", "editor": "alice"},
            {"action": "drag_stop", "editor": "alice", "node": "claim",
             "position": {"x": 200, "y": 0}}
        ]
    }"#;

    const LOCKED: &str = r#"{
        "graph": {
            "nodes": [
                {"id": "a", "position": {"x": 0, "y": 0}, "size": {"x": 100, "y": 50}},
                {"id": "b", "position": {"x": 400, "y": 0}, "size": {"x": 100, "y": 50}},
                {"id": "anchor", "kind": "EDGE_ANCHOR", "position": {"x": 250, "y": 25},
                 "parent_edge_id": "ab"},
                {"id": "obj", "kind": "OBJECTION", "position": {"x": 200, "y": 200},
                 "size": {"x": 100, "y": 50}}
            ],
            "edges": [
                {"id": "ab", "source": "a", "target": "b"},
                {"id": "objects", "source": "obj", "target": "anchor"}
            ]
        },
        "steps": [
            {"action": "lock", "editor": "bob", "node": "obj", "reason": "editing"},
            {"action": "drag_start", "editor": "alice", "node": "a"},
            {"action": "drag", "editor": "alice", "node": "a", "position": {"x": 0, "y": 300}}
        ]
    }"#;

    #[test]
    fn test_replay_alt_clone() {
        let scenario: Scenario = serde_json::from_str(ALT_CLONE).unwrap();
        let report = replay(&scenario, None).unwrap();

        assert_eq!(report.graph.nodes.len(), 2);
        let claim = report
            .graph
            .nodes
            .iter()
            .find(|n| n.id.as_str() == "claim")
            .unwrap();
        assert_eq!(claim.position, Vec2::ZERO);
        let copy = report
            .graph
            .nodes
            .iter()
            .find(|n| n.id.as_str() != "claim")
            .unwrap();
        assert_eq!(copy.position, Vec2::new(200.0, 0.0));

        assert!(
            report.steps[0]
                .events
                .iter()
                .any(|e| matches!(e, Event::DuplicateCreated { .. }))
        );
        assert!(
            report.steps[3]
                .events
                .iter()
                .any(|e| matches!(e, Event::DragFinished { .. }))
        );
    }

    #[test]
    fn test_replay_locked_objection() {
        let scenario: Scenario = serde_json::from_str(LOCKED).unwrap();
        let report = replay(&scenario, None).unwrap();
        assert!(
            report.steps[1]
                .events
                .iter()
                .any(|e| matches!(e, Event::DragVetoed { .. }))
        );
        let a = report
            .graph
            .nodes
            .iter()
            .find(|n| n.id.as_str() == "a")
            .unwrap();
        assert_eq!(a.position, Vec2::ZERO);
    }

    #[test]
    fn test_unknown_node_fails_step() {
        let scenario: Scenario = serde_json::from_str(
            r#"{"graph": {}, "steps": [{"action": "click", "editor": "x", "node": "nope"}]}"#,
        )
        .unwrap();
        let err = replay(&scenario, None).unwrap_err();
        assert!(err.to_string().contains("step 0"));
    }

    #[test]
    fn test_demo_lock_scenario() {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../demos/locked_objection.json"
        );
        let scenario = Scenario::load(path).unwrap();
        let report = replay(&scenario, None).unwrap();

        assert!(
            report.steps[3]
                .events
                .iter()
                .any(|e| matches!(e, Event::DragVetoed { .. }))
        );
        assert!(
            report.steps[6]
                .events
                .iter()
                .any(|e| matches!(e, Event::DragStarted { .. }))
        );
        let anchor = report
            .graph
            .nodes
            .iter()
            .find(|n| n.id.as_str() == "anchor-supports")
            .unwrap();
        assert!(anchor.is_anchor());
        let reason = report
            .graph
            .nodes
            .iter()
            .find(|n| n.id.as_str() == "reason")
            .unwrap();
        assert_eq!(reason.position, Vec2::new(300.0, 400.0));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        std::fs::write(&path, ALT_CLONE).unwrap();
        let scenario = Scenario::load(&path).unwrap();
        assert_eq!(scenario.steps.len(), 4);
        assert!(Scenario::load(dir.path().join("missing.json")).is_err());
    }
}

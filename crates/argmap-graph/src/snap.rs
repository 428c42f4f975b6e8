//! Alignment snapping for dragged nodes and rigid selections.

use argmap_core::{Node, NodeId, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Snap distance in screen pixels.
pub const DEFAULT_SNAP_THRESHOLD_PX: f32 = 32.0;

/// Which feature of the dragged box lined up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapAnchor {
    Center,
    /// Left edge on the x axis, top edge on the y axis.
    Start,
    /// Right edge on the x axis, bottom edge on the y axis.
    End,
}

/// A guide line to draw while snapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    /// Diagram coordinate of the guide on its axis.
    pub coordinate: f32,
    pub anchor: SnapAnchor,
    pub target: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapResult {
    /// Top-left of the box after snapping.
    pub position: Vec2,
    /// Correction applied on top of the proposed position.
    pub offset: Vec2,
    pub x: Option<SnapGuide>,
    pub y: Option<SnapGuide>,
}

impl SnapResult {
    pub fn unsnapped(position: Vec2) -> Self {
        Self {
            position,
            offset: Vec2::ZERO,
            x: None,
            y: None,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

struct AxisHit {
    distance: f32,
    delta: f32,
    guide: SnapGuide,
}

/// Finds alignment targets among other nodes.
///
/// The engine is a pure function of its inputs: the same node set, proposed
/// box and zoom always yield the same result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    pub threshold_px: f32,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_SNAP_THRESHOLD_PX,
        }
    }
}

impl SnapEngine {
    pub fn new(threshold_px: f32) -> Self {
        Self { threshold_px }
    }

    /// Snap distance in diagram units so it feels constant on screen.
    pub fn threshold_units(&self, zoom: f32) -> f32 {
        if zoom.is_finite() && zoom > 0.0 {
            self.threshold_px / zoom
        } else {
            self.threshold_px
        }
    }

    /// Snap an arbitrary box against `nodes`, skipping ids in `exclude`,
    /// edge anchors, and nodes without a measured size.
    pub fn snap_rect<'a, I>(
        &self,
        rect: Rect,
        nodes: I,
        exclude: &HashSet<NodeId>,
        zoom: f32,
    ) -> SnapResult
    where
        I: IntoIterator<Item = &'a Node>,
    {
        let threshold = self.threshold_units(zoom);
        if threshold.is_nan()
            || threshold <= 0.0
            || !rect.min.is_finite()
            || !rect.max.is_finite()
        {
            return SnapResult::unsnapped(rect.min);
        }

        let dragged_x = axis_features(rect.min.x, rect.max.x);
        let dragged_y = axis_features(rect.min.y, rect.max.y);
        let mut best_x: Option<AxisHit> = None;
        let mut best_y: Option<AxisHit> = None;

        for node in nodes {
            if node.is_anchor() || !node.is_measured() || exclude.contains(&node.id) {
                continue;
            }
            let target = node.rect();
            consider(
                &mut best_x,
                dragged_x,
                axis_features(target.min.x, target.max.x),
                threshold,
                &node.id,
            );
            consider(
                &mut best_y,
                dragged_y,
                axis_features(target.min.y, target.max.y),
                threshold,
                &node.id,
            );
        }

        let offset = Vec2::new(
            best_x.as_ref().map_or(0.0, |hit| hit.delta),
            best_y.as_ref().map_or(0.0, |hit| hit.delta),
        );
        SnapResult {
            position: rect.min + offset,
            offset,
            x: best_x.map(|hit| hit.guide),
            y: best_y.map(|hit| hit.guide),
        }
    }

    /// Single-node mode: snap `node_id` proposed at `position`.
    pub fn snap_node(
        &self,
        node_id: &NodeId,
        position: Vec2,
        size: Vec2,
        nodes: &[Node],
        zoom: f32,
    ) -> SnapResult {
        let exclude = HashSet::from([node_id.clone()]);
        self.snap_rect(Rect::from_pos_size(position, size), nodes, &exclude, zoom)
    }

    /// Group mode: snap the selection's initial bounding box moved by `delta`
    /// as one rigid body. Apply `result.offset` plus `delta` to every member.
    pub fn snap_group(
        &self,
        initial_bounds: Rect,
        delta: Vec2,
        members: &HashSet<NodeId>,
        nodes: &[Node],
        zoom: f32,
    ) -> SnapResult {
        self.snap_rect(initial_bounds.translate(delta), nodes, members, zoom)
    }
}

/// Center, start and end coordinates along one axis; order is the
/// tie-break order.
fn axis_features(min: f32, max: f32) -> [(SnapAnchor, f32); 3] {
    [
        (SnapAnchor::Center, (min + max) * 0.5),
        (SnapAnchor::Start, min),
        (SnapAnchor::End, max),
    ]
}

fn consider(
    best: &mut Option<AxisHit>,
    dragged: [(SnapAnchor, f32); 3],
    target: [(SnapAnchor, f32); 3],
    threshold: f32,
    target_id: &NodeId,
) {
    for ((anchor, from), (_, to)) in dragged.into_iter().zip(target) {
        let distance = (to - from).abs();
        if distance > threshold {
            continue;
        }
        // strict comparison keeps the first candidate found on ties
        if best.as_ref().is_some_and(|hit| distance >= hit.distance) {
            continue;
        }
        *best = Some(AxisHit {
            distance,
            delta: to - from,
            guide: SnapGuide {
                coordinate: to,
                anchor,
                target: target_id.clone(),
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmap_core::NodeKind;
    use proptest::prelude::*;

    fn node(id: &str, x: f32, y: f32, w: f32, h: f32) -> Node {
        Node::new(id, Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_snaps_left_edge_within_threshold() {
        let nodes = vec![node("t", 100.0, 300.0, 80.0, 40.0)];
        let engine = SnapEngine::default();
        let result = engine.snap_node(
            &NodeId::from("d"),
            Vec2::new(110.0, 0.0),
            Vec2::new(120.0, 40.0),
            &nodes,
            1.0,
        );
        // centers: 170 vs 140 (30 away), left: 110 vs 100 (10 away)
        let guide = result.x.clone().unwrap();
        assert_eq!(guide.anchor, SnapAnchor::Start);
        assert_eq!(guide.coordinate, 100.0);
        assert_eq!(result.position.x, 100.0);
        assert!(result.y.is_none());
        assert_eq!(result.position.y, 0.0);
    }

    #[test]
    fn test_center_wins_ties() {
        // same-size boxes: center and both edges are equally far
        let nodes = vec![node("t", 0.0, 500.0, 100.0, 50.0)];
        let engine = SnapEngine::default();
        let result = engine.snap_node(
            &NodeId::from("d"),
            Vec2::new(10.0, 0.0),
            Vec2::new(100.0, 50.0),
            &nodes,
            1.0,
        );
        assert_eq!(result.x.unwrap().anchor, SnapAnchor::Center);
        assert_eq!(result.position.x, 0.0);
    }

    #[test]
    fn test_threshold_scales_with_zoom() {
        let nodes = vec![node("t", 0.0, 500.0, 100.0, 50.0)];
        let engine = SnapEngine::default();
        let at = |zoom| {
            engine.snap_node(
                &NodeId::from("d"),
                Vec2::new(40.0, 0.0),
                Vec2::new(100.0, 50.0),
                &nodes,
                zoom,
            )
        };
        // 40 units away: out of reach at 1x (32), in reach at 0.5x (64)
        assert!(at(1.0).x.is_none());
        assert!(at(0.5).x.is_some());
        assert!(at(2.0).x.is_none());
        assert_eq!(engine.threshold_units(0.0), DEFAULT_SNAP_THRESHOLD_PX);
    }

    #[test]
    fn test_both_axes_snap_independently() {
        let nodes = vec![
            node("left", 0.0, 0.0, 50.0, 50.0),
            node("below", 300.0, 400.0, 50.0, 50.0),
        ];
        let engine = SnapEngine::default();
        let result = engine.snap_node(
            &NodeId::from("d"),
            Vec2::new(5.0, 395.0),
            Vec2::new(50.0, 50.0),
            &nodes,
            1.0,
        );
        assert_eq!(result.position, Vec2::new(0.0, 400.0));
        assert_eq!(result.x.unwrap().target.as_str(), "left");
        assert_eq!(result.y.unwrap().target.as_str(), "below");
    }

    #[test]
    fn test_anchors_excluded_and_self_excluded() {
        let nodes = vec![
            Node::anchor("a", Vec2::new(12.0, 12.0), "e".into()),
            node("d", 10.0, 10.0, 50.0, 50.0),
            node("o", 500.0, 500.0, 10.0, 10.0).with_kind(NodeKind::OBJECTION),
        ];
        let engine = SnapEngine::default();
        let result = engine.snap_node(
            &NodeId::from("d"),
            Vec2::new(10.0, 10.0),
            Vec2::new(50.0, 50.0),
            &nodes,
            1.0,
        );
        assert!(!result.is_snapped());
        assert_eq!(result.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_group_snaps_bounding_box() {
        let nodes = vec![
            node("m1", 0.0, 0.0, 40.0, 40.0),
            node("m2", 100.0, 0.0, 40.0, 40.0),
            node("wall", 260.0, 200.0, 50.0, 300.0),
        ];
        let members: HashSet<NodeId> = ["m1", "m2"].into_iter().map(NodeId::from).collect();
        let bounds = Rect::from_pos_size(Vec2::ZERO, Vec2::new(140.0, 40.0));
        let engine = SnapEngine::default();

        // group right edge lands at 305, wall right edge is 310
        let result = engine.snap_group(bounds, Vec2::new(165.0, 250.0), &members, &nodes, 1.0);
        let x = result.x.clone().unwrap();
        assert_eq!(x.target.as_str(), "wall");
        assert_eq!(x.anchor, SnapAnchor::End);
        assert_eq!(result.offset.x, 5.0);
        assert!(result.y.is_none());
    }

    proptest! {
        #[test]
        fn prop_snap_is_idempotent(
            px in -500.0f32..500.0,
            py in -500.0f32..500.0,
            zoom in 0.25f32..4.0,
            positions in proptest::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 0..10)
        ) {
            let nodes: Vec<Node> = positions
                .iter()
                .enumerate()
                .map(|(i, (x, y))| node(&format!("n{i}"), *x, *y, 60.0, 30.0))
                .collect();
            let engine = SnapEngine::default();
            let id = NodeId::from("dragged");
            let (at, size) = (Vec2::new(px, py), Vec2::new(80.0, 40.0));
            let first = engine.snap_node(&id, at, size, &nodes, zoom);
            let second = engine.snap_node(&id, at, size, &nodes, zoom);
            prop_assert_eq!(&first, &second);

            let threshold = engine.threshold_units(zoom);
            prop_assert!(first.offset.x.abs() <= threshold + 1e-3);
            prop_assert!(first.offset.y.abs() <= threshold + 1e-3);
        }
    }
}

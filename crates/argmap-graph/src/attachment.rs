//! Spreading of edge end points when several edges meet at one node.

use crate::geometry::{GeometrySettings, NodeShape, node_shape};
use crate::snapshot::GraphSnapshot;
use argmap_core::{Edge, EdgeId, Node, NodeId, Vec2};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Portion of the node's smallest extent the fan may cover before spacing is
/// compressed.
const FAN_FILL: f32 = 0.9;

/// One edge's place in the fan around a shared endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentSlot {
    pub edge_id: EdgeId,
    /// Signed slot index relative to the middle of the fan (e.g. -1, 0, 1).
    pub slot: f32,
    /// Perpendicular offset actually applied after compression and clamping.
    pub offset: f32,
    pub point: Vec2,
}

struct Incident<'a> {
    edge: &'a Edge,
    angle: Option<f32>,
    direction: Vec2,
}

impl Incident<'_> {
    fn sort_angle(&self) -> f32 {
        self.angle.unwrap_or(0.0)
    }
}

/// Attachment points for every edge incident on `node`.
///
/// Returns `None` when fewer than two edges touch the node (the default border
/// point is fine) or when the node itself has no measurable outline yet. The
/// slots are returned in fan order, which starts right after the widest
/// angular gap between neighbours.
pub fn distribute_attachment_points(
    snapshot: &GraphSnapshot,
    node: &Node,
    settings: &GeometrySettings,
) -> Option<Vec<AttachmentSlot>> {
    let incident: Vec<&Edge> = snapshot.incident_edges(&node.id).collect();
    if incident.len() < 2 {
        return None;
    }
    let shape = node_shape(node, settings.anchor_radius)?;
    let center = shape.center();

    let (mut angled, mut unangled): (Vec<Incident>, Vec<Incident>) = incident
        .into_iter()
        .map(|edge| describe(snapshot, &node.id, edge, center, settings))
        .partition(|inc| inc.angle.is_some());

    angled.sort_by(|a, b| a.edge.id.cmp(&b.edge.id));
    angled.sort_by(|a, b| a.sort_angle().total_cmp(&b.sort_angle()));
    unangled.sort_by(|a, b| a.edge.id.cmp(&b.edge.id));

    if let Some(start) = index_after_widest_gap(&angled) {
        angled.rotate_left(start);
    }

    let ordered: Vec<Incident> = angled.into_iter().chain(unangled).collect();
    let n = ordered.len();
    let spacing = fitted_spacing(&shape, settings.attachment_spacing, n);
    if spacing < settings.attachment_spacing {
        tracing::trace!(node = %node.id, edges = n, spacing, "compressed attachment fan");
    }
    let mid = (n - 1) as f32 / 2.0;

    let slots = ordered
        .into_iter()
        .enumerate()
        .map(|(i, inc)| {
            let slot = i as f32 - mid;
            let perp = inc.direction.perp();
            let limit = shape.reach(perp);
            let offset = (slot * spacing).clamp(-limit, limit);
            let origin = center + perp * offset;
            AttachmentSlot {
                edge_id: inc.edge.id.clone(),
                slot,
                offset,
                point: shape.exit_from(origin, inc.direction),
            }
        })
        .collect();

    Some(slots)
}

/// Attachment point for one edge at one of its endpoints, if spreading applies.
pub fn attachment_point(
    snapshot: &GraphSnapshot,
    node_id: &NodeId,
    edge_id: &EdgeId,
    settings: &GeometrySettings,
) -> Option<Vec2> {
    let node = snapshot.node(node_id)?;
    distribute_attachment_points(snapshot, node, settings)?
        .into_iter()
        .find(|slot| &slot.edge_id == edge_id)
        .map(|slot| slot.point)
}

fn describe<'a>(
    snapshot: &GraphSnapshot,
    node_id: &NodeId,
    edge: &'a Edge,
    center: Vec2,
    settings: &GeometrySettings,
) -> Incident<'a> {
    let other = edge.other_end(node_id).and_then(|id| snapshot.node(id));

    let measured = other.and_then(|o| node_shape(o, settings.anchor_radius));
    let toward_measured = measured.and_then(|s| (s.center() - center).normalized());
    if let Some(direction) = toward_measured {
        let mut angle = direction.y.atan2(direction.x);
        if angle < 0.0 {
            angle += TAU;
        }
        return Incident {
            edge,
            angle: Some(angle),
            direction,
        };
    }

    // Unmeasured neighbour: aim at its raw position, or straight up.
    let direction = other
        .and_then(|o| (o.position - center).normalized())
        .unwrap_or(Vec2::new(0.0, -1.0));
    Incident {
        edge,
        angle: None,
        direction,
    }
}

/// Index of the first edge after the largest angular gap, wrapping at 2π.
fn index_after_widest_gap(sorted: &[Incident]) -> Option<usize> {
    if sorted.len() < 2 {
        return None;
    }
    let angles: Vec<f32> = sorted.iter().filter_map(|inc| inc.angle).collect();
    let k = angles.len();

    let mut best_gap = f32::NEG_INFINITY;
    let mut best_start = 0;
    for i in 0..k {
        let gap = if i + 1 < k {
            angles[i + 1] - angles[i]
        } else {
            angles[0] + TAU - angles[i]
        };
        if gap > best_gap {
            best_gap = gap;
            best_start = (i + 1) % k;
        }
    }
    Some(best_start)
}

fn fitted_spacing(shape: &NodeShape, spacing: f32, count: usize) -> f32 {
    let spacing = spacing.max(0.0);
    if count < 2 {
        return spacing;
    }
    let span = 2.0 * shape.min_half_extent() * FAN_FILL;
    spacing.min(span / (count - 1) as f32)
}

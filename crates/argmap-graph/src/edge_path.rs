use crate::attachment::attachment_point;
use crate::geometry::{GeometrySettings, border_midpoint, trimmed_line};
use crate::parallel::{ParallelOffset, parallel_edge_offset};
use crate::snapshot::GraphSnapshot;
use argmap_core::{EdgeId, Vec2};
use serde::{Deserialize, Serialize};

/// Everything the renderer needs to draw one edge for the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePath {
    pub source: Vec2,
    pub target: Vec2,
    pub label: Vec2,
    pub parallel: ParallelOffset,
}

/// Derive an edge's drawn path from its endpoints' current geometry.
///
/// Ends are trimmed to the node borders, then replaced by spread attachment
/// points wherever several edges share an endpoint. The parallel offset shifts
/// the label sideways so stacked relationships stay readable.
pub fn edge_path(
    snapshot: &GraphSnapshot,
    edge_id: &EdgeId,
    settings: &GeometrySettings,
) -> Option<EdgePath> {
    let edge = snapshot.edge(edge_id)?;
    let source = snapshot.node(&edge.source)?;
    let target = snapshot.node(&edge.target)?;

    let line = trimmed_line(source, target, settings);
    let start = attachment_point(snapshot, &source.id, edge_id, settings).unwrap_or(line.source);
    let end = attachment_point(snapshot, &target.id, edge_id, settings).unwrap_or(line.target);

    let parallel = parallel_edge_offset(
        edge_id,
        snapshot.edges(),
        settings.parallel_edge_spacing,
        settings.treat_reverse_as_parallel,
    )?;

    let fallback = (start + end) * 0.5;
    let mut label = border_midpoint(source, target, fallback, settings);
    if parallel.offset != 0.0 {
        if let Some(dir) = (end - start).normalized() {
            label += dir.perp() * parallel.offset;
        }
    }

    Some(EdgePath {
        source: start,
        target: end,
        label,
        parallel,
    })
}

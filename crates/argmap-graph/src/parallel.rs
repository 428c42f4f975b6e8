use argmap_core::{Edge, EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Perpendicular offset for one edge among edges sharing the same endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallelOffset {
    pub offset: f32,
    /// Number of edges in the group, including this one.
    pub count: usize,
    /// Position within the group after ordering by edge id.
    pub index: usize,
}

fn pair_key(edge: &Edge, treat_reverse_as_same: bool) -> (NodeId, NodeId) {
    if treat_reverse_as_same && edge.target < edge.source {
        (edge.target.clone(), edge.source.clone())
    } else {
        (edge.source.clone(), edge.target.clone())
    }
}

fn centered_offset(index: usize, count: usize, spacing: f32) -> f32 {
    (index as f32 - (count as f32 - 1.0) / 2.0) * spacing
}

/// Offset of `edge_id` within its group of parallel edges, or `None` if the
/// edge is not in `edges`.
///
/// Offsets are centered on zero and ordered by edge id, so two edges get
/// `-spacing / 2` and `+spacing / 2` and a lone edge gets `0`.
pub fn parallel_edge_offset(
    edge_id: &EdgeId,
    edges: &[Edge],
    spacing: f32,
    treat_reverse_as_same: bool,
) -> Option<ParallelOffset> {
    let edge = edges.iter().find(|e| &e.id == edge_id)?;
    let key = pair_key(edge, treat_reverse_as_same);

    let mut group: Vec<&EdgeId> = edges
        .iter()
        .filter(|e| pair_key(e, treat_reverse_as_same) == key)
        .map(|e| &e.id)
        .collect();
    group.sort();
    group.dedup();

    let count = group.len();
    let index = group.iter().position(|id| *id == edge_id)?;
    Some(ParallelOffset {
        offset: centered_offset(index, count, spacing),
        count,
        index,
    })
}

/// Offsets for every edge at once; cheaper than calling
/// [`parallel_edge_offset`] per edge on large graphs.
pub fn parallel_edge_offsets(
    edges: &[Edge],
    spacing: f32,
    treat_reverse_as_same: bool,
) -> HashMap<EdgeId, ParallelOffset> {
    let mut groups: HashMap<(NodeId, NodeId), Vec<&EdgeId>> = HashMap::new();
    for edge in edges {
        groups
            .entry(pair_key(edge, treat_reverse_as_same))
            .or_default()
            .push(&edge.id);
    }

    let mut offsets = HashMap::with_capacity(edges.len());
    for (_, mut group) in groups {
        group.sort();
        group.dedup();
        let count = group.len();
        for (index, id) in group.into_iter().enumerate() {
            offsets.insert(
                id.clone(),
                ParallelOffset {
                    offset: centered_offset(index, count, spacing),
                    count,
                    index,
                },
            );
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_edge_has_zero_offset() {
        let edges = vec![Edge::new("e", "1", "2")];
        let result = parallel_edge_offset(&EdgeId::from("e"), &edges, 16.0, true).unwrap();
        assert_eq!(result.offset, 0.0);
        assert_eq!(result.count, 1);
    }

    #[test]
    fn test_two_edges_are_symmetric() {
        let edges = vec![Edge::new("b", "1", "2"), Edge::new("a", "1", "2")];
        let a = parallel_edge_offset(&EdgeId::from("a"), &edges, 10.0, false).unwrap();
        let b = parallel_edge_offset(&EdgeId::from("b"), &edges, 10.0, false).unwrap();
        assert_eq!(a.offset, -5.0);
        assert_eq!(b.offset, 5.0);
        assert_eq!(a.count, 2);
    }

    #[test]
    fn test_reverse_grouping_is_optional() {
        let edges = vec![Edge::new("a", "1", "2"), Edge::new("b", "2", "1")];

        let together = parallel_edge_offset(&EdgeId::from("b"), &edges, 10.0, true).unwrap();
        assert_eq!(together.count, 2);
        assert_eq!(together.offset, 5.0);

        let apart = parallel_edge_offset(&EdgeId::from("b"), &edges, 10.0, false).unwrap();
        assert_eq!(apart.count, 1);
        assert_eq!(apart.offset, 0.0);
    }

    #[test]
    fn test_unknown_edge() {
        let edges = vec![Edge::new("a", "1", "2")];
        let missing = EdgeId::from("zz");
        assert!(parallel_edge_offset(&missing, &edges, 10.0, true).is_none());
    }

    #[test]
    fn test_batch_matches_single() {
        let edges = vec![
            Edge::new("a", "1", "2"),
            Edge::new("b", "2", "1"),
            Edge::new("c", "1", "2"),
            Edge::new("d", "2", "3"),
        ];
        let batch = parallel_edge_offsets(&edges, 12.0, true);
        for edge in &edges {
            let single = parallel_edge_offset(&edge.id, &edges, 12.0, true).unwrap();
            assert_eq!(batch[&edge.id], single);
        }
        assert_eq!(batch[&EdgeId::from("a")].offset, -12.0);
        assert_eq!(batch[&EdgeId::from("d")].offset, 0.0);
    }

    proptest! {
        #[test]
        fn prop_offsets_centered_on_zero(count in 1usize..12, spacing in 1.0f32..40.0) {
            let edges: Vec<Edge> = (0..count)
                .map(|i| Edge::new(format!("e{i:02}"), "x", "y"))
                .collect();
            let offsets = parallel_edge_offsets(&edges, spacing, false);
            let sum: f32 = offsets.values().map(|o| o.offset).sum();
            prop_assert!(sum.abs() < 1e-3 * count as f32 * spacing);
            let max = offsets.values().map(|o| o.offset).fold(f32::MIN, f32::max);
            prop_assert!((max - (count as f32 - 1.0) / 2.0 * spacing).abs() < 1e-3);
        }
    }
}

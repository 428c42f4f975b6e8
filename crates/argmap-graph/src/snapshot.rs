use argmap_core::{Edge, EdgeId, Node, NodeId};
use std::collections::HashMap;

/// Read-only view over one frame's nodes and edges.
///
/// Node order is preserved from the input so that every query that iterates
/// nodes (snapping in particular) is deterministic for a given store snapshot.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: HashMap<NodeId, usize>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let node_index = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.clone(), idx))
            .collect();
        Self {
            nodes,
            edges,
            node_index,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    /// Edges with `node` as source or target, in snapshot order.
    pub fn incident_edges<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches(node))
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmap_core::Vec2;

    #[test]
    fn test_lookup_and_incident_edges() {
        let snapshot = GraphSnapshot::new(
            vec![
                Node::new("a", Vec2::ZERO, Vec2::new(10.0, 10.0)),
                Node::new("b", Vec2::new(50.0, 0.0), Vec2::new(10.0, 10.0)),
                Node::new("c", Vec2::new(100.0, 0.0), Vec2::new(10.0, 10.0)),
            ],
            vec![Edge::new("e1", "a", "b"), Edge::new("e2", "b", "c")],
        );

        assert!(snapshot.node(&NodeId::from("b")).is_some());
        assert!(snapshot.node(&NodeId::from("zz")).is_none());

        let b = NodeId::from("b");
        let ids: Vec<_> = snapshot.incident_edges(&b).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }
}

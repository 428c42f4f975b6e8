use argmap_core::{EdgeId, NodeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The store does not implement this optional operation.
    #[error("Store operation not supported: {0}")]
    Unsupported(&'static str),
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),
    #[error("Other error: {0}")]
    Other(String),
}

impl StoreError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, StoreError::Unsupported(_))
    }
}

#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("Graph store error: {0}")]
    Store(#[from] StoreError),
    #[error("Node {0} is not known to the graph store")]
    UnknownNode(NodeId),
}

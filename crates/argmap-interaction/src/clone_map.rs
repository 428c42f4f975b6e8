use argmap_core::{NodeId, Vec2};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CloneEntry {
    pub duplicate: NodeId,
    /// Where the original sat when the alt-drag began.
    pub origin: Vec2,
}

/// Originals currently being alt-dragged, keyed by the original's id.
///
/// Holds at most one entry per original. Entries must be removed on every
/// gesture end, whether or not the final write succeeded, or the next drag
/// of the same node would be redirected to a stale duplicate.
#[derive(Debug, Default)]
pub struct AltCloneMap {
    entries: HashMap<NodeId, CloneEntry>,
}

impl AltCloneMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, original: NodeId, entry: CloneEntry) -> Option<CloneEntry> {
        let replaced = self.entries.insert(original.clone(), entry);
        if let Some(stale) = &replaced {
            tracing::warn!(%original, duplicate = %stale.duplicate, "replaced stale clone entry");
        }
        replaced
    }

    pub fn get(&self, original: &NodeId) -> Option<&CloneEntry> {
        self.entries.get(original)
    }

    pub fn duplicate_for(&self, original: &NodeId) -> Option<&NodeId> {
        self.entries.get(original).map(|entry| &entry.duplicate)
    }

    pub fn remove(&mut self, original: &NodeId) -> Option<CloneEntry> {
        self.entries.remove(original)
    }

    pub fn contains(&self, original: &NodeId) -> bool {
        self.entries.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

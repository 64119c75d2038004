//! Node model.
//!
//! A node records the highest layer it occupies and one adjacency list per
//! layer `0..=layer`. Neighbors are node ids (arena indices into the stores),
//! never references, so the graph has no ownership cycles.

use crate::{HnswError, Result};

/// Dense node id, assigned in insertion order.
pub type NodeId = u64;

/// One inserted vector's place in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    layer: usize,
    neighbors: Vec<Vec<NodeId>>,
}

impl Node {
    /// A node on `layer` with empty adjacency at every level.
    pub fn new(id: NodeId, layer: usize) -> Self {
        Self::with_capacity(id, layer, |_| 0)
    }

    /// Like [`Node::new`], reserving `capacity(level)` slots per level.
    pub fn with_capacity(id: NodeId, layer: usize, capacity: impl Fn(usize) -> usize) -> Self {
        Self {
            id,
            layer,
            neighbors: (0..=layer).map(|l| Vec::with_capacity(capacity(l))).collect(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Highest layer this node occupies.
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Adjacency at `level`; empty above the node's own layer.
    pub fn neighbors(&self, level: usize) -> &[NodeId] {
        self.neighbors.get(level).map_or(&[], Vec::as_slice)
    }

    /// Append `neighbor` at `level`.
    ///
    /// Returns `Ok(false)` if it is already present. Self-references and
    /// levels above the node's layer are rejected.
    pub fn add_neighbor(&mut self, level: usize, neighbor: NodeId) -> Result<bool> {
        if neighbor == self.id {
            return Err(HnswError::InvalidArgument(format!(
                "node {} cannot neighbor itself",
                self.id
            )));
        }
        let id = self.id;
        let layer = self.layer;
        let list = self.neighbors.get_mut(level).ok_or_else(|| {
            HnswError::InvalidArgument(format!(
                "level {} above layer {} of node {}",
                level, layer, id
            ))
        })?;

        if list.contains(&neighbor) {
            return Ok(false);
        }
        list.push(neighbor);
        Ok(true)
    }

    /// Replace the adjacency at `level`, keeping the first of any duplicates.
    pub fn set_neighbors(
        &mut self,
        level: usize,
        neighbors: impl IntoIterator<Item = NodeId>,
    ) -> Result<()> {
        match self.neighbors.get_mut(level) {
            Some(list) => list.clear(),
            None => {
                return Err(HnswError::InvalidArgument(format!(
                    "level {} above layer {} of node {}",
                    level, self.layer, self.id
                )))
            }
        }
        for neighbor in neighbors {
            self.add_neighbor(level, neighbor)?;
        }
        Ok(())
    }
}

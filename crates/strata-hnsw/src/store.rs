//! Storage collaborators for nodes and vectors.
//!
//! The graph never owns nodes or vectors directly; it goes through these
//! traits so that callers can back the index with whatever keyed storage
//! they have. Two in-memory implementations are provided for each: a dense
//! `Vec` keyed by id and a `HashMap`.

use crate::node::{Node, NodeId};
use crate::{HnswError, Result};
use std::collections::HashMap;

/// Keyed storage for graph nodes.
pub trait NodeStore: Send + Sync {
    /// Insert or replace the node stored under `id`.
    fn add(&mut self, id: NodeId, node: Node) -> Result<()>;

    fn get(&self, id: NodeId) -> Result<&Node>;

    /// Fetch several nodes. Fails as a whole if any id is missing.
    fn batch_get(&self, ids: &[NodeId]) -> Result<Vec<&Node>> {
        ids.iter().map(|&id| self.get(id)).collect()
    }

    /// Id the next inserted node will receive.
    fn next_id(&self) -> NodeId;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keyed storage for vectors, parallel to a [`NodeStore`].
pub trait VectorStore: Send + Sync {
    fn add(&mut self, id: NodeId, vector: Vec<f32>) -> Result<()>;

    fn get(&self, id: NodeId) -> Result<&[f32]>;

    /// Fetch several vectors. Fails as a whole if any id is missing.
    fn batch_get(&self, ids: &[NodeId]) -> Result<Vec<&[f32]>> {
        ids.iter().map(|&id| self.get(id)).collect()
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_node_id(id: NodeId, node: &Node) -> Result<()> {
    if node.id() != id {
        return Err(HnswError::InvalidArgument(format!(
            "node {} stored under id {}",
            node.id(),
            id
        )));
    }
    Ok(())
}

/// Dense node storage. Ids must be assigned sequentially.
#[derive(Debug, Clone, Default)]
pub struct SliceNodeStore {
    nodes: Vec<Node>,
}

impl SliceNodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }
}

impl NodeStore for SliceNodeStore {
    /// Appends at `id == len`, overwrites below it, rejects gaps.
    fn add(&mut self, id: NodeId, node: Node) -> Result<()> {
        check_node_id(id, &node)?;
        let idx = id as usize;
        match idx.cmp(&self.nodes.len()) {
            std::cmp::Ordering::Less => self.nodes[idx] = node,
            std::cmp::Ordering::Equal => self.nodes.push(node),
            std::cmp::Ordering::Greater => {
                return Err(HnswError::InvalidArgument(format!(
                    "node id {} skips past next id {}",
                    id,
                    self.nodes.len()
                )))
            }
        }
        Ok(())
    }

    fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id as usize)
            .ok_or(HnswError::NodeNotFound(id))
    }

    fn next_id(&self) -> NodeId {
        self.nodes.len() as NodeId
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapNodeStore {
    nodes: HashMap<NodeId, Node>,
}

impl MapNodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeStore for MapNodeStore {
    fn add(&mut self, id: NodeId, node: Node) -> Result<()> {
        check_node_id(id, &node)?;
        self.nodes.insert(id, node);
        Ok(())
    }

    fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(HnswError::NodeNotFound(id))
    }

    /// The element count; assumes ids were assigned densely.
    fn next_id(&self) -> NodeId {
        self.nodes.len() as NodeId
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Dense, append-only vector storage.
#[derive(Debug, Clone, Default)]
pub struct SliceVectorStore {
    vectors: Vec<Vec<f32>>,
}

impl SliceVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vectors: Vec::with_capacity(capacity),
        }
    }
}

impl VectorStore for SliceVectorStore {
    /// Vectors are immutable, so only `id == len` is accepted.
    fn add(&mut self, id: NodeId, vector: Vec<f32>) -> Result<()> {
        if id as usize != self.vectors.len() {
            return Err(HnswError::InvalidArgument(format!(
                "vector id {} is not the next id {}",
                id,
                self.vectors.len()
            )));
        }
        self.vectors.push(vector);
        Ok(())
    }

    fn get(&self, id: NodeId) -> Result<&[f32]> {
        self.vectors
            .get(id as usize)
            .map(Vec::as_slice)
            .ok_or(HnswError::VectorNotFound(id))
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapVectorStore {
    vectors: HashMap<NodeId, Vec<f32>>,
}

impl MapVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VectorStore for MapVectorStore {
    fn add(&mut self, id: NodeId, vector: Vec<f32>) -> Result<()> {
        self.vectors.insert(id, vector);
        Ok(())
    }

    fn get(&self, id: NodeId) -> Result<&[f32]> {
        self.vectors
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(HnswError::VectorNotFound(id))
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

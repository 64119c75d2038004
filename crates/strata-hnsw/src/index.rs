//! Thread-safe HNSW index.
//!
//! Wraps an [`HnswGraph`] in a `parking_lot::RwLock`: inserts take the write
//! lock one at a time, searches share the read lock and run in parallel.

use crate::config::HnswConfig;
use crate::graph::HnswGraph;
use crate::node::NodeId;
use crate::search::NodeAndDistance;
use crate::store::{NodeStore, SliceNodeStore, SliceVectorStore, VectorStore};
use crate::Result;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;
use strata_observe::Meter;
use strata_vector::Distance;

/// A search hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: NodeId,
    /// Distance to the query (lower = more similar).
    pub distance: f32,
}

impl From<&NodeAndDistance<'_>> for Neighbor {
    fn from(n: &NodeAndDistance<'_>) -> Self {
        Self {
            id: n.id(),
            distance: n.distance,
        }
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// HNSW index safe to share across threads.
pub struct HnswIndex<N = SliceNodeStore, V = SliceVectorStore> {
    graph: RwLock<HnswGraph<N, V>>,
}

impl HnswIndex {
    /// Create an empty in-memory index.
    ///
    /// # Example
    ///
    /// ```
    /// use strata_hnsw::{HnswConfig, HnswIndex};
    /// use strata_vector::DistanceFunction;
    ///
    /// let index = HnswIndex::new(2, DistanceFunction::Euclidean, HnswConfig::default()).unwrap();
    /// index.insert(&[0.0, 0.0]).unwrap();
    /// let far = index.insert(&[5.0, 5.0]).unwrap();
    ///
    /// let hits = index.search(&[4.0, 4.0], 1).unwrap();
    /// assert_eq!(hits[0].id, far);
    /// ```
    pub fn new(
        dimensions: usize,
        distance: impl Distance + 'static,
        config: HnswConfig,
    ) -> Result<Self> {
        Ok(Self::from_graph(HnswGraph::with_config(
            dimensions, distance, config,
        )?))
    }
}

impl<N: NodeStore, V: VectorStore> HnswIndex<N, V> {
    pub fn from_graph(graph: HnswGraph<N, V>) -> Self {
        Self {
            graph: RwLock::new(graph),
        }
    }

    pub fn with_meter(self, meter: Arc<dyn Meter>) -> Self {
        Self::from_graph(self.graph.into_inner().with_meter(meter))
    }

    /// Insert a vector, returning its id. Blocks concurrent searches.
    pub fn insert(&self, vector: &[f32]) -> Result<NodeId> {
        self.graph.write().insert(vector.to_vec())
    }

    /// Approximate `k` nearest neighbors using the configured `ef_search`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        let graph = self.graph.read();
        let ef = graph.config().ef_search;
        let found = to_neighbors(&graph.search(query, k, ef)?.into_sorted_vec());
        Ok(found)
    }

    /// Approximate `k` nearest neighbors with an explicit beam width.
    pub fn search_with_ef(&self, query: &[f32], k: usize, ef: usize) -> Result<Vec<Neighbor>> {
        let graph = self.graph.read();
        let found = to_neighbors(&graph.search(query, k, ef)?.into_sorted_vec());
        Ok(found)
    }

    /// Exact `k` nearest neighbors by linear scan.
    pub fn brute_force_search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        let graph = self.graph.read();
        let found = to_neighbors(&graph.brute_force_search(query, k)?);
        Ok(found)
    }

    pub fn get(&self, id: NodeId) -> Result<Vec<f32>> {
        Ok(self.graph.read().vector(id)?.to_vec())
    }

    pub fn len(&self) -> usize {
        self.graph.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.read().is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.graph.read().dimensions()
    }

    pub fn config(&self) -> HnswConfig {
        self.graph.read().config().clone()
    }

    /// Shared access to the underlying graph. Inserts wait until the guard
    /// is dropped.
    pub fn graph(&self) -> RwLockReadGuard<'_, HnswGraph<N, V>> {
        self.graph.read()
    }

    pub fn into_graph(self) -> HnswGraph<N, V> {
        self.graph.into_inner()
    }
}

fn to_neighbors(found: &[NodeAndDistance<'_>]) -> Vec<Neighbor> {
    found.iter().map(Neighbor::from).collect()
}

//! The HNSW graph.
//!
//! `HnswGraph` owns the configuration, the level table, the level-sampling
//! RNG and the entry point, and reaches nodes and vectors only through its
//! [`NodeStore`] and [`VectorStore`]. Construction is single-writer
//! (`insert` takes `&mut self`); searches take `&self` and may run in
//! parallel. See [`HnswIndex`](crate::HnswIndex) for a lock-protected
//! wrapper.

use crate::config::HnswConfig;
use crate::level::LevelTable;
use crate::node::{Node, NodeId};
use crate::store::{NodeStore, SliceNodeStore, SliceVectorStore, VectorStore};
use crate::{HnswError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Arc;
use strata_observe::{Meter, NoopMeter};
use strata_vector::Distance;

pub struct HnswGraph<N = SliceNodeStore, V = SliceVectorStore> {
    pub(crate) dimensions: usize,
    pub(crate) config: HnswConfig,
    pub(crate) distance: Arc<dyn Distance>,
    pub(crate) levels: LevelTable,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) nodes: N,
    pub(crate) vectors: V,
    /// Node on the topmost populated layer; `None` until the first insert.
    pub(crate) entry_point: Option<NodeId>,
    pub(crate) meter: Arc<dyn Meter>,
}

impl HnswGraph {
    /// Create an empty graph over in-memory stores.
    ///
    /// # Arguments
    ///
    /// * `dimensions` - Vector dimensions (>= 1)
    /// * `m` - Degree budget per layer, doubled at layer 0 (>= 2)
    /// * `distance` - Distance function (lower = more similar)
    /// * `ef_construction` - Beam width while inserting (>= 1)
    pub fn new(
        dimensions: usize,
        m: usize,
        distance: impl Distance + 'static,
        ef_construction: usize,
    ) -> Result<Self> {
        let config = HnswConfig::default()
            .with_m(m)
            .with_ef_construction(ef_construction);
        Self::with_config(dimensions, distance, config)
    }

    /// Create an empty graph over in-memory stores with a full config.
    pub fn with_config(
        dimensions: usize,
        distance: impl Distance + 'static,
        config: HnswConfig,
    ) -> Result<Self> {
        Self::with_stores(
            dimensions,
            distance,
            config,
            SliceNodeStore::new(),
            SliceVectorStore::new(),
        )
    }
}

impl<N: NodeStore, V: VectorStore> HnswGraph<N, V> {
    /// Create an empty graph over caller-provided stores, which must be empty.
    pub fn with_stores(
        dimensions: usize,
        distance: impl Distance + 'static,
        config: HnswConfig,
        nodes: N,
        vectors: V,
    ) -> Result<Self> {
        config.validate()?;
        if dimensions == 0 {
            return Err(HnswError::InvalidArgument(
                "dimensions must be > 0".into(),
            ));
        }
        if !nodes.is_empty() || !vectors.is_empty() {
            return Err(HnswError::InvalidArgument(
                "stores must be empty when building a new graph".into(),
            ));
        }

        let levels = LevelTable::new(config.m);
        tracing::debug!(
            dimensions,
            m = config.m,
            ef_construction = config.ef_construction,
            max_level = levels.max_level(),
            "created hnsw graph"
        );

        Ok(Self {
            dimensions,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            distance: Arc::new(distance),
            levels,
            nodes,
            vectors,
            entry_point: None,
            meter: Arc::new(NoopMeter),
        })
    }

    /// Report metrics and events to `meter` instead of discarding them.
    pub fn with_meter(mut self, meter: Arc<dyn Meter>) -> Self {
        self.meter = meter;
        self
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn config(&self) -> &HnswConfig {
        &self.config
    }

    pub fn level_table(&self) -> &LevelTable {
        &self.levels
    }

    pub fn entry_point(&self) -> Option<NodeId> {
        self.entry_point
    }

    /// Layer of the entry point, or `None` for an empty graph.
    pub fn top_layer(&self) -> Result<Option<usize>> {
        match self.entry_point {
            Some(ep) => Ok(Some(self.nodes.get(ep)?.layer())),
            None => Ok(None),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_point.is_none()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id)
    }

    pub fn vector(&self, id: NodeId) -> Result<&[f32]> {
        self.vectors.get(id)
    }

    pub fn node_store(&self) -> &N {
        &self.nodes
    }

    pub fn vector_store(&self) -> &V {
        &self.vectors
    }

    /// Distance between two vectors under this graph's metric.
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self.distance.distance(a, b)
    }
}

impl<N, V> fmt::Debug for HnswGraph<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HnswGraph")
            .field("dimensions", &self.dimensions)
            .field("config", &self.config)
            .field("entry_point", &self.entry_point)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::store::{MapNodeStore, MapVectorStore};
    use strata_vector::DistanceFunction;

    #[test]
    fn test_new_graph_is_empty() {
        let graph = HnswGraph::new(3, 16, DistanceFunction::Euclidean, 200).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert_eq!(graph.dimensions(), 3);
        assert_eq!(graph.entry_point(), None);
        assert_eq!(graph.top_layer().unwrap(), None);
        assert_eq!(graph.config().m, 16);
        assert_eq!(graph.config().ef_construction, 200);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(
            HnswGraph::new(0, 16, DistanceFunction::Euclidean, 200),
            Err(HnswError::InvalidArgument(_))
        ));
        assert!(matches!(
            HnswGraph::new(3, 1, DistanceFunction::Euclidean, 200),
            Err(HnswError::Config(ConfigError::InvalidValue(_)))
        ));
        assert!(matches!(
            HnswGraph::new(3, 16, DistanceFunction::Euclidean, 0),
            Err(HnswError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_populated_stores() {
        let mut nodes = MapNodeStore::new();
        nodes.add(0, Node::new(0, 0)).unwrap();

        let result = HnswGraph::with_stores(
            2,
            DistanceFunction::Cosine,
            HnswConfig::default(),
            nodes,
            MapVectorStore::new(),
        );
        assert!(matches!(result, Err(HnswError::InvalidArgument(_))));
    }
}

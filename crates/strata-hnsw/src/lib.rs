//! HNSW (Hierarchical Navigable Small World) index.
//!
//! Provides approximate nearest neighbor (ANN) search over fixed-dimension
//! vectors. HNSW builds a multi-layer graph where:
//!
//! - Higher layers have fewer nodes (exponential decay)
//! - Each layer is a navigable small-world graph
//! - Search starts at the top layer and descends greedily
//!
//! Every search frontier is a [`MinMaxHeap`], which pops the nearest
//! candidate and evicts the farthest result in O(log n).
//!
//! # Architecture
//!
//! ```text
//! strata-vector:  distances, validation, exact top-k
//!      ↓
//! strata-hnsw:    HnswGraph (single writer) / HnswIndex (RwLock)  <-- This crate
//!      ↓ stores
//! NodeStore / VectorStore: Slice* (dense Vec) or Map* (HashMap)
//! ```
//!
//! # Parameters
//!
//! - `m`: Max connections per node per layer, doubled at layer 0 (default: 16)
//! - `ef_construction`: Beam width during index building (default: 200)
//! - `ef_search`: Beam width during search (default: 100)
//! - `seed`: Level-sampling seed; same seed and insert order give the same graph
//!
//! # Example
//!
//! ```
//! use strata_hnsw::HnswGraph;
//! use strata_vector::DistanceFunction;
//!
//! let mut graph = HnswGraph::new(3, 16, DistanceFunction::Euclidean, 200).unwrap();
//! for i in 0..10 {
//!     graph.insert(vec![i as f32, 0.0, 0.0]).unwrap();
//! }
//!
//! let mut nearest = graph.search(&[4.1, 0.0, 0.0], 2, 32).unwrap();
//! assert_eq!(nearest.pop_min().unwrap().id(), 4);
//! assert_eq!(nearest.pop_min().unwrap().id(), 5);
//! ```

mod config;
mod graph;
mod heap;
mod index;
mod insert;
mod level;
mod node;
mod search;
mod store;
mod visited;

pub use config::{ConfigError, HnswConfig};
pub use graph::HnswGraph;
pub use heap::{LessFn, MinMaxHeap};
pub use index::{HnswIndex, Neighbor};
pub use level::LevelTable;
pub use node::{Node, NodeId};
pub use search::{DistanceHeap, NodeAndDistance};
pub use store::{MapNodeStore, MapVectorStore, NodeStore, SliceNodeStore, SliceVectorStore, VectorStore};
pub use visited::{BitsetVisitedSet, HashVisitedSet, VisitedKind, VisitedSet};

/// Error type for HNSW operations.
#[derive(Debug, thiserror::Error)]
pub enum HnswError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Vector {0} not found")]
    VectorNotFound(NodeId),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Vector error: {0}")]
    Vector(#[from] strata_vector::VectorError),
}

/// Result type for HNSW operations.
pub type Result<T> = std::result::Result<T, HnswError>;

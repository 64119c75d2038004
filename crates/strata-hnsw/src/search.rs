//! Beam search over the layered graph.

use crate::graph::HnswGraph;
use crate::heap::{LessFn, MinMaxHeap};
use crate::node::{Node, NodeId};
use crate::store::{NodeStore, VectorStore};
use crate::visited::{Visited, VisitedSet};
use crate::Result;
use strata_observe::{obs_count, obs_hist};
use strata_vector::validate_vector;

/// A node paired with its distance to some query. Only lives inside searches.
#[derive(Debug, Clone, Copy)]
pub struct NodeAndDistance<'a> {
    pub node: &'a Node,
    pub vector: &'a [f32],
    pub distance: f32,
}

impl NodeAndDistance<'_> {
    pub fn id(&self) -> NodeId {
        self.node.id()
    }
}

/// Min-max heap of search candidates, nearest at the min end.
pub type DistanceHeap<'a> = MinMaxHeap<NodeAndDistance<'a>>;

/// Nearer first; equal distances fall back to id so orders are total.
fn closer(a: &NodeAndDistance<'_>, b: &NodeAndDistance<'_>) -> bool {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.node.id().cmp(&b.node.id()))
        .is_lt()
}

fn distance_heap<'a>(capacity: usize) -> DistanceHeap<'a> {
    MinMaxHeap::with_capacity(capacity, closer as LessFn<NodeAndDistance<'a>>)
}

impl<N: NodeStore, V: VectorStore> HnswGraph<N, V> {
    fn node_and_distance(&self, id: NodeId, query: &[f32]) -> Result<NodeAndDistance<'_>> {
        let node = self.nodes.get(id)?;
        let vector = self.vectors.get(id)?;
        Ok(NodeAndDistance {
            node,
            vector,
            distance: self.distance.distance(vector, query),
        })
    }

    /// Bounded beam search of one layer.
    ///
    /// Starting from `entry_points`, returns up to `ef` of the nearest nodes
    /// to `query` reachable through `layer`'s adjacency. Duplicate entry
    /// points are visited once. A missing node or vector aborts the search.
    pub fn search_layer(
        &self,
        query: &[f32],
        entry_points: &[NodeId],
        ef: usize,
        layer: usize,
    ) -> Result<DistanceHeap<'_>> {
        let ef = ef.max(1);
        // `ef` may exceed the corpus; size the heaps by what can actually fit.
        let capacity = ef.min(self.nodes.len());
        let mut visited = Visited::new(self.config.visited, self.nodes.next_id() as usize);
        let mut candidates = distance_heap(capacity);
        let mut results = distance_heap(capacity + 1);

        for &id in entry_points {
            if !visited.insert(id) {
                continue;
            }
            let entry = self.node_and_distance(id, query)?;
            candidates.push(entry);
            results.push(entry);
        }
        results.truncate(ef);

        let mut evaluated = entry_points.len();
        while let Some(nearest) = candidates.pop_min() {
            if let Some(worst) = results.peek_max() {
                if nearest.distance > worst.distance {
                    break;
                }
            }

            for &neighbor in nearest.node.neighbors(layer) {
                if !visited.insert(neighbor) {
                    continue;
                }
                let candidate = self.node_and_distance(neighbor, query)?;
                evaluated += 1;

                let admit = results.len() < ef
                    || results
                        .peek_max()
                        .map_or(true, |worst| candidate.distance < worst.distance);
                if admit {
                    candidates.push(candidate);
                    results.push(candidate);
                    if results.len() > ef {
                        results.pop_max();
                    }
                }
            }
        }

        tracing::trace!(layer, ef, evaluated, found = results.len(), "searched layer");
        obs_hist!(self.meter, "hnsw_search_layer_visited", &[], evaluated);
        Ok(results)
    }

    /// Greedy `ef = 1` walk from `entry` down through layers `(floor, top]`.
    pub(crate) fn descend(
        &self,
        query: &[f32],
        mut entry: NodeId,
        top: usize,
        floor: usize,
    ) -> Result<NodeId> {
        for layer in (floor + 1..=top).rev() {
            let found = self.search_layer(query, &[entry], 1, layer)?;
            if let Some(nearest) = found.peek_min() {
                entry = nearest.id();
            }
        }
        Ok(entry)
    }

    /// Approximate `k` nearest neighbors of `query`.
    ///
    /// Descends greedily to layer 1, then searches layer 0 with beam width
    /// `ef`. An `ef` smaller than `k` is widened to `k` so that up to `k`
    /// results can come back. Drain the returned heap with `pop_min` for nearest-first
    /// order. An empty graph or `k == 0` yields an empty heap.
    pub fn search(&self, query: &[f32], k: usize, ef: usize) -> Result<DistanceHeap<'_>> {
        validate_vector(query, self.dimensions)?;
        obs_count!(self.meter, "hnsw_searches_total", &[], 1);

        let entry = match self.entry_point {
            Some(ep) if k > 0 => ep,
            _ => return Ok(distance_heap(0)),
        };
        let top = self.nodes.get(entry)?.layer();

        let entry = self.descend(query, entry, top, 0)?;
        let mut found = self.search_layer(query, &[entry], ef.max(k), 0)?;
        found.truncate(k);
        Ok(found)
    }

    /// Exact `k` nearest neighbors by scanning every stored node, nearest
    /// first. Linear cost; meant for validating [`search`](Self::search).
    pub fn brute_force_search(&self, query: &[f32], k: usize) -> Result<Vec<NodeAndDistance<'_>>> {
        validate_vector(query, self.dimensions)?;

        let n = self.nodes.next_id();
        let mut all = distance_heap(n as usize);
        for id in 0..n {
            all.push(self.node_and_distance(id, query)?);
        }

        let mut found = Vec::with_capacity(k.min(all.len()));
        while found.len() < k {
            match all.pop_min() {
                Some(nearest) => found.push(nearest),
                None => break,
            }
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HnswConfig;
    use crate::store::{MapNodeStore, MapVectorStore};
    use crate::visited::VisitedKind;
    use crate::HnswError;
    use strata_vector::{DistanceFunction, VectorError};

    /// Ten points on a line, inserted in order.
    fn line_graph(config: HnswConfig) -> HnswGraph {
        let mut graph = HnswGraph::with_config(2, DistanceFunction::Euclidean, config).unwrap();
        for i in 0..10 {
            graph.insert(vec![i as f32, 0.0]).unwrap();
        }
        graph
    }

    fn ids(heap: DistanceHeap<'_>) -> Vec<NodeId> {
        heap.into_sorted_vec().iter().map(NodeAndDistance::id).collect()
    }

    #[test]
    fn test_search_layer_respects_ef() {
        let graph = line_graph(HnswConfig::default().with_m(4));
        let all: Vec<NodeId> = (0..10).collect();

        let found = graph.search_layer(&[4.2, 0.0], &all, 3, 0).unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(ids(found), vec![4, 5, 3]);
    }

    #[test]
    fn test_search_layer_dedupes_entry_points() {
        let graph = line_graph(HnswConfig::default().with_m(4));

        let found = graph.search_layer(&[0.0, 0.0], &[9, 9, 9], 10, 0).unwrap();
        let found = ids(found);
        let mut unique = found.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), found.len());
        assert_eq!(found[0], 0);
    }

    #[test]
    fn test_search_layer_missing_entry_point() {
        let graph = line_graph(HnswConfig::default());
        assert!(matches!(
            graph.search_layer(&[0.0, 0.0], &[42], 4, 0),
            Err(HnswError::NodeNotFound(42))
        ));
    }

    #[test]
    fn test_search_finds_exact_match() {
        for visited in [VisitedKind::Bitset, VisitedKind::Hash] {
            let graph = line_graph(HnswConfig::default().with_m(4).with_visited(visited));
            let found = ids(graph.search(&[7.0, 0.0], 3, 16).unwrap());
            assert_eq!(found[0], 7);
            assert_eq!(found.len(), 3);
        }
    }

    #[test]
    fn test_search_returns_k_even_with_small_ef() {
        let graph = line_graph(HnswConfig::default());
        let found = graph.search(&[0.0, 0.0], 10, 1).unwrap();
        assert_eq!(found.len(), 10);
    }

    #[test]
    fn test_search_with_oversized_ef() {
        let graph = line_graph(HnswConfig::default().with_m(4));
        for ef in [usize::MAX, 1 << 40] {
            let found = ids(graph.search(&[3.0, 0.0], 3, ef).unwrap());
            assert_eq!(found, vec![3, 2, 4]);
        }

        let all: Vec<NodeId> = (0..10).collect();
        let found = graph.search_layer(&[0.0, 0.0], &all, usize::MAX, 0).unwrap();
        assert_eq!(found.len(), 10);
    }

    #[test]
    fn test_build_with_oversized_parameters() {
        let config = HnswConfig::default()
            .with_m(usize::MAX)
            .with_ef_construction(usize::MAX)
            .with_ef_search(usize::MAX);
        let graph = line_graph(config);

        assert_eq!(graph.len(), 10);
        assert_eq!(ids(graph.search(&[8.8, 0.0], 2, usize::MAX).unwrap()), vec![9, 8]);
    }

    #[test]
    fn test_search_propagates_dangling_neighbor() {
        let mut graph = line_graph(HnswConfig::default().with_m(4));
        let mut node = graph.node(5).unwrap().clone();
        node.add_neighbor(0, 42).unwrap();
        graph.nodes.add(5, node).unwrap();

        // A beam wider than the graph reaches every node, including 5.
        assert!(matches!(
            graph.search(&[0.0, 0.0], 3, 64),
            Err(HnswError::NodeNotFound(42))
        ));
    }

    #[test]
    fn test_search_empty_and_zero_k() {
        let graph = HnswGraph::new(2, 16, DistanceFunction::Euclidean, 200).unwrap();
        assert!(graph.search(&[0.0, 0.0], 5, 10).unwrap().is_empty());
        assert!(graph.brute_force_search(&[0.0, 0.0], 5).unwrap().is_empty());

        let graph = line_graph(HnswConfig::default());
        assert!(graph.search(&[0.0, 0.0], 0, 10).unwrap().is_empty());
        assert!(graph.brute_force_search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_validates_query() {
        let graph = line_graph(HnswConfig::default());
        assert!(matches!(
            graph.search(&[0.0], 1, 10),
            Err(HnswError::Vector(VectorError::DimensionMismatch { .. }))
        ));
        assert!(matches!(
            graph.brute_force_search(&[f32::NAN, 0.0], 1),
            Err(HnswError::Vector(VectorError::InvalidVector(_)))
        ));
    }

    #[test]
    fn test_brute_force_is_exact() {
        let graph = line_graph(HnswConfig::default());
        let found: Vec<NodeId> = graph
            .brute_force_search(&[6.4, 1.0], 4)
            .unwrap()
            .iter()
            .map(NodeAndDistance::id)
            .collect();
        assert_eq!(found, vec![6, 7, 5, 8]);

        let all = graph.brute_force_search(&[0.0, 0.0], 100).unwrap();
        assert_eq!(all.len(), 10);
        assert!(all.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_map_stores() {
        let mut graph = HnswGraph::with_stores(
            2,
            DistanceFunction::Euclidean,
            HnswConfig::default().with_m(4),
            MapNodeStore::new(),
            MapVectorStore::new(),
        )
        .unwrap();
        for i in 0..10 {
            graph.insert(vec![0.0, i as f32]).unwrap();
        }

        let found = graph.search(&[0.0, 2.9], 2, 8).unwrap();
        assert_eq!(ids(found), vec![3, 2]);
    }
}

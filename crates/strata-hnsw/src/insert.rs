//! Graph construction.

use crate::graph::HnswGraph;
use crate::heap::MinMaxHeap;
use crate::node::{Node, NodeId};
use crate::store::{NodeStore, VectorStore};
use crate::Result;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use strata_observe::{obs_count, HnswEvt, HnswKind, VizEvent};
use strata_vector::validate_vector;

impl<N: NodeStore, V: VectorStore> HnswGraph<N, V> {
    /// Insert `vector` and return its id.
    ///
    /// The new node and every neighbor it rewires are only written to the
    /// stores after all searches succeed. On error nothing of the new node
    /// is visible, but the level RNG has advanced; retry from scratch.
    pub fn insert(&mut self, vector: Vec<f32>) -> Result<NodeId> {
        validate_vector(&vector, self.dimensions)?;

        let level = self.levels.select_level(&mut self.rng);
        let id = self.nodes.next_id();
        let levels = &self.levels;
        // A node can never have more neighbors than there are other nodes.
        let existing = self.nodes.len();
        let mut node = Node::with_capacity(id, level, |l| levels.capacity_hint(l).min(existing));

        let Some(entry) = self.entry_point else {
            self.store(node, vector)?;
            self.entry_point = Some(id);
            tracing::debug!(id, level, "first node became entry point");
            self.emit(HnswKind::NodeInserted {
                node: id,
                layer: level,
                degree: 0,
            });
            obs_count!(self.meter, "hnsw_inserts_total", &[], 1);
            return Ok(id);
        };
        let top = self.nodes.get(entry)?.layer();

        let updated = self.connect(&mut node, &vector, entry, top)?;
        let degree = node.neighbors(0).len();

        self.store(node, vector)?;
        for (neighbor_id, neighbor) in updated {
            self.nodes.add(neighbor_id, neighbor)?;
        }

        if level > top {
            self.entry_point = Some(id);
            tracing::debug!(id, from = top, to = level, "promoted entry point");
            self.emit(HnswKind::EntryPointPromoted {
                node: id,
                from_layer: top,
                to_layer: level,
            });
        }

        tracing::trace!(id, level, degree, "inserted node");
        self.emit(HnswKind::NodeInserted {
            node: id,
            layer: level,
            degree,
        });
        obs_count!(self.meter, "hnsw_inserts_total", &[], 1);
        Ok(id)
    }

    /// Choose `node`'s neighbors on every shared layer and compute the
    /// rewired adjacency of each neighbor. Nothing is written to the stores.
    ///
    /// Returned neighbors are keyed by id, so a node touched on several
    /// layers carries all of its updates.
    fn connect(
        &self,
        node: &mut Node,
        vector: &[f32],
        entry: NodeId,
        top: usize,
    ) -> Result<BTreeMap<NodeId, Node>> {
        let level = node.layer();
        let shared = level.min(top);

        let mut entry_points = vec![self.descend(vector, entry, top, shared)?];
        for layer in (0..=shared).rev() {
            let mut found =
                self.search_layer(vector, &entry_points, self.config.ef_construction, layer)?;
            found.truncate(self.config.degree_budget(layer));

            entry_points = found.into_sorted_vec().iter().map(|n| n.id()).collect();
            node.set_neighbors(layer, entry_points.iter().copied())?;
        }

        let mut updated: BTreeMap<NodeId, Node> = BTreeMap::new();
        for layer in (0..=shared).rev() {
            for &neighbor_id in node.neighbors(layer) {
                let neighbor = match updated.entry(neighbor_id) {
                    Entry::Occupied(e) => e.into_mut(),
                    Entry::Vacant(e) => e.insert(self.nodes.get(neighbor_id)?.clone()),
                };
                self.update_neighbor(neighbor, node.id(), vector, layer)?;
            }
        }
        Ok(updated)
    }

    /// Merge `new_id` into `neighbor`'s adjacency at `layer`, then keep the
    /// budget's worth nearest to `neighbor` itself.
    fn update_neighbor(
        &self,
        neighbor: &mut Node,
        new_id: NodeId,
        new_vector: &[f32],
        layer: usize,
    ) -> Result<()> {
        let origin = self.vectors.get(neighbor.id())?;

        let mut ranked = Vec::with_capacity(neighbor.neighbors(layer).len() + 1);
        ranked.push((self.distance.distance(new_vector, origin), new_id));
        for &id in neighbor.neighbors(layer) {
            let vector = self.vectors.get(id)?;
            ranked.push((self.distance.distance(vector, origin), id));
        }

        let mut nearest = MinMaxHeap::from_vec(ranked, |a: &(f32, NodeId), b: &(f32, NodeId)| {
            a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).is_lt()
        });
        nearest.truncate(self.config.degree_budget(layer));

        let keep = nearest.into_sorted_vec().into_iter().map(|(_, id)| id);
        neighbor.set_neighbors(layer, keep)
    }

    fn store(&mut self, node: Node, vector: Vec<f32>) -> Result<()> {
        let id = node.id();
        self.nodes.add(id, node)?;
        self.vectors.add(id, vector)
    }

    fn emit(&self, kind: HnswKind) {
        self.meter.emit(VizEvent::Hnsw(HnswEvt { kind }));
    }
}

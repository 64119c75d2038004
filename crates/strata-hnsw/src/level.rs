//! Level assignment for new nodes.
//!
//! A node lands on level `l` with probability
//! `exp(-l / mL) * (1 - exp(-1 / mL))` where `mL = 1 / ln(M)`, so each level
//! holds roughly `1/M` of the nodes below it. The table stops at the first
//! level whose probability drops under `1e-9`; the last level absorbs the
//! truncated tail.

use rand::Rng;

const MIN_LEVEL_PROBABILITY: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct LevelTable {
    level_mult: f64,
    probabilities: Vec<f64>,
    /// Neighbors a node on level `l` may hold across levels `0..=l`.
    cumulative_neighbors: Vec<usize>,
}

impl LevelTable {
    /// Build the table for degree budget `m` (`m >= 2`).
    pub fn new(m: usize) -> Self {
        let level_mult = 1.0 / (m as f64).ln();
        let mut probabilities = Vec::new();
        let mut cumulative_neighbors = Vec::new();

        let mut neighbors: usize = 0;
        for level in 0.. {
            let p = (-(level as f64) / level_mult).exp() * (1.0 - (-1.0 / level_mult).exp());
            // Also terminates for a degenerate m, where every p is 0.
            if !(p >= MIN_LEVEL_PROBABILITY) {
                break;
            }
            neighbors = neighbors.saturating_add(if level == 0 { m.saturating_mul(2) } else { m });
            probabilities.push(p);
            cumulative_neighbors.push(neighbors);
        }

        Self {
            level_mult,
            probabilities,
            cumulative_neighbors,
        }
    }

    pub fn level_mult(&self) -> f64 {
        self.level_mult
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn cumulative_neighbors(&self) -> &[usize] {
        &self.cumulative_neighbors
    }

    /// Highest level [`select_level`](Self::select_level) can return.
    pub fn max_level(&self) -> usize {
        self.probabilities.len().saturating_sub(1)
    }

    /// Draw a level with one uniform sample.
    pub fn select_level<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut f: f64 = rng.gen();
        for (level, &p) in self.probabilities.iter().enumerate() {
            if f < p {
                return level;
            }
            f -= p;
        }
        self.max_level()
    }

    /// Initial adjacency capacity for `level`. Only a sizing hint.
    pub fn capacity_hint(&self, level: usize) -> usize {
        match level {
            0 => self.cumulative_neighbors.first().copied().unwrap_or(0),
            l if l < self.cumulative_neighbors.len() => {
                self.cumulative_neighbors[l] - self.cumulative_neighbors[l - 1]
            }
            _ => 0,
        }
    }
}

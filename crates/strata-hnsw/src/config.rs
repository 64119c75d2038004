//! HNSW construction and search parameters.

use crate::visited::VisitedKind;
use serde::{Deserialize, Serialize};

/// HNSW configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HnswConfig {
    /// Max connections per node per layer (M). Layer 0 allows 2*M.
    /// Default: 16
    pub m: usize,

    /// Beam width during construction.
    /// Higher = better graph quality, slower build.
    /// Default: 200
    pub ef_construction: usize,

    /// Default beam width for queries.
    /// Higher = better recall, slower search.
    /// Default: 100
    pub ef_search: usize,

    /// Seed for level sampling. Equal seeds and insertion order give
    /// identical graphs.
    /// Default: 0
    pub seed: u64,

    /// Visited-set strategy used by each layer search.
    /// Default: bitset
    pub visited: VisitedKind,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            m: 16,
            ef_construction: 200,
            ef_search: 100,
            seed: 0,
            visited: VisitedKind::Bitset,
        }
    }
}

impl HnswConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    pub fn with_ef_construction(mut self, ef: usize) -> Self {
        self.ef_construction = ef;
        self
    }

    pub fn with_ef_search(mut self, ef: usize) -> Self {
        self.ef_search = ef;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_visited(mut self, visited: VisitedKind) -> Self {
        self.visited = visited;
        self
    }

    /// Max out-degree at `layer`.
    pub fn degree_budget(&self, layer: usize) -> usize {
        if layer == 0 {
            self.m.saturating_mul(2)
        } else {
            self.m
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.m < 2 {
            return Err(ConfigError::InvalidValue("m must be >= 2".into()));
        }
        if self.ef_construction == 0 {
            return Err(ConfigError::InvalidValue(
                "ef_construction must be > 0".into(),
            ));
        }
        if self.ef_search == 0 {
            return Err(ConfigError::InvalidValue("ef_search must be > 0".into()));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HnswConfig::default();
        assert_eq!(config.m, 16);
        assert_eq!(config.ef_construction, 200);
        assert_eq!(config.ef_search, 100);
        assert_eq!(config.seed, 0);
        assert_eq!(config.visited, VisitedKind::Bitset);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_degree_budget() {
        let config = HnswConfig::new().with_m(8);
        assert_eq!(config.degree_budget(0), 16);
        assert_eq!(config.degree_budget(1), 8);
        assert_eq!(config.degree_budget(5), 8);
    }

    #[test]
    fn test_invalid_values() {
        assert!(HnswConfig::new().with_m(1).validate().is_err());
        assert!(HnswConfig::new().with_ef_construction(0).validate().is_err());
        assert!(HnswConfig::new().with_ef_search(0).validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = HnswConfig::new()
            .with_m(32)
            .with_ef_construction(64)
            .with_ef_search(10)
            .with_seed(42)
            .with_visited(VisitedKind::Hash);

        assert_eq!(config.m, 32);
        assert_eq!(config.ef_construction, 64);
        assert_eq!(config.ef_search, 10);
        assert_eq!(config.seed, 42);
        assert_eq!(config.visited, VisitedKind::Hash);
    }
}

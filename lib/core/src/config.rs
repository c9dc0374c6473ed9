use crate::kmeans::KMeansOptions;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMBED_DIM: usize = 3072;
pub const DEFAULT_K: usize = 10;
pub const DEFAULT_MAX_ITERS: usize = 15;
pub const DEFAULT_SEED: u32 = 42;

/// Tunables shared by clustering and match ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Dimension every sanitized embedding is fitted to
    pub embed_dim: usize,
    /// Nominal cluster count; clamped to the number of vectors per run
    pub k: usize,
    pub max_iters: usize,
    pub seed: u32,
    pub default_match_limit: usize,
    pub max_match_limit: usize,
    /// Cap on shared interests reported per match
    pub max_shared: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            embed_dim: DEFAULT_EMBED_DIM,
            k: DEFAULT_K,
            max_iters: DEFAULT_MAX_ITERS,
            seed: DEFAULT_SEED,
            default_match_limit: 20,
            max_match_limit: 50,
            max_shared: 3,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.embed_dim == 0 {
            return Err(Error::InvalidConfig("embed_dim must be positive".to_string()));
        }
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be positive".to_string()));
        }
        if self.max_match_limit == 0 {
            return Err(Error::InvalidConfig("max_match_limit must be positive".to_string()));
        }
        if self.default_match_limit == 0 {
            return Err(Error::InvalidConfig("default_match_limit must be positive".to_string()));
        }
        Ok(())
    }

    /// Resolve a caller-supplied result cap into `[1, max_match_limit]`
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_match_limit)
            .clamp(1, self.max_match_limit.max(1))
    }

    pub fn kmeans_options(&self) -> KMeansOptions {
        KMeansOptions {
            k: self.k,
            max_iters: self.max_iters,
            seed: self.seed,
            converge_early: false,
        }
    }
}

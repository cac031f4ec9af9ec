//! Deterministic seed hierarchy.
//!
//! A master seed generates sub-seeds for each `(config_hash, iteration)` pair.
//! Sub-seeds are derived via BLAKE3 hashing, independently of thread scheduling
//! order, so a seeded batch produces the same numbers regardless of thread count.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::ConfigHash;

#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a sub-seed for a specific `(config_hash, iteration)`.
    pub fn sub_seed(&self, config_hash: &ConfigHash, iteration: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(config_hash.as_bytes());
        hasher.update(&iteration.to_le_bytes());
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    /// A seeded `StdRng` for one evaluation.
    pub fn rng_for(&self, config_hash: &ConfigHash, iteration: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(config_hash, iteration))
    }
}

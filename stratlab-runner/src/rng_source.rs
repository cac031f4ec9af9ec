//! Random source selection for the service.
//!
//! `Entropy` gives every evaluation a freshly seeded generator: results are
//! not reproducible, which is the normal mode. `Seeded` derives each
//! generator from a `SeedHierarchy` and an iteration index, so a fixed seed
//! replays the same numbers for the same sequence of calls.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;

use stratlab_core::{ConfigHash, SeedHierarchy};

#[derive(Debug, Default)]
pub enum RngSource {
    #[default]
    Entropy,
    Seeded {
        hierarchy: SeedHierarchy,
        counter: AtomicU64,
    },
}

impl RngSource {
    pub fn entropy() -> Self {
        Self::Entropy
    }

    pub fn seeded(master_seed: u64) -> Self {
        Self::Seeded {
            hierarchy: SeedHierarchy::new(master_seed),
            counter: AtomicU64::new(0),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::entropy, Self::seeded)
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, Self::Seeded { .. })
    }

    /// Reserve `n` consecutive iteration indices and return the first.
    ///
    /// Batches reserve their whole block up front so item `i` always gets
    /// `base + i`, whatever order the worker threads run in.
    pub fn reserve(&self, n: u64) -> u64 {
        match self {
            Self::Entropy => 0,
            Self::Seeded { counter, .. } => counter.fetch_add(n, Ordering::Relaxed),
        }
    }

    /// Generator for one evaluation at a given iteration index.
    pub fn rng_at(&self, config_hash: &ConfigHash, iteration: u64) -> StdRng {
        match self {
            Self::Entropy => StdRng::from_entropy(),
            Self::Seeded { hierarchy, .. } => hierarchy.rng_for(config_hash, iteration),
        }
    }

    /// Generator for the next evaluation.
    pub fn next_rng(&self, config_hash: &ConfigHash) -> StdRng {
        let iteration = self.reserve(1);
        self.rng_at(config_hash, iteration)
    }
}

//! Primitive context
//!
//! Everything a primitive may touch: the arena, and the random source behind
//! the `random` selector. The random source is any `rand::RngCore`, so
//! tests and reproducible runs can seed it.

use mbvm_core::{Arena, MemoryConfig};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

pub struct PrimContext {
    pub arena: Arena,
    rng: Box<dyn RngCore + Send>,
}

impl PrimContext {
    /// Context with an entropy-seeded random source
    pub fn new(arena: Arena) -> Self {
        Self::with_rng(arena, StdRng::from_entropy())
    }

    /// Context with a fixed seed
    pub fn with_seed(arena: Arena, seed: u64) -> Self {
        Self::with_rng(arena, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(arena: Arena, rng: impl RngCore + Send + 'static) -> Self {
        PrimContext {
            arena,
            rng: Box::new(rng),
        }
    }

    /// Build the arena and random source from a [`MemoryConfig`]
    pub fn from_config(config: &MemoryConfig) -> Self {
        let arena = Arena::with_config(config);
        match config.random_seed {
            Some(seed) => {
                debug!(seed, "random selector seeded");
                Self::with_seed(arena, seed)
            }
            None => Self::new(arena),
        }
    }

    /// Uniform pick from `1..=count`; `count` must be non-zero
    pub(crate) fn random_index(&mut self, count: usize) -> usize {
        debug_assert!(count > 0);
        self.rng.gen_range(1..=count)
    }
}

impl std::fmt::Debug for PrimContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimContext")
            .field("arena", &self.arena)
            .finish_non_exhaustive()
    }
}

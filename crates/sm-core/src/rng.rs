//! Deterministic per-source RNG.
//!
//! # Determinism strategy
//!
//! Each source gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (source_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive source IDs uniformly across the seed space.
//! This means:
//!
//! - Sources never share RNG state, so a random-walk trajectory on source 3
//!   is byte-identical whether or not source 4 exists.
//! - Re-running a scene with the same seed reproduces every jitter exactly —
//!   essential when a composer wants to bounce the same take twice.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::SourceId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-source deterministic RNG.
///
/// Owned by the component that needs randomness (currently the random-walk
/// playback mode), not shared between sources or components.
pub struct SourceRng(SmallRng);

impl SourceRng {
    /// Seed deterministically from the run's global seed and a source ID.
    pub fn new(global_seed: u64, source: SourceId) -> Self {
        let seed = global_seed ^ (source.0 as u64).wrapping_mul(MIXING_CONSTANT);
        SourceRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform value in `[-1, 1]` — the jitter primitive for random walks.
    #[inline]
    pub fn jitter(&mut self) -> f32 {
        self.0.gen_range(-1.0f32..=1.0)
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

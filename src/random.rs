//! Seeded random number generation.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic RNG from `seed`.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Resolves an optional configured seed, drawing a fresh one when absent.
///
/// Solvers call this once at construction and keep the result, so that
/// `clear()` can replay the same random stream.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Derives an independent seed for a secondary stream (e.g. a neighborhood
/// owned by an annealer) from a base seed.
pub fn derive_seed(base: u64, stream: u64) -> u64 {
    // SplitMix64 finalizer
    let mut z = base.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

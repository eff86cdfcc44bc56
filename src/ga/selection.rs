//! Mating pool selection.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::Individual;
use crate::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;

/// Chooses the parents that take part in reproduction.
///
/// All strategies assume **minimization** (lower cost = better).
pub trait Selection {
    /// Returns the population indices of up to `pool_size` distinct parents.
    fn select(&mut self, population: &[Individual], pool_size: usize) -> Vec<usize>;

    /// Restarts the private random stream from `seed`.
    fn reseed(&mut self, _seed: u64) {}
}

/// Fitness-proportionate (roulette wheel) selection without replacement.
///
/// Each individual is weighted `max_cost + 1 - cost`, where `max_cost` is the
/// worst cost in the population, so the worst individual still has a
/// non-zero chance. A selected individual leaves the wheel.
///
/// # Complexity
/// O(n) per spin, O(n · pool_size) per generation
#[derive(Debug, Clone)]
pub struct RouletteSelection {
    rng: StdRng,
}

impl RouletteSelection {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }
}

impl Selection for RouletteSelection {
    fn select(&mut self, population: &[Individual], pool_size: usize) -> Vec<usize> {
        let Some(max_cost) = population.iter().map(|ind| ind.cost).max() else {
            return Vec::new();
        };

        let mut wheel: Vec<(usize, f64)> = population
            .iter()
            .enumerate()
            .map(|(i, ind)| (i, (max_cost - ind.cost) as f64 + 1.0))
            .collect();

        let mut pool = Vec::with_capacity(pool_size.min(wheel.len()));
        while pool.len() < pool_size && !wheel.is_empty() {
            let total: f64 = wheel.iter().map(|&(_, w)| w).sum();
            let spin = self.rng.random_range(0.0..total);

            let mut cumulative = 0.0;
            // floating-point fallback: the last slot
            let mut chosen = wheel.len() - 1;
            for (slot, &(_, weight)) in wheel.iter().enumerate() {
                cumulative += weight;
                if cumulative > spin {
                    chosen = slot;
                    break;
                }
            }
            pool.push(wheel.swap_remove(chosen).0);
        }
        pool
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = create_rng(seed);
    }
}

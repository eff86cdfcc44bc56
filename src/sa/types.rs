//! Strategy traits for Simulated Annealing: neighborhoods and cooling.
//!
//! Both are injected into the annealer at runtime. Plain closures work too:
//! any `FnMut(&[usize]) -> Vec<usize>` is a [`Neighborhood`] and any
//! `Fn(f64) -> f64` is a [`Cooling`] schedule.

use crate::error::{Result, TspError};
use crate::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;

/// Produces a tour "close to" a given closed tour.
///
/// The input is a closed tour `0, …, 0`; the output must be a closed tour
/// over the same cities with the same start and end.
pub trait Neighborhood {
    /// Returns a perturbed copy of `tour`.
    fn neighbor(&mut self, tour: &[usize]) -> Vec<usize>;

    /// Restarts the private random stream from `seed`.
    ///
    /// Called by the annealer on construction and on `clear()` so repeated
    /// runs replay the same moves. Stateless neighborhoods ignore it.
    fn reseed(&mut self, _seed: u64) {}
}

impl<F> Neighborhood for F
where
    F: FnMut(&[usize]) -> Vec<usize>,
{
    fn neighbor(&mut self, tour: &[usize]) -> Vec<usize> {
        self(tour)
    }
}

/// Maps the current temperature to the next, lower one.
pub trait Cooling {
    fn cool(&self, temperature: f64) -> f64;
}

impl<F> Cooling for F
where
    F: Fn(f64) -> f64,
{
    fn cool(&self, temperature: f64) -> f64 {
        self(temperature)
    }
}

/// Swaps two randomly chosen interior cities.
///
/// The fixed start/end city is never moved. Tours with fewer than two
/// interior cities are returned unchanged.
#[derive(Debug, Clone)]
pub struct SwapNeighborhood {
    rng: StdRng,
}

impl SwapNeighborhood {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }
}

impl Neighborhood for SwapNeighborhood {
    fn neighbor(&mut self, tour: &[usize]) -> Vec<usize> {
        let mut next = tour.to_vec();
        if let Some((first, second)) = interior_pair(tour.len(), &mut self.rng) {
            next.swap(first, second);
        }
        next
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = create_rng(seed);
    }
}

/// Reverses a random interior segment (a 2-opt move).
#[derive(Debug, Clone)]
pub struct InversionNeighborhood {
    rng: StdRng,
}

impl InversionNeighborhood {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }
}

impl Neighborhood for InversionNeighborhood {
    fn neighbor(&mut self, tour: &[usize]) -> Vec<usize> {
        let mut next = tour.to_vec();
        if let Some((a, b)) = interior_pair(tour.len(), &mut self.rng) {
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            next[start..=end].reverse();
        }
        next
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = create_rng(seed);
    }
}

/// Two positions in `1..len - 1`, or `None` when there are fewer than two
/// interior positions.
fn interior_pair<R: Rng>(len: usize, rng: &mut R) -> Option<(usize, usize)> {
    if len < 4 {
        return None;
    }
    let first = rng.random_range(1..len - 1);
    let second = rng.random_range(1..len - 1);
    Some((first, second))
}

/// Geometric cooling `T_{k+1} = coefficient * T_k`.
///
/// Called "linear" because the temperature is scaled by a constant factor
/// at every level. Typical coefficients are 0.9–0.999.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearCooling {
    coefficient: f64,
}

impl LinearCooling {
    /// # Errors
    /// `coefficient` must lie in `(0, 1)`.
    pub fn new(coefficient: f64) -> Result<Self> {
        if !(coefficient > 0.0 && coefficient < 1.0) {
            return Err(TspError::InvalidConfig(format!(
                "cooling coefficient must be in (0, 1), got {coefficient}"
            )));
        }
        Ok(Self { coefficient })
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }
}

impl Default for LinearCooling {
    fn default() -> Self {
        Self { coefficient: 0.95 }
    }
}

impl Cooling for LinearCooling {
    fn cool(&self, temperature: f64) -> f64 {
        self.coefficient * temperature
    }
}

/// Lundy-Mees cooling `T_{k+1} = T_k / (1 + beta * T_k)`.
///
/// Cools fast at high temperature and slowly near the end.
///
/// Reference: Lundy & Mees (1986), "Convergence of an Annealing Algorithm"
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LundyMeesCooling {
    beta: f64,
}

impl LundyMeesCooling {
    /// # Errors
    /// `beta` must be positive.
    pub fn new(beta: f64) -> Result<Self> {
        if !(beta > 0.0) {
            return Err(TspError::InvalidConfig(format!(
                "lundy-mees beta must be positive, got {beta}"
            )));
        }
        Ok(Self { beta })
    }
}

impl Cooling for LundyMeesCooling {
    fn cool(&self, temperature: f64) -> f64 {
        temperature / (1.0 + self.beta * temperature)
    }
}

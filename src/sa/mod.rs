//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod annealer;
mod config;
mod types;

pub use annealer::{metropolis_accepts, SaStatistics, SimulatedAnnealing};
pub use config::SaConfig;
pub use types::{
    Cooling, InversionNeighborhood, LinearCooling, LundyMeesCooling, Neighborhood,
    SwapNeighborhood,
};

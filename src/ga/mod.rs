//! Genetic Algorithm (GA).
//!
//! A population of open city orders evolves through roulette selection,
//! order crossover and swap mutation. Every operator is a strategy object
//! that can be replaced or left out.
//!
//! # Key Types
//!
//! - [`GaConfig`]: population, pool and probability parameters
//! - [`GeneticAlgorithm`]: executes the evolutionary loop
//! - [`Selection`], [`Crossover`], [`Mutation`]: operator contracts
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"

mod config;
mod genetic;
mod operators;
mod selection;
mod types;

pub use config::GaConfig;
pub use genetic::{GaStatistics, GeneticAlgorithm};
pub use operators::{
    order_crossover, Crossover, InversionMutation, Mutation, OrderCrossover, SwapMutation,
};
pub use selection::{RouletteSelection, Selection};
pub use types::Individual;

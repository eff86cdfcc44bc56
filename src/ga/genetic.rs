//! GA evolutionary loop execution.
//!
//! [`GeneticAlgorithm`] orchestrates the evolutionary process:
//! initialization → selection → crossover → mutation → evaluation → repeat.

use super::config::GaConfig;
use super::operators::{Crossover, Mutation, OrderCrossover, SwapMutation};
use super::selection::{RouletteSelection, Selection};
use super::types::Individual;
use crate::algorithm::{Algorithm, SolverState, StopHandle};
use crate::error::Result;
use crate::matrix::DistanceMatrix;
use crate::random::{create_rng, derive_seed, resolve_seed};
use crate::solution::Solution;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

const SELECTION_STREAM: u64 = 1;
const CROSSOVER_STREAM: u64 = 2;
const MUTATION_STREAM: u64 = 3;

/// Counters describing the last run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GaStatistics {
    /// Completed generations.
    pub generations: usize,
    /// Generations that produced a new best tour.
    pub improvements: usize,
    /// Whether the run ended on the stagnation limit.
    pub stagnated: bool,
}

/// Genetic Algorithm solver.
///
/// Individuals are open permutations of all cities. Operators are injected
/// and may be missing: a run without a selection, crossover or mutation
/// operator does nothing and returns `false`.
///
/// The reported best tour is rotated to start at city 0 and closed.
///
/// # Examples
///
/// ```
/// use u_tsp::{Algorithm, DistanceMatrix};
/// use u_tsp::ga::{GaConfig, GeneticAlgorithm};
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0, 10, 15, 20],
///     vec![10, 0, 35, 25],
///     vec![15, 35, 0, 30],
///     vec![20, 25, 30, 0],
/// ]).unwrap();
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_pool_size(10)
///     .with_max_generations(50)
///     .with_seed(42);
/// let mut ga = GeneticAlgorithm::new(m, config).unwrap();
/// assert!(ga.solve());
/// assert_eq!(ga.solution().cost, 80);
/// ```
pub struct GeneticAlgorithm {
    state: SolverState,
    config: GaConfig,
    seed: u64,
    rng: StdRng,
    selection: Option<Box<dyn Selection + Send>>,
    crossover: Option<Box<dyn Crossover + Send>>,
    mutation: Option<Box<dyn Mutation + Send>>,
    population: Vec<Individual>,
    stats: GaStatistics,
}

impl std::fmt::Debug for GeneticAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneticAlgorithm")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("has_selection", &self.selection.is_some())
            .field("has_crossover", &self.crossover.is_some())
            .field("has_mutation", &self.mutation.is_some())
            .field("best", self.state.best())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl GeneticAlgorithm {
    /// Creates a GA with roulette selection, order crossover and swap
    /// mutation.
    ///
    /// # Errors
    /// Fails if the matrix is empty or not square, or if `config` is invalid.
    pub fn new(distances: impl Into<Arc<DistanceMatrix>>, config: GaConfig) -> Result<Self> {
        Ok(Self::without_operators(distances, config)?.with_default_operators())
    }

    /// Creates a GA with no operators installed.
    ///
    /// # Errors
    /// Fails if the matrix is empty or not square, or if `config` is invalid.
    pub fn without_operators(
        distances: impl Into<Arc<DistanceMatrix>>,
        config: GaConfig,
    ) -> Result<Self> {
        config.validate()?;
        let state = SolverState::new(distances)?;
        let seed = resolve_seed(config.seed);
        Ok(Self {
            state,
            population: Vec::with_capacity(config.population_size),
            config,
            seed,
            rng: create_rng(seed),
            selection: None,
            crossover: None,
            mutation: None,
            stats: GaStatistics::default(),
        })
    }

    /// Installs the default operators.
    pub fn with_default_operators(mut self) -> Self {
        self.set_selection(RouletteSelection::new(0));
        self.set_crossover(OrderCrossover::new(0));
        self.set_mutation(SwapMutation::new(0));
        self
    }

    /// Replaces the selection operator. Its random stream is reseeded from
    /// the solver's seed.
    pub fn set_selection<S>(&mut self, selection: S)
    where
        S: Selection + Send + 'static,
    {
        let mut selection: Box<dyn Selection + Send> = Box::new(selection);
        selection.reseed(derive_seed(self.seed, SELECTION_STREAM));
        self.selection = Some(selection);
    }

    /// Replaces the crossover operator.
    pub fn set_crossover<C>(&mut self, crossover: C)
    where
        C: Crossover + Send + 'static,
    {
        let mut crossover: Box<dyn Crossover + Send> = Box::new(crossover);
        crossover.reseed(derive_seed(self.seed, CROSSOVER_STREAM));
        self.crossover = Some(crossover);
    }

    /// Replaces the mutation operator.
    pub fn set_mutation<M>(&mut self, mutation: M)
    where
        M: Mutation + Send + 'static,
    {
        let mut mutation: Box<dyn Mutation + Send> = Box::new(mutation);
        mutation.reseed(derive_seed(self.seed, MUTATION_STREAM));
        self.mutation = Some(mutation);
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// The seed all random streams derive from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The population after the last completed generation.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn statistics(&self) -> GaStatistics {
        self.stats
    }

    fn reseed_all(&mut self) {
        self.rng = create_rng(self.seed);
        if let Some(selection) = self.selection.as_mut() {
            selection.reseed(derive_seed(self.seed, SELECTION_STREAM));
        }
        if let Some(crossover) = self.crossover.as_mut() {
            crossover.reseed(derive_seed(self.seed, CROSSOVER_STREAM));
        }
        if let Some(mutation) = self.mutation.as_mut() {
            mutation.reseed(derive_seed(self.seed, MUTATION_STREAM));
        }
    }
}

impl Algorithm for GeneticAlgorithm {
    fn name(&self) -> &'static str {
        "ga"
    }

    fn solve(&mut self) -> bool {
        let (Some(selection), Some(crossover), Some(mutation)) = (
            self.selection.as_mut(),
            self.crossover.as_mut(),
            self.mutation.as_mut(),
        ) else {
            warn!("ga: selection, crossover and mutation operators are required, not solving");
            return false;
        };
        self.state.begin_run();
        self.stats = GaStatistics::default();

        let distances = self.state.shared_distances();
        let config = &self.config;
        info!(
            "ga: evolving {} individuals over {} cities (generation limit {})",
            config.population_size,
            distances.dimension(),
            config.max_generations
        );

        self.population = (0..config.population_size)
            .map(|_| Individual::random(&distances, &mut self.rng))
            .collect();
        offer_fittest(&mut self.state, &self.population);

        let mut stagnation = 0usize;
        loop {
            if self.state.is_stopped() {
                info!(
                    "ga: cancelled after {} generations, best cost {}",
                    self.stats.generations,
                    self.state.best_cost()
                );
                return false;
            }
            if config.max_generations > 0 && self.stats.generations >= config.max_generations {
                break;
            }

            let pool = selection.select(&self.population, config.pool_size);
            if pool.is_empty() {
                break;
            }

            let mut offspring = Vec::with_capacity(config.population_size + 1);
            while offspring.len() < config.population_size {
                let first = &self.population[pool[self.rng.random_range(0..pool.len())]].order;
                let second = &self.population[pool[self.rng.random_range(0..pool.len())]].order;
                if self.rng.random::<f64>() < config.crossover_probability {
                    offspring.push(crossover.cross(first, second));
                    offspring.push(crossover.cross(second, first));
                } else {
                    offspring.push(first.clone());
                    offspring.push(second.clone());
                }
            }
            offspring.truncate(config.population_size);

            for order in offspring.iter_mut() {
                if self.rng.random::<f64>() < config.mutation_probability {
                    mutation.mutate(order);
                }
            }

            self.population = offspring
                .into_iter()
                .map(|order| Individual::evaluated(order, &distances))
                .collect();
            self.stats.generations += 1;

            if offer_fittest(&mut self.state, &self.population) {
                self.stats.improvements += 1;
                stagnation = 0;
                debug!(
                    "ga: new best tour with cost {} at generation {}",
                    self.state.best_cost(),
                    self.stats.generations
                );
            } else {
                stagnation += 1;
            }
            trace!(
                "ga: generation {} done, best {}",
                self.stats.generations,
                self.state.best_cost()
            );

            if config.stagnation_limit > 0 && stagnation >= config.stagnation_limit {
                self.stats.stagnated = true;
                break;
            }
        }

        info!(
            "ga: finished after {} generations, best cost {}",
            self.stats.generations,
            self.state.best_cost()
        );
        true
    }

    fn clear(&mut self) {
        self.state.clear();
        self.population.clear();
        self.stats = GaStatistics::default();
        self.reseed_all();
    }

    fn solution(&self) -> Solution {
        self.state.best().clone()
    }

    fn stop_handle(&self) -> StopHandle {
        self.state.stop_handle()
    }
}

/// Offers the cheapest individual as a closed tour starting at city 0.
fn offer_fittest(state: &mut SolverState, population: &[Individual]) -> bool {
    match population.iter().min_by_key(|ind| ind.cost) {
        Some(fittest) => state.accept(fittest.to_solution()),
        None => false,
    }
}

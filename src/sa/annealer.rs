//! SA execution loop.

use super::config::SaConfig;
use super::types::{Cooling, LinearCooling, Neighborhood, SwapNeighborhood};
use crate::algorithm::{Algorithm, SolverState, StopHandle};
use crate::error::Result;
use crate::matrix::DistanceMatrix;
use crate::random::{create_rng, derive_seed, resolve_seed};
use crate::solution::Solution;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

/// Random stream index handed to the neighborhood.
const NEIGHBORHOOD_STREAM: u64 = 1;

/// Counters describing the last annealing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaStatistics {
    /// Neighbor evaluations.
    pub iterations: usize,
    /// Accepted moves, including improving ones.
    pub accepted_moves: usize,
    /// Moves strictly cheaper than the current tour.
    pub improving_moves: usize,
    /// Completed temperature levels.
    pub epochs: usize,
}

/// Simulated Annealing solver.
///
/// Starts from the identity tour `0, 1, …, n-1, 0` and walks through the
/// injected [`Neighborhood`], accepting worse tours with the Metropolis
/// probability `exp(-Δ / T)`. After each epoch the temperature is lowered by
/// the injected [`Cooling`] schedule; the run ends once it is no longer above
/// [`SaConfig::min_temperature`].
///
/// The current tour may regress; the best tour never does.
///
/// Every random stream (acceptance draws and the neighborhood) is derived
/// from one seed, and `clear()` rewinds them all.
///
/// # Examples
///
/// ```
/// use u_tsp::{Algorithm, DistanceMatrix};
/// use u_tsp::sa::{InversionNeighborhood, LinearCooling, SaConfig, SimulatedAnnealing};
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0, 10, 15, 20],
///     vec![10, 0, 35, 25],
///     vec![15, 35, 0, 30],
///     vec![20, 25, 30, 0],
/// ]).unwrap();
///
/// let mut sa = SimulatedAnnealing::new(m, SaConfig::default().with_seed(42))
///     .unwrap()
///     .with_neighborhood(InversionNeighborhood::new(0))
///     .with_cooling(LinearCooling::new(0.9).unwrap());
/// assert!(sa.solve());
/// assert_eq!(sa.solution().cost, 80);
/// ```
pub struct SimulatedAnnealing {
    state: SolverState,
    config: SaConfig,
    seed: u64,
    rng: StdRng,
    neighborhood: Box<dyn Neighborhood + Send>,
    cooling: Box<dyn Cooling + Send>,
    current: Solution,
    temperature: f64,
    stats: SaStatistics,
}

impl std::fmt::Debug for SimulatedAnnealing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedAnnealing")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("temperature", &self.temperature)
            .field("current", &self.current)
            .field("best", self.state.best())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl SimulatedAnnealing {
    /// Creates an annealer with a [`SwapNeighborhood`] and the default
    /// [`LinearCooling`].
    ///
    /// # Errors
    /// Fails if the matrix is empty or not square, or if `config` is invalid.
    pub fn new(distances: impl Into<Arc<DistanceMatrix>>, config: SaConfig) -> Result<Self> {
        config.validate()?;
        let state = SolverState::new(distances)?;
        let seed = resolve_seed(config.seed);
        let temperature = config.initial_temperature;

        Ok(Self {
            state,
            config,
            seed,
            rng: create_rng(seed),
            neighborhood: Box::new(SwapNeighborhood::new(derive_seed(seed, NEIGHBORHOOD_STREAM))),
            cooling: Box::new(LinearCooling::default()),
            current: Solution::empty(),
            temperature,
            stats: SaStatistics::default(),
        })
    }

    /// Replaces the neighborhood strategy. Its random stream is reseeded
    /// from the annealer's seed.
    pub fn with_neighborhood<N>(mut self, neighborhood: N) -> Self
    where
        N: Neighborhood + Send + 'static,
    {
        self.neighborhood = Box::new(neighborhood);
        self.neighborhood
            .reseed(derive_seed(self.seed, NEIGHBORHOOD_STREAM));
        self
    }

    /// Replaces the cooling schedule.
    pub fn with_cooling<C>(mut self, cooling: C) -> Self
    where
        C: Cooling + Send + 'static,
    {
        self.cooling = Box::new(cooling);
        self
    }

    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    /// The seed all random streams derive from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// The current (possibly worse than best) tour.
    pub fn current(&self) -> &Solution {
        &self.current
    }

    pub fn statistics(&self) -> SaStatistics {
        self.stats
    }

    fn identity_tour(distances: &DistanceMatrix) -> Solution {
        let dimension = distances.dimension();
        let mut path: Vec<usize> = (0..dimension).collect();
        path.push(0);
        let cost = if dimension > 1 {
            distances.path_cost(&path)
        } else {
            0
        };
        Solution::new(path, cost)
    }
}

impl Algorithm for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "sa"
    }

    fn solve(&mut self) -> bool {
        let distances = self.state.shared_distances();
        info!(
            "sa: annealing {} cities from T={} (epoch {})",
            distances.dimension(),
            self.config.initial_temperature,
            self.config.epoch_size
        );

        self.state.begin_run();
        self.stats = SaStatistics::default();
        self.current = Self::identity_tour(&distances);
        self.state.offer(&self.current);
        self.temperature = self.config.initial_temperature;

        if distances.dimension() == 1 {
            return true;
        }

        while self.temperature > self.config.min_temperature {
            for _ in 0..self.config.epoch_size {
                if self.state.is_stopped() {
                    info!(
                        "sa: cancelled at T={:.4}, best cost {}",
                        self.temperature,
                        self.state.best_cost()
                    );
                    return false;
                }

                let path = self.neighborhood.neighbor(&self.current.path);
                let cost = distances.path_cost(&path);
                self.stats.iterations += 1;

                let improving = cost < self.current.cost;
                if metropolis_accepts(cost, self.current.cost, self.temperature, &mut self.rng) {
                    self.current = Solution::new(path, cost);
                    self.stats.accepted_moves += 1;
                    if improving {
                        self.stats.improving_moves += 1;
                    }
                    if self.state.offer(&self.current) {
                        debug!("sa: new best tour with cost {cost} at T={:.4}", self.temperature);
                    }
                }
            }

            let next = self.cooling.cool(self.temperature);
            trace!(
                "sa: epoch {} done, T {:.4} -> {:.4}, current {}, best {}",
                self.stats.epochs,
                self.temperature,
                next,
                self.current.cost,
                self.state.best_cost()
            );
            self.stats.epochs += 1;

            if !(next < self.temperature) {
                warn!(
                    "sa: cooling schedule did not lower the temperature ({} -> {next}), stopping",
                    self.temperature
                );
                self.temperature = next;
                break;
            }
            self.temperature = next;
        }

        info!(
            "sa: finished after {} epochs, best cost {}",
            self.stats.epochs,
            self.state.best_cost()
        );
        true
    }

    fn clear(&mut self) {
        self.state.clear();
        self.current.clear();
        self.temperature = self.config.initial_temperature;
        self.rng = create_rng(self.seed);
        self.neighborhood
            .reseed(derive_seed(self.seed, NEIGHBORHOOD_STREAM));
        self.stats = SaStatistics::default();
    }

    fn solution(&self) -> Solution {
        self.state.best().clone()
    }

    fn stop_handle(&self) -> StopHandle {
        self.state.stop_handle()
    }
}

/// Metropolis acceptance criterion.
///
/// A strictly cheaper candidate is always accepted without touching `rng`.
/// Otherwise the candidate is accepted with probability
/// `exp(-(candidate - current) / temperature)` against a uniform draw in
/// `[0, 1)`.
pub fn metropolis_accepts<R: Rng + ?Sized>(
    candidate: u64,
    current: u64,
    temperature: f64,
    rng: &mut R,
) -> bool {
    if candidate < current {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    let delta = (candidate - current) as f64;
    let probability = (-delta / temperature).exp();
    rng.random::<f64>() < probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhaustive::ExhaustiveSearch;
    use crate::sa::{InversionNeighborhood, LundyMeesCooling};

    fn classic() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0, 10, 15, 20],
            vec![10, 0, 35, 25],
            vec![15, 35, 0, 30],
            vec![20, 25, 30, 0],
        ])
        .unwrap()
    }

    fn random_matrix(n: usize, seed: u64) -> DistanceMatrix {
        let mut rng = create_rng(seed);
        let cells = (0..n * n).map(|_| rng.random_range(1..100)).collect();
        DistanceMatrix::new(n, n, cells).unwrap()
    }

    #[test]
    fn test_sa_classic_four_cities() {
        let config = SaConfig::default().with_seed(42);
        let mut sa = SimulatedAnnealing::new(classic(), config).unwrap();
        assert!(sa.solve());
        let solution = sa.solution();
        assert_eq!(solution.cost, 80);
        assert!(solution.is_valid_tour(4));
        assert!(sa.temperature() <= 0.1);
    }

    #[test]
    fn test_sa_near_optimal_on_random_instance() {
        let m = random_matrix(8, 21);
        let mut bf = ExhaustiveSearch::new(m.clone()).unwrap();
        assert!(bf.solve());
        let optimum = bf.solution().cost;

        let config = SaConfig::default()
            .with_initial_temperature(200.0)
            .with_epoch_size(200)
            .with_seed(42);
        let mut sa = SimulatedAnnealing::new(m.clone(), config)
            .unwrap()
            .with_neighborhood(InversionNeighborhood::new(0))
            .with_cooling(LinearCooling::new(0.95).unwrap());
        assert!(sa.solve());

        let solution = sa.solution();
        assert!(solution.is_valid_tour(8));
        assert_eq!(m.path_cost(&solution.path), solution.cost);
        assert!(solution.cost >= optimum);
        assert!(
            solution.cost as f64 <= optimum as f64 * 1.5,
            "expected near-optimal tour, got {} vs optimum {optimum}",
            solution.cost
        );
    }

    #[test]
    fn test_sa_best_never_worse_than_current_history() {
        let config = SaConfig::default().with_seed(3);
        let mut sa = SimulatedAnnealing::new(random_matrix(10, 9), config).unwrap();
        assert!(sa.solve());
        assert!(sa.solution().cost <= sa.current().cost);
        let stats = sa.statistics();
        assert!(stats.accepted_moves >= stats.improving_moves);
        assert_eq!(stats.iterations, stats.epochs * 100);
    }

    #[test]
    fn test_sa_clear_reproduces_with_seed() {
        let config = SaConfig::default().with_seed(1234);
        let mut sa = SimulatedAnnealing::new(random_matrix(12, 4), config).unwrap();
        assert!(sa.solve());
        let first = sa.solution();
        let first_stats = sa.statistics();

        sa.clear();
        assert!(!sa.solution().is_found());
        assert!(sa.solve());
        assert_eq!(sa.solution(), first);
        assert_eq!(sa.statistics(), first_stats);
    }

    #[test]
    fn test_sa_same_seed_same_result() {
        let m = random_matrix(10, 8);
        let config = SaConfig::default().with_seed(77);
        let mut a = SimulatedAnnealing::new(m.clone(), config.clone()).unwrap();
        let mut b = SimulatedAnnealing::new(m, config).unwrap();
        a.solve();
        b.solve();
        assert_eq!(a.solution(), b.solution());
    }

    #[test]
    fn test_sa_stop_before_solve_has_no_effect() {
        let config = SaConfig::default().with_seed(42);
        let mut sa = SimulatedAnnealing::new(classic(), config).unwrap();
        sa.stop();
        assert!(sa.solve());
        assert_eq!(sa.solution().cost, 80);
        assert!(sa.statistics().iterations > 0);
    }

    #[test]
    fn test_sa_cancelled_mid_run_keeps_valid_best() {
        let config = SaConfig::default().with_seed(42);
        let mut sa = SimulatedAnnealing::new(random_matrix(12, 6), config)
            .unwrap()
            .with_cooling(|t: f64| t * 0.999_999);
        let handle = sa.stop_handle();
        let completed = std::thread::scope(|scope| {
            scope.spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(20));
                handle.stop();
            });
            sa.solve()
        });
        assert!(!completed);
        assert!(sa.solution().is_valid_tour(12));
    }

    #[test]
    fn test_sa_cold_start_returns_identity() {
        // Below the stopping threshold: no epoch runs.
        let config = SaConfig::default().with_initial_temperature(0.05);
        let mut sa = SimulatedAnnealing::new(classic(), config).unwrap();
        assert!(sa.solve());
        assert_eq!(sa.solution(), Solution::new(vec![0, 1, 2, 3, 0], 95));
        assert_eq!(sa.statistics().epochs, 0);
    }

    #[test]
    fn test_sa_statistics_cover_one_run() {
        let config = SaConfig::default().with_epoch_size(10).with_seed(9);
        let mut sa = SimulatedAnnealing::new(classic(), config).unwrap();
        assert!(sa.solve());
        let first = sa.statistics();
        assert!(sa.solve());
        assert_eq!(sa.statistics().epochs, first.epochs);
        assert_eq!(sa.statistics().iterations, first.iterations);
    }

    #[test]
    fn test_sa_rejects_invalid_config() {
        let config = SaConfig::default().with_epoch_size(0);
        assert!(SimulatedAnnealing::new(classic(), config).is_err());
        let rect = DistanceMatrix::new(1, 2, vec![0, 1]).unwrap();
        assert!(SimulatedAnnealing::new(rect, SaConfig::default()).is_err());
    }

    #[test]
    fn test_sa_closure_strategies() {
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(1.0)
            .with_epoch_size(5)
            .with_seed(1);
        let mut sa = SimulatedAnnealing::new(classic(), config)
            .unwrap()
            .with_neighborhood(|tour: &[usize]| {
                let mut next = tour.to_vec();
                next.swap(1, 2);
                next
            })
            .with_cooling(|t: f64| t - 1.0);
        assert!(sa.solve());
        // 10 -> 9 -> ... -> 1: nine epochs of five moves.
        assert_eq!(sa.statistics().epochs, 9);
        assert_eq!(sa.statistics().iterations, 45);
    }

    #[test]
    fn test_sa_non_decreasing_cooling_terminates() {
        let config = SaConfig::default().with_epoch_size(3).with_seed(1);
        let mut sa = SimulatedAnnealing::new(classic(), config)
            .unwrap()
            .with_cooling(|t: f64| t);
        assert!(sa.solve());
        assert_eq!(sa.statistics().epochs, 1);
    }

    #[test]
    fn test_sa_lundy_mees() {
        let config = SaConfig::default().with_epoch_size(20).with_seed(5);
        let mut sa = SimulatedAnnealing::new(classic(), config)
            .unwrap()
            .with_cooling(LundyMeesCooling::new(0.05).unwrap());
        assert!(sa.solve());
        assert_eq!(sa.solution().cost, 80);
    }

    #[test]
    fn test_sa_single_city() {
        let m = DistanceMatrix::from_rows(vec![vec![5]]).unwrap();
        let mut sa = SimulatedAnnealing::new(m, SaConfig::default()).unwrap();
        assert!(sa.solve());
        assert_eq!(sa.solution(), Solution::new(vec![0, 0], 0));
    }

    #[test]
    fn test_metropolis_accepts_improvement_unconditionally() {
        let mut rng = create_rng(0);
        for _ in 0..1000 {
            assert!(metropolis_accepts(9, 10, 1e-9, &mut rng));
            assert!(metropolis_accepts(0, 1, 0.0, &mut rng));
        }
    }

    #[test]
    fn test_metropolis_equal_cost_accepted() {
        let mut rng = create_rng(0);
        for _ in 0..1000 {
            assert!(metropolis_accepts(10, 10, 0.5, &mut rng));
        }
    }

    #[test]
    fn test_metropolis_cold_rejects_uphill() {
        let mut rng = create_rng(0);
        for _ in 0..1000 {
            assert!(!metropolis_accepts(1000, 10, 0.1, &mut rng));
            assert!(!metropolis_accepts(11, 10, 0.0, &mut rng));
        }
    }

    #[test]
    fn test_metropolis_hot_accepts_uphill() {
        let mut rng = create_rng(0);
        let accepted = (0..1000)
            .filter(|_| metropolis_accepts(11, 10, 1e6, &mut rng))
            .count();
        assert!(accepted > 990, "expected near-certain acceptance, got {accepted}");
    }
}

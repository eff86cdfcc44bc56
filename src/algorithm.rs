//! The common solver contract.
//!
//! Every strategy owns the distance matrix, its best-known [`Solution`] and a
//! stop flag. The flag is the only state touched from another thread: a
//! [`StopHandle`] can be cloned out of a solver and handed to a watcher (see
//! [`TimedRunner`](crate::runner::TimedRunner)) while the solver itself is
//! borrowed mutably by `solve`.

use crate::error::Result;
use crate::matrix::DistanceMatrix;
use crate::solution::Solution;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable, thread-safe cooperative cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Lowers the flag so the owning solver can run again.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A TSP solving strategy.
///
/// # Lifecycle
///
/// 1. Construct with a square distance matrix.
/// 2. [`solve`](Algorithm::solve) runs until the strategy's natural end
///    (`true`) or until a stop was requested (`false`).
/// 3. [`solution`](Algorithm::solution) returns the best closed tour found.
/// 4. [`clear`](Algorithm::clear) to forget the incumbent before an
///    independent run.
///
/// Every `solve` starts with the stop flag lowered, so a stop requested
/// while no run is active has no effect.
pub trait Algorithm {
    /// Short identifier (`bf`, `bnb`, `sa`, `ga`).
    fn name(&self) -> &'static str;

    /// Runs the search. Returns `false` if it was cancelled before reaching
    /// its terminal condition.
    fn solve(&mut self) -> bool;

    /// Resets the best solution, strategy-specific search state and the stop
    /// flag.
    fn clear(&mut self);

    /// The best solution found so far.
    fn solution(&self) -> Solution;

    /// Handle sharing this solver's stop flag.
    fn stop_handle(&self) -> StopHandle;

    /// Requests cooperative cancellation.
    fn stop(&self) {
        self.stop_handle().stop();
    }
}

/// State every strategy carries: the matrix, the incumbent and the stop flag.
#[derive(Debug, Clone)]
pub struct SolverState {
    distances: Arc<DistanceMatrix>,
    best: Solution,
    stop: StopHandle,
}

impl SolverState {
    /// Validates the matrix shape and creates an empty state.
    ///
    /// # Errors
    /// [`TspError::EmptyMatrix`](crate::TspError::EmptyMatrix) or
    /// [`TspError::NonSquareMatrix`](crate::TspError::NonSquareMatrix).
    pub fn new(distances: impl Into<Arc<DistanceMatrix>>) -> Result<Self> {
        let distances = distances.into();
        distances.ensure_square()?;
        Ok(Self {
            distances,
            best: Solution::empty(),
            stop: StopHandle::new(),
        })
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// A shared handle to the matrix, for loops that also mutate the state.
    pub fn shared_distances(&self) -> Arc<DistanceMatrix> {
        Arc::clone(&self.distances)
    }

    pub fn dimension(&self) -> usize {
        self.distances.dimension()
    }

    pub fn best(&self) -> &Solution {
        &self.best
    }

    pub fn best_cost(&self) -> u64 {
        self.best.cost
    }

    /// Replaces the incumbent if `candidate` is strictly cheaper.
    pub fn offer(&mut self, candidate: &Solution) -> bool {
        if candidate.improves_on(&self.best) {
            self.best.clone_from(candidate);
            true
        } else {
            false
        }
    }

    /// Replaces the incumbent with an owned, strictly cheaper tour.
    pub fn accept(&mut self, candidate: Solution) -> bool {
        if candidate.improves_on(&self.best) {
            self.best = candidate;
            true
        } else {
            false
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Lowers the stop flag at the start of a run.
    pub fn begin_run(&self) {
        self.stop.reset();
    }

    /// Forgets the incumbent and lowers the stop flag.
    pub fn clear(&mut self) {
        self.best.clear();
        self.stop.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TspError;

    fn square(n: usize) -> DistanceMatrix {
        DistanceMatrix::new(n, n, vec![1; n * n]).unwrap()
    }

    #[test]
    fn test_stop_handle_shared_between_clones() {
        let handle = StopHandle::new();
        let other = handle.clone();
        assert!(!handle.is_stopped());
        other.stop();
        other.stop();
        assert!(handle.is_stopped());
        handle.reset();
        assert!(!other.is_stopped());
    }

    #[test]
    fn test_stop_from_another_thread() {
        let handle = StopHandle::new();
        let remote = handle.clone();
        std::thread::spawn(move || remote.stop()).join().unwrap();
        assert!(handle.is_stopped());
    }

    #[test]
    fn test_state_rejects_non_square() {
        let rect = DistanceMatrix::new(2, 3, vec![0; 6]).unwrap();
        assert!(matches!(
            SolverState::new(rect),
            Err(TspError::NonSquareMatrix { rows: 2, columns: 3 })
        ));
    }

    #[test]
    fn test_offer_is_monotonic() {
        let mut state = SolverState::new(square(3)).unwrap();
        assert!(state.offer(&Solution::new(vec![0, 1, 2, 0], 9)));
        assert!(!state.offer(&Solution::new(vec![0, 2, 1, 0], 9)));
        assert!(!state.accept(Solution::new(vec![0, 2, 1, 0], 12)));
        assert!(state.accept(Solution::new(vec![0, 2, 1, 0], 3)));
        assert_eq!(state.best_cost(), 3);
    }

    #[test]
    fn test_begin_run_lowers_flag_and_keeps_best() {
        let mut state = SolverState::new(square(2)).unwrap();
        state.offer(&Solution::new(vec![0, 1, 0], 2));
        state.stop_handle().stop();
        state.begin_run();
        assert!(!state.is_stopped());
        assert_eq!(state.best_cost(), 2);
    }

    #[test]
    fn test_clear_resets_best_and_flag() {
        let mut state = SolverState::new(square(3)).unwrap();
        state.offer(&Solution::new(vec![0, 1, 2, 0], 3));
        state.stop_handle().stop();
        state.clear();
        assert!(!state.best().is_found());
        assert!(!state.is_stopped());
    }
}

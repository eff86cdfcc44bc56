//! Exhaustive (brute-force) search.
//!
//! Enumerates all `(n - 1)!` tours that start at city `0` in lexicographic
//! order. Only practical for small instances; serves as ground truth for the
//! other solvers.

use crate::algorithm::{Algorithm, SolverState, StopHandle};
use crate::error::Result;
use crate::matrix::DistanceMatrix;
use crate::solution::Solution;
use log::{debug, info};
use std::sync::Arc;

/// Brute-force solver.
#[derive(Debug, Clone)]
pub struct ExhaustiveSearch {
    state: SolverState,
    evaluated: u64,
}

impl ExhaustiveSearch {
    /// # Errors
    /// Fails if the matrix is empty or not square.
    pub fn new(distances: impl Into<Arc<DistanceMatrix>>) -> Result<Self> {
        Ok(Self {
            state: SolverState::new(distances)?,
            evaluated: 0,
        })
    }

    /// Number of tours evaluated by the last `solve`.
    pub fn evaluated(&self) -> u64 {
        self.evaluated
    }
}

impl Algorithm for ExhaustiveSearch {
    fn name(&self) -> &'static str {
        "bf"
    }

    fn solve(&mut self) -> bool {
        self.state.begin_run();
        self.evaluated = 0;
        let distances = self.state.shared_distances();
        let dimension = distances.dimension();
        info!("bf: enumerating tours over {dimension} cities");

        let mut order: Vec<usize> = (1..dimension).collect();
        loop {
            if self.state.is_stopped() {
                info!(
                    "bf: cancelled after {} tours, best cost {}",
                    self.evaluated,
                    self.state.best_cost()
                );
                return false;
            }

            let cost = closed_cost(&distances, &order);
            self.evaluated += 1;
            if cost < self.state.best_cost() {
                let mut path = Vec::with_capacity(dimension + 1);
                path.push(0);
                path.extend_from_slice(&order);
                path.push(0);
                self.state.accept(Solution::new(path, cost));
                debug!("bf: new best tour with cost {cost}");
            }

            if !next_permutation(&mut order) {
                break;
            }
        }

        info!(
            "bf: finished after {} tours, best cost {}",
            self.evaluated,
            self.state.best_cost()
        );
        true
    }

    fn clear(&mut self) {
        self.state.clear();
        self.evaluated = 0;
    }

    fn solution(&self) -> Solution {
        self.state.best().clone()
    }

    fn stop_handle(&self) -> StopHandle {
        self.state.stop_handle()
    }
}

/// Cost of `0 -> order... -> 0`. A lone start city costs nothing.
fn closed_cost(distances: &DistanceMatrix, order: &[usize]) -> u64 {
    let mut cost = 0;
    let mut previous = 0;
    for &city in order {
        cost += distances.cost(previous, city);
        previous = city;
    }
    if previous != 0 {
        cost += distances.cost(previous, 0);
    }
    cost
}

/// Rearranges `values` into the next lexicographic permutation.
///
/// Returns `false` (leaving the slice sorted descending) when `values` was
/// already the last permutation.
pub fn next_permutation(values: &mut [usize]) -> bool {
    let n = values.len();
    if n < 2 {
        return false;
    }

    let mut pivot = n - 1;
    while pivot > 0 && values[pivot - 1] >= values[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }

    let mut successor = n - 1;
    while values[successor] <= values[pivot - 1] {
        successor -= 1;
    }
    values.swap(pivot - 1, successor);
    values[pivot..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0, 10, 15, 20],
            vec![10, 0, 35, 25],
            vec![15, 35, 0, 30],
            vec![20, 25, 30, 0],
        ])
        .unwrap()
    }

    #[test]
    fn test_next_permutation_order() {
        let mut v = vec![1, 2, 3];
        let mut seen = vec![v.clone()];
        while next_permutation(&mut v) {
            seen.push(v.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );
    }

    #[test]
    fn test_next_permutation_trivial() {
        assert!(!next_permutation(&mut []));
        assert!(!next_permutation(&mut [4]));
    }

    #[test]
    fn test_classic_four_cities() {
        let mut bf = ExhaustiveSearch::new(classic()).unwrap();
        assert!(bf.solve());
        assert_eq!(bf.solution(), Solution::new(vec![0, 1, 3, 2, 0], 80));
        assert_eq!(bf.evaluated(), 6);
    }

    #[test]
    fn test_includes_return_edge() {
        // Cheap outbound chain 0->1->2 but an expensive return from 2.
        let m = DistanceMatrix::from_rows(vec![
            vec![0, 1, 50],
            vec![50, 0, 1],
            vec![100, 1, 0],
        ])
        .unwrap();
        let mut bf = ExhaustiveSearch::new(m).unwrap();
        assert!(bf.solve());
        // 0->1->2->0 = 1 + 1 + 100 = 102; 0->2->1->0 = 50 + 1 + 50 = 101.
        assert_eq!(bf.solution(), Solution::new(vec![0, 2, 1, 0], 101));
    }

    #[test]
    fn test_single_city() {
        let m = DistanceMatrix::from_rows(vec![vec![9]]).unwrap();
        let mut bf = ExhaustiveSearch::new(m).unwrap();
        assert!(bf.solve());
        assert_eq!(bf.solution(), Solution::new(vec![0, 0], 0));
    }

    #[test]
    fn test_stop_before_solve_has_no_effect() {
        let mut bf = ExhaustiveSearch::new(classic()).unwrap();
        bf.stop();
        assert!(bf.solve());
        assert_eq!(bf.solution().cost, 80);

        bf.clear();
        assert!(!bf.solution().is_found());
        assert!(bf.solve());
        assert_eq!(bf.solution().cost, 80);
    }

    #[test]
    fn test_evaluated_counts_one_run() {
        let mut bf = ExhaustiveSearch::new(classic()).unwrap();
        assert!(bf.solve());
        assert!(bf.solve());
        assert_eq!(bf.evaluated(), 6);
    }
}

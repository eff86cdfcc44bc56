//! Depth-first branch-and-bound over partial tours.

use super::types::{CursorTour, SearchNode};
use crate::algorithm::{Algorithm, SolverState, StopHandle};
use crate::error::Result;
use crate::matrix::DistanceMatrix;
use crate::solution::{Solution, INFINITE_COST};
use log::{debug, info};
use std::sync::Arc;

/// Counters describing the work done since the solver was created or last
/// cleared. A cancelled search resumes on the next `solve`, so the counters
/// span every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BnbStatistics {
    /// Nodes popped and extended onto the cursor tour.
    pub expanded: usize,
    /// Nodes discarded because their bound could not beat the incumbent.
    pub pruned: usize,
    /// Complete tours that replaced the incumbent.
    pub improvements: usize,
}

/// Exact solver: explicit-stack DFS with minimum-outgoing-edge pruning.
///
/// Tours start and end at city `0`. The stack holds lightweight
/// [`SearchNode`]s; a single [`CursorTour`] is moved between branches by
/// backtracking, so no node stores its own path.
///
/// Run to completion, the result is optimal. A cancelled search keeps its
/// stack and resumes where it left off on the next `solve`.
///
/// # Examples
///
/// ```
/// use u_tsp::{Algorithm, BranchAndBoundDfs, DistanceMatrix};
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0, 10, 15, 20],
///     vec![10, 0, 35, 25],
///     vec![15, 35, 0, 30],
///     vec![20, 25, 30, 0],
/// ]).unwrap();
///
/// let mut bnb = BranchAndBoundDfs::new(m).unwrap();
/// assert!(bnb.solve());
/// assert_eq!(bnb.solution().cost, 80);
/// ```
#[derive(Debug, Clone)]
pub struct BranchAndBoundDfs {
    state: SolverState,
    stack: Vec<SearchNode>,
    cursor: CursorTour,
    stats: BnbStatistics,
}

impl BranchAndBoundDfs {
    /// Creates a solver with its stack seeded from the start city.
    ///
    /// # Errors
    /// Fails if the matrix is empty or not square.
    pub fn new(distances: impl Into<Arc<DistanceMatrix>>) -> Result<Self> {
        let state = SolverState::new(distances)?;
        let dimension = state.dimension();
        let mut solver = Self {
            state,
            stack: Vec::new(),
            cursor: CursorTour::new(dimension),
            stats: BnbStatistics::default(),
        };
        solver.seed_stack();
        Ok(solver)
    }

    pub fn statistics(&self) -> BnbStatistics {
        self.stats
    }

    /// Number of nodes still waiting on the stack.
    pub fn pending(&self) -> usize {
        self.stack.len()
    }

    fn seed_stack(&mut self) {
        self.stack.clear();
        for vertex in 1..self.state.dimension() {
            self.stack.push(SearchNode {
                vertex,
                level: 1,
                bound: 0,
            });
        }
    }

    /// Closes the cursor tour and keeps it if it beats the incumbent.
    fn accept_cursor(&mut self, distances: &DistanceMatrix) {
        let cost = self.cursor.cost() + distances.cost(self.cursor.last(), 0);
        if cost < self.state.best_cost() {
            let mut path = Vec::with_capacity(self.cursor.len() + 1);
            path.extend_from_slice(self.cursor.path());
            path.push(0);
            self.state.accept(Solution::new(path, cost));
            self.stats.improvements += 1;
            debug!("bnb: new best tour with cost {cost}");
        }
    }
}

impl Algorithm for BranchAndBoundDfs {
    fn name(&self) -> &'static str {
        "bnb"
    }

    fn solve(&mut self) -> bool {
        self.state.begin_run();
        let distances = self.state.shared_distances();
        let dimension = distances.dimension();
        info!("bnb: solving {dimension} cities");

        if dimension == 1 {
            self.state.accept(Solution::new(vec![0, 0], 0));
            return true;
        }

        loop {
            if self.state.is_stopped() {
                info!(
                    "bnb: cancelled with {} pending nodes, best cost {}",
                    self.stack.len(),
                    self.state.best_cost()
                );
                return false;
            }

            let Some(node) = self.stack.pop() else {
                break;
            };

            if node.bound >= self.state.best_cost() {
                self.stats.pruned += 1;
                continue;
            }

            self.cursor.backtrack_to(node.level, &distances);
            self.cursor.visit(node.vertex, &distances);
            self.stats.expanded += 1;

            let incumbent = self.state.best_cost();
            for child in 1..dimension {
                if self.cursor.is_visited(child) {
                    continue;
                }
                let bound = lower_bound(&distances, &self.cursor, child, incumbent);
                self.stack.push(SearchNode {
                    vertex: child,
                    level: node.level + 1,
                    bound,
                });
            }

            if self.cursor.is_complete() {
                self.accept_cursor(&distances);
            }
        }

        info!(
            "bnb: finished, best cost {} ({} expanded, {} pruned)",
            self.state.best_cost(),
            self.stats.expanded,
            self.stats.pruned
        );
        true
    }

    fn clear(&mut self) {
        self.state.clear();
        self.cursor.reset();
        self.stats = BnbStatistics::default();
        self.seed_stack();
    }

    fn solution(&self) -> Solution {
        self.state.best().clone()
    }

    fn stop_handle(&self) -> StopHandle {
        self.state.stop_handle()
    }
}

/// Lower bound on any complete tour that extends `cursor` with `candidate`.
///
/// `cursor.cost + d(last, candidate)` plus, for `candidate` and every other
/// unvisited city, the cheapest edge leaving it towards a city that is still
/// open (unvisited, or the start city). Each of those cities contributes
/// exactly one outgoing edge to any completion, so the sum never
/// overestimates.
///
/// Returns [`INFINITE_COST`] as soon as the running sum reaches `incumbent`.
pub fn lower_bound(
    distances: &DistanceMatrix,
    cursor: &CursorTour,
    candidate: usize,
    incumbent: u64,
) -> u64 {
    let mut bound = cursor
        .cost()
        .saturating_add(distances.cost(cursor.last(), candidate))
        .saturating_add(cheapest_open_edge(distances, cursor, candidate));

    for city in 1..distances.dimension() {
        if city == candidate || cursor.is_visited(city) {
            continue;
        }
        if bound >= incumbent {
            return INFINITE_COST;
        }
        bound = bound.saturating_add(cheapest_open_edge(distances, cursor, city));
    }

    bound
}

/// Cheapest edge from `city` to any other city not yet on the cursor tour.
fn cheapest_open_edge(distances: &DistanceMatrix, cursor: &CursorTour, city: usize) -> u64 {
    (0..distances.dimension())
        .filter(|&next| next != city && !cursor.is_visited(next))
        .map(|next| distances.cost(city, next))
        .min()
        .unwrap_or(INFINITE_COST)
}

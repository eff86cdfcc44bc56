//! Traveling Salesman solvers with timed cooperative cancellation.
//!
//! Every solver implements the common [`Algorithm`] contract over a shared
//! square [`DistanceMatrix`]:
//!
//! - **Exhaustive search (`bf`)**: enumerates every tour; ground truth for
//!   small instances.
//! - **Branch and Bound (`bnb`)**: exact explicit-stack depth-first search
//!   pruned by a minimum-outgoing-edge lower bound.
//! - **Simulated Annealing (`sa`)**: single-solution trajectory search with
//!   pluggable neighborhoods and cooling schedules.
//! - **Genetic Algorithm (`ga`)**: population search with pluggable
//!   selection, crossover and mutation operators.
//!
//! [`TimedRunner`] runs any of them against a wall-clock deadline and
//! reports a [`TestResult`]. Solvers stop cooperatively through a
//! [`StopHandle`]; the best tour found so far is always kept.
//!
//! # Quick start
//!
//! ```
//! use std::time::Duration;
//! use u_tsp::{Algorithm, BranchAndBoundDfs, DistanceMatrix, TimedRunner};
//!
//! let m = DistanceMatrix::from_rows(vec![
//!     vec![0, 10, 15, 20],
//!     vec![10, 0, 35, 25],
//!     vec![15, 35, 0, 30],
//!     vec![20, 25, 30, 0],
//! ]).unwrap();
//!
//! let mut solver = BranchAndBoundDfs::new(m).unwrap();
//! let result = TimedRunner::run(&mut solver, Duration::from_secs(1));
//! assert!(result.completed);
//! assert_eq!(result.solution.to_string(), "0->1->3->2->0 (80)");
//!
//! solver.clear();
//! assert!(!solver.solution().is_found());
//! ```
//!
//! The library logs through the [`log`] facade and never installs a logger.

pub mod algorithm;
pub mod bnb;
pub mod error;
pub mod exhaustive;
pub mod ga;
pub mod io;
pub mod matrix;
pub mod params;
pub mod random;
pub mod runner;
pub mod sa;
pub mod solution;

pub use algorithm::{Algorithm, SolverState, StopHandle};
pub use bnb::BranchAndBoundDfs;
pub use error::{Result, TspError};
pub use exhaustive::ExhaustiveSearch;
pub use ga::{GaConfig, GeneticAlgorithm};
pub use matrix::DistanceMatrix;
pub use params::{build_algorithm, AlgorithmKind, Parameters};
pub use runner::{TestResult, TimedRunner};
pub use sa::{SaConfig, SimulatedAnnealing};
pub use solution::{Solution, INFINITE_COST};

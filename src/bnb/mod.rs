//! Branch and Bound (B&B).
//!
//! Exact depth-first search over partial tours rooted at city `0`. Each
//! stack node carries a lower bound computed from the cheapest outgoing edge
//! of every city that still has to be left; nodes whose bound cannot beat
//! the incumbent are discarded without expansion.
//!
//! # References
//!
//! - Little, Murty, Sweeney & Karel (1963), "An Algorithm for the Traveling
//!   Salesman Problem"
//! - Land & Doig (1960), "An Automatic Method of Solving Discrete
//!   Programming Problems"

mod dfs;
mod types;

pub use dfs::{lower_bound, BnbStatistics, BranchAndBoundDfs};
pub use types::{CursorTour, SearchNode};

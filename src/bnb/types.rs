//! Search nodes and the shared cursor tour.

use crate::matrix::DistanceMatrix;

/// A pending branch on the DFS stack.
///
/// Nodes do not carry a copy of their partial path: the path is rebuilt by
/// backtracking the single [`CursorTour`] to `level` cities before `vertex`
/// is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchNode {
    /// City to visit next.
    pub vertex: usize,
    /// Number of cities on the cursor tour before `vertex` is appended.
    pub level: usize,
    /// Lower bound on any complete tour through this node.
    pub bound: u64,
}

/// The partial tour currently being extended, starting at city `0`.
///
/// Keeps the visited markers in step with the path so that both can be
/// rolled back one city at a time.
#[derive(Debug, Clone)]
pub struct CursorTour {
    path: Vec<usize>,
    cost: u64,
    visited: Vec<bool>,
}

impl CursorTour {
    /// A tour holding only the start city. The start city is never marked
    /// visited since every tour has to return to it.
    pub fn new(dimension: usize) -> Self {
        let mut path = Vec::with_capacity(dimension + 1);
        path.push(0);
        Self {
            path,
            cost: 0,
            visited: vec![false; dimension],
        }
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn last(&self) -> usize {
        self.path[self.path.len() - 1]
    }

    #[inline]
    pub fn is_visited(&self, city: usize) -> bool {
        self.visited[city]
    }

    /// Appends `city`, adding the edge from the current last city.
    pub fn visit(&mut self, city: usize, distances: &DistanceMatrix) {
        self.cost += distances.cost(self.last(), city);
        self.path.push(city);
        self.visited[city] = true;
    }

    /// Removes cities from the end until the tour holds `level` cities.
    ///
    /// The start city is never removed.
    pub fn backtrack_to(&mut self, level: usize, distances: &DistanceMatrix) {
        let level = level.max(1);
        while self.path.len() > level {
            let removed = self.path.pop().unwrap_or(0);
            self.cost -= distances.cost(self.last(), removed);
            self.visited[removed] = false;
        }
    }

    /// Whether every city is on the tour.
    pub fn is_complete(&self) -> bool {
        self.path.len() == self.visited.len()
    }

    /// Resets to the start city.
    pub fn reset(&mut self) {
        self.path.truncate(1);
        self.cost = 0;
        self.visited.fill(false);
    }
}

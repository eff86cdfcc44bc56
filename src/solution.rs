//! Tour value type shared by all solvers.

/// Cost of a solution that has not been found yet.
pub const INFINITE_COST: u64 = u64::MAX;

/// An ordered city sequence and its total cost.
///
/// A found solution is a closed tour: it starts at city `0`, visits every
/// city once and ends back at city `0`, so `path.len() == dimension + 1`.
/// Until a tour is found the path is empty and the cost is
/// [`INFINITE_COST`], so any real tour compares as an improvement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// City indices in visiting order.
    pub path: Vec<usize>,

    /// Total cost of `path`.
    pub cost: u64,
}

impl Default for Solution {
    fn default() -> Self {
        Self::empty()
    }
}

impl Solution {
    /// A solution representing "nothing found yet".
    pub fn empty() -> Self {
        Self {
            path: Vec::new(),
            cost: INFINITE_COST,
        }
    }

    pub fn new(path: Vec<usize>, cost: u64) -> Self {
        Self { path, cost }
    }

    /// Resets to the empty solution.
    pub fn clear(&mut self) {
        self.path.clear();
        self.cost = INFINITE_COST;
    }

    /// Whether a tour has been recorded.
    pub fn is_found(&self) -> bool {
        self.cost != INFINITE_COST
    }

    /// Whether `self` is strictly cheaper than `other`.
    pub fn improves_on(&self, other: &Solution) -> bool {
        self.cost < other.cost
    }

    /// Checks that the path is a closed tour over `dimension` cities that
    /// starts and ends at city `0`.
    pub fn is_valid_tour(&self, dimension: usize) -> bool {
        if self.path.len() != dimension + 1 {
            return false;
        }
        if self.path.first() != Some(&0) || self.path.last() != Some(&0) {
            return false;
        }
        let mut seen = vec![false; dimension];
        for &city in &self.path[..dimension] {
            if city >= dimension || seen[city] {
                return false;
            }
            seen[city] = true;
        }
        true
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_found() {
            return write!(f, "no solution");
        }
        let route: Vec<String> = self.path.iter().map(ToString::to_string).collect();
        write!(f, "{} ({})", route.join("->"), self.cost)
    }
}

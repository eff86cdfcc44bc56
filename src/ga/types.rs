//! Population members.

use crate::matrix::DistanceMatrix;
use crate::solution::Solution;
use rand::seq::SliceRandom;
use rand::Rng;

/// A candidate tour in the GA population.
///
/// `order` is an open permutation of every city; the tour may start anywhere
/// and implicitly returns to `order[0]`. `cost` is the closed-tour cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    pub order: Vec<usize>,
    pub cost: u64,
}

impl Individual {
    /// Wraps `order` and computes its closed-tour cost.
    pub fn evaluated(order: Vec<usize>, distances: &DistanceMatrix) -> Self {
        let cost = distances.tour_cost(&order);
        Self { order, cost }
    }

    /// A uniformly random permutation of `0..dimension`.
    pub fn random<R: Rng + ?Sized>(distances: &DistanceMatrix, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..distances.dimension()).collect();
        order.shuffle(rng);
        Self::evaluated(order, distances)
    }

    /// The same cycle as a closed tour starting and ending at city 0.
    pub fn to_solution(&self) -> Solution {
        let start = self.order.iter().position(|&c| c == 0).unwrap_or(0);
        let mut path = Vec::with_capacity(self.order.len() + 1);
        path.extend_from_slice(&self.order[start..]);
        path.extend_from_slice(&self.order[..start]);
        path.push(path.first().copied().unwrap_or(0));
        Solution::new(path, self.cost)
    }
}

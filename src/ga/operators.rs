//! Permutation crossover and mutation operators.
//!
//! Both operate on open city orders (`&[usize]` permutations of `0..n`).
//! Whether an operator is applied at all is decided by the GA from the
//! configured probabilities; the operators themselves always act.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use crate::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;

/// Recombines two parents into one child.
pub trait Crossover {
    /// Returns a child built from `first` and `second`. Both parents are
    /// permutations of the same cities.
    fn cross(&mut self, first: &[usize], second: &[usize]) -> Vec<usize>;

    /// Restarts the private random stream from `seed`.
    fn reseed(&mut self, _seed: u64) {}
}

/// Perturbs one individual in place.
pub trait Mutation {
    fn mutate(&mut self, order: &mut [usize]);

    /// Restarts the private random stream from `seed`.
    fn reseed(&mut self, _seed: u64) {}
}

/// Order Crossover (OX) with a random non-empty segment.
///
/// See [`order_crossover`].
#[derive(Debug, Clone)]
pub struct OrderCrossover {
    rng: StdRng,
}

impl OrderCrossover {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }
}

impl Crossover for OrderCrossover {
    fn cross(&mut self, first: &[usize], second: &[usize]) -> Vec<usize> {
        let n = first.len();
        if n < 2 {
            return first.to_vec();
        }
        let start = self.rng.random_range(0..n - 1);
        let end = self.rng.random_range(start + 1..=n);
        order_crossover(first, second, start, end)
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = create_rng(seed);
    }
}

/// Order Crossover (OX) over the segment `[start, end)`.
///
/// Preserves the **relative order** of the cities from both parents:
///
/// 1. Copy `first[start..end]` to the same positions of the child
/// 2. Fill the remaining positions left to right with the cities of
///    `second`, in their original order, skipping those already copied
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if the parents have different lengths or the segment is out of
/// bounds.
///
/// # Examples
///
/// ```
/// use u_tsp::ga::order_crossover;
///
/// let child = order_crossover(&[0, 1, 2, 3, 4], &[4, 3, 2, 1, 0], 1, 3);
/// assert_eq!(child, vec![4, 1, 2, 3, 0]);
/// ```
pub fn order_crossover(first: &[usize], second: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = first.len();
    assert_eq!(n, second.len(), "parents must have equal length");
    assert!(start <= end && end <= n, "segment {start}..{end} out of bounds");

    let mut copied = vec![false; n];
    for &city in &first[start..end] {
        copied[city] = true;
    }

    let mut donor = second.iter().copied().filter(|&city| !copied[city]);
    let mut child: Vec<usize> = donor.by_ref().take(start).collect();
    child.extend_from_slice(&first[start..end]);
    child.extend(donor);
    child
}

/// Swap mutation: exchange two random positions.
///
/// # Complexity
/// O(1)
#[derive(Debug, Clone)]
pub struct SwapMutation {
    rng: StdRng,
}

impl SwapMutation {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }
}

impl Mutation for SwapMutation {
    fn mutate(&mut self, order: &mut [usize]) {
        let n = order.len();
        if n < 2 {
            return;
        }
        let i = self.rng.random_range(0..n);
        let j = self.rng.random_range(0..n);
        order.swap(i, j);
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = create_rng(seed);
    }
}

/// Invert mutation: reverse a random segment (2-opt move).
///
/// # Complexity
/// O(n) worst case for segment reversal
#[derive(Debug, Clone)]
pub struct InversionMutation {
    rng: StdRng,
}

impl InversionMutation {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: create_rng(seed),
        }
    }
}

impl Mutation for InversionMutation {
    fn mutate(&mut self, order: &mut [usize]) {
        let n = order.len();
        if n < 2 {
            return;
        }
        let a = self.rng.random_range(0..n);
        let b = self.rng.random_range(0..n);
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        order[start..=end].reverse();
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = create_rng(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Check that a slice is a valid permutation of 0..n.
    fn is_valid_permutation(perm: &[usize], n: usize) -> bool {
        if perm.len() != n {
            return false;
        }
        let set: HashSet<usize> = perm.iter().copied().collect();
        set.len() == n && perm.iter().all(|&v| v < n)
    }

    // ---- OX Crossover ----

    #[test]
    fn test_ox_fixed_segment() {
        let p1 = [0, 1, 2, 3, 4, 5, 6, 7];
        let p2 = [7, 6, 5, 4, 3, 2, 1, 0];
        // Segment [2, 5) = 2, 3, 4; fill from p2 skipping those: 7 6 5 1 0
        assert_eq!(
            order_crossover(&p1, &p2, 2, 5),
            vec![7, 6, 2, 3, 4, 5, 1, 0]
        );
    }

    #[test]
    fn test_ox_full_and_empty_segment() {
        let p1 = [2, 0, 1, 3];
        let p2 = [3, 1, 0, 2];
        assert_eq!(order_crossover(&p1, &p2, 0, 4), p1.to_vec());
        assert_eq!(order_crossover(&p1, &p2, 2, 2), p2.to_vec());
    }

    #[test]
    fn test_ox_produces_valid_permutations() {
        let mut ox = OrderCrossover::new(42);
        let p1 = vec![0, 1, 2, 3, 4, 5, 6, 7];
        let p2 = vec![3, 7, 5, 1, 6, 0, 2, 4];

        for _ in 0..100 {
            let c1 = ox.cross(&p1, &p2);
            let c2 = ox.cross(&p2, &p1);
            assert!(is_valid_permutation(&c1, 8), "OX child1 not valid: {c1:?}");
            assert!(is_valid_permutation(&c2, 8), "OX child2 not valid: {c2:?}");
        }
    }

    #[test]
    fn test_ox_identical_parents() {
        let mut ox = OrderCrossover::new(9);
        let p = vec![4, 2, 0, 3, 1];
        for _ in 0..20 {
            assert_eq!(ox.cross(&p, &p), p);
        }
    }

    #[test]
    fn test_ox_small_parents() {
        let mut ox = OrderCrossover::new(42);
        assert_eq!(ox.cross(&[0], &[0]), vec![0]);
        for _ in 0..20 {
            let child = ox.cross(&[0, 1], &[1, 0]);
            assert!(is_valid_permutation(&child, 2));
        }
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn test_ox_length_mismatch_panics() {
        order_crossover(&[0, 1, 2], &[0, 1], 0, 1);
    }

    // ---- Mutation ----

    #[test]
    fn test_swap_preserves_permutation() {
        let mut mutation = SwapMutation::new(42);
        for _ in 0..100 {
            let mut perm: Vec<usize> = (0..10).collect();
            mutation.mutate(&mut perm);
            assert!(is_valid_permutation(&perm, 10));
        }
    }

    #[test]
    fn test_swap_single_element() {
        let mut mutation = SwapMutation::new(42);
        let mut perm = vec![0];
        mutation.mutate(&mut perm);
        assert_eq!(perm, vec![0]);
    }

    #[test]
    fn test_invert_preserves_permutation() {
        let mut mutation = InversionMutation::new(42);
        for _ in 0..100 {
            let mut perm: Vec<usize> = (0..10).collect();
            mutation.mutate(&mut perm);
            assert!(is_valid_permutation(&perm, 10));
        }
    }

    #[test]
    fn test_mutation_reseed_replays() {
        let mut mutation = SwapMutation::new(5);
        let mut a: Vec<usize> = (0..12).collect();
        for _ in 0..10 {
            mutation.mutate(&mut a);
        }
        mutation.reseed(5);
        let mut b: Vec<usize> = (0..12).collect();
        for _ in 0..10 {
            mutation.mutate(&mut b);
        }
        assert_eq!(a, b);
    }
}

//! Permutation operators.
//!
//! - [`Pmx`]: Partially Mapped Crossover (Goldberg & Lingle, 1985)
//! - [`SwapMutation`]: exchange two distinct positions
//! - [`InsertionMutation`]: remove an element and reinsert it elsewhere
//!
//! Every operator preserves permutation validity.

use super::types::{check_parents, check_probability, clone_pair, Variation, VariationKind};
use crate::error::Result;
use crate::random::chance;
use crate::solution::{Solution, Variable};
use rand::{Rng, RngCore};

/// Partially Mapped Crossover (PMX).
///
/// Preserves the **absolute position** of elements from both parents as
/// much as possible.
///
/// # Algorithm (Goldberg & Lingle, 1985)
///
/// 1. Select a random segment `[start, end]`
/// 2. Copy the segment from one parent into the child
/// 3. Place each element of the other parent's segment that is missing,
///    following the mapping chain until a free position is found
/// 4. Fill the remaining positions from the other parent
///
/// # Complexity
/// O(n²) worst case for the mapping chain lookups
#[derive(Debug, Clone)]
pub struct Pmx {
    probability: f64,
}

impl Pmx {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("pmx", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Variation for Pmx {
    fn name(&self) -> &str {
        "pmx"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Recombination { arity: 2 }
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 2, parents)?;
        let (mut child1, mut child2) = clone_pair(parents);

        if chance(self.probability, rng) {
            let n = child1.number_of_variables().min(child2.number_of_variables());
            for i in 0..n {
                let (left, right) = (child1.variable_mut(i), child2.variable_mut(i));
                if let (Variable::Permutation(p1), Variable::Permutation(p2)) = (left, right) {
                    if p1.len() != p2.len() || p1.len() < 2 {
                        continue;
                    }
                    let (start, end) = random_segment(p1.len(), rng);
                    let c1 = pmx_build_child(p1, p2, start, end);
                    let c2 = pmx_build_child(p2, p1, start, end);
                    *p1 = c1;
                    *p2 = c2;
                }
            }
        }

        Ok(vec![child1, child2])
    }
}

/// Build one PMX child: copy segment from `template`, map from `donor`.
fn pmx_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let sentinel = usize::MAX;
    let mut child = vec![sentinel; n];
    let mut placed = vec![false; n];
    let mut donor_position = vec![0usize; n];
    for (pos, &v) in donor.iter().enumerate() {
        donor_position[v] = pos;
    }

    for i in start..=end {
        child[i] = template[i];
        placed[template[i]] = true;
    }

    for i in start..=end {
        let donor_val = donor[i];
        if placed[donor_val] {
            continue;
        }
        let mut pos = i;
        loop {
            let next = donor_position[template[pos]];
            if next < start || next > end {
                child[next] = donor_val;
                placed[donor_val] = true;
                break;
            }
            pos = next;
        }
    }

    for i in 0..n {
        if child[i] == sentinel {
            child[i] = donor[i];
        }
    }

    child
}

/// Swap mutation: with `probability`, exchange two distinct positions of
/// every permutation locus.
#[derive(Debug, Clone)]
pub struct SwapMutation {
    probability: f64,
}

impl SwapMutation {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("swap", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Variation for SwapMutation {
    fn name(&self) -> &str {
        "swap"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Mutation
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 1, parents)?;
        let mut child = parents[0].clone();

        for variable in child.variables_mut() {
            if let Variable::Permutation(perm) = variable {
                let n = perm.len();
                if n >= 2 && chance(self.probability, rng) {
                    let i = rng.random_range(0..n);
                    let j = (i + rng.random_range(1..n)) % n;
                    perm.swap(i, j);
                }
            }
        }

        Ok(vec![child])
    }
}

/// Insertion mutation: with `probability`, remove one element of every
/// permutation locus and reinsert it at a different position.
///
/// Equivalent to a single "insert" move in local search.
#[derive(Debug, Clone)]
pub struct InsertionMutation {
    probability: f64,
}

impl InsertionMutation {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("insertion", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Variation for InsertionMutation {
    fn name(&self) -> &str {
        "insertion"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Mutation
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 1, parents)?;
        let mut child = parents[0].clone();

        for variable in child.variables_mut() {
            if let Variable::Permutation(perm) = variable {
                let n = perm.len();
                if n >= 2 && chance(self.probability, rng) {
                    let from = rng.random_range(0..n);
                    let to = (from + rng.random_range(1..n)) % n;
                    let item = perm.remove(from);
                    perm.insert(to, item);
                }
            }
        }

        Ok(vec![child])
    }
}

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment(n: usize, rng: &mut dyn RngCore) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use std::collections::HashSet;

    /// Check that a slice is a valid permutation of 0..n.
    fn is_valid_permutation(perm: &[usize], n: usize) -> bool {
        if perm.len() != n {
            return false;
        }
        let set: HashSet<usize> = perm.iter().copied().collect();
        set.len() == n && perm.iter().all(|&v| v < n)
    }

    fn perm_solution(perm: Vec<usize>) -> Solution {
        Solution::new(vec![Variable::Permutation(perm)], 1, 0)
    }

    fn perm_of(s: &Solution) -> &[usize] {
        s.variable(0).as_permutation().unwrap()
    }

    // ---- PMX ----

    #[test]
    fn test_pmx_produces_valid_permutations() {
        let mut rng = create_rng(42);
        let pmx = Pmx::new(1.0).unwrap();
        let parents = vec![
            perm_solution((0..10).collect()),
            perm_solution((0..10).rev().collect()),
        ];
        for _ in 0..200 {
            let children = pmx.evolve(&parents, &mut rng).unwrap();
            for c in &children {
                assert!(is_valid_permutation(perm_of(c), 10), "invalid: {:?}", perm_of(c));
            }
        }
    }

    #[test]
    fn test_pmx_known_segment() {
        // segment [3, 5] of template 0..8 against donor 3,7,5,1,6,0,2,4
        let template = [0, 1, 2, 3, 4, 5, 6, 7];
        let donor = [3, 7, 5, 1, 6, 0, 2, 4];
        let child = pmx_build_child(&template, &donor, 3, 5);
        assert_eq!(&child[3..=5], &[3, 4, 5]);
        assert!(is_valid_permutation(&child, 8));
    }

    #[test]
    fn test_pmx_identical_parents() {
        let mut rng = create_rng(42);
        let pmx = Pmx::new(1.0).unwrap();
        let p = perm_solution(vec![2, 0, 1, 3]);
        let children = pmx.evolve(&[p.clone(), p.clone()], &mut rng).unwrap();
        assert_eq!(children, vec![p.clone(), p]);
    }

    // ---- Swap ----

    #[test]
    fn test_swap_always_moves_two_elements() {
        let mut rng = create_rng(42);
        let swap = SwapMutation::new(1.0).unwrap();
        let parent = vec![perm_solution((0..10).collect())];
        for _ in 0..100 {
            let child = swap.evolve(&parent, &mut rng).unwrap().remove(0);
            let p = perm_of(&child);
            assert!(is_valid_permutation(p, 10));
            assert_eq!(p.iter().enumerate().filter(|(i, &v)| *i != v).count(), 2);
        }
    }

    #[test]
    fn test_swap_single_element() {
        let mut rng = create_rng(42);
        let swap = SwapMutation::new(1.0).unwrap();
        let parent = vec![perm_solution(vec![0])];
        assert_eq!(swap.evolve(&parent, &mut rng).unwrap(), parent);
    }

    // ---- Insertion ----

    #[test]
    fn test_insertion_preserves_permutation() {
        let mut rng = create_rng(42);
        let insertion = InsertionMutation::new(1.0).unwrap();
        let parent = vec![perm_solution((0..10).collect())];
        for _ in 0..100 {
            let child = insertion.evolve(&parent, &mut rng).unwrap().remove(0);
            assert!(is_valid_permutation(perm_of(&child), 10));
            assert_ne!(perm_of(&child), perm_of(&parent[0]));
        }
    }

    // ---- Random segment helper ----

    #[test]
    fn test_random_segment_bounds() {
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let (start, end) = random_segment(10, &mut rng);
            assert!(start <= end);
            assert!(end < 10);
        }
    }
}

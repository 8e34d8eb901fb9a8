//! Fixed-size subset operators.
//!
//! - [`SubsetCrossover`]: exchanges elements held by only one parent
//! - [`ReplaceMutation`]: swaps one member for a non-member
//!
//! Both keep every subset's size and keep members distinct and inside
//! `0..universe`.

use super::types::{check_parents, check_probability, clone_pair, Variation, VariationKind};
use crate::error::Result;
use crate::random::{chance, shuffle};
use crate::solution::{Solution, Variable};
use rand::{Rng, RngCore};
use std::collections::HashSet;

/// Subset crossover (SSX), two parents to two children.
///
/// With probability `probability`, the elements that only one of the two
/// subsets holds are paired up at random. Each pair is exchanged between
/// the children with probability 0.5.
#[derive(Debug, Clone)]
pub struct SubsetCrossover {
    probability: f64,
}

impl SubsetCrossover {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("ssx", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Variation for SubsetCrossover {
    fn name(&self) -> &str {
        "ssx"
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
                if let (
                    Variable::Subset {
                        members: a,
                        universe: ua,
                    },
                    Variable::Subset {
                        members: b,
                        universe: ub,
                    },
                ) = (child1.variable_mut(i), child2.variable_mut(i))
                {
                    if ua == ub {
                        exchange(a, b, rng);
                    }
                }
            }
        }

        Ok(vec![child1, child2])
    }
}

fn exchange(a: &mut [usize], b: &mut [usize], rng: &mut dyn RngCore) {
    let in_a: HashSet<usize> = a.iter().copied().collect();
    let in_b: HashSet<usize> = b.iter().copied().collect();
    let mut only_a: Vec<usize> = (0..a.len()).filter(|&k| !in_b.contains(&a[k])).collect();
    let mut only_b: Vec<usize> = (0..b.len()).filter(|&k| !in_a.contains(&b[k])).collect();
    shuffle(&mut only_a, rng);
    shuffle(&mut only_b, rng);

    for (&i, &j) in only_a.iter().zip(&only_b) {
        if rng.random_bool(0.5) {
            std::mem::swap(&mut a[i], &mut b[j]);
        }
    }
}

/// Replace mutation: with probability `probability`, one member of each
/// subset is replaced by an element outside it.
///
/// Subsets that already hold the whole universe are left unchanged.
#[derive(Debug, Clone)]
pub struct ReplaceMutation {
    probability: f64,
}

impl ReplaceMutation {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("replace", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Variation for ReplaceMutation {
    fn name(&self) -> &str {
        "replace"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Mutation
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 1, parents)?;
        let mut child = parents[0].clone();

        for variable in child.variables_mut() {
            if let Variable::Subset { members, universe } = variable {
                if members.is_empty() || members.len() >= *universe {
                    continue;
                }
                if !chance(self.probability, rng) {
                    continue;
                }
                let held: HashSet<usize> = members.iter().copied().collect();
                let outside: Vec<usize> = (0..*universe).filter(|e| !held.contains(e)).collect();
                let slot = rng.random_range(0..members.len());
                members[slot] = outside[rng.random_range(0..outside.len())];
            }
        }

        Ok(vec![child])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn subset(members: &[usize], universe: usize) -> Solution {
        Solution::new(
            vec![Variable::Subset {
                members: members.to_vec(),
                universe,
            }],
            2,
            0,
        )
    }

    fn members(s: &Solution) -> Vec<usize> {
        match s.variable(0) {
            Variable::Subset { members, .. } => {
                let mut m = members.clone();
                m.sort_unstable();
                m
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn is_valid(m: &[usize], size: usize, universe: usize) -> bool {
        let distinct: HashSet<&usize> = m.iter().collect();
        m.len() == size && distinct.len() == size && m.iter().all(|&e| e < universe)
    }

    #[test]
    fn test_ssx_keeps_sizes_and_union() {
        let mut rng = create_rng(42);
        let ssx = SubsetCrossover::new(1.0).unwrap();
        let parents = vec![subset(&[0, 1, 2, 3], 10), subset(&[2, 3, 7, 8], 10)];
        let mut changed = false;
        for _ in 0..100 {
            let children = ssx.evolve(&parents, &mut rng).unwrap();
            let (a, b) = (members(&children[0]), members(&children[1]));
            assert!(is_valid(&a, 4, 10));
            assert!(is_valid(&b, 4, 10));
            // shared elements stay in both children
            assert!(a.contains(&2) && a.contains(&3));
            assert!(b.contains(&2) && b.contains(&3));
            let mut all = [a.clone(), b.clone()].concat();
            all.sort_unstable();
            assert_eq!(all, vec![0, 1, 2, 2, 3, 3, 7, 8]);
            changed |= a != members(&parents[0]);
        }
        assert!(changed);
    }

    #[test]
    fn test_ssx_zero_probability_copies() {
        let mut rng = create_rng(42);
        let ssx = SubsetCrossover::new(0.0).unwrap();
        let parents = vec![subset(&[0, 1], 6), subset(&[4, 5], 6)];
        assert_eq!(ssx.evolve(&parents, &mut rng).unwrap(), parents);
    }

    #[test]
    fn test_replace_swaps_one_member() {
        let mut rng = create_rng(42);
        let replace = ReplaceMutation::new(1.0).unwrap();
        let parent = vec![subset(&[1, 4, 6], 8)];
        for _ in 0..100 {
            let child = members(&replace.evolve(&parent, &mut rng).unwrap()[0]);
            assert!(is_valid(&child, 3, 8));
            let kept = child.iter().filter(|e| [1, 4, 6].contains(*e)).count();
            assert_eq!(kept, 2);
        }
    }

    #[test]
    fn test_replace_full_subset_unchanged() {
        let mut rng = create_rng(42);
        let replace = ReplaceMutation::new(1.0).unwrap();
        let parent = vec![subset(&[2, 0, 1], 3)];
        assert_eq!(replace.evolve(&parent, &mut rng).unwrap(), parent);
    }

    #[test]
    fn test_rejects_bad_rate() {
        assert!(SubsetCrossover::new(1.1).is_err());
        assert!(ReplaceMutation::new(-0.5).is_err());
    }
}

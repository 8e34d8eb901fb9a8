//! Encoding-agnostic crossovers that exchange whole variables.
//!
//! These work on any encoding because they never look inside a variable.
//! A locus is exchanged only when both parents hold the same
//! [`VariableKind`](crate::solution::VariableKind) there, so a child never
//! ends up with a mismatched encoding.

use super::types::{check_parents, check_probability, clone_pair, Variation, VariationKind};
use crate::error::Result;
use crate::random::chance;
use crate::solution::Solution;
use rand::{Rng, RngCore};

fn exchange(child1: &mut Solution, child2: &mut Solution, locus: usize) {
    if child1.variable(locus).kind() == child2.variable(locus).kind() {
        std::mem::swap(child1.variable_mut(locus), child2.variable_mut(locus));
    }
}

fn shared_length(a: &Solution, b: &Solution) -> usize {
    a.number_of_variables().min(b.number_of_variables())
}

/// One-point crossover: exchanges every variable after a random cut.
#[derive(Debug, Clone)]
pub struct OnePointCrossover {
    probability: f64,
}

impl OnePointCrossover {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("1x", probability)?,
        })
    }
}

impl Variation for OnePointCrossover {
    fn name(&self) -> &str {
        "1x"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Recombination { arity: 2 }
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 2, parents)?;
        let (mut child1, mut child2) = clone_pair(parents);
        let n = shared_length(&child1, &child2);

        if n > 1 && chance(self.probability, rng) {
            let cut = rng.random_range(1..n);
            for i in cut..n {
                exchange(&mut child1, &mut child2, i);
            }
        }

        Ok(vec![child1, child2])
    }
}

/// Two-point crossover: exchanges the variables between two random cuts.
#[derive(Debug, Clone)]
pub struct TwoPointCrossover {
    probability: f64,
}

impl TwoPointCrossover {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("2x", probability)?,
        })
    }
}

impl Variation for TwoPointCrossover {
    fn name(&self) -> &str {
        "2x"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Recombination { arity: 2 }
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 2, parents)?;
        let (mut child1, mut child2) = clone_pair(parents);
        let n = shared_length(&child1, &child2);

        if n > 2 && chance(self.probability, rng) {
            let a = rng.random_range(1..n);
            let b = rng.random_range(1..n);
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            for i in start..end.max(start + 1) {
                exchange(&mut child1, &mut child2, i);
            }
        }

        Ok(vec![child1, child2])
    }
}

/// Uniform crossover: exchanges each variable with probability 0.5.
#[derive(Debug, Clone)]
pub struct UniformCrossover {
    probability: f64,
}

impl UniformCrossover {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("ux", probability)?,
        })
    }
}

impl Variation for UniformCrossover {
    fn name(&self) -> &str {
        "ux"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Recombination { arity: 2 }
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 2, parents)?;
        let (mut child1, mut child2) = clone_pair(parents);

        if chance(self.probability, rng) {
            for i in 0..shared_length(&child1, &child2) {
                if rng.random_bool(0.5) {
                    exchange(&mut child1, &mut child2, i);
                }
            }
        }

        Ok(vec![child1, child2])
    }
}

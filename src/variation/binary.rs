//! Bit-string operators.
//!
//! - [`Hux`]: Half-Uniform Crossover (Eshelman, 1991)
//! - [`BitFlip`]: independent per-bit flips

use super::types::{check_parents, check_probability, clone_pair, Variation, VariationKind};
use crate::error::Result;
use crate::random::chance;
use crate::solution::{Solution, Variable};
use rand::seq::index;
use rand::RngCore;

/// Half-Uniform Crossover (HUX).
///
/// For each binary locus, exactly half of the differing bits (rounded
/// down) are exchanged between the two children.
#[derive(Debug, Clone)]
pub struct Hux {
    probability: f64,
}

impl Hux {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("hux", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Variation for Hux {
    fn name(&self) -> &str {
        "hux"
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
                if let (Variable::Binary(a), Variable::Binary(b)) = (left, right) {
                    half_uniform(a, b, rng);
                }
            }
        }

        Ok(vec![child1, child2])
    }
}

fn half_uniform(a: &mut [bool], b: &mut [bool], rng: &mut dyn RngCore) {
    let differing: Vec<usize> = (0..a.len().min(b.len())).filter(|&i| a[i] != b[i]).collect();
    let exchanged = differing.len() / 2;
    if exchanged == 0 {
        return;
    }
    for k in index::sample(rng, differing.len(), exchanged) {
        let i = differing[k];
        std::mem::swap(&mut a[i], &mut b[i]);
    }
}

/// Bit-flip mutation: every bit flips independently with `probability`.
#[derive(Debug, Clone)]
pub struct BitFlip {
    probability: f64,
}

impl BitFlip {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("bf", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Variation for BitFlip {
    fn name(&self) -> &str {
        "bf"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Mutation
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 1, parents)?;
        let mut child = parents[0].clone();

        for variable in child.variables_mut() {
            if let Variable::Binary(bits) = variable {
                for bit in bits.iter_mut() {
                    if chance(self.probability, rng) {
                        *bit = !*bit;
                    }
                }
            }
        }

        Ok(vec![child])
    }
}

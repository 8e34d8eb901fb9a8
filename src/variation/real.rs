//! Real-valued operators.
//!
//! - [`Sbx`]: Simulated Binary Crossover (Deb & Agrawal, 1995)
//! - [`PolynomialMutation`]: Deb & Goyal (1996)
//! - [`UniformMutation`]: resample within bounds
//!
//! Only [`Variable::Real`] loci are touched (`UniformMutation` also
//! resamples [`Variable::Integer`]); everything else passes through.

use super::types::{
    check_distribution_index, check_parents, check_probability, clone_pair, Variation,
    VariationKind,
};
use crate::error::Result;
use crate::random::{chance, next_f64};
use crate::solution::{Solution, Variable};
use rand::{Rng, RngCore};

/// Smallest parent gap SBX will recombine.
const SBX_EPS: f64 = 1e-10;

/// Simulated Binary Crossover (SBX), two parents to two children.
///
/// With probability `probability` the pair is recombined; each real locus
/// is then crossed with probability 0.5. The children's values are clamped
/// into the variable bounds.
#[derive(Debug, Clone)]
pub struct Sbx {
    probability: f64,
    distribution_index: f64,
    swap: bool,
}

impl Sbx {
    pub fn new(probability: f64, distribution_index: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("sbx", probability)?,
            distribution_index: check_distribution_index("sbx", distribution_index)?,
            swap: true,
        })
    }

    /// Whether the two children's values are randomly swapped at each
    /// crossed locus (default `true`).
    pub fn with_swap(mut self, swap: bool) -> Self {
        self.swap = swap;
        self
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn distribution_index(&self) -> f64 {
        self.distribution_index
    }
}

impl Variation for Sbx {
    fn name(&self) -> &str {
        "sbx"
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
                if !rng.random_bool(0.5) {
                    continue;
                }
                let pair = match (child1.variable(i), child2.variable(i)) {
                    (
                        Variable::Real {
                            value: x0,
                            lower_bound,
                            upper_bound,
                        },
                        Variable::Real { value: x1, .. },
                    ) => Some((*x0, *x1, *lower_bound, *upper_bound)),
                    _ => None,
                };
                if let Some((x0, x1, lb, ub)) = pair {
                    let (y0, y1) =
                        sbx_pair(x0, x1, lb, ub, self.distribution_index, self.swap, rng);
                    set_real(child1.variable_mut(i), y0);
                    set_real(child2.variable_mut(i), y1);
                }
            }
        }

        Ok(vec![child1, child2])
    }
}

/// Recombines one pair of real values. Returns the values unchanged when
/// the parents are (nearly) identical.
fn sbx_pair(
    x0: f64,
    x1: f64,
    lb: f64,
    ub: f64,
    eta: f64,
    swap: bool,
    rng: &mut dyn RngCore,
) -> (f64, f64) {
    let dx = (x1 - x0).abs();
    if dx <= SBX_EPS {
        return (x0, x1);
    }

    let (lo, hi) = if x0 < x1 { (x0, x1) } else { (x1, x0) };
    let bl = 1.0 + 2.0 * (lo - lb) / dx;
    let bu = 1.0 + 2.0 * (ub - hi) / dx;
    // symmetric spread on both sides
    let beta = bl.min(bu);
    let alpha = 1.0 - 1.0 / (2.0 * beta.powf(eta + 1.0));

    // u == 1.0 would push children out of bounds
    let u = next_f64(rng).min(1.0 - f64::EPSILON) * alpha;
    let exponent = 1.0 / (eta + 1.0);
    let spread = if u <= 0.5 {
        (2.0 * u).powf(exponent)
    } else {
        (0.5 / (1.0 - u)).powf(exponent)
    };

    let mid = 0.5 * (lo + hi);
    let mut c_lo = mid - 0.5 * spread * dx;
    let mut c_hi = mid + 0.5 * spread * dx;
    if x0 > x1 {
        std::mem::swap(&mut c_lo, &mut c_hi);
    }
    if swap && rng.random_bool(0.5) {
        std::mem::swap(&mut c_lo, &mut c_hi);
    }

    (c_lo.clamp(lb, ub), c_hi.clamp(lb, ub))
}

pub(super) fn set_real(variable: &mut Variable, new_value: f64) {
    if let Variable::Real {
        value,
        lower_bound,
        upper_bound,
    } = variable
    {
        *value = new_value.clamp(*lower_bound, *upper_bound);
    }
}

/// Polynomial Mutation (PM).
///
/// Each real locus is mutated independently with probability
/// `probability`; a typical setting is `1 / number_of_variables`.
#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    probability: f64,
    distribution_index: f64,
}

impl PolynomialMutation {
    pub fn new(probability: f64, distribution_index: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("pm", probability)?,
            distribution_index: check_distribution_index("pm", distribution_index)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn distribution_index(&self) -> f64 {
        self.distribution_index
    }
}

impl Variation for PolynomialMutation {
    fn name(&self) -> &str {
        "pm"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Mutation
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 1, parents)?;
        let mut child = parents[0].clone();

        for variable in child.variables_mut() {
            if !chance(self.probability, rng) {
                continue;
            }
            if let Variable::Real {
                value,
                lower_bound,
                upper_bound,
            } = variable
            {
                *value = pm_value(*value, *lower_bound, *upper_bound, self.distribution_index, rng);
            }
        }

        Ok(vec![child])
    }
}

fn pm_value(x: f64, lb: f64, ub: f64, eta: f64, rng: &mut dyn RngCore) -> f64 {
    let dx = ub - lb;
    if !(dx > 0.0 && dx.is_finite()) {
        return x;
    }

    let u = next_f64(rng);
    let exponent = 1.0 / (eta + 1.0);
    let delta = if u < 0.5 {
        let bl = (x - lb) / dx;
        let b = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - bl).powf(eta + 1.0);
        b.powf(exponent) - 1.0
    } else {
        let bu = (ub - x) / dx;
        let b = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * (1.0 - bu).powf(eta + 1.0);
        1.0 - b.powf(exponent)
    };

    (x + delta * dx).clamp(lb, ub)
}

/// Uniform Mutation (UM): resamples a locus uniformly within its bounds.
#[derive(Debug, Clone)]
pub struct UniformMutation {
    probability: f64,
}

impl UniformMutation {
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability("um", probability)?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Variation for UniformMutation {
    fn name(&self) -> &str {
        "um"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Mutation
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 1, parents)?;
        let mut child = parents[0].clone();

        for variable in child.variables_mut() {
            if matches!(variable, Variable::Real { .. } | Variable::Integer { .. })
                && chance(self.probability, rng)
            {
                variable.randomize(rng);
            }
        }

        Ok(vec![child])
    }
}

//! Multi-parent real-valued recombination.
//!
//! - [`Pcx`]: Parent-Centric Crossover (Deb, Anand & Joshi, 2002)
//! - [`Undx`]: Unimodal Normal Distribution Crossover (Kita, Ono & Kobayashi, 1999)
//! - [`Spx`]: Simplex Crossover (Tsutsui, Yamamura & Higuchi, 1999)
//! - [`DifferentialEvolution`]: DE/rand/1/bin (Storn & Price, 1997)
//!
//! Each operator works on the loci that hold a [`Variable::Real`] in every
//! parent. Each child is built from one parent, so any other locus is a
//! copy of that parent. Child values are clamped into the variable bounds.

use super::real::set_real;
use super::types::{check_parents, check_probability, Variation, VariationKind};
use crate::error::{MoeaError, Result};
use crate::random::{chance, next_f64};
use crate::solution::{Solution, Variable};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, StandardNormal};

/// Vector components at or below this magnitude count as zero.
const ZERO_EPS: f64 = 1e-10;

fn check_counts(name: &str, parents: usize, offspring: usize) -> Result<()> {
    if parents < 2 {
        return Err(MoeaError::parameter(
            format!("{name}.parents"),
            format!("must be at least 2, got {parents}"),
        ));
    }
    if offspring == 0 {
        return Err(MoeaError::parameter(
            format!("{name}.offspring"),
            "must be at least 1",
        ));
    }
    Ok(())
}

fn check_non_negative(name: &str, key: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MoeaError::parameter(
            format!("{name}.{key}"),
            format!("must be finite and non-negative, got {value}"),
        ))
    }
}

/// Indices holding a real variable in every parent.
fn real_loci(parents: &[Solution]) -> Vec<usize> {
    let n = parents
        .iter()
        .map(Solution::number_of_variables)
        .min()
        .unwrap_or(0);
    (0..n)
        .filter(|&j| {
            parents
                .iter()
                .all(|p| matches!(p.variable(j), Variable::Real { .. }))
        })
        .collect()
}

/// One row of real values per parent.
fn real_matrix(parents: &[Solution], loci: &[usize]) -> Vec<Vec<f64>> {
    parents
        .iter()
        .map(|p| {
            loci.iter()
                .map(|&j| p.variable(j).as_real().unwrap_or(0.0))
                .collect()
        })
        .collect()
}

fn build_child(template: &Solution, loci: &[usize], values: &[f64]) -> Solution {
    let mut child = template.clone();
    for (&j, &value) in loci.iter().zip(values) {
        if !value.is_nan() {
            set_real(child.variable_mut(j), value);
        }
    }
    child
}

fn mean(rows: &[Vec<f64>]) -> Vec<f64> {
    let width = rows.first().map_or(0, Vec::len);
    let mut center = vec![0.0; width];
    for row in rows {
        for (c, v) in center.iter_mut().zip(row) {
            *c += v;
        }
    }
    let count = rows.len().max(1) as f64;
    center.iter_mut().for_each(|c| *c /= count);
    center
}

fn subtract(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn magnitude(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

fn is_zero(a: &[f64]) -> bool {
    a.iter().all(|x| x.abs() <= ZERO_EPS)
}

/// `a` rescaled to length `length`. `a` must not be zero.
fn with_length(a: &[f64], length: f64) -> Vec<f64> {
    let scale = length / magnitude(a);
    a.iter().map(|x| x * scale).collect()
}

fn add_scaled(target: &mut [f64], direction: &[f64], scale: f64) {
    for (t, d) in target.iter_mut().zip(direction) {
        *t += scale * d;
    }
}

/// Gram-Schmidt step: removes from `u` its projection onto each basis
/// vector. Zero basis vectors are skipped.
fn orthogonalize(mut u: Vec<f64>, basis: &[Vec<f64>]) -> Vec<f64> {
    for v in basis {
        let vv = dot(v, v);
        if vv > 0.0 {
            let scale = dot(&u, v) / vv;
            add_scaled(&mut u, v, -scale);
        }
    }
    u
}

fn gaussian(sd: f64, rng: &mut dyn RngCore) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    sd * z
}

/// Parent-Centric Crossover (PCX).
///
/// Each child is centered on one randomly chosen parent. It is perturbed
/// along that parent's direction from the centroid (scaled by `zeta`) and
/// along the orthogonalized directions of the other parents (scaled by `eta`
/// times their mean distance).
///
/// # Examples
///
/// ```
/// use u_moea::random::create_rng;
/// use u_moea::solution::{Solution, Variable};
/// use u_moea::variation::{Pcx, Variation};
///
/// let pcx = Pcx::new(3, 2).unwrap();
/// let parents: Vec<Solution> = [1.0, 2.0, 4.0]
///     .iter()
///     .map(|&x| Solution::new(vec![Variable::real(x, 0.0, 10.0); 2], 2, 0))
///     .collect();
/// let children = pcx.evolve(&parents, &mut create_rng(42)).unwrap();
/// assert_eq!(children.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Pcx {
    parents: usize,
    offspring: usize,
    eta: f64,
    zeta: f64,
}

impl Pcx {
    /// PCX with `eta = zeta = 0.1`.
    pub fn new(parents: usize, offspring: usize) -> Result<Self> {
        Self::with_spread(parents, offspring, 0.1, 0.1)
    }

    pub fn with_spread(parents: usize, offspring: usize, eta: f64, zeta: f64) -> Result<Self> {
        check_counts("pcx", parents, offspring)?;
        Ok(Self {
            parents,
            offspring,
            eta: check_non_negative("pcx", "eta", eta)?,
            zeta: check_non_negative("pcx", "zeta", zeta)?,
        })
    }

    pub fn parents(&self) -> usize {
        self.parents
    }

    pub fn offspring(&self) -> usize {
        self.offspring
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn zeta(&self) -> f64 {
        self.zeta
    }

    /// Child values centered on the parent at `order[last]`.
    fn recombine(
        &self,
        x: &[Vec<f64>],
        centroid: &[f64],
        order: &[usize],
        rng: &mut dyn RngCore,
    ) -> Vec<f64> {
        let last = order.len() - 1;
        let center = &x[order[last]];
        let primary = subtract(center, centroid);

        let mut basis = vec![primary.clone()];
        let mut spread = 0.0;
        for &i in &order[..last] {
            let d = subtract(&x[i], centroid);
            if is_zero(&d) {
                continue;
            }
            let e = orthogonalize(d, &basis);
            if !is_zero(&e) {
                let length = magnitude(&e);
                spread += length;
                basis.push(with_length(&e, 1.0));
            }
        }
        spread /= last as f64;

        let mut values = center.clone();
        add_scaled(&mut values, &primary, gaussian(self.zeta, rng));
        let step = gaussian(self.eta, rng) * spread;
        for e in &basis[1..] {
            add_scaled(&mut values, e, step);
        }
        values
    }
}

impl Variation for Pcx {
    fn name(&self) -> &str {
        "pcx"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Recombination {
            arity: self.parents,
        }
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), self.parents, parents)?;
        let loci = real_loci(parents);
        let x = real_matrix(parents, &loci);
        let centroid = mean(&x);

        // the center parent is swapped to the back; swaps accumulate
        let mut order: Vec<usize> = (0..parents.len()).collect();
        let last = order.len() - 1;
        let mut children = Vec::with_capacity(self.offspring);
        for _ in 0..self.offspring {
            let pick = rng.random_range(0..order.len());
            order.swap(pick, last);
            let values = self.recombine(&x, &centroid, &order, rng);
            children.push(build_child(&parents[order[last]], &loci, &values));
        }
        Ok(children)
    }
}

/// Unimodal Normal Distribution Crossover (UNDX).
///
/// Children are drawn from a normal distribution around the parents'
/// centroid. The primary search space is spanned by all but the last
/// parent (spread `zeta`). The orthogonal complement is scaled by the last
/// parent's distance from the centroid (spread `eta / sqrt(n)`). Children
/// are built from the last parent.
#[derive(Debug, Clone)]
pub struct Undx {
    parents: usize,
    offspring: usize,
    zeta: f64,
    eta: f64,
}

impl Undx {
    /// UNDX with `zeta = 0.5` and `eta = 0.35`.
    pub fn new(parents: usize, offspring: usize) -> Result<Self> {
        Self::with_spread(parents, offspring, 0.5, 0.35)
    }

    pub fn with_spread(parents: usize, offspring: usize, zeta: f64, eta: f64) -> Result<Self> {
        check_counts("undx", parents, offspring)?;
        Ok(Self {
            parents,
            offspring,
            zeta: check_non_negative("undx", "zeta", zeta)?,
            eta: check_non_negative("undx", "eta", eta)?,
        })
    }

    pub fn parents(&self) -> usize {
        self.parents
    }

    pub fn offspring(&self) -> usize {
        self.offspring
    }

    pub fn zeta(&self) -> f64 {
        self.zeta
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    fn recombine(&self, x: &[Vec<f64>], centroid: &[f64], rng: &mut dyn RngCore) -> Vec<f64> {
        let last = x.len() - 1;
        let n = centroid.len();

        let mut primary: Vec<Vec<f64>> = Vec::new();
        for row in &x[..last] {
            let d = subtract(row, centroid);
            if is_zero(&d) {
                continue;
            }
            let length = magnitude(&d);
            let e = orthogonalize(d, &primary);
            if !is_zero(&e) {
                primary.push(with_length(&e, length));
            }
        }

        let distance = magnitude(&subtract(&x[last], centroid));
        let mut secondary: Vec<Vec<f64>> = Vec::new();
        for _ in 0..n.saturating_sub(primary.len()) {
            let d: Vec<f64> = (0..n).map(|_| gaussian(1.0, rng)).collect();
            let e = orthogonalize(orthogonalize(d, &primary), &secondary);
            if !is_zero(&e) {
                secondary.push(with_length(&e, distance));
            }
        }

        let mut values = centroid.to_vec();
        for e in &primary {
            add_scaled(&mut values, e, gaussian(self.zeta, rng));
        }
        if !secondary.is_empty() {
            let sd = self.eta / (n as f64).sqrt();
            for e in &secondary {
                add_scaled(&mut values, e, gaussian(sd, rng));
            }
        }
        values
    }
}

impl Variation for Undx {
    fn name(&self) -> &str {
        "undx"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Recombination {
            arity: self.parents,
        }
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), self.parents, parents)?;
        let loci = real_loci(parents);
        let x = real_matrix(parents, &loci);
        let centroid = mean(&x);
        let template = &parents[parents.len() - 1];

        let mut children = Vec::with_capacity(self.offspring);
        for _ in 0..self.offspring {
            let values = self.recombine(&x, &centroid, rng);
            children.push(build_child(template, &loci, &values));
        }
        Ok(children)
    }
}

/// Simplex Crossover (SPX).
///
/// The parents' simplex is expanded by `epsilon` around its centroid and
/// each child is sampled uniformly inside it. Children are built from the
/// last parent.
#[derive(Debug, Clone)]
pub struct Spx {
    parents: usize,
    offspring: usize,
    epsilon: f64,
}

impl Spx {
    /// SPX with the recommended expansion `sqrt(parents + 1)`.
    pub fn new(parents: usize, offspring: usize) -> Result<Self> {
        Self::with_epsilon(parents, offspring, ((parents + 1) as f64).sqrt())
    }

    pub fn with_epsilon(parents: usize, offspring: usize, epsilon: f64) -> Result<Self> {
        check_counts("spx", parents, offspring)?;
        Ok(Self {
            parents,
            offspring,
            epsilon: check_non_negative("spx", "epsilon", epsilon)?,
        })
    }

    pub fn parents(&self) -> usize {
        self.parents
    }

    pub fn offspring(&self) -> usize {
        self.offspring
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Variation for Spx {
    fn name(&self) -> &str {
        "spx"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Recombination {
            arity: self.parents,
        }
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), self.parents, parents)?;
        let loci = real_loci(parents);
        let x = real_matrix(parents, &loci);
        let centroid = mean(&x);
        let vertices: Vec<Vec<f64>> = x
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&centroid)
                    .map(|(v, g)| g + self.epsilon * (v - g))
                    .collect()
            })
            .collect();

        let last = vertices.len() - 1;
        let template = &parents[last];
        let mut children = Vec::with_capacity(self.offspring);
        for _ in 0..self.offspring {
            let mut offset = vec![0.0; centroid.len()];
            for i in 1..=last {
                let r = next_f64(rng).powf(1.0 / i as f64);
                for (j, c) in offset.iter_mut().enumerate() {
                    *c = r * (vertices[i - 1][j] - vertices[i][j] + *c);
                }
            }
            let values: Vec<f64> = vertices[last]
                .iter()
                .zip(&offset)
                .map(|(v, c)| v + c)
                .collect();
            children.push(build_child(template, &loci, &values));
        }
        Ok(children)
    }
}

/// Differential evolution variation (DE/rand/1/bin), four parents to one
/// child.
///
/// The child starts as the first parent. Each real locus is replaced by
/// `p3 + step_size * (p1 - p2)` with probability `crossover_rate`, and one
/// randomly chosen locus is always replaced.
#[derive(Debug, Clone)]
pub struct DifferentialEvolution {
    crossover_rate: f64,
    step_size: f64,
}

impl DifferentialEvolution {
    pub fn new(crossover_rate: f64, step_size: f64) -> Result<Self> {
        Ok(Self {
            crossover_rate: check_probability("de", crossover_rate)?,
            step_size: check_non_negative("de", "stepSize", step_size)?,
        })
    }

    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }
}

impl Variation for DifferentialEvolution {
    fn name(&self) -> &str {
        "de"
    }

    fn kind(&self) -> VariationKind {
        VariationKind::Recombination { arity: 4 }
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        check_parents(self.name(), 4, parents)?;
        let loci = real_loci(parents);
        let mut child = parents[0].clone();
        if loci.is_empty() {
            return Ok(vec![child]);
        }

        let forced = rng.random_range(0..loci.len());
        for (k, &j) in loci.iter().enumerate() {
            if k == forced || chance(self.crossover_rate, rng) {
                let at = |p: usize| parents[p].variable(j).as_real().unwrap_or(0.0);
                let value = at(3) + self.step_size * (at(1) - at(2));
                set_real(child.variable_mut(j), value);
            }
        }
        Ok(vec![child])
    }
}

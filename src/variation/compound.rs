//! Compound variation: a pipeline of operators applied in sequence.

use super::types::{Variation, VariationKind};
use crate::error::{MoeaError, Result};
use crate::solution::Solution;
use log::warn;
use rand::RngCore;

/// Applies a sequence of operators to a batch of parents.
///
/// # Algorithm
///
/// Starting from `solutions = parents`, for each operator in order:
///
/// 1. A mutation is applied to every solution independently; the batch
///    size is unchanged.
/// 2. Any other operator requires `solutions.len() % arity == 0`. The batch
///    is cut into consecutive groups of `arity`, the operator is invoked once
///    per group, and the outputs are concatenated in group order.
///
/// A batch that cannot be partitioned fails with
/// [`MoeaError::ArityMismatch`] naming the operator; it is never padded or
/// truncated.
///
/// The pipeline's arity is the arity of its **first** operator, the one
/// that consumes the raw parents. Put crossovers before mutations.
///
/// # Examples
///
/// ```
/// use u_moea::random::create_rng;
/// use u_moea::solution::{Solution, Variable};
/// use u_moea::variation::{CompoundVariation, PolynomialMutation, Sbx, Variation};
///
/// let pipeline = CompoundVariation::new(vec![
///     Box::new(Sbx::new(1.0, 15.0).unwrap()),
///     Box::new(PolynomialMutation::new(0.5, 20.0).unwrap()),
/// ])
/// .unwrap();
/// assert_eq!(pipeline.name(), "sbx+pm");
/// assert_eq!(pipeline.arity(), 2);
///
/// let parent = Solution::new(vec![Variable::real(0.5, 0.0, 1.0)], 2, 0);
/// let parents = vec![parent.clone(), parent.clone(), parent.clone(), parent];
/// let children = pipeline.evolve(&parents, &mut create_rng(42)).unwrap();
/// assert_eq!(children.len(), 4);
/// ```
pub struct CompoundVariation {
    operators: Vec<Box<dyn Variation>>,
    name: String,
}

impl CompoundVariation {
    /// Builds a pipeline. Fails with [`MoeaError::NoOperators`] when
    /// `operators` is empty.
    pub fn new(operators: Vec<Box<dyn Variation>>) -> Result<Self> {
        if operators.is_empty() {
            return Err(MoeaError::NoOperators);
        }
        let name = operators
            .iter()
            .map(|op| op.name())
            .collect::<Vec<_>>()
            .join("+");
        Ok(Self { operators, name })
    }

    /// Overrides the generated `a+b+c` name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends an operator to the end of the pipeline.
    pub fn push(&mut self, operator: Box<dyn Variation>) {
        self.operators.push(operator);
    }

    pub fn operators(&self) -> &[Box<dyn Variation>] {
        &self.operators
    }

    /// `true` if any stage has the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.operators.iter().any(|op| op.name() == name)
    }
}

impl std::fmt::Debug for CompoundVariation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompoundVariation")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .finish()
    }
}

impl Variation for CompoundVariation {
    fn name(&self) -> &str {
        &self.name
    }

    /// A pipeline made only of mutations is itself a mutation.
    fn kind(&self) -> VariationKind {
        if self.operators.iter().all(|op| op.is_mutation()) {
            VariationKind::Mutation
        } else {
            VariationKind::Recombination {
                arity: self.operators[0].arity(),
            }
        }
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        let mut solutions = parents.to_vec();

        for operator in &self.operators {
            if operator.is_mutation() {
                let mut mutated = Vec::with_capacity(solutions.len());
                for solution in &solutions {
                    mutated.extend(operator.evolve(std::slice::from_ref(solution), rng)?);
                }
                solutions = mutated;
                continue;
            }

            let arity = operator.arity();
            if arity == 0 || solutions.len() % arity != 0 {
                warn!(
                    "pipeline '{}' cannot feed {} solutions to '{}' (arity {})",
                    self.name,
                    solutions.len(),
                    operator.name(),
                    arity
                );
                return Err(MoeaError::ArityMismatch {
                    operator: operator.name().to_string(),
                    arity,
                    batch: solutions.len(),
                });
            }

            let mut next = Vec::with_capacity(solutions.len());
            for group in solutions.chunks_exact(arity) {
                next.extend(operator.evolve(group, rng)?);
            }
            solutions = next;
        }

        Ok(solutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::variation::{PolynomialMutation, Sbx};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts invocations; `arity` parents in, `offspring` clones out.
    struct Counting {
        name: &'static str,
        kind: VariationKind,
        offspring: usize,
        calls: Arc<AtomicUsize>,
    }

    impl Variation for Counting {
        fn name(&self) -> &str {
            self.name
        }

        fn kind(&self) -> VariationKind {
            self.kind
        }

        fn evolve(&self, parents: &[Solution], _rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..self.offspring).map(|i| parents[i % parents.len()].clone()).collect())
        }
    }

    fn counting(
        name: &'static str,
        kind: VariationKind,
        offspring: usize,
    ) -> (Box<dyn Variation>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let op = Counting {
            name,
            kind,
            offspring,
            calls: Arc::clone(&calls),
        };
        (Box::new(op), calls)
    }

    fn batch(n: usize) -> Vec<Solution> {
        (0..n).map(|i| Solution::from_objectives(vec![i as f64])).collect()
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        assert_eq!(CompoundVariation::new(vec![]).unwrap_err(), MoeaError::NoOperators);
    }

    #[test]
    fn test_crossover_then_mutation_preserves_batch() {
        let (x, x_calls) = counting("x", VariationKind::Recombination { arity: 2 }, 2);
        let (m, m_calls) = counting("m", VariationKind::Mutation, 1);
        let pipeline = CompoundVariation::new(vec![x, m]).unwrap();

        let children = pipeline.evolve(&batch(4), &mut create_rng(42)).unwrap();
        assert_eq!(children.len(), 4);
        assert_eq!(x_calls.load(Ordering::SeqCst), 2);
        assert_eq!(m_calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_group_order_is_preserved() {
        let (x, _) = counting("x", VariationKind::Recombination { arity: 2 }, 2);
        let pipeline = CompoundVariation::new(vec![x]).unwrap();
        let parents = batch(6);
        let children = pipeline.evolve(&parents, &mut create_rng(42)).unwrap();
        assert_eq!(children, parents);
    }

    #[test]
    fn test_arity_mismatch_names_operator() {
        // 2 parents -> 3 children, which a 2-ary second stage cannot split
        let (grow, _) = counting("grow", VariationKind::Recombination { arity: 2 }, 3);
        let (pair, pair_calls) = counting("pair", VariationKind::Recombination { arity: 2 }, 2);
        let pipeline = CompoundVariation::new(vec![grow, pair]).unwrap();

        let err = pipeline.evolve(&batch(2), &mut create_rng(42)).unwrap_err();
        assert_eq!(
            err,
            MoeaError::ArityMismatch {
                operator: "pair".into(),
                arity: 2,
                batch: 3
            }
        );
        assert_eq!(pair_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_non_divisible_input_rejected() {
        let pipeline = CompoundVariation::new(vec![Box::new(Sbx::new(1.0, 15.0).unwrap())]).unwrap();
        let err = pipeline.evolve(&batch(3), &mut create_rng(42)).unwrap_err();
        assert!(matches!(err, MoeaError::ArityMismatch { ref operator, .. } if operator == "sbx"));
    }

    #[test]
    fn test_arity_and_kind() {
        let pipeline = CompoundVariation::new(vec![
            Box::new(Sbx::new(1.0, 15.0).unwrap()),
            Box::new(PolynomialMutation::new(0.1, 20.0).unwrap()),
        ])
        .unwrap();
        assert_eq!(pipeline.arity(), 2);
        assert!(!pipeline.is_mutation());
        assert!(pipeline.contains("pm"));

        let mutations = CompoundVariation::new(vec![
            Box::new(PolynomialMutation::new(0.1, 20.0).unwrap()),
            Box::new(PolynomialMutation::new(0.1, 20.0).unwrap()),
        ])
        .unwrap()
        .with_name("pm2");
        assert!(mutations.is_mutation());
        assert_eq!(mutations.arity(), 1);
        assert_eq!(mutations.name(), "pm2");
    }

    #[test]
    fn test_mutation_pipeline_accepts_any_batch() {
        let (m, calls) = counting("m", VariationKind::Mutation, 1);
        let pipeline = CompoundVariation::new(vec![m]).unwrap();
        let children = pipeline.evolve(&batch(5), &mut create_rng(42)).unwrap();
        assert_eq!(children.len(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }
}

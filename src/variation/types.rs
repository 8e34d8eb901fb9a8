//! Core trait definitions for variation operators.

use crate::error::{MoeaError, Result};
use crate::solution::Solution;
use rand::RngCore;

/// Capability of a variation operator.
///
/// The compound pipeline treats the two kinds differently: a mutation is
/// applied to every solution of a batch independently, a recombination
/// consumes the batch in groups of `arity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariationKind {
    /// One parent in, one child out.
    Mutation,
    /// `arity` parents in, any number of children out.
    Recombination { arity: usize },
}

impl VariationKind {
    /// Number of parents consumed per invocation.
    pub fn arity(self) -> usize {
        match self {
            VariationKind::Mutation => 1,
            VariationKind::Recombination { arity } => arity,
        }
    }
}

/// A variation operator: turns parents into children.
///
/// # Contract
///
/// - `evolve` receives exactly [`arity`](Variation::arity) parents and
///   fails with [`MoeaError::ParentCount`] otherwise.
/// - Parents are borrowed immutably; every child starts as a clone.
/// - Variable encodings the operator does not understand are skipped,
///   never rejected.
///
/// # Implementing
///
/// ```
/// use rand::RngCore;
/// use u_moea::error::Result;
/// use u_moea::solution::Solution;
/// use u_moea::variation::{Variation, VariationKind};
///
/// struct Identity;
///
/// impl Variation for Identity {
///     fn name(&self) -> &str { "identity" }
///     fn kind(&self) -> VariationKind { VariationKind::Mutation }
///     fn evolve(&self, parents: &[Solution], _rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
///         Ok(parents.to_vec())
///     }
/// }
/// ```
pub trait Variation: Send + Sync {
    /// Operator name; also the prefix of its configuration keys.
    fn name(&self) -> &str;

    fn kind(&self) -> VariationKind;

    fn arity(&self) -> usize {
        self.kind().arity()
    }

    fn is_mutation(&self) -> bool {
        self.kind() == VariationKind::Mutation
    }

    /// Produces children from `parents` without modifying them.
    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>>;
}

impl<V: Variation + ?Sized> Variation for Box<V> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn kind(&self) -> VariationKind {
        (**self).kind()
    }

    fn arity(&self) -> usize {
        (**self).arity()
    }

    fn is_mutation(&self) -> bool {
        (**self).is_mutation()
    }

    fn evolve(&self, parents: &[Solution], rng: &mut dyn RngCore) -> Result<Vec<Solution>> {
        (**self).evolve(parents, rng)
    }
}

/// Fails unless exactly `expected` parents were supplied.
pub(crate) fn check_parents(name: &str, expected: usize, parents: &[Solution]) -> Result<()> {
    if parents.len() != expected {
        return Err(MoeaError::ParentCount {
            operator: name.to_string(),
            expected,
            actual: parents.len(),
        });
    }
    Ok(())
}

/// Accepts probabilities in `[0, 1]`; rejects everything else, NaN included.
pub(crate) fn check_probability(name: &str, probability: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(MoeaError::InvalidProbability {
            operator: name.to_string(),
            value: probability,
        })
    }
}

/// Accepts finite, non-negative distribution indices.
pub(crate) fn check_distribution_index(name: &str, index: f64) -> Result<f64> {
    if index.is_finite() && index >= 0.0 {
        Ok(index)
    } else {
        Err(MoeaError::parameter(
            format!("{name}.distributionIndex"),
            format!("must be finite and non-negative, got {index}"),
        ))
    }
}

/// Clones a pair of parents for two-parent crossovers.
pub(crate) fn clone_pair(parents: &[Solution]) -> (Solution, Solution) {
    (parents[0].clone(), parents[1].clone())
}

//! Auto-adaptive multi-method variation.
//!
//! Keeps a portfolio of operators and picks one per call by roulette
//! wheel. Every `update_window` calls the selection probabilities are
//! recomputed from the archive: an operator whose children survive in the
//! archive is chosen more often.
//!
//! The archive is passed in on every call as a read-only slice. The
//! component never holds a reference to it, so the caller stays the only
//! owner of the archive.
//!
//! # References
//!
//! Vrugt & Robinson (2007), "Improved evolutionary optimization from
//! genetically adaptive multimethod search"
//! Hadka & Reed (2013), "Borg: An Auto-Adaptive Many-Objective
//! Evolutionary Computing Framework"

use super::types::Variation;
use crate::error::{MoeaError, Result};
use crate::random::next_f64;
use crate::solution::Solution;
use log::debug;
use rand::RngCore;

/// Default number of `evolve` calls between probability updates.
pub const DEFAULT_UPDATE_WINDOW: usize = 100;

/// Configuration for [`AdaptiveMultimethodVariation`].
///
/// # Examples
///
/// ```
/// use u_moea::variation::AdaptiveConfig;
///
/// let config = AdaptiveConfig::default().with_update_window(50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveConfig {
    /// Number of `evolve` calls between probability updates.
    pub update_window: usize,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            update_window: DEFAULT_UPDATE_WINDOW,
        }
    }
}

impl AdaptiveConfig {
    pub fn with_update_window(mut self, n: usize) -> Self {
        self.update_window = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.update_window == 0 {
            return Err("update_window must be positive".into());
        }
        Ok(())
    }
}

/// Selects one of several operators per call, with probabilities learned
/// from the operator tags of archive members.
///
/// # Probability update
///
/// `count[i] = 1 + |{s in archive : s.operator() == Some(i)}|` and
/// `p[i] = count[i] / sum(count)`. The `+1` prior keeps every operator
/// selectable.
///
/// # Examples
///
/// ```
/// use u_moea::random::create_rng;
/// use u_moea::solution::{Solution, Variable};
/// use u_moea::variation::{AdaptiveMultimethodVariation, Sbx, UniformMutation};
///
/// let mut amv = AdaptiveMultimethodVariation::new()
///     .with_operator(Box::new(Sbx::new(1.0, 15.0).unwrap()))
///     .with_operator(Box::new(UniformMutation::new(0.5).unwrap()));
/// assert_eq!(amv.arity().unwrap(), 2);
///
/// let parent = Solution::new(vec![Variable::real(0.5, 0.0, 1.0)], 2, 0);
/// let archive: Vec<Solution> = Vec::new();
/// let children = amv.evolve(&[parent.clone(), parent], &archive, &mut create_rng(1)).unwrap();
/// assert!(children.iter().all(|c| c.operator().is_some()));
/// ```
pub struct AdaptiveMultimethodVariation {
    operators: Vec<Box<dyn Variation>>,
    probabilities: Option<Vec<f64>>,
    calls_since_update: usize,
    update_window: usize,
}

impl Default for AdaptiveMultimethodVariation {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveMultimethodVariation {
    /// An empty portfolio with the default update window.
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
            probabilities: None,
            calls_since_update: 0,
            update_window: DEFAULT_UPDATE_WINDOW,
        }
    }

    /// An empty portfolio with a custom configuration.
    pub fn with_config(config: &AdaptiveConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|reason| MoeaError::parameter("update_window", reason))?;
        Ok(Self {
            update_window: config.update_window,
            ..Self::new()
        })
    }

    pub fn with_operator(mut self, operator: Box<dyn Variation>) -> Self {
        self.add_operator(operator);
        self
    }

    /// Adds an operator. Its index is its position in insertion order.
    ///
    /// Cached probabilities are discarded; they are rebuilt on next use.
    pub fn add_operator(&mut self, operator: Box<dyn Variation>) {
        self.operators.push(operator);
        self.probabilities = None;
    }

    pub fn number_of_operators(&self) -> usize {
        self.operators.len()
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn operator(&self, index: usize) -> &dyn Variation {
        self.operators[index].as_ref()
    }

    pub fn update_window(&self) -> usize {
        self.update_window
    }

    /// The probabilities currently in force, if they have been computed.
    pub fn probabilities(&self) -> Option<&[f64]> {
        self.probabilities.as_deref()
    }

    /// Probability of selecting operator `index`, computing the
    /// probabilities from `archive` first if they are unset.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn operator_probability(&mut self, index: usize, archive: &[Solution]) -> f64 {
        if self.probabilities.is_none() {
            self.calls_since_update = 0;
            self.probabilities = Some(self.compute_probabilities(archive));
        }
        self.probabilities.as_ref().map_or(0.0, |p| p[index])
    }

    /// Selection probabilities implied by the operator tags in `archive`.
    ///
    /// Tags pointing past the last operator are ignored.
    pub fn compute_probabilities(&self, archive: &[Solution]) -> Vec<f64> {
        let mut count = vec![1.0; self.operators.len()];
        for index in archive.iter().filter_map(Solution::operator) {
            if let Some(c) = count.get_mut(index) {
                *c += 1.0;
            }
        }
        let sum: f64 = count.iter().sum();
        count.iter().map(|c| c / sum).collect()
    }

    /// Picks an operator index by roulette wheel, refreshing the
    /// probabilities when the window has elapsed or none are set.
    pub fn select_operator(&mut self, archive: &[Solution], rng: &mut dyn RngCore) -> Result<usize> {
        if self.operators.is_empty() {
            return Err(MoeaError::NoOperators);
        }

        self.calls_since_update += 1;
        if self.calls_since_update >= self.update_window || self.probabilities.is_none() {
            self.calls_since_update = 0;
            let probabilities = self.compute_probabilities(archive);
            debug!(
                "operator probabilities updated from {} archive members: {:?}",
                archive.len(),
                probabilities
            );
            self.probabilities = Some(probabilities);
        }

        let probabilities = self.probabilities.as_deref().ok_or(MoeaError::SelectionExhausted)?;
        roulette_select(probabilities, next_f64(rng)).ok_or(MoeaError::SelectionExhausted)
    }

    /// Maximum arity over all operators; callers must supply that many
    /// parents so any operator can be chosen.
    pub fn arity(&self) -> Result<usize> {
        self.operators
            .iter()
            .map(|op| op.arity())
            .max()
            .ok_or(MoeaError::NoOperators)
    }

    /// Selects an operator, applies it to the first `arity` parents and tags
    /// each child with the operator's index.
    pub fn evolve(
        &mut self,
        parents: &[Solution],
        archive: &[Solution],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution>> {
        let index = self.select_operator(archive, rng)?;
        let operator = &self.operators[index];
        let arity = operator.arity();

        if parents.len() < arity {
            return Err(MoeaError::ParentCount {
                operator: operator.name().to_string(),
                expected: arity,
                actual: parents.len(),
            });
        }

        let mut children = operator.evolve(&parents[..arity], rng)?;
        for child in &mut children {
            child.set_operator(Some(index));
        }
        Ok(children)
    }
}

/// Returns the first index whose cumulative probability exceeds `roll`.
fn roulette_select(probabilities: &[f64], roll: f64) -> Option<usize> {
    let mut sum = 0.0;
    for (i, p) in probabilities.iter().enumerate() {
        sum += p;
        if sum > roll {
            return Some(i);
        }
    }
    None
}

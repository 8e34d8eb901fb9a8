//! Pareto archives.
//!
//! An archive keeps a set of mutually non-dominated solutions under
//! repeated insertion. [`Archive::add`] rejects a newcomer that is dominated
//! by (or duplicates) a member, and otherwise evicts every member the
//! newcomer dominates before inserting it.
//!
//! - [`NondominatedPopulation`]: generic over the
//!   [`DominanceComparator`](crate::dominance::DominanceComparator), with a
//!   configurable [`DuplicateMode`]
//! - [`EpsilonBoxDominanceArchive`]: at most one member per epsilon box,
//!   plus improvement counters for restart heuristics
//! - [`SharedArchive`]: a mutex-guarded handle for concurrent insertion
//!
//! # References
//!
//! - Laumanns et al. (2002), "Combining Convergence and Diversity in
//!   Evolutionary Multiobjective Optimization"
//! - Hadka & Reed (2013), "Borg: An Auto-Adaptive Many-Objective
//!   Evolutionary Computing Framework"

mod epsilon;
mod population;
mod shared;

pub use epsilon::EpsilonBoxDominanceArchive;
pub use population::NondominatedPopulation;
pub use shared::SharedArchive;

use crate::solution::{objective_distance, variable_distance, Solution};

/// Distance below which two solutions are duplicates.
pub const DUPLICATE_EPSILON: f64 = 1e-10;

/// How an archive treats non-dominated solutions that look alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuplicateMode {
    /// Objective vectors closer than [`DUPLICATE_EPSILON`] are duplicates.
    #[default]
    NoDuplicates,
    /// Equal objectives are allowed; solutions whose
    /// [`variable_distance`] is below [`DUPLICATE_EPSILON`] are duplicates.
    AllowDuplicateObjectives,
    /// Nothing is a duplicate.
    AllowDuplicates,
}

impl DuplicateMode {
    /// Whether `a` and `b` count as duplicates under this mode.
    pub fn is_duplicate(self, a: &Solution, b: &Solution) -> bool {
        match self {
            DuplicateMode::NoDuplicates => objective_distance(a, b) < DUPLICATE_EPSILON,
            DuplicateMode::AllowDuplicateObjectives => {
                a.number_of_variables() == b.number_of_variables()
                    && variable_distance(a, b) < DUPLICATE_EPSILON
            }
            DuplicateMode::AllowDuplicates => false,
        }
    }
}

/// Common interface of the archives.
///
/// The algorithm loop depends on this trait, so it can swap a plain
/// Pareto archive for an epsilon-box one.
pub trait Archive: Send {
    /// Inserts `solution` unless a member dominates or duplicates it.
    /// Returns `true` if the archive changed.
    fn add(&mut self, solution: Solution) -> bool;

    /// Members in insertion order.
    fn as_slice(&self) -> &[Solution];

    fn clear(&mut self);

    /// Sequential [`add`](Archive::add) in iteration order; returns the
    /// number of accepted solutions.
    fn add_all<I>(&mut self, solutions: I) -> usize
    where
        I: IntoIterator<Item = Solution>,
        Self: Sized,
    {
        let mut accepted = 0;
        for solution in solutions {
            if self.add(solution) {
                accepted += 1;
            }
        }
        accepted
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

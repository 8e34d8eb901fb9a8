//! Dominance comparators.
//!
//! All objectives are **minimized**. A comparator answers, for a pair of
//! solutions `(a, b)`, whether `a` dominates `b`, `b` dominates `a`, or
//! neither. Comparators are pure and reflexive: `compare(a, a)` is always
//! [`Dominance::NonDominated`].
//!
//! - [`ParetoComparator`]: plain Pareto dominance on objectives
//! - [`ConstrainedParetoComparator`]: constraint violation first, then Pareto
//! - [`EpsilonBoxComparator`]: dominance on an epsilon grid, with
//!   distance-to-corner tie breaking inside a box
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"
//! - Laumanns et al. (2002), "Combining Convergence and Diversity in
//!   Evolutionary Multiobjective Optimization"

mod epsilon;

pub use epsilon::{BoxComparison, EpsilonBoxComparator};

use crate::solution::Solution;
use std::cmp::Ordering;

/// Outcome of a dominance comparison of `a` against `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dominance {
    /// `a` dominates `b`.
    Dominates,
    /// `b` dominates `a`.
    Dominated,
    /// Neither dominates the other (incomparable or tied).
    NonDominated,
}

impl Dominance {
    /// Classic comparator encoding: `-1`, `+1` or `0`.
    pub fn as_i32(self) -> i32 {
        match self {
            Dominance::Dominates => -1,
            Dominance::Dominated => 1,
            Dominance::NonDominated => 0,
        }
    }

    /// The same relation seen from `b`'s side.
    pub fn reverse(self) -> Self {
        match self {
            Dominance::Dominates => Dominance::Dominated,
            Dominance::Dominated => Dominance::Dominates,
            Dominance::NonDominated => Dominance::NonDominated,
        }
    }

    fn from_ordering(ord: Ordering) -> Self {
        match ord {
            Ordering::Less => Dominance::Dominates,
            Ordering::Greater => Dominance::Dominated,
            Ordering::Equal => Dominance::NonDominated,
        }
    }
}

/// Compares two solutions for dominance.
///
/// Implementations must be side-effect free and consistent:
/// `compare(b, a) == compare(a, b).reverse()`.
pub trait DominanceComparator: Send + Sync {
    fn compare(&self, a: &Solution, b: &Solution) -> Dominance;
}

impl<C: DominanceComparator + ?Sized> DominanceComparator for Box<C> {
    fn compare(&self, a: &Solution, b: &Solution) -> Dominance {
        (**self).compare(a, b)
    }
}

/// Pareto dominance of two objective vectors (minimization).
///
/// `a` dominates `b` iff `a[i] <= b[i]` for every `i` and `a[i] < b[i]`
/// for at least one `i`.
///
/// # Example
///
/// ```
/// use u_moea::dominance::{pareto_dominance, Dominance};
///
/// assert_eq!(pareto_dominance(&[1.0, 1.0], &[1.0, 5.0]), Dominance::Dominates);
/// assert_eq!(pareto_dominance(&[1.0, 5.0], &[3.0, 2.0]), Dominance::NonDominated);
/// ```
pub fn pareto_dominance(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
        if a_better_in_some && b_better_in_some {
            return Dominance::NonDominated;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Dominates,
        (false, true) => Dominance::Dominated,
        _ => Dominance::NonDominated,
    }
}

/// Compares aggregate constraint violation; lower violation dominates.
pub(crate) fn constraint_dominance(a: &Solution, b: &Solution) -> Dominance {
    let va = a.aggregate_constraint_violation();
    let vb = b.aggregate_constraint_violation();
    Dominance::from_ordering(va.partial_cmp(&vb).unwrap_or(Ordering::Equal))
}

/// Pareto dominance on objectives only; constraints are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParetoComparator;

impl DominanceComparator for ParetoComparator {
    fn compare(&self, a: &Solution, b: &Solution) -> Dominance {
        pareto_dominance(a.objectives(), b.objectives())
    }
}

/// Feasibility-first Pareto dominance.
///
/// The solution with the lower aggregate constraint violation dominates;
/// equal violations fall through to [`pareto_dominance`] on the objectives.
/// This is the default comparator of
/// [`NondominatedPopulation`](crate::archive::NondominatedPopulation).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstrainedParetoComparator;

impl DominanceComparator for ConstrainedParetoComparator {
    fn compare(&self, a: &Solution, b: &Solution) -> Dominance {
        match constraint_dominance(a, b) {
            Dominance::NonDominated => pareto_dominance(a.objectives(), b.objectives()),
            decided => decided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pareto_dominance() {
        assert_eq!(pareto_dominance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), Dominance::NonDominated);
        assert_eq!(pareto_dominance(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), Dominance::NonDominated);
        assert_eq!(pareto_dominance(&[10.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), Dominance::Dominated);
        assert_eq!(pareto_dominance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 30.0]), Dominance::Dominates);
        assert_eq!(pareto_dominance(&[], &[]), Dominance::NonDominated);
    }

    #[test]
    fn test_encoding_and_reverse() {
        assert_eq!(Dominance::Dominates.as_i32(), -1);
        assert_eq!(Dominance::Dominated.as_i32(), 1);
        assert_eq!(Dominance::NonDominated.as_i32(), 0);
        assert_eq!(Dominance::Dominates.reverse(), Dominance::Dominated);
        assert_eq!(Dominance::NonDominated.reverse(), Dominance::NonDominated);
    }

    #[test]
    fn test_pareto_comparator_is_reflexive() {
        let a = Solution::from_objectives(vec![1.0, 5.0]);
        assert_eq!(ParetoComparator.compare(&a, &a), Dominance::NonDominated);
    }

    #[test]
    fn test_constraints_take_priority() {
        let feasible = Solution::from_objectives(vec![9.0, 9.0]).with_constraints(vec![0.0]);
        let infeasible = Solution::from_objectives(vec![0.0, 0.0]).with_constraints(vec![-1.0]);
        let cmp = ConstrainedParetoComparator;
        assert_eq!(cmp.compare(&feasible, &infeasible), Dominance::Dominates);
        assert_eq!(cmp.compare(&infeasible, &feasible), Dominance::Dominated);

        // ParetoComparator ignores constraints entirely
        assert_eq!(ParetoComparator.compare(&feasible, &infeasible), Dominance::Dominated);
    }

    #[test]
    fn test_equal_violation_falls_through() {
        let a = Solution::from_objectives(vec![1.0, 1.0]).with_constraints(vec![2.0]);
        let b = Solution::from_objectives(vec![2.0, 2.0]).with_constraints(vec![-2.0]);
        assert_eq!(ConstrainedParetoComparator.compare(&a, &b), Dominance::Dominates);
    }
}

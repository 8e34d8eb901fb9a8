//! Epsilon-box dominance.

use super::{constraint_dominance, Dominance, DominanceComparator};
use crate::error::{MoeaError, Result};
use crate::solution::Solution;

/// Result of [`EpsilonBoxComparator::compare_boxes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxComparison {
    pub dominance: Dominance,
    /// Both solutions fall into the same epsilon box.
    pub same_box: bool,
}

/// Dominance on a grid of epsilon boxes.
///
/// Objective `i` is discretized as `floor(f_i / eps_i)`. If the box of `a`
/// Pareto-dominates the box of `b`, `a` dominates `b`. If both solutions fall
/// into the same box, the one closer (Euclidean) to the box's lower corner
/// dominates; equal distances are [`Dominance::NonDominated`].
///
/// When fewer epsilons than objectives are given, the last epsilon is reused
/// for the remaining objectives. Aggregate constraint violation is compared
/// before the boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonBoxComparator {
    epsilons: Vec<f64>,
}

impl EpsilonBoxComparator {
    /// Builds a comparator from per-objective epsilons.
    ///
    /// Fails if `epsilons` is empty or any value is not finite and positive.
    pub fn new(epsilons: Vec<f64>) -> Result<Self> {
        if epsilons.is_empty() {
            return Err(MoeaError::parameter("epsilon", "at least one epsilon is required"));
        }
        if let Some(bad) = epsilons.iter().find(|e| !(e.is_finite() && **e > 0.0)) {
            return Err(MoeaError::parameter(
                "epsilon",
                format!("epsilons must be finite and positive, got {bad}"),
            ));
        }
        Ok(Self { epsilons })
    }

    /// The same epsilon for every objective.
    pub fn uniform(epsilon: f64) -> Result<Self> {
        Self::new(vec![epsilon])
    }

    /// Epsilon used for `objective`.
    pub fn epsilon(&self, objective: usize) -> f64 {
        self.epsilons[objective.min(self.epsilons.len() - 1)]
    }

    pub fn epsilons(&self) -> &[f64] {
        &self.epsilons
    }

    /// Box index of `value` along `objective`.
    pub fn box_index(&self, objective: usize, value: f64) -> f64 {
        (value / self.epsilon(objective)).floor()
    }

    /// Squared distance from the objective vector to its box's lower corner.
    fn corner_distance(&self, solution: &Solution) -> f64 {
        solution
            .objectives()
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let eps = self.epsilon(i);
                (f - self.box_index(i, f) * eps).powi(2)
            })
            .sum()
    }

    /// Compares `a` against `b`, also reporting whether they share a box.
    pub fn compare_boxes(&self, a: &Solution, b: &Solution) -> BoxComparison {
        match constraint_dominance(a, b) {
            Dominance::NonDominated => {}
            decided => {
                return BoxComparison {
                    dominance: decided,
                    same_box: false,
                }
            }
        }

        let mut a_better = false;
        let mut b_better = false;

        for (i, (&fa, &fb)) in a.objectives().iter().zip(b.objectives()).enumerate() {
            let ia = self.box_index(i, fa);
            let ib = self.box_index(i, fb);
            if ia < ib {
                a_better = true;
            } else if ib < ia {
                b_better = true;
            }
            if a_better && b_better {
                return BoxComparison {
                    dominance: Dominance::NonDominated,
                    same_box: false,
                };
            }
        }

        let dominance = match (a_better, b_better) {
            (true, _) => Dominance::Dominates,
            (_, true) => Dominance::Dominated,
            _ => {
                let da = self.corner_distance(a);
                let db = self.corner_distance(b);
                let dominance = if da < db {
                    Dominance::Dominates
                } else if db < da {
                    Dominance::Dominated
                } else {
                    Dominance::NonDominated
                };
                return BoxComparison {
                    dominance,
                    same_box: true,
                };
            }
        };

        BoxComparison {
            dominance,
            same_box: false,
        }
    }
}

impl DominanceComparator for EpsilonBoxComparator {
    fn compare(&self, a: &Solution, b: &Solution) -> Dominance {
        self.compare_boxes(a, b).dominance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(objectives: &[f64]) -> Solution {
        Solution::from_objectives(objectives.to_vec())
    }

    #[test]
    fn test_rejects_bad_epsilons() {
        assert!(EpsilonBoxComparator::new(vec![]).is_err());
        assert!(EpsilonBoxComparator::new(vec![0.1, 0.0]).is_err());
        assert!(EpsilonBoxComparator::new(vec![-1.0]).is_err());
        assert!(EpsilonBoxComparator::uniform(f64::NAN).is_err());
        assert!(EpsilonBoxComparator::uniform(0.5).is_ok());
    }

    #[test]
    fn test_last_epsilon_repeats() {
        let cmp = EpsilonBoxComparator::new(vec![0.1, 0.5]).unwrap();
        assert_eq!(cmp.epsilon(0), 0.1);
        assert_eq!(cmp.epsilon(1), 0.5);
        assert_eq!(cmp.epsilon(7), 0.5);
    }

    #[test]
    fn test_box_level_dominance() {
        let cmp = EpsilonBoxComparator::uniform(1.0).unwrap();
        let r = cmp.compare_boxes(&s(&[0.5, 0.5]), &s(&[1.5, 0.9]));
        assert_eq!(r.dominance, Dominance::Dominates);
        assert!(!r.same_box);

        let r = cmp.compare_boxes(&s(&[0.5, 2.5]), &s(&[2.5, 0.5]));
        assert_eq!(r.dominance, Dominance::NonDominated);
        assert!(!r.same_box);
    }

    #[test]
    fn test_same_box_prefers_corner() {
        let cmp = EpsilonBoxComparator::uniform(1.0).unwrap();
        let near = s(&[0.1, 0.1]);
        let far = s(&[0.9, 0.05]);
        let r = cmp.compare_boxes(&near, &far);
        assert!(r.same_box);
        assert_eq!(r.dominance, Dominance::Dominates);
        assert_eq!(cmp.compare(&far, &near), Dominance::Dominated);
    }

    #[test]
    fn test_reflexive() {
        let cmp = EpsilonBoxComparator::uniform(0.25).unwrap();
        let a = s(&[0.3, 0.7]);
        let r = cmp.compare_boxes(&a, &a);
        assert!(r.same_box);
        assert_eq!(r.dominance, Dominance::NonDominated);
    }

    #[test]
    fn test_constraints_before_boxes() {
        let cmp = EpsilonBoxComparator::uniform(1.0).unwrap();
        let feasible = s(&[5.0, 5.0]).with_constraints(vec![0.0]);
        let infeasible = s(&[0.0, 0.0]).with_constraints(vec![1.0]);
        let r = cmp.compare_boxes(&feasible, &infeasible);
        assert_eq!(r.dominance, Dominance::Dominates);
        assert!(!r.same_box);
    }
}

//! Non-dominated population.

use super::{Archive, DuplicateMode};
use crate::dominance::{ConstrainedParetoComparator, Dominance, DominanceComparator};
use crate::solution::Solution;
use log::trace;

/// A population that only ever holds mutually non-dominated solutions.
///
/// # Algorithm
///
/// `add(s)` compares `s` against every member:
///
/// 1. If a member dominates `s`, or `s` duplicates a non-dominated member
///    under the [`DuplicateMode`], `s` is rejected and the population is
///    unchanged.
/// 2. Otherwise every member dominated by `s` is removed and `s` is
///    appended.
///
/// Members keep their insertion order.
///
/// # Complexity
/// O(n · m) per insertion for `n` members and `m` objectives.
///
/// # Examples
///
/// ```
/// use u_moea::archive::NondominatedPopulation;
/// use u_moea::solution::Solution;
///
/// let mut archive = NondominatedPopulation::new();
/// archive.add(Solution::from_objectives(vec![1.0, 5.0]));
/// archive.add(Solution::from_objectives(vec![3.0, 2.0]));
/// assert_eq!(archive.len(), 2);
///
/// assert!(archive.add(Solution::from_objectives(vec![1.0, 1.0])));
/// assert_eq!(archive.len(), 1);
/// assert_eq!(archive[0].objectives(), &[1.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct NondominatedPopulation<C = ConstrainedParetoComparator> {
    members: Vec<Solution>,
    comparator: C,
    duplicate_mode: DuplicateMode,
}

impl NondominatedPopulation {
    /// Empty population under feasibility-first Pareto dominance.
    pub fn new() -> Self {
        Self::with_comparator(ConstrainedParetoComparator)
    }
}

impl Default for NondominatedPopulation {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DominanceComparator> NondominatedPopulation<C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            members: Vec::new(),
            comparator,
            duplicate_mode: DuplicateMode::default(),
        }
    }

    pub fn with_duplicate_mode(mut self, mode: DuplicateMode) -> Self {
        self.duplicate_mode = mode;
        self
    }

    /// Seeds the population by adding `solutions` in order.
    pub fn with_solutions<I: IntoIterator<Item = Solution>>(mut self, solutions: I) -> Self {
        self.add_all(solutions);
        self
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn duplicate_mode(&self) -> DuplicateMode {
        self.duplicate_mode
    }

    /// Inserts `solution` unless a member dominates or duplicates it.
    ///
    /// Returns `true` if the population changed.
    pub fn add(&mut self, solution: Solution) -> bool {
        let mut dominated = Vec::new();

        for (i, member) in self.members.iter().enumerate() {
            match self.comparator.compare(&solution, member) {
                Dominance::Dominates => dominated.push(i),
                Dominance::Dominated => return false,
                Dominance::NonDominated => {
                    if self.duplicate_mode.is_duplicate(&solution, member) {
                        return false;
                    }
                }
            }
        }

        if !dominated.is_empty() {
            trace!(
                "evicting {} of {} members dominated by {:?}",
                dominated.len(),
                self.members.len(),
                solution.objectives()
            );
            let mut next = 0;
            let mut index = 0;
            self.members.retain(|_| {
                let evict = dominated.get(next) == Some(&index);
                if evict {
                    next += 1;
                }
                index += 1;
                !evict
            });
        }

        self.members.push(solution);
        true
    }

    /// Adds each solution in order; returns how many were accepted.
    pub fn add_all<I: IntoIterator<Item = Solution>>(&mut self, solutions: I) -> usize {
        let mut accepted = 0;
        for solution in solutions {
            if self.add(solution) {
                accepted += 1;
            }
        }
        accepted
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Solution> {
        self.members.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Solution> {
        self.members.iter()
    }

    pub fn as_slice(&self) -> &[Solution] {
        &self.members
    }

    /// `true` if a member is value-equal to `solution`.
    pub fn contains(&self, solution: &Solution) -> bool {
        self.members.contains(solution)
    }

    /// Removes and returns the member at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Solution {
        self.members.remove(index)
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn into_vec(self) -> Vec<Solution> {
        self.members
    }
}

impl<C: DominanceComparator> Archive for NondominatedPopulation<C> {
    fn add(&mut self, solution: Solution) -> bool {
        NondominatedPopulation::add(self, solution)
    }

    fn as_slice(&self) -> &[Solution] {
        &self.members
    }

    fn clear(&mut self) {
        self.members.clear();
    }
}

impl<C> std::ops::Index<usize> for NondominatedPopulation<C> {
    type Output = Solution;

    fn index(&self, index: usize) -> &Solution {
        &self.members[index]
    }
}

impl FromIterator<Solution> for NondominatedPopulation {
    fn from_iter<I: IntoIterator<Item = Solution>>(iter: I) -> Self {
        Self::new().with_solutions(iter)
    }
}

impl<C: DominanceComparator> Extend<Solution> for NondominatedPopulation<C> {
    fn extend<I: IntoIterator<Item = Solution>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<C> IntoIterator for NondominatedPopulation<C> {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a, C> IntoIterator for &'a NondominatedPopulation<C> {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dominance::ParetoComparator;
    use crate::solution::Variable;

    fn s(objectives: &[f64]) -> Solution {
        Solution::from_objectives(objectives.to_vec())
    }

    fn assert_mutually_nondominated<C: DominanceComparator>(archive: &NondominatedPopulation<C>) {
        for a in archive {
            for b in archive {
                assert_ne!(archive.comparator().compare(a, b), Dominance::Dominates);
            }
        }
    }

    #[test]
    fn test_dominating_newcomer_evicts_all() {
        let mut archive = NondominatedPopulation::new();
        assert!(archive.add(s(&[1.0, 5.0])));
        assert!(archive.add(s(&[3.0, 2.0])));
        assert!(archive.add(s(&[1.0, 1.0])));
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0], s(&[1.0, 1.0]));
    }

    #[test]
    fn test_dominated_newcomer_rejected() {
        let mut archive: NondominatedPopulation = [s(&[1.0, 1.0])].into_iter().collect();
        assert!(!archive.add(s(&[2.0, 2.0])));
        assert!(!archive.add(s(&[1.0, 2.0])));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_partial_eviction_keeps_order() {
        let mut archive = NondominatedPopulation::new();
        archive.add_all(vec![s(&[0.0, 9.0]), s(&[4.0, 4.0]), s(&[5.0, 3.0]), s(&[9.0, 0.0])]);
        assert_eq!(archive.len(), 4);

        assert!(archive.add(s(&[3.0, 3.0])));
        let objectives: Vec<&[f64]> = archive.iter().map(Solution::objectives).collect();
        assert_eq!(objectives, vec![&[0.0, 9.0][..], &[9.0, 0.0][..], &[3.0, 3.0][..]]);
        assert_mutually_nondominated(&archive);
    }

    #[test]
    fn test_readding_member_is_noop() {
        let mut archive = NondominatedPopulation::new();
        archive.add(s(&[1.0, 5.0]));
        archive.add(s(&[3.0, 2.0]));
        let before = archive.as_slice().to_vec();
        assert!(!archive.add(s(&[3.0, 2.0])));
        assert_eq!(archive.as_slice(), &before[..]);
        assert!(archive.contains(&s(&[3.0, 2.0])));
    }

    #[test]
    fn test_allow_duplicates() {
        let mut archive = NondominatedPopulation::with_comparator(ParetoComparator)
            .with_duplicate_mode(DuplicateMode::AllowDuplicates);
        assert!(archive.add(s(&[1.0, 1.0])));
        assert!(archive.add(s(&[1.0, 1.0])));
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_allow_duplicate_objectives() {
        let mut archive = NondominatedPopulation::new()
            .with_duplicate_mode(DuplicateMode::AllowDuplicateObjectives);
        let mut a = Solution::new(vec![Variable::real(0.2, 0.0, 1.0)], 2, 0);
        a.set_objectives(&[1.0, 1.0]).unwrap();
        let mut b = Solution::new(vec![Variable::real(0.4, 0.0, 1.0)], 2, 0);
        b.set_objectives(&[1.0, 1.0]).unwrap();

        assert!(archive.add(a.clone()));
        assert!(archive.add(b));
        assert!(!archive.add(a));
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_allow_duplicate_objectives_rejects_near_equal_variables() {
        let mut archive = NondominatedPopulation::new()
            .with_duplicate_mode(DuplicateMode::AllowDuplicateObjectives);
        let mut a = Solution::new(vec![Variable::real(0.5, 0.0, 1.0)], 2, 0);
        a.set_objectives(&[1.0, 1.0]).unwrap();
        let mut b = Solution::new(vec![Variable::real(0.5 + 1e-12, 0.0, 1.0)], 2, 0);
        b.set_objectives(&[1.0, 1.0]).unwrap();

        assert!(archive.add(a));
        assert!(!archive.add(b));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_feasible_beats_infeasible() {
        let mut archive = NondominatedPopulation::new();
        assert!(archive.add(s(&[0.0, 0.0]).with_constraints(vec![2.0])));
        assert!(archive.add(s(&[5.0, 5.0]).with_constraints(vec![0.0])));
        assert_eq!(archive.len(), 1);
        assert!(!archive.add(s(&[-1.0, -1.0]).with_constraints(vec![0.5])));
    }

    #[test]
    fn test_add_all_counts_and_extend() {
        let mut archive = NondominatedPopulation::new();
        let accepted = archive.add_all(vec![s(&[2.0, 2.0]), s(&[1.0, 3.0]), s(&[3.0, 3.0]), s(&[2.0, 2.0])]);
        assert_eq!(accepted, 2);

        archive.extend(vec![s(&[0.0, 0.0])]);
        assert_eq!(archive.clone().into_vec(), vec![s(&[0.0, 0.0])]);

        archive.clear();
        assert!(archive.is_empty());
        assert!(archive.get(0).is_none());
    }
}

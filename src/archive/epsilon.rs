//! Epsilon-box dominance archive.

use super::Archive;
use crate::dominance::{Dominance, EpsilonBoxComparator};
use crate::error::Result;
use crate::solution::Solution;
use log::trace;

/// Archive holding at most one solution per epsilon box.
///
/// Insertion follows the non-dominated population rules at box
/// granularity, with [`EpsilonBoxComparator`] deciding dominance. Inside a
/// shared box the member closer to the box's lower corner stays; on an
/// exact distance tie the incumbent is kept.
///
/// Two counters track progress:
///
/// - *improvements*: accepted solutions that landed in a box no member
///   occupied before
/// - *dominating improvements*: improvements that also evicted a member
///   from another box
///
/// A search that stops producing improvements has stagnated.
///
/// # Examples
///
/// ```
/// use u_moea::archive::EpsilonBoxDominanceArchive;
/// use u_moea::solution::Solution;
///
/// let mut archive = EpsilonBoxDominanceArchive::new(vec![0.5]).unwrap();
/// assert!(archive.add(Solution::from_objectives(vec![0.4, 0.4])));
/// // same box, closer to the corner: replaces without counting as improvement
/// assert!(archive.add(Solution::from_objectives(vec![0.1, 0.1])));
/// assert_eq!(archive.len(), 1);
/// assert_eq!(archive.number_of_improvements(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EpsilonBoxDominanceArchive {
    members: Vec<Solution>,
    comparator: EpsilonBoxComparator,
    improvements: usize,
    dominating_improvements: usize,
}

impl EpsilonBoxDominanceArchive {
    /// Empty archive with per-objective `epsilons`.
    pub fn new(epsilons: Vec<f64>) -> Result<Self> {
        Ok(Self::with_comparator(EpsilonBoxComparator::new(epsilons)?))
    }

    pub fn with_comparator(comparator: EpsilonBoxComparator) -> Self {
        Self {
            members: Vec::new(),
            comparator,
            improvements: 0,
            dominating_improvements: 0,
        }
    }

    /// Seeds the archive by adding `solutions` in order.
    pub fn with_solutions<I: IntoIterator<Item = Solution>>(mut self, solutions: I) -> Self {
        self.add_all(solutions);
        self
    }

    pub fn comparator(&self) -> &EpsilonBoxComparator {
        &self.comparator
    }

    pub fn epsilons(&self) -> &[f64] {
        self.comparator.epsilons()
    }

    pub fn number_of_improvements(&self) -> usize {
        self.improvements
    }

    pub fn number_of_dominating_improvements(&self) -> usize {
        self.dominating_improvements
    }

    /// Inserts `solution` unless a member's box dominates it or a member
    /// already holds its box at least as well.
    pub fn add(&mut self, solution: Solution) -> bool {
        let mut evicted = Vec::new();
        let mut same_box = false;
        let mut dominates = false;

        for (i, member) in self.members.iter().enumerate() {
            let cmp = self.comparator.compare_boxes(&solution, member);
            match cmp.dominance {
                Dominance::Dominates => {
                    if cmp.same_box {
                        same_box = true;
                    } else {
                        dominates = true;
                    }
                    evicted.push(i);
                }
                Dominance::Dominated => return false,
                Dominance::NonDominated if cmp.same_box => return false,
                Dominance::NonDominated => {}
            }
        }

        if !evicted.is_empty() {
            trace!(
                "evicting {} of {} members (same box: {}) for {:?}",
                evicted.len(),
                self.members.len(),
                same_box,
                solution.objectives()
            );
            let mut next = 0;
            let mut index = 0;
            self.members.retain(|_| {
                let evict = evicted.get(next) == Some(&index);
                if evict {
                    next += 1;
                }
                index += 1;
                !evict
            });
        }

        if !same_box {
            self.improvements += 1;
            if dominates {
                self.dominating_improvements += 1;
            }
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

    /// Removes all members. Improvement counters are kept.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn into_vec(self) -> Vec<Solution> {
        self.members
    }
}

impl Archive for EpsilonBoxDominanceArchive {
    fn add(&mut self, solution: Solution) -> bool {
        EpsilonBoxDominanceArchive::add(self, solution)
    }

    fn as_slice(&self) -> &[Solution] {
        &self.members
    }

    fn clear(&mut self) {
        self.members.clear();
    }
}

impl std::ops::Index<usize> for EpsilonBoxDominanceArchive {
    type Output = Solution;

    fn index(&self, index: usize) -> &Solution {
        &self.members[index]
    }
}

impl Extend<Solution> for EpsilonBoxDominanceArchive {
    fn extend<I: IntoIterator<Item = Solution>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl IntoIterator for EpsilonBoxDominanceArchive {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a EpsilonBoxDominanceArchive {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

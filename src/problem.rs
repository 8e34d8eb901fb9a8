//! Problem contract consumed by the variation and archive layers.
//!
//! A [`Problem`] produces solution templates and evaluates candidates.
//! Everything else (search loop, termination) belongs to the caller.

use crate::solution::Solution;
use rand::RngCore;

/// A multi-objective optimization problem.
///
/// # Thread Safety
///
/// `Problem` must be `Send + Sync` because [`evaluate_all`] may evaluate
/// solutions in parallel using rayon.
///
/// # Examples
///
/// ```
/// use rand::RngCore;
/// use u_moea::problem::{initial_population, Problem};
/// use u_moea::random::create_rng;
/// use u_moea::solution::{Solution, Variable};
///
/// /// Schaffer's problem: minimize x² and (x - 2)².
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 2 }
///
///     fn new_solution(&self) -> Solution {
///         Solution::new(vec![Variable::real(0.0, -10.0, 10.0)], 2, 0)
///     }
///
///     fn evaluate(&self, solution: &mut Solution) {
///         let x = solution.variable(0).as_real().unwrap();
///         solution.set_objective(0, x * x);
///         solution.set_objective(1, (x - 2.0).powi(2));
///     }
/// }
///
/// let population = initial_population(&Schaffer, 10, &mut create_rng(42));
/// assert_eq!(population.len(), 10);
/// ```
pub trait Problem: Send + Sync {
    fn number_of_variables(&self) -> usize;

    fn number_of_objectives(&self) -> usize;

    fn number_of_constraints(&self) -> usize {
        0
    }

    /// A solution template with correctly bounded variables.
    ///
    /// Values need not be random; [`initial_population`] randomizes them.
    fn new_solution(&self) -> Solution;

    /// Computes the objectives and constraints of `solution` in place.
    fn evaluate(&self, solution: &mut Solution);
}

/// Builds `size` templates with every variable randomized.
///
/// Solutions are not evaluated.
pub fn initial_population<P: Problem + ?Sized>(
    problem: &P,
    size: usize,
    rng: &mut dyn RngCore,
) -> Vec<Solution> {
    (0..size)
        .map(|_| {
            let mut solution = problem.new_solution();
            for variable in solution.variables_mut() {
                variable.randomize(rng);
            }
            solution
        })
        .collect()
}

/// Evaluates every solution in place.
///
/// With the `parallel` feature and `parallel == true` the work is spread
/// over the rayon thread pool; otherwise it runs sequentially.
pub fn evaluate_all<P: Problem + ?Sized>(problem: &P, solutions: &mut [Solution], parallel: bool) {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if parallel {
            solutions.par_iter_mut().for_each(|s| problem.evaluate(s));
            return;
        }
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for solution in solutions.iter_mut() {
        problem.evaluate(solution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::solution::Variable;

    struct Schaffer;

    impl Problem for Schaffer {
        fn number_of_variables(&self) -> usize {
            1
        }

        fn number_of_objectives(&self) -> usize {
            2
        }

        fn new_solution(&self) -> Solution {
            Solution::new(vec![Variable::real(0.0, -10.0, 10.0)], 2, 0)
        }

        fn evaluate(&self, solution: &mut Solution) {
            let x = solution.variable(0).as_real().unwrap_or(0.0);
            solution.set_objective(0, x * x);
            solution.set_objective(1, (x - 2.0).powi(2));
        }
    }

    #[test]
    fn test_initial_population_randomized() {
        let mut rng = create_rng(42);
        let population = initial_population(&Schaffer, 20, &mut rng);
        assert_eq!(population.len(), 20);
        let distinct = population
            .iter()
            .filter(|s| s.variable(0).as_real() != Some(0.0))
            .count();
        assert!(distinct > 0);
        for s in &population {
            let x = s.variable(0).as_real().unwrap();
            assert!((-10.0..=10.0).contains(&x));
        }
    }

    #[test]
    fn test_evaluate_all_both_modes() {
        let mut rng = create_rng(42);
        for parallel in [false, true] {
            let mut population = initial_population(&Schaffer, 16, &mut rng);
            evaluate_all(&Schaffer, &mut population, parallel);
            for s in &population {
                let x = s.variable(0).as_real().unwrap();
                assert!((s.objective(0) - x * x).abs() < 1e-12);
                assert!((s.objective(1) - (x - 2.0).powi(2)).abs() < 1e-12);
            }
        }
    }
}

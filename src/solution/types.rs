//! The [`Solution`] record.

use super::variable::Variable;
use crate::error::{MoeaError, Result};

/// A candidate solution: decision variables, objective values (minimized)
/// and constraint values (zero means satisfied).
///
/// The number of variables, objectives and constraints is fixed when the
/// solution is built. Mutable access goes through slices or shape-checked
/// setters, so a solution can never change shape after construction.
///
/// Operators never modify a parent; they [`clone`](Clone::clone) it and
/// modify the copy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    variables: Vec<Variable>,
    objectives: Vec<f64>,
    constraints: Vec<f64>,
    operator: Option<usize>,
}

impl Solution {
    /// Builds a solution with the given variables and zeroed objectives
    /// and constraints.
    pub fn new(
        variables: Vec<Variable>,
        number_of_objectives: usize,
        number_of_constraints: usize,
    ) -> Self {
        Self {
            variables,
            objectives: vec![0.0; number_of_objectives],
            constraints: vec![0.0; number_of_constraints],
            operator: None,
        }
    }

    /// Builds a variable-free solution holding only objective values.
    ///
    /// Handy for archives fed from result files and for tests.
    pub fn from_objectives(objectives: Vec<f64>) -> Self {
        Self {
            variables: Vec::new(),
            objectives,
            constraints: Vec::new(),
            operator: None,
        }
    }

    /// Attaches constraint values to a solution built by
    /// [`from_objectives`](Self::from_objectives) or [`new`](Self::new).
    pub fn with_constraints(mut self, constraints: Vec<f64>) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    pub fn number_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Mutable view of the variables. The slice cannot grow or shrink.
    pub fn variables_mut(&mut self) -> &mut [Variable] {
        &mut self.variables
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn variable(&self, index: usize) -> &Variable {
        &self.variables[index]
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn variable_mut(&mut self, index: usize) -> &mut Variable {
        &mut self.variables[index]
    }

    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn objective(&self, index: usize) -> f64 {
        self.objectives[index]
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set_objective(&mut self, index: usize, value: f64) {
        self.objectives[index] = value;
    }

    /// Overwrites all objective values; the count must match.
    pub fn set_objectives(&mut self, values: &[f64]) -> Result<()> {
        copy_same_shape("objectives", &mut self.objectives, values)
    }

    pub fn constraints(&self) -> &[f64] {
        &self.constraints
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn constraint(&self, index: usize) -> f64 {
        self.constraints[index]
    }

    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set_constraint(&mut self, index: usize, value: f64) {
        self.constraints[index] = value;
    }

    /// Overwrites all constraint values; the count must match.
    pub fn set_constraints(&mut self, values: &[f64]) -> Result<()> {
        copy_same_shape("constraints", &mut self.constraints, values)
    }

    /// Index of the adaptive operator that produced this solution, if any.
    pub fn operator(&self) -> Option<usize> {
        self.operator
    }

    pub fn set_operator(&mut self, operator: Option<usize>) {
        self.operator = operator;
    }

    /// `true` if any constraint value is non-zero.
    pub fn violates_constraints(&self) -> bool {
        self.constraints.iter().any(|&c| c != 0.0)
    }

    /// Sum of the absolute values of all constraint values.
    pub fn aggregate_constraint_violation(&self) -> f64 {
        self.constraints.iter().map(|c| c.abs()).sum()
    }
}

fn copy_same_shape(what: &'static str, target: &mut [f64], values: &[f64]) -> Result<()> {
    if target.len() != values.len() {
        return Err(MoeaError::ShapeMismatch {
            what,
            expected: target.len(),
            actual: values.len(),
        });
    }
    target.copy_from_slice(values);
    Ok(())
}

/// Euclidean distance between the objective vectors of `a` and `b`.
pub fn objective_distance(a: &Solution, b: &Solution) -> f64 {
    a.objectives()
        .iter()
        .zip(b.objectives())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Summed per-variable distance between `a` and `b`
/// (see [`Variable::distance`]).
pub fn variable_distance(a: &Solution, b: &Solution) -> f64 {
    a.variables()
        .iter()
        .zip(b.variables())
        .map(|(x, y)| x.distance(y))
        .sum()
}

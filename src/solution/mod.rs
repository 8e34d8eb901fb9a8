//! Solution value model.
//!
//! A [`Solution`] holds an ordered list of heterogeneous decision
//! [`Variable`]s, objective values (all minimized) and constraint values.
//! Its shape is fixed at construction; copies are plain [`Clone`]s and
//! equality is by value.
//!
//! Provenance is a first-class optional field: the adaptive multi-method
//! operator records the index of the operator that produced each child in
//! [`Solution::operator`].

mod types;
mod variable;

pub use types::{objective_distance, variable_distance, Solution};
pub use variable::{Variable, VariableKind};

//! Decision variable encodings.

use rand::{Rng, RngCore};

/// Encoding family of a [`Variable`], used for operator hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableKind {
    Real,
    Integer,
    Binary,
    Permutation,
    Subset,
}

/// A single decision variable.
///
/// Operators inspect the variant at each locus and skip the ones they do
/// not understand, so one solution may mix encodings freely.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variable {
    /// Bounded real value.
    Real {
        value: f64,
        lower_bound: f64,
        upper_bound: f64,
    },

    /// Bounded integer value.
    Integer {
        value: i64,
        lower_bound: i64,
        upper_bound: i64,
    },

    /// Fixed-length bit string.
    Binary(Vec<bool>),

    /// Permutation of `0..n`.
    Permutation(Vec<usize>),

    /// Fixed-size subset of `0..universe`, stored as distinct members.
    Subset { members: Vec<usize>, universe: usize },
}

impl Variable {
    /// Real variable; `value` is clamped into `[lower_bound, upper_bound]`.
    ///
    /// # Panics
    /// Panics if `lower_bound > upper_bound`.
    pub fn real(value: f64, lower_bound: f64, upper_bound: f64) -> Self {
        assert!(
            lower_bound <= upper_bound,
            "lower bound {lower_bound} exceeds upper bound {upper_bound}"
        );
        Variable::Real {
            value: value.clamp(lower_bound, upper_bound),
            lower_bound,
            upper_bound,
        }
    }

    /// Integer variable; `value` is clamped into the bounds.
    ///
    /// # Panics
    /// Panics if `lower_bound > upper_bound`.
    pub fn integer(value: i64, lower_bound: i64, upper_bound: i64) -> Self {
        assert!(
            lower_bound <= upper_bound,
            "lower bound {lower_bound} exceeds upper bound {upper_bound}"
        );
        Variable::Integer {
            value: value.clamp(lower_bound, upper_bound),
            lower_bound,
            upper_bound,
        }
    }

    /// All-zero bit string of `len` bits.
    pub fn binary(len: usize) -> Self {
        Variable::Binary(vec![false; len])
    }

    /// Identity permutation of length `n`.
    pub fn permutation(n: usize) -> Self {
        Variable::Permutation((0..n).collect())
    }

    /// Subset holding the first `size` elements of `0..universe`.
    ///
    /// # Panics
    /// Panics if `size > universe`.
    pub fn subset(size: usize, universe: usize) -> Self {
        assert!(size <= universe, "subset size {size} exceeds universe {universe}");
        Variable::Subset {
            members: (0..size).collect(),
            universe,
        }
    }

    pub fn kind(&self) -> VariableKind {
        match self {
            Variable::Real { .. } => VariableKind::Real,
            Variable::Integer { .. } => VariableKind::Integer,
            Variable::Binary(_) => VariableKind::Binary,
            Variable::Permutation(_) => VariableKind::Permutation,
            Variable::Subset { .. } => VariableKind::Subset,
        }
    }

    /// Returns the value of a real variable.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Variable::Real { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_bits(&self) -> Option<&[bool]> {
        match self {
            Variable::Binary(bits) => Some(bits),
            _ => None,
        }
    }

    pub fn as_permutation(&self) -> Option<&[usize]> {
        match self {
            Variable::Permutation(perm) => Some(perm),
            _ => None,
        }
    }

    /// Replaces the value with a uniformly random one of the same shape.
    ///
    /// A real variable whose bounds span a non-finite width (an infinite
    /// bound, or `-f64::MAX..f64::MAX`) has no uniform distribution and
    /// keeps its value.
    pub fn randomize(&mut self, rng: &mut dyn RngCore) {
        match self {
            Variable::Real {
                value,
                lower_bound,
                upper_bound,
            } => {
                if lower_bound < upper_bound && (*upper_bound - *lower_bound).is_finite() {
                    *value = rng.random_range(*lower_bound..=*upper_bound);
                } else if lower_bound == upper_bound {
                    *value = *lower_bound;
                }
            }
            Variable::Integer {
                value,
                lower_bound,
                upper_bound,
            } => {
                if lower_bound <= upper_bound {
                    *value = rng.random_range(*lower_bound..=*upper_bound);
                }
            }
            Variable::Binary(bits) => bits.iter_mut().for_each(|b| *b = rng.random_bool(0.5)),
            Variable::Permutation(perm) => crate::random::shuffle(perm, rng),
            Variable::Subset { members, universe } => {
                let mut pool: Vec<usize> = (0..*universe).collect();
                crate::random::shuffle(&mut pool, rng);
                pool.truncate(members.len());
                *members = pool;
            }
        }
    }

    /// Distance between two variables of the same encoding.
    ///
    /// Real and integer values use the squared difference, bit strings the
    /// Hamming distance, permutations the total displacement of every
    /// element. Mismatched or other encodings count `0` when equal, `1`
    /// otherwise.
    pub fn distance(&self, other: &Variable) -> f64 {
        match (self, other) {
            (Variable::Real { value: a, .. }, Variable::Real { value: b, .. }) => (a - b).powi(2),
            (Variable::Integer { value: a, .. }, Variable::Integer { value: b, .. }) => {
                // widen first: i64 subtraction overflows for far-apart values
                (*a as f64 - *b as f64).powi(2)
            }
            (Variable::Binary(a), Variable::Binary(b)) => {
                a.iter().zip(b).filter(|(x, y)| x != y).count() as f64
                    + a.len().abs_diff(b.len()) as f64
            }
            (Variable::Permutation(a), Variable::Permutation(b)) => {
                let mut position = vec![0usize; b.len()];
                for (k, &v) in b.iter().enumerate() {
                    if v < position.len() {
                        position[v] = k;
                    }
                }
                a.iter()
                    .enumerate()
                    .filter(|(_, &v)| v < position.len())
                    .map(|(j, &v)| position[v].abs_diff(j) as f64)
                    .sum()
            }
            (a, b) if a == b => 0.0,
            _ => 1.0,
        }
    }
}

//! Error type shared by every module of the crate.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MoeaError>;

/// Failures surfaced by operators, pipelines, archives and the registry.
///
/// All variants except [`MoeaError::SelectionExhausted`] are configuration
/// errors: they are structural and retrying the call cannot succeed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoeaError {
    /// A compound pipeline stage received a batch it cannot partition.
    #[error("operator '{operator}' requires batches divisible by {arity}, got {batch} solutions")]
    ArityMismatch {
        operator: String,
        arity: usize,
        batch: usize,
    },

    /// An operator was invoked with the wrong number of parents.
    #[error("operator '{operator}' expects {expected} parents, got {actual}")]
    ParentCount {
        operator: String,
        expected: usize,
        actual: usize,
    },

    /// A compound or adaptive operator has no child operators.
    #[error("no operators added")]
    NoOperators,

    /// A probability outside `[0, 1]` (or NaN).
    #[error("operator '{operator}' probability must be in [0, 1], got {value}")]
    InvalidProbability { operator: String, value: f64 },

    /// A numeric or textual parameter that failed validation or parsing.
    #[error("invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    /// The registry has no operator under this name.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// A setter tried to change the fixed shape of a solution.
    #[error("invalid number of {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Roulette-wheel selection fell through without choosing an operator.
    ///
    /// Indicates broken probability bookkeeping; there is no recovery.
    #[error("operator selection failed; probabilities are not normalized")]
    SelectionExhausted,
}

impl MoeaError {
    /// Returns `true` for structural configuration faults.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, MoeaError::SelectionExhausted)
    }

    pub(crate) fn parameter(key: impl Into<String>, reason: impl Into<String>) -> Self {
        MoeaError::InvalidParameter {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

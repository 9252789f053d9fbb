//! Configuration and model errors.
//!
//! Solver verdicts (unsatisfiable, unknown) are not errors; they are
//! reported through [`crate::optimize::Verdict`].

use thiserror::Error;

/// Result type for configuration and encoding steps.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors detected before any search begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The same attribute name appears twice in the vocabulary.
    #[error("attribute `{0}` is declared more than once")]
    DuplicateAttribute(String),

    /// Two roles share a name.
    #[error("role `{0}` is declared more than once")]
    DuplicateRole(String),

    /// Two candidates share a key.
    #[error("candidate `{0}` appears more than once")]
    DuplicateCandidate(String),

    /// A role references an attribute outside the vocabulary.
    #[error("role `{role}` references unknown attribute `{attribute}`")]
    UnknownAttribute { role: String, attribute: String },

    /// A role lists the same attribute twice.
    #[error("role `{role}` lists attribute `{attribute}` more than once")]
    RepeatedRoleAttribute { role: String, attribute: String },

    /// A role carries no session attribute and could never be cast.
    #[error("role `{0}` carries no session attribute")]
    MissingSession(String),

    /// An active session is not a session attribute of the vocabulary.
    #[error("active session `{0}` is not a session attribute in the vocabulary")]
    UnknownSession(String),

    /// The bias constant is too large to accumulate safely.
    #[error("bias {0} is outside the supported range")]
    BiasOutOfRange(i64),

    /// A preference value other than -1, 0 or +1.
    #[error("preference value {0} is not one of -1, 0, +1")]
    InvalidPreference(i64),

    /// Summing scores over every session could overflow `i64`.
    #[error("score accumulation overflows i64")]
    ScoreOverflow,

    /// A hand-built model references variables or candidates that do not exist.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// A solver or annealing parameter is out of range.
    #[error("invalid solver configuration: {0}")]
    InvalidSolverConfig(String),
}
